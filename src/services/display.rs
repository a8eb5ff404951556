//! Presentation helpers for map layers and district summaries.

use crate::models::{CategorySet, DistrictStats, FeatureProperties};

/// Worst travel time across whichever active categories have a value.
///
/// Map coloring tolerates partial data: a cell with times for only some
/// of the selected categories is still shaded by the worst one present.
/// This is deliberately laxer than the coverage rule, which requires all
/// categories before a feature counts at all.
pub fn max_travel_time(props: &FeatureProperties, categories: &CategorySet) -> Option<f64> {
    categories
        .iter()
        .filter_map(|category| props.travel_time(category))
        .fold(None, |worst, time| {
            Some(match worst {
                Some(w) if w >= time => w,
                _ => time,
            })
        })
}

/// Headline minutes for a district summary row.
///
/// The largest mean among the selected categories, rounded to whole
/// minutes. `None` means no selected category was computable for this
/// district and the row renders as unreachable.
pub fn district_headline(stats: &DistrictStats, categories: &CategorySet) -> Option<u32> {
    let worst = categories
        .iter()
        .filter_map(|category| stats.means.get(&category).copied())
        .fold(None, |acc: Option<f64>, mean| {
            Some(match acc {
                Some(a) if a >= mean => a,
                _ => mean,
            })
        })?;
    Some(worst.round() as u32)
}
