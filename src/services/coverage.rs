//! Grid-level aggregation: coverage share and population-weighted median.

use crate::models::{CategorySet, FeatureCollection, FeatureProperties, GridStats};

/// Worst travel time across the active categories, requiring all of them.
///
/// A feature missing any active category has no defined worst time. Partial
/// accessibility data is never imputed as zero minutes.
fn strict_max_time(props: &FeatureProperties, categories: &CategorySet) -> Option<f64> {
    let mut max_time = f64::NEG_INFINITY;
    for category in categories.iter() {
        let time = props.travel_time(category)?;
        max_time = max_time.max(time);
    }
    // An empty category set leaves no sample to take a maximum of.
    if max_time.is_finite() {
        Some(max_time)
    } else {
        None
    }
}

/// Compute grid-level coverage and the population-weighted median time.
///
/// A feature with positive population counts as covered when every active
/// category is reachable within `threshold_minutes`. Features missing any
/// active category still add their population to the total but contribute
/// no median sample, so coverage reflects them as uncovered.
///
/// Returns `None` when total population is zero or no feature produced a
/// usable sample; the caller renders that as "no result", never as zeros.
pub fn grid_statistics(
    geodata: &FeatureCollection,
    categories: &CategorySet,
    threshold_minutes: f64,
) -> Option<GridStats> {
    let mut total_pop = 0.0;
    let mut covered_pop = 0.0;
    // (worst time, population) per fully-covered feature
    let mut sample: Vec<(f64, f64)> = Vec::new();

    for feature in &geodata.features {
        let pop = feature.properties.population();
        if pop <= 0.0 {
            continue;
        }
        total_pop += pop;

        let Some(max_time) = strict_max_time(&feature.properties, categories) else {
            continue;
        };
        if max_time <= threshold_minutes {
            covered_pop += pop;
        }
        // The sample takes every defined worst time, past the threshold or not.
        sample.push((max_time, pop));
    }

    if total_pop <= 0.0 || sample.is_empty() {
        return None;
    }

    sample.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    // Walk cumulative population to the first sample at or past the
    // half-point. Features excluded from the sample still weigh into
    // total_pop, so the cumulative mass may never reach half; the largest
    // sample time stands in for the median then.
    let half = total_pop / 2.0;
    let mut median_time = sample[sample.len() - 1].0;
    let mut cumulative = 0.0;
    for (time, pop) in &sample {
        cumulative += pop;
        if cumulative >= half {
            median_time = *time;
            break;
        }
    }

    Some(GridStats {
        coverage: covered_pop / total_pop,
        median_time,
        total_pop,
        covered_pop,
    })
}
