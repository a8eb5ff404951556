//! District-level aggregation: per-category population-weighted mean times.

use crate::models::{Category, CategorySet, DistrictStats, FeatureCollection};
use std::collections::BTreeMap;

#[derive(Default)]
struct CategoryAccumulator {
    weighted_sum: f64,
    contributing_pop: f64,
}

#[derive(Default)]
struct DistrictAccumulator {
    total_pop: f64,
    per_category: BTreeMap<Category, CategoryAccumulator>,
}

/// Compute per-district, per-category population-weighted mean travel times.
///
/// Unlike the grid rule, categories are accumulated independently: a
/// feature missing one category's time is skipped for that category only,
/// and its population still weighs into every category it does have a time
/// for. A category whose contributing population stayed zero is omitted
/// from that district's means, which keeps "not computable" distinct from
/// a genuine zero-minute mean.
///
/// Keys are string-normalized district ids. Districts without any
/// positive-population feature never appear.
pub fn district_statistics(
    geodata: &FeatureCollection,
    categories: &CategorySet,
) -> BTreeMap<String, DistrictStats> {
    let mut accumulators: BTreeMap<String, DistrictAccumulator> = BTreeMap::new();

    for feature in &geodata.features {
        let pop = feature.properties.population();
        if pop <= 0.0 {
            continue;
        }
        let Some(district) = feature.properties.district_label() else {
            continue;
        };

        let acc = accumulators.entry(district).or_default();
        acc.total_pop += pop;
        for category in categories.iter() {
            if let Some(time) = feature.properties.travel_time(category) {
                let cat_acc = acc.per_category.entry(category).or_default();
                cat_acc.weighted_sum += time * pop;
                cat_acc.contributing_pop += pop;
            }
        }
    }

    accumulators
        .into_iter()
        .map(|(district, acc)| {
            let means = acc
                .per_category
                .into_iter()
                .filter(|(_, cat_acc)| cat_acc.contributing_pop > 0.0)
                .map(|(category, cat_acc)| {
                    (category, cat_acc.weighted_sum / cat_acc.contributing_pop)
                })
                .collect();
            (
                district,
                DistrictStats {
                    total_pop: acc.total_pop,
                    means,
                },
            )
        })
        .collect()
}
