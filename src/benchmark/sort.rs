//! Worst-first ordering of benchmarked entities.

use std::cmp::Ordering;

use super::{rollup::EntityKind, summary::EntitySummary};

/// Aggregate that always leads a measure-by-measure listing.
pub const DEFAULT_PINNED_AGGREGATE: &str = "lpzomnibus";

/// Score of an entity without any percentile; sorts after every real score.
pub const NULL_PERCENTILE_SCORE: f64 = f64::INFINITY;

/// Ascending score: lower means worse, and worse sorts first.
pub fn badness_score(summary: &EntitySummary, pinned: Option<&str>) -> f64 {
    match summary.kind {
        EntityKind::Aggregate => {
            if pinned == Some(summary.entity_id.as_str()) {
                f64::NEG_INFINITY
            } else {
                -summary.cost_saving_50th
            }
        }
        EntityKind::Organization => match summary.mean_percentile {
            None => NULL_PERCENTILE_SCORE,
            Some(percentile) if summary.meta.low_is_good == Some(false) => percentile,
            Some(percentile) => 100.0 - percentile,
        },
    }
}

/// Sort by id, then stably by badness so equal scores keep id order.
pub fn sort_entities<T: AsRef<EntitySummary>>(mut entities: Vec<T>, pinned: Option<&str>) -> Vec<T> {
    entities.sort_by(|a, b| a.as_ref().entity_id.cmp(&b.as_ref().entity_id));
    entities.sort_by(|a, b| {
        badness_score(a.as_ref(), pinned)
            .partial_cmp(&badness_score(b.as_ref(), pinned))
            .unwrap_or(Ordering::Equal)
    });
    entities
}
