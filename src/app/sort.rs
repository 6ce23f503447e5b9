use std::{cmp::Ordering, fmt::Display};

use clap::ValueEnum;

use crate::storage::entities::RecordEntity;

/// The two derived orderings of the display list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortMode {
    /// Newest creation first, descending by id.
    Recent,
    /// Highest water value first. No creation path writes the water field, so
    /// this usually degenerates to the stored order.
    Water,
}

impl Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortMode::Recent => write!(f, "recent"),
            SortMode::Water => write!(f, "water"),
        }
    }
}

/// Returns a sorted copy for display. The underlying collection is never
/// reordered; the view is recomputed from scratch on every render.
pub fn sorted_for_display(records: &[RecordEntity], mode: SortMode) -> Vec<RecordEntity> {
    let mut view = records.to_vec();
    match mode {
        SortMode::Recent => view.sort_by(|a, b| b.id.cmp(&a.id)),
        // An unset water value compares below every set one. Ties, including a
        // whole collection with no water values, keep their original relative
        // order since the sort is stable.
        SortMode::Water => view.sort_by(|a, b| {
            let (a, b) = (water_key(a), water_key(b));
            b.partial_cmp(&a).unwrap_or(Ordering::Equal)
        }),
    }
    view
}

fn water_key(record: &RecordEntity) -> f64 {
    record.agua.unwrap_or(f64::NEG_INFINITY)
}
