//! Name search over the record store.

use crate::model::ScoreRecord;

/// Records whose name contains `term`, ignoring case, in store order.
///
/// An empty term matches every record.
pub fn filter_by_name<'a>(records: &'a [ScoreRecord], term: &str) -> Vec<&'a ScoreRecord> {
    let needle = term.to_lowercase();
    records
        .iter()
        .filter(|r| r.name.to_lowercase().contains(&needle))
        .collect()
}
