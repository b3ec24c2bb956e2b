//! The search seam: an externally supplied, ordering-defining filter.

use std::sync::Arc;

use drumline_model::MapRecord;

/// Computes the sequence of records matching `query`, in display order.
///
/// Implementations define the ordering of the result and are expected to
/// be free of side effects. The carousel rebuilds the sequence in full on
/// every query or item-set change and remaps its selection by identity;
/// no incremental diffing against the previous sequence is attempted.
pub trait MapFilter {
    fn filter(&self, query: &str, items: &[Arc<MapRecord>]) -> Vec<Arc<MapRecord>>;
}

impl<F> MapFilter for F
where
    F: Fn(&str, &[Arc<MapRecord>]) -> Vec<Arc<MapRecord>>,
{
    fn filter(&self, query: &str, items: &[Arc<MapRecord>]) -> Vec<Arc<MapRecord>> {
        self(query, items)
    }
}

/// Case-insensitive substring match over title, artist, and mapper,
/// preserving catalog order. Stands in for the client's search in examples
/// and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct SubstringFilter;

impl MapFilter for SubstringFilter {
    fn filter(&self, query: &str, items: &[Arc<MapRecord>]) -> Vec<Arc<MapRecord>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return items.to_vec();
        }
        items
            .iter()
            .filter(|record| {
                record.title.to_lowercase().contains(&needle)
                    || record.artist.to_lowercase().contains(&needle)
                    || record
                        .mapper
                        .as_deref()
                        .is_some_and(|mapper| mapper.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect()
    }
}
