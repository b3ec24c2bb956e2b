//! The map catalog manifest served alongside the game assets.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::record::MapRecord;

/// The catalog manifest: a format version plus every published map,
/// keyed by the map's file name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Catalog {
    pub version: u32,
    pub maps: HashMap<String, MapRecord>,
}

impl Catalog {
    /// Decode a manifest from its JSON wire form.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Consume the manifest into shared record handles, applying the
    /// loader-side post-processing the selector must never do itself:
    /// each record's `file_name` is taken from its catalog key, and a
    /// missing `id` defaults to that key.
    pub fn into_records(self) -> Vec<Arc<MapRecord>> {
        self.maps
            .into_iter()
            .map(|(key, mut record)| {
                if record.id.is_empty() {
                    record.id = key.clone();
                }
                record.file_name = key;
                Arc::new(record)
            })
            .collect()
    }
}
