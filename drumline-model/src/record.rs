//! Map records as published in the server's map catalog.

use std::cmp::Ordering;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// One song/beatmap entry of the map catalog.
///
/// Records are owned by the loading layer and shared immutably (`Arc`)
/// with the UI. Two handles refer to the same entry exactly when they
/// point at the same allocation (`Arc::ptr_eq`); the selector relies on
/// that identity to keep a user's place across filter changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MapRecord {
    /// Stable identifier. Defaults to the catalog key when the manifest
    /// omits it; see [`crate::Catalog::into_records`].
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub mapper: Option<String>,
    /// Numeric difficulty rating used for the catalog sort order.
    #[serde(default)]
    pub difficulty: Option<f32>,
    /// Display label for the difficulty ("Expert", "8.5", ...).
    #[serde(default)]
    pub difficulty_string: Option<String>,
    /// Last modification time, epoch milliseconds.
    pub write_time: i64,
    /// Relative URL of the audio asset.
    pub audio: String,
    /// File name of the map source, filled in from the catalog key.
    #[serde(default)]
    pub file_name: String,
}

impl MapRecord {
    /// Difficulty label for display: the explicit string when present,
    /// otherwise the numeric rating.
    pub fn difficulty_label(&self) -> Option<String> {
        if let Some(label) = &self.difficulty_string {
            return Some(label.clone());
        }
        self.difficulty.map(|d| format!("{d:.1}"))
    }
}

/// Sort records ascending by difficulty.
///
/// Records without a difficulty rating sort ahead of rated ones and in an
/// unspecified order relative to each other; callers must not rely on any
/// particular placement among unrated entries.
pub fn sort_by_difficulty(records: &mut [Arc<MapRecord>]) {
    records.sort_unstable_by(|a, b| {
        a.difficulty
            .partial_cmp(&b.difficulty)
            .unwrap_or(Ordering::Equal)
    });
}
