//! Seams to the card renderer owned by the embedding UI layer.

use std::sync::Arc;

use drumline_model::MapRecord;

use crate::layout::CardPlacement;

/// One reusable visual card instance, owned by the embedding layer.
///
/// The carousel drives the full lifecycle: a surface is created by the
/// factory, shown with content, a position, and a selection flag, and
/// detached with [`kill`](CardSurface::kill) when its row scrolls out of
/// view, at which point the instance is recycled into the free pool
/// rather than destroyed.
pub trait CardSurface {
    /// Display `record` on this card, replacing stale content left over
    /// from a previous lease.
    fn set_content(&mut self, record: &Arc<MapRecord>);

    /// Highlight state; exactly one visible card carries it at a time.
    fn set_selected(&mut self, selected: bool);

    /// Move the card to `placement` within the viewport.
    fn set_position(&mut self, placement: CardPlacement);

    /// Detach the card from display. Its content may linger until the
    /// instance is reused.
    fn kill(&mut self);
}

/// Constructor for card surfaces, invoked only when the free pool has
/// nothing to recycle.
pub type CardFactory<S> = Box<dyn FnMut(&Arc<MapRecord>) -> S>;

/// Receives `(filtered_count, total_count)` after every search change, for
/// the search bar's "n / m" readout.
pub type SearchListener = Box<dyn FnMut(usize, usize)>;
