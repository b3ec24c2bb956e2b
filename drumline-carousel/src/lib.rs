//! Virtualized song-select carousel engine for the Drumline client.
//!
//! The carousel keeps only the cards intersecting the viewport mounted
//! while a damped scroll chases the selection through the full filtered
//! catalog. Card rendering, routing, catalog loading, and the search
//! algorithm are external collaborators reached through the seams in
//! [`surface`] and [`filter`]; this crate owns the windowing, the scroll
//! physics, the selection state, and the card pool.

pub mod carousel;
pub mod config;
pub mod filter;
pub mod layout;
pub mod messages;
pub mod motion;
pub mod pool;
pub mod surface;

pub use carousel::MapCarousel;
pub use config::{CarouselConfig, DampingConfig};
pub use filter::{MapFilter, SubstringFilter};
pub use layout::CardPlacement;
pub use messages::{Key, KeyPress};
pub use pool::{CardPool, EntryKey, ReconcilePlan, SlotId};
pub use surface::{CardFactory, CardSurface, SearchListener};
