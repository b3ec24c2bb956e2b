//! The map selector: selection state, scroll physics, and the windowed
//! render pass over the pooled cards.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use drumline_model::{MapRecord, sort_by_difficulty};
use rand::{Rng, RngCore};

use crate::config::CarouselConfig;
use crate::filter::MapFilter;
use crate::layout;
use crate::messages::{Key, KeyPress};
use crate::pool::CardPool;
use crate::surface::{CardFactory, CardSurface, SearchListener};

/// A virtualized, physically-scrolled carousel over the map catalog.
///
/// The carousel owns the filtered sequence, the selection, the scroll
/// scalars, and the card pool. Card rendering, the search algorithm, the
/// frame tick source, and input events are supplied by the embedding
/// layer and reach the carousel through plain method calls on a single
/// execution context: the engine is cooperative and single-threaded, and
/// input arriving between two ticks coalesces into the next tick's
/// reconciliation.
pub struct MapCarousel<S: CardSurface> {
    config: CarouselConfig,
    viewport_height: f32,

    items: Vec<Arc<MapRecord>>,
    filtered: Vec<Arc<MapRecord>>,
    query: String,

    selected_index: usize,

    /// Where selection/user intent wants the scroll to be.
    target_scroll: f32,
    /// The physically-advanced, rendered position.
    current_scroll: f32,
    /// The scroll value the visible window was last computed from; `None`
    /// before the first render pass.
    loaded_scroll: Option<f32>,

    dragging: bool,

    pool: CardPool<S>,
    factory: CardFactory<S>,
    filter: Box<dyn MapFilter>,
    rng: Box<dyn RngCore>,
    search_listener: Option<SearchListener>,
}

impl<S: CardSurface> MapCarousel<S> {
    pub fn new(
        config: CarouselConfig,
        viewport_height: f32,
        factory: CardFactory<S>,
        filter: Box<dyn MapFilter>,
    ) -> Self {
        Self {
            config,
            viewport_height,
            items: Vec::new(),
            filtered: Vec::new(),
            query: String::new(),
            selected_index: 0,
            target_scroll: 0.0,
            current_scroll: 0.0,
            loaded_scroll: None,
            dragging: false,
            pool: CardPool::new(),
            factory,
            filter,
            rng: Box::new(rand::rng()),
            search_listener: None,
        }
    }

    /// Replace the random source used for shuffle and fallback selection.
    /// Tests seed this for reproducibility.
    pub fn set_rng(&mut self, rng: Box<dyn RngCore>) {
        self.rng = rng;
    }

    /// Register the `(filtered, total)` count callback for the search UI.
    pub fn set_search_listener(&mut self, listener: SearchListener) {
        self.search_listener = Some(listener);
    }

    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn items(&self) -> &[Arc<MapRecord>] {
        &self.items
    }

    /// The sequence currently matching the active query, in display order.
    pub fn filtered(&self) -> &[Arc<MapRecord>] {
        &self.filtered
    }

    // ========== SELECTION ==========

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// Clamp `index` into the filtered sequence and aim the target scroll
    /// at it. Soft navigation: the rendered position catches up over the
    /// following ticks. Inert while the sequence is empty.
    pub fn set_selected_index(&mut self, index: isize) {
        if self.filtered.is_empty() {
            return;
        }
        let last = self.filtered.len() as isize - 1;
        self.selected_index = index.clamp(0, last) as usize;
        self.target_scroll = self.selected_map_position();
    }

    /// The record the selection rests on, when the sequence is non-empty.
    pub fn selected_map(&self) -> Option<&Arc<MapRecord>> {
        self.filtered.get(self.selected_index)
    }

    /// The canonical scroll offset at which the selected row is centered.
    pub fn selected_map_position(&self) -> f32 {
        self.selected_index as f32 * self.config.item_height
    }

    /// Select `record` by identity; ignored when it is not in the filtered
    /// sequence.
    pub fn select(&mut self, record: &Arc<MapRecord>) {
        match self
            .filtered
            .iter()
            .position(|candidate| Arc::ptr_eq(candidate, record))
        {
            Some(index) => self.set_selected_index(index as isize),
            None => log::debug!("select ignored, {:?} is filtered out", record.title),
        }
    }

    /// Jump to a uniformly random map in the filtered sequence.
    pub fn shuffle(&mut self) {
        if self.filtered.is_empty() {
            return;
        }
        let index = self.rng.random_range(0..self.filtered.len());
        self.set_selected_index(index as isize);
    }

    // ========== ITEMS AND SEARCH ==========

    /// Replace the full item set and re-run the active query against it.
    pub fn set_items(&mut self, items: Vec<Arc<MapRecord>>) {
        self.items = items;
        sort_by_difficulty(&mut self.items);
        let query = self.query.clone();
        self.on_search(&query);
    }

    /// Re-filter on a query change: rebuild the filtered sequence, report
    /// counts, keep the user's place when the selected record survives the
    /// filter, and fall back to a random map when it does not. The new
    /// selection is a hard pull and the window re-renders immediately
    /// rather than waiting for the next tick.
    pub fn on_search(&mut self, query: &str) {
        self.query.clear();
        self.query.push_str(query);

        let previous = self.selected_map().cloned();
        self.filtered = self.filter.filter(query, &self.items);
        log::debug!(
            "query {:?} matched {} of {} maps",
            query,
            self.filtered.len(),
            self.items.len()
        );
        if let Some(listener) = &mut self.search_listener {
            listener(self.filtered.len(), self.items.len());
        }

        let kept = previous.and_then(|selected| {
            self.filtered
                .iter()
                .position(|candidate| Arc::ptr_eq(candidate, &selected))
        });
        let next = match kept {
            Some(index) => Some(index),
            None if self.filtered.is_empty() => None,
            None => Some(self.rng.random_range(0..self.filtered.len())),
        };
        if let Some(index) = next {
            self.hard_pull(index);
        }
        self.refresh();
    }

    /// Snap selection and both scroll scalars to `index` at once, skipping
    /// the interpolators, so recomposing the list never plays out as a
    /// long visible scroll.
    fn hard_pull(&mut self, index: usize) {
        self.selected_index = index;
        self.target_scroll = self.selected_map_position();
        self.current_scroll = self.target_scroll;
    }

    // ========== INPUT ==========

    /// React to a key press. Returns `true` when the key was matched, in
    /// which case the caller must consume the event instead of letting it
    /// reach the page.
    pub fn handle_key(&mut self, press: KeyPress) -> bool {
        let page = (self.viewport_height / self.config.item_height).round() as isize;
        let index = self.selected_index as isize;
        match (press.key, press.ctrl) {
            (Key::Home, true) => self.set_selected_index(0),
            (Key::End, true) => self.set_selected_index(self.filtered.len() as isize - 1),
            (Key::PageUp, _) => self.set_selected_index(index - page),
            (Key::PageDown, _) => self.set_selected_index(index + page),
            (Key::ArrowUp, _) => self.set_selected_index(index - 1),
            (Key::ArrowDown, _) => self.set_selected_index(index + 1),
            (Key::F2, _) => self.shuffle(),
            _ => return false,
        }
        true
    }

    /// One selection step per wheel tick, by sign only; wheel magnitude
    /// never scales the step.
    pub fn handle_wheel(&mut self, delta_y: f32) {
        let step = match delta_y {
            d if d > 0.0 => 1,
            d if d < 0.0 => -1,
            _ => return,
        };
        self.set_selected_index(self.selected_index as isize + step);
    }

    /// Flag a drag gesture. While dragging, the target stops following the
    /// selection; the rendered position still chases the target.
    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    // ========== PER-FRAME DRIVER ==========

    /// Advance the scroll physics by `dt_ms` elapsed milliseconds, then
    /// reconcile the visible window if the rendered position moved.
    pub fn tick(&mut self, dt_ms: f32) {
        if !self.dragging && !self.filtered.is_empty() {
            // Pulls the target to the selected row.
            self.target_scroll =
                self.config
                    .follow
                    .advance(self.target_scroll, self.selected_map_position(), dt_ms);
        }
        self.current_scroll =
            self.config
                .chase
                .advance(self.current_scroll, self.target_scroll, dt_ms);

        // Exact equality on purpose: the chase interpolator snaps onto its
        // target, so an idle carousel settles on this guard instead of
        // re-rendering every frame.
        if self.loaded_scroll == Some(self.current_scroll) {
            return;
        }
        self.refresh();
    }

    /// The viewport grew or shrank; recompute the window unconditionally.
    pub fn set_viewport_height(&mut self, height: f32) {
        self.viewport_height = height;
        self.refresh();
    }

    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    pub fn current_scroll(&self) -> f32 {
        self.current_scroll
    }

    pub fn target_scroll(&self) -> f32 {
        self.target_scroll
    }

    /// Rows currently intersecting the viewport.
    pub fn visible_rows(&self) -> Range<usize> {
        layout::render_range(
            self.current_scroll,
            self.viewport_height,
            self.config.item_height,
            self.filtered.len(),
        )
    }

    // ========== RENDER PASS ==========

    /// Recompute the visible range and reconcile the mounted cards against
    /// it: retained cards are repositioned and reflagged, cards whose row
    /// left the range are recycled, rows that entered it are filled from
    /// the free pool.
    fn refresh(&mut self) {
        self.loaded_scroll = Some(self.current_scroll);
        let range = self.visible_rows();

        let plan = self
            .pool
            .diff(range.clone().map(|row| (row, &self.filtered[row])));

        for key in &plan.released {
            self.pool.release(*key);
        }
        for &(row, slot) in &plan.retained {
            let placement =
                layout::place_card(row, self.current_scroll, self.viewport_height, &self.config);
            let surface = self.pool.surface_mut(slot);
            surface.set_selected(row == self.selected_index);
            surface.set_position(placement);
        }
        for &row in &plan.acquired {
            let placement =
                layout::place_card(row, self.current_scroll, self.viewport_height, &self.config);
            let slot = self
                .pool
                .acquire(self.filtered[row].clone(), &mut *self.factory);
            let surface = self.pool.surface_mut(slot);
            surface.set_selected(row == self.selected_index);
            surface.set_position(placement);
        }

        if !plan.released.is_empty() || !plan.acquired.is_empty() {
            log::trace!(
                "window {:?}: {} filled, {} recycled, {} free",
                range,
                plan.acquired.len(),
                plan.released.len(),
                self.pool.free_len()
            );
        }
    }

    /// Release every mounted card. Idempotent, so teardown paths may call
    /// it unconditionally; a later tick re-renders from scratch.
    pub fn detach_all(&mut self) {
        self.pool.release_all();
        self.loaded_scroll = None;
    }

    // ========== POOL INTROSPECTION ==========

    pub fn active_cards(&self) -> usize {
        self.pool.active_len()
    }

    pub fn pooled_cards(&self) -> usize {
        self.pool.free_len()
    }

    /// Total card surfaces ever constructed.
    pub fn constructed_cards(&self) -> usize {
        self.pool.constructed()
    }
}

impl<S: CardSurface> fmt::Debug for MapCarousel<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapCarousel")
            .field("items", &self.items.len())
            .field("filtered", &self.filtered.len())
            .field("selected_index", &self.selected_index)
            .field("target_scroll", &self.target_scroll)
            .field("current_scroll", &self.current_scroll)
            .field("loaded_scroll", &self.loaded_scroll)
            .field("dragging", &self.dragging)
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}
