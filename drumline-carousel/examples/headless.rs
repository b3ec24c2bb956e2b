//! Drive the carousel headlessly with a text card surface.
//!
//! Run with `RUST_LOG=trace` to watch the pool recycle cards as the
//! window slides:
//!
//! ```sh
//! RUST_LOG=trace cargo run --example headless
//! ```

use std::sync::Arc;

use drumline_carousel::{
    CardPlacement, CardSurface, CarouselConfig, Key, KeyPress, MapCarousel, SubstringFilter,
};
use drumline_model::MapRecord;

struct TextCard {
    line: String,
}

impl CardSurface for TextCard {
    fn set_content(&mut self, record: &Arc<MapRecord>) {
        self.line = format!("{} - {}", record.artist, record.title);
    }

    fn set_selected(&mut self, selected: bool) {
        if selected && !self.line.starts_with('>') {
            self.line.insert_str(0, "> ");
        }
    }

    fn set_position(&mut self, _placement: CardPlacement) {}

    fn kill(&mut self) {}
}

fn catalog(n: usize) -> Vec<Arc<MapRecord>> {
    (0..n)
        .map(|i| {
            Arc::new(MapRecord {
                id: format!("song-{i:02}"),
                title: format!("Song {i:02}"),
                artist: if i % 3 == 0 { "Waveshaper" } else { "Aquellex" }.to_string(),
                mapper: None,
                difficulty: Some(i as f32 * 0.35),
                difficulty_string: None,
                write_time: 0,
                audio: format!("audio/song-{i:02}.ogg"),
                file_name: format!("song-{i:02}.bjson"),
            })
        })
        .collect()
}

fn print_window(carousel: &MapCarousel<TextCard>, label: &str) {
    println!("-- {label} --");
    for row in carousel.visible_rows() {
        let record = &carousel.filtered()[row];
        let marker = if row == carousel.selected_index() { ">" } else { " " };
        println!("  {marker} {} - {}", record.artist, record.title);
    }
}

fn main() {
    env_logger::init();

    let factory = Box::new(|record: &Arc<MapRecord>| TextCard {
        line: format!("{} - {}", record.artist, record.title),
    });
    let mut carousel = MapCarousel::new(
        CarouselConfig::select_defaults(100.0),
        500.0,
        factory,
        Box::new(SubstringFilter),
    );
    carousel.set_search_listener(Box::new(|filtered, total| {
        println!("   [{filtered} / {total} maps]");
    }));
    carousel.set_items(catalog(40));
    print_window(&carousel, "initial (random landing)");

    carousel.handle_key(KeyPress::with_ctrl(Key::Home));
    while carousel.current_scroll() != carousel.target_scroll() {
        carousel.tick(16.0);
    }
    print_window(&carousel, "after Ctrl+Home, settled");

    carousel.handle_key(KeyPress::plain(Key::PageDown));
    for _ in 0..30 {
        carousel.tick(16.0);
    }
    print_window(&carousel, "one page down, mid-flight");

    carousel.on_search("wave");
    print_window(&carousel, "searching 'wave' (hard pull)");

    println!(
        "cards: {} mounted, {} pooled, {} ever constructed",
        carousel.active_cards(),
        carousel.pooled_cards(),
        carousel.constructed_cards()
    );
}
