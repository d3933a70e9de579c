//! Drive a typeahead over an in-memory catalog without any UI toolkit.
//!
//! Run with: cargo run -p typeahead --example headless_catalog
//!
//! Set `RUST_LOG=typeahead=debug` to watch the search pipeline.

use std::time::Duration;

use tracing_subscriber::EnvFilter;
use typeahead::headless::{HeadlessField, HeadlessOverlayHost};
use typeahead::{Key, Rect, TextField, TypeaheadConfig, attach};

#[derive(Debug, Clone)]
struct Material {
    code: &'static str,
    name: &'static str,
}

const CATALOG: &[Material] = &[
    Material { code: "AL-6061", name: "Aluminium 6061" },
    Material { code: "AL-7075", name: "Aluminium 7075" },
    Material { code: "SS-304", name: "Stainless 304" },
    Material { code: "SS-316", name: "Stainless 316" },
    Material { code: "TI-G5", name: "Titanium Grade 5" },
];

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let field = HeadlessField::new(Rect::new(20.0, 40.0, 240.0, 24.0));
    let host = HeadlessOverlayHost::new();

    let config = TypeaheadConfig::<Material>::new()
        .fetch_items(|term: String| async move {
            // Simulated network latency.
            tokio::time::sleep(Duration::from_millis(40)).await;
            let term = term.to_lowercase();
            let matches: Vec<Material> = CATALOG
                .iter()
                .filter(|m| {
                    m.code.to_lowercase().contains(&term) || m.name.to_lowercase().contains(&term)
                })
                .cloned()
                .collect();
            Ok::<_, std::io::Error>(matches)
        })
        .display_value(|m: &Material| format!("{} — {}", m.code, m.name))
        .on_pick(|m: &Material| println!("picked {}", m.code))
        .min_chars(2);

    let handle = attach(field.clone(), host.clone(), config)?;

    field.focus();
    field.type_text("s");
    field.type_text("st");
    tokio::time::sleep(Duration::from_millis(400)).await;

    if let Some(surface) = host.surface() {
        for row in surface.row_markup() {
            println!("  {row}");
        }
    }

    field.press_key(Key::ArrowDown);
    field.press_key(Key::ArrowDown);
    field.press_key(Key::Enter);
    println!("field value: {}", field.value());

    handle.destroy();
    Ok(())
}
