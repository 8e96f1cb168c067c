//! Pango text drawing for the wheel
//!
//! Cairo's toy font API keeps growing internal font caches, so all text
//! goes through Pango layouts with cached font descriptions.

use cairo::Context;
use pango::{FontDescription, Weight};
use pangocairo::functions::{create_layout, show_layout};
use std::cell::RefCell;
use std::collections::HashMap;

const FAMILY: &str = "Sans";

#[derive(Hash, Eq, PartialEq, Clone, Copy, Debug)]
struct FontKey {
    bold: bool,
    size_pango: i32, // Size in Pango units (points * PANGO_SCALE)
}

/// Cache for FontDescription objects to avoid repeated allocations
struct FontDescriptionCache {
    cache: HashMap<FontKey, FontDescription>,
    max_entries: usize,
}

impl FontDescriptionCache {
    fn new() -> Self {
        Self {
            cache: HashMap::new(),
            max_entries: 32,
        }
    }

    fn get_or_create(&mut self, size: f64, bold: bool) -> FontDescription {
        let key = FontKey {
            bold,
            size_pango: (size * pango::SCALE as f64) as i32,
        };
        if let Some(desc) = self.cache.get(&key) {
            return desc.clone();
        }

        // Only a handful of sizes are used; start over when that assumption breaks
        if self.cache.len() >= self.max_entries {
            self.cache.clear();
        }

        let mut desc = FontDescription::new();
        desc.set_family(FAMILY);
        desc.set_weight(if bold { Weight::Semibold } else { Weight::Normal });
        desc.set_size(key.size_pango);
        self.cache.insert(key, desc.clone());
        desc
    }
}

thread_local! {
    static FONT_DESC_CACHE: RefCell<FontDescriptionCache> = RefCell::new(FontDescriptionCache::new());
}

fn layout_for(cr: &Context, text: &str, size: f64, bold: bool) -> pango::Layout {
    let font_desc = FONT_DESC_CACHE.with(|cache| cache.borrow_mut().get_or_create(size, bold));
    let layout = create_layout(cr);
    layout.set_font_description(Some(&font_desc));
    layout.set_text(text);
    layout
}

/// Logical width and height of `text` in pixels
pub fn text_size(cr: &Context, text: &str, size: f64, bold: bool) -> (f64, f64) {
    let (_ink, logical) = layout_for(cr, text, size, bold).extents();
    let scale = pango::SCALE as f64;
    (logical.width() as f64 / scale, logical.height() as f64 / scale)
}

/// Draw `text` centered on `(x, y)` with the current source color
pub fn show_centered(cr: &Context, x: f64, y: f64, text: &str, size: f64, bold: bool) {
    let layout = layout_for(cr, text, size, bold);
    let (_ink, logical) = layout.extents();
    let scale = pango::SCALE as f64;
    let width = logical.width() as f64 / scale;
    let height = logical.height() as f64 / scale;
    cr.move_to(x - width / 2.0, y - height / 2.0);
    show_layout(cr, &layout);
}
