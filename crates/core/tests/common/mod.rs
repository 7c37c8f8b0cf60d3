//! Page builders shared by the integration tests.
#![allow(dead_code)]

use glyphgrid_core::geometry::{BoundingBox, Orientation};
use glyphgrid_core::layout::{Character, LayoutParams, Page};

pub const FONT: f64 = 10.0;

/// Characters of `text` set left to right, each `0.6 * size` wide.
pub fn word_sized(text: &str, left: f64, top: f64, size: f64) -> Vec<Character> {
    let advance = 0.6 * size;
    text.chars()
        .enumerate()
        .map(|(i, ch)| {
            let x = left + advance * i as f64;
            let bbox = BoundingBox::new(x, top, x + advance, top + size).unwrap();
            Character::new(&ch.to_string(), bbox, size)
        })
        .collect()
}

pub fn word(text: &str, left: f64, top: f64) -> Vec<Character> {
    word_sized(text, left, top, FONT)
}

/// Characters of `text` set top to bottom, each `0.6 * FONT` tall.
pub fn north_word(text: &str, left: f64, top: f64) -> Vec<Character> {
    let advance = 0.6 * FONT;
    text.chars()
        .enumerate()
        .map(|(i, ch)| {
            let y = top + advance * i as f64;
            let bbox = BoundingBox::new(left, y, left + FONT, y + advance).unwrap();
            Character::new(&ch.to_string(), bbox, FONT).with_orientation(Orientation::North)
        })
        .collect()
}

/// An unclustered page holding one cell per string, rows 40pt apart and
/// columns 150pt apart, in row-major stream order.
pub fn grid_page(rows: &[&[&str]]) -> Page {
    let mut chars = Vec::new();
    for (r, row) in rows.iter().enumerate() {
        for (c, text) in row.iter().enumerate() {
            chars.extend(word(text, 10.0 + 150.0 * c as f64, 10.0 + 40.0 * r as f64));
        }
    }
    Page::new(612.0, 792.0, chars)
}

/// Same as [`grid_page`], already clustered with default parameters.
pub fn clustered_grid(rows: &[&[&str]]) -> Page {
    let mut page = grid_page(rows);
    page.cluster(&LayoutParams::default(), &[]);
    page
}

pub fn texts(page: &Page) -> Vec<Vec<String>> {
    page.rows()
        .iter()
        .map(|r| r.texts().map(str::to_string).collect())
        .collect()
}
