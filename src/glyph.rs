//! Glyph sets used to draw digits and separators.
//!
//! A glyph set maps each decimal digit (and the `:` separator) to a fixed
//! number of rows. [`PLAIN`] draws every character on a single row, while
//! [`BLOCK`] draws five-row block digits that make the wheel animation
//! clearly visible.
//!
//! ```rust
//! use bubbletea_countdown::glyph::{BLOCK, PLAIN};
//!
//! assert_eq!(PLAIN.rows('7'), ["7"]);
//! assert_eq!(BLOCK.height(), 5);
//! assert_eq!(BLOCK.rows('1')[0], " █ ");
//! ```

use once_cell::sync::Lazy;

/// A set of fixed-height glyphs for the characters a countdown can show.
#[derive(Debug, Clone)]
pub struct GlyphSet {
    digits: Vec<Vec<String>>,
    separator: Vec<String>,
    height: usize,
}

impl GlyphSet {
    /// Builds a glyph set from ten digit glyphs (`0` through `9`) and the
    /// separator glyph. Every glyph must have the same number of rows.
    pub fn new(digits: Vec<Vec<String>>, separator: Vec<String>) -> Self {
        let height = separator.len();
        debug_assert_eq!(digits.len(), 10);
        debug_assert!(digits.iter().all(|rows| rows.len() == height));
        Self {
            digits,
            separator,
            height,
        }
    }

    /// Number of rows every glyph in the set occupies.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Rows for `c`. Unknown characters yield no rows.
    pub fn rows(&self, c: char) -> &[String] {
        match c {
            ':' => self.separator.as_slice(),
            _ => match c.to_digit(10) {
                Some(d) => self.digits[d as usize].as_slice(),
                _ => &[],
            },
        }
    }
}

fn rows(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|l| l.to_string()).collect()
}

/// Single-row glyphs: each character is drawn as itself.
pub static PLAIN: Lazy<GlyphSet> = Lazy::new(|| {
    GlyphSet::new(
        ('0'..='9').map(|c| vec![c.to_string()]).collect(),
        vec![":".to_string()],
    )
});

/// Five-row block glyphs, three columns wide for digits and one for the separator.
pub static BLOCK: Lazy<GlyphSet> = Lazy::new(|| {
    GlyphSet::new(
        vec![
            rows(&["███", "█ █", "█ █", "█ █", "███"]),
            rows(&[" █ ", "██ ", " █ ", " █ ", "███"]),
            rows(&["███", "  █", "███", "█  ", "███"]),
            rows(&["███", "  █", "███", "  █", "███"]),
            rows(&["█ █", "█ █", "███", "  █", "  █"]),
            rows(&["███", "█  ", "███", "  █", "███"]),
            rows(&["███", "█  ", "███", "█ █", "███"]),
            rows(&["███", "  █", "  █", "  █", "  █"]),
            rows(&["███", "█ █", "███", "█ █", "███"]),
            rows(&["███", "█ █", "███", "  █", "███"]),
        ],
        rows(&[" ", "█", " ", "█", " "]),
    )
});
