//! Text styling shared by digit cells, separators and the countdown display.
//!
//! A [`TextStyle`] bundles the three properties every countdown element
//! exposes through [`TextCustomizable`](crate::TextCustomizable): a color, a
//! [`Font`] and an [`Alignment`]. It also knows how to lay a glyph out inside
//! a slot of a given width and height and how to paint a row with lipgloss.
//!
//! ```rust
//! use bubbletea_countdown::style::{Alignment, Font, TextStyle};
//!
//! let style = TextStyle::default()
//!     .with_font(Font::Plain)
//!     .with_alignment(Alignment::Right);
//! assert_eq!(style.layout('7', 3, 1), vec!["  7".to_string()]);
//! ```

use crate::glyph::{GlyphSet, BLOCK, PLAIN};
use lipgloss_extras::prelude::*;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Default foreground color (light gray on the 256 color palette).
pub const DEFAULT_COLOR: &str = "252";

/// Horizontal placement of a glyph inside its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    /// Flush against the left edge.
    Left,
    /// Centered; odd leftover columns go to the right.
    #[default]
    Center,
    /// Flush against the right edge.
    Right,
}

impl Alignment {
    /// Pads `text` with spaces to exactly `width` columns. Text wider than
    /// the slot is cut on the right.
    pub fn align(self, text: &str, width: usize) -> String {
        let text = clip(text, width);
        let gap = width - text.width();
        let (left, right) = match self {
            Alignment::Left => (0, gap),
            Alignment::Center => (gap / 2, gap - gap / 2),
            Alignment::Right => (gap, 0),
        };
        format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
    }
}

// Longest prefix of `text` that fits in `width` columns.
fn clip(text: &str, width: usize) -> &str {
    let mut used = 0;
    for (i, c) in text.char_indices() {
        used += c.width().unwrap_or(0);
        if used > width {
            return &text[..i];
        }
    }
    text
}

/// The typeface a countdown element draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Font {
    /// Single-row characters.
    Plain,
    /// Single-row characters rendered bold.
    Bold,
    /// Five-row block digits.
    #[default]
    Block,
}

impl Font {
    /// The glyph set backing this font.
    pub fn glyphs(self) -> &'static GlyphSet {
        match self {
            Font::Plain | Font::Bold => &PLAIN,
            Font::Block => &BLOCK,
        }
    }

    /// Natural height of the font in rows.
    pub fn height(self) -> usize {
        self.glyphs().height()
    }
}

/// Color, font and alignment applied to a countdown element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextStyle {
    /// Foreground color, in any form `lipgloss::Color` accepts.
    pub color: String,
    /// Typeface.
    pub font: Font,
    /// Placement inside the slot.
    pub alignment: Alignment,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR.to_string(),
            font: Font::default(),
            alignment: Alignment::default(),
        }
    }
}

impl TextStyle {
    /// Returns the style with a different color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Returns the style with a different font.
    pub fn with_font(mut self, font: Font) -> Self {
        self.font = font;
        self
    }

    /// Returns the style with a different alignment.
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Lays the glyph for `c` out in a `width` x `height` box.
    ///
    /// The glyph is aligned horizontally and centered vertically. Glyph rows
    /// that do not fit the height are cut from the bottom.
    pub fn layout(&self, c: char, width: usize, height: usize) -> Vec<String> {
        let glyph = self.font.glyphs().rows(c);
        let top = height.saturating_sub(glyph.len()) / 2;
        let blank = " ".repeat(width);

        (0..height)
            .map(|row| match row.checked_sub(top).and_then(|i| glyph.get(i)) {
                Some(line) => self.alignment.align(line, width),
                None => blank.clone(),
            })
            .collect()
    }

    /// Paints a single row with this style's color and weight.
    pub fn render(&self, row: &str) -> String {
        let style = Style::new().foreground(Color::from(self.color.as_str()));
        let style = if self.font == Font::Bold {
            style.bold(true)
        } else {
            style
        };
        style.render(row)
    }

    /// Paints every row and joins them with newlines.
    pub fn render_rows(&self, rows: &[String]) -> String {
        rows.iter()
            .map(|row| self.render(row))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment_padding() {
        assert_eq!(Alignment::Left.align("7", 4), "7   ");
        assert_eq!(Alignment::Center.align("7", 4), " 7  ");
        assert_eq!(Alignment::Right.align("7", 4), "   7");
        // Wider than the slot is cut to fit
        assert_eq!(Alignment::Center.align("███", 2), "██");
        assert_eq!(Alignment::Right.align("█ █", 0), "");
        // Double-width characters never overflow the slot
        assert_eq!(Alignment::Left.align("日本", 3), "日 ");
    }

    #[test]
    fn test_default_style() {
        let style = TextStyle::default();
        assert_eq!(style.color, DEFAULT_COLOR);
        assert_eq!(style.font, Font::Block);
        assert_eq!(style.alignment, Alignment::Center);
    }

    #[test]
    fn test_layout_centers_vertically() {
        let style = TextStyle::default().with_font(Font::Plain);
        assert_eq!(style.layout('4', 3, 3), vec!["   ", " 4 ", "   "]);
    }

    #[test]
    fn test_layout_block_font() {
        let style = TextStyle::default();
        let rows = style.layout('1', 5, 5);
        assert_eq!(rows, vec!["  █  ", " ██  ", "  █  ", "  █  ", " ███ "]);
    }

    #[test]
    fn test_layout_cuts_short_heights() {
        let style = TextStyle::default();
        let rows = style.layout('7', 3, 2);
        assert_eq!(rows, vec!["███", "  █"]);
    }

    #[test]
    fn test_layout_clips_narrow_slots() {
        let style = TextStyle::default();
        let rows = style.layout('8', 2, 5);
        assert_eq!(rows, vec!["██", "█ ", "██", "█ ", "██"]);

        let style = style.with_alignment(Alignment::Right);
        assert!(style.layout('0', 1, 5).iter().all(|r| r.width() == 1));
    }

    #[test]
    fn test_render_keeps_text() {
        let style = TextStyle::default().with_color("#FF5F87");
        let rendered = style.render(" 5 ");
        assert!(rendered.contains('5'));
    }
}
