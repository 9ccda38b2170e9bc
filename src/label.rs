//! Static label used for the `:` separators of a countdown display.
//!
//! ```rust
//! use bubbletea_countdown::label::Model;
//! use bubbletea_countdown::style::{Font, TextStyle};
//!
//! let colon = Model::new(":")
//!     .with_style(TextStyle::default().with_font(Font::Plain))
//!     .with_size(3, 1);
//! assert_eq!(colon.rows(), vec![" : "]);
//! ```

use crate::style::{Alignment, Font, TextStyle};
use crate::TextCustomizable;

/// A fixed piece of text drawn with the countdown styling.
#[derive(Debug, Clone)]
pub struct Model {
    text: String,
    style: TextStyle,
    width: usize,
    height: usize,
}

impl Model {
    /// Creates a label sized to its text in the default font.
    pub fn new(text: impl Into<String>) -> Self {
        let style = TextStyle::default();
        let height = style.font.height();
        Self {
            text: text.into(),
            style,
            width: 1,
            height,
        }
    }

    /// Sets the slot size the label draws into.
    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.set_size(width, height);
        self
    }

    /// Sets the label style.
    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    /// The label text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Slot width in columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Slot height in rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Resizes the slot.
    pub fn set_size(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    /// Unstyled rows of the label.
    ///
    /// Characters the font has a glyph for are drawn with it; the label is
    /// otherwise shown verbatim on the middle row.
    pub fn rows(&self) -> Vec<String> {
        let mut chars = self.text.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if !self.style.font.glyphs().rows(c).is_empty() {
                return self.style.layout(c, self.width, self.height);
            }
        }

        let middle = self.height / 2;
        (0..self.height)
            .map(|row| {
                let text = if row == middle { self.text.as_str() } else { "" };
                self.style.alignment.align(text, self.width)
            })
            .collect()
    }

    /// Renders the label.
    pub fn view(&self) -> String {
        self.style.render_rows(&self.rows())
    }
}

impl TextCustomizable for Model {
    fn color(&self) -> &str {
        &self.style.color
    }

    fn set_color(&mut self, color: &str) {
        self.style.color = color.to_string();
    }

    fn font(&self) -> Font {
        self.style.font
    }

    fn set_font(&mut self, font: Font) {
        self.style.font = font;
    }

    fn alignment(&self) -> Alignment {
        self.style.alignment
    }

    fn set_alignment(&mut self, alignment: Alignment) {
        self.style.alignment = alignment;
    }
}
