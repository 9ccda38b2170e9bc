//! Countdown label component for Bubble Tea applications.
//!
//! The countdown label shows a fixed `HH:MM:SS` layout made of six wheel
//! digits and two static separators. Setting new text fans each digit out to
//! its own [`wheel`](crate::wheel) cell; only the cells whose digit changed
//! roll over, and the label drives their animation frames as one.
//!
//! # Basic Usage
//!
//! ```rust
//! use bubbletea_countdown::countdown::{new, with_font, with_size};
//! use bubbletea_countdown::style::Font;
//!
//! let mut label = new(&[with_font(Font::Plain), with_size(16, 1)]);
//! assert_eq!(label.text(), "00:00:00");
//!
//! label.set_text("01:59:30").unwrap();
//! assert_eq!(label.text(), "01:59:30");
//!
//! // Text that is not HH:MM:SS is rejected and leaves the label unchanged.
//! assert!(label.set_text("1:59:30").is_err());
//! assert_eq!(label.text(), "01:59:30");
//! ```
//!
//! # Driving it from a timer
//!
//! ```rust
//! use bubbletea_rs::{Model as BubbleTeaModel, Msg, Cmd};
//! use bubbletea_countdown::countdown::Model as Countdown;
//!
//! struct MyApp {
//!     label: Countdown,
//! }
//!
//! impl BubbleTeaModel for MyApp {
//!     fn init() -> (Self, Option<Cmd>) {
//!         (Self { label: Countdown::default() }, None)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         // Forward animation frames; call `set_text` when the time changes.
//!         self.label.update(msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         self.label.view()
//!     }
//! }
//! ```

use crate::error::{Error, Result};
use crate::label;
use crate::style::{Alignment, Font, TextStyle};
use crate::wheel;
use crate::TextCustomizable;
use bubbletea_rs::{tick as bubbletea_tick, Cmd, Model as BubbleTeaModel, Msg};
use lipgloss_extras::lipgloss;
use std::sync::atomic::{AtomicI64, Ordering};

// Internal ID management for countdown instances
static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Text shown by a freshly created label.
pub const INITIAL_TEXT: &str = "00:00:00";
/// Default width in columns.
pub const DEFAULT_WIDTH: usize = 60;
/// Default width share of each digit slot.
pub const DIGIT_RATIO: usize = 32;
/// Default width share of each separator slot.
pub const SEPARATOR_RATIO: usize = 24;

// Byte offsets of the six digits in `HH:MM:SS`.
const DIGIT_OFFSETS: [usize; 6] = [0, 1, 3, 4, 6, 7];

/// Splits `HH:MM:SS` into its six digits.
///
/// # Errors
///
/// Returns [`Error::InvalidTime`] unless `text` matches
/// `^([0-9])([0-9]):([0-9])([0-9]):([0-9])([0-9])$`.
///
/// ```rust
/// use bubbletea_countdown::countdown::parse_time;
///
/// assert_eq!(parse_time("12:34:56").unwrap(), ['1', '2', '3', '4', '5', '6']);
/// assert!(parse_time("12:34").is_err());
/// ```
pub fn parse_time(text: &str) -> Result<[char; 6]> {
    let invalid = || Error::InvalidTime(text.to_string());
    let bytes = text.as_bytes();
    if bytes.len() != 8 || bytes[2] != b':' || bytes[5] != b':' {
        return Err(invalid());
    }

    let mut digits = ['0'; 6];
    for (digit, &offset) in digits.iter_mut().zip(DIGIT_OFFSETS.iter()) {
        let b = bytes[offset];
        if !b.is_ascii_digit() {
            return Err(invalid());
        }
        *digit = char::from(b);
    }
    Ok(digits)
}

/// Configuration options applied by [`new`].
pub enum CountdownOption {
    /// Width in columns and height in rows.
    WithSize(usize, usize),
    /// Foreground color.
    WithColor(String),
    /// Font.
    WithFont(Font),
    /// Alignment of every glyph inside its slot.
    WithAlignment(Alignment),
    /// Width shares of a digit slot and a separator slot.
    WithRatio(usize, usize),
}

impl CountdownOption {
    fn apply(&self, m: &mut Model) {
        match self {
            CountdownOption::WithSize(width, height) => m.set_size(*width, *height),
            CountdownOption::WithColor(color) => m.set_color(color),
            CountdownOption::WithFont(font) => m.set_font(*font),
            CountdownOption::WithAlignment(alignment) => m.set_alignment(*alignment),
            CountdownOption::WithRatio(digit, separator) => m.set_ratio(*digit, *separator),
        }
    }
}

/// Sets the size of the label.
pub fn with_size(width: usize, height: usize) -> CountdownOption {
    CountdownOption::WithSize(width, height)
}

/// Sets the foreground color of the label.
pub fn with_color(color: impl Into<String>) -> CountdownOption {
    CountdownOption::WithColor(color.into())
}

/// Sets the font of the label.
pub fn with_font(font: Font) -> CountdownOption {
    CountdownOption::WithFont(font)
}

/// Sets the glyph alignment of the label.
pub fn with_alignment(alignment: Alignment) -> CountdownOption {
    CountdownOption::WithAlignment(alignment)
}

/// Sets the digit:separator width ratio of the label.
pub fn with_ratio(digit: usize, separator: usize) -> CountdownOption {
    CountdownOption::WithRatio(digit, separator)
}

/// Message that advances the wheel animations of a countdown label.
#[derive(Debug, Clone)]
pub struct FrameMsg {
    id: i64,
    tag: i64,
}

/// An `HH:MM:SS` label with wheel-animated digits.
#[derive(Debug, Clone)]
pub struct Model {
    id: i64,
    tag: i64,

    text: String,
    style: TextStyle,

    width: usize,
    height: usize,
    sized: bool,
    ratio: (usize, usize),

    // H H M M S S
    cells: [wheel::Model; 6],
    separators: [label::Model; 2],
}

/// Creates a countdown label showing `00:00:00`.
///
/// Without a [`with_size`] option the height follows the chosen font.
pub fn new(opts: &[CountdownOption]) -> Model {
    let style = TextStyle::default();
    let mut m = Model {
        id: next_id(),
        tag: 0,
        text: INITIAL_TEXT.to_string(),
        height: style.font.height(),
        style: style.clone(),
        width: DEFAULT_WIDTH,
        sized: false,
        ratio: (DIGIT_RATIO, SEPARATOR_RATIO),
        cells: std::array::from_fn(|_| wheel::Model::new().with_style(style.clone())),
        separators: std::array::from_fn(|_| label::Model::new(":").with_style(style.clone())),
    };

    for opt in opts {
        opt.apply(&mut m);
    }

    if !m.sized {
        m.height = m.style.font.height();
    }
    m.layout();
    m
}

impl Model {
    /// Unique identifier of this label.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// The text currently displayed.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Sets the displayed time.
    ///
    /// Digits that did not change keep their glyph; changed digits roll over.
    /// Returns the command driving the animation when any cell started one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTime`] unless `text` is `HH:MM:SS`; the label
    /// keeps its current text.
    pub fn set_text(&mut self, text: &str) -> Result<Option<Cmd>> {
        let digits = parse_time(text)?;

        let mut animating = false;
        for (cell, digit) in self.cells.iter_mut().zip(digits) {
            animating |= cell.apply(digit);
        }
        self.text = text.to_string();

        if animating {
            self.tag += 1;
            return Ok(Some(self.next_frame()));
        }
        Ok(None)
    }

    /// The six digit cells, hours first.
    pub fn cells(&self) -> &[wheel::Model] {
        &self.cells
    }

    /// The two separator labels.
    pub fn separators(&self) -> &[label::Model] {
        &self.separators
    }

    /// The time as shown by the children, read back left to right.
    pub fn displayed(&self) -> String {
        let [h1, h2, m1, m2, s1, s2] = &self.cells;
        let [c1, c2] = &self.separators;
        format!(
            "{}{}{}{}{}{}{}{}",
            h1.text(),
            h2.text(),
            c1.text(),
            m1.text(),
            m2.text(),
            c2.text(),
            s1.text(),
            s2.text()
        )
    }

    /// Whether any digit is rolling over.
    pub fn is_animating(&self) -> bool {
        self.cells.iter().any(wheel::Model::is_animating)
    }

    /// Width in columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Resizes the label and lays out its children again.
    pub fn set_size(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.sized = true;
        self.layout();
    }

    /// Width shares of a digit slot and a separator slot.
    pub fn ratio(&self) -> (usize, usize) {
        self.ratio
    }

    /// Changes the digit:separator width ratio and lays out again.
    pub fn set_ratio(&mut self, digit: usize, separator: usize) {
        self.ratio = (digit, separator);
        self.layout();
    }

    /// Widths of a digit slot and a separator slot for the current size.
    pub fn slot_widths(&self) -> (usize, usize) {
        let (digit, separator) = self.ratio;
        let total = digit * 6 + separator * 2;
        if total == 0 {
            return (0, 0);
        }
        (self.width * digit / total, self.width * separator / total)
    }

    /// The shared style.
    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    /// Applies color, font and alignment to the label and every child.
    pub fn set_style(&mut self, style: TextStyle) {
        self.set_color(&style.color);
        self.set_font(style.font);
        self.set_alignment(style.alignment);
    }

    fn layout(&mut self) {
        let (digit_width, separator_width) = self.slot_widths();
        let height = self.height;
        for cell in self.cells.iter_mut() {
            cell.set_size(digit_width, height);
        }
        for separator in self.separators.iter_mut() {
            separator.set_size(separator_width, height);
        }
    }

    fn children_mut(&mut self) -> Vec<&mut dyn TextCustomizable> {
        let [h1, h2, m1, m2, s1, s2] = &mut self.cells;
        let [c1, c2] = &mut self.separators;
        vec![
            h1 as &mut dyn TextCustomizable,
            h2 as &mut dyn TextCustomizable,
            c1 as &mut dyn TextCustomizable,
            m1 as &mut dyn TextCustomizable,
            m2 as &mut dyn TextCustomizable,
            c2 as &mut dyn TextCustomizable,
            s1 as &mut dyn TextCustomizable,
            s2 as &mut dyn TextCustomizable,
        ]
    }

    fn next_frame(&self) -> Cmd {
        let id = self.id;
        let tag = self.tag;
        bubbletea_tick(wheel::frame_period(), move |_| {
            Box::new(FrameMsg { id, tag }) as Msg
        })
    }

    /// Processes animation frames addressed to this label.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(frame_msg) = msg.downcast_ref::<FrameMsg>() {
            if frame_msg.id != self.id || frame_msg.tag != self.tag {
                return None;
            }

            let period = wheel::frame_period();
            let mut animating = false;
            for cell in self.cells.iter_mut() {
                animating |= cell.advance(period);
            }
            if animating {
                return Some(self.next_frame());
            }
            log::trace!("countdown {}: animation settled on {}", self.id, self.text);
        }
        None
    }

    /// Unstyled rows of the whole label.
    pub fn rows(&self) -> Vec<String> {
        let [h1, h2, m1, m2, s1, s2] = &self.cells;
        let [c1, c2] = &self.separators;
        let columns = [
            h1.rows(),
            h2.rows(),
            c1.rows(),
            m1.rows(),
            m2.rows(),
            c2.rows(),
            s1.rows(),
            s2.rows(),
        ];

        (0..self.height)
            .map(|row| {
                columns
                    .iter()
                    .filter_map(|column| column.get(row))
                    .map(String::as_str)
                    .collect()
            })
            .collect()
    }

    /// Renders the label.
    pub fn view(&self) -> String {
        let [h1, h2, m1, m2, s1, s2] = &self.cells;
        let [c1, c2] = &self.separators;
        let views = [
            h1.view(),
            h2.view(),
            c1.view(),
            m1.view(),
            m2.view(),
            c2.view(),
            s1.view(),
            s2.view(),
        ];
        let parts: Vec<&str> = views.iter().map(String::as_str).collect();
        lipgloss::join_horizontal(lipgloss::TOP, &parts)
    }
}

impl TextCustomizable for Model {
    fn color(&self) -> &str {
        &self.style.color
    }

    fn set_color(&mut self, color: &str) {
        self.style.color = color.to_string();
        for child in self.children_mut() {
            child.set_color(color);
        }
    }

    fn font(&self) -> Font {
        self.style.font
    }

    fn set_font(&mut self, font: Font) {
        self.style.font = font;
        for child in self.children_mut() {
            child.set_font(font);
        }
    }

    fn alignment(&self) -> Alignment {
        self.style.alignment
    }

    fn set_alignment(&mut self, alignment: Alignment) {
        self.style.alignment = alignment;
        for child in self.children_mut() {
            child.set_alignment(alignment);
        }
    }
}

impl BubbleTeaModel for Model {
    fn init() -> (Self, Option<Cmd>) {
        (new(&[]), None)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        self.update(msg)
    }

    fn view(&self) -> String {
        self.view()
    }
}

impl Default for Model {
    fn default() -> Self {
        new(&[])
    }
}
