//! Wheel digit component for Bubble Tea applications.
//!
//! A wheel cell shows a single decimal digit. When the digit changes, the new
//! glyph rolls in from the top edge while the old glyph rolls out through the
//! bottom, like the drum of a mechanical counter. The very first change of a
//! cell is applied instantly so a freshly created display never animates into
//! its initial value.
//!
//! # Basic Usage
//!
//! ```rust
//! use bubbletea_countdown::wheel::Model;
//!
//! let mut cell = Model::new();
//! assert_eq!(cell.text(), '0');
//!
//! // First change: instant, no animation command.
//! let cmd = cell.set_digit("3").unwrap();
//! assert!(cmd.is_none());
//!
//! // Later changes animate; drive them with the returned command.
//! let cmd = cell.set_digit("4").unwrap();
//! assert!(cmd.is_some());
//! assert!(cell.is_animating());
//!
//! // Anything but a single decimal digit is rejected.
//! assert!(cell.set_digit("42").is_err());
//! assert_eq!(cell.text(), '4');
//! ```
//!
//! # bubbletea-rs Integration
//!
//! ```rust
//! use bubbletea_rs::{Model as BubbleTeaModel, Msg, Cmd};
//! use bubbletea_countdown::wheel::Model as Wheel;
//!
//! struct MyApp {
//!     wheel: Wheel,
//! }
//!
//! impl BubbleTeaModel for MyApp {
//!     fn init() -> (Self, Option<Cmd>) {
//!         (Self { wheel: Wheel::new() }, None)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         // Forward animation frames
//!         self.wheel.update(msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         self.wheel.view()
//!     }
//! }
//! ```

use crate::error::{Error, Result};
use crate::style::{Alignment, Font, TextStyle};
use crate::TextCustomizable;
use bubbletea_rs::{tick as bubbletea_tick, Cmd, Model as BubbleTeaModel, Msg};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

// Internal ID management for wheel instances
static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Animation frames per second.
pub const FPS: u32 = 60;

/// How long one wheel transition takes.
pub const DURATION: Duration = Duration::from_millis(300);

/// Default slot width in columns, wide enough for a block digit.
pub const DEFAULT_WIDTH: usize = 3;

/// Time covered by a single animation frame.
pub fn frame_period() -> Duration {
    Duration::from_nanos(1_000_000_000 / FPS as u64)
}

/// Message that advances a wheel transition by one frame.
#[derive(Debug, Clone)]
pub struct FrameMsg {
    id: i64,
    tag: i64,
}

/// Phase of a wheel transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimPhase {
    /// In flight; `progress` runs from 0.0 (old glyph) to 1.0 (new glyph).
    Running {
        /// Fraction of the transition already shown.
        progress: f64,
    },
    /// Finished, or never started.
    Completed,
}

#[derive(Debug, Clone)]
struct Transition {
    incoming: char,
    elapsed: Duration,
}

impl Transition {
    fn new(incoming: char) -> Self {
        Self {
            incoming,
            elapsed: Duration::ZERO,
        }
    }

    fn advance(&mut self, delta: Duration) {
        self.elapsed = self.elapsed.saturating_add(delta);
    }

    fn phase(&self) -> AnimPhase {
        if self.elapsed >= DURATION {
            AnimPhase::Completed
        } else {
            let p = self.elapsed.as_secs_f64() / DURATION.as_secs_f64();
            AnimPhase::Running {
                progress: p.clamp(0.0, 1.0),
            }
        }
    }
}

/// A single animated decimal digit.
#[derive(Debug, Clone)]
pub struct Model {
    id: i64,
    tag: i64,

    // The digit last set; what `text()` reports.
    text: char,
    // The digit the resting glyph shows. Lags `text` while a transition runs.
    resting: char,
    changes: u64,

    style: TextStyle,
    width: usize,
    height: usize,

    // The transient incoming glyph. At most one exists at a time.
    transition: Option<Transition>,
}

impl Model {
    /// Creates a cell showing `0` with the default style.
    pub fn new() -> Self {
        let style = TextStyle::default();
        let height = style.font.height();
        Self {
            id: next_id(),
            tag: 0,
            text: '0',
            resting: '0',
            changes: 0,
            style,
            width: DEFAULT_WIDTH,
            height,
            transition: None,
        }
    }

    /// Sets the slot size the cell draws into.
    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.set_size(width, height);
        self
    }

    /// Sets the style used for both the resting and the incoming glyph.
    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    /// Unique identifier of this cell.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// The digit currently stored in the cell.
    pub fn text(&self) -> char {
        self.text
    }

    /// How many times the stored digit has changed since construction.
    pub fn change_count(&self) -> u64 {
        self.changes
    }

    /// Slot width in columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Slot height in rows; also the distance a glyph travels on a change.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Resizes the slot.
    pub fn set_size(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    /// The full style of the cell.
    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    /// Whether a wheel transition is in flight.
    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Phase of the current transition.
    pub fn phase(&self) -> AnimPhase {
        self.transition
            .as_ref()
            .map_or(AnimPhase::Completed, Transition::phase)
    }

    /// Sets the digit from a string that must be exactly one character `0-9`.
    ///
    /// Returns the command driving the animation when a transition started.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDigit`] for anything else; the cell keeps its
    /// current digit.
    pub fn set_digit(&mut self, digit: &str) -> Result<Option<Cmd>> {
        let mut chars = digit.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => self.set_char(c),
            _ => Err(Error::InvalidDigit(digit.to_string())),
        }
    }

    /// Sets the digit from a character.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDigit`] unless `c` is in `0-9`.
    pub fn set_char(&mut self, c: char) -> Result<Option<Cmd>> {
        if !c.is_ascii_digit() {
            return Err(Error::InvalidDigit(c.to_string()));
        }
        if self.apply(c) {
            Ok(Some(self.next_frame()))
        } else {
            Ok(None)
        }
    }

    /// Stores an already validated digit. Returns whether a transition started.
    pub(crate) fn apply(&mut self, c: char) -> bool {
        debug_assert!(c.is_ascii_digit());
        if c == self.text {
            return false;
        }

        self.text = c;
        let animated = self.changes != 0;
        self.changes += 1;

        // Replace any in-flight overlay: its digit becomes the resting glyph.
        if let Some(transition) = self.transition.take() {
            self.resting = transition.incoming;
        }

        if animated {
            log::trace!("wheel {}: {} -> {}", self.id, self.resting, c);
            self.transition = Some(Transition::new(c));
            self.tag += 1;
            true
        } else {
            self.resting = c;
            false
        }
    }

    /// Moves the current transition forward by `delta`.
    ///
    /// Returns whether the cell is still animating afterwards.
    pub fn advance(&mut self, delta: Duration) -> bool {
        let Some(transition) = self.transition.as_mut() else {
            return false;
        };
        transition.advance(delta);
        if let AnimPhase::Completed = transition.phase() {
            self.resting = transition.incoming;
            self.transition = None;
            return false;
        }
        true
    }

    fn next_frame(&self) -> Cmd {
        let id = self.id;
        let tag = self.tag;
        bubbletea_tick(frame_period(), move |_| Box::new(FrameMsg { id, tag }) as Msg)
    }

    /// Processes animation frames addressed to this cell.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(frame_msg) = msg.downcast_ref::<FrameMsg>() {
            if frame_msg.id != self.id || frame_msg.tag != self.tag {
                return None;
            }
            if self.advance(frame_period()) {
                return Some(self.next_frame());
            }
        }
        None
    }

    /// Unstyled rows of the cell, `height` rows of `width` columns each.
    pub fn rows(&self) -> Vec<String> {
        let resting = self.style.layout(self.resting, self.width, self.height);
        // `advance` drops a transition as soon as it completes.
        let Some((transition, AnimPhase::Running { progress })) =
            self.transition.as_ref().map(|t| (t, t.phase()))
        else {
            return resting;
        };

        // The incoming glyph sits one slot above the resting one; both move
        // down together by `shift` rows.
        let shift = ((progress * self.height as f64).round() as usize).min(self.height);
        let incoming = self
            .style
            .layout(transition.incoming, self.width, self.height);
        incoming
            .into_iter()
            .chain(resting)
            .skip(self.height - shift)
            .take(self.height)
            .collect()
    }

    /// Renders the cell.
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

impl BubbleTeaModel for Model {
    fn init() -> (Self, Option<Cmd>) {
        (Self::new(), None)
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
        Self::new()
    }
}
