#![warn(missing_docs)]
#![doc(html_root_url = "https://docs.rs/bubbletea-countdown/")]

//! # bubbletea-countdown
//!
//! An animated `HH:MM:SS` countdown label and a goal-date countdown timer for
//! terminal applications built with [bubbletea-rs](https://github.com/joshka/bubbletea-rs).
//!
//! ## Overview
//!
//! The crate has two halves that are usually wired together:
//!
//! - A **countdown label** made of six wheel digits and two separators. Each
//!   digit rolls over like the drum of a mechanical counter when it changes.
//! - A **countdown timer** that ticks toward a goal date, hands formatted
//!   `HH:MM:SS` strings to an update callback, calls a finish callback when
//!   the goal is reached, and pauses itself while the application is in the
//!   background.
//!
//! Every component follows the Elm Architecture used by bubbletea-rs, with
//! `update()` and `view()` methods and commands for anything time driven.
//!
//! ## Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | `Countdown` | `HH:MM:SS` label with wheel-animated digits |
//! | `Wheel` | A single animated digit |
//! | `Separator` | The static `:` between fields |
//! | `Timer` | Goal-date countdown driving periodic updates |
//! | `Lifecycle` | Foreground/background notifications |
//!
//! ## Wiring a timer to a label
//!
//! ```rust
//! use bubbletea_countdown::prelude::*;
//! use std::sync::{Arc, Mutex};
//! use std::time::{Duration, SystemTime};
//!
//! let latest = Arc::new(Mutex::new(None::<String>));
//! let sink = Arc::clone(&latest);
//!
//! let mut timer = Timer::new(SystemTime::now() + Duration::from_secs(90))
//!     .on_update(move |text| *sink.lock().unwrap() = Some(text.to_string()));
//! let mut label = countdown_new(&[]);
//!
//! let _tick = timer.activate();
//! if let Some(text) = latest.lock().unwrap().take() {
//!     let _frames = label.set_text(&text).unwrap();
//! }
//! assert!(label.text().starts_with("00:01:"));
//! ```
//!
//! ## Styling
//!
//! Every element implements [`TextCustomizable`], so color, font and
//! alignment can be set on the label as a whole or on a single element:
//!
//! ```rust
//! use bubbletea_countdown::prelude::*;
//!
//! let mut label = countdown_new(&[]);
//! label.set_color("#FF5F87");
//! label.set_font(Font::Bold);
//! label.set_alignment(Alignment::Left);
//! assert!(label.cells().iter().all(|cell| cell.font() == Font::Bold));
//! ```

pub mod clock;
pub mod countdown;
pub mod error;
pub mod glyph;
pub mod label;
pub mod lifecycle;
pub mod style;
pub mod timer;
pub mod wheel;

use style::{Alignment, Font};

/// Styling capability shared by every element of a countdown.
///
/// The countdown label holds its digits and separators as a uniform sequence
/// of this interface and forwards style changes to all of them, so any
/// element that can be colored, given a font and aligned can take part in a
/// countdown layout.
///
/// # Examples
///
/// ```rust
/// use bubbletea_countdown::prelude::*;
///
/// fn highlight(element: &mut dyn TextCustomizable) {
///     element.set_color("212");
///     element.set_font(Font::Bold);
/// }
///
/// let mut wheel = Wheel::new();
/// highlight(&mut wheel);
/// assert_eq!(wheel.color(), "212");
///
/// let mut label = countdown_new(&[]);
/// highlight(&mut label);
/// assert!(label.separators().iter().all(|s| s.color() == "212"));
/// ```
pub trait TextCustomizable {
    /// Foreground color.
    fn color(&self) -> &str;

    /// Sets the foreground color, in any form `lipgloss::Color` accepts.
    fn set_color(&mut self, color: &str);

    /// Font used to draw glyphs.
    fn font(&self) -> Font;

    /// Sets the font.
    fn set_font(&mut self, font: Font);

    /// Horizontal alignment of glyphs inside their slot.
    fn alignment(&self) -> Alignment;

    /// Sets the alignment.
    fn set_alignment(&mut self, alignment: Alignment);
}

pub use clock::{Clock, ManualClock, SystemClock};
pub use countdown::{
    new as countdown_new, parse_time, with_alignment, with_color, with_font, with_ratio,
    with_size, CountdownOption, FrameMsg as CountdownFrameMsg, Model as Countdown,
};
pub use error::{Error, Result};
pub use label::Model as Separator;
pub use lifecycle::{
    host_state, AppState, Lifecycle, LifecycleMsg, LifecycleSource, Subscription,
};
pub use style::TextStyle;
pub use timer::{format_time, Model as Timer, TickMsg as TimerTickMsg};
pub use wheel::{FrameMsg as WheelFrameMsg, Model as Wheel};

/// Prelude module for convenient imports.
///
/// ```rust
/// use bubbletea_countdown::prelude::*;
///
/// let label: Countdown = countdown_new(&[with_font(Font::Plain)]);
/// assert_eq!(label.height(), 1);
///
/// // Frame messages can be told apart when routing.
/// let msg: bubbletea_rs::Msg = Box::new(42_u8);
/// assert!(msg.downcast_ref::<CountdownFrameMsg>().is_none());
/// ```
pub mod prelude {
    pub use crate::clock::{Clock, ManualClock, SystemClock};
    pub use crate::countdown::{
        new as countdown_new, with_alignment, with_color, with_font, with_ratio, with_size,
        CountdownOption, FrameMsg as CountdownFrameMsg, Model as Countdown,
    };
    pub use crate::error::Error as CountdownError;
    pub use crate::label::Model as Separator;
    pub use crate::lifecycle::{host_state, AppState, Lifecycle, LifecycleMsg, LifecycleSource};
    pub use crate::style::{Alignment, Font, TextStyle};
    pub use crate::timer::{format_time, Model as Timer, TickMsg as TimerTickMsg};
    pub use crate::wheel::Model as Wheel;
    pub use crate::TextCustomizable;
}
