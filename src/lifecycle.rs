//! Foreground/background notifications for components that pause themselves.
//!
//! A terminal program can be suspended, hidden behind another pane, or lose
//! focus. Components that run periodic work subscribe to a
//! [`LifecycleSource`] and react when the host moves between the foreground
//! and the background.
//!
//! Two kinds of messages carry those transitions:
//!
//! - the runtime's own host events: `BlurMsg` and `SuspendMsg` mean
//!   background, `FocusMsg` and `ResumeMsg` mean foreground (focus events
//!   need `Program::builder().report_focus(true)`);
//! - [`LifecycleMsg`] commands announced by a [`Lifecycle`], for transitions
//!   the application detects on its own.
//!
//! Subscriptions are scoped: dropping a [`Subscription`] detaches the
//! observer from its source, so nothing stays registered after the owning
//! component is gone. An announcement only reaches the observers registered
//! when it was made.
//!
//! # Basic Usage
//!
//! ```rust
//! use bubbletea_countdown::lifecycle::{AppState, Lifecycle, LifecycleSource};
//!
//! let lifecycle = Lifecycle::new();
//! {
//!     let subscription = lifecycle.subscribe(42);
//!     assert_eq!(lifecycle.observer_count(), 1);
//!
//!     let blur: bubbletea_rs::Msg = Box::new(bubbletea_rs::BlurMsg);
//!     assert_eq!(subscription.state_for(&blur), Some(AppState::Background));
//! }
//! assert_eq!(lifecycle.observer_count(), 0);
//!
//! // In an application, return these commands from `update`.
//! let _cmd = lifecycle.enter_background();
//! let _cmd = lifecycle.enter_foreground();
//! ```

use bubbletea_rs::{tick as bubbletea_tick, BlurMsg, Cmd, FocusMsg, Msg, ResumeMsg, SuspendMsg};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Where the host application currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// The application became active and visible.
    Foreground,
    /// The application is about to lose focus.
    Background,
}

/// Translates the runtime's focus and suspend events into an [`AppState`].
///
/// ```rust
/// use bubbletea_countdown::lifecycle::{host_state, AppState};
/// use bubbletea_rs::{FocusMsg, Msg, SuspendMsg};
///
/// let msg: Msg = Box::new(SuspendMsg);
/// assert_eq!(host_state(&msg), Some(AppState::Background));
/// let msg: Msg = Box::new(FocusMsg);
/// assert_eq!(host_state(&msg), Some(AppState::Foreground));
/// ```
pub fn host_state(msg: &Msg) -> Option<AppState> {
    if msg.downcast_ref::<BlurMsg>().is_some() || msg.downcast_ref::<SuspendMsg>().is_some() {
        Some(AppState::Background)
    } else if msg.downcast_ref::<FocusMsg>().is_some() || msg.downcast_ref::<ResumeMsg>().is_some()
    {
        Some(AppState::Foreground)
    } else {
        None
    }
}

/// Message announcing a foreground/background transition.
#[derive(Debug, Clone)]
pub struct LifecycleMsg {
    /// Identifier of the source that emitted the message.
    pub source: i64,
    /// The state the application moved into.
    pub state: AppState,
    /// Observers registered with the source when the transition was announced.
    pub observers: Vec<i64>,
}

/// A source of foreground/background transitions.
pub trait LifecycleSource {
    /// Registers `observer` and returns the guard that keeps it registered.
    fn subscribe(&self, observer: i64) -> Subscription;
}

/// A live registration with a [`LifecycleSource`]. Detaches on drop.
pub struct Subscription {
    source: i64,
    observer: i64,
    host_events: bool,
    detach: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Creates a subscription that runs `detach` when dropped.
    ///
    /// It follows the runtime's host events unless told otherwise with
    /// [`with_host_events`](Self::with_host_events).
    pub fn new(source: i64, observer: i64, detach: impl FnOnce() + Send + 'static) -> Self {
        Self {
            source,
            observer,
            host_events: true,
            detach: Some(Box::new(detach)),
        }
    }

    /// Sets whether focus and suspend events from the runtime count as
    /// transitions.
    pub fn with_host_events(mut self, host_events: bool) -> Self {
        self.host_events = host_events;
        self
    }

    /// Identifier of the source this subscription belongs to.
    pub fn source(&self) -> i64 {
        self.source
    }

    /// Identifier of the subscribed observer.
    pub fn observer(&self) -> i64 {
        self.observer
    }

    /// Whether this subscription follows the runtime's host events.
    pub fn host_events(&self) -> bool {
        self.host_events
    }

    /// Whether `msg` was announced by this subscription's source to this
    /// observer.
    pub fn accepts(&self, msg: &LifecycleMsg) -> bool {
        msg.source == self.source && msg.observers.contains(&self.observer)
    }

    /// The transition `msg` stands for, if it is one this subscription
    /// should react to.
    pub fn state_for(&self, msg: &Msg) -> Option<AppState> {
        if let Some(lifecycle_msg) = msg.downcast_ref::<LifecycleMsg>() {
            return self.accepts(lifecycle_msg).then_some(lifecycle_msg.state);
        }
        if self.host_events {
            return host_state(msg);
        }
        None
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("source", &self.source)
            .field("observer", &self.observer)
            .field("host_events", &self.host_events)
            .finish()
    }
}

/// The bundled lifecycle source.
///
/// Clones share the same observer registry, so the application can keep one
/// handle to emit transitions while components subscribe through another.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    id: i64,
    host_events: bool,
    observers: Arc<Mutex<BTreeSet<i64>>>,
}

impl Lifecycle {
    /// Creates a source with no observers that also forwards host events.
    pub fn new() -> Self {
        Self {
            id: next_id(),
            host_events: true,
            observers: Arc::new(Mutex::new(BTreeSet::new())),
        }
    }

    /// Sets whether subscribers follow the runtime's focus and suspend
    /// events, or only transitions announced through this source.
    pub fn with_host_events(mut self, host_events: bool) -> Self {
        self.host_events = host_events;
        self
    }

    /// Unique identifier stamped into every message this source emits.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Number of currently subscribed observers.
    pub fn observer_count(&self) -> usize {
        self.observers.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Whether `observer` is currently subscribed.
    pub fn is_observing(&self, observer: i64) -> bool {
        self.observers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&observer)
    }

    /// Builds the announcement of a transition into `state` for the
    /// observers registered right now.
    pub fn msg(&self, state: AppState) -> LifecycleMsg {
        let observers = self
            .observers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .copied()
            .collect();
        LifecycleMsg {
            source: self.id,
            state,
            observers,
        }
    }

    /// Command announcing that the application moved to the background.
    pub fn enter_background(&self) -> Cmd {
        self.notify(AppState::Background)
    }

    /// Command announcing that the application returned to the foreground.
    pub fn enter_foreground(&self) -> Cmd {
        self.notify(AppState::Foreground)
    }

    fn notify(&self, state: AppState) -> Cmd {
        let msg = self.msg(state);
        log::debug!(
            "lifecycle {} -> {:?} ({} observers)",
            msg.source,
            state,
            msg.observers.len()
        );
        bubbletea_tick(Duration::from_nanos(1), move |_| Box::new(msg.clone()) as Msg)
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleSource for Lifecycle {
    fn subscribe(&self, observer: i64) -> Subscription {
        self.observers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(observer);

        let observers = Arc::clone(&self.observers);
        Subscription::new(self.id, observer, move || {
            observers
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .remove(&observer);
        })
        .with_host_events(self.host_events)
    }
}
