//! Goal-date countdown timer for Bubble Tea applications.
//!
//! The timer counts down to an absolute point in time. While active it ticks
//! at a rate derived from a refresh rate (60 Hz by default) throttled to the
//! configured ticks per second, recomputes the remaining time from the clock
//! on every tick, and hands the formatted `HH:MM:SS` string to an update
//! callback. When the goal is reached it stops itself and calls the finish
//! callback.
//!
//! A timer subscribed to a [`LifecycleSource`] pauses when the application
//! moves to the background and resumes on its own when it comes back, but
//! only if it was running when it was paused.
//!
//! # Basic Usage
//!
//! ```rust
//! use bubbletea_countdown::timer::Model;
//! use std::time::{Duration, SystemTime};
//!
//! let goal = SystemTime::now() + Duration::from_secs(5 * 3600);
//! let mut timer = Model::new(goal)
//!     .with_ticks_per_second(5)
//!     .on_update(|text| println!("{}", text))
//!     .on_finish(|| println!("done"));
//!
//! // Emits the current time at once and returns the first tick command.
//! let cmd = timer.activate();
//! assert!(cmd.is_some());
//! assert!(timer.is_active());
//! assert!(timer.text().starts_with("04:59:") || timer.text() == "05:00:00");
//!
//! timer.inactivate();
//! assert!(!timer.is_active());
//! ```
//!
//! # bubbletea-rs Integration
//!
//! ```rust
//! use bubbletea_rs::{Model as BubbleTeaModel, Msg, Cmd};
//! use bubbletea_countdown::timer::Model as Timer;
//! use std::time::{Duration, SystemTime};
//!
//! struct MyApp {
//!     timer: Timer,
//! }
//!
//! impl BubbleTeaModel for MyApp {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let mut timer = Timer::new(SystemTime::now() + Duration::from_secs(10));
//!         let cmd = timer.activate();
//!         (Self { timer }, cmd)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         // Forward ticks and lifecycle messages
//!         self.timer.update(msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         format!("Time remaining: {}", self.timer.text())
//!     }
//! }
//! ```

use crate::clock::{Clock, SystemClock};
use crate::lifecycle::{AppState, LifecycleSource, Subscription};
use bubbletea_rs::{tick as bubbletea_tick, Cmd, Model as BubbleTeaModel, Msg};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Duration, SystemTime};

// Internal ID management for timer instances
static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Largest hour value the `HH` field can show.
pub const MAX_HOUR: u64 = 99;
/// Default number of ticks per second.
pub const DEFAULT_TICKS_PER_SECOND: u32 = 4;
/// Default refresh rate the tick interval is derived from.
pub const DEFAULT_REFRESH_RATE: u32 = 60;

const HOUR: u64 = 3600;
const MINUTE: u64 = 60;

/// Formats a remaining duration as `HH:MM:SS`.
///
/// Sub-second remainders are dropped and the hour field is clamped to
/// [`MAX_HOUR`]; minutes and seconds always show the true remainder.
///
/// ```rust
/// use bubbletea_countdown::timer::format_time;
/// use std::time::Duration;
///
/// assert_eq!(format_time(Duration::from_secs(5 * 3600)), "05:00:00");
/// assert_eq!(format_time(Duration::from_millis(61_900)), "00:01:01");
/// assert_eq!(format_time(Duration::from_secs(120 * 3600 + 61)), "99:01:01");
/// ```
pub fn format_time(remaining: Duration) -> String {
    let total = remaining.as_secs();
    let hours = total / HOUR;
    let minutes = (total - hours * HOUR) / MINUTE;
    let seconds = total - hours * HOUR - minutes * MINUTE;
    format!("{:02}:{:02}:{:02}", hours.min(MAX_HOUR), minutes, seconds)
}

/// Derives the tick interval from a refresh rate and a tick rate.
///
/// The timer fires every `refresh_rate / ticks_per_second` frames, so higher
/// tick rates mean more frequent updates, up to one tick per frame.
///
/// ```rust
/// use bubbletea_countdown::timer::tick_interval;
/// use std::time::Duration;
///
/// assert_eq!(tick_interval(60, 4), Duration::from_millis(250));
/// assert_eq!(tick_interval(60, 1000), Duration::from_nanos(16_666_666));
/// ```
pub fn tick_interval(refresh_rate: u32, ticks_per_second: u32) -> Duration {
    let refresh_rate = refresh_rate.max(1);
    let ticks_per_second = ticks_per_second.clamp(1, refresh_rate);
    let frames_per_tick = (refresh_rate / ticks_per_second).max(1);
    Duration::from_nanos(1_000_000_000 * frames_per_tick as u64 / refresh_rate as u64)
}

/// Callback receiving each formatted `HH:MM:SS` string.
pub type UpdateFn = Box<dyn FnMut(&str) + Send>;
/// Callback invoked when the goal is reached.
pub type FinishFn = Box<dyn FnMut() + Send>;

/// Message delivering one periodic tick to a timer.
#[derive(Debug, Clone)]
pub struct TickMsg {
    /// The unique identifier of the timer this tick belongs to.
    pub id: i64,
    tag: i64,
}

/// A countdown toward a goal date.
pub struct Model {
    /// The absolute point in time the timer counts down to.
    pub goal: SystemTime,

    /// How many times per second the timer recomputes while active.
    pub ticks_per_second: u32,

    /// Refresh rate the tick interval is derived from.
    pub refresh_rate: u32,

    id: i64,
    tag: i64,
    active: bool,
    auto_activation: bool,
    text: String,

    clock: Box<dyn Clock>,
    update: Option<UpdateFn>,
    finish: Option<FinishFn>,
    subscription: Option<Subscription>,
}

impl Model {
    /// Creates an inactive timer counting down to `goal`.
    pub fn new(goal: SystemTime) -> Self {
        Self {
            goal,
            ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            refresh_rate: DEFAULT_REFRESH_RATE,
            id: next_id(),
            tag: 0,
            active: false,
            auto_activation: false,
            text: crate::countdown::INITIAL_TEXT.to_string(),
            clock: Box::new(SystemClock),
            update: None,
            finish: None,
            subscription: None,
        }
    }

    /// Sets how many ticks per second the timer emits.
    pub fn with_ticks_per_second(mut self, ticks_per_second: u32) -> Self {
        self.ticks_per_second = ticks_per_second;
        self
    }

    /// Changes the tick rate. Takes effect from the next scheduled tick.
    pub fn set_ticks_per_second(&mut self, ticks_per_second: u32) {
        self.ticks_per_second = ticks_per_second;
    }

    /// Sets the refresh rate ticks are derived from.
    pub fn with_refresh_rate(mut self, refresh_rate: u32) -> Self {
        self.refresh_rate = refresh_rate;
        self
    }

    /// Replaces the clock used to compute the remaining time.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Subscribes to foreground/background transitions of `source`.
    ///
    /// Any previous subscription is detached first.
    pub fn with_lifecycle(mut self, source: &impl LifecycleSource) -> Self {
        self.subscription = None;
        self.subscription = Some(source.subscribe(self.id));
        self
    }

    /// Sets the callback receiving every formatted time.
    pub fn on_update(mut self, update: impl FnMut(&str) + Send + 'static) -> Self {
        self.set_update(update);
        self
    }

    /// Sets the callback invoked when the goal is reached.
    pub fn on_finish(mut self, finish: impl FnMut() + Send + 'static) -> Self {
        self.set_finish(finish);
        self
    }

    /// Replaces the update callback.
    pub fn set_update(&mut self, update: impl FnMut(&str) + Send + 'static) {
        self.update = Some(Box::new(update));
    }

    /// Replaces the finish callback.
    pub fn set_finish(&mut self, finish: impl FnMut() + Send + 'static) {
        self.finish = Some(Box::new(finish));
    }

    /// Unique identifier of this timer.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Moves the goal. Takes effect on the next tick.
    pub fn set_goal(&mut self, goal: SystemTime) {
        self.goal = goal;
    }

    /// Whether a periodic tick is registered.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the timer will resume on the next foreground transition.
    pub fn auto_activation(&self) -> bool {
        self.auto_activation
    }

    /// Whether the timer is subscribed to a lifecycle source.
    pub fn is_observing(&self) -> bool {
        self.subscription.is_some()
    }

    /// Time between two ticks.
    pub fn interval(&self) -> Duration {
        tick_interval(self.refresh_rate, self.ticks_per_second)
    }

    /// Time left until the goal, zero once it has passed.
    pub fn remaining(&self) -> Duration {
        self.goal
            .duration_since(self.clock.now())
            .unwrap_or(Duration::ZERO)
    }

    /// The last string emitted to the update callback.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Starts ticking.
    ///
    /// Emits the current time immediately. If the goal has already passed,
    /// that emission runs the completion handling and no tick is registered.
    /// Calling this while active does nothing and returns `None`.
    pub fn activate(&mut self) -> Option<Cmd> {
        if self.active {
            return None;
        }

        self.active = true;
        if !self.handle_tick() {
            return None;
        }

        self.tag += 1;
        log::debug!(
            "timer {} activated, ticking every {:?}",
            self.id,
            self.interval()
        );
        Some(self.tick())
    }

    /// Stops ticking. Any tick already scheduled is ignored when it arrives.
    pub fn inactivate(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        self.tag += 1;
        log::debug!("timer {} inactivated", self.id);
    }

    /// Records whether the timer was running, then stops it.
    ///
    /// A second background transition before the next foreground one keeps
    /// the pending resume.
    pub fn enter_background(&mut self) {
        if self.auto_activation && !self.active {
            return;
        }
        self.auto_activation = self.active;
        log::debug!(
            "timer {} entering background (resume: {})",
            self.id,
            self.auto_activation
        );
        self.inactivate();
    }

    /// Resumes the timer if it was running when it went to the background.
    pub fn enter_foreground(&mut self) -> Option<Cmd> {
        let resume = std::mem::take(&mut self.auto_activation);
        log::debug!(
            "timer {} entering foreground (resume: {})",
            self.id,
            resume
        );
        if resume {
            return self.activate();
        }
        None
    }

    // Recomputes the remaining time and emits it. Returns whether the timer
    // is still active afterwards.
    fn handle_tick(&mut self) -> bool {
        let now = self.clock.now();
        let remaining = match self.goal.duration_since(now) {
            Ok(remaining) if !remaining.is_zero() => remaining,
            _ => {
                self.active = false;
                log::debug!("timer {} reached its goal", self.id);
                if let Some(finish) = self.finish.as_mut() {
                    finish();
                }
                Duration::ZERO
            }
        };

        self.text = format_time(remaining);
        log::trace!("timer {} tick: {}", self.id, self.text);
        if let Some(update) = self.update.as_mut() {
            update(&self.text);
        }
        self.active
    }

    fn tick(&self) -> Cmd {
        let id = self.id;
        let tag = self.tag;
        bubbletea_tick(self.interval(), move |_| {
            Box::new(TickMsg { id, tag }) as Msg
        })
    }

    /// Processes ticks addressed to this timer and lifecycle transitions from
    /// the subscribed source, including the runtime's focus and suspend
    /// events.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(tick_msg) = msg.downcast_ref::<TickMsg>() {
            if !self.active || tick_msg.id != self.id || tick_msg.tag != self.tag {
                return None;
            }
            if self.handle_tick() {
                return Some(self.tick());
            }
            // Reached the goal; make sure nothing scheduled earlier survives.
            self.tag += 1;
            return None;
        }

        match self.subscription.as_ref().and_then(|s| s.state_for(&msg)) {
            Some(AppState::Background) => {
                self.enter_background();
                None
            }
            Some(AppState::Foreground) => self.enter_foreground(),
            None => None,
        }
    }

    /// Renders the last emitted time.
    pub fn view(&self) -> String {
        self.text.clone()
    }
}

impl Drop for Model {
    fn drop(&mut self) {
        self.inactivate();
        self.update = None;
        self.finish = None;
        self.subscription = None;
        log::trace!("timer {} torn down", self.id);
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("goal", &self.goal)
            .field("ticks_per_second", &self.ticks_per_second)
            .field("refresh_rate", &self.refresh_rate)
            .field("id", &self.id)
            .field("active", &self.active)
            .field("auto_activation", &self.auto_activation)
            .field("text", &self.text)
            .field("subscription", &self.subscription)
            .finish_non_exhaustive()
    }
}

impl BubbleTeaModel for Model {
    fn init() -> (Self, Option<Cmd>) {
        let mut model = Self::default();
        let cmd = model.activate();
        (model, cmd)
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
        Self::new(SystemTime::now() + Duration::from_secs(60))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::lifecycle::Lifecycle;
    use std::sync::{Arc, Mutex};
    use std::time::UNIX_EPOCH;

    struct Recorder {
        updates: Arc<Mutex<Vec<String>>>,
        finishes: Arc<Mutex<u32>>,
    }

    impl Recorder {
        fn updates(&self) -> Vec<String> {
            self.updates.lock().unwrap().clone()
        }

        fn finishes(&self) -> u32 {
            *self.finishes.lock().unwrap()
        }
    }

    fn start() -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(1_700_000_000)
    }

    // A timer on a manual clock with recording callbacks.
    fn timer(remaining: Duration) -> (Model, ManualClock, Recorder) {
        let clock = ManualClock::new(start());
        let recorder = Recorder {
            updates: Arc::new(Mutex::new(Vec::new())),
            finishes: Arc::new(Mutex::new(0)),
        };
        let updates = Arc::clone(&recorder.updates);
        let finishes = Arc::clone(&recorder.finishes);
        let model = Model::new(start() + remaining)
            .with_clock(clock.clone())
            .on_update(move |text| updates.lock().unwrap().push(text.to_string()))
            .on_finish(move || *finishes.lock().unwrap() += 1);
        (model, clock, recorder)
    }

    fn tick_msg(timer: &Model) -> Msg {
        Box::new(TickMsg {
            id: timer.id(),
            tag: timer.tag,
        })
    }

    #[test]
    fn test_new_timer() {
        let timer = Model::new(start());
        assert_eq!(timer.ticks_per_second, DEFAULT_TICKS_PER_SECOND);
        assert_eq!(timer.refresh_rate, DEFAULT_REFRESH_RATE);
        assert_eq!(timer.interval(), Duration::from_millis(250));
        assert!(!timer.is_active());
        assert!(!timer.is_observing());
        assert_eq!(timer.text(), "00:00:00");
        assert!(timer.id() > 0);
    }

    #[test]
    fn test_unique_ids() {
        assert_ne!(Model::new(start()).id(), Model::new(start()).id());
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(Duration::ZERO), "00:00:00");
        assert_eq!(format_time(Duration::from_secs(59)), "00:00:59");
        assert_eq!(format_time(Duration::from_secs(3600 + 2 * 60 + 3)), "01:02:03");
        assert_eq!(format_time(Duration::from_secs(99 * 3600 + 59 * 60 + 59)), "99:59:59");
        // Hours clamp, minutes and seconds keep the true remainder
        assert_eq!(format_time(Duration::from_secs(150 * 3600 + 7 * 60 + 8)), "99:07:08");
    }

    #[test]
    fn test_tick_interval() {
        assert_eq!(tick_interval(60, 4), Duration::from_millis(250));
        assert_eq!(tick_interval(60, 5), Duration::from_millis(200));
        assert_eq!(tick_interval(60, 60), Duration::from_nanos(16_666_666));
        // Out of range values are clamped
        assert_eq!(tick_interval(60, 0), Duration::from_secs(1));
        assert_eq!(tick_interval(60, 240), Duration::from_nanos(16_666_666));
        assert_eq!(tick_interval(0, 4), Duration::from_secs(1));
        // Higher tick rates never tick less often
        assert!(tick_interval(60, 10) < tick_interval(60, 4));

        let mut timer = Model::new(start()).with_refresh_rate(30);
        timer.set_ticks_per_second(10);
        assert_eq!(timer.interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_activate_emits_immediately() {
        let (mut timer, _clock, recorder) = timer(Duration::from_secs(5 * 3600));
        let cmd = timer.activate();

        assert!(cmd.is_some());
        assert!(timer.is_active());
        assert_eq!(recorder.updates(), vec!["05:00:00"]);
        assert_eq!(recorder.finishes(), 0);
    }

    #[test]
    fn test_activate_is_idempotent() {
        let (mut timer, _clock, recorder) = timer(Duration::from_secs(30));
        assert!(timer.activate().is_some());
        let tag = timer.tag;

        assert!(timer.activate().is_none());
        assert_eq!(timer.tag, tag);
        assert_eq!(recorder.updates().len(), 1);
    }

    #[test]
    fn test_ticks_count_down() {
        let (mut timer, clock, recorder) = timer(Duration::from_secs(3 * 3600 + 90));
        timer.activate();

        clock.advance(Duration::from_millis(1500));
        assert!(timer.update(tick_msg(&timer)).is_some());
        assert_eq!(recorder.updates(), vec!["03:01:30", "03:01:28"]);
        assert_eq!(timer.text(), "03:01:28");
        assert_eq!(timer.remaining(), Duration::from_millis(3 * 3_600_000 + 88_500));
    }

    #[test]
    fn test_goal_reached_finishes_once() {
        let (mut timer, clock, recorder) = timer(Duration::from_secs(10));
        timer.activate();

        clock.advance(Duration::from_secs(5));
        timer.update(tick_msg(&timer));

        clock.advance(Duration::from_secs(6));
        let stale = tick_msg(&timer);
        assert!(timer.update(tick_msg(&timer)).is_none());
        assert!(!timer.is_active());
        assert_eq!(recorder.finishes(), 1);
        assert_eq!(recorder.updates().last().unwrap(), "00:00:00");

        // A tick scheduled before completion changes nothing
        assert!(timer.update(stale).is_none());
        assert_eq!(recorder.finishes(), 1);
        assert_eq!(recorder.updates(), vec!["00:00:10", "00:00:05", "00:00:00"]);
    }

    #[test]
    fn test_goal_exactly_now_finishes() {
        let (mut timer, _clock, recorder) = timer(Duration::ZERO);
        assert!(timer.activate().is_none());
        assert!(!timer.is_active());
        assert_eq!(recorder.finishes(), 1);
        assert_eq!(recorder.updates(), vec!["00:00:00"]);
    }

    #[test]
    fn test_activate_after_goal_passed() {
        let clock = ManualClock::new(start());
        let finishes = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&finishes);
        let mut timer = Model::new(start() - Duration::from_secs(30))
            .with_clock(clock)
            .on_finish(move || *counter.lock().unwrap() += 1);

        assert!(timer.activate().is_none());
        assert!(!timer.is_active());
        assert_eq!(*finishes.lock().unwrap(), 1);
        assert_eq!(timer.text(), "00:00:00");
        assert_eq!(timer.remaining(), Duration::ZERO);
    }

    #[test]
    fn test_inactivate_drops_pending_tick() {
        let (mut timer, clock, recorder) = timer(Duration::from_secs(60));
        timer.activate();
        let pending = tick_msg(&timer);

        timer.inactivate();
        clock.advance(Duration::from_secs(1));
        assert!(timer.update(pending).is_none());
        assert_eq!(recorder.updates().len(), 1);

        // Rapid re-activation must not revive the old registration either
        timer.activate();
        let stale = Box::new(TickMsg {
            id: timer.id(),
            tag: timer.tag - 2,
        });
        assert!(timer.update(stale).is_none());
        assert_eq!(recorder.updates().len(), 2);
    }

    #[test]
    fn test_inactivate_when_never_active() {
        let (mut timer, _clock, recorder) = timer(Duration::from_secs(60));
        timer.inactivate();
        assert!(!timer.is_active());
        assert!(recorder.updates().is_empty());
        assert_eq!(recorder.finishes(), 0);
    }

    #[test]
    fn test_ticks_for_other_timers_are_ignored() {
        let (mut timer, _clock, recorder) = timer(Duration::from_secs(60));
        timer.activate();
        let other = Box::new(TickMsg {
            id: timer.id() + 999,
            tag: timer.tag,
        });
        assert!(timer.update(other).is_none());
        assert_eq!(recorder.updates().len(), 1);
    }

    #[test]
    fn test_missing_callbacks_are_fine() {
        let clock = ManualClock::new(start());
        let mut timer = Model::new(start() + Duration::from_secs(2)).with_clock(clock.clone());
        timer.activate();
        clock.advance(Duration::from_secs(3));
        assert!(timer.update(tick_msg(&timer)).is_none());
        assert_eq!(timer.text(), "00:00:00");
    }

    #[test]
    fn test_set_goal_takes_effect_next_tick() {
        let (mut timer, _clock, recorder) = timer(Duration::from_secs(60));
        timer.activate();
        timer.set_goal(start() + Duration::from_secs(120));
        timer.update(tick_msg(&timer));
        assert_eq!(recorder.updates(), vec!["00:01:00", "00:02:00"]);
    }

    #[test]
    fn test_background_then_foreground_resumes() {
        let (mut timer, clock, recorder) = timer(Duration::from_secs(60));
        timer.activate();

        timer.enter_background();
        assert!(!timer.is_active());
        assert!(timer.auto_activation());

        clock.advance(Duration::from_secs(10));
        let cmd = timer.enter_foreground();
        assert!(cmd.is_some());
        assert!(timer.is_active());
        assert_eq!(recorder.updates(), vec!["00:01:00", "00:00:50"]);
    }

    #[test]
    fn test_background_while_inactive_does_not_resume() {
        let (mut timer, _clock, recorder) = timer(Duration::from_secs(60));

        timer.enter_background();
        assert!(!timer.auto_activation());
        assert!(timer.enter_foreground().is_none());
        assert!(!timer.is_active());
        assert!(recorder.updates().is_empty());
    }

    #[test]
    fn test_lifecycle_messages() {
        let lifecycle = Lifecycle::new();
        let (timer, _clock, recorder) = timer(Duration::from_secs(60));
        let mut timer = timer.with_lifecycle(&lifecycle);
        assert!(timer.is_observing());
        assert!(lifecycle.is_observing(timer.id()));
        timer.activate();

        // Messages from another source are ignored
        let other = Lifecycle::new();
        assert!(timer
            .update(Box::new(other.msg(AppState::Background)))
            .is_none());
        assert!(timer.is_active());

        assert!(timer
            .update(Box::new(lifecycle.msg(AppState::Background)))
            .is_none());
        assert!(!timer.is_active());

        let cmd = timer.update(Box::new(lifecycle.msg(AppState::Foreground)));
        assert!(cmd.is_some());
        assert!(timer.is_active());
        assert_eq!(recorder.updates().len(), 2);
    }

    #[test]
    fn test_host_focus_events_pause_and_resume() {
        let lifecycle = Lifecycle::new();
        let (timer, clock, recorder) = timer(Duration::from_secs(60));
        let mut timer = timer.with_lifecycle(&lifecycle);
        timer.activate();

        assert!(timer.update(Box::new(bubbletea_rs::BlurMsg)).is_none());
        assert!(!timer.is_active());
        assert!(timer.auto_activation());

        clock.advance(Duration::from_secs(20));
        assert!(timer.update(Box::new(bubbletea_rs::FocusMsg)).is_some());
        assert!(timer.is_active());
        assert!(!timer.auto_activation());
        assert_eq!(recorder.updates(), vec!["00:01:00", "00:00:40"]);

        timer.update(Box::new(bubbletea_rs::SuspendMsg));
        assert!(!timer.is_active());
        assert!(timer.update(Box::new(bubbletea_rs::ResumeMsg)).is_some());
        assert!(timer.is_active());
    }

    #[test]
    fn test_host_events_need_a_subscription() {
        let (mut timer, _clock, _recorder) = timer(Duration::from_secs(60));
        timer.activate();
        assert!(timer.update(Box::new(bubbletea_rs::BlurMsg)).is_none());
        assert!(timer.is_active());

        let lifecycle = Lifecycle::new().with_host_events(false);
        let mut timer = timer.with_lifecycle(&lifecycle);
        timer.update(Box::new(bubbletea_rs::BlurMsg));
        assert!(timer.is_active());
    }

    #[test]
    fn test_repeated_background_keeps_resume() {
        let lifecycle = Lifecycle::new();
        let (timer, _clock, _recorder) = timer(Duration::from_secs(60));
        let mut timer = timer.with_lifecycle(&lifecycle);
        timer.activate();

        // Focus loss reported by the terminal and announced by the app
        timer.update(Box::new(bubbletea_rs::BlurMsg));
        timer.update(Box::new(lifecycle.msg(AppState::Background)));
        assert!(timer.auto_activation());

        assert!(timer.update(Box::new(bubbletea_rs::FocusMsg)).is_some());
        assert!(timer.is_active());

        // Paused by hand after the resume: no stale resume on the next cycle
        timer.inactivate();
        timer.enter_background();
        assert!(timer.enter_foreground().is_none());
        assert!(!timer.is_active());
    }

    #[test]
    fn test_emitted_hours_clamp_at_99() {
        let (mut timer, clock, recorder) = timer(Duration::from_secs(150 * 3600 + 7 * 60 + 8));
        timer.activate();
        assert_eq!(recorder.updates(), vec!["99:07:08"]);

        clock.advance(Duration::from_secs(3));
        timer.update(tick_msg(&timer));
        assert_eq!(recorder.updates().last().unwrap(), "99:07:05");
        assert_eq!(timer.text(), "99:07:05");
    }

    #[test]
    fn test_drop_detaches_and_emits_nothing() {
        let lifecycle = Lifecycle::new();
        let (timer, _clock, recorder) = timer(Duration::from_secs(60));
        let timer = timer.with_lifecycle(&lifecycle);
        assert_eq!(lifecycle.observer_count(), 1);

        drop(timer);
        assert_eq!(lifecycle.observer_count(), 0);
        assert!(recorder.updates().is_empty());
        assert_eq!(recorder.finishes(), 0);
    }

    #[test]
    fn test_drop_active_timer() {
        let lifecycle = Lifecycle::new();
        let (timer, _clock, recorder) = timer(Duration::from_secs(60));
        let mut timer = timer.with_lifecycle(&lifecycle);
        timer.activate();

        drop(timer);
        assert_eq!(lifecycle.observer_count(), 0);
        assert_eq!(recorder.updates().len(), 1);
        assert_eq!(recorder.finishes(), 0);
    }

    #[test]
    fn test_resubscribing_detaches_previous_source() {
        let first = Lifecycle::new();
        let second = Lifecycle::new();
        let timer = Model::new(start()).with_lifecycle(&first).with_lifecycle(&second);

        assert_eq!(first.observer_count(), 0);
        assert_eq!(second.observer_count(), 1);
        drop(timer);
        assert_eq!(second.observer_count(), 0);
    }

    #[test]
    fn test_drives_countdown_label() {
        use crate::countdown;

        let (mut timer, clock, recorder) = timer(Duration::from_secs(3600 + 1));
        let mut label = countdown::new(&[]);

        timer.activate();
        for text in recorder.updates() {
            label.set_text(&text).unwrap();
        }
        assert_eq!(label.displayed(), "01:00:01");
        assert!(!label.is_animating());

        clock.advance(Duration::from_secs(2));
        timer.update(tick_msg(&timer));
        let last = recorder.updates().pop().unwrap();
        assert_eq!(last, "00:59:59");
        assert!(label.set_text(&last).unwrap().is_some());
        assert_eq!(label.displayed(), "00:59:59");

        // Cells changing for the second time roll over, first changes are instant
        assert!(label.cells()[1].is_animating());
        assert!(label.cells()[5].is_animating());
        assert!(!label.cells()[2].is_animating());
    }

    #[tokio::test]
    async fn test_tick_command_round_trip() {
        let (mut timer, clock, recorder) = timer(Duration::from_secs(10));
        let cmd = timer.activate().expect("tick command");

        clock.advance(Duration::from_secs(1));
        let msg = cmd.await.expect("tick message");
        assert!(msg.downcast_ref::<TickMsg>().is_some());
        assert!(timer.update(msg).is_some());
        assert_eq!(recorder.updates(), vec!["00:00:10", "00:00:09"]);
    }
}
