//! Countdown demo: a wheel-animated label driven by a goal-date timer.
//!
//! Usage: `countdown [SECONDS]`. Without an argument the countdown runs to
//! the next full hour.
//!
//! Keys: `space` pauses and resumes, `b`/`f` simulate moving the app to the
//! background and back, `q` quits. Switching terminal focus away and back
//! pauses and resumes the countdown as well.

use bubbletea_countdown::prelude::*;
use bubbletea_rs::{batch, quit, Cmd, KeyMsg, Model as BubbleTeaModel, Msg, Program, WindowSizeMsg};
use crossterm::event::KeyCode;
use lipgloss_extras::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

fn goal_from_args() -> SystemTime {
    if let Some(seconds) = std::env::args().nth(1).and_then(|s| s.parse::<u64>().ok()) {
        return SystemTime::now() + Duration::from_secs(seconds);
    }
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs();
    UNIX_EPOCH + Duration::from_secs((now / 3600 + 1) * 3600)
}

struct App {
    label: Countdown,
    timer: Timer,
    lifecycle: Lifecycle,
    latest: Arc<Mutex<Option<String>>>,
    finished: Arc<AtomicBool>,
    backgrounded: bool,
}

impl App {
    // Moves the most recent timer output into the label.
    fn sync_label(&mut self) -> Option<Cmd> {
        let text = self.latest.lock().ok()?.take()?;
        self.label.set_text(&text).ok().flatten()
    }

    fn toggle(&mut self) -> Option<Cmd> {
        if self.timer.is_active() {
            self.timer.inactivate();
            None
        } else {
            self.timer.activate()
        }
    }
}

fn combine(cmds: Vec<Option<Cmd>>) -> Option<Cmd> {
    let mut cmds: Vec<Cmd> = cmds.into_iter().flatten().collect();
    match cmds.len() {
        0 => None,
        1 => cmds.pop(),
        _ => Some(batch(cmds)),
    }
}

impl BubbleTeaModel for App {
    fn init() -> (Self, Option<Cmd>) {
        let lifecycle = Lifecycle::new();
        let latest = Arc::new(Mutex::new(None));
        let finished = Arc::new(AtomicBool::new(false));

        let sink = Arc::clone(&latest);
        let done = Arc::clone(&finished);
        let timer = Timer::new(goal_from_args())
            .with_ticks_per_second(5)
            .with_lifecycle(&lifecycle)
            .on_update(move |text| {
                if let Ok(mut latest) = sink.lock() {
                    *latest = Some(text.to_string());
                }
            })
            .on_finish(move || done.store(true, Ordering::SeqCst));

        let mut app = Self {
            label: countdown_new(&[with_color("#FF5F87")]),
            timer,
            lifecycle,
            latest,
            finished,
            backgrounded: false,
        };
        let tick = app.timer.activate();
        let frames = app.sync_label();
        (app, combine(vec![tick, frames]))
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            return match key_msg.key {
                KeyCode::Char('q') | KeyCode::Esc => Some(quit()),
                KeyCode::Char('b') => Some(self.lifecycle.enter_background()),
                KeyCode::Char('f') => Some(self.lifecycle.enter_foreground()),
                KeyCode::Char(' ') => {
                    let tick = self.toggle();
                    let frames = self.sync_label();
                    combine(vec![tick, frames])
                }
                _ => None,
            };
        }

        if let Some(size) = msg.downcast_ref::<WindowSizeMsg>() {
            let height = self.label.height();
            self.label.set_size(size.width as usize, height);
            return None;
        }

        if msg.downcast_ref::<CountdownFrameMsg>().is_some() {
            return self.label.update(msg);
        }

        let transition = host_state(&msg).or_else(|| {
            msg.downcast_ref::<LifecycleMsg>()
                .filter(|m| m.source == self.lifecycle.id())
                .map(|m| m.state)
        });
        if let Some(state) = transition {
            self.backgrounded = state == AppState::Background;
        }

        let tick = self.timer.update(msg);
        let frames = self.sync_label();
        combine(vec![tick, frames])
    }

    fn view(&self) -> String {
        let help = Style::new()
            .foreground(Color::from("241"))
            .render("space: pause/resume • b: background • f: foreground • q: quit");

        if self.finished.load(Ordering::SeqCst) {
            let banner = Style::new()
                .foreground(Color::from("#FF5F87"))
                .bold(true)
                .render("Time is up!");
            return format!("\n{}\n\n{}\n", banner, help);
        }

        let state = if self.timer.is_active() {
            "running"
        } else if self.backgrounded {
            "in background"
        } else {
            "paused"
        };
        format!("\n{}\n\n{}\n{}\n", self.label.view(), state, help)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let program = Program::<App>::builder()
        .alt_screen(true)
        .report_focus(true)
        .build()?;
    program.run().await?;
    Ok(())
}
