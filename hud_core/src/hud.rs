//! The HUD aggregate: everything one device session can see and change.
//!
//! `Hud` wires the session state machine to the rest timer and macro store.
//! It performs no I/O and never schedules anything; the caller is
//! responsible for delivering ticks, saving the macro cache and pushing
//! renders.

use crate::session::{SessionMachine, TimerAction};
use crate::timer::{RestTimer, TickOutcome, TimerToken};
use crate::{display, Catalog, MacroSnapshot, MacroStore, Metric, MetricsApplied, SessionState};
use std::path::Path;

/// How the rest timer changed during an update
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerChange {
    Unchanged,
    /// A new countdown began; deliver ticks for this token
    Started(TimerToken),
    Cancelled,
}

/// Result of a speech event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HudUpdate {
    pub refresh: bool,
    pub timer: TimerChange,
}

pub struct Hud<'a> {
    session: SessionMachine<'a>,
    timer: RestTimer,
    macros: MacroStore,
}

impl<'a> Hud<'a> {
    pub fn new(catalog: &'a Catalog, macros: MacroStore, rest_seconds: u32) -> Self {
        Self {
            session: SessionMachine::with_rest_seconds(catalog, rest_seconds),
            timer: RestTimer::new(),
            macros,
        }
    }

    pub fn session(&self) -> &SessionState {
        self.session.state()
    }

    pub fn timer(&self) -> &RestTimer {
        &self.timer
    }

    pub fn macros(&self) -> &MacroSnapshot {
        self.macros.snapshot()
    }

    /// Interpret one speech event and apply its timer effect
    pub fn on_speech(&mut self, text: &str, is_final: bool) -> HudUpdate {
        tracing::debug!(text, is_final, "Heard");

        let transition = self.session.handle_speech(text, is_final);
        let timer = match transition.timer {
            TimerAction::Keep => TimerChange::Unchanged,
            TimerAction::Start(seconds) => TimerChange::Started(self.timer.start(seconds)),
            TimerAction::Cancel => {
                self.timer.cancel();
                TimerChange::Cancelled
            }
        };

        HudUpdate {
            refresh: transition.refresh,
            timer,
        }
    }

    /// Apply one elapsed second; stale tokens change nothing
    pub fn on_tick(&mut self, token: TimerToken) -> TickOutcome {
        self.timer.tick(token)
    }

    /// Apply metrics in memory, leaving the save to the caller
    pub fn update_macros(&mut self, metrics: &[Metric]) -> MetricsApplied {
        self.macros.update(metrics)
    }

    pub fn macro_cache_path(&self) -> &Path {
        self.macros.path()
    }

    /// Current text wall
    pub fn render(&self) -> String {
        display::project(
            self.session.state(),
            self.session.catalog(),
            self.macros.snapshot(),
            &self.timer,
        )
    }
}
