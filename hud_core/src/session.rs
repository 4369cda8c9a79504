//! Session state machine driven by transcribed speech.
//!
//! Each speech event is interpreted against the current [`SessionState`]:
//!
//! 1. Navigation keywords apply on every event, partial or final, and end
//!    processing for that event.
//! 2. Partial transcriptions stop there.
//! 3. In the gym view with no day chosen, a day keyword selects the day.
//! 4. In the gym view with a day chosen, "done"/"back" move through sets.
//!    An utterance carrying both completes the set and then steps back, so
//!    the rest timer ends up cancelled.
//!
//! Anything else is ignored. The machine never fails: every input maps to
//! exactly one next state plus a refresh flag.

use crate::intent::{self, Navigation, Progression};
use crate::{Catalog, SessionState, View};

/// Default rest period started after each completed set
pub const DEFAULT_REST_SECONDS: u32 = 90;

/// What the rest timer should do as a result of a transition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerAction {
    Keep,
    Start(u32),
    Cancel,
}

/// Outcome of interpreting one speech event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub refresh: bool,
    pub timer: TimerAction,
}

impl Transition {
    fn ignored() -> Self {
        Self {
            refresh: false,
            timer: TimerAction::Keep,
        }
    }

    fn changed(timer: TimerAction) -> Self {
        Self {
            refresh: true,
            timer,
        }
    }
}

pub struct SessionMachine<'a> {
    catalog: &'a Catalog,
    state: SessionState,
    rest_seconds: u32,
}

impl<'a> SessionMachine<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self::with_rest_seconds(catalog, DEFAULT_REST_SECONDS)
    }

    pub fn with_rest_seconds(catalog: &'a Catalog, rest_seconds: u32) -> Self {
        Self {
            catalog,
            state: SessionState::default(),
            rest_seconds,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Interpret one speech event
    pub fn handle_speech(&mut self, text: &str, is_final: bool) -> Transition {
        let speech = text.to_lowercase();

        if let Some(nav) = intent::navigation(&speech) {
            return self.navigate(nav);
        }

        // Partial hypotheses only ever navigate; acting on them would skip
        // or repeat sets as the transcript is revised.
        if !is_final || self.state.view != View::Gym {
            return Transition::ignored();
        }

        if self.state.selected_day.is_none() {
            return self.select_day(&speech);
        }

        // The last step decides the timer: done starts it, back cancels it
        intent::progression(&speech).fold(Transition::ignored(), |_, step| match step {
            Progression::Done => self.complete_set(),
            Progression::Back => self.step_back(),
        })
    }

    fn navigate(&mut self, nav: Navigation) -> Transition {
        tracing::debug!(?nav, "Navigation");
        match nav {
            Navigation::Off => {
                self.state.view = View::Off;
                Transition::changed(TimerAction::Keep)
            }
            Navigation::Gym => {
                self.state = SessionState {
                    view: View::Gym,
                    selected_day: None,
                    exercise_index: 0,
                    current_set: 1,
                };
                Transition::changed(TimerAction::Cancel)
            }
            Navigation::Macro => {
                self.state.view = View::Macro;
                Transition::changed(TimerAction::Keep)
            }
        }
    }

    fn select_day(&mut self, speech: &str) -> Transition {
        let Some(day) = self.catalog.match_day(speech) else {
            return Transition::ignored();
        };

        tracing::info!(day = %day.key, "Workout day selected");
        self.state.selected_day = Some(day.key.clone());
        self.state.exercise_index = 0;
        self.state.current_set = 1;
        Transition::changed(TimerAction::Keep)
    }

    fn complete_set(&mut self) -> Transition {
        let target_sets = self.target_sets(self.state.exercise_index);

        if self.state.current_set < target_sets {
            self.state.current_set += 1;
        } else if self.state.exercise_index + 1 < self.exercise_count() {
            self.state.exercise_index += 1;
            self.state.current_set = 1;
        } else {
            // Last set of the last exercise: nothing further to advance to
            tracing::debug!("Workout already at final set");
        }

        tracing::info!(
            exercise = self.state.exercise_index,
            set = self.state.current_set,
            "Set completed"
        );
        Transition::changed(TimerAction::Start(self.rest_seconds))
    }

    fn step_back(&mut self) -> Transition {
        if self.state.current_set > 1 {
            self.state.current_set -= 1;
        } else if self.state.exercise_index > 0 {
            self.state.exercise_index -= 1;
            self.state.current_set = self.target_sets(self.state.exercise_index);
        }

        tracing::info!(
            exercise = self.state.exercise_index,
            set = self.state.current_set,
            "Stepped back"
        );
        Transition::changed(TimerAction::Cancel)
    }

    fn exercise_count(&self) -> usize {
        self.state
            .selected_day
            .as_deref()
            .and_then(|key| self.catalog.day(key))
            .map_or(0, |d| d.exercises.len())
    }

    fn target_sets(&self, index: usize) -> u32 {
        self.state
            .selected_day
            .as_deref()
            .and_then(|key| self.catalog.exercise(key, index))
            .map_or(1, |e| e.target_sets.max(1))
    }
}
