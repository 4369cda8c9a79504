//! Display projection: current state to HUD text wall.

use crate::{Catalog, MacroSnapshot, RestTimer, SessionState, View};

const MACRO_HINT: &str = "> Gym | Off";
const WORKOUT_HINT: &str = "> Done | Back";
const MENU_LABELS_PER_ROW: usize = 3;

/// Render the text wall for the given state
///
/// Returns an empty string for [`View::Off`], which clears the display.
pub fn project(
    session: &SessionState,
    catalog: &Catalog,
    macros: &MacroSnapshot,
    timer: &RestTimer,
) -> String {
    match session.view {
        View::Off => String::new(),
        View::Macro => format!(
            "MACROS\nCAL: {}\nPRO: {}g\n\n{}",
            macros.calories, macros.protein, MACRO_HINT
        ),
        View::Gym => match session.selected_day.as_deref() {
            None => day_menu(catalog),
            Some(key) => workout(session, catalog, key, timer),
        },
    }
}

fn day_menu(catalog: &Catalog) -> String {
    let labels: Vec<&str> = catalog.days.iter().map(|d| d.label.as_str()).collect();
    let rows: Vec<String> = labels
        .chunks(MENU_LABELS_PER_ROW)
        .map(|row| row.join(" | "))
        .collect();
    format!("SELECT DAY:\n{}", rows.join("\n"))
}

fn workout(session: &SessionState, catalog: &Catalog, key: &str, timer: &RestTimer) -> String {
    let Some(exercise) = catalog.exercise(key, session.exercise_index) else {
        // Unreachable through the state machine; fall back to the menu
        return day_menu(catalog);
    };

    let mut lines = vec![
        key.to_uppercase(),
        exercise.name.clone(),
        format!(
            "SET {}/{} x {}",
            session.current_set, exercise.target_sets, exercise.rep_range
        ),
        format!("WT: {} LBS", exercise.weight),
    ];
    if timer.is_running() {
        lines.push(format!("REST: {}s", timer.seconds_remaining()));
    }
    lines.push(String::new());
    lines.push(WORKOUT_HINT.to_string());
    lines.join("\n")
}
