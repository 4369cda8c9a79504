//! Offline session driver.
//!
//! Replays a script of transcription events against a [`Hud`] and prints
//! every display change. Each input line is one of:
//!
//! - `final: <text>` a settled transcription
//! - `partial: <text>` an interim hypothesis
//! - `tick` one elapsed rest-timer second
//!
//! Blank lines and lines starting with `#` are skipped. Any other line is
//! treated as a final transcription.

use hud_core::{Hud, Result, TickOutcome, TimerChange, TimerToken};
use std::io::{BufRead, Write};

#[derive(Debug, PartialEq)]
enum ScriptLine<'a> {
    Speech { text: &'a str, is_final: bool },
    Tick,
}

fn parse_line(line: &str) -> Option<ScriptLine<'_>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    if line.eq_ignore_ascii_case("tick") {
        return Some(ScriptLine::Tick);
    }
    if let Some(text) = line.strip_prefix("final:") {
        return Some(ScriptLine::Speech {
            text: text.trim(),
            is_final: true,
        });
    }
    if let Some(text) = line.strip_prefix("partial:") {
        return Some(ScriptLine::Speech {
            text: text.trim(),
            is_final: false,
        });
    }
    Some(ScriptLine::Speech {
        text: line,
        is_final: true,
    })
}

/// Drive `hud` from `input`, writing each refreshed display to `out`
pub fn run(hud: &mut Hud<'_>, input: impl BufRead, mut out: impl Write) -> Result<()> {
    let mut token: Option<TimerToken> = None;

    for line in input.lines() {
        let line = line?;
        let Some(step) = parse_line(&line) else {
            continue;
        };

        let refresh = match step {
            ScriptLine::Speech { text, is_final } => {
                let update = hud.on_speech(text, is_final);
                match update.timer {
                    TimerChange::Started(t) => token = Some(t),
                    TimerChange::Cancelled => token = None,
                    TimerChange::Unchanged => {}
                }
                update.refresh
            }
            ScriptLine::Tick => match token.map(|t| hud.on_tick(t)) {
                Some(TickOutcome::Ticking) => true,
                Some(TickOutcome::Expired) => {
                    token = None;
                    true
                }
                Some(TickOutcome::Stale) | None => false,
            },
        };

        if refresh {
            writeln!(out, "---")?;
            writeln!(out, "{}", hud.render())?;
        }
    }

    out.flush()?;
    Ok(())
}
