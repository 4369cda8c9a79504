//! Keyword intents recognised in transcribed speech.
//!
//! Matching is plain substring containment on lowercased text. Rules are
//! evaluated top to bottom. For navigation the first rule with a matching
//! keyword wins; progression reports every matching rule in table order.

/// Screen-level navigation, honoured on partial and final transcriptions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    Off,
    Gym,
    Macro,
}

/// In-workout set progression, honoured on final transcriptions only
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Progression {
    Done,
    Back,
}

/// "jim" and "gem" are common mis-hearings of "gym"; "maker" of "macro".
const NAVIGATION_RULES: &[(&[&str], Navigation)] = &[
    (&["off", "shut"], Navigation::Off),
    (&["gym", "jim", "gem"], Navigation::Gym),
    (&["macro", "maker"], Navigation::Macro),
];

const PROGRESSION_RULES: &[(&[&str], Progression)] = &[
    (&["done", "down"], Progression::Done),
    (&["back"], Progression::Back),
];

fn first_match<T: Copy>(rules: &[(&[&str], T)], speech: &str) -> Option<T> {
    rules
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| speech.contains(k)))
        .map(|(_, intent)| *intent)
}

/// Classify a lowercased utterance as a navigation command
pub fn navigation(speech: &str) -> Option<Navigation> {
    first_match(NAVIGATION_RULES, speech)
}

/// Set progression commands in a lowercased utterance
///
/// Unlike navigation these do not shadow each other: "done, no, back"
/// yields `Done` then `Back`, in rule order.
pub fn progression(speech: &str) -> impl Iterator<Item = Progression> + '_ {
    PROGRESSION_RULES
        .iter()
        .filter(move |(keywords, _)| keywords.iter().any(|k| speech.contains(k)))
        .map(|(_, intent)| *intent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_keywords() {
        assert_eq!(navigation("turn off"), Some(Navigation::Off));
        assert_eq!(navigation("shut it"), Some(Navigation::Off));
        assert_eq!(navigation("gym"), Some(Navigation::Gym));
        assert_eq!(navigation("jim mode"), Some(Navigation::Gym));
        assert_eq!(navigation("gem"), Some(Navigation::Gym));
        assert_eq!(navigation("show macros"), Some(Navigation::Macro));
        assert_eq!(navigation("maker"), Some(Navigation::Macro));
        assert_eq!(navigation("push day"), None);
    }

    #[test]
    fn test_navigation_priority() {
        // "off" outranks "gym", which outranks "macro"
        assert_eq!(navigation("gym off"), Some(Navigation::Off));
        assert_eq!(navigation("macro gym"), Some(Navigation::Gym));
    }

    fn progressions(speech: &str) -> Vec<Progression> {
        progression(speech).collect()
    }

    #[test]
    fn test_progression_keywords() {
        assert_eq!(progressions("done"), vec![Progression::Done]);
        assert_eq!(progressions("i'm down"), vec![Progression::Done]);
        assert_eq!(progressions("go back"), vec![Progression::Back]);
        assert!(progressions("hello").is_empty());
    }

    #[test]
    fn test_done_and_back_both_reported_in_order() {
        assert_eq!(
            progressions("back, no wait, done"),
            vec![Progression::Done, Progression::Back]
        );
        // Repeated keywords still count once per rule
        assert_eq!(progressions("done done"), vec![Progression::Done]);
    }
}
