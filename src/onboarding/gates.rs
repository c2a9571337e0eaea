//! Pure gate predicates.
//!
//! These take plain values and hit no store, so the exact rules are testable
//! without any async setup. The manager owns fetching the inputs.

/// Whether a candidate display name satisfies the name gate.
///
/// Passes iff the trimmed name is non-empty and either contains at least two
/// whitespace-separated tokens, or is a single token containing neither `@`
/// nor `+`. A single token with an address character is treated as an email
/// local-part that leaked in from a sign-up form, not a name.
pub fn name_passes(candidate: &str) -> bool {
    let trimmed = candidate.trim();
    if trimmed.is_empty() {
        return false;
    }
    let mut tokens = trimmed.split_whitespace();
    let first = match tokens.next() {
        Some(t) => t,
        None => return false,
    };
    if tokens.next().is_some() {
        return true;
    }
    !first.contains('@') && !first.contains('+')
}

/// Whether at least one goal was ever recorded.
///
/// `multi` is the newer comma-joined multi-goal value from the profile;
/// `legacy` is the single-goal value older builds wrote to the flag store.
/// Either satisfies the gate.
pub fn goals_recorded(multi: Option<&str>, legacy: Option<&str>) -> bool {
    has_goal_content(multi) || has_goal_content(legacy)
}

fn has_goal_content(raw: Option<&str>) -> bool {
    raw.is_some_and(|s| s.split(',').any(|segment| !segment.trim().is_empty()))
}
