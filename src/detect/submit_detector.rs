use crate::page::page_model::{ActionKind, ActionableElement};

pub const SUBMIT_KEYWORDS: [&str; 7] = [
    "sign up", "signup", "register", "create", "submit", "join", "continue",
];

/// First button or submit input, in document order, whose label reads as a submit.
///
/// Links are skipped: following one navigates away instead of submitting.
pub fn find_submit(actions: &[ActionableElement]) -> Option<&ActionableElement> {
    actions.iter().find(|a| {
        if a.kind == ActionKind::Link {
            return false;
        }
        let label = a.display_text().to_lowercase();
        SUBMIT_KEYWORDS.iter().any(|k| label.contains(k))
    })
}
