use serde::{Deserialize, Serialize};

use crate::page::page_model::{InputDescriptor, PageElementInventory};

pub const SIGNUP_KEYWORDS: [&str; 6] = [
    "sign up",
    "signup",
    "register",
    "create account",
    "join",
    "get started",
];

/// Which signup link to keep when several elements match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkTieBreak {
    /// Scan every element; each later match with a target overwrites the link.
    #[default]
    LastMatch,
    FirstMatch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupAssessment {
    pub capability_detected: bool,
    pub signup_link_target: Option<String>,
    pub has_any_form: bool,
    pub input_descriptors: Vec<InputDescriptor>,
    pub form_count: usize,
}

impl SignupAssessment {
    /// A bare form counts as actionable even without signup wording.
    pub fn can_create(&self) -> bool {
        self.capability_detected || self.has_any_form
    }
}

pub fn assess(inventory: &PageElementInventory, tie_break: LinkTieBreak) -> SignupAssessment {
    let mut capability_detected = false;
    let mut signup_link_target: Option<String> = None;

    for action in &inventory.actions {
        let text = action.display_text().to_lowercase();
        let href = action.href.as_deref().unwrap_or("").to_lowercase();

        let matched = SIGNUP_KEYWORDS
            .iter()
            .any(|k| text.contains(k) || href.contains(k));
        if !matched {
            continue;
        }

        capability_detected = true;

        let has_target = action.href.as_deref().is_some_and(|h| !h.is_empty());
        let keep_existing = tie_break == LinkTieBreak::FirstMatch && signup_link_target.is_some();
        if has_target && !keep_existing {
            signup_link_target = action.href.clone();
        }
    }

    SignupAssessment {
        capability_detected,
        signup_link_target,
        has_any_form: !inventory.forms.is_empty(),
        input_descriptors: inventory.form_inputs(),
        form_count: inventory.forms.len(),
    }
}
