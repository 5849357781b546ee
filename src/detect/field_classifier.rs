use serde::{Deserialize, Serialize};

use crate::identity::identity_model::SyntheticIdentity;
use crate::page::page_model::{InputDescriptor, InputKind, PageElementInventory};

/// Identity attribute an input can be mapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IdentityField {
    Username,
    Email,
    Password,
    FirstName,
    LastName,
    Phone,
    FullName,
}

impl IdentityField {
    pub fn attribute_name(&self) -> &'static str {
        match self {
            IdentityField::Username => "username",
            IdentityField::Email => "email",
            IdentityField::Password => "password",
            IdentityField::FirstName => "firstName",
            IdentityField::LastName => "lastName",
            IdentityField::Phone => "phone",
            IdentityField::FullName => "fullName",
        }
    }
}

/// Map an input to at most one identity attribute.
///
/// Rules are evaluated in a fixed order and the first hit wins. The order
/// matters: "username" also contains "name", and a confirmation field is a
/// password field too.
pub fn classify(descriptor: &InputDescriptor) -> Option<IdentityField> {
    let field = format!(
        "{}{}{}",
        descriptor.name, descriptor.element_id, descriptor.placeholder
    )
    .to_lowercase();
    let kind = descriptor.input_type;
    let has = |needle: &str| field.contains(needle);

    if has("username") || has("user") {
        return Some(IdentityField::Username);
    }
    if has("email") || kind == InputKind::Email {
        return Some(IdentityField::Email);
    }
    // Confirmation reuses the primary password value
    if has("confirm") && kind == InputKind::Password {
        return Some(IdentityField::Password);
    }
    if has("password") || kind == InputKind::Password {
        return Some(IdentityField::Password);
    }
    if has("firstname") || has("first") {
        return Some(IdentityField::FirstName);
    }
    if has("lastname") || has("last") {
        return Some(IdentityField::LastName);
    }
    if has("phone") || has("mobile") || kind == InputKind::Tel {
        return Some(IdentityField::Phone);
    }
    if has("fullname") || (has("name") && !has("username")) {
        return Some(IdentityField::FullName);
    }

    None
}

/// One entry of the set-values instruction sent to the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldAssignment {
    pub index: usize,
    pub field: IdentityField,
    pub value: String,
}

/// Classify every input on the live page and pair mapped ones with identity values.
///
/// Unmapped inputs are absent from the plan, so their current value is kept.
pub fn plan_fill(
    inventory: &PageElementInventory,
    identity: &SyntheticIdentity,
) -> Vec<FieldAssignment> {
    inventory
        .all_inputs()
        .filter_map(|input| {
            classify(input).map(|field| FieldAssignment {
                index: input.index,
                field,
                value: identity.value_of(field).to_string(),
            })
        })
        .collect()
}
