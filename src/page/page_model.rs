use serde::{Deserialize, Serialize};

/// Snapshot of a rendered page as reported by the browser bridge.
///
/// Captured fresh after every navigation or re-scan; never mutated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageElementInventory {
    /// Buttons, links and submit inputs in document order.
    #[serde(default)]
    pub actions: Vec<ActionableElement>,
    #[serde(default)]
    pub forms: Vec<FormSnapshot>,
    /// Inputs that live outside any `<form>` element.
    #[serde(default)]
    pub standalone_inputs: Vec<InputDescriptor>,
}

impl PageElementInventory {
    /// Every input on the page: form inputs first, then standalone ones.
    pub fn all_inputs(&self) -> impl Iterator<Item = &InputDescriptor> {
        self.forms
            .iter()
            .flat_map(|f| f.inputs.iter())
            .chain(self.standalone_inputs.iter())
    }

    /// Inputs that belong to a form, in form order.
    pub fn form_inputs(&self) -> Vec<InputDescriptor> {
        self.forms
            .iter()
            .flat_map(|f| f.inputs.iter().cloned())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Button,
    SubmitInput,
    Link,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionableElement {
    /// Position in the bridge's action list; used as the click handle.
    pub index: usize,
    pub kind: ActionKind,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub href: Option<String>,
}

impl ActionableElement {
    /// Visible text, falling back to the value attribute for `<input>` buttons.
    pub fn display_text(&self) -> &str {
        if self.text.trim().is_empty() {
            &self.value
        } else {
            &self.text
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormSnapshot {
    #[serde(default)]
    pub inputs: Vec<InputDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    /// Document-order position among input, select and textarea elements.
    pub index: usize,
    #[serde(rename = "type", default)]
    pub input_type: InputKind,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "id", default)]
    pub element_id: String,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InputKind {
    #[default]
    Text,
    Email,
    Password,
    Tel,
    Select,
    Textarea,
    Other,
}

impl InputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::Text => "text",
            InputKind::Email => "email",
            InputKind::Password => "password",
            InputKind::Tel => "tel",
            InputKind::Select => "select",
            InputKind::Textarea => "textarea",
            InputKind::Other => "other",
        }
    }
}

impl From<&str> for InputKind {
    fn from(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            // Elements without a type attribute report "text"
            "" | "text" => InputKind::Text,
            "email" => InputKind::Email,
            "password" => InputKind::Password,
            "tel" => InputKind::Tel,
            "select" | "select-one" | "select-multiple" => InputKind::Select,
            "textarea" => InputKind::Textarea,
            _ => InputKind::Other,
        }
    }
}

impl From<String> for InputKind {
    fn from(raw: String) -> Self {
        InputKind::from(raw.as_str())
    }
}

impl From<InputKind> for String {
    fn from(kind: InputKind) -> Self {
        kind.as_str().to_string()
    }
}
