use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use chrono::NaiveDate;
use signup_harness::identity::identity_model::{IdentitySource, SyntheticIdentity};
use signup_harness::orchestrator::pacing::Sleeper;
use signup_harness::page::page_model::{
    ActionKind, ActionableElement, FormSnapshot, InputDescriptor, InputKind, PageElementInventory,
};

pub fn input(index: usize, kind: InputKind, name: &str) -> InputDescriptor {
    InputDescriptor {
        index,
        input_type: kind,
        name: name.into(),
        element_id: String::new(),
        placeholder: String::new(),
        required: false,
    }
}

pub fn action(index: usize, kind: ActionKind, text: &str, href: Option<&str>) -> ActionableElement {
    ActionableElement {
        index,
        kind,
        text: text.into(),
        value: String::new(),
        href: href.map(String::from),
    }
}

/// A typical registration page: nav links plus one signup form.
pub fn signup_page() -> PageElementInventory {
    PageElementInventory {
        actions: vec![
            action(0, ActionKind::Link, "Log in", Some("https://app.test/login")),
            action(1, ActionKind::Link, "Pricing", Some("https://app.test/pricing")),
            action(2, ActionKind::Button, "Create account", None),
        ],
        forms: vec![FormSnapshot {
            inputs: vec![
                input(0, InputKind::Text, "username"),
                input(1, InputKind::Email, "email"),
                input(2, InputKind::Password, "password"),
                input(3, InputKind::Password, "confirm_password"),
                input(4, InputKind::Text, "first_name"),
                input(5, InputKind::Text, "last_name"),
                input(6, InputKind::Tel, "phone"),
                input(7, InputKind::Other, "terms"),
            ],
        }],
        standalone_inputs: vec![],
    }
}

/// A page with a form but nothing that reads as a submit control.
pub fn form_without_submit() -> PageElementInventory {
    PageElementInventory {
        actions: vec![action(0, ActionKind::Link, "Home", Some("https://app.test/"))],
        forms: vec![FormSnapshot {
            inputs: vec![input(0, InputKind::Email, "email")],
        }],
        standalone_inputs: vec![],
    }
}

pub fn identity(n: usize) -> SyntheticIdentity {
    SyntheticIdentity {
        username: format!("tester{}", n),
        email: format!("tester{}@example.com", n),
        password: format!("Secret#{:05}", n),
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        full_name: "Ada Lovelace".into(),
        phone: "+2340000000000".into(),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
        address: "1 Test Street".into(),
        city: "Lagos".into(),
        country: "Nigeria".into(),
    }
}

/// Hands out `identity(1)`, `identity(2)`, ... and counts calls.
pub struct NumberedIdentities {
    pub generated: Rc<Cell<usize>>,
}

impl NumberedIdentities {
    pub fn new() -> (Self, Rc<Cell<usize>>) {
        let generated = Rc::new(Cell::new(0));
        (Self { generated: generated.clone() }, generated)
    }
}

impl IdentitySource for NumberedIdentities {
    fn generate(&mut self) -> SyntheticIdentity {
        let n = self.generated.get() + 1;
        self.generated.set(n);
        identity(n)
    }
}

/// Records pauses instead of sleeping.
pub struct RecordingSleeper {
    pub pauses: Rc<RefCell<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn new() -> (Self, Rc<RefCell<Vec<Duration>>>) {
        let pauses = Rc::new(RefCell::new(Vec::new()));
        (Self { pauses: pauses.clone() }, pauses)
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&mut self, duration: Duration) {
        self.pauses.borrow_mut().push(duration);
    }
}
