use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::detect::field_classifier::IdentityField;

/// Fabricated personal data for a single attempt. Never reused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntheticIdentity {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub phone: String,
    pub date_of_birth: NaiveDate,
    pub address: String,
    pub city: String,
    pub country: String,
}

impl SyntheticIdentity {
    pub fn value_of(&self, field: IdentityField) -> &str {
        match field {
            IdentityField::Username => &self.username,
            IdentityField::Email => &self.email,
            IdentityField::Password => &self.password,
            IdentityField::FirstName => &self.first_name,
            IdentityField::LastName => &self.last_name,
            IdentityField::Phone => &self.phone,
            IdentityField::FullName => &self.full_name,
        }
    }

    pub fn summary(&self) -> IdentitySummary {
        IdentitySummary {
            username: self.username.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            phone: self.phone.clone(),
        }
    }
}

/// Credentials reported back for a successful attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentitySummary {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

/// Produces one self-consistent identity per call.
pub trait IdentitySource {
    fn generate(&mut self) -> SyntheticIdentity;
}
