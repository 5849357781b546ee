use chrono::{Days, NaiveDate, Utc};
use fake::Fake;
use fake::faker::address::en::{BuildingNumber, CityName, StreetName};
use fake::faker::internet::en::{Password, SafeEmail, Username};
use fake::faker::name::en::{FirstName, LastName};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::identity::identity_model::{IdentitySource, SyntheticIdentity};

const PASSWORD_LEN: usize = 12;
const PHONE_DIGITS: usize = 10;
const MIN_AGE_YEARS: u64 = 18;
const MAX_AGE_YEARS: u64 = 65;

/// Locale-ish knobs for generated identities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityProfile {
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default = "default_phone_prefix")]
    pub phone_prefix: String,
}

impl Default for IdentityProfile {
    fn default() -> Self {
        Self {
            country: default_country(),
            phone_prefix: default_phone_prefix(),
        }
    }
}

fn default_country() -> String { "Nigeria".to_string() }
fn default_phone_prefix() -> String { "+234".to_string() }

/// Identity source backed by the `fake` crate.
///
/// Emails come from `SafeEmail`, which only yields reserved example domains.
pub struct FakeIdentitySource {
    rng: StdRng,
    profile: IdentityProfile,
    today: NaiveDate,
}

impl FakeIdentitySource {
    pub fn new(profile: IdentityProfile) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            profile,
            today: Utc::now().date_naive(),
        }
    }

    /// Deterministic source for tests and reproducible runs.
    pub fn seeded(seed: u64, profile: IdentityProfile) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            profile,
            today: Utc::now().date_naive(),
        }
    }

    fn phone(&mut self) -> String {
        let digits: String = (0..PHONE_DIGITS)
            .map(|_| char::from(b'0' + self.rng.gen_range(0..10u8)))
            .collect();
        format!("{}{}", self.profile.phone_prefix, digits)
    }

    fn date_of_birth(&mut self) -> NaiveDate {
        let min_days = MIN_AGE_YEARS * 365;
        let max_days = MAX_AGE_YEARS * 365;
        let age_days = self.rng.gen_range(min_days..=max_days);
        self.today
            .checked_sub_days(Days::new(age_days))
            .unwrap_or(self.today)
    }
}

impl IdentitySource for FakeIdentitySource {
    fn generate(&mut self) -> SyntheticIdentity {
        let rng = &mut self.rng;

        let base: String = Username().fake_with_rng(rng);
        let suffix: u32 = rng.gen_range(0..1000);
        let username = format!("{}{}", base.to_lowercase(), suffix);

        let email: String = SafeEmail().fake_with_rng(rng);
        let password: String = Password(PASSWORD_LEN..PASSWORD_LEN + 1).fake_with_rng(rng);
        let first_name: String = FirstName().fake_with_rng(rng);
        let last_name: String = LastName().fake_with_rng(rng);
        let number: String = BuildingNumber().fake_with_rng(rng);
        let street: String = StreetName().fake_with_rng(rng);
        let city: String = CityName().fake_with_rng(rng);

        let phone = self.phone();
        let date_of_birth = self.date_of_birth();

        SyntheticIdentity {
            username,
            email: email.to_lowercase(),
            password,
            full_name: format!("{} {}", first_name, last_name),
            first_name,
            last_name,
            phone,
            date_of_birth,
            address: format!("{} {}", number, street),
            city,
            country: self.profile.country.clone(),
        }
    }
}
