//! Contact-form validation.
//!
//! Pure predicates over raw input. [`validate_contact`] reports every field
//! that fails; an empty [`FieldErrors`] means the form is valid.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});
static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("valid phone regex"));
static ZIP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{5}$").expect("valid zip regex"));

pub fn is_valid_email(input: &str) -> bool {
    EMAIL.is_match(input)
}

/// Exactly ten ASCII digits.
pub fn is_valid_phone(input: &str) -> bool {
    PHONE.is_match(input)
}

/// Exactly five ASCII digits.
pub fn is_valid_zip(input: &str) -> bool {
    ZIP.is_match(input)
}

fn is_present(input: &str) -> bool {
    !input.trim().is_empty()
}

/// A contact-form field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Email,
    FirstName,
    LastName,
    Country,
    Phone,
    ZipCode,
}

impl Field {
    /// Wire name, matching the completion payload keys.
    pub fn name(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Country => "country",
            Self::Phone => "phone",
            Self::ZipCode => "zipCode",
        }
    }

    /// Inline message shown next to the field.
    pub fn message(self) -> &'static str {
        match self {
            Self::Email => "Please enter a valid email address",
            Self::FirstName => "First name is required",
            Self::LastName => "Last name is required",
            Self::Country => "Country is required",
            Self::Phone => "Please enter a valid 10-digit phone number",
            Self::ZipCode => "Please enter a valid 5-digit ZIP code",
        }
    }
}

/// Raw contact-form input.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactForm {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub country: String,
    pub phone: String,
    pub zip_code: String,
}

impl ContactForm {
    /// An empty form with the country pre-selected.
    pub fn with_country(country: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            ..Default::default()
        }
    }
}

/// The set of fields that failed validation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeSet<Field>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<Field> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(Field::name).collect();
        f.write_str(&names.join(", "))
    }
}

/// Validate every contact field, returning those that fail.
pub fn validate_contact(form: &ContactForm) -> FieldErrors {
    let checks = [
        (Field::Email, is_valid_email(&form.email)),
        (Field::FirstName, is_present(&form.first_name)),
        (Field::LastName, is_present(&form.last_name)),
        (Field::Country, is_present(&form.country)),
        (Field::Phone, is_valid_phone(&form.phone)),
        (Field::ZipCode, is_valid_zip(&form.zip_code)),
    ];
    checks
        .into_iter()
        .filter_map(|(field, ok)| (!ok).then_some(field))
        .collect()
}
