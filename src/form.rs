use std::collections::BTreeMap;
use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Special characters accepted by the password rule.
const PASSWORD_SPECIALS: &str = "@$!%*?&";

/// The five raw inputs collected by the signup form, exactly as typed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrationForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// One declarative validation rule. `check` runs against the whole form;
/// `message` is reported under `field` when it fails.
pub struct Rule {
    pub field: &'static str,
    pub check: fn(&RegistrationForm) -> bool,
    pub message: &'static str,
}

/// The form schema as an ordered rule table. Fields are checked
/// independently of each other; per field the first failing rule's message
/// wins.
pub const RULES: &[Rule] = &[
    Rule {
        field: "name",
        check: |f| present(&f.name),
        message: "name is a required field",
    },
    Rule {
        field: "phone",
        check: |f| present(&f.phone),
        message: "Mobile number is required",
    },
    Rule {
        field: "phone",
        check: |f| is_ten_digits(&f.phone),
        message: "Mobile number must be 10 digits and contain only numbers",
    },
    Rule {
        field: "email",
        check: |f| present(&f.email),
        message: "email is a required field",
    },
    Rule {
        field: "email",
        check: |f| is_valid_email(&f.email),
        message: "email must be a valid email",
    },
    Rule {
        field: "password",
        check: |f| present(&f.password),
        message: "Password is required",
    },
    Rule {
        field: "password",
        check: |f| f.password.chars().count() >= 8,
        message: "Password must be at least 8 characters",
    },
    Rule {
        field: "password",
        check: |f| has_required_classes(&f.password),
        message: "Password must contain at least one uppercase letter, one lowercase letter, one number, and one special character",
    },
    Rule {
        field: "confirm_password",
        check: |f| present(&f.confirm_password),
        message: "confirm password is a required field",
    },
    Rule {
        field: "confirm_password",
        check: |f| f.confirm_password == f.password,
        message: "Passwords must match",
    },
];

fn present(value: &str) -> bool {
    !value.is_empty()
}

fn is_ten_digits(value: &str) -> bool {
    lazy_static! {
        static ref PHONE_REGEX: Regex = Regex::new(r"^[0-9]{10}$").unwrap();
    }
    PHONE_REGEX.is_match(value)
}

fn is_valid_email(value: &str) -> bool {
    lazy_static! {
        static ref EMAIL_REGEX: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_REGEX.is_match(value)
}

/// At least one ASCII lowercase letter, one uppercase letter, one digit and
/// one of [`PASSWORD_SPECIALS`].
fn has_required_classes(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_lowercase())
        && value.chars().any(|c| c.is_ascii_uppercase())
        && value.chars().any(|c| c.is_ascii_digit())
        && value.chars().any(|c| PASSWORD_SPECIALS.contains(c))
}

/// Field-to-message map produced by a failed validation pass. Submission is
/// suppressed while any entry is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub BTreeMap<&'static str, &'static str>);

impl ValidationErrors {
    pub fn message_for(&self, field: &str) -> Option<&'static str> {
        self.0.get(field).copied()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        for (field, message) in &self.0 {
            write!(f, "{sep}{field}: {message}")?;
            sep = "\n";
        }
        Ok(())
    }
}

/// Checks the form against [`RULES`]. Returns the message of every failing
/// field, or `Ok(())` when the form may be submitted.
pub fn validate(form: &RegistrationForm) -> Result<(), ValidationErrors> {
    let mut errors: BTreeMap<&'static str, &'static str> = BTreeMap::new();
    for rule in RULES {
        if !errors.contains_key(rule.field) && !(rule.check)(form) {
            errors.insert(rule.field, rule.message);
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}
