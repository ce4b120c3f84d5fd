//! Field rules: chains of sanitizers and checks
//!
//! A rule is declared once per field, e.g.
//! `field("name").trim().min_length(3, "...").escape()`. Steps run in
//! declaration order against the current value. Every failing check records
//! its own message. Checks other than `min_length` pass on an empty value,
//! so an optional field is simply one without a minimum length.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;
use validator::ValidateLength;

use super::ValidationErrors;

static ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]+$").expect("alphanumeric pattern is valid"));

#[derive(Debug, Clone)]
enum Check {
    MinLength(u64),
    MaxLength(u64),
    Alphanumeric,
    IsoDate,
    OneOf(&'static [&'static str]),
    Id,
}

impl Check {
    fn passes(&self, value: &str) -> bool {
        match self {
            Check::MinLength(min) => value.validate_length(Some(*min), None, None),
            _ if value.is_empty() => true,
            Check::MaxLength(max) => value.validate_length(None, Some(*max), None),
            Check::Alphanumeric => ALPHANUMERIC.is_match(value),
            Check::IsoDate => parse_iso8601(value).is_some(),
            Check::OneOf(allowed) => allowed.contains(&value),
            Check::Id => Uuid::parse_str(value).is_ok(),
        }
    }
}

#[derive(Debug, Clone)]
enum Step {
    Trim,
    Escape,
    Check(Check, String),
}

/// Declared handling of one form field
#[derive(Debug, Clone)]
pub struct FieldRule {
    name: &'static str,
    list: bool,
    max_items: Option<(usize, String)>,
    steps: Vec<Step>,
}

/// Start a rule for the named field
pub fn field(name: &'static str) -> FieldRule {
    FieldRule {
        name,
        list: false,
        max_items: None,
        steps: Vec::new(),
    }
}

impl FieldRule {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Treat the field as a list: absent means empty, a scalar becomes a
    /// one-element list, and every value goes through the chain.
    pub fn list(mut self) -> Self {
        self.list = true;
        self
    }

    pub fn max_items(mut self, max: usize, message: &str) -> Self {
        self.max_items = Some((max, message.to_string()));
        self
    }

    pub fn trim(mut self) -> Self {
        self.steps.push(Step::Trim);
        self
    }

    /// Replace markup-sensitive characters with HTML entities
    pub fn escape(mut self) -> Self {
        self.steps.push(Step::Escape);
        self
    }

    pub fn min_length(self, min: u64, message: &str) -> Self {
        self.check(Check::MinLength(min), message)
    }

    pub fn max_length(self, max: u64, message: &str) -> Self {
        self.check(Check::MaxLength(max), message)
    }

    pub fn alphanumeric(self, message: &str) -> Self {
        self.check(Check::Alphanumeric, message)
    }

    pub fn iso_date(self, message: &str) -> Self {
        self.check(Check::IsoDate, message)
    }

    pub fn one_of(self, allowed: &'static [&'static str], message: &str) -> Self {
        self.check(Check::OneOf(allowed), message)
    }

    /// Value must be a well-formed record id
    pub fn id(self, message: &str) -> Self {
        self.check(Check::Id, message)
    }

    fn check(mut self, check: Check, message: &str) -> Self {
        self.steps.push(Step::Check(check, message.to_string()));
        self
    }

    /// Run the chain over the submitted values, returning sanitized values
    pub(crate) fn apply(&self, submitted: &[String], errors: &mut ValidationErrors) -> Vec<String> {
        let mut values = submitted.to_vec();
        if !self.list {
            values.truncate(1);
            if values.is_empty() {
                values.push(String::new());
            }
        }

        if let Some((max, message)) = &self.max_items {
            if values.len() > *max {
                errors.push(self.name, message, &values.join(","));
            }
        }

        for value in values.iter_mut() {
            for step in &self.steps {
                match step {
                    Step::Trim => *value = value.trim().to_string(),
                    Step::Escape => *value = escape(value),
                    Step::Check(check, message) => {
                        if !check.passes(value) {
                            errors.push(self.name, message, value);
                        }
                    }
                }
            }
        }

        values
    }
}

/// HTML-escape markup-sensitive characters, backticks included
pub fn escape(value: &str) -> String {
    tera::escape_html(value).replace('`', "&#96;")
}

/// Parse an ISO-8601 date or date-time. Dates without a time are midnight
/// UTC; date-times without an offset are taken as UTC.
pub fn parse_iso8601(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
