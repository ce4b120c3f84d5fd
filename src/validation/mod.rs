//! Validation and sanitization of submitted forms
//!
//! Form bodies are collected into [`FormData`], run through an ordered list
//! of [`FieldRule`]s, and either converted into typed field structs or handed
//! back with field-level errors so the form can be shown again.

pub mod forms;
pub mod rules;

use indexmap::IndexMap;
use serde::Serialize;

pub use forms::{FormResult, Rejected};
pub use rules::{field, FieldRule};

/// Submitted form fields in arrival order. A key may carry several values
/// (multi-select inputs).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    fields: IndexMap<String, Vec<String>>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut form = Self::new();
        for (name, value) in pairs {
            form.fields.entry(name).or_default().push(value);
        }
        form
    }

    /// First value of a field, or "" when absent
    pub fn get(&self, name: &str) -> &str {
        self.fields
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn get_all(&self, name: &str) -> &[String] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.fields.insert(name.to_string(), vec![value.into()]);
    }

    pub fn set_all(&mut self, name: &str, values: Vec<String>) {
        self.fields.insert(name.to_string(), values);
    }

    /// First value of every field, for re-filling inputs
    pub fn values(&self) -> IndexMap<&str, &str> {
        self.fields
            .keys()
            .map(|name| (name.as_str(), self.get(name)))
            .collect()
    }
}

impl Serialize for FormData {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.values().serialize(serializer)
    }
}

/// One failed check on one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    /// The value as it stood when the check ran
    pub value: String,
}

/// Field errors in the order the rules produced them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: &str, value: &str) {
        self.0.push(FieldError {
            field: field.to_string(),
            message: message.to_string(),
            value: value.to_string(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.message.as_str()).collect()
    }

    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldError> + 'a {
        self.0.iter().filter(move |e| e.field == field)
    }
}

/// Outcome of running a rule set over a form
#[derive(Debug, Clone)]
pub struct Validated {
    /// Sanitized values
    pub form: FormData,
    pub errors: ValidationErrors,
}

/// Apply every rule in order to the submitted form
pub fn validate(rules: &[FieldRule], form: FormData) -> Validated {
    let mut form = form;
    let mut errors = ValidationErrors::new();

    for rule in rules {
        let values = rule.apply(form.get_all(rule.name()), &mut errors);
        form.set_all(rule.name(), values);
    }

    Validated { form, errors }
}
