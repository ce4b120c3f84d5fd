//! Book instance (physical copy) model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{Book, BookView, Document};

/// Short date-time style, e.g. "6/1/2024, 3:04 PM"
const DATETIME_SHORT: &str = "%-m/%-d/%Y, %-I:%M %p";

/// Circulation status of a copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BookInstanceStatus {
    Available,
    #[default]
    Maintenance,
    Loaned,
    Reserved,
}

impl BookInstanceStatus {
    pub const ALL: [BookInstanceStatus; 4] = [
        BookInstanceStatus::Available,
        BookInstanceStatus::Maintenance,
        BookInstanceStatus::Loaned,
        BookInstanceStatus::Reserved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookInstanceStatus::Available => "Available",
            BookInstanceStatus::Maintenance => "Maintenance",
            BookInstanceStatus::Loaned => "Loaned",
            BookInstanceStatus::Reserved => "Reserved",
        }
    }
}

impl fmt::Display for BookInstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookInstanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown book instance status: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct BookInstanceFields {
    /// Required reference to the book this is a copy of
    pub book: Uuid,
    #[validate(length(min = 1))]
    pub imprint: String,
    #[serde(default)]
    pub status: BookInstanceStatus,
    /// Filled with the repository default when not supplied
    #[serde(default)]
    pub due_back: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookInstance {
    pub id: Uuid,
    pub book: Uuid,
    pub imprint: String,
    pub status: BookInstanceStatus,
    pub due_back: DateTime<Utc>,
}

impl Document for BookInstance {
    const COLLECTION: &'static str = "bookinstances";
    type Fields = BookInstanceFields;

    fn from_parts(id: Uuid, fields: BookInstanceFields) -> Self {
        Self {
            id,
            book: fields.book,
            imprint: fields.imprint,
            status: fields.status,
            due_back: fields.due_back.unwrap_or_default(),
        }
    }

    fn id(&self) -> Uuid {
        self.id
    }
}

impl BookInstance {
    pub fn url(&self) -> String {
        format!("/catalog/bookinstance/{}", self.id)
    }

    pub fn due_back_formatted(&self) -> String {
        self.due_back.format(DATETIME_SHORT).to_string()
    }

    /// Due date as an `<input type="date">` value
    pub fn due_back_form(&self) -> String {
        self.due_back.format("%Y-%m-%d").to_string()
    }

    pub fn fields(&self) -> BookInstanceFields {
        BookInstanceFields {
            book: self.book,
            imprint: self.imprint.clone(),
            status: self.status,
            due_back: Some(self.due_back),
        }
    }

    pub fn view(&self) -> BookInstanceView {
        PopulatedBookInstance::bare(self.clone()).view()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PopulatedBookInstance {
    pub instance: BookInstance,
    pub book: Option<Book>,
}

impl PopulatedBookInstance {
    pub fn bare(instance: BookInstance) -> Self {
        Self {
            instance,
            book: None,
        }
    }

    pub fn view(&self) -> BookInstanceView {
        BookInstanceView {
            url: self.instance.url(),
            due_back_formatted: self.instance.due_back_formatted(),
            due_back_form: self.instance.due_back_form(),
            instance: self.instance.clone(),
            book: self.book.as_ref().map(Book::view),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BookInstanceView {
    #[serde(flatten)]
    pub instance: BookInstance,
    pub url: String,
    pub due_back_formatted: String,
    pub due_back_form: String,
    #[serde(rename = "book_ref")]
    pub book: Option<BookView>,
}
