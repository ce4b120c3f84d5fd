//! Rule sets for the catalog forms and conversion into persisted fields

use chrono::NaiveDate;
use uuid::Uuid;

use super::{field, rules::parse_iso8601, validate, FieldRule, FormData, ValidationErrors};
use crate::models::{
    Author, AuthorFields, Book, BookFields, BookInstance, BookInstanceFields, BookInstanceStatus,
    Genre, GenreFields,
};

const STATUSES: &[&str] = &["Available", "Maintenance", "Loaned", "Reserved"];

/// A submission that failed validation, with its sanitized values for re-display
#[derive(Debug, Clone)]
pub struct Rejected {
    pub form: FormData,
    pub errors: ValidationErrors,
}

pub type FormResult<T> = Result<T, Rejected>;

fn run(rules: &[FieldRule], form: FormData) -> FormResult<FormData> {
    let validated = validate(rules, form);
    if validated.errors.is_empty() {
        Ok(validated.form)
    } else {
        Err(Rejected {
            form: validated.form,
            errors: validated.errors,
        })
    }
}

/// Conversion after a passing rule set; a value the rules let through but
/// that still fails to convert is reported against its field.
fn reject(form: FormData, name: &str, message: &str) -> Rejected {
    let mut errors = ValidationErrors::new();
    errors.push(name, message, form.get(name));
    Rejected { form, errors }
}

fn optional_date(form: &FormData, name: &str) -> Result<Option<NaiveDate>, ()> {
    match form.get(name) {
        "" => Ok(None),
        value => parse_iso8601(value).map(|dt| Some(dt.date_naive())).ok_or(()),
    }
}

fn author_rules() -> Vec<FieldRule> {
    vec![
        field("first_name")
            .trim()
            .min_length(1, "First name must be specified.")
            .escape()
            .max_length(100, "First name must be at most 100 characters.")
            .alphanumeric("First name has non-alphanumeric characters."),
        field("family_name")
            .trim()
            .min_length(1, "Family name must be specified.")
            .escape()
            .max_length(100, "Family name must be at most 100 characters.")
            .alphanumeric("Family name has non-alphanumeric characters."),
        field("date_of_birth")
            .trim()
            .escape()
            .iso_date("Invalid date of birth"),
        field("date_of_death")
            .trim()
            .escape()
            .iso_date("Invalid date of death"),
    ]
}

pub fn author(form: FormData) -> FormResult<AuthorFields> {
    let form = run(&author_rules(), form)?;

    let Ok(date_of_birth) = optional_date(&form, "date_of_birth") else {
        return Err(reject(form, "date_of_birth", "Invalid date of birth"));
    };
    let Ok(date_of_death) = optional_date(&form, "date_of_death") else {
        return Err(reject(form, "date_of_death", "Invalid date of death"));
    };

    Ok(AuthorFields {
        first_name: form.get("first_name").to_string(),
        family_name: form.get("family_name").to_string(),
        date_of_birth,
        date_of_death,
    })
}

fn genre_rules() -> Vec<FieldRule> {
    vec![field("name")
        .trim()
        .min_length(3, "Genre name must contain at least 3 characters")
        .escape()
        .max_length(100, "Genre name must be at most 100 characters.")]
}

pub fn genre(form: FormData) -> FormResult<GenreFields> {
    let form = run(&genre_rules(), form)?;
    Ok(GenreFields {
        name: form.get("name").to_string(),
    })
}

fn book_rules() -> Vec<FieldRule> {
    vec![
        field("title")
            .trim()
            .min_length(1, "Title must not be empty.")
            .escape(),
        field("author")
            .trim()
            .min_length(1, "Author must not be empty.")
            .escape()
            .id("Invalid author."),
        field("summary")
            .trim()
            .min_length(1, "Summary must not be empty.")
            .escape(),
        field("isbn")
            .trim()
            .min_length(1, "ISBN must not be empty.")
            .escape(),
        field("genre")
            .list()
            .max_items(1, "A book can belong to at most one genre.")
            .trim()
            .escape()
            .id("Invalid genre."),
    ]
}

pub fn book(form: FormData) -> FormResult<BookFields> {
    let form = run(&book_rules(), form)?;

    let Ok(author) = Uuid::parse_str(form.get("author")) else {
        return Err(reject(form, "author", "Invalid author."));
    };
    let genre = match form.get_all("genre").first() {
        None => None,
        Some(value) if value.is_empty() => None,
        Some(value) => match Uuid::parse_str(value) {
            Ok(id) => Some(id),
            Err(_) => return Err(reject(form, "genre", "Invalid genre.")),
        },
    };

    Ok(BookFields {
        title: form.get("title").to_string(),
        summary: form.get("summary").to_string(),
        isbn: form.get("isbn").to_string(),
        author,
        genre,
    })
}

fn book_instance_rules() -> Vec<FieldRule> {
    vec![
        field("book")
            .trim()
            .min_length(1, "Book must be specified")
            .escape()
            .id("Invalid book."),
        field("imprint")
            .trim()
            .min_length(1, "Imprint must be specified")
            .escape(),
        field("status")
            .trim()
            .escape()
            .one_of(STATUSES, "Invalid status"),
        field("due_back")
            .trim()
            .escape()
            .iso_date("Invalid due back date"),
    ]
}

pub fn book_instance(form: FormData) -> FormResult<BookInstanceFields> {
    let form = run(&book_instance_rules(), form)?;

    let Ok(book) = Uuid::parse_str(form.get("book")) else {
        return Err(reject(form, "book", "Invalid book."));
    };
    let status = match form.get("status") {
        "" => BookInstanceStatus::default(),
        value => match value.parse() {
            Ok(status) => status,
            Err(_) => return Err(reject(form, "status", "Invalid status")),
        },
    };
    let due_back = match form.get("due_back") {
        "" => None,
        value => match parse_iso8601(value) {
            Some(dt) => Some(dt),
            None => return Err(reject(form, "due_back", "Invalid due back date")),
        },
    };

    Ok(BookInstanceFields {
        book,
        imprint: form.get("imprint").to_string(),
        status,
        due_back,
    })
}

impl From<&Author> for FormData {
    fn from(author: &Author) -> Self {
        let mut form = FormData::new();
        form.set("first_name", author.first_name.as_str());
        form.set("family_name", author.family_name.as_str());
        form.set("date_of_birth", author.date_of_birth_form());
        form.set("date_of_death", author.date_of_death_form());
        form
    }
}

impl From<&Genre> for FormData {
    fn from(genre: &Genre) -> Self {
        let mut form = FormData::new();
        form.set("name", genre.name.as_str());
        form
    }
}

impl From<&Book> for FormData {
    fn from(book: &Book) -> Self {
        let mut form = FormData::new();
        form.set("title", book.title.as_str());
        form.set("author", book.author.to_string());
        form.set("summary", book.summary.as_str());
        form.set("isbn", book.isbn.as_str());
        form.set_all("genre", book.genre.iter().map(Uuid::to_string).collect());
        form
    }
}

impl From<&BookInstance> for FormData {
    fn from(instance: &BookInstance) -> Self {
        let mut form = FormData::new();
        form.set("book", instance.book.to_string());
        form.set("imprint", instance.imprint.as_str());
        form.set("status", instance.status.as_str());
        form.set("due_back", instance.due_back_form());
        form
    }
}
