//! Book model

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{Author, AuthorView, Document, Genre, GenreView};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct BookFields {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub summary: String,
    #[validate(length(min = 1))]
    pub isbn: String,
    /// Required reference to an author
    pub author: Uuid,
    /// At most one genre
    #[serde(default)]
    pub genre: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub isbn: String,
    pub author: Uuid,
    pub genre: Option<Uuid>,
}

impl Document for Book {
    const COLLECTION: &'static str = "books";
    type Fields = BookFields;

    fn from_parts(id: Uuid, fields: BookFields) -> Self {
        Self {
            id,
            title: fields.title,
            summary: fields.summary,
            isbn: fields.isbn,
            author: fields.author,
            genre: fields.genre,
        }
    }

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Book {
    pub fn url(&self) -> String {
        format!("/catalog/book/{}", self.id)
    }

    pub fn fields(&self) -> BookFields {
        BookFields {
            title: self.title.clone(),
            summary: self.summary.clone(),
            isbn: self.isbn.clone(),
            author: self.author,
            genre: self.genre,
        }
    }

    pub fn view(&self) -> BookView {
        PopulatedBook::bare(self.clone()).view()
    }
}

/// A book with whichever references were requested resolved
#[derive(Debug, Clone, PartialEq)]
pub struct PopulatedBook {
    pub book: Book,
    pub author: Option<Author>,
    pub genre: Option<Genre>,
}

impl PopulatedBook {
    pub fn bare(book: Book) -> Self {
        Self {
            book,
            author: None,
            genre: None,
        }
    }

    pub fn view(&self) -> BookView {
        BookView {
            url: self.book.url(),
            book: self.book.clone(),
            author: self.author.as_ref().map(Author::view),
            genre: self.genre.as_ref().map(Genre::view),
        }
    }
}

/// Book plus derived values; populated references render as `author_ref`/`genre_ref`
#[derive(Debug, Clone, Serialize)]
pub struct BookView {
    #[serde(flatten)]
    pub book: Book,
    pub url: String,
    #[serde(rename = "author_ref")]
    pub author: Option<AuthorView>,
    #[serde(rename = "genre_ref")]
    pub genre: Option<GenreView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> Book {
        Book {
            id: Uuid::new_v4(),
            title: "The Name of the Wind".to_string(),
            summary: "Kvothe tells his story.".to_string(),
            isbn: "9781473211896".to_string(),
            author: Uuid::new_v4(),
            genre: None,
        }
    }

    #[test]
    fn test_url_uses_id() {
        let b = book();
        assert_eq!(b.url(), format!("/catalog/book/{}", b.id));
    }

    #[test]
    fn test_required_fields_must_not_be_empty() {
        let mut fields = book().fields();
        assert!(fields.validate().is_ok());
        fields.title.clear();
        assert!(fields.validate().is_err());
    }

    #[test]
    fn test_view_exposes_populated_references() {
        let b = book();
        let author = Author {
            id: b.author,
            first_name: "Patrick".to_string(),
            family_name: "Rothfuss".to_string(),
            date_of_birth: None,
            date_of_death: None,
        };
        let populated = PopulatedBook {
            book: b.clone(),
            author: Some(author),
            genre: None,
        };

        let value = serde_json::to_value(populated.view()).unwrap();
        assert_eq!(value["title"], "The Name of the Wind");
        assert_eq!(value["author"], b.author.to_string());
        assert_eq!(value["author_ref"]["name"], "Rothfuss, Patrick");
        assert!(value["genre_ref"].is_null());
    }
}
