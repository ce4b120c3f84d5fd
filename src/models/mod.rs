//! Data models for the catalog
//!
//! Each entity comes as a stored record (`Author`), the field set that is
//! validated and persisted (`AuthorFields`), and a view that adds the
//! derived display values templates need (`AuthorView`).

pub mod author;
pub mod book;
pub mod book_instance;
pub mod genre;

use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;
use validator::Validate;

pub use author::{Author, AuthorFields, AuthorView};
pub use book::{Book, BookFields, BookView, PopulatedBook};
pub use book_instance::{
    BookInstance, BookInstanceFields, BookInstanceStatus, BookInstanceView, PopulatedBookInstance,
};
pub use genre::{Genre, GenreFields, GenreView};

/// A record kept as a document in a named collection
pub trait Document: Sized {
    const COLLECTION: &'static str;

    /// Persisted fields, without the id
    type Fields: Serialize + DeserializeOwned + Validate + Send + Sync;

    fn from_parts(id: Uuid, fields: Self::Fields) -> Self;

    fn id(&self) -> Uuid;
}
