//! Genre model

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::Document;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct GenreFields {
    #[validate(length(min = 3, max = 100))]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Genre {
    pub id: Uuid,
    pub name: String,
}

impl Document for Genre {
    const COLLECTION: &'static str = "genres";
    type Fields = GenreFields;

    fn from_parts(id: Uuid, fields: GenreFields) -> Self {
        Self {
            id,
            name: fields.name,
        }
    }

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Genre {
    pub fn url(&self) -> String {
        format!("/catalog/genre/{}", self.id)
    }

    pub fn fields(&self) -> GenreFields {
        GenreFields {
            name: self.name.clone(),
        }
    }

    pub fn view(&self) -> GenreView {
        GenreView {
            url: self.url(),
            genre: self.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenreView {
    #[serde(flatten)]
    pub genre: Genre,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_uses_id() {
        let genre = Genre {
            id: Uuid::new_v4(),
            name: "Fantasy".to_string(),
        };
        assert_eq!(genre.url(), format!("/catalog/genre/{}", genre.id));
    }

    #[test]
    fn test_name_length_bounds() {
        let ok = GenreFields { name: "Sci".to_string() };
        assert!(ok.validate().is_ok());

        let short = GenreFields { name: "SF".to_string() };
        assert!(short.validate().is_err());

        let long = GenreFields { name: "g".repeat(101) };
        assert!(long.validate().is_err());
    }
}
