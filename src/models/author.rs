//! Author model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::Document;

/// Medium date style, e.g. "Jun 6, 1973"
const DATE_MED: &str = "%b %-d, %Y";

/// Stored author fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AuthorFields {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub family_name: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub date_of_death: Option<NaiveDate>,
}

/// Author record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Author {
    pub id: Uuid,
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl Document for Author {
    const COLLECTION: &'static str = "authors";
    type Fields = AuthorFields;

    fn from_parts(id: Uuid, fields: AuthorFields) -> Self {
        Self {
            id,
            first_name: fields.first_name,
            family_name: fields.family_name,
            date_of_birth: fields.date_of_birth,
            date_of_death: fields.date_of_death,
        }
    }

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Author {
    /// "Family, First", or a placeholder when either part is missing
    pub fn name(&self) -> String {
        if self.first_name.is_empty() || self.family_name.is_empty() {
            "unnamed author".to_string()
        } else {
            format!("{}, {}", self.family_name, self.first_name)
        }
    }

    pub fn url(&self) -> String {
        format!("/catalog/author/{}", self.id)
    }

    pub fn lifespan(&self) -> String {
        match self.date_of_birth {
            Some(born) => {
                let died = self
                    .date_of_death
                    .map(|d| d.format(DATE_MED).to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                format!("{} - {}", born.format(DATE_MED), died)
            }
            None => "unknown lifespan".to_string(),
        }
    }

    /// Date of birth as an `<input type="date">` value
    pub fn date_of_birth_form(&self) -> String {
        iso_date(self.date_of_birth)
    }

    pub fn date_of_death_form(&self) -> String {
        iso_date(self.date_of_death)
    }

    pub fn fields(&self) -> AuthorFields {
        AuthorFields {
            first_name: self.first_name.clone(),
            family_name: self.family_name.clone(),
            date_of_birth: self.date_of_birth,
            date_of_death: self.date_of_death,
        }
    }

    pub fn view(&self) -> AuthorView {
        AuthorView {
            name: self.name(),
            url: self.url(),
            lifespan: self.lifespan(),
            date_of_birth_form: self.date_of_birth_form(),
            date_of_death_form: self.date_of_death_form(),
            author: self.clone(),
        }
    }
}

fn iso_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Author plus derived display values
#[derive(Debug, Clone, Serialize)]
pub struct AuthorView {
    #[serde(flatten)]
    pub author: Author,
    pub name: String,
    pub url: String,
    pub lifespan: String,
    pub date_of_birth_form: String,
    pub date_of_death_form: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author(first: &str, family: &str) -> Author {
        Author {
            id: Uuid::new_v4(),
            first_name: first.to_string(),
            family_name: family.to_string(),
            date_of_birth: None,
            date_of_death: None,
        }
    }

    #[test]
    fn test_name_is_family_then_first() {
        assert_eq!(author("Isaac", "Asimov").name(), "Asimov, Isaac");
    }

    #[test]
    fn test_name_falls_back_when_incomplete() {
        assert_eq!(author("", "Asimov").name(), "unnamed author");
        assert_eq!(author("Isaac", "").name(), "unnamed author");
    }

    #[test]
    fn test_url_uses_id() {
        let a = author("Ben", "Bova");
        assert_eq!(a.url(), format!("/catalog/author/{}", a.id));
    }

    #[test]
    fn test_lifespan_formats() {
        let mut a = author("Isaac", "Asimov");
        assert_eq!(a.lifespan(), "unknown lifespan");

        a.date_of_birth = NaiveDate::from_ymd_opt(1920, 1, 2);
        assert_eq!(a.lifespan(), "Jan 2, 1920 - unknown");

        a.date_of_death = NaiveDate::from_ymd_opt(1992, 4, 6);
        assert_eq!(a.lifespan(), "Jan 2, 1920 - Apr 6, 1992");
    }

    #[test]
    fn test_form_dates() {
        let mut a = author("Patrick", "Rothfuss");
        assert_eq!(a.date_of_birth_form(), "");
        a.date_of_birth = NaiveDate::from_ymd_opt(1973, 6, 6);
        assert_eq!(a.date_of_birth_form(), "1973-06-06");
    }

    #[test]
    fn test_fields_enforce_length_bounds() {
        let mut fields = author("Jim", "Jones").fields();
        assert!(fields.validate().is_ok());

        fields.family_name = "x".repeat(101);
        assert!(fields.validate().is_err());

        fields.family_name = String::new();
        assert!(fields.validate().is_err());
    }

    #[test]
    fn test_view_serializes_derived_fields() {
        let a = author("Bob", "Billings");
        let value = serde_json::to_value(a.view()).unwrap();
        assert_eq!(value["name"], "Billings, Bob");
        assert_eq!(value["first_name"], "Bob");
        assert_eq!(value["url"], a.url());
        assert_eq!(value["lifespan"], "unknown lifespan");
    }
}
