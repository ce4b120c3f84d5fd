//! Server-rendered HTML views
//!
//! Templates are compiled into the binary and registered once at startup.
//! Automatic escaping is off: user input is escaped when a form is
//! sanitized, so stored values are already safe to emit. Anything that did
//! not pass through a form (error messages) is escaped in the template.

use axum::response::Html;
use tera::{Context, Tera};

use crate::error::AppResult;

const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("templates/layout.html")),
    ("index.html", include_str!("templates/index.html")),
    ("error.html", include_str!("templates/error.html")),
    ("form_errors.html", include_str!("templates/form_errors.html")),
    ("author_list.html", include_str!("templates/author_list.html")),
    ("author_detail.html", include_str!("templates/author_detail.html")),
    ("author_form.html", include_str!("templates/author_form.html")),
    ("author_delete.html", include_str!("templates/author_delete.html")),
    ("genre_list.html", include_str!("templates/genre_list.html")),
    ("genre_detail.html", include_str!("templates/genre_detail.html")),
    ("genre_form.html", include_str!("templates/genre_form.html")),
    ("genre_delete.html", include_str!("templates/genre_delete.html")),
    ("book_list.html", include_str!("templates/book_list.html")),
    ("book_detail.html", include_str!("templates/book_detail.html")),
    ("book_form.html", include_str!("templates/book_form.html")),
    ("book_delete.html", include_str!("templates/book_delete.html")),
    ("bookinstance_list.html", include_str!("templates/bookinstance_list.html")),
    ("bookinstance_detail.html", include_str!("templates/bookinstance_detail.html")),
    ("bookinstance_form.html", include_str!("templates/bookinstance_form.html")),
    ("bookinstance_delete.html", include_str!("templates/bookinstance_delete.html")),
];

/// Compiled template set
pub struct Views {
    tera: Tera,
}

impl Views {
    pub fn new() -> AppResult<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.iter().copied())?;
        tera.autoescape_on(vec![]);
        Ok(Self { tera })
    }

    pub fn render(&self, name: &str, context: &Context) -> AppResult<Html<String>> {
        Ok(Html(self.tera.render(name, context)?))
    }
}
