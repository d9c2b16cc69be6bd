//! Catalog models and DTOs.

use std::borrow::Cow;

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::ids::BookId;

pub const MIN_PUBLICATION_YEAR: i32 = 1900;

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub isbn: String,
    /// False exactly while the book has an active loan. Only borrowing and
    /// returning change it.
    pub available: bool,
}

/// Accepts years from 1900 up to and including the current year.
pub fn validate_publication_year(year: i32) -> Result<(), ValidationError> {
    let current = Utc::now().year();
    if (MIN_PUBLICATION_YEAR..=current).contains(&year) {
        return Ok(());
    }

    Err(ValidationError::new("year_range").with_message(Cow::Owned(format!(
        "Year must be between {} and {}",
        MIN_PUBLICATION_YEAR, current
    ))))
}

/// New books always start available.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateBookRequest {
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    #[schema(example = "The Left Hand of Darkness")]
    pub title: String,
    #[validate(length(min = 1, max = 255, message = "Author is required"))]
    #[schema(example = "Ursula K. Le Guin")]
    pub author: String,
    #[validate(custom(function = "validate_publication_year"))]
    #[schema(example = 1969)]
    pub year: i32,
    #[validate(length(min = 7, max = 13, message = "ISBN must be between 7 and 13 characters"))]
    #[schema(example = "9780441478125")]
    pub isbn: String,
}

/// Partial update; absent fields keep their stored value.
#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateBookRequest {
    #[validate(length(min = 1, max = 255, message = "Title cannot be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Author cannot be empty"))]
    pub author: Option<String>,
    #[validate(custom(function = "validate_publication_year"))]
    pub year: Option<i32>,
    #[validate(length(min = 7, max = 13, message = "ISBN must be between 7 and 13 characters"))]
    pub isbn: Option<String>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct BookResponse {
    pub message: String,
    pub book: Book,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct BookEnvelope {
    pub book: Book,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct BookListResponse {
    pub books: Vec<Book>,
}
