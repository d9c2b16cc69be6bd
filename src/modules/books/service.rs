use sqlx::PgPool;
use tracing::instrument;

use shelfwise_core::AppError;
use shelfwise_models::{Book, BookId, CreateBookRequest, UpdateBookRequest};

const BOOK_COLUMNS: &str = "id, title, author, year, isbn, available";

fn duplicate_isbn() -> AppError {
    AppError::conflict("A book with this ISBN already exists".to_string())
}

fn book_not_found() -> AppError {
    AppError::not_found(anyhow::anyhow!("Book not found"))
}

fn map_write_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_unique_violation()
    {
        return duplicate_isbn();
    }
    AppError::from(e)
}

pub struct BookService;

impl BookService {
    /// Whether `isbn` is used by a book other than `except`.
    #[instrument(skip(db))]
    pub async fn isbn_taken(
        db: &PgPool,
        isbn: &str,
        except: Option<BookId>,
    ) -> Result<bool, AppError> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(isbn)
        .bind(except)
        .fetch_one(db)
        .await?;

        Ok(taken)
    }

    /// Inserts a new catalog entry. The book always starts available.
    ///
    /// # Arguments
    ///
    /// * `db` - Database pool
    /// * `dto` - Validated title, author, year and ISBN
    ///
    /// # Errors
    ///
    /// * `409 Conflict` if another book already has this ISBN, including a
    ///   concurrent insert caught by the unique index
    /// * `500 Internal Server Error` on database failure
    #[instrument(skip(db))]
    pub async fn create_book(db: &PgPool, dto: CreateBookRequest) -> Result<Book, AppError> {
        if Self::isbn_taken(db, &dto.isbn, None).await? {
            return Err(duplicate_isbn());
        }

        let book = sqlx::query_as::<_, Book>(&format!(
            "INSERT INTO books (title, author, year, isbn, available)
             VALUES ($1, $2, $3, $4, TRUE)
             RETURNING {BOOK_COLUMNS}"
        ))
        .bind(&dto.title)
        .bind(&dto.author)
        .bind(dto.year)
        .bind(&dto.isbn)
        .fetch_one(db)
        .await
        .map_err(map_write_error)?;

        tracing::info!(book_id = %book.id, "Book created");
        Ok(book)
    }

    /// Applies a partial update. Absent fields keep their stored value and
    /// `available` is never touched here.
    ///
    /// # Errors
    ///
    /// * `404 Not Found` if no book has this id
    /// * `409 Conflict` if the new ISBN belongs to another book
    #[instrument(skip(db))]
    pub async fn update_book(
        db: &PgPool,
        id: BookId,
        dto: UpdateBookRequest,
    ) -> Result<Book, AppError> {
        if let Some(isbn) = &dto.isbn
            && Self::isbn_taken(db, isbn, Some(id)).await?
        {
            return Err(duplicate_isbn());
        }

        sqlx::query_as::<_, Book>(&format!(
            "UPDATE books
             SET title = COALESCE($2, title),
                 author = COALESCE($3, author),
                 year = COALESCE($4, year),
                 isbn = COALESCE($5, isbn)
             WHERE id = $1
             RETURNING {BOOK_COLUMNS}"
        ))
        .bind(id)
        .bind(&dto.title)
        .bind(&dto.author)
        .bind(dto.year)
        .bind(&dto.isbn)
        .fetch_optional(db)
        .await
        .map_err(map_write_error)?
        .ok_or_else(book_not_found)
    }

    /// Removes a book and returns the deleted row.
    ///
    /// # Errors
    ///
    /// Returns `404 Not Found` if no book has this id.
    #[instrument(skip(db))]
    pub async fn delete_book(db: &PgPool, id: BookId) -> Result<Book, AppError> {
        sqlx::query_as::<_, Book>(&format!(
            "DELETE FROM books WHERE id = $1 RETURNING {BOOK_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(book_not_found)
    }

    #[instrument(skip(db))]
    pub async fn get_book(db: &PgPool, id: BookId) -> Result<Book, AppError> {
        sqlx::query_as::<_, Book>(&format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(book_not_found)
    }

    /// All books ordered by title.
    #[instrument(skip(db))]
    pub async fn list_books(db: &PgPool) -> Result<Vec<Book>, AppError> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books ORDER BY title, id"
        ))
        .fetch_all(db)
        .await?;

        Ok(books)
    }
}
