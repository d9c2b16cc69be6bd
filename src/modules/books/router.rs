use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

use super::controller::{create_book, delete_book, get_book, list_books, update_book};

pub fn init_books_router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_book))
        .route("/update/{id}", put(update_book))
        .route("/delete/{id}", delete(delete_book))
        .route("/get/{id}", get(get_book))
        .route("/list", get(list_books))
}
