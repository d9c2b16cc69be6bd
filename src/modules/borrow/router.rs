use axum::{
    Router,
    routing::{post, put},
};

use crate::state::AppState;

use super::controller::{borrow_book, extend_loan, return_book};

pub fn init_borrow_router() -> Router<AppState> {
    Router::new()
        .route("/", post(borrow_book))
        .route("/extend", put(extend_loan))
        .route("/return", put(return_book))
}
