//! Book (catalog) endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{error::AppResult, models::Book, AppState};

/// Add a book by ISBN request
#[derive(Debug, Deserialize, ToSchema)]
pub struct ImportBookRequest {
    /// ISBN to look up on Open Library
    #[schema(example = "0451524934")]
    pub isbn: String,
}

/// Add a book manually request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBookRequest {
    pub title: String,
    pub author: String,
    pub isbn: String,
}

/// List all books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "All books in insertion order", body = Vec<Book>)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> Json<Vec<Book>> {
    Json(state.services.catalog.list_books().await)
}

/// Add a book by ISBN using Open Library metadata
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = ImportBookRequest,
    responses(
        (status = 201, description = "Book imported", body = Book),
        (status = 400, description = "Invalid ISBN"),
        (status = 404, description = "ISBN unknown to Open Library"),
        (status = 409, description = "Book already exists"),
        (status = 502, description = "Open Library returned an unusable response"),
        (status = 504, description = "Open Library unreachable")
    )
)]
pub async fn import_book(
    State(state): State<AppState>,
    Json(request): Json<ImportBookRequest>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let book = state.services.catalog.import_book(&request.isbn).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Add a book manually
#[utoipa::path(
    post,
    path = "/books/manual",
    tag = "books",
    request_body = CreateBookRequest,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Book already exists")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    Json(request): Json<CreateBookRequest>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let book = state
        .services
        .catalog
        .create_book(&request.title, &request.author, &request.isbn)
        .await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Get a book by ISBN
#[utoipa::path(
    get,
    path = "/books/{isbn}",
    tag = "books",
    params(
        ("isbn" = String, Path, description = "Book ISBN")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 400, description = "Invalid ISBN"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.get_book(&isbn).await?;
    Ok(Json(book))
}

/// Delete a book by ISBN
#[utoipa::path(
    delete,
    path = "/books/{isbn}",
    tag = "books",
    params(
        ("isbn" = String, Path, description = "Book ISBN")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 400, description = "Invalid ISBN"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
) -> AppResult<StatusCode> {
    state.services.catalog.delete_book(&isbn).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Search books by title, author or ISBN
#[utoipa::path(
    get,
    path = "/books/search/{query}",
    tag = "books",
    params(
        ("query" = String, Path, description = "Case-insensitive search text (max 100 characters)")
    ),
    responses(
        (status = 200, description = "Matching books", body = Vec<Book>),
        (status = 400, description = "Empty or too long query")
    )
)]
pub async fn search_books(
    State(state): State<AppState>,
    Path(query): Path<String>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.catalog.search_books(&query).await?;
    Ok(Json(books))
}
