use crate::todo::{
    NOT_FOUND_MESSAGE, Page, PageRequest, ToDo, ToDoFields, ToDoService, ToDoServiceError,
};
use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr, sync::Arc};
use utoipa::ToSchema;

/// Wire format of `criadoEm`.
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const NAME_REQUIRED: &str = "Campo Nome deve ser preenchido!";
const DESCRIPTION_REQUIRED: &str = "Campo Descrição deve ser preenchido!";

/// Shared state of the to-do routes.
pub struct ToDoState {
    pub service: ToDoService,
}

impl ToDoState {
    pub fn new(service: ToDoService) -> Self {
        Self { service }
    }
}

/// JSON representation of a ToDo for API responses.
#[derive(Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ToDoJson {
    /// Unique identifier assigned on creation
    pub id: i32,
    /// Short name of the to-do
    #[serde(rename = "nome")]
    pub name: String,
    /// What has to be done
    #[serde(rename = "descricao")]
    pub description: String,
    /// Whether the to-do is done
    pub status: bool,
    /// Creation time, formatted as `yyyy-MM-dd HH:mm:ss`
    #[serde(rename = "criadoEm")]
    #[schema(example = "2025-01-15 09:30:00")]
    pub created_at: String,
}

impl From<ToDo> for ToDoJson {
    fn from(to_do: ToDo) -> Self {
        Self {
            id: to_do.id(),
            created_at: to_do.created_at().format(CREATED_AT_FORMAT).to_string(),
            name: to_do.name().to_string(),
            description: to_do.description().to_string(),
            status: to_do.status(),
        }
    }
}

/// API response for one page of to-dos.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToDoPageJson {
    /// The to-dos on this page, in insertion order
    pub content: Vec<ToDoJson>,
    /// Zero-based number of this page
    pub page_number: u64,
    /// Requested page size
    pub size: u64,
    /// Index of the first to-do of this page
    pub offset: u64,
    /// Number of to-dos across all pages
    pub total_size: u64,
    /// Number of pages
    pub total_pages: u64,
    /// Number of to-dos on this page
    pub number_of_elements: usize,
    /// Whether this page holds no to-dos
    pub empty: bool,
}

impl From<Page<ToDo>> for ToDoPageJson {
    fn from(page: Page<ToDo>) -> Self {
        let page_number = page.page_number();
        let size = page.page_size();
        let offset = page.offset();
        let total_size = page.total_count();
        let total_pages = page.total_pages();
        let content: Vec<ToDoJson> = page.into_items().into_iter().map(ToDoJson::from).collect();
        Self {
            page_number,
            size,
            offset,
            total_size,
            total_pages,
            number_of_elements: content.len(),
            empty: content.is_empty(),
            content,
        }
    }
}

/// Request body for creating a to-do.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ToDoRequest {
    /// Short name, must not be blank
    #[serde(rename = "nome", default)]
    pub name: String,
    /// Description, must not be blank
    #[serde(rename = "descricao", default)]
    pub description: String,
    /// Whether the to-do is already done
    #[serde(default)]
    pub status: bool,
}

impl ToDoRequest {
    /// Checks every field and reports all violations at once.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.name, &self.description)
    }

    /// Validates the request and converts it into the fields of a new to-do.
    pub fn into_fields(self) -> Result<ToDoFields, ValidationError> {
        self.validate()?;
        Ok(ToDoFields {
            name: self.name,
            description: self.description,
            status: self.status,
        })
    }
}

/// Request body for updating a to-do.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ToDoUpdateRequest {
    /// New name, must not be blank
    #[serde(rename = "nome", default)]
    pub name: String,
    /// New description, must not be blank
    #[serde(rename = "descricao", default)]
    pub description: String,
    /// New status
    #[serde(default)]
    pub status: bool,
}

impl ToDoUpdateRequest {
    /// Checks every field and reports all violations at once.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.name, &self.description)
    }

    /// Validates the request and converts it into the new fields of a to-do.
    pub fn into_fields(self) -> Result<ToDoFields, ValidationError> {
        self.validate()?;
        Ok(ToDoFields {
            name: self.name,
            description: self.description,
            status: self.status,
        })
    }
}

/// Every field-level violation found in a request body.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("{}", .messages.join(", "))]
pub struct ValidationError {
    messages: Vec<String>,
}

impl ValidationError {
    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

// Status has no constraint; any boolean is accepted.
fn validate_fields(name: &str, description: &str) -> Result<(), ValidationError> {
    let mut messages = Vec::new();
    if name.trim().is_empty() {
        messages.push(NAME_REQUIRED.to_string());
    }
    if description.trim().is_empty() {
        messages.push(DESCRIPTION_REQUIRED.to_string());
    }

    if messages.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { messages })
    }
}

/// Query parameters for listing to-dos.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub status: Option<bool>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub page: Option<u64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub size: Option<u64>,
}

/// Treats `?status=` the same as a missing parameter.
fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => T::from_str(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorMessage {
    /// Human-readable description of what went wrong
    pub message: String,
    /// One entry per violated field, for validation failures
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ErrorMessage {
    pub fn new(message: String) -> Self {
        Self {
            message,
            errors: Vec::new(),
        }
    }
}

/// Custom error type for to-do handler operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request body failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The body, path or query could not be parsed.
    #[error("{0}")]
    MalformedRequest(String),
    /// The service rejected or failed the operation.
    #[error(transparent)]
    Service(#[from] ToDoServiceError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::MalformedRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::MalformedRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, body) = match self {
            ApiError::Validation(error) => (
                StatusCode::BAD_REQUEST,
                ErrorMessage {
                    message: error.to_string(),
                    errors: error.messages,
                },
            ),
            ApiError::MalformedRequest(message) => {
                (StatusCode::BAD_REQUEST, ErrorMessage::new(message))
            }
            ApiError::Service(ToDoServiceError::NotFound(_)) => (
                StatusCode::NOT_FOUND,
                ErrorMessage::new(NOT_FOUND_MESSAGE.to_string()),
            ),
            ApiError::Service(err) => {
                tracing::error!("Failed to process to-do request: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorMessage::new("Internal Server Error".to_string()),
                )
            }
        };

        (status_code, Json(body)).into_response()
    }
}

/// Handler for GET /api - Returns one page of to-dos.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api",
    params(
        ("status" = Option<bool>, Query, description = "Only list to-dos with this status"),
        ("page" = Option<u64>, Query, description = "Zero-based page number"),
        ("size" = Option<u64>, Query, description = "Page size, at most 100")
    ),
    responses(
        (status = 200, description = "Successfully retrieved to-dos", body = ToDoPageJson),
        (status = 400, description = "Malformed query parameters", body = ErrorMessage),
        (status = 500, description = "Internal server error", body = ErrorMessage)
    ),
    tag = "ToDo"
)]
pub async fn list_to_dos_handler(
    State(state): State<Arc<ToDoState>>,
    WithRejection(Query(query), _): WithRejection<Query<ListQuery>, ApiError>,
) -> Result<Json<ToDoPageJson>, ApiError> {
    let page = PageRequest::new(query.page, query.size);
    let to_dos = state.service.list(query.status, page).await?;
    Ok(Json(ToDoPageJson::from(to_dos)))
}

/// Handler for GET /api/{id} - Returns a single to-do.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/{id}",
    params(("id" = i64, Path, description = "ID of the to-do")),
    responses(
        (status = 200, description = "Successfully retrieved the to-do", body = ToDoJson),
        (status = 404, description = "No to-do with this ID", body = ErrorMessage)
    ),
    tag = "ToDo"
)]
pub async fn get_to_do_handler(
    State(state): State<Arc<ToDoState>>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<Json<ToDoJson>, ApiError> {
    let to_do = state.service.get(id).await?;
    Ok(Json(ToDoJson::from(to_do)))
}

/// Handler for POST /api - Creates a to-do.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    post,
    path = "/api",
    request_body = ToDoRequest,
    responses(
        (status = 201, description = "Successfully created the to-do", body = ToDoJson),
        (status = 400, description = "Invalid request body", body = ErrorMessage)
    ),
    tag = "ToDo"
)]
pub async fn create_to_do_handler(
    State(state): State<Arc<ToDoState>>,
    WithRejection(Json(request), _): WithRejection<Json<ToDoRequest>, ApiError>,
) -> Result<(StatusCode, Json<ToDoJson>), ApiError> {
    let fields = request.into_fields()?;
    let created = state.service.create(fields).await?;
    Ok((StatusCode::CREATED, Json(ToDoJson::from(created))))
}

/// Handler for PUT /api/{id} - Updates a to-do.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    put,
    path = "/api/{id}",
    params(("id" = i64, Path, description = "ID of the to-do")),
    request_body = ToDoUpdateRequest,
    responses(
        (status = 200, description = "Successfully updated the to-do", body = ToDoJson),
        (status = 400, description = "Invalid request body", body = ErrorMessage),
        (status = 404, description = "No to-do with this ID", body = ErrorMessage)
    ),
    tag = "ToDo"
)]
pub async fn update_to_do_handler(
    State(state): State<Arc<ToDoState>>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Json(request), _): WithRejection<Json<ToDoUpdateRequest>, ApiError>,
) -> Result<Json<ToDoJson>, ApiError> {
    let fields = request.into_fields()?;
    let updated = state.service.update(id, fields).await?;
    Ok(Json(ToDoJson::from(updated)))
}

/// Handler for DELETE /api/{id} - Deletes a to-do.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/api/{id}",
    params(("id" = i64, Path, description = "ID of the to-do")),
    responses(
        (status = 204, description = "Successfully deleted the to-do"),
        (status = 404, description = "No to-do with this ID", body = ErrorMessage)
    ),
    tag = "ToDo"
)]
pub async fn delete_to_do_handler(
    State(state): State<Arc<ToDoState>>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<StatusCode, ApiError> {
    state.service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Creates and returns the to-do API router.
pub fn create_api_router(state: Arc<ToDoState>) -> Router {
    Router::new()
        .route("/api", get(list_to_dos_handler).post(create_to_do_handler))
        .route(
            "/api/{id}",
            get(get_to_do_handler)
                .put(update_to_do_handler)
                .delete(delete_to_do_handler),
        )
        .with_state(state)
}
