use crate::todo::api::{ErrorMessage, ToDoJson, ToDoPageJson, ToDoRequest, ToDoUpdateRequest};
use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI description of the JSON endpoints.
#[derive(OpenApi)]
#[openapi(
    info(title = "API", version = "1.0"),
    paths(
        crate::todo::api::list_to_dos_handler,
        crate::todo::api::get_to_do_handler,
        crate::todo::api::create_to_do_handler,
        crate::todo::api::update_to_do_handler,
        crate::todo::api::delete_to_do_handler
    ),
    components(schemas(
        ToDoJson,
        ToDoPageJson,
        ToDoRequest,
        ToDoUpdateRequest,
        ErrorMessage
    )),
    tags((name = "ToDo", description = "Create, list, fetch, update and delete to-dos"))
)]
pub struct ApiDoc;

/// Serves the OpenAPI document and a Swagger UI that renders it.
pub fn create_docs_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
