use axum::Router;
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::todo::api::{ToDoState, create_api_router};
use crate::todo::{SeaOrmToDoRepository, ToDoService};

pub mod api;

/// Wires repository, service and routes together on top of a database connection.
pub fn create_app(db: DatabaseConnection) -> Router {
    let repository = Arc::new(SeaOrmToDoRepository::new(db));
    let service = ToDoService::new(repository);
    let to_do_state = Arc::new(ToDoState::new(service));

    Router::new()
        .route("/health", axum::routing::get(health_check_handler))
        .merge(create_api_router(to_do_state))
        .merge(api::create_docs_router())
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: Config) -> anyhow::Result<()> {
    let server_address = format!("0.0.0.0:{}", &config.port);
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("Web server running on http://{}", server_address);

    let db = Database::connect(&config.db_url).await?;
    migration::Migrator::up(&db, None).await?;
    tracing::info!("Database migrations applied successfully");

    let app = create_app(db);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tracing::instrument]
pub async fn health_check_handler() -> &'static str {
    "OK"
}
