#![allow(dead_code)] // each test binary uses a different subset of these helpers

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use testcontainers_modules::testcontainers::runners::AsyncRunner;
use testcontainers_modules::{postgres, testcontainers};
use todo_api::entities::to_do;
use tower::ServiceExt;

/// Connects to a fresh in-memory SQLite database with every migration applied.
pub async fn setup_db() -> anyhow::Result<DatabaseConnection> {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().try_init();
    // A single pooled connection, otherwise each connection opens its own empty database.
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1);
    let db = Database::connect(options).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

pub async fn setup_container() -> anyhow::Result<testcontainers::ContainerAsync<postgres::Postgres>>
{
    let container = postgres::Postgres::default().start().await?;
    Ok(container)
}

pub async fn setup_postgres_db(
    container: &testcontainers::ContainerAsync<postgres::Postgres>,
) -> anyhow::Result<DatabaseConnection> {
    let host = container.get_host().await?;
    let port = container.get_host_port_ipv4(5432).await?;
    let db_url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);
    let db = Database::connect(&db_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Inserts a to-do directly through the entity, bypassing the service.
pub async fn insert_to_do(
    db: &DatabaseConnection,
    name: &str,
    description: &str,
    status: bool,
) -> to_do::Model {
    let active_model = to_do::ActiveModel {
        name: Set(name.to_string()),
        description: Set(description.to_string()),
        status: Set(status),
        created_at: Set(chrono::Local::now().naive_local()),
        ..Default::default()
    };
    active_model.insert(db).await.unwrap()
}

/// Inserts nome1..nome5; odd ones are done, even ones are not.
pub async fn create_test_to_dos(db: &DatabaseConnection) -> Vec<to_do::Model> {
    let mut to_dos = Vec::new();
    for index in 1..=5 {
        let model = insert_to_do(
            db,
            &format!("nome{}", index),
            &format!("descricao{}", index),
            index % 2 == 1,
        )
        .await;
        to_dos.push(model);
    }
    to_dos
}

/// Sends one request through the router and returns the status and raw body.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, Vec<u8>) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => request
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}
