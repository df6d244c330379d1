use testcontainers_modules::{postgres, testcontainers};
use todo_api::todo::{PageRequest, SeaOrmToDoRepository, ToDoFields, ToDoRepository};

mod common;

pub struct TestContext {
    #[allow(dead_code)] // container is kept to ensure it's not dropped
    pub container: testcontainers::ContainerAsync<postgres::Postgres>,
    pub repository: SeaOrmToDoRepository,
}

async fn setup() -> anyhow::Result<TestContext> {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().try_init();
    let container = common::setup_container().await?;
    let db = common::setup_postgres_db(&container).await?;
    Ok(TestContext {
        container,
        repository: SeaOrmToDoRepository::new(db),
    })
}

#[tokio::test]
#[ignore = "needs a Docker daemon"]
async fn can_round_trip_to_dos_through_postgres() {
    let state = setup().await.expect("Failed to setup test context");
    let repository = &state.repository;

    let done = repository
        .save(ToDoFields {
            name: "Nome 1".to_string(),
            description: "Descrição 1".to_string(),
            status: true,
        })
        .await
        .expect("Failed to save to-do");
    repository
        .save(ToDoFields {
            name: "Nome 2".to_string(),
            description: "Descrição 2".to_string(),
            status: false,
        })
        .await
        .expect("Failed to save to-do");

    let all = repository
        .find_all(PageRequest::default())
        .await
        .expect("Failed to find all");
    assert_eq!(all.items().len(), 2);

    let filtered = repository
        .find_by_status(true, PageRequest::default())
        .await
        .expect("Failed to find by status");
    assert_eq!(filtered.items(), [done.clone()]);

    repository.delete(done.clone()).await.expect("Failed to delete");
    let found = repository
        .find_by_id(done.id())
        .await
        .expect("Failed to find by id");
    assert!(found.is_none());
}
