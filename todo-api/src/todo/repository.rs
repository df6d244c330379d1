use crate::entities::*;
use crate::todo::{Page, PageRequest, ToDo, ToDoFields};
use async_trait::async_trait;
use chrono::Local;
use sea_orm::*;

/// Persistence operations for to-dos.
///
/// Listings are ordered by ID, which is also insertion order.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ToDoRepository: Send + Sync {
    /// Looks up a to-do by its ID.
    async fn find_by_id(&self, id: i32) -> Result<Option<ToDo>, DbErr>;

    /// Returns one page of all stored to-dos.
    async fn find_all(&self, page: PageRequest) -> Result<Page<ToDo>, DbErr>;

    /// Returns one page of the to-dos with the given status.
    async fn find_by_status(&self, status: bool, page: PageRequest) -> Result<Page<ToDo>, DbErr>;

    /// Stores a new to-do, assigning its ID and creation time.
    async fn save(&self, fields: ToDoFields) -> Result<ToDo, DbErr>;

    /// Persists the name, description and status of an already stored to-do.
    async fn update(&self, to_do: ToDo) -> Result<ToDo, DbErr>;

    /// Removes a stored to-do.
    async fn delete(&self, to_do: ToDo) -> Result<(), DbErr>;
}

/// [`ToDoRepository`] backed by a SeaORM database connection.
#[derive(Clone, Debug)]
pub struct SeaOrmToDoRepository {
    db: DatabaseConnection,
}

impl SeaOrmToDoRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn fetch_page(
        &self,
        select: Select<to_do::Entity>,
        page: PageRequest,
    ) -> Result<Page<ToDo>, DbErr> {
        let paginator = select
            .order_by_asc(to_do::Column::Id)
            .paginate(&self.db, page.size());
        let total_count = paginator.num_items().await?;
        // Pages at or past the end hold nothing. Skipping the fetch also keeps
        // huge page numbers away from the paginator's unchecked offset maths.
        if page.offset() >= total_count {
            return Ok(Page::new(Vec::new(), total_count, page));
        }
        let items = paginator
            .fetch_page(page.number())
            .await?
            .into_iter()
            .map(ToDo::from)
            .collect();
        Ok(Page::new(items, total_count, page))
    }
}

#[async_trait]
impl ToDoRepository for SeaOrmToDoRepository {
    #[tracing::instrument(skip(self))]
    async fn find_by_id(&self, id: i32) -> Result<Option<ToDo>, DbErr> {
        let model = to_do::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(ToDo::from))
    }

    #[tracing::instrument(skip(self))]
    async fn find_all(&self, page: PageRequest) -> Result<Page<ToDo>, DbErr> {
        self.fetch_page(to_do::Entity::find(), page).await
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_status(&self, status: bool, page: PageRequest) -> Result<Page<ToDo>, DbErr> {
        let select = to_do::Entity::find().filter(to_do::Column::Status.eq(status));
        self.fetch_page(select, page).await
    }

    #[tracing::instrument(skip(self))]
    async fn save(&self, fields: ToDoFields) -> Result<ToDo, DbErr> {
        let active_model = to_do::ActiveModel {
            name: ActiveValue::Set(fields.name),
            description: ActiveValue::Set(fields.description),
            status: ActiveValue::Set(fields.status),
            created_at: ActiveValue::Set(Local::now().naive_local()),
            ..Default::default()
        };
        let created_model = active_model.insert(&self.db).await?;
        Ok(ToDo::from(created_model))
    }

    #[tracing::instrument(skip(self))]
    async fn update(&self, to_do: ToDo) -> Result<ToDo, DbErr> {
        // created_at stays NotSet so the stored value is never rewritten.
        let active_model = to_do::ActiveModel {
            id: ActiveValue::Unchanged(to_do.id()),
            name: ActiveValue::Set(to_do.name().to_string()),
            description: ActiveValue::Set(to_do.description().to_string()),
            status: ActiveValue::Set(to_do.status()),
            ..Default::default()
        };
        let updated_model = active_model.update(&self.db).await?;
        Ok(ToDo::from(updated_model))
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, to_do: ToDo) -> Result<(), DbErr> {
        to_do::Entity::delete_by_id(to_do.id())
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
