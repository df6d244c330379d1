use crate::entities::to_do;
use chrono::NaiveDateTime;
use std::sync::Arc;

pub mod api;
pub mod repository;

pub use repository::{SeaOrmToDoRepository, ToDoRepository};

/// User-facing message for a lookup of an id that is not stored.
pub const NOT_FOUND_MESSAGE: &str = "ToDo Não encontrado!";
/// Page size used when the client does not ask for one.
pub const DEFAULT_PAGE_SIZE: u64 = 100;
/// Largest page size a client can ask for.
pub const MAX_PAGE_SIZE: u64 = 100;

#[derive(Debug, PartialEq, Clone, Eq)]
pub struct ToDo {
    id: i32,
    name: String,
    description: String,
    status: bool,
    created_at: NaiveDateTime,
}

impl ToDo {
    pub fn new(
        id: i32,
        name: String,
        description: String,
        status: bool,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            name,
            description,
            status,
            created_at,
        }
    }

    /// Returns the ID of the to-do.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Returns the name of the to-do.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description of the to-do.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns whether the to-do is done.
    pub fn status(&self) -> bool {
        self.status
    }

    /// Returns the moment the to-do was first stored.
    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    /// Overwrites the mutable fields. The ID and creation time never change.
    pub fn apply(&mut self, fields: ToDoFields) {
        self.name = fields.name;
        self.description = fields.description;
        self.status = fields.status;
    }
}

impl From<to_do::Model> for ToDo {
    fn from(model: to_do::Model) -> Self {
        ToDo::new(
            model.id,
            model.name,
            model.description,
            model.status,
            model.created_at,
        )
    }
}

/// The fields a client is allowed to set, on creation and on update alike.
#[derive(Debug, PartialEq, Clone, Eq)]
pub struct ToDoFields {
    pub name: String,
    pub description: String,
    pub status: bool,
}

/// A zero-based page number together with the page size.
#[derive(Debug, PartialEq, Clone, Copy, Eq)]
pub struct PageRequest {
    number: u64,
    size: u64,
}

impl PageRequest {
    /// Builds a page request from optional client input.
    ///
    /// A missing or zero size falls back to [`DEFAULT_PAGE_SIZE`], and sizes
    /// above [`MAX_PAGE_SIZE`] are capped.
    pub fn new(number: Option<u64>, size: Option<u64>) -> Self {
        let size = match size {
            None | Some(0) => DEFAULT_PAGE_SIZE,
            Some(size) => size.min(MAX_PAGE_SIZE),
        };
        Self {
            number: number.unwrap_or(0),
            size,
        }
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Index of the first item of this page in the whole collection.
    pub fn offset(&self) -> u64 {
        self.number.saturating_mul(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// A bounded slice of a larger ordered collection plus the collection's size.
#[derive(Debug, PartialEq, Clone, Eq)]
pub struct Page<T> {
    items: Vec<T>,
    total_count: u64,
    page_number: u64,
    page_size: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_count: u64, request: PageRequest) -> Self {
        Self {
            items,
            total_count,
            page_number: request.number(),
            page_size: request.size(),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn page_number(&self) -> u64 {
        self.page_number
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn offset(&self) -> u64 {
        self.page_number.saturating_mul(self.page_size)
    }

    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total_count.div_ceil(self.page_size)
    }
}

/// Error type for ToDoService operations.
#[derive(Debug, thiserror::Error)]
pub enum ToDoServiceError {
    /// No to-do is stored under the requested ID.
    #[error("ToDo Não encontrado!")]
    NotFound(i64),
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Business rules for to-dos, on top of a [`ToDoRepository`].
pub struct ToDoService {
    repository: Arc<dyn ToDoRepository>,
}

impl ToDoService {
    pub fn new(repository: Arc<dyn ToDoRepository>) -> Self {
        Self { repository }
    }

    /// Lists to-dos page by page, optionally only those with the given status.
    ///
    /// # Arguments
    ///
    /// * `status` - When present, only to-dos with this status are listed.
    /// * `page` - The page to fetch.
    ///
    /// # Returns
    ///
    /// A `Result` containing the requested `Page` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn list(
        &self,
        status: Option<bool>,
        page: PageRequest,
    ) -> Result<Page<ToDo>, ToDoServiceError> {
        let page = match status {
            Some(status) => self.repository.find_by_status(status, page).await?,
            None => self.repository.find_all(page).await?,
        };
        Ok(page)
    }

    /// Retrieves a to-do by its ID.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `ToDo`, or `ToDoServiceError::NotFound` if no
    /// to-do has this ID.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<ToDo, ToDoServiceError> {
        // Stored IDs are i32, so a wider ID can never match a to-do.
        let key = i32::try_from(id).map_err(|_| ToDoServiceError::NotFound(id))?;
        self.repository
            .find_by_id(key)
            .await?
            .ok_or(ToDoServiceError::NotFound(id))
    }

    /// Stores a new to-do. The repository assigns its ID and creation time.
    #[tracing::instrument(skip(self))]
    pub async fn create(&self, fields: ToDoFields) -> Result<ToDo, ToDoServiceError> {
        let created = self.repository.save(fields).await?;
        tracing::info!("Created to-do {}", created.id());
        Ok(created)
    }

    /// Overwrites the name, description and status of an existing to-do.
    ///
    /// # Arguments
    ///
    /// * `id` - The ID of the to-do to update.
    /// * `fields` - The new values.
    ///
    /// # Returns
    ///
    /// A `Result` containing the stored `ToDo` after the update, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn update(&self, id: i64, fields: ToDoFields) -> Result<ToDo, ToDoServiceError> {
        let mut to_do = self.get(id).await?;
        to_do.apply(fields);
        Ok(self.repository.update(to_do).await?)
    }

    /// Deletes a to-do by its ID.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ToDoServiceError> {
        let to_do = self.get(id).await?;
        self.repository.delete(to_do).await?;
        tracing::info!("Deleted to-do {}", id);
        Ok(())
    }
}
