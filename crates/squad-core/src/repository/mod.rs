use crate::db::DbPool;
use crate::error::CoreError;
use crate::models::{
    EditScope, NewScheduleData, Schedule, ScheduleFilter, SeriesCreated, SeriesSummary,
    UpdateScheduleData,
};
use async_trait::async_trait;
use uuid::Uuid;

// Re-export domain modules
pub mod query_builder;
pub mod schedules;
pub mod series;

/// Domain-specific trait for reading individual occurrences
#[async_trait]
pub trait ScheduleRepository {
    async fn find_schedule_by_id(&self, id: Uuid) -> Result<Option<Schedule>, CoreError>;
    async fn find_schedules_by_short_id_prefix(
        &self,
        short_id: &str,
    ) -> Result<Vec<Schedule>, CoreError>;
    async fn find_schedules(&self, filter: &ScheduleFilter) -> Result<Vec<Schedule>, CoreError>;
}

/// Domain-specific trait for series-aware mutations
#[async_trait]
pub trait SeriesRepository {
    /// Persists a template as a series root plus its generated occurrences.
    async fn create_series(&self, data: NewScheduleData) -> Result<SeriesCreated, CoreError>;
    /// Applies `changes` to one occurrence or to its whole series.
    ///
    /// With [`EditScope::All`] a `date` change is dropped. Returns the row
    /// identified by `id`, read back after the update.
    async fn update_occurrence(
        &self,
        id: Uuid,
        changes: UpdateScheduleData,
        scope: EditScope,
    ) -> Result<Schedule, CoreError>;
    /// Removes one occurrence or its whole series. Returns the number of rows removed.
    async fn delete_occurrence(&self, id: Uuid, scope: EditScope) -> Result<u64, CoreError>;
    /// All members of the series `id` belongs to, in date order.
    async fn find_series_members(&self, id: Uuid) -> Result<Vec<Schedule>, CoreError>;
    async fn series_summary(&self, id: Uuid) -> Result<SeriesSummary, CoreError>;
}

/// Main repository trait that composes all domain traits
pub trait Repository: ScheduleRepository + SeriesRepository {}

/// SQLite implementation of the repository pattern
pub struct SqliteRepository {
    pool: DbPool,
}

impl SqliteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the database pool for internal use across modules
    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }
}

impl Repository for SqliteRepository {}

/// Logs a failed operation before it is handed back to the caller.
///
/// Store failures are logged at `error`; rejected requests only at `debug`.
pub(crate) fn log_failure(operation: &'static str) -> impl Fn(CoreError) -> CoreError {
    move |err| {
        match &err {
            CoreError::Database(source) => {
                tracing::error!(operation, error = %source, "schedule store failure");
            }
            CoreError::Migration(_) | CoreError::Io(_) => {
                tracing::error!(operation, error = ?err, "schedule store failure");
            }
            other => {
                tracing::debug!(operation, error = %other, "request rejected");
            }
        }
        err
    }
}
