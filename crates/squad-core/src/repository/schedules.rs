use crate::error::CoreError;
use crate::models::{Schedule, ScheduleFilter, UpdateScheduleData};
use crate::repository::query_builder::{SqlQueryBuilder, Target};
use crate::repository::{log_failure, SqliteRepository};
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, Transaction};
use uuid::Uuid;

/// Column list shared by single and bulk inserts.
const INSERT_COLUMNS: &str = "INSERT INTO schedules \
     (id, date, start_hour, start_minute, end_hour, end_minute, gather_hour, gather_minute, \
     venue, title, notes, category_id, category_ids, recurrence_rule, recurrence_interval, \
     recurrence_end_date, parent_schedule_id, series_id, created_at, updated_at) ";

/// Stable listing order: date, then start time with untimed rows last.
pub(crate) const SCHEDULE_ORDER: &str =
    " ORDER BY date, COALESCE(start_hour, 24), COALESCE(start_minute, 0), id";

/// Rows per multi-row INSERT. 20 binds each keeps a chunk well under
/// SQLite's bind parameter limit.
const INSERT_CHUNK_SIZE: usize = 40;

#[async_trait]
impl super::ScheduleRepository for SqliteRepository {
    async fn find_schedule_by_id(&self, id: Uuid) -> Result<Option<Schedule>, CoreError> {
        let schedule = sqlx::query_as("SELECT * FROM schedules WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(CoreError::from)
            .map_err(log_failure("find_schedule_by_id"))?;
        Ok(schedule)
    }

    async fn find_schedules_by_short_id_prefix(
        &self,
        short_id: &str,
    ) -> Result<Vec<Schedule>, CoreError> {
        // Ids are stored as 16-byte blobs, so match against their hex form.
        let hex: String = short_id
            .chars()
            .filter(|c| *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        if hex.is_empty() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Ok(Vec::new());
        }

        let mut pattern = String::with_capacity(hex.len() + 1);
        pattern.push_str(&hex);
        pattern.push('%');

        let mut sql = String::from("SELECT * FROM schedules WHERE lower(hex(id)) LIKE ?");
        sql.push_str(SCHEDULE_ORDER);
        let schedules: Vec<Schedule> = sqlx::query_as(&sql)
            .bind(pattern)
            .fetch_all(self.pool())
            .await
            .map_err(CoreError::from)
            .map_err(log_failure("find_schedules_by_short_id_prefix"))?;
        Ok(schedules)
    }

    async fn find_schedules(&self, filter: &ScheduleFilter) -> Result<Vec<Schedule>, CoreError> {
        let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM schedules");
        SqlQueryBuilder::push_filter(filter, &mut query_builder);
        query_builder.push(SCHEDULE_ORDER);

        let schedules = query_builder
            .build_query_as()
            .fetch_all(self.pool())
            .await
            .map_err(CoreError::from)
            .map_err(log_failure("find_schedules"))?;
        Ok(schedules)
    }
}

impl SqliteRepository {
    pub(crate) async fn find_schedule_by_id_in_transaction<'a>(
        tx: &mut Transaction<'a, Sqlite>,
        id: Uuid,
    ) -> Result<Option<Schedule>, CoreError> {
        let schedule = sqlx::query_as("SELECT * FROM schedules WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?;
        Ok(schedule)
    }

    /// Looks up the series key of occurrence `id`.
    pub(crate) async fn resolve_series_id<'a>(
        tx: &mut Transaction<'a, Sqlite>,
        id: Uuid,
    ) -> Result<Uuid, CoreError> {
        let series_id: Option<Uuid> =
            sqlx::query_scalar("SELECT series_id FROM schedules WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut **tx)
                .await?;
        series_id.ok_or_else(|| CoreError::NotFound(id.to_string()))
    }

    pub(crate) async fn insert_schedule_in_transaction<'a>(
        tx: &mut Transaction<'a, Sqlite>,
        schedule: &Schedule,
    ) -> Result<(), CoreError> {
        let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(INSERT_COLUMNS);
        Self::push_schedule_values(&mut query_builder, std::slice::from_ref(schedule));
        query_builder.build().execute(&mut **tx).await?;
        Ok(())
    }

    /// Inserts `schedules` with multi-row statements.
    pub(crate) async fn bulk_insert_in_transaction<'a>(
        tx: &mut Transaction<'a, Sqlite>,
        schedules: &[Schedule],
    ) -> Result<(), CoreError> {
        for chunk in schedules.chunks(INSERT_CHUNK_SIZE) {
            let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(INSERT_COLUMNS);
            Self::push_schedule_values(&mut query_builder, chunk);
            query_builder.build().execute(&mut **tx).await?;
        }
        Ok(())
    }

    fn push_schedule_values<'q>(
        query_builder: &mut QueryBuilder<'q, Sqlite>,
        schedules: &'q [Schedule],
    ) {
        query_builder.push_values(schedules, |mut row, s| {
            row.push_bind(s.id)
                .push_bind(s.date)
                .push_bind(s.start_hour)
                .push_bind(s.start_minute)
                .push_bind(s.end_hour)
                .push_bind(s.end_minute)
                .push_bind(s.gather_hour)
                .push_bind(s.gather_minute)
                .push_bind(&s.venue)
                .push_bind(&s.title)
                .push_bind(&s.notes)
                .push_bind(&s.category_id)
                .push_bind(&s.category_ids)
                .push_bind(s.recurrence_rule)
                .push_bind(s.recurrence_interval)
                .push_bind(s.recurrence_end_date)
                .push_bind(s.parent_schedule_id)
                .push_bind(s.series_id)
                .push_bind(s.created_at)
                .push_bind(s.updated_at);
        });
    }

    /// Writes `changes` to every row of `target`. Returns the number of rows touched.
    pub(crate) async fn apply_changes<'a>(
        tx: &mut Transaction<'a, Sqlite>,
        target: Target,
        changes: &UpdateScheduleData,
    ) -> Result<u64, CoreError> {
        let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE schedules SET ");
        if !SqlQueryBuilder::push_changes(changes, &mut query_builder) {
            return Ok(0);
        }
        SqlQueryBuilder::push_target(target, &mut query_builder);

        let result = query_builder.build().execute(&mut **tx).await?;
        Ok(result.rows_affected())
    }

    pub(crate) async fn delete_target<'a>(
        tx: &mut Transaction<'a, Sqlite>,
        target: Target,
    ) -> Result<u64, CoreError> {
        let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new("DELETE FROM schedules");
        SqlQueryBuilder::push_target(target, &mut query_builder);

        let result = query_builder.build().execute(&mut **tx).await?;
        Ok(result.rows_affected())
    }
}
