use crate::error::CoreError;
use crate::models::{
    EditScope, NewScheduleData, Schedule, ScheduleFilter, SeriesCreated, SeriesSummary,
    UpdateScheduleData,
};
use crate::recurrence::RecurrenceExpander;
use crate::repository::query_builder::Target;
use crate::repository::{log_failure, ScheduleRepository, SqliteRepository};
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

#[async_trait]
impl super::SeriesRepository for SqliteRepository {
    async fn create_series(&self, data: NewScheduleData) -> Result<SeriesCreated, CoreError> {
        let data = data.normalized();
        data.validate().map_err(log_failure("create_series"))?;
        let params = data.recurrence();
        params.validate(data.date).map_err(log_failure("create_series"))?;

        let dates = RecurrenceExpander::new(data.date, params).expand();

        let now = Utc::now();
        let root = Schedule::root_from(data, now);
        let mut all_rows = Vec::with_capacity(dates.len() + 1);
        all_rows.push(root.clone());
        all_rows.extend(dates.into_iter().map(|date| root.child_on(date, now)));

        self.insert_series(&root, &all_rows[1..])
            .await
            .map_err(log_failure("create_series"))?;

        tracing::info!(
            series_id = %root.series_id,
            rule = %root.recurrence_rule,
            interval = root.recurrence_interval,
            total = all_rows.len(),
            "series created"
        );

        Ok(SeriesCreated {
            total_created: all_rows.len(),
            root,
            all_rows,
        })
    }

    async fn update_occurrence(
        &self,
        id: Uuid,
        changes: UpdateScheduleData,
        scope: EditScope,
    ) -> Result<Schedule, CoreError> {
        let changes = changes.normalized();
        changes.validate().map_err(log_failure("update_occurrence"))?;

        let (updated, touched) = self
            .update_in_transaction(id, &changes, scope)
            .await
            .map_err(log_failure("update_occurrence"))?;

        tracing::info!(%id, %scope, rows = touched, "occurrence updated");
        Ok(updated)
    }

    async fn delete_occurrence(&self, id: Uuid, scope: EditScope) -> Result<u64, CoreError> {
        let removed = self
            .delete_in_transaction(id, scope)
            .await
            .map_err(log_failure("delete_occurrence"))?;

        tracing::info!(%id, %scope, rows = removed, "occurrence deleted");
        Ok(removed)
    }

    async fn find_series_members(&self, id: Uuid) -> Result<Vec<Schedule>, CoreError> {
        let series_id = self
            .resolve_series_key(id)
            .await
            .map_err(log_failure("find_series_members"))?;

        self.find_schedules(&ScheduleFilter {
            series_id: Some(series_id),
            ..Default::default()
        })
        .await
    }

    async fn series_summary(&self, id: Uuid) -> Result<SeriesSummary, CoreError> {
        let members = self.find_series_members(id).await?;
        let first = members
            .first()
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;

        Ok(SeriesSummary {
            series_id: first.series_id,
            root_id: members.iter().find(|s| s.is_root()).map(|s| s.id),
            member_count: members.len(),
            first_date: members.first().map(|s| s.date),
            last_date: members.last().map(|s| s.date),
            recurrence_rule: first.recurrence_rule,
            recurrence_interval: first.recurrence_interval,
        })
    }
}

impl SqliteRepository {
    /// Root and children land together or not at all.
    async fn insert_series(&self, root: &Schedule, children: &[Schedule]) -> Result<(), CoreError> {
        let mut tx = self.pool().begin().await?;
        Self::insert_schedule_in_transaction(&mut tx, root).await?;
        Self::bulk_insert_in_transaction(&mut tx, children).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn update_in_transaction(
        &self,
        id: Uuid,
        changes: &UpdateScheduleData,
        scope: EditScope,
    ) -> Result<(Schedule, u64), CoreError> {
        let mut tx = self.pool().begin().await?;

        let touched = match scope {
            EditScope::This => {
                if Self::find_schedule_by_id_in_transaction(&mut tx, id)
                    .await?
                    .is_none()
                {
                    return Err(CoreError::NotFound(id.to_string()));
                }
                Self::apply_changes(&mut tx, Target::Occurrence(id), changes).await?
            }
            EditScope::All => {
                let series_id = Self::resolve_series_id(&mut tx, id).await?;
                if changes.date.is_some() {
                    tracing::debug!(%series_id, "ignoring date change for series-wide update");
                }
                let changes = changes.without_date();
                Self::apply_changes(&mut tx, Target::Series(series_id), &changes).await?
            }
        };

        let updated = Self::find_schedule_by_id_in_transaction(&mut tx, id)
            .await?
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;
        tx.commit().await?;
        Ok((updated, touched))
    }

    async fn delete_in_transaction(&self, id: Uuid, scope: EditScope) -> Result<u64, CoreError> {
        let mut tx = self.pool().begin().await?;

        let target = match scope {
            EditScope::This => Target::Occurrence(id),
            EditScope::All => Target::Series(Self::resolve_series_id(&mut tx, id).await?),
        };
        let removed = Self::delete_target(&mut tx, target).await?;
        if removed == 0 {
            return Err(CoreError::NotFound(id.to_string()));
        }

        tx.commit().await?;
        Ok(removed)
    }

    /// Accepts either a member id or a series key.
    ///
    /// A series key keeps resolving after its root row was deleted on its own.
    async fn resolve_series_key(&self, id: Uuid) -> Result<Uuid, CoreError> {
        let series_id: Option<Uuid> = sqlx::query_scalar(
            "SELECT series_id FROM schedules WHERE id = $1 OR series_id = $1 LIMIT 1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        series_id.ok_or_else(|| CoreError::NotFound(id.to_string()))
    }
}
