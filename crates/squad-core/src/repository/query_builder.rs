use crate::models::{ScheduleFilter, UpdateScheduleData};
use chrono::Utc;
use sqlx::types::Json;
use sqlx::{Encode, QueryBuilder, Sqlite, Type};
use uuid::Uuid;

/// Which rows an update or delete applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Exactly one occurrence
    Occurrence(Uuid),
    /// Every row sharing a series key
    Series(Uuid),
}

/// Utility functions for rendering filters, targets and change sets into SQL
pub struct SqlQueryBuilder;

impl SqlQueryBuilder {
    /// Appends a `WHERE` clause selecting the rows of `target`.
    pub fn push_target(target: Target, qb: &mut QueryBuilder<'_, Sqlite>) {
        match target {
            Target::Occurrence(id) => {
                qb.push(" WHERE id = ");
                qb.push_bind(id);
            }
            Target::Series(series_id) => {
                qb.push(" WHERE series_id = ");
                qb.push_bind(series_id);
            }
        }
    }

    /// Appends a `WHERE` clause for a listing filter, if it constrains anything.
    pub fn push_filter(filter: &ScheduleFilter, qb: &mut QueryBuilder<'_, Sqlite>) {
        let mut separator = " WHERE ";

        if let Some(from) = filter.from {
            qb.push(separator).push("date >= ").push_bind(from);
            separator = " AND ";
        }
        if let Some(to) = filter.to {
            qb.push(separator).push("date <= ").push_bind(to);
            separator = " AND ";
        }
        if let Some(series_id) = filter.series_id {
            qb.push(separator).push("series_id = ").push_bind(series_id);
        }
    }

    /// Appends the `SET` list for `changes` and an `updated_at` stamp.
    ///
    /// Returns `false` without touching `qb` when nothing would change.
    pub fn push_changes<'a>(
        changes: &UpdateScheduleData,
        qb: &mut QueryBuilder<'a, Sqlite>,
    ) -> bool {
        if changes.is_empty() {
            return false;
        }

        let mut updated = false;

        if let Some(date) = changes.date {
            Self::push_assignment(qb, &mut updated, "date", date);
        }
        if let Some(start_hour) = changes.start_hour {
            Self::push_assignment(qb, &mut updated, "start_hour", start_hour);
        }
        if let Some(start_minute) = changes.start_minute {
            Self::push_assignment(qb, &mut updated, "start_minute", start_minute);
        }
        if let Some(end_hour) = changes.end_hour {
            Self::push_assignment(qb, &mut updated, "end_hour", end_hour);
        }
        if let Some(end_minute) = changes.end_minute {
            Self::push_assignment(qb, &mut updated, "end_minute", end_minute);
        }
        if let Some(gather_hour) = changes.gather_hour {
            Self::push_assignment(qb, &mut updated, "gather_hour", gather_hour);
        }
        if let Some(gather_minute) = changes.gather_minute {
            Self::push_assignment(qb, &mut updated, "gather_minute", gather_minute);
        }
        if let Some(venue) = &changes.venue {
            Self::push_assignment(qb, &mut updated, "venue", venue.clone());
        }
        if let Some(title) = &changes.title {
            Self::push_assignment(qb, &mut updated, "title", title.clone());
        }
        if let Some(notes) = &changes.notes {
            Self::push_assignment(qb, &mut updated, "notes", notes.clone());
        }
        if let Some(category_id) = &changes.category_id {
            Self::push_assignment(qb, &mut updated, "category_id", category_id.clone());
        }
        if let Some(category_ids) = &changes.category_ids {
            Self::push_assignment(qb, &mut updated, "category_ids", Json(category_ids.clone()));
        }

        Self::push_assignment(qb, &mut updated, "updated_at", Utc::now());
        true
    }

    fn push_assignment<'a, T>(
        qb: &mut QueryBuilder<'a, Sqlite>,
        updated: &mut bool,
        column: &str,
        value: T,
    ) where
        T: 'a + Encode<'a, Sqlite> + Type<Sqlite> + Send,
    {
        if *updated {
            qb.push(", ");
        }
        qb.push(column);
        qb.push(" = ");
        qb.push_bind(value);
        *updated = true;
    }
}
