use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::error::CoreError;
use crate::recurrence::RecurrenceParams;

/// Fixed-width storage and comparison key for calendar dates.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Venue stored when a template arrives without one.
pub const UNDECIDED_VENUE: &str = "undecided";

/// Formats a date as its `YYYY-MM-DD` key.
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Parses a `YYYY-MM-DD` key into a calendar date.
pub fn parse_date_key(s: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(s.trim(), DATE_KEY_FORMAT)
        .map_err(|_| {
            CoreError::InvalidInput(format!("Malformed date '{}', expected YYYY-MM-DD", s))
        })
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceRule {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
}

impl std::fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecurrenceRule::None => write!(f, "none"),
            RecurrenceRule::Daily => write!(f, "daily"),
            RecurrenceRule::Weekly => write!(f, "weekly"),
            RecurrenceRule::Monthly => write!(f, "monthly"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid recurrence rule: {0}")]
pub struct ParseRecurrenceRuleError(String);

impl FromStr for RecurrenceRule {
    type Err = ParseRecurrenceRuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "once" => Ok(RecurrenceRule::None),
            "daily" | "day" => Ok(RecurrenceRule::Daily),
            "weekly" | "week" => Ok(RecurrenceRule::Weekly),
            "monthly" | "month" => Ok(RecurrenceRule::Monthly),
            _ => Err(ParseRecurrenceRuleError(s.to_string())),
        }
    }
}

/// Scope for update and delete operations on occurrences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditScope {
    /// Affect only the selected occurrence
    This,
    /// Affect the root and every generated member of its series
    All,
}

impl std::fmt::Display for EditScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditScope::This => write!(f, "this"),
            EditScope::All => write!(f, "all"),
        }
    }
}

impl FromStr for EditScope {
    type Err = ParseEditScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "this" | "occurrence" | "one" => Ok(EditScope::This),
            "all" | "series" | "entire" => Ok(EditScope::All),
            _ => Err(ParseEditScopeError(s.to_string())),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid edit scope: {0}")]
pub struct ParseEditScopeError(String);

/// One concrete occurrence of a team schedule.
///
/// `parent_schedule_id` is `None` for a series root or a standalone
/// occurrence. `series_id` is set on every row and equals the root's `id`,
/// so a series is always addressable even after its root has been removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: Uuid,
    pub date: NaiveDate,
    pub start_hour: Option<i32>,
    pub start_minute: Option<i32>,
    pub end_hour: Option<i32>,
    pub end_minute: Option<i32>,
    pub gather_hour: Option<i32>,
    pub gather_minute: Option<i32>,
    pub venue: String,
    pub title: String,
    pub notes: Option<String>,
    pub category_id: Option<String>,
    pub category_ids: Json<Vec<String>>,
    pub recurrence_rule: RecurrenceRule,
    pub recurrence_interval: i32,
    pub recurrence_end_date: Option<NaiveDate>,
    pub parent_schedule_id: Option<Uuid>,
    pub series_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Schedule {
    /// True for the row the user created directly (or a standalone row).
    pub fn is_root(&self) -> bool {
        self.parent_schedule_id.is_none()
    }

    /// The recurrence parameters this row was created with.
    pub fn recurrence(&self) -> RecurrenceParams {
        RecurrenceParams {
            rule: self.recurrence_rule,
            interval: Some(self.recurrence_interval),
            end_date: self.recurrence_end_date,
        }
    }

    /// Builds the series root for a normalized template.
    pub(crate) fn root_from(data: NewScheduleData, now: DateTime<Utc>) -> Schedule {
        let id = Uuid::now_v7();
        let interval = data.recurrence().effective_interval() as i32;
        Schedule {
            id,
            date: data.date,
            start_hour: data.start_hour,
            start_minute: data.start_minute,
            end_hour: data.end_hour,
            end_minute: data.end_minute,
            gather_hour: data.gather_hour,
            gather_minute: data.gather_minute,
            venue: data.venue.unwrap_or_else(|| UNDECIDED_VENUE.to_string()),
            title: data.title,
            notes: data.notes,
            category_id: data.category_id,
            category_ids: Json(data.category_ids),
            recurrence_rule: data.recurrence_rule,
            recurrence_interval: interval,
            recurrence_end_date: data.recurrence_end_date,
            parent_schedule_id: None,
            series_id: id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builds a generated member of this row's series on `date`.
    ///
    /// Every descriptive field is copied; only identity, date and the
    /// parent link differ.
    pub(crate) fn child_on(&self, date: NaiveDate, now: DateTime<Utc>) -> Schedule {
        Schedule {
            id: Uuid::now_v7(),
            date,
            parent_schedule_id: Some(self.id),
            series_id: self.series_id,
            created_at: now,
            updated_at: now,
            ..self.clone()
        }
    }
}

/// A schedule template as submitted by a caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewScheduleData {
    pub title: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub start_hour: Option<i32>,
    #[serde(default)]
    pub start_minute: Option<i32>,
    #[serde(default)]
    pub end_hour: Option<i32>,
    #[serde(default)]
    pub end_minute: Option<i32>,
    #[serde(default)]
    pub gather_hour: Option<i32>,
    #[serde(default)]
    pub gather_minute: Option<i32>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub category_ids: Vec<String>,
    #[serde(default)]
    pub recurrence_rule: RecurrenceRule,
    #[serde(default)]
    pub recurrence_interval: Option<i32>,
    #[serde(default)]
    pub recurrence_end_date: Option<NaiveDate>,
}

impl NewScheduleData {
    pub fn new(title: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            date,
            start_hour: None,
            start_minute: None,
            end_hour: None,
            end_minute: None,
            gather_hour: None,
            gather_minute: None,
            venue: None,
            notes: None,
            category_id: None,
            category_ids: Vec::new(),
            recurrence_rule: RecurrenceRule::None,
            recurrence_interval: None,
            recurrence_end_date: None,
        }
    }

    pub fn recurrence(&self) -> RecurrenceParams {
        RecurrenceParams {
            rule: self.recurrence_rule,
            interval: self.recurrence_interval,
            end_date: self.recurrence_end_date,
        }
    }

    /// Trims the title and substitutes the undecided venue for a blank one.
    pub fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        let venue = self
            .venue
            .take()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        self.venue = Some(venue.unwrap_or_else(|| UNDECIDED_VENUE.to_string()));
        self
    }

    /// Checks the non-recurrence fields of the template.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.title.trim().is_empty() {
            return Err(CoreError::InvalidInput("Title must not be empty".to_string()));
        }
        validate_time_of_day("start", self.start_hour, self.start_minute)?;
        validate_time_of_day("end", self.end_hour, self.end_minute)?;
        validate_time_of_day("gather", self.gather_hour, self.gather_minute)?;
        Ok(())
    }
}

/// Field changes for an existing occurrence.
///
/// The outer `Option` distinguishes "leave unchanged" from "set"; for
/// nullable columns the inner `Option` carries an explicit clear.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateScheduleData {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub start_hour: Option<Option<i32>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub start_minute: Option<Option<i32>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub end_hour: Option<Option<i32>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub end_minute: Option<Option<i32>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub gather_hour: Option<Option<i32>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub gather_minute: Option<Option<i32>>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub notes: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub category_id: Option<Option<String>>,
    #[serde(default)]
    pub category_ids: Option<Vec<String>>,
}

impl UpdateScheduleData {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// The same changes with `date` removed; dates never fan out across a series.
    pub fn without_date(&self) -> Self {
        Self {
            date: None,
            ..self.clone()
        }
    }

    /// Trims text fields; a blank venue falls back to the undecided venue.
    pub fn normalized(mut self) -> Self {
        self.title = self.title.map(|t| t.trim().to_string());
        self.venue = self.venue.map(|v| {
            let v = v.trim();
            if v.is_empty() {
                UNDECIDED_VENUE.to_string()
            } else {
                v.to_string()
            }
        });
        self
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(CoreError::InvalidInput("Title must not be empty".to_string()));
            }
        }
        for (label, hour, minute) in [
            ("start", self.start_hour, self.start_minute),
            ("end", self.end_hour, self.end_minute),
            ("gather", self.gather_hour, self.gather_minute),
        ] {
            validate_time_of_day(label, hour.flatten(), minute.flatten())?;
        }
        Ok(())
    }
}

fn validate_time_of_day(
    label: &str,
    hour: Option<i32>,
    minute: Option<i32>,
) -> Result<(), CoreError> {
    if let Some(h) = hour {
        if !(0..=23).contains(&h) {
            return Err(CoreError::InvalidInput(format!("{} hour {} is outside 0..=23", label, h)));
        }
    }
    if let Some(m) = minute {
        if !(0..=59).contains(&m) {
            return Err(CoreError::InvalidInput(format!(
                "{} minute {} is outside 0..=59",
                label, m
            )));
        }
    }
    Ok(())
}

/// Result of persisting one template.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesCreated {
    pub root: Schedule,
    /// Root plus generated children.
    pub total_created: usize,
    /// Every created row in date order, root first.
    pub all_rows: Vec<Schedule>,
}

/// Filter for listing occurrences. Bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub struct ScheduleFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub series_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSummary {
    pub series_id: Uuid,
    /// `None` once the root row itself has been deleted with scope `this`.
    pub root_id: Option<Uuid>,
    pub member_count: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub recurrence_rule: RecurrenceRule,
    pub recurrence_interval: i32,
}
