//! # Squad Core Library
//!
//! Storage and recurrence engine for recurring team schedules: practices,
//! matches and meetups that repeat daily, weekly or monthly.
//!
//! ## Features
//!
//! - **Eager Expansion**: A recurring template is stored as a root row plus
//!   every generated occurrence, capped and bounded by an end date or a
//!   one-year horizon
//! - **Series Keys**: Every row carries the id of its series root, so a
//!   series stays addressable after its root is gone
//! - **Scoped Mutations**: Update or delete one occurrence or the whole series
//! - **Transactional Writes**: Each mutation commits fully or not at all
//!
//! ## Core Modules
//!
//! - [`db`]: Database connection and migration management
//! - [`models`]: Core data structures and transfer objects
//! - [`recurrence`]: Occurrence date generation
//! - [`repository`]: Data access layer with Repository pattern
//! - [`error`]: Error types
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use squad_core::{
//!     db,
//!     models::{EditScope, NewScheduleData, RecurrenceRule, UpdateScheduleData},
//!     repository::{SeriesRepository, SqliteRepository},
//! };
//! use chrono::NaiveDate;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pool = db::establish_connection("squad.db").await?;
//!     let repo = SqliteRepository::new(pool);
//!
//!     let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//!     let mut practice = NewScheduleData::new("Practice", start);
//!     practice.recurrence_rule = RecurrenceRule::Weekly;
//!     practice.recurrence_interval = Some(2);
//!
//!     let created = repo.create_series(practice).await?;
//!     println!("Created {} occurrences", created.total_created);
//!
//!     let changes = UpdateScheduleData {
//!         venue: Some("Gym B".to_string()),
//!         ..Default::default()
//!     };
//!     repo.update_occurrence(created.root.id, changes, EditScope::All).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod db;
pub mod error;
pub mod models;
pub mod recurrence;
pub mod repository;
