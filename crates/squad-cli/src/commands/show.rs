use anyhow::Result;
use serde::Serialize;
use squad_core::error::CoreError;
use squad_core::models::Schedule;
use squad_core::repository::Repository;

use crate::cli::ShowCommand;
use crate::util::resolve_schedule_id;
use crate::views;
use crate::views::table::{display_schedule_details, display_series_summary};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleDetails<'a> {
    schedule: &'a Schedule,
    series_members: &'a [Schedule],
}

pub async fn show_schedule(repo: &impl Repository, command: ShowCommand, json: bool) -> Result<()> {
    let id = resolve_schedule_id(repo, &command.id).await?;
    let schedule = repo
        .find_schedule_by_id(id)
        .await?
        .ok_or_else(|| CoreError::NotFound(id.to_string()))?;
    let members = repo.find_series_members(id).await?;

    if json {
        return views::print_json(&ScheduleDetails {
            schedule: &schedule,
            series_members: &members,
        });
    }
    display_schedule_details(&schedule, &members);
    Ok(())
}

pub async fn show_series(repo: &impl Repository, command: ShowCommand, json: bool) -> Result<()> {
    let id = resolve_schedule_id(repo, &command.id).await?;
    let summary = repo.series_summary(id).await?;

    if json {
        return views::print_json(&summary);
    }
    display_series_summary(&summary);
    Ok(())
}
