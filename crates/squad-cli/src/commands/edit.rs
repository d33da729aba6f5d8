use anyhow::{anyhow, Result};
use dialoguer::Select;
use owo_colors::{OwoColorize, Style};
use squad_core::error::CoreError;
use squad_core::models::{EditScope, Schedule, UpdateScheduleData};
use squad_core::repository::Repository;

use crate::cli::EditCommand;
use crate::parser::{parse_date, parse_time};
use crate::util::resolve_schedule_id;
use crate::views;

pub async fn edit_schedule(repo: &impl Repository, command: EditCommand, json: bool) -> Result<()> {
    let id = resolve_schedule_id(repo, &command.id).await?;
    let schedule = repo
        .find_schedule_by_id(id)
        .await?
        .ok_or_else(|| CoreError::NotFound(id.to_string()))?;

    let changes = build_changes(&command)?;
    if changes.is_empty() {
        return Err(anyhow!(CoreError::InvalidInput(
            "Nothing to change. Pass at least one field flag.".to_string()
        )));
    }

    let scope = match command.scope {
        Some(scope) => scope,
        None => {
            let members = repo.find_series_members(id).await?;
            if members.len() > 1 {
                prompt_scope(&schedule)?
            } else {
                EditScope::This
            }
        }
    };

    if scope == EditScope::All && changes.date.is_some() {
        eprintln!(
            "{} --date only moves a single occurrence; it is ignored for the whole series.",
            "Note:".yellow()
        );
    }

    let updated = repo.update_occurrence(id, changes, scope).await?;

    if json {
        return views::print_json(&updated);
    }
    let success_style = Style::new().green().bold();
    let target = match scope {
        EditScope::This => "schedule",
        EditScope::All => "series",
    };
    println!(
        "{} Updated {}: {} on {}",
        "✓".style(success_style),
        target,
        updated.title.bright_white().bold(),
        updated.date.to_string().cyan()
    );
    Ok(())
}

fn prompt_scope(schedule: &Schedule) -> Result<EditScope> {
    let scope_options = vec![
        format!("This occurrence only ({})", schedule.date),
        "Every occurrence in the series".to_string(),
    ];

    println!("{}", "This schedule is part of a recurring series.".yellow());
    let selection = Select::new()
        .with_prompt("How would you like to apply your changes?")
        .items(&scope_options)
        .default(0)
        .interact()?;

    Ok(if selection == 0 { EditScope::This } else { EditScope::All })
}

/// Turns a `--flag value` / `--clear-flag` pair into an optional change.
fn optional_change<T>(value: Option<T>, clear: bool) -> Option<Option<T>> {
    if clear {
        Some(None)
    } else {
        value.map(Some)
    }
}

fn time_change(
    value: Option<&str>,
    clear: bool,
) -> Result<(Option<Option<i32>>, Option<Option<i32>>)> {
    if clear {
        return Ok((Some(None), Some(None)));
    }
    match value {
        Some(s) => {
            let time = parse_time(s).map_err(|e| CoreError::InvalidInput(e.to_string()))?;
            Ok((Some(Some(time.hour)), Some(Some(time.minute))))
        }
        None => Ok((None, None)),
    }
}

fn build_changes(command: &EditCommand) -> Result<UpdateScheduleData> {
    let (start_hour, start_minute) = time_change(command.start.as_deref(), command.clear_start)?;
    let (end_hour, end_minute) = time_change(command.end.as_deref(), command.clear_end)?;
    let (gather_hour, gather_minute) =
        time_change(command.gather.as_deref(), command.clear_gather)?;

    let category_ids = if command.clear_tags {
        Some(Vec::new())
    } else {
        command.tags.clone()
    };

    Ok(UpdateScheduleData {
        date: command.date.as_deref().map(parse_date).transpose()?,
        start_hour,
        start_minute,
        end_hour,
        end_minute,
        gather_hour,
        gather_minute,
        venue: command.venue.clone(),
        title: command.title.clone(),
        notes: optional_change(command.notes.clone(), command.clear_notes),
        category_id: optional_change(command.category.clone(), command.clear_category),
        category_ids,
    })
}
