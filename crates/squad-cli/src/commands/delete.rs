use anyhow::Result;
use dialoguer::Confirm;
use owo_colors::{OwoColorize, Style};
use serde_json::json;
use std::io::{self, IsTerminal};
use squad_core::error::CoreError;
use squad_core::models::EditScope;
use squad_core::repository::Repository;

use crate::cli::DeleteCommand;
use crate::util::resolve_schedule_id;
use crate::views;

pub async fn delete_schedule(
    repo: &impl Repository,
    command: DeleteCommand,
    json: bool,
) -> Result<()> {
    let id = resolve_schedule_id(repo, &command.id).await?;
    let schedule = repo
        .find_schedule_by_id(id)
        .await?
        .ok_or_else(|| CoreError::NotFound(id.to_string()))?;

    if !command.force {
        let prompt = match command.scope {
            EditScope::This => format!(
                "Are you sure you want to delete '{}' on {}?",
                schedule.title, schedule.date
            ),
            EditScope::All => format!(
                "Are you sure you want to delete every occurrence of '{}'?",
                schedule.title
            ),
        };
        // Without a terminal there is nobody to answer the prompt.
        if !io::stdin().is_terminal() || !io::stderr().is_terminal() {
            eprintln!("Deletion cancelled. Pass --force to delete without confirmation.");
            return Ok(());
        }
        let confirmation = Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()?;

        if !confirmation {
            if json {
                eprintln!("Deletion cancelled.");
            } else {
                println!("Deletion cancelled.");
            }
            return Ok(());
        }
    }

    let removed = repo.delete_occurrence(id, command.scope).await?;

    if json {
        return views::print_json(&json!({ "id": id, "scope": command.scope, "removed": removed }));
    }
    let success_style = Style::new().green().bold();
    let noun = if removed == 1 { "schedule" } else { "schedules" };
    println!(
        "{} Deleted {} {}: {}",
        "✓".style(success_style),
        removed,
        noun,
        schedule.title.bright_white().bold()
    );
    Ok(())
}
