use anyhow::Result;
use owo_colors::{OwoColorize, Style};
use squad_core::models::{NewScheduleData, RecurrenceRule};
use squad_core::repository::Repository;

use crate::cli::{AddCommand, RecurrenceArgs};
use crate::parser::{parse_date, split_time};
use crate::views;

pub async fn add_schedule(repo: &impl Repository, command: AddCommand, json: bool) -> Result<()> {
    let (start_hour, start_minute) = split_time(command.start.as_deref())?;
    let (end_hour, end_minute) = split_time(command.end.as_deref())?;
    let (gather_hour, gather_minute) = split_time(command.gather.as_deref())?;

    let mut data = NewScheduleData::new(command.title, parse_date(&command.date)?);
    data.start_hour = start_hour;
    data.start_minute = start_minute;
    data.end_hour = end_hour;
    data.end_minute = end_minute;
    data.gather_hour = gather_hour;
    data.gather_minute = gather_minute;
    data.venue = command.venue;
    data.notes = command.notes;
    data.category_id = command.category;
    data.category_ids = command.tag;
    apply_recurrence(&mut data, &command.recurrence)?;

    let created = repo.create_series(data).await?;

    if json {
        return views::print_json(&created);
    }

    let success_style = Style::new().green().bold();
    let info_style = Style::new().blue();
    let subtle_style = Style::new().bright_black();

    if created.root.recurrence_rule == RecurrenceRule::None {
        println!(
            "{} Created schedule: {}",
            "✓".style(success_style),
            created.root.title.bright_white().bold()
        );
    } else {
        println!(
            "{} Created recurring schedule: {} ({} occurrences)",
            "✓".style(success_style),
            created.root.title.bright_white().bold(),
            created.total_created
        );
    }
    println!(
        "  {} ID: {}",
        "→".style(info_style),
        created.root.id.to_string().yellow()
    );
    if let (Some(first), Some(last)) = (created.all_rows.first(), created.all_rows.last()) {
        if created.total_created > 1 {
            println!(
                "  {} From {} to {}",
                "→".style(info_style),
                first.date.to_string().cyan(),
                last.date.to_string().cyan()
            );
        } else {
            println!("  {} On {}", "→".style(info_style), first.date.to_string().cyan());
        }
    }
    let root_id = created.root.id.to_string();
    let short_id = &root_id[..8];
    println!(
        "   {} Show series: squad show {}",
        "•".style(subtle_style),
        short_id.yellow()
    );

    Ok(())
}

/// Copies the repetition flags onto `data`.
pub fn apply_recurrence(data: &mut NewScheduleData, args: &RecurrenceArgs) -> Result<()> {
    data.recurrence_rule = args.every;
    data.recurrence_interval = args.interval;
    data.recurrence_end_date = args.until.as_deref().map(parse_date).transpose()?;
    Ok(())
}
