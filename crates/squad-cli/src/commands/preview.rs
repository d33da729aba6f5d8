use anyhow::Result;
use squad_core::models::NewScheduleData;
use squad_core::recurrence::RecurrenceExpander;

use crate::cli::PreviewCommand;
use crate::commands::add::apply_recurrence;
use crate::parser::parse_date;
use crate::views;
use crate::views::table::display_preview;

/// Expands a recurrence in memory; nothing is written to the store.
pub fn preview_recurrence(command: PreviewCommand, json: bool) -> Result<()> {
    let mut data = NewScheduleData::new("preview", parse_date(&command.date)?);
    apply_recurrence(&mut data, &command.recurrence)?;

    let params = data.recurrence();
    params.validate(data.date)?;
    let dates = RecurrenceExpander::new(data.date, params).preview(command.count);

    if json {
        return views::print_json(&dates);
    }
    display_preview(&dates);
    Ok(())
}
