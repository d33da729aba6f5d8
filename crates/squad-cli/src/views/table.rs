use chrono::{NaiveDate, Utc};
use chrono_humanize::Humanize;
use comfy_table::{Attribute, Cell, Color, Row, Table};
use squad_core::models::{RecurrenceRule, Schedule, SeriesSummary, UNDECIDED_VENUE};

use crate::util::format_time;

fn short_id(schedule: &Schedule) -> String {
    schedule.id.to_string()[..8].to_string()
}

fn time_range(schedule: &Schedule) -> String {
    match (
        format_time(schedule.start_hour, schedule.start_minute),
        format_time(schedule.end_hour, schedule.end_minute),
    ) {
        (Some(start), Some(end)) => format!("{}-{}", start, end),
        (Some(start), None) => start,
        (None, Some(end)) => format!("until {}", end),
        (None, None) => "all day".to_string(),
    }
}

fn date_cell(date: NaiveDate, today: NaiveDate) -> Cell {
    let text = date.format("%a %Y-%m-%d").to_string();
    if date < today {
        Cell::new(text).fg(Color::DarkGrey)
    } else if date == today {
        Cell::new(text).fg(Color::Yellow).add_attribute(Attribute::Bold)
    } else {
        Cell::new(text)
    }
}

fn recurrence_label(rule: RecurrenceRule, interval: i32) -> String {
    match (rule, interval) {
        (RecurrenceRule::None, _) => "once".to_string(),
        (rule, 1) => rule.to_string(),
        (RecurrenceRule::Daily, n) => format!("every {} days", n),
        (RecurrenceRule::Weekly, n) => format!("every {} weeks", n),
        (RecurrenceRule::Monthly, n) => format!("every {} months", n),
    }
}

pub fn display_schedules(schedules: &[Schedule]) {
    if schedules.is_empty() {
        println!("No schedules found.");
        return;
    }

    let today = Utc::now().date_naive();
    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Time", "Gather", "Title", "Venue", "Repeats"]);

    for schedule in schedules {
        let mut row = Row::new();
        row.add_cell(Cell::new(short_id(schedule)));
        row.add_cell(date_cell(schedule.date, today));
        row.add_cell(Cell::new(time_range(schedule)));
        row.add_cell(Cell::new(
            format_time(schedule.gather_hour, schedule.gather_minute).unwrap_or_default(),
        ));

        let mut title = String::new();
        if schedule.recurrence_rule.is_recurring() {
            title.push('↻');
            title.push(' ');
        }
        title.push_str(&schedule.title);
        if schedule.is_root() && schedule.recurrence_rule.is_recurring() {
            title.push_str(" (root)");
        }
        row.add_cell(Cell::new(title));

        let venue_cell = if schedule.venue == UNDECIDED_VENUE {
            Cell::new(&schedule.venue).fg(Color::DarkGrey)
        } else {
            Cell::new(&schedule.venue)
        };
        row.add_cell(venue_cell);
        row.add_cell(Cell::new(recurrence_label(
            schedule.recurrence_rule,
            schedule.recurrence_interval,
        )));

        table.add_row(row);
    }

    println!("{table}");
}

pub fn display_schedule_details(schedule: &Schedule, members: &[Schedule]) {
    let mut table = Table::new();
    table.set_header(vec!["Field", "Value"]);

    let gather = format_time(schedule.gather_hour, schedule.gather_minute);
    let categories = schedule.category_ids.0.join(", ");
    let parent = schedule
        .parent_schedule_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());
    let fields: Vec<(&str, String)> = vec![
        ("ID", schedule.id.to_string()),
        ("Title", schedule.title.clone()),
        ("Date", schedule.date.to_string()),
        ("Time", time_range(schedule)),
        ("Gather", gather.unwrap_or_else(|| "-".to_string())),
        ("Venue", schedule.venue.clone()),
        ("Notes", schedule.notes.clone().unwrap_or_else(|| "-".to_string())),
        ("Category", schedule.category_id.clone().unwrap_or_else(|| "-".to_string())),
        ("Tags", if categories.is_empty() { "-".to_string() } else { categories }),
        (
            "Repeats",
            recurrence_label(schedule.recurrence_rule, schedule.recurrence_interval),
        ),
        ("Series", schedule.series_id.to_string()),
        ("Parent", parent),
        ("Updated", schedule.updated_at.humanize()),
    ];
    for (field, value) in fields {
        table.add_row(vec![Cell::new(field).add_attribute(Attribute::Bold), Cell::new(value)]);
    }
    println!("{table}");

    if members.len() > 1 {
        println!();
        println!("Series members ({}):", members.len());
        display_schedules(members);
    }
}

pub fn display_series_summary(summary: &SeriesSummary) {
    let mut table = Table::new();
    table.set_header(vec!["Series", "Root", "Members", "First", "Last", "Repeats"]);

    let optional_date =
        |d: Option<NaiveDate>| d.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string());
    table.add_row(vec![
        Cell::new(summary.series_id.to_string()[..8].to_string()),
        Cell::new(
            summary
                .root_id
                .map(|id| id.to_string()[..8].to_string())
                .unwrap_or_else(|| "deleted".to_string()),
        ),
        Cell::new(summary.member_count),
        Cell::new(optional_date(summary.first_date)),
        Cell::new(optional_date(summary.last_date)),
        Cell::new(recurrence_label(summary.recurrence_rule, summary.recurrence_interval)),
    ]);
    println!("{table}");
}

pub fn display_preview(dates: &[NaiveDate]) {
    let today = Utc::now().date_naive();
    let mut table = Table::new();
    table.set_header(vec!["#", "Date", "In"]);

    for (index, date) in dates.iter().enumerate() {
        let label = if index == 0 {
            "template".to_string()
        } else {
            index.to_string()
        };
        table.add_row(vec![
            Cell::new(label),
            date_cell(*date, today),
            Cell::new((*date - today).humanize()),
        ]);
    }
    println!("{table}");
}
