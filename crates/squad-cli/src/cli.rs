use clap::{Args, Parser, Subcommand};
use squad_core::models::{EditScope, RecurrenceRule};

/// Squad: plan recurring team practices, matches and meetups
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Add a schedule, optionally repeating
    Add(AddCommand),
    /// List schedules in a date range
    List(ListCommand),
    /// Show one schedule and the rest of its series
    Show(ShowCommand),
    /// Summarize the series a schedule belongs to
    Series(ShowCommand),
    /// Edit a schedule or its whole series
    Edit(EditCommand),
    /// Delete a schedule or its whole series
    Delete(DeleteCommand),
    /// Preview the dates a recurrence would produce, without saving anything
    Preview(PreviewCommand),
}

/// Repetition flags shared by `add` and `preview`
#[derive(Args, Debug, Clone)]
pub struct RecurrenceArgs {
    /// How often the schedule repeats (none, daily, weekly, monthly)
    #[arg(long, default_value = "none")]
    pub every: RecurrenceRule,
    /// Repeat every N days/weeks/months
    #[arg(long, allow_negative_numbers = true)]
    pub interval: Option<i32>,
    /// Last possible date of the series (inclusive)
    #[arg(long)]
    pub until: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct AddCommand {
    /// The title of the schedule
    pub title: String,
    /// The date of the first occurrence (YYYY-MM-DD or e.g. 'next monday')
    #[arg(short, long)]
    pub date: String,
    /// Start time (HH:MM)
    #[arg(long)]
    pub start: Option<String>,
    /// End time (HH:MM)
    #[arg(long)]
    pub end: Option<String>,
    /// Gathering time (HH:MM)
    #[arg(long)]
    pub gather: Option<String>,
    /// Where the team meets
    #[arg(short, long)]
    pub venue: Option<String>,
    #[arg(short, long)]
    pub notes: Option<String>,
    /// Primary category
    #[arg(long)]
    pub category: Option<String>,
    /// Additional categories
    #[arg(short, long)]
    pub tag: Vec<String>,
    #[command(flatten)]
    pub recurrence: RecurrenceArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct ListCommand {
    /// First date to include (defaults to today)
    #[arg(long)]
    pub from: Option<String>,
    /// Last date to include (defaults to the configured window)
    #[arg(long)]
    pub to: Option<String>,
    /// Only show members of the series this schedule belongs to
    #[arg(long)]
    pub series: Option<String>,
    /// Ignore the date window and list everything
    #[arg(long, conflicts_with_all = ["from", "to"])]
    pub all: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ShowCommand {
    /// The ID (or unique prefix) of the schedule
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct EditCommand {
    /// The ID (or unique prefix) of the schedule to edit
    pub id: String,

    /// Apply to this occurrence or the whole series (this|all)
    #[arg(long)]
    pub scope: Option<EditScope>,

    #[arg(long)]
    pub title: Option<String>,

    /// Move this occurrence to another date (ignored with --scope all)
    #[arg(long)]
    pub date: Option<String>,

    #[arg(long)]
    pub start: Option<String>,
    #[arg(long, conflicts_with = "start")]
    pub clear_start: bool,

    #[arg(long)]
    pub end: Option<String>,
    #[arg(long, conflicts_with = "end")]
    pub clear_end: bool,

    #[arg(long)]
    pub gather: Option<String>,
    #[arg(long, conflicts_with = "gather")]
    pub clear_gather: bool,

    #[arg(long)]
    pub venue: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,
    #[arg(long, conflicts_with = "notes")]
    pub clear_notes: bool,

    #[arg(long)]
    pub category: Option<String>,
    #[arg(long, conflicts_with = "category")]
    pub clear_category: bool,

    /// Replace the additional categories
    #[arg(long, num_args = 1..)]
    pub tags: Option<Vec<String>>,
    #[arg(long, conflicts_with = "tags")]
    pub clear_tags: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteCommand {
    /// The ID (or unique prefix) of the schedule to delete
    pub id: String,
    /// Delete this occurrence or the whole series (this|all)
    #[arg(long, default_value = "this")]
    pub scope: EditScope,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct PreviewCommand {
    /// The template date
    #[arg(short, long)]
    pub date: String,
    #[command(flatten)]
    pub recurrence: RecurrenceArgs,
    /// How many dates to show, template included
    #[arg(long, default_value_t = 10)]
    pub count: usize,
}
