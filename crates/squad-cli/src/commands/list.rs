use anyhow::Result;
use chrono::{Days, NaiveDate, Utc};
use squad_core::error::CoreError;
use squad_core::models::ScheduleFilter;
use squad_core::repository::Repository;

use crate::cli::ListCommand;
use crate::config::Config;
use crate::parser::parse_date;
use crate::util::resolve_schedule_id;
use crate::views;
use crate::views::table::display_schedules;

pub async fn list_schedules(
    repo: &impl Repository,
    command: ListCommand,
    config: &Config,
    json: bool,
) -> Result<()> {
    let series_id = match &command.series {
        Some(id) => {
            let member = resolve_schedule_id(repo, id).await?;
            let schedule = repo
                .find_schedule_by_id(member)
                .await?
                .ok_or_else(|| CoreError::NotFound(member.to_string()))?;
            Some(schedule.series_id)
        }
        None => None,
    };

    let filter = build_filter(&command, config, series_id, Utc::now().date_naive())?;
    tracing::debug!(?filter, "listing schedules");
    let schedules = repo.find_schedules(&filter).await?;

    if json {
        return views::print_json(&schedules);
    }
    display_schedules(&schedules);
    Ok(())
}

/// Applies the configured window unless `--all`, explicit bounds or a
/// series filter say otherwise.
fn build_filter(
    command: &ListCommand,
    config: &Config,
    series_id: Option<uuid::Uuid>,
    today: NaiveDate,
) -> Result<ScheduleFilter> {
    let from = command.from.as_deref().map(parse_date).transpose()?;
    let to = command.to.as_deref().map(parse_date).transpose()?;

    if command.all || (series_id.is_some() && from.is_none() && to.is_none()) {
        return Ok(ScheduleFilter {
            from,
            to,
            series_id,
        });
    }

    let from = from.unwrap_or(today);
    let to = to.or_else(|| from.checked_add_days(Days::new(u64::from(config.list_window_days))));
    Ok(ScheduleFilter {
        from: Some(from),
        to,
        series_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command() -> ListCommand {
        ListCommand {
            from: None,
            to: None,
            series: None,
            all: false,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_window_from_today() {
        let filter = build_filter(&command(), &Config::default(), None, date(2024, 1, 1)).unwrap();
        assert_eq!(filter.from, Some(date(2024, 1, 1)));
        assert_eq!(filter.to, Some(date(2024, 1, 31)));
    }

    #[test]
    fn test_window_follows_explicit_from() {
        let mut cmd = command();
        cmd.from = Some("2024-03-01".to_string());
        let config = Config {
            list_window_days: 7,
            ..Config::default()
        };
        let filter = build_filter(&cmd, &config, None, date(2024, 1, 1)).unwrap();
        assert_eq!(filter.from, Some(date(2024, 3, 1)));
        assert_eq!(filter.to, Some(date(2024, 3, 8)));
    }

    #[test]
    fn test_all_and_series_drop_window() {
        let mut cmd = command();
        cmd.all = true;
        let filter = build_filter(&cmd, &Config::default(), None, date(2024, 1, 1)).unwrap();
        assert_eq!((filter.from, filter.to), (None, None));

        let series = uuid::Uuid::now_v7();
        let filter =
            build_filter(&command(), &Config::default(), Some(series), date(2024, 1, 1)).unwrap();
        assert_eq!((filter.from, filter.to, filter.series_id), (None, None, Some(series)));
    }
}
