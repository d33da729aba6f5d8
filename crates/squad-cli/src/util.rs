use anyhow::{anyhow, Result};
use squad_core::error::CoreError;
use squad_core::repository::Repository;
use uuid::Uuid;

/// Resolves a full id or a unique prefix of one to the schedule's id.
pub async fn resolve_schedule_id(repo: &impl Repository, short_id: &str) -> Result<Uuid> {
    if let Ok(id) = Uuid::parse_str(short_id) {
        return Ok(id);
    }
    if short_id.len() < 2 {
        return Err(anyhow!(CoreError::InvalidInput(
            "Short ID must be at least 2 characters long.".to_string()
        )));
    }
    let schedules = repo.find_schedules_by_short_id_prefix(short_id).await?;
    if schedules.len() == 1 {
        Ok(schedules[0].id)
    } else if schedules.is_empty() {
        Err(anyhow!(CoreError::NotFound(format!("ID prefix '{}'", short_id))))
    } else {
        let schedule_info: Vec<(String, String)> = schedules
            .into_iter()
            .map(|s| (s.id.to_string(), format!("{} on {}", s.title, s.date)))
            .collect();
        Err(anyhow!(CoreError::AmbiguousId(schedule_info)))
    }
}

/// Renders the `HH:MM` form of an optional hour/minute pair.
pub fn format_time(hour: Option<i32>, minute: Option<i32>) -> Option<String> {
    hour.map(|h| format!("{:02}:{:02}", h, minute.unwrap_or(0)))
}
