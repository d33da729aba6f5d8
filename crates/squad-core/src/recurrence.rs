use chrono::{Days, Duration, Months, NaiveDate};

use crate::error::CoreError;
use crate::models::{date_key, RecurrenceRule};

/// Hard cap on generated occurrences per series, independent of the date span.
pub const MAX_GENERATED_OCCURRENCES: usize = 100;

/// Span used when a template has no explicit end date.
pub const DEFAULT_HORIZON_DAYS: i64 = 365;

/// Recurrence parameters carried by a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecurrenceParams {
    pub rule: RecurrenceRule,
    pub interval: Option<i32>,
    pub end_date: Option<NaiveDate>,
}

impl RecurrenceParams {
    pub fn new(rule: RecurrenceRule, interval: Option<i32>, end_date: Option<NaiveDate>) -> Self {
        Self { rule, interval, end_date }
    }

    /// Step size in rule units. Missing or non-positive values count as 1.
    #[inline]
    pub fn effective_interval(&self) -> u32 {
        match self.interval {
            Some(n) if n > 0 => n as u32,
            _ => 1,
        }
    }

    /// Last date (inclusive) an occurrence may fall on.
    pub fn end_bound(&self, start: NaiveDate) -> NaiveDate {
        self.end_date.unwrap_or_else(|| {
            start
                .checked_add_signed(Duration::days(DEFAULT_HORIZON_DAYS))
                .unwrap_or(NaiveDate::MAX)
        })
    }

    /// Rejects parameters that would otherwise be silently corrected.
    ///
    /// # Behavior
    /// - `none` accepts any interval and end date, they are never used
    /// - an explicit interval must be at least 1
    /// - an explicit end date must not precede the template date
    pub fn validate(&self, start: NaiveDate) -> Result<(), CoreError> {
        if self.rule == RecurrenceRule::None {
            return Ok(());
        }

        if let Some(interval) = self.interval {
            if interval < 1 {
                return Err(CoreError::InvalidRecurrence(format!(
                    "interval must be a positive integer, got {}",
                    interval
                )));
            }
        }

        if let Some(end_date) = self.end_date {
            if end_date < start {
                return Err(CoreError::InvalidRecurrence(format!(
                    "end date {} is before the start date {}",
                    date_key(end_date),
                    date_key(start)
                )));
            }
        }

        Ok(())
    }
}

impl RecurrenceRule {
    /// Advances `from` by `interval` units of this rule.
    ///
    /// Monthly steps use calendar months and clamp to the last day of a
    /// shorter target month (Jan 31 + 1 month = Feb 29 in a leap year).
    /// Returns `None` for `none` or when the result leaves chrono's range.
    pub fn advance(self, from: NaiveDate, interval: u32) -> Option<NaiveDate> {
        match self {
            RecurrenceRule::None => None,
            RecurrenceRule::Daily => from.checked_add_days(Days::new(u64::from(interval))),
            RecurrenceRule::Weekly => from.checked_add_days(Days::new(u64::from(interval) * 7)),
            RecurrenceRule::Monthly => from.checked_add_months(Months::new(interval)),
        }
    }

    pub fn is_recurring(self) -> bool {
        self != RecurrenceRule::None
    }
}

/// Expands a template date into the dates of its generated occurrences.
///
/// The expander performs no I/O. The template's own date is never part of
/// the output; it stays with the series root.
#[derive(Debug, Clone, Copy)]
pub struct RecurrenceExpander {
    start: NaiveDate,
    params: RecurrenceParams,
}

impl RecurrenceExpander {
    pub fn new(start: NaiveDate, params: RecurrenceParams) -> Self {
        Self { start, params }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end_bound(&self) -> NaiveDate {
        self.params.end_bound(self.start)
    }

    /// Iterates generated dates lazily, honoring the end bound and the cap.
    pub fn iter(&self) -> Occurrences {
        Occurrences {
            rule: self.params.rule,
            interval: self.params.effective_interval(),
            current: self.start,
            end: self.end_bound(),
            emitted: 0,
        }
    }

    /// Strictly increasing child dates, between 0 and
    /// [`MAX_GENERATED_OCCURRENCES`] of them.
    pub fn expand(&self) -> Vec<NaiveDate> {
        let dates: Vec<NaiveDate> = self.iter().collect();
        tracing::debug!(
            start = %date_key(self.start),
            rule = %self.params.rule,
            generated = dates.len(),
            "expanded recurrence"
        );
        dates
    }

    /// The template date followed by up to `count - 1` generated dates.
    pub fn preview(&self, count: usize) -> Vec<NaiveDate> {
        std::iter::once(self.start)
            .chain(self.iter())
            .take(count)
            .collect()
    }
}

/// Iterator over generated occurrence dates.
#[derive(Debug, Clone)]
pub struct Occurrences {
    rule: RecurrenceRule,
    interval: u32,
    current: NaiveDate,
    end: NaiveDate,
    emitted: usize,
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        if self.emitted >= MAX_GENERATED_OCCURRENCES {
            return None;
        }
        let next = self.rule.advance(self.current, self.interval)?;
        if next > self.end {
            self.emitted = MAX_GENERATED_OCCURRENCES;
            return None;
        }
        self.current = next;
        self.emitted += 1;
        Some(next)
    }
}
