//! Maps (season, week) to the calendar Sunday the games were played on.

use anyhow::bail;
use chrono::{Days, NaiveDate};
use std::collections::HashMap;

/// Per-season week-1 Sunday anchors. Week N falls 7×(N−1) days after the
/// anchor.
#[derive(Debug, Clone)]
pub struct WeekCalendar {
    anchors: HashMap<i32, NaiveDate>,
}

impl Default for WeekCalendar {
    fn default() -> Self {
        let mut anchors = HashMap::new();
        // 2025 NFL week 1 Sunday.
        anchors.insert(2025, NaiveDate::from_ymd_opt(2025, 9, 7).unwrap());
        Self { anchors }
    }
}

impl WeekCalendar {
    /// Override or extend the built-in anchors (e.g. from `--week1-date`).
    pub fn with_anchor(mut self, season: i32, week1_sunday: NaiveDate) -> Self {
        self.anchors.insert(season, week1_sunday);
        self
    }

    pub fn sunday_for_week(&self, season: i32, week: u32) -> anyhow::Result<NaiveDate> {
        let Some(anchor) = self.anchors.get(&season) else {
            bail!(
                "no week-1 anchor configured for season {season}; pass --week1-date to supply one"
            );
        };
        Ok(*anchor + Days::new(7 * u64::from(week.saturating_sub(1))))
    }
}
