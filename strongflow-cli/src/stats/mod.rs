//! Dashboard aggregation over already-fetched collections.
//!
//! Logs and measurements arrive newest first, as ordered by the backend.

use chrono::{Datelike, Local, TimeZone, Weekday};

use crate::models::{Measurement, Profile, TrainingLog};

/// Maximum number of points in the trend chart
pub const CHART_POINTS: usize = 7;

/// Exercise name fragment used for the "last squat" figure
pub const SQUAT_MATCH: &str = "sentadilla";

/// Greeting name shown before a profile has loaded
pub const FALLBACK_NAME: &str = "Imparable";

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: &'static str,
    pub weight: f64,
}

/// Everything the dashboard view displays
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub display_name: String,
    pub current_weight: f64,
    pub target_weight: f64,
    pub progress_percent: f64,
    pub last_squat: f64,
    pub last_glutes: f64,
    pub chart: Vec<ChartPoint>,
}

impl DashboardSummary {
    pub fn new(profile: Option<&Profile>, logs: &[TrainingLog], measurements: &[Measurement]) -> Self {
        Self {
            display_name: profile
                .map(|p| p.username.clone())
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| FALLBACK_NAME.to_string()),
            current_weight: profile.map_or(0.0, |p| p.current_weight),
            target_weight: profile.map_or(0.0, |p| p.target_weight),
            progress_percent: progress_percent(profile),
            last_squat: last_squat(logs),
            last_glutes: latest_glutes(measurements),
            chart: chart_series(logs),
        }
    }
}

pub fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// Weight trend over the most recent logs, oldest first, labelled by local weekday
pub fn chart_series(logs: &[TrainingLog]) -> Vec<ChartPoint> {
    chart_series_in(logs, &Local)
}

pub fn chart_series_in<Tz: TimeZone>(logs: &[TrainingLog], tz: &Tz) -> Vec<ChartPoint> {
    logs.iter()
        .take(CHART_POINTS)
        .rev()
        .map(|log| ChartPoint {
            label: weekday_label(log.created_at.with_timezone(tz).weekday()),
            weight: log.weight,
        })
        .collect()
}

/// Weight of the most recent squat, 0 when none was logged
pub fn last_squat(logs: &[TrainingLog]) -> f64 {
    logs.iter()
        .find(|log| log.exercise_name.to_lowercase().contains(SQUAT_MATCH))
        .map_or(0.0, |log| log.weight)
}

/// Glutes circumference of the most recent measurement, 0 when none exists
pub fn latest_glutes(measurements: &[Measurement]) -> f64 {
    measurements.first().map_or(0.0, |m| m.glutes_cm)
}

/// Current weight as a percentage of target, capped at 100
pub fn progress_percent(profile: Option<&Profile>) -> f64 {
    let current = profile.map_or(0.0, |p| p.current_weight);
    let target = match profile.map_or(0.0, |p| p.target_weight) {
        t if t == 0.0 => 1.0,
        t => t,
    };

    (current / target * 100.0).min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn log(name: &str, weight: f64, days_ago: i64) -> TrainingLog {
        TrainingLog {
            id: Uuid::new_v4().to_string(),
            exercise_name: name.to_string(),
            weight,
            reps: 10,
            feeling: Some("Buena".to_string()),
            created_at: Utc::now() - Duration::days(days_ago),
        }
    }

    #[test]
    fn test_last_squat_is_case_insensitive() {
        let logs = vec![log("Peso Muerto", 80.0, 0), log("SENTADILLA búlgara", 22.0, 1)];
        assert_eq!(last_squat(&logs), 22.0);
    }

    #[test]
    fn test_progress_with_zero_target() {
        let profile = Profile {
            id: Uuid::new_v4(),
            username: "Ana".to_string(),
            current_weight: 0.5,
            target_weight: 0.0,
        };
        assert_eq!(progress_percent(Some(&profile)), 50.0);
        assert_eq!(progress_percent(None), 0.0);
    }

    #[test]
    fn test_weekday_labels_in_fixed_zone() {
        let monday = chrono::Utc.with_ymd_and_hms(2024, 5, 6, 12, 0, 0).unwrap();
        let logs = vec![TrainingLog {
            created_at: monday,
            ..log("Sentadilla", 40.0, 0)
        }];

        let series = chart_series_in(&logs, &Utc);
        assert_eq!(series, vec![ChartPoint { label: "Mon", weight: 40.0 }]);
    }

    #[test]
    fn test_summary_without_profile() {
        let summary = DashboardSummary::new(None, &[], &[]);
        assert_eq!(summary.display_name, FALLBACK_NAME);
        assert_eq!(summary.current_weight, 0.0);
        assert_eq!(summary.last_squat, 0.0);
        assert_eq!(summary.last_glutes, 0.0);
        assert!(summary.chart.is_empty());
    }
}
