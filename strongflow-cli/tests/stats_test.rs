use chrono::{Duration, TimeZone, Utc};
use uuid::Uuid;

use strongflow_cli::models::{Measurement, Profile, TrainingLog};
use strongflow_cli::stats::{chart_series_in, DashboardSummary, CHART_POINTS, FALLBACK_NAME};

fn log(id: usize, name: &str, weight: f64, days_ago: i64) -> TrainingLog {
    // 2024-06-10 is a Monday
    let monday = Utc.with_ymd_and_hms(2024, 6, 10, 18, 0, 0).unwrap();
    TrainingLog {
        id: id.to_string(),
        exercise_name: name.to_string(),
        weight,
        reps: 8,
        feeling: None,
        created_at: monday - Duration::days(days_ago),
    }
}

fn profile(current: f64, target: f64) -> Profile {
    Profile {
        id: Uuid::new_v4(),
        username: "Ana".to_string(),
        current_weight: current,
        target_weight: target,
    }
}

#[test]
fn test_summary_without_data() {
    let summary = DashboardSummary::new(None, &[], &[]);

    assert_eq!(summary.display_name, FALLBACK_NAME);
    assert_eq!(summary.progress_percent, 0.0);
    assert_eq!(summary.last_squat, 0.0);
    assert_eq!(summary.last_glutes, 0.0);
    assert!(summary.chart.is_empty());
}

#[test]
fn test_progress_percent() {
    let summary = DashboardSummary::new(Some(&profile(60.0, 65.0)), &[], &[]);
    assert!((summary.progress_percent - 92.307).abs() < 0.01);
    assert_eq!(summary.display_name, "Ana");

    let summary = DashboardSummary::new(Some(&profile(70.0, 65.0)), &[], &[]);
    assert_eq!(summary.progress_percent, 100.0);
}

#[test]
fn test_last_squat_picks_newest_match() {
    let logs = vec![
        log(3, "Peso Muerto", 80.0, 0),
        log(2, "Sentadilla", 50.0, 1),
        log(1, "Sentadilla", 45.0, 2),
    ];
    let summary = DashboardSummary::new(None, &logs, &[]);
    assert_eq!(summary.last_squat, 50.0);

    let logs = vec![log(1, "Hip Thrust", 60.0, 0)];
    assert_eq!(DashboardSummary::new(None, &logs, &[]).last_squat, 0.0);
}

#[test]
fn test_latest_glutes() {
    let measurements = vec![
        Measurement {
            id: "2".to_string(),
            glutes_cm: 99.0,
            thigh_cm: 56.0,
            created_at: Utc::now(),
        },
        Measurement {
            id: "1".to_string(),
            glutes_cm: 97.0,
            thigh_cm: 55.0,
            created_at: Utc::now() - Duration::days(7),
        },
    ];

    assert_eq!(DashboardSummary::new(None, &[], &measurements).last_glutes, 99.0);
}

#[test]
fn test_chart_short_history_is_oldest_first() {
    let logs = vec![log(3, "Sentadilla", 50.0, 0), log(2, "Zancadas", 12.0, 1), log(1, "Hip Thrust", 70.0, 2)];
    let chart = chart_series_in(&logs, &Utc);

    let weights: Vec<f64> = chart.iter().map(|p| p.weight).collect();
    let labels: Vec<&str> = chart.iter().map(|p| p.label).collect();
    assert_eq!(weights, vec![70.0, 12.0, 50.0]);
    assert_eq!(labels, vec!["Sat", "Sun", "Mon"]);
}

#[test]
fn test_chart_keeps_seven_most_recent() {
    let logs: Vec<TrainingLog> = (0..10)
        .map(|i| log(10 - i, "Sentadilla", (100 - i) as f64, i as i64))
        .collect();
    let chart = chart_series_in(&logs, &Utc);

    assert_eq!(chart.len(), CHART_POINTS);
    assert_eq!(chart.first().unwrap().weight, 94.0);
    assert_eq!(chart.last().unwrap().weight, 100.0);
}
