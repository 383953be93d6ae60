use std::collections::HashMap;

use chrono::{Duration, Months, NaiveDate};

use crate::forms::date_part;
use crate::models::TrendPoint;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeRange {
    Week,
    Month,
    Quarter,
    Year,
    ThreeYears,
}

impl TimeRange {
    pub const ALL: [TimeRange; 5] = [
        TimeRange::Week,
        TimeRange::Month,
        TimeRange::Quarter,
        TimeRange::Year,
        TimeRange::ThreeYears,
    ];

    /// Query value understood by `/dashboard?range=`.
    pub fn as_query(&self) -> &'static str {
        match self {
            TimeRange::Week => "7d",
            TimeRange::Month => "30d",
            TimeRange::Quarter => "3m",
            TimeRange::Year => "12m",
            TimeRange::ThreeYears => "3y",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeRange::Week => "Last 7 days",
            TimeRange::Month => "Last 30 days",
            TimeRange::Quarter => "Last 3 months",
            TimeRange::Year => "Last 12 months",
            TimeRange::ThreeYears => "Last 3 years",
        }
    }

    pub fn start_date(&self, today: NaiveDate) -> NaiveDate {
        let start = match self {
            TimeRange::Week => today.checked_sub_signed(Duration::days(7)),
            TimeRange::Month => today.checked_sub_signed(Duration::days(30)),
            TimeRange::Quarter => today.checked_sub_months(Months::new(3)),
            TimeRange::Year => today.checked_sub_months(Months::new(12)),
            TimeRange::ThreeYears => today.checked_sub_months(Months::new(36)),
        };
        start.unwrap_or(today)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DailyFigures {
    pub date: NaiveDate,
    pub spent: f64,
    pub gained: f64,
    pub items: f64,
}

/// One entry per calendar day from `start` through `today`; days the backend skipped are zero.
pub fn densify_trend(points: &[TrendPoint], start: NaiveDate, today: NaiveDate) -> Vec<DailyFigures> {
    let by_day: HashMap<NaiveDate, &TrendPoint> = points
        .iter()
        .filter_map(|point| date_part(&point.date).map(|day| (day, point)))
        .collect();

    start
        .iter_days()
        .take_while(|day| *day <= today)
        .map(|date| {
            let point = by_day.get(&date);
            DailyFigures {
                date,
                spent: point.map(|p| p.spent).unwrap_or(0.0),
                gained: point.map(|p| p.gained).unwrap_or(0.0),
                items: point.map(|p| p.items).unwrap_or(0.0),
            }
        })
        .collect()
}

/// Percentage change of `current` against `previous`, month over month.
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        if current == 0.0 {
            0.0
        } else {
            100.0
        }
    } else {
        (current - previous) / previous.abs() * 100.0
    }
}

/// Height of `value` on an axis whose top is `max`, for a chart `height` units tall.
pub fn scale(value: f64, max: f64, height: f64) -> f64 {
    if max <= 0.0 {
        0.0
    } else {
        (value.max(0.0) / max * height).min(height)
    }
}

pub fn axis_max<'a>(values: impl IntoIterator<Item = &'a f64>) -> f64 {
    values.into_iter().copied().fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn range_start_dates() {
        let today = day(2024, 5, 31);
        assert_eq!(TimeRange::Week.start_date(today), day(2024, 5, 24));
        assert_eq!(TimeRange::Month.start_date(today), day(2024, 5, 1));
        assert_eq!(TimeRange::Quarter.start_date(today), day(2024, 2, 29));
        assert_eq!(TimeRange::Year.start_date(today), day(2023, 5, 31));
        assert_eq!(TimeRange::ThreeYears.start_date(today), day(2021, 5, 31));
    }

    #[test]
    fn trend_fills_missing_days_with_zero() {
        let points = vec![
            TrendPoint {
                date: "2024-05-02".into(),
                spent: 50_000.0,
                gained: 0.0,
                items: 3.0,
            },
            TrendPoint {
                date: "2024-05-04T00:00:00.000Z".into(),
                spent: 0.0,
                gained: 80_000.0,
                items: 0.0,
            },
            TrendPoint {
                date: "2024-04-01".into(),
                spent: 1.0,
                gained: 1.0,
                items: 1.0,
            },
        ];
        let filled = densify_trend(&points, day(2024, 5, 1), day(2024, 5, 4));
        assert_eq!(filled.len(), 4);
        assert_eq!(filled[0].spent, 0.0);
        assert_eq!(filled[1].spent, 50_000.0);
        assert_eq!(filled[1].items, 3.0);
        assert_eq!(filled[3].gained, 80_000.0);
    }

    #[test]
    fn percent_change_handles_zero_baseline() {
        assert_eq!(percent_change(0.0, 0.0), 0.0);
        assert_eq!(percent_change(500.0, 0.0), 100.0);
        assert_eq!(percent_change(150.0, 100.0), 50.0);
        assert_eq!(percent_change(50.0, -100.0), 150.0);
    }

    #[test]
    fn scale_clamps_to_chart() {
        assert_eq!(scale(5.0, 10.0, 200.0), 100.0);
        assert_eq!(scale(5.0, 0.0, 200.0), 0.0);
        assert_eq!(scale(-3.0, 10.0, 200.0), 0.0);
        assert_eq!(axis_max(&[1.0, 7.5, 3.0]), 7.5);
    }
}
