use chrono::DateTime;

const SECS_PER_DAY: f64 = 60.0 * 60.0 * 24.0;

/// X bounds over the day series; a single-window report still spans a
/// visible range.
pub fn day_bounds(days: &[f64]) -> (f64, f64) {
    if days.is_empty() {
        return (0.0, 1.0);
    }

    let mut min = days[0];
    let mut max = days[0];
    for &d in days {
        if d < min {
            min = d;
        }
        if d > max {
            max = d;
        }
    }

    if max <= min {
        (min, min + 1.0)
    } else {
        (min, max)
    }
}

/// Y upper bound: the series maximum rounded up, never zero
pub fn value_ceiling(values: &[f64]) -> f64 {
    let mut highest = 0.0;
    for &v in values {
        if v > highest {
            highest = v;
        }
    }

    if highest <= 0.0 {
        1.0
    } else {
        highest.ceil()
    }
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}

/// Render a day-fraction x value as a calendar date label
pub fn format_day_label(day: f64) -> String {
    let secs = (day * SECS_PER_DAY) as i64;
    match DateTime::from_timestamp(secs, 0) {
        Some(dt) => dt.format("%m-%d").to_string(),
        None => format_label(day),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_day_bounds_empty() {
        assert_eq!(day_bounds(&[]), (0.0, 1.0));
    }

    #[test]
    fn test_day_bounds_single_point_gets_padded() {
        let (lo, hi) = day_bounds(&[20_000.5]);
        assert_eq!(lo, 20_000.5);
        assert_eq!(hi, 20_001.5);
    }

    #[test]
    fn test_day_bounds_spans_series() {
        assert_eq!(day_bounds(&[20_002.0, 20_000.0, 20_001.0]), (20_000.0, 20_002.0));
    }

    #[test]
    fn test_value_ceiling() {
        assert_eq!(value_ceiling(&[]), 1.0);
        assert_eq!(value_ceiling(&[0.0, 0.0]), 1.0);
        assert_eq!(value_ceiling(&[0.4, 2.3, 1.9]), 3.0);
    }

    #[test]
    fn test_format_label() {
        assert_eq!(format_label(1.0), "1");
        assert_eq!(format_label(1.2345), "1.23");
    }

    #[test]
    fn test_format_day_label_is_a_date() {
        let ts = NaiveDate::from_ymd_opt(2026, 8, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
            .and_utc()
            .timestamp() as f64;
        assert_eq!(format_day_label(ts / (60.0 * 60.0 * 24.0)), "08-01");
    }
}
