use typelab::time_series::{peak_wpm, TimeSeriesPoint};

/// Compute X (seconds) and Y (WPM) bounds for the results chart
pub fn compute_chart_params(points: &[TimeSeriesPoint], duration_secs: u32) -> (f64, f64) {
    let overall_duration = match points.last() {
        Some(p) => p.t,
        None => duration_secs as f64,
    }
    .max(1.0);

    (overall_duration, peak_wpm(points).ceil())
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}

/// `m:ss` countdown label
pub fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_chart_params_empty() {
        let (x, y) = compute_chart_params(&[], 30);
        assert_eq!(x, 30.0);
        assert_eq!(y, 0.0);
    }

    #[test]
    fn test_compute_chart_params_uses_last_sample_and_peak() {
        let points = [
            TimeSeriesPoint::new(1.0, 24.0),
            TimeSeriesPoint::new(2.0, 51.3),
            TimeSeriesPoint::new(3.0, 40.0),
        ];
        assert_eq!(compute_chart_params(&points, 15), (3.0, 52.0));
    }

    #[test]
    fn test_format_label() {
        assert_eq!(format_label(1.0), "1");
        assert_eq!(format_label(1.2345), "1.23");
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(60), "1:00");
        assert_eq!(format_clock(9), "0:09");
    }
}
