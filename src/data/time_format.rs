//! Label formatting for time buckets and axis ticks.

use chrono::{DateTime, TimeDelta, Utc};

/// Granularity of a time label, picked from the visible span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeLabelFormat {
    /// `14:05`
    Time,
    /// `Mar 04`
    Day,
    /// `Mar`
    Month,
    /// `Mar 2024`
    MonthYear,
}

impl TimeLabelFormat {
    /// Choose the coarsest format that still distinguishes ticks across `span`.
    ///
    /// ```
    /// # use streamgraph::data::time_format::TimeLabelFormat;
    /// # use chrono::TimeDelta;
    /// assert_eq!(TimeLabelFormat::for_span(TimeDelta::hours(6)), TimeLabelFormat::Time);
    /// assert_eq!(TimeLabelFormat::for_span(TimeDelta::days(20)), TimeLabelFormat::Day);
    /// assert_eq!(TimeLabelFormat::for_span(TimeDelta::days(200)), TimeLabelFormat::Month);
    /// assert_eq!(TimeLabelFormat::for_span(TimeDelta::days(800)), TimeLabelFormat::MonthYear);
    /// ```
    pub fn for_span(span: TimeDelta) -> Self {
        if span < TimeDelta::days(2) {
            TimeLabelFormat::Time
        } else if span < TimeDelta::days(90) {
            TimeLabelFormat::Day
        } else if span < TimeDelta::days(365) {
            TimeLabelFormat::Month
        } else {
            TimeLabelFormat::MonthYear
        }
    }

    fn pattern(self) -> &'static str {
        match self {
            TimeLabelFormat::Time => "%H:%M",
            TimeLabelFormat::Day => "%b %d",
            TimeLabelFormat::Month => "%b",
            TimeLabelFormat::MonthYear => "%b %Y",
        }
    }

    pub fn format(self, t: DateTime<Utc>) -> String {
        t.format(self.pattern()).to_string()
    }
}

/// Short bucket label used under the hover bars (abbreviated month name).
///
/// ```
/// # use streamgraph::data::time_format::short_label;
/// # use chrono::{TimeZone, Utc};
/// assert_eq!(short_label(Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()), "Jan");
/// ```
pub fn short_label(t: DateTime<Utc>) -> String {
    TimeLabelFormat::Month.format(t)
}

/// Value tick label: plain decimals for ordinary steps, scientific for tiny ones.
pub fn format_value(v: f64, step: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    if step.abs() > 0.0 && step.abs() < 0.001 {
        let exponent = step.abs().log10().floor() + 1.0;
        return format!("{:.1}e{}", v / 10f64.powf(exponent), exponent);
    }
    let decimals = if step >= 1.0 || step == 0.0 {
        0
    } else {
        (-step.log10().floor()) as usize
    };
    format!("{:.*}", decimals, v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_labels_follow_step_precision() {
        assert_eq!(format_value(20.0, 10.0), "20");
        assert_eq!(format_value(0.5, 0.1), "0.5");
        assert_eq!(format_value(0.25, 0.05), "0.25");
        assert_eq!(format_value(0.0, 0.05), "0");
    }
}
