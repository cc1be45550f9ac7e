//! Chart Aligner
//!
//! Builds a common label axis from a primary series and lines secondary series
//! up against it by time of day. A secondary value is taken only from a sample
//! whose hour and minute equal the label's exactly; everything else is absent.

use hashlink::LinkedHashMap;

use crate::utils::time::label_time_of_day;

/// Hour and minute
pub type TimeOfDay = (u32, u32);

/// A point of the primary series; its label is shown on the axis
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub label: String,
    pub value: Option<f64>,
}

impl Sample {
    pub fn new(label: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// A point of a secondary series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedValue {
    pub time: TimeOfDay,
    pub value: Option<f64>,
}

/// The series whose labels define the axis
#[derive(Debug, Clone, PartialEq)]
pub struct PrimarySeries {
    pub name: String,
    pub samples: Vec<Sample>,
}

/// A series sampled on its own timestamps
#[derive(Debug, Clone, PartialEq)]
pub struct SecondarySeries {
    pub name: String,
    pub samples: Vec<TimedValue>,
}

/// Common label axis plus one value array per series, in insertion order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlignedSeries {
    pub labels: Vec<String>,
    pub series: LinkedHashMap<String, Vec<Option<f64>>>,
}

impl AlignedSeries {
    /// Nothing to draw
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Values of the named series
    pub fn values(&self, name: &str) -> Option<&[Option<f64>]> {
        self.series.get(name).map(Vec::as_slice)
    }

    /// Every series has exactly one value per label
    pub fn is_consistent(&self) -> bool {
        self.series.values().all(|v| v.len() == self.labels.len())
    }
}

/// Key for `name` that no series in `series` uses yet: "name", "name (2)", ...
fn unique_name(series: &LinkedHashMap<String, Vec<Option<f64>>>, name: &str) -> String {
    if !series.contains_key(name) {
        return name.to_string();
    }
    (2..)
        .map(|n| format!("{name} ({n})"))
        .find(|candidate| !series.contains_key(candidate))
        .unwrap_or_else(|| name.to_string())
}

/// A lone series on its own labels
///
/// Nothing is aligned against it, so every sample is kept, repeated labels
/// included.
pub fn plot_all(primary: &PrimarySeries) -> AlignedSeries {
    if primary.samples.is_empty() {
        return AlignedSeries::default();
    }
    let mut series = LinkedHashMap::new();
    series.insert(
        primary.name.clone(),
        primary.samples.iter().map(|s| s.value).collect(),
    );
    AlignedSeries {
        labels: primary.samples.iter().map(|s| s.label.clone()).collect(),
        series,
    }
}

/// Align `secondaries` to the axis of `primary`
///
/// Duplicate primary labels keep their first occurrence. An empty primary
/// yields an empty result. A secondary named like an earlier series gets a
/// numbered suffix, so every input keeps its own values.
pub fn align(primary: &PrimarySeries, secondaries: &[SecondarySeries]) -> AlignedSeries {
    if primary.samples.is_empty() {
        return AlignedSeries::default();
    }

    let mut labels: Vec<String> = Vec::with_capacity(primary.samples.len());
    let mut primary_values = Vec::with_capacity(primary.samples.len());
    for sample in &primary.samples {
        if labels.contains(&sample.label) {
            continue;
        }
        labels.push(sample.label.clone());
        primary_values.push(sample.value);
    }

    let axis: Vec<Option<TimeOfDay>> = labels.iter().map(|l| label_time_of_day(l)).collect();

    let mut series = LinkedHashMap::new();
    series.insert(primary.name.clone(), primary_values);
    for secondary in secondaries {
        let values = axis
            .iter()
            .map(|time| {
                time.and_then(|time| {
                    secondary
                        .samples
                        .iter()
                        .find(|s| s.time == time)
                        .and_then(|s| s.value)
                })
            })
            .collect();
        let name = unique_name(&series, &secondary.name);
        series.insert(name, values);
    }

    AlignedSeries { labels, series }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hourly(labels: &[&str]) -> PrimarySeries {
        PrimarySeries {
            name: "forecast".to_string(),
            samples: labels
                .iter()
                .enumerate()
                .map(|(i, l)| Sample::new(*l, Some(i as f64 * 10.0)))
                .collect(),
        }
    }

    fn measured(points: &[((u32, u32), Option<f64>)]) -> SecondarySeries {
        SecondarySeries {
            name: "measured".to_string(),
            samples: points
                .iter()
                .map(|(time, value)| TimedValue {
                    time: *time,
                    value: *value,
                })
                .collect(),
        }
    }

    #[test]
    fn test_missing_points_are_absent() {
        let aligned = align(
            &hourly(&["00:00", "01:00", "02:00"]),
            &[measured(&[((1, 0), Some(5.0))])],
        );
        assert_eq!(aligned.labels, vec!["00:00", "01:00", "02:00"]);
        assert_eq!(aligned.values("measured"), Some(&[None, Some(5.0), None][..]));
        assert_eq!(aligned.values("forecast"), Some(&[Some(0.0), Some(10.0), Some(20.0)][..]));
        assert!(aligned.is_consistent());
    }

    #[test]
    fn test_first_duplicate_secondary_wins() {
        let aligned = align(
            &hourly(&["00:00"]),
            &[measured(&[((0, 0), Some(3.0)), ((0, 0), Some(7.0))])],
        );
        assert_eq!(aligned.values("measured"), Some(&[Some(3.0)][..]));
    }

    #[test]
    fn test_off_grid_samples_do_not_match() {
        let aligned = align(
            &hourly(&["00:00", "01:00"]),
            &[measured(&[((0, 59), Some(1.0)), ((1, 1), Some(2.0))])],
        );
        assert_eq!(aligned.values("measured"), Some(&[None, None][..]));
    }

    #[test]
    fn test_empty_inputs() {
        let aligned = align(&hourly(&[]), &[measured(&[((0, 0), Some(1.0))])]);
        assert!(aligned.is_empty());
        assert!(aligned.series.is_empty());

        let aligned = align(&hourly(&["00:00", "01:00"]), &[measured(&[])]);
        assert_eq!(aligned.values("measured"), Some(&[None, None][..]));
    }

    #[test]
    fn test_duplicate_primary_label_kept_once() {
        let aligned = align(&hourly(&["00:00", "00:00", "01:00"]), &[]);
        assert_eq!(aligned.labels, vec!["00:00", "01:00"]);
        assert_eq!(aligned.values("forecast"), Some(&[Some(0.0), Some(20.0)][..]));
        assert!(aligned.is_consistent());
    }

    #[test]
    fn test_same_named_series_are_all_kept() {
        let mut clash = measured(&[((1, 0), Some(5.0))]);
        clash.name = "forecast".to_string();
        let aligned = align(&hourly(&["00:00", "01:00"]), &[clash, measured(&[]), measured(&[])]);
        assert_eq!(aligned.series.len(), 4);
        assert_eq!(aligned.values("forecast"), Some(&[Some(0.0), Some(10.0)][..]));
        assert_eq!(aligned.values("forecast (2)"), Some(&[None, Some(5.0)][..]));
        assert_eq!(aligned.values("measured (2)"), Some(&[None, None][..]));
    }

    #[test]
    fn test_plot_all_keeps_repeated_labels() {
        let plotted = plot_all(&hourly(&["02-03 15:00", "02-03 15:00", "02-03 15:01"]));
        assert_eq!(plotted.labels.len(), 3);
        assert_eq!(plotted.values("forecast"), Some(&[Some(0.0), Some(10.0), Some(20.0)][..]));
        assert!(plotted.is_consistent());
        assert!(plot_all(&hourly(&[])).is_empty());
    }

    #[test]
    fn test_zero_is_not_absent() {
        let aligned = align(&hourly(&["06:00"]), &[measured(&[((6, 0), Some(0.0))])]);
        assert_eq!(aligned.values("measured"), Some(&[Some(0.0)][..]));
    }

    #[test]
    fn test_date_prefixed_labels() {
        let aligned = align(
            &hourly(&["02-03 15:00", "02-03 15:01"]),
            &[measured(&[((15, 1), Some(9.5))])],
        );
        assert_eq!(aligned.values("measured"), Some(&[None, Some(9.5)][..]));
    }
}
