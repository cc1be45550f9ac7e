//! Terminal chart sink
//!
//! Draws each series as a one-line sparkline with its range. Long series are
//! bucketed down to the configured width; absent values stay blank.

use std::io::Write;

use super::slot::{ChartRenderer, ChartSpec};
use crate::utils::format::{display_width, format_value};

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Writes charts to a text stream
pub struct TerminalChart<W: Write> {
    out: W,
    width: usize,
    next_id: u64,
    live: Vec<u64>,
}

impl<W: Write> TerminalChart<W> {
    pub fn new(out: W, width: usize) -> Self {
        Self {
            out,
            width: width.max(8),
            next_id: 0,
            live: Vec::new(),
        }
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&self, canvas: &str, chart: &ChartSpec) -> String {
        let data = &chart.data;
        let first = data.labels.first().map(String::as_str).unwrap_or("");
        let last = data.labels.last().map(String::as_str).unwrap_or("");
        let name_width = data.series.keys().map(|k| display_width(k)).max().unwrap_or(0);

        let mut text = format!(
            "[{}] {} … {} ({} points, {})\n",
            canvas,
            first,
            last,
            data.labels.len(),
            chart.unit
        );
        for (name, values) in data.series.iter() {
            let present: Vec<f64> = values.iter().flatten().copied().collect();
            let min = present.iter().copied().reduce(f64::min);
            let max = present.iter().copied().reduce(f64::max);
            let pad = " ".repeat(name_width.saturating_sub(display_width(name)));
            text.push_str(&format!(
                "  {}{}  {}  min {} max {}\n",
                name,
                pad,
                sparkline(values, self.width, min, max),
                format_value(min, 1),
                format_value(max, 1)
            ));
        }
        text
    }
}

impl<W: Write> ChartRenderer for TerminalChart<W> {
    type Handle = u64;

    fn create(&mut self, canvas: &str, chart: &ChartSpec) -> u64 {
        let text = self.draw(canvas, chart);
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            tracing::warn!("Failed to draw {}: {}", canvas, e);
        }
        self.next_id += 1;
        self.live.push(self.next_id);
        self.next_id
    }

    fn destroy(&mut self, handle: u64) {
        self.live.retain(|id| *id != handle);
    }
}

/// Bucket `values` into at most `width` cells, each showing the bucket maximum
fn sparkline(values: &[Option<f64>], width: usize, min: Option<f64>, max: Option<f64>) -> String {
    let (Some(min), Some(max)) = (min, max) else {
        return " ".repeat(values.len().min(width));
    };
    let span = max - min;
    let bucket = values.len().div_ceil(width).max(1);

    values
        .chunks(bucket)
        .map(|chunk| {
            match chunk.iter().flatten().copied().reduce(f64::max) {
                None => ' ',
                // Flat series
                Some(_) if span <= 0.0 => BARS[3],
                Some(v) => {
                    let level = ((v - min) / span * (BARS.len() - 1) as f64).round() as usize;
                    BARS[level.min(BARS.len() - 1)]
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::chart::aligner::{PrimarySeries, Sample, SecondarySeries, TimedValue, align};

    fn radiation() -> ChartSpec {
        let primary = PrimarySeries {
            name: "预报辐射 (W/m²)".to_string(),
            samples: vec![
                Sample::new("00:00", Some(0.0)),
                Sample::new("01:00", Some(400.0)),
                Sample::new("02:00", Some(800.0)),
            ],
        };
        let measured = SecondarySeries {
            name: "实测辐射 (W/m²)".to_string(),
            samples: vec![TimedValue {
                time: (1, 0),
                value: Some(380.0),
            }],
        };
        ChartSpec {
            unit: "W/m²",
            data: align(&primary, &[measured]),
        }
    }

    #[test]
    fn test_draws_each_series() {
        let mut sink = TerminalChart::new(Vec::new(), 60);
        let handle = sink.create("radiationChart", &radiation());
        assert_eq!(sink.live_count(), 1);
        sink.destroy(handle);
        assert_eq!(sink.live_count(), 0);

        let text = String::from_utf8(sink.into_inner()).expect("utf8");
        assert!(text.starts_with("[radiationChart] 00:00 … 02:00 (3 points, W/m²)"));
        assert!(text.contains("▁▅█"));
        assert!(text.contains(" ▄ "));
        assert!(text.contains("min 380.0 max 380.0"));
    }

    #[test]
    fn test_sparkline_buckets() {
        let values: Vec<Option<f64>> = (0..100).map(|i| Some(i as f64)).collect();
        assert_eq!(sparkline(&values, 10, Some(0.0), Some(99.0)).chars().count(), 10);
        assert_eq!(sparkline(&[None, None], 10, None, None), "  ");
    }
}
