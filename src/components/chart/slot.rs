//! Chart Slot
//!
//! Owns the live chart handle of one canvas. A new render always destroys the
//! previous chart first, so a canvas never holds more than one live handle.

use super::aligner::AlignedSeries;

/// Everything a sink needs to draw one line chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    /// Y-axis unit, e.g. "W/m²"
    pub unit: &'static str,
    pub data: AlignedSeries,
}

/// A rendering sink that creates and destroys charts
pub trait ChartRenderer {
    type Handle;

    fn create(&mut self, canvas: &str, chart: &ChartSpec) -> Self::Handle;

    fn destroy(&mut self, handle: Self::Handle);
}

/// The single chart slot of a canvas
#[derive(Debug)]
pub struct ChartSlot<H> {
    canvas: &'static str,
    handle: Option<H>,
}

impl<H> ChartSlot<H> {
    pub fn new(canvas: &'static str) -> Self {
        Self {
            canvas,
            handle: None,
        }
    }

    pub fn is_live(&self) -> bool {
        self.handle.is_some()
    }

    /// Replace the chart; an empty chart leaves the canvas blank
    ///
    /// Returns whether a new chart was created.
    pub fn render<R>(&mut self, renderer: &mut R, chart: &ChartSpec) -> bool
    where
        R: ChartRenderer<Handle = H>,
    {
        self.clear(renderer);
        if chart.data.is_empty() {
            tracing::debug!("Nothing to draw on {}", self.canvas);
            return false;
        }
        self.handle = Some(renderer.create(self.canvas, chart));
        true
    }

    /// Destroy the live chart, if any
    pub fn clear<R>(&mut self, renderer: &mut R)
    where
        R: ChartRenderer<Handle = H>,
    {
        if let Some(old) = self.handle.take() {
            renderer.destroy(old);
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Renderer that only counts live charts

    use super::*;

    #[derive(Debug, Default)]
    pub struct CountingRenderer {
        next_id: u32,
        pub live: Vec<(String, u32)>,
        pub created: Vec<ChartSpec>,
    }

    impl CountingRenderer {
        pub fn live_on(&self, canvas: &str) -> usize {
            self.live.iter().filter(|(c, _)| c == canvas).count()
        }
    }

    impl ChartRenderer for CountingRenderer {
        type Handle = u32;

        fn create(&mut self, canvas: &str, chart: &ChartSpec) -> u32 {
            self.next_id += 1;
            self.live.push((canvas.to_string(), self.next_id));
            self.created.push(chart.clone());
            self.next_id
        }

        fn destroy(&mut self, handle: u32) {
            self.live.retain(|(_, id)| *id != handle);
        }
    }
}
