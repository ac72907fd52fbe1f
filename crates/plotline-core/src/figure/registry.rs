//! Per-context figure bookkeeping.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Figure number, unique among live figures of one context.
///
/// Numbers start at 1. A new figure takes the lowest number not held by a
/// live figure, so closing everything and plotting again yields figure 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FigureId(u32);

impl FigureId {
    pub fn new(number: u32) -> Self {
        Self(number)
    }

    pub fn number(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for FigureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a figure handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FigureState {
    /// Has content that has not been shown yet.
    Open,
    /// Shown and still live; further plots mutate it.
    ShownLive,
    /// No longer live.
    Closed,
}

/// One plotted line.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

impl Series {
    /// A series plotted against its indices (`0, 1, 2, ...`).
    pub fn from_values(ys: Vec<f64>) -> Self {
        let xs = (0..ys.len()).map(|i| i as f64).collect();
        Self { xs, ys }
    }

    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Self {
        Self { xs, ys }
    }
}

/// A plotting object across its open/shown/closed lifecycle.
#[derive(Debug, Clone)]
pub struct FigureHandle {
    id: FigureId,
    state: FigureState,
    series: Vec<Series>,
    last_rendered: Option<String>,
}

impl FigureHandle {
    fn new(id: FigureId) -> Self {
        Self {
            id,
            state: FigureState::Open,
            series: Vec::new(),
            last_rendered: None,
        }
    }

    pub fn id(&self) -> FigureId {
        self.id
    }

    pub fn state(&self) -> FigureState {
        self.state
    }

    pub fn is_live(&self) -> bool {
        self.state != FigureState::Closed
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    /// Encoding produced by the most recent render, if any.
    pub fn last_rendered(&self) -> Option<&str> {
        self.last_rendered.as_deref()
    }

    fn add_series(&mut self, series: Series) {
        self.series.push(series);
        self.state = FigureState::Open;
    }
}

/// Live figures of one execution context, in creation order.
#[derive(Debug, Clone, Default)]
pub struct FigureRegistry {
    figures: Vec<FigureHandle>,
    current: Option<FigureId>,
}

impl FigureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new figure and make it current.
    pub fn figure(&mut self) -> FigureId {
        // Closed handles are only kept until the next figure is created.
        self.figures.retain(FigureHandle::is_live);

        let mut number = 1;
        while self.figures.iter().any(|f| f.id.number() == number) {
            number += 1;
        }
        let id = FigureId::new(number);
        self.figures.push(FigureHandle::new(id));
        self.current = Some(id);
        tracing::debug!("Created figure {}", id);
        id
    }

    /// Add a series to the current live figure, creating one if needed.
    pub fn plot(&mut self, series: Series) -> FigureId {
        let id = match self.current.filter(|id| self.is_live(*id)) {
            Some(id) => id,
            None => self.figure(),
        };
        if let Some(handle) = self.get_mut(id) {
            handle.add_series(series);
            tracing::debug!("Plotted series {} on figure {}", handle.series.len(), id);
        }
        id
    }

    pub fn get(&self, id: FigureId) -> Option<&FigureHandle> {
        self.figures.iter().find(|f| f.id == id)
    }

    fn get_mut(&mut self, id: FigureId) -> Option<&mut FigureHandle> {
        self.figures.iter_mut().find(|f| f.id == id)
    }

    /// The current figure, live or not.
    pub fn current(&self) -> Option<&FigureHandle> {
        self.current.and_then(|id| self.get(id))
    }

    pub fn is_live(&self, id: FigureId) -> bool {
        self.get(id).is_some_and(FigureHandle::is_live)
    }

    /// True if any figure is still live.
    pub fn has_live(&self) -> bool {
        self.figures.iter().any(FigureHandle::is_live)
    }

    /// Live figures in creation order.
    pub fn live(&self) -> impl Iterator<Item = &FigureHandle> {
        self.figures.iter().filter(|f| f.is_live())
    }

    /// Figures with unshown content, in creation order.
    pub fn pending(&self) -> impl Iterator<Item = &FigureHandle> {
        self.figures.iter().filter(|f| f.state == FigureState::Open)
    }

    /// Record a render of `id`.
    pub(crate) fn mark_rendered(&mut self, id: FigureId, encoding: String) {
        if let Some(handle) = self.get_mut(id) {
            handle.last_rendered = Some(encoding);
            handle.state = FigureState::ShownLive;
        }
    }

    /// Close one figure. Returns false if it was not live.
    pub fn close(&mut self, id: FigureId) -> bool {
        match self.get_mut(id) {
            Some(handle) if handle.is_live() => {
                handle.state = FigureState::Closed;
                tracing::debug!("Closed figure {}", id);
                true
            }
            _ => false,
        }
    }

    /// Close the current figure.
    pub fn close_current(&mut self) -> bool {
        match self.current {
            Some(id) => self.close(id),
            None => false,
        }
    }

    /// Close every live figure, returning how many were closed.
    pub fn close_all(&mut self) -> usize {
        let mut closed = 0;
        for handle in self.figures.iter_mut().filter(|f| f.is_live()) {
            handle.state = FigureState::Closed;
            closed += 1;
        }
        if closed > 0 {
            tracing::debug!("Closed {} figure(s)", closed);
        }
        closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> Series {
        Series::from_values(vec![1.0, 2.0, 3.0])
    }

    #[test]
    fn test_plot_creates_open_figure() {
        let mut figures = FigureRegistry::new();
        assert!(!figures.has_live());

        let id = figures.plot(line());
        assert_eq!(id, FigureId::new(1));
        let handle = figures.get(id).unwrap();
        assert_eq!(handle.state(), FigureState::Open);
        assert_eq!(handle.series()[0].xs, vec![0.0, 1.0, 2.0]);
        assert!(handle.last_rendered().is_none());
    }

    #[test]
    fn test_plot_on_shown_figure_reopens_it() {
        let mut figures = FigureRegistry::new();
        let id = figures.plot(line());
        figures.mark_rendered(id, "enc".to_string());
        assert_eq!(figures.get(id).unwrap().state(), FigureState::ShownLive);

        let again = figures.plot(line());
        assert_eq!(again, id);
        let handle = figures.get(id).unwrap();
        assert_eq!(handle.state(), FigureState::Open);
        assert_eq!(handle.series().len(), 2);
        assert_eq!(handle.last_rendered(), Some("enc"));
    }

    #[test]
    fn test_plot_after_close_creates_fresh_figure() {
        let mut figures = FigureRegistry::new();
        let first = figures.plot(line());
        assert!(figures.close_current());
        assert_eq!(figures.get(first).unwrap().state(), FigureState::Closed);

        let second = figures.plot(line());
        assert_eq!(second, FigureId::new(1));
        let handle = figures.get(second).unwrap();
        assert_eq!(handle.series().len(), 1);
        assert_eq!(handle.state(), FigureState::Open);
    }

    #[test]
    fn test_lowest_free_number_is_reused() {
        let mut figures = FigureRegistry::new();
        let one = figures.figure();
        let two = figures.figure();
        assert_eq!((one.number(), two.number()), (1, 2));

        figures.close(one);
        assert_eq!(figures.figure().number(), 1);
        assert_eq!(figures.figure().number(), 3);
    }

    #[test]
    fn test_pending_skips_shown_and_closed() {
        let mut figures = FigureRegistry::new();
        let a = figures.figure();
        figures.plot(line());
        let b = figures.figure();
        figures.plot(line());
        let c = figures.figure();
        figures.plot(line());

        figures.mark_rendered(a, String::new());
        figures.close(b);

        let pending: Vec<_> = figures.pending().map(FigureHandle::id).collect();
        assert_eq!(pending, vec![c]);
        assert_eq!(figures.live().count(), 2);
    }

    #[test]
    fn test_close_all() {
        let mut figures = FigureRegistry::new();
        figures.figure();
        figures.figure();
        assert_eq!(figures.close_all(), 2);
        assert!(!figures.has_live());
        assert_eq!(figures.close_all(), 0);
        assert!(!figures.close_current());
    }
}
