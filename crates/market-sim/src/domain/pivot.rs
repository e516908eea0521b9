//! Pivot detection on a centred mid-price window
//!
//! The window holds `2 * window + 1` one-second samples. Once full, the
//! sample at index `window` (i.e. `window` seconds before the newest one) is
//! compared against every mid in the buffer:
//!
//! - equal to the maximum -> [`Pivot::High`]
//! - otherwise equal to the minimum -> [`Pivot::Low`]
//! - otherwise no pivot
//!
//! The maximum is tested first, so a flat window (centre is both maximum
//! and minimum) labels [`Pivot::High`]. Consumers rely on this tie-break.

use super::RollingBuffer;
use obr_core::Pivot;

/// One buffered second of NBBO
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MidSample {
    pub bid: f64,
    pub ask: f64,
    pub mid: f64,
}

impl MidSample {
    pub fn new(bid: f64, ask: f64) -> Self {
        Self {
            bid,
            ask,
            mid: (bid + ask) / 2.0,
        }
    }
}

/// Result of a detection pass on a full window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PivotDetection {
    pub pivot: Option<Pivot>,
    /// The sample the label refers to
    pub centre: MidSample,
}

/// Rolling window + pivot labelling
#[derive(Debug, Clone)]
pub struct PivotDetector {
    buffer: RollingBuffer<MidSample>,
    window: usize,
}

impl PivotDetector {
    /// `window` samples on each side of the centre
    ///
    /// Callers bound `window`; the capacity saturates rather than overflow.
    pub fn new(window: usize) -> Self {
        Self {
            buffer: RollingBuffer::new(window.saturating_mul(2).saturating_add(1)),
            window,
        }
    }

    /// Buffer a sample; returns a detection once the window is full
    pub fn push(&mut self, sample: MidSample) -> Option<PivotDetection> {
        self.buffer.push(sample);
        self.detect()
    }

    /// Label the centre of the current window, if the window is full
    pub fn detect(&self) -> Option<PivotDetection> {
        if !self.buffer.is_full() {
            return None;
        }

        let centre = *self.buffer.get(self.window)?;
        let (min, max) = self
            .buffer
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
                (lo.min(s.mid), hi.max(s.mid))
            });

        let pivot = if centre.mid == max {
            Some(Pivot::High)
        } else if centre.mid == min {
            Some(Pivot::Low)
        } else {
            None
        };

        Some(PivotDetection { pivot, centre })
    }

    /// Most recently buffered sample
    pub fn latest(&self) -> Option<&MidSample> {
        self.buffer.newest()
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Feed mids (spread 0) and collect (index, detection) pairs
    fn run(window: usize, mids: &[f64]) -> Vec<Option<PivotDetection>> {
        let mut detector = PivotDetector::new(window);
        mids.iter()
            .map(|&mid| detector.push(MidSample::new(mid, mid)))
            .collect()
    }

    #[test]
    fn test_no_detection_until_full() {
        let detections = run(2, &[1.0, 2.0, 3.0, 4.0]);
        assert!(detections.iter().all(Option::is_none));
    }

    #[test]
    fn test_peak_labelled_high_at_centre() {
        let detections = run(2, &[1.0, 2.0, 3.0, 4.0, 5.0, 4.0, 3.0, 2.0, 1.0]);

        let highs: Vec<usize> = detections
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_some_and(|d| d.pivot == Some(Pivot::High)))
            .map(|(i, _)| i)
            .collect();

        // the 5 (pushed at index 4) is the centre after index 6 is pushed
        assert_eq!(highs, vec![6]);
        let detection = detections[6].unwrap();
        assert_eq!(detection.centre.mid, 5.0);
        assert!(detections.iter().flatten().all(|d| d.pivot != Some(Pivot::Low)));
    }

    #[test]
    fn test_trough_labelled_low_at_centre() {
        let detections = run(2, &[5.0, 4.0, 3.0, 2.0, 1.0, 2.0, 3.0, 4.0, 5.0]);

        let lows: Vec<usize> = detections
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_some_and(|d| d.pivot == Some(Pivot::Low)))
            .map(|(i, _)| i)
            .collect();

        assert_eq!(lows, vec![6]);
        assert_eq!(detections[6].unwrap().centre.mid, 1.0);
    }

    #[test]
    fn test_flat_window_ties_to_high() {
        let detections = run(1, &[2.0, 2.0, 2.0, 2.0]);
        assert_eq!(detections[2].unwrap().pivot, Some(Pivot::High));
        assert_eq!(detections[3].unwrap().pivot, Some(Pivot::High));
    }

    #[test]
    fn test_centre_carries_bid_ask() {
        let mut detector = PivotDetector::new(1);
        detector.push(MidSample::new(10.00, 10.02));
        detector.push(MidSample::new(10.05, 10.07));
        let detection = detector.push(MidSample::new(10.01, 10.03)).unwrap();

        assert_eq!(detection.pivot, Some(Pivot::High));
        assert_eq!(detection.centre.bid, 10.05);
        assert_eq!(detection.centre.ask, 10.07);
        assert_eq!(detector.len(), 3);
    }

    #[test]
    fn test_huge_window_saturates() {
        let mut detector = PivotDetector::new(usize::MAX);
        assert!(detector.push(MidSample::new(1.0, 1.0)).is_none());
        assert_eq!(detector.len(), 1);
    }
}
