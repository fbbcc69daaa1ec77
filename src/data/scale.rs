//! Continuous and band scales mapping data space into surface pixels.
//!
//! All scales tolerate degenerate domains: a zero-width domain maps every
//! value to the middle of the range instead of dividing by zero.

use chrono::{DateTime, TimeZone, Utc};

/// Linear map from a numeric domain onto a pixel range.
///
/// The range may be inverted (`r0 > r1`), which is how the value axis puts
/// larger numbers higher on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f32, f32),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f32, f32)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f32, f32) {
        self.range
    }

    fn is_degenerate(&self) -> bool {
        let (d0, d1) = self.domain;
        !(d1 - d0).is_normal()
    }

    /// Map a domain value to a range position.
    ///
    /// ```
    /// # use streamgraph::data::scale::LinearScale;
    /// let s = LinearScale::new((0.0, 10.0), (100.0, 0.0));
    /// assert_eq!(s.map(0.0), 100.0);
    /// assert_eq!(s.map(5.0), 50.0);
    /// let flat = LinearScale::new((3.0, 3.0), (0.0, 40.0));
    /// assert_eq!(flat.map(3.0), 20.0);
    /// ```
    pub fn map(&self, v: f64) -> f32 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if self.is_degenerate() {
            return (r0 + r1) * 0.5;
        }
        let t = (v - d0) / (d1 - d0);
        (r0 as f64 + t * (r1 - r0) as f64) as f32
    }

    /// Map a range position back into the domain.
    pub fn invert(&self, px: f32) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if self.is_degenerate() || r0 == r1 {
            return d0;
        }
        let t = (px - r0) as f64 / (r1 - r0) as f64;
        d0 + t * (d1 - d0)
    }

    /// Round-number tick values covering the domain, roughly `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (a, b) = self.domain;
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        if count == 0 || !lo.is_finite() || !hi.is_finite() {
            return Vec::new();
        }
        if self.is_degenerate() {
            return vec![lo];
        }
        let step = nice_step((hi - lo) / count as f64);
        let i0 = (lo / step).ceil() as i64;
        let i1 = (hi / step).floor() as i64;
        (i0..=i1).map(|i| i as f64 * step).collect()
    }
}

/// Smallest of 1, 2, 5 x 10^k that is at least close to `raw`.
fn nice_step(raw: f64) -> f64 {
    let power = raw.log10().floor();
    let base = 10f64.powf(power);
    let err = raw / base;
    let factor = if err >= 50f64.sqrt() {
        10.0
    } else if err >= 10f64.sqrt() {
        5.0
    } else if err >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * base
}

/// Time scale: instants mapped linearly by their millisecond offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    inner: LinearScale,
}

impl TimeScale {
    pub fn new(domain: (DateTime<Utc>, DateTime<Utc>), range: (f32, f32)) -> Self {
        let inner = LinearScale::new(
            (
                domain.0.timestamp_millis() as f64,
                domain.1.timestamp_millis() as f64,
            ),
            range,
        );
        Self {
            start: domain.0,
            end: domain.1,
            inner,
        }
    }

    pub fn domain(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.start, self.end)
    }

    pub fn range(&self) -> (f32, f32) {
        self.inner.range()
    }

    pub fn map(&self, t: DateTime<Utc>) -> f32 {
        self.inner.map(t.timestamp_millis() as f64)
    }

    pub fn invert(&self, px: f32) -> DateTime<Utc> {
        let ms = self.inner.invert(px).round() as i64;
        Utc.timestamp_millis_opt(ms).single().unwrap_or(self.start)
    }

    /// `count` evenly spaced instants from start to end inclusive.
    pub fn ticks(&self, count: usize) -> Vec<DateTime<Utc>> {
        if count == 0 {
            return Vec::new();
        }
        let span = self.end - self.start;
        if count == 1 || span.is_zero() {
            return vec![self.start];
        }
        let n = (count - 1) as i32;
        (0..=n).map(|i| self.start + span * i / n).collect()
    }
}

/// Discrete scale dividing a range into equal bands, one per index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandScale {
    count: usize,
    start: f32,
    step: f32,
    bandwidth: f32,
}

impl BandScale {
    /// `padding` is the fraction of each step left empty, applied both between
    /// bands and at the outer edges.
    pub fn new(count: usize, range: (f32, f32), padding: f32) -> Self {
        let (r0, r1) = range;
        let padding = padding.clamp(0.0, 1.0);
        let slots = (count as f32 - padding + 2.0 * padding).max(1.0);
        let step = (r1 - r0) / slots;
        let start = r0 + ((r1 - r0) - step * (count as f32 - padding)) * 0.5;
        Self {
            count,
            start,
            step,
            bandwidth: step * (1.0 - padding),
        }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Left edge of band `i`.
    pub fn position(&self, i: usize) -> f32 {
        self.start + self.step * i as f32
    }

    pub fn bandwidth(&self) -> f32 {
        self.bandwidth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_ticks_are_round_numbers() {
        let s = LinearScale::new((-13.0, 27.0), (0.0, 100.0));
        assert_eq!(s.ticks(4), vec![-10.0, 0.0, 10.0, 20.0]);
    }

    #[test]
    fn invert_round_trips_on_inverted_range() {
        let s = LinearScale::new((-5.0, 15.0), (200.0, 0.0));
        let px = s.map(7.5);
        assert!((s.invert(px) - 7.5).abs() < 1e-4);
    }

    #[test]
    fn band_scale_without_padding_tiles_range() {
        let b = BandScale::new(4, (0.0, 100.0), 0.0);
        assert_eq!(b.position(0), 0.0);
        assert_eq!(b.bandwidth(), 25.0);
        assert_eq!(b.position(3), 75.0);
    }

    #[test]
    fn band_scale_with_padding_stays_inside_range() {
        let b = BandScale::new(3, (0.0, 90.0), 0.2);
        assert!(b.position(0) > 0.0);
        assert!(b.position(2) + b.bandwidth() < 90.0);
    }
}
