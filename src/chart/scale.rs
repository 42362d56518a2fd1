// ---------------------------------------------------------------------------
// LinearScale – continuous domain → pixel range
// ---------------------------------------------------------------------------

/// Affine map from a numeric domain onto a pixel range.
///
/// The range may be inverted (`range.0 > range.1`), which is how a y axis
/// grows upward on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Smallest `(min, max)` covering all values. An empty input gives the
    /// single-point domain `(0, 0)`.
    pub fn domain_from_extent(values: impl IntoIterator<Item = f64>) -> (f64, f64) {
        values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
            .unwrap_or((0.0, 0.0))
    }

    /// Map a domain value to a pixel coordinate. A single-point domain maps
    /// everything to `range.0`.
    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        if span == 0.0 || !span.is_finite() {
            return r0;
        }
        r0 + (value - d0) / span * (r1 - r0)
    }

    /// Widen the domain to round tick boundaries.
    pub fn nice(mut self, count: usize) -> Self {
        let (mut start, mut stop) = self.domain;
        if start > stop {
            std::mem::swap(&mut start, &mut stop);
        }
        let mut previous: Option<f64> = None;
        for _ in 0..10 {
            let step = tick_increment(start, stop, count as f64);
            if previous == Some(step) {
                break;
            }
            if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else if step < 0.0 {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            } else {
                break;
            }
            previous = Some(step);
        }
        self.domain = if self.domain.0 > self.domain.1 {
            (stop, start)
        } else {
            (start, stop)
        };
        self
    }

    /// Roughly `count` evenly spaced round values inside the domain, using
    /// steps of 1, 2 or 5 times a power of ten.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (mut start, mut stop) = self.domain;
        if count == 0 || !start.is_finite() || !stop.is_finite() {
            return Vec::new();
        }
        if start == stop {
            return vec![start];
        }
        let reverse = start > stop;
        if reverse {
            std::mem::swap(&mut start, &mut stop);
        }
        let Some((i1, i2, inc)) = tick_layout(start, stop, count as f64) else {
            return Vec::new();
        };
        if i2 < i1 {
            return Vec::new();
        }
        let mut ticks: Vec<f64> = (i1..=i2)
            .map(|i| {
                let i = i as f64;
                if inc < 0.0 {
                    i / -inc
                } else {
                    i * inc
                }
            })
            .collect();
        if reverse {
            ticks.reverse();
        }
        ticks
    }
}

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// First and last tick index plus the increment. A negative increment means
/// "divide by `-inc`", which keeps fractional ticks free of float noise.
fn tick_layout(start: f64, stop: f64, count: f64) -> Option<(i64, i64, f64)> {
    let step = (stop - start) / count.max(0.0);
    if !step.is_finite() || step <= 0.0 {
        return None;
    }
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (i1, i2, inc) = if power < 0.0 {
        let scale = 10f64.powf(-power) / factor;
        let mut i1 = (start * scale).round();
        let mut i2 = (stop * scale).round();
        if i1 / scale < start {
            i1 += 1.0;
        }
        if i2 / scale > stop {
            i2 -= 1.0;
        }
        (i1, i2, -scale)
    } else {
        let scale = 10f64.powf(power) * factor;
        let mut i1 = (start / scale).round();
        let mut i2 = (stop / scale).round();
        if i1 * scale < start {
            i1 += 1.0;
        }
        if i2 * scale > stop {
            i2 -= 1.0;
        }
        (i1, i2, scale)
    };

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_layout(start, stop, count * 2.0);
    }
    Some((i1 as i64, i2 as i64, inc))
}

fn tick_increment(start: f64, stop: f64, count: f64) -> f64 {
    tick_layout(start, stop, count).map_or(0.0, |(_, _, inc)| inc)
}

// ---------------------------------------------------------------------------
// BandScale – ordered categories → padded pixel bands
// ---------------------------------------------------------------------------

/// Splits a pixel range into one equal band per category.
///
/// `padding` is a fraction of a step, applied between bands and before the
/// first / after the last band. Bands are centred in the range.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    categories: Vec<String>,
    range: (f64, f64),
    padding: f64,
}

impl BandScale {
    pub fn new(categories: Vec<String>, range: (f64, f64), padding: f64) -> Self {
        Self {
            categories,
            range,
            padding: padding.clamp(0.0, 1.0),
        }
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Distance between the starts of adjacent bands. Zero with no categories.
    pub fn step(&self) -> f64 {
        let n = self.categories.len() as f64;
        if n == 0.0 {
            return 0.0;
        }
        let (r0, r1) = self.range;
        (r1 - r0) / (n + self.padding).max(1.0)
    }

    /// Width of a single band. Zero with no categories.
    pub fn bandwidth(&self) -> f64 {
        self.step() * (1.0 - self.padding)
    }

    /// Start offset of the band for `category`, or `None` if it is unknown.
    pub fn position(&self, category: &str) -> Option<f64> {
        let slot = self.categories.iter().position(|c| c == category)?;
        let n = self.categories.len() as f64;
        let step = self.step();
        let (r0, r1) = self.range;
        let used = step * (n - self.padding);
        let start = r0 + (r1 - r0 - used) / 2.0;
        Some(start + slot as f64 * step)
    }
}
