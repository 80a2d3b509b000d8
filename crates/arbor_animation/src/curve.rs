//! Scalar curves: time/value keys with a shared interpolation scheme.

/// Interpolation scheme of a [`Curve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurveType {
    Linear,
    /// Linear alpha remapped through `a * a * (3 - 2a)`.
    #[default]
    SmoothStep,
    CatmullRom,
    /// Hermite spline with tangents scaled by [`Curve::tension`].
    Cardinal,
}

/// A sorted list of `(time, value)` keys.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    keys: Vec<(f32, f32)>,
    pub curve_type: CurveType,
    /// Tangent scale of [`CurveType::Cardinal`]. Default: `0.5`
    pub tension: f32,
}

impl Default for Curve {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            curve_type: CurveType::default(),
            tension: 0.5,
        }
    }
}

impl Curve {
    /// Builds a curve from `(time, value)` pairs in any order.
    #[must_use]
    pub fn new(keys: impl IntoIterator<Item = (f32, f32)>) -> Self {
        let mut keys: Vec<(f32, f32)> = keys.into_iter().collect();
        keys.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { keys, ..Self::default() }
    }

    /// Inserts a key after any existing keys at the same time.
    pub fn add(&mut self, time: f32, value: f32) -> (f32, f32) {
        let index = self.keys.partition_point(|&(t, _)| t <= time);
        self.keys.insert(index, (time, value));
        (time, value)
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<(f32, f32)> {
        self.keys.get(index).copied()
    }

    #[inline]
    #[must_use]
    pub fn keys(&self) -> &[(f32, f32)] {
        &self.keys
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Value of the curve at `time`.
    ///
    /// An empty curve is 0 everywhere. Outside the key range the nearest end
    /// value is held.
    #[must_use]
    pub fn value(&self, time: f32) -> f32 {
        let (Some(&(first_t, first_v)), Some(&(last_t, last_v))) = (self.keys.first(), self.keys.last()) else {
            return 0.0;
        };
        if time < first_t {
            return first_v;
        }
        if time > last_t {
            return last_v;
        }

        let right = self.keys.partition_point(|&(t, _)| t < time);
        let (right_t, right_v) = self.keys[right];
        if right_t == time || right == 0 {
            return right_v;
        }
        let left = right - 1;
        let (left_t, left_v) = self.keys[left];

        let span = right_t - left_t;
        let alpha = if span == 0.0 { 0.0 } else { (time - left_t) / span };

        match self.curve_type {
            CurveType::Linear => lerp(left_v, right_v, alpha),
            CurveType::SmoothStep => lerp(left_v, right_v, alpha * alpha * (3.0 - 2.0 * alpha)),
            CurveType::CatmullRom => {
                let [p0, p1, p2, p3] = self.control_points(left);
                cardinal(p0, p1, p2, p3, alpha, 0.5)
            }
            CurveType::Cardinal => {
                let [p0, p1, p2, p3] = self.control_points(left);
                cardinal(p0, p1, p2, p3, alpha, self.tension)
            }
        }
    }

    /// Spline control values around the segment `[left, left + 1]`.
    ///
    /// Missing neighbours are extrapolated from the segment itself. The outer
    /// points are rescaled so every span covers the same time as the segment.
    fn control_points(&self, left: usize) -> [f32; 4] {
        let (t1, p1) = self.keys[left];
        let (t2, p2) = self.keys[left + 1];
        let dt1 = t2 - t1;

        let (p0, dt0) = match left.checked_sub(1).and_then(|i| self.keys.get(i)) {
            Some(&(t0, p0)) => (p0, t1 - t0),
            None => (p1 + (p1 - p2), dt1),
        };
        let (p3, dt2) = match self.keys.get(left + 2) {
            Some(&(t3, p3)) => (p3, t3 - t2),
            None => (p2 + (p2 - p1), dt1),
        };

        let p0 = if dt0 > 0.0 { p1 + (p0 - p1) * dt1 / dt0 } else { p0 };
        let p3 = if dt2 > 0.0 { p2 + (p3 - p2) * dt1 / dt2 } else { p3 };
        [p0, p1, p2, p3]
    }

    /// The key nearest to `time`, scanning from the first key while the
    /// distance keeps shrinking. Keys further than 2 time units away are
    /// never returned.
    #[must_use]
    pub fn closest(&self, time: f32) -> Option<(f32, f32)> {
        let mut min = 2.0;
        let mut result = None;
        for &key in &self.keys {
            let diff = (time - key.0).abs();
            if diff > min {
                break;
            }
            min = diff;
            result = Some(key);
        }
        result
    }

    /// Samples the curve at `precision` evenly spaced times over `[0, 1]`.
    /// At least two samples are taken.
    #[must_use]
    pub fn quantize(&self, precision: usize) -> Vec<f32> {
        let precision = precision.max(2);
        let step = 1.0 / (precision - 1) as f32;
        (0..precision).map(|i| self.value(step * i as f32)).collect()
    }
}

/// A group of curves evaluated together and sharing one [`CurveType`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CurveSet {
    curves: Vec<Curve>,
    curve_type: CurveType,
}

impl CurveSet {
    /// Takes ownership of `curves` and applies the default curve type to all
    /// of them.
    #[must_use]
    pub fn new(curves: Vec<Curve>) -> Self {
        let mut set = Self {
            curves,
            curve_type: CurveType::default(),
        };
        set.set_curve_type(CurveType::default());
        set
    }

    /// A set of `len` empty curves.
    #[must_use]
    pub fn with_len(len: usize) -> Self {
        Self::new(vec![Curve::default(); len])
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Curve> {
        self.curves.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Curve> {
        self.curves.get_mut(index)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn curve_type(&self) -> CurveType {
        self.curve_type
    }

    pub fn set_curve_type(&mut self, curve_type: CurveType) {
        self.curve_type = curve_type;
        for curve in &mut self.curves {
            curve.curve_type = curve_type;
        }
    }

    /// Writes the value of every curve at `time` into `out`, one entry per
    /// curve. `out` is cleared first so it can be reused across calls.
    pub fn value(&self, time: f32, out: &mut Vec<f32>) {
        out.clear();
        out.extend(self.curves.iter().map(|c| c.value(time)));
    }

    /// Samples all curves at `precision` evenly spaced times over `[0, 1]`,
    /// interleaved per sample: `[c0(t0), c1(t0), .., c0(t1), c1(t1), ..]`.
    #[must_use]
    pub fn quantize(&self, precision: usize) -> Vec<f32> {
        let precision = precision.max(2);
        let step = 1.0 / (precision - 1) as f32;

        let mut values = Vec::with_capacity(precision * self.curves.len());
        let mut sample = Vec::with_capacity(self.curves.len());
        for i in 0..precision {
            self.value(step * i as f32, &mut sample);
            values.extend_from_slice(&sample);
        }
        values
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn hermite(p0: f32, p1: f32, t0: f32, t1: f32, s: f32) -> f32 {
    let s2 = s * s;
    let s3 = s2 * s;
    let h0 = 2.0 * s3 - 3.0 * s2 + 1.0;
    let h1 = -2.0 * s3 + 3.0 * s2;
    let h2 = s3 - 2.0 * s2 + s;
    let h3 = s3 - s2;
    p0 * h0 + p1 * h1 + t0 * h2 + t1 * h3
}

fn cardinal(p0: f32, p1: f32, p2: f32, p3: f32, s: f32, tension: f32) -> f32 {
    hermite(p1, p2, tension * (p2 - p0), tension * (p3 - p1), s)
}
