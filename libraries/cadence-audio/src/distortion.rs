//! Waveshaper transfer-curve generation

use std::f64::consts::PI;

/// Default transfer table length
pub const CURVE_SAMPLES: usize = 44_100;

/// Drive scale applied to the `[0, 1]` amount
const DRIVE_SCALE: f64 = 100.0;

/// Waveshaper transfer table
///
/// Index `i` covers input `x = i * 2 / N - 1`, so the table spans `[-1, 1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct DistortionCurve {
    amount: f32,
    samples: Vec<f32>,
}

impl DistortionCurve {
    /// Generate the default-length curve for `amount`
    pub fn generate(amount: f32) -> Self {
        Self::with_len(amount, CURVE_SAMPLES)
    }

    /// Generate an `n`-sample curve
    ///
    /// With `k = amount * 100` and `deg = π / 180`:
    /// `curve[i] = (3 + k) · x · 20 · deg / (π + k · |x|)`.
    /// At `amount == 0` this reduces to a straight line through the origin.
    pub fn with_len(amount: f32, n: usize) -> Self {
        let k = f64::from(amount) * DRIVE_SCALE;
        let deg = PI / 180.0;
        let len = n as f64;

        let samples = (0..n)
            .map(|i| {
                let x = i as f64 * 2.0 / len - 1.0;
                ((3.0 + k) * x * 20.0 * deg / (PI + k * x.abs())) as f32
            })
            .collect();

        Self { amount, samples }
    }

    /// Drive amount the curve was generated for
    pub fn amount(&self) -> f32 {
        self.amount
    }

    /// Table entries
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Table length
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Input value covered by index `i`
    pub fn input_at(&self, i: usize) -> f64 {
        i as f64 * 2.0 / self.samples.len() as f64 - 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_amount_is_linear_in_x() {
        let curve = DistortionCurve::generate(0.0);
        let slope = 20.0 * (PI / 180.0) * 3.0 / PI;
        for (i, &y) in curve.samples().iter().enumerate() {
            let expected = curve.input_at(i) * slope;
            assert!((f64::from(y) - expected).abs() < 1e-6, "index {i}");
        }
    }

    #[test]
    fn table_spans_minus_one_to_just_below_one() {
        let curve = DistortionCurve::with_len(0.5, 100);
        assert_eq!(curve.input_at(0), -1.0);
        assert_eq!(curve.input_at(50), 0.0);
        assert!(curve.input_at(99) < 1.0);
        assert_eq!(curve.samples()[50], 0.0);
    }

    #[test]
    fn full_drive_flattens_the_extremes() {
        let soft = DistortionCurve::with_len(0.0, 1000);
        let hard = DistortionCurve::with_len(1.0, 1000);

        // Near zero the hard curve is much steeper
        let soft_slope = soft.samples()[501] - soft.samples()[500];
        let hard_slope = hard.samples()[501] - hard.samples()[500];
        assert!(hard_slope > soft_slope * 10.0);

        // ...while the extreme value is only mildly larger
        let edge_ratio = hard.samples()[0] / soft.samples()[0];
        assert!(edge_ratio > 1.0 && edge_ratio < 2.0);
    }

    #[test]
    fn generation_is_deterministic() {
        assert_eq!(DistortionCurve::generate(0.37), DistortionCurve::generate(0.37));
    }

    proptest! {
        #[test]
        fn curve_is_monotonic_and_odd(amount in 0.0f32..=1.0) {
            let curve = DistortionCurve::with_len(amount, 2_000);
            let s = curve.samples();
            for w in s.windows(2) {
                prop_assert!(w[1] >= w[0]);
            }
            // x(i) = -x(N - i) around the centre index
            for i in 1..1_000 {
                prop_assert!((s[1_000 + i] + s[1_000 - i]).abs() < 1e-5);
            }
        }
    }
}
