//! Distance between 2D points.
//!
//! NSW graphs in this crate hold 2D vectors (they are meant to be plotted),
//! so the only metric is Euclidean distance in the plane.

/// Euclidean (L2) distance, `sqrt((x1 - x2)^2 + (y1 - y2)^2)`.
///
/// Uses `hypot`, which avoids intermediate overflow for large coordinates.
#[inline]
#[must_use]
pub fn euclidean(a: &[f32; 2], b: &[f32; 2]) -> f32 {
    (a[0] - b[0]).hypot(a[1] - b[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_four_five() {
        assert!((euclidean(&[0.0, 0.0], &[3.0, 4.0]) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn symmetric_and_zero_on_self() {
        let a = [1.5_f32, -2.0];
        let b = [-4.0_f32, 7.25];
        assert_eq!(euclidean(&a, &b), euclidean(&b, &a));
        assert_eq!(euclidean(&a, &a), 0.0);
    }

    #[test]
    fn no_overflow_for_large_coordinates() {
        let d = euclidean(&[0.0, 0.0], &[3.0e30, 4.0e30]);
        assert!(d.is_finite());
        assert!((d / 5.0e30 - 1.0).abs() < 1e-5);
    }
}
