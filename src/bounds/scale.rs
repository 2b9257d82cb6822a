//! Bounds → pixel dimensions.

use super::Rectangle;

/// Integer pixel size of a scaled icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Dimension {
    pub width: u32,
    pub height: u32,
}

/// Scale `bounds` to fit a `max_size` square, keeping the aspect ratio.
///
/// The longer edge lands on `max_size`; both edges are rounded up and
/// clamped to `max_size`. Zero-sized edges come out as 0.
pub fn scale(bounds: &Rectangle, max_size: u32) -> Dimension {
    let max = f64::from(max_size);
    let width = f64::from(bounds.width);
    let height = f64::from(bounds.height);
    let factor = (max / width).min(max / height);

    Dimension {
        width: fit(width * factor, max),
        height: fit(height * factor, max),
    }
}

/// Round up and clamp. NaN (0 × ∞) becomes 0 through the cast.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn fit(scaled: f64, max: f64) -> u32 {
    let edge = scaled.ceil();
    if edge > max { max as u32 } else { edge as u32 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dim(width: u32, height: u32) -> Dimension {
        Dimension { width, height }
    }

    #[test]
    fn test_square_fills_box() {
        assert_eq!(scale(&Rectangle::from_size(24.0, 24.0), 60), dim(60, 60));
        assert_eq!(scale(&Rectangle::from_size(500.0, 500.0), 60), dim(60, 60));
        assert_eq!(scale(&Rectangle::from_size(0.5, 0.5), 32), dim(32, 32));
    }

    #[test]
    fn test_aspect_ratio_kept() {
        assert_eq!(scale(&Rectangle::from_size(30.0, 20.0), 60), dim(60, 40));
        assert_eq!(scale(&Rectangle::from_size(20.0, 30.0), 60), dim(40, 60));
        assert_eq!(scale(&Rectangle::from_size(7.0, 3.0), 60), dim(60, 26));
    }

    #[test]
    fn test_never_exceeds_max() {
        let sizes = [0.1, 1.0, 3.0, 7.0, 13.7, 24.0, 59.9, 60.0, 61.0, 999.5, 12345.0];
        for &w in &sizes {
            for &h in &sizes {
                for max in [1, 16, 60, 100] {
                    let d = scale(&Rectangle::from_size(w, h), max);
                    assert!(d.width <= max && d.height <= max, "{w}x{h} -> {d:?} (max {max})");
                    if w == h {
                        assert_eq!(d.width, d.height);
                    }
                }
            }
        }
    }

    #[test]
    fn test_zero_edges() {
        assert_eq!(scale(&Rectangle::from_size(0.0, 10.0), 60), dim(0, 60));
        assert_eq!(scale(&Rectangle::from_size(10.0, 0.0), 60), dim(60, 0));
        assert_eq!(scale(&Rectangle::from_size(0.0, 0.0), 60), dim(0, 0));
    }

    #[test]
    fn test_zero_max() {
        assert_eq!(scale(&Rectangle::from_size(10.0, 5.0), 0), dim(0, 0));
    }
}
