use serde::Deserialize;

// ---------------------------------------------------------------------------
// GridTable – the parsed sample table
// ---------------------------------------------------------------------------

/// A scalar field sampled at scattered (x, y) positions.
///
/// Columnar mirror of the source CSV: the three vectors always have the
/// same length, one entry per sample row. No grid regularity is assumed
/// here; regridding happens in the render layer.
#[derive(Debug, Clone, Default)]
pub struct GridTable {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

impl GridTable {
    /// Number of sample rows.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Whether the table holds no samples.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ScalarField – a per-sample value column derived from the table
// ---------------------------------------------------------------------------

/// Values parallel to the rows of a [`GridTable`].
///
/// Entries may be non-finite (domain sentinels from the log transform);
/// consumers tolerate them instead of failing the file.
#[derive(Debug, Clone)]
pub struct ScalarField {
    pub values: Vec<f64>,
}

impl ScalarField {
    /// Smallest and largest finite values, if any exist.
    pub fn finite_range(&self) -> Option<(f64, f64)> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in &self.values {
            if v.is_finite() {
                min = min.min(v);
                max = max.max(v);
            }
        }
        (min <= max).then_some((min, max))
    }
}

// ---------------------------------------------------------------------------
// Particle frames – the animation sidecar
// ---------------------------------------------------------------------------

/// One particle position within a frame.
///
/// Sidecar records may carry extra fields (velocities and the like);
/// only the position is read.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
}

/// Ordered playback sequence of particle frames.
/// Frames may differ in particle count.
pub type FrameSequence = Vec<Vec<Particle>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finite_range_skips_sentinels() {
        let field = ScalarField {
            values: vec![f64::NEG_INFINITY, 1.0, f64::NAN, 3.0],
        };
        assert_eq!(field.finite_range(), Some((1.0, 3.0)));
    }

    #[test]
    fn finite_range_of_all_sentinels_is_none() {
        let field = ScalarField {
            values: vec![f64::NAN, f64::NEG_INFINITY],
        };
        assert_eq!(field.finite_range(), None);
    }
}
