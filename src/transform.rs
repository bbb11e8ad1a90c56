use crate::data::model::{GridTable, ScalarField};

// ---------------------------------------------------------------------------
// Domain-safe base-10 logarithm
// ---------------------------------------------------------------------------

/// Base-10 logarithm that maps inputs outside the domain to non-finite
/// sentinels instead of failing: zero yields `-inf`, negatives yield NaN.
///
/// Field samples can legitimately hit zero at the boundary of validity;
/// the renderers treat both sentinels as "no paintable value" for that
/// sample and carry on.
pub fn log10_safe(z: f64) -> f64 {
    if z > 0.0 {
        z.log10()
    } else if z == 0.0 {
        f64::NEG_INFINITY
    } else {
        f64::NAN
    }
}

/// Elementwise [`log10_safe`] over the `z` column of a grid table.
pub fn log10_field(table: &GridTable) -> ScalarField {
    ScalarField {
        values: table.z.iter().map(|&z| log10_safe(z)).collect(),
    }
}
