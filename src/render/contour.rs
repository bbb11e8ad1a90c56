use std::path::Path;

use anyhow::{bail, Context, Result};
use plotters::prelude::*;

use crate::color::band_color;
use crate::data::model::{GridTable, ScalarField};

use super::CONTOUR_BANDS;

// Fixed chart geometry. The animator maps particle positions onto the
// plot area, so these must stay in sync with the ChartBuilder calls below.
pub const MARGIN: u32 = 20;
pub const X_LABEL_AREA: u32 = 40;
pub const Y_LABEL_AREA: u32 = 60;

// ---------------------------------------------------------------------------
// Regridding: scattered samples → matrix over unique coordinates
// ---------------------------------------------------------------------------

/// A scalar field regridded onto the cartesian product of its unique
/// sorted `x` and `y` coordinates. Cells without a sample hold NaN and
/// are left unpainted.
pub struct GridMatrix {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    values: Vec<f64>,
}

impl GridMatrix {
    /// Assemble the matrix from parallel sample columns.
    pub fn from_samples(table: &GridTable, field: &ScalarField) -> Result<GridMatrix> {
        if table.is_empty() {
            bail!("no sample rows");
        }
        let xs = unique_sorted(&table.x);
        let ys = unique_sorted(&table.y);
        let mut values = vec![f64::NAN; xs.len() * ys.len()];
        for ((&x, &y), &v) in table.x.iter().zip(&table.y).zip(&field.values) {
            let xi = coord_index(&xs, x);
            let yi = coord_index(&ys, y);
            values[xi * ys.len() + yi] = v;
        }
        Ok(GridMatrix { xs, ys, values })
    }

    /// Field value at grid cell (`xi`, `yi`); NaN when no sample landed there.
    pub fn value(&self, xi: usize, yi: usize) -> f64 {
        self.values[xi * self.ys.len() + yi]
    }
}

fn unique_sorted(coords: &[f64]) -> Vec<f64> {
    let mut out = coords.to_vec();
    out.sort_by(f64::total_cmp);
    out.dedup();
    out
}

fn coord_index(coords: &[f64], value: f64) -> usize {
    coords
        .binary_search_by(|c| c.total_cmp(&value))
        .unwrap_or_else(|i| i.min(coords.len() - 1))
}

/// Bounds of the cell around coordinate `i`: midpoints to the neighbours,
/// extended by half the adjacent step at the edges.
fn cell_bounds(coords: &[f64], i: usize) -> (f64, f64) {
    let n = coords.len();
    if n == 1 {
        return (coords[0] - 0.5, coords[0] + 0.5);
    }
    let lo = if i == 0 {
        coords[0] - (coords[1] - coords[0]) / 2.0
    } else {
        (coords[i - 1] + coords[i]) / 2.0
    };
    let hi = if i == n - 1 {
        coords[n - 1] + (coords[n - 1] - coords[n - 2]) / 2.0
    } else {
        (coords[i] + coords[i + 1]) / 2.0
    };
    (lo, hi)
}

// ---------------------------------------------------------------------------
// Band levels
// ---------------------------------------------------------------------------

/// Index of the intensity band `v` falls into, given `bands` equal
/// divisions of `[min, max]`. Non-finite values have no band.
fn band_index(v: f64, min: f64, max: f64, bands: usize) -> Option<usize> {
    if !v.is_finite() {
        return None;
    }
    if max <= min {
        // Constant field: everything lands in a single band.
        return Some(0);
    }
    let t = (v - min) / (max - min);
    Some(((t * bands as f64) as usize).min(bands - 1))
}

/// Axis range over a coordinate set, padded when degenerate so the chart
/// always has a non-empty span to draw into.
fn axis_range(coords: &[f64]) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &c in coords {
        lo = lo.min(c);
        hi = hi.max(c);
    }
    if !(lo.is_finite() && hi.is_finite()) {
        return (0.0, 1.0);
    }
    if hi > lo {
        (lo, hi)
    } else {
        (lo - 0.5, hi + 0.5)
    }
}

/// Data extents of the axes a contour chart is built over, as
/// `((x_lo, x_hi), (y_lo, y_hi))`. The animated renderer maps particle
/// positions through the same extents the chart used.
pub fn data_extents(table: &GridTable) -> ((f64, f64), (f64, f64)) {
    (axis_range(&table.x), axis_range(&table.y))
}

// ---------------------------------------------------------------------------
// Rasterization
// ---------------------------------------------------------------------------

/// Render the contour-band plot for a field as a PNG with a square canvas
/// of `size` pixels.
///
/// The grid is validated before the backend opens the output path, so a
/// failing input never leaves a blank artifact behind.
pub fn render_png(table: &GridTable, field: &ScalarField, path: &Path, size: u32) -> Result<()> {
    let matrix = GridMatrix::from_samples(table, field)?;
    let root = BitMapBackend::new(path, (size, size)).into_drawing_area();
    draw_bands(&root, &matrix, field, data_extents(table))
        .with_context(|| format!("rendering {}", path.display()))?;
    root.present()
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Render into a caller-supplied RGB buffer (3 bytes per pixel) instead of
/// a file. The animated renderer uses this to embed the contour layer.
pub fn render_into_buffer(
    table: &GridTable,
    field: &ScalarField,
    buffer: &mut [u8],
    size: u32,
) -> Result<()> {
    let matrix = GridMatrix::from_samples(table, field)?;
    let root = BitMapBackend::with_buffer(buffer, (size, size)).into_drawing_area();
    draw_bands(&root, &matrix, field, data_extents(table)).context("rendering contour layer")?;
    root.present().context("flushing contour layer")?;
    Ok(())
}

fn draw_bands<DB>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    matrix: &GridMatrix,
    field: &ScalarField,
    extents: ((f64, f64), (f64, f64)),
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    // With no finite values nothing is painted; the range only anchors
    // the (unused) band division.
    let (min, max) = field.finite_range().unwrap_or((0.0, 1.0));

    let ((x_lo, x_hi), (y_lo, y_hi)) = extents;

    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(root)
        .margin(MARGIN)
        .x_label_area_size(X_LABEL_AREA)
        .y_label_area_size(Y_LABEL_AREA)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;

    for xi in 0..matrix.xs.len() {
        let (cx_lo, cx_hi) = cell_bounds(&matrix.xs, xi);
        for yi in 0..matrix.ys.len() {
            let Some(band) = band_index(matrix.value(xi, yi), min, max, CONTOUR_BANDS) else {
                continue;
            };
            let (cy_lo, cy_hi) = cell_bounds(&matrix.ys, yi);
            chart.draw_series(std::iter::once(Rectangle::new(
                [(cx_lo, cy_lo), (cx_hi, cy_hi)],
                band_color(band, CONTOUR_BANDS).filled(),
            )))?;
        }
    }

    // Mesh last so axis lines stay visible over the band fill.
    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("x")
        .y_desc("y")
        .draw()?;

    Ok(())
}
