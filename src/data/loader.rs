use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;

use super::model::{FrameSequence, GridTable};

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Structural problems in an input file. I/O and syntax errors from the
/// underlying parsers are attached as context by the load functions.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("missing '{0}' column")]
    MissingColumn(&'static str),
    #[error("row {row}: '{value}' in column '{column}' is not a number")]
    BadNumber {
        row: usize,
        column: &'static str,
        value: String,
    },
}

// ---------------------------------------------------------------------------
// Grid loader
// ---------------------------------------------------------------------------

/// Load a grid sample table from a semicolon-delimited CSV.
///
/// The header row must name `x`, `y` and `z` columns (any order; extra
/// columns are ignored). A missing file, missing column, or unparseable
/// numeric cell is fatal and propagated to the caller.
pub fn load_grid(path: &Path) -> Result<GridTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers: Vec<String> = reader
        .headers()
        .with_context(|| format!("reading CSV headers of {}", path.display()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let x_idx = column_index(&headers, "x")
        .with_context(|| format!("reading {}", path.display()))?;
    let y_idx = column_index(&headers, "y")
        .with_context(|| format!("reading {}", path.display()))?;
    let z_idx = column_index(&headers, "z")
        .with_context(|| format!("reading {}", path.display()))?;

    let mut table = GridTable::default();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("{}: CSV row {row_no}", path.display()))?;
        table.x.push(parse_cell(&record, x_idx, row_no, "x")?);
        table.y.push(parse_cell(&record, y_idx, row_no, "y")?);
        table.z.push(parse_cell(&record, z_idx, row_no, "z")?);
    }

    log::debug!("{}: {} samples", path.display(), table.len());
    Ok(table)
}

fn column_index(headers: &[String], name: &'static str) -> Result<usize> {
    match headers.iter().position(|h| h == name) {
        Some(idx) => Ok(idx),
        None => Err(LoadError::MissingColumn(name).into()),
    }
}

fn parse_cell(
    record: &csv::StringRecord,
    idx: usize,
    row: usize,
    column: &'static str,
) -> Result<f64> {
    let cell = record.get(idx).unwrap_or("");
    cell.trim().parse::<f64>().map_err(|_| {
        LoadError::BadNumber {
            row,
            column,
            value: cell.to_string(),
        }
        .into()
    })
}

// ---------------------------------------------------------------------------
// Frame loader
// ---------------------------------------------------------------------------

/// Load a particle frame sequence from a JSON sidecar.
///
/// Expected shape: `[[{"x": .., "y": ..}, ..], ..]` — one inner array per
/// frame, in playback order.
pub fn load_frames(path: &Path) -> Result<FrameSequence> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let frames: FrameSequence =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    log::debug!("{}: {} frames", path.display(), frames.len());
    Ok(frames)
}
