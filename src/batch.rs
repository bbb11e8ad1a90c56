use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::data::loader;
use crate::render::{animate, contour, ANIMATED_CANVAS, STATIC_CANVAS};
use crate::transform;

// ---------------------------------------------------------------------------
// Input discovery & companion resolution
// ---------------------------------------------------------------------------

/// All `*.csv` files directly under `dir`, lexicographically sorted so
/// batch runs are reproducible regardless of filesystem enumeration order.
pub fn discover_inputs(dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = dir.join("*.csv");
    let pattern = pattern
        .to_str()
        .context("input directory path is not valid UTF-8")?;

    let mut inputs = Vec::new();
    for entry in glob::glob(pattern).context("listing input files")? {
        inputs.push(entry.context("reading directory entry")?);
    }
    inputs.sort();
    log::info!("discovered {} input file(s)", inputs.len());
    Ok(inputs)
}

/// Default companion resolver: the frame sidecar lives one directory up
/// from the CSV, under `output/`, with the extension swapped to `.json`.
pub fn sibling_output_json(csv: &Path) -> PathBuf {
    let dir = csv.parent().unwrap_or_else(|| Path::new("."));
    let name = csv.with_extension("json");
    let name = name.file_name().unwrap_or_default().to_os_string();
    dir.join("..").join("output").join(name)
}

// ---------------------------------------------------------------------------
// Batch drivers
// ---------------------------------------------------------------------------

/// Render a static contour PNG for every CSV in `dir`.
///
/// Files run in discovery order; the first failing file aborts the whole
/// batch. Iterations are independent, so earlier outputs survive an abort.
pub fn run_static(dir: &Path) -> Result<()> {
    for input in discover_inputs(dir)? {
        let table = loader::load_grid(&input)?;
        let field = transform::log10_field(&table);
        println!("writing {}", input.display());
        contour::render_png(&table, &field, &input.with_extension("png"), STATIC_CANVAS)?;
    }
    Ok(())
}

/// Render an animated contour + scatter document for every CSV in `dir`,
/// reading each file's frame sidecar from `resolver(csv)`.
///
/// A missing or invalid sidecar is fatal: the animation cannot proceed
/// without frame data, and the batch aborts like any other per-file error.
pub fn run_animated<R>(dir: &Path, resolver: R) -> Result<()>
where
    R: Fn(&Path) -> PathBuf,
{
    for input in discover_inputs(dir)? {
        let table = loader::load_grid(&input)?;
        let frames = loader::load_frames(&resolver(&input))
            .with_context(|| format!("loading frame data for {}", input.display()))?;
        let field = transform::log10_field(&table);
        println!("writing {}", input.display());
        animate::render_html(
            &table,
            &field,
            &frames,
            &input.with_extension("html"),
            ANIMATED_CANVAS,
        )?;
    }
    Ok(())
}
