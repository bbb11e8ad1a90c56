use std::path::Path;

use anyhow::Result;

use field_drawer::batch::{self, sibling_output_json};

/// Render an animated contour + particle document for every `*.csv` in
/// the working directory, pairing each with its frame sidecar in the
/// sibling `output/` directory.
fn main() -> Result<()> {
    env_logger::init();
    batch::run_animated(Path::new("."), sibling_output_json)
}
