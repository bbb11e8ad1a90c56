use std::path::Path;

use anyhow::Result;

use field_drawer::batch;

/// Render a static contour PNG for every `*.csv` in the working directory.
fn main() -> Result<()> {
    env_logger::init();
    batch::run_static(Path::new("."))
}
