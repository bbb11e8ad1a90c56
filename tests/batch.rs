use std::fs;
use std::path::{Path, PathBuf};

use field_drawer::batch::{discover_inputs, run_animated, run_static, sibling_output_json};
use field_drawer::data::loader::load_grid;
use field_drawer::render::animate::PlotMapper;
use field_drawer::render::ANIMATED_CANVAS;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// 3×3 lattice over [0, 2]² with strictly positive z, except one zero
/// sample so the batch also exercises the log-domain sentinel path.
fn grid_csv() -> String {
    let mut rows = vec!["x;y;z".to_string()];
    for xi in 0..3 {
        for yi in 0..3 {
            let z = if (xi, yi) == (2, 2) {
                0.0
            } else {
                10f64.powi(xi + yi)
            };
            rows.push(format!("{xi};{yi};{z}"));
        }
    }
    rows.join("\n")
}

fn frames_json() -> String {
    r#"[
        [{"x": 0.0, "y": 0.0}],
        [{"x": 1.0, "y": 1.0}, {"x": 2.0, "y": 0.5}],
        [{"x": 2.0, "y": 2.0}]
    ]"#
    .to_string()
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

// ---------------------------------------------------------------------------
// Static batch
// ---------------------------------------------------------------------------

#[test]
fn static_batch_renders_fixed_size_png_per_input() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.csv", &grid_csv());
    write(dir.path(), "b.csv", &grid_csv());

    run_static(dir.path()).unwrap();

    for name in ["a.png", "b.png"] {
        let path = dir.path().join(name);
        let (w, h) = image::image_dimensions(&path).unwrap();
        assert_eq!((w, h), (1000, 1000), "{name} canvas size");
    }
}

#[test]
fn static_output_does_not_depend_on_sibling_inputs() {
    let solo = tempfile::tempdir().unwrap();
    write(solo.path(), "a.csv", &grid_csv());
    run_static(solo.path()).unwrap();

    let pair = tempfile::tempdir().unwrap();
    write(pair.path(), "a.csv", &grid_csv());
    write(pair.path(), "b.csv", &grid_csv().replace("0;2;100", "0;2;7"));
    run_static(pair.path()).unwrap();

    let solo_png = fs::read(solo.path().join("a.png")).unwrap();
    let pair_png = fs::read(pair.path().join("a.png")).unwrap();
    assert_eq!(solo_png, pair_png, "a.png must not depend on b.csv");
}

#[test]
fn missing_z_column_aborts_before_later_inputs() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.csv", "x;y\n0;0\n");
    write(dir.path(), "b.csv", &grid_csv());

    assert!(run_static(dir.path()).is_err());
    // Sorted discovery puts a.csv first, so b.csv must never be reached.
    assert!(!dir.path().join("b.png").exists());
}

#[test]
fn empty_grid_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.csv", "x;y;z\n");

    assert!(run_static(dir.path()).is_err());
    assert!(!dir.path().join("a.png").exists());
}

// ---------------------------------------------------------------------------
// Animated batch
// ---------------------------------------------------------------------------

#[test]
fn animated_batch_reads_companion_via_resolver() {
    let dir = tempfile::tempdir().unwrap();
    let frames_dir = tempfile::tempdir().unwrap();
    write(dir.path(), "sample.csv", &grid_csv());
    write(frames_dir.path(), "sample.json", &frames_json());

    let frames_root = frames_dir.path().to_path_buf();
    let resolver = move |csv: &Path| {
        frames_root.join(csv.with_extension("json").file_name().unwrap())
    };

    run_animated(dir.path(), resolver).unwrap();
    assert!(dir.path().join("sample.html").exists());
}

#[test]
fn missing_companion_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let frames_dir = tempfile::tempdir().unwrap();
    write(dir.path(), "sample.csv", &grid_csv());
    // Companion present but under the wrong name.
    write(frames_dir.path(), "renamed.json", &frames_json());

    let frames_root = frames_dir.path().to_path_buf();
    let resolver = move |csv: &Path| {
        frames_root.join(csv.with_extension("json").file_name().unwrap())
    };

    let err = run_animated(dir.path(), resolver).unwrap_err();
    assert!(err.to_string().contains("frame data"));
    assert!(!dir.path().join("sample.html").exists());
}

#[test]
fn default_resolver_matches_documented_layout() {
    let root = tempfile::tempdir().unwrap();
    let runs = root.path().join("runs");
    let output = root.path().join("output");
    fs::create_dir_all(&runs).unwrap();
    fs::create_dir_all(&output).unwrap();
    write(&runs, "eggholder.csv", &grid_csv());
    write(&output, "eggholder.json", &frames_json());

    run_animated(&runs, sibling_output_json).unwrap();
    assert!(runs.join("eggholder.html").exists());
}

#[test]
fn animated_document_keeps_frame_order_and_canvas_size() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write(dir.path(), "sample.csv", &grid_csv());
    let frames_dir = tempfile::tempdir().unwrap();
    write(frames_dir.path(), "sample.json", &frames_json());

    let frames_root = frames_dir.path().to_path_buf();
    let resolver = move |p: &Path| {
        frames_root.join(p.with_extension("json").file_name().unwrap())
    };
    run_animated(dir.path(), resolver).unwrap();

    let html = fs::read_to_string(dir.path().join("sample.html")).unwrap();
    assert!(html.contains(r#"width="1500" height="1500""#));

    // The three frames must appear in playback order: locate each frame's
    // first particle by its precomputed pixel position.
    let table = load_grid(&csv).unwrap();
    let mapper = PlotMapper::new(&table, ANIMATED_CANVAS);
    let marker = |x: f64, y: f64| {
        let (px, py) = mapper.to_pixel(x, y);
        format!("[{px:.1},{py:.1}]")
    };
    let first = html.find(&marker(0.0, 0.0)).expect("frame 0 marker");
    let second = html.find(&marker(1.0, 1.0)).expect("frame 1 marker");
    let third = html.find(&marker(2.0, 2.0)).expect("frame 2 marker");
    assert!(first < second && second < third, "frames out of order");
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

#[test]
fn discovery_ignores_subdirectories() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "top.csv", &grid_csv());
    let sub = dir.path().join("nested");
    fs::create_dir(&sub).unwrap();
    write(&sub, "nested.csv", &grid_csv());

    let inputs = discover_inputs(dir.path()).unwrap();
    assert_eq!(inputs.len(), 1);
    assert!(inputs[0].ends_with("top.csv"));
}
