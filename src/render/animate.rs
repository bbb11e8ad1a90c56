use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{ImageFormat, RgbImage};

use crate::data::model::{FrameSequence, GridTable, ScalarField};
use crate::render::contour::{self, MARGIN, X_LABEL_AREA, Y_LABEL_AREA};

// ---------------------------------------------------------------------------
// Data → canvas pixel mapping
// ---------------------------------------------------------------------------

/// Maps data coordinates onto canvas pixels of the rendered contour layer.
///
/// Mirrors the chart geometry in [`contour`]: same margins, same label
/// areas, same (padded) data extents. Particle positions are mapped here
/// once, so the embedded script only has to draw circles.
#[derive(Debug, Clone, Copy)]
pub struct PlotMapper {
    size: u32,
    x_lo: f64,
    x_hi: f64,
    y_lo: f64,
    y_hi: f64,
}

impl PlotMapper {
    pub fn new(table: &GridTable, size: u32) -> PlotMapper {
        let ((x_lo, x_hi), (y_lo, y_hi)) = contour::data_extents(table);
        PlotMapper {
            size,
            x_lo,
            x_hi,
            y_lo,
            y_hi,
        }
    }

    /// Pixel rectangle of the plot area as (left, top, right, bottom).
    pub fn plot_area(&self) -> (f64, f64, f64, f64) {
        let left = (MARGIN + Y_LABEL_AREA) as f64;
        let top = MARGIN as f64;
        let right = (self.size - MARGIN) as f64;
        let bottom = (self.size - MARGIN - X_LABEL_AREA) as f64;
        (left, top, right, bottom)
    }

    /// Canvas pixel position of a data point. The vertical axis flips:
    /// data maxima sit at the top of the canvas.
    pub fn to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        let (left, top, right, bottom) = self.plot_area();
        let tx = (x - self.x_lo) / (self.x_hi - self.x_lo);
        let ty = (y - self.y_lo) / (self.y_hi - self.y_lo);
        (left + tx * (right - left), bottom - ty * (bottom - top))
    }
}

/// Serialize the frame sequence as a JSON array of arrays of `[px, py]`
/// pixel pairs, preserving playback order.
fn frames_to_pixel_json(frames: &FrameSequence, mapper: &PlotMapper) -> String {
    let frame_strs: Vec<String> = frames
        .iter()
        .map(|frame| {
            let pts: Vec<String> = frame
                .iter()
                .map(|p| {
                    let (px, py) = mapper.to_pixel(p.x, p.y);
                    format!("[{px:.1},{py:.1}]")
                })
                .collect();
            format!("[{}]", pts.join(","))
        })
        .collect();
    format!("[{}]", frame_strs.join(","))
}

// ---------------------------------------------------------------------------
// Document assembly
// ---------------------------------------------------------------------------

/// Render the animated contour + scatter document for one input and write
/// it to `path`. Canvas is `size`×`size` pixels.
pub fn render_html(
    table: &GridTable,
    field: &ScalarField,
    frames: &FrameSequence,
    path: &Path,
    size: u32,
) -> Result<()> {
    let title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("field")
        .to_string();
    let html = build_document(table, field, frames, size, &title)?;
    std::fs::write(path, html).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Build the self-contained HTML document: the contour layer rendered
/// once and embedded as a base64 PNG, the frame sequence embedded as
/// pixel coordinates, and an inline play/pause + slider script.
pub fn build_document(
    table: &GridTable,
    field: &ScalarField,
    frames: &FrameSequence,
    size: u32,
    title: &str,
) -> Result<String> {
    let mut buffer = vec![0u8; size as usize * size as usize * 3];
    contour::render_into_buffer(table, field, &mut buffer, size)?;
    let base_png = STANDARD.encode(encode_png(buffer, size)?);

    let mapper = PlotMapper::new(table, size);
    let frames_json = frames_to_pixel_json(frames, &mapper);
    let (left, top, right, bottom) = mapper.plot_area();

    log::debug!("{title}: embedding {} frame(s)", frames.len());

    Ok(format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
  body {{ margin: 0; background: #fff; font-family: sans-serif; }}
  #wrap {{ width: {size}px; margin: 0 auto; }}
  #controls {{ padding: 8px 0; }}
  #controls input {{ width: 60%; vertical-align: middle; }}
  canvas {{ display: block; border: 1px solid #ccc; }}
</style>
</head>
<body>
<div id="wrap">
  <div id="controls">
    <button id="play">Play</button>
    <input id="frame" type="range" min="0" max="{max_frame}" value="0">
    <span id="label"></span>
  </div>
  <canvas id="plot" width="{size}" height="{size}"></canvas>
</div>
<script>
const FRAMES = {frames_json};
const PLOT_AREA = {{ left: {left:.1}, top: {top:.1}, right: {right:.1}, bottom: {bottom:.1} }};

const canvas = document.getElementById('plot');
const ctx = canvas.getContext('2d');
const slider = document.getElementById('frame');
const label = document.getElementById('label');
const playBtn = document.getElementById('play');

const base = new Image();
base.src = 'data:image/png;base64,{base_png}';

let current = 0;
let playing = false;
let lastTick = 0;

function drawFrame(i) {{
  ctx.clearRect(0, 0, canvas.width, canvas.height);
  ctx.drawImage(base, 0, 0);
  if (FRAMES.length === 0) return;
  ctx.save();
  ctx.beginPath();
  ctx.rect(PLOT_AREA.left, PLOT_AREA.top,
           PLOT_AREA.right - PLOT_AREA.left, PLOT_AREA.bottom - PLOT_AREA.top);
  ctx.clip();
  ctx.fillStyle = 'rgba(20, 20, 20, 0.85)';
  for (const [x, y] of FRAMES[i]) {{
    ctx.beginPath();
    ctx.arc(x, y, 4, 0, 2 * Math.PI);
    ctx.fill();
  }}
  ctx.restore();
  label.textContent = 'frame ' + (i + 1) + ' / ' + FRAMES.length;
  slider.value = i;
}}

function tick(ts) {{
  if (!playing) return;
  if (ts - lastTick > 100) {{
    lastTick = ts;
    current = (current + 1) % Math.max(FRAMES.length, 1);
    drawFrame(current);
  }}
  requestAnimationFrame(tick);
}}

playBtn.addEventListener('click', () => {{
  playing = !playing;
  playBtn.textContent = playing ? 'Pause' : 'Play';
  if (playing) requestAnimationFrame(tick);
}});

slider.addEventListener('input', () => {{
  playing = false;
  playBtn.textContent = 'Play';
  current = parseInt(slider.value, 10);
  drawFrame(current);
}});

base.onload = () => drawFrame(0);
</script>
</body>
</html>
"##,
        title = title,
        size = size,
        max_frame = frames.len().saturating_sub(1),
        frames_json = frames_json,
        left = left,
        top = top,
        right = right,
        bottom = bottom,
        base_png = base_png,
    ))
}

fn encode_png(raw: Vec<u8>, size: u32) -> Result<Vec<u8>> {
    let img = RgbImage::from_raw(size, size, raw).context("contour buffer size mismatch")?;
    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .context("encoding contour layer PNG")?;
    Ok(png)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Particle;
    use crate::transform::log10_field;

    fn lattice() -> GridTable {
        // 3×3 lattice over [0, 2]².
        let mut table = GridTable::default();
        for xi in 0..3 {
            for yi in 0..3 {
                table.x.push(xi as f64);
                table.y.push(yi as f64);
                table.z.push(1.0 + xi as f64 + yi as f64);
            }
        }
        table
    }

    #[test]
    fn mapper_pins_extent_corners_to_plot_area() {
        let mapper = PlotMapper::new(&lattice(), 1000);
        let (left, top, right, bottom) = mapper.plot_area();
        assert_eq!(mapper.to_pixel(0.0, 0.0), (left, bottom));
        assert_eq!(mapper.to_pixel(2.0, 2.0), (right, top));
        let (mx, my) = mapper.to_pixel(1.0, 1.0);
        assert!((mx - (left + right) / 2.0).abs() < 1e-9);
        assert!((my - (top + bottom) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn pixel_json_preserves_frame_order_and_counts() {
        let mapper = PlotMapper::new(&lattice(), 1000);
        let frames: FrameSequence = vec![
            vec![Particle { x: 0.0, y: 0.0 }],
            vec![Particle { x: 1.0, y: 1.0 }, Particle { x: 2.0, y: 2.0 }],
            vec![],
        ];
        let json = frames_to_pixel_json(&frames, &mapper);

        let parsed: Vec<Vec<(f64, f64)>> = serde_json::from_str::<Vec<Vec<[f64; 2]>>>(&json)
            .unwrap()
            .into_iter()
            .map(|f| f.into_iter().map(|[a, b]| (a, b)).collect())
            .collect();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0].len(), 1);
        assert_eq!(parsed[1].len(), 2);
        assert!(parsed[2].is_empty());

        let (px, py) = mapper.to_pixel(0.0, 0.0);
        assert!((parsed[0][0].0 - px).abs() < 0.1);
        assert!((parsed[0][0].1 - py).abs() < 0.1);
    }

    #[test]
    fn document_embeds_canvas_contour_and_frames() {
        let table = lattice();
        let field = log10_field(&table);
        let frames: FrameSequence = vec![vec![Particle { x: 1.0, y: 1.0 }]; 4];

        let html = build_document(&table, &field, &frames, 300, "demo").unwrap();
        assert!(html.contains(r#"<canvas id="plot" width="300" height="300">"#));
        assert!(html.contains("data:image/png;base64,"));
        assert!(html.contains(r#"max="3""#));
        assert!(html.contains("<title>demo</title>"));
    }
}
