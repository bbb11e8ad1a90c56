/// Render layer: contour rasterization and the animated HTML document.
///
/// Both renderers share the band rasterizer in [`contour`]; the animator
/// draws it once into an off-screen buffer and layers the particle frames
/// on top in the browser.
pub mod animate;
pub mod contour;

/// Static contour canvas edge, in pixels (square).
pub const STATIC_CANVAS: u32 = 1000;
/// Animated document canvas edge, in pixels (square).
pub const ANIMATED_CANVAS: u32 = 1500;
/// Number of equal-width intensity bands in a contour plot.
pub const CONTOUR_BANDS: usize = 10;
