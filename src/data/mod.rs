/// Data layer: core types and input parsing.
///
/// Architecture:
/// ```text
///    name.csv            ../output/name.json
///       │                        │
///       ▼                        ▼
///  ┌──────────┐           ┌──────────┐
///  │  loader  │  x;y;z    │  loader  │  frames
///  └──────────┘           └──────────┘
///       │                        │
///       ▼                        ▼
///  ┌───────────┐          ┌───────────────┐
///  │ GridTable │          │ FrameSequence │
///  └───────────┘          └───────────────┘
/// ```
pub mod loader;
pub mod model;
