/// Data layer: the image model and the FITS loader.
///
/// Architecture:
/// ```text
///  .fits / .fit / .fts
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  fitrs primary HDU → 2-D check → ImageBuffer
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ ImageBuffer  │  width × height row-major f64 samples
///   └─────────────┘
/// ```
///
/// Only the primary data unit is read; extension HDUs and header metadata
/// are ignored.

pub mod loader;
pub mod model;
