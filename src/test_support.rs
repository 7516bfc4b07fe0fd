//! Fixture helpers shared by the unit tests.

use std::path::Path;

use fitrs::{Fits, Hdu};

/// Write a minimal FITS file whose primary HDU holds `data` with the
/// given axis lengths (NAXIS1 first, per FITS convention).
pub fn write_fits(path: &Path, shape: &[usize], data: Vec<f32>) {
    let hdu = Hdu::new(shape, data);
    Fits::create(path, hdu).expect("failed to write FITS fixture");
}

/// A small 2-D ramp image: sample value equals its linear index.
pub fn ramp(width: usize, height: usize) -> Vec<f32> {
    (0..width * height).map(|i| i as f32).collect()
}
