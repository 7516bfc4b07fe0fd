// ---------------------------------------------------------------------------
// ImageBuffer – the decoded primary-HDU payload
// ---------------------------------------------------------------------------

/// The currently displayed image: a 2-D array of numeric samples.
///
/// Samples are stored in FITS order: row-major with NAXIS1 (width) varying
/// fastest, row 0 at the bottom of the image. Integer BLANK pixels and
/// floating-point blanks are represented as `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    /// Number of columns (NAXIS1).
    pub width: usize,
    /// Number of rows (NAXIS2).
    pub height: usize,
    /// `width * height` samples, row-major.
    pub samples: Vec<f64>,
}

impl ImageBuffer {
    pub fn new(width: usize, height: usize, samples: Vec<f64>) -> Self {
        debug_assert_eq!(samples.len(), width * height);
        ImageBuffer {
            width,
            height,
            samples,
        }
    }

    /// (columns, rows) of the image.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Minimum and maximum over the finite samples.
    ///
    /// Falls back to `(0.0, 1.0)` when no sample is finite, so level
    /// controls always have a usable range.
    pub fn value_range(&self) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in &self.samples {
            if v.is_finite() {
                min = min.min(v);
                max = max.max(v);
            }
        }
        if min > max {
            (0.0, 1.0)
        } else {
            (min, max)
        }
    }

    /// Render the samples to an 8-bit grayscale buffer for texture upload.
    ///
    /// Samples are mapped linearly from `lo..hi` to `0..255` and clamped;
    /// non-finite samples render black. Rows are flipped so FITS row 0
    /// ends up at the bottom of the on-screen image.
    pub fn to_gray(&self, lo: f64, hi: f64) -> Vec<u8> {
        let range = if hi > lo { hi - lo } else { 1.0 };
        let mut out = Vec::with_capacity(self.samples.len());
        for row in (0..self.height).rev() {
            let start = row * self.width;
            for &v in &self.samples[start..start + self.width] {
                if v.is_finite() {
                    let t = ((v - lo) / range).clamp(0.0, 1.0);
                    out.push((t * 255.0).round() as u8);
                } else {
                    out.push(0);
                }
            }
        }
        out
    }
}
