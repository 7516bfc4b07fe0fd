use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use fitrs::{Fits, FitsData};
use thiserror::Error;

use super::model::ImageBuffer;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Failure modes of [`load_image`], split so callers can tell a broken
/// file from a well-formed file holding the wrong kind of data.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file cannot be read or is not valid FITS.
    #[error("cannot decode FITS file: {0}")]
    Decode(String),
    /// The primary data unit decoded fine but is not a 2-D image.
    #[error("file does not contain 2D image data")]
    NotTwoDimensional,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the primary-HDU image from a FITS file.
///
/// Only the primary data unit is read; extension HDUs and all header
/// metadata are ignored. The payload must be exactly two-dimensional.
pub fn load_image(path: &Path) -> Result<ImageBuffer, LoadError> {
    validate_primary_hdu(path)?;

    let fits = Fits::open(path).map_err(|e| LoadError::Decode(e.to_string()))?;
    let hdu = fits
        .get(0)
        .ok_or_else(|| LoadError::Decode("no primary HDU".to_string()))?;

    image_from_payload(hdu.read_data())
}

// ---------------------------------------------------------------------------
// Pre-parse validation
// ---------------------------------------------------------------------------

const CARD_LEN: usize = 80;
const BLOCK_LEN: u64 = 2880;

/// Reject broken input before handing the file to the parser: the first
/// card must carry the SIMPLE keyword, and the file must be long enough
/// to hold the data block the primary header declares via BITPIX and the
/// NAXISn cards. A header promising more data than the file contains
/// is a decode error here rather than a read failure mid-parse.
fn validate_primary_hdu(path: &Path) -> Result<(), LoadError> {
    let mut file = File::open(path).map_err(|e| LoadError::Decode(e.to_string()))?;
    let file_len = file
        .metadata()
        .map_err(|e| LoadError::Decode(e.to_string()))?
        .len();

    let mut bitpix: Option<i64> = None;
    let mut naxis: Option<usize> = None;
    let mut axis_lengths: Vec<(usize, u64)> = Vec::new();

    let mut block = [0u8; BLOCK_LEN as usize];
    let mut header_len: u64 = 0;

    'blocks: loop {
        file.read_exact(&mut block).map_err(|e| {
            if e.kind() != ErrorKind::UnexpectedEof {
                LoadError::Decode(e.to_string())
            } else if header_len == 0 {
                LoadError::Decode("file is too short to be a FITS file".to_string())
            } else {
                LoadError::Decode("truncated primary header".to_string())
            }
        })?;

        if header_len == 0 && !block.starts_with(b"SIMPLE") {
            return Err(LoadError::Decode(
                "missing SIMPLE keyword in primary header".to_string(),
            ));
        }
        header_len += BLOCK_LEN;

        for card in block.chunks(CARD_LEN) {
            match card_keyword(card) {
                "END" => break 'blocks,
                "BITPIX" => bitpix = Some(card_int_value(card, "BITPIX")?),
                "NAXIS" => {
                    let n = card_int_value(card, "NAXIS")?;
                    if !(0..=999).contains(&n) {
                        return Err(LoadError::Decode(format!("invalid NAXIS value {n}")));
                    }
                    naxis = Some(n as usize);
                }
                kw => {
                    if let Some(idx) = kw.strip_prefix("NAXIS").and_then(|s| s.parse().ok()) {
                        let len = card_int_value(card, kw)?;
                        if len < 0 {
                            return Err(LoadError::Decode(format!("invalid {kw} value {len}")));
                        }
                        axis_lengths.push((idx, len as u64));
                    }
                }
            }
        }

        if header_len >= file_len {
            return Err(LoadError::Decode(
                "no END card in primary header".to_string(),
            ));
        }
    }

    let bitpix = bitpix.ok_or_else(|| LoadError::Decode("missing BITPIX card".to_string()))?;
    if ![8, 16, 32, 64, -32, -64].contains(&bitpix) {
        return Err(LoadError::Decode(format!("invalid BITPIX value {bitpix}")));
    }
    let naxis = naxis.ok_or_else(|| LoadError::Decode("missing NAXIS card".to_string()))?;

    let mut pixel_count: u64 = if naxis == 0 { 0 } else { 1 };
    for axis in 1..=naxis {
        let len = axis_lengths
            .iter()
            .find(|(idx, _)| *idx == axis)
            .map(|(_, len)| *len)
            .ok_or_else(|| LoadError::Decode(format!("missing NAXIS{axis} card")))?;
        pixel_count = pixel_count
            .checked_mul(len)
            .ok_or_else(|| LoadError::Decode("axis lengths overflow".to_string()))?;
    }

    // Compare against the unpadded data length: a standard-compliant file
    // pads the data block to a 2880-byte multiple, but short padding is
    // harmless for reading the primary array.
    let data_len = pixel_count * (bitpix.unsigned_abs() / 8);
    if file_len < header_len + data_len {
        return Err(LoadError::Decode(format!(
            "truncated data block: header declares {data_len} bytes of data"
        )));
    }
    Ok(())
}

/// The keyword field of an 80-byte header card (bytes 0..8, space padded).
fn card_keyword(card: &[u8]) -> &str {
    std::str::from_utf8(&card[..8]).map_or("", str::trim_end)
}

/// Integer value field of a header card: everything after the value
/// indicator up to an optional comment.
fn card_int_value(card: &[u8], keyword: &str) -> Result<i64, LoadError> {
    let malformed = || LoadError::Decode(format!("malformed {keyword} card"));
    if card[8..10] != *b"= " {
        return Err(malformed());
    }
    let value = std::str::from_utf8(&card[10..]).map_err(|_| malformed())?;
    let value = value.split('/').next().unwrap_or("").trim();
    value.parse().map_err(|_| malformed())
}

// ---------------------------------------------------------------------------
// Payload conversion
// ---------------------------------------------------------------------------

/// Convert a decoded fitrs payload into an [`ImageBuffer`], normalising
/// every supported pixel type to `f64`. Integer BLANK pixels arrive from
/// fitrs as `None` and become `NaN`.
fn image_from_payload(payload: FitsData) -> Result<ImageBuffer, LoadError> {
    match payload {
        FitsData::FloatingPoint64(arr) => build_image(arr.shape, arr.data),
        FitsData::FloatingPoint32(arr) => {
            let samples = arr.data.into_iter().map(f64::from).collect();
            build_image(arr.shape, samples)
        }
        FitsData::IntegersI32(arr) => {
            let samples = arr
                .data
                .into_iter()
                .map(|v| v.map(f64::from).unwrap_or(f64::NAN))
                .collect();
            build_image(arr.shape, samples)
        }
        FitsData::IntegersU32(arr) => {
            let samples = arr
                .data
                .into_iter()
                .map(|v| v.map(f64::from).unwrap_or(f64::NAN))
                .collect();
            build_image(arr.shape, samples)
        }
        FitsData::Characters(_) => Err(LoadError::Decode(
            "unsupported pixel type: character data".to_string(),
        )),
    }
}

/// Shape check: exactly two axes (NAXIS1 × NAXIS2) and a sample count
/// matching them. Cubes, spectra, and empty payloads are rejected rather
/// than sliced.
fn build_image(shape: Vec<usize>, samples: Vec<f64>) -> Result<ImageBuffer, LoadError> {
    match shape.as_slice() {
        &[width, height] => {
            if samples.len() != width * height {
                return Err(LoadError::Decode(format!(
                    "payload has {} samples for a {width}×{height} image",
                    samples.len()
                )));
            }
            Ok(ImageBuffer::new(width, height, samples))
        }
        _ => Err(LoadError::NotTwoDimensional),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use std::fs;

    #[test]
    fn loads_a_2d_image_with_fits_shape_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gradient.fits");
        // 4 columns × 3 rows.
        let samples: Vec<f32> = (0..12).map(|i| i as f32).collect();
        test_support::write_fits(&path, &[4, 3], samples);

        let image = load_image(&path).unwrap();
        assert_eq!(image.dimensions(), (4, 3));
        assert_eq!(image.samples[0], 0.0);
        assert_eq!(image.samples[11], 11.0);
    }

    #[test]
    fn rejects_a_1d_spectrum() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spectrum_1d.fits");
        test_support::write_fits(&path, &[1000], vec![0.5f32; 1000]);

        let err = load_image(&path).unwrap_err();
        assert!(matches!(err, LoadError::NotTwoDimensional));
        assert_eq!(err.to_string(), "file does not contain 2D image data");
    }

    #[test]
    fn rejects_a_3d_cube() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cube.fits");
        test_support::write_fits(&path, &[4, 4, 2], vec![1.0f32; 32]);

        let err = load_image(&path).unwrap_err();
        assert!(matches!(err, LoadError::NotTwoDimensional));
    }

    #[test]
    fn rejects_a_non_fits_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not_a_fits.txt");
        fs::write(&path, "x".repeat(200)).unwrap();

        let err = load_image(&path).unwrap_err();
        match err {
            LoadError::Decode(msg) => assert!(msg.contains("SIMPLE")),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_a_file_with_a_truncated_data_block() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cut.fits");
        test_support::write_fits(&path, &[8, 8], test_support::ramp(8, 8));

        // Keep the header and the first 64 bytes of the 256-byte array.
        let bytes = fs::read(&path).unwrap();
        fs::write(&path, &bytes[..2880 + 64]).unwrap();

        let err = load_image(&path).unwrap_err();
        match err {
            LoadError::Decode(msg) => assert!(msg.contains("truncated data block")),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_a_header_with_no_end_card() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("endless.fits");
        test_support::write_fits(&path, &[4, 4], test_support::ramp(4, 4));

        // Blank out the END card.
        let mut bytes = fs::read(&path).unwrap();
        let end = (0..2880)
            .step_by(80)
            .find(|&i| bytes[i..].starts_with(b"END"))
            .unwrap();
        bytes[end..end + 3].fill(b' ');
        fs::write(&path, &bytes).unwrap();

        let err = load_image(&path).unwrap_err();
        assert!(matches!(err, LoadError::Decode(_)));
    }

    #[test]
    fn rejects_a_payload_shorter_than_its_shape() {
        let err = build_image(vec![4, 4], vec![0.0; 8]).unwrap_err();
        match err {
            LoadError::Decode(msg) => assert!(msg.contains("samples")),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_a_truncated_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stub.fits");
        fs::write(&path, "SIM").unwrap();

        let err = load_image(&path).unwrap_err();
        match err {
            LoadError::Decode(msg) => assert!(msg.contains("too short")),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_a_missing_file() {
        let err = load_image(Path::new("/no/such/file.fits")).unwrap_err();
        assert!(matches!(err, LoadError::Decode(_)));
    }
}
