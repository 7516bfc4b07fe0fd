use std::path::{Path, PathBuf};

use crate::data::loader::{self, LoadError};
use crate::data::model::ImageBuffer;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Decoded primary-HDU image (None until a file is opened).
    pub image: Option<ImageBuffer>,

    /// Path of the currently open file.
    pub path: Option<PathBuf>,

    /// Display levels: samples at `black` and below render black, samples
    /// at `white` and above render white.
    pub levels: (f64, f64),

    /// Pending error message, shown as a modal dialog until dismissed.
    pub error: Option<String>,

    /// Bumped whenever the image or the levels change, so the app knows
    /// to re-upload the display texture.
    pub revision: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            image: None,
            path: None,
            levels: (0.0, 1.0),
            error: None,
            revision: 0,
        }
    }
}

impl AppState {
    /// Open a FITS file, replacing the current image wholesale.
    ///
    /// On any error the state is left completely unchanged: the previous
    /// image, path, and levels stay in effect.
    pub fn open(&mut self, path: &Path) -> Result<(), LoadError> {
        let image = loader::load_image(path)?;
        self.levels = image.value_range();
        self.image = Some(image);
        self.path = Some(path.to_path_buf());
        self.revision += 1;
        Ok(())
    }

    /// Window title: the fixed label, suffixed with the open file's path.
    pub fn title(&self) -> String {
        match &self.path {
            Some(path) => format!("FITS Viewer - {}", path.display()),
            None => "FITS Viewer".to_string(),
        }
    }

    /// Set the display levels from the side-panel controls.
    pub fn set_levels(&mut self, black: f64, white: f64) {
        if self.levels != (black, white) {
            self.levels = (black, white);
            self.revision += 1;
        }
    }

    /// Reset the levels to the image's full data range.
    pub fn reset_levels(&mut self) {
        if let Some(image) = &self.image {
            self.levels = image.value_range();
            self.revision += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    #[test]
    fn initial_state_has_no_image_and_plain_title() {
        let state = AppState::default();
        assert!(state.image.is_none());
        assert_eq!(state.title(), "FITS Viewer");
    }

    #[test]
    fn open_stores_the_payload_and_updates_the_title() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("galaxy.fits");
        test_support::write_fits(&path, &[16, 8], test_support::ramp(16, 8));

        let mut state = AppState::default();
        state.open(&path).unwrap();

        let image = state.image.as_ref().unwrap();
        assert_eq!(image.dimensions(), (16, 8));
        assert_eq!(state.levels, (0.0, 127.0));
        assert_eq!(state.title(), format!("FITS Viewer - {}", path.display()));
    }

    #[test]
    fn open_is_idempotent_for_the_same_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("galaxy.fits");
        test_support::write_fits(&path, &[4, 4], test_support::ramp(4, 4));

        let mut state = AppState::default();
        state.open(&path).unwrap();
        let first = state.image.clone();
        let first_title = state.title();

        state.open(&path).unwrap();
        assert_eq!(state.image, first);
        assert_eq!(state.title(), first_title);
    }

    #[test]
    fn failed_open_leaves_previous_image_and_title_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("galaxy.fits");
        let bad = dir.path().join("spectrum_1d.fits");
        test_support::write_fits(&good, &[8, 8], test_support::ramp(8, 8));
        test_support::write_fits(&bad, &[100], vec![0.0f32; 100]);

        let mut state = AppState::default();
        state.open(&good).unwrap();
        let before = state.image.clone();
        let revision = state.revision;

        let err = state.open(&bad).unwrap_err();
        assert!(matches!(err, LoadError::NotTwoDimensional));
        assert_eq!(state.image, before);
        assert_eq!(state.title(), format!("FITS Viewer - {}", good.display()));
        assert_eq!(state.revision, revision);
    }

    #[test]
    fn open_replaces_the_previous_image() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.fits");
        let b = dir.path().join("b.fits");
        test_support::write_fits(&a, &[4, 2], test_support::ramp(4, 2));
        test_support::write_fits(&b, &[2, 6], test_support::ramp(2, 6));

        let mut state = AppState::default();
        state.open(&a).unwrap();
        state.open(&b).unwrap();

        assert_eq!(state.image.as_ref().unwrap().dimensions(), (2, 6));
        assert_eq!(state.title(), format!("FITS Viewer - {}", b.display()));
    }

    #[test]
    fn level_changes_bump_the_revision_only_when_different() {
        let mut state = AppState::default();
        let before = state.revision;
        state.set_levels(0.0, 1.0);
        assert_eq!(state.revision, before);
        state.set_levels(0.1, 0.9);
        assert_eq!(state.revision, before + 1);
    }
}
