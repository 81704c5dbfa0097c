use image_filter::{DisplayableImage, Presenter};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Writes the displayed image as a PNG file.
#[derive(Debug)]
pub struct PngFilePresenter {
    path: PathBuf,
    saved: bool,
}

impl PngFilePresenter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            saved: false,
        }
    }

    pub fn saved_path(&self) -> Option<&Path> {
        self.saved.then_some(self.path.as_path())
    }
}

impl Presenter for PngFilePresenter {
    fn present(&mut self, image: &DisplayableImage) {
        if let Some(dir) = self.path.parent()
            && let Err(e) = fs::create_dir_all(dir)
        {
            log::warn!("create {} failed: {e}", dir.display());
            return;
        }

        match image.save_png(&self.path) {
            Ok(_) => self.saved = true,
            Err(e) => log::warn!("save {} failed: {e}", self.path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_filter::{FilterSpec, SourceImage, apply_filter};

    #[test]
    fn test_present_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.png");

        let source = SourceImage::from_bytes(crate::SOURCE_PNG).unwrap();
        let rendered = apply_filter(&source, &FilterSpec::new("pixellate", 1.0)).unwrap();

        let mut presenter = PngFilePresenter::new(&path);
        assert!(presenter.saved_path().is_none());

        presenter.present(&DisplayableImage::from(rendered));
        assert_eq!(presenter.saved_path(), Some(path.as_path()));
        assert!(SourceImage::open(&path).is_ok());
    }
}
