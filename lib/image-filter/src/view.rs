//! Framework independent "render when the view appears" hook.

use crate::{
    DisplayableImage, FilterError, FilterSpec, Pipeline, SourceAsset, SourceImage,
    pipeline::Stage,
};

/// Receives the image once the pipeline has produced it.
pub trait Presenter {
    fn present(&mut self, image: &DisplayableImage);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Unloaded,
    SourceLoaded,
    RecipeBuilt,
    ParametersAssigned,
    Rendered,
    Displayed,
    Failed,
}

impl From<Stage> for ViewState {
    fn from(stage: Stage) -> Self {
        match stage {
            Stage::RecipeBuilt => ViewState::RecipeBuilt,
            Stage::ParametersAssigned => ViewState::ParametersAssigned,
            Stage::Rendered => ViewState::Rendered,
        }
    }
}

/// Owns the source for as long as the view lives and shows nothing until
/// [`FilterView::on_ready`] has produced an image.
pub struct FilterView<P: Presenter> {
    asset: SourceAsset,
    spec: FilterSpec,
    pipeline: Pipeline,
    presenter: P,
    source: Option<SourceImage>,
    image: Option<DisplayableImage>,
    state: ViewState,
    error: Option<FilterError>,
    fired: bool,
}

impl<P: Presenter> FilterView<P> {
    pub fn new(asset: SourceAsset, spec: FilterSpec, presenter: P) -> Self {
        Self {
            asset,
            spec,
            pipeline: Pipeline::default(),
            presenter,
            source: None,
            image: None,
            state: ViewState::Unloaded,
            error: None,
            fired: false,
        }
    }

    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// Run the pipeline. Only the first call does any work.
    pub fn on_ready(&mut self) -> ViewState {
        if self.fired {
            return self.state;
        }
        self.fired = true;

        let source = match self.asset.load() {
            Ok(source) => source,
            Err(e) => return self.fail(e),
        };
        self.state = ViewState::SourceLoaded;

        let mut state = self.state;
        let result = self
            .pipeline
            .apply_with_progress(&source, &self.spec, |stage| state = stage.into());
        self.state = state;
        self.source = Some(source);

        match result {
            Ok(rendered) => {
                let image = DisplayableImage::from(rendered);
                self.presenter.present(&image);
                log::info!(
                    "displaying {} image {}x{}",
                    self.spec.name,
                    image.width(),
                    image.height()
                );

                self.image = Some(image);
                self.state = ViewState::Displayed;
                self.state
            }
            Err(e) => self.fail(e),
        }
    }

    fn fail(&mut self, error: FilterError) -> ViewState {
        match &error {
            FilterError::SourceLoadFailed(reason) => log::warn!("source load failed: {reason}"),
            FilterError::NoOutput => log::warn!("{} produced no output", self.spec.name),
            FilterError::RenderFailed(reason) => log::warn!("render failed: {reason}"),
            e => log::warn!("filter `{}` failed: {e}", self.spec.name),
        }

        self.error = Some(error);
        self.state = ViewState::Failed;
        self.state
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    /// Current image, `None` until the first successful run.
    pub fn image(&self) -> Option<&DisplayableImage> {
        self.image.as_ref()
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    pub fn last_error(&self) -> Option<&FilterError> {
        self.error.as_ref()
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn into_presenter(self) -> P {
        self.presenter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::{borrow::Cow, io::Cursor};

    #[derive(Default)]
    struct Recorder {
        shown: Vec<(u32, u32)>,
    }

    impl Presenter for Recorder {
        fn present(&mut self, image: &DisplayableImage) {
            self.shown.push((image.width(), image.height()));
        }
    }

    fn png_asset() -> SourceAsset {
        let img = RgbaImage::from_fn(12, 12, |x, y| Rgba([x as u8 * 20, y as u8 * 20, 0, 255]));
        let mut bytes = Cursor::new(Vec::new());
        img.write_to(&mut bytes, ImageFormat::Png).unwrap();
        SourceAsset::Bytes(Cow::Owned(bytes.into_inner()))
    }

    #[test]
    fn test_starts_empty() {
        let view = FilterView::new(png_asset(), FilterSpec::new("sepia", 1.0), Recorder::default());
        assert_eq!(view.state(), ViewState::Unloaded);
        assert!(view.image().is_none());
    }

    #[test]
    fn test_on_ready_runs_once() {
        let mut view =
            FilterView::new(png_asset(), FilterSpec::new("sepia", 1.0), Recorder::default());

        assert_eq!(view.on_ready(), ViewState::Displayed);
        assert_eq!(view.on_ready(), ViewState::Displayed);
        assert_eq!(view.presenter().shown, vec![(12, 12)]);
        assert!(view.image().is_some());
        assert!(view.source().is_some());
    }

    #[test]
    fn test_corrupt_asset_stays_blank() {
        let asset = SourceAsset::bundled(b"\x89PNG broken");
        let mut view = FilterView::new(asset, FilterSpec::new("twirl", 1.0), Recorder::default());

        assert_eq!(view.on_ready(), ViewState::Failed);
        assert!(view.image().is_none());
        assert!(matches!(
            view.last_error(),
            Some(FilterError::SourceLoadFailed(_))
        ));
        assert!(view.presenter().shown.is_empty());
    }

    #[test]
    fn test_unknown_filter_stays_blank() {
        let mut view = FilterView::new(
            png_asset(),
            FilterSpec::new("unknown-filter", 0.5),
            Recorder::default(),
        );

        assert_eq!(view.on_ready(), ViewState::Failed);
        assert!(view.image().is_none());
        assert!(matches!(view.last_error(), Some(FilterError::UnknownFilter(_))));
    }
}
