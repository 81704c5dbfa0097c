//! Single-filter image pipeline.
//!
//! A [`SourceImage`] is wrapped into a lazy [`RecipeImage`], one of the
//! built-in filters is applied to it after probing which parameters the
//! filter supports, and the resulting recipe is materialized by a
//! [`RenderContext`] into a [`RenderedImage`]. A [`DisplayableImage`] wraps
//! the rendered pixels for whatever presents them.

pub mod config;
pub mod display;
pub mod extent;
pub mod filter;
pub mod pipeline;
pub mod recipe;
pub mod render;
pub mod source;
pub mod view;

pub use config::FilterConfig;
pub use display::DisplayableImage;
pub use extent::Extent;
pub use filter::{Filter, FilterKind, ParameterKey, make_filter};
pub use pipeline::{FilterSpec, ParameterRole, Pipeline, apply_filter};
pub use recipe::RecipeImage;
pub use render::{RenderContext, RenderedImage};
pub use source::{SourceAsset, SourceImage};
pub use view::{FilterView, Presenter, ViewState};

pub type Result<T> = std::result::Result<T, FilterError>;

#[derive(thiserror::Error, Debug)]
pub enum FilterError {
    #[error("Source load failed: {0}")]
    SourceLoadFailed(String),
    #[error("Unknown filter: {0}")]
    UnknownFilter(String),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Filter produced no output image")]
    NoOutput,
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}
