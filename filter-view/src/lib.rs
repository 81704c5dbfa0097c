//! Filter View
//!
//! Loads the bundled picture, applies the configured filter once the view is
//! ready and hands the result to a presenter that writes it to disk.
//!
//! # Architecture
//! - `desktop_main` entry point
//! - Global configuration stored as TOML in the platform config directory
//! - `image_filter::FilterView` drives the pipeline exactly once

#[macro_use]
extern crate derivative;

mod config;
mod presenter;

use anyhow::{Context, Result};
use image_filter::{FilterView, SourceAsset, ViewState};
use presenter::PngFilePresenter;

const SOURCE_PNG: &[u8] = include_bytes!("../assets/source.png");

/// Initializes the logger.
///
/// Sets up a custom logger format with timestamp, log level, file name, line number,
/// and log message. Uses local time format for timestamps.
pub fn init_logger() {
    use std::io::Write;

    env_logger::builder()
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            let ts = chrono::Local::now().format("%H:%M:%S");

            writeln!(
                buf,
                "[{} {style}{}{style:#} {} {}] {}",
                ts,
                record.level(),
                record
                    .file()
                    .unwrap_or("None")
                    .split('/')
                    .next_back()
                    .unwrap_or("None"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}

pub fn desktop_main() -> Result<()> {
    init_logger();
    log::debug!("start...");

    config::init()?;
    let conf = config::all();

    let kind = conf
        .filter
        .validate()
        .with_context(|| format!("invalid filter config in {}", conf.config_path.display()))?;
    log::info!("filter: {kind}, amount: {}", conf.filter.amount);

    let presenter = PngFilePresenter::new(conf.output_path());
    let mut view = FilterView::new(
        SourceAsset::bundled(SOURCE_PNG),
        conf.filter.to_spec(),
        presenter,
    );

    match view.on_ready() {
        ViewState::Displayed => match view.presenter().saved_path() {
            Some(path) => log::info!("saved {}", path.display()),
            None => log::warn!("image rendered but not saved"),
        },
        state => log::warn!("nothing to display, view ended in {state:?}"),
    }

    log::debug!("exit...");
    Ok(())
}
