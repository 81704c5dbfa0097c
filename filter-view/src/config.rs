use anyhow::{Context, Result, bail};
use image_filter::FilterConfig;
use log::debug;
use once_cell::sync::Lazy;
use platform_dirs::AppDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

const CARGO_TOML: &str = include_str!("../Cargo.toml");
static CONFIG: Lazy<Mutex<Config>> = Lazy::new(|| Mutex::new(Config::default()));

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct Config {
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(skip)]
    pub data_dir: PathBuf,

    #[serde(skip)]
    pub is_first_run: bool,

    #[serde(skip)]
    pub app_name: String,

    #[serde(default)]
    pub filter: FilterConfig,

    #[serde(default)]
    pub output: Output,
}

#[derive(Serialize, Deserialize, Debug, Clone, Derivative)]
#[derivative(Default)]
pub struct Output {
    /// Empty means `<data dir>/output`
    #[serde(default)]
    pub save_dir: String,

    #[serde(default = "file_name_default")]
    #[derivative(Default(value = "file_name_default()"))]
    pub file_name: String,
}

impl Config {
    /// Initializes the configuration
    ///
    /// Reads the package name, creates directories, and loads configuration file.
    pub fn init(&mut self) -> Result<()> {
        let metadata =
            toml::from_str::<toml::Table>(CARGO_TOML).with_context(|| "parse Cargo.toml failed")?;

        self.app_name = metadata
            .get("package")
            .and_then(|package| package.get("name"))
            .and_then(|name| name.as_str())
            .with_context(|| "package name missing in Cargo.toml")?
            .to_string();

        let app_dirs = AppDirs::new(Some(&self.app_name), true)
            .with_context(|| "no platform directories for this user")?;
        self.crate_dirs(&app_dirs.config_dir, &app_dirs.data_dir)?;
        self.load().with_context(|| "load config file failed")?;
        debug!("{:?}", self);
        Ok(())
    }

    fn crate_dirs(&mut self, config_dir: &Path, data_dir: &Path) -> Result<()> {
        self.config_path = config_dir.join(format!("{}.toml", self.app_name));
        self.data_dir = data_dir.to_path_buf();

        fs::create_dir_all(config_dir)?;
        fs::create_dir_all(data_dir)?;

        Ok(())
    }

    /// Loads configuration from file, writing defaults if it is missing or
    /// unparsable. An unparsable file is kept as `<name>.toml.bak`.
    fn load(&mut self) -> Result<()> {
        match fs::read_to_string(&self.config_path) {
            Ok(text) => match toml::from_str::<Config>(&text) {
                Ok(mut c) => {
                    c.config_path = self.config_path.clone();
                    c.data_dir = self.data_dir.clone();
                    c.is_first_run = self.is_first_run;
                    c.app_name = self.app_name.clone();
                    *self = c;

                    Ok(())
                }
                Err(e) => {
                    log::warn!("{} is not valid toml: {e}", self.config_path.display());
                    self.is_first_run = true;

                    if let Some(bak_file) = &self.config_path.as_os_str().to_str() {
                        _ = fs::copy(&self.config_path, format!("{}.bak", bak_file));
                    }

                    self.save()
                }
            },
            Err(_) => {
                self.is_first_run = true;
                self.save()
            }
        }
    }

    /// Saves the current configuration to file
    pub fn save(&self) -> Result<()> {
        match toml::to_string_pretty(self) {
            Ok(text) => Ok(fs::write(&self.config_path, text)
                .with_context(|| "save config failed".to_string())?),
            Err(e) => bail!(format!("convert config to toml format failed. {e:?}")),
        }
    }

    pub fn output_path(&self) -> PathBuf {
        let dir = if self.output.save_dir.is_empty() {
            self.data_dir.join("output")
        } else {
            PathBuf::from(&self.output.save_dir)
        };

        dir.join(&self.output.file_name)
    }
}

fn file_name_default() -> String {
    "filtered.png".to_string()
}

/// Initializes the global configuration
///
/// This should be called once at application startup.
pub fn init() -> Result<()> {
    let mut config = CONFIG
        .lock()
        .map_err(|e| anyhow::anyhow!("config lock poisoned: {e}"))?;
    config.init()
}

/// Returns a clone of the current configuration
pub fn all() -> Config {
    match CONFIG.lock() {
        Ok(config) => config.clone(),
        Err(e) => e.into_inner().clone(),
    }
}
