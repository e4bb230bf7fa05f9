//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::PathBuf;

/// Project-level config file names, checked in order
const PROJECT_FILES: [&str; 2] = ["docqa.toml", ".docqa.toml"];

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Environment variable that overrides `api.base_url`
    pub const BASE_URL_ENV: &'static str = "DOCQA_API_URL";

    /// Prefix for `DOCQA_<SECTION>__<KEY>` overrides
    pub const ENV_PREFIX: &'static str = "DOCQA_";

    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `DOCQA_API_URL`, then `DOCQA_<SECTION>__<KEY>` variables
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./docqa.toml` or `./.docqa.toml`
    /// 4. Global: `<config_dir>/docqa/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(config_path).extract().map_err(Box::new)
    }

    /// Load defaults plus environment overrides (for --no-config)
    pub fn load_defaults() -> Result<FileConfig, Box<figment::Error>> {
        Self::with_env(Self::defaults()).extract().map_err(Box::new)
    }

    /// Build the merged provider chain without extracting it
    pub fn figment(config_path: Option<&PathBuf>) -> Figment {
        let mut figment = Self::defaults();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                tracing::debug!("Merging global config {}", global_path.display());
                figment = figment.merge(Toml::file(&global_path));
            }
        }

        if let Some(path) = Self::project_config_path() {
            tracing::debug!("Merging project config {}", path.display());
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            tracing::debug!("Merging explicit config {}", path.display());
            figment = figment.merge(Toml::file(path));
        }

        Self::with_env(figment)
    }

    fn defaults() -> Figment {
        Figment::new().merge(Serialized::defaults(FileConfig::default()))
    }

    fn with_env(figment: Figment) -> Figment {
        figment
            .merge(Env::prefixed(Self::ENV_PREFIX).split("__"))
            .merge(
                Env::raw()
                    .only(&[Self::BASE_URL_ENV])
                    .map(|_| "api.base_url".into()),
            )
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/docqa/config.toml if set,
    /// otherwise falls back to the platform config directory.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("docqa").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(config_path: Option<&PathBuf>) {
        println!("Configuration sources (in priority order):");

        if std::env::var_os(Self::BASE_URL_ENV).is_some() {
            println!("  [SET  ] Env:     {}", Self::BASE_URL_ENV);
        } else {
            println!("  [     ] Env:     {}", Self::BASE_URL_ENV);
        }

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{mark}] Explicit: {}", path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./docqa.toml or ./.docqa.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}
