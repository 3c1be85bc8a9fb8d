use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::catalog::DEFAULT_ARTWORK_SIZE;
use crate::cover_cache::COVER_FILE_NAME;
use crate::error::{Error, Result};
use crate::matcher::{DEFAULT_LOCALE, FALLBACK_LOCALES};

/// Defaults that can be saved to `~/.state/albumtag/defaults.toml`.
/// Command-line flags override them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Two-letter store code used for the first search.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    /// Stores tried in order when a track listing is incomplete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_countries: Option<Vec<String>>,

    /// Square artwork size requested from the store.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artwork_size: Option<u32>,

    /// Sidecar cover file name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_file: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub clean: Option<bool>,

    /// Download the cover even when the sidecar exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_cover: Option<bool>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// `~/.state/albumtag/defaults.toml`
    pub fn get_config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME").map_err(|_| {
            io::Error::new(io::ErrorKind::NotFound, "HOME environment variable not set")
        })?;
        Ok(Path::new(&home).join(".state").join("albumtag").join("defaults.toml"))
    }

    /// Load from the default location; a missing file gives an empty config.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::new());
        }
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_string =
            toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        fs::write(path, toml_string)?;
        Ok(())
    }

    /// Merge with another config, preferring values from `other`.
    pub fn merge(&mut self, other: &Config) {
        if other.country.is_some() {
            self.country = other.country.clone();
        }
        if other.fallback_countries.is_some() {
            self.fallback_countries = other.fallback_countries.clone();
        }
        if other.artwork_size.is_some() {
            self.artwork_size = other.artwork_size;
        }
        if other.cover_file.is_some() {
            self.cover_file = other.cover_file.clone();
        }
        if other.clean.is_some() {
            self.clean = other.clean;
        }
        if other.refresh_cover.is_some() {
            self.refresh_cover = other.refresh_cover;
        }
    }

    pub fn country(&self) -> String {
        self.country
            .clone()
            .filter(|c| c.chars().count() == 2)
            .unwrap_or_else(|| DEFAULT_LOCALE.to_string())
    }

    pub fn fallback_countries(&self) -> Vec<String> {
        self.fallback_countries
            .clone()
            .unwrap_or_else(|| FALLBACK_LOCALES.iter().map(|c| c.to_string()).collect())
    }

    pub fn artwork_size(&self) -> u32 {
        self.artwork_size.unwrap_or(DEFAULT_ARTWORK_SIZE)
    }

    pub fn cover_file(&self) -> String {
        self.cover_file
            .clone()
            .unwrap_or_else(|| COVER_FILE_NAME.to_string())
    }

    pub fn print(&self, title: &str) {
        println!("{}:", title);
        println!("  Store:              {}", self.country());
        println!("  Fallback stores:    {}", self.fallback_countries().join(", "));
        println!("  Artwork size:       {}x{}", self.artwork_size(), self.artwork_size());
        println!("  Cover file:         {}", self.cover_file());
        if let Some(clean) = self.clean {
            println!("  Clean tags:         {}", if clean { "yes" } else { "no" });
        }
        if let Some(refresh) = self.refresh_cover {
            println!("  Refresh cover:      {}", if refresh { "yes" } else { "no" });
        }
    }
}
