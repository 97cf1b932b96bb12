use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use skywatch_core::Coordinates;
use std::{fs, path::PathBuf};

/// Location used when `skywatch coords` is run without arguments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HomeLocation {
    pub latitude: f64,
    pub longitude: f64,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Cities shown by `skywatch cities` when no names are given.
    #[serde(default)]
    pub favorites: Vec<String>,

    /// Example TOML:
    /// [home]
    /// latitude = 48.8566
    /// longitude = 2.3522
    pub home: Option<HomeLocation>,
}

impl Config {
    /// Home coordinates, or an error telling the user how to set them.
    pub fn home_coordinates(&self) -> Result<Coordinates> {
        let home = self.home.ok_or_else(|| {
            anyhow!(
                "No home location configured.\n\
                 Hint: pass coordinates (`skywatch coords 48.85 2.35`) or run `skywatch configure`."
            )
        })?;

        Ok(Coordinates::new(home.latitude, home.longitude))
    }

    pub fn set_home(&mut self, latitude: f64, longitude: f64) {
        self.home = Some(HomeLocation { latitude, longitude });
    }

    /// Add a favorite city. Blank names and case-insensitive duplicates are ignored.
    /// Returns whether the list changed.
    pub fn add_favorite(&mut self, city: &str) -> bool {
        let city = city.trim();
        if city.is_empty() || self.has_favorite(city) {
            return false;
        }

        self.favorites.push(city.to_string());
        true
    }

    /// Remove a favorite city, matching case-insensitively. Returns whether it was present.
    pub fn remove_favorite(&mut self, city: &str) -> bool {
        let before = self.favorites.len();
        self.favorites.retain(|f| !f.eq_ignore_ascii_case(city.trim()));
        self.favorites.len() != before
    }

    pub fn has_favorite(&self, city: &str) -> bool {
        self.favorites.iter().any(|f| f.eq_ignore_ascii_case(city.trim()))
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skywatch", "skywatch")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
