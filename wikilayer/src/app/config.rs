//! Application configuration.
//!
//! `AppConfig` is the top-level configuration surface for front-ends. It
//! translates into the library's `RefreshConfig` and can be loaded from a
//! simple INI file, with every key optional:
//!
//! ```ini
//! [wikipedia]
//! language = en
//!
//! [refresh]
//! search_radius_m = 10000
//! display_radius_m = 3000
//! min_travel_m = 1000
//! min_interval_secs = 3
//! interval_secs = 10
//! ```

use std::path::Path;
use std::time::Duration;

use ini::Ini;

use crate::refresh::{
    RefreshConfig, DEFAULT_DISPLAY_RADIUS_M, DEFAULT_LANGUAGE, DEFAULT_MIN_INTERVAL,
    DEFAULT_MIN_TRAVEL_M, DEFAULT_SEARCH_RADIUS_M,
};

use super::error::AppError;

/// Default interval between position requests to the simulator, in seconds.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 10;

/// Wikipedia languages offered by front-ends, as (name, code) pairs.
pub const LANGUAGE_OPTIONS: &[(&str, &str)] = &[
    ("English", "en"),
    ("French", "fr"),
    ("German", "de"),
    ("Japanese", "ja"),
    ("Spanish", "es"),
    ("Russian", "ru"),
    ("Chinese", "zh"),
    ("Italian", "it"),
    ("Portuguese", "pt"),
    ("Persian", "fa"),
    ("Arabic", "ar"),
    ("Polish", "pl"),
    ("Dutch", "nl"),
    ("Ukrainian", "uk"),
    ("Hebrew", "he"),
    ("Turkish", "tr"),
    ("Indonesian", "id"),
    ("Czech", "cs"),
    ("Vietnamese", "vi"),
    ("Swedish", "sv"),
];

/// Display radii offered by front-ends, in meters.
pub const DISPLAY_RADIUS_OPTIONS_M: &[u32] = &[
    1_000, 2_000, 3_000, 4_000, 5_000, 6_000, 7_000, 8_000, 9_000, 10_000,
];

/// Top-level application configuration.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Wikipedia language code.
    pub language: String,

    /// Geosearch radius in meters.
    pub search_radius_m: u32,

    /// Display radius in meters.
    pub display_radius_m: u32,

    /// Debounce travel distance in meters.
    pub min_travel_m: f64,

    /// Debounce interval in seconds.
    pub min_interval_secs: u64,

    /// Interval between position requests to the simulator, in seconds.
    pub refresh_interval_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            search_radius_m: DEFAULT_SEARCH_RADIUS_M,
            display_radius_m: DEFAULT_DISPLAY_RADIUS_M,
            min_travel_m: DEFAULT_MIN_TRAVEL_M,
            min_interval_secs: DEFAULT_MIN_INTERVAL.as_secs(),
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
        }
    }
}

impl AppConfig {
    /// Loads configuration from an INI file.
    ///
    /// A missing file yields the defaults; present keys override them and
    /// unknown keys are ignored.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let ini = Ini::load_from_file(path)?;
        let mut config = Self::default();

        if let Some(section) = ini.section(Some("wikipedia")) {
            if let Some(language) = section.get("language") {
                config.language = language.to_string();
            }
        }
        if let Some(section) = ini.section(Some("refresh")) {
            if let Some(value) = section.get("search_radius_m") {
                config.search_radius_m = parse_key("search_radius_m", value)?;
            }
            if let Some(value) = section.get("display_radius_m") {
                config.display_radius_m = parse_key("display_radius_m", value)?;
            }
            if let Some(value) = section.get("min_travel_m") {
                config.min_travel_m = parse_key("min_travel_m", value)?;
            }
            if let Some(value) = section.get("min_interval_secs") {
                config.min_interval_secs = parse_key("min_interval_secs", value)?;
            }
            if let Some(value) = section.get("interval_secs") {
                config.refresh_interval_secs = parse_key("interval_secs", value)?;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration for values the pipeline cannot work with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.language.is_empty() {
            return Err(AppError::Config("language must not be empty".to_string()));
        }
        if self.display_radius_m == 0 {
            return Err(AppError::Config(
                "display_radius_m must be positive".to_string(),
            ));
        }
        if self.search_radius_m < self.display_radius_m {
            return Err(AppError::Config(format!(
                "search_radius_m ({}) must not be smaller than display_radius_m ({})",
                self.search_radius_m, self.display_radius_m
            )));
        }
        Ok(())
    }

    /// Translates into the refresh pipeline configuration.
    pub fn to_refresh_config(&self) -> RefreshConfig {
        RefreshConfig::new(self.language.clone())
            .with_search_radius_m(self.search_radius_m)
            .with_display_radius_m(self.display_radius_m)
            .with_min_travel_m(self.min_travel_m)
            .with_min_interval(Duration::from_secs(self.min_interval_secs))
    }

    /// Interval between position requests to the simulator.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

fn parse_key<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, AppError> {
    value
        .parse()
        .map_err(|_| AppError::Config(format!("invalid value for {}: {}", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.language, "en");
        assert_eq!(config.search_radius_m, 10_000);
        assert_eq!(config.display_radius_m, 3_000);
        assert_eq!(config.refresh_interval_secs, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = AppConfig::load(Path::new("/nonexistent/wikilayer.ini")).unwrap();
        assert_eq!(config.language, "en");
    }

    #[test]
    fn test_present_keys_override_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[wikipedia]\nlanguage = de\n\n[refresh]\ndisplay_radius_m = 5000\ninterval_secs = 5\n"
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.language, "de");
        assert_eq!(config.display_radius_m, 5_000);
        assert_eq!(config.refresh_interval_secs, 5);
        // Untouched keys keep their defaults.
        assert_eq!(config.search_radius_m, 10_000);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[wikipedia]\nlanguage = fr\nfont_size = 12\n").unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.language, "fr");
    }

    #[test]
    fn test_invalid_number_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[refresh]\ndisplay_radius_m = huge\n").unwrap();

        let result = AppConfig::load(file.path());
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_display_radius_larger_than_search_radius_is_rejected() {
        let config = AppConfig {
            search_radius_m: 2_000,
            display_radius_m: 5_000,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_to_refresh_config_carries_values_over() {
        let config = AppConfig {
            language: "ja".to_string(),
            display_radius_m: 4_000,
            min_interval_secs: 7,
            ..AppConfig::default()
        };

        let refresh = config.to_refresh_config();
        assert_eq!(refresh.language, "ja");
        assert_eq!(refresh.display_radius_m, 4_000);
        assert_eq!(refresh.min_interval, Duration::from_secs(7));
    }

    #[test]
    fn test_language_options_contain_defaults() {
        assert!(LANGUAGE_OPTIONS.iter().any(|(_, code)| *code == "en"));
        assert_eq!(DISPLAY_RADIUS_OPTIONS_M.len(), 10);
    }
}
