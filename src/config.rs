use crate::models::{Category, Coordinate, SearchDefaults};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub location: LocationConfig,
    pub api: ApiConfig,
    pub search: SearchConfig,
    pub ui: UiConfig,
}

/// Which IP geolocation service answers "where am I".
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LocationProvider {
    IpApi,
    IpWhois,
    None, // No detection available; only manual coordinates
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LocationConfig {
    pub provider: LocationProvider,
    pub lookup_address: String, // Address handed to the geolocation service
    pub allow_detection: bool,  // false behaves like a declined permission prompt
    pub timeout_secs: u64,
    pub initial_latitude: f64, // Map center before any location is known
    pub initial_longitude: f64,
    pub initial_zoom: f64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            provider: LocationProvider::IpApi,
            lookup_address: "1.1.1.1".to_string(),
            allow_detection: true,
            timeout_secs: 10,
            initial_latitude: 20.5937,
            initial_longitude: 78.9629,
            initial_zoom: 5.0,
        }
    }
}

impl LocationConfig {
    pub fn initial_center(&self) -> Coordinate {
        Coordinate::try_new(self.initial_latitude, self.initial_longitude).unwrap_or(Coordinate {
            latitude: 0.0,
            longitude: 0.0,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub endpoint: String,
    pub request_timeout_secs: Option<u64>, // None keeps the transport default
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8000/explorer/api/nearby-places/".to_string(),
            request_timeout_secs: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    pub default_radius_km: f64,
    pub max_radius_km: f64,
    pub default_category: Category,
}

impl Default for SearchConfig {
    fn default() -> Self {
        let defaults = SearchDefaults::default();
        Self {
            default_radius_km: defaults.radius_km,
            max_radius_km: defaults.max_radius_km,
            default_category: defaults.category,
        }
    }
}

impl SearchConfig {
    /// Radii must be positive and finite; otherwise the built-in defaults apply.
    pub fn defaults(&self) -> SearchDefaults {
        let usable = |r: f64| r.is_finite() && r > 0.0;
        if !usable(self.default_radius_km) || !usable(self.max_radius_km) {
            warn!(
                "Invalid [search] radii (default {}, max {}). Using defaults.",
                self.default_radius_km, self.max_radius_km
            );
            return SearchDefaults {
                category: self.default_category,
                ..SearchDefaults::default()
            };
        }

        SearchDefaults {
            radius_km: self.default_radius_km,
            max_radius_km: self.max_radius_km,
            category: self.default_category,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    pub tick_rate_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { tick_rate_ms: 150 }
    }
}

impl Config {
    /// Loads config.toml from the root directory.
    /// If it doesn't exist, creates a default one.
    pub fn load() -> Self {
        Self::load_from("config.toml")
    }

    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let config_path = path.as_ref();

        if let Ok(content) = fs::read_to_string(config_path) {
            match toml::from_str(&content) {
                Ok(config) => return config,
                Err(e) => {
                    warn!("Failed to parse {}: {}. Using defaults.", config_path.display(), e);
                    return Config::default();
                }
            }
        }

        let default_config = Config::default();

        // Save default config to disk for the user to edit later
        match toml::to_string_pretty(&default_config) {
            Ok(toml_string) => {
                if fs::write(config_path, toml_string).is_err() {
                    warn!("Could not write default {} to disk.", config_path.display());
                }
            }
            Err(e) => warn!("Could not serialize default config: {}", e),
        }

        info!("Loaded default configuration.");
        default_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("nearby-tui-{}-{}", name, std::process::id()));
        let _ = fs::create_dir_all(&dir);
        dir.join("config.toml")
    }

    #[test]
    fn missing_file_writes_defaults() {
        let path = scratch_path("missing");
        let _ = fs::remove_file(&path);

        let config = Config::load_from(&path);
        assert_eq!(config, Config::default());
        assert!(path.exists());
        assert_eq!(Config::load_from(&path), Config::default());
    }

    #[test]
    fn partial_file_keeps_defaults_for_other_sections() {
        let path = scratch_path("partial");
        fs::write(
            &path,
            "[search]\ndefault_radius_km = 5.0\ndefault_category = \"HOTEL\"\n\n[location]\nprovider = \"none\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path);
        assert_eq!(config.search.default_radius_km, 5.0);
        assert_eq!(config.search.default_category, Category::Hotel);
        assert_eq!(config.search.max_radius_km, 50.0);
        assert_eq!(config.location.provider, LocationProvider::None);
        assert!(config.location.allow_detection);
        assert_eq!(config.api, ApiConfig::default());
    }

    #[test]
    fn non_positive_radii_fall_back_to_builtin_defaults() {
        let search = SearchConfig {
            default_radius_km: -3.0,
            max_radius_km: 50.0,
            default_category: Category::Temple,
        };
        let defaults = search.defaults();
        assert_eq!(defaults.radius_km, SearchDefaults::default().radius_km);
        assert_eq!(defaults.category, Category::Temple);

        let zero_cap = SearchConfig {
            max_radius_km: 0.0,
            ..SearchConfig::default()
        };
        assert_eq!(zero_cap.defaults(), SearchDefaults::default());
    }

    #[test]
    fn unparsable_file_falls_back_to_defaults() {
        let path = scratch_path("broken");
        fs::write(&path, "this is = = not toml").unwrap();
        assert_eq!(Config::load_from(&path), Config::default());
    }
}
