use crate::adapters::circuit_breaker::BreakerSettings;
use crate::adapters::ephemeris::EphemerisSettings;
use crate::core::ConfigProvider;
use crate::domain::model::{ChartQuery, GeoLocation, ZodiacSystem};
use crate::utils::error::{KitchenError, Result};
use crate::utils::validation::{self, Validate};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const OUTPUT_FORMATS: [&str; 2] = ["csv", "json"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KitchenConfig {
    pub service: ServiceConfig,
    pub ephemeris: EphemerisConfig,
    pub location: LocationConfig,
    pub catalog: CatalogConfig,
    pub output: OutputConfig,
    pub scoring: ScoringConfig,
    pub natal: Option<BirthConfig>,
    pub collective: CollectiveConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    /// Every relative path below resolves against this directory.
    pub base_dir: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "alchm-kitchen".to_string(),
            base_dir: ".".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EphemerisConfig {
    pub primary_url: String,
    pub fallback_url: Option<String>,
    pub timeout_seconds: u64,
    pub cache_ttl_seconds: u64,
    pub failure_threshold: u32,
    pub recovery_timeout_seconds: u64,
    pub use_fallback: bool,
    /// Skip the API and compute positions locally.
    pub offline: bool,
}

impl Default for EphemerisConfig {
    fn default() -> Self {
        let defaults = EphemerisSettings::default();
        Self {
            primary_url: defaults.primary_url,
            fallback_url: None,
            timeout_seconds: defaults.timeout.as_secs(),
            cache_ttl_seconds: defaults.cache_ttl.as_secs(),
            failure_threshold: defaults.breaker.failure_threshold,
            recovery_timeout_seconds: defaults.breaker.recovery_timeout.as_secs(),
            use_fallback: true,
            offline: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
    pub zodiac_system: ZodiacSystem,
}

impl Default for LocationConfig {
    fn default() -> Self {
        let location = GeoLocation::default();
        Self {
            latitude: location.latitude,
            longitude: location.longitude,
            zodiac_system: ZodiacSystem::Tropical,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub ingredients_file: String,
    pub recipes_file: String,
    pub history_file: Option<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            ingredients_file: "data/ingredients.csv".to_string(),
            recipes_file: "data/recipes.json".to_string(),
            history_file: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub output_path: String,
    pub bundle_name: String,
    pub formats: Vec<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_path: "./output".to_string(),
            bundle_name: "kitchen_report.zip".to_string(),
            formats: vec!["csv".to_string(), "json".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub recommendation_limit: usize,
    pub include_lunar: bool,
    pub window_days: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            recommendation_limit: crate::core::recommend::DEFAULT_LIMIT,
            include_lunar: true,
            window_days: 1,
        }
    }
}

/// A birth moment. Coordinates default to the kitchen's location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BirthConfig {
    pub name: Option<String>,
    pub birth: DateTime<Utc>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectiveConfig {
    pub participants: Vec<BirthConfig>,
}

impl KitchenConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| KitchenError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| KitchenError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn ephemeris_settings(&self) -> EphemerisSettings {
        EphemerisSettings {
            primary_url: self.ephemeris.primary_url.clone(),
            fallback_url: self.ephemeris.fallback_url.clone(),
            timeout: Duration::from_secs(self.ephemeris.timeout_seconds),
            cache_ttl: Duration::from_secs(self.ephemeris.cache_ttl_seconds),
            breaker: BreakerSettings {
                failure_threshold: self.ephemeris.failure_threshold,
                recovery_timeout: Duration::from_secs(self.ephemeris.recovery_timeout_seconds),
            },
            use_fallback: self.ephemeris.use_fallback,
        }
    }

    fn birth_query(&self, birth: &BirthConfig) -> ChartQuery {
        let home = self.location();
        let location = GeoLocation {
            latitude: birth.latitude.unwrap_or(home.latitude),
            longitude: birth.longitude.unwrap_or(home.longitude),
        };
        ChartQuery::new(birth.birth, location).with_zodiac_system(self.location.zodiac_system)
    }

    fn validate_birth(field: &str, birth: &BirthConfig) -> Result<()> {
        if let Some(lat) = birth.latitude {
            validation::validate_range(&format!("{}.latitude", field), lat, -90.0, 90.0)?;
        }
        if let Some(lon) = birth.longitude {
            validation::validate_range(&format!("{}.longitude", field), lon, -180.0, 180.0)?;
        }
        Ok(())
    }
}

impl ConfigProvider for KitchenConfig {
    fn output_path(&self) -> &str {
        &self.output.output_path
    }

    fn bundle_name(&self) -> &str {
        &self.output.bundle_name
    }

    fn output_formats(&self) -> &[String] {
        &self.output.formats
    }

    fn location(&self) -> GeoLocation {
        GeoLocation {
            latitude: self.location.latitude,
            longitude: self.location.longitude,
        }
    }

    fn zodiac_system(&self) -> ZodiacSystem {
        self.location.zodiac_system
    }

    fn ingredients_file(&self) -> &str {
        &self.catalog.ingredients_file
    }

    fn recipes_file(&self) -> &str {
        &self.catalog.recipes_file
    }

    fn history_file(&self) -> Option<&str> {
        self.catalog.history_file.as_deref()
    }

    fn natal_query(&self) -> Option<ChartQuery> {
        self.natal.as_ref().map(|birth| self.birth_query(birth))
    }

    fn participant_queries(&self) -> Vec<ChartQuery> {
        self.collective
            .participants
            .iter()
            .map(|birth| self.birth_query(birth))
            .collect()
    }

    fn include_lunar(&self) -> bool {
        self.scoring.include_lunar
    }

    fn recommendation_limit(&self) -> usize {
        self.scoring.recommendation_limit
    }

    fn window_days(&self) -> u32 {
        self.scoring.window_days
    }
}

impl Validate for KitchenConfig {
    fn validate(&self) -> Result<()> {
        if !self.ephemeris.offline {
            validation::validate_url("ephemeris.primary_url", &self.ephemeris.primary_url)?;
            if let Some(url) = &self.ephemeris.fallback_url {
                validation::validate_url("ephemeris.fallback_url", url)?;
            }
        }
        validation::validate_positive_number(
            "ephemeris.timeout_seconds",
            self.ephemeris.timeout_seconds as usize,
            1,
        )?;
        validation::validate_positive_number(
            "ephemeris.failure_threshold",
            self.ephemeris.failure_threshold as usize,
            1,
        )?;

        validation::validate_range("location.latitude", self.location.latitude, -90.0, 90.0)?;
        validation::validate_range("location.longitude", self.location.longitude, -180.0, 180.0)?;

        validation::validate_path("service.base_dir", &self.service.base_dir)?;
        validation::validate_path("catalog.ingredients_file", &self.catalog.ingredients_file)?;
        validation::validate_path("catalog.recipes_file", &self.catalog.recipes_file)?;
        validation::validate_path("output.output_path", &self.output.output_path)?;
        validation::validate_non_empty_string("output.bundle_name", &self.output.bundle_name)?;

        if self.output.formats.is_empty() {
            return Err(KitchenError::MissingConfigError {
                field: "output.formats".to_string(),
            });
        }
        validation::validate_one_of("output.formats", &self.output.formats, &OUTPUT_FORMATS)?;

        validation::validate_positive_number(
            "scoring.recommendation_limit",
            self.scoring.recommendation_limit,
            1,
        )?;
        validation::validate_range("scoring.window_days", self.scoring.window_days, 1, 30)?;

        if let Some(natal) = &self.natal {
            Self::validate_birth("natal", natal)?;
        }
        for (index, participant) in self.collective.participants.iter().enumerate() {
            Self::validate_birth(&format!("collective.participants[{}]", index), participant)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = KitchenConfig::from_toml_str("").unwrap();
        assert_eq!(config.ephemeris.timeout_seconds, 5);
        assert_eq!(config.ephemeris.cache_ttl_seconds, 3600);
        assert_eq!(config.ephemeris.failure_threshold, 5);
        assert_eq!(config.location().latitude, 40.7498);
        assert_eq!(config.recommendation_limit(), 10);
        assert!(config.natal_query().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[service]
name = "test-kitchen"

[ephemeris]
primary_url = "https://astro.example.com/api/astrologize"
fallback_url = "https://backup.example.com/api/astrologize"
timeout_seconds = 3

[location]
latitude = 51.5
longitude = -0.12
zodiac_system = "sidereal"

[output]
output_path = "./reports"
formats = ["json"]

[natal]
birth = "1990-10-15T11:15:00Z"

[[collective.participants]]
name = "guest"
birth = "1988-01-02T03:04:00Z"
latitude = 34.05
longitude = -118.24
"#;

        let config = KitchenConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.service.name, "test-kitchen");
        assert_eq!(config.zodiac_system(), ZodiacSystem::Sidereal);
        assert_eq!(config.output_formats(), &["json".to_string()]);

        let natal = config.natal_query().unwrap();
        assert_eq!(natal.location.latitude, 51.5);
        assert_eq!(natal.zodiac_system, ZodiacSystem::Sidereal);

        let party = config.participant_queries();
        assert_eq!(party.len(), 1);
        assert_eq!(party[0].location.longitude, -118.24);

        let settings = config.ephemeris_settings();
        assert_eq!(settings.timeout, Duration::from_secs(3));
        assert!(settings.fallback_url.is_some());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("KITCHEN_TEST_EPHEMERIS", "https://env.example.com/chart");

        let config = KitchenConfig::from_toml_str(
            r#"
[ephemeris]
primary_url = "${KITCHEN_TEST_EPHEMERIS}"
"#,
        )
        .unwrap();
        assert_eq!(config.ephemeris.primary_url, "https://env.example.com/chart");

        std::env::remove_var("KITCHEN_TEST_EPHEMERIS");
    }

    #[test]
    fn test_config_validation() {
        let bad_url = KitchenConfig::from_toml_str("[ephemeris]\nprimary_url = \"invalid-url\"").unwrap();
        assert!(bad_url.validate().is_err());

        // offline runs never call the API
        let offline =
            KitchenConfig::from_toml_str("[ephemeris]\nprimary_url = \"invalid-url\"\noffline = true").unwrap();
        assert!(offline.validate().is_ok());

        let bad_lat = KitchenConfig::from_toml_str("[location]\nlatitude = 95.0").unwrap();
        assert!(bad_lat.validate().is_err());

        let bad_format = KitchenConfig::from_toml_str("[output]\nformats = [\"xml\"]").unwrap();
        assert!(bad_format.validate().is_err());

        let no_format = KitchenConfig::from_toml_str("[output]\nformats = []").unwrap();
        assert!(matches!(
            no_format.validate(),
            Err(KitchenError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[service]\nname = \"file-test\"\n")
            .unwrap();

        let config = KitchenConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.service.name, "file-test");
    }
}
