use crate::config::toml_config::KitchenConfig;
use crate::domain::model::{ElementalProperties, ZodiacSystem};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "alchm-kitchen")]
#[command(about = "Astrological and elemental recipe recommendations", version)]
pub struct CliConfig {
    /// TOML configuration file; built-in defaults when omitted.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, short, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[arg(long, global = true, help = "Use the built-in ephemeris instead of the API")]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// The moment and place to read the sky for.
#[derive(Debug, Clone, Default, Args)]
pub struct SkyArgs {
    /// RFC 3339 timestamp, defaults to now.
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,

    #[arg(long, allow_hyphen_values = true)]
    pub latitude: Option<f64>,

    #[arg(long, allow_hyphen_values = true)]
    pub longitude: Option<f64>,

    #[arg(long)]
    pub zodiac: Option<ZodiacSystem>,
}

#[derive(Debug, Clone, Args)]
pub struct ElementArgs {
    #[arg(long, default_value_t = 0.25)]
    pub fire: f64,
    #[arg(long, default_value_t = 0.25)]
    pub water: f64,
    #[arg(long, default_value_t = 0.25)]
    pub earth: f64,
    #[arg(long, default_value_t = 0.25)]
    pub air: f64,
}

impl ElementArgs {
    pub fn properties(&self) -> ElementalProperties {
        ElementalProperties::new(self.fire, self.water, self.earth, self.air)
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Score the catalog against the sky and write the report bundle.
    Recommend {
        #[command(flatten)]
        sky: SkyArgs,
        #[arg(long)]
        output_path: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print planetary positions.
    Positions {
        #[command(flatten)]
        sky: SkyArgs,
    },
    /// Print the alchemical state of the sky.
    Alchemize {
        #[command(flatten)]
        sky: SkyArgs,
    },
    /// Thermodynamic metrics for an elemental profile.
    Thermo {
        #[command(flatten)]
        elements: ElementArgs,
    },
    /// Chakra resonance for an elemental profile.
    Chakras {
        #[command(flatten)]
        elements: ElementArgs,
    },
    /// Breakfast, lunch and dinner keyed on the natal chart or the sky.
    Menu {
        #[command(flatten)]
        sky: SkyArgs,
    },
    /// Lunar-mansion cooking windows.
    Windows {
        #[arg(long)]
        from: Option<DateTime<Utc>>,
        #[arg(long, default_value_t = 7, value_parser = clap::value_parser!(u32).range(1..=30))]
        days: u32,
    },
    /// Rank cuisines for a sign and season.
    Cuisines {
        /// Defaults to the current sun sign.
        #[arg(long)]
        sign: Option<String>,
        /// Defaults to the current season.
        #[arg(long)]
        season: Option<String>,
        #[arg(long)]
        meal_type: Option<String>,
        #[arg(long, default_value_t = crate::core::cuisine::DEFAULT_CUISINE_LIMIT)]
        limit: usize,
    },
    /// Spirit/matter balance of the last week's rituals.
    Balance,
    /// Recipes whose ingredients resonate with a sign.
    ZodiacRecipes {
        /// Defaults to the current sun sign.
        #[arg(long)]
        sign: Option<String>,
        #[arg(long, default_value_t = crate::core::recommend::DISCOVERY_LIMIT)]
        limit: usize,
    },
    /// Recipes built from in-season ingredients.
    SeasonalRecipes {
        /// Defaults to the current season.
        #[arg(long)]
        season: Option<String>,
        #[arg(long, default_value_t = crate::core::recommend::DISCOVERY_LIMIT)]
        limit: usize,
    },
    /// Combined sign and season cooking plan.
    Plan {
        #[arg(long)]
        sign: Option<String>,
        #[arg(long)]
        season: Option<String>,
        #[arg(long)]
        preferences: Option<String>,
        #[arg(long, default_value_t = crate::core::recommend::PLAN_LIMIT)]
        limit: usize,
    },
    /// Chart summary and sun-sign recipes for a birth moment.
    Generate {
        /// RFC 3339 birth time; defaults to the configured natal chart.
        #[arg(long)]
        birth: Option<DateTime<Utc>>,
        #[arg(long, allow_hyphen_values = true)]
        latitude: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        longitude: Option<f64>,
    },
    /// Cooking ritual, suggested time and potency for one recipe.
    Ritual {
        recipe_id: String,
        #[command(flatten)]
        sky: SkyArgs,
    },
    /// Filter and rank recipes by preferences and an optional profile.
    Recipes {
        #[arg(long, value_delimiter = ',')]
        cuisine: Vec<String>,
        #[arg(long, value_delimiter = ',')]
        diet: Vec<String>,
        #[arg(long)]
        max_prep: Option<u32>,
        #[arg(long, default_value_t = crate::core::recommend::DEFAULT_LIMIT)]
        limit: usize,
        #[arg(long)]
        fire: Option<f64>,
        #[arg(long)]
        water: Option<f64>,
        #[arg(long)]
        earth: Option<f64>,
        #[arg(long)]
        air: Option<f64>,
    },
}

impl CliConfig {
    /// Loads the TOML file (or defaults) and applies command-line overrides.
    pub fn kitchen_config(&self) -> Result<KitchenConfig> {
        let mut config = match &self.config {
            Some(path) => KitchenConfig::from_file(path)?,
            None => KitchenConfig::default(),
        };
        if self.offline {
            config.ephemeris.offline = true;
        }
        match &self.command {
            Command::Recommend {
                sky,
                output_path,
                limit,
            } => {
                sky.apply(&mut config);
                if let Some(path) = output_path {
                    config.output.output_path = path.clone();
                }
                if let Some(limit) = limit {
                    config.scoring.recommendation_limit = *limit;
                }
            }
            Command::Positions { sky }
            | Command::Alchemize { sky }
            | Command::Menu { sky }
            | Command::Ritual { sky, .. } => sky.apply(&mut config),
            _ => {}
        }
        Ok(config)
    }
}

impl SkyArgs {
    fn apply(&self, config: &mut KitchenConfig) {
        if let Some(lat) = self.latitude {
            config.location.latitude = lat;
        }
        if let Some(lon) = self.longitude {
            config.location.longitude = lon;
        }
        if let Some(system) = self.zodiac {
            config.location.zodiac_system = system;
        }
    }

    pub fn moment(&self) -> DateTime<Utc> {
        self.at.unwrap_or_else(Utc::now)
    }
}
