use alchm_kitchen::adapters::catalog::{load_catalog, load_history};
use alchm_kitchen::config::{CliConfig, Command};
use alchm_kitchen::core::chakra::resonance;
use alchm_kitchen::core::cuisine::recommend_cuisines;
use alchm_kitchen::core::lunar::cooking_windows;
use alchm_kitchen::core::menu::daily_menu;
use alchm_kitchen::core::planets::planetary_hour;
use alchm_kitchen::core::quantities::alchemize;
use alchm_kitchen::core::recommend::{
    chart_recipes, personalized_plan, recommend_recipes, seasonal_recipes, zodiac_recipes,
    RecommendationRequest,
};
use alchm_kitchen::core::thermodynamics::thermodynamics;
use alchm_kitchen::core::transit::{cooking_instruction, dominant_transit, DEFAULT_ORB_DEG};
use alchm_kitchen::core::zodiac::sun_sign_for_date;
use alchm_kitchen::core::{ConfigProvider, EphemerisSource};
use alchm_kitchen::domain::model::{
    ChartQuery, ElementalProperties, GeoLocation, Planet, Season, ZodiacSign,
};
use alchm_kitchen::utils::error::{ErrorSeverity, KitchenError, Result};
use alchm_kitchen::utils::{logger, validation::Validate};
use alchm_kitchen::{
    AstrologizeClient, KitchenConfig, KitchenEngine, LocalEphemeris, LocalStorage,
    RecommendationPipeline,
};
use chrono::Utc;
use clap::Parser;
use serde::Serialize;
use std::sync::Arc;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn ephemeris_source(config: &KitchenConfig) -> Result<Arc<dyn EphemerisSource>> {
    if config.ephemeris.offline {
        tracing::info!("Using built-in ephemeris");
        return Ok(Arc::new(LocalEphemeris));
    }
    Ok(Arc::new(AstrologizeClient::new(config.ephemeris_settings())?))
}

fn sky_query(config: &KitchenConfig, moment: chrono::DateTime<Utc>) -> ChartQuery {
    ChartQuery::new(moment, config.location()).with_zodiac_system(config.zodiac_system())
}

fn sign_or_today(sign: Option<String>) -> Result<ZodiacSign> {
    match sign {
        Some(s) => s.parse(),
        None => Ok(sun_sign_for_date(Utc::now().date_naive())),
    }
}

fn season_or_today(season: Option<String>) -> Result<Season> {
    match season {
        Some(s) => s.parse(),
        None => Ok(Season::for_date(Utc::now().date_naive())),
    }
}

async fn run(cli: CliConfig, config: KitchenConfig) -> Result<()> {
    let storage = LocalStorage::new(config.service.base_dir.clone());

    match cli.command {
        Command::Recommend { sky, .. } => {
            let source = ephemeris_source(&config)?;
            let pipeline = RecommendationPipeline::new(storage, config, source, sky.moment());
            let engine = KitchenEngine::new(pipeline);
            let output_path = engine.run().await?;
            println!("Report saved to: {}", output_path);
        }
        Command::Positions { sky } => {
            let snapshot = ephemeris_source(&config)?
                .positions(&sky_query(&config, sky.moment()))
                .await?;
            print_json(&snapshot)?;
        }
        Command::Alchemize { sky } => {
            let snapshot = ephemeris_source(&config)?
                .positions(&sky_query(&config, sky.moment()))
                .await?;
            print_json(&alchemize(&snapshot))?;
        }
        Command::Thermo { elements } => print_json(&thermodynamics(&elements.properties()))?,
        Command::Chakras { elements } => print_json(&resonance(&elements.properties()))?,
        Command::Menu { sky } => {
            let query = config
                .natal_query()
                .unwrap_or_else(|| sky_query(&config, sky.moment()));
            let chart = ephemeris_source(&config)?.positions(&query).await?;
            print_json(&daily_menu(
                chart.sign_of(Planet::Sun),
                chart.sign_of(Planet::Moon),
                chart.sign_of(Planet::Ascendant),
            ))?;
        }
        Command::Windows { from, days } => {
            print_json(&cooking_windows(from.unwrap_or_else(Utc::now), days))?;
        }
        Command::Cuisines {
            sign,
            season,
            meal_type,
            limit,
        } => {
            let sign = sign_or_today(sign)?;
            let season = season_or_today(season)?;
            let catalog =
                load_catalog(&storage, config.ingredients_file(), config.recipes_file()).await?;
            print_json(&recommend_cuisines(
                &catalog,
                sign,
                season,
                meal_type.as_deref(),
                limit,
            )?)?;
        }
        Command::ZodiacRecipes { sign, limit } => {
            let sign = sign_or_today(sign)?;
            let catalog =
                load_catalog(&storage, config.ingredients_file(), config.recipes_file()).await?;
            print_json(&zodiac_recipes(&catalog, sign, limit))?;
        }
        Command::SeasonalRecipes { season, limit } => {
            let season = season_or_today(season)?;
            let catalog =
                load_catalog(&storage, config.ingredients_file(), config.recipes_file()).await?;
            print_json(&seasonal_recipes(&catalog, season, limit))?;
        }
        Command::Plan {
            sign,
            season,
            preferences,
            limit,
        } => {
            let sign = sign.map(|s| s.parse::<ZodiacSign>()).transpose()?;
            let season = season.map(|s| s.parse::<Season>()).transpose()?;
            let catalog =
                load_catalog(&storage, config.ingredients_file(), config.recipes_file()).await?;
            print_json(&personalized_plan(&catalog, sign, season, preferences, limit))?;
        }
        Command::Generate {
            birth,
            latitude,
            longitude,
        } => {
            let query = match birth {
                Some(moment) => {
                    let home = config.location();
                    let location = GeoLocation {
                        latitude: latitude.unwrap_or(home.latitude),
                        longitude: longitude.unwrap_or(home.longitude),
                    };
                    ChartQuery::new(moment, location).with_zodiac_system(config.zodiac_system())
                }
                None => config
                    .natal_query()
                    .ok_or_else(|| KitchenError::MissingConfigError {
                        field: "natal.birth".to_string(),
                    })?,
            };
            let chart = ephemeris_source(&config)?.positions(&query).await?;
            let catalog =
                load_catalog(&storage, config.ingredients_file(), config.recipes_file()).await?;
            print_json(&chart_recipes(&catalog, &chart))?;
        }
        Command::Ritual { recipe_id, sky } => {
            let moment = sky.moment();
            let source = ephemeris_source(&config)?;
            let current = source.positions(&sky_query(&config, moment)).await?;
            let transit = match config.natal_query() {
                Some(natal_query) => {
                    let natal = source.positions(&natal_query).await?;
                    dominant_transit(&natal, &current, DEFAULT_ORB_DEG)
                }
                None => None,
            };
            let catalog =
                load_catalog(&storage, config.ingredients_file(), config.recipes_file()).await?;
            let recipe = catalog
                .recipe(&recipe_id)
                .ok_or_else(|| KitchenError::invalid_input("recipe_id", recipe_id.as_str()))?;
            let hour = planetary_hour(moment, config.location());
            print_json(&cooking_instruction(
                recipe,
                transit,
                current.sign_of(Planet::Sun).map(|s| s.element()),
                Some(hour.ruler),
                &cooking_windows(moment, 1),
            ))?;
        }
        Command::Balance => {
            let path = config
                .history_file()
                .ok_or_else(|| KitchenError::MissingConfigError {
                    field: "catalog.history_file".to_string(),
                })?;
            let history = load_history(&storage, Some(path)).await?;
            print_json(&alchm_kitchen::core::wellness::analyze_balance(
                &history,
                Utc::now(),
            ))?;
        }
        Command::Recipes {
            cuisine,
            diet,
            max_prep,
            limit,
            fire,
            water,
            earth,
            air,
        } => {
            let current_elements = match (fire, water, earth, air) {
                (None, None, None, None) => None,
                (f, w, e, a) => Some(ElementalProperties::new(
                    f.unwrap_or(0.0),
                    w.unwrap_or(0.0),
                    e.unwrap_or(0.0),
                    a.unwrap_or(0.0),
                )),
            };
            let request = RecommendationRequest {
                current_elements,
                cuisine_preferences: cuisine,
                dietary_restrictions: diet,
                max_prep_time: max_prep,
                limit,
            };
            let catalog =
                load_catalog(&storage, config.ingredients_file(), config.recipes_file()).await?;
            print_json(&recommend_recipes(&catalog, &request))?;
        }
    }
    Ok(())
}

fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn report_failure(e: &KitchenError) {
    tracing::error!(
        category = ?e.category(),
        severity = ?e.severity(),
        "Kitchen run failed: {}",
        e
    );
    tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("{}", e.user_friendly_message());
    eprintln!("Suggestion: {}", e.recovery_suggestion());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!(command = ?cli.command, "Starting alchm-kitchen");

    let config = match cli.kitchen_config().and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => {
            report_failure(&e);
            std::process::exit(exit_code(e.severity()).max(1));
        }
    };

    if let Err(e) = run(cli, config).await {
        report_failure(&e);
        let code = exit_code(e.severity());
        if code > 0 {
            std::process::exit(code);
        }
    }

    Ok(())
}
