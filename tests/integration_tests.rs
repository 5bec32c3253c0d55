use alchm_kitchen::core::EphemerisSource;
use alchm_kitchen::{
    AstrologizeClient, KitchenConfig, KitchenEngine, LocalEphemeris, LocalStorage,
    RecommendationPipeline,
};
use alchm_kitchen::utils::validation::Validate;
use chrono::{TimeZone, Utc};
use httpmock::prelude::*;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

const INGREDIENTS: &str = "name,category,fire,water,earth,air,affinities
chili pepper,spice,0.8,0.05,0.05,0.1,aries:0.9
garlic,allium,0.6,0.1,0.2,0.1,aries:0.5;scorpio:0.4
seaweed broth,soup,0.05,0.8,0.1,0.05,cancer:0.7
oats,grain,0.1,0.1,0.7,0.1,virgo:0.9
";

const RECIPES: &str = r#"{
    "recipes": [
        {"id": "chili-stew", "name": "Chili Stew", "cuisine": "mexican",
         "ingredients": ["chili pepper", "garlic", "seaweed broth"],
         "elemental_properties": {"Fire": 0.6, "Water": 0.3, "Earth": 0.05, "Air": 0.05},
         "calories": 450},
        {"id": "porridge", "name": "Porridge", "cuisine": "scottish", "ingredients": ["oats"]},
        {"id": "plain-rice", "name": "Plain Rice", "cuisine": "japanese", "ingredients": ["rice"]}
    ],
    "cuisines": [{"id": "mexican"}]
}"#;

fn write_catalog(dir: &Path) {
    std::fs::create_dir_all(dir.join("data")).unwrap();
    std::fs::write(dir.join("data/ingredients.csv"), INGREDIENTS).unwrap();
    std::fs::write(dir.join("data/recipes.json"), RECIPES).unwrap();
    std::fs::write(
        dir.join("data/history.json"),
        r#"[{"created_at": "2025-03-27T09:00:00Z", "spirit_score": 0.9, "matter_score": 0.2}]"#,
    )
    .unwrap();
}

fn config_for(dir: &Path, ephemeris_url: &str) -> KitchenConfig {
    let toml = format!(
        r#"
[service]
base_dir = "{base}"

[ephemeris]
primary_url = "{url}"
use_fallback = false

[catalog]
history_file = "data/history.json"

[output]
output_path = "reports"
bundle_name = "kitchen.zip"
formats = ["csv", "json"]

[natal]
birth = "1990-10-15T11:15:00Z"
"#,
        base = dir.display(),
        url = ephemeris_url
    );
    KitchenConfig::from_toml_str(&toml).unwrap()
}

fn chart_body() -> serde_json::Value {
    serde_json::json!({
        "_celestialBodies": {
            "sun": {"Sign": {"key": "aries"}, "ChartPosition": {"Ecliptic": {"DecimalDegrees": 8.5}}, "isRetrograde": false},
            "moon": {"Sign": {"key": "aries"}, "ChartPosition": {"Ecliptic": {"DecimalDegrees": 1.57}}, "isRetrograde": false},
            "mars": {"Sign": {"key": "cancer"}, "ChartPosition": {"Ecliptic": {"DecimalDegrees": 112.63}}, "isRetrograde": false},
            "saturn": {"Sign": {"key": "pisces"}, "ChartPosition": {"Ecliptic": {"DecimalDegrees": 354.12}}, "isRetrograde": false}
        }
    })
}

fn read_entry(archive: &mut zip::ZipArchive<std::io::Cursor<Vec<u8>>>, name: &str) -> String {
    let mut content = String::new();
    archive
        .by_name(name)
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    content
}

#[tokio::test]
async fn test_end_to_end_recommendations_with_remote_ephemeris() {
    let temp_dir = TempDir::new().unwrap();
    write_catalog(temp_dir.path());

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/api/astrologize");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(chart_body());
    });

    let config = config_for(temp_dir.path(), &server.url("/api/astrologize"));
    assert!(config.validate().is_ok());

    let storage = LocalStorage::new(config.service.base_dir.clone());
    let source: Arc<dyn EphemerisSource> =
        Arc::new(AstrologizeClient::new(config.ephemeris_settings()).unwrap());
    let moment = Utc.with_ymd_and_hms(2025, 3, 28, 18, 0, 0).unwrap();
    let pipeline = RecommendationPipeline::new(storage, config, source, moment);

    let output_path = KitchenEngine::new(pipeline).run().await.unwrap();
    assert_eq!(output_path, "reports/kitchen.zip");
    // current sky and natal chart
    api_mock.assert_hits(2);

    let full_path = temp_dir.path().join("reports/kitchen.zip");
    assert!(full_path.exists());

    let zip_data = std::fs::read(&full_path).unwrap();
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data)).unwrap();
    assert_eq!(archive.len(), 3);

    let csv = read_entry(&mut archive, "recommendations.csv");
    let mut lines = csv.lines();
    assert!(lines.next().unwrap().starts_with("rank,recipe_id"));
    assert!(lines.next().unwrap().starts_with("1,chili-stew,Chili Stew"));

    let recs: serde_json::Value =
        serde_json::from_str(&read_entry(&mut archive, "recommendations.json")).unwrap();
    let recs = recs.as_array().unwrap();
    // only recipes with a chart-sign affinity are listed
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0]["recipe_id"], "chili-stew");
    assert_eq!(recs[0]["is_environmental_match"], true);
    // chili pepper is a fire keyword in Aries season
    assert_eq!(recs[0]["matching_ingredients"][0]["seasonal_modifier"], 1.2);

    let context: serde_json::Value =
        serde_json::from_str(&read_entry(&mut archive, "context.json")).unwrap();
    assert_eq!(context["state"]["source"], "remote");
    assert_eq!(context["state"]["sun_sign"], "aries");
    assert_eq!(context["seasonal"]["sign"], "aries");
    assert_eq!(
        context["wellness"]["recommendation"]["type"],
        "Alchemical Axis Grounding"
    );
    assert!(context.get("recommendations").is_none());
}

#[tokio::test]
async fn test_end_to_end_offline() {
    let temp_dir = TempDir::new().unwrap();
    write_catalog(temp_dir.path());

    let mut config = config_for(temp_dir.path(), "https://unused.example.com");
    config.ephemeris.offline = true;
    config.output.formats = vec!["json".to_string()];
    config.scoring.window_days = 3;

    let storage = LocalStorage::new(config.service.base_dir.clone());
    let moment = Utc.with_ymd_and_hms(2025, 3, 28, 18, 0, 0).unwrap();
    let pipeline = RecommendationPipeline::new(storage, config, Arc::new(LocalEphemeris), moment);

    let output_path = KitchenEngine::new(pipeline).run().await.unwrap();
    let zip_data = std::fs::read(temp_dir.path().join(&output_path)).unwrap();
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data)).unwrap();
    assert!(archive.by_name("recommendations.csv").is_err());

    let context: serde_json::Value =
        serde_json::from_str(&read_entry(&mut archive, "context.json")).unwrap();
    assert_eq!(context["state"]["source"], "local");
    assert_eq!(context["cooking_windows"].as_array().unwrap().len(), 3);
    assert_eq!(context["chakras"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn test_missing_catalog_surfaces_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = config_for(temp_dir.path(), "https://unused.example.com");
    config.ephemeris.offline = true;

    let storage = LocalStorage::new(config.service.base_dir.clone());
    let pipeline = RecommendationPipeline::new(storage, config, Arc::new(LocalEphemeris), Utc::now());
    let err = KitchenEngine::new(pipeline).run().await.unwrap_err();
    assert_eq!(
        err.severity(),
        alchm_kitchen::utils::error::ErrorSeverity::Critical
    );
}

#[tokio::test]
async fn test_cooking_plan_from_catalog_files() {
    use alchm_kitchen::adapters::catalog::load_catalog;
    use alchm_kitchen::core::recommend::{personalized_plan, PLAN_LIMIT};
    use alchm_kitchen::domain::model::{Season, ZodiacSign};

    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("ingredients.csv"),
        "name,category,fire,water,earth,air,affinities,seasonal
pumpkin,vegetable,0.1,0.2,0.6,0.1,virgo:0.8,autumn:0.9
oats,grain,0.1,0.1,0.7,0.1,virgo:0.9,winter:0.5
",
    )
    .unwrap();
    std::fs::write(
        temp_dir.path().join("recipes.json"),
        r#"{"recipes": [
            {"id": "pie", "name": "Pumpkin Pie", "cuisine": "american", "ingredients": ["pumpkin"]},
            {"id": "porridge", "name": "Porridge", "cuisine": "scottish", "ingredients": ["oats"]}
        ]}"#,
    )
    .unwrap();

    let storage = LocalStorage::new(temp_dir.path().to_string_lossy().to_string());
    let catalog = load_catalog(&storage, "ingredients.csv", "recipes.json")
        .await
        .unwrap();
    let plan = personalized_plan(
        &catalog,
        Some(ZodiacSign::Virgo),
        Some(Season::Autumn),
        None,
        PLAN_LIMIT,
    );

    let ids: Vec<&str> = plan
        .recommendations
        .iter()
        .map(|e| e.recipe.recipe_id.as_str())
        .collect();
    // porridge leads on virgo affinity; winter oats never count for autumn
    assert_eq!(ids, vec!["porridge", "pie"]);
    assert_eq!(plan.insights.len(), 3);
}
