use crate::adapters::catalog::{load_catalog, load_history};
use crate::core::engine::{compose_report, ReportOptions};
use crate::core::report::KitchenReport;
use crate::core::{ConfigProvider, EphemerisSource, KitchenInput, Pipeline, Storage};
use crate::domain::model::ChartQuery;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use std::io::Write;
use std::sync::Arc;
use zip::write::{FileOptions, ZipWriter};

/// Reads the sky and the catalog, scores recipes and zips the report.
pub struct RecommendationPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) ephemeris: Arc<dyn EphemerisSource>,
    pub(crate) moment: DateTime<Utc>,
}

impl<S: Storage, C: ConfigProvider> RecommendationPipeline<S, C> {
    pub fn new(
        storage: S,
        config: C,
        ephemeris: Arc<dyn EphemerisSource>,
        moment: DateTime<Utc>,
    ) -> Self {
        Self {
            storage,
            config,
            ephemeris,
            moment,
        }
    }

    fn options(&self) -> ReportOptions {
        ReportOptions {
            include_lunar: self.config.include_lunar(),
            window_days: self.config.window_days(),
            limit: self.config.recommendation_limit(),
        }
    }

    fn wants(&self, format: &str) -> bool {
        self.config.output_formats().iter().any(|f| f == format)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for RecommendationPipeline<S, C> {
    fn moment(&self) -> DateTime<Utc> {
        self.moment
    }

    async fn extract(&self) -> Result<KitchenInput> {
        let location = self.config.location();
        let query = ChartQuery::new(self.moment, location)
            .with_zodiac_system(self.config.zodiac_system());

        tracing::debug!(source = self.ephemeris.name(), "Fetching current sky");
        let snapshot = self.ephemeris.positions(&query).await?;

        let natal = match self.config.natal_query() {
            Some(natal_query) => Some(self.ephemeris.positions(&natal_query).await?),
            None => None,
        };

        let mut participants = Vec::new();
        for participant in self.config.participant_queries() {
            participants.push(self.ephemeris.positions(&participant).await?);
        }

        let catalog = load_catalog(
            &self.storage,
            self.config.ingredients_file(),
            self.config.recipes_file(),
        )
        .await?;
        let history = load_history(&self.storage, self.config.history_file()).await?;

        Ok(KitchenInput {
            moment: self.moment,
            location,
            snapshot,
            natal,
            participants,
            catalog,
            history,
        })
    }

    async fn transform(&self, input: KitchenInput) -> Result<KitchenReport> {
        Ok(compose_report(input, &self.options()))
    }

    async fn load(&self, report: KitchenReport) -> Result<String> {
        let output_path = format!("{}/{}", self.config.output_path(), self.config.bundle_name());

        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

            if self.wants("csv") {
                zip.start_file::<_, ()>("recommendations.csv", FileOptions::default())?;
                zip.write_all(&report.recommendations_csv()?)?;
            }

            if self.wants("json") {
                zip.start_file::<_, ()>("recommendations.json", FileOptions::default())?;
                zip.write_all(&report.recommendations_json()?)?;
            }

            zip.start_file::<_, ()>("context.json", FileOptions::default())?;
            zip.write_all(&report.context_json()?)?;

            let cursor = zip.finish()?;
            cursor.into_inner()
        };

        tracing::debug!(bytes = zip_data.len(), path = %output_path, "Writing report bundle");
        self.storage.write_file(&output_path, &zip_data).await?;

        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::KitchenEngine;
    use crate::core::ephemeris::LocalEphemeris;
    use crate::domain::model::{ChartQuery, GeoLocation, ZodiacSystem};
    use crate::utils::error::KitchenError;
    use chrono::TimeZone;
    use std::collections::HashMap;
    use std::io::Read;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn put(&self, path: &str, data: &str) {
            self.files
                .lock()
                .await
                .insert(path.to_string(), data.as_bytes().to_vec());
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                KitchenError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        formats: Vec<String>,
        natal: Option<ChartQuery>,
    }

    impl ConfigProvider for MockConfig {
        fn output_path(&self) -> &str {
            "out"
        }
        fn bundle_name(&self) -> &str {
            "report.zip"
        }
        fn output_formats(&self) -> &[String] {
            &self.formats
        }
        fn location(&self) -> GeoLocation {
            GeoLocation::default()
        }
        fn zodiac_system(&self) -> ZodiacSystem {
            ZodiacSystem::Tropical
        }
        fn ingredients_file(&self) -> &str {
            "ingredients.csv"
        }
        fn recipes_file(&self) -> &str {
            "recipes.json"
        }
        fn history_file(&self) -> Option<&str> {
            None
        }
        fn natal_query(&self) -> Option<ChartQuery> {
            self.natal
        }
        fn participant_queries(&self) -> Vec<ChartQuery> {
            Vec::new()
        }
        fn include_lunar(&self) -> bool {
            true
        }
        fn recommendation_limit(&self) -> usize {
            5
        }
        fn window_days(&self) -> u32 {
            1
        }
    }

    // Mar 28 2025: Sun, Moon, Mercury in Aries; Mars in Cancer
    const INGREDIENTS: &str = "name,category,fire,water,earth,air,affinities\n\
        chili pepper,spice,0.8,0.05,0.05,0.1,aries:0.9\n\
        seaweed broth,soup,0.05,0.8,0.1,0.05,cancer:0.7\n\
        oats,grain,0.1,0.1,0.7,0.1,virgo:0.9\n";

    const RECIPES: &str = r#"{
        "recipes": [
            {"id": "r1", "name": "Chili Stew", "cuisine": "mexican",
             "ingredients": ["chili pepper", "seaweed broth"],
             "elemental_properties": {"Fire": 0.6, "Water": 0.3, "Earth": 0.05, "Air": 0.05}},
            {"id": "r2", "name": "Porridge", "cuisine": "scottish", "ingredients": ["oats"]},
            {"id": "r3", "name": "Secret Chili", "cuisine": "mexican", "is_public": false,
             "ingredients": ["chili pepper"]}
        ]
    }"#;

    async fn pipeline(formats: &[&str], natal: bool) -> (RecommendationPipeline<MockStorage, MockConfig>, MockStorage) {
        let storage = MockStorage::new();
        storage.put("ingredients.csv", INGREDIENTS).await;
        storage.put("recipes.json", RECIPES).await;
        let natal = natal.then(|| {
            ChartQuery::new(
                Utc.with_ymd_and_hms(1990, 10, 15, 11, 15, 0).unwrap(),
                GeoLocation::default(),
            )
        });
        let config = MockConfig {
            formats: formats.iter().map(|f| f.to_string()).collect(),
            natal,
        };
        let moment = Utc.with_ymd_and_hms(2025, 3, 28, 18, 0, 0).unwrap();
        (
            RecommendationPipeline::new(storage.clone(), config, Arc::new(LocalEphemeris), moment),
            storage,
        )
    }

    #[tokio::test]
    async fn test_extract_reads_sky_and_catalog() {
        let (pipeline, _) = pipeline(&["csv"], true).await;
        let input = pipeline.extract().await.unwrap();
        assert_eq!(input.catalog.recipes.len(), 3);
        assert_eq!(input.catalog.ingredients.len(), 3);
        assert!(input.natal.is_some());
        assert!(input.history.is_empty());
        assert_eq!(input.snapshot.positions.len(), 13);
    }

    #[tokio::test]
    async fn test_transform_ranks_public_matches() {
        let (pipeline, _) = pipeline(&["csv"], false).await;
        let input = pipeline.extract().await.unwrap();
        let report = pipeline.transform(input).await.unwrap();

        let ids: Vec<&str> = report
            .recommendations
            .iter()
            .map(|r| r.recipe_id.as_str())
            .collect();
        assert_eq!(ids.first(), Some(&"r1"));
        assert!(!ids.contains(&"r3"));
        assert!(report.recommendations[0].is_environmental_match);
        assert!(report.dominant_transit.is_none());
    }

    #[tokio::test]
    async fn test_missing_catalog_fails_extract() {
        let storage = MockStorage::new();
        let config = MockConfig {
            formats: vec!["csv".to_string()],
            natal: None,
        };
        let pipeline = RecommendationPipeline::new(storage, config, Arc::new(LocalEphemeris), Utc::now());
        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, KitchenError::IoError(_)));
    }

    #[tokio::test]
    async fn test_engine_writes_bundle() {
        let (pipeline, storage) = pipeline(&["csv", "json"], true).await;
        let engine = KitchenEngine::new(pipeline);
        let path = engine.run().await.unwrap();
        assert_eq!(path, "out/report.zip");

        let bytes = storage.get_file("out/report.zip").await.unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
        let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
        names.sort();
        assert_eq!(
            names,
            vec!["context.json", "recommendations.csv", "recommendations.json"]
        );

        let mut csv = String::new();
        archive
            .by_name("recommendations.csv")
            .unwrap()
            .read_to_string(&mut csv)
            .unwrap();
        assert!(csv.starts_with("rank,recipe_id,name"));
        assert!(csv.contains("Chili Stew"));

        let mut context = String::new();
        archive
            .by_name("context.json")
            .unwrap()
            .read_to_string(&mut context)
            .unwrap();
        let context: serde_json::Value = serde_json::from_str(&context).unwrap();
        assert!(context.get("recommendations").is_none());
        assert!(context.get("planetary_hour").is_some());
    }

    #[tokio::test]
    async fn test_json_only_bundle() {
        let (pipeline, storage) = pipeline(&["json"], false).await;
        let input = pipeline.extract().await.unwrap();
        let report = pipeline.transform(input).await.unwrap();
        pipeline.load(report).await.unwrap();

        let bytes = storage.get_file("out/report.zip").await.unwrap();
        let archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
        assert!(archive.file_names().all(|n| n != "recommendations.csv"));
        assert_eq!(archive.len(), 2);
    }
}
