use crate::core::report::KitchenReport;
use crate::domain::model::{
    ChartQuery, GeoLocation, KitchenInput, PlanetarySnapshot, ZodiacSystem,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn output_path(&self) -> &str;
    fn bundle_name(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn location(&self) -> GeoLocation;
    fn zodiac_system(&self) -> ZodiacSystem;
    fn ingredients_file(&self) -> &str;
    fn recipes_file(&self) -> &str;
    fn history_file(&self) -> Option<&str>;
    fn natal_query(&self) -> Option<ChartQuery>;
    fn participant_queries(&self) -> Vec<ChartQuery>;
    fn include_lunar(&self) -> bool;
    fn recommendation_limit(&self) -> usize;
    fn window_days(&self) -> u32;
}

/// Anything that can place the planets for a moment and place.
#[async_trait]
pub trait EphemerisSource: Send + Sync {
    fn name(&self) -> &str;
    async fn positions(&self, query: &ChartQuery) -> Result<PlanetarySnapshot>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    fn moment(&self) -> DateTime<Utc>;
    async fn extract(&self) -> Result<KitchenInput>;
    async fn transform(&self, input: KitchenInput) -> Result<KitchenReport>;
    async fn load(&self, report: KitchenReport) -> Result<String>;
}
