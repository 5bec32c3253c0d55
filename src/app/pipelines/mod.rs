pub mod recommendation_pipeline;

pub use recommendation_pipeline::RecommendationPipeline;
