use crate::domain::model::{Catalog, CuisineProfile, MealType, Season, ZodiacSign};
use crate::utils::error::Result;
use serde::Serialize;

pub const DEFAULT_CUISINE_LIMIT: usize = 3;
const NESTED_RECIPE_LIMIT: usize = 3;
const ZODIAC_AFFINITY_FLOOR: f64 = 0.5;
const SEASONAL_STRENGTH_FLOOR: f64 = 0.6;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CuisineScore {
    pub cuisine_id: String,
    pub zodiac_score: f64,
    pub seasonal_score: f64,
    pub score: f64,
}

fn strongest(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(0.0, f64::max)
}

fn score_cuisine(cuisine: &CuisineProfile, sign: ZodiacSign, season: Season) -> CuisineScore {
    let zodiac_score = strongest(
        cuisine
            .zodiac_affinities
            .iter()
            .filter(|a| a.sign == sign && a.strength > ZODIAC_AFFINITY_FLOOR)
            .map(|a| a.strength),
    );
    let seasonal_score = strongest(
        cuisine
            .seasonal_strengths
            .iter()
            .filter(|s| s.season == season && s.strength > SEASONAL_STRENGTH_FLOOR)
            .map(|s| s.strength),
    );
    CuisineScore {
        cuisine_id: cuisine.id.clone(),
        zodiac_score,
        seasonal_score,
        score: 0.4 * zodiac_score + 0.4 * seasonal_score + 0.2 * cuisine.base_weight,
    }
}

/// Astrological compatibility of every cuisine, in catalog order.
pub fn cuisine_scores(catalog: &Catalog, sign: ZodiacSign, season: Season) -> Vec<CuisineScore> {
    catalog
        .cuisines
        .iter()
        .map(|c| score_cuisine(c, sign, season))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NestedRecipe {
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CuisineRecommendation {
    pub cuisine_id: String,
    pub astrological_score: f64,
    pub compatibility_reason: String,
    pub recipes: Vec<NestedRecipe>,
}

pub fn recommend_cuisines(
    catalog: &Catalog,
    sign: ZodiacSign,
    season: Season,
    meal_type: Option<&str>,
    limit: usize,
) -> Result<Vec<CuisineRecommendation>> {
    let meal: Option<MealType> = meal_type.map(str::parse).transpose()?;

    let mut scores = cuisine_scores(catalog, sign, season);
    scores.sort_by(|a, b| b.score.total_cmp(&a.score));
    scores.truncate(limit);

    let recommendations = scores
        .into_iter()
        .map(|score| {
            let recipes = catalog
                .recipes_for_cuisine(&score.cuisine_id)
                .filter(|r| match meal {
                    Some(m) => r.meal_types.is_empty() || r.meal_types.contains(&m),
                    None => true,
                })
                .take(NESTED_RECIPE_LIMIT)
                .map(|r| NestedRecipe {
                    id: r.id.clone(),
                    name: r.name.clone(),
                    description: r.description.clone(),
                })
                .collect();
            CuisineRecommendation {
                compatibility_reason: format!(
                    "Harmonizes with {} energy and {} seasonal flow",
                    sign.title(),
                    season
                ),
                cuisine_id: score.cuisine_id,
                astrological_score: score.score,
                recipes,
            }
        })
        .collect();
    Ok(recommendations)
}
