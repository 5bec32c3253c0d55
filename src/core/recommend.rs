//! Recipe recommendations: by explicit request, and by the environment
//! (chart signs, moon, season, hour, transits and the people at the table).

use crate::core::elements::harmony;
use crate::core::lunar::{lunar_modifier, CookingWindow, LunarPhaseInfo};
use crate::core::quantities::{recipe_quantities, AlchemicalState, RecipeQuantities};
use crate::core::scoring::{score_profile, ProfileScore};
use crate::core::seasonal::{seasonal_modifier, SeasonalContext};
use crate::core::transit::{cooking_ritual, suggested_timestamp, total_potency, Potency};
use crate::domain::model::{
    Catalog, ElementalProperties, Ingredient, Planet, PlanetarySnapshot, Recipe, Season, ZodiacSign,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const DEFAULT_LIMIT: usize = 10;
pub const DISCOVERY_LIMIT: usize = 5;
pub const PLAN_LIMIT: usize = 3;
const ZODIAC_AFFINITY_THRESHOLD: f64 = 0.6;
const SEASONAL_STRENGTH_THRESHOLD: f64 = 0.7;
const ENVIRONMENTAL_LIMIT: usize = 10;
const ENVIRONMENTAL_MATCH_THRESHOLD: f64 = 1.0;

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub current_elements: Option<ElementalProperties>,
    #[serde(default)]
    pub cuisine_preferences: Vec<String>,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    #[serde(default)]
    pub max_prep_time: Option<u32>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl Default for RecommendationRequest {
    fn default() -> Self {
        Self {
            current_elements: None,
            cuisine_preferences: Vec::new(),
            dietary_restrictions: Vec::new(),
            max_prep_time: None,
            limit: DEFAULT_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeRecommendation {
    pub recipe_id: String,
    pub name: String,
    pub cuisine: String,
    pub prep_time_minutes: Option<u32>,
    pub difficulty: Option<u8>,
    pub elemental_score: f64,
    pub planetary_alignment: f64,
    pub score: f64,
    pub match_reasons: Vec<String>,
}

fn passes_filters(recipe: &Recipe, request: &RecommendationRequest) -> bool {
    if !recipe.is_public {
        return false;
    }
    if !request.cuisine_preferences.is_empty()
        && !request.cuisine_preferences.iter().any(|c| *c == recipe.cuisine)
    {
        return false;
    }
    if let Some(max) = request.max_prep_time {
        match recipe.prep_time_minutes {
            Some(prep) if prep <= max => {}
            _ => return false,
        }
    }
    request
        .dietary_restrictions
        .iter()
        .all(|tag| recipe.dietary_tags.contains(tag))
}

/// Filters the catalog by the request and ranks what is left.
pub fn recommend_recipes(catalog: &Catalog, request: &RecommendationRequest) -> Vec<RecipeRecommendation> {
    let mut ranked: Vec<RecipeRecommendation> = catalog
        .recipes
        .iter()
        .filter(|recipe| passes_filters(recipe, request))
        .map(|recipe| {
            let mut reasons = Vec::new();

            let mut elemental_score = 0.5;
            if let (Some(wanted), Some(profile)) = (&request.current_elements, &recipe.elemental_properties) {
                elemental_score = harmony(wanted, profile);
                reasons.push(format!("Elemental harmony score: {:.2}", elemental_score));
            }

            let mut planetary_score = 0.5;
            if request.cuisine_preferences.contains(&recipe.cuisine) {
                planetary_score += 0.2;
                reasons.push(format!("Preferred {} cuisine", recipe.cuisine));
            }

            let total = elemental_score * 0.6 + planetary_score * 0.4;
            RecipeRecommendation {
                recipe_id: recipe.id.clone(),
                name: recipe.name.clone(),
                cuisine: recipe.cuisine.clone(),
                prep_time_minutes: recipe.prep_time_minutes,
                difficulty: recipe.difficulty,
                elemental_score,
                planetary_alignment: planetary_score,
                score: (total * 1000.0).round() / 1000.0,
                match_reasons: reasons,
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(request.limit);
    ranked
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngredientMatch {
    pub ingredient: String,
    pub sign: ZodiacSign,
    pub base_affinity: f64,
    pub lunar_modifier: f64,
    pub seasonal_modifier: f64,
    pub weighted_environmental_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvironmentalRecommendation {
    pub recipe_id: String,
    pub name: String,
    pub cuisine: String,
    pub weighted_environmental_score: f64,
    pub matching_ingredients: Vec<IngredientMatch>,
    pub is_environmental_match: bool,
    pub environmental_match_details: Option<String>,
    pub optimal_cooking_window: Option<CookingWindow>,
    pub elemental_properties: Option<ElementalProperties>,
    pub quantities: RecipeQuantities,
    pub potency: Potency,
    pub collective_modifier: f64,
    pub profile_score: Option<ProfileScore>,
    pub ritual: String,
    pub suggested_timestamp: Option<String>,
}

/// What the environment looks like right now.
pub struct EnvironmentalContext<'a> {
    pub chart_signs: &'a BTreeSet<ZodiacSign>,
    pub state: &'a AlchemicalState,
    /// `None` when lunar data is left out of scoring.
    pub lunar: Option<&'a LunarPhaseInfo>,
    pub seasonal: &'a SeasonalContext,
    pub windows: &'a [CookingWindow],
    pub transit: Option<Planet>,
    pub hour_ruler: Option<Planet>,
    pub collective_modifier: f64,
}

fn find_window(windows: &[CookingWindow], matches: &[IngredientMatch]) -> Option<CookingWindow> {
    windows
        .iter()
        .find(|window| {
            let food = window.food_type.to_lowercase();
            matches
                .iter()
                .any(|m| m.ingredient.to_lowercase().contains(&food))
        })
        .cloned()
}

/// Scores every public recipe by how strongly its ingredients resonate
/// with the signs in the chart, then attaches potency and quantities to
/// the top ten.
pub fn environmental_recommendations(
    catalog: &Catalog,
    context: &EnvironmentalContext<'_>,
) -> Vec<EnvironmentalRecommendation> {
    let mut scored: Vec<(&Recipe, f64, Vec<IngredientMatch>)> = Vec::new();

    for recipe in catalog.recipes.iter().filter(|r| r.is_public) {
        let mut matches = Vec::new();
        for ingredient in recipe.ingredients.iter().filter_map(|name| catalog.ingredient(name)) {
            for affinity in &ingredient.zodiac_affinities {
                if !context.chart_signs.contains(&affinity.sign) {
                    continue;
                }
                let lunar = context
                    .lunar
                    .map(|info| lunar_modifier(info.phase, &ingredient.category))
                    .unwrap_or(1.0);
                let seasonal = seasonal_modifier(&ingredient.name, context.seasonal);
                matches.push(IngredientMatch {
                    ingredient: ingredient.name.clone(),
                    sign: affinity.sign,
                    base_affinity: affinity.strength,
                    lunar_modifier: lunar,
                    seasonal_modifier: seasonal,
                    weighted_environmental_score: affinity.strength * lunar * seasonal,
                });
            }
        }
        if !matches.is_empty() {
            let total = matches.iter().map(|m| m.weighted_environmental_score).sum();
            scored.push((recipe, total, matches));
        }
    }

    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(ENVIRONMENTAL_LIMIT);

    let sun_element = context.state.sun_sign.map(|s| s.element());
    scored
        .into_iter()
        .map(|(recipe, weighted, matches)| {
            let is_match = weighted > ENVIRONMENTAL_MATCH_THRESHOLD;
            let details = is_match.then(|| match context.lunar {
                Some(info) => format!(
                    "Aligns with current environmental energies! Current: {} + {} Season",
                    info.phase,
                    context.seasonal.sign.title()
                ),
                None => format!(
                    "Aligns with current environmental energies! Current: {} Season",
                    context.seasonal.sign.title()
                ),
            });

            let profile = recipe.elemental_properties.as_ref();
            let mut potency = total_potency(profile, context.transit, sun_element, context.hour_ruler);
            potency.total *= context.collective_modifier;
            let quantities = recipe_quantities(
                profile,
                recipe.calories,
                potency.kinetic,
                potency.thermo,
                context.hour_ruler,
            );

            EnvironmentalRecommendation {
                recipe_id: recipe.id.clone(),
                name: recipe.name.clone(),
                cuisine: recipe.cuisine.clone(),
                weighted_environmental_score: weighted,
                optimal_cooking_window: find_window(context.windows, &matches),
                matching_ingredients: matches,
                is_environmental_match: is_match,
                environmental_match_details: details,
                elemental_properties: recipe.elemental_properties,
                quantities,
                potency,
                collective_modifier: context.collective_modifier,
                profile_score: profile.map(|p| score_profile(p, context.state, context.hour_ruler)),
                ritual: cooking_ritual(recipe, context.transit),
                suggested_timestamp: suggested_timestamp(recipe, context.windows),
            }
        })
        .collect()
}

/// A public recipe found through its ingredients' sign or season ties.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscoveredRecipe {
    pub recipe_id: String,
    pub name: String,
    pub description: String,
    pub cuisine: String,
    /// Mean strength over the qualifying ingredients.
    pub score: f64,
    pub matching_ingredients: usize,
    pub reason: String,
}

fn discover(
    catalog: &Catalog,
    limit: usize,
    strength: impl Fn(&Ingredient) -> Option<f64>,
    reason: impl Fn(usize) -> String,
) -> Vec<DiscoveredRecipe> {
    let mut found: Vec<DiscoveredRecipe> = catalog
        .recipes
        .iter()
        .filter(|r| r.is_public)
        .filter_map(|recipe| {
            let strengths: Vec<f64> = recipe
                .ingredients
                .iter()
                .filter_map(|name| catalog.ingredient(name))
                .filter_map(&strength)
                .collect();
            if strengths.is_empty() {
                return None;
            }
            let count = strengths.len();
            Some(DiscoveredRecipe {
                recipe_id: recipe.id.clone(),
                name: recipe.name.clone(),
                description: recipe.description.clone(),
                cuisine: recipe.cuisine.clone(),
                score: strengths.iter().sum::<f64>() / count as f64,
                matching_ingredients: count,
                reason: reason(count),
            })
        })
        .collect();

    found.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then(b.matching_ingredients.cmp(&a.matching_ingredients))
    });
    found.truncate(limit);
    found
}

/// Recipes whose ingredients hold an affinity of at least 0.6 with `sign`.
pub fn zodiac_recipes(catalog: &Catalog, sign: ZodiacSign, limit: usize) -> Vec<DiscoveredRecipe> {
    discover(
        catalog,
        limit,
        |ingredient| {
            ingredient
                .zodiac_affinities
                .iter()
                .filter(|a| a.sign == sign && a.strength >= ZODIAC_AFFINITY_THRESHOLD)
                .map(|a| a.strength)
                .reduce(f64::max)
        },
        |count| format!("Contains {} ingredient(s) harmonious with {} energy", count, sign.title()),
    )
}

/// Recipes whose ingredients are associated with `season` at 0.7 or more.
pub fn seasonal_recipes(catalog: &Catalog, season: Season, limit: usize) -> Vec<DiscoveredRecipe> {
    discover(
        catalog,
        limit,
        |ingredient| {
            ingredient
                .seasonal_associations
                .iter()
                .filter(|s| s.season == season && s.strength >= SEASONAL_STRENGTH_THRESHOLD)
                .map(|s| s.strength)
                .reduce(f64::max)
        },
        |count| format!("Features {} seasonal ingredient(s) perfect for {}", count, season),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanSource {
    ZodiacHarmony,
    SeasonalOptimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanEntry {
    #[serde(rename = "type")]
    pub source: PlanSource,
    pub priority: &'static str,
    #[serde(flatten)]
    pub recipe: DiscoveredRecipe,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CookingPlan {
    pub zodiac_sign: Option<ZodiacSign>,
    pub season: Option<Season>,
    pub preferences: Option<String>,
    pub recommendations: Vec<PlanEntry>,
    pub insights: Vec<String>,
}

/// Merges sign and season discoveries, first occurrence wins, best score first.
pub fn personalized_plan(
    catalog: &Catalog,
    sign: Option<ZodiacSign>,
    season: Option<Season>,
    preferences: Option<String>,
    limit: usize,
) -> CookingPlan {
    let mut entries = Vec::new();
    let mut insights = Vec::new();

    if let Some(sign) = sign {
        entries.extend(zodiac_recipes(catalog, sign, limit).into_iter().map(|recipe| PlanEntry {
            source: PlanSource::ZodiacHarmony,
            priority: "high",
            recipe,
        }));
        insights.push(format!("Recipes harmonized with your {} energy patterns", sign.title()));
    }
    if let Some(season) = season {
        entries.extend(seasonal_recipes(catalog, season, limit).into_iter().map(|recipe| PlanEntry {
            source: PlanSource::SeasonalOptimal,
            priority: "high",
            recipe,
        }));
        insights.push(format!("Fresh, seasonal ingredients perfect for {}", season));
    }

    let mut seen = BTreeSet::new();
    entries.retain(|entry| seen.insert(entry.recipe.recipe_id.clone()));
    entries.sort_by(|a, b| b.recipe.score.total_cmp(&a.recipe.score));
    entries.truncate(limit);

    if let (Some(sign), Some(season)) = (sign, season) {
        insights.push(format!(
            "Your {} energy aligns beautifully with {} seasonal abundance",
            sign.title(),
            season
        ));
    }

    CookingPlan {
        zodiac_sign: sign,
        season,
        preferences,
        recommendations: entries,
        insights,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartSummary {
    pub sun_sign: Option<ZodiacSign>,
    pub moon_sign: Option<ZodiacSign>,
    pub ascendant: Option<ZodiacSign>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRecipes {
    pub chart: ChartSummary,
    pub recommendations: Vec<String>,
}

/// Names of the sun sign's zodiac recipes for a birth chart.
pub fn chart_recipes(catalog: &Catalog, chart: &PlanetarySnapshot) -> ChartRecipes {
    let summary = ChartSummary {
        sun_sign: chart.sign_of(Planet::Sun),
        moon_sign: chart.sign_of(Planet::Moon),
        ascendant: chart.sign_of(Planet::Ascendant),
    };
    let recommendations = summary
        .sun_sign
        .map(|sign| {
            zodiac_recipes(catalog, sign, DISCOVERY_LIMIT)
                .into_iter()
                .map(|r| r.name)
                .collect()
        })
        .unwrap_or_default();
    ChartRecipes {
        chart: summary,
        recommendations,
    }
}
