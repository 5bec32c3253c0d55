use crate::domain::model::{
    Catalog, CuisineProfile, ElementalProperties, Ingredient, Recipe, RitualEntry,
    SeasonalStrength, ZodiacAffinity,
};
use crate::domain::ports::Storage;
use crate::utils::error::{KitchenError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Filesystem storage rooted at a base directory.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        let data = fs::read(full_path)?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct IngredientRow {
    name: String,
    category: String,
    fire: f64,
    water: f64,
    earth: f64,
    air: f64,
    #[serde(default)]
    affinities: String,
    #[serde(default)]
    seasonal: String,
}

/// Splits `key:0.8;other:0.6` into trimmed pairs. Blank input yields none.
fn parse_pairs<'a>(name: &str, column: &str, raw: &'a str) -> Result<Vec<(&'a str, f64)>> {
    raw.split(';')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, strength) = pair.split_once(':').ok_or_else(|| KitchenError::CatalogError {
                message: format!("{}: {} '{}' is not key:strength", name, column, pair),
            })?;
            let strength: f64 = strength.trim().parse().map_err(|_| KitchenError::CatalogError {
                message: format!("{}: {} strength '{}' is not a number", name, column, strength),
            })?;
            Ok((key.trim(), strength))
        })
        .collect()
}

/// Parses `aries:0.8;leo:0.6`.
fn parse_affinities(name: &str, raw: &str) -> Result<Vec<ZodiacAffinity>> {
    parse_pairs(name, "affinity", raw)?
        .into_iter()
        .map(|(sign, strength)| {
            Ok(ZodiacAffinity {
                sign: sign.parse()?,
                strength,
            })
        })
        .collect()
}

/// Parses `spring:0.9;autumn:0.7`.
fn parse_seasonal(name: &str, raw: &str) -> Result<Vec<SeasonalStrength>> {
    parse_pairs(name, "seasonal association", raw)?
        .into_iter()
        .map(|(season, strength)| {
            Ok(SeasonalStrength {
                season: season.parse()?,
                strength,
            })
        })
        .collect()
}

pub fn parse_ingredients(data: &[u8]) -> Result<Vec<Ingredient>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);
    let mut ingredients = Vec::new();
    for row in reader.deserialize::<IngredientRow>() {
        let row = row?;
        let zodiac_affinities = parse_affinities(&row.name, &row.affinities)?;
        let seasonal_associations = parse_seasonal(&row.name, &row.seasonal)?;
        ingredients.push(Ingredient {
            elemental_properties: ElementalProperties::new(row.fire, row.water, row.earth, row.air),
            name: row.name,
            category: row.category,
            zodiac_affinities,
            seasonal_associations,
        });
    }
    Ok(ingredients)
}

#[derive(Debug, Default, Deserialize)]
struct RecipeFile {
    #[serde(default)]
    recipes: Vec<Recipe>,
    #[serde(default)]
    cuisines: Vec<CuisineProfile>,
}

pub fn parse_history(data: &[u8]) -> Result<Vec<RitualEntry>> {
    Ok(serde_json::from_slice(data)?)
}

/// Reads the ingredient CSV and the recipe/cuisine JSON into one catalog.
pub async fn load_catalog<S: Storage>(
    storage: &S,
    ingredients_file: &str,
    recipes_file: &str,
) -> Result<Catalog> {
    let ingredients = parse_ingredients(&storage.read_file(ingredients_file).await?)?;
    let recipe_file: RecipeFile = serde_json::from_slice(&storage.read_file(recipes_file).await?)?;

    let mut seen = std::collections::HashSet::new();
    for recipe in &recipe_file.recipes {
        if !seen.insert(recipe.id.as_str()) {
            return Err(KitchenError::CatalogError {
                message: format!("duplicate recipe id '{}'", recipe.id),
            });
        }
    }

    tracing::debug!(
        ingredients = ingredients.len(),
        recipes = recipe_file.recipes.len(),
        cuisines = recipe_file.cuisines.len(),
        "Catalog loaded"
    );
    Ok(Catalog {
        ingredients,
        recipes: recipe_file.recipes,
        cuisines: recipe_file.cuisines,
    })
}

/// Missing history is an empty history.
pub async fn load_history<S: Storage>(storage: &S, path: Option<&str>) -> Result<Vec<RitualEntry>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    match storage.read_file(path).await {
        Ok(data) => parse_history(&data),
        Err(KitchenError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path, "No ritual history file");
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}
