use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::KitchenError;

/// The four classical elements, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Element {
    Fire,
    Water,
    Earth,
    Air,
}

impl Element {
    pub const ALL: [Element; 4] = [Element::Fire, Element::Water, Element::Earth, Element::Air];

    pub fn as_str(&self) -> &'static str {
        match self {
            Element::Fire => "Fire",
            Element::Water => "Water",
            Element::Earth => "Earth",
            Element::Air => "Air",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Element {
    type Err = KitchenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fire" => Ok(Element::Fire),
            "water" => Ok(Element::Water),
            "earth" => Ok(Element::Earth),
            "air" => Ok(Element::Air),
            _ => Err(KitchenError::invalid_input("element", s)),
        }
    }
}

/// Four-way elemental weighting attached to ingredients, recipes and sky states.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementalProperties {
    #[serde(rename = "Fire", default)]
    pub fire: f64,
    #[serde(rename = "Water", default)]
    pub water: f64,
    #[serde(rename = "Earth", default)]
    pub earth: f64,
    #[serde(rename = "Air", default)]
    pub air: f64,
}

impl ElementalProperties {
    pub const fn new(fire: f64, water: f64, earth: f64, air: f64) -> Self {
        Self {
            fire,
            water,
            earth,
            air,
        }
    }

    pub const fn balanced() -> Self {
        Self::new(0.25, 0.25, 0.25, 0.25)
    }

    pub fn get(&self, element: Element) -> f64 {
        match element {
            Element::Fire => self.fire,
            Element::Water => self.water,
            Element::Earth => self.earth,
            Element::Air => self.air,
        }
    }

    pub fn set(&mut self, element: Element, value: f64) {
        match element {
            Element::Fire => self.fire = value,
            Element::Water => self.water = value,
            Element::Earth => self.earth = value,
            Element::Air => self.air = value,
        }
    }

    pub fn total(&self) -> f64 {
        self.fire + self.water + self.earth + self.air
    }

    /// Negative weights clamp to zero; an all-zero profile becomes balanced.
    pub fn normalized(&self) -> Self {
        let clamped = Self::new(
            self.fire.max(0.0),
            self.water.max(0.0),
            self.earth.max(0.0),
            self.air.max(0.0),
        );
        let total = clamped.total();
        if total <= 0.0 {
            return Self::balanced();
        }
        Self::new(
            clamped.fire / total,
            clamped.water / total,
            clamped.earth / total,
            clamped.air / total,
        )
    }

    /// Ties go to the earliest element in canonical order.
    pub fn dominant(&self) -> Element {
        let mut best = Element::Fire;
        for element in Element::ALL {
            if self.get(element) > self.get(best) {
                best = element;
            }
        }
        best
    }

    pub fn iter(&self) -> impl Iterator<Item = (Element, f64)> + '_ {
        Element::ALL.into_iter().map(move |e| (e, self.get(e)))
    }
}

impl Default for ElementalProperties {
    fn default() -> Self {
        Self::balanced()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    pub const ALL: [ZodiacSign; 12] = [
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 12]
    }

    pub fn element(&self) -> Element {
        match self {
            ZodiacSign::Aries | ZodiacSign::Leo | ZodiacSign::Sagittarius => Element::Fire,
            ZodiacSign::Taurus | ZodiacSign::Virgo | ZodiacSign::Capricorn => Element::Earth,
            ZodiacSign::Gemini | ZodiacSign::Libra | ZodiacSign::Aquarius => Element::Air,
            ZodiacSign::Cancer | ZodiacSign::Scorpio | ZodiacSign::Pisces => Element::Water,
        }
    }

    /// Traditional rulers.
    pub fn ruler(&self) -> Planet {
        match self {
            ZodiacSign::Aries | ZodiacSign::Scorpio => Planet::Mars,
            ZodiacSign::Taurus | ZodiacSign::Libra => Planet::Venus,
            ZodiacSign::Gemini | ZodiacSign::Virgo => Planet::Mercury,
            ZodiacSign::Cancer => Planet::Moon,
            ZodiacSign::Leo => Planet::Sun,
            ZodiacSign::Sagittarius | ZodiacSign::Pisces => Planet::Jupiter,
            ZodiacSign::Capricorn | ZodiacSign::Aquarius => Planet::Saturn,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ZodiacSign::Aries => "aries",
            ZodiacSign::Taurus => "taurus",
            ZodiacSign::Gemini => "gemini",
            ZodiacSign::Cancer => "cancer",
            ZodiacSign::Leo => "leo",
            ZodiacSign::Virgo => "virgo",
            ZodiacSign::Libra => "libra",
            ZodiacSign::Scorpio => "scorpio",
            ZodiacSign::Sagittarius => "sagittarius",
            ZodiacSign::Capricorn => "capricorn",
            ZodiacSign::Aquarius => "aquarius",
            ZodiacSign::Pisces => "pisces",
        }
    }

    /// Capitalized name for prose, e.g. "Sagittarius".
    pub fn title(&self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
            None => String::new(),
        }
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ZodiacSign {
    type Err = KitchenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ZodiacSign::ALL
            .into_iter()
            .find(|sign| sign.as_str() == wanted)
            .ok_or_else(|| KitchenError::invalid_input("zodiac_sign", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Planet {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    #[serde(rename = "North Node")]
    NorthNode,
    #[serde(rename = "South Node")]
    SouthNode,
    Ascendant,
}

impl Planet {
    pub const ALL: [Planet; 13] = [
        Planet::Sun,
        Planet::Moon,
        Planet::Mercury,
        Planet::Venus,
        Planet::Mars,
        Planet::Jupiter,
        Planet::Saturn,
        Planet::Uranus,
        Planet::Neptune,
        Planet::Pluto,
        Planet::NorthNode,
        Planet::SouthNode,
        Planet::Ascendant,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Planet::Sun => "Sun",
            Planet::Moon => "Moon",
            Planet::Mercury => "Mercury",
            Planet::Venus => "Venus",
            Planet::Mars => "Mars",
            Planet::Jupiter => "Jupiter",
            Planet::Saturn => "Saturn",
            Planet::Uranus => "Uranus",
            Planet::Neptune => "Neptune",
            Planet::Pluto => "Pluto",
            Planet::NorthNode => "North Node",
            Planet::SouthNode => "South Node",
            Planet::Ascendant => "Ascendant",
        }
    }
}

impl fmt::Display for Planet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Planet {
    type Err = KitchenError;

    /// Accepts "North Node", "northNode" and "north_node" alike.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let squashed: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        Planet::ALL
            .into_iter()
            .find(|planet| planet.name().replace(' ', "").to_ascii_lowercase() == squashed)
            .ok_or_else(|| KitchenError::invalid_input("planet", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ZodiacSystem {
    #[default]
    Tropical,
    Sidereal,
}

impl ZodiacSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZodiacSystem::Tropical => "tropical",
            ZodiacSystem::Sidereal => "sidereal",
        }
    }
}

impl FromStr for ZodiacSystem {
    type Err = KitchenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tropical" => Ok(ZodiacSystem::Tropical),
            "sidereal" => Ok(ZodiacSystem::Sidereal),
            _ => Err(KitchenError::invalid_input("zodiac_system", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionSource {
    Remote,
    Cache,
    Local,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanetaryPosition {
    pub sign: ZodiacSign,
    pub degree: u32,
    pub minute: u32,
    pub exact_longitude: f64,
    pub is_retrograde: bool,
}

impl PlanetaryPosition {
    pub fn from_longitude(longitude: f64, is_retrograde: bool) -> Self {
        let longitude = normalize_degrees(longitude);
        let sign_index = (longitude / 30.0).floor() as usize;
        let in_sign = longitude % 30.0;
        let degree = in_sign.floor();
        let minute = ((in_sign - degree) * 60.0).floor();
        Self {
            sign: ZodiacSign::from_index(sign_index),
            degree: degree as u32,
            minute: minute as u32,
            exact_longitude: longitude,
            is_retrograde,
        }
    }
}

/// Wraps any angle into [0, 360).
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for GeoLocation {
    fn default() -> Self {
        Self {
            latitude: 40.7498,
            longitude: -73.7976,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartQuery {
    pub moment: DateTime<Utc>,
    pub location: GeoLocation,
    pub zodiac_system: ZodiacSystem,
}

impl ChartQuery {
    pub fn new(moment: DateTime<Utc>, location: GeoLocation) -> Self {
        Self {
            moment,
            location,
            zodiac_system: ZodiacSystem::Tropical,
        }
    }

    pub fn with_zodiac_system(mut self, zodiac_system: ZodiacSystem) -> Self {
        self.zodiac_system = zodiac_system;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetarySnapshot {
    pub moment: DateTime<Utc>,
    pub zodiac_system: ZodiacSystem,
    pub source: PositionSource,
    pub positions: BTreeMap<Planet, PlanetaryPosition>,
}

impl PlanetarySnapshot {
    pub fn position(&self, planet: Planet) -> Option<&PlanetaryPosition> {
        self.positions.get(&planet)
    }

    pub fn sign_of(&self, planet: Planet) -> Option<ZodiacSign> {
        self.position(planet).map(|p| p.sign)
    }

    pub fn longitude_of(&self, planet: Planet) -> Option<f64> {
        self.position(planet).map(|p| p.exact_longitude)
    }

    /// Every sign occupied by at least one body.
    pub fn signs(&self) -> BTreeSet<ZodiacSign> {
        self.positions.values().map(|p| p.sign).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Autumn, Season::Winter];

    /// Northern-hemisphere meteorological seasons.
    pub fn for_date(date: NaiveDate) -> Self {
        match date.month() {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Autumn,
            _ => Season::Winter,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
            Season::Winter => "Winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Season {
    type Err = KitchenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "autumn" | "fall" => Ok(Season::Autumn),
            "winter" => Ok(Season::Winter),
            _ => Err(KitchenError::invalid_input("season", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Dessert,
}

impl FromStr for MealType {
    type Err = KitchenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            "dessert" => Ok(MealType::Dessert),
            _ => Err(KitchenError::invalid_input("meal_type", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZodiacAffinity {
    pub sign: ZodiacSign,
    pub strength: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeasonalStrength {
    pub season: Season,
    pub strength: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub category: String,
    pub elemental_properties: ElementalProperties,
    #[serde(default)]
    pub zodiac_affinities: Vec<ZodiacAffinity>,
    #[serde(default)]
    pub seasonal_associations: Vec<SeasonalStrength>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub cuisine: String,
    /// Free-form dish category, e.g. "Root Vegetables stew".
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub prep_time_minutes: Option<u32>,
    #[serde(default)]
    pub difficulty: Option<u8>,
    #[serde(default = "default_true")]
    pub is_public: bool,
    #[serde(default)]
    pub dietary_tags: Vec<String>,
    #[serde(default)]
    pub meal_types: Vec<MealType>,
    #[serde(default)]
    pub elemental_properties: Option<ElementalProperties>,
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub ingredients: Vec<String>,
}

fn default_base_weight() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuisineProfile {
    pub id: String,
    #[serde(default = "default_base_weight")]
    pub base_weight: f64,
    #[serde(default)]
    pub zodiac_affinities: Vec<ZodiacAffinity>,
    #[serde(default)]
    pub seasonal_strengths: Vec<SeasonalStrength>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub recipes: Vec<Recipe>,
    #[serde(default)]
    pub cuisines: Vec<CuisineProfile>,
}

impl Catalog {
    pub fn ingredient(&self, name: &str) -> Option<&Ingredient> {
        self.ingredients
            .iter()
            .find(|i| i.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn recipe(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    pub fn recipes_for_cuisine<'a>(
        &'a self,
        cuisine_id: &'a str,
    ) -> impl Iterator<Item = &'a Recipe> + 'a {
        self.recipes
            .iter()
            .filter(move |r| r.is_public && r.cuisine.eq_ignore_ascii_case(cuisine_id))
    }
}

/// One past cooking ritual, as recorded in the ritual history file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RitualEntry {
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub spirit_score: Option<f64>,
    #[serde(default)]
    pub matter_score: Option<f64>,
}

/// Everything the transform stage needs, gathered by extract.
#[derive(Debug, Clone)]
pub struct KitchenInput {
    pub moment: DateTime<Utc>,
    pub location: GeoLocation,
    pub snapshot: PlanetarySnapshot,
    pub natal: Option<PlanetarySnapshot>,
    pub participants: Vec<PlanetarySnapshot>,
    pub catalog: Catalog,
    pub history: Vec<RitualEntry>,
}
