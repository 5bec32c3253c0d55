use crate::core::chakra::resonance;
use crate::core::collective::{collective_modifier, group_equilibrium, MemberChart};
use crate::core::lunar::{cooking_windows, lunar_phase, nakshatra_for};
use crate::core::menu::daily_menu;
use crate::core::planets::{planet_element, planetary_hour};
use crate::core::quantities::alchemize;
use crate::core::recommend::{environmental_recommendations, EnvironmentalContext};
use crate::core::report::KitchenReport;
use crate::core::seasonal::SeasonalContext;
use crate::core::transit::{dominant_transit, DEFAULT_ORB_DEG};
use crate::core::wellness::analyze_balance;
use crate::domain::model::{KitchenInput, Planet};
use crate::domain::ports::Pipeline;
use crate::utils::error::Result;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportOptions {
    pub include_lunar: bool,
    pub window_days: u32,
    pub limit: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            include_lunar: true,
            window_days: 1,
            limit: 10,
        }
    }
}

/// Runs every scoring stage over one moment's inputs.
pub fn compose_report(input: KitchenInput, options: &ReportOptions) -> KitchenReport {
    let KitchenInput {
        moment,
        location,
        snapshot,
        natal,
        participants,
        catalog,
        history,
    } = input;

    let state = alchemize(&snapshot);
    let hour = planetary_hour(moment, location);
    let lunar = options.include_lunar.then(|| lunar_phase(moment));
    let mansion = snapshot.longitude_of(Planet::Moon).map(|lon| *nakshatra_for(lon));
    let windows = cooking_windows(moment, options.window_days);
    let seasonal = SeasonalContext::for_date(moment.date_naive());
    let transit = natal
        .as_ref()
        .and_then(|chart| dominant_transit(chart, &snapshot, DEFAULT_ORB_DEG));

    let members: Vec<MemberChart> = natal
        .iter()
        .chain(participants.iter())
        .map(MemberChart::from_snapshot)
        .collect();
    let collective = group_equilibrium(&members);
    let modifier = match &collective {
        Some(group) if group.is_collective => {
            collective_modifier(group.harmonizing_profile, planet_element(hour.ruler))
        }
        _ => 1.0,
    };
    tracing::debug!(
        participants = members.len(),
        modifier,
        "Collective modifier resolved"
    );

    let chart_signs = snapshot.signs();
    let context = EnvironmentalContext {
        chart_signs: &chart_signs,
        state: &state,
        lunar: lunar.as_ref(),
        seasonal: &seasonal,
        windows: &windows,
        transit,
        hour_ruler: Some(hour.ruler),
        collective_modifier: modifier,
    };
    let mut recommendations = environmental_recommendations(&catalog, &context);
    recommendations.truncate(options.limit);

    let menu_chart = natal.as_ref().unwrap_or(&snapshot);
    let menu = daily_menu(
        menu_chart.sign_of(Planet::Sun),
        menu_chart.sign_of(Planet::Moon),
        menu_chart.sign_of(Planet::Ascendant),
    );

    KitchenReport {
        moment,
        location,
        chakras: resonance(&state.elemental_balance),
        wellness: analyze_balance(&history, moment),
        snapshot,
        state,
        planetary_hour: hour,
        lunar_phase: lunar,
        lunar_mansion: mansion,
        cooking_windows: windows,
        seasonal,
        dominant_transit: transit,
        collective,
        menu,
        recommendations,
    }
}

pub struct KitchenEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> KitchenEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!(moment = %self.pipeline.moment(), "Starting kitchen run");

        tracing::info!("Extracting sky and catalog");
        let input = self.pipeline.extract().await?;
        tracing::info!(
            source = ?input.snapshot.source,
            recipes = input.catalog.recipes.len(),
            ingredients = input.catalog.ingredients.len(),
            "Extracted inputs"
        );

        tracing::info!("Scoring recipes");
        let report = self.pipeline.transform(input).await?;
        tracing::info!(
            recommendations = report.recommendations.len(),
            hour_ruler = %report.planetary_hour.ruler,
            "Scored recipes"
        );

        tracing::info!("Writing report bundle");
        let output_path = self.pipeline.load(report).await?;
        tracing::info!(path = %output_path, "Report saved");

        Ok(output_path)
    }
}
