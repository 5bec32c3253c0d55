use crate::core::quantities::AlchemicalQuantities;
use crate::domain::model::ElementalProperties;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermodynamicMetrics {
    pub heat: f64,
    pub entropy: f64,
    pub reactivity: f64,
    pub harmony: f64,
    pub gregs_energy: f64,
    pub equilibrium: f64,
}

/// Thermodynamic reading of an elemental profile.
///
/// The profile is normalized first. Heat, entropy and reactivity feed the
/// energy and equilibrium terms unclamped; only the reported values are
/// clamped.
pub fn thermodynamics(profile: &ElementalProperties) -> ThermodynamicMetrics {
    let p = profile.normalized();
    let (f, w, e, a) = (p.fire, p.water, p.earth, p.air);

    let heat = 0.8 * f + 0.3 * a - 0.2 * w;
    let entropy = 0.7 * a + 0.5 * w - 0.4 * e - 0.3 * f;
    let reactivity = 0.9 * f + 0.6 * a - 0.3 * w - 0.5 * e;
    let harmony = 1.0 - p.iter().map(|(_, x)| (0.25 - x).abs()).sum::<f64>();

    let gregs_energy = harmony * 100.0 * (1.0 + 0.1 * heat - 0.1 * entropy + 0.05 * reactivity);
    let equilibrium = 1.0 - (heat.abs() + entropy.abs() + reactivity.abs()) / 3.0;

    ThermodynamicMetrics {
        heat: heat.clamp(-1.0, 1.0),
        entropy: entropy.clamp(-1.0, 1.0),
        reactivity: reactivity.clamp(-1.0, 1.0),
        harmony,
        gregs_energy: gregs_energy.clamp(0.0, 200.0),
        equilibrium: equilibrium.clamp(0.0, 1.0),
    }
}

// x^x with 0^0 = 1
fn self_power(x: f64) -> f64 {
    if x <= 0.0 {
        1.0
    } else {
        x.powf(x)
    }
}

/// (S^S * E^E) / (M^M * Sub^Sub).
pub fn kalchm(q: &AlchemicalQuantities) -> f64 {
    let numerator = self_power(q.spirit) * self_power(q.essence);
    let denominator = self_power(q.matter) * self_power(q.substance);
    numerator / denominator
}

/// -(gregs / 100) / (reactivity * ln kalchm); 1.0 when that is undefined.
pub fn monica(metrics: &ThermodynamicMetrics, kalchm: f64) -> f64 {
    if kalchm <= 0.0 {
        return 1.0;
    }
    let denominator = metrics.reactivity * kalchm.ln();
    if denominator == 0.0 {
        return 1.0;
    }
    let value = -(metrics.gregs_energy / 100.0) / denominator;
    if value.is_finite() {
        value
    } else {
        1.0
    }
}
