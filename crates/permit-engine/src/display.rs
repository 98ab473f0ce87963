//! # Vehicle Display Code
//!
//! Encodes a vehicle combination and its axle layout as a compact code.
//!
//! ## Standard encoding
//!
//! Used when every vehicle has a registered glyph (vehicles ignored for
//! axle calculation need none), the power unit has steer and drive glyphs,
//! no axle unit exceeds `maxStandardAxles`, and the axle configuration has
//! one unit per axle-bearing vehicle plus one. Each axle unit is written as
//!
//! ```text
//! <axles><glyph><index><padding × (axles - 1)>
//! ```
//!
//! where `index` is 1-based and carries `indexPrefix` from 9 upward. For a
//! tractor (`A`/`B`) and semi-trailer (`S`) on 1, 2 and 3 axles: `1A12B2_3S3__`.
//!
//! ## Universal encoding
//!
//! Used otherwise. Vehicle glyphs are ignored; consecutive units are joined
//! by a spacing glyph chosen from the spacing between them, and each unit is
//! written as `<axles>U<index><padding × (axles - 1)>`. A unit with at least
//! `universalThreshold` axles uses the compound form
//!
//! ```text
//! <threshold><overAxles>U<index><padding × (threshold - 1)><extraAxle × (axles - threshold - 1)><end>
//! ```

use permit_core::vehicle::VehicleDisplayCode;
use permit_core::{AxleConfiguration, DisplayCodeDefaults, PolicyDefinition};

/// Which encoding a display code uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayEncoding {
    /// Vehicle glyph notation.
    Standard,
    /// Axle-count and spacing notation.
    Universal,
}

/// The display code of `sequence` on `axle_config`, and its encoding.
pub fn vehicle_display_code<S: AsRef<str>>(
    policy: &PolicyDefinition,
    sequence: &[S],
    axle_config: &[AxleConfiguration],
) -> (String, DisplayEncoding) {
    match standard_code(policy, sequence, axle_config) {
        Some(code) => (code, DisplayEncoding::Standard),
        None => (
            universal_code(&policy.vehicle_display_code_defaults, axle_config),
            DisplayEncoding::Universal,
        ),
    }
}

/// The standard encoding, or `None` when it does not apply.
pub fn standard_code<S: AsRef<str>>(
    policy: &PolicyDefinition,
    sequence: &[S],
    axle_config: &[AxleConfiguration],
) -> Option<String> {
    let defaults = &policy.vehicle_display_code_defaults;
    let glyphs = unit_glyphs(policy, sequence)?;
    if glyphs.len() != axle_config.len() {
        tracing::debug!(
            axle_bearing_units = glyphs.len(),
            axle_units = axle_config.len(),
            "axle configuration does not match the combination"
        );
        return None;
    }
    if axle_config
        .iter()
        .any(|unit| unit.number_of_axles > defaults.max_standard_axles)
    {
        return None;
    }

    let mut code = String::new();
    for (i, (unit, glyph)) in axle_config.iter().zip(glyphs).enumerate() {
        let index = i + 1;
        code.push_str(&unit.number_of_axles.to_string());
        code.push_str(glyph);
        if index >= 9 {
            code.push_str(&defaults.index_prefix);
        }
        code.push_str(&index.to_string());
        code.push_str(&padding(defaults, unit.number_of_axles));
    }
    Some(code)
}

/// The universal encoding.
pub fn universal_code(defaults: &DisplayCodeDefaults, axle_config: &[AxleConfiguration]) -> String {
    let mut code = String::new();
    for (i, unit) in axle_config.iter().enumerate() {
        if i > 0 {
            code.push_str(spacing_glyph(defaults, axle_config[i - 1].spacing_to_next));
        }
        let index = i + 1;
        let axles = unit.number_of_axles;
        let threshold = defaults.universal_threshold;
        if axles >= threshold {
            code.push_str(&format!("{threshold}{}U{index}", defaults.over_axles));
            code.push_str(&padding(defaults, threshold));
            let extra = axles.saturating_sub(threshold).saturating_sub(1);
            code.push_str(&defaults.extra_axle.repeat(extra as usize));
            code.push_str(&defaults.end);
        } else {
            code.push_str(&format!("{axles}U{index}"));
            code.push_str(&padding(defaults, axles));
        }
    }
    code
}

/// One glyph per axle unit: steer and drive for the power unit, then one
/// per axle-bearing vehicle. `None` when any vehicle lacks its glyph.
fn unit_glyphs<'p, S: AsRef<str>>(
    policy: &'p PolicyDefinition,
    sequence: &[S],
) -> Option<Vec<&'p str>> {
    let (power_unit, rest) = sequence.split_first()?;
    let power_unit = policy.vehicle_types.find(power_unit.as_ref())?;
    let mut glyphs = match &power_unit.display_code {
        Some(VehicleDisplayCode::PowerUnit { steer, drive }) => vec![steer.as_str(), drive.as_str()],
        _ => return None,
    };
    for item in rest {
        let vehicle = policy.vehicle_types.find(item.as_ref())?;
        if vehicle.ignore_for_axle_calculation {
            continue;
        }
        match &vehicle.display_code {
            Some(VehicleDisplayCode::Single(glyph)) => glyphs.push(glyph.as_str()),
            _ => return None,
        }
    }
    Some(glyphs)
}

fn padding(defaults: &DisplayCodeDefaults, axles: u32) -> String {
    defaults.padding.repeat(axles.saturating_sub(1) as usize)
}

fn spacing_glyph(defaults: &DisplayCodeDefaults, spacing: Option<f64>) -> &str {
    match spacing {
        Some(s) if s < defaults.small_spacing_max => defaults.small_spacing.as_str(),
        Some(s) if s > defaults.large_spacing_min => defaults.large_spacing.as_str(),
        _ => defaults.default_spacing.as_str(),
    }
}
