//! # Policy Queries
//!
//! Catalog, configuration, dimension, bridge, display-code and permit
//! condition queries through the [`Policy`] facade.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use permit_core::fixtures::{sample_policy, ApplicationBuilder};
use permit_core::AxleConfiguration;
use permit_engine::{Policy, PolicyError, SpecialAuthorizations};

fn engine() -> Policy {
    Policy::new(sample_policy().expect("sample policy"), None).expect("engine")
}

fn ids<'a>(keys: impl IntoIterator<Item = &'a String>) -> Vec<&'a str> {
    keys.into_iter().map(String::as_str).collect()
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn spaced(axles: &[u32], spacing: f64) -> Vec<AxleConfiguration> {
    axles
        .iter()
        .map(|&n| AxleConfiguration::new(n, 5000.0).with_spacing_to_next(spacing))
        .collect()
}

// =========================================================================
// Catalog
// =========================================================================

#[test]
fn permit_types_and_commodities() {
    let policy = engine();
    let types = policy.permit_types();
    assert_eq!(ids(types.keys()), vec!["STOS", "STOW", "STWS", "TROS", "TROW"]);
    assert_eq!(types["TROS"], "Term Oversize");

    assert_eq!(ids(policy.commodities(None).unwrap().keys()), vec!["EMPTYXX", "IMCONTN"]);
    assert_eq!(ids(policy.commodities(Some("STWS")).unwrap().keys()), vec!["EMPTYXX"]);
    assert!(policy.commodities(Some("TROS")).unwrap().is_empty());
    assert_eq!(
        policy.commodities(Some("XXXX")).unwrap_err(),
        PolicyError::UnknownPermitType("XXXX".into())
    );
}

#[test]
fn commodity_driven_vehicle_catalog() {
    let vehicles = engine().permittable_vehicle_types("STOS", Some("EMPTYXX")).unwrap();
    assert_eq!(ids(vehicles.power_units.keys()), vec!["BOOMTRK", "TRKTRAC"]);
    assert_eq!(
        ids(vehicles.trailers.keys()),
        vec!["BOOMAXL", "BOOSTER", "FLOATTR", "JEEPSRT", "NONEXXX", "SEMITRL"]
    );
}

#[test]
fn allow_list_vehicle_catalog() {
    let vehicles = engine().permittable_vehicle_types("TROS", None).unwrap();
    assert_eq!(ids(vehicles.power_units.keys()), vec!["TRKSTRD", "TRKTRAC"]);
    assert_eq!(
        ids(vehicles.trailers.keys()),
        vec!["FLOATTR", "NONEXXX", "POLETRL", "SEMITRL"]
    );
}

#[test]
fn lcv_power_units_need_authorization() {
    let mut policy = engine();
    let power_units = policy.permittable_power_unit_types("TROW", None).unwrap();
    assert!(!power_units.contains_key("LCVRMDB"));

    policy.set_special_authorizations(Some(SpecialAuthorizations::lcv_allowed()));
    let power_units = policy.permittable_power_unit_types("TROW", None).unwrap();
    assert_eq!(ids(power_units.keys()), vec!["LCVRMDB", "TRKSTRD", "TRKTRAC"]);
}

#[test]
fn unknown_commodity_is_an_error() {
    assert_eq!(
        engine().permittable_vehicle_types("STOS", Some("NOSUCHX")).unwrap_err(),
        PolicyError::UnknownCommodity("NOSUCHX".into())
    );
}

// =========================================================================
// Configuration
// =========================================================================

#[test]
fn complete_and_partial_configurations() {
    let policy = engine();
    let valid = |seq: &[&str], partial: bool| {
        policy
            .is_configuration_valid("STOS", "EMPTYXX", seq, partial)
            .unwrap()
    };
    assert!(valid(&["TRKTRAC", "JEEPSRT", "FLOATTR", "BOOSTER"], false));
    assert!(valid(&["TRKTRAC", "NONEXXX"], false));
    assert!(valid(&["BOOMTRK", "BOOMAXL", "NONEXXX"], false));
    assert!(!valid(&["TRKTRAC", "FLOATTR", "JEEPSRT"], false));
    assert!(!valid(&["TRKTRAC", "SEMITRL", "BOOSTER"], false));

    assert!(valid(&["TRKTRAC", "JEEPSRT"], true));
    assert!(!valid(&["TRKTRAC", "JEEPSRT"], false));
    assert!(!valid(&[], false));
}

#[test]
fn configuration_is_order_sensitive() {
    let policy = engine();
    let valid = |seq: &[&str]| policy.is_configuration_valid("STOS", "EMPTYXX", seq, false).unwrap();
    assert!(valid(&["TRKTRAC", "JEEPSRT", "FLOATTR"]));
    assert!(!valid(&["JEEPSRT", "TRKTRAC", "FLOATTR"]));
    assert!(!valid(&["TRKTRAC", "FLOATTR", "JEEPSRT"]));
}

#[test]
fn configuration_queries_need_a_commodity_permit_type() {
    let err = engine()
        .is_configuration_valid("TROS", "EMPTYXX", &["TRKTRAC"], false)
        .unwrap_err();
    assert_eq!(err, PolicyError::CommodityNotRequired("TROS".into()));
}

#[test]
fn next_permittable_vehicles() {
    let policy = engine();
    let next = |seq: &[&str]| policy.next_permittable_vehicles("STOS", "EMPTYXX", seq).unwrap();
    assert_eq!(next(&["TRKTRAC"]), set(&["FLOATTR", "JEEPSRT", "NONEXXX", "SEMITRL"]));
    assert_eq!(next(&["TRKTRAC", "JEEPSRT"]), set(&["FLOATTR", "JEEPSRT"]));
    assert_eq!(next(&["TRKTRAC", "FLOATTR"]), set(&["BOOSTER"]));
    assert!(next(&["BOOMTRK"]).contains("BOOMAXL"));
    assert!(next(&["TRKTRAC", "SEMITRL"]).is_empty());
    assert!(next(&["JEEPSRT"]).is_empty());
}

#[test]
fn every_suggestion_extends_a_valid_prefix() {
    let policy = engine();
    let mut frontier: Vec<Vec<String>> = vec![vec!["TRKTRAC".into()], vec!["BOOMTRK".into()]];
    for _ in 0..4 {
        let mut deeper = Vec::new();
        for prefix in &frontier {
            for vehicle in policy.next_permittable_vehicles("STOS", "EMPTYXX", prefix.as_slice()).unwrap() {
                let mut extended = prefix.clone();
                extended.push(vehicle);
                assert!(
                    policy
                        .is_configuration_valid("STOS", "EMPTYXX", extended.as_slice(), true)
                        .unwrap(),
                    "{extended:?}"
                );
                deeper.push(extended);
            }
        }
        frontier = deeper;
    }
}

// =========================================================================
// Size
// =========================================================================

#[test]
fn size_narrows_across_all_regions() {
    let size = engine()
        .size_dimension("STOS", "EMPTYXX", &["TRKTRAC", "FLOATTR"], None)
        .unwrap()
        .expect("size");
    assert_eq!(size.w, Some(3.5));
    assert_eq!(size.h, Some(4.2));
    assert_eq!(size.l, Some(23.0));
    assert_eq!(size.rp, Some(5.0));
    assert_eq!(size.fp, Some(3.0));
    assert!(size.regions.is_empty());
}

#[test]
fn size_for_a_single_region() {
    let size = engine()
        .size_dimension("STOS", "EMPTYXX", &["TRKTRAC", "FLOATTR"], Some(&["KTN"][..]))
        .unwrap()
        .expect("size");
    assert_eq!(size.w, Some(3.8));
    assert_eq!(size.h, Some(4.3));
    assert_eq!(size.l, Some(25.0));
    assert_eq!(size.rp, Some(6.5));
}

#[test]
fn size_modifiers_follow_accessories() {
    let policy = engine();
    let jeep = policy
        .size_dimension("STOS", "EMPTYXX", &["TRKTRAC", "JEEPSRT", "FLOATTR"], None)
        .unwrap()
        .expect("size");
    assert_eq!((jeep.w, jeep.h, jeep.l), (Some(3.5), Some(4.3), Some(31.0)));

    let booster = policy
        .size_dimension("STOS", "EMPTYXX", &["TRKTRAC", "FLOATTR", "BOOSTER"], None)
        .unwrap()
        .expect("size");
    assert_eq!((booster.w, booster.h, booster.l), (Some(3.8), Some(4.4), Some(27.5)));
}

#[test]
fn size_absent_or_rejected() {
    let policy = engine();
    assert_eq!(
        policy
            .size_dimension("STOS", "IMCONTN", &["TRKTRAC", "SEMITRL"], None)
            .unwrap(),
        None
    );
    assert!(matches!(
        policy.size_dimension("STOS", "EMPTYXX", &["TRKTRAC", "FLOATTR", "JEEPSRT"], None),
        Err(PolicyError::InvalidConfiguration(_))
    ));
    assert_eq!(policy.global_size_defaults().and_then(|d| d.l), Some(31.0));
}

// =========================================================================
// Weight
// =========================================================================

#[test]
fn trailer_weight_depends_on_neighbours() {
    let policy = engine();
    let candidates = policy.default_trailer_weight("FLOATTR", 3).unwrap();
    assert_eq!(candidates.len(), 3);

    let behind_jeep = policy
        .select_weight_dimension(
            &candidates,
            &["TRKTRAC", "JEEPSRT", "FLOATTR"],
            &spaced(&[1, 2, 2, 3], 400.0),
            3,
        )
        .expect("weight");
    assert_eq!((behind_jeep.legal, behind_jeep.permittable), (21000.0, 25000.0));

    let tridem_drive = policy
        .select_weight_dimension(&candidates, &["TRKTRAC", "FLOATTR"], &spaced(&[1, 3, 3], 400.0), 2)
        .expect("weight");
    assert_eq!((tridem_drive.legal, tridem_drive.permittable), (23000.0, 27000.0));

    let tandem_drive = policy
        .select_weight_dimension(&candidates, &["TRKTRAC", "FLOATTR"], &spaced(&[1, 2, 3], 400.0), 2)
        .expect("weight");
    assert_eq!((tandem_drive.legal, tandem_drive.permittable), (24000.0, 28000.0));
}

#[test]
fn power_unit_weight_by_axle_unit() {
    let policy = engine();
    let candidates = policy.default_power_unit_weight("TRKTRAC", 1, 2).unwrap();
    let axles = spaced(&[1, 2, 3], 400.0);
    let seq = ["TRKTRAC", "FLOATTR"];

    let steer = policy.select_weight_dimension(&candidates, &seq, &axles, 0).expect("steer");
    assert_eq!((steer.legal, steer.permittable), (6000.0, 9100.0));
    let drive = policy.select_weight_dimension(&candidates, &seq, &axles, 1).expect("drive");
    assert_eq!((drive.legal, drive.permittable), (17000.0, 23000.0));
    assert!(policy.select_weight_dimension(&candidates, &seq, &axles, 2).is_none());
}

#[test]
fn power_unit_weight_falls_back_through_tiers() {
    let policy = engine();
    let axles = spaced(&[1, 1], 400.0);
    let seq = ["TRKSTRD"];

    let category = policy.default_power_unit_weight("TRKSTRD", 1, 1).unwrap();
    let steer = policy.select_weight_dimension(&category, &seq, &axles, 0).expect("steer");
    assert_eq!((steer.legal, steer.permittable), (6000.0, 7300.0));

    let global = policy.default_power_unit_weight("TRKSTRD", 1, 3).unwrap();
    let steer = policy.select_weight_dimension(&global, &seq, &axles, 0).expect("steer");
    assert_eq!(steer.permittable, 5500.0);
    let drive = policy.select_weight_dimension(&global, &seq, &axles, 1).expect("drive");
    assert_eq!(drive.permittable, 24000.0);
}

#[test]
fn weight_for_unknown_vehicle_is_an_error() {
    assert_eq!(
        engine().default_trailer_weight("NOSUCHX", 2).unwrap_err(),
        PolicyError::UnknownVehicleType("NOSUCHX".into())
    );
}

// =========================================================================
// Bridge formula and display code
// =========================================================================

fn tractor_semi() -> Vec<AxleConfiguration> {
    vec![
        AxleConfiguration::new(1, 6700.0).with_spacing_to_next(350.0),
        AxleConfiguration::new(2, 12000.0)
            .with_spread(160.0)
            .with_spacing_to_next(700.0),
        AxleConfiguration::new(3, 22000.0).with_spread(220.0),
    ]
}

#[test]
fn bridge_formula_over_every_group() {
    let results = engine().calculate_bridge(&tractor_semi()).unwrap();
    let groups: Vec<_> = results
        .iter()
        .map(|r| (r.start_axle_unit, r.end_axle_unit))
        .collect();
    assert_eq!(groups, vec![(1, 2), (1, 3), (2, 3)]);
    assert_eq!(results[1].actual_weight, 40700.0);
    assert_eq!(results[1].max_bridge, 60900.0);
    assert!(results.iter().all(|r| r.success));
}

#[test]
fn bridge_rejects_incomplete_layouts() {
    let mut axles = tractor_semi();
    axles[0].spacing_to_next = None;
    assert!(matches!(
        engine().calculate_bridge(&axles),
        Err(PolicyError::InvalidAxleConfiguration(_))
    ));
}

#[test]
fn display_codes() {
    let policy = engine();
    assert_eq!(
        policy.vehicle_display_code(&["TRKTRAC", "SEMITRL"], &tractor_semi()),
        "1A12B2_3S3__"
    );
    assert_eq!(
        policy.vehicle_display_code(&["TRKTRAC", "POLETRL"], &tractor_semi()),
        "1U1-2U2_-3U3__"
    );
}

// =========================================================================
// Permit conditions
// =========================================================================

#[test]
fn conditions_follow_the_application() {
    let policy = engine();
    let day = NaiveDate::from_ymd_opt(2025, 2, 1).expect("date");

    let float = ApplicationBuilder::new("TROS")
        .vehicles(&["TRKTRAC", "FLOATTR"])
        .build();
    let conditions = policy.conditions_for_permit_on(&float, day).unwrap();
    let codes: Vec<_> = conditions.iter().map(|c| c.condition.as_str()).collect();
    assert_eq!(codes, vec!["CVSE-1000", "CVSE-1070"]);
    assert_eq!(
        conditions[1].condition_link.as_deref(),
        Some("https://example.org/permit-conditions/CVSE-1070.pdf")
    );

    let semi = ApplicationBuilder::new("TROS")
        .vehicles(&["TRKTRAC", "SEMITRL"])
        .build();
    let conditions = policy.conditions_for_permit_on(&semi, day).unwrap();
    assert_eq!(conditions.len(), 1);
    assert_eq!(conditions[0].description, "General Permit Conditions");
}
