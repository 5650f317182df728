//! End-to-end pipeline tests over a synthetic world dataset.
//!
//! The world: a square "Canada" boundary (100°W..90°W, 45°N..55°N) with a
//! north-south river along 95°W, four cities inside the boundary at known
//! distances from the river, one city outside it, and a second country
//! far away. The proximity threshold is the default 25 miles (~40.2 km);
//! at 50°N one degree of longitude is ~71 km, so the margins are wide.

use geo_types::{Geometry, LineString, Point, Polygon};
use riparia_core::{AttributeTable, AttributeValue, GeometryType, Layer, Workspace, CRS};
use riparia_pipeline::prelude::*;

fn props(pairs: &[(&str, AttributeValue)]) -> std::collections::HashMap<String, AttributeValue> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn square(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Polygon<f64> {
    Polygon::new(
        LineString::from(vec![
            (min_x, min_y),
            (max_x, min_y),
            (max_x, max_y),
            (min_x, max_y),
            (min_x, min_y),
        ]),
        vec![],
    )
}

fn country_layer(canada_features: usize) -> Layer {
    let mut country = Layer::new("Country", GeometryType::Polygon, Some(CRS::wgs84()));
    for _ in 0..canada_features {
        country.push(
            Geometry::Polygon(square(-100.0, 45.0, -90.0, 55.0)),
            props(&[("CNTRY_NAME", AttributeValue::String("Canada".into()))]),
        );
    }
    country.push(
        Geometry::Polygon(square(-20.0, 63.0, -10.0, 66.0)),
        props(&[("CNTRY_NAME", AttributeValue::String("Iceland".into()))]),
    );
    country
}

fn world() -> Workspace {
    let mut world = Workspace::create("/tmp", "World");

    let mut cities = Layer::new("Cities", GeometryType::Point, Some(CRS::wgs84()));
    for (name, lon, lat) in [
        ("Riverton", -95.0, 50.0),  // on the river
        ("Nearfield", -95.1, 50.0), // ~7 km from the river
        ("Brandon", -93.0, 50.0),   // ~143 km away
        ("Estevan", -98.0, 47.0),   // far away, southwest corner
        ("Chicago", -80.0, 50.0),   // outside the boundary
    ] {
        cities.push(
            Geometry::Point(Point::new(lon, lat)),
            props(&[("CITY_NAME", AttributeValue::String(name.into()))]),
        );
    }

    let mut rivers = Layer::new("Rivers", GeometryType::Polyline, Some(CRS::wgs84()));
    rivers.push(
        Geometry::LineString(LineString::from(vec![(-95.0, 48.0), (-95.0, 52.0)])),
        props(&[("NAME", AttributeValue::String("Red".into()))]),
    );
    rivers.push(
        // Entirely outside the boundary; clipped away
        Geometry::LineString(LineString::from(vec![(-85.0, 48.0), (-85.0, 52.0)])),
        props(&[("NAME", AttributeValue::String("Ottawa".into()))]),
    );

    let mut lakes = Layer::new("Lakes", GeometryType::Polygon, Some(CRS::wgs84()));
    lakes.push(
        // Straddles the eastern boundary edge
        Geometry::Polygon(square(-92.0, 49.0, -89.0, 51.0)),
        props(&[("NAME", AttributeValue::String("Winnipegosis".into()))]),
    );

    world.insert_layer(cities);
    world.insert_layer(country_layer(1));
    world.insert_layer(lakes);
    world.insert_layer(rivers);
    world
}

fn rank_table(max_rank: i64) -> AttributeTable {
    let mut table = AttributeTable::new(
        "canadianCitiesPop",
        vec!["Rank".to_string(), "Population".to_string()],
    );
    for rank in 1..=max_rank {
        table.push_row(vec![
            AttributeValue::Int(rank),
            AttributeValue::Int(1_000_000 - rank * 1_000),
        ]);
    }
    table
}

fn engine_for(world: Workspace, table: AttributeTable) -> MemoryEngine {
    let mut active = Workspace::create("/tmp", "canada.gdb");
    active.insert_table(table);
    MemoryEngine::new(world, active)
}

#[test]
fn full_run_produces_ranked_far_from_river_cities() {
    let mut engine = engine_for(world(), rank_table(3));
    let config = RunConfig::default();

    let summary = run(&mut engine, &config).expect("pipeline run failed");

    // Region extraction: the out-of-boundary city and river are gone.
    let ws = engine.workspace();
    assert_eq!(ws.layer("cities_canada").unwrap().len(), 4);
    assert_eq!(ws.layer("canada_boundary").unwrap().len(), 1);
    assert_eq!(ws.layer("rivers_canada").unwrap().len(), 1);
    assert_eq!(ws.layer("lakes_canada").unwrap().len(), 1);

    // Catalog covered exactly the four clipped layers.
    assert_eq!(summary.catalog.len(), 4);
    for entry in &summary.catalog {
        let projected = ws.layer(&entry.projected).unwrap();
        assert_eq!(projected.len(), entry.record_count);
        assert_eq!(projected.geometry_type(), entry.geometry_type);
        assert_eq!(projected.crs().unwrap().srid(), Some(102002));
    }

    // Proximity: Riverton and Nearfield are within 25 miles.
    assert_eq!(summary.proximity.near_count, 2);
    assert_eq!(ws.layer("cities25").unwrap().len(), 2);
    assert_eq!(ws.layer("cities_canada_Buffer").unwrap().len(), 4);
    assert_eq!(
        ws.layer("cities_canada_Buffer").unwrap().geometry_type(),
        GeometryType::Polygon
    );

    // Ranking: 4 - 2 near-river = 2 candidates; Brandon (object id 3)
    // matches rank 3, Estevan (id 4) has no table entry and is pruned.
    assert_eq!(summary.ranking.pre_join_count, 2);
    assert_eq!(summary.ranking.near_deleted, 2);
    assert_eq!(summary.ranking.join, JoinOutcome { matched: 1, unmatched: 1 });
    assert_eq!(summary.ranking.null_deleted, 1);
    assert_eq!(summary.ranking.final_count, 1);

    let ranked = ws.layer("CaCitiesRanked").unwrap();
    assert_eq!(ranked.len(), 1);
    let survivor = ranked.iter().next().unwrap();
    assert_eq!(
        survivor.get_property("CITY_NAME"),
        Some(&AttributeValue::String("Brandon".into()))
    );
    assert_eq!(survivor.get_property("Rank"), Some(&AttributeValue::Int(3)));
}

#[test]
fn final_layer_has_no_null_ranks_and_shrinks_monotonically() {
    let mut engine = engine_for(world(), rank_table(3));
    let config = RunConfig::default();
    run(&mut engine, &config).unwrap();

    let ws = engine.workspace();
    let ranked = ws.layer("CaCitiesRanked").unwrap();
    for feature in ranked.iter() {
        let rank = feature.get_property("Rank").expect("rank attribute missing");
        assert!(!rank.is_null(), "null rank survived pruning");
    }

    let projected_cities = ws.layer("cities_canada_Project").unwrap().len();
    assert!(ranked.len() <= projected_cities);
    assert!(ws.layer("cities25").unwrap().len() <= projected_cities);
}

#[test]
fn near_river_and_ranked_layers_partition_the_cities() {
    let mut engine = engine_for(world(), rank_table(10));
    let config = RunConfig::default();
    let summary = run(&mut engine, &config).unwrap();

    let ws = engine.workspace();
    let name_of = |layer: &str| -> Vec<String> {
        ws.layer(layer)
            .unwrap()
            .iter()
            .map(|f| f.get_property("CITY_NAME").unwrap().to_string())
            .collect()
    };

    let near = name_of("cities25");
    let ranked = name_of("CaCitiesRanked");
    assert!(near.iter().all(|n| !ranked.contains(n)), "partition overlap");

    // With enough table rows every survivor keeps its rank.
    assert_eq!(summary.ranking.pre_join_count, ranked.len());
    assert_eq!(
        near.len() + summary.ranking.pre_join_count,
        ws.layer("cities_canada_Project").unwrap().len()
    );
}

#[test]
fn workspace_holds_the_full_persisted_layout() {
    let mut engine = engine_for(world(), rank_table(3));
    run(&mut engine, &RunConfig::default()).unwrap();

    let names = engine.list_layers();
    for expected in [
        "cities_canada",
        "canada_boundary",
        "lakes_canada",
        "rivers_canada",
        "cities_canada_Project",
        "canada_boundary_Project",
        "lakes_canada_Project",
        "rivers_canada_Project",
        "cities_canada_Buffer",
        "cities25",
        "CaCitiesRanked",
    ] {
        assert!(names.iter().any(|n| n == expected), "missing {}", expected);
    }
}

#[test]
fn duplicate_boundary_features_fail_fast() {
    let mut world_ws = world();
    world_ws.insert_layer(country_layer(2)); // two features named "Canada"
    let mut engine = engine_for(world_ws, rank_table(3));

    let err = run(&mut engine, &RunConfig::default()).unwrap_err();
    match err {
        PipelineError::SelectionAmbiguity { matches, ref value, .. } => {
            assert_eq!(matches, 2);
            assert_eq!(value, "Canada");
        }
        other => panic!("expected SelectionAmbiguity, got {other}"),
    }
    // Fail-fast: no derived layers were produced.
    assert!(engine.workspace().is_empty());
}

#[test]
fn zero_boundary_matches_fail_fast() {
    let mut engine = engine_for(world(), rank_table(3));
    let config = RunConfig {
        region_name: "Atlantis".to_string(),
        ..RunConfig::default()
    };

    let err = run(&mut engine, &config).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::SelectionAmbiguity { matches: 0, .. }
    ));
    assert!(engine.workspace().is_empty());
}

#[test]
fn missing_source_layer_aborts_before_any_clip() {
    let mut world_ws = world();
    world_ws.remove_layer("Rivers");
    let mut engine = engine_for(world_ws, rank_table(3));

    let err = run(&mut engine, &RunConfig::default()).unwrap_err();
    match err {
        PipelineError::MissingSource { ref layer, .. } => assert_eq!(layer, "Rivers"),
        other => panic!("expected MissingSource, got {other}"),
    }
    assert!(engine.workspace().is_empty());
}

#[test]
fn clip_is_idempotent_over_already_clipped_layers() {
    let mut engine = engine_for(world(), rank_table(3));
    let config = RunConfig::default();
    extract_region(&mut engine, &config).unwrap();

    let boundary_sel = engine
        .select_by_attribute(
            "Country",
            AttributePredicate::Equals {
                field: "CNTRY_NAME",
                value: "Canada",
            },
        )
        .unwrap();

    let first = engine.count("cities_canada").unwrap();
    engine
        .clip("cities_canada", &boundary_sel, "cities_again")
        .unwrap();
    assert_eq!(engine.count("cities_again").unwrap(), first);

    let rivers_first = engine.count("rivers_canada").unwrap();
    engine
        .clip("rivers_canada", &boundary_sel, "rivers_again")
        .unwrap();
    assert_eq!(engine.count("rivers_again").unwrap(), rivers_first);
}

#[test]
fn reprojection_round_trip_preserves_count_and_type() {
    let mut engine = engine_for(world(), rank_table(3));
    let config = RunConfig::default();
    extract_region(&mut engine, &config).unwrap();
    catalog_and_reproject(&mut engine, &config).unwrap();

    engine
        .project("cities_canada_Project", &CRS::wgs84(), "cities_back")
        .unwrap();

    let ws = engine.workspace();
    let original = ws.layer("cities_canada").unwrap();
    let back = ws.layer("cities_back").unwrap();
    assert_eq!(back.len(), original.len());
    assert_eq!(back.geometry_type(), original.geometry_type());

    // Coordinates survive the round trip to within a micro-degree.
    for (a, b) in original.iter().zip(back.iter()) {
        let (Geometry::Point(pa), Geometry::Point(pb)) = (&a.geometry, &b.geometry) else {
            panic!("expected point geometry");
        };
        assert!((pa.x() - pb.x()).abs() < 1e-6);
        assert!((pa.y() - pb.y()).abs() < 1e-6);
    }
}

#[test]
fn projecting_a_layer_without_crs_fails() {
    let mut active = Workspace::create("/tmp", "bare.gdb");
    let mut bare = Layer::new("bare", GeometryType::Point, None);
    bare.push(
        Geometry::Point(Point::new(0.0, 0.0)),
        std::collections::HashMap::new(),
    );
    active.insert_layer(bare);
    let mut engine = MemoryEngine::new(Workspace::default(), active);

    let err = engine
        .project("bare", &CRS::canada_lambert(), "bare_Project")
        .unwrap_err();
    assert!(matches!(err, EngineError::Projection { .. }));
}
