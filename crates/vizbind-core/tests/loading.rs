// File: crates/vizbind-core/tests/loading.rs
// Purpose: CSV and GeoJSON loading, wide-table pivots, region joins and control events.

use std::time::Duration;

use vizbind_core::config::{BarSeries, SeriesStyle};
use vizbind_core::geo::{join_regions, parse_features};
use vizbind_core::loader::pivot_row;
use vizbind_core::{
    parse_csv, ChartConfig, ChartData, ChartEngine, ChartError, ChartKind, ColumnSpec, ControlEvent, CsvOptions,
    DomainPolicy, ElementKey, FieldValue, LoadOutcome, MercatorProjection, ParsePolicy, Result, Rgba,
};

const WAGES: &str = "\
Year,Wage
2000,5.15
2001,n/a
2002,5.15
2003,7.25
";

#[test]
fn abort_policy_reports_row_and_field() {
    let opts = CsvOptions::with_columns(vec![ColumnSpec::numeric("Year"), ColumnSpec::numeric("Wage")]);
    let err = parse_csv(WAGES.as_bytes(), &opts).unwrap_err();
    match err {
        ChartError::Parse { row, field, .. } => {
            assert_eq!(row, 2);
            assert_eq!(field, "Wage");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn skip_policy_drops_bad_rows() {
    let opts = CsvOptions::with_columns(vec![ColumnSpec::numeric("Year"), ColumnSpec::numeric("Wage")])
        .policy(ParsePolicy::SkipRow);
    let ds = parse_csv(WAGES.as_bytes(), &opts).unwrap();
    assert_eq!(ds.len(), 3);
    let year = ds.field("Year").unwrap();
    let years: Vec<f64> = ds.numbers(year).collect();
    assert_eq!(years, vec![2000.0, 2002.0, 2003.0]);
}

const RAGGED: &str = "Year,Wage\n2000,5\n2001\n2002,6\n";

#[test]
fn skip_policy_drops_short_rows() {
    let opts = CsvOptions::with_columns(vec![ColumnSpec::numeric("Year"), ColumnSpec::numeric("Wage")])
        .policy(ParsePolicy::SkipRow);
    let ds = parse_csv(RAGGED.as_bytes(), &opts).unwrap();
    assert_eq!(ds.len(), 2);
    let years: Vec<f64> = ds.numbers(ds.field("Year").unwrap()).collect();
    assert_eq!(years, vec![2000.0, 2002.0]);

    // inferred columns only look at complete rows
    let ds = parse_csv(RAGGED.as_bytes(), &CsvOptions::default().policy(ParsePolicy::SkipRow)).unwrap();
    assert_eq!(ds.len(), 2);
    assert_eq!(ds.records()[1].number(1), Some(6.0));
}

#[test]
fn abort_policy_rejects_short_rows() {
    let opts = CsvOptions::with_columns(vec![ColumnSpec::numeric("Year"), ColumnSpec::numeric("Wage")]);
    match parse_csv(RAGGED.as_bytes(), &opts) {
        Err(ChartError::Parse { row, message, .. }) => {
            assert_eq!(row, 2);
            assert!(message.contains("expected 2 fields"), "{message}");
        }
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn columns_are_renamed_scaled_and_sorted() {
    let text = "Year,Rate,Unused\n2001,0.05,x\n2000,0.031,y\n";
    let opts = CsvOptions::with_columns(vec![
        ColumnSpec::temporal("Year", "%Y").renamed("Date"),
        ColumnSpec::numeric("Rate").scaled(100.0),
    ])
    .sorted_by("Date");
    let ds = parse_csv(text.as_bytes(), &opts).unwrap();
    assert_eq!(ds.schema().fields().len(), 2);
    assert!(ds.field("Unused").is_err());
    let first = &ds.records()[0];
    assert_eq!(first.get(0).map(|v| v.to_string()), Some("2000-01-01".to_string()));
    assert!((first.number(1).unwrap() - 3.1).abs() < 1e-9);
}

#[test]
fn inferred_columns() {
    let ds = parse_csv("name,value\nUSA,3\nFRA,\n".as_bytes(), &CsvOptions::default());
    // an empty numeric cell aborts under the default policy
    assert!(matches!(ds, Err(ChartError::Parse { row: 2, .. })));
    let ds = parse_csv("name,value\nUSA,3\nFRA,4\n".as_bytes(), &CsvOptions::default()).unwrap();
    assert_eq!(ds.records()[1].get(0), Some(&FieldValue::Text("FRA".into())));
    assert_eq!(ds.records()[1].number(1), Some(4.0));
}

fn trade_tables() -> Result<ChartData> {
    let import = "Year,Food,Fuel\n2019,10,20\n2020,30,5\n";
    let export = "Year,Food,Fuel\n2019,1,2\n2020,3,4\n";
    Ok(ChartData::Tables(vec![
        ("import".into(), parse_csv(import.as_bytes(), &CsvOptions::default())?),
        ("export".into(), parse_csv(export.as_bytes(), &CsvOptions::default())?),
    ]))
}

#[test]
fn pivot_turns_columns_into_records() {
    let ChartData::Tables(tables) = trade_tables().unwrap() else { unreachable!() };
    let long = pivot_row(&tables, "Year", "2020", "type").unwrap();
    assert_eq!(long.len(), 2);
    let names: Vec<_> = long.schema().fields().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["type", "import", "export"]);
    assert_eq!(long.records()[0].get(0), Some(&FieldValue::Text("Food".into())));
    assert_eq!(long.records()[1].number(1), Some(5.0));
    assert_eq!(long.records()[1].number(2), Some(4.0));
    match pivot_row(&tables, "Year", "1999", "type") {
        Err(ChartError::Parse { field, message, .. }) => {
            assert_eq!(field, "Year");
            assert!(message.contains("'import'"), "{message}");
        }
        other => panic!("a missing key row is a data error, got {other:?}"),
    }
}

fn grouped() -> ChartConfig {
    let mut cfg = ChartConfig::new(ChartKind::GroupedBars {
        key: "Year".into(),
        category: "type".into(),
        padding: 0.2,
        series: vec![
            BarSeries { table: "import".into(), colors: (Rgba::hex(0xece7f2), Rgba::hex(0x2b8cbe)) },
            BarSeries { table: "export".into(), colors: (Rgba::hex(0xfee8c8), Rgba::hex(0xe34a33)) },
        ],
    });
    cfg.transition_ms = 0;
    cfg
}

#[test]
fn select_subset_rebinds_the_same_categories() {
    let mut engine = ChartEngine::new(grouped()).unwrap();
    let out = engine.load_with(&trade_tables, Duration::ZERO).unwrap();
    assert_eq!(out, LoadOutcome::Applied { entered: 4, updated: 0, exited: 0 });
    assert_eq!(engine.subset_options(), vec!["2019".to_string(), "2020".to_string()]);
    assert_eq!(engine.selected_subset(), None);

    let out = engine.handle_control(ControlEvent::SelectSubset("2020".into()), Duration::ZERO).unwrap();
    assert_eq!(out, LoadOutcome::Applied { entered: 0, updated: 4, exited: 0 });
    assert_eq!(engine.selected_subset(), Some("2020"));
    assert!(engine.layers()[0].get(&ElementKey::text("Fuel")).is_some());

    let err = engine.handle_control(ControlEvent::SelectSubset("1850".into()), Duration::ZERO).unwrap_err();
    assert!(matches!(err, ChartError::InvalidConfig(_)));
    assert_eq!(engine.selected_subset(), Some("2020"));
}

fn balance() -> Result<ChartData> {
    let text = "Year,Imports,Exports,Deficit\n2000,5,3,2\n2001,6,4,2\n2002,7,4,3\n";
    Ok(ChartData::Table(parse_csv(text.as_bytes(), &CsvOptions::default())?))
}

#[test]
fn toggle_overlay_adds_and_removes_its_series() {
    let mut cfg = ChartConfig::new(ChartKind::Lines {
        x: "Year".into(),
        series: vec![
            SeriesStyle::new("Imports", Rgba::hex(0x2b8cbe)),
            SeriesStyle::new("Exports", Rgba::hex(0xe34a33)),
        ],
        overlay: Some(SeriesStyle::new("Deficit", Rgba::hex(0x8cff79))),
        x_domain: DomainPolicy::Extent,
        y_domain: DomainPolicy::ZeroToMax,
        changes_only: false,
        point_radius: 5.0,
    });
    cfg.transition_ms = 0;
    let mut engine = ChartEngine::with_loader(cfg, balance).unwrap();
    engine.reload(Duration::ZERO).unwrap();
    // one path per visible series, three points each, overlay layer empty
    assert_eq!(engine.layers().len(), 4);
    assert_eq!(engine.layers()[0].len(), 2);
    assert_eq!(engine.layers()[3].len(), 0);
    assert!(!engine.overlay_visible());

    engine.handle_control(ControlEvent::ToggleOverlay, Duration::ZERO).unwrap();
    assert!(engine.overlay_visible());
    assert_eq!(engine.layers()[0].len(), 3);
    assert_eq!(engine.layers()[3].len(), 3);
    assert!(engine.layers()[3].get(&ElementKey::series("Deficit", ElementKey::Int(2001))).is_some());

    engine.handle_control(ControlEvent::ToggleOverlay, Duration::ZERO).unwrap();
    assert_eq!(engine.layers()[3].len(), 0);
    assert_eq!(engine.element_count(), 2 + 3 + 3);

    let out = engine.handle_control(ControlEvent::Reload, Duration::ZERO).unwrap();
    assert_eq!(out, LoadOutcome::Applied { entered: 0, updated: 8, exited: 0 });
}

const WORLD: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "id": "AAA", "properties": {"name": "Alpha"},
     "geometry": {"type": "Polygon", "coordinates": [[[0,0],[10,0],[10,10],[0,10],[0,0]]]}},
    {"type": "Feature", "id": "BBB", "properties": {"name": "Beta"},
     "geometry": {"type": "MultiPolygon", "coordinates": [[[[20,0],[30,0],[30,10],[20,0]]]]}},
    {"type": "Feature", "id": "AAA", "properties": {"name": "Alpha again"},
     "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]]}}
  ]
}"#;

#[test]
fn regions_join_by_id_and_missing_values_still_render() {
    let features = parse_features(WORLD).unwrap();
    assert_eq!(features.len(), 3);
    let table = parse_csv("code,gdp\nAAA,42000\n".as_bytes(), &CsvOptions::default()).unwrap();
    let regions = join_regions(&features, &table, "code").unwrap();
    assert_eq!(regions[0].record, Some(0));
    assert_eq!(regions[1].record, None);

    let mut cfg = ChartConfig::new(ChartKind::Choropleth {
        key: "code".into(),
        value: "gdp".into(),
        stops: vec![0.0, 50000.0],
        colors: vec![Rgba::hex(0xedf8e9), Rgba::hex(0x006d2c)],
        projection: MercatorProjection::default(),
    });
    cfg.transition_ms = 0;
    let mut engine = ChartEngine::new(cfg).unwrap();
    let load = || -> Result<ChartData> { Ok(ChartData::Map { features: features.clone(), table: table.clone() }) };
    engine.load_with(&load, Duration::ZERO).unwrap();
    // the duplicate id is dropped, the unmatched region is still drawn
    assert_eq!(engine.element_count(), 2);
    assert!(engine.layers()[0].get(&ElementKey::text("BBB")).is_some());
}
