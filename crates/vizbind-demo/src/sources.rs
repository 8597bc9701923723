// File: crates/vizbind-demo/src/sources.rs
// Summary: Sample data loaders for each bundled chart, rooted at a data directory.

use std::path::Path;

use vizbind_core::{
    ColumnSpec, CsvFile, CsvOptions, DataLoader, MapSource, ParsePolicy, TableSource, TablesSource,
};

/// Loader for the preset `variant`, reading files under `data/<variant>/`.
pub fn loader_for(variant: &str, data: &Path, policy: ParsePolicy) -> Option<Box<dyn DataLoader>> {
    let dir = data.join(variant);
    let csv = |file: &str, columns: Vec<ColumnSpec>| {
        CsvFile::new(dir.join(file), CsvOptions::with_columns(columns).policy(policy))
    };
    let loader: Box<dyn DataLoader> = match variant {
        "bar-div" => Box::new(TableSource(csv(
            "data.csv",
            vec![ColumnSpec::numeric("Years"), ColumnSpec::numeric("Average inflation rate (%)")],
        ))),
        "bar-seq" => Box::new(
            TablesSource::new()
                .table("import", csv("data-import.csv", Vec::new()))
                .table("export", csv("data-export.csv", Vec::new())),
        ),
        "line" => Box::new(TableSource(csv(
            "data.csv",
            vec![ColumnSpec::numeric("Years"), ColumnSpec::numeric("Federal minimum wage ($)")],
        ))),
        "multiline" => Box::new(TableSource(csv(
            "data.csv",
            vec![ColumnSpec::numeric("Years"), ColumnSpec::numeric("Imports"), ColumnSpec::numeric("Exports")],
        ))),
        // rates are stored as fractions; the chart works in percent
        "scatterplot" => Box::new(TableSource(csv(
            "data.csv",
            vec![
                ColumnSpec::numeric("Years"),
                ColumnSpec::numeric("Unemployment rate (%)").scaled(100.0),
                ColumnSpec::numeric("Average inflation rate (%)").scaled(100.0),
            ],
        ))),
        "streamgraph" => {
            let mut columns = vec![ColumnSpec::temporal("Years", "%Y")];
            columns.extend(
                ["Goods", "Services", "Investments", "Federal Government", "State and Local Government"]
                    .into_iter()
                    .map(ColumnSpec::numeric),
            );
            Box::new(TableSource(csv("data.csv", columns)))
        }
        "world-map" => Box::new(MapSource {
            features: dir.join("geo.json"),
            table: csv(
                "data.csv",
                vec![
                    ColumnSpec::categorical("code"),
                    ColumnSpec::categorical("name"),
                    ColumnSpec::numeric("gdp"),
                    ColumnSpec::numeric("pop"),
                ],
            ),
        }),
        _ => return None,
    };
    Some(loader)
}
