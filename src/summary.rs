//! Headless table of the selected variable per district.

use std::io::Write;

use anyhow::Result;

use crate::climate::Variable;
use crate::data::{ClimateDataStore, Scenario};
use crate::view::{format_value, ViewModel};

/// Write one row per district (name, division, value, fill colour), sorted
/// by district name, followed by the domain the colours were stretched over
/// and any districts that had no record.
pub fn write_summary(
    store: &ClimateDataStore,
    variable: Variable,
    scenario: Scenario,
    out: &mut impl Write,
) -> Result<()> {
    let view = ViewModel::new(store, variable, scenario)?;

    let mut districts: Vec<_> = store.districts().iter().collect();
    districts.sort_by(|a, b| a.name.cmp(&b.name));

    let name_width = districts
        .iter()
        .map(|d| d.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("District".len());
    let division_width = districts
        .iter()
        .map(|d| d.division.chars().count())
        .max()
        .unwrap_or(0)
        .max("Division".len());

    writeln!(out, "{} ({})", view.label(), scenario.label())?;
    writeln!(
        out,
        "{:<name_width$}  {:<division_width$}  {:>10}  {}",
        "District", "Division", "Value", "Colour"
    )?;
    for district in districts {
        let value = view.value_of(&district.name).ok();
        let colour = view.fill_for(&district.name).map_or_else(|| "-".to_string(), |c| c.hex());
        writeln!(
            out,
            "{:<name_width$}  {:<division_width$}  {:>10}  {}",
            district.name,
            district.division,
            format_value(value),
            colour
        )?;
    }

    let domain = view.domain();
    writeln!(
        out,
        "domain: {} .. {}",
        format_value(Some(domain.min)),
        format_value(Some(domain.max))
    )?;
    if !store.unmatched().is_empty() {
        writeln!(
            out,
            "no climate record ({:?} policy): {}",
            store.policy(),
            store.unmatched().join(", ")
        )?;
    }
    Ok(())
}
