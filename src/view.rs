//! Immutable per-frame view of the selection and its colour scale.

use crate::climate::{ColorMapper, Rgb, SequentialScale, Variable};
use crate::data::{ClimateDataStore, District, Domain, DomainTable, Scenario, Story};
use crate::error::Result;

/// Everything a render pass needs, built fresh for every frame
#[derive(Clone, Copy)]
pub struct ViewModel<'a> {
    pub selected: Variable,
    pub scenario: Scenario,
    pub store: &'a ClimateDataStore,
    pub domains: &'a DomainTable,
    pub scale: SequentialScale,
}

impl<'a> ViewModel<'a> {
    /// Fails when the selected variable has no domain in this scenario
    pub fn new(store: &'a ClimateDataStore, selected: Variable, scenario: Scenario) -> Result<Self> {
        let domains = store.domains(scenario);
        let scale = ColorMapper::new(domains).scale_for(selected)?;
        Ok(Self {
            selected,
            scenario,
            store,
            domains,
            scale,
        })
    }

    pub fn domain(&self) -> Domain {
        self.scale.domain
    }

    pub fn label(&self) -> &'static str {
        self.selected.label()
    }

    /// Value of the selected variable under the store's missing-record policy
    pub fn value_of(&self, district: &str) -> Result<f64> {
        self.store.value(self.scenario, district, self.selected.field())
    }

    /// Fill colour; `None` leaves the district unfilled (strict policy misses)
    pub fn fill_for(&self, district: &str) -> Option<Rgb> {
        self.value_of(district).ok().map(|v| self.scale.color(v))
    }

    pub fn tooltip(&self, district: &District, col: u16, row: u16) -> Tooltip {
        Tooltip {
            title: format!("{}-{}", district.name, district.division),
            label: self.label(),
            value: self.value_of(&district.name).ok(),
            col,
            row,
        }
    }

    pub fn detail(&self, district: &District, visible: bool) -> DetailPanel {
        let time_range = self
            .store
            .record(&district.name)
            .and_then(|r| r.series(self.scenario))
            .and_then(|s| s.time_range.clone());

        DetailPanel {
            title: format!("{} District, {} Division", district.name, district.division),
            label: self.label(),
            value: self.value_of(&district.name).ok(),
            time_range,
            stories: self.store.stories_for(&district.name).to_vec(),
            visible,
        }
    }
}

/// Hover box shown next to the pointer
#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
    pub title: String,
    pub label: &'static str,
    pub value: Option<f64>,
    /// Terminal position of the pointer
    pub col: u16,
    pub row: u16,
}

/// Content block for a clicked district
#[derive(Clone, Debug, PartialEq)]
pub struct DetailPanel {
    pub title: String,
    pub label: &'static str,
    pub value: Option<f64>,
    pub time_range: Option<String>,
    pub stories: Vec<Story>,
    /// False while the reveal transition is running
    pub visible: bool,
}

/// Format a climate value: integers without decimals, others with two
pub fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 => format!("{v:.0}"),
        Some(v) => format!("{v:.2}"),
        None => "no data".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::store::tests::sample_store;
    use crate::data::MissingRecordPolicy;

    #[test]
    fn test_view_model_scale_follows_selection() {
        let store = sample_store(MissingRecordPolicy::Zero).unwrap();

        let temp = ViewModel::new(&store, Variable::Temperature, Scenario::Future).unwrap();
        assert_eq!(temp.domain(), Domain::new(10.0, 30.0));
        assert_eq!(temp.fill_for("A"), Some(Variable::Temperature.scheme().stops()[0]));
        assert_eq!(temp.fill_for("B"), Some(Variable::Temperature.scheme().stops()[8]));

        let cdd = ViewModel::new(&store, Variable::CoolingDegreeDays, Scenario::Future).unwrap();
        assert_eq!(cdd.domain(), Domain::new(5100.0, 6300.0));
        assert_eq!(cdd.label(), "Cooling Degree Days");
        assert_eq!(cdd.fill_for("B"), Some(Variable::CoolingDegreeDays.scheme().stops()[8]));
    }

    #[test]
    fn test_missing_scenario_domain_fails() {
        let store = sample_store(MissingRecordPolicy::Zero).unwrap();
        assert!(ViewModel::new(&store, Variable::HotDays, Scenario::Historical).is_err());
    }

    #[test]
    fn test_unmatched_district_reads_zero() {
        let store = sample_store(MissingRecordPolicy::Zero).unwrap();
        let view = ViewModel::new(&store, Variable::Temperature, Scenario::Future).unwrap();
        assert_eq!(view.value_of("C"), Ok(0.0));
        // 0 is below the domain and clamps to the low end
        assert_eq!(view.fill_for("C"), view.fill_for("A"));
    }

    #[test]
    fn test_strict_policy_leaves_missing_field_unfilled() {
        use crate::data::district::tests::square;
        use crate::data::store::tests::record;
        use crate::error::ClimateError;
        use std::collections::HashMap;

        let store = ClimateDataStore::load(
            vec![square("A", "North", 0.0, 0.0, 1.0), square("B", "North", 1.0, 0.0, 1.0)],
            vec![
                record("A", &[("meanTemperature", 10.0), ("nCdd", 5100.0)]),
                record("B", &[("meanTemperature", 30.0)]),
            ],
            HashMap::new(),
            MissingRecordPolicy::Strict,
        )
        .unwrap();
        let view = ViewModel::new(&store, Variable::CoolingDegreeDays, Scenario::Future).unwrap();

        assert_eq!(view.value_of("A"), Ok(5100.0));
        assert_eq!(
            view.value_of("B"),
            Err(ClimateError::LookupMiss {
                district: "B".to_string(),
                field: "nCdd".to_string()
            })
        );
        assert!(view.fill_for("A").is_some());
        assert_eq!(view.fill_for("B"), None);

        let b = store.district("B").unwrap();
        assert_eq!(view.tooltip(b, 0, 0).value, None);
        assert_eq!(view.detail(b, true).value, None);
    }

    #[test]
    fn test_tooltip_and_detail_content() {
        let store = sample_store(MissingRecordPolicy::Zero).unwrap();
        let view = ViewModel::new(&store, Variable::Temperature, Scenario::Future).unwrap();
        let a = store.district("A").unwrap();

        let tooltip = view.tooltip(a, 4, 7);
        assert_eq!(tooltip.title, "A-North");
        assert_eq!(tooltip.label, "Mean Temperature (°C)");
        assert_eq!(tooltip.value, Some(10.0));

        let detail = view.detail(a, true);
        assert_eq!(detail.title, "A District, North Division");
        assert_eq!(detail.time_range.as_deref(), Some("2030-2050"));
        assert_eq!(detail.stories.len(), 1);

        let b = store.district("B").unwrap();
        assert!(view.detail(b, true).stories.is_empty());
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(Some(5400.0)), "5400");
        assert_eq!(format_value(Some(26.456)), "26.46");
        assert_eq!(format_value(None), "no data");
    }
}
