use std::collections::HashMap;

use clap::ValueEnum;
use log::{info, warn};

use crate::data::district::{union_bounds, Bounds, District};
use crate::data::domain::DomainTable;
use crate::error::{ClimateError, Result};

/// Numeric climate fields of one series (field name -> value)
pub type FieldMap = HashMap<String, f64>;

/// One series of climate statistics for a district
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Series {
    /// Period covered, e.g. "2030-2050"
    pub time_range: Option<String>,
    pub fields: FieldMap,
}

/// Climate statistics joined to a district by name
#[derive(Clone, Debug, PartialEq)]
pub struct ClimateRecord {
    pub name: String,
    pub future: Series,
    pub historical: Option<Series>,
}

impl ClimateRecord {
    pub fn series(&self, scenario: Scenario) -> Option<&Series> {
        match scenario {
            Scenario::Future => Some(&self.future),
            Scenario::Historical => self.historical.as_ref(),
        }
    }
}

/// A news story linked to a district
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
pub struct Story {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// Which climate series drives the map
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum Scenario {
    /// Projected statistics (`futureData`)
    #[default]
    Future,
    /// Baseline statistics (`historicalData`)
    Historical,
}

impl Scenario {
    pub fn toggled(self) -> Self {
        match self {
            Scenario::Future => Scenario::Historical,
            Scenario::Historical => Scenario::Future,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Scenario::Future => "More climate change (future)",
            Scenario::Historical => "Less climate change (historical)",
        }
    }
}

/// What to do when a district has no climate record
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum MissingRecordPolicy {
    /// Read unmatched districts as 0
    #[default]
    Zero,
    /// Reject unmatched districts at load and on lookup
    Strict,
}

/// Boundaries, climate records and story links, loaded once per session
pub struct ClimateDataStore {
    districts: Vec<District>,
    records: Vec<ClimateRecord>,
    /// District name -> index into `records`
    index: HashMap<String, usize>,
    stories: HashMap<String, Vec<Story>>,
    future_domains: DomainTable,
    historical_domains: DomainTable,
    policy: MissingRecordPolicy,
    unmatched: Vec<String>,
}

impl ClimateDataStore {
    /// Join boundaries to records and derive the domain tables
    pub fn load(
        districts: Vec<District>,
        records: Vec<ClimateRecord>,
        stories: HashMap<String, Vec<Story>>,
        policy: MissingRecordPolicy,
    ) -> Result<Self> {
        if records.is_empty() {
            return Err(ClimateError::DataMismatch("no climate records loaded".to_string()));
        }

        let mut index = HashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            if index.contains_key(&record.name) {
                warn!("duplicate climate record for '{}', keeping the first", record.name);
                continue;
            }
            index.insert(record.name.clone(), i);
        }

        let unmatched: Vec<String> = districts
            .iter()
            .filter(|d| !index.contains_key(&d.name))
            .map(|d| d.name.clone())
            .collect();

        if !unmatched.is_empty() {
            match policy {
                MissingRecordPolicy::Strict => {
                    return Err(ClimateError::DataMismatch(format!(
                        "districts without climate records: {}",
                        unmatched.join(", ")
                    )));
                }
                MissingRecordPolicy::Zero => {
                    warn!(
                        "{} district(s) without climate records will read as 0: {}",
                        unmatched.len(),
                        unmatched.join(", ")
                    );
                }
            }
        }

        let future_domains = DomainTable::compute(records.iter().map(|r| &r.future.fields));
        let historical_domains = DomainTable::compute(
            records.iter().filter_map(|r| r.historical.as_ref()).map(|s| &s.fields),
        );

        info!(
            "loaded {} districts, {} climate records, {} story lists",
            districts.len(),
            records.len(),
            stories.len()
        );

        Ok(Self {
            districts,
            records,
            index,
            stories,
            future_domains,
            historical_domains,
            policy,
            unmatched,
        })
    }

    /// Future-series value, 0 when the district or field is missing
    pub fn lookup(&self, district: &str, field: &str) -> f64 {
        self.lookup_in(Scenario::Future, district, field)
    }

    /// Value from the chosen series, 0 when the district or field is missing
    pub fn lookup_in(&self, scenario: Scenario, district: &str, field: &str) -> f64 {
        self.try_lookup(scenario, district, field).unwrap_or(0.0)
    }

    /// Value from the chosen series, `LookupMiss` when absent
    pub fn try_lookup(&self, scenario: Scenario, district: &str, field: &str) -> Result<f64> {
        self.record(district)
            .and_then(|r| r.series(scenario))
            .and_then(|s| s.fields.get(field))
            .copied()
            .ok_or_else(|| ClimateError::LookupMiss {
                district: district.to_string(),
                field: field.to_string(),
            })
    }

    /// Value under the configured missing-record policy
    pub fn value(&self, scenario: Scenario, district: &str, field: &str) -> Result<f64> {
        match self.policy {
            MissingRecordPolicy::Zero => Ok(self.lookup_in(scenario, district, field)),
            MissingRecordPolicy::Strict => self.try_lookup(scenario, district, field),
        }
    }

    pub fn domains(&self, scenario: Scenario) -> &DomainTable {
        match scenario {
            Scenario::Future => &self.future_domains,
            Scenario::Historical => &self.historical_domains,
        }
    }

    pub fn record(&self, district: &str) -> Option<&ClimateRecord> {
        self.index.get(district).map(|&i| &self.records[i])
    }

    /// Stories for a district; districts without stories get an empty list
    pub fn stories_for(&self, district: &str) -> &[Story] {
        self.stories.get(district).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn districts(&self) -> &[District] {
        &self.districts
    }

    pub fn district(&self, name: &str) -> Option<&District> {
        self.districts.iter().find(|d| d.name == name)
    }

    /// Index of the first district containing the point
    pub fn district_at(&self, lon: f64, lat: f64) -> Option<usize> {
        self.districts.iter().position(|d| d.contains(lon, lat))
    }

    /// Names of districts that have no climate record
    pub fn unmatched(&self) -> &[String] {
        &self.unmatched
    }

    pub fn policy(&self) -> MissingRecordPolicy {
        self.policy
    }

    pub fn bounds(&self) -> Option<Bounds> {
        union_bounds(&self.districts)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::data::district::tests::square;
    use crate::data::domain::Domain;

    pub(crate) fn record(name: &str, future: &[(&str, f64)]) -> ClimateRecord {
        ClimateRecord {
            name: name.to_string(),
            future: Series {
                time_range: Some("2030-2050".to_string()),
                fields: future.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            },
            historical: None,
        }
    }

    /// Two districts "A" (10) and "B" (30) side by side plus an unmatched "C"
    pub(crate) fn sample_store(policy: MissingRecordPolicy) -> Result<ClimateDataStore> {
        let districts = vec![
            square("A", "North", 0.0, 0.0, 1.0),
            square("B", "North", 1.0, 0.0, 1.0),
            square("C", "South", 2.0, 0.0, 1.0),
        ];
        let mut a = record("A", &[("meanTemperature", 10.0), ("nCdd", 5100.0), ("nHotDays40", 2.0)]);
        a.historical = Some(Series {
            time_range: Some("1974-2020".to_string()),
            fields: [("meanTemperature".to_string(), 8.0)].into_iter().collect(),
        });
        let b = record("B", &[("meanTemperature", 30.0), ("nCdd", 6300.0), ("nHotDays40", 48.0)]);
        let mut stories = HashMap::new();
        stories.insert(
            "A".to_string(),
            vec![Story {
                url: Some("https://example.org/heat".to_string()),
                headline: "Heatwave grips the north".to_string(),
                image: Some("data/images/A_1.jpg".to_string()),
            }],
        );
        ClimateDataStore::load(districts, vec![a, b], stories, policy)
    }

    #[test]
    fn test_empty_records_fail() {
        let result = ClimateDataStore::load(
            vec![square("A", "North", 0.0, 0.0, 1.0)],
            Vec::new(),
            HashMap::new(),
            MissingRecordPolicy::Zero,
        );
        assert!(matches!(result, Err(ClimateError::DataMismatch(_))));
    }

    #[test]
    fn test_lookup_exact_and_zero_fallback() {
        let store = sample_store(MissingRecordPolicy::Zero).unwrap();
        assert_eq!(store.lookup("A", "meanTemperature"), 10.0);
        assert_eq!(store.lookup("B", "nCdd"), 6300.0);
        assert_eq!(store.lookup("C", "meanTemperature"), 0.0);
        assert_eq!(store.lookup("Nowhere", "nCdd"), 0.0);
        assert_eq!(store.lookup("A", "noSuchField"), 0.0);
        assert_eq!(store.unmatched(), ["C".to_string()]);
    }

    #[test]
    fn test_strict_policy_rejects_unmatched() {
        let err = sample_store(MissingRecordPolicy::Strict).err().unwrap();
        match err {
            ClimateError::DataMismatch(msg) => assert!(msg.contains('C')),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_value_follows_policy() {
        let store = sample_store(MissingRecordPolicy::Zero).unwrap();
        assert_eq!(store.value(Scenario::Future, "C", "nCdd"), Ok(0.0));
        assert_eq!(
            store.try_lookup(Scenario::Future, "C", "nCdd"),
            Err(ClimateError::LookupMiss {
                district: "C".to_string(),
                field: "nCdd".to_string()
            })
        );
    }

    #[test]
    fn test_domains_per_scenario() {
        let store = sample_store(MissingRecordPolicy::Zero).unwrap();
        assert_eq!(
            store.domains(Scenario::Future).get("meanTemperature").unwrap(),
            Domain::new(10.0, 30.0)
        );
        assert_eq!(
            store.domains(Scenario::Historical).get("meanTemperature").unwrap(),
            Domain::new(8.0, 8.0)
        );
        assert!(store.domains(Scenario::Historical).get("nCdd").is_err());
        assert_eq!(store.lookup_in(Scenario::Historical, "B", "meanTemperature"), 0.0);
    }

    #[test]
    fn test_duplicate_names_keep_first() {
        let store = ClimateDataStore::load(
            vec![square("A", "North", 0.0, 0.0, 1.0)],
            vec![record("A", &[("nCdd", 1.0)]), record("A", &[("nCdd", 2.0)])],
            HashMap::new(),
            MissingRecordPolicy::Zero,
        )
        .unwrap();
        assert_eq!(store.lookup("A", "nCdd"), 1.0);
        // Both records still contribute to the domain
        assert_eq!(store.domains(Scenario::Future).get("nCdd").unwrap(), Domain::new(1.0, 2.0));
    }

    #[test]
    fn test_stories_default_to_empty() {
        let store = sample_store(MissingRecordPolicy::Zero).unwrap();
        assert_eq!(store.stories_for("A").len(), 1);
        assert!(store.stories_for("B").is_empty());
    }

    #[test]
    fn test_district_at() {
        let store = sample_store(MissingRecordPolicy::Zero).unwrap();
        assert_eq!(store.district_at(1.5, 0.5), Some(1));
        assert_eq!(store.district_at(5.0, 0.5), None);
        assert_eq!(store.bounds(), Some((0.0, 0.0, 3.0, 1.0)));
    }
}
