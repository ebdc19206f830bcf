use std::collections::HashMap;

use crate::data::store::FieldMap;
use crate::error::{ClimateError, Result};

/// Numeric range a colour scale is stretched across
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

impl Domain {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Start a domain from the first observed value
    fn seed(value: f64) -> Self {
        Self { min: value, max: value }
    }

    fn widen(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Per-field (min, max) table derived once from the loaded records
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DomainTable {
    domains: HashMap<String, Domain>,
}

impl DomainTable {
    /// Single pass over every field of every record.
    /// NaN values are ignored so that `min <= max` always holds.
    pub fn compute<'a>(records: impl IntoIterator<Item = &'a FieldMap>) -> Self {
        let mut domains: HashMap<String, Domain> = HashMap::new();

        for fields in records {
            for (field, &value) in fields {
                if value.is_nan() {
                    continue;
                }
                match domains.get_mut(field) {
                    Some(domain) => domain.widen(value),
                    None => {
                        domains.insert(field.clone(), Domain::seed(value));
                    }
                }
            }
        }

        Self { domains }
    }

    /// Domain for a field; absent fields fail instead of yielding a default
    pub fn get(&self, field: &str) -> Result<Domain> {
        self.domains
            .get(field)
            .copied()
            .ok_or_else(|| ClimateError::EmptyDomain(field.to_string()))
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.domains.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}
