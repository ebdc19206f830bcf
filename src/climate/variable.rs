use std::fmt;
use std::str::FromStr;

use crate::climate::scheme::ColorScheme;
use crate::error::ClimateError;

/// Static description of a mappable climate variable
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VariableDescriptor {
    /// Short key used on the command line and in messages
    pub key: &'static str,
    /// Field read from each climate record
    pub field: &'static str,
    pub label: &'static str,
    pub scheme: ColorScheme,
}

/// The closed set of variables the map can show
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Variable {
    #[default]
    Temperature,
    CoolingDegreeDays,
    HotDays,
}

impl Variable {
    pub const ALL: [Variable; 3] = [Variable::Temperature, Variable::CoolingDegreeDays, Variable::HotDays];

    pub const fn descriptor(self) -> VariableDescriptor {
        match self {
            Variable::Temperature => VariableDescriptor {
                key: "temperature",
                field: "meanTemperature",
                label: "Mean Temperature (°C)",
                scheme: ColorScheme::YlOrRd,
            },
            Variable::CoolingDegreeDays => VariableDescriptor {
                key: "ncdd",
                field: "nCdd",
                label: "Cooling Degree Days",
                scheme: ColorScheme::Blues,
            },
            Variable::HotDays => VariableDescriptor {
                key: "nhotdays",
                field: "nHotDays40",
                label: "Number of Days Above 40°C",
                scheme: ColorScheme::OrRd,
            },
        }
    }

    pub const fn key(self) -> &'static str {
        self.descriptor().key
    }

    pub const fn field(self) -> &'static str {
        self.descriptor().field
    }

    pub const fn label(self) -> &'static str {
        self.descriptor().label
    }

    pub const fn scheme(self) -> ColorScheme {
        self.descriptor().scheme
    }

    /// Look a variable up by key, failing on anything outside the registry
    pub fn resolve(key: &str) -> Result<Variable, ClimateError> {
        Variable::ALL
            .into_iter()
            .find(|v| v.key() == key)
            .ok_or_else(|| ClimateError::UnknownVariable(key.to_string()))
    }

    /// Position in `ALL`, used by the selector and number keys
    pub fn index(self) -> usize {
        match self {
            Variable::Temperature => 0,
            Variable::CoolingDegreeDays => 1,
            Variable::HotDays => 2,
        }
    }

    /// Step forwards or backwards through `ALL`, wrapping at either end
    pub fn cycled(self, step: isize) -> Variable {
        let len = Variable::ALL.len() as isize;
        let idx = (self.index() as isize + step).rem_euclid(len);
        Variable::ALL[idx as usize]
    }
}

impl FromStr for Variable {
    type Err = ClimateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variable::resolve(s)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
