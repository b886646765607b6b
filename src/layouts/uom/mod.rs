// src/layouts/uom/mod.rs
// Unit-of-measure normalization, SI/USC conversion and value formatting

mod format;
mod table;

pub use format::{format_field_value, format_number, parse_numeric, DEFAULT_DECIMALS};
pub use table::{convert_value, get_converted_uom, lookup_unit, normalize_uom, UnitPair};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two measurement systems a sheet can be rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum UnitSystem {
    #[default]
    SI,
    USC,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::SI => "SI",
            UnitSystem::USC => "USC",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SI" | "METRIC" => Ok(UnitSystem::SI),
            "USC" | "US" | "IMPERIAL" => Ok(UnitSystem::USC),
            other => Err(format!("unknown unit system '{}', expected SI or USC", other)),
        }
    }
}
