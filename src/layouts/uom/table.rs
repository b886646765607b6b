// src/layouts/uom/table.rs

use super::UnitSystem;

/// An SI unit and its USC counterpart: `usc = si * factor + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitPair {
    pub si: &'static str,
    pub usc: &'static str,
    pub factor: f64,
    pub offset: f64,
}

const fn pair(si: &'static str, usc: &'static str, factor: f64) -> UnitPair {
    UnitPair { si, usc, factor, offset: 0.0 }
}

// Lookups take the first match in either direction, so where several SI
// units share a USC unit the first listed one is the way back.
const UNIT_TABLE: &[UnitPair] = &[
    pair("mm", "in", 1.0 / 25.4),
    pair("m", "ft", 1.0 / 0.3048),
    pair("km", "mi", 1.0 / 1.609_344),
    pair("m²", "ft²", 10.763_910_4),
    pair("m³", "ft³", 35.314_666_7),
    pair("m³/h", "gpm", 4.402_867_54),
    pair("L", "gal", 0.264_172_052),
    pair("kg", "lb", 2.204_622_62),
    pair("kg/h", "lb/h", 2.204_622_62),
    pair("kg/m³", "lb/ft³", 0.062_427_960_6),
    pair("kPa", "psi", 0.145_037_738),
    pair("bar", "psi", 14.503_773_8),
    pair("barg", "psig", 14.503_773_8),
    pair("MPa", "ksi", 0.145_037_738),
    UnitPair { si: "°C", usc: "°F", factor: 1.8, offset: 32.0 },
    pair("K", "°R", 1.8),
    pair("kW", "hp", 1.341_022_09),
    pair("W", "BTU/h", 3.412_141_63),
    pair("kJ/kg", "BTU/lb", 0.429_922_614),
    pair("m/s", "ft/s", 1.0 / 0.3048),
    pair("N", "lbf", 0.224_808_943),
    pair("N·m", "lbf·ft", 0.737_562_149),
    pair("W/m·K", "BTU/h·ft·°F", 0.577_789_317),
    pair("kJ/kg·K", "BTU/lb·°F", 0.238_845_897),
];

// Bare letters ("C", "F", "R") are not aliases: they also name coulomb,
// farad and other units.
const ALIASES: &[(&str, &str)] = &[
    ("degC", "°C"),
    ("deg C", "°C"),
    ("ºC", "°C"),
    ("° C", "°C"),
    ("degF", "°F"),
    ("deg F", "°F"),
    ("ºF", "°F"),
    ("° F", "°F"),
    ("degR", "°R"),
    ("m2", "m²"),
    ("m^2", "m²"),
    ("m3", "m³"),
    ("m^3", "m³"),
    ("m3/h", "m³/h"),
    ("m3/hr", "m³/h"),
    ("m³/hr", "m³/h"),
    ("ft2", "ft²"),
    ("sq ft", "ft²"),
    ("ft3", "ft³"),
    ("cu ft", "ft³"),
    ("kg/m3", "kg/m³"),
    ("lb/ft3", "lb/ft³"),
    ("kg/hr", "kg/h"),
    ("lb/hr", "lb/h"),
    ("lbs", "lb"),
    ("GPM", "gpm"),
    ("US gpm", "gpm"),
    ("l", "L"),
    ("KPA", "kPa"),
    ("kpa", "kPa"),
    ("Kpa", "kPa"),
    ("PSI", "psi"),
    ("PSIG", "psig"),
    ("bar(g)", "barg"),
    ("mpa", "MPa"),
    ("KW", "kW"),
    ("Kw", "kW"),
    ("HP", "hp"),
    ("Btu/h", "BTU/h"),
    ("Btu/hr", "BTU/h"),
    ("BTU/hr", "BTU/h"),
    ("Btu/lb", "BTU/lb"),
    ("Nm", "N·m"),
    ("N.m", "N·m"),
    ("N-m", "N·m"),
    ("ft-lbf", "lbf·ft"),
    ("lbf-ft", "lbf·ft"),
    ("lbf.ft", "lbf·ft"),
    ("W/mK", "W/m·K"),
    ("W/(m·K)", "W/m·K"),
    ("W/(m.K)", "W/m·K"),
    ("kJ/kgK", "kJ/kg·K"),
    ("kJ/(kg·K)", "kJ/kg·K"),
    ("kJ/(kg.K)", "kJ/kg·K"),
];

/// Canonical spelling of a unit (`degC` -> `°C`, `m3` -> `m³`).
/// Unknown spellings come back trimmed but otherwise untouched.
pub fn normalize_uom(unit: &str) -> String {
    let trimmed = unit.trim();
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == trimmed)
        .map(|(_, canonical)| (*canonical).to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Table entry for a unit and the system it belongs to.
pub fn lookup_unit(unit: &str) -> Option<(UnitPair, UnitSystem)> {
    let canonical = normalize_uom(unit);
    UNIT_TABLE
        .iter()
        .find(|p| p.si == canonical)
        .map(|p| (*p, UnitSystem::SI))
        .or_else(|| {
            UNIT_TABLE
                .iter()
                .find(|p| p.usc == canonical)
                .map(|p| (*p, UnitSystem::USC))
        })
}

/// Display unit for `unit` in the `target` system. Unrecognized units are
/// returned as given.
pub fn get_converted_uom(target: UnitSystem, unit: &str) -> String {
    match (lookup_unit(unit), target) {
        (Some((pair, _)), UnitSystem::SI) => pair.si.to_string(),
        (Some((pair, _)), UnitSystem::USC) => pair.usc.to_string(),
        (None, _) => {
            tracing::trace!("get_converted_uom: unrecognized unit '{}'", unit);
            unit.to_string()
        }
    }
}

/// Convert `value` in `unit` to the `target` system. `None` when the unit
/// is unknown or already in the target system.
pub fn convert_value(target: UnitSystem, value: f64, unit: &str) -> Option<(f64, &'static str)> {
    let (pair, system) = lookup_unit(unit)?;
    match (system, target) {
        (UnitSystem::SI, UnitSystem::USC) => Some((value * pair.factor + pair.offset, pair.usc)),
        (UnitSystem::USC, UnitSystem::SI) => Some(((value - pair.offset) / pair.factor, pair.si)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_aliases() {
        assert_eq!(normalize_uom("degC"), "°C");
        assert_eq!(normalize_uom(" m3 "), "m³");
        assert_eq!(normalize_uom("m3/hr"), "m³/h");
        assert_eq!(normalize_uom("furlong"), "furlong");
    }

    #[test]
    fn test_converted_uom_both_directions() {
        assert_eq!(get_converted_uom(UnitSystem::USC, "kPa"), "psi");
        assert_eq!(get_converted_uom(UnitSystem::SI, "psi"), "kPa");
        assert_eq!(get_converted_uom(UnitSystem::USC, "degC"), "°F");
        assert_eq!(get_converted_uom(UnitSystem::SI, "kPa"), "kPa");
        assert_eq!(get_converted_uom(UnitSystem::USC, "rpm"), "rpm");
    }

    #[test]
    fn test_temperature_uses_offset() {
        let (f, unit) = convert_value(UnitSystem::USC, 100.0, "°C").unwrap();
        assert_eq!(unit, "°F");
        assert!((f - 212.0).abs() < 1e-9);
        let (c, _) = convert_value(UnitSystem::SI, 32.0, "degF").unwrap();
        assert!(c.abs() < 1e-9);
    }

    #[test]
    fn test_no_conversion_within_system() {
        assert!(convert_value(UnitSystem::SI, 1.0, "kPa").is_none());
        assert!(convert_value(UnitSystem::USC, 1.0, "unknown").is_none());
    }

    #[test]
    fn test_every_pair_round_trips() {
        for pair in UNIT_TABLE {
            let (usc, _) = convert_value(UnitSystem::USC, 123.456, pair.si).unwrap();
            let (back, _) = convert_value(UnitSystem::SI, usc, pair.usc).unwrap();
            // bar -> psi -> kPa is a different SI unit; only check true inverses
            if lookup_unit(pair.usc).map(|(p, _)| p.si) == Some(pair.si) {
                assert!((back - 123.456).abs() < 1e-9, "{} did not round-trip", pair.si);
            }
        }
    }

    #[test]
    fn test_bare_letters_are_not_temperatures() {
        for unit in ["C", "F", "R"] {
            assert_eq!(normalize_uom(unit), unit);
            assert!(lookup_unit(unit).is_none(), "{} should be unknown", unit);
            assert_eq!(get_converted_uom(UnitSystem::USC, unit), unit);
            assert!(convert_value(UnitSystem::USC, 10.0, unit).is_none());
        }
    }
}
