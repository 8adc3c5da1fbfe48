use std::collections::HashMap;

use crate::interpreter::value::unit::{LANES, Unit};

/// Single-letter metric prefixes and their multipliers.
const PREFIXES: &[(char, f64)] = &[('Y', 1e24),
                                   ('Z', 1e21),
                                   ('E', 1e18),
                                   ('P', 1e15),
                                   ('T', 1e12),
                                   ('G', 1e9),
                                   ('M', 1e6),
                                   ('k', 1e3),
                                   ('h', 1e2),
                                   ('d', 1e-1),
                                   ('c', 1e-2),
                                   ('m', 1e-3),
                                   ('u', 1e-6),
                                   ('n', 1e-9),
                                   ('p', 1e-12),
                                   ('f', 1e-15),
                                   ('a', 1e-18),
                                   ('z', 1e-21),
                                   ('y', 1e-24)];

/// Shorthand for building a unit from its lane exponents
/// (m, kg, s, A, K, mol, cd, bit).
const fn dim(lanes: [i8; LANES]) -> Unit {
    Unit::from_lanes(lanes)
}

/// Name table for physical units.
///
/// Maps a unit name to its multiplier relative to the SI base units and its
/// dimension. Lookups also accept a single-letter metric prefix in front of
/// any known name; an exact match always wins over a prefixed reading, so
/// `min` is minutes rather than milli-inches and `h` is hours.
///
/// # Example
/// ```
/// use abacus::interpreter::value::{unit::Unit, unit_table::UnitTable};
///
/// let table = UnitTable::default();
/// let (factor, unit) = table.lookup("km").unwrap();
/// assert_eq!(factor, 1000.0);
/// assert_eq!(unit, Unit::base(0));
/// assert!(table.lookup("furlong").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct UnitTable {
    units: HashMap<String, (f64, Unit)>,
}

impl UnitTable {
    /// A table that knows no units at all.
    #[must_use]
    pub fn empty() -> Self {
        Self { units: HashMap::new() }
    }

    /// The SI base units plus the common derived and customary ones.
    #[must_use]
    pub fn si() -> Self {
        let mut table = Self::empty();
        let entries: [(&str, f64, Unit); 24] = [("m", 1.0, dim([1, 0, 0, 0, 0, 0, 0, 0])),
                                                ("g", 1e-3, dim([0, 1, 0, 0, 0, 0, 0, 0])),
                                                ("kg", 1.0, dim([0, 1, 0, 0, 0, 0, 0, 0])),
                                                ("s", 1.0, dim([0, 0, 1, 0, 0, 0, 0, 0])),
                                                ("A", 1.0, dim([0, 0, 0, 1, 0, 0, 0, 0])),
                                                ("K", 1.0, dim([0, 0, 0, 0, 1, 0, 0, 0])),
                                                ("mol", 1.0, dim([0, 0, 0, 0, 0, 1, 0, 0])),
                                                ("cd", 1.0, dim([0, 0, 0, 0, 0, 0, 1, 0])),
                                                ("bit", 1.0, dim([0, 0, 0, 0, 0, 0, 0, 1])),
                                                ("B", 8.0, dim([0, 0, 0, 0, 0, 0, 0, 1])),
                                                ("Hz", 1.0, dim([0, 0, -1, 0, 0, 0, 0, 0])),
                                                ("N", 1.0, dim([1, 1, -2, 0, 0, 0, 0, 0])),
                                                ("Pa", 1.0, dim([-1, 1, -2, 0, 0, 0, 0, 0])),
                                                ("J", 1.0, dim([2, 1, -2, 0, 0, 0, 0, 0])),
                                                ("W", 1.0, dim([2, 1, -3, 0, 0, 0, 0, 0])),
                                                ("C", 1.0, dim([0, 0, 1, 1, 0, 0, 0, 0])),
                                                ("V", 1.0, dim([2, 1, -3, -1, 0, 0, 0, 0])),
                                                ("ohm", 1.0, dim([2, 1, -3, -2, 0, 0, 0, 0])),
                                                ("F", 1.0, dim([-2, -1, 4, 2, 0, 0, 0, 0])),
                                                ("T", 1.0, dim([0, 1, -2, -1, 0, 0, 0, 0])),
                                                ("L", 1e-3, dim([3, 0, 0, 0, 0, 0, 0, 0])),
                                                ("min", 60.0, dim([0, 0, 1, 0, 0, 0, 0, 0])),
                                                ("h", 3600.0, dim([0, 0, 1, 0, 0, 0, 0, 0])),
                                                ("day", 86_400.0, dim([0, 0, 1, 0, 0, 0, 0, 0]))];
        for (name, multiplier, unit) in entries {
            table.insert(name, multiplier, unit);
        }
        table
    }

    /// Adds or replaces a unit name.
    pub fn insert(&mut self, name: &str, multiplier: f64, unit: Unit) {
        self.units.insert(name.to_string(), (multiplier, unit));
    }

    /// Looks up a unit name, optionally carrying a metric prefix.
    ///
    /// Returns the multiplier relative to SI base units and the dimension.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<(f64, Unit)> {
        if let Some(&entry) = self.units.get(name) {
            return Some(entry);
        }
        let mut chars = name.chars();
        let prefix = chars.next()?;
        let rest = chars.as_str();
        if rest.is_empty() {
            return None;
        }
        let (_, scale) = PREFIXES.iter().find(|(p, _)| *p == prefix)?;
        self.units.get(rest).map(|&(multiplier, unit)| (multiplier * scale, unit))
    }
}

impl Default for UnitTable {
    fn default() -> Self {
        Self::si()
    }
}
