//! Calendar page: school holiday zones and holiday lookups.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const YEAR_MIN: i32 = 1900;
pub const YEAR_MAX: i32 = 2200;

/// French school holiday zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Zone {
    A,
    B,
    C,
}

impl Zone {
    pub const ALL: [Self; 3] = [Self::A, Self::B, Self::C];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
        }
    }
}

impl FromStr for Zone {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches("Zone ").to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            _ => Err(ValidationError::invalid("zone", s)),
        }
    }
}

/// Zones highlighted on the calendar page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarConfig {
    pub active_zones: Vec<Zone>,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            active_zones: Zone::ALL.to_vec(),
        }
    }
}

impl CalendarConfig {
    /// Parse, sort and deduplicate zone names.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Invalid`] for an unknown zone name.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, ValidationError> {
        let mut zones = names
            .iter()
            .map(|name| name.as_ref().parse())
            .collect::<Result<Vec<Zone>, _>>()?;
        zones.sort_unstable();
        zones.dedup();
        Ok(Self {
            active_zones: zones,
        })
    }
}

/// # Errors
///
/// Returns [`ValidationError::Invalid`] outside [`YEAR_MIN`]..=[`YEAR_MAX`].
pub fn check_year(year: i32) -> Result<i32, ValidationError> {
    if (YEAR_MIN..=YEAR_MAX).contains(&year) {
        Ok(year)
    } else {
        Err(ValidationError::invalid("year", year.to_string()))
    }
}

/// Check a `YYYY-YYYY` school year made of two consecutive years.
///
/// # Errors
///
/// Returns [`ValidationError::Invalid`] for any other shape.
pub fn check_school_year(value: &str) -> Result<&str, ValidationError> {
    let invalid = || ValidationError::invalid("school year", value);
    let (first, second) = value.split_once('-').ok_or_else(invalid)?;
    if first.len() != 4 || second.len() != 4 {
        return Err(invalid());
    }
    let first: i32 = first.parse().map_err(|_| invalid())?;
    let second: i32 = second.parse().map_err(|_| invalid())?;
    check_year(first).map_err(|_| invalid())?;
    if second != first + 1 {
        return Err(invalid());
    }
    Ok(value)
}
