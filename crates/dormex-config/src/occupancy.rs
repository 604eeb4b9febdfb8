//! Room occupancy policy.
//!
//! `Detached` keeps the student's room reference and the room's occupancy
//! counter independent: the counter only moves through the explicit
//! increment/decrement endpoints. `Coupled` moves the counter whenever a
//! student's room reference is set, replaced or cleared.

use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OccupancyPolicy {
    #[default]
    Detached,
    Coupled,
}

impl OccupancyPolicy {
    pub fn from_env() -> Self {
        match std::env::var("ROOM_OCCUPANCY_POLICY") {
            Ok(value) => value.parse().unwrap_or_else(|_| {
                tracing::warn!(%value, "unknown ROOM_OCCUPANCY_POLICY, using detached");
                Self::Detached
            }),
            Err(_) => Self::Detached,
        }
    }

    pub fn is_coupled(&self) -> bool {
        matches!(self, Self::Coupled)
    }
}

impl FromStr for OccupancyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "detached" => Ok(Self::Detached),
            "coupled" => Ok(Self::Coupled),
            other => Err(format!("invalid occupancy policy: {}", other)),
        }
    }
}

impl fmt::Display for OccupancyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Detached => f.write_str("detached"),
            Self::Coupled => f.write_str("coupled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Coupled".parse::<OccupancyPolicy>(), Ok(OccupancyPolicy::Coupled));
        assert_eq!(" detached ".parse::<OccupancyPolicy>(), Ok(OccupancyPolicy::Detached));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("strict".parse::<OccupancyPolicy>().is_err());
    }

    #[test]
    fn test_default_is_detached() {
        assert_eq!(OccupancyPolicy::default(), OccupancyPolicy::Detached);
        assert!(!OccupancyPolicy::default().is_coupled());
    }
}
