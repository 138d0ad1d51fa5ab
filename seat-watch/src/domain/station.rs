//! Station and route identifier types.

use std::fmt;

/// Error returned when parsing an invalid numeric identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} id: {reason}")]
pub struct InvalidId {
    kind: &'static str,
    reason: &'static str,
}

/// Parse a positive decimal identifier, rejecting signs and whitespace.
fn parse_positive(s: &str, kind: &'static str) -> Result<i64, InvalidId> {
    if s.is_empty() {
        return Err(InvalidId {
            kind,
            reason: "must not be empty",
        });
    }

    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InvalidId {
            kind,
            reason: "must contain only ASCII digits",
        });
    }

    match s.parse::<i64>() {
        Ok(0) => Err(InvalidId {
            kind,
            reason: "must be positive",
        }),
        Ok(n) => Ok(n),
        Err(_) => Err(InvalidId {
            kind,
            reason: "out of range",
        }),
    }
}

/// A station identifier as published by the upstream timetable.
///
/// Identifiers are positive integers. They are unique within one route's
/// timetable, though a looping route may list the same station twice.
///
/// # Examples
///
/// ```
/// use seat_watch::domain::StationId;
///
/// let prague = StationId::parse("372825000").unwrap();
/// assert_eq!(prague.get(), 372825000);
/// assert_eq!(prague.to_string(), "372825000");
///
/// assert!(StationId::parse("").is_err());
/// assert!(StationId::parse("-5").is_err());
/// assert!(StationId::parse("12a").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationId(i64);

impl StationId {
    /// Parse a station id from its decimal representation.
    pub fn parse(s: &str) -> Result<Self, InvalidId> {
        parse_positive(s, "station").map(StationId)
    }

    /// Wrap a raw id received from the upstream API.
    pub fn from_raw(raw: i64) -> Result<Self, InvalidId> {
        if raw <= 0 {
            return Err(InvalidId {
                kind: "station",
                reason: "must be positive",
            });
        }
        Ok(StationId(raw))
    }

    /// Returns the raw numeric id.
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A bookable route (one train run between two stations on one date).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteId(i64);

impl RouteId {
    /// Parse a route id from its decimal representation.
    pub fn parse(s: &str) -> Result<Self, InvalidId> {
        parse_positive(s, "route").map(RouteId)
    }

    /// Wrap a raw id received from the upstream API.
    pub fn from_raw(raw: i64) -> Result<Self, InvalidId> {
        if raw <= 0 {
            return Err(InvalidId {
                kind: "route",
                reason: "must be positive",
            });
        }
        Ok(RouteId(raw))
    }

    /// Returns the raw numeric id.
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Debug for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RouteId({})", self.0)
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
