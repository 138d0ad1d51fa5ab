//! Watch records.
//!
//! A watch is persisted as a single delimited string so that any key/value
//! store can hold it: `target;;origin;;destination;;route`.

use super::{DomainError, RouteId, StationId};

/// Field separator in the stored form.
const SEPARATOR: &str = ";;";

/// A request to be told when a route has free seats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Watch {
    /// Where notifications are delivered (a webhook URL)
    pub target: String,
    /// Boarding station
    pub origin: StationId,
    /// Alighting station
    pub destination: StationId,
    /// Watched route
    pub route: RouteId,
}

impl Watch {
    /// Creates a new watch.
    ///
    /// The target must be non-blank and must not contain the field
    /// separator, otherwise the stored record could not be decoded.
    pub fn new(
        target: impl Into<String>,
        origin: StationId,
        destination: StationId,
        route: RouteId,
    ) -> Result<Self, DomainError> {
        let target = target.into();
        if target.trim().is_empty() {
            return Err(DomainError::InvalidTarget("must not be empty"));
        }
        if target.contains(SEPARATOR) {
            return Err(DomainError::InvalidTarget("must not contain \";;\""));
        }

        Ok(Self {
            target,
            origin,
            destination,
            route,
        })
    }

    /// Encode into the stored form.
    pub fn encode(&self) -> String {
        [
            self.target.as_str(),
            &self.origin.to_string(),
            &self.destination.to_string(),
            &self.route.to_string(),
        ]
        .join(SEPARATOR)
    }

    /// Decode a stored record.
    ///
    /// # Examples
    ///
    /// ```
    /// use seat_watch::domain::Watch;
    ///
    /// let watch = Watch::decode("https://hooks.example/1;;10;;20;;300").unwrap();
    /// assert_eq!(watch.target, "https://hooks.example/1");
    /// assert_eq!(watch.route.get(), 300);
    ///
    /// assert!(Watch::decode("https://hooks.example/1;;10;;20").is_err());
    /// ```
    pub fn decode(raw: &str) -> Result<Self, DomainError> {
        let parts: Vec<&str> = raw.split(SEPARATOR).collect();
        let [target, origin, destination, route] = parts.as_slice() else {
            return Err(DomainError::MalformedWatch(format!(
                "expected 4 fields, got {}",
                parts.len()
            )));
        };

        let origin = StationId::parse(origin)
            .map_err(|e| DomainError::MalformedWatch(format!("origin: {e}")))?;
        let destination = StationId::parse(destination)
            .map_err(|e| DomainError::MalformedWatch(format!("destination: {e}")))?;
        let route =
            RouteId::parse(route).map_err(|e| DomainError::MalformedWatch(format!("route: {e}")))?;

        Self::new(*target, origin, destination, route)
            .map_err(|e| DomainError::MalformedWatch(e.to_string()))
    }
}
