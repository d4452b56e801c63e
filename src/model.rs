use std::convert::TryFrom;

use serde::{Deserialize, Serialize};

use crate::error::DarkSkyError;

/// Placeholder used when a location was supplied without a name.
pub const UNNAMED_LOCATION: &str = "no name provided";

/// A named coordinate pair to request a forecast for.
///
/// Supplied by the caller per request and never retained by the client
/// beyond that call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            name: None,
            latitude,
            longitude,
        }
    }

    pub fn named(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: Some(name.into()),
            latitude,
            longitude,
        }
    }

    /// The location's name, or a fixed placeholder if none was given.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNNAMED_LOCATION)
    }
}

/// Which projection of a forecast response the caller asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    /// The `currently` object: one view per location.
    Current,
    /// The `hourly` entries falling on the current calendar day.
    Today,
    /// The `daily` entries, one view per day.
    Week,
}

impl ViewKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewKind::Current => "current",
            ViewKind::Today => "today",
            ViewKind::Week => "week",
        }
    }

    pub const fn all() -> &'static [ViewKind] {
        &[ViewKind::Current, ViewKind::Today, ViewKind::Week]
    }

    /// Name of the response block this view reads from.
    pub(crate) fn block_name(&self) -> &'static str {
        match self {
            ViewKind::Current => "currently",
            ViewKind::Today => "hourly",
            ViewKind::Week => "daily",
        }
    }
}

impl std::fmt::Display for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ViewKind {
    type Error = DarkSkyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "current" => Ok(ViewKind::Current),
            "today" => Ok(ViewKind::Today),
            "week" => Ok(ViewKind::Week),
            _ => Err(DarkSkyError::UnknownViewKind(value.to_string())),
        }
    }
}

/// Conversion of caller input into an ordered location sequence.
///
/// A lone [`Location`] is wrapped into a one-element vec; a vec passes
/// through untouched, so already-sequenced input keeps its allocation.
pub trait IntoLocations {
    fn into_locations(self) -> Vec<Location>;
}

impl IntoLocations for Location {
    fn into_locations(self) -> Vec<Location> {
        vec![self]
    }
}

impl IntoLocations for Vec<Location> {
    fn into_locations(self) -> Vec<Location> {
        self
    }
}

impl IntoLocations for &[Location] {
    fn into_locations(self) -> Vec<Location> {
        self.to_vec()
    }
}
