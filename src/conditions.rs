//! Read-only views over Dark Sky forecast data points.
//!
//! A forecast response carries up to three shapes: the `currently` object,
//! `hourly.data` entries and `daily.data` entries. All of them share one
//! field layout with per-shape gaps (e.g. `temperatureMin` only exists on
//! daily entries), so a single [`DataPoint`] with optional fields covers
//! every case and absent fields simply read as `None`.

use chrono::DateTime;
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

/// One forecast data point as returned by the upstream API.
///
/// No schema validation is applied: unknown fields are ignored and missing
/// fields deserialize to `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataPoint {
    pub time: Option<i64>,
    pub summary: Option<String>,
    pub icon: Option<String>,
    pub temperature: Option<f64>,
    pub apparent_temperature: Option<f64>,
    pub temperature_min: Option<f64>,
    pub temperature_min_time: Option<i64>,
    pub temperature_max: Option<f64>,
    pub temperature_max_time: Option<i64>,
    pub dew_point: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_gust: Option<f64>,
    pub wind_bearing: Option<f64>,
    pub cloud_cover: Option<f64>,
    pub uv_index: Option<f64>,
    pub visibility: Option<f64>,
    pub ozone: Option<f64>,
    pub precip_intensity: Option<f64>,
    pub precip_intensity_max: Option<f64>,
    pub precip_accumulation: Option<f64>,
    pub precip_type: Option<String>,
    pub precip_probability: Option<f64>,
    pub nearest_storm_distance: Option<f64>,
    pub nearest_storm_bearing: Option<f64>,
    pub moon_phase: Option<f64>,
    pub sunrise_time: Option<i64>,
    pub sunset_time: Option<i64>,
}

/// Top-level forecast response envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Forecast {
    pub currently: Option<DataPoint>,
    pub hourly: Option<DataBlock>,
    pub daily: Option<DataBlock>,
}

/// A `hourly`/`daily` block: an array of data points plus block-level
/// summary fields we don't surface.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct DataBlock {
    #[serde(default)]
    pub data: Vec<DataPoint>,
}

/// Immutable view over one data point, labelled with its location name.
///
/// Every accessor reads the like-named upstream field and returns `None`
/// when the upstream omitted it.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditions {
    name: String,
    data: DataPoint,
}

impl Conditions {
    pub(crate) fn new(data: DataPoint, name: &str) -> Self {
        Self {
            name: name.to_string(),
            data,
        }
    }

    /// Name of the location this view belongs to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The underlying data point.
    pub fn raw(&self) -> &DataPoint {
        &self.data
    }

    /// Unix timestamp of the data point.
    pub fn time(&self) -> Option<i64> {
        self.data.time
    }

    /// The timestamp rendered with a caller-supplied strftime string,
    /// e.g. `"%H:%M"`. Returns `None` when the timestamp is absent or the
    /// format string is malformed.
    pub fn time_formatted(&self, format: &str) -> Option<String> {
        let dt = DateTime::from_timestamp(self.data.time?, 0)?;

        let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
        if items.iter().any(|item| matches!(item, Item::Error)) {
            return None;
        }

        Some(dt.format_with_items(items.into_iter()).to_string())
    }

    /// Human-readable summary of the conditions.
    pub fn summary(&self) -> Option<&str> {
        self.data.summary.as_deref()
    }

    /// Machine-readable icon name, e.g. `"partly-cloudy-day"`.
    pub fn icon(&self) -> Option<&str> {
        self.data.icon.as_deref()
    }

    pub fn temperature(&self) -> Option<f64> {
        self.data.temperature
    }

    pub fn apparent_temperature(&self) -> Option<f64> {
        self.data.apparent_temperature
    }

    /// Daily only: minimum temperature of the day.
    pub fn temperature_min(&self) -> Option<f64> {
        self.data.temperature_min
    }

    /// Daily only: when the minimum occurs.
    pub fn temperature_min_time(&self) -> Option<i64> {
        self.data.temperature_min_time
    }

    /// Daily only: maximum temperature of the day.
    pub fn temperature_max(&self) -> Option<f64> {
        self.data.temperature_max
    }

    /// Daily only: when the maximum occurs.
    pub fn temperature_max_time(&self) -> Option<i64> {
        self.data.temperature_max_time
    }

    pub fn dew_point(&self) -> Option<f64> {
        self.data.dew_point
    }

    /// Relative humidity between 0 and 1.
    pub fn humidity(&self) -> Option<f64> {
        self.data.humidity
    }

    pub fn pressure(&self) -> Option<f64> {
        self.data.pressure
    }

    pub fn wind_speed(&self) -> Option<f64> {
        self.data.wind_speed
    }

    pub fn wind_gust(&self) -> Option<f64> {
        self.data.wind_gust
    }

    /// Wind origin direction in degrees, clockwise from true north.
    pub fn wind_bearing(&self) -> Option<f64> {
        self.data.wind_bearing
    }

    /// Cloud cover between 0 and 1.
    pub fn cloud_cover(&self) -> Option<f64> {
        self.data.cloud_cover
    }

    pub fn uv_index(&self) -> Option<f64> {
        self.data.uv_index
    }

    pub fn visibility(&self) -> Option<f64> {
        self.data.visibility
    }

    pub fn ozone(&self) -> Option<f64> {
        self.data.ozone
    }

    pub fn precip_intensity(&self) -> Option<f64> {
        self.data.precip_intensity
    }

    /// Daily only: peak precipitation intensity of the day.
    pub fn precip_intensity_max(&self) -> Option<f64> {
        self.data.precip_intensity_max
    }

    /// Snow accumulation, where applicable.
    pub fn precip_accumulation(&self) -> Option<f64> {
        self.data.precip_accumulation
    }

    /// `"rain"`, `"snow"` or `"sleet"`.
    pub fn precip_type(&self) -> Option<&str> {
        self.data.precip_type.as_deref()
    }

    /// Probability of precipitation between 0 and 1.
    pub fn precip_probability(&self) -> Option<f64> {
        self.data.precip_probability
    }

    /// Current only: distance to the nearest storm.
    pub fn nearest_storm_distance(&self) -> Option<f64> {
        self.data.nearest_storm_distance
    }

    /// Current only: bearing of the nearest storm.
    pub fn nearest_storm_bearing(&self) -> Option<f64> {
        self.data.nearest_storm_bearing
    }

    /// Daily only: fractional lunation, 0 = new moon, 0.5 = full moon.
    pub fn moon_phase(&self) -> Option<f64> {
        self.data.moon_phase
    }

    /// Daily only: sunrise as a Unix timestamp.
    pub fn sunrise_time(&self) -> Option<i64> {
        self.data.sunrise_time
    }

    /// Daily only: sunset as a Unix timestamp.
    pub fn sunset_time(&self) -> Option<i64> {
        self.data.sunset_time
    }
}
