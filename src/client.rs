use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use futures_util::future::try_join_all;
use reqwest::Client;
use std::fmt::Debug;
use tracing::{debug, warn};

use crate::conditions::{Conditions, DataBlock, DataPoint, Forecast};
use crate::config::Config;
use crate::error::DarkSkyError;
use crate::model::{IntoLocations, Location, UNNAMED_LOCATION, ViewKind};

/// The one suspension point of the client: a single HTTP GET.
///
/// Production code uses [`HttpTransport`]; tests swap in stubs via
/// [`DarkSky::with_transport`].
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    /// Fetch `url` and return the response body on a 2xx status.
    async fn get(&self, url: &str) -> Result<String, DarkSkyError>;
}

/// Default [`Transport`] backed by reqwest.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            http: Client::new(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<String, DarkSkyError> {
        let res = self.http.get(url).send().await?;

        let status = res.status();
        if !status.is_success() {
            let status_text = status.canonical_reason().unwrap_or("unknown").to_string();
            warn!(url = %url, status = status.as_u16(), %status_text, "forecast request failed");
            return Err(DarkSkyError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                status_text,
            });
        }

        Ok(res.text().await?)
    }
}

/// Client for the Dark Sky forecast API.
///
/// Holds the request URL base (computed once from the [`Config`]) and a
/// [`Transport`]. Each public method takes the locations for one call and
/// fans out one GET per location; nothing is retained between calls.
#[derive(Debug)]
pub struct DarkSky {
    base_url: String,
    transport: Box<dyn Transport>,
}

impl DarkSky {
    /// Build a client talking HTTP via reqwest.
    ///
    /// Fails when the config carries neither an API key nor a proxy
    /// script, or when the proxy script is not a valid URL.
    pub fn new(config: Config) -> Result<Self, DarkSkyError> {
        Self::with_transport(config, Box::new(HttpTransport::new()))
    }

    /// Build a client with a caller-supplied transport.
    pub fn with_transport(
        config: Config,
        transport: Box<dyn Transport>,
    ) -> Result<Self, DarkSkyError> {
        let base_url = config.base_url()?;
        Ok(Self {
            base_url,
            transport,
        })
    }

    /// Request URL for one coordinate pair. Pure string concatenation,
    /// no escaping beyond what the config already validated.
    pub fn build_url(&self, latitude: f64, longitude: f64) -> String {
        format!("{}{latitude},{longitude}", self.base_url)
    }

    /// Fetch the raw forecast JSON for one coordinate pair.
    pub async fn fetch_one(&self, latitude: f64, longitude: f64) -> Result<String, DarkSkyError> {
        let url = self.build_url(latitude, longitude);
        debug!(url = %url, "fetching forecast");
        self.transport.get(&url).await
    }

    /// Fetch raw forecasts for every location concurrently.
    ///
    /// Result positions correspond to input positions; the first failure
    /// fails the whole batch (`Promise.all` semantics).
    pub async fn fetch_all(&self, locations: &[Location]) -> Result<Vec<String>, DarkSkyError> {
        try_join_all(
            locations
                .iter()
                .map(|loc| self.fetch_one(loc.latitude, loc.longitude)),
        )
        .await
    }

    /// Parse raw response bodies and project them into condition views.
    ///
    /// Each element of the outer vec corresponds to the location at the
    /// same index; the inner vec holds one view for [`ViewKind::Current`]
    /// and one view per matching entry for the other kinds.
    pub fn transform(
        &self,
        raw: &[String],
        locations: &[Location],
        kind: ViewKind,
    ) -> Result<Vec<Vec<Conditions>>, DarkSkyError> {
        check_payload(raw)?;
        let today = Utc::now().date_naive();

        let mut sets = Vec::with_capacity(raw.len());
        for (i, body) in raw.iter().enumerate() {
            let forecast: Forecast = serde_json::from_str(body)?;
            let name = locations
                .get(i)
                .map_or(UNNAMED_LOCATION, Location::display_name);

            sets.push(project(forecast, name, kind, today)?);
        }
        Ok(sets)
    }

    /// Current conditions for each location, in input order.
    pub async fn get_current_conditions(
        &self,
        locations: impl IntoLocations,
    ) -> Result<Vec<Conditions>, DarkSkyError> {
        let sets = self.request(locations, ViewKind::Current).await?;
        Ok(sets.into_iter().flatten().collect())
    }

    /// Hourly conditions for the rest of the current calendar day, one
    /// inner vec per location.
    pub async fn get_forecast_today(
        &self,
        locations: impl IntoLocations,
    ) -> Result<Vec<Vec<Conditions>>, DarkSkyError> {
        self.request(locations, ViewKind::Today).await
    }

    /// Day-by-day conditions for the coming week, one inner vec per
    /// location.
    pub async fn get_forecast_week(
        &self,
        locations: impl IntoLocations,
    ) -> Result<Vec<Vec<Conditions>>, DarkSkyError> {
        self.request(locations, ViewKind::Week).await
    }

    async fn request(
        &self,
        locations: impl IntoLocations,
        kind: ViewKind,
    ) -> Result<Vec<Vec<Conditions>>, DarkSkyError> {
        let locations = locations.into_locations();

        let raw = match self.fetch_all(&locations).await {
            Ok(raw) => raw,
            Err(err) => {
                warn!(view = %kind, error = %err, "forecast fetch failed");
                return Err(err);
            }
        };

        self.transform(&raw, &locations, kind)
    }
}

/// Reject batches the upstream answered with nothing usable.
fn check_payload(raw: &[String]) -> Result<(), DarkSkyError> {
    if raw.is_empty() || raw[0].is_empty() {
        warn!("there was a problem accessing darksky.net; make sure you have a valid key");
        return Err(DarkSkyError::EmptyPayload);
    }
    Ok(())
}

fn project(
    forecast: Forecast,
    name: &str,
    kind: ViewKind,
    today: NaiveDate,
) -> Result<Vec<Conditions>, DarkSkyError> {
    let missing = || DarkSkyError::MissingBlock(kind.block_name());

    let entries = match kind {
        ViewKind::Current => vec![forecast.currently.ok_or_else(missing)?],
        ViewKind::Today => filter_today(forecast.hourly.ok_or_else(missing)?, today),
        ViewKind::Week => forecast.daily.ok_or_else(missing)?.data,
    };

    Ok(entries
        .into_iter()
        .map(|point| Conditions::new(point, name))
        .collect())
}

/// Keep the hourly entries whose timestamp falls on `today` (UTC).
/// Entries without a timestamp are dropped.
fn filter_today(block: DataBlock, today: NaiveDate) -> Vec<DataPoint> {
    block
        .data
        .into_iter()
        .filter(|point| {
            point
                .time
                .and_then(|ts| DateTime::from_timestamp(ts, 0))
                .is_some_and(|dt| dt.date_naive() == today)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn client() -> DarkSky {
        DarkSky::new(Config::with_api_key("xxxyyy")).expect("config with key must build")
    }

    /// Transport that answers every request with a fixed body and counts
    /// the calls it sees.
    #[derive(Debug, Default)]
    struct StubTransport {
        body: String,
        calls: Arc<AtomicUsize>,
    }

    impl StubTransport {
        fn with_body(body: &str) -> (Box<Self>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let stub = Box::new(Self {
                body: body.to_string(),
                calls: Arc::clone(&calls),
            });
            (stub, calls)
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn get(&self, url: &str) -> Result<String, DarkSkyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            // Echo the URL so callers can check positional alignment.
            Ok(self.body.replace("{url}", url))
        }
    }

    #[test]
    fn build_url_concatenates_base_and_coords() {
        let url = client().build_url(10.0, 20.0);
        assert_eq!(url, "https://api.darksky.net/forecast/xxxyyy/10,20");
    }

    #[test]
    fn build_url_is_pure() {
        let darksky = client();
        assert_eq!(darksky.build_url(50.82, -0.13), darksky.build_url(50.82, -0.13));
    }

    #[test]
    fn construction_fails_without_credentials() {
        let err = DarkSky::new(Config::default()).unwrap_err();
        assert!(matches!(err, DarkSkyError::MissingCredentials));
    }

    #[tokio::test]
    async fn fetch_all_issues_one_request_per_location_in_order() {
        let (stub, calls) = StubTransport::with_body("{url}");
        let darksky = DarkSky::with_transport(Config::with_api_key("k"), stub)
            .expect("client must build");

        let locations = vec![
            Location::new(1.0, 2.0),
            Location::new(3.0, 4.0),
            Location::new(5.0, 6.0),
        ];

        let raw = darksky.fetch_all(&locations).await.expect("stub never fails");

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(raw.len(), 3);
        assert!(raw[0].ends_with("/1,2"));
        assert!(raw[1].ends_with("/3,4"));
        assert!(raw[2].ends_with("/5,6"));
    }

    #[tokio::test]
    async fn failed_fetch_surfaces_status_and_skips_transform() {
        #[derive(Debug)]
        struct FailTransport;

        #[async_trait]
        impl Transport for FailTransport {
            async fn get(&self, url: &str) -> Result<String, DarkSkyError> {
                Err(DarkSkyError::Status {
                    url: url.to_string(),
                    status: 403,
                    status_text: "Forbidden".to_string(),
                })
            }
        }

        let darksky = DarkSky::with_transport(Config::with_api_key("bad"), Box::new(FailTransport))
            .expect("client must build");

        let err = darksky
            .get_current_conditions(Location::new(50.82, -0.13))
            .await
            .unwrap_err();

        match err {
            DarkSkyError::Status {
                status,
                status_text,
                ..
            } => {
                assert_eq!(status, 403);
                assert_eq!(status_text, "Forbidden");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_payload_is_rejected() {
        let (stub, _calls) = StubTransport::with_body("");
        let darksky = DarkSky::with_transport(Config::with_api_key("k"), stub)
            .expect("client must build");

        let err = darksky
            .get_current_conditions(Location::new(0.0, 0.0))
            .await
            .unwrap_err();

        assert!(matches!(err, DarkSkyError::EmptyPayload));
    }

    #[test]
    fn transform_week_yields_one_view_per_daily_entry() {
        let raw = vec![r#"{"daily":{"data":[{"temperatureMax":21.4}]}}"#.to_string()];
        let locations = vec![Location::named("Brighton", 50.82, -0.13)];

        let sets = client()
            .transform(&raw, &locations, ViewKind::Week)
            .expect("valid daily payload must transform");

        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].len(), 1);
        assert_eq!(sets[0][0].name(), "Brighton");
        assert_eq!(sets[0][0].temperature_max(), Some(21.4));
    }

    #[test]
    fn transform_week_fails_on_missing_daily_block() {
        let raw = vec!["{}".to_string()];
        let locations = vec![Location::new(50.82, -0.13)];

        let err = client()
            .transform(&raw, &locations, ViewKind::Week)
            .unwrap_err();

        assert!(matches!(err, DarkSkyError::MissingBlock("daily")));
    }

    #[test]
    fn transform_current_yields_single_view() {
        let raw = vec![r#"{"currently":{"temperature":17.92,"summary":"Clear"}}"#.to_string()];
        let locations = vec![Location::new(50.82, -0.13)];

        let sets = client()
            .transform(&raw, &locations, ViewKind::Current)
            .expect("valid currently payload must transform");

        assert_eq!(sets[0].len(), 1);
        assert_eq!(sets[0][0].name(), "no name provided");
        assert_eq!(sets[0][0].temperature(), Some(17.92));
    }

    #[test]
    fn transform_current_fails_on_missing_block() {
        let raw = vec![r#"{"hourly":{"data":[]}}"#.to_string()];
        let locations = vec![Location::new(50.82, -0.13)];

        let err = client()
            .transform(&raw, &locations, ViewKind::Current)
            .unwrap_err();

        assert!(matches!(err, DarkSkyError::MissingBlock("currently")));
    }

    #[test]
    fn transform_today_keeps_only_entries_of_the_current_day() {
        let now = Utc::now().timestamp();
        let two_days_ago = now - 2 * 24 * 3600;
        let raw = vec![format!(
            r#"{{"hourly":{{"data":[
                {{"time":{now},"temperature":12.0}},
                {{"time":{two_days_ago},"temperature":9.0}},
                {{"temperature":30.0}}
            ]}}}}"#
        )];
        let locations = vec![Location::named("Lviv", 49.84, 24.03)];

        let sets = client()
            .transform(&raw, &locations, ViewKind::Today)
            .expect("valid hourly payload must transform");

        assert_eq!(sets[0].len(), 1);
        assert_eq!(sets[0][0].temperature(), Some(12.0));
    }

    #[test]
    fn transform_rejects_empty_batch() {
        let err = client()
            .transform(&[], &[], ViewKind::Current)
            .unwrap_err();

        assert!(matches!(err, DarkSkyError::EmptyPayload));
    }

    #[test]
    fn transform_rejects_malformed_json() {
        let raw = vec!["not json".to_string()];
        let locations = vec![Location::new(0.0, 0.0)];

        let err = client()
            .transform(&raw, &locations, ViewKind::Current)
            .unwrap_err();

        assert!(matches!(err, DarkSkyError::Json(_)));
    }

    #[test]
    fn filter_today_drops_other_days_and_timeless_entries() {
        let day = NaiveDate::from_ymd_opt(2017, 6, 3).expect("valid date");
        let block = DataBlock {
            data: vec![
                DataPoint {
                    time: Some(1_496_465_204), // 2017-06-03 05:26 UTC
                    ..DataPoint::default()
                },
                DataPoint {
                    time: Some(1_496_551_604), // 2017-06-04
                    ..DataPoint::default()
                },
                DataPoint::default(),
            ],
        };

        let kept = filter_today(block, day);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].time, Some(1_496_465_204));
    }
}
