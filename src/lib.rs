//! Client library for the Dark Sky weather forecast API.
//!
//! This crate defines:
//! - Configuration & credentials handling (direct API key or caller-run proxy)
//! - A client that fans one HTTP GET per location out concurrently
//! - Read-only condition views over "current", "today" and "week" forecasts
//!
//! ```no_run
//! use darksky::{Config, DarkSky, Location};
//!
//! # async fn run() -> Result<(), darksky::DarkSkyError> {
//! let client = DarkSky::new(Config::with_api_key("your-key"))?;
//! let conditions = client
//!     .get_current_conditions(Location::named("Brighton", 50.82, -0.13))
//!     .await?;
//!
//! for current in &conditions {
//!     println!("{}: {:?}", current.name(), current.temperature());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod conditions;
pub mod config;
pub mod error;
pub mod model;

pub use client::{DarkSky, HttpTransport, Transport};
pub use conditions::{Conditions, DataPoint};
pub use config::Config;
pub use error::DarkSkyError;
pub use model::{IntoLocations, Location, ViewKind};
