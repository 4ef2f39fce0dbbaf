//! Client-side core of the trip planner: itinerary loading and the
//! map/timeline sync engine, the map widget seam, and the REST client for the
//! planner backend.

pub mod api;
pub mod config;
pub mod debounce;
pub mod error;
pub mod itinerary;
pub mod locate;
pub mod map;

pub use api::PlannerApi;
pub use config::{load_settings, ClientSettings, MapCredentials};
pub use debounce::Debouncer;
pub use error::ClientError;
pub use locate::Locator;
