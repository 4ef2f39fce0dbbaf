//! UI layer for the planner shell: app state, the three screens and shared
//! styling.

pub mod app;
pub mod destinations;
pub mod itinerary;
pub mod landing;
pub mod theme;

pub use app::{PlannerApp, StartupConfig};
