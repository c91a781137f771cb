//! HealthLog HTTP surface: record parsing and provider configuration.

pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
