//! RE-DACT server: HTTP API over the protection engine.

pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
