pub mod api;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod rate_limit;
pub mod state;
