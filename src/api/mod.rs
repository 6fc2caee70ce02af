//! # API Module
//!
//! HTTP endpoints served by the local [`axum`] server.
//!
//! ## Endpoints
//!
//! - [`callback`] - OAuth redirect target. Checks the `state` parameter against
//!   the running authorization and exchanges the code for a token.
//! - [`health`] - Status, name and version for quick liveness checks.
//! - [`dashboard`] - The listening dashboard: a sidebar to pick a time range or
//!   evolution mode and the number of top genres, the metric charts rendered
//!   with vega-embed, and the raw records behind them.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use spotalyze::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/health", get(health));
//! ```
//!
//! Errors raised while building the dashboard are rendered into the page
//! instead of failing the request, so the sidebar stays usable.

mod callback;
mod dashboard;
mod health;

pub use callback::callback;
pub use dashboard::{DashboardQuery, dashboard, escape_html, render_page};
pub use health::health;
