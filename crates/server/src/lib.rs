//! HTTP surface of the GitPay badge service.
//!
//! Thin presentation glue over [`gitpay_chain`]: resolve the subject, scan its
//! donation history, and render the result as an SVG badge, a JSON document or the
//! wallet-driving donation page. Handlers are stateless; everything they need
//! arrives through [`state::AppState`].

pub mod config;
pub mod error;
pub mod handlers;
pub mod page;
pub mod router;
pub mod state;
pub mod svg;

pub use config::ServerArgs;
pub use router::build_router;
pub use state::AppState;
