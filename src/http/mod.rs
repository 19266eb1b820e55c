//! HTTP surface.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, dispatch)
//!     → request.rs (request ID, metadata extraction)
//!     → handlers.rs (thin bodies inside the instrumentation wrapper)
//!     → pages.rs (inline HTML rendering)
//!     → Send to client
//! ```

pub mod handlers;
pub mod pages;
pub mod request;
pub mod server;

pub use request::{MakeCatalogRequestId, RequestMeta, X_REQUEST_ID};
pub use server::{AppState, CatalogServer};
