//! Course Catalog Service
//!
//! A small web application whose engineering content is the observability
//! wrapper around each HTTP handler.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────┐
//!                     │              COURSE CATALOG                  │
//!                     │                                              │
//!   Client Request    │  ┌─────────┐   ┌────────────┐   ┌─────────┐ │
//!   ──────────────────┼─▶│  http   │──▶│ instrument │──▶│ catalog │ │
//!                     │  │ server  │   │  wrapper   │   │  store  │ │
//!                     │  └─────────┘   └─────┬──────┘   └─────────┘ │
//!                     │                      │                       │
//!                     │                      ▼                       │
//!                     │  ┌────────────────────────────────────────┐  │
//!                     │  │           observability                │  │
//!                     │  │  ┌──────┐  ┌─────────┐  ┌───────────┐  │  │
//!                     │  │  │ span │  │ metrics │  │  logging  │  │  │
//!                     │  │  └──────┘  └─────────┘  └───────────┘  │  │
//!                     │  └────────────────────────────────────────┘  │
//!                     │                                              │
//!                     │  ┌─────────┐  ┌───────────┐                  │
//!                     │  │ config  │  │ lifecycle │                  │
//!                     │  └─────────┘  └───────────┘                  │
//!                     └──────────────────────────────────────────────┘
//! ```
//!
//! Every request that enters the wrapper produces exactly one request
//! counter increment, one span (opened and sealed by RAII), one terminal
//! log event, and one processing-time observation.

// Core subsystems
pub mod catalog;
pub mod config;
pub mod http;

// Cross-cutting concerns
pub mod error;
pub mod lifecycle;
pub mod observability;

pub use config::CatalogConfig;
pub use error::AppError;
pub use http::CatalogServer;
pub use lifecycle::Shutdown;
