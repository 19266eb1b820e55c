//! Course catalog domain.
//!
//! # Data Flow
//! ```text
//! add form submission
//!     → model.rs (validate required fields)
//!     → store.rs (append to flat JSON file)
//!
//! list / detail view
//!     → store.rs (load full file, optional lookup by code)
//! ```
//!
//! # Design Decisions
//! - Courses are immutable once stored; no update or delete
//! - The flat file is the single source of truth; no in-memory cache

pub mod model;
pub mod store;

pub use model::{Course, CourseForm};
pub use store::{JsonFileStore, StorageError};
