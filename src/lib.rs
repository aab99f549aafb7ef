//! Tasklens — natural-language task capture and periodic task analytics.
//!
//! Two pipelines around one language model: free-form text is normalized
//! into a structured task record, and a period's worth of records is turned
//! into a narrative analysis. The engineering value is in the deterministic
//! scaffolding — anchor resolution, strict post-validation, aggregation,
//! and fallback synthesis — not in the model call itself.
//!
//! See `DESIGN.md` for architecture notes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod analyze;
pub mod api;
pub mod config;
pub mod extract;
pub mod logging;
pub mod providers;
pub mod store;
pub mod types;
