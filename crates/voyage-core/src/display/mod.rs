//! Display formatting functions and result types.
//!
//! This module provides helper functions for formatting collections and wrapper
//! types for operation results, enabling consistent formatting across different
//! output contexts (lists, operations, etc.).
//!
//! # Architecture: Display Functions and Wrappers
//!
//! The Display architecture combines direct Display implementations on domain
//! models with formatting functions for collections and wrapper types for
//! operation results. This approach provides both idiomatic Rust patterns and
//! context-specific formatting.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │ Format Functions│    │   Formatted     │
//! │ (Trip, Day,     │───▶│ & Result Types  │───▶│    Output       │
//! │  Event)         │    │                 │    │   (Terminal)    │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`collections`]: Collection wrapper types (Trips, Days, Events)
//! - [`results`]: Operation result types (CreateResult, UpdateResult, DeleteResult)
//! - [`status`]: Status and confirmation messages (OperationStatus)
//! - [`datetime`]: Date/time formatting utilities
//! - [`models`]: Display implementations for domain models
//!
//! ## Design Principles
//!
//! 1. **Immutable Wrappers**: Wrappers hold owned data handed over by the caller
//! 2. **Markdown Output**: All formatters produce markdown for rich terminal
//!    display
//! 3. **Consistent Structure**: Headers, metadata, content follow standard
//!    patterns

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

// Re-export commonly used types for convenience
pub use collections::{Days, Events, Trips};
pub use datetime::LocalDateTime;
pub use results::{CreateResult, DeleteResult, UpdateResult};
pub use status::OperationStatus;
