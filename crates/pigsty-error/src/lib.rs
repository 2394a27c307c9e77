//! # pigsty-error
//!
//! A structured error that remembers where it came from and what it wraps.
//!
//! ## Design Philosophy
//!
//! - **Provenance**: `module`, `context` and `method` are read off the call stack at
//!   construction unless given explicitly
//! - **Causes**: every error may wrap the error it was raised from; [`ordered_causes`] rebuilds
//!   the throw sequence from the first failure outwards
//! - **Status**: an HTTP style status code travels outwards through a chain until a level
//!   overrides it
//! - **Immutability**: everything is decided in [`ErrorBuilder::build`]; errors have no setters
//!
//! ## Usage
//!
//! ```rust
//! use pigsty_error::StructuredError;
//!
//! let inner = StructuredError::builder()
//!     .with_message("row missing")
//!     .with_status_code(404)
//!     .build();
//! let outer = StructuredError::builder()
//!     .with_cause(inner)
//!     .with_message("could not load user")
//!     .build();
//!
//! assert_eq!(outer.status_code(), Some(404));
//! assert_eq!(pigsty_error::ordered_causes(&outer).len(), 2);
//! ```

mod cause;
mod chain;
mod error;
mod status;

pub use cause::{Cause, MessageError};
pub use chain::{ordered_causes, reverse_ordered_causes};
pub use error::{ErrorBuilder, Metadata, StructuredError};
pub use status::{HttpStatusCode, http_status_text, status_message};
