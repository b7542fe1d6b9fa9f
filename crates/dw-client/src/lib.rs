//! Completion service client for docwatch.
//!
//! [`DocumentationClient`] is the seam the change coordinator calls through;
//! [`CompletionClient`] implements it against a local HTTP service that
//! accepts `{"prompt": ...}` on `POST /completion` and answers with
//! `{"content": ...}`.
//!
//! Every call makes exactly one request, bounded by the configured timeout.
//! Failures come back as [`GenerateError::Transport`] (nothing usable came
//! back over the wire) or [`GenerateError::ResponseFormat`] (the service
//! answered with something other than a completion).

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod client;
pub mod error;
pub mod prompt;

pub use client::{CompletionClient, DocumentationClient};
pub use error::{ClientBuildError, GenerateError};
pub use prompt::{CompletionRequest, build_prompt};
