#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

pub mod airtable;
pub mod openai;
pub mod retry;

pub use airtable::AirtableSink;
pub use openai::OpenAiVisionProvider;
pub use retry::{RetryPolicy, retry_with_backoff};
