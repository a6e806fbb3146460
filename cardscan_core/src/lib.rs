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

pub mod card;
pub mod error;
pub mod extract;
pub mod image;
pub mod industry;
pub mod normalize;
pub mod scanner;
pub mod structured;

pub use card::{BusinessCard, Field};
pub use error::{CoreError, Result};
pub use extract::extract_fields;
pub use image::CardImage;
pub use industry::{INDUSTRY_KEYWORDS, INDUSTRY_LABELS, canonical_industry};
pub use normalize::{normalize, normalize_text};
pub use scanner::{CardScanner, RecordSink, ScanOutcome, VisionProvider, persist};
pub use structured::{
    ExtractionSource, Resolved, parse_structured, resolve_response, resolve_text,
};
