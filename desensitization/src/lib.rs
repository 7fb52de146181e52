//! Desensitizing log layouts.
//!
//! This crate intercepts structured log events before they are written, finds
//! configured sensitive fields inside the serialized payload, and masks their
//! values while leaving the rest of the line intact.
//!
//! The pipeline has three layers:
//! - **Masking** ([`MaskPolicy`]): how one value is obscured.
//! - **Scanning** ([`FieldScanner`]): where sensitive values sit in serialized text.
//! - **Layouts** ([`DesensitizationLayout`], [`PatternLayout`]): how a
//!   [`LogEvent`] becomes a line.
//!
//! Layouts are selected by name through a [`LayoutRegistry`], configured with
//! [`LayoutConfig`], and wired into `slog` by the `slog` feature.
//!
//! What this crate does not do:
//! - parse JSON in general; scanning is a textual approximation
//! - write, rotate, or ship log files
//! - install a global logger

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::option_if_let_else
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

mod config;
mod error;
mod event;
mod layout;
mod mask;
mod registry;
mod scanner;
#[cfg(feature = "slog")]
pub mod slog;

pub use config::{
    AppenderConfig, CategoryConfig, DesensitizationSwitch, LoggingConfig, DESENSITIZATION_FLAG_ENV,
};
pub use error::{Error, Result};
pub use event::{Level, LogEvent, LogEventBuilder, Payload};
pub use layout::{
    desensitize, make_layout, DesensitizationLayout, Layout, LayoutConfig, PatternLayout,
    DEFAULT_PATTERN, DESENSITIZATION_LAYOUT, PATTERN_LAYOUT, PREFIX_TIME_FORMAT,
};
pub use mask::{mask, mask_value, MaskPolicy, DEFAULT_MASK_CHAR};
pub use registry::{LayoutFactory, LayoutRegistry};
pub use scanner::{scan, FieldScanner, SensitiveFieldMatch};
