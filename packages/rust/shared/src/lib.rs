//! Shared types, error model, and configuration for shiftscope.
//!
//! This crate is the foundation depended on by all other shiftscope crates.
//! It provides:
//! - [`ShiftscopeError`] — the unified error type
//! - Domain types ([`Conversation`], [`AreaKey`], [`TeamKey`], [`BucketKey`],
//!   [`ReportWindow`], [`Artifact`])
//! - Configuration ([`AppConfig`], [`FetchConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ClassifyPolicyConfig, DefaultsConfig, FetchConfig, IntercomConfig, MAX_PER_PAGE,
    UnknownAreaPolicy, api_token, config_dir, config_file_path, init_config, load_config,
    load_config_from, reference_timezone,
};
pub use error::{Result, ShiftscopeError};
pub use types::{
    AreaKey, AreaScope, Artifact, ArtifactKind, AttrValue, BucketKey, Conversation, ReportWindow,
    RunStatus, TeamKey, TeamScope, TranscriptEntry,
};
