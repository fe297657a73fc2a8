//! Error taxonomy for stablekey.
//!
//! Analyzers themselves never fail; every error here is raised either while
//! building configuration or while turning raw input into feeds.

/// Errors raised while building an [`ArchConfig`](crate::arch::ArchConfig)
/// or selecting checks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("no arches configured")]
    EmptyArches,

    #[error("stable arch set is empty")]
    EmptyStableArches,

    #[error("source arch set is empty")]
    EmptySourceArches,

    #[error("invalid arch token: {token:?}")]
    InvalidArch { token: String },

    #[error("stable arch {arch} is not a known arch")]
    UnknownStableArch { arch: String },

    #[error("unknown check: {name}")]
    UnknownCheck { name: String },

    #[error("max_concurrent must be at least 1")]
    ZeroConcurrency,
}

/// Errors raised while grouping version records into package feeds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedError {
    #[error("version record #{index} is missing {field}")]
    MissingField { index: usize, field: &'static str },

    #[error("package {category}/{package} reappears at record #{index} after other packages")]
    NonContiguousPackage {
        category: String,
        package: String,
        index: usize,
    },
}

/// stablekey errors.
#[derive(Debug, thiserror::Error)]
pub enum StablekeyError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("scan task failed: {0}")]
    Task(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for stablekey operations.
pub type Result<T> = std::result::Result<T, StablekeyError>;
