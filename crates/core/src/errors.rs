use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::product::ProductId;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown product `{0}`")]
    UnknownProduct(ProductId),
    #[error("no nudge is currently displayed")]
    NoActiveNudge,
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read catalog file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse catalog data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate product id `{0}` in catalog")]
    DuplicateProduct(ProductId),
    #[error("invalid catalog entry `{product_id}`: {reason}")]
    InvalidProduct { product_id: ProductId, reason: String },
    #[error("invalid catalog reference: {0}")]
    InvalidReference(String),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("could not read session snapshot `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not write session snapshot `{path}`: {source}")]
    WriteFile { path: PathBuf, source: std::io::Error },
    #[error("could not encode or decode session snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Configuration(#[from] ConfigError),
}

impl ApplicationError {
    /// Stable machine-readable class for CLI failure envelopes.
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Domain(DomainError::UnknownProduct(_)) => "unknown_product",
            Self::Domain(_) => "domain_validation",
            Self::Catalog(_) => "catalog_load",
            Self::Session(_) => "session_io",
            Self::Configuration(_) => "config_validation",
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Configuration(_) => 2,
            Self::Domain(_) | Self::Catalog(_) => 3,
            Self::Session(_) => 4,
        }
    }
}
