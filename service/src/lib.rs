//! Service contains the business logic of the application.

#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod infra;
pub mod query;
pub mod read;

use std::time::Duration;

use derive_more::Debug;

use self::domain::Normalizer;
#[cfg(doc)]
use self::infra::Infra;

pub use self::{command::Command, query::Query};

/// [`Service`] configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// [JWT] encoding key.
    ///
    /// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
    #[debug(skip)]
    pub jwt_encoding_key: jsonwebtoken::EncodingKey,

    /// [JWT] decoding key.
    ///
    /// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
    #[debug(skip)]
    pub jwt_decoding_key: jsonwebtoken::DecodingKey,

    /// [`Duration`] a created user session remains valid for.
    pub session_ttl: Duration,
}

/// Domain service.
#[derive(Debug)]
pub struct Service<I> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Normalizer`] assembling model inputs, built from the loaded
    /// artifact's schema at startup.
    normalizer: Normalizer,

    /// [`Infra`] of this [`Service`].
    infra: I,
}

impl<I> Service<I> {
    /// Creates a new [`Service`] with the provided parameters.
    #[must_use]
    pub const fn new(config: Config, normalizer: Normalizer, infra: I) -> Self {
        Self {
            config,
            normalizer,
            infra,
        }
    }

    /// Returns [`Config`] of this [`Service`].
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the [`Normalizer`] of this [`Service`].
    #[must_use]
    pub const fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Returns [`Infra`] of this [`Service`].
    #[must_use]
    pub const fn infra(&self) -> &I {
        &self.infra
    }
}
