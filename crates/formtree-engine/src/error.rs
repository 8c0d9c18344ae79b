//! # Configuration Errors
//!
//! A schema that names an unknown entity kind, omits its kind tag, or has a
//! body of the wrong shape is a programmer error. It surfaces here, once, when
//! the schema is imported. Everything downstream of a parsed [`Schema`] is
//! infallible: rule violations in data are reported through
//! [`Errors`](crate::Errors), never through `Err`.
//!
//! Every variant carries the schema location (`at`) of the offending node,
//! written as a content path from the schema root, with `items` marking a
//! list's item schema.
//!
//! [`Schema`]: crate::Schema

use formtree_core::JsonError;
use thiserror::Error;

/// Error importing a literal schema.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// `type` is not one of `group`, `list`, `field`.
    #[error("unknown schema type '{found}' at '{at}'")]
    UnknownType {
        /// The `type` value that was found.
        found: String,
        /// Schema location.
        at: String,
    },

    /// A `field` schema whose `subtype` is not `text`, `number`, or `select`.
    #[error("unknown field subtype '{found}' at '{at}'")]
    UnknownSubtype {
        /// The `subtype` value that was found.
        found: String,
        /// Schema location.
        at: String,
    },

    /// A required discriminator key is absent or not a string.
    #[error("schema at '{at}' is missing its '{tag}' tag")]
    MissingTag {
        /// `type` or `subtype`.
        tag: &'static str,
        /// Schema location.
        at: String,
    },

    /// The schema body does not have the expected shape.
    #[error("malformed schema at '{at}': {reason}")]
    Malformed {
        /// Schema location.
        at: String,
        /// What was wrong.
        reason: String,
    },

    /// A `requires` rule is not one of the four requirement shapes.
    #[error("malformed requirement: {0}")]
    Requirement(String),

    /// Schema text is not well-formed JSON.
    #[error(transparent)]
    Json(#[from] JsonError),

    /// Schema text is not well-formed YAML.
    #[error("invalid YAML schema: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
