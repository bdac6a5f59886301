//! Composition error taxonomy
//!
//! Resolution-time errors abort the whole `resolve_object` call - partial
//! composed objects are never returned. Enrichment failures are handled
//! separately (logged, non-fatal) and never appear here.

/// Errors surfaced by descriptor parsing, resolution and transforms
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    /// Schema metadata is not a valid query descriptor. Configuration-time
    /// bug, never retried.
    #[error("Malformed query descriptor: {0}")]
    MalformedDescriptor(String),

    /// A resource the schema requires does not exist
    #[error("Resource not found: {kind} {namespace}/{name}")]
    ResourceNotFound {
        kind: String,
        namespace: String,
        name: String,
    },

    /// Descriptor names a resource kind the store cannot fetch
    #[error("Unsupported resource type in query descriptor: {0}")]
    UnsupportedResourceType(String),

    /// A field's raw value could not be coerced to its declared shape
    #[error("Failed to transform field '{field}': {reason} (raw value: {raw})")]
    Transform {
        field: String,
        reason: String,
        raw: String,
    },

    /// A required field's path matched nothing in the fetched resource
    #[error("Required field '{field}' has no value at its declared path")]
    MissingField { field: String },

    /// Transport or API failure from the underlying resource store
    #[error("Resource store error: {0}")]
    Store(#[source] anyhow::Error),
}

/// Result type for composition operations
pub type ComposeResult<T> = Result<T, ComposeError>;
