use thiserror::Error;

/// Result type alias using the canonical `ExError`
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code used in log events (`err_code`)
/// and in the run report, so callers and tests can match on failures
/// without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Validation
    InvalidInput,
    /// A snapshot violates key uniqueness or dense 1..N ranking
    InvalidSnapshot,

    // List Source
    /// The ordered key list could not be fetched or parsed
    SourceUnavailable,
    /// A single entity's metadata could not be fetched (non-fatal)
    MetadataUnavailable,

    // Snapshot Store
    /// A stored snapshot exists but cannot be parsed or violates invariants
    StoreCorrupt,
    Persistence,

    // Notifier
    /// The notification could not be delivered (non-fatal)
    Delivery,

    // Integration/IO
    Io,
    Serialization,
    Timeout,

    // Startup
    MissingConfig,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidSnapshot => "ERR_INVALID_SNAPSHOT",
            ExErrorKind::SourceUnavailable => "ERR_SOURCE_UNAVAILABLE",
            ExErrorKind::MetadataUnavailable => "ERR_METADATA_UNAVAILABLE",
            ExErrorKind::StoreCorrupt => "ERR_STORE_CORRUPT",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Delivery => "ERR_DELIVERY",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Timeout => "ERR_TIMEOUT",
            ExErrorKind::MissingConfig => "ERR_MISSING_CONFIG",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification (`kind`) for programmatic handling plus
/// optional context naming the operation, list type and entity involved.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    list_type: Option<String>,
    entity_key: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            list_type: None,
            entity_key: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add list type context
    pub fn with_list_type(mut self, list_type: impl Into<String>) -> Self {
        self.list_type = Some(list_type.into());
        self
    }

    /// Add entity key context
    pub fn with_entity_key(mut self, key: impl Into<String>) -> Self {
        self.entity_key = Some(key.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn list_type(&self) -> Option<&str> {
        self.list_type.as_deref()
    }

    pub fn entity_key(&self) -> Option<&str> {
        self.entity_key.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(list_type) = &self.list_type {
            write!(f, " (list_type: {})", list_type)?;
        }
        if let Some(key) = &self.entity_key {
            write!(f, " (entity_key: {})", key)?;
        }
        if let Some(source) = &self.source {
            write!(f, "; caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Snapshot invariant violations
///
/// Raised while constructing a [`crate::model::Snapshot`] from source data
/// or from a persisted document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    /// List type is empty or not usable as a namespace / file stem
    #[error("Invalid list type: {list_type:?}")]
    InvalidListType { list_type: String },

    /// An entity key is the empty string
    #[error("Empty key at position {position} in list {list_type}")]
    EmptyKey { list_type: String, position: usize },

    /// The same key appears twice in one snapshot
    #[error("Duplicate key {key} in list {list_type}")]
    DuplicateKey { list_type: String, key: String },

    /// A recorded rank does not match the entity's position
    #[error("Key {key} in list {list_type} has rank {found}, expected {expected}")]
    RankMismatch {
        list_type: String,
        key: String,
        expected: u32,
        found: u32,
    },
}

impl From<SnapshotError> for ExError {
    fn from(err: SnapshotError) -> Self {
        let message = err.to_string();
        match err {
            SnapshotError::InvalidListType { list_type } => ExError::new(ExErrorKind::InvalidInput)
                .with_list_type(list_type)
                .with_message(message),

            SnapshotError::EmptyKey { list_type, .. } => {
                ExError::new(ExErrorKind::InvalidSnapshot)
                    .with_list_type(list_type)
                    .with_message(message)
            }

            SnapshotError::DuplicateKey { list_type, key }
            | SnapshotError::RankMismatch { list_type, key, .. } => {
                ExError::new(ExErrorKind::InvalidSnapshot)
                    .with_list_type(list_type)
                    .with_entity_key(key)
                    .with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for ExError {
    fn from(err: serde_json::Error) -> Self {
        ExError::new(ExErrorKind::Serialization).with_message(err.to_string())
    }
}
