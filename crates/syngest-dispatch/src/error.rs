use syngest_input::InputSource;

/// Why a gesture finished without succeeding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GestureError {
    /// The target cannot accept events from this input source.
    SourceNotSupported { source: InputSource },
    /// The gesture gave up for a reason of its own.
    Rejected { reason: String },
    /// The controller cancelled the gesture before it could finish.
    Aborted,
}

impl GestureError {
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for GestureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GestureError::SourceNotSupported { source } => {
                write!(f, "input source {source:?} not supported by target")
            }
            GestureError::Rejected { reason } => write!(f, "gesture rejected: {reason}"),
            GestureError::Aborted => write!(f, "gesture aborted before completion"),
        }
    }
}

impl std::error::Error for GestureError {}

/// What a completion callback receives.
pub type GestureResult = Result<(), GestureError>;
