/// Failure raised when an engine call cannot produce a result for its inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
    #[error("unknown rental duration '{key}'")]
    UnknownDuration { key: String },
    #[error("unknown insurance plan '{id}'")]
    UnknownPlan { id: String },
    #[error("unknown add-on coverage '{id}'")]
    UnknownAddOn { id: String },
}

impl PolicyError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}
