use cartrule_core::{AppError, ConstraintFamily};
use cartrule_domain::CartRuleAction;
use serde::Serialize;

/// Error payload printed for rejected form data.
#[derive(Debug, Serialize)]
pub struct ErrorReport {
    code: Option<u16>,
    kind: Option<&'static str>,
    family: Option<ConstraintFamily>,
    field: Option<String>,
    value: Option<String>,
    message: String,
}

impl From<&AppError> for ErrorReport {
    fn from(error: &AppError) -> Self {
        match error {
            AppError::Constraint(violation) => Self {
                code: Some(violation.code().code()),
                kind: Some(violation.code().as_str()),
                family: Some(violation.code().family()),
                field: Some(violation.field().to_owned()),
                value: violation.value().map(str::to_owned),
                message: error.to_string(),
            },
            AppError::Validation(_) | AppError::Internal(_) => Self {
                code: None,
                kind: None,
                family: None,
                field: None,
                value: None,
                message: error.to_string(),
            },
        }
    }
}

/// Result of checking one payload.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    supported: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    action: Option<CartRuleAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorReport>,
}

impl CheckReport {
    pub fn supports_only(supported: bool) -> Self {
        Self {
            supported,
            action: None,
            error: None,
        }
    }

    pub fn built(supported: bool, result: &Result<CartRuleAction, AppError>) -> Self {
        match result {
            Ok(action) => Self {
                supported,
                action: Some(*action),
                error: None,
            },
            Err(error) => Self {
                supported,
                action: None,
                error: Some(ErrorReport::from(error)),
            },
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}
