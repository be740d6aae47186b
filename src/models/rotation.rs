use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Severity::Warning => "⚠",
            Severity::Error => "✗",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of validating one succession.
///
/// `reason` and `severity` are set exactly when `valid` is false; use the
/// constructors to keep it that way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationCheckResult {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

impl RotationCheckResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            reason: None,
            severity: None,
        }
    }

    pub fn violation(severity: Severity, reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: Some(reason.into()),
            severity: Some(severity),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Some(Severity::Error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionEntry {
    pub crop: String,
    pub score: u8,
    pub reason: String,
}

impl SuggestionEntry {
    pub fn new(crop: impl Into<String>, score: u8, reason: impl Into<String>) -> Self {
        Self {
            crop: crop.into(),
            score,
            reason: reason.into(),
        }
    }

    pub fn is_preferred(&self) -> bool {
        self.score > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_result_has_no_reason() {
        let result = RotationCheckResult::ok();
        assert!(result.valid);
        assert!(result.reason.is_none());
        assert!(result.severity.is_none());
        assert!(!result.is_error());
    }

    #[test]
    fn violation_carries_reason_and_severity() {
        let result = RotationCheckResult::violation(Severity::Warning, "too hungry");
        assert!(!result.valid);
        assert_eq!(result.reason.as_deref(), Some("too hungry"));
        assert_eq!(result.severity, Some(Severity::Warning));
        assert!(!result.is_error());
    }

    #[test]
    fn valid_result_serializes_without_optional_fields() {
        let json = serde_json::to_value(RotationCheckResult::ok()).unwrap();
        assert_eq!(json, serde_json::json!({ "valid": true }));

        let json =
            serde_json::to_value(RotationCheckResult::violation(Severity::Error, "x")).unwrap();
        assert_eq!(json["severity"], "error");
    }

    #[test]
    fn severity_orders_warning_below_error() {
        assert!(Severity::Warning < Severity::Error);
    }
}
