//! Leave type definitions.

use chrono::{DateTime, Utc};
use leavedesk_shared::types::LeaveTypeId;
use serde::{Deserialize, Serialize};

use crate::leave_type::error::LeaveTypeError;
use crate::workflow::error::WorkflowError;

/// A kind of leave employees can request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveType {
    /// Leave type ID.
    pub id: LeaveTypeId,
    /// Unique short code, upper case (e.g. `ANNUAL`).
    pub code: String,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Shortest allowed request, in inclusive calendar days.
    pub min_duration_days: Option<u32>,
    /// Longest allowed request, in inclusive calendar days.
    pub max_duration_days: Option<u32>,
    /// Approved requests draw on the quota ledger.
    pub consumes_quota: bool,
    /// Paid leave.
    pub is_paid: bool,
    /// A supporting document is expected.
    pub requires_document: bool,
    /// Deactivated types cannot be requested.
    pub active: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl LeaveType {
    /// Returns true if a request of `days` fits the configured bounds.
    #[must_use]
    pub fn allows(&self, days: u32) -> bool {
        self.min_duration_days.is_none_or(|min| days >= min)
            && self.max_duration_days.is_none_or(|max| days <= max)
    }

    /// Fails with `DurationOutOfBounds` when `days` is outside the bounds.
    pub fn check_duration(&self, days: u32) -> Result<(), WorkflowError> {
        if self.allows(days) {
            Ok(())
        } else {
            Err(WorkflowError::DurationOutOfBounds {
                days,
                leave_type: self.code.clone(),
                min: self.min_duration_days,
                max: self.max_duration_days,
            })
        }
    }
}

/// Administrative input for creating or editing a leave type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LeaveTypeInput {
    /// Short code; trimmed and upper-cased.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Shortest allowed request.
    #[serde(default)]
    pub min_duration_days: Option<u32>,
    /// Longest allowed request.
    #[serde(default)]
    pub max_duration_days: Option<u32>,
    /// Draws on the quota ledger.
    #[serde(default)]
    pub consumes_quota: bool,
    /// Paid leave.
    #[serde(default)]
    pub is_paid: bool,
    /// A supporting document is expected.
    #[serde(default)]
    pub requires_document: bool,
    /// Active flag; ignored on create.
    #[serde(default)]
    pub active: Option<bool>,
}

impl LeaveTypeInput {
    /// Normalized code.
    #[must_use]
    pub fn normalized_code(&self) -> String {
        self.code.trim().to_uppercase()
    }

    /// Checks the input.
    pub fn validate(&self) -> Result<(), LeaveTypeError> {
        if self.code.trim().is_empty() {
            return Err(LeaveTypeError::Validation("code must not be empty".into()));
        }
        if self.name.trim().is_empty() {
            return Err(LeaveTypeError::Validation("name must not be empty".into()));
        }
        if self.min_duration_days == Some(0) {
            return Err(LeaveTypeError::Validation(
                "min_duration_days must be at least 1".into(),
            ));
        }
        if let (Some(min), Some(max)) = (self.min_duration_days, self.max_duration_days)
            && min > max
        {
            return Err(LeaveTypeError::Validation(format!(
                "min_duration_days {min} exceeds max_duration_days {max}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn leave_type(min: Option<u32>, max: Option<u32>) -> LeaveType {
        LeaveType {
            id: LeaveTypeId::new(),
            code: "ANNUAL".into(),
            name: "Annual leave".into(),
            description: None,
            min_duration_days: min,
            max_duration_days: max,
            consumes_quota: true,
            is_paid: true,
            requires_document: false,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn input(code: &str) -> LeaveTypeInput {
        LeaveTypeInput {
            code: code.into(),
            name: "Sick leave".into(),
            description: None,
            min_duration_days: None,
            max_duration_days: None,
            consumes_quota: false,
            is_paid: true,
            requires_document: true,
            active: None,
        }
    }

    #[rstest]
    #[case(None, None, 40, true)]
    #[case(Some(2), None, 1, false)]
    #[case(Some(2), None, 2, true)]
    #[case(None, Some(3), 3, true)]
    #[case(None, Some(3), 4, false)]
    #[case(Some(1), Some(1), 1, true)]
    fn test_allows(
        #[case] min: Option<u32>,
        #[case] max: Option<u32>,
        #[case] days: u32,
        #[case] expected: bool,
    ) {
        assert_eq!(leave_type(min, max).allows(days), expected);
    }

    #[test]
    fn test_check_duration_error() {
        let err = leave_type(None, Some(3)).check_duration(5).unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::DurationOutOfBounds {
                days: 5,
                max: Some(3),
                ..
            }
        ));
    }

    #[test]
    fn test_validate_input() {
        assert!(input("SICK").validate().is_ok());
        assert!(input("  ").validate().is_err());

        let mut bad = input("SICK");
        bad.min_duration_days = Some(5);
        bad.max_duration_days = Some(2);
        assert!(matches!(bad.validate(), Err(LeaveTypeError::Validation(_))));
    }

    #[test]
    fn test_normalized_code() {
        assert_eq!(input(" sick ").normalized_code(), "SICK");
    }
}
