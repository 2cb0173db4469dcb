//! Approval action constants and parsing.
//!
//! The wire values match the backend's `Status_to` field on flow-action
//! submissions.  History rows for the pending (unresolved) step carry an
//! empty action, which maps to `None` rather than an error.

use serde::{Deserialize, Serialize};

/// An action a reviewer can take on a pending entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalAction {
    /// Advance the entity to the next approval tier (or finalize it).
    Approve,
    /// Terminally reject the entity.  First tier only.
    Reject,
    /// Send the entity back to the original submitter for edits.  Higher
    /// tiers only.
    Return,
    /// Ask the first tier to re-evaluate.  First tier only.
    Reevaluate,
}

impl ApprovalAction {
    /// The `Status_to` wire value for this action.
    pub fn wire_value(self) -> &'static str {
        match self {
            ApprovalAction::Approve => "approve",
            ApprovalAction::Reject => "reject",
            ApprovalAction::Return => "return",
            ApprovalAction::Reevaluate => "reevaluate",
        }
    }

    /// Parse a wire value.  Empty or unknown strings yield `None`; history
    /// rows use that for the unresolved step.
    pub fn from_wire(value: &str) -> Option<ApprovalAction> {
        match value {
            "approve" => Some(ApprovalAction::Approve),
            "reject" => Some(ApprovalAction::Reject),
            "return" => Some(ApprovalAction::Return),
            "reevaluate" => Some(ApprovalAction::Reevaluate),
            _ => None,
        }
    }

    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            ApprovalAction::Approve => "Approved",
            ApprovalAction::Reject => "Rejected",
            ApprovalAction::Return => "Returned",
            ApprovalAction::Reevaluate => "Re-evaluation requested",
        }
    }
}
