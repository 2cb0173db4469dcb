//! Submission payloads and their pre-flight validation.
//!
//! Both submission paths (action panel and embedded edit form) validate
//! locally before any request is issued; a failed check names the
//! offending field or item so the frontend can surface it directly.

use serde::Serialize;

use crate::action::ApprovalAction;
use crate::error::CoreError;
use crate::quantity::ScopeItem;
use crate::types::{EntityId, Quantity, Timestamp};
use crate::workflow::WorkflowState;

/// A document attached to an action submission.  At most one per submit.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// An approval action as entered in the action panel.
#[derive(Debug, Clone)]
pub struct ActionSubmission {
    pub action: ApprovalAction,
    pub remarks: String,
    /// Server-supplied, read-only; must be pre-populated before submit.
    pub observed_by: String,
    /// Server-supplied escalation date; must be pre-populated before submit.
    pub escalation_date: Option<Timestamp>,
    pub attachment: Option<Attachment>,
}

impl ActionSubmission {
    /// Validate against the current workflow state.
    ///
    /// Checks that the state offers the chosen action, that remarks carry
    /// non-whitespace content, and that the server-supplied observed-by
    /// and escalation-date fields arrived with the detail snapshot.
    pub fn validate(&self, state: &WorkflowState) -> Result<(), CoreError> {
        state.check_action(self.action)?;

        if self.remarks.trim().is_empty() {
            return Err(CoreError::Validation(
                "Remarks are required before submitting an action".to_string(),
            ));
        }

        if self.observed_by.trim().is_empty() {
            return Err(CoreError::Validation(
                "Observed-by is not populated yet; reload the entity before submitting"
                    .to_string(),
            ));
        }

        if self.escalation_date.is_none() {
            return Err(CoreError::Validation(
                "Escalation date is not populated yet; reload the entity before submitting"
                    .to_string(),
            ));
        }

        Ok(())
    }
}

/// One edited line of the embedded edit form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmendedItem {
    pub item_id: EntityId,
    pub name: String,
    pub certified_qty: Quantity,
}

/// The embedded edit form's payload: amended certified quantities plus
/// mandatory remarks, tagged to the unresolved flow record.
#[derive(Debug, Clone)]
pub struct Amendment {
    pub flow_id: EntityId,
    pub remarks: String,
    pub items: Vec<AmendedItem>,
}

impl Amendment {
    /// Validate the amendment against the loaded scope items.
    ///
    /// Every amended item must match a known scope item, quantities must be
    /// non-negative, and no item may be certified past
    /// `scope_qty - cumulative_qty`.  The first offending item is reported
    /// by name.
    pub fn validate(&self, scope_items: &[ScopeItem]) -> Result<(), CoreError> {
        if self.remarks.trim().is_empty() {
            return Err(CoreError::Validation(
                "Remarks are required before resubmitting".to_string(),
            ));
        }

        if self.items.is_empty() {
            return Err(CoreError::Validation(
                "An amendment must change at least one item".to_string(),
            ));
        }

        for amended in &self.items {
            let scope_item = scope_items
                .iter()
                .find(|s| s.id == amended.item_id)
                .ok_or_else(|| {
                    CoreError::Validation(format!(
                        "Unknown item '{}' in amendment",
                        amended.name
                    ))
                })?;

            if amended.certified_qty < Quantity::ZERO {
                return Err(CoreError::Validation(format!(
                    "Certified quantity for '{}' must not be negative",
                    scope_item.name
                )));
            }

            let limit = scope_item.certifiable_limit();
            if amended.certified_qty > limit {
                return Err(CoreError::Validation(format!(
                    "Certified quantity for '{}' exceeds the certifiable limit of {limit}",
                    scope_item.name
                )));
            }
        }

        Ok(())
    }
}
