//! Flow-history records and their read-only view models.
//!
//! A flow record is one past (or pending) step in an entity's approval
//! chain.  Records are append-only from the client's point of view; the
//! backend creates them, the client only renders them.

use serde::{Deserialize, Deserializer, Serialize};

use crate::action::ApprovalAction;
use crate::types::{EntityId, Timestamp};

/// One step in an entity's approval chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalFlowRecord {
    pub id: EntityId,
    pub actor_user_id: EntityId,
    pub actor_name: String,
    pub actor_role_name: String,
    /// `None` for the pending (unresolved) step; the wire carries an empty
    /// string or omits the field entirely.
    #[serde(default, deserialize_with = "deserialize_action")]
    pub action_taken: Option<ApprovalAction>,
    #[serde(default)]
    pub remarks: String,
    pub action_taken_at: Option<Timestamp>,
    pub attached_document: Option<String>,
    pub level: u32,
}

/// Who must act next (server-supplied display fields).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingWith {
    pub name: String,
    pub role: String,
}

/// Display tone for a history card, keyed by the action taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowTone {
    /// Approve.
    Success,
    /// Reject.
    Danger,
    /// Return to submitter.
    Info,
    /// Re-evaluation requested.
    Warning,
    /// Unresolved step.
    Pending,
}

impl FlowTone {
    /// Map an optional action to its display tone.
    pub fn for_action(action: Option<ApprovalAction>) -> FlowTone {
        match action {
            Some(ApprovalAction::Approve) => FlowTone::Success,
            Some(ApprovalAction::Reject) => FlowTone::Danger,
            Some(ApprovalAction::Return) => FlowTone::Info,
            Some(ApprovalAction::Reevaluate) => FlowTone::Warning,
            None => FlowTone::Pending,
        }
    }
}

/// One rendered history row.  Pure projection of an [`ApprovalFlowRecord`].
#[derive(Debug, Clone)]
pub struct HistoryCard {
    pub actor: String,
    pub role: String,
    pub action_label: &'static str,
    pub tone: FlowTone,
    pub remarks: String,
    pub acted_at: Option<Timestamp>,
    pub document: Option<String>,
    pub level: u32,
}

impl HistoryCard {
    /// Build the view row for one flow record.
    pub fn from_record(record: &ApprovalFlowRecord) -> HistoryCard {
        HistoryCard {
            actor: record.actor_name.clone(),
            role: record.actor_role_name.clone(),
            action_label: record
                .action_taken
                .map(ApprovalAction::label)
                .unwrap_or("Pending"),
            tone: FlowTone::for_action(record.action_taken),
            remarks: record.remarks.clone(),
            acted_at: record.action_taken_at,
            document: record.attached_document.clone(),
            level: record.level,
        }
    }
}

/// Accept `null`, a missing field, an empty string, or a known action
/// wire value.  Unknown strings map to `None` so a newer backend cannot
/// break history rendering.
fn deserialize_action<'de, D>(deserializer: D) -> Result<Option<ApprovalAction>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(ApprovalAction::from_wire))
}
