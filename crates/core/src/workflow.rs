//! Workflow-state derivation and allowed-action sets.
//!
//! The client holds no transition logic of its own: state is re-derived
//! from the server-reported `(isSee, level)` pair on every detail fetch,
//! and only controls which panel renders and which actions are offered.
//! Level `0` always means "returned to the original submitter for edits",
//! never a numbered approval tier.

use crate::action::ApprovalAction;
use crate::error::CoreError;

/// The viewer's position in the approval chain for one entity snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    /// The viewer is not the pending actor; read-only history.
    NotPending,
    /// The entity is back with its original submitter for amendment.
    ReturnedToSubmitter,
    /// Pending with the first approval tier.
    AwaitingLevel1,
    /// Pending with a tier above the first.
    AwaitingHigherLevel { level: u32 },
}

/// Which panels a screen should render for a given state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenPlan {
    /// Flow history is always visible.
    pub show_history: bool,
    /// Action panel: only when the viewer is the pending approver.
    pub show_action_panel: bool,
    /// Embedded edit form: only when returned to the submitter.
    pub show_edit_form: bool,
}

impl WorkflowState {
    /// Derive the state from the server-reported snapshot.
    pub fn derive(is_see: bool, level: u32) -> WorkflowState {
        if !is_see {
            return WorkflowState::NotPending;
        }
        match level {
            0 => WorkflowState::ReturnedToSubmitter,
            1 => WorkflowState::AwaitingLevel1,
            level => WorkflowState::AwaitingHigherLevel { level },
        }
    }

    /// The actions the panel offers in this state.
    ///
    /// First tier may approve, reject, or ask for re-evaluation; higher
    /// tiers may approve or return the entity to the submitter.  The two
    /// non-panel states offer nothing.
    pub fn allowed_actions(&self) -> &'static [ApprovalAction] {
        match self {
            WorkflowState::AwaitingLevel1 => &[
                ApprovalAction::Approve,
                ApprovalAction::Reject,
                ApprovalAction::Reevaluate,
            ],
            WorkflowState::AwaitingHigherLevel { .. } => {
                &[ApprovalAction::Approve, ApprovalAction::Return]
            }
            WorkflowState::NotPending | WorkflowState::ReturnedToSubmitter => &[],
        }
    }

    /// Whether this state offers the given action.
    pub fn permits(&self, action: ApprovalAction) -> bool {
        self.allowed_actions().contains(&action)
    }

    /// Validate that an action may be submitted from this state.
    pub fn check_action(&self, action: ApprovalAction) -> Result<(), CoreError> {
        if self.permits(action) {
            return Ok(());
        }
        let available = self.allowed_actions();
        if available.is_empty() {
            return Err(CoreError::Validation(
                "No actions are available in the current workflow state".to_string(),
            ));
        }
        Err(CoreError::Validation(format!(
            "Action '{}' is not available at this level. Available: {}",
            action.wire_value(),
            available
                .iter()
                .map(|a| a.wire_value())
                .collect::<Vec<_>>()
                .join(", ")
        )))
    }

    /// Which panels render for this state.
    pub fn screen_plan(&self) -> ScreenPlan {
        ScreenPlan {
            show_history: true,
            show_action_panel: matches!(
                self,
                WorkflowState::AwaitingLevel1 | WorkflowState::AwaitingHigherLevel { .. }
            ),
            show_edit_form: matches!(self, WorkflowState::ReturnedToSubmitter),
        }
    }
}
