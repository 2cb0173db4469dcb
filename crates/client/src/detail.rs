//! Entity detail loading.
//!
//! Fetches one entity's snapshot -- business fields, scope items, flow
//! history, and the viewer's position in the approval chain -- from the
//! module's detail endpoint.  No retries: a failed fetch surfaces the
//! error and the caller keeps its prior state ("last fetch wins").

use serde::Deserialize;

use siteflow_core::flow::{ApprovalFlowRecord, HistoryCard, PendingWith};
use siteflow_core::module::Module;
use siteflow_core::quantity::ScopeItem;
use siteflow_core::types::{EntityId, Timestamp};
use siteflow_core::workflow::{ScreenPlan, WorkflowState};

use crate::activity::ActivityTracker;
use crate::error::ClientResult;
use crate::gateway::ApiGateway;
use crate::session::Session;

/// One entity's detail snapshot as the backend reports it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDetail {
    pub id: EntityId,
    /// Module-specific business fields; opaque to the shared workflow layer.
    #[serde(default)]
    pub entity: serde_json::Value,
    #[serde(default)]
    pub scope_items: Vec<ScopeItem>,
    #[serde(default)]
    pub flow_history: Vec<ApprovalFlowRecord>,
    /// Id of the latest unresolved flow record; submissions tag this.
    pub latest_flow_id: Option<EntityId>,
    /// Whether the current viewer is the pending actor right now.
    pub is_see: bool,
    /// Current workflow level; `0` means returned to the submitter.
    pub level: u32,
    pub pending_with: Option<PendingWith>,
    /// Server-supplied, read-only; pre-populates the action panel.
    #[serde(default)]
    pub observed_by: String,
    /// Server-supplied escalation date for the pending step.
    pub escalation_date: Option<Timestamp>,
}

impl EntityDetail {
    /// Derive the viewer's workflow state from this snapshot.
    pub fn state(&self) -> WorkflowState {
        WorkflowState::derive(self.is_see, self.level)
    }

    /// Which panels to render for this snapshot.
    pub fn screen_plan(&self) -> ScreenPlan {
        self.state().screen_plan()
    }

    /// Read-only history rows, oldest first as the backend sends them.
    pub fn history_cards(&self) -> Vec<HistoryCard> {
        self.flow_history.iter().map(HistoryCard::from_record).collect()
    }
}

/// Result of a load attempt.
#[derive(Debug)]
pub enum DetailOutcome {
    /// The snapshot was fetched and parsed.
    Loaded(Box<EntityDetail>),
    /// No session identity yet; no request was issued.  The caller retries
    /// on its next trigger.
    Deferred,
}

/// Loads entity detail snapshots for any workflow module.
#[derive(Debug, Clone)]
pub struct DetailLoader {
    gateway: ApiGateway,
    activity: ActivityTracker,
}

impl DetailLoader {
    pub fn new(gateway: ApiGateway, activity: ActivityTracker) -> Self {
        Self { gateway, activity }
    }

    /// Fetch one entity's detail snapshot.
    ///
    /// When `session` is `None` the load defers without touching the
    /// network; identity arriving later re-triggers it from the caller's
    /// side.  The loading indicator is held for exactly the duration of
    /// the request.
    pub async fn load(
        &self,
        module: Module,
        entity_id: EntityId,
        session: Option<&Session>,
    ) -> ClientResult<DetailOutcome> {
        let Some(session) = session else {
            tracing::debug!(
                module = module.slug(),
                entity_id,
                "Session identity not ready; deferring detail load"
            );
            return Ok(DetailOutcome::Deferred);
        };

        let _activity = self.activity.begin();

        tracing::debug!(
            module = module.slug(),
            entity_id,
            user_id = session.id,
            "Loading entity detail"
        );

        let envelope = self
            .gateway
            .get_json::<EntityDetail>(&module.detail_path(entity_id))
            .await?;

        let detail = envelope.require_data("the entity detail")?;
        Ok(DetailOutcome::Loaded(Box::new(detail)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn detail_json() -> &'static str {
        r#"{
            "id": 42,
            "entity": { "billNo": "RB-042", "projectName": "Tower B" },
            "scopeItems": [
                {
                    "id": 1,
                    "name": "Excavation",
                    "scopeQty": "12000",
                    "cumulativeQty": "0",
                    "certifiedQty": "61"
                }
            ],
            "flowHistory": [
                {
                    "id": 11,
                    "actorUserId": 7,
                    "actorName": "R. Sharma",
                    "actorRoleName": "Site Engineer",
                    "actionTaken": "approve",
                    "remarks": "Verified",
                    "actionTakenAt": "2026-08-12T09:30:00Z",
                    "attachedDocument": null,
                    "level": 1
                },
                {
                    "id": 12,
                    "actorUserId": 9,
                    "actorName": "K. Patel",
                    "actorRoleName": "Project Manager",
                    "actionTaken": "",
                    "remarks": "",
                    "actionTakenAt": null,
                    "attachedDocument": null,
                    "level": 2
                }
            ],
            "latestFlowId": 12,
            "isSee": true,
            "level": 2,
            "pendingWith": { "name": "K. Patel", "role": "Project Manager" },
            "observedBy": "S. Iyer",
            "escalationDate": "2026-09-01T00:00:00Z"
        }"#
    }

    #[test]
    fn test_detail_parses_and_derives_state() {
        let detail: EntityDetail = serde_json::from_str(detail_json()).unwrap();
        assert_eq!(detail.id, 42);
        assert_eq!(detail.latest_flow_id, Some(12));
        assert_eq!(
            detail.state(),
            WorkflowState::AwaitingHigherLevel { level: 2 }
        );
        assert!(detail.screen_plan().show_action_panel);
        assert_eq!(detail.history_cards().len(), 2);
        assert_eq!(detail.entity["billNo"], "RB-042");
    }

    #[test]
    fn test_detail_defaults_for_sparse_payloads() {
        // Attendance sheets have no scope items; safety checklists may
        // omit observedBy until the first tier acts.
        let json = r#"{
            "id": 8,
            "latestFlowId": null,
            "isSee": false,
            "level": 1,
            "pendingWith": null,
            "escalationDate": null
        }"#;
        let detail: EntityDetail = serde_json::from_str(json).unwrap();
        assert!(detail.scope_items.is_empty());
        assert!(detail.flow_history.is_empty());
        assert_eq!(detail.observed_by, "");
        assert_eq!(detail.state(), WorkflowState::NotPending);
        assert!(!detail.screen_plan().show_action_panel);
        assert!(!detail.screen_plan().show_edit_form);
    }

    #[tokio::test]
    async fn test_load_defers_without_session_and_issues_no_request() {
        // The gateway points at a port nothing listens on; a deferred load
        // must succeed anyway because it never touches the network.
        let loader = DetailLoader::new(
            ApiGateway::new("http://127.0.0.1:1/api/v1".to_string()),
            ActivityTracker::new(),
        );

        let outcome = loader
            .load(Module::BuilderBilling, 42, None)
            .await
            .unwrap();
        assert_matches!(outcome, DetailOutcome::Deferred);
    }

    #[tokio::test]
    async fn test_failed_load_releases_activity() {
        let activity = ActivityTracker::new();
        let loader = DetailLoader::new(
            ApiGateway::new("http://127.0.0.1:1/api/v1".to_string()),
            activity.clone(),
        );

        let session = Session {
            id: 7,
            user_type: "engineer".to_string(),
        };
        let result = loader.load(Module::Attendance, 8, Some(&session)).await;
        assert!(result.is_err());
        assert!(!activity.is_busy());
    }
}
