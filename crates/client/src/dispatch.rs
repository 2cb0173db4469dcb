//! Submission dispatch: one network call per user-initiated submit.
//!
//! Packages an approval action (or a returned-to-submitter amendment) the
//! way the backend's flow-action endpoints expect it and posts it exactly
//! once.  A per-dispatcher in-flight flag rejects overlapping submits; it
//! is a trigger guard, not concurrency control -- the server stays the
//! authority on double-submission.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use serde::Serialize;

use siteflow_core::module::Module;
use siteflow_core::quantity::ScopeItem;
use siteflow_core::submission::{ActionSubmission, Amendment};
use siteflow_core::types::EntityId;
use siteflow_core::workflow::WorkflowState;

use crate::activity::ActivityTracker;
use crate::error::{ClientError, ClientResult};
use crate::gateway::{ApiEnvelope, ApiGateway};
use crate::session::Session;

/// Success message used when the server does not supply one.
const DEFAULT_SUCCESS_MESSAGE: &str = "Submitted successfully.";

/// Wire date format for `AutoSLgTargetDate`.
const TARGET_DATE_FORMAT: &str = "%Y-%m-%d";

/// What the frontend does after a successful submit: show the message and
/// navigate back to the module's list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub message: String,
    pub return_to: &'static str,
}

/// The multipart fields of a flow-action submission, assembled before the
/// form is built so they stay inspectable.
#[derive(Debug)]
struct FlowActionFields {
    id: String,
    status_to: &'static str,
    action_taken: String,
    auto_slg_target_date: String,
    updated_by: String,
    document: Option<(String, Vec<u8>)>,
}

impl FlowActionFields {
    /// Assemble the wire fields.  The submission must already be validated:
    /// a missing escalation date here is a programming error upstream.
    fn assemble(
        flow_id: EntityId,
        submission: &ActionSubmission,
        session: &Session,
    ) -> ClientResult<FlowActionFields> {
        let escalation_date = submission.escalation_date.ok_or_else(|| {
            ClientError::Core(siteflow_core::error::CoreError::Internal(
                "Flow action assembled without an escalation date".to_string(),
            ))
        })?;

        Ok(FlowActionFields {
            id: flow_id.to_string(),
            status_to: submission.action.wire_value(),
            action_taken: submission.remarks.clone(),
            auto_slg_target_date: escalation_date.format(TARGET_DATE_FORMAT).to_string(),
            updated_by: session.encoded_id(),
            document: submission
                .attachment
                .as_ref()
                .map(|a| (a.file_name.clone(), a.bytes.clone())),
        })
    }

    fn into_form(self) -> Form {
        let mut form = Form::new()
            .text("Id", self.id)
            .text("Status_to", self.status_to)
            .text("ActionTaken", self.action_taken)
            .text("AutoSLgTargetDate", self.auto_slg_target_date)
            .text("UpdatedBy", self.updated_by);

        if let Some((file_name, bytes)) = self.document {
            form = form.part("Document", Part::bytes(bytes).file_name(file_name));
        }

        form
    }
}

/// JSON body of an amendment submission.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AmendmentBody<'a> {
    flow_id: EntityId,
    remarks: &'a str,
    items: Vec<AmendmentItemBody>,
    updated_by: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AmendmentItemBody {
    id: EntityId,
    certified_qty: siteflow_core::types::Quantity,
}

/// Guard for the one-submit-at-a-time flag.  Cleared on drop, so the flag
/// can never stay set after a submit completes, fails, or unwinds.
#[derive(Debug)]
struct InFlightGuard {
    flag: Arc<AtomicBool>,
}

impl InFlightGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<InFlightGuard> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| InFlightGuard {
                flag: Arc::clone(flag),
            })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Dispatches action and amendment submissions for any workflow module.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    gateway: ApiGateway,
    activity: ActivityTracker,
    in_flight: Arc<AtomicBool>,
}

impl Dispatcher {
    pub fn new(gateway: ApiGateway, activity: ActivityTracker) -> Self {
        Self {
            gateway,
            activity,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a submission is currently in flight.
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Submit an approval action against the pending flow record.
    ///
    /// Validates locally, then issues exactly one multipart POST.  On
    /// `success: true` the outcome names the list screen to navigate back
    /// to; on any failure the caller stays put and may retry manually.
    pub async fn submit_action(
        &self,
        module: Module,
        flow_id: EntityId,
        submission: &ActionSubmission,
        state: &WorkflowState,
        session: &Session,
    ) -> ClientResult<SubmitOutcome> {
        let _flight = InFlightGuard::acquire(&self.in_flight)
            .ok_or(ClientError::SubmissionInFlight)?;

        submission.validate(state)?;

        let fields = FlowActionFields::assemble(flow_id, submission, session)?;
        let _activity = self.activity.begin();

        tracing::info!(
            module = module.slug(),
            flow_id,
            action = submission.action.wire_value(),
            has_document = submission.attachment.is_some(),
            "Submitting flow action"
        );

        let envelope = self
            .gateway
            .post_multipart::<serde_json::Value>(&module.flow_action_path(), fields.into_form())
            .await
            .inspect_err(|e| {
                tracing::error!(module = module.slug(), flow_id, error = %e, "Flow action failed");
            })?;

        Self::outcome_from(envelope, module)
    }

    /// Submit a returned-to-submitter amendment.
    ///
    /// Validates the edited quantities against the loaded scope items, then
    /// posts one JSON body tagged to the unresolved flow record.
    pub async fn submit_amendment(
        &self,
        module: Module,
        amendment: &Amendment,
        scope_items: &[ScopeItem],
        session: &Session,
    ) -> ClientResult<SubmitOutcome> {
        let _flight = InFlightGuard::acquire(&self.in_flight)
            .ok_or(ClientError::SubmissionInFlight)?;

        amendment.validate(scope_items)?;

        let body = AmendmentBody {
            flow_id: amendment.flow_id,
            remarks: &amendment.remarks,
            items: amendment
                .items
                .iter()
                .map(|i| AmendmentItemBody {
                    id: i.item_id,
                    certified_qty: i.certified_qty,
                })
                .collect(),
            updated_by: session.encoded_id(),
        };

        let _activity = self.activity.begin();

        tracing::info!(
            module = module.slug(),
            flow_id = amendment.flow_id,
            items = amendment.items.len(),
            "Submitting amendment"
        );

        let envelope = self
            .gateway
            .post_json::<serde_json::Value, _>(&module.amendment_path(), &body)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    module = module.slug(),
                    flow_id = amendment.flow_id,
                    error = %e,
                    "Amendment failed"
                );
            })?;

        Self::outcome_from(envelope, module)
    }

    /// Map a response envelope to the navigate-back outcome.
    fn outcome_from(
        envelope: ApiEnvelope<serde_json::Value>,
        module: Module,
    ) -> ClientResult<SubmitOutcome> {
        let message = envelope
            .message
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string());

        // into_data surfaces `success: false` with the server's message.
        envelope.into_data()?;

        Ok(SubmitOutcome {
            message,
            return_to: module.index_screen(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use siteflow_core::action::ApprovalAction;
    use siteflow_core::submission::Attachment;

    fn session() -> Session {
        Session {
            id: 105,
            user_type: "supervisor".to_string(),
        }
    }

    fn submission(action: ApprovalAction) -> ActionSubmission {
        ActionSubmission {
            action,
            remarks: "Verified on site".to_string(),
            observed_by: "S. Iyer".to_string(),
            escalation_date: Some("2026-09-01T00:00:00Z".parse().unwrap()),
            attachment: None,
        }
    }

    fn unreachable_dispatcher() -> Dispatcher {
        // Port 1 on loopback: connections fail fast, no request escapes.
        Dispatcher::new(
            ApiGateway::new("http://127.0.0.1:1/api/v1".to_string()),
            ActivityTracker::new(),
        )
    }

    #[test]
    fn test_flow_action_fields_match_wire_contract() {
        let mut sub = submission(ApprovalAction::Approve);
        sub.attachment = Some(Attachment {
            file_name: "site_photo.jpg".to_string(),
            bytes: vec![0xFF, 0xD8],
        });

        let fields = FlowActionFields::assemble(12, &sub, &session()).unwrap();
        assert_eq!(fields.id, "12");
        assert_eq!(fields.status_to, "approve");
        assert_eq!(fields.action_taken, "Verified on site");
        assert_eq!(fields.auto_slg_target_date, "2026-09-01");
        assert_eq!(fields.updated_by, "MTA1"); // base64("105")
        let (name, bytes) = fields.document.unwrap();
        assert_eq!(name, "site_photo.jpg");
        assert_eq!(bytes, vec![0xFF, 0xD8]);
    }

    #[test]
    fn test_amendment_body_serializes_camel_case() {
        let body = AmendmentBody {
            flow_id: 12,
            remarks: "Re-measured",
            items: vec![AmendmentItemBody {
                id: 1,
                certified_qty: "61".parse().unwrap(),
            }],
            updated_by: session().encoded_id(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["flowId"], 12);
        assert_eq!(json["items"][0]["certifiedQty"], "61");
        assert_eq!(json["updatedBy"], "MTA1");
    }

    #[test]
    fn test_outcome_success_navigates_to_index_screen() {
        let envelope: ApiEnvelope<serde_json::Value> =
            serde_json::from_str(r#"{"success": true, "message": "Bill approved"}"#).unwrap();
        let outcome = Dispatcher::outcome_from(envelope, Module::BuilderBilling).unwrap();
        assert_eq!(outcome.message, "Bill approved");
        assert_eq!(outcome.return_to, "Builder Billing");
    }

    #[test]
    fn test_outcome_success_without_message_uses_default() {
        let envelope: ApiEnvelope<serde_json::Value> =
            serde_json::from_str(r#"{"success": true}"#).unwrap();
        let outcome = Dispatcher::outcome_from(envelope, Module::Attendance).unwrap();
        assert_eq!(outcome.message, DEFAULT_SUCCESS_MESSAGE);
        assert_eq!(outcome.return_to, "Attendance");
    }

    #[test]
    fn test_outcome_failure_surfaces_server_message() {
        let envelope: ApiEnvelope<serde_json::Value> =
            serde_json::from_str(r#"{"success": false, "message": "Already actioned"}"#).unwrap();
        let err = Dispatcher::outcome_from(envelope, Module::DailyProgress).unwrap_err();
        assert_matches!(err, ClientError::Rejected(msg) if msg == "Already actioned");
    }

    #[test]
    fn test_in_flight_guard_rejects_overlap_and_clears_on_drop() {
        let flag = Arc::new(AtomicBool::new(false));
        let first = InFlightGuard::acquire(&flag).unwrap();
        assert!(InFlightGuard::acquire(&flag).is_none());
        drop(first);
        assert!(InFlightGuard::acquire(&flag).is_some());
    }

    #[tokio::test]
    async fn test_validation_failure_issues_no_request_and_clears_flag() {
        let dispatcher = unreachable_dispatcher();
        let mut sub = submission(ApprovalAction::Approve);
        sub.remarks = "   ".to_string();

        // A transport error would be ClientError::Request; a Core error
        // proves the network was never touched.
        let err = dispatcher
            .submit_action(
                Module::BuilderBilling,
                12,
                &sub,
                &WorkflowState::AwaitingLevel1,
                &session(),
            )
            .await
            .unwrap_err();
        assert_matches!(err, ClientError::Core(_));
        assert!(!dispatcher.is_submitting());
    }

    #[tokio::test]
    async fn test_disallowed_action_blocked_before_any_request() {
        let dispatcher = unreachable_dispatcher();
        let err = dispatcher
            .submit_action(
                Module::CustomerBilling,
                12,
                &submission(ApprovalAction::Return),
                &WorkflowState::AwaitingLevel1,
                &session(),
            )
            .await
            .unwrap_err();
        assert_matches!(err, ClientError::Core(_));
    }

    #[tokio::test]
    async fn test_transport_failure_clears_in_flight_state() {
        let dispatcher = unreachable_dispatcher();
        let err = dispatcher
            .submit_action(
                Module::BuilderBilling,
                12,
                &submission(ApprovalAction::Approve),
                &WorkflowState::AwaitingLevel1,
                &session(),
            )
            .await
            .unwrap_err();
        assert_matches!(err, ClientError::Request(_));
        assert!(!dispatcher.is_submitting());
    }
}
