//! The field modules that share the approval workflow.
//!
//! Builder billing, customer billing, daily progress, attendance, and
//! safety checklists all drive the same approval chain; the only
//! differences are their endpoints, upload directories, and list screens.
//! `Module` captures those differences so the workflow layer can stay
//! generic instead of being copy-pasted per screen.

use serde::{Deserialize, Serialize};

use crate::types::EntityId;

/// A business module participating in the approval workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Module {
    /// Running bills raised against the builder.
    BuilderBilling,
    /// Running bills raised against the end customer.
    CustomerBilling,
    /// Daily progress report entries.
    DailyProgress,
    /// Contract-worker attendance sheets.
    Attendance,
    /// Site safety inspection checklists.
    SafetyChecklist,
}

/// All modules, in menu order.
pub const ALL_MODULES: &[Module] = &[
    Module::BuilderBilling,
    Module::CustomerBilling,
    Module::DailyProgress,
    Module::Attendance,
    Module::SafetyChecklist,
];

impl Module {
    /// Stable lowercase identifier used in endpoint paths and CLI args.
    pub fn slug(self) -> &'static str {
        match self {
            Module::BuilderBilling => "builder-billing",
            Module::CustomerBilling => "customer-billing",
            Module::DailyProgress => "daily-progress",
            Module::Attendance => "attendance",
            Module::SafetyChecklist => "safety-checklist",
        }
    }

    /// Parse a slug back into a module.
    pub fn from_slug(slug: &str) -> Option<Module> {
        ALL_MODULES.iter().copied().find(|m| m.slug() == slug)
    }

    /// Relative path of the detail endpoint for one entity.
    pub fn detail_path(self, entity_id: EntityId) -> String {
        format!("/{}/{}/detail", self.slug(), entity_id)
    }

    /// Relative path of the flow-action endpoint.
    pub fn flow_action_path(self) -> String {
        format!("/{}/flow-action", self.slug())
    }

    /// Relative path of the amendment endpoint (returned-to-submitter edits).
    pub fn amendment_path(self) -> String {
        format!("/{}/amendment", self.slug())
    }

    /// Server-side upload directory segment for attached documents.
    pub fn upload_dir(self) -> &'static str {
        match self {
            Module::BuilderBilling => "builder-bills",
            Module::CustomerBilling => "customer-bills",
            Module::DailyProgress => "dpr",
            Module::Attendance => "attendance",
            Module::SafetyChecklist => "safety",
        }
    }

    /// Display name of the list screen to return to after a submission.
    pub fn index_screen(self) -> &'static str {
        match self {
            Module::BuilderBilling => "Builder Billing",
            Module::CustomerBilling => "Customer Billing",
            Module::DailyProgress => "Daily Progress",
            Module::Attendance => "Attendance",
            Module::SafetyChecklist => "Safety Checklist",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_round_trip() {
        for module in ALL_MODULES {
            assert_eq!(Module::from_slug(module.slug()), Some(*module));
        }
    }

    #[test]
    fn test_unknown_slug_rejected() {
        assert_eq!(Module::from_slug("payroll"), None);
        assert_eq!(Module::from_slug(""), None);
    }

    #[test]
    fn test_detail_path_embeds_entity_id() {
        assert_eq!(
            Module::BuilderBilling.detail_path(42),
            "/builder-billing/42/detail"
        );
    }

    #[test]
    fn test_flow_action_path_per_module() {
        assert_eq!(
            Module::Attendance.flow_action_path(),
            "/attendance/flow-action"
        );
        assert_eq!(
            Module::SafetyChecklist.flow_action_path(),
            "/safety-checklist/flow-action"
        );
    }

    #[test]
    fn test_serde_uses_kebab_case() {
        let json = serde_json::to_string(&Module::DailyProgress).unwrap();
        assert_eq!(json, "\"daily-progress\"");
    }
}
