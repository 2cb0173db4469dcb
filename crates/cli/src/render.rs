//! Plain-text rendering of the detail screen.
//!
//! Pure formatting over the core view models; which sections print is
//! decided entirely by the snapshot's screen plan.

use siteflow_client::detail::EntityDetail;
use siteflow_client::documents::document_url;
use siteflow_core::flow::{FlowTone, HistoryCard};
use siteflow_core::module::Module;
use siteflow_core::quantity::ScopeItem;
use siteflow_core::types::Quantity;
use siteflow_core::workflow::WorkflowState;

/// Short tag printed in front of each history card.
fn tone_tag(tone: FlowTone) -> &'static str {
    match tone {
        FlowTone::Success => "ok",
        FlowTone::Danger => "rej",
        FlowTone::Info => "ret",
        FlowTone::Warning => "rev",
        FlowTone::Pending => "...",
    }
}

/// Format a quantity with exactly two decimal places.
fn qty2(q: Quantity) -> String {
    let mut q = q.round_dp(2);
    q.rescale(2);
    q.to_string()
}

/// Print the whole detail screen for one entity snapshot.
pub fn detail_screen(module: Module, detail: &EntityDetail, upload_base: &str) {
    println!("{} #{}", module.index_screen(), detail.id);

    if let Some(pending) = &detail.pending_with {
        println!("Pending with: {} ({})", pending.name, pending.role);
    }

    println!();
    history(module, &detail.history_cards(), upload_base);

    let plan = detail.screen_plan();
    if plan.show_action_panel {
        action_panel(detail);
    } else if plan.show_edit_form {
        edit_form(&detail.scope_items);
    } else {
        println!();
        println!("Read-only: this entity is not pending with you.");
    }
}

/// Print the flow history, one card per record.
fn history(module: Module, cards: &[HistoryCard], upload_base: &str) {
    println!("Flow history:");
    if cards.is_empty() {
        println!("  (no flow records yet)");
        return;
    }

    for card in cards {
        println!(
            "  [{}] L{} {} ({}) - {}",
            tone_tag(card.tone),
            card.level,
            card.actor,
            card.role,
            card.action_label,
        );
        if !card.remarks.trim().is_empty() {
            println!("        remarks: {}", card.remarks);
        }
        if let Some(at) = card.acted_at {
            println!("        at: {}", at.to_rfc3339());
        }
        if let Some(doc) = &card.document {
            match document_url(upload_base, module, doc) {
                Ok(url) => println!("        document: {url}"),
                Err(e) => println!("        document: <unavailable: {e}>"),
            }
        }
    }
}

/// Print the available actions for the pending approver.
fn action_panel(detail: &EntityDetail) {
    let state = detail.state();
    println!();
    match state {
        WorkflowState::AwaitingLevel1 => println!("Awaiting your action (level 1)."),
        WorkflowState::AwaitingHigherLevel { level } => {
            println!("Awaiting your action (level {level}).")
        }
        _ => return,
    }

    let actions: Vec<&str> = state
        .allowed_actions()
        .iter()
        .map(|a| a.wire_value())
        .collect();
    println!("Available actions: {}", actions.join(", "));

    if !detail.observed_by.trim().is_empty() {
        println!("Observed by: {}", detail.observed_by);
    }
    if let Some(date) = detail.escalation_date {
        println!("Escalation date: {}", date.format("%Y-%m-%d"));
    }
    println!("Submit with: siteflow act ... --action <a> --remarks <text>");
}

/// Print the amendable items with live balances for the returned submitter.
fn edit_form(items: &[ScopeItem]) {
    println!();
    println!("Returned to you for amendment. Items:");
    for item in items {
        println!(
            "  #{} {}: scope {}, cumulative {}, certified {}, balance {}, limit {}",
            item.id,
            item.name,
            qty2(item.scope_qty),
            qty2(item.cumulative_qty),
            qty2(item.certified_qty),
            qty2(item.balance()),
            qty2(item.certifiable_limit()),
        );
    }
    println!("Resubmit with: siteflow amend ... --set ITEM_ID=QTY --remarks <text>");
}
