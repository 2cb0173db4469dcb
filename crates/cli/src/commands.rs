//! One function per subcommand.
//!
//! Each command mirrors a screen of the source workflow: load the detail
//! snapshot, validate locally, submit once, report the outcome.  Failures
//! leave the user where they are; only a successful submission "navigates
//! back" (here: prints the list screen to return to).

use std::path::PathBuf;

use anyhow::{bail, Context as _};

use siteflow_client::detail::{DetailLoader, DetailOutcome, EntityDetail};
use siteflow_client::dispatch::Dispatcher;
use siteflow_client::session::{Session, SessionStore};
use siteflow_core::action::ApprovalAction;
use siteflow_core::module::{Module, ALL_MODULES};
use siteflow_core::submission::{ActionSubmission, AmendedItem, Amendment, Attachment};
use siteflow_core::types::EntityId;

use crate::render;

/// Shared wiring for all commands.
pub struct Context {
    pub loader: DetailLoader,
    pub dispatcher: Dispatcher,
    pub store: SessionStore,
    pub upload_base_url: String,
}

/// Parse a module slug, listing the valid ones on failure.
fn parse_module(slug: &str) -> anyhow::Result<Module> {
    Module::from_slug(slug).with_context(|| {
        format!(
            "unknown module '{slug}'; expected one of: {}",
            ALL_MODULES
                .iter()
                .map(|m| m.slug())
                .collect::<Vec<_>>()
                .join(", ")
        )
    })
}

/// Parse an action argument, listing the wire values on failure.
fn parse_action(raw: &str) -> anyhow::Result<ApprovalAction> {
    ApprovalAction::from_wire(raw)
        .with_context(|| format!("unknown action '{raw}'; expected approve, reject, return, or reevaluate"))
}

/// Load the session or fail with a pointer at `login`.
fn require_session(store: &SessionStore) -> anyhow::Result<Session> {
    match store.load()? {
        Some(session) => Ok(session),
        None => bail!("no session identity; run `siteflow login` first"),
    }
}

/// Load a detail snapshot, treating a deferred load as a user-facing notice.
async fn load_detail(
    ctx: &Context,
    module: Module,
    id: EntityId,
    session: Option<&Session>,
) -> anyhow::Result<Option<EntityDetail>> {
    match ctx.loader.load(module, id, session).await? {
        DetailOutcome::Loaded(detail) => Ok(Some(*detail)),
        DetailOutcome::Deferred => {
            println!("Session identity not ready; run `siteflow login` and try again.");
            Ok(None)
        }
    }
}

pub async fn detail(ctx: &Context, module: &str, id: EntityId) -> anyhow::Result<()> {
    let module = parse_module(module)?;
    let session = ctx.store.load()?;

    let Some(detail) = load_detail(ctx, module, id, session.as_ref()).await? else {
        return Ok(());
    };

    render::detail_screen(module, &detail, &ctx.upload_base_url);
    Ok(())
}

pub async fn act(
    ctx: &Context,
    module: &str,
    id: EntityId,
    action: &str,
    remarks: String,
    document: Option<PathBuf>,
) -> anyhow::Result<()> {
    let module = parse_module(module)?;
    let action = parse_action(action)?;
    let session = require_session(&ctx.store)?;

    let Some(detail) = load_detail(ctx, module, id, Some(&session)).await? else {
        return Ok(());
    };

    let state = detail.state();
    let Some(flow_id) = detail.latest_flow_id else {
        bail!("entity {id} has no pending flow record to act on");
    };

    let attachment = document
        .map(|path| -> anyhow::Result<Attachment> {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("cannot read document '{}'", path.display()))?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .with_context(|| format!("'{}' has no filename", path.display()))?;
            Ok(Attachment { file_name, bytes })
        })
        .transpose()?;

    let submission = ActionSubmission {
        action,
        remarks,
        observed_by: detail.observed_by.clone(),
        escalation_date: detail.escalation_date,
        attachment,
    };

    let outcome = ctx
        .dispatcher
        .submit_action(module, flow_id, &submission, &state, &session)
        .await?;

    println!("{}", outcome.message);
    println!("Returning to the {} list.", outcome.return_to);
    Ok(())
}

pub async fn amend(
    ctx: &Context,
    module: &str,
    id: EntityId,
    set: &[String],
    remarks: String,
) -> anyhow::Result<()> {
    let module = parse_module(module)?;
    let session = require_session(&ctx.store)?;

    let Some(detail) = load_detail(ctx, module, id, Some(&session)).await? else {
        return Ok(());
    };

    let Some(flow_id) = detail.latest_flow_id else {
        bail!("entity {id} has no pending flow record to amend against");
    };

    let items = set
        .iter()
        .map(|pair| parse_amended_item(pair, &detail))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let amendment = Amendment {
        flow_id,
        remarks,
        items,
    };

    let outcome = ctx
        .dispatcher
        .submit_amendment(module, &amendment, &detail.scope_items, &session)
        .await?;

    println!("{}", outcome.message);
    println!("Returning to the {} list.", outcome.return_to);
    Ok(())
}

/// Parse one `ITEM_ID=QTY` pair, resolving the item's display name from the
/// loaded scope items so validation errors can name it.
fn parse_amended_item(pair: &str, detail: &EntityDetail) -> anyhow::Result<AmendedItem> {
    let (raw_id, raw_qty) = pair
        .split_once('=')
        .with_context(|| format!("'{pair}' is not of the form ITEM_ID=QTY"))?;

    let item_id: EntityId = raw_id
        .trim()
        .parse()
        .with_context(|| format!("'{raw_id}' is not a valid item id"))?;

    let certified_qty = raw_qty
        .trim()
        .parse()
        .with_context(|| format!("'{raw_qty}' is not a valid quantity"))?;

    let name = detail
        .scope_items
        .iter()
        .find(|s| s.id == item_id)
        .map(|s| s.name.clone())
        .unwrap_or_else(|| format!("item {item_id}"));

    Ok(AmendedItem {
        item_id,
        name,
        certified_qty,
    })
}

pub fn login(ctx: &Context, id: EntityId, user_type: String) -> anyhow::Result<()> {
    let session = Session { id, user_type };
    ctx.store.save(&session)?;
    println!("Signed in as user {} ({}).", session.id, session.user_type);
    Ok(())
}

pub fn logout(ctx: &Context) -> anyhow::Result<()> {
    ctx.store.clear()?;
    println!("Session cleared.");
    Ok(())
}

pub fn whoami(ctx: &Context) -> anyhow::Result<()> {
    match ctx.store.load()? {
        Some(session) => {
            println!("User {} ({})", session.id, session.user_type);
        }
        None => {
            println!("No session identity; run `siteflow login`.");
        }
    }
    Ok(())
}
