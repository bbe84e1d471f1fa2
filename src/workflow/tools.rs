use serde::Deserialize;
use tracing::{info, warn};

use crate::context::AppContext;
use crate::domain::conversation::ToolCall;
use crate::domain::ticket::{CreatedIssue, Ticket, TicketFields, ValidationError};
use crate::error::{AppError, AppResult};
use crate::policy::SUBMIT_TICKET_TOOL;

/// The callables the model is allowed to invoke, dispatched by name through
/// an explicit registry rather than reflection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    SubmitTicket,
}

const REGISTRY: &[(&str, ToolKind)] = &[(SUBMIT_TICKET_TOOL, ToolKind::SubmitTicket)];

impl ToolKind {
    pub fn lookup(name: &str) -> Option<Self> {
        REGISTRY
            .iter()
            .find(|(tool_name, _)| *tool_name == name)
            .map(|(_, kind)| *kind)
    }
}

/// Typed decoding of the model's structured function-call payload. Unknown
/// keys are ignored; wrong shapes (e.g. `labels` as a bare string) fail the
/// decode outright.
#[derive(Debug, Deserialize)]
struct SubmitTicketArgs {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    labels: Vec<String>,
    #[serde(default)]
    location: Option<String>,
}

/// What a tool invocation came to: a filed issue, or a validation rejection
/// the conversation can recover from. Infrastructure failures propagate as
/// errors instead.
#[derive(Debug)]
pub enum SubmissionOutcome {
    Filed(CreatedIssue),
    Rejected(ValidationError),
}

pub async fn dispatch(ctx: &AppContext, call: &ToolCall) -> AppResult<SubmissionOutcome> {
    match ToolKind::lookup(&call.name) {
        Some(ToolKind::SubmitTicket) => submit_ticket(ctx, call.args.clone()).await,
        None => Err(AppError::LanguageModel(format!(
            "model invoked unknown tool '{}'",
            call.name
        ))),
    }
}

async fn submit_ticket(
    ctx: &AppContext,
    args: serde_json::Value,
) -> AppResult<SubmissionOutcome> {
    let args: SubmitTicketArgs = serde_json::from_value(args).map_err(|err| {
        AppError::LanguageModel(format!("malformed {SUBMIT_TICKET_TOOL} arguments: {err}"))
    })?;

    let fields = TicketFields {
        summary: args.summary,
        description: args.description,
        priority: args.priority,
        labels: args.labels,
        location: args.location,
    };

    let ticket = match Ticket::validate(
        fields,
        &ctx.config.jira_project_key,
        &ctx.config.jira_issue_type,
    ) {
        Ok(ticket) => ticket,
        Err(validation) => {
            warn!(error = %validation, "rejected ticket submission");
            return Ok(SubmissionOutcome::Rejected(validation));
        }
    };

    let issue = ctx
        .issue_tracker
        .create_issue(&ticket.to_wire(&ctx.config.jira_location_field))
        .await?;
    info!(key = %issue.key, "ticket filed");
    Ok(SubmissionOutcome::Filed(issue))
}
