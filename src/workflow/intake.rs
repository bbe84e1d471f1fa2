use serde::{Deserialize, Serialize};
use tracing::info;

use crate::context::AppContext;
use crate::domain::conversation::{Conversation, ModelReply, Turn};
use crate::domain::ticket::ValidationError;
use crate::error::{AppError, AppResult};
use crate::workflow::tools::{self, SubmissionOutcome};

/// One request of an intake session: the operator's message plus everything
/// said so far.
#[derive(Debug, Clone, Deserialize)]
pub struct TurnRequest {
    pub message: String,
    #[serde(default)]
    pub history: Conversation,
}

/// What a turn came to. `done` is only serialized when the session completed,
/// and `history` hands the extended session back to the caller, who owns it
/// between requests.
#[derive(Debug, Clone, Serialize)]
pub struct TurnReply {
    pub reply: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub done: bool,
    pub history: Conversation,
}

/// Run one turn of the intake conversation.
///
/// The single suspension point is the model call. A text reply continues the
/// session; a submission-tool invocation ends it on success. A submission the
/// validator rejects re-opens clarification instead of failing the turn, so
/// the operator can correct the field. Model and tracker failures bubble up
/// to the surface layer, which logs them and answers generically.
pub async fn handle_turn(ctx: &AppContext, request: TurnRequest) -> AppResult<TurnReply> {
    let message = request.message.trim();
    if message.is_empty() {
        return Err(AppError::EmptyMessage);
    }

    let mut history = request.history;
    history.push(Turn::user(message));

    match ctx.language_model.next_turn(&history).await? {
        ModelReply::Clarification(text) => {
            history.push(Turn::model(text.clone()));
            Ok(TurnReply {
                reply: text,
                done: false,
                history,
            })
        }
        ModelReply::ToolInvocation(call) => match tools::dispatch(ctx, &call).await? {
            SubmissionOutcome::Filed(issue) => {
                info!(key = %issue.key, turns = history.len(), "intake session complete");
                let text = match &issue.url {
                    Some(url) => format!(
                        "Ticket {} has been filed ({url}). Thank you for the report!",
                        issue.key
                    ),
                    None => format!("Ticket {} has been filed. Thank you for the report!", issue.key),
                };
                history.push(Turn::model(text.clone()));
                Ok(TurnReply {
                    reply: text,
                    done: true,
                    history,
                })
            }
            SubmissionOutcome::Rejected(validation) => {
                let text = correction_prompt(&validation);
                history.push(Turn::model(text.clone()));
                Ok(TurnReply {
                    reply: text,
                    done: false,
                    history,
                })
            }
        },
    }
}

fn correction_prompt(error: &ValidationError) -> String {
    match error {
        ValidationError::MissingField(field) => format!(
            "I still need the {field} before I can file this ticket. Could you provide it?"
        ),
        ValidationError::InvalidPriority(got) => format!(
            "'{got}' is not a priority I can file. Please pick one of Lowest, Low, Medium, High, or Highest."
        ),
        ValidationError::InvalidLocationFormat(got) => format!(
            "I couldn't read '{got}' as a rack location. Please give me the floor, hall, pod, aisle, and rack."
        ),
    }
}
