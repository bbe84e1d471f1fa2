use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::conversation::{Conversation, ModelReply, ToolCall};
use crate::error::{AppError, AppResult};
use crate::policy::{self, ToolDeclaration};
use crate::services::LanguageModelService;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct GeminiClient {
    http: Client,
    api_key: Option<String>,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>, model: String) -> Self {
        Self {
            http: Client::new(),
            api_key,
            model,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", GEMINI_BASE_URL, self.model)
    }
}

#[async_trait]
impl LanguageModelService for GeminiClient {
    async fn next_turn(&self, conversation: &Conversation) -> AppResult<ModelReply> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Configuration("Gemini API key not configured".to_string()))?;

        let request = GenerateContentRequest::intake_turn(conversation);

        debug!(model = %self.model, turns = conversation.len(), "sending intake turn");
        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| AppError::LanguageModel(format!("failed to call Gemini: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::LanguageModel(format!(
                "Gemini responded with {status}: {detail}"
            )));
        }

        let payload: GenerateContentResponse = response.json().await.map_err(|err| {
            AppError::LanguageModel(format!("failed to parse Gemini response: {err}"))
        })?;

        decode_reply(payload)
    }
}

/// Map the first candidate onto the tagged reply variant: a part carrying a
/// `functionCall` wins over surrounding text, otherwise the text parts are
/// joined into a clarification.
fn decode_reply(payload: GenerateContentResponse) -> AppResult<ModelReply> {
    let candidate = payload
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| AppError::LanguageModel("Gemini returned no candidates".to_string()))?;

    let parts = candidate.content.map(|content| content.parts).unwrap_or_default();

    let mut text_parts = Vec::new();
    for part in parts {
        if let Some(call) = part.function_call {
            return Ok(ModelReply::ToolInvocation(ToolCall {
                name: call.name,
                args: call.args,
            }));
        }
        if let Some(text) = part.text {
            text_parts.push(text);
        }
    }

    let reply = text_parts.join("").trim().to_string();
    if reply.is_empty() {
        return Err(AppError::LanguageModel(
            "Gemini returned an empty reply".to_string(),
        ));
    }
    Ok(ModelReply::Clarification(reply))
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    system_instruction: SystemInstruction,
    contents: &'a Conversation,
    tools: Vec<ToolPayload>,
}

impl<'a> GenerateContentRequest<'a> {
    fn intake_turn(conversation: &'a Conversation) -> Self {
        Self {
            system_instruction: SystemInstruction {
                parts: vec![InstructionPart {
                    text: policy::INTAKE_INSTRUCTION,
                }],
            },
            contents: conversation,
            tools: vec![ToolPayload {
                function_declarations: vec![policy::submission_tool()],
            }],
        }
    }
}

#[derive(Serialize)]
struct SystemInstruction {
    parts: Vec<InstructionPart>,
}

#[derive(Serialize)]
struct InstructionPart {
    text: &'static str,
}

#[derive(Serialize)]
struct ToolPayload {
    function_declarations: Vec<ToolDeclaration>,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize, Default)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default, rename = "functionCall")]
    function_call: Option<FunctionCallPayload>,
}

#[derive(Deserialize)]
struct FunctionCallPayload {
    name: String,
    #[serde(default)]
    args: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::Turn;

    fn response(json: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn decodes_text_parts_as_clarification() {
        let reply = decode_reply(response(serde_json::json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        { "text": "Which floor " },
                        { "text": "is the rack on?" }
                    ]
                }
            }]
        })))
        .unwrap();
        assert_eq!(
            reply,
            ModelReply::Clarification("Which floor is the rack on?".to_string())
        );
    }

    #[test]
    fn function_call_part_wins_over_text() {
        let reply = decode_reply(response(serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "Filing now." },
                        { "functionCall": {
                            "name": "submit_ticket",
                            "args": { "summary": "Disk failure" }
                        }}
                    ]
                }
            }]
        })))
        .unwrap();
        match reply {
            ModelReply::ToolInvocation(call) => {
                assert_eq!(call.name, "submit_ticket");
                assert_eq!(call.args["summary"], "Disk failure");
            }
            other => panic!("expected tool invocation, got {other:?}"),
        }
    }

    #[test]
    fn empty_response_is_a_model_error() {
        let err = decode_reply(response(serde_json::json!({ "candidates": [] }))).unwrap_err();
        assert!(matches!(err, AppError::LanguageModel(_)));
    }

    #[test]
    fn request_body_carries_policy_and_history() {
        let mut conversation = Conversation::default();
        conversation.push(Turn::user("rack 5 is down"));
        let body =
            serde_json::to_value(GenerateContentRequest::intake_turn(&conversation)).unwrap();

        assert!(
            body["system_instruction"]["parts"][0]["text"]
                .as_str()
                .unwrap()
                .contains("FLOOR:HALL:POD:AISLE:RACK")
        );
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "rack 5 is down");
        assert_eq!(
            body["tools"][0]["function_declarations"][0]["name"],
            "submit_ticket"
        );
    }
}
