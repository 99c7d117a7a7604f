//! `ChatModel` backed by the Gemini `generateContent` REST endpoint.

use serde::{Deserialize, Serialize};

use felino_domain::chat::ChatRole;

use crate::domain::repository::ChatModel;
use crate::domain::types::{ModelReply, PromptTurn, ToolCall, ToolDeclaration};
use crate::error::StoreServiceError;

#[derive(Clone)]
pub struct GeminiChatModel {
    pub client: reqwest::Client,
    pub base_url: String,
    pub model: String,
    pub api_key: String,
}

// ── Wire types ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ToolSet<'a>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_call: Option<FunctionCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_response: Option<FunctionResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FunctionCall {
    name: String,
    #[serde(default)]
    args: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FunctionResponse {
    name: String,
    response: serde_json::Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolSet<'a> {
    function_declarations: Vec<FunctionDeclaration<'a>>,
}

#[derive(Debug, Serialize)]
struct FunctionDeclaration<'a> {
    name: &'a str,
    description: &'a str,
    parameters: &'a serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

// ── Request building / response parsing ──────────────────────────────────────

fn role_label(role: ChatRole) -> &'static str {
    match role {
        ChatRole::User => "user",
        ChatRole::Assistant => "model",
    }
}

fn contents(history: &[PromptTurn]) -> Vec<Content> {
    history
        .iter()
        .map(|turn| Content {
            role: role_label(turn.role).to_owned(),
            parts: vec![Part {
                text: Some(turn.text.clone()),
                ..Default::default()
            }],
        })
        .collect()
}

fn tool_sets(tools: &[ToolDeclaration]) -> Vec<ToolSet<'_>> {
    if tools.is_empty() {
        return vec![];
    }
    vec![ToolSet {
        function_declarations: tools
            .iter()
            .map(|t| FunctionDeclaration {
                name: t.name,
                description: t.description,
                parameters: &t.parameters,
            })
            .collect(),
    }]
}

fn tool_round_trip(history: &[PromptTurn], call: &ToolCall, result: &str) -> Vec<Content> {
    let mut contents = contents(history);
    contents.push(Content {
        role: "model".to_owned(),
        parts: vec![Part {
            function_call: Some(FunctionCall {
                name: call.name.clone(),
                args: call.args.clone(),
            }),
            ..Default::default()
        }],
    });
    contents.push(Content {
        role: "user".to_owned(),
        parts: vec![Part {
            function_response: Some(FunctionResponse {
                name: call.name.clone(),
                response: serde_json::json!({ "content": result }),
            }),
            ..Default::default()
        }],
    });
    contents
}

fn parse_reply(response: GenerateResponse) -> Result<ModelReply, StoreServiceError> {
    let parts = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts)
        .ok_or_else(|| StoreServiceError::AiProvider("model returned no candidates".to_owned()))?;

    let mut text = String::new();
    let mut tool_call = None;
    for part in parts {
        if let Some(t) = part.text {
            text.push_str(&t);
        } else if let Some(call) = part.function_call {
            tool_call.get_or_insert(ToolCall {
                name: call.name,
                args: call.args,
            });
        }
    }

    if text.is_empty() && tool_call.is_none() {
        return Err(StoreServiceError::AiProvider(
            "model returned an empty response".to_owned(),
        ));
    }
    Ok(ModelReply {
        text: (!text.is_empty()).then_some(text),
        tool_call,
    })
}

// ── Client ───────────────────────────────────────────────────────────────────

impl GeminiChatModel {
    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    async fn generate(&self, body: &GenerateRequest<'_>) -> Result<ModelReply, StoreServiceError> {
        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| StoreServiceError::AiProvider(format!("request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let raw = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&raw)
                .map(|b| b.error.message)
                .unwrap_or(raw);
            return Err(StoreServiceError::AiProvider(format!("{status}: {message}")));
        }

        let parsed = resp
            .json::<GenerateResponse>()
            .await
            .map_err(|e| StoreServiceError::AiProvider(format!("invalid response: {e}")))?;
        parse_reply(parsed)
    }
}

impl ChatModel for GeminiChatModel {
    async fn invoke(
        &self,
        history: &[PromptTurn],
        tools: &[ToolDeclaration],
    ) -> Result<ModelReply, StoreServiceError> {
        self.generate(&GenerateRequest {
            contents: contents(history),
            tools: tool_sets(tools),
        })
        .await
    }

    async fn continue_with_tool_result(
        &self,
        history: &[PromptTurn],
        tools: &[ToolDeclaration],
        call: &ToolCall,
        result: &str,
    ) -> Result<String, StoreServiceError> {
        let reply = self
            .generate(&GenerateRequest {
                contents: tool_round_trip(history, call, result),
                tools: tool_sets(tools),
            })
            .await?;
        reply.text.ok_or_else(|| {
            StoreServiceError::AiProvider("model answered a tool result with another tool call".to_owned())
        })
    }
}
