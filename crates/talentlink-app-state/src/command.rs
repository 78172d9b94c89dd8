use serde::{Deserialize, Serialize};

use crate::route::Route;
use crate::state::AppState;

/// Replayable description of a side-effecting command. Queued by UI events
/// and drained by the shell's single command loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum CommandIntent {
    Bootstrap,
    StartAuthChallenge { email: String },
    VerifyAuthCode { code: String },
    RestoreSession,
    RefreshSession,
    LogoutSession,
    SendChatMessage { target_user_id: String, text: String },
    Navigate { route: Route },
}

impl CommandIntent {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Bootstrap => "bootstrap",
            Self::StartAuthChallenge { .. } => "auth.send_code",
            Self::VerifyAuthCode { .. } => "auth.verify_code",
            Self::RestoreSession => "auth.restore_session",
            Self::RefreshSession => "auth.refresh_session",
            Self::LogoutSession => "auth.logout",
            Self::SendChatMessage { .. } => "chat.send_message",
            Self::Navigate { .. } => "navigate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandErrorKind {
    Network,
    Unauthorized,
    Forbidden,
    NotFound,
    Validation,
    RateLimited,
    Server,
    Decode,
    MissingCredential,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandError {
    pub kind: CommandErrorKind,
    pub message: String,
    pub retryable: bool,
}

impl CommandError {
    pub fn missing_credential(message: impl Into<String>) -> Self {
        Self {
            kind: CommandErrorKind::MissingCredential,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: CommandErrorKind::Validation,
            message: message.into(),
            retryable: false,
        }
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (kind={:?}, retryable={})",
            self.message, self.kind, self.retryable
        )
    }
}

/// Classifies an HTTP failure into a stable error taxonomy. Status 0 means
/// the request never reached the server.
pub fn classify_http_error(
    status: u16,
    code: Option<&str>,
    message: impl Into<String>,
) -> CommandError {
    let message = message.into();
    let kind = match status {
        0 => CommandErrorKind::Network,
        401 => CommandErrorKind::Unauthorized,
        403 => CommandErrorKind::Forbidden,
        404 => CommandErrorKind::NotFound,
        400 | 409 | 422 => CommandErrorKind::Validation,
        429 => CommandErrorKind::RateLimited,
        500..=599 => CommandErrorKind::Server,
        _ => match code {
            Some("decode_failed") => CommandErrorKind::Decode,
            _ => CommandErrorKind::Unknown,
        },
    };
    let retryable = matches!(
        kind,
        CommandErrorKind::Network | CommandErrorKind::RateLimited | CommandErrorKind::Server
    );
    CommandError {
        kind,
        message,
        retryable,
    }
}

pub fn command_error_code(kind: &CommandErrorKind) -> &'static str {
    match kind {
        CommandErrorKind::Network => "network_error",
        CommandErrorKind::Unauthorized => "unauthorized",
        CommandErrorKind::Forbidden => "forbidden",
        CommandErrorKind::NotFound => "not_found",
        CommandErrorKind::Validation => "validation_failed",
        CommandErrorKind::RateLimited => "rate_limited",
        CommandErrorKind::Server => "server_error",
        CommandErrorKind::Decode => "decode_failed",
        CommandErrorKind::MissingCredential => "missing_credential",
        CommandErrorKind::Unknown => "unknown",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRequirement {
    None,
    AccessToken,
    RefreshToken,
}

/// A planned HTTP request for one intent. The shell executes the plan; the
/// mapping itself stays pure and host-testable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpCommandRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Option<serde_json::Value>,
    pub auth: AuthRequirement,
}

/// Maps an intent onto its HTTP plan. Intents with no remote side effect
/// (`Bootstrap`, `Navigate`) are rejected as validation errors; callers
/// handle them locally.
pub fn map_intent_to_http(
    intent: &CommandIntent,
    state: &AppState,
) -> Result<HttpCommandRequest, CommandError> {
    match intent {
        CommandIntent::Bootstrap | CommandIntent::Navigate { .. } => Err(CommandError::validation(
            format!("intent `{}` has no HTTP mapping", intent.label()),
        )),
        CommandIntent::StartAuthChallenge { email } => Ok(HttpCommandRequest {
            method: HttpMethod::Post,
            path: "/api/auth/send-code".to_string(),
            headers: Vec::new(),
            body: Some(serde_json::json!({ "email": email })),
            auth: AuthRequirement::None,
        }),
        CommandIntent::VerifyAuthCode { code } => {
            let mut body = serde_json::json!({ "code": code });
            if let Some(challenge_id) = state.auth.challenge_id.as_ref() {
                body["challengeId"] = serde_json::Value::String(challenge_id.clone());
            }
            Ok(HttpCommandRequest {
                method: HttpMethod::Post,
                path: "/api/auth/verify".to_string(),
                headers: Vec::new(),
                body: Some(body),
                auth: AuthRequirement::None,
            })
        }
        CommandIntent::RestoreSession => {
            if state.auth.access_token.is_none() {
                return Err(CommandError::missing_credential(
                    "access token is required to restore the session",
                ));
            }
            Ok(HttpCommandRequest {
                method: HttpMethod::Get,
                path: "/api/auth/session".to_string(),
                headers: Vec::new(),
                body: None,
                auth: AuthRequirement::AccessToken,
            })
        }
        CommandIntent::RefreshSession => {
            if state.auth.refresh_token.is_none() {
                return Err(CommandError::missing_credential(
                    "refresh token is required to refresh the session",
                ));
            }
            Ok(HttpCommandRequest {
                method: HttpMethod::Post,
                path: "/api/auth/refresh".to_string(),
                headers: Vec::new(),
                body: None,
                auth: AuthRequirement::RefreshToken,
            })
        }
        CommandIntent::LogoutSession => Ok(HttpCommandRequest {
            method: HttpMethod::Post,
            path: "/api/auth/logout".to_string(),
            headers: Vec::new(),
            body: None,
            auth: AuthRequirement::AccessToken,
        }),
        CommandIntent::SendChatMessage {
            target_user_id,
            text,
        } => {
            if state.auth.access_token.is_none() {
                return Err(CommandError::missing_credential(
                    "access token is required to send a message",
                ));
            }
            Ok(HttpCommandRequest {
                method: HttpMethod::Post,
                path: format!("/api/messages/{}", encode_path_component(target_user_id)),
                headers: Vec::new(),
                body: Some(serde_json::json!({ "text": text })),
                auth: AuthRequirement::AccessToken,
            })
        }
    }
}

pub fn encode_path_component(raw: &str) -> String {
    let mut encoded = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char);
            }
            _ => {
                encoded.push('%');
                for digit in [byte >> 4, byte & 0x0F] {
                    encoded.push(
                        char::from_digit(u32::from(digit), 16)
                            .map(|ch| ch.to_ascii_uppercase())
                            .unwrap_or('0'),
                    );
                }
            }
        }
    }
    encoded
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLatencyMetric {
    pub intent: String,
    pub latency_ms: u64,
    pub success: bool,
    pub error_kind: Option<CommandErrorKind>,
}

pub fn command_latency_metric(
    intent: &CommandIntent,
    latency_ms: u64,
    outcome: Result<(), &CommandError>,
) -> CommandLatencyMetric {
    CommandLatencyMetric {
        intent: intent.label().to_string(),
        latency_ms,
        success: outcome.is_ok(),
        error_kind: outcome.err().map(|error| error.kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_and_server_failures_are_retryable() {
        assert!(classify_http_error(0, None, "offline").retryable);
        assert!(classify_http_error(503, None, "maintenance").retryable);
        assert!(classify_http_error(429, None, "slow down").retryable);
        assert!(!classify_http_error(401, None, "expired").retryable);
        assert!(!classify_http_error(422, None, "bad email").retryable);
    }

    #[test]
    fn verify_code_plan_includes_pending_challenge() {
        let mut state = AppState::default();
        state.auth.challenge_id = Some("ch-1".to_string());
        let plan = map_intent_to_http(
            &CommandIntent::VerifyAuthCode {
                code: "123456".to_string(),
            },
            &state,
        )
        .expect("plan");
        assert_eq!(plan.path, "/api/auth/verify");
        assert_eq!(plan.body, Some(serde_json::json!({
            "code": "123456",
            "challengeId": "ch-1",
        })));
    }

    #[test]
    fn restore_session_requires_an_access_token() {
        let error = map_intent_to_http(&CommandIntent::RestoreSession, &AppState::default())
            .expect_err("missing token");
        assert_eq!(error.kind, CommandErrorKind::MissingCredential);
    }

    #[test]
    fn chat_message_path_escapes_the_target_id() {
        let mut state = AppState::default();
        state.auth.access_token = Some("tok".to_string());
        let plan = map_intent_to_http(
            &CommandIntent::SendChatMessage {
                target_user_id: "user/1 x".to_string(),
                text: "hello".to_string(),
            },
            &state,
        )
        .expect("plan");
        assert_eq!(plan.path, "/api/messages/user%2F1%20x");
        assert_eq!(plan.auth, AuthRequirement::AccessToken);
    }

    #[test]
    fn local_intents_have_no_http_mapping() {
        let error = map_intent_to_http(&CommandIntent::Bootstrap, &AppState::default())
            .expect_err("local intent");
        assert_eq!(error.kind, CommandErrorKind::Validation);
    }

    #[test]
    fn latency_metric_records_error_kind() {
        let error = classify_http_error(401, None, "expired");
        let metric = command_latency_metric(&CommandIntent::RestoreSession, 12, Err(&error));
        assert_eq!(metric.intent, "auth.restore_session");
        assert!(!metric.success);
        assert_eq!(metric.error_kind, Some(CommandErrorKind::Unauthorized));
    }
}
