use async_trait::async_trait;
use base64::prelude::{BASE64_STANDARD, Engine as _};
use reqwest::{
    Client,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
use serde::Deserialize;
use tracing::debug;

use crate::domain::ticket::{CreateIssueBody, CreatedIssue};
use crate::error::{AppError, AppResult};
use crate::services::IssueTrackerService;

pub struct JiraClient {
    http: Client,
    base_url: Option<String>,
    email: Option<String>,
    token: Option<String>,
}

impl JiraClient {
    pub fn new(base_url: Option<String>, email: Option<String>, token: Option<String>) -> Self {
        Self {
            http: Client::new(),
            base_url,
            email,
            token,
        }
    }

    fn api_details(&self) -> AppResult<(&str, &str, &str)> {
        let base_url = self
            .base_url
            .as_deref()
            .ok_or_else(|| AppError::Configuration("Jira base URL not configured".to_string()))?;
        let email = self
            .email
            .as_deref()
            .ok_or_else(|| AppError::Configuration("Jira email not configured".to_string()))?;
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| AppError::Configuration("Jira API token not configured".to_string()))?;
        Ok((base_url, email, token))
    }

    fn auth_header(email: &str, token: &str) -> String {
        let credentials = format!("{email}:{token}");
        let encoded = BASE64_STANDARD.encode(credentials);
        format!("Basic {encoded}")
    }

    fn issue_endpoint(base_url: &str) -> String {
        format!("{}/rest/api/2/issue", base_url.trim_end_matches('/'))
    }

    fn browse_url(base_url: &str, key: &str) -> String {
        format!("{}/browse/{}", base_url.trim_end_matches('/'), key)
    }
}

#[async_trait]
impl IssueTrackerService for JiraClient {
    async fn create_issue(&self, body: &CreateIssueBody) -> AppResult<CreatedIssue> {
        let (base_url, email, token) = self.api_details()?;

        debug!(endpoint = %Self::issue_endpoint(base_url), "creating issue");
        let response = self
            .http
            .post(Self::issue_endpoint(base_url))
            .header(AUTHORIZATION, Self::auth_header(email, token))
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| AppError::IssueTracker(format!("failed to call Jira: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::IssueTracker(format!(
                "Jira responded with {status}: {detail}"
            )));
        }

        let payload: JiraCreateIssueResponse = response.json().await.map_err(|err| {
            AppError::IssueTracker(format!("failed to parse Jira response: {err}"))
        })?;

        let key = payload.key;
        let url = payload
            .self_url
            .unwrap_or_else(|| Self::browse_url(base_url, &key));

        Ok(CreatedIssue {
            key,
            url: Some(url),
        })
    }
}

#[derive(Deserialize)]
struct JiraCreateIssueResponse {
    key: String,
    #[serde(rename = "self")]
    self_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_basic_auth_header() {
        let header = JiraClient::auth_header("zeke@example.com", "token123");
        assert!(header.starts_with("Basic "));
        assert_eq!(
            header,
            format!(
                "Basic {}",
                BASE64_STANDARD.encode("zeke@example.com:token123")
            )
        );
    }

    #[test]
    fn trims_trailing_slash_in_endpoints() {
        assert_eq!(
            JiraClient::issue_endpoint("https://jira.example.com/"),
            "https://jira.example.com/rest/api/2/issue"
        );
        assert_eq!(
            JiraClient::browse_url("https://jira.example.com/", "DCM-7"),
            "https://jira.example.com/browse/DCM-7"
        );
    }

    #[tokio::test]
    async fn unconfigured_client_fails_before_any_request() {
        let client = JiraClient::new(None, None, None);
        let ticket = crate::domain::ticket::Ticket::validate(
            crate::domain::ticket::TicketFields {
                summary: Some("Disk failure".to_string()),
                priority: Some("High".to_string()),
                location: Some("1:2:3:4:5".to_string()),
                ..Default::default()
            },
            "DCM",
            "Task",
        )
        .unwrap();
        let err = client
            .create_issue(&ticket.to_wire("customfield_10001"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }
}
