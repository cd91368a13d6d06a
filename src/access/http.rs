//! [`FormAccess`] over the platform's form API.
//!
//! - `POST {api_url}/forms/{form}/members` with `{"memberId": ...}`; any 2xx
//!   status counts as enrolled, including "already a member".
//! - `POST {api_url}/forms/{form}/invites` with `{"userId": ..., "pubId": ...}`;
//!   answers `{"url": ...}`.

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::FormAccess;
use crate::config::FormApiConfig;
use crate::context::{MemberId, PubId, UserId};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MembershipRequest<'a> {
    member_id: &'a MemberId,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InviteRequest<'a> {
    user_id: &'a UserId,
    pub_id: &'a PubId,
}

#[derive(Deserialize)]
struct InviteResponse {
    url: String,
}

/// HTTP client for the form API.
#[derive(Debug, Clone)]
pub struct HttpFormAccess {
    client: Client,
    api_url: Url,
    api_token: Option<String>,
}

impl HttpFormAccess {
    /// Build a client from the `[forms]` configuration section.
    pub fn new(config: &FormApiConfig) -> Result<Self> {
        let api_url = Url::parse(&config.api_url)
            .with_context(|| format!("Invalid form API URL '{}'", config.api_url))?;
        if api_url.cannot_be_a_base() {
            return Err(anyhow!("Form API URL '{}' cannot be used as a base URL", api_url));
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .context("Failed to build HTTP client for the form API")?;

        Ok(Self {
            client,
            api_url,
            api_token: config.resolved_token(),
        })
    }

    /// `{api_url}/forms/{form_slug}/{action}`, with the slug percent-encoded.
    fn endpoint(&self, form_slug: &str, action: &str) -> Url {
        let mut url = self.api_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["forms", form_slug, action]);
        }
        url
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl FormAccess for HttpFormAccess {
    async fn ensure_membership(&self, member: &MemberId, form_slug: &str) -> Result<()> {
        let url = self.endpoint(form_slug, "members");
        debug!("POST {}", url);

        let response = self
            .authorized(self.client.post(url))
            .json(&MembershipRequest {
                member_id: member,
            })
            .send()
            .await
            .context("Failed to reach the form API")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Form API answered HTTP {status} when adding member: {body}"));
        }
        Ok(())
    }

    async fn mint_invite_link(
        &self,
        user: &UserId,
        form_slug: &str,
        pub_id: &PubId,
    ) -> Result<String> {
        let url = self.endpoint(form_slug, "invites");
        debug!("POST {}", url);

        let response = self
            .authorized(self.client.post(url))
            .json(&InviteRequest {
                user_id: user,
                pub_id,
            })
            .send()
            .await
            .context("Failed to reach the form API")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Form API answered HTTP {status} when minting invite: {body}"));
        }

        let invite: InviteResponse =
            response.json().await.context("Form API returned an invalid invite response")?;
        if invite.url.is_empty() {
            return Err(anyhow!("Form API returned an empty invite URL"));
        }
        Ok(invite.url)
    }
}
