//! Recording fake for [`FormAccess`].

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

use crate::access::FormAccess;
use crate::context::{MemberId, PubId, UserId};

/// [`FormAccess`] that records calls and mints deterministic URLs.
///
/// Forms registered with [`failing_membership`](Self::failing_membership) or
/// [`failing_mint`](Self::failing_mint) make the respective call fail.
#[derive(Debug, Default)]
pub struct RecordingFormAccess {
    memberships: Mutex<Vec<(MemberId, String)>>,
    invites: Mutex<Vec<(UserId, String, PubId)>>,
    failing_membership: HashSet<String>,
    failing_mint: HashSet<String>,
}

impl RecordingFormAccess {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `ensure_membership` fail for `form`.
    #[must_use]
    pub fn failing_membership(mut self, form: &str) -> Self {
        self.failing_membership.insert(form.to_string());
        self
    }

    /// Make `mint_invite_link` fail for `form`.
    #[must_use]
    pub fn failing_mint(mut self, form: &str) -> Self {
        self.failing_mint.insert(form.to_string());
        self
    }

    /// The URL this fake mints for `user` on `form`.
    #[must_use]
    pub fn url_for(form: &str, user: &UserId) -> String {
        format!("https://forms.test/{form}/fill?token=token-{user}")
    }

    /// Recorded `ensure_membership` calls, in call order.
    pub fn memberships(&self) -> Vec<(MemberId, String)> {
        self.memberships.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    /// Recorded `mint_invite_link` calls, in call order.
    pub fn invites(&self) -> Vec<(UserId, String, PubId)> {
        self.invites.lock().map(|calls| calls.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl FormAccess for RecordingFormAccess {
    async fn ensure_membership(&self, member: &MemberId, form_slug: &str) -> anyhow::Result<()> {
        if let Ok(mut calls) = self.memberships.lock() {
            calls.push((member.clone(), form_slug.to_string()));
        }
        if self.failing_membership.contains(form_slug) {
            anyhow::bail!("form '{form_slug}' does not exist");
        }
        Ok(())
    }

    async fn mint_invite_link(
        &self,
        user: &UserId,
        form_slug: &str,
        pub_id: &PubId,
    ) -> anyhow::Result<String> {
        if let Ok(mut calls) = self.invites.lock() {
            calls.push((user.clone(), form_slug.to_string(), pub_id.clone()));
        }
        if self.failing_mint.contains(form_slug) {
            anyhow::bail!("token service rejected form '{form_slug}'");
        }
        Ok(Self::url_for(form_slug, user))
    }
}
