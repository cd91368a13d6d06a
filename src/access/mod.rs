//! Form membership and invite links for deferred `:link{form=...}` directives.
//!
//! A form link in an email must take its recipient straight into the form, so
//! resolving one has side effects: the recipient is enrolled as a member of the
//! form and a one-time invite link is minted for them. Both calls go to an
//! external service behind the [`FormAccess`] trait.
//!
//! # Implementations
//!
//! - [`HttpFormAccess`] - talks to the form API configured in `[forms]`
//! - [`UnconfiguredFormAccess`] - fails every call; used when no API is configured
//!   so documents without form links still render

mod http;

pub use http::HttpFormAccess;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::context::{MemberId, PubId, RenderContext, UserId};
use crate::core::{DirectiveError, Result, UpstreamOperation};

/// The external operations deferred links depend on.
#[async_trait]
pub trait FormAccess: Send + Sync {
    /// Enroll `member` in the form. Enrolling an existing member is a no-op.
    async fn ensure_membership(&self, member: &MemberId, form_slug: &str) -> anyhow::Result<()>;

    /// Mint a single-use invite link for `user` scoped to the form and pub.
    async fn mint_invite_link(
        &self,
        user: &UserId,
        form_slug: &str,
        pub_id: &PubId,
    ) -> anyhow::Result<String>;
}

/// [`FormAccess`] that fails every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredFormAccess;

#[async_trait]
impl FormAccess for UnconfiguredFormAccess {
    async fn ensure_membership(&self, _member: &MemberId, _form_slug: &str) -> anyhow::Result<()> {
        anyhow::bail!("no form API is configured (add a [forms] section to the configuration)")
    }

    async fn mint_invite_link(
        &self,
        _user: &UserId,
        _form_slug: &str,
        _pub_id: &PubId,
    ) -> anyhow::Result<String> {
        anyhow::bail!("no form API is configured (add a [forms] section to the configuration)")
    }
}

/// Resolves the href of one deferred form link.
#[derive(Clone)]
pub struct AuthLinkEnricher {
    access: Arc<dyn FormAccess>,
}

impl AuthLinkEnricher {
    pub fn new(access: Arc<dyn FormAccess>) -> Self {
        Self {
            access,
        }
    }

    /// Enroll the recipient in `form_slug`, then mint their invite link.
    ///
    /// The two calls run in sequence; a failure of either is an
    /// [`DirectiveError::UpstreamFailure`] and nothing is retried.
    pub async fn invite_link(&self, form_slug: &str, context: &RenderContext) -> Result<String> {
        let recipient = &context.recipient;

        debug!("Ensuring member {} belongs to form '{}'", recipient.id, form_slug);
        self.access
            .ensure_membership(&recipient.id, form_slug)
            .await
            .map_err(|e| DirectiveError::upstream(UpstreamOperation::EnsureMembership, form_slug, e))?;

        debug!("Minting invite link to form '{}' for user {}", form_slug, recipient.user.id);
        let url = self
            .access
            .mint_invite_link(&recipient.user.id, form_slug, &context.pub_record.id)
            .await
            .map_err(|e| DirectiveError::upstream(UpstreamOperation::MintInviteLink, form_slug, e))?;

        Ok(url)
    }
}

impl std::fmt::Debug for AuthLinkEnricher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthLinkEnricher").finish_non_exhaustive()
    }
}
