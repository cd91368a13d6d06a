//! Render context fixtures.

use serde_json::Value;

use crate::context::{
    Assignee, MemberId, PubId, PubRecord, Recipient, RecipientUser, RenderContext, UserId,
};

/// An assignee with an `<first>@example.com` address.
#[must_use]
pub fn assignee(first_name: &str, last_name: Option<&str>) -> Assignee {
    Assignee {
        first_name: first_name.to_string(),
        last_name: last_name.map(str::to_string),
        email: format!("{}@example.com", first_name.to_lowercase()),
    }
}

/// The default context: recipient Ada Lovelace in community `croccroc`, a pub
/// with a title and a URL, no assignee and no parent pub.
#[must_use]
pub fn context_fixture() -> RenderContext {
    ContextBuilder::new().build()
}

/// Builder for [`RenderContext`] values in tests.
#[derive(Debug, Clone)]
pub struct ContextBuilder {
    context: RenderContext,
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextBuilder {
    #[must_use]
    pub fn new() -> Self {
        let mut pub_record = PubRecord {
            id: PubId::new("pub-1"),
            ..PubRecord::default()
        };
        pub_record.values.insert("croccroc:title".to_string(), Value::from("A Pub"));
        pub_record
            .values
            .insert("croccroc:url".to_string(), Value::from("https://example.com/pub-1"));

        Self {
            context: RenderContext {
                recipient: Recipient {
                    id: MemberId::new("member-ada"),
                    user: RecipientUser {
                        id: UserId::new("user-ada"),
                        first_name: "Ada".to_string(),
                        last_name: Some("Lovelace".to_string()),
                        email: "ada@x.io".to_string(),
                    },
                },
                community_slug: "croccroc".to_string(),
                pub_record,
                parent_pub: None,
            },
        }
    }

    /// Set the recipient's name.
    #[must_use]
    pub fn recipient(mut self, first_name: &str, last_name: Option<&str>) -> Self {
        let user = &mut self.context.recipient.user;
        user.first_name = first_name.to_string();
        user.last_name = last_name.map(str::to_string);
        self
    }

    /// Add values to the pub.
    #[must_use]
    pub fn values<'a>(mut self, values: impl IntoIterator<Item = (&'a str, Value)>) -> Self {
        for (field, value) in values {
            self.context.pub_record.values.insert(field.to_string(), value);
        }
        self
    }

    #[must_use]
    pub fn assignee(mut self, assignee: Assignee) -> Self {
        self.context.pub_record.assignee = Some(assignee);
        self
    }

    /// Add values to the parent pub, creating it if needed.
    #[must_use]
    pub fn parent_values<'a>(mut self, values: impl IntoIterator<Item = (&'a str, Value)>) -> Self {
        let parent = self.parent();
        for (field, value) in values {
            parent.values.insert(field.to_string(), value);
        }
        self
    }

    /// Set the parent pub's assignee, creating the parent if needed.
    #[must_use]
    pub fn parent_assignee(mut self, assignee: Assignee) -> Self {
        self.parent().assignee = Some(assignee);
        self
    }

    fn parent(&mut self) -> &mut PubRecord {
        self.context.parent_pub.get_or_insert_with(|| PubRecord {
            id: PubId::new("pub-parent"),
            ..PubRecord::default()
        })
    }

    #[must_use]
    pub fn build(self) -> RenderContext {
        self.context
    }
}
