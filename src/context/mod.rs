//! Render context for one email body.
//!
//! A [`RenderContext`] bundles everything directives resolve against: the
//! recipient, the community the email is sent from, the pub the email is about
//! and, optionally, that pub's parent. It is built once by the caller and only
//! ever borrowed immutably by the renderer.
//!
//! The context deserializes from the camelCase JSON the rest of the platform
//! produces:
//!
//! ```json
//! {
//!   "recipient": {
//!     "id": "member-1",
//!     "user": { "id": "user-1", "firstName": "Ada", "lastName": null, "email": "ada@x.io" }
//!   },
//!   "communitySlug": "croccroc",
//!   "pub": {
//!     "id": "pub-1",
//!     "values": { "croccroc:title": "Hello" },
//!     "assignee": { "firstName": "Grace", "lastName": "Hopper", "email": "grace@x.io" }
//!   },
//!   "parentPub": null
//! }
//! ```

mod value;

pub use value::display_value;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// The raw identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }
    };
}

id_type!(
    /// Identifier of a community membership (the principal enrolled into forms).
    MemberId
);
id_type!(
    /// Identifier of a user account.
    UserId
);
id_type!(
    /// Identifier of a pub.
    PubId
);

/// The user behind a recipient membership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipientUser {
    pub id: UserId,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    pub email: String,
}

/// The member an email is addressed to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    pub id: MemberId,
    pub user: RecipientUser,
}

/// The distinguished user assigned to a pub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignee {
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    pub email: String,
}

/// A pub as seen by directives: its id, field values and optional assignee.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PubRecord {
    pub id: PubId,
    /// Field slug to value. Values are arbitrary JSON scalars and are never type-checked.
    #[serde(default)]
    pub values: BTreeMap<String, Value>,
    #[serde(default)]
    pub assignee: Option<Assignee>,
}

impl PubRecord {
    /// Look up a field value. A key mapped to JSON `null` is present; only a
    /// missing key is `None`.
    #[must_use]
    pub fn value(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }
}

/// Everything directives resolve against for one render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderContext {
    pub recipient: Recipient,
    pub community_slug: String,
    #[serde(rename = "pub")]
    pub pub_record: PubRecord,
    #[serde(default)]
    pub parent_pub: Option<PubRecord>,
}

/// Which pub a directive addresses, selected by its `rel` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// The pub the email is about
    Own,
    /// That pub's parent (`rel=parent`)
    Parent,
}

impl RenderContext {
    /// The pub addressed by `relation`, or `None` when the parent is requested
    /// but absent.
    #[must_use]
    pub fn pub_for(&self, relation: Relation) -> Option<&PubRecord> {
        match relation {
            Relation::Own => Some(&self.pub_record),
            Relation::Parent => self.parent_pub.as_ref(),
        }
    }
}
