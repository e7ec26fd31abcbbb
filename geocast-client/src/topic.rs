//! Cell-to-topic codec.
//!
//! A cell's canonical label becomes a slash-delimited broker topic with one
//! path segment per label character (the label's own level separator is
//! dropped first). Because an ancestor's label is a prefix of every
//! descendant's label, the same holds for the topic strings — so subscribing
//! to a coarse topic with the broker's `#` wildcard also receives traffic
//! published under any finer descendant topic.
//!
//! The codec is one-way by design: nothing in the system maps topics back to
//! cells.

use geocast_spatial::CellId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Broker wildcard meaning "this topic and everything nested beneath it".
pub const WILDCARD_SUFFIX: &str = "/#";

/// Control topic notified with each newly subscribed topic.
pub const DEFAULT_REGISTER_TOPIC: &str = "/api/register";

/// Control topic notified with each dropped topic.
pub const DEFAULT_UNREGISTER_TOPIC: &str = "/api/unregister";

/// An addressing key in the broker's hierarchical topic namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Topic(String);

impl Topic {
    /// Topic path for a cell: `"/<face>/<digit>/<digit>/..."`.
    ///
    /// Guarantee: for an ancestor cell A and descendant cell B,
    /// `Topic::from_cell(A)` is a strict prefix of `Topic::from_cell(B)`.
    pub fn from_cell(cell: CellId) -> Topic {
        let label = cell.label();
        let mut path = String::with_capacity(2 * label.len());
        for ch in label.chars().filter(|&ch| ch != '/') {
            path.push('/');
            path.push(ch);
        }
        Topic(path)
    }

    /// Wildcard form used for subscriptions: the topic plus `"/#"`.
    pub fn subscription(&self) -> Topic {
        Topic(format!("{}{}", self.0, WILDCARD_SUFFIX))
    }

    /// Topic string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the underlying string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Topic {
    fn from(s: &str) -> Topic {
        Topic(s.to_string())
    }
}

impl From<String> for Topic {
    fn from(s: String) -> Topic {
        Topic(s)
    }
}
