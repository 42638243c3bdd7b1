//! Remote item model

use serde::Deserialize;

/// An item as returned by the Hacker News API.
///
/// Only `id` is guaranteed; every other field may be absent in the
/// JSON and stays `None` here rather than defaulting to zero or an
/// empty string. Downstream code (the filter in particular) must
/// treat a missing field as missing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Item {
    pub id: i64,

    /// Category tag: "story", "comment", "job", "poll", ...
    #[serde(rename = "type")]
    pub kind: Option<String>,

    pub title: Option<String>,

    pub url: Option<String>,

    pub score: Option<i64>,

    /// Author username
    pub by: Option<String>,

    /// Creation time, Unix epoch seconds
    pub time: Option<i64>,
}
