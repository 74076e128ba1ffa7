//! Remote feed messages.

use crate::error::{ProtocolError, ProtocolResult};
use quotebook_core::{CoreResult, QuoteList, QuoteRecord};
use serde::Deserialize;

/// Category stamped on every remote-derived quote.
///
/// The remote feed's own categorisation is discarded.
pub const REMOTE_CATEGORY: &str = "Server";

/// A post from the remote feed.
///
/// Only `title` is required; it becomes the quote text. The remaining fields
/// of a JSONPlaceholder-style post are accepted and ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemotePost {
    /// Post title, used as the quote text.
    pub title: String,
    /// Post ID.
    #[serde(default)]
    pub id: Option<u64>,
    /// Author ID.
    #[serde(default)]
    pub user_id: Option<u64>,
    /// Post body.
    #[serde(default)]
    pub body: Option<String>,
}

impl RemotePost {
    /// Creates a post with only a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            id: None,
            user_id: None,
            body: None,
        }
    }

    /// Converts the post into a quote in the [`REMOTE_CATEGORY`].
    ///
    /// # Errors
    ///
    /// Returns a validation error if the title is blank.
    pub fn into_quote(self) -> CoreResult<QuoteRecord> {
        QuoteRecord::new(self.title, REMOTE_CATEGORY)
    }
}

/// Decodes a JSON array of posts.
///
/// # Errors
///
/// Returns [`ProtocolError::InvalidPayload`] if the body is not JSON or not an
/// array of objects carrying a string `title`.
pub fn decode_posts(body: &[u8]) -> ProtocolResult<Vec<RemotePost>> {
    Ok(serde_json::from_slice(body)?)
}

/// Decodes at most `limit` posts from `body` into remote quotes.
///
/// Posts beyond `limit` are dropped before conversion, so a server ignoring
/// the requested limit cannot grow the remote list.
///
/// # Errors
///
/// See [`decode_posts`]; additionally [`ProtocolError::InvalidPost`] if a
/// kept post has a blank title.
pub fn decode_quotes(body: &[u8], limit: usize) -> ProtocolResult<QuoteList> {
    decode_posts(body)?
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(index, post)| {
            post.into_quote()
                .map_err(|source| ProtocolError::InvalidPost { index, source })
        })
        .collect()
}
