//! Continuation tokens and the per-endpoint rules for extracting them.

use std::fmt;
use url::Url;

/// Rendered form of [`ContinuationToken::EndOfList`].
pub const END_OF_LIST: &str = "eol";

/// Where a collection stands in its remote list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ContinuationToken {
    /// Nothing fetched yet
    #[default]
    Unloaded,
    /// Opaque value to send with the next request
    Next(String),
    /// No further pages exist this session
    EndOfList,
}

impl ContinuationToken {
    pub fn is_end(&self) -> bool {
        matches!(self, ContinuationToken::EndOfList)
    }

    /// The value to send for the next page, if any.
    pub fn cursor(&self) -> Option<&str> {
        match self {
            ContinuationToken::Next(cursor) => Some(cursor),
            _ => None,
        }
    }

    /// Wire rendering: absent, the cursor itself, or `"eol"`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ContinuationToken::Unloaded => None,
            ContinuationToken::Next(cursor) => Some(cursor),
            ContinuationToken::EndOfList => Some(END_OF_LIST),
        }
    }
}

impl fmt::Display for ContinuationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str().unwrap_or("<unloaded>"))
    }
}

/// How an endpoint pages its results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    /// `next_href` carries an `offset` parameter
    Offset,
    /// `next_href` carries an opaque `cursor` parameter
    Cursor,
    /// Bare arrays with no link; the `page` number is counted locally
    PageNumber,
}

impl Continuation {
    /// Query parameter that carries the token on the next request.
    pub fn param_name(self) -> &'static str {
        match self {
            Continuation::Offset => "offset",
            Continuation::Cursor => "cursor",
            Continuation::PageNumber => "page",
        }
    }

    /// Pull the token out of a server-provided next-page link.
    ///
    /// Missing links, unparsable links and empty values all mean there is
    /// no next page.
    pub fn extract(self, next_href: Option<&str>) -> Option<String> {
        let url = Url::parse(next_href?).ok()?;
        let name = self.param_name();
        url.query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
    }

    /// Token for the page after `current` when numbering locally.
    pub fn next_page_number(current: Option<&str>) -> String {
        let page = current.and_then(|c| c.parse::<u32>().ok()).unwrap_or(1);
        (page + 1).to_string()
    }
}
