//! Versioned deep link router for hivex
//!
//! Supports hivex://v1/* URLs that map to the viewer's screens.
//!
//! ## Supported Routes (v1)
//!
//! - `hivex://v1/feed[/<sort>[/<tag>]]` - Discussion feed (`home` and empty are aliases)
//! - `hivex://v1/post/<author>/<permlink>` - Post detail with comments
//! - `hivex://v1/user/<name>` - Account profile and latest posts
//! - `hivex://v1/first/<name>` - Oldest post of an account
//!
//! ## Robust Parsing
//!
//! - Case-insensitive scheme: `HIVEX://`, `hivex://`
//! - Single-slash and multi-slash variants: `hivex:/v1/...`, `hivex:////v1/...`
//! - Query and fragment stripping: `hivex://v1/user/alice?ref=x#top`
//! - Percent-encoded segments: `hivex://v1/post/alice/caf%C3%A9`
//! - `#/v1/...`, `/v1/...`, `v1/...` path forms, and `#/deeplink/<encoded>`
//! - Site-style paths: `/@alice/permlink` (post) and `/@alice` (user)

use crate::types::SortMode;

/// Strip query and fragment from URL path
#[inline]
fn strip_query_frag(s: &str) -> &str {
    match s.find(|c| c == '?' || c == '#') {
        Some(i) => &s[..i],
        None => s,
    }
}

/// Extract path after hivex:// scheme (case-insensitive, handles variants)
#[inline]
fn after_scheme(raw: &str) -> Option<&str> {
    let s = raw.trim();
    let colon = s.find(':')?;
    if !s[..colon].eq_ignore_ascii_case("hivex") {
        return None;
    }
    Some(s[colon + 1..].trim_start_matches('/'))
}

fn decode_segment(seg: &str) -> Option<String> {
    let decoded = urlencoding::decode(seg).ok()?.into_owned();
    if decoded.is_empty() {
        None
    } else {
        Some(decoded)
    }
}

fn account_segment(seg: &str) -> Option<String> {
    let name = decode_segment(seg)?;
    let name = name.trim_start_matches('@');
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// V1 route variants
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteV1 {
    /// Feed: `hivex://v1/feed/<sort>/<tag>`; `None` fields use configured defaults
    Feed {
        sort: Option<SortMode>,
        tag: Option<String>,
    },
    /// Post detail: `hivex://v1/post/<author>/<permlink>`
    Post { author: String, permlink: String },
    /// Account profile: `hivex://v1/user/<name>`
    User { name: String },
    /// Oldest post of an account: `hivex://v1/first/<name>`
    FirstPost { name: String },
}

/// Versioned route container
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    /// Version 1 routes
    V1(RouteV1),
}

impl Route {
    pub fn home() -> Self {
        Route::V1(RouteV1::Feed {
            sort: None,
            tag: None,
        })
    }

    /// Canonical `hivex://` form of this route.
    pub fn to_url(&self) -> String {
        let enc = |s: &str| urlencoding::encode(s).into_owned();
        match self {
            Route::V1(RouteV1::Feed { sort, tag }) => match (sort, tag) {
                (None, None) => "hivex://v1/feed".to_string(),
                (Some(s), None) => format!("hivex://v1/feed/{s}"),
                (s, Some(t)) => format!(
                    "hivex://v1/feed/{}/{}",
                    s.unwrap_or_default(),
                    enc(t)
                ),
            },
            Route::V1(RouteV1::Post { author, permlink }) => {
                format!("hivex://v1/post/{}/{}", enc(author), enc(permlink))
            }
            Route::V1(RouteV1::User { name }) => format!("hivex://v1/user/{}", enc(name)),
            Route::V1(RouteV1::FirstPost { name }) => format!("hivex://v1/first/{}", enc(name)),
        }
    }
}

/// Parse a route from various URL formats
///
/// Returns `None` for invalid URLs or unsupported versions.
pub fn parse(raw: &str) -> Option<Route> {
    let s = raw.trim();
    if s.is_empty() {
        return Some(Route::home());
    }

    if let Some(encoded) = s.strip_prefix("#/deeplink/") {
        let decoded = urlencoding::decode(encoded).ok()?;
        return parse(&decoded);
    }

    // Extract path component from various formats
    let path = if let Some(rest) = after_scheme(s) {
        rest
    } else if let Some(rest) = s.strip_prefix("#/") {
        rest
    } else if let Some(rest) = s.strip_prefix('/') {
        rest
    } else {
        s
    };

    let path = strip_query_frag(path);
    let mut segments = path.split('/').filter(|s| !s.is_empty());

    let first = segments.next()?;

    // Site-style paths: @author/permlink or @author
    if first.starts_with('@') {
        let name = account_segment(first)?;
        return match segments.next() {
            Some(p) => Some(Route::V1(RouteV1::Post {
                author: name,
                permlink: decode_segment(p)?,
            })),
            None => Some(Route::V1(RouteV1::User { name })),
        };
    }

    if !first.eq_ignore_ascii_case("v1") {
        return None; // Unsupported version
    }

    let page = segments.next().unwrap_or("").to_ascii_lowercase();
    match page.as_str() {
        "" | "home" | "feed" => {
            let sort = match segments.next() {
                Some(s) => Some(s.parse::<SortMode>().ok()?),
                None => None,
            };
            let tag = match segments.next() {
                Some(t) => Some(decode_segment(t)?),
                None => None,
            };
            Some(Route::V1(RouteV1::Feed { sort, tag }))
        }
        "post" => {
            let author = account_segment(segments.next()?)?;
            let permlink = decode_segment(segments.next()?)?;
            Some(Route::V1(RouteV1::Post { author, permlink }))
        }
        "user" => {
            let name = account_segment(segments.next()?)?;
            Some(Route::V1(RouteV1::User { name }))
        }
        "first" => {
            let name = account_segment(segments.next()?)?;
            Some(Route::V1(RouteV1::FirstPost { name }))
        }
        _ => None, // Unknown route
    }
}
