//! Raw node record -> display-ready [`Post`].
//!
//! Single fallback policy: display name and avatar come from the
//! `profile.name` / `profile.profile_image` keys of the metadata blob when
//! present and non-empty, and otherwise fall back to the raw handle and the
//! handle-based avatar URL. Malformed metadata never raises; it is reported as
//! [`Normalized::FallbackApplied`].

use crate::types::{Post, RawAccount, RawPost};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

const AVATAR_BASE: &str = "https://images.hive.blog/u";
const POST_BASE: &str = "https://hive.blog";

/// Outcome of normalizing one record.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    /// Display name and avatar both came from the record's profile
    Ok(Post),
    /// At least one derived field used the handle-based default
    FallbackApplied(Post),
}

impl Normalized {
    pub fn post(&self) -> &Post {
        match self {
            Normalized::Ok(p) | Normalized::FallbackApplied(p) => p,
        }
    }

    pub fn into_post(self) -> Post {
        match self {
            Normalized::Ok(p) | Normalized::FallbackApplied(p) => p,
        }
    }

    pub fn fallback_applied(&self) -> bool {
        matches!(self, Normalized::FallbackApplied(_))
    }
}

/// Profile fields pulled out of a `json_metadata` blob.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileFields {
    pub name: Option<String>,
    pub profile_image: Option<String>,
    pub about: Option<String>,
}

/// Parse the `profile` object of a metadata blob. `None` when the blob is
/// empty, not JSON, or has no `profile` object.
pub fn parse_profile(json_metadata: &str) -> Option<ProfileFields> {
    if json_metadata.trim().is_empty() {
        return None;
    }
    let meta: Value = serde_json::from_str(json_metadata).ok()?;
    let profile = meta.get("profile")?.as_object()?;

    let field = |k: &str| {
        profile
            .get(k)
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    Some(ProfileFields {
        name: field("name"),
        profile_image: field("profile_image"),
        about: field("about"),
    })
}

/// Profile of an account record; `posting_json_metadata` is consulted when
/// `json_metadata` carries no profile.
pub fn account_profile_fields(account: &RawAccount) -> Option<ProfileFields> {
    parse_profile(&account.json_metadata).or_else(|| parse_profile(&account.posting_json_metadata))
}

/// Deterministic avatar for a handle
pub fn default_avatar_url(handle: &str) -> String {
    format!("{AVATAR_BASE}/{handle}/avatar")
}

/// Canonical web URL of a post
pub fn post_url(author: &str, permlink: &str) -> String {
    format!("{POST_BASE}/@{author}/{permlink}")
}

/// Parse a node timestamp. Nodes emit naive `2024-01-02T03:04:05`, which is UTC.
/// Fractional seconds, a trailing `Z` and explicit offsets are tolerated.
pub fn parse_created(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    let naive = s.trim_end_matches('Z');
    NaiveDateTime::parse_from_str(naive, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(naive, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
        .map(|n| n.and_utc())
}

/// Normalize one raw record.
pub fn normalize(raw: RawPost) -> Normalized {
    let profile = parse_profile(&raw.json_metadata).unwrap_or_default();
    let fallback = profile.name.is_none() || profile.profile_image.is_none();

    let author_display_name = profile.name.unwrap_or_else(|| raw.author.clone());
    let author_avatar_url = profile
        .profile_image
        .unwrap_or_else(|| default_avatar_url(&raw.author));

    let created = parse_created(&raw.created).unwrap_or_else(|| {
        log::debug!(
            "unparsable created '{}' on @{}/{}",
            raw.created,
            raw.author,
            raw.permlink
        );
        DateTime::<Utc>::default()
    });

    let post = Post {
        url: post_url(&raw.author, &raw.permlink),
        title: raw.title,
        body: raw.body,
        category: raw.category,
        created,
        replies: raw.children,
        vote_percents: raw.active_votes.iter().map(|v| v.percent).collect(),
        json_metadata: raw.json_metadata,
        author_display_name,
        author_avatar_url,
        pending_payout_value: raw.pending_payout_value,
        author: raw.author,
        permlink: raw.permlink,
    };

    if fallback {
        Normalized::FallbackApplied(post)
    } else {
        Normalized::Ok(post)
    }
}

/// Normalize a batch, keeping input order.
pub fn normalize_all<I>(raws: I) -> Vec<Post>
where
    I: IntoIterator<Item = RawPost>,
{
    let mut fallbacks = 0usize;
    let posts: Vec<Post> = raws
        .into_iter()
        .map(|raw| {
            let n = normalize(raw);
            if n.fallback_applied() {
                fallbacks += 1;
            }
            n.into_post()
        })
        .collect();
    log::debug!(
        "normalized {} posts ({} with profile fallback)",
        posts.len(),
        fallbacks
    );
    posts
}

/// Override a post's author display fields from the author's account profile.
/// Only non-empty profile values win.
pub fn apply_account_profile(post: &mut Post, account: &RawAccount) {
    if let Some(profile) = account_profile_fields(account) {
        if let Some(name) = profile.name {
            post.author_display_name = name;
        }
        if let Some(image) = profile.profile_image {
            post.author_avatar_url = image;
        }
    }
}
