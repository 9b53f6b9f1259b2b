use crate::condenser_api::HiveApi;
use crate::error::Result;
use crate::normalize::{account_profile_fields, default_avatar_url, normalize_all};
use crate::rpc_utils::RpcTransport;
use crate::types::{DiscussionMethod, ListingQuery, Post, RawAccount};
use crate::util_text::excerpt;

pub const DEFAULT_BLOG_LIMIT: u32 = 20;
pub const EXCERPT_CHARS: usize = 150;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountProfile {
    pub username: String,
    pub display_name: String,
    pub avatar_url: String,
    pub about: String,
    pub reputation: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub account: AccountProfile,
    /// Latest blog posts, bodies cut to [`EXCERPT_CHARS`]
    pub posts: Vec<Post>,
}

/// Reputation score from the raw chain value: `0 -> 25`, otherwise
/// `floor(max(log10(|raw|) - 9, 0) * 9 + 25)`.
pub fn format_reputation(raw: i64) -> i64 {
    if raw == 0 {
        return 25;
    }
    let log10 = (raw.unsigned_abs() as f64).log10();
    let score = (log10 - 9.0).max(0.0) * 9.0 + 25.0;
    score.floor() as i64
}

pub fn profile_from_account(account: &RawAccount) -> AccountProfile {
    let fields = account_profile_fields(account).unwrap_or_default();
    AccountProfile {
        username: account.name.clone(),
        display_name: fields.name.unwrap_or_else(|| account.name.clone()),
        avatar_url: fields
            .profile_image
            .unwrap_or_else(|| default_avatar_url(&account.name)),
        about: fields.about.unwrap_or_default(),
        reputation: format_reputation(account.reputation),
    }
}

/// Account profile plus its latest `limit` blog posts. `Ok(None)` when the
/// account does not exist.
pub async fn fetch_user_profile<T: RpcTransport>(
    api: &HiveApi<T>,
    username: &str,
    limit: u32,
) -> Result<Option<UserProfile>> {
    let username = username.trim().trim_start_matches('@');
    if username.is_empty() {
        return Ok(None);
    }

    let Some(raw_account) = api.get_account(username).await? else {
        log::info!("account @{username} not found");
        return Ok(None);
    };
    let account = profile_from_account(&raw_account);

    let query = ListingQuery::new(username, limit.max(1));
    let raw_posts = api.get_discussions(DiscussionMethod::Blog, &query).await?;
    let posts = normalize_all(raw_posts)
        .into_iter()
        .map(|mut p| {
            p.body = excerpt(&p.body, EXCERPT_CHARS);
            p
        })
        .collect::<Vec<_>>();

    log::info!("loaded profile @{username} with {} posts", posts.len());
    Ok(Some(UserProfile { account, posts }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{raw_posts, ScriptedTransport};
    use serde_json::json;

    #[test]
    fn reputation_formula() {
        assert_eq!(format_reputation(0), 25);
        assert_eq!(format_reputation(1_000_000_000), 25);
        assert_eq!(format_reputation(10_000_000_000), 34);
        assert_eq!(format_reputation(95_832_978_796_820), 69);
        assert_eq!(format_reputation(-10_000_000_000), 34);
        assert_eq!(format_reputation(i64::MIN), format_reputation(i64::MAX));
    }

    #[test]
    fn profile_falls_back_to_handle() {
        let p = profile_from_account(&RawAccount {
            name: "dave".into(),
            json_metadata: "{broken".into(),
            ..Default::default()
        });
        assert_eq!(p.display_name, "dave");
        assert_eq!(p.avatar_url, "https://images.hive.blog/u/dave/avatar");
        assert_eq!(p.about, "");
        assert_eq!(p.reputation, 25);
    }

    #[tokio::test]
    async fn profile_with_truncated_posts() {
        let mut posts = raw_posts("alice", "p", 2);
        posts[0]["body"] = json!("x".repeat(200));
        let api = HiveApi::new(
            ScriptedTransport::new()
                .respond(json!([{
                    "name": "alice",
                    "reputation": "10000000000",
                    "json_metadata": r#"{"profile":{"name":"Alice","about":"hello"}}"#
                }]))
                .respond(json!(posts)),
        );
        let prof = fetch_user_profile(&api, "@alice", 20).await.unwrap().unwrap();
        assert_eq!(prof.account.display_name, "Alice");
        assert_eq!(prof.account.about, "hello");
        assert_eq!(prof.account.reputation, 34);
        assert_eq!(prof.posts.len(), 2);
        assert_eq!(prof.posts[0].body.chars().count(), EXCERPT_CHARS + 3);
        assert!(prof.posts[0].body.ends_with("..."));
        assert_eq!(prof.posts[1].body, "body");

        let calls = api.transport().calls();
        assert_eq!(calls[1].0, "condenser_api.get_discussions_by_blog");
        assert_eq!(calls[1].1, json!([{"tag": "alice", "limit": 20}]));
    }

    #[tokio::test]
    async fn unknown_account() {
        let api = HiveApi::new(ScriptedTransport::new().respond(json!([])));
        assert!(fetch_user_profile(&api, "ghost", 20).await.unwrap().is_none());
        assert_eq!(api.transport().calls().len(), 1);
    }
}
