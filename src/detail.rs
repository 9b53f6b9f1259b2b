use crate::condenser_api::HiveApi;
use crate::error::Result;
use crate::normalize::{apply_account_profile, normalize, normalize_all};
use crate::rpc_utils::RpcTransport;
use crate::types::Post;

/// A post with its direct comments.
#[derive(Debug, Clone, PartialEq)]
pub struct PostDetail {
    pub post: Post,
    pub comments: Vec<Post>,
}

/// Load one exact post, its author's profile and its direct replies.
///
/// `Ok(None)` when the node has no such post. A failed account lookup only
/// costs the profile overrides; a failed replies lookup aborts.
pub async fn fetch_post_detail<T: RpcTransport>(
    api: &HiveApi<T>,
    author: &str,
    permlink: &str,
) -> Result<Option<PostDetail>> {
    let Some(raw) = api.get_content(author, permlink).await? else {
        log::info!("post @{author}/{permlink} not found");
        return Ok(None);
    };

    let (account, replies) = futures::join!(
        api.get_account(&raw.author),
        api.get_content_replies(&raw.author, &raw.permlink)
    );

    let mut post = normalize(raw).into_post();
    match account {
        Ok(Some(acct)) => apply_account_profile(&mut post, &acct),
        Ok(None) => log::warn!("no account record for @{}", post.author),
        Err(e) => log::warn!("account lookup for @{} failed: {e}", post.author),
    }

    let comments = normalize_all(replies?);
    log::info!(
        "loaded @{}/{} with {} comments",
        post.author,
        post.permlink,
        comments.len()
    );
    Ok(Some(PostDetail { post, comments }))
}
