//! Oldest post of an account, found by walking its blog listing backward.
//!
//! The walk is capped at `max_rounds` pages of `page_size`. An account with
//! more history than `max_rounds * page_size` gets the oldest post inside the
//! scanned window, not its true first post.

use crate::condenser_api::HiveApi;
use crate::cursor::strip_boundary;
use crate::error::Result;
use crate::normalize::{normalize, parse_created};
use crate::rpc_utils::RpcTransport;
use crate::types::{DiscussionMethod, ListingQuery, PageCursor, Post, RawPost};

pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const DEFAULT_MAX_ROUNDS: u32 = 5;

#[derive(Debug, Clone, PartialEq)]
pub enum FirstPostSearch {
    Found {
        post: Post,
        /// Raw items examined across all rounds
        scanned: usize,
        /// `scanned` without the boundary items repeated between rounds
        distinct: usize,
        rounds: u32,
        /// The round limit ended the walk on a full page; older posts may exist
        capped: bool,
    },
    NotFound {
        rounds: u32,
    },
}

impl FirstPostSearch {
    pub fn post(&self) -> Option<&Post> {
        match self {
            FirstPostSearch::Found { post, .. } => Some(post),
            FirstPostSearch::NotFound { .. } => None,
        }
    }

    pub fn rounds(&self) -> u32 {
        match self {
            FirstPostSearch::Found { rounds, .. } | FirstPostSearch::NotFound { rounds } => *rounds,
        }
    }

    pub fn is_capped(&self) -> bool {
        matches!(self, FirstPostSearch::Found { capped: true, .. })
    }
}

pub struct FirstPostFinder<'a, T> {
    api: &'a HiveApi<T>,
    page_size: u32,
    max_rounds: u32,
}

impl<'a, T: RpcTransport> FirstPostFinder<'a, T> {
    pub fn new(api: &'a HiveApi<T>) -> Self {
        Self {
            api,
            page_size: DEFAULT_PAGE_SIZE,
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }

    /// Override the walk bounds. Zero values are bumped to 1.
    pub fn with_limits(mut self, page_size: u32, max_rounds: u32) -> Self {
        self.page_size = page_size.max(1);
        self.max_rounds = max_rounds.max(1);
        self
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    pub async fn find_first_post(&self, username: &str) -> Result<FirstPostSearch> {
        let username = username.trim().trim_start_matches('@');
        if username.is_empty() {
            return Ok(FirstPostSearch::NotFound { rounds: 0 });
        }

        let mut all: Vec<RawPost> = Vec::new();
        let mut cursor: Option<PageCursor> = None;
        let mut rounds = 0u32;
        let mut distinct = 0usize;
        let mut last_full = false;

        while rounds < self.max_rounds {
            let query =
                ListingQuery::new(username, self.page_size).starting_at(cursor.clone());
            let raw = self
                .api
                .get_discussions(DiscussionMethod::Blog, &query)
                .await?;
            rounds += 1;

            let got = raw.len();
            log::debug!("first-post @{username} round={rounds} got={got}");
            last_full = got >= self.page_size as usize;
            if got == 0 {
                break;
            }

            distinct += strip_boundary(cursor.as_ref(), &raw).len();
            cursor = raw.last().map(PageCursor::of);
            all.extend(raw);

            if !last_full {
                break;
            }
        }

        let scanned = all.len();
        match oldest(all) {
            Some(raw) => {
                log::info!(
                    "first post of @{username}: {} (scanned {scanned} in {rounds} rounds)",
                    raw.permlink
                );
                Ok(FirstPostSearch::Found {
                    post: normalize(raw).into_post(),
                    scanned,
                    distinct,
                    rounds,
                    capped: last_full,
                })
            }
            None => {
                log::info!("no posts for @{username} after {rounds} rounds");
                Ok(FirstPostSearch::NotFound { rounds })
            }
        }
    }
}

/// Earliest record by `created`. Stable: ties keep input order. Records with
/// an unparsable timestamp sort after every parsable one.
pub fn oldest(mut raws: Vec<RawPost>) -> Option<RawPost> {
    raws.sort_by_cached_key(|r| {
        let ts = parse_created(&r.created);
        (ts.is_none(), ts)
    });
    raws.into_iter().next()
}
