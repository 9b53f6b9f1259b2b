//! Caller-owned view state for the feed and the first-post search.
//!
//! Each session has one owner and one mutation path: `begin_*` hands out a
//! [`RequestToken`], and `apply` merges a response only if its token is still
//! the latest one issued. A slow response to an abandoned request is dropped
//! instead of overwriting newer state.

use crate::error::HiveError;
use crate::first_post::FirstPostSearch;
use crate::types::{Page, PageCursor, Post, SortMode};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestKind {
    Refresh,
    LoadMore,
}

/// Identity of one in-flight request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestToken {
    generation: u64,
    kind: RequestKind,
}

impl RequestToken {
    pub fn kind(&self) -> RequestKind {
        self.kind
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// Superseded by a newer request; state untouched
    Stale,
    /// Request failed; pagination reset
    Failed,
}

#[derive(Debug, Clone)]
pub struct FeedSession {
    sort: SortMode,
    tag: String,
    page_size: u32,
    posts: Vec<Post>,
    has_more: bool,
    generation: u64,
    in_flight: Option<RequestKind>,
    last_updated: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

impl FeedSession {
    pub fn new(sort: SortMode, tag: impl Into<String>, page_size: u32) -> Self {
        Self {
            sort,
            tag: tag.into(),
            page_size: page_size.max(1),
            posts: Vec::new(),
            has_more: false,
            generation: 0,
            in_flight: None,
            last_updated: None,
            last_error: None,
        }
    }

    pub fn sort(&self) -> SortMode {
        self.sort
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Posts currently loaded
    pub fn loaded_count(&self) -> usize {
        self.posts.len()
    }

    pub fn unique_authors(&self) -> usize {
        self.posts
            .iter()
            .map(|p| p.author.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Start over from the first page. Clears the list immediately and
    /// invalidates any request still in flight.
    pub fn begin_refresh(&mut self) -> RequestToken {
        self.posts.clear();
        self.has_more = false;
        self.last_error = None;
        self.issue(RequestKind::Refresh)
    }

    /// Switch sort order; behaves like a refresh.
    pub fn set_sort(&mut self, sort: SortMode) -> RequestToken {
        self.sort = sort;
        self.begin_refresh()
    }

    /// Switch tag; behaves like a refresh.
    pub fn set_tag(&mut self, tag: impl Into<String>) -> RequestToken {
        self.tag = tag.into();
        self.begin_refresh()
    }

    /// Next page request, if one makes sense: something is loaded, the last
    /// page said more exists, and nothing is already loading.
    pub fn begin_load_more(&mut self) -> Option<(RequestToken, PageCursor)> {
        if !self.has_more || self.in_flight.is_some() {
            return None;
        }
        let cursor = self.posts.last()?.cursor();
        Some((self.issue(RequestKind::LoadMore), cursor))
    }

    /// Merge the response to `token`.
    pub fn apply(&mut self, token: RequestToken, result: Result<Page, HiveError>) -> ApplyOutcome {
        if token.generation != self.generation {
            log::debug!(
                "dropping stale {:?} response (gen {} < {})",
                token.kind,
                token.generation,
                self.generation
            );
            return ApplyOutcome::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(page) => {
                match token.kind {
                    RequestKind::Refresh => self.posts = page.items,
                    RequestKind::LoadMore => self.posts.extend(page.items),
                }
                self.has_more = page.has_more;
                self.last_updated = Some(Utc::now());
                self.last_error = None;
                ApplyOutcome::Applied
            }
            Err(e) => {
                log::warn!("feed {} '{}' failed: {e}", self.sort, self.tag);
                self.posts.clear();
                self.has_more = false;
                self.last_updated = None;
                self.last_error = Some(e.to_string());
                ApplyOutcome::Failed
            }
        }
    }

    fn issue(&mut self, kind: RequestKind) -> RequestToken {
        self.generation += 1;
        self.in_flight = Some(kind);
        RequestToken {
            generation: self.generation,
            kind,
        }
    }
}

/// State of the "first post of @user" search box.
#[derive(Debug, Clone, Default)]
pub struct SearchSession {
    term: String,
    generation: u64,
    loading: bool,
    result: Option<FirstPostSearch>,
    last_error: Option<String>,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn result(&self) -> Option<&FirstPostSearch> {
        self.result.as_ref()
    }

    pub fn found(&self) -> Option<&Post> {
        self.result.as_ref().and_then(FirstPostSearch::post)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Start a search for `term` (trimmed, leading `@` ignored). A blank term
    /// clears the result and returns `None`; any pending search is abandoned
    /// either way.
    pub fn begin_search(&mut self, term: &str) -> Option<(RequestToken, String)> {
        self.generation += 1;
        self.result = None;
        self.last_error = None;

        let term = term.trim().trim_start_matches('@').to_string();
        self.term = term.clone();
        if term.is_empty() {
            self.loading = false;
            return None;
        }
        self.loading = true;
        Some((
            RequestToken {
                generation: self.generation,
                kind: RequestKind::Refresh,
            },
            term,
        ))
    }

    /// Repeat the current search, if there is one.
    pub fn begin_refresh(&mut self) -> Option<(RequestToken, String)> {
        let term = self.term.clone();
        self.begin_search(&term)
    }

    pub fn apply(
        &mut self,
        token: RequestToken,
        result: Result<FirstPostSearch, HiveError>,
    ) -> ApplyOutcome {
        if token.generation != self.generation {
            return ApplyOutcome::Stale;
        }
        self.loading = false;
        match result {
            Ok(found) => {
                self.result = Some(found);
                ApplyOutcome::Applied
            }
            Err(e) => {
                log::warn!("first-post search @{} failed: {e}", self.term);
                self.result = None;
                self.last_error = Some(e.to_string());
                ApplyOutcome::Failed
            }
        }
    }
}
