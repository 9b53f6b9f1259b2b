//! Cursor-based walking of the discussion listings.
//!
//! The pager is stateless: cursor, page size, sort and accumulated items all
//! belong to the caller (see [`crate::session::FeedSession`]).

use crate::condenser_api::HiveApi;
use crate::cursor::strip_boundary;
use crate::error::{HiveError, Result};
use crate::normalize::normalize_all;
use crate::rpc_utils::RpcTransport;
use crate::types::{DiscussionMethod, ListingQuery, Page, PageCursor, SortMode};

pub struct DiscussionPager<'a, T> {
    api: &'a HiveApi<T>,
}

impl<'a, T: RpcTransport> DiscussionPager<'a, T> {
    pub fn new(api: &'a HiveApi<T>) -> Self {
        Self { api }
    }

    /// Fetch one page of `tag` in `sort` order.
    ///
    /// Asks the node for `page_size + 1` items; the extra one only signals
    /// that more exist. `has_more` is decided on the raw count before the
    /// boundary item is removed, and the returned list never exceeds
    /// `page_size`.
    pub async fn fetch_page(
        &self,
        sort: SortMode,
        tag: &str,
        page_size: u32,
        cursor: Option<&PageCursor>,
    ) -> Result<Page> {
        self.fetch_method_page(sort.method(), tag, page_size, cursor)
            .await
    }

    /// Same as [`Self::fetch_page`] for any listing method, including the blog listing.
    pub async fn fetch_method_page(
        &self,
        method: DiscussionMethod,
        tag: &str,
        page_size: u32,
        cursor: Option<&PageCursor>,
    ) -> Result<Page> {
        if page_size == 0 {
            return Err(HiveError::InvalidArgument("page size must be >= 1".into()));
        }

        let query =
            ListingQuery::new(tag, page_size.saturating_add(1)).starting_at(cursor.cloned());
        let raw = self.api.get_discussions(method, &query).await?;
        let raw_len = raw.len();

        let kept = strip_boundary(cursor, &raw);
        let dropped = raw_len - kept.len();
        let mut items = normalize_all(kept.iter().cloned());
        items.truncate(page_size as usize);

        let has_more = raw_len > page_size as usize;
        log::debug!(
            "{} tag='{}' raw={} boundary_dropped={} items={} has_more={}",
            method.rpc_name(),
            tag,
            raw_len,
            dropped,
            items.len(),
            has_more
        );

        Ok(Page { items, has_more })
    }

    /// Walk up to `max_pages` pages, feeding each page's last item back as the
    /// next cursor. Stops early once a page reports no more data. The
    /// combined page's `has_more` is that of the last page fetched.
    pub async fn collect_pages(
        &self,
        sort: SortMode,
        tag: &str,
        page_size: u32,
        max_pages: u32,
    ) -> Result<Page> {
        let mut all = Page::default();
        let mut cursor: Option<PageCursor> = None;

        for round in 0..max_pages {
            let page = self.fetch_page(sort, tag, page_size, cursor.as_ref()).await?;
            let next = page.next_cursor();
            all.has_more = page.has_more;
            all.items.extend(page.items);

            log::debug!("collect_pages round={} total={}", round + 1, all.items.len());
            match next {
                Some(c) if all.has_more => cursor = Some(c),
                _ => break,
            }
        }

        Ok(all)
    }
}
