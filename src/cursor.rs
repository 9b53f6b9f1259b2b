//! Boundary handling between consecutive listing pages.
//!
//! The node starts a continued listing *at* the cursor item, so the first
//! item of page N+1 repeats the last item of page N. Matching is exact
//! string equality on author and permlink, the same contract the node uses.

use crate::types::{PageCursor, RawPost};

/// True when `first` is the cursor item repeated at the top of a new page.
pub fn is_boundary_duplicate(cursor: Option<&PageCursor>, first: Option<&RawPost>) -> bool {
    match (cursor, first) {
        (Some(c), Some(p)) => p.author == c.author && p.permlink == c.permlink,
        _ => false,
    }
}

/// Raw items of a page with the repeated boundary item removed.
pub fn strip_boundary<'a>(cursor: Option<&PageCursor>, raw: &'a [RawPost]) -> &'a [RawPost] {
    if is_boundary_duplicate(cursor, raw.first()) {
        &raw[1..]
    } else {
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(author: &str, permlink: &str) -> RawPost {
        RawPost {
            author: author.into(),
            permlink: permlink.into(),
            ..Default::default()
        }
    }

    #[test]
    fn exact_match_is_dropped() {
        let c = PageCursor::new("alice", "p1");
        let raw = vec![post("alice", "p1"), post("bob", "p2")];
        let kept = strip_boundary(Some(&c), &raw);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].author, "bob");
    }

    #[test]
    fn no_cursor_keeps_everything() {
        let raw = vec![post("alice", "p1")];
        assert_eq!(strip_boundary(None, &raw).len(), 1);
    }

    #[test]
    fn matching_is_not_fuzzy() {
        let c = PageCursor::new("alice", "p1");
        assert!(!is_boundary_duplicate(Some(&c), Some(&post("Alice", "p1"))));
        assert!(!is_boundary_duplicate(Some(&c), Some(&post("alice", "p1 "))));
        assert!(!is_boundary_duplicate(Some(&c), Some(&post("alice", "p2"))));
        assert!(!is_boundary_duplicate(Some(&c), Some(&post("bob", "p1"))));
    }

    #[test]
    fn only_first_item_is_considered() {
        let c = PageCursor::new("alice", "p1");
        let raw = vec![post("bob", "p2"), post("alice", "p1")];
        assert_eq!(strip_boundary(Some(&c), &raw).len(), 2);
    }

    #[test]
    fn empty_page() {
        let c = PageCursor::new("alice", "p1");
        assert!(strip_boundary(Some(&c), &[]).is_empty());
    }
}
