//! End-to-end listing flows against an in-memory node

use async_trait::async_trait;
use hivex::{
    session::{ApplyOutcome, FeedSession, SearchSession},
    DiscussionPager, FirstPostFinder, FirstPostSearch, HiveApi, HiveError, RpcTransport,
    SortMode,
};
use serde_json::{json, Value};
use std::sync::Mutex;

/// Serves a fixed, newest-first list of posts the way a node does: a listing
/// continued from a cursor starts *at* the cursor item.
struct FakeNode {
    posts: Vec<Value>,
    requests: Mutex<Vec<(String, Value)>>,
    fail_after: Option<usize>,
}

impl FakeNode {
    fn new(author: &str, n: usize) -> Self {
        let posts = (0..n)
            .map(|i| {
                let meta = if i % 2 == 0 {
                    "{bad json"
                } else {
                    r#"{"profile":{"name":"Named","profile_image":"https://x/y.png"}}"#
                };
                json!({
                    "author": author,
                    "permlink": format!("post-{i}"),
                    "title": format!("Post {i}"),
                    "body": "hello",
                    // newest first: post-0 is the most recent
                    "created": format!("2024-01-01T{:02}:{:02}:00", 23 - i / 60, 59 - i % 60),
                    "children": i,
                    "active_votes": [{"percent": 10000}],
                    "json_metadata": meta,
                    "pending_payout_value": "0.500 HBD"
                })
            })
            .collect();
        Self {
            posts,
            requests: Mutex::new(Vec::new()),
            fail_after: None,
        }
    }

    fn failing_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    fn requests(&self) -> Vec<(String, Value)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl RpcTransport for FakeNode {
    async fn call(&self, method: &str, params: Value) -> hivex::Result<Value> {
        let count = {
            let mut reqs = self.requests.lock().unwrap();
            reqs.push((method.to_string(), params.clone()));
            reqs.len()
        };
        if let Some(n) = self.fail_after {
            if count > n {
                return Err(HiveError::Remote {
                    code: -32000,
                    message: "node overloaded".into(),
                });
            }
        }

        let q = &params[0];
        let limit = q["limit"].as_u64().unwrap_or(0) as usize;
        let start = match (q["start_author"].as_str(), q["start_permlink"].as_str()) {
            (Some(a), Some(p)) => self
                .posts
                .iter()
                .position(|v| v["author"] == a && v["permlink"] == p)
                .unwrap_or(self.posts.len()),
            _ => 0,
        };
        let end = (start + limit).min(self.posts.len());
        Ok(Value::Array(self.posts[start..end].to_vec()))
    }
}

#[tokio::test]
async fn feed_walk_visits_every_post_once() {
    let api = HiveApi::new(FakeNode::new("alice", 25));
    let pager = DiscussionPager::new(&api);
    let mut session = FeedSession::new(SortMode::Created, "introduceyourself", 10);

    let token = session.begin_refresh();
    let page = pager
        .fetch_page(session.sort(), session.tag(), session.page_size(), None)
        .await;
    assert_eq!(session.apply(token, page), ApplyOutcome::Applied);

    while let Some((token, cursor)) = session.begin_load_more() {
        let page = pager
            .fetch_page(session.sort(), session.tag(), session.page_size(), Some(&cursor))
            .await;
        assert_eq!(session.apply(token, page), ApplyOutcome::Applied);
    }

    let perms: Vec<String> = session.posts().iter().map(|p| p.permlink.clone()).collect();
    let want: Vec<String> = (0..25).map(|i| format!("post-{i}")).collect();
    assert_eq!(perms, want);
    assert!(!session.has_more());

    for (_, params) in api.transport().requests() {
        assert_eq!(params[0]["limit"], 11);
    }

    // malformed metadata fell back, valid metadata did not
    assert_eq!(session.posts()[0].author_display_name, "alice");
    assert_eq!(
        session.posts()[0].author_avatar_url,
        "https://images.hive.blog/u/alice/avatar"
    );
    assert_eq!(session.posts()[1].author_display_name, "Named");
}

#[tokio::test]
async fn sort_modes_hit_their_methods() {
    let api = HiveApi::new(FakeNode::new("alice", 3));
    let pager = DiscussionPager::new(&api);
    for sort in SortMode::ALL {
        pager.fetch_page(sort, "", 5, None).await.unwrap();
    }
    let methods: Vec<String> = api.transport().requests().into_iter().map(|r| r.0).collect();
    assert_eq!(
        methods,
        vec![
            "condenser_api.get_discussions_by_created",
            "condenser_api.get_discussions_by_hot",
            "condenser_api.get_discussions_by_trending",
        ]
    );
}

#[tokio::test]
async fn failed_load_more_resets_pagination() {
    let api = HiveApi::new(FakeNode::new("alice", 30).failing_after(1));
    let pager = DiscussionPager::new(&api);
    let mut session = FeedSession::new(SortMode::Hot, "introduceyourself", 10);

    let token = session.begin_refresh();
    let page = pager.fetch_page(session.sort(), session.tag(), 10, None).await;
    session.apply(token, page);
    assert!(session.has_more());

    let (token, cursor) = session.begin_load_more().unwrap();
    let page = pager
        .fetch_page(session.sort(), session.tag(), 10, Some(&cursor))
        .await;
    assert_eq!(session.apply(token, page), ApplyOutcome::Failed);
    assert!(session.posts().is_empty());
    assert!(!session.has_more());
    assert!(session.begin_load_more().is_none());
    assert_eq!(session.last_error(), Some("rpc -32000 node overloaded"));
}

#[tokio::test]
async fn first_post_within_window() {
    // 250 posts, 100 per page: 3 rounds (100, 100 incl. boundary, 52)
    let api = HiveApi::new(FakeNode::new("bob", 250));
    let mut search = SearchSession::new();
    let (token, term) = search.begin_search("@bob").unwrap();

    let res = FirstPostFinder::new(&api).find_first_post(&term).await;
    assert_eq!(search.apply(token, res), ApplyOutcome::Applied);

    let found = search.found().unwrap();
    assert_eq!(found.permlink, "post-249");
    match search.result().unwrap() {
        FirstPostSearch::Found {
            rounds,
            distinct,
            capped,
            ..
        } => {
            assert_eq!(*rounds, 3);
            assert_eq!(*distinct, 250);
            assert!(!capped);
        }
        other => panic!("expected Found, got {other:?}"),
    }
    assert_eq!(api.transport().requests().len(), 3);
}

#[tokio::test]
async fn first_post_is_capped_by_rounds() {
    let api = HiveApi::new(FakeNode::new("carol", 1000));
    let res = FirstPostFinder::new(&api)
        .with_limits(100, 5)
        .find_first_post("carol")
        .await
        .unwrap();
    assert_eq!(api.transport().requests().len(), 5);
    // boundary items repeat, so the window reaches post-495, not post-999
    assert_eq!(res.post().unwrap().permlink, "post-495");
    assert!(res.is_capped());
    match res {
        FirstPostSearch::Found {
            scanned, distinct, ..
        } => {
            assert_eq!(scanned, 500);
            assert_eq!(distinct, 496);
        }
        other => panic!("expected Found, got {other:?}"),
    }
}
