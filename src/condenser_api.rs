//! Typed wrappers over the `condenser_api.*` read methods.

use crate::error::{HiveError, Result};
use crate::rpc_utils::RpcTransport;
use crate::types::{DiscussionMethod, ListingQuery, RawAccount, RawPost};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

pub struct HiveApi<T> {
    transport: T,
}

impl<T: RpcTransport> HiveApi<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// One page of a discussion listing. A null result is an empty page.
    pub async fn get_discussions(
        &self,
        method: DiscussionMethod,
        query: &ListingQuery,
    ) -> Result<Vec<RawPost>> {
        let v = self
            .transport
            .call(method.rpc_name(), json!([query.to_params()]))
            .await?;
        decode_list(method.rpc_name(), v)
    }

    pub async fn get_accounts(&self, names: &[&str]) -> Result<Vec<RawAccount>> {
        let v = self
            .transport
            .call("condenser_api.get_accounts", json!([names]))
            .await?;
        decode_list("get_accounts", v)
    }

    /// First account matching `name`, if it exists.
    pub async fn get_account(&self, name: &str) -> Result<Option<RawAccount>> {
        Ok(self.get_accounts(&[name]).await?.into_iter().next())
    }

    /// Exact post lookup. Nodes answer unknown content with an empty record
    /// (blank author) rather than an error; that maps to `None`.
    pub async fn get_content(&self, author: &str, permlink: &str) -> Result<Option<RawPost>> {
        let v = self
            .transport
            .call("condenser_api.get_content", json!([author, permlink]))
            .await?;
        if v.is_null() {
            return Ok(None);
        }
        let post: RawPost = decode("get_content", v)?;
        Ok(if post.author.is_empty() { None } else { Some(post) })
    }

    /// Direct replies to a post, in node order.
    pub async fn get_content_replies(&self, author: &str, permlink: &str) -> Result<Vec<RawPost>> {
        let v = self
            .transport
            .call("condenser_api.get_content_replies", json!([author, permlink]))
            .await?;
        decode_list("get_content_replies", v)
    }
}

fn decode<D: DeserializeOwned>(what: &str, v: Value) -> Result<D> {
    serde_json::from_value(v).map_err(|e| HiveError::InvalidPayload(format!("{what}: {e}")))
}

fn decode_list<D: DeserializeOwned>(what: &str, v: Value) -> Result<Vec<D>> {
    if v.is_null() {
        return Ok(Vec::new());
    }
    decode(what, v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{raw_post, ScriptedTransport};
    use crate::types::PageCursor;

    #[tokio::test]
    async fn discussions_call_shape() {
        let api = HiveApi::new(
            ScriptedTransport::new().respond(json!([raw_post("a", "p", "2024-01-01T00:00:00")])),
        );
        let q = ListingQuery::new("intro", 5).starting_at(Some(PageCursor::new("a", "p")));
        let posts = api.get_discussions(DiscussionMethod::Hot, &q).await.unwrap();
        assert_eq!(posts.len(), 1);

        let calls = api.transport().calls();
        assert_eq!(calls[0].0, "condenser_api.get_discussions_by_hot");
        assert_eq!(
            calls[0].1,
            json!([{"tag": "intro", "limit": 5, "start_author": "a", "start_permlink": "p"}])
        );
    }

    #[tokio::test]
    async fn null_listing_is_empty() {
        let api = HiveApi::new(ScriptedTransport::new().respond(Value::Null));
        let posts = api
            .get_discussions(DiscussionMethod::Created, &ListingQuery::new("", 3))
            .await
            .unwrap();
        assert!(posts.is_empty());
    }

    #[tokio::test]
    async fn wrong_shape_is_invalid_payload() {
        let api = HiveApi::new(ScriptedTransport::new().respond(json!({"oops": true})));
        let err = api
            .get_discussions(DiscussionMethod::Created, &ListingQuery::new("", 3))
            .await
            .unwrap_err();
        assert!(matches!(err, HiveError::InvalidPayload(_)));
    }

    #[tokio::test]
    async fn accounts_are_passed_as_nested_list() {
        let api = HiveApi::new(
            ScriptedTransport::new().respond(json!([{"name": "alice", "reputation": 0}])),
        );
        let acct = api.get_account("alice").await.unwrap().unwrap();
        assert_eq!(acct.name, "alice");
        assert_eq!(
            api.transport().calls()[0],
            ("condenser_api.get_accounts".to_string(), json!([["alice"]]))
        );
    }

    #[tokio::test]
    async fn blank_content_is_none() {
        let api = HiveApi::new(
            ScriptedTransport::new()
                .respond(json!({"author": "", "permlink": "", "title": ""}))
                .respond(Value::Null)
                .respond(raw_post("alice", "p1", "2024-01-01T00:00:00")),
        );
        assert!(api.get_content("ghost", "x").await.unwrap().is_none());
        assert!(api.get_content("ghost", "y").await.unwrap().is_none());
        let found = api.get_content("alice", "p1").await.unwrap().unwrap();
        assert_eq!(found.permlink, "p1");
        assert_eq!(
            api.transport().calls()[2],
            (
                "condenser_api.get_content".to_string(),
                json!(["alice", "p1"])
            )
        );
    }
}
