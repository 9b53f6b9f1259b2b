//! hivex - Hive discussion feed viewer
//!
//! Read-only client for the `condenser_api` of a Hive API node: paginated
//! discussion feeds by tag and sort order, an account's first post, post
//! detail with comments, and account profiles.
//!
//! ## Architecture
//!
//! - [`rpc_utils`]: JSON-RPC transport (reqwest, bounded retry) behind the
//!   [`rpc_utils::RpcTransport`] trait
//! - [`condenser_api`]: typed method wrappers
//! - [`pager`] / [`first_post`]: cursor walking over the listings
//! - [`normalize`]: raw record -> display-ready [`types::Post`]
//! - [`session`]: caller-owned view state with stale-response guarding
//!
//! ## Usage
//!
//! ```bash
//! cargo run -- feed --sort hot --pages 2
//! cargo run -- first-post alice
//! ```

pub mod config;
pub mod error;
pub mod types;
pub mod util_text;

// RPC transport and typed API
pub mod condenser_api;
pub mod rpc_utils;

// Listing walkers
pub mod cursor;
pub mod first_post;
pub mod pager;

pub mod detail;
pub mod normalize;
pub mod profile;

pub mod router;
pub mod session;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use condenser_api::HiveApi;
pub use config::Config;
pub use error::{HiveError, Result};
pub use first_post::{FirstPostFinder, FirstPostSearch};
pub use pager::DiscussionPager;
pub use rpc_utils::{HttpTransport, RpcTransport};
pub use types::{Page, PageCursor, Post, SortMode};
