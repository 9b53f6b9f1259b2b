use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Listing order the visitor can pick. Each maps to one remote method.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    #[default]
    Created,
    Hot,
    Trending,
}

impl SortMode {
    pub const ALL: [SortMode; 3] = [SortMode::Created, SortMode::Hot, SortMode::Trending];

    pub fn method(self) -> DiscussionMethod {
        match self {
            SortMode::Created => DiscussionMethod::Created,
            SortMode::Hot => DiscussionMethod::Hot,
            SortMode::Trending => DiscussionMethod::Trending,
        }
    }
}

impl std::str::FromStr for SortMode {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "created" | "new" | "latest" => Ok(SortMode::Created),
            "hot" => Ok(SortMode::Hot),
            "trending" => Ok(SortMode::Trending),
            _ => Err(anyhow::anyhow!(
                "Invalid sort '{s}'. Valid options: created, hot, trending"
            )),
        }
    }
}

impl std::fmt::Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortMode::Created => write!(f, "created"),
            SortMode::Hot => write!(f, "hot"),
            SortMode::Trending => write!(f, "trending"),
        }
    }
}

/// Remote discussion listings. `Blog` walks one account's own posts and is
/// not a visitor-selectable sort.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiscussionMethod {
    Created,
    Hot,
    Trending,
    Blog,
}

impl DiscussionMethod {
    pub fn rpc_name(self) -> &'static str {
        match self {
            DiscussionMethod::Created => "condenser_api.get_discussions_by_created",
            DiscussionMethod::Hot => "condenser_api.get_discussions_by_hot",
            DiscussionMethod::Trending => "condenser_api.get_discussions_by_trending",
            DiscussionMethod::Blog => "condenser_api.get_discussions_by_blog",
        }
    }
}

impl From<SortMode> for DiscussionMethod {
    fn from(sort: SortMode) -> Self {
        sort.method()
    }
}

/// Pagination boundary: the (author, permlink) of the last item of the
/// previous page. Globally unique post identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageCursor {
    pub author: String,
    pub permlink: String,
}

impl PageCursor {
    pub fn new(author: impl Into<String>, permlink: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            permlink: permlink.into(),
        }
    }

    pub fn of(raw: &RawPost) -> Self {
        Self::new(raw.author.clone(), raw.permlink.clone())
    }
}

/// One listing request. `limit` is what goes on the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListingQuery {
    pub tag: String,
    pub limit: u32,
    pub start: Option<PageCursor>,
}

impl ListingQuery {
    pub fn new(tag: impl Into<String>, limit: u32) -> Self {
        Self {
            tag: tag.into(),
            limit,
            start: None,
        }
    }

    pub fn starting_at(mut self, cursor: Option<PageCursor>) -> Self {
        self.start = cursor;
        self
    }

    /// `params[0]` of a discussion call. Cursor fields are omitted, never null.
    pub fn to_params(&self) -> Value {
        let wire = ListingParams {
            tag: &self.tag,
            limit: self.limit,
            start_author: self.start.as_ref().map(|c| c.author.as_str()),
            start_permlink: self.start.as_ref().map(|c| c.permlink.as_str()),
        };
        serde_json::to_value(wire).unwrap_or(Value::Null)
    }
}

#[derive(Serialize)]
struct ListingParams<'a> {
    tag: &'a str,
    limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_author: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_permlink: Option<&'a str>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawVote {
    #[serde(deserialize_with = "null_default")]
    pub voter: String,
    #[serde(deserialize_with = "lenient_i64")]
    pub percent: i64,
}

/// A post or comment as the node returns it. Every field is defaulted so a
/// partially populated record still decodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPost {
    #[serde(deserialize_with = "null_default")]
    pub author: String,
    #[serde(deserialize_with = "null_default")]
    pub permlink: String,
    #[serde(deserialize_with = "null_default")]
    pub category: String,
    #[serde(deserialize_with = "null_default")]
    pub parent_author: String,
    #[serde(deserialize_with = "null_default")]
    pub parent_permlink: String,
    #[serde(deserialize_with = "null_default")]
    pub title: String,
    #[serde(deserialize_with = "null_default")]
    pub body: String,
    #[serde(deserialize_with = "null_default")]
    pub created: String,
    #[serde(deserialize_with = "lenient_u32")]
    pub children: u32,
    #[serde(deserialize_with = "null_default")]
    pub active_votes: Vec<RawVote>,
    #[serde(deserialize_with = "metadata_string")]
    pub json_metadata: String,
    #[serde(deserialize_with = "null_default")]
    pub pending_payout_value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawAccount {
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(deserialize_with = "lenient_i64")]
    pub reputation: i64,
    #[serde(deserialize_with = "metadata_string")]
    pub json_metadata: String,
    #[serde(deserialize_with = "metadata_string")]
    pub posting_json_metadata: String,
    #[serde(deserialize_with = "lenient_u32")]
    pub post_count: u32,
}

/// Display-ready post. `author`, `permlink`, `title`, `body` and `created`
/// are always populated (possibly empty strings, never missing).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    pub title: String,
    pub body: String,
    pub author: String,
    pub permlink: String,
    pub category: String,
    pub created: DateTime<Utc>,
    pub url: String,
    pub replies: u32,
    pub vote_percents: Vec<i64>,
    pub json_metadata: String,
    pub author_display_name: String,
    pub author_avatar_url: String,
    pub pending_payout_value: String,
}

impl Post {
    pub fn cursor(&self) -> PageCursor {
        PageCursor::new(self.author.clone(), self.permlink.clone())
    }

    /// Sum of vote percents in whole-vote units (10000 == 100 votes at 100%).
    pub fn vote_weight(&self) -> f64 {
        self.vote_percents.iter().sum::<i64>() as f64 / 100.0
    }

    /// Pending payout split into amount and currency code, e.g. `(1.234, "HBD")`.
    pub fn payout(&self) -> Option<(f64, &str)> {
        crate::util_text::parse_asset(&self.pending_payout_value)
    }
}

/// One page of a listing. `has_more` is derived from the raw item count.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Page {
    pub items: Vec<Post>,
    pub has_more: bool,
}

impl Page {
    /// Cursor for the following page (last item's identity).
    pub fn next_cursor(&self) -> Option<PageCursor> {
        self.items.last().map(Post::cursor)
    }
}

/// Present-but-null fields decode like absent ones.
fn null_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

/// Accept a JSON string as-is, stringify objects, map null/absent to "".
fn metadata_string<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(de)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Nodes report some counters as numbers and some as numeric strings.
fn lenient_i64<'de, D>(de: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(de)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    })
}

fn lenient_u32<'de, D>(de: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let v = lenient_i64(de)?;
    Ok(u32::try_from(v).unwrap_or_default())
}
