use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Enums
// =============================================================================

/// Who authored a transcript entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    /// Text typed by the person at the keyboard.
    User,
    /// Reply produced by the query endpoint (or a failure notice).
    Bot,
}

// =============================================================================
// Message
// =============================================================================

/// One transcript entry.
///
/// Fields are private: a message cannot be edited after it is created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    text: String,
    sender: Sender,
}

impl Message {
    pub fn new(text: impl Into<String>, sender: Sender) -> Self {
        Self {
            text: text.into(),
            sender,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, Sender::User)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(text, Sender::Bot)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn is_from_user(&self) -> bool {
        self.sender == Sender::User
    }
}

// =============================================================================
// Orders
// =============================================================================

/// Opaque description of a pending order surfaced in the confirmation modal.
///
/// Invariant: never blank.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderDescriptor(String);

impl OrderDescriptor {
    /// Wrap an order string, returning `None` when it is empty or whitespace.
    pub fn new(content: impl Into<String>) -> Option<Self> {
        let content = content.into();
        if content.trim().is_empty() {
            None
        } else {
            Some(Self(content))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for OrderDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Search results
// =============================================================================

/// A renderable asset attached to a search result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Representation {
    /// Image shown in the result grid.
    pub preview_url: String,
    /// Outbound link target. Older backends omit it.
    #[serde(default)]
    pub content_url: String,
    /// Semicolon-separated caption, as sent by older backends
    /// (`"<ref>;<name>;<date>"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Representation {
    /// Caption lines from `title`, with the leading reference segment
    /// dropped. Empty when there is no title.
    pub fn caption_lines(&self) -> Vec<&str> {
        self.title
            .as_deref()
            .map(|t| t.split(';').skip(1).filter(|l| !l.trim().is_empty()).collect())
            .unwrap_or_default()
    }
}

/// A single collection object returned by a search query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    /// Ordered assets; the first one is canonical for display.
    #[serde(default, alias = "hasRepresentation")]
    pub representations: Vec<Representation>,
}

impl SearchResult {
    /// The representation used for preview and link, if any.
    pub fn primary_representation(&self) -> Option<&Representation> {
        self.representations.first()
    }

    /// Whether this result has anything to show in the grid.
    pub fn is_displayable(&self) -> bool {
        !self.representations.is_empty()
    }
}

/// The full set of results from one response.
///
/// Always replaced as a whole; there is no merge or append operation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet(Vec<SearchResult>);

impl ResultSet {
    pub fn new(results: Vec<SearchResult>) -> Self {
        Self(results)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SearchResult> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[SearchResult] {
        &self.0
    }
}

impl From<Vec<SearchResult>> for ResultSet {
    fn from(results: Vec<SearchResult>) -> Self {
        Self(results)
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a SearchResult;
    type IntoIter = std::slice::Iter<'a, SearchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// =============================================================================
// Wire payload
// =============================================================================

/// Successful payload from the query endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponse {
    /// The bot's reply. Older backends send it as `response`.
    #[serde(rename = "responseText", alias = "response")]
    pub response_text: String,
    /// Present only when the query resolved to an order confirmation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    /// Present when the query was a search.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<ResultSet>,
}

impl QueryResponse {
    /// A plain reply with neither order nor results.
    pub fn text(response_text: impl Into<String>) -> Self {
        Self {
            response_text: response_text.into(),
            order: None,
            results: None,
        }
    }

    pub fn with_order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    pub fn with_results(mut self, results: impl Into<ResultSet>) -> Self {
        self.results = Some(results.into());
        self
    }

    /// The order carried by this response, treating blank strings as absent.
    pub fn order_descriptor(&self) -> Option<OrderDescriptor> {
        self.order.as_deref().and_then(OrderDescriptor::new)
    }
}

// =============================================================================
// Newtype Wrappers - Temporal
// =============================================================================

/// Unix timestamp in seconds since epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now().timestamp())
    }

    pub fn to_datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.0, 0).unwrap_or_default()
    }
}
