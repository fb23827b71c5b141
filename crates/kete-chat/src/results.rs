//! Displayed search results.
//!
//! The grid belongs to the host, not the session: it only changes when a
//! `ResultsChanged` event is applied, and then it is replaced as a whole.

use kete_core::events::SessionEvent;
use kete_core::types::{ResultSet, SearchResult};

// =============================================================================
// ResultTile
// =============================================================================

/// Public collection page for an object, used when a representation carries
/// no link of its own.
const OBJECT_PAGE_BASE: &str = "https://collections.tepapa.govt.nz/object/";

/// What the grid shows for one displayable result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultTile {
    pub id: i64,
    pub title: String,
    /// Preview image of the first representation.
    pub preview_url: String,
    /// Link target of the first representation.
    pub link_url: String,
}

impl ResultTile {
    /// Build a tile from the result's first representation.
    ///
    /// An untitled result takes its caption from the representation, and a
    /// representation without a link points at the object's collection page.
    /// Returns `None` for results without representations.
    pub fn from_result(result: &SearchResult) -> Option<Self> {
        let primary = result.primary_representation()?;
        let title = if result.title.trim().is_empty() {
            primary.caption_lines().join(" / ")
        } else {
            result.title.clone()
        };
        let link_url = if primary.content_url.trim().is_empty() {
            format!("{}{}", OBJECT_PAGE_BASE, result.id)
        } else {
            primary.content_url.clone()
        };
        Some(Self {
            id: result.id,
            title,
            preview_url: primary.preview_url.clone(),
            link_url,
        })
    }
}

// =============================================================================
// ResultGrid
// =============================================================================

/// The currently displayed result set.
#[derive(Debug, Clone, Default)]
pub struct ResultGrid {
    results: ResultSet,
    replacements: u64,
}

impl ResultGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    /// Number of times the set has been replaced.
    pub fn replacements(&self) -> u64 {
        self.replacements
    }

    /// Replace the whole set.
    pub fn replace(&mut self, results: ResultSet) {
        tracing::debug!(
            previous = self.results.len(),
            next = results.len(),
            "Result set replaced"
        );
        self.results = results;
        self.replacements += 1;
    }

    /// Apply a session event, returning `true` if the set changed.
    ///
    /// Every event other than `ResultsChanged` leaves the grid untouched.
    pub fn apply(&mut self, event: &SessionEvent) -> bool {
        match event {
            SessionEvent::ResultsChanged { results, .. } => {
                self.replace(results.clone());
                true
            }
            _ => false,
        }
    }

    /// Tiles for the displayable results, in result order.
    pub fn tiles(&self) -> Vec<ResultTile> {
        self.results
            .iter()
            .filter_map(ResultTile::from_result)
            .collect()
    }

    /// Number of results left out of the grid for lack of a representation.
    pub fn hidden_count(&self) -> usize {
        self.results.iter().filter(|r| !r.is_displayable()).count()
    }
}
