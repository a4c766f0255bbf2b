use serde::{Deserialize, Serialize};

/// A page of results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paging<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// The maximum number of items in the response.
    #[serde(default)]
    pub limit: u32,
    /// The offset of this page.
    #[serde(default)]
    pub offset: u32,
    /// The total number of items available.
    #[serde(default)]
    pub total: u32,
    /// The URL of the next page, if any.
    #[serde(default)]
    pub next: Option<String>,
}
impl<T> Default for Paging<T> {
    fn default() -> Self {
        Self {
            items: vec![],
            limit: 0,
            offset: 0,
            total: 0,
            next: None,
        }
    }
}

/// Known external URLs for an object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalUrls {
    /// The Spotify URL for the object.
    #[serde(default)]
    pub spotify: Option<String>,
}
