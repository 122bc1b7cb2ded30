use serde::{Deserialize, Serialize};


/// Facet counts returned alongside a result page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultFacets {
    pub name: String,
    pub items: Vec<SearchResultFacetItem>,
}

impl SearchResultFacets {
    pub fn item(&self, value: &str) -> Option<&SearchResultFacetItem> {
        self.items.iter().find(|item| item.value == value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultFacetItem {
    pub value: String,
    pub hits: u64,
}
