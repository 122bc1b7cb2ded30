//! Overlay parameters are merged into existing parameters as a union
//! instead of replacing them.

use common::api_params::{ApiParams, ParamValue};
use indexmap::IndexMap;

pub type OverlayFragment = IndexMap<String, ParamValue>;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OverlayParams {
    fragments: Vec<OverlayFragment>,
}

impl OverlayParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, fragment: OverlayFragment) {
        if !fragment.is_empty() {
            self.fragments.push(fragment);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Consumes the accumulated fragments, merging each key into `params`.
    pub fn flatten_into(self, params: &mut ApiParams) {
        for fragment in self.fragments {
            for (key, value) in fragment {
                params.merge_overlay(&key, value);
            }
        }
    }
}
