//! What the student list should fetch

use serde::{Deserialize, Serialize};

use crate::models::SortKey;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQueryState {
    search_term: String,
    sort_key: SortKey,
    using_search: bool,
}

/// The store call a reload should make
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentQuery {
    List(SortKey),
    Search { term: String, order: SortKey },
}

impl ListQueryState {
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn using_search(&self) -> bool {
        self.using_search
    }

    /// Edit the term without fetching; takes effect on the next reload.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.sort_key = key;
    }

    pub fn activate_search(&mut self) {
        self.using_search = true;
    }

    pub fn clear_search(&mut self) {
        self.search_term.clear();
        self.using_search = false;
    }

    pub fn effective_query(&self) -> StudentQuery {
        if self.using_search {
            StudentQuery::Search {
                term: self.search_term.clone(),
                order: self.sort_key,
            }
        } else {
            StudentQuery::List(self.sort_key)
        }
    }
}
