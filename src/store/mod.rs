//! In-memory content store
//!
//! Holds every crawled document for the session, assigns the document ids
//! the search index keys on, and records the outbound link graph. Mutated
//! only by the scheduler's control flow.

use crate::extract::PageDocument;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Document identifier shared between the store and the search index
pub type DocId = u32;

/// Content store plus link graph
#[derive(Default)]
pub struct ContentStore {
    by_url: HashMap<String, DocId>,
    documents: HashMap<DocId, Arc<PageDocument>>,
    link_graph: HashMap<String, Vec<String>>,
    next_id: DocId,
}

/// Serializable image of the content store for snapshots
#[derive(Debug, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub documents: Vec<PageDocument>,
    pub link_graph: HashMap<String, Vec<String>>,
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a document, assigning it a fresh id
    ///
    /// A URL is stored at most once per session; re-inserting the same URL
    /// returns the existing id without replacing the document.
    pub fn insert(&mut self, doc: Arc<PageDocument>) -> DocId {
        if let Some(&existing) = self.by_url.get(&doc.url) {
            return existing;
        }

        let id = self.next_id;
        self.next_id += 1;
        self.by_url.insert(doc.url.clone(), id);
        self.link_graph.insert(
            doc.url.clone(),
            doc.links.iter().map(|l| l.url.clone()).collect(),
        );
        self.documents.insert(id, doc);
        id
    }

    pub fn get(&self, id: DocId) -> Option<&Arc<PageDocument>> {
        self.documents.get(&id)
    }

    pub fn get_by_url(&self, url: &str) -> Option<&Arc<PageDocument>> {
        self.by_url.get(url).and_then(|id| self.documents.get(id))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn link_graph(&self) -> &HashMap<String, Vec<String>> {
        &self.link_graph
    }

    pub fn clear(&mut self) {
        self.by_url.clear();
        self.documents.clear();
        self.link_graph.clear();
        self.next_id = 0;
    }

    /// Exports the store for a crawl snapshot
    pub fn export(&self) -> StoreSnapshot {
        let mut ids: Vec<DocId> = self.documents.keys().copied().collect();
        ids.sort_unstable();
        StoreSnapshot {
            documents: ids
                .into_iter()
                .filter_map(|id| self.documents.get(&id).map(|d| d.as_ref().clone()))
                .collect(),
            link_graph: self.link_graph.clone(),
        }
    }

    /// Rebuilds the store from a snapshot, replacing current contents
    pub fn import(&mut self, snapshot: StoreSnapshot) {
        self.clear();
        for doc in snapshot.documents {
            self.insert(Arc::new(doc));
        }
        self.link_graph = snapshot.link_graph;
    }
}
