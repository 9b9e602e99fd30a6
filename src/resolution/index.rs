use std::collections::HashMap;

use crate::types::{ComponentType, Document, NodeKey};

/// Lookup from `(component type, canonical name)` to the document defining it.
///
/// Built in one pass over the corpus. When two documents share a key the
/// later one wins, but the key keeps its first-seen position in
/// [`CorpusIndex::keys`].
#[derive(Debug, Clone, Default)]
pub struct CorpusIndex<'a> {
    by_key: HashMap<NodeKey, &'a Document>,
    by_path: HashMap<&'a str, NodeKey>,
    order: Vec<NodeKey>,
}

impl<'a> CorpusIndex<'a> {
    pub fn build(docs: &'a [Document]) -> Self {
        let mut index = Self::default();
        for doc in docs {
            let key = doc.key();
            if index.by_key.insert(key.clone(), doc).is_none() {
                index.order.push(key.clone());
            }
            index.by_path.insert(doc.relative_path.as_str(), key);
        }
        index
    }

    pub fn get(&self, key: &NodeKey) -> Option<&'a Document> {
        self.by_key.get(key).copied()
    }

    pub fn lookup(&self, component_type: ComponentType, name: &str) -> Option<&'a Document> {
        self.get(&NodeKey::new(component_type, name))
    }

    pub fn contains(&self, key: &NodeKey) -> bool {
        self.by_key.contains_key(key)
    }

    /// Key of the document at a corpus-relative path.
    pub fn key_for_path(&self, relative_path: &str) -> Option<&NodeKey> {
        self.by_path.get(relative_path)
    }

    /// All keys, in corpus order.
    pub fn keys(&self) -> &[NodeKey] {
        &self.order
    }

    /// Keys of one component type, in corpus order.
    pub fn keys_of(&self, component_type: ComponentType) -> impl Iterator<Item = &NodeKey> {
        self.order
            .iter()
            .filter(move |k| k.component_type == component_type)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
