use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::db::Category;

/// Categories flattened into a single `id -> type` mapping.
///
/// Entries keep the order they were collected in, so a label-ordered category list
/// serializes as a label-ordered JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryMap(Vec<(i64, String)>);

impl CategoryMap {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    // a repeated id keeps its first position and takes the latest label
    fn insert(&mut self, id: i64, label: String) {
        match self.0.iter_mut().find(|(key, _)| *key == id) {
            Some(entry) => entry.1 = label,
            None => self.0.push((id, label)),
        }
    }
}

impl FromIterator<Category> for CategoryMap {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        let mut map = CategoryMap::default();
        for category in iter {
            map.insert(category.id, category.kind);
        }
        map
    }
}

impl Serialize for CategoryMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (id, label) in &self.0 {
            map.serialize_entry(id, label)?;
        }
        map.end()
    }
}
