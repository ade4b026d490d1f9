//! The category table: positional `(name, hue)` pairs.

use serde::{Deserialize, Serialize};

/// A block category as it appears on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Display name, possibly a `@key` marker.
    pub name: String,
    /// Color hue in degrees.
    pub hue: i32,
}

/// Ordered categories indexed by `BlockFormat::category`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryTable {
    categories: Vec<Category>,
}

impl CategoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Category> {
        self.categories.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    /// Overwrite entries positionally, growing the table as needed.
    ///
    /// Entries past the end of `records` are kept.
    pub fn merge(&mut self, records: Vec<Category>) {
        for (index, category) in records.into_iter().enumerate() {
            if index < self.categories.len() {
                self.categories[index] = category;
            } else {
                self.categories.push(category);
            }
        }
    }

    /// Hue of a category, 0 when unknown.
    pub fn hue(&self, index: usize) -> i32 {
        self.get(index).map_or(0, |c| c.hue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(name: &str, hue: i32) -> Category {
        Category {
            name: name.to_string(),
            hue,
        }
    }

    #[test]
    fn merge_overwrites_and_grows() {
        let mut table = CategoryTable::new();
        table.merge(vec![category("Control", 30), category("Math", 200)]);
        table.merge(vec![category("Flow", 40)]);
        table.merge(vec![
            category("Flow", 40),
            category("Math", 210),
            category("Text", 120),
        ]);

        assert_eq!(table.len(), 3);
        assert_eq!(table.get(0), Some(&category("Flow", 40)));
        assert_eq!(table.hue(1), 210);
        assert_eq!(table.hue(2), 120);
    }

    #[test]
    fn unknown_index_has_zero_hue() {
        let table = CategoryTable::new();
        assert!(table.is_empty());
        assert_eq!(table.hue(4), 0);
        assert!(table.get(4).is_none());
    }

    #[test]
    fn wire_shape_is_positional_array() {
        let table: CategoryTable = serde_json::from_value(serde_json::json!([
            {"name": "@control", "hue": 30},
            {"name": "Math", "hue": 200}
        ]))
        .unwrap();

        assert_eq!(table.iter().count(), 2);
        assert_eq!(table.get(0).map(|c| c.name.as_str()), Some("@control"));
    }
}
