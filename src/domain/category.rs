use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type CategoryId = Uuid;

/// A label grouping related transactions (e.g. "Housing", "Salary").
/// Categories are created lazily the first time a transaction references a
/// new title and are reused by exact title match afterwards. The title is a
/// natural key for lookups but is not enforced unique by the schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_categories_get_distinct_ids() {
        let a = Category::new("Food");
        let b = Category::new("Food");
        assert_eq!(a.title, "Food");
        assert_eq!(b.title, "Food");
        assert_ne!(a.id, b.id);
    }
}
