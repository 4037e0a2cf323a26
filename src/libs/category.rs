use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User-defined label referenced by id from tasks, notes and events.
///
/// Deleting a category leaves those references in place; readers resolve
/// them through a lookup that tolerates unknown ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub color: Option<String>,
}

impl Category {
    pub fn new(category: &NewCategory) -> Self {
        Category {
            id: Uuid::new_v4().to_string(),
            name: category.name.clone(),
            color: category.color.clone(),
        }
    }

    pub fn apply(&mut self, patch: &CategoryPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(color) = &patch.color {
            self.color = color.clone();
        }
    }
}

pub fn default_categories() -> Vec<Category> {
    [
        ("Personal", "#3b82f6"),
        ("Work", "#10b981"),
        ("Study", "#8b5cf6"),
        ("Health", "#ef4444"),
        ("Finance", "#f59e0b"),
    ]
    .iter()
    .map(|(name, color)| {
        Category::new(&NewCategory {
            name: name.to_string(),
            color: color.to_string(),
        })
    })
    .collect()
}

/// Resolves a category reference, `None` for dangling ids.
pub fn find_category<'a>(categories: &'a [Category], id: &str) -> Option<&'a Category> {
    categories.iter().find(|category| category.id == id)
}
