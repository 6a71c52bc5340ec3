use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ids::CategoryId;
use crate::validation;

pub const CATEGORY_NAME_MAX: usize = 220;
pub const CATEGORY_SLUG_MAX: usize = 235;

/// A node in the category tree. Siblings are ordered by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub parent_id: Option<CategoryId>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub parent: Option<CategoryId>,
    #[serde(default)]
    pub active: bool,
}

impl NewCategory {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            parent: None,
            active: false,
        }
    }

    pub fn with_parent(mut self, parent: CategoryId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn validate(&self) -> Result<()> {
        validation::text("name", &self.name, CATEGORY_NAME_MAX)?;
        validation::slug("slug", &self.slug, CATEGORY_SLUG_MAX)
    }
}

/// Full replacement of a category's editable fields (`PUT` semantics).
/// `parent: None` moves the category to the root; an absent `active`
/// keeps the stored flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryUpdate {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub parent: Option<CategoryId>,
    #[serde(default)]
    pub active: Option<bool>,
}

impl CategoryUpdate {
    pub fn validate(&self) -> Result<()> {
        validation::text("name", &self.name, CATEGORY_NAME_MAX)?;
        validation::slug("slug", &self.slug, CATEGORY_SLUG_MAX)
    }

    /// Keep every field of `category` except the parent link.
    pub fn reparent(category: &Category, parent: Option<CategoryId>) -> Self {
        Self {
            name: category.name.clone(),
            slug: category.slug.clone(),
            parent,
            active: Some(category.active),
        }
    }
}
