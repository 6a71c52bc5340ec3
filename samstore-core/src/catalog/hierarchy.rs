//! Self-referencing trees (categories, product types).
//!
//! Nodes are addressed by id and carry their parent's id; everything else
//! (children, ancestors, descendants) is computed on demand. Siblings are
//! always ordered by name, then id.

use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::hash::Hash;

use samstore_model::{Category, CategoryId, ProductType, ProductTypeId};

use crate::error::{CatalogError, Result};

pub trait TreeNode {
    type Id: Copy + Eq + Hash + Ord + Display;

    /// Entity name used in error messages.
    const ENTITY: &'static str;

    fn node_id(&self) -> Self::Id;
    fn parent_id(&self) -> Option<Self::Id>;
    fn name(&self) -> &str;
}

impl TreeNode for Category {
    type Id = CategoryId;
    const ENTITY: &'static str = "category";

    fn node_id(&self) -> CategoryId {
        self.id
    }

    fn parent_id(&self) -> Option<CategoryId> {
        self.parent_id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TreeNode for ProductType {
    type Id = ProductTypeId;
    const ENTITY: &'static str = "product type";

    fn node_id(&self) -> ProductTypeId {
        self.id
    }

    fn parent_id(&self) -> Option<ProductTypeId> {
        self.parent_id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Reject a parent link that would make `node` its own ancestor.
///
/// `parent_lineage` is the proposed parent followed by all of its
/// ancestors, in any order.
pub fn ensure_acyclic<Id>(
    entity: &'static str,
    node: Id,
    parent_lineage: impl IntoIterator<Item = Id>,
) -> Result<()>
where
    Id: Copy + Eq + Display,
{
    let mut lineage = parent_lineage.into_iter().peekable();
    let Some(&parent) = lineage.peek() else {
        return Ok(());
    };

    if lineage.any(|ancestor| ancestor == node) {
        return Err(CatalogError::Cycle {
            entity,
            node: node.to_string(),
            parent: parent.to_string(),
        });
    }
    Ok(())
}

/// Borrowed index over a flat list of nodes.
#[derive(Debug)]
pub struct Tree<'a, N: TreeNode> {
    nodes: HashMap<N::Id, &'a N>,
    children: HashMap<Option<N::Id>, Vec<&'a N>>,
}

impl<'a, N: TreeNode> Tree<'a, N> {
    pub fn new(nodes: impl IntoIterator<Item = &'a N>) -> Self {
        let mut by_id = HashMap::new();
        let mut children: HashMap<Option<N::Id>, Vec<&'a N>> = HashMap::new();

        for node in nodes {
            by_id.insert(node.node_id(), node);
            children.entry(node.parent_id()).or_default().push(node);
        }

        for siblings in children.values_mut() {
            siblings.sort_by(|a, b| {
                a.name()
                    .cmp(b.name())
                    .then_with(|| a.node_id().cmp(&b.node_id()))
            });
        }

        Self {
            nodes: by_id,
            children,
        }
    }

    pub fn get(&self, id: N::Id) -> Option<&'a N> {
        self.nodes.get(&id).copied()
    }

    pub fn roots(&self) -> Vec<&'a N> {
        self.children_of(None)
    }

    /// Direct children of `parent` (`None` for the roots), by name.
    pub fn children_of(&self, parent: Option<N::Id>) -> Vec<&'a N> {
        self.children.get(&parent).cloned().unwrap_or_default()
    }

    /// Ancestors of `id`, root first, excluding the node itself.
    pub fn ancestors(&self, id: N::Id) -> Vec<&'a N> {
        let mut chain = Vec::new();
        let mut seen = HashSet::from([id]);
        let mut cursor = self.get(id).and_then(|node| node.parent_id());

        while let Some(parent_id) = cursor {
            // Stored data should never loop, but a corrupt row must not hang us.
            if !seen.insert(parent_id) {
                break;
            }
            let Some(parent) = self.get(parent_id) else {
                break;
            };
            chain.push(parent);
            cursor = parent.parent_id();
        }

        chain.reverse();
        chain
    }

    /// All nodes below `id`, depth first with siblings by name.
    pub fn descendants(&self, id: N::Id) -> Vec<&'a N> {
        let mut out = Vec::new();
        let mut seen = HashSet::from([id]);
        let mut stack: Vec<&'a N> =
            self.children_of(Some(id)).into_iter().rev().collect();

        while let Some(node) = stack.pop() {
            if !seen.insert(node.node_id()) {
                continue;
            }
            out.push(node);
            stack.extend(self.children_of(Some(node.node_id())).into_iter().rev());
        }
        out
    }

    /// Number of ancestors above `id`.
    pub fn depth(&self, id: N::Id) -> usize {
        self.ancestors(id).len()
    }

    /// Check a proposed `parent` for `node` against this tree.
    pub fn ensure_can_attach(&self, node: N::Id, parent: Option<N::Id>) -> Result<()> {
        let Some(parent) = parent else {
            return Ok(());
        };
        let lineage = std::iter::once(parent)
            .chain(self.ancestors(parent).into_iter().map(|n| n.node_id()));
        ensure_acyclic(N::ENTITY, node, lineage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn category(id: i64, name: &str, parent: Option<i64>) -> Category {
        let now = Utc::now();
        Category {
            id: CategoryId(id),
            name: name.to_string(),
            slug: name.to_lowercase(),
            parent_id: parent.map(CategoryId),
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn fixture() -> Vec<Category> {
        vec![
            category(1, "Clothing", None),
            category(2, "Shoes", Some(1)),
            category(3, "Boots", Some(2)),
            category(4, "Hats", Some(1)),
            category(5, "Books", None),
            category(6, "Accessories", Some(1)),
        ]
    }

    fn names(nodes: &[&Category]) -> Vec<String> {
        nodes.iter().map(|c| c.name.clone()).collect()
    }

    #[test]
    fn children_are_sorted_by_name() {
        let categories = fixture();
        let tree = Tree::new(&categories);

        assert_eq!(names(&tree.roots()), ["Books", "Clothing"]);
        assert_eq!(
            names(&tree.children_of(Some(CategoryId(1)))),
            ["Accessories", "Hats", "Shoes"]
        );
        assert!(tree.children_of(Some(CategoryId(3))).is_empty());
    }

    #[test]
    fn ancestors_are_root_first() {
        let categories = fixture();
        let tree = Tree::new(&categories);

        assert_eq!(names(&tree.ancestors(CategoryId(3))), ["Clothing", "Shoes"]);
        assert!(tree.ancestors(CategoryId(1)).is_empty());
        assert_eq!(tree.depth(CategoryId(3)), 2);
    }

    #[test]
    fn descendants_walk_depth_first() {
        let categories = fixture();
        let tree = Tree::new(&categories);

        assert_eq!(
            names(&tree.descendants(CategoryId(1))),
            ["Accessories", "Hats", "Shoes", "Boots"]
        );
    }

    #[test]
    fn attaching_under_a_descendant_is_a_cycle() {
        let categories = fixture();
        let tree = Tree::new(&categories);

        let err = tree
            .ensure_can_attach(CategoryId(1), Some(CategoryId(3)))
            .unwrap_err();
        assert!(matches!(err, CatalogError::Cycle { entity: "category", .. }));
    }

    #[test]
    fn attaching_to_itself_is_a_cycle() {
        let categories = fixture();
        let tree = Tree::new(&categories);

        assert!(tree.ensure_can_attach(CategoryId(2), Some(CategoryId(2))).is_err());
    }

    #[test]
    fn attaching_elsewhere_is_allowed() {
        let categories = fixture();
        let tree = Tree::new(&categories);

        assert!(tree.ensure_can_attach(CategoryId(3), Some(CategoryId(5))).is_ok());
        assert!(tree.ensure_can_attach(CategoryId(3), None).is_ok());
    }

    #[test]
    fn ensure_acyclic_ignores_empty_lineage() {
        assert!(ensure_acyclic("category", CategoryId(1), Vec::new()).is_ok());
    }
}
