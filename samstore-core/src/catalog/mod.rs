//! Storage-independent catalog rules.

pub mod aggregate;
pub mod attributes;
pub mod hierarchy;
pub mod ordering;

pub use aggregate::{
    DetailRows, LineAttributeValue, ProductWithCategory, TypeAttribute,
    category_views, product_summaries, product_views,
};
pub use attributes::{BindingDecision, check_line_binding, check_pair_binding};
pub use hierarchy::{Tree, TreeNode, ensure_acyclic};
pub use ordering::{
    ORDER_ASSIGNMENT_MAX_ATTEMPTS, OrderAttempt, OrderGroup, assign_order,
    ensure_free, next_order, retry_order_conflicts,
};
