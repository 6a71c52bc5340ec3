//! Position assignment for sibling rows.
//!
//! Product lines are ordered within their product and images within their
//! product line. A new row without an explicit order lands after the
//! current last sibling (`max + 1`, or `1` for an empty group); an explicit
//! order is accepted as long as no sibling already holds it.
//!
//! Adapters call [`assign_order`] inside the insert transaction, after
//! locking the row that owns the group, so two inserts into the same group
//! never compute the same position. [`retry_order_conflicts`] covers the
//! remaining window where the unique index still fires.

use std::fmt;
use std::future::Future;

use samstore_model::{ProductId, ProductLineId};
use tracing::warn;

use crate::error::{CatalogError, Result, ValidationError};

/// Attempts made before an order conflict becomes fatal for the request.
pub const ORDER_ASSIGNMENT_MAX_ATTEMPTS: u32 = 3;

/// Grouping key that scopes an order value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderGroup {
    ProductLines(ProductId),
    Images(ProductLineId),
}

impl fmt::Display for OrderGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderGroup::ProductLines(product) => {
                write!(f, "lines of product {product}")
            }
            OrderGroup::Images(line) => {
                write!(f, "images of product line {line}")
            }
        }
    }
}

/// The position a row appended to `existing` receives, or `None` when the
/// last sibling already sits at `i32::MAX`.
pub fn next_order<I>(existing: I) -> Option<i32>
where
    I: IntoIterator<Item = i32>,
{
    match existing.into_iter().max() {
        Some(last) => last.checked_add(1),
        None => Some(1),
    }
}

/// Resolve the order of a new row from the orders already present in its
/// group.
pub fn assign_order(
    group: OrderGroup,
    requested: Option<i32>,
    existing: &[i32],
) -> std::result::Result<i32, ValidationError> {
    match requested {
        Some(order) => {
            ensure_free(group, order, existing)?;
            Ok(order)
        }
        None => next_order(existing.iter().copied())
            .ok_or(ValidationError::NoFreeOrder { group }),
    }
}

/// Check that `order` is not held by any of `siblings`. Callers moving an
/// existing row pass its siblings without the row itself.
pub fn ensure_free(
    group: OrderGroup,
    order: i32,
    siblings: &[i32],
) -> std::result::Result<(), ValidationError> {
    if siblings.contains(&order) {
        return Err(ValidationError::DuplicateOrder { group, order });
    }
    Ok(())
}

/// Outcome of one insert attempt.
#[derive(Debug)]
pub enum OrderAttempt<T> {
    Settled(T),
    /// The (group, order) unique index rejected a derived order.
    Conflict,
}

/// Run `attempt` until it settles, at most
/// [`ORDER_ASSIGNMENT_MAX_ATTEMPTS`] times.
pub async fn retry_order_conflicts<T, F, Fut>(
    group: OrderGroup,
    mut attempt: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<OrderAttempt<T>>>,
{
    for n in 1..=ORDER_ASSIGNMENT_MAX_ATTEMPTS {
        match attempt().await? {
            OrderAttempt::Settled(value) => return Ok(value),
            OrderAttempt::Conflict => {
                warn!(%group, attempt = n, "order assignment conflicted, retrying");
            }
        }
    }

    Err(CatalogError::OrderContention {
        group,
        attempts: ORDER_ASSIGNMENT_MAX_ATTEMPTS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    const GROUP: OrderGroup = OrderGroup::ProductLines(ProductId(1));

    #[test]
    fn empty_group_starts_at_one() {
        assert_eq!(next_order(Vec::<i32>::new()), Some(1));
        assert_eq!(assign_order(GROUP, None, &[]).unwrap(), 1);
    }

    #[test]
    fn derived_order_follows_the_maximum_not_the_count() {
        assert_eq!(assign_order(GROUP, None, &[1, 2, 3]).unwrap(), 4);
        assert_eq!(assign_order(GROUP, None, &[5, 2]).unwrap(), 6);
    }

    #[test]
    fn group_ending_at_the_maximum_has_no_next_slot() {
        assert_eq!(next_order([3, i32::MAX]), None);
        assert_eq!(
            assign_order(GROUP, None, &[1, i32::MAX]).unwrap_err(),
            ValidationError::NoFreeOrder { group: GROUP }
        );
        assert_eq!(assign_order(GROUP, Some(2), &[1, i32::MAX]).unwrap(), 2);
    }

    #[test]
    fn explicit_order_skips_derivation() {
        assert_eq!(assign_order(GROUP, Some(10), &[1, 2]).unwrap(), 10);
    }

    #[test]
    fn explicit_order_collision_is_rejected() {
        let err = assign_order(GROUP, Some(2), &[1, 2]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::DuplicateOrder {
                group: GROUP,
                order: 2
            }
        );
    }

    #[test]
    fn group_display_names_the_owner() {
        assert_eq!(GROUP.to_string(), "lines of product 1");
        assert_eq!(
            OrderGroup::Images(ProductLineId(9)).to_string(),
            "images of product line 9"
        );
    }

    #[tokio::test]
    async fn conflicts_are_retried_until_settled() {
        let calls = AtomicU32::new(0);
        let value = retry_order_conflicts(GROUP, || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n < ORDER_ASSIGNMENT_MAX_ATTEMPTS {
                    Ok(OrderAttempt::Conflict)
                } else {
                    Ok(OrderAttempt::Settled(n))
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(value, ORDER_ASSIGNMENT_MAX_ATTEMPTS);
    }

    #[tokio::test]
    async fn exhausted_retries_surface_contention() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = retry_order_conflicts(GROUP, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(OrderAttempt::Conflict) }
        })
        .await;

        assert!(matches!(
            result,
            Err(CatalogError::OrderContention { attempts, .. })
                if attempts == ORDER_ASSIGNMENT_MAX_ATTEMPTS
        ));
        assert_eq!(calls.load(Ordering::SeqCst), ORDER_ASSIGNMENT_MAX_ATTEMPTS);
    }

    #[tokio::test]
    async fn errors_stop_the_retry_loop() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = retry_order_conflicts(GROUP, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(CatalogError::not_found("product", 1)) }
        })
        .await;

        assert!(matches!(result, Err(CatalogError::NotFound { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
