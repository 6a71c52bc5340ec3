//! Binding rules for the attribute/value tables.
//!
//! A product line carries at most one value per attribute kind. Binding
//! the exact (line, value) pair a second time is not an error: the caller
//! gets the existing binding back. Products and product types only reject
//! duplicate pairs, which are likewise treated as no-ops.

use samstore_model::{AttributeValue, ProductLineId};

use crate::error::ValidationError;

/// What a store should do with a requested binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingDecision {
    Insert,
    AlreadyBound,
}

/// Decide whether `candidate` may be bound to `line`, given the values the
/// line already holds.
pub fn check_line_binding(
    line: ProductLineId,
    existing: &[AttributeValue],
    candidate: &AttributeValue,
) -> Result<BindingDecision, ValidationError> {
    if existing.iter().any(|value| value.id == candidate.id) {
        return Ok(BindingDecision::AlreadyBound);
    }

    if existing
        .iter()
        .any(|value| value.attribute_id == candidate.attribute_id)
    {
        return Err(ValidationError::DuplicateAttribute {
            product_line: line,
            attribute: candidate.attribute_id,
        });
    }

    Ok(BindingDecision::Insert)
}

/// Exact-pair rule used for product values and product type declarations.
pub fn check_pair_binding<T: PartialEq>(existing: &[T], candidate: &T) -> BindingDecision {
    if existing.contains(candidate) {
        BindingDecision::AlreadyBound
    } else {
        BindingDecision::Insert
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use samstore_model::{AttributeValueId, ProductAttributeId};

    fn value(id: i64, attribute: i64, text: &str) -> AttributeValue {
        let now = Utc::now();
        AttributeValue {
            id: AttributeValueId(id),
            value: text.to_string(),
            attribute_id: ProductAttributeId(attribute),
            created_at: now,
            updated_at: now,
        }
    }

    const LINE: ProductLineId = ProductLineId(1);

    #[test]
    fn first_value_is_inserted() {
        let red = value(1, 10, "red");
        assert_eq!(
            check_line_binding(LINE, &[], &red).unwrap(),
            BindingDecision::Insert
        );
    }

    #[test]
    fn values_of_different_kinds_coexist() {
        let red = value(1, 10, "red");
        let large = value(2, 20, "L");
        assert_eq!(
            check_line_binding(LINE, &[red], &large).unwrap(),
            BindingDecision::Insert
        );
    }

    #[test]
    fn second_value_of_same_kind_is_rejected() {
        let red = value(1, 10, "red");
        let blue = value(2, 10, "blue");

        let err = check_line_binding(LINE, &[red], &blue).unwrap_err();
        assert_eq!(
            err,
            ValidationError::DuplicateAttribute {
                product_line: LINE,
                attribute: ProductAttributeId(10),
            }
        );
        assert!(err.to_string().starts_with("Duplicate attribute exists"));
    }

    #[test]
    fn rebinding_the_same_value_is_a_no_op() {
        let red = value(1, 10, "red");
        assert_eq!(
            check_line_binding(LINE, std::slice::from_ref(&red), &red).unwrap(),
            BindingDecision::AlreadyBound
        );
    }

    #[test]
    fn pair_rule_only_looks_at_exact_pairs() {
        let existing = [AttributeValueId(1), AttributeValueId(2)];
        assert_eq!(
            check_pair_binding(&existing, &AttributeValueId(2)),
            BindingDecision::AlreadyBound
        );
        assert_eq!(
            check_pair_binding(&existing, &AttributeValueId(3)),
            BindingDecision::Insert
        );
    }
}
