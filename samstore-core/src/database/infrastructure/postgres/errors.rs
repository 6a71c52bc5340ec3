//! Translation of PostgreSQL constraint violations into catalog errors.
//!
//! Every constraint in the schema is named explicitly so the mapping can
//! key on the name rather than parse messages.

use sqlx::error::ErrorKind;

use crate::error::{CatalogError, ValidationError};

pub(crate) const PRODUCT_LINE_ORDER_KEY: &str = "product_lines_product_order_key";
pub(crate) const PRODUCT_IMAGE_ORDER_KEY: &str = "product_images_line_order_key";

/// A named constraint: the table holding it, the input field it guards and
/// the entity that field refers to.
struct Constraint {
    name: &'static str,
    table: &'static str,
    field: &'static str,
    entity: &'static str,
}

const fn constraint(
    name: &'static str,
    table: &'static str,
    field: &'static str,
    entity: &'static str,
) -> Constraint {
    Constraint {
        name,
        table,
        field,
        entity,
    }
}

const CONSTRAINTS: &[Constraint] = &[
    constraint("categories_name_key", "categories", "name", "category"),
    constraint("categories_slug_key", "categories", "slug", "category"),
    constraint("categories_parent_id_fkey", "categories", "parent", "category"),
    constraint("product_types_parent_id_fkey", "product types", "parent", "product type"),
    constraint("attribute_values_attribute_id_fkey", "attribute values", "attribute", "attribute"),
    constraint("product_type_attributes_pair_key", "product type attributes", "attribute", "product type attribute"),
    constraint("product_type_attributes_product_type_id_fkey", "product type attributes", "product_type", "product type"),
    constraint("product_type_attributes_attribute_id_fkey", "product type attributes", "attribute", "attribute"),
    constraint("products_uuid_key", "products", "uuid", "product"),
    constraint("products_category_id_fkey", "products", "category", "category"),
    constraint("products_product_type_id_fkey", "products", "product_type", "product type"),
    constraint(PRODUCT_LINE_ORDER_KEY, "product lines", "order", "product line"),
    constraint("product_lines_product_id_fkey", "product lines", "product", "product"),
    constraint("product_lines_product_type_id_fkey", "product lines", "product_type", "product type"),
    constraint(PRODUCT_IMAGE_ORDER_KEY, "product images", "order", "product image"),
    constraint("product_images_product_line_id_fkey", "product images", "product_line", "product line"),
    constraint("product_attribute_values_pair_key", "product attribute values", "attribute_value", "product attribute value"),
    constraint("product_attribute_values_product_id_fkey", "product attribute values", "product", "product"),
    constraint("product_attribute_values_attribute_value_id_fkey", "product attribute values", "attribute_value", "attribute value"),
    constraint("product_line_attribute_values_pair_key", "product line attribute values", "attribute_value", "product line attribute value"),
    constraint("product_line_attribute_values_product_line_id_fkey", "product line attribute values", "product_line", "product line"),
    constraint("product_line_attribute_values_attribute_value_id_fkey", "product line attribute values", "attribute_value", "attribute value"),
];

fn lookup(name: Option<&str>) -> Option<&'static Constraint> {
    let name = name?;
    CONSTRAINTS.iter().find(|c| c.name == name)
}

fn violation(err: &sqlx::Error) -> Option<(ErrorKind, Option<&'static Constraint>)> {
    let db = err.as_database_error()?;
    Some((db.kind(), lookup(db.constraint())))
}

/// True when `err` is a unique violation of the named constraint.
pub(crate) fn is_unique_violation_on(err: &sqlx::Error, name: &str) -> bool {
    err.as_database_error().is_some_and(|db| {
        matches!(db.kind(), ErrorKind::UniqueViolation) && db.constraint() == Some(name)
    })
}

/// Map a failed insert or update.
///
/// Unique violations become duplicate-value errors, foreign key violations
/// become unknown references; anything else is a storage failure.
pub(crate) fn write_error(err: sqlx::Error, action: &str) -> CatalogError {
    match violation(&err) {
        Some((ErrorKind::UniqueViolation, known)) => {
            let (entity, field) = known
                .map(|c| (c.entity, c.field))
                .unwrap_or(("record", "value"));
            ValidationError::DuplicateValue { entity, field }.into()
        }
        Some((ErrorKind::ForeignKeyViolation, known)) => {
            let (entity, field) = known
                .map(|c| (c.entity, c.field))
                .unwrap_or(("record", "reference"));
            ValidationError::UnknownReference { entity, field }.into()
        }
        _ => storage_error(err, action),
    }
}

/// Map a failed delete of `entity` `key`.
pub(crate) fn delete_error(
    err: sqlx::Error,
    entity: &'static str,
    key: impl ToString,
    action: &str,
) -> CatalogError {
    match violation(&err) {
        Some((ErrorKind::ForeignKeyViolation, known)) => CatalogError::ReferentialIntegrity {
            entity,
            key: key.to_string(),
            referenced_by: known.map_or("other records", |c| c.table),
        },
        _ => storage_error(err, action),
    }
}

pub(crate) fn storage_error(err: sqlx::Error, action: &str) -> CatalogError {
    tracing::error!(error = ?err, "Failed to {action}");
    CatalogError::Database(format!("Failed to {action}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_constraint_name_is_listed_once() {
        let mut names: Vec<&str> = CONSTRAINTS.iter().map(|c| c.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), CONSTRAINTS.len());
    }

    #[test]
    fn non_database_errors_are_storage_failures() {
        let err = write_error(sqlx::Error::RowNotFound, "insert category");
        assert!(matches!(err, CatalogError::Database(message) if message.contains("insert category")));
    }

    #[test]
    fn unknown_constraint_falls_back_to_generic_names() {
        assert!(lookup(Some("nope")).is_none());
        assert!(lookup(None).is_none());
        let known = lookup(Some("categories_slug_key")).unwrap();
        assert_eq!((known.entity, known.field), ("category", "slug"));
    }
}
