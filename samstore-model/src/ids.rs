//! Strongly typed row identifiers.
//!
//! Every catalog table uses a `BIGSERIAL` primary key. Wrapping the raw
//! integer keeps a product line id from being passed where an image id is
//! expected; the wire form stays a bare integer.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! catalog_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Serialize,
            Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

catalog_id!(
    /// Node in the category tree
    CategoryId
);
catalog_id!(ProductId);
catalog_id!(
    /// A sellable variant (SKU) of a product
    ProductLineId
);
catalog_id!(ProductImageId);
catalog_id!(
    /// An attribute kind such as "color" or "size"
    ProductAttributeId
);
catalog_id!(AttributeValueId);
catalog_id!(ProductTypeId);
catalog_id!(
    /// Row id of any of the attribute join tables
    BindingId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_bare_integers() {
        let json = serde_json::to_string(&CategoryId(7)).unwrap();
        assert_eq!(json, "7");

        let parsed: ProductLineId = serde_json::from_str("42").unwrap();
        assert_eq!(parsed, ProductLineId(42));
    }

    #[test]
    fn ids_work_as_json_map_keys() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(ProductAttributeId(3), "red".to_string());
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"3":"red"}"#);
    }
}
