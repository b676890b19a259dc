//! Model fixtures for Hypatia development and testing.
//!
//! Pre-built structured models covering the shapes signature analysis cares
//! about: flat models, aliased fields, nested models and repeated leaves.
//!
//! # Example
//!
//! ```
//! use hypatia_core::fixtures;
//!
//! let customer = fixtures::customer_model();
//! let model = customer.as_model().unwrap();
//! assert!(model.lookup("address").unwrap().ty.as_model().is_some());
//! ```

use crate::types::{FieldDef, ModelDef, TypeRef};

/// `Item { name: str, price: float, tags: list[str] = [] }`
#[must_use]
pub fn item_model() -> TypeRef {
    ModelDef::new("Item")
        .field(FieldDef::new("name", TypeRef::Str))
        .field(FieldDef::new("price", TypeRef::Float))
        .field(FieldDef::new("tags", TypeRef::list(TypeRef::Str)).optional())
        .into_type()
}

/// `Pagination { page: int = 1, page_size (alias pageSize): int = 20 }`
#[must_use]
pub fn pagination_model() -> TypeRef {
    ModelDef::new("Pagination")
        .field(FieldDef::new("page", TypeRef::Int).optional())
        .field(FieldDef::new("page_size", TypeRef::Int).alias("pageSize").optional())
        .into_type()
}

/// `Filters { q: Optional[str], tags (alias tag): list[str], price: Range }`
///
/// `Range` is `{ min: float, max: float }`.
#[must_use]
pub fn filters_model() -> TypeRef {
    let range = ModelDef::new("Range")
        .field(FieldDef::new("min", TypeRef::Float).optional())
        .field(FieldDef::new("max", TypeRef::Float).optional())
        .into_type();

    ModelDef::new("Filters")
        .field(FieldDef::new("q", TypeRef::optional(TypeRef::Str)).optional())
        .field(FieldDef::new("tags", TypeRef::list(TypeRef::Str)).alias("tag").optional())
        .field(FieldDef::new("price", range))
        .into_type()
}

/// Two-level nested model with one repeated leaf.
///
/// `Customer { name: str, address: Address }` where
/// `Address { city: str, zip_codes (alias zip): Optional[list[int]] }`.
#[must_use]
pub fn customer_model() -> TypeRef {
    let address = ModelDef::new("Address")
        .field(FieldDef::new("city", TypeRef::Str))
        .field(
            FieldDef::new("zip_codes", TypeRef::optional(TypeRef::list(TypeRef::Int)))
                .alias("zip")
                .optional(),
        )
        .into_type();

    ModelDef::new("Customer")
        .field(FieldDef::new("name", TypeRef::Str))
        .field(FieldDef::new("address", address))
        .into_type()
}

/// `Search { q: str, page: int }`; `page` clashes with [`pagination_model`].
#[must_use]
pub fn search_model() -> TypeRef {
    ModelDef::new("Search")
        .field(FieldDef::new("q", TypeRef::Str))
        .field(FieldDef::new("page", TypeRef::Int).optional())
        .into_type()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_are_models() {
        for ty in [
            item_model(),
            pagination_model(),
            filters_model(),
            customer_model(),
            search_model(),
        ] {
            assert!(ty.as_model().is_some(), "{ty} should be a model");
        }
    }

    #[test]
    fn test_customer_nesting() {
        let customer = customer_model();
        let address = customer.as_model().unwrap().lookup("address").unwrap();
        let zip = address.ty.as_model().unwrap().lookup("zip").unwrap();
        assert_eq!(zip.name, "zip_codes");
        assert_eq!(zip.outer_type(), &TypeRef::list(TypeRef::Int));
    }
}
