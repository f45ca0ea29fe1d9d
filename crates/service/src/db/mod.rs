//! SeaORM query functions, one module per entity.
//!
//! Free functions over `&DatabaseConnection`; the repository traits in the
//! sibling modules delegate here so the query code stays in one place.

pub mod banner_service;
pub mod category_service;
pub mod shop_service;
