//! Category resource: repository abstraction and lifecycle service.

pub mod repository;
pub mod service;

pub use repository::{CategoryRepository, SeaOrmCategoryRepository};
pub use service::{CategoryService, CategoryView, CreateCategory, UpdateCategory};
