//! Shop resource: repository abstraction, lifecycle service, and the
//! paginated read paths (listing by category, global search).

pub mod repository;
pub mod service;

pub use repository::{SeaOrmShopRepository, ShopRepository};
pub use service::{CreateShop, ShopService, ShopView, UpdateShop};
