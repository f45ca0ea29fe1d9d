//! Banner resource: repository abstraction and lifecycle service.
//! Banners are pure image content; one never exists without its asset.

pub mod repository;
pub mod service;

pub use repository::{BannerRepository, SeaOrmBannerRepository};
pub use service::{BannerService, BannerView, CreateBanner};
