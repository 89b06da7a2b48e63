/// Services module
///
/// Thin typed wrappers over the dispatcher, one per backend resource.
/// DTOs mirror the backend and carry no client-side business rules.
pub mod auth;
pub mod catalog;
pub mod items;
pub mod sessions;

pub use auth::AuthService;
pub use catalog::CatalogService;
pub use items::ItemService;
pub use sessions::SessionService;
