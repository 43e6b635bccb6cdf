/// Service layer
pub mod assets;
pub mod catalog;
pub mod files;

pub use assets::AssetBundle;
pub use catalog::CatalogService;
pub use files::FileResolver;
