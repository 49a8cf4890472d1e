pub mod genres;
pub mod providers;
pub mod recommendations;

pub use providers::CatalogProvider;
