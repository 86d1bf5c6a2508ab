pub mod catalog;
pub mod refresh;

pub use catalog::PricingCatalog;
pub use refresh::RefreshHandle;
