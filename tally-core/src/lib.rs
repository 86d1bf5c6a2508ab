pub mod error;
pub mod repository;
pub mod rules;
pub mod session;

pub use error::{CatalogError, CheckoutError, StoreError};
pub use repository::{SessionHandle, SessionRepository};
pub use rules::{PricingRule, RulesProvider, SpecialOffer, StaticRules};
pub use session::CheckoutSession;
