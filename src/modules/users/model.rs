pub use dormex_models::users::*;
