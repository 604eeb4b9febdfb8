pub use dormex_models::complaints::*;
