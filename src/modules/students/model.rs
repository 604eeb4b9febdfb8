pub use dormex_models::students::*;
