pub use dormex_models::blocks::*;
