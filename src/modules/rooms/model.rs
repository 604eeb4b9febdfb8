pub use dormex_models::rooms::*;
