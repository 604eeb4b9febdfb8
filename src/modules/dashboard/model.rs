pub use dormex_models::dashboard::*;
