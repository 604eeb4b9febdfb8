pub use dormex_models::menus::*;
