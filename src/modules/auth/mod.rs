pub mod controller;
pub mod model;
pub mod oauth;
pub mod router;
pub mod service;
