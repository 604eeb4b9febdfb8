pub mod auth;
pub mod blocks;
pub mod complaints;
pub mod dashboard;
pub mod menu;
pub mod rooms;
pub mod students;
pub mod users;
