pub mod auth;
pub mod health;
pub mod lot;
pub mod reservation;
pub mod summary;
pub mod user;
