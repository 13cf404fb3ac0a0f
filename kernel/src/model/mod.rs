pub mod auth;
pub mod id;
pub mod lot;
pub mod reservation;
pub mod role;
pub mod spot;
pub mod summary;
pub mod user;
