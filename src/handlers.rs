pub mod errors;
pub mod health;
pub mod microposts;
pub mod sessions;
pub mod users;
