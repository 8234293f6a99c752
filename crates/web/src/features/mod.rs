pub mod athletes;
pub mod auth;
pub mod ping;
pub mod seed;
pub mod upload;
