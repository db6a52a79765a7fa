pub mod health;
pub mod policies;
pub mod requests;
pub mod servers;
pub mod settings;
pub mod summary;
