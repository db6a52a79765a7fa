pub mod alerts;
pub mod connection;
pub mod policies;
pub mod schema;
pub mod seed;
pub mod servers;
pub mod settings;

pub use connection::Database;
