pub mod alert;
pub mod policy;
pub mod server;
pub mod request;
pub mod filter;
pub mod page;

pub use alert::*;
pub use policy::*;
pub use server::*;
pub use request::*;
pub use filter::*;
pub use page::*;
