pub mod types;
pub mod classification;

pub use types::AlertDeskError;
pub use classification::ErrorClassification;
