pub mod error;
pub mod models;
pub mod probe;
pub mod report;

pub use error::ProbeError;
pub type Result<T> = std::result::Result<T, ProbeError>;
