pub mod capabilities;
pub mod config;
pub mod driver;

pub use capabilities::{AdapterCapabilities, Codec};
pub use config::ProbeConfig;
pub use driver::{DriverIdentity, DriverKind};
