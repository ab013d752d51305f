/// Driver family reported by the first Vulkan adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverKind {
    AmdProprietary,
    MesaRadv,
    /// Any other `VkDriverId`, kept as its raw value for logging.
    Other(i32),
}

impl DriverKind {
    pub fn is_accepted(self) -> bool {
        matches!(self, DriverKind::AmdProprietary | DriverKind::MesaRadv)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverIdentity {
    pub kind: DriverKind,
    pub adapter_name: String,
    pub driver_name: String,
    pub driver_info: String,
}
