use std::path::PathBuf;

/// Packs an AMF runtime version the way `AMF_MAKE_FULL_VERSION` does.
pub const fn amf_full_version(major: u64, minor: u64, sub_minor: u64, build: u64) -> u64 {
    (major << 48) | (minor << 32) | (sub_minor << 16) | build
}

pub const AMF_FULL_VERSION: u64 = amf_full_version(1, 4, 33, 0);

#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub app_name: String,
    pub vulkan_api_version: (u32, u32), // major, minor
    pub amf_version: u64,
    pub amf_library: Option<PathBuf>, // None = platform library name
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            app_name: "amf-test".to_string(),
            vulkan_api_version: (1, 2),
            amf_version: AMF_FULL_VERSION,
            amf_library: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_version_layout() {
        assert_eq!(amf_full_version(1, 4, 33, 0), 0x0001_0004_0021_0000);
        assert_eq!(ProbeConfig::default().amf_version, AMF_FULL_VERSION);
    }
}
