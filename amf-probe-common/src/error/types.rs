use thiserror::Error;

/// Fatal probe failures. The `Display` text is what the user sees after the
/// `ERROR:` prefix; the carried detail only goes to the log.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Failed to initialize Vulkan")]
    VulkanInit(String),

    #[error("Failed to enumerate Vulkan devices")]
    DeviceEnumeration(String),

    #[error("Not running AMD proprietary driver or RADV")]
    UnsupportedDriver(String),

    #[error("Failed to load AMF lib")]
    LibraryLoad(String),

    #[error("Failed to get init func")]
    InitSymbol(String),

    #[error("AMFInit failed")]
    AmfInit(String),
}

impl ProbeError {
    pub fn detail(&self) -> &str {
        match self {
            ProbeError::VulkanInit(detail)
            | ProbeError::DeviceEnumeration(detail)
            | ProbeError::UnsupportedDriver(detail)
            | ProbeError::LibraryLoad(detail)
            | ProbeError::InitSymbol(detail)
            | ProbeError::AmfInit(detail) => detail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_hides_detail() {
        let err = ProbeError::LibraryLoad("libamfrt64.so.1: cannot open shared object file".into());
        assert_eq!(err.to_string(), "Failed to load AMF lib");
        assert_eq!(err.detail(), "libamfrt64.so.1: cannot open shared object file");
    }

    #[test]
    fn messages_match_error_kinds() {
        let cases = [
            (ProbeError::VulkanInit(String::new()), "Failed to initialize Vulkan"),
            (
                ProbeError::DeviceEnumeration(String::new()),
                "Failed to enumerate Vulkan devices",
            ),
            (
                ProbeError::UnsupportedDriver(String::new()),
                "Not running AMD proprietary driver or RADV",
            ),
            (ProbeError::LibraryLoad(String::new()), "Failed to load AMF lib"),
            (ProbeError::InitSymbol(String::new()), "Failed to get init func"),
            (ProbeError::AmfInit(String::new()), "AMFInit failed"),
        ];

        for (err, expected) in cases {
            assert_eq!(err.to_string(), expected);
        }
    }
}
