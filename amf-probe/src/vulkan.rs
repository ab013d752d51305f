//! Vulkan bootstrap: a throwaway instance used only to read the driver
//! identity of the first physical device.

use std::ffi::{CStr, CString};

use amf_probe_common::models::{DriverIdentity, DriverKind, ProbeConfig};
use amf_probe_common::probe::GraphicsBootstrap;
use amf_probe_common::{ProbeError, Result};
use ash::vk;
use tracing::{debug, info};

pub struct VulkanBootstrap;

impl GraphicsBootstrap for VulkanBootstrap {
    fn first_adapter_driver(&self, config: &ProbeConfig) -> Result<DriverIdentity> {
        // SAFETY: the entry outlives the instance created from it below.
        let entry = unsafe { ash::Entry::load() }
            .map_err(|e| ProbeError::VulkanInit(format!("Vulkan loader unavailable: {e}")))?;

        let instance = ScopedInstance::new(&entry, config)?;

        // SAFETY: the instance is valid until `instance` is dropped.
        let devices = unsafe { instance.raw.enumerate_physical_devices() }
            .map_err(|e| ProbeError::DeviceEnumeration(format!("{e:?}")))?;
        let Some(&first) = devices.first() else {
            return Err(ProbeError::DeviceEnumeration(
                "no physical devices reported".to_string(),
            ));
        };
        info!(count = devices.len(), "Found Vulkan physical devices");

        Ok(query_driver_identity(&instance.raw, first))
    }
}

/// Instance destroyed when the bootstrap returns.
struct ScopedInstance {
    raw: ash::Instance,
}

impl ScopedInstance {
    fn new(entry: &ash::Entry, config: &ProbeConfig) -> Result<Self> {
        let app_name = CString::new(config.app_name.as_str())
            .map_err(|e| ProbeError::VulkanInit(format!("invalid application name: {e}")))?;
        let (major, minor) = config.vulkan_api_version;

        let app_info = vk::ApplicationInfo::default()
            .application_name(&app_name)
            .api_version(vk::make_api_version(0, major, minor, 0));
        let create_info = vk::InstanceCreateInfo::default().application_info(&app_info);

        // SAFETY: `create_info` and everything it points to outlive the call.
        let raw = unsafe { entry.create_instance(&create_info, None) }
            .map_err(|e| ProbeError::VulkanInit(format!("{e:?}")))?;
        debug!(app = %config.app_name, "Vulkan {}.{} instance created", major, minor);

        Ok(Self { raw })
    }
}

impl Drop for ScopedInstance {
    fn drop(&mut self) {
        // SAFETY: no objects derived from the instance outlive it.
        unsafe { self.raw.destroy_instance(None) };
        debug!("Vulkan instance destroyed");
    }
}

fn query_driver_identity(instance: &ash::Instance, device: vk::PhysicalDevice) -> DriverIdentity {
    let mut driver_props = vk::PhysicalDeviceDriverProperties::default();
    let adapter_name = {
        let mut props = vk::PhysicalDeviceProperties2::default().push_next(&mut driver_props);
        // SAFETY: `device` was enumerated from `instance`; the chain only
        // holds structures that extend VkPhysicalDeviceProperties2.
        unsafe { instance.get_physical_device_properties2(device, &mut props) };
        c_str_lossy(props.properties.device_name_as_c_str())
    };

    let identity = DriverIdentity {
        kind: driver_kind(driver_props.driver_id),
        adapter_name,
        driver_name: c_str_lossy(driver_props.driver_name_as_c_str()),
        driver_info: c_str_lossy(driver_props.driver_info_as_c_str()),
    };
    info!(
        adapter = %identity.adapter_name,
        driver_id = ?driver_props.driver_id,
        "First adapter driver: {} {}",
        identity.driver_name,
        identity.driver_info
    );
    identity
}

fn driver_kind(id: vk::DriverId) -> DriverKind {
    match id {
        vk::DriverId::AMD_PROPRIETARY => DriverKind::AmdProprietary,
        vk::DriverId::MESA_RADV => DriverKind::MesaRadv,
        other => DriverKind::Other(other.as_raw()),
    }
}

fn c_str_lossy<E>(name: std::result::Result<&CStr, E>) -> String {
    name.map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepted_driver_ids() {
        assert_eq!(driver_kind(vk::DriverId::AMD_PROPRIETARY), DriverKind::AmdProprietary);
        assert_eq!(driver_kind(vk::DriverId::MESA_RADV), DriverKind::MesaRadv);
        assert_eq!(driver_kind(vk::DriverId::AMD_OPEN_SOURCE), DriverKind::Other(2));
    }

    #[test]
    fn other_vendors_are_rejected() {
        for id in [
            vk::DriverId::NVIDIA_PROPRIETARY,
            vk::DriverId::INTEL_OPEN_SOURCE_MESA,
            vk::DriverId::MESA_LLVMPIPE,
            vk::DriverId::AMD_OPEN_SOURCE,
        ] {
            assert!(!driver_kind(id).is_accepted(), "{id:?} accepted");
        }
    }

    #[test]
    fn unterminated_name_is_empty() {
        assert_eq!(c_str_lossy(CStr::from_bytes_until_nul(b"abcd")), "");
        assert_eq!(c_str_lossy(CStr::from_bytes_until_nul(b"radv\0\0")), "radv");
    }
}
