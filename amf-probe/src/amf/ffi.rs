//! Raw AMF runtime ABI: the C view of the factory, context and component
//! interfaces, plus the loader entry point.
//!
//! Only the vtable slots this crate calls are typed. The rest are kept as
//! opaque pointers so the typed slots land at the right offsets.

use std::ffi::{c_long, c_void};
use std::fmt;

/// Unused vtable entry.
type Slot = *const c_void;

/// `AMF_RESULT`
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmfResult(pub i32);

impl AmfResult {
    pub const OK: AmfResult = AmfResult(0);

    pub fn is_ok(self) -> bool {
        self == Self::OK
    }

    fn name(self) -> Option<&'static str> {
        Some(match self.0 {
            0 => "AMF_OK",
            1 => "AMF_FAIL",
            2 => "AMF_UNEXPECTED",
            3 => "AMF_ACCESS_DENIED",
            4 => "AMF_INVALID_ARG",
            5 => "AMF_OUT_OF_RANGE",
            6 => "AMF_OUT_OF_MEMORY",
            7 => "AMF_INVALID_POINTER",
            8 => "AMF_NO_INTERFACE",
            9 => "AMF_NOT_IMPLEMENTED",
            10 => "AMF_NOT_SUPPORTED",
            11 => "AMF_NOT_FOUND",
            12 => "AMF_ALREADY_INITIALIZED",
            13 => "AMF_NOT_INITIALIZED",
            14 => "AMF_INVALID_FORMAT",
            15 => "AMF_WRONG_STATE",
            16 => "AMF_FILE_NOT_OPEN",
            17 => "AMF_NO_DEVICE",
            _ => return None,
        })
    }
}

impl fmt::Display for AmfResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "AMF_RESULT({})", self.0),
        }
    }
}

/// `wchar_t`
#[cfg(windows)]
pub type WChar = u16;
#[cfg(not(windows))]
pub type WChar = u32;

/// Encodes `s` as a NUL-terminated `wchar_t` string.
pub fn wide_null(s: &str) -> Vec<WChar> {
    #[cfg(windows)]
    let units = s.encode_utf16();
    #[cfg(not(windows))]
    let units = s.chars().map(|c| c as u32);

    units.chain(std::iter::once(0)).collect()
}

/// `AMFGuid`
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmfGuid {
    pub data1: u32,
    pub data2: u16,
    pub data3: u16,
    pub data4: [u8; 8],
}

/// `AMFContext1::IID()`
pub const IID_AMF_CONTEXT1: AmfGuid = AmfGuid {
    data1: 0xd9e9f868,
    data2: 0x6220,
    data3: 0x44c6,
    data4: [0xa2, 0x2f, 0x7c, 0xd6, 0xda, 0xc6, 0x86, 0x46],
};

/// Leading slots shared by every reference-counted AMF interface.
#[repr(C)]
pub struct AmfInterfaceVtbl {
    pub acquire: unsafe extern "system" fn(this: *mut AmfInterface) -> c_long,
    pub release: unsafe extern "system" fn(this: *mut AmfInterface) -> c_long,
    pub query_interface: unsafe extern "system" fn(
        this: *mut AmfInterface,
        iid: *const AmfGuid,
        interface: *mut *mut c_void,
    ) -> AmfResult,
}

/// Any reference-counted AMF object (`AMFContext`, `AMFComponent`, ...).
#[repr(C)]
pub struct AmfInterface {
    pub vtbl: *const AmfInterfaceVtbl,
}

#[repr(C)]
pub struct AmfContext1Vtbl {
    pub base: AmfInterfaceVtbl,
    _property_storage: [Slot; 10],
    // AMFContext: Terminate, DX9 x4, DX11 x4, OpenCL x8, OpenGL x5, XV x4,
    // Gralloc x4, Alloc x3, CreateFrom*Native x8, GetCompute
    _context: [Slot; 42],
    // CreateBufferFromDX11Native, AllocBufferEx, AllocSurfaceEx
    _context1_alloc: [Slot; 3],
    pub init_vulkan:
        unsafe extern "system" fn(this: *mut AmfContext1, vulkan_device: *mut c_void) -> AmfResult,
    _vulkan: [Slot; 6],
}

#[cfg(test)]
impl AmfContext1Vtbl {
    pub fn new(
        base: AmfInterfaceVtbl,
        init_vulkan: unsafe extern "system" fn(*mut AmfContext1, *mut c_void) -> AmfResult,
    ) -> Self {
        Self {
            base,
            _property_storage: [std::ptr::null(); 10],
            _context: [std::ptr::null(); 42],
            _context1_alloc: [std::ptr::null(); 3],
            init_vulkan,
            _vulkan: [std::ptr::null(); 6],
        }
    }
}

#[repr(C)]
pub struct AmfContext1 {
    pub vtbl: *const AmfContext1Vtbl,
}

#[repr(C)]
pub struct AmfFactoryVtbl {
    pub create_context: unsafe extern "system" fn(
        this: *mut AmfFactory,
        context: *mut *mut AmfInterface,
    ) -> AmfResult,
    pub create_component: unsafe extern "system" fn(
        this: *mut AmfFactory,
        context: *mut AmfInterface,
        id: *const WChar,
        component: *mut *mut AmfInterface,
    ) -> AmfResult,
    // SetCacheFolder, GetCacheFolder, GetDebug, GetTrace, GetPrograms
    _rest: [Slot; 5],
}

#[cfg(test)]
impl AmfFactoryVtbl {
    pub fn new(
        create_context: unsafe extern "system" fn(*mut AmfFactory, *mut *mut AmfInterface) -> AmfResult,
        create_component: unsafe extern "system" fn(
            *mut AmfFactory,
            *mut AmfInterface,
            *const WChar,
            *mut *mut AmfInterface,
        ) -> AmfResult,
    ) -> Self {
        Self {
            create_context,
            create_component,
            _rest: [std::ptr::null(); 5],
        }
    }
}

/// `AMFFactory`. Not reference counted; it lives as long as the runtime
/// library stays loaded.
#[repr(C)]
pub struct AmfFactory {
    pub vtbl: *const AmfFactoryVtbl,
}

pub type AmfInitFn = unsafe extern "C" fn(version: u64, factory: *mut *mut AmfFactory) -> AmfResult;

pub const AMF_INIT_FUNCTION_NAME: &[u8] = b"AMFInit\0";

/// Platform name of the AMF runtime (`AMF_DLL_NAMEA`).
pub fn runtime_library_name() -> &'static str {
    if cfg!(windows) {
        if cfg!(target_pointer_width = "64") {
            "amfrt64.dll"
        } else {
            "amfrt32.dll"
        }
    } else if cfg!(target_pointer_width = "64") {
        "libamfrt64.so.1"
    } else {
        "libamfrt32.so.1"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{offset_of, size_of};

    #[test]
    fn init_vulkan_slot() {
        let slot = offset_of!(AmfContext1Vtbl, init_vulkan) / size_of::<Slot>();
        assert_eq!(slot, 58);
    }

    #[test]
    fn factory_slots() {
        assert_eq!(offset_of!(AmfFactoryVtbl, create_component), size_of::<Slot>());
        assert_eq!(size_of::<AmfFactoryVtbl>(), 7 * size_of::<Slot>());
    }

    #[test]
    fn guid_layout() {
        assert_eq!(size_of::<AmfGuid>(), 16);
    }

    #[test]
    fn wide_ids_are_nul_terminated() {
        let wide = wide_null("AMFVideoEncoder_AV1");
        assert_eq!(wide.len(), "AMFVideoEncoder_AV1".len() + 1);
        assert_eq!(wide.last(), Some(&0));
        assert_eq!(wide[0], 'A' as WChar);
    }

    #[test]
    fn result_names() {
        assert!(AmfResult(0).is_ok());
        assert_eq!(AmfResult(8).to_string(), "AMF_NO_INTERFACE");
        assert_eq!(AmfResult(-3).to_string(), "AMF_RESULT(-3)");
    }

    #[test]
    fn library_name_matches_platform() {
        let name = runtime_library_name();
        if cfg!(windows) {
            assert!(name.ends_with(".dll"));
        } else {
            assert!(name.starts_with("libamfrt") && name.ends_with(".so.1"));
        }
    }
}
