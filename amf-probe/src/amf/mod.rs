//! AMF runtime binding.
//!
//! The runtime library is opened at run time through `libloading`, so the
//! probe still reports cleanly on machines without the AMD driver stack.

pub mod ffi;

use std::ffi::c_void;
use std::path::Path;
use std::ptr::{self, NonNull};

use amf_probe_common::models::{Codec, ProbeConfig};
use amf_probe_common::probe::{BindError, EncoderContext, EncoderFactory, SdkLoader};
use amf_probe_common::{ProbeError, Result};
use libloading::Library;
use tracing::{debug, info};

use ffi::{AmfFactory, AmfInterface, AmfResult};

/// Loads the AMF runtime named by the probe configuration.
pub struct AmfLoader;

impl SdkLoader for AmfLoader {
    type Factory = AmfRuntime;

    fn load(&self, config: &ProbeConfig) -> Result<AmfRuntime> {
        match &config.amf_library {
            Some(path) => AmfRuntime::load_from(path, config.amf_version),
            None => AmfRuntime::load(config.amf_version),
        }
    }
}

/// Loaded runtime library together with the factory `AMFInit` handed out.
pub struct AmfRuntime {
    factory: NonNull<AmfFactory>,
    // Keeps the factory's code mapped; dropped last.
    _lib: Library,
}

impl AmfRuntime {
    pub fn load(version: u64) -> Result<Self> {
        let lib_name = ffi::runtime_library_name();
        info!(library = %lib_name, "Loading AMF runtime");

        // SAFETY: loading the AMD runtime runs only its library initializers.
        let lib = unsafe { Library::new(lib_name) }
            .map_err(|e| ProbeError::LibraryLoad(format!("{lib_name}: {e}")))?;

        Self::init(lib, version)
    }

    pub fn load_from(path: &Path, version: u64) -> Result<Self> {
        info!(path = %path.display(), "Loading AMF runtime from custom path");

        // SAFETY: the caller asserts this path is an AMF runtime.
        let lib = unsafe { Library::new(path) }
            .map_err(|e| ProbeError::LibraryLoad(format!("{}: {e}", path.display())))?;

        Self::init(lib, version)
    }

    fn init(lib: Library, version: u64) -> Result<Self> {
        // SAFETY: `AMFInit` has the `AMFInit_Fn` signature in every runtime
        // release. The pointer is copied out and only used while `lib` is held.
        let init: ffi::AmfInitFn = unsafe {
            *lib.get::<ffi::AmfInitFn>(ffi::AMF_INIT_FUNCTION_NAME)
                .map_err(|e| ProbeError::InitSymbol(e.to_string()))?
        };

        Self::with_init(lib, init, version)
    }

    /// Calls `init`, which must come from `lib`, to obtain the factory.
    fn with_init(lib: Library, init: ffi::AmfInitFn, version: u64) -> Result<Self> {
        let mut factory = ptr::null_mut();
        // SAFETY: `factory` is a valid out pointer and `lib` is still loaded.
        let res = unsafe { init(version, &mut factory) };
        if !res.is_ok() {
            return Err(ProbeError::AmfInit(res.to_string()));
        }
        let factory = NonNull::new(factory)
            .ok_or_else(|| ProbeError::AmfInit("AMFInit returned a null factory".to_string()))?;

        debug!("AMF factory ready (version {:#018x})", version);
        Ok(Self { factory, _lib: lib })
    }

    fn create_component(&self, context: &Interface, codec: Codec) -> AmfResult {
        let id = ffi::wide_null(codec.component_id());
        let mut component = ptr::null_mut();
        // SAFETY: the factory is alive while `self` is, `context` is a live
        // context reference and `id` is NUL terminated.
        let res = unsafe {
            let factory = self.factory.as_ptr();
            ((*(*factory).vtbl).create_component)(
                factory,
                context.as_ptr(),
                id.as_ptr(),
                &mut component,
            )
        };
        // Only built to prove support; released right away.
        drop(Interface::from_raw(component));
        res
    }
}

impl EncoderFactory for AmfRuntime {
    type Context<'a> = AmfContext<'a>;

    fn create_context(&self) -> std::result::Result<AmfContext<'_>, String> {
        let mut context = ptr::null_mut();
        // SAFETY: the factory is alive while `self` is.
        let res = unsafe {
            let factory = self.factory.as_ptr();
            ((*(*factory).vtbl).create_context)(factory, &mut context)
        };
        if !res.is_ok() {
            return Err(res.to_string());
        }
        let inner = Interface::from_raw(context).ok_or("CreateContext returned a null context")?;

        Ok(AmfContext {
            inner,
            runtime: self,
        })
    }
}

/// An `AMFContext` reference created by [`AmfRuntime`].
pub struct AmfContext<'a> {
    inner: Interface,
    runtime: &'a AmfRuntime,
}

impl EncoderContext for AmfContext<'_> {
    fn bind_vulkan(&mut self) -> std::result::Result<(), BindError> {
        let mut raw: *mut c_void = ptr::null_mut();
        let res = self.inner.query_interface(&ffi::IID_AMF_CONTEXT1, &mut raw);
        if !res.is_ok() {
            return Err(BindError::InterfaceUnavailable(res.to_string()));
        }
        let context1 = Interface::from_raw(raw.cast()).ok_or_else(|| {
            BindError::InterfaceUnavailable("QueryInterface returned null".to_string())
        })?;

        // SAFETY: `context1` was handed out for IID_AMF_CONTEXT1, so its
        // vtable has the AMFContext1 layout. A null device lets AMF pick the
        // default Vulkan device.
        let res = unsafe {
            let this = context1.as_ptr().cast::<ffi::AmfContext1>();
            ((*(*this).vtbl).init_vulkan)(this, ptr::null_mut())
        };
        drop(context1);

        if res.is_ok() {
            debug!("AMF context bound to Vulkan");
            Ok(())
        } else {
            Err(BindError::InitFailed(res.to_string()))
        }
    }

    fn has_encoder(&self, codec: Codec) -> bool {
        let res = self.runtime.create_component(&self.inner, codec);
        debug!(component = codec.component_id(), result = %res, "CreateComponent");
        res.is_ok()
    }
}

/// Owned reference to a reference-counted AMF object; released on drop.
struct Interface(NonNull<AmfInterface>);

impl Interface {
    fn from_raw(ptr: *mut AmfInterface) -> Option<Self> {
        NonNull::new(ptr).map(Self)
    }

    fn as_ptr(&self) -> *mut AmfInterface {
        self.0.as_ptr()
    }

    fn query_interface(&self, iid: &ffi::AmfGuid, out: &mut *mut c_void) -> AmfResult {
        // SAFETY: the object is alive while we hold a reference to it.
        unsafe {
            let this = self.as_ptr();
            ((*(*this).vtbl).query_interface)(this, iid, out)
        }
    }
}

impl Drop for Interface {
    fn drop(&mut self) {
        // SAFETY: we own exactly one reference.
        unsafe {
            let this = self.as_ptr();
            ((*(*this).vtbl).release)(this);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amf_probe_common::models::config::AMF_FULL_VERSION;
    use std::io::Write;

    #[test]
    fn missing_library_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("libamfrt64.so.1");

        let err = AmfRuntime::load_from(&path, AMF_FULL_VERSION)
            .err()
            .unwrap();
        assert!(matches!(err, ProbeError::LibraryLoad(_)));
        assert_eq!(err.to_string(), "Failed to load AMF lib");
    }

    #[test]
    fn non_library_file_is_load_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not a shared object").unwrap();

        let config = ProbeConfig {
            amf_library: Some(file.path().to_path_buf()),
            ..ProbeConfig::default()
        };
        let err = AmfLoader.load(&config).err().unwrap();
        assert!(matches!(err, ProbeError::LibraryLoad(_)));
        assert!(err.detail().contains(&file.path().display().to_string()));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn library_without_amf_init_is_symbol_error() {
        let config = ProbeConfig {
            amf_library: Some("libc.so.6".into()),
            ..ProbeConfig::default()
        };
        let err = AmfLoader.load(&config).err().unwrap();
        assert!(matches!(err, ProbeError::InitSymbol(_)));
        assert_eq!(err.to_string(), "Failed to get init func");
        assert!(err.detail().contains("AMFInit"));
    }
}
