//! Probe sequence: driver gate, SDK load, adapter capability scan.
//!
//! The graphics bootstrap and the encoder SDK sit behind traits so the
//! sequence can run against the real Vulkan/AMF bindings or test doubles.

use crate::models::{AdapterCapabilities, Codec, DriverIdentity, ProbeConfig};
use crate::{ProbeError, Result};
use tracing::{debug, info, warn};

/// Reads the driver identity of the first graphics adapter.
pub trait GraphicsBootstrap {
    fn first_adapter_driver(&self, config: &ProbeConfig) -> Result<DriverIdentity>;
}

/// Why a context could not be bound to the graphics API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// The context does not expose the graphics interop interface.
    InterfaceUnavailable(String),
    /// The interface exists but initialization failed.
    InitFailed(String),
}

pub trait EncoderContext {
    fn bind_vulkan(&mut self) -> std::result::Result<(), BindError>;

    /// Attempts to construct the encoder component for `codec`. The component
    /// is discarded right away.
    fn has_encoder(&self, codec: Codec) -> bool;
}

pub trait EncoderFactory {
    type Context<'a>: EncoderContext
    where
        Self: 'a;

    fn create_context(&self) -> std::result::Result<Self::Context<'_>, String>;
}

pub trait SdkLoader {
    type Factory: EncoderFactory;

    fn load(&self, config: &ProbeConfig) -> Result<Self::Factory>;
}

pub fn check_driver(identity: &DriverIdentity) -> Result<()> {
    if identity.kind.is_accepted() {
        info!(
            adapter = %identity.adapter_name,
            driver = %identity.driver_name,
            info = %identity.driver_info,
            "Driver accepted: {:?}",
            identity.kind
        );
        Ok(())
    } else {
        Err(ProbeError::UnsupportedDriver(format!(
            "{:?} ({}) on {}",
            identity.kind, identity.driver_name, identity.adapter_name
        )))
    }
}

/// Probes one adapter index, recording any supported encoders in `caps`.
/// Returns whether the scan should move on to the next index.
pub fn probe_adapter<F: EncoderFactory>(
    factory: &F,
    adapter_index: u32,
    caps: &mut AdapterCapabilities,
) -> bool {
    // Only the default adapter is probed; InitVulkan(NULL) picks it.
    if adapter_index != 0 {
        return false;
    }

    let mut context = match factory.create_context() {
        Ok(context) => context,
        Err(e) => {
            warn!("Failed to create AMF context for adapter {}: {}", adapter_index, e);
            return true;
        }
    };

    match context.bind_vulkan() {
        Ok(()) => {}
        Err(BindError::InterfaceUnavailable(e)) => {
            warn!("AMFContext1 interface unavailable: {}", e);
            return false;
        }
        Err(BindError::InitFailed(e)) => {
            warn!("InitVulkan failed for adapter {}: {}", adapter_index, e);
            return false;
        }
    }

    for codec in Codec::ALL {
        let supported = context.has_encoder(codec);
        debug!(
            component = codec.component_id(),
            supported, "Encoder component probe"
        );
        caps.set(codec, supported);
    }

    true
}

pub fn scan_adapters<F: EncoderFactory>(factory: &F) -> AdapterCapabilities {
    let mut caps = AdapterCapabilities::default();
    let mut adapter_index = 0;
    while probe_adapter(factory, adapter_index, &mut caps) {
        adapter_index += 1;
    }
    info!(adapters = adapter_index, "Adapter scan finished: {:?}", caps);
    caps
}

/// Scan result together with the loaded SDK. The SDK stays loaded until the
/// caller drops this, after the report is out.
pub struct ScanOutcome<F> {
    pub caps: AdapterCapabilities,
    pub runtime: F,
}

/// Runs the whole probe. The first error aborts it.
pub fn run<G, L>(graphics: &G, sdk: &L, config: &ProbeConfig) -> Result<ScanOutcome<L::Factory>>
where
    G: GraphicsBootstrap,
    L: SdkLoader,
{
    let identity = graphics.first_adapter_driver(config)?;
    check_driver(&identity)?;

    let runtime = sdk.load(config)?;
    let caps = scan_adapters(&runtime);
    Ok(ScanOutcome { caps, runtime })
}
