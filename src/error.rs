//! Error taxonomy for the neptune simulation system.
//!
//! Every variant is terminal: initialization failures and unsupported
//! configurations are surfaced to the caller and never retried.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NeptuneError {
    #[error("no compatible GPU adapter found")]
    NoAdapter,

    #[cfg(feature = "gpu")]
    #[error("failed to acquire GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("{0}D simulation is not supported")]
    UnsupportedDimension(u32),

    #[error("simulation dimension not selected; call set_dimension first")]
    NotReady,

    #[error("live field resize is not supported; tear down and recreate the pipeline")]
    ResizeUnsupported,

    #[error("resource mismatch: {0}")]
    ResourceMismatch(String),
}
