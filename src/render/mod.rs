//! Execution backends for a compiled sink plan.

/// Backend trait, kinds and factory.
pub mod backend;
/// CPU backend (rayon).
pub mod cpu;
/// GPU backend (wgpu compute).
#[cfg(feature = "gpu")]
pub mod gpu;
