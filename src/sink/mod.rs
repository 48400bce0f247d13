pub(crate) mod config;
pub(crate) mod kernels;
pub(crate) mod plan;
pub(crate) mod resolve;
pub(crate) mod strategy;
pub(crate) mod viewer;
