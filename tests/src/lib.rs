//! End-to-end scenarios: boot the registry from compiled-in roots plus a lab
//! root of scripted transports, then drive the executor.

pub mod fakes;

mod execution;
mod registration;
mod sources;
