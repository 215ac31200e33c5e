//! Silo: a small data layer kernel.
//!
//! Re-exports the portable value model, capability interfaces and the generic
//! SQL writer from `silo-core`. Backend provider adapters (such as
//! `silo-oracle`) implement the capability interfaces against a concrete
//! client library.

pub use silo_core::*;
