//! Provider adapter implementations.

/// Shared utilities used by provider adapters.
pub mod common;

mod memory;

#[cfg(feature = "cloudflare")]
mod cloudflare;

pub use memory::MemoryProvider;

#[cfg(feature = "cloudflare")]
pub use cloudflare::CloudflareProvider;
