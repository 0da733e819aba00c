//! # zonekit
//!
//! A provider-agnostic DNS record management library: one generic record
//! model, typed parsers for the common record types, and a small async trait
//! surface that backend adapters implement.
//!
//! ## Providers
//!
//! | Provider | Feature Flag | Auth Method |
//! |----------|-------------|-------------|
//! | In-memory ([`MemoryProvider`]) | always available | — |
//! | [Cloudflare](https://www.cloudflare.com/) | `cloudflare` | Bearer Token |
//!
//! ## Feature Flags
//!
//! - **`cloudflare`** *(default)* — Enable the Cloudflare adapter.
//!
//! ### TLS Backend
//!
//! - **`native-tls`** *(default)* — Use the platform's native TLS implementation.
//! - **`rustls`** — Use rustls. Recommended for cross-compilation.
//!
//! ## The record model
//!
//! Every record reduces to an [`RR`](record::RR): a zone-relative name, a
//! TTL, an uppercase type tag and the value in zone-file presentation syntax.
//! The typed structs in [`record`] (A/AAAA, CNAME, MX, NS, SRV, TXT, CAA,
//! HTTPS/SVCB) parse from and flatten back to that generic form losslessly;
//! record types the crate does not model pass through untouched.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use zonekit::record::{Address, Mx};
//! use zonekit::{MemoryProvider, ZoneProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = MemoryProvider::with_zones(["example.com."]).await;
//!
//!     // Make the zone contain exactly these records for their RRsets.
//!     provider
//!         .set_records(
//!             "example.com.",
//!             vec![
//!                 Address {
//!                     name: "www".to_string(),
//!                     ttl: Duration::from_secs(300),
//!                     ip: "192.0.2.1".parse()?,
//!                 }
//!                 .into(),
//!                 Mx {
//!                     name: "@".to_string(),
//!                     ttl: Duration::from_secs(3600),
//!                     preference: 10,
//!                     target: "mail.example.com".to_string(),
//!                 }
//!                 .into(),
//!             ],
//!         )
//!         .await?;
//!
//!     for record in provider.get_records("example.com.").await? {
//!         println!("{record:?}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Reconciliation semantics
//!
//! [`ZoneProvider::set_records`] replaces whole RRsets: for every
//! (name, type) pair in the batch the zone ends up with exactly the batch's
//! records for that pair, and every other pair is left alone. Calling it
//! twice with the same batch is a no-op the second time.
//! [`ZoneProvider::delete_records`] deletes by example, with empty type/data
//! and zero TTL acting as wildcards. The shared planning logic lives in
//! [`reconcile`].
//!
//! ## Error Handling
//!
//! All provider operations return [`Result<T, ProviderError>`](ProviderError):
//!
//! - [`ProviderError::InvalidCredentials`] — authentication failed
//! - [`ProviderError::ZoneNotFound`] — the zone does not exist
//! - [`ProviderError::RateLimited`] — API rate limit exceeded (retryable)
//! - [`ProviderError::NetworkError`] — network connectivity issue (retryable)
//!
//! Transient errors (`NetworkError`, `Timeout`, `RateLimited`) are
//! automatically retried with exponential backoff. See [`ProviderError`] for
//! the full list.

mod error;
mod http_client;
pub mod name;
mod providers;
pub mod reconcile;
pub mod record;
mod traits;
mod utils;

// Re-export error types
pub use error::{ProviderError, Result};

// Re-export the provider surface (internal traits are not exported)
pub use traits::{Zone, ZoneLister, ZoneProvider};

// Flatten the most-used record types into the crate root
pub use record::{Record, ToRr, RR};

// Re-export concrete providers
pub use providers::MemoryProvider;

#[cfg(feature = "cloudflare")]
pub use providers::CloudflareProvider;
