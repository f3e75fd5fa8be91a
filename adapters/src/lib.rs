//! # Corebill Gateway Adapters
//!
//! Payment processor abstraction layer: one uniform interface for charging,
//! refunding and creating payment links/QR codes through several external
//! processors with incompatible wire formats, amount encodings, status
//! vocabularies and failure behavior.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │            Gateway Registry (public API)            │
//! └────────────┬────────────────────────────────────────┘
//!              │
//!     ┌────────┼────────────────┐
//!     │        │                │
//! ┌───▼────┐ ┌─▼──────┐ ┌──────▼───┐
//! │  Card  │ │ Wallet │ │ Regional │
//! │Connector│ │Connector│ │Connector │
//! └───┬────┘ └─┬──────┘ └──────┬───┘
//!     │        │               │
//! ┌───▼────────▼───────────────▼───┐
//! │ Normalize → Retry → Transport  │
//! └────────────────────────────────┘
//! ```
//!
//! Normalization is pure and processor-keyed; the retry policy retries only
//! transport-level failures with bounded exponential backoff; the transport
//! enforces one hard deadline and one cancellation scope per call.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod card;
pub mod config;
pub mod connector;
pub mod error;
pub mod normalize;
pub mod regional;
pub mod registry;
pub mod retry;
pub mod transport;
pub mod wallet;

pub use config::GatewayConfig;
pub use connector::ProcessorConnector;
pub use error::{Error, Result};
pub use registry::GatewayRegistry;

/// Default attempts per call, first attempt included
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default hard deadline per outbound attempt (seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Delay before the second attempt (milliseconds)
pub const BASE_BACKOFF_MS: u64 = 1_000;

/// Backoff ceiling (milliseconds)
pub const MAX_BACKOFF_MS: u64 = 30_000;
