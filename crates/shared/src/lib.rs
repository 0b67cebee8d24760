// Test code patterns:
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! HealthPlan Shared Library
//!
//! Plumbing used by every HealthPlan crate:
//!
//! - **Config**: environment-driven client configuration
//! - **Client**: authenticated JSON GETs against the plan backend
//! - **Envelope**: the two list envelopes the backend answers with
//! - **De**: lenient decoders for loosely typed backend fields
//! - **Currency**: deterministic Brazilian real formatting
//! - **Outcome**: explicit fetch results instead of swallow-to-empty
//! - **View**: per-view load state and the still-mounted guard

pub mod client;
pub mod config;
pub mod currency;
pub mod de;
pub mod envelope;
pub mod error;
pub mod outcome;
pub mod view;

pub use client::ApiClient;
pub use config::{Config, ConfigError, DEFAULT_API_URL};
pub use currency::{format_brl, CurrencyFormat, FALLBACK_DISPLAY};
pub use envelope::{extract_list, EnvelopeShape};
pub use error::{ApiError, ApiResult};
pub use outcome::FetchOutcome;
pub use view::{LoadEvent, LoadState, MountToken, Mounted};
