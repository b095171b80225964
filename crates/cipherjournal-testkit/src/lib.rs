//! # Cipherjournal Testkit
//!
//! Testing utilities for the Cipherjournal ledger.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: A pre-wired ledger over the in-memory backend with a
//!   fixed cast of identities
//! - **Generators**: Proptest strategies for property-based testing
//!
//! ## Test Fixtures
//!
//! Quickly set up test scenarios:
//!
//! ```rust
//! use cipherjournal_testkit::fixtures::TestFixture;
//!
//! # async fn example() {
//! let fixture = TestFixture::new();
//! let id = fixture.create_entry(fixture.alice, 40).await;
//! # }
//! ```
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use cipherjournal_testkit::generators::sealed_envelope;
//!
//! proptest! {
//!     #[test]
//!     fn envelopes_import((value, env) in sealed_envelope()) {
//!         // ...
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{multi_party_addresses, named_address, TestFixture};
pub use generators::{draft_from_params, DraftParams};
