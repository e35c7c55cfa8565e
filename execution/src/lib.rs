//! Fairdraw execution layer.
//!
//! This crate contains the deterministic commit-reveal random engine
//! ([`Layer`]) embedded by hosts that expose verifiable random numbers to
//! on-ledger programs.
//!
//! ## Determinism requirements
//! - Do not use wall-clock time inside execution.
//! - Do not use non-deterministic randomness; only derive from the
//!   ledger-provided beacon and captured block hashes.
//! - Avoid iteration order of hash-based collections influencing outputs.
//!
//! ## Trust boundaries
//! The beacon's unpredictability before finalization is inherited from the
//! hosting ledger (see [`Ledger`]); attested hashes are trusted on the
//! strength of the attester role, not verified against an independent source.
//!
//! The primary entrypoint is [`Layer`]: one per unit of execution, staging
//! writes over a [`State`] and committing them back to the host.
//!
//! ## Minimal flow (example)
//! ```rust,ignore
//! # #[cfg(feature = "mocks")]
//! # {
//! use fairdraw_execution::{mocks, Layer, Memory, Roles, State as _};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut state = Memory::default();
//! let mut ledger = mocks::MockLedger::new();
//! ledger.advance_to(100);
//! let (_, owner) = mocks::create_account_keypair(0);
//! let roles = Roles::new(owner.clone());
//!
//! // Phase 1: commit.
//! let mut layer = Layer::new(&state, &ledger, &roles);
//! let (seed, _events) = layer.commit_seed(&owner).await?;
//! state.apply(layer.commit()).await?;
//!
//! // Phase 2: any later call captures the hash, then the seed reveals.
//! ledger.advance(1);
//! let mut layer = Layer::new(&state, &ledger, &roles);
//! let (number, _events) = layer.reveal(&owner, &seed, 10).await?;
//! assert!((1..=10).contains(&number));
//! # Ok(())
//! # }
//! # }
//! ```

pub mod derive;
pub mod ledger;
pub mod query;
pub mod roles;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

mod layer;

mod state;

#[cfg(test)]
mod scenario_tests;

pub use layer::{Layer, RandomError};
pub use ledger::{Ledger, HASH_LOOKUP_WINDOW};
pub use roles::{Authorizer, Role, Roles};
pub use state::{nonce, Adb, PrepareError, State, Status};

#[cfg(any(test, feature = "mocks"))]
pub use state::Memory;
