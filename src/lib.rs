//! # wallet_factory
//!
//! Deterministic counterfactual address derivation for proxy wallets
//! created through a CREATE2 factory.
//!
//! ## Architecture
//!
//! - `crypto`: Keccak-256 hashing, proxy init code, address derivation,
//!   salt mixing, and approval proofs
//! - `factory`: deployment orchestration over an injected ledger
//! - `predict`: off-chain address prediction
//! - `matcher`: pattern matching for mined addresses
//! - `worker`: parallel salt mining
//! - `config`: runtime configuration
//! - `error`: deployment error taxonomy

pub mod config;
pub mod crypto;
pub mod error;
pub mod factory;
pub mod matcher;
pub mod predict;
pub mod worker;

pub use config::{Cli, Command};
pub use crypto::{Address, Keypair, SaltScheme};
pub use error::FactoryError;
pub use factory::{CreateOutcome, Factory, InMemoryLedger, Ledger};
pub use matcher::{MatchResult, Pattern, PatternType};
pub use predict::Prediction;
pub use worker::{MineResult, WorkerPool};
