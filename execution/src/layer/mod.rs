use anyhow::{Context as _, Result};
use commonware_cryptography::{ed25519::PublicKey, sha256::Digest};
use fairdraw_types::{Event, Instruction, Key, Output, Transaction, Value};
use std::collections::BTreeMap;
use thiserror::Error as ThisError;
use tracing::debug;

use crate::ledger::Ledger;
use crate::roles::Authorizer;
use crate::state::{load_account, validate_and_increment_nonce, PrepareError, State, Status};

mod handlers;

/// Errors surfaced by the engine's operations.
///
/// Every failure is synchronous and rejects the whole operation: the staged
/// state changes of the failing call (including any `check_pending` effects)
/// are rolled back before the error is returned.
#[derive(Debug, ThisError)]
pub enum RandomError {
    #[error("caller lacks the required role")]
    PermissionDenied,
    #[error("hash for height {height} is already set")]
    AlreadySet { height: u64 },
    #[error("derived seed collides with an existing registration")]
    DuplicateSeed,
    #[error("seed was never committed")]
    UnknownSeed,
    #[error("hash for height {height} is not yet captured")]
    HashNotReady { height: u64 },
    #[error("max must be at least 1")]
    InvalidDivisor,
    #[error("state error: {0}")]
    State(#[from] anyhow::Error),
}

impl RandomError {
    /// Stable code carried by [Event::RandomFailed].
    pub fn code(&self) -> u8 {
        match self {
            Self::State(_) => 0,
            Self::PermissionDenied => 1,
            Self::AlreadySet { .. } => 2,
            Self::DuplicateSeed => 3,
            Self::UnknownSeed => 4,
            Self::HashNotReady { .. } => 5,
            Self::InvalidDivisor => 6,
        }
    }
}

/// The commit-reveal random engine for one unit of execution.
///
/// Stages all writes in an overlay over `state`; nothing is durable until the
/// host applies the changes returned by [`Layer::commit`]. The host's
/// sequential-transaction model is what makes the single pending slot safe:
/// two operations never interleave mid-call, so no locking is used.
pub struct Layer<'a, S: State, L: Ledger, A: Authorizer> {
    state: &'a S,
    ledger: &'a L,
    authorizer: &'a A,
    pending: BTreeMap<Key, Status>,
}

impl<'a, S: State, L: Ledger, A: Authorizer> Layer<'a, S, L, A> {
    pub fn new(state: &'a S, ledger: &'a L, authorizer: &'a A) -> Self {
        Self {
            state,
            ledger,
            authorizer,
            pending: BTreeMap::new(),
        }
    }

    fn stage(&mut self, key: Key, value: Value) {
        self.pending.insert(key, Status::Update(value));
    }

    fn stage_delete(&mut self, key: Key) {
        self.pending.insert(key, Status::Delete);
    }

    async fn prepare(&mut self, transaction: &Transaction) -> Result<(), PrepareError> {
        let mut account = load_account(self, &transaction.public)
            .await
            .map_err(PrepareError::State)?;
        validate_and_increment_nonce(&mut account, transaction.nonce)?;
        self.stage(
            Key::Account(transaction.public.clone()),
            Value::Account(account),
        );

        Ok(())
    }

    /// Mint a fresh seed bound to the current height (phase 1).
    pub async fn commit_seed(
        &mut self,
        public: &PublicKey,
    ) -> Result<(Digest, Vec<Event>), RandomError> {
        let snapshot = self.pending.clone();
        match self.apply_commit(public).await {
            Ok(result) => Ok(result),
            Err(err) => {
                self.pending = snapshot;
                Err(err)
            }
        }
    }

    /// Reveal the number bound to a committed seed (phase 2).
    pub async fn reveal(
        &mut self,
        public: &PublicKey,
        seed: &Digest,
        max: u64,
    ) -> Result<(u64, Vec<Event>), RandomError> {
        let snapshot = self.pending.clone();
        match self.apply_reveal(public, seed, max).await {
            Ok(result) => Ok(result),
            Err(err) => {
                self.pending = snapshot;
                Err(err)
            }
        }
    }

    /// Single-transaction shortcut: derive a number without the commit/reveal
    /// split. Appropriate only for low-stakes use; an observer of this call's
    /// inputs can reproduce the outcome before it finalizes.
    pub async fn instant(
        &mut self,
        public: &PublicKey,
        max: u64,
    ) -> Result<(u64, Vec<Event>), RandomError> {
        let snapshot = self.pending.clone();
        match self.apply_instant(public, max).await {
            Ok(result) => Ok(result),
            Err(err) => {
                self.pending = snapshot;
                Err(err)
            }
        }
    }

    /// Supply the hash for a height awaiting recovery. Attester only.
    /// Returns whether the attestation was applied (false = the height was
    /// not awaiting recovery; nothing changed).
    pub async fn attest(
        &mut self,
        public: &PublicKey,
        height: u64,
        hash: &Digest,
    ) -> Result<(bool, Vec<Event>), RandomError> {
        let snapshot = self.pending.clone();
        match self.apply_attest(public, height, hash).await {
            Ok(result) => Ok(result),
            Err(err) => {
                self.pending = snapshot;
                Err(err)
            }
        }
    }

    pub async fn execute(
        &mut self,
        transactions: Vec<Transaction>,
    ) -> Result<(Vec<Output>, BTreeMap<PublicKey, u64>)> {
        let mut processed_nonces = BTreeMap::new();
        let mut outputs = Vec::new();

        for tx in transactions {
            match self.prepare(&tx).await {
                Ok(()) => {}
                Err(PrepareError::NonceMismatch { expected, got }) => {
                    debug!(
                        public = ?tx.public,
                        expected,
                        got,
                        "nonce mismatch; dropping transaction"
                    );
                    continue;
                }
                Err(PrepareError::State(err)) => {
                    return Err(err).context("state error during prepare");
                }
            }
            processed_nonces.insert(tx.public.clone(), tx.nonce.saturating_add(1));

            let applied = match &tx.instruction {
                Instruction::Commit => self
                    .commit_seed(&tx.public)
                    .await
                    .map(|(_, events)| events),
                Instruction::Reveal { seed, max } => self
                    .reveal(&tx.public, seed, *max)
                    .await
                    .map(|(_, events)| events),
                Instruction::Instant { max } => self
                    .instant(&tx.public, *max)
                    .await
                    .map(|(_, events)| events),
                Instruction::Attest { height, hash } => self
                    .attest(&tx.public, *height, hash)
                    .await
                    .map(|(_, events)| events),
            };
            match applied {
                Ok(events) => outputs.extend(events.into_iter().map(Output::Event)),
                Err(RandomError::State(err)) => {
                    return Err(err).context("state error during apply");
                }
                Err(err) => {
                    outputs.push(Output::Event(handlers::random_failed(&tx.public, &err)))
                }
            }
            outputs.push(Output::Transaction(tx));
        }

        Ok((outputs, processed_nonces))
    }

    pub fn commit(self) -> Vec<(Key, Status)> {
        self.pending.into_iter().collect()
    }
}

impl<'a, S: State, L: Ledger, A: Authorizer> State for Layer<'a, S, L, A> {
    async fn get(&self, key: &Key) -> Result<Option<Value>> {
        Ok(match self.pending.get(key) {
            Some(Status::Update(value)) => Some(value.clone()),
            Some(Status::Delete) => None,
            None => self.state.get(key).await?,
        })
    }

    async fn insert(&mut self, key: Key, value: Value) -> Result<()> {
        self.pending.insert(key, Status::Update(value));
        Ok(())
    }

    async fn delete(&mut self, key: &Key) -> Result<()> {
        self.pending.insert(key.clone(), Status::Delete);
        Ok(())
    }
}
