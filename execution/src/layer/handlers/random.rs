use super::super::*;
use crate::derive;
use crate::ledger::HASH_LOOKUP_WINDOW;
use crate::roles::Role;
use fairdraw_types::RecoveryQueue;
use tracing::{debug, info, warn};

impl<'a, S: State, L: Ledger, A: Authorizer> Layer<'a, S, L, A> {
    async fn get_pending_slot(&self) -> Result<Option<u64>> {
        Ok(match self.get(&Key::Pending).await? {
            Some(Value::Pending(height)) => Some(height),
            _ => None,
        })
    }

    async fn get_captured(&self, height: u64) -> Result<Option<Digest>> {
        Ok(match self.get(&Key::Captured(height)).await? {
            Some(Value::Captured(hash)) => Some(hash),
            _ => None,
        })
    }

    async fn get_recovery(&self) -> Result<RecoveryQueue> {
        Ok(match self.get(&Key::Recovery).await? {
            Some(Value::Recovery(queue)) => queue,
            _ => RecoveryQueue::new(),
        })
    }

    async fn get_counter(&self) -> Result<Digest> {
        Ok(match self.get(&Key::Counter).await? {
            Some(Value::Counter(counter)) => counter,
            _ => Digest::from([0u8; derive::SEED_LEN]),
        })
    }

    /// Resolve or expire the single in-flight capture slot.
    ///
    /// Runs as the first step of every state-mutating entry point, so capture
    /// is lazy: it happens on the next call after the armed height passes,
    /// not on a timer. The slot is empty when this returns, whichever branch
    /// ran, and this is the only path by which captures or recovery entries
    /// appear automatically.
    pub(crate) async fn check_pending(&mut self) -> Result<Vec<Event>> {
        let Some(armed) = self.get_pending_slot().await? else {
            return Ok(Vec::new());
        };
        let current = self.ledger.height();
        if armed == current {
            // Still inside the armed height; its hash does not exist yet.
            return Ok(Vec::new());
        }

        if current.saturating_sub(armed) <= HASH_LOOKUP_WINDOW {
            if let Some(hash) = self.ledger.hash_of(armed) {
                // Never overwrite: a second commit at the same height may
                // have re-armed the slot after the hash was already captured.
                if self.get_captured(armed).await?.is_none() {
                    self.stage(Key::Captured(armed), Value::Captured(hash.clone()));
                }
                self.stage_delete(Key::Pending);
                debug!(height = armed, "captured block hash");
                return Ok(vec![Event::HashCaptured {
                    height: armed,
                    hash,
                }]);
            }
        }

        // Window exceeded or the host no longer serves the hash; only an
        // attester can supply it now.
        let mut queue = self.get_recovery().await?;
        queue.insert(armed);
        self.stage(Key::Recovery, Value::Recovery(queue));
        self.stage_delete(Key::Pending);
        warn!(height = armed, "hash capture missed; queued for recovery");
        Ok(vec![Event::CaptureMissed { height: armed }])
    }

    pub(in crate::layer) async fn apply_commit(
        &mut self,
        public: &PublicKey,
    ) -> Result<(Digest, Vec<Event>), RandomError> {
        let mut events = self.check_pending().await?;

        let height = self.ledger.height();
        let timestamp = self.ledger.timestamp();
        let fuel = self.ledger.fuel_remaining();

        let counter = self.get_counter().await?;
        let candidate = derive::derive_seed(&self.ledger.beacon(), timestamp, &counter, fuel, public);
        self.stage(
            Key::Counter,
            Value::Counter(derive::advance_counter(timestamp, &candidate, fuel)),
        );

        // Astronomically unlikely, but checked rather than assumed.
        if self.get(&Key::Seed(candidate.clone())).await?.is_some() {
            return Err(RandomError::DuplicateSeed);
        }

        self.stage(Key::Seed(candidate.clone()), Value::SeedHeight(height));
        self.stage(Key::Pending, Value::Pending(height));

        events.push(Event::SeedCommitted {
            player: public.clone(),
            seed: candidate.clone(),
            height,
        });
        Ok((candidate, events))
    }

    pub(in crate::layer) async fn apply_reveal(
        &mut self,
        public: &PublicKey,
        seed: &Digest,
        max: u64,
    ) -> Result<(u64, Vec<Event>), RandomError> {
        let mut events = self.check_pending().await?;

        let height = match self.get(&Key::Seed(seed.clone())).await? {
            Some(Value::SeedHeight(height)) => height,
            _ => return Err(RandomError::UnknownSeed),
        };
        let Some(captured) = self.get_captured(height).await? else {
            return Err(RandomError::HashNotReady { height });
        };
        if max == 0 {
            return Err(RandomError::InvalidDivisor);
        }

        let number = derive::derive_number(seed, &captured, max);
        events.push(Event::NumberRevealed {
            player: public.clone(),
            seed: seed.clone(),
            number,
            max,
        });
        Ok((number, events))
    }

    pub(in crate::layer) async fn apply_instant(
        &mut self,
        public: &PublicKey,
        max: u64,
    ) -> Result<(u64, Vec<Event>), RandomError> {
        if max == 0 {
            return Err(RandomError::InvalidDivisor);
        }
        let mut events = self.check_pending().await?;

        let timestamp = self.ledger.timestamp();
        let fuel = self.ledger.fuel_remaining();
        let counter = self.get_counter().await?;
        let candidate = derive::derive_seed(&self.ledger.beacon(), timestamp, &counter, fuel, public);
        self.stage(
            Key::Counter,
            Value::Counter(derive::advance_counter(timestamp, &candidate, fuel)),
        );

        // The candidate is neither registered nor tracked; nothing backs it
        // and nothing can be revealed from it later.
        let number = derive::instant_number(&candidate, max);
        events.push(Event::InstantGenerated {
            player: public.clone(),
            number,
            max,
        });
        Ok((number, events))
    }

    pub(in crate::layer) async fn apply_attest(
        &mut self,
        public: &PublicKey,
        height: u64,
        hash: &Digest,
    ) -> Result<(bool, Vec<Event>), RandomError> {
        if !self.authorizer.is_authorized(public, Role::Attester) {
            return Err(RandomError::PermissionDenied);
        }
        if self.get_captured(height).await?.is_some() {
            return Err(RandomError::AlreadySet { height });
        }

        let mut queue = self.get_recovery().await?;
        if !queue.remove(height) {
            // Only heights the engine itself flagged may be seeded this way.
            debug!(height, "attestation for height not awaiting recovery; ignored");
            return Ok((false, Vec::new()));
        }
        self.stage(Key::Recovery, Value::Recovery(queue));
        self.stage(Key::Captured(height), Value::Captured(hash.clone()));

        info!(height, "recovered block hash via attestation");
        Ok((
            true,
            vec![Event::HashAttested {
                height,
                hash: hash.clone(),
                attester: public.clone(),
            }],
        ))
    }
}
