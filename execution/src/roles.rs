//! Role bookkeeping for the attestation channel.
//!
//! The engine itself never stores role membership; it consumes the
//! [`Authorizer`] capability and nothing else. [`Roles`] is the default
//! implementation hosts can persist wherever they keep governance state.

use crate::layer::RandomError;
use commonware_cryptography::ed25519::PublicKey;
use fairdraw_types::Event;
use std::collections::BTreeSet;
use tracing::info;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Owner,
    Attester,
}

/// Authorization capability consumed by the engine.
pub trait Authorizer {
    fn is_authorized(&self, identity: &PublicKey, role: Role) -> bool;
}

/// Single-owner role set: the owner (transferable, renounceable) manages the
/// attesters trusted to supply missed block hashes.
#[derive(Clone, Debug, Default)]
pub struct Roles {
    owner: Option<PublicKey>,
    attesters: BTreeSet<PublicKey>,
}

impl Roles {
    pub fn new(owner: PublicKey) -> Self {
        Self {
            owner: Some(owner),
            attesters: BTreeSet::new(),
        }
    }

    pub fn owner(&self) -> Option<&PublicKey> {
        self.owner.as_ref()
    }

    pub fn attesters(&self) -> &BTreeSet<PublicKey> {
        &self.attesters
    }

    /// Grant the attester role. Owner only. Granting an identity that already
    /// holds the role changes nothing and emits nothing.
    pub fn add_attester(
        &mut self,
        caller: &PublicKey,
        attester: PublicKey,
    ) -> Result<Vec<Event>, RandomError> {
        if !self.is_authorized(caller, Role::Owner) {
            return Err(RandomError::PermissionDenied);
        }
        if !self.attesters.insert(attester.clone()) {
            return Ok(Vec::new());
        }
        info!(?attester, "attester added");
        Ok(vec![Event::AttesterAdded { attester }])
    }

    /// Revoke the attester role. Owner only.
    pub fn remove_attester(
        &mut self,
        caller: &PublicKey,
        attester: &PublicKey,
    ) -> Result<Vec<Event>, RandomError> {
        if !self.is_authorized(caller, Role::Owner) {
            return Err(RandomError::PermissionDenied);
        }
        if !self.attesters.remove(attester) {
            return Ok(Vec::new());
        }
        info!(?attester, "attester removed");
        Ok(vec![Event::AttesterRemoved {
            attester: attester.clone(),
        }])
    }

    /// Hand ownership to another identity. Owner only.
    pub fn transfer_ownership(
        &mut self,
        caller: &PublicKey,
        new_owner: PublicKey,
    ) -> Result<Vec<Event>, RandomError> {
        if !self.is_authorized(caller, Role::Owner) {
            return Err(RandomError::PermissionDenied);
        }
        let previous = self.owner.replace(new_owner.clone());
        info!(?previous, ?new_owner, "ownership transferred");
        Ok(vec![Event::OwnershipTransferred {
            previous,
            new_owner: Some(new_owner),
        }])
    }

    /// Give up ownership permanently; no identity can manage roles afterwards.
    pub fn renounce_ownership(&mut self, caller: &PublicKey) -> Result<Vec<Event>, RandomError> {
        if !self.is_authorized(caller, Role::Owner) {
            return Err(RandomError::PermissionDenied);
        }
        let previous = self.owner.take();
        info!(?previous, "ownership renounced");
        Ok(vec![Event::OwnershipTransferred {
            previous,
            new_owner: None,
        }])
    }
}

impl Authorizer for Roles {
    fn is_authorized(&self, identity: &PublicKey, role: Role) -> bool {
        match role {
            Role::Owner => self.owner.as_ref() == Some(identity),
            Role::Attester => self.attesters.contains(identity),
        }
    }
}
