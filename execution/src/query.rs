//! Read-only queries over engine state, for hosts and off-system observers.

use crate::state::State;
use anyhow::Result;
use fairdraw_types::{Key, Value};

/// Number of heights currently awaiting attestation.
pub async fn recovery_len<S: State>(state: &S) -> Result<u64> {
    Ok(match state.get(&Key::Recovery).await? {
        Some(Value::Recovery(queue)) => queue.len() as u64,
        _ => 0,
    })
}

/// Heights elapsed since the armed pending height, or 0 if the slot is empty.
pub async fn pending_age<S: State>(state: &S, current_height: u64) -> Result<u64> {
    Ok(match state.get(&Key::Pending).await? {
        Some(Value::Pending(height)) => current_height.saturating_sub(height),
        _ => 0,
    })
}
