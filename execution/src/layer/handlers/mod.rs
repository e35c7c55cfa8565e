use super::*;

pub(super) fn random_failed(player: &PublicKey, error: &RandomError) -> Event {
    Event::RandomFailed {
        player: player.clone(),
        error_code: error.code(),
        message: error.to_string(),
    }
}

mod random;
