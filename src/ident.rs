//! Share-handle minting for customer link boards.
//!
//! A handle is 8 lowercase hex characters drawn from the OS RNG. Possession of
//! the handle is the only credential anonymous customers present, so handles
//! must never be guessable from previous ones.

use rand::RngCore;
use rand::rngs::OsRng;

/// Length of a share handle in characters.
pub const HANDLE_LEN: usize = 8;

/// Generate a new candidate share handle.
///
/// Uniqueness is not checked here; callers insert under a unique constraint
/// and retry on collision.
pub fn mint_handle() -> String {
    let mut bytes = [0u8; HANDLE_LEN / 2];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Check whether a string has the shape of a share handle.
pub fn is_valid_handle(candidate: &str) -> bool {
    candidate.len() == HANDLE_LEN
        && candidate
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}
