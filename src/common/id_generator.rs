// src/common/id_generator.rs
//! Crockford Base32 ID Generator
//!
//! Generates human-readable, prefixed IDs using Crockford Base32 encoding.
//! Format: PREFIX_XXXXXXXX (e.g., E_K7NP3XQ2 for entries)

use rand::Rng;

/// Crockford Base32 alphabet (excludes I, L, O, U to avoid confusion)
const CROCKFORD_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Random characters per id. Entries accumulate daily per user, so ids are longer
/// than six characters.
const ID_LENGTH: usize = 8;

/// Entity type prefixes for ID generation
#[derive(Debug, Clone, Copy)]
pub enum EntityPrefix {
    /// User (U_)
    User,
    /// Journal entry (E_)
    Entry,
    /// Streak (K_) - K for keep-going
    Streak,
    /// Donation (D_)
    Donation,
    /// Editor preferences (R_)
    Editor,
}

impl EntityPrefix {
    /// Get the string prefix for this entity type
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityPrefix::User => "U",
            EntityPrefix::Entry => "E",
            EntityPrefix::Streak => "K",
            EntityPrefix::Donation => "D",
            EntityPrefix::Editor => "R",
        }
    }
}

/// Generate a random Crockford Base32 string of specified length
fn generate_crockford_string(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..32);
            CROCKFORD_ALPHABET[idx] as char
        })
        .collect()
}

/// Generate a prefixed ID using Crockford Base32 encoding
pub fn generate_id(prefix: EntityPrefix) -> String {
    format!("{}_{}", prefix.as_str(), generate_crockford_string(ID_LENGTH))
}

pub fn generate_user_id() -> String {
    generate_id(EntityPrefix::User)
}

pub fn generate_entry_id() -> String {
    generate_id(EntityPrefix::Entry)
}

pub fn generate_streak_id() -> String {
    generate_id(EntityPrefix::Streak)
}

pub fn generate_donation_id() -> String {
    generate_id(EntityPrefix::Donation)
}

pub fn generate_editor_id() -> String {
    generate_id(EntityPrefix::Editor)
}
