// src/services/mod.rs
//
// Collaborators at the edge of the journal core: content encryption and
// billing status lookups.

pub mod billing;
pub mod encryption;

pub use billing::{BillingConfig, BillingProvider, StripeBillingClient};
pub use encryption::EncryptionService;
