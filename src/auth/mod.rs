//! # Auth Module
//!
//! Turns a bearer token into a verified caller identity. Tokens are issued by an
//! external identity provider; this service only checks them.

pub mod extractors;
pub mod models;

#[cfg(test)]
mod tests;

pub use extractors::AuthedUser;
