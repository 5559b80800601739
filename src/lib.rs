//! Rust rewrite of the Sigil avatar generator. A short text (and optionally a
//! secret key) is turned into a deterministic two-tone identicon; the keyed
//! variant embeds the full ciphertext in the PNG metadata so the text can be
//! recovered later with the same key. The crate is deliberately small and
//! transparent so the whole derivation chain stays auditable in-repo.

pub mod config;
pub mod container;
pub mod crypto;
pub mod identicon;
