//! Central cryptography module covering digest derivation and the CTR stream
//! cipher. Each submodule focuses on a single responsibility so the derivation
//! chain stays simple and auditable.

pub mod digest;
pub mod stream;
