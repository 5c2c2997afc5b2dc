//! Cross-crate tests for sshsweep.
//!
//! `support` holds fixtures; the test modules themselves are compiled only under `cargo test`.

pub mod support;

#[cfg(test)]
mod interfaces;
#[cfg(test)]
mod sweep;
