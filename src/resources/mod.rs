//! Rust definitions of the custom resources this crate populates but does not own.

pub mod alertmanagerconfigs;
