//! Shared kernel-support primitives used by the driver crates.

#![cfg_attr(not(test), no_std)]

pub mod sync;
