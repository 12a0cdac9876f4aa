//! Command implementations.

pub mod decode;
pub mod encode;
pub mod roundtrip;
