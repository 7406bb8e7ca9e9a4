//! Integration tests for the Sallos container and block framing.
//!
//! These drive the incremental encoder and decoder with every buffer
//! arrangement a caller might use and check the stream layout directly.

mod common;
mod framing;
mod ratchet;
mod roundtrip;
mod scenarios;
mod stalls;
