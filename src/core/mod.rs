//! Core parsing and writing primitives
//!
//! - Scanner: SIMD-accelerated delimiter search using memchr
//! - Entities: entity decoding (zero-copy when nothing to decode) and escaping
//! - Pool: thread-local pool of growable output buffers

pub mod entities;
pub mod pool;
pub mod scanner;
