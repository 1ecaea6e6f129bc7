//! Benchmark helpers for rplalloc.

#![forbid(unsafe_code)]

/// Request sizes used across benchmarks: the zero-size edge case, a tiny
/// request, and a typical small-object size.
pub const SIZES: [usize; 3] = [0, 1, 64];
