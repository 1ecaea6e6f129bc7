//! Criterion micro-benchmarks: shim versus direct allocator calls.

#![allow(unsafe_code)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rplalloc_bench::SIZES;
use rplalloc_core::{Dispatch, LibcAllocator, RawAllocator, ShimConfig, ZeroSizeShim};
use rplalloc_test_utils::NullOnZeroAllocator;

fn bench_allocate(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocate_release");
    let shim = ZeroSizeShim::new(LibcAllocator);
    for size in SIZES {
        group.bench_with_input(BenchmarkId::new("libc", size), &size, |b, &size| {
            b.iter(|| {
                let p = LibcAllocator.allocate(black_box(size));
                unsafe { LibcAllocator.release(p) };
            });
        });
        group.bench_with_input(BenchmarkId::new("shim", size), &size, |b, &size| {
            b.iter(|| {
                let p = shim.allocate_raw(black_box(size));
                unsafe { LibcAllocator.release(p) };
            });
        });
    }
    group.finish();
}

fn bench_resize(c: &mut Criterion) {
    let shim = ZeroSizeShim::new(LibcAllocator);
    c.bench_function("shim_resize_64_to_0", |b| {
        b.iter(|| {
            let p = shim.allocate_raw(64);
            let q = unsafe { shim.resize_raw(p, black_box(0)) };
            unsafe { LibcAllocator.release(q) };
        });
    });
}

fn bench_dispatch(c: &mut Criterion) {
    let d = Dispatch::new(NullOnZeroAllocator, ShimConfig::SHIM_ALL);
    c.bench_function("dispatch_zero_on_non_compliant", |b| {
        b.iter(|| {
            let p = d.allocate_raw(black_box(0));
            unsafe { d.inner().release(p) };
        });
    });
}

criterion_group!(benches, bench_allocate, bench_resize, bench_dispatch);
criterion_main!(benches);
