// Copyright 2025 sleet
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use chrono::Utc;
use criterion::{Criterion, criterion_group, criterion_main};
use sleet::{decompose, Clock, Issuer};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Advances by one second on every read. Issuance driven by this clock never
/// stalls, so the bench measures the transition cost rather than the
/// per-second issuance ceiling.
#[derive(Clone)]
struct TickingClock(Arc<AtomicI64>);

impl TickingClock {
    fn starting_now() -> Self {
        Self(Arc::new(AtomicI64::new(Utc::now().timestamp())))
    }
}

impl Clock for TickingClock {
    fn now_secs(&self) -> i64 {
        self.0.fetch_add(1, Ordering::Relaxed)
    }
}

fn bench_new(c: &mut Criterion) {
    c.bench_function("issuer_new", |b| b.iter(|| Issuer::new(1)));
}

fn bench_next_id(c: &mut Criterion) {
    let issuer = Issuer::builder()
        .node_id(1)
        .clock(TickingClock::starting_now())
        .finalize()
        .expect("could not create issuer");
    c.bench_function("next_id", |b| b.iter(|| issuer.next_id()));
}

fn bench_decompose(c: &mut Criterion) {
    let issuer = Issuer::new(1).expect("could not create issuer");
    let id = issuer.next_id();
    c.bench_function("decompose", |b| b.iter(|| decompose(id)));
}

criterion_group!(issuer_perf, bench_new, bench_next_id, bench_decompose);
criterion_main!(issuer_perf);
