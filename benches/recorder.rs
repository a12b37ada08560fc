use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};

use zipkin_recorder::{
    NoopReporter, Span, SpanContext, SpanId, SpanKind, SpanRecorder, TraceId,
};

fn bench_recorder(c: &mut Criterion) {
    let recorder = Arc::new(
        SpanRecorder::builder()
            .with_service_name("bench")
            .with_reporter(NoopReporter::new())
            .build()
            .unwrap(),
    );

    c.bench_function("epoch_micros", |b| b.iter(|| recorder.epoch_micros()));

    let mut span_id = 0_u64;
    c.bench_function("start_finish", |b| {
        b.iter(|| {
            span_id += 1;
            let context = SpanContext::new(TraceId::from(1), SpanId::from(span_id), None);
            let span = Span::new(context, Arc::clone(&recorder));
            span.start();
            span.finish();
        })
    });

    let mut full_id = 0_u64;
    c.bench_function("full_lifecycle", |b| {
        b.iter(|| {
            full_id += 1;
            let context = SpanContext::new(TraceId::from(2), SpanId::from(full_id), None);
            let span = Span::new(context, Arc::clone(&recorder));
            span.start()
                .name("get /users")
                .kind(SpanKind::Server)
                .tag("http.status_code", "200")
                .annotate("cache miss");
            span.finish();
        })
    });
}

criterion_group!(benches, bench_recorder);
criterion_main!(benches);
