use cookiecrush::cookies::classifier::classify;
use cookiecrush::cookies::collector::dedup_first_seen;
use cookiecrush::cookies::snapshot::CookieSnapshot;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn benchmark_classify(c: &mut Criterion) {
    // A mix hitting every rule plus the unknown fallback.
    let samples = [
        ("JSESSIONID", "example.com"),
        ("auth_token", "example.com"),
        ("_ga", ".example.com"),
        ("ad_campaign", "example.com"),
        ("visitor_uuid", "example.com"),
        ("locale", "example.com"),
        ("zebra", "example.com"),
    ];

    c.bench_function("classify_mixed_names", |b| {
        b.iter(|| {
            for (name, domain) in samples {
                black_box(classify(black_box(name), black_box(domain)));
            }
        })
    });
}

fn benchmark_dedup(c: &mut Criterion) {
    let cookies: Vec<CookieSnapshot> = (0..100)
        .map(|i| CookieSnapshot::new(format!("cookie{}", i % 50), "example.com", "/"))
        .collect();

    c.bench_function("dedup_100_cookies", |b| {
        b.iter(|| {
            black_box(dedup_first_seen(black_box(cookies.clone())));
        })
    });
}

criterion_group!(benches, benchmark_classify, benchmark_dedup);
criterion_main!(benches);
