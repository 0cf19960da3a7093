//! Benchmarks for XDB lookup performance.
//!
//! Run with: cargo bench
//!
//! Measures query throughput across store strategies, the cost of the
//! text-parsing front end, and cached vs uncached lookups.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use ipregion::xdb::load_vector_index;
use ipregion::{CachedSearcher, CachedSearcherConfig, Searcher, Version};

#[path = "../tests/common/mod.rs"]
mod common;

/// Build a database with `prefix_count` populated /16 prefixes, each split
/// into four ranges.
fn generate_database(prefix_count: usize) -> common::XdbFixture {
    let mut fixture = common::XdbFixture::v4();
    for p in 0..prefix_count {
        let a = (p / 200 + 1) as u8;
        let b = (p % 200) as u8;
        for s in 0..4u32 {
            let low = format!("{}.{}.{}.0", a, b, s * 64);
            let high = format!("{}.{}.{}.255", a, b, s * 64 + 63);
            let region = format!("cn|0|prov{}|city{}|isp", p, s);
            fixture = fixture.segment(&low, &high, &region);
        }
    }
    fixture
}

/// Mixed queries: roughly `hit_ratio` land inside populated prefixes.
fn generate_queries(count: usize, hit_ratio: f64) -> Vec<String> {
    let hits = (count as f64 * hit_ratio) as usize;
    let mut queries = Vec::with_capacity(count);
    for i in 0..hits {
        queries.push(format!("1.{}.{}.7", i % 200, (i * 37) % 256));
    }
    for i in hits..count {
        queries.push(format!("250.{}.{}.7", i % 256, (i * 13) % 256));
    }
    queries
}

fn bench_buffered_search(c: &mut Criterion) {
    let image = generate_database(200).build();
    let mut searcher = Searcher::open_with_buffer(Version::V4, image).unwrap();
    let queries = generate_queries(1000, 0.8);

    let mut group = c.benchmark_group("buffered_search");
    group.throughput(Throughput::Elements(queries.len() as u64));
    group.bench_function("mixed_queries", |b| {
        b.iter(|| {
            for query in &queries {
                black_box(searcher.search(query).unwrap());
            }
        })
    });
    group.finish();
}

fn bench_search_bytes(c: &mut Criterion) {
    let image = generate_database(200).build();
    let mut searcher = Searcher::open_with_buffer(Version::V4, image).unwrap();
    let keys: Vec<[u8; 4]> = (0..1000u32)
        .map(|i| [1, (i % 200) as u8, (i * 37 % 256) as u8, 7])
        .collect();

    let mut group = c.benchmark_group("search_bytes");
    group.throughput(Throughput::Elements(keys.len() as u64));
    group.bench_function("pre_parsed_keys", |b| {
        b.iter(|| {
            for key in &keys {
                black_box(searcher.search_bytes(key).unwrap());
            }
        })
    });
    group.finish();
}

fn bench_file_backed_search(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let path = generate_database(200).write_to(dir.path(), "bench.xdb");
    let queries = generate_queries(1000, 0.8);

    let mut group = c.benchmark_group("file_backed_search");
    group.throughput(Throughput::Elements(queries.len() as u64));

    let mut seek_per_read = Searcher::open(Version::V4, &path).unwrap();
    group.bench_function("seek_per_read", |b| {
        b.iter(|| {
            for query in &queries {
                black_box(seek_per_read.search(query).unwrap());
            }
        })
    });

    let vi = load_vector_index(&path).unwrap();
    let mut preloaded = Searcher::open_with_vector_index(Version::V4, &path, vi).unwrap();
    group.bench_function("preloaded_vector_index", |b| {
        b.iter(|| {
            for query in &queries {
                black_box(preloaded.search(query).unwrap());
            }
        })
    });

    group.finish();
}

fn bench_cached_search(c: &mut Criterion) {
    let image = generate_database(200).build();
    let queries = generate_queries(1000, 0.8);

    let mut group = c.benchmark_group("cached_search");
    group.throughput(Throughput::Elements(queries.len() as u64));

    let cached = CachedSearcher::from_buffer(Version::V4, image.clone()).unwrap();
    group.bench_function("with_cache", |b| {
        b.iter(|| {
            for query in &queries {
                black_box(cached.search(query).unwrap());
            }
        })
    });

    let uncached = CachedSearcher::from_buffer_with_config(
        Version::V4,
        image,
        CachedSearcherConfig::no_cache(),
    )
    .unwrap();
    group.bench_function("no_cache", |b| {
        b.iter(|| {
            for query in &queries {
                black_box(uncached.search(query).unwrap());
            }
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_buffered_search,
    bench_search_bytes,
    bench_file_backed_search,
    bench_cached_search
);
criterion_main!(benches);
