use criterion::{criterion_group, criterion_main, Criterion, black_box};

use terrastream::config::WorldConfig;
use terrastream::streaming::{
    ChunkStore, HeadlessColliderBridge, HeightQuery, PendingQueue, StreamingRequest, StreamingScheduler,
};
use terrastream::terrain::{ChunkCoord, HeightmapGenerator, NoiseField, TerrainConfig};
use terrastream::terrain::noise::REFERENCE_OCTAVES;

use glam::Vec3;

fn bench_noise_sample(c: &mut Criterion) {
    let noise = NoiseField::new(12345, REFERENCE_OCTAVES.to_vec());

    c.bench_function("noise_sample_4_octaves", |b| {
        let mut i = 0u32;
        b.iter(|| {
            i = i.wrapping_add(1);
            let x = (i % 1024) as f32 * 3.7;
            let z = (i / 1024) as f32 * 1.3;
            noise.get(black_box(x), black_box(z))
        });
    });
}

fn bench_generate_chunk_64(c: &mut Criterion) {
    let generator = HeightmapGenerator::new(12345, &TerrainConfig::default());

    c.bench_function("generate_chunk_64", |b| {
        let mut x = 0i32;
        b.iter(|| {
            x += 1;
            generator.generate(black_box(ChunkCoord::new(x, -x)))
        });
    });
}

fn bench_generate_chunk_128(c: &mut Criterion) {
    let config = TerrainConfig {
        chunk_size: 128,
        sample_spacing: 1.0,
        ..Default::default()
    };
    let generator = HeightmapGenerator::new(12345, &config);

    c.bench_function("generate_chunk_128", |b| {
        b.iter(|| generator.generate(black_box(ChunkCoord::new(3, 7))));
    });
}

fn bench_height_fallback(c: &mut Criterion) {
    let generator = HeightmapGenerator::new(12345, &TerrainConfig::default());
    let store = ChunkStore::new();
    let query = HeightQuery::new(&store, &generator);

    c.bench_function("height_query_fallback", |b| {
        let mut t = 0.0f32;
        b.iter(|| {
            t += 0.37;
            query.height_at(black_box(t * 11.0), black_box(-t * 5.0))
        });
    });
}

fn bench_pending_queue_retarget(c: &mut Criterion) {
    c.bench_function("pending_queue_retarget_169", |b| {
        b.iter(|| {
            let mut queue = PendingQueue::new();
            let viewer = ChunkCoord::new(0, 0);
            for dz in -6..=6 {
                for dx in -6..=6 {
                    queue.push(StreamingRequest::new(viewer.offset(dx, dz), viewer));
                }
            }
            let dropped = queue.retarget(black_box(ChunkCoord::new(3, 1)), 6);
            black_box((dropped.len(), queue.len()));
        });
    });
}

fn bench_scheduler_fill_view(c: &mut Criterion) {
    let mut config = WorldConfig::with_seed(12345);
    config.terrain.chunk_size = 32;
    config.streaming.view_distance = 4;
    config.streaming.unload_distance = 6;
    config.streaming.max_chunks_per_tick = 8;

    c.bench_function("scheduler_fill_view_81", |b| {
        b.iter(|| {
            let mut scheduler = StreamingScheduler::new(&config, HeadlessColliderBridge::new())
                .expect("valid config");
            let viewer = Vec3::new(10.0, 0.0, 10.0);
            while {
                scheduler.update(black_box(viewer));
                !scheduler.is_settled()
            } {}
            black_box(scheduler.store().len());
        });
    });
}

fn bench_scheduler_flight(c: &mut Criterion) {
    let mut config = WorldConfig::with_seed(12345);
    config.terrain.chunk_size = 32;
    config.streaming.view_distance = 4;
    config.streaming.unload_distance = 6;

    let mut scheduler = StreamingScheduler::new(&config, HeadlessColliderBridge::new())
        .expect("valid config");

    c.bench_function("scheduler_update_flight", |b| {
        let mut viewer = Vec3::ZERO;
        b.iter(|| {
            viewer.x += 3.0;
            viewer.z += 1.0;
            scheduler.update(black_box(viewer))
        });
    });
}

criterion_group!(
    benches,
    bench_noise_sample,
    bench_generate_chunk_64,
    bench_generate_chunk_128,
    bench_height_fallback,
    bench_pending_queue_retarget,
    bench_scheduler_fill_view,
    bench_scheduler_flight,
);
criterion_main!(benches);
