use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use health_risk::{
    model_selection::Hyperparams, pipeline::SolverSettings, CpuBackend, FeatureVector,
    Predictor, RiskPipeline, SyntheticGenerator,
};

/// Train a pipeline once for prediction benchmarks
fn trained_predictor() -> Predictor {
    let data = SyntheticGenerator::default()
        .generate(200, 42)
        .expect("Failed to generate dataset");
    let hp = Hyperparams {
        c: 1.0,
        max_iter: 300,
    };
    RiskPipeline::<CpuBackend>::fit(&data, hp, &SolverSettings::default())
        .expect("Failed to fit pipeline")
        .into()
}

fn bench_predict_single(c: &mut Criterion) {
    let predictor = trained_predictor();

    c.bench_function("predict_single", |b| {
        b.iter(|| {
            let category = predictor.predict(black_box(7.5), black_box(1.0), black_box(3.5));
            black_box(category)
        });
    });

    let body = serde_json::json!({
        "age": "7.5",
        "medical_visits_frequency": 1,
        "physical_activity_level": 3.5
    });
    c.bench_function("predict_json", |b| {
        b.iter(|| black_box(predictor.predict_json(black_box(&body))));
    });
}

fn bench_predict_batch(c: &mut Criterion) {
    let predictor = trained_predictor();

    for batch_size in [10, 100, 1000, 10000].iter() {
        c.bench_with_input(
            BenchmarkId::new("predict_batch", batch_size),
            batch_size,
            |b, &bs| {
                let data = SyntheticGenerator::default()
                    .generate(bs, 7)
                    .expect("Failed to generate batch");
                let x = data.features_matrix::<CpuBackend>();

                b.iter(|| black_box(predictor.pipeline().predict_batch(black_box(&x))));
            },
        );
    }
}

fn bench_predict_loop_vs_batch(c: &mut Criterion) {
    let predictor = trained_predictor();
    let rows: Vec<FeatureVector> = (0..1000)
        .map(|i| FeatureVector::new((i % 10) as f64, (i % 7) as f64, (i % 5) as f64))
        .collect();

    c.bench_function("predict_loop_1000", |b| {
        b.iter(|| {
            for fv in &rows {
                black_box(predictor.pipeline().predict(black_box(fv)));
            }
        });
    });
}

criterion_group!(
    benches,
    bench_predict_single,
    bench_predict_batch,
    bench_predict_loop_vs_batch
);
criterion_main!(benches);
