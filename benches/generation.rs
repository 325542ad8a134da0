//! Benchmarks for one generation of recipe evolution.

use std::collections::BTreeMap;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use cookie_evolution::{
    evolution::{
        AlignmentRow, AlignmentTable, EmbeddingTable, EvolutionEngine, FitnessEvaluator,
        RecipeBatch, ReferenceCorpus,
    },
    schema::{Emotion, EvolutionConfig, Lexicon},
};

fn corpus(size: usize, lexicon: &Lexicon) -> Vec<RecipeBatch> {
    let spices = lexicon.spices.iter().cycle().skip(3);
    let mix_ins = lexicon.mix_ins.iter().cycle().skip(5);
    spices
        .zip(mix_ins)
        .take(size)
        .enumerate()
        .map(|(i, (spice, mix_in))| {
            let lines = vec![
                "-Base Ingredients".to_string(),
                format!("{} g all-purpose flour", 220 + 10 * (i % 8)),
                format!("{} g white sugar", 120 + 5 * (i % 10)),
                "100 g brown sugar".to_string(),
                "12 tbsp butter".to_string(),
                "100 g eggs".to_string(),
                "-Flavor Ingredients".to_string(),
                format!("1 tsp {}", spice),
                format!("100 g {}", mix_in),
                "1 tsp vanilla".to_string(),
            ];
            RecipeBatch::new(format!("recipe_{}.txt", i), lines)
        })
        .collect()
}

fn evaluator(lexicon: &Lexicon, batches: &[RecipeBatch]) -> FitnessEvaluator {
    let names: Vec<&String> = lexicon
        .spices
        .iter()
        .chain(&lexicon.mix_ins)
        .chain(&lexicon.oils)
        .collect();
    let embeddings = EmbeddingTable::new(names.iter().enumerate().map(|(i, name)| {
        let angle = i as f64 * 0.37;
        (name.as_str(), vec![angle.cos(), angle.sin(), 0.5])
    }))
    .expect("embedding dimensions agree");
    let alignment = AlignmentTable::new(names.iter().enumerate().map(|(i, name)| AlignmentRow {
        name: name.to_string(),
        emotions: BTreeMap::from([("happy".to_string(), (i % 7) as f64 / 7.0)]),
    }));
    FitnessEvaluator::new(
        Default::default(),
        Arc::new(embeddings),
        Arc::new(alignment),
        Arc::new(ReferenceCorpus::from_batches(batches).expect("valid corpus")),
    )
}

fn bench_run_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_generation");
    let lexicon = Arc::new(Lexicon::default());

    for size in [4, 16, 64] {
        let batches = corpus(size, &lexicon);
        let config = EvolutionConfig {
            random_seed: Some(42),
            ..Default::default()
        };
        let mut engine =
            EvolutionEngine::new(config, Arc::clone(&lexicon), evaluator(&lexicon, &batches))
                .expect("valid config");
        engine
            .initialize(&batches, Emotion::Happy)
            .expect("valid population");

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                black_box(&mut engine).run_generation().expect("initialized");
            });
        });
    }

    group.finish();
}

fn bench_fitness(c: &mut Criterion) {
    let lexicon = Lexicon::default();
    let batches = corpus(64, &lexicon);
    let evaluator = evaluator(&lexicon, &batches);
    let mut rng = rand::thread_rng();
    let recipe = batches[0]
        .to_recipe(Emotion::Happy, None, &lexicon, &mut rng)
        .expect("valid recipe");

    c.bench_function("evaluate_fitness_64_corpus", |b| {
        b.iter(|| black_box(evaluator.evaluate(black_box(&recipe))));
    });
}

criterion_group!(benches, bench_run_generation, bench_fitness);
criterion_main!(benches);
