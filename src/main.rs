//! Cookie evolution CLI - Evolve a recipe for an emotion from a JSON run file.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use cookie_evolution::{
    evolution::{
        AlignmentTable, EmbeddingTable, EvolutionEngine, FitnessEvaluator, ReferenceCorpus,
        ResultArchive, load_corpus_dir,
    },
    schema::{Emotion, Lexicon, RunConfig},
};

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <run.json> [emotion] [generations]", program);
    eprintln!();
    eprintln!("Evolve a cookie recipe toward an emotion.");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  run.json     Path to the run configuration file");
    eprintln!("  emotion      Happy, Sad, Angry, Excited, Tired, Stressed or 1-6");
    eprintln!("               (default: the run file's emotion)");
    eprintln!("  generations  Number of generations (default: the run file's value)");
    eprintln!();
    eprintln!("An example run file is printed with the --example flag.");
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);
    let config_str = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| fail(format!("Error reading run file: {}", e)));
    let config: RunConfig = serde_json::from_str(&config_str)
        .unwrap_or_else(|e| fail(format!("Error parsing run file: {}", e)));
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let config = config.resolve_paths(base_dir);
    if let Err(e) = config.validate() {
        fail(format!("Invalid run file: {}", e));
    }

    let emotion: Emotion = match args.get(2) {
        Some(arg) => arg.parse::<Emotion>().unwrap_or_else(|e| fail(e)),
        None => config
            .emotion
            .unwrap_or_else(|| fail("No emotion given on the command line or in the run file")),
    };
    let generations: usize = match args.get(3) {
        Some(arg) => arg
            .parse()
            .unwrap_or_else(|_| fail(format!("Invalid generation count '{}'", arg))),
        None => config.evolution.population.generations,
    };

    let lexicon = match &config.lexicon {
        Some(path) => Lexicon::from_json_file(path).unwrap_or_else(|e| fail(e)),
        None => Lexicon::default(),
    };
    if let Err(e) = lexicon.validate() {
        fail(format!("Invalid lexicon: {}", e));
    }

    let batches = load_corpus_dir(&config.corpus_dir).unwrap_or_else(|e| fail(e));
    let corpus = ReferenceCorpus::from_batches(&batches).unwrap_or_else(|e| fail(e));
    let embeddings = EmbeddingTable::from_json_file(&config.embeddings).unwrap_or_else(|e| fail(e));
    let alignment = AlignmentTable::from_json_file(&config.alignment).unwrap_or_else(|e| fail(e));

    println!("Cookie Evolution");
    println!("================");
    println!("Emotion: {}", emotion);
    println!("Corpus: {} recipes", batches.len());
    println!("Generations: {}", generations);
    println!();

    let evaluator = FitnessEvaluator::new(
        config.evolution.fitness.clone(),
        Arc::new(embeddings),
        Arc::new(alignment),
        Arc::new(corpus),
    );
    let mut engine = EvolutionEngine::new(config.evolution.clone(), Arc::new(lexicon), evaluator)
        .unwrap_or_else(|e| fail(e));
    if let Err(e) = engine.initialize(&batches, emotion) {
        fail(format!("Error building population: {}", e));
    }

    let start = Instant::now();
    let result = engine
        .run_with_callback(generations, |progress| {
            println!(
                "  Generation {}/{}: best={:.3}, avg={:.3}, diversity={:.2}",
                progress.generation,
                progress.total_generations,
                progress.best_fitness,
                progress.avg_fitness,
                progress.diversity
            );
        })
        .unwrap_or_else(|e| fail(e));

    println!();
    println!("{}", result.best);
    println!();
    println!("Time: {:.2}s", start.elapsed().as_secs_f32());

    let archive = ResultArchive::new(&config.output_dir)
        .unwrap_or_else(|e| fail(format!("Error creating output directory: {}", e)));
    let best_path = archive
        .write_best(&result.best)
        .unwrap_or_else(|e| fail(format!("Error writing result: {}", e)));
    let ranked = archive
        .write_ranked(&result.population, config.top_k)
        .unwrap_or_else(|e| fail(format!("Error writing ranked results: {}", e)));
    println!(
        "Wrote {} and {} ranked recipes to {}",
        best_path.display(),
        ranked.len(),
        archive.output_dir().display()
    );
}

fn print_example_config() {
    let config = RunConfig::default();
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => fail(format!("Error serializing example: {}", e)),
    }
}
