mod cli;
mod cyk;
mod error_handling;
mod generator;
mod grammar;
mod parser;
mod pipeline;

use std::process::ExitCode;

use clap::Parser;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use cli::Cli;
use cyk::QueryError;
use error_handling::{Errors, Location};
use grammar::{render_set, Grammar, PipelineError};
use pipeline::{Normalizer, Stage};

fn init_logger(cli: &Cli) {
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(cli.log_level());
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

fn print_stage<S: Stage>(normalizer: &Normalizer<S>) {
    println!("== {}", normalizer.stage());
    print!("{}", normalizer.grammar());
    println!();
}

fn file_location(cli: &Cli) -> Location {
    Location {
        file: cli.file.clone(),
        line: 0
    }
}

// Prints every stage of the normalization and tests the requested words.
// Returns the words that could not be tested
fn run(cli: &Cli, grammar: Grammar) -> Result<Errors<QueryError>, PipelineError> {
    let original = grammar.clone();
    let mut errors = Vec::new();

    let parsed = Normalizer::new(grammar);
    print_stage(&parsed);
    println!("generating:     {}", render_set(&parsed.grammar().generating()));
    println!("non-generating: {}", render_set(&parsed.grammar().non_generating()));
    println!();

    let productive = parsed.remove_non_generating();
    print_stage(&productive);
    println!("reachable:     {}", render_set(&productive.grammar().reachable()));
    println!("non-reachable: {}", render_set(&productive.grammar().non_reachable()));
    println!();

    let reachable = productive.remove_non_reachable();
    print_stage(&reachable);
    println!("nullable: {}", render_set(&reachable.grammar().nullable()));
    println!();

    let epsilon_free = reachable.eliminate_epsilon();
    print_stage(&epsilon_free);
    for (generator, closure) in epsilon_free.unit_closures() {
        println!("unit closure of {}: {}", generator, render_set(&closure));
    }
    println!();

    let unit_free = epsilon_free.eliminate_units();
    print_stage(&unit_free);

    let isolated = unit_free.isolate_terminals()?;
    print_stage(&isolated);

    let (cnf, added) = isolated.binarize_with_rules()?;
    print_stage(&cnf);
    info!("binarization added {} rules", added.len());

    for word in &cli.words {
        match cnf.recognize(word) {
            Ok(recognition) => {
                let table = &recognition.table;
                print!("{}", table);
                println!(
                    "`{}`: {}",
                    table.word().iter().collect::<String>(),
                    if recognition.accepted { "accepted" } else { "rejected" }
                );
                println!();
            }
            Err(error) => errors.push(error_handling::Error {
                location: file_location(cli),
                error
            }),
        }
    }

    if let Some(amount) = cli.sample {
        let mut rng = match cli.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        for sentence in generator::sample(&original, &mut rng, amount, &cli.file) {
            let verdict = match cnf.recognize(&sentence) {
                Ok(recognition) if recognition.accepted => "accepted".to_string(),
                Ok(_) => "rejected".to_string(),
                Err(error) => error.to_string(),
            };
            println!("sample `{}`: {}", sentence, verdict);
        }
    }

    Ok(errors)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(&cli);

    let grammar = match parser::parse_file(&cli.file) {
        Ok(grammar) => grammar,
        Err(errors) => {
            for error in errors {
                eprintln!("{}", error);
            }
            return ExitCode::FAILURE;
        }
    };

    match run(&cli, grammar) {
        Ok(errors) if errors.is_empty() => ExitCode::SUCCESS,
        Ok(errors) => {
            for error in errors {
                eprintln!("{}", error);
            }
            ExitCode::FAILURE
        }
        Err(error) => {
            let location = file_location(&cli);
            eprintln!("{}", error_handling::Error { location, error });
            ExitCode::FAILURE
        }
    }
}
