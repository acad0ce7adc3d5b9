/*
    This module generates sentences of a grammar by random derivation
*/

use std::collections::HashSet;
use std::path::Path;

use log::trace;
use rand::prelude::*;
use thiserror::Error;

use crate::error_handling::*;
use crate::grammar::*;

// How deep a derivation may nest before it is abandoned
pub const MAX_DEPTH: usize = 12;

// Derivations in a row that may fail or repeat a sentence before sampling gives up
const MAX_MISSES: usize = 100;

#[derive(Debug, PartialEq, Error)]
pub enum GenerateErrorType {
    // An undefined nonterminal was used
    #[error("No definition for nonterminal `{0}`")]
    UndefinedNonterminal(char),
    #[error("Nonterminal `{0}` has no productions")]
    NoProductions(char),
    #[error("Derivation nested deeper than {0} nonterminals")]
    DepthExceeded(usize),
}

impl ErrorType for GenerateErrorType {}

pub type GenerateError = Error<GenerateErrorType>;
pub type GenResult = Result<String, GenerateError>;

// Derives one sentence from the start symbol
pub fn generate(grammar: &Grammar, rng: &mut impl Rng, file: &Path) -> GenResult {
    let location = Location {
        file: file.to_path_buf(),
        line: 0
    };
    generate_nonterminal(START, grammar, rng, MAX_DEPTH)
        .map_err(|error| GenerateError { location, error })
}

// Up to `amount` distinct sentences. Gives up once too many derivations in a
// row fail or repeat, so fewer may come back
pub fn sample(grammar: &Grammar, rng: &mut impl Rng, amount: usize, file: &Path) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut seen = HashSet::new();
    let mut misses = 0;

    while sentences.len() < amount && misses < MAX_MISSES {
        match generate(grammar, rng, file) {
            Ok(sentence) if seen.insert(sentence.clone()) => {
                sentences.push(sentence);
                misses = 0;
            }
            Ok(_) => misses += 1,
            Err(error) => {
                trace!("sample abandoned: {}", error.error);
                misses += 1;
            }
        }
    }

    sentences
}

fn generate_nonterminal(nonterminal: char, grammar: &Grammar, rng: &mut impl Rng, depth: usize) -> Result<String, GenerateErrorType> {
    if depth == 0 {
        return Err(GenerateErrorType::DepthExceeded(MAX_DEPTH));
    }
    let rule = grammar
        .rule(nonterminal)
        .ok_or(GenerateErrorType::UndefinedNonterminal(nonterminal))?;
    return generate_rule(rule, grammar, rng, depth);
}

fn generate_rule(rule: &Rule, grammar: &Grammar, rng: &mut impl Rng, depth: usize) -> Result<String, GenerateErrorType> {
    let production = match rule.productions().choose(rng) {
        Some(p) => p,
        None => return Err(GenerateErrorType::NoProductions(rule.generator())),
    };

    let mut result = String::new();
    for symbol in production {
        result.push_str(&generate_symbol(symbol, grammar, rng, depth)?);
    }

    return Ok(result);
}

fn generate_symbol(symbol: &Symbol, grammar: &Grammar, rng: &mut impl Rng, depth: usize) -> Result<String, GenerateErrorType> {
    match symbol {
        Symbol::Nonterminal(n) => generate_nonterminal(*n, grammar, rng, depth - 1),
        Symbol::Terminal(t) => Ok(t.to_string()),
        Symbol::Epsilon => Ok(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use itertools::Itertools;
    use rand::rngs::StdRng;

    use super::*;
    use crate::parser::parse_str;

    fn no_file() -> &'static Path {
        Path::new("")
    }

    #[test]
    fn generate_finite_language() {
        let grammar = parse_str("S : aX | b\nX : c | &").unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..20 {
            let sentence = generate(&grammar, &mut rng, no_file()).unwrap();
            assert!(["ac", "a", "b"].contains(&sentence.as_str()), "{}", sentence);
        }
    }

    #[test]
    fn sample_is_distinct() {
        let grammar = parse_str("S : aX | b\nX : c | &").unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let sentences = sample(&grammar, &mut rng, 5, no_file());

        assert!(sentences.len() <= 3);
        assert_eq!(sentences.iter().unique().count(), sentences.len());
    }

    #[test]
    fn sample_huge_amount_of_finite_language() {
        let grammar = parse_str("S : aX | b\nX : c | &").unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let sentences = sample(&grammar, &mut rng, usize::MAX, no_file());

        assert_eq!(sentences.iter().sorted().collect_vec(), vec!["a", "ac", "b"]);
    }

    #[test]
    fn undefined_and_runaway() {
        let mut rng = StdRng::seed_from_u64(3);
        let file = PathBuf::from("g.cfg");

        let grammar = parse_str("S : aU").unwrap();
        assert_eq!(generate(&grammar, &mut rng, &file), Err(GenerateError {
            location: Location {
                file: file.clone(),
                line: 0
            },
            error: GenerateErrorType::UndefinedNonterminal('U')
        }));

        let grammar = parse_str("S : aS").unwrap();
        assert_eq!(
            generate(&grammar, &mut rng, &file).unwrap_err().error,
            GenerateErrorType::DepthExceeded(MAX_DEPTH)
        );
        assert!(sample(&grammar, &mut rng, 3, &file).is_empty());
    }

    #[test]
    fn rule_without_productions() {
        let mut grammar = parse_str("S : aX\nX : x").unwrap();
        grammar.insert_rule(Rule::new('X', []));
        let mut rng = StdRng::seed_from_u64(3);

        assert_eq!(
            generate(&grammar, &mut rng, no_file()).unwrap_err().error,
            GenerateErrorType::NoProductions('X')
        );
    }
}
