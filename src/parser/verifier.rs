use std::path::Path;

use log::warn;

use crate::grammar::{Grammar, START};
use super::ParseErrorType::MissingStartRule;
use super::{FileResult, Location, ParseError};

// Nonterminals that appear in some production but never get a rule of their own
pub fn undefined_nonterminals(grammar: &Grammar) -> Vec<char> {
    grammar.nonterminals()
        .iter()
        .copied()
        .filter(|&nonterminal| grammar.rule(nonterminal).is_none())
        .collect()
}

pub fn verify_grammar(grammar: &Grammar, file: &Path) -> FileResult<()> {
    // Undefined nonterminals are legal, they just never generate anything
    for nonterminal in undefined_nonterminals(grammar) {
        warn!("Nonterminal `{}` is used but never defined", nonterminal);
    }

    if grammar.rule(START).is_none() {
        return Err(vec![ParseError {
            location: Location {
                file: file.to_path_buf(),
                line: 0
            },
            error: MissingStartRule
        }]);
    }

    Ok(())
}
