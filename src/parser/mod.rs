/*
    This module parses grammar text, one rule per line:

        S : aXbX
        X : aY | bY | &

    Uppercase letters are nonterminals, lowercase letters are terminals and
    `&` is the empty string. Lines starting with `;` are comments
*/

mod lexer;
mod verifier;

use std::fs;
use std::path::Path;

use itertools::Itertools;
use thiserror::Error;

use crate::error_handling::*;
use crate::grammar::*;
use lexer::Token;
use verifier::verify_grammar;

#[derive(Debug, Error)]
pub enum ParseErrorType {
    // A line is not `X : ...` with exactly one `:` and one character before it
    #[error("Expected a rule of the form `X : p1 | p2 | ...`")]
    BadRuleFormat,
    #[error("The generator `{0}` is not an uppercase letter")]
    InvalidGenerator(char),
    #[error("`{0}` is not a terminal, a nonterminal or `&`")]
    InvalidSymbol(char),
    #[error("`&` must appear alone in a production")]
    EpsilonNotAlone,
    // `S : a |` or `S :`
    #[error("Empty production (write `&` for the empty string)")]
    EmptyProduction,
    #[error("There is no rule for the start symbol `S`")]
    MissingStartRule,
    // There was an issue with reading a file
    #[error("File error: {0}")]
    FileError(std::io::Error),
}

impl ErrorType for ParseErrorType {}

impl PartialEq for ParseErrorType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ParseErrorType::FileError(a), ParseErrorType::FileError(b)) => a.kind() == b.kind(),
            (ParseErrorType::InvalidGenerator(a), ParseErrorType::InvalidGenerator(b)) => a == b,
            (ParseErrorType::InvalidSymbol(a), ParseErrorType::InvalidSymbol(b)) => a == b,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

pub type ParseError = Error<ParseErrorType>;
pub type ParseErrors = Errors<ParseErrorType>;

fn io_error(error: std::io::Error, file: &Path) -> ParseError {
    ParseError {
        location: Location {
            file: file.to_path_buf(),
            line: 0
        },
        error: ParseErrorType::FileError(error)
    }
}

pub type Result<T> = std::result::Result<T, ParseErrorType>;
pub type LineResult<T> = std::result::Result<T, ParseError>;
pub type FileResult<T> = std::result::Result<T, ParseErrors>;

fn parse_symbol(token: &Token) -> Result<Symbol> {
    match token {
        Token::Char(c) => Symbol::from_char(*c).ok_or(ParseErrorType::InvalidSymbol(*c)),
        other => Err(ParseErrorType::InvalidSymbol(other.as_char())),
    }
}

fn parse_alternative(tokens: &[Token]) -> Result<Production> {
    tokens.iter().map(parse_symbol).collect()
}

fn parse_rewrite(tokens: &[Token]) -> Result<Vec<Production>> {
    // Every character is checked before the shape of the alternatives
    let alternatives = tokens
        .split(|t| *t == Token::Or)
        .map(parse_alternative)
        .collect::<Result<Vec<_>>>()?;

    if alternatives.iter().any(Vec::is_empty) {
        return Err(ParseErrorType::EmptyProduction);
    }
    if alternatives.iter().any(|p| p.len() > 1 && p.contains(&Symbol::Epsilon)) {
        return Err(ParseErrorType::EpsilonNotAlone);
    }

    Ok(alternatives)
}

fn parse_generator(tokens: &[Token]) -> Result<char> {
    match tokens {
        [Token::Char(c)] if c.is_ascii_uppercase() => Ok(*c),
        [token] => Err(ParseErrorType::InvalidGenerator(token.as_char())),
        _ => Err(ParseErrorType::BadRuleFormat),
    }
}

fn parse_line(tokens: &[Token]) -> Result<Rule> {
    let (left, right) = tokens
        .split(|t| *t == Token::Colon)
        .collect_tuple()
        .ok_or(ParseErrorType::BadRuleFormat)?;

    let generator = parse_generator(left)?;
    let productions = parse_rewrite(right)?;

    return Ok(Rule::new(generator, productions));
}

fn parse_lex_line(line: &str, location: Location) -> LineResult<Rule> {
    parse_line(&lexer::lex_line(line))
        .map_err(|error| ParseError { location, error })
}

fn is_rule_line(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && !line.starts_with(';')
}

fn grammar_from_rules(rules: Vec<Rule>, file: &Path) -> FileResult<Grammar> {
    let mut grammar = Grammar::new();
    for rule in rules {
        grammar.insert_rule(rule);
    }

    verify_grammar(&grammar, file)?;

    return Ok(grammar);
}

fn parse_lines(text: &str, file: &Path) -> FileResult<Grammar> {
    let parsed_lines = text
        .lines()
        .enumerate()
        .filter(|(_, line)| is_rule_line(line))
        .map(|(num, line)| parse_lex_line(line, Location {
            file: file.to_path_buf(),
            line: num + 1
        }));

    let (rules, errors): (Vec<_>, Vec<_>) = parsed_lines.partition_result();
    if errors.len() > 0 {
        return Err(errors);
    }

    return grammar_from_rules(rules, file);
}

// Parses grammar text that did not come from a file
pub fn parse_str(text: &str) -> FileResult<Grammar> {
    parse_lines(text, Path::new(""))
}

pub fn parse_file(path: &Path) -> FileResult<Grammar> {
    let text = fs::read_to_string(path).map_err(|e| vec![io_error(e, path)])?;

    parse_lines(&text, path)
}
