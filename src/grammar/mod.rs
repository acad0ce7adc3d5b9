/*
    This module is for storing and manipulating grammars
*/

pub mod alphabet;
pub mod analysis;
pub mod binarize;
pub mod rule;
pub mod transform;

use std::collections::BTreeSet;
use std::fmt::Display;

use itertools::Itertools;

pub use alphabet::NonterminalPool;
pub use binarize::PipelineError;
pub use rule::Rule;

// Every grammar starts from this nonterminal
pub const START: char = 'S';

// How the empty string is written in grammar text
pub const EPSILON: char = '&';

// The base unit in a grammar rule
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub enum Symbol {
    Terminal(char),
    Nonterminal(char),
    Epsilon,
}

impl Symbol {
    // Classifies a character of grammar text. Only ASCII letters and `&` are symbols
    pub fn from_char(c: char) -> Option<Symbol> {
        match c {
            EPSILON => Some(Symbol::Epsilon),
            c if c.is_ascii_lowercase() => Some(Symbol::Terminal(c)),
            c if c.is_ascii_uppercase() => Some(Symbol::Nonterminal(c)),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Symbol::Terminal(c) | Symbol::Nonterminal(c) => *c,
            Symbol::Epsilon => EPSILON,
        }
    }

    pub fn nonterminal(&self) -> Option<char> {
        match self {
            Symbol::Nonterminal(c) => Some(*c),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

// The symbols in a single alternative. Never empty: the empty string is `[Epsilon]`
pub type Production = Vec<Symbol>;

pub fn epsilon() -> Production {
    vec![Symbol::Epsilon]
}

pub fn is_epsilon(production: &[Symbol]) -> bool {
    production == [Symbol::Epsilon]
}

// The nonterminal of a unit production (`A -> B`), if this is one
pub fn unit_target(production: &[Symbol]) -> Option<char> {
    match production {
        [symbol] => symbol.nonterminal(),
        _ => None,
    }
}

pub fn render_production(production: &[Symbol]) -> String {
    production.iter().map(Symbol::as_char).collect()
}

pub fn render_set(letters: &BTreeSet<char>) -> String {
    format!("{{{}}}", letters.iter().join(", "))
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Grammar {
    rules: Vec<Rule>,
    // In order of first appearance
    terminals: Vec<char>,
    nonterminals: BTreeSet<char>,
    pool: NonterminalPool,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn rule(&self, generator: char) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.generator() == generator)
    }

    // Every nonterminal that owns a rule, in rule order
    pub fn generators(&self) -> Vec<char> {
        self.rules.iter().map(Rule::generator).collect()
    }

    pub fn terminals(&self) -> &[char] {
        &self.terminals
    }

    pub fn nonterminals(&self) -> &BTreeSet<char> {
        &self.nonterminals
    }

    pub fn pool(&self) -> &NonterminalPool {
        &self.pool
    }

    // Adds a rule and declares its symbols. A rule for an existing generator
    // replaces the old one in place
    pub fn insert_rule(&mut self, rule: Rule) {
        self.declare(Symbol::Nonterminal(rule.generator()));
        for symbol in rule.productions().iter().flatten() {
            self.declare(*symbol);
        }

        match self.rules.iter_mut().find(|existing| existing.generator() == rule.generator()) {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
    }

    fn declare(&mut self, symbol: Symbol) {
        match symbol {
            Symbol::Terminal(t) => {
                if !self.terminals.contains(&t) {
                    self.terminals.push(t);
                }
            }
            Symbol::Nonterminal(n) => {
                if self.nonterminals.insert(n) {
                    self.pool.claim(n);
                }
            }
            Symbol::Epsilon => {}
        }
    }

    // Forgets a nonterminal that no longer occurs anywhere, returning its letter to the pool
    fn retire(&mut self, nonterminal: char) {
        if self.nonterminals.remove(&nonterminal) {
            self.pool.release(nonterminal);
        }
    }

    // Takes an unused letter out of the pool and declares it
    fn reserve(&mut self) -> Result<char, PipelineError> {
        let letter = self.pool.reserve().ok_or(PipelineError::AlphabetExhausted)?;
        self.nonterminals.insert(letter);
        Ok(letter)
    }

    // Whether every production is a lone terminal or a pair of nonterminals,
    // allowing `S -> &` as the one exception
    pub fn is_cnf(&self) -> bool {
        self.rules.iter().all(|rule| {
            rule.productions().iter().all(|production| match production.as_slice() {
                [Symbol::Terminal(_)] => true,
                [Symbol::Nonterminal(_), Symbol::Nonterminal(_)] => true,
                [Symbol::Epsilon] => rule.generator() == START,
                _ => false,
            })
        })
    }
}

impl Display for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for rule in &self.rules {
            writeln!(f, "{}", rule)?;
        }
        Ok(())
    }
}
