/*
    This module decides membership with the CYK algorithm. The grammar must
    already be in Chomsky normal form
*/

use std::collections::BTreeSet;
use std::fmt::Display;

use itertools::Itertools;
use log::{debug, trace};
use thiserror::Error;

use crate::error_handling::ErrorType;
use crate::grammar::{render_set, Grammar, Production, Rule, Symbol, START};

#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum QueryError {
    #[error("The input string is empty")]
    EmptyInput,
    #[error("`{0}` is not a terminal of the grammar")]
    UnknownTerminal(char),
}

impl ErrorType for QueryError {}

// The nonterminals deriving one substring
pub type Cell = BTreeSet<char>;

// The triangular CYK table. Row `span - 1` holds one cell per start position
#[derive(Debug, PartialEq, Clone)]
pub struct Table {
    word: Vec<char>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn word(&self) -> &[char] {
        &self.word
    }

    pub fn len(&self) -> usize {
        self.word.len()
    }

    // The nonterminals deriving the `span` characters starting at `start` (from 0)
    pub fn cell(&self, start: usize, span: usize) -> Option<&Cell> {
        self.rows.get(span.checked_sub(1)?)?.get(start)
    }

    // Rows from the single characters up to the whole word
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }
}

impl Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let width = self
            .rows
            .iter()
            .flatten()
            .map(|cell| render_set(cell).len())
            .max()
            .unwrap_or(0)
            .max(3);

        writeln!(f, "     {}", self.word.iter().map(|c| format!("{:<width$}", c)).join(" "))?;
        for (index, row) in self.rows.iter().enumerate() {
            let cells = row.iter().map(|cell| format!("{:<width$}", render_set(cell))).join(" ");
            writeln!(f, "{:>3}  {}", index + 1, cells.trim_end())?;
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Recognition {
    pub accepted: bool,
    pub table: Table,
}

// The generators of every rule that has one of `productions`
fn generators_of(grammar: &Grammar, productions: &[Production]) -> Cell {
    grammar
        .rules()
        .iter()
        .filter(|rule| productions.iter().any(|p| rule.has_production(p)))
        .map(Rule::generator)
        .collect()
}

fn pairs(left: &Cell, right: &Cell) -> Vec<Production> {
    left.iter()
        .cartesian_product(right.iter())
        .map(|(&l, &r)| vec![Symbol::Nonterminal(l), Symbol::Nonterminal(r)])
        .collect()
}

pub fn recognize(grammar: &Grammar, input: &str) -> Result<Recognition, QueryError> {
    let word = input.trim().chars().collect_vec();
    if word.is_empty() {
        return Err(QueryError::EmptyInput);
    }
    if let Some(&unknown) = word.iter().find(|&&c| !grammar.terminals().contains(&c)) {
        return Err(QueryError::UnknownTerminal(unknown));
    }

    let n = word.len();
    let mut rows: Vec<Vec<Cell>> = Vec::with_capacity(n);
    rows.push(
        word.iter()
            .map(|&c| generators_of(grammar, &[vec![Symbol::Terminal(c)]]))
            .collect(),
    );

    for span in 2..=n {
        let row = (0..=n - span)
            .map(|start| {
                (1..span)
                    .flat_map(|split| {
                        let left = &rows[split - 1][start];
                        let right = &rows[span - split - 1][start + split];
                        generators_of(grammar, &pairs(left, right))
                    })
                    .collect::<Cell>()
            })
            .collect_vec();
        trace!("span {}: {:?}", span, row);
        rows.push(row);
    }

    let accepted = rows[n - 1][0].contains(&START);
    debug!("`{}` {}", word.iter().collect::<String>(), if accepted { "accepted" } else { "rejected" });

    Ok(Recognition {
        accepted,
        table: Table { word, rows },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_str;

    fn cnf() -> Grammar {
        // a^n b^n for n >= 1
        parse_str("S : AB | AC\nC : SB\nA : a\nB : b").unwrap()
    }

    fn set(letters: &str) -> Cell {
        letters.chars().collect()
    }

    #[test]
    fn accept_and_reject() {
        let grammar = cnf();

        for word in ["ab", "aabb", "aaabbb", " ab "] {
            assert!(recognize(&grammar, word).unwrap().accepted, "{}", word);
        }
        for word in ["a", "ba", "abab", "aab", "abb"] {
            assert!(!recognize(&grammar, word).unwrap().accepted, "{}", word);
        }
    }

    #[test]
    fn table_cells() {
        let table = recognize(&cnf(), "aabb").unwrap().table;

        assert_eq!(table.len(), 4);
        assert_eq!(table.cell(0, 1), Some(&set("A")));
        assert_eq!(table.cell(3, 1), Some(&set("B")));
        assert_eq!(table.cell(1, 2), Some(&set("S")));
        assert_eq!(table.cell(1, 3), Some(&set("C")));
        assert_eq!(table.cell(0, 4), Some(&set("S")));
        assert_eq!(table.cell(0, 2), Some(&set("")));
        assert_eq!(table.cell(1, 4), None);
        assert_eq!(table.cell(0, 0), None);
        assert_eq!(table.rows().iter().map(Vec::len).collect_vec(), vec![4, 3, 2, 1]);
    }

    #[test]
    fn render_table() {
        let table = recognize(&cnf(), "ab").unwrap().table;

        assert_eq!(table.to_string(), "     a   b  \n  1  {A} {B}\n  2  {S}\n");
    }

    #[test]
    fn bad_input() {
        let grammar = cnf();

        assert_eq!(recognize(&grammar, ""), Err(QueryError::EmptyInput));
        assert_eq!(recognize(&grammar, "  \t"), Err(QueryError::EmptyInput));
        assert_eq!(recognize(&grammar, "abc"), Err(QueryError::UnknownTerminal('c')));
        assert_eq!(recognize(&grammar, "aB"), Err(QueryError::UnknownTerminal('B')));
    }
}
