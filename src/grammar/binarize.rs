/*
    The last two steps towards Chomsky normal form: terminals inside long
    productions get their own nonterminal, then long productions are split
    into pairs
*/

use std::collections::HashMap;

use log::{debug, trace};
use thiserror::Error;

use crate::error_handling::ErrorType;
use super::{Grammar, Production, Rule, Symbol};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Error)]
pub enum PipelineError {
    // Every uppercase letter is already a nonterminal
    #[error("Not enough letters left in the alphabet to create new nonterminals")]
    AlphabetExhausted,
}

impl ErrorType for PipelineError {}

impl Grammar {
    // Gives every terminal used in a production longer than one symbol its own
    // nonterminal `T -> t`. Returns the rules that were added
    pub fn isolate_terminals(&mut self) -> Result<Vec<Rule>, PipelineError> {
        let embedded = self
            .terminals
            .iter()
            .copied()
            .filter(|&terminal| {
                self.rules
                    .iter()
                    .flat_map(|rule| rule.productions())
                    .any(|p| p.len() > 1 && p.contains(&Symbol::Terminal(terminal)))
            })
            .collect::<Vec<_>>();

        let mut assigned = HashMap::with_capacity(embedded.len());
        for &terminal in &embedded {
            let nonterminal = self.reserve()?;
            trace!("`{}` stands for terminal `{}`", nonterminal, terminal);
            assigned.insert(terminal, nonterminal);
        }

        let replace = |production: Production| -> Result<Production, PipelineError> {
            if production.len() < 2 {
                return Ok(production);
            }
            Ok(production
                .into_iter()
                .map(|symbol| match symbol {
                    Symbol::Terminal(t) => assigned.get(&t).map_or(symbol, |&n| Symbol::Nonterminal(n)),
                    _ => symbol,
                })
                .collect())
        };
        for rule in &mut self.rules {
            rule.try_map_productions(&replace)?;
        }

        let added = embedded
            .iter()
            .filter_map(|terminal| {
                assigned
                    .get(terminal)
                    .map(|&n| Rule::new(n, [vec![Symbol::Terminal(*terminal)]]))
            })
            .collect::<Vec<_>>();
        for rule in &added {
            self.insert_rule(rule.clone());
        }

        debug!("isolated {} terminals", added.len());
        Ok(added)
    }

    // Shortens every production longer than two symbols by replacing its
    // trailing pair with a nonterminal for that pair, one pass at a time,
    // until nothing changes. A pair always maps to the same nonterminal.
    // Returns the rules that were added
    pub fn binarize(&mut self) -> Result<Vec<Rule>, PipelineError> {
        let mut pairs: Vec<(Production, char)> = Vec::new();
        let mut added = Vec::new();
        let mut passes = 0;

        loop {
            let mut changed = false;
            let mut fresh = Vec::new();
            let pool = &mut self.pool;

            for rule in &mut self.rules {
                rule.try_map_productions(|mut production| -> Result<Production, PipelineError> {
                    if production.len() <= 2 {
                        return Ok(production);
                    }

                    let pair = production.split_off(production.len() - 2);
                    let generator = match pairs.iter().find(|(known, _)| *known == pair) {
                        Some(&(_, generator)) => generator,
                        None => {
                            let generator = pool.reserve().ok_or(PipelineError::AlphabetExhausted)?;
                            trace!("`{}` stands for pair `{}{}`", generator, pair[0], pair[1]);
                            pairs.push((pair.clone(), generator));
                            fresh.push(Rule::new(generator, [pair]));
                            generator
                        }
                    };

                    production.push(Symbol::Nonterminal(generator));
                    changed = true;
                    Ok(production)
                })?;
            }

            for rule in fresh {
                added.push(rule.clone());
                self.insert_rule(rule);
            }

            passes += 1;
            if !changed {
                break;
            }
        }

        debug!("binarized with {} new rules after {} passes", added.len(), passes);
        Ok(added)
    }
}
