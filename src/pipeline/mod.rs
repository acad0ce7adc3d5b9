/*
    This module drives a grammar to Chomsky normal form one stage at a time.
    Every stage consumes the normalizer and returns it tagged with the next
    stage, so the steps can only run in order
*/

use std::collections::BTreeSet;
use std::marker::PhantomData;

use log::info;

use crate::cyk::{self, QueryError, Recognition};
use crate::grammar::{Grammar, PipelineError, Rule};

pub trait Stage {
    const NAME: &'static str;
}

macro_rules! stages {
    ($($stage:ident => $name:literal),* $(,)?) => {
        $(
            #[derive(Debug)]
            pub struct $stage;

            impl Stage for $stage {
                const NAME: &'static str = $name;
            }
        )*
    };
}

stages! {
    Parsed => "parsed",
    Productive => "non-generating removed",
    Reachable => "non-reachable removed",
    EpsilonFree => "epsilon productions removed",
    UnitFree => "unit productions removed",
    TerminalsIsolated => "terminals isolated",
    Cnf => "Chomsky normal form",
}

#[derive(Debug)]
pub struct Normalizer<S: Stage> {
    grammar: Grammar,
    stage: PhantomData<S>,
}

impl<S: Stage> Normalizer<S> {
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn stage(&self) -> &'static str {
        S::NAME
    }

    fn advance<T: Stage>(self) -> Normalizer<T> {
        info!("{}: {} rules", T::NAME, self.grammar.rules().len());
        Normalizer {
            grammar: self.grammar,
            stage: PhantomData,
        }
    }
}

impl Normalizer<Parsed> {
    pub fn new(grammar: Grammar) -> Self {
        Normalizer {
            grammar,
            stage: PhantomData,
        }
    }

    // Runs every stage
    pub fn normalize(grammar: Grammar) -> Result<Normalizer<Cnf>, PipelineError> {
        Normalizer::new(grammar)
            .remove_non_generating()
            .remove_non_reachable()
            .eliminate_epsilon()
            .eliminate_units()
            .isolate_terminals()?
            .binarize()
    }

    pub fn remove_non_generating(mut self) -> Normalizer<Productive> {
        self.grammar.remove_non_generating();
        self.advance()
    }
}

impl Normalizer<Productive> {
    pub fn remove_non_reachable(mut self) -> Normalizer<Reachable> {
        self.grammar.remove_non_reachable();
        self.advance()
    }
}

impl Normalizer<Reachable> {
    pub fn eliminate_epsilon(mut self) -> Normalizer<EpsilonFree> {
        self.grammar.eliminate_epsilon();
        self.advance()
    }
}

impl Normalizer<EpsilonFree> {
    // Unit closures of every generator, as used by the next stage
    pub fn unit_closures(&self) -> Vec<(char, BTreeSet<char>)> {
        self.grammar
            .generators()
            .into_iter()
            .map(|generator| (generator, self.grammar.unit_closure(generator)))
            .collect()
    }

    pub fn eliminate_units(mut self) -> Normalizer<UnitFree> {
        self.grammar.eliminate_units();
        self.advance()
    }
}

impl Normalizer<UnitFree> {
    pub fn isolate_terminals(mut self) -> Result<Normalizer<TerminalsIsolated>, PipelineError> {
        self.grammar.isolate_terminals()?;
        Ok(self.advance())
    }
}

impl Normalizer<TerminalsIsolated> {
    pub fn binarize(self) -> Result<Normalizer<Cnf>, PipelineError> {
        self.binarize_with_rules().map(|(normalizer, _)| normalizer)
    }

    // Also returns the pair rules that binarization created
    pub fn binarize_with_rules(mut self) -> Result<(Normalizer<Cnf>, Vec<Rule>), PipelineError> {
        let added = self.grammar.binarize()?;
        debug_assert!(self.grammar.is_cnf());
        Ok((self.advance(), added))
    }
}

impl Normalizer<Cnf> {
    pub fn recognize(&self, word: &str) -> Result<Recognition, QueryError> {
        cyk::recognize(&self.grammar, word)
    }
}
