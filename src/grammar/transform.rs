/*
    Rewrites that remove useless nonterminals, epsilon productions and unit
    productions from a grammar. Each one assumes the previous ones already ran
*/

use std::collections::BTreeSet;

use log::{debug, trace};

use super::{is_epsilon, Grammar, Production, START};

impl Grammar {
    // Returns the nonterminals that were removed
    pub fn remove_non_generating(&mut self) -> BTreeSet<char> {
        let removed = self.non_generating();
        self.prune(&removed);
        removed
    }

    pub fn remove_non_reachable(&mut self) -> BTreeSet<char> {
        let removed = self.non_reachable();
        self.prune(&removed);
        removed
    }

    // Deletes the rules of `removed` and every production mentioning them.
    // Rules emptied by the sweep are deleted as well, but productions that
    // mention those rules are left for a later pass
    fn prune(&mut self, removed: &BTreeSet<char>) {
        self.rules.retain(|rule| !removed.contains(&rule.generator()));

        for rule in &mut self.rules {
            rule.remove_mentioning(removed);
        }
        self.drop_empty_rules();

        for &nonterminal in removed {
            self.retire(nonterminal);
        }
        debug!("pruned {:?}", removed);
    }

    fn drop_empty_rules(&mut self) {
        self.rules.retain(|rule| {
            if rule.is_empty() {
                trace!("rule for `{}` has no productions left", rule.generator());
            }
            !rule.is_empty()
        });
    }

    // Returns the nullable set the rewrite was based on
    pub fn eliminate_epsilon(&mut self) -> BTreeSet<char> {
        let nullable = self.nullable();

        for rule in &mut self.rules {
            rule.expand_nullable(&nullable);
        }
        self.drop_empty_rules();

        nullable
    }

    pub fn eliminate_units(&mut self) {
        // Closures are taken from the grammar as it was before the stage
        let replacements: Vec<Vec<Production>> = self
            .rules
            .iter()
            .map(|rule| {
                let closure = self.unit_closure(rule.generator());
                trace!("unit closure of `{}` is {:?}", rule.generator(), closure);

                let others = closure
                    .iter()
                    .filter(|&&member| member != rule.generator())
                    .filter_map(|&member| self.rule(member))
                    .flat_map(|member| member.non_unit_productions());
                // Only the start symbol may keep `&`; any other nonterminal
                // reaching it was already erased where it occurs
                rule.non_unit_productions()
                    .chain(others)
                    .filter(|p| rule.generator() == START || !is_epsilon(p))
                    .cloned()
                    .collect()
            })
            .collect();

        for (rule, productions) in self.rules.iter_mut().zip(replacements) {
            rule.retain_non_unit();
            rule.extend(productions);
        }
        self.drop_empty_rules();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_str;

    fn set(letters: &str) -> BTreeSet<char> {
        letters.chars().collect()
    }

    #[test]
    fn remove_non_generating_rules() {
        let mut grammar = parse_str("S : AB | a | bC\nA : aA\nB : b\nC : c").unwrap();
        let removed = grammar.remove_non_generating();

        assert_eq!(removed, set("A"));
        assert_eq!(grammar.to_string(), "S -> a | bC\nB -> b\nC -> c\n");
        assert!(grammar.pool().contains('A'));
        assert!(!grammar.nonterminals().contains(&'A'));
    }

    #[test]
    fn remove_non_reachable_rules() {
        let mut grammar = parse_str("S : aB\nB : b\nC : cD\nD : d").unwrap();
        let removed = grammar.remove_non_reachable();

        assert_eq!(removed, set("CD"));
        assert_eq!(grammar.to_string(), "S -> aB\nB -> b\n");
    }

    #[test]
    fn pruning_is_single_pass() {
        // `B` loses its only production in the sweep, but `S -> aB` is kept
        let mut grammar = parse_str("S : aB | b\nB : C\nC : c").unwrap();
        let mut pruned = grammar.clone();
        pruned.prune(&set("C"));
        assert_eq!(pruned.to_string(), "S -> aB | b\n");

        grammar.prune(&set("B"));
        assert_eq!(grammar.to_string(), "S -> b\nC -> c\n");
    }

    #[test]
    fn pruning_is_idempotent() {
        let texts = [
            "S : AB | a | bC\nA : aA\nB : b\nC : c",
            "S : aXbX\nX : aY | bY | &\nY : X | c",
            "S : aB | E\nB : b | D\nD : dD\nE : e\nF : f",
        ];

        for text in texts {
            let mut grammar = parse_str(text).unwrap();
            grammar.remove_non_generating();
            grammar.remove_non_reachable();
            let pruned = grammar.clone();

            assert_eq!(grammar.remove_non_generating(), set(""));
            assert_eq!(grammar.remove_non_reachable(), set(""));
            assert_eq!(grammar, pruned);
        }
    }

    #[test]
    fn eliminate_epsilon_example() {
        let mut grammar = parse_str("S : aXbX\nX : aY | bY | &\nY : X | c").unwrap();
        let nullable = grammar.eliminate_epsilon();

        assert_eq!(nullable, set("XY"));
        assert_eq!(
            grammar.to_string(),
            "S -> aXbX | abX | aXb | ab\nX -> aY | bY | a | b\nY -> X | c\n"
        );
    }

    #[test]
    fn eliminate_epsilon_keeps_start() {
        let mut grammar = parse_str("S : AA | a\nA : & | b").unwrap();
        grammar.eliminate_epsilon();

        assert_eq!(grammar.to_string(), "S -> AA | a | A | &\nA -> b\n");

        let mut grammar = parse_str("S : & | aS").unwrap();
        grammar.eliminate_epsilon();

        assert_eq!(grammar.to_string(), "S -> aS | a | &\n");
    }

    #[test]
    fn eliminate_epsilon_drops_emptied_rules() {
        let mut grammar = parse_str("S : aE | b\nE : &").unwrap();
        grammar.eliminate_epsilon();

        assert_eq!(grammar.to_string(), "S -> aE | b | a\n");
    }

    #[test]
    fn eliminate_units_example() {
        let mut grammar = parse_str("S : aXbX\nX : aY | bY | &\nY : X | c").unwrap();
        grammar.eliminate_epsilon();
        grammar.eliminate_units();

        assert_eq!(
            grammar.to_string(),
            "S -> aXbX | abX | aXb | ab\nX -> aY | bY | a | b\nY -> c | aY | bY | a | b\n"
        );
        assert!(grammar.rules().iter().all(|rule| rule.unit_productions().next().is_none()));
    }

    #[test]
    fn eliminate_units_keeps_epsilon_on_start() {
        let mut grammar = parse_str("S : aSb | A | &\nA : S | c").unwrap();
        grammar.eliminate_epsilon();
        grammar.eliminate_units();

        assert_eq!(
            grammar.to_string(),
            "S -> aSb | ab | & | c\nA -> c | aSb | ab\n"
        );
    }

    #[test]
    fn eliminate_unit_cycles() {
        let mut grammar = parse_str("S : A | s\nA : B | a\nB : S | b").unwrap();
        grammar.eliminate_units();

        assert_eq!(
            grammar.to_string(),
            "S -> s | a | b\nA -> a | b | s\nB -> b | a | s\n"
        );
    }
}
