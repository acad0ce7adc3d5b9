use std::collections::BTreeSet;
use std::fmt::Display;

use itertools::Itertools;

use super::{epsilon, is_epsilon, render_production, unit_target, Production, Symbol, START};

// One nonterminal together with every production it rewrites to
#[derive(Debug, PartialEq, Clone)]
pub struct Rule {
    generator: char,
    productions: Vec<Production>,
}

impl Rule {
    // Duplicate productions are dropped, keeping the first occurrence
    pub fn new(generator: char, productions: impl IntoIterator<Item = Production>) -> Self {
        Rule {
            generator,
            productions: productions.into_iter().unique().collect(),
        }
    }

    pub fn generator(&self) -> char {
        self.generator
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn is_empty(&self) -> bool {
        self.productions.is_empty()
    }

    pub fn has_production(&self, production: &[Symbol]) -> bool {
        self.productions.iter().any(|p| p.as_slice() == production)
    }

    pub fn insert(&mut self, production: Production) -> bool {
        if self.has_production(&production) {
            false
        } else {
            self.productions.push(production);
            true
        }
    }

    pub fn extend(&mut self, productions: impl IntoIterator<Item = Production>) {
        for production in productions {
            self.insert(production);
        }
    }

    // Has a production that is `&` or made of terminals only
    pub fn terminates_directly(&self) -> bool {
        self.productions
            .iter()
            .any(|p| is_epsilon(p) || p.iter().all(Symbol::is_terminal))
    }

    // Has a production made of terminals and already generating nonterminals
    pub fn terminates_through(&self, generating: &BTreeSet<char>) -> bool {
        self.productions.iter().any(|p| {
            p.iter().all(|symbol| match symbol {
                Symbol::Terminal(_) | Symbol::Epsilon => true,
                Symbol::Nonterminal(n) => generating.contains(n),
            })
        })
    }

    pub fn nullable_directly(&self) -> bool {
        self.productions.iter().any(|p| is_epsilon(p))
    }

    pub fn nullable_through(&self, nullable: &BTreeSet<char>) -> bool {
        self.productions.iter().any(|p| {
            p.iter()
                .all(|symbol| symbol.nonterminal().is_some_and(|n| nullable.contains(&n)))
        })
    }

    // Every nonterminal appearing in some production
    pub fn mentioned_nonterminals(&self) -> impl Iterator<Item = char> + '_ {
        self.productions
            .iter()
            .flatten()
            .filter_map(Symbol::nonterminal)
            .unique()
    }

    pub fn unit_productions(&self) -> impl Iterator<Item = char> + '_ {
        self.productions.iter().filter_map(|p| unit_target(p))
    }

    pub fn non_unit_productions(&self) -> impl Iterator<Item = &Production> + '_ {
        self.productions.iter().filter(|p| unit_target(p).is_none())
    }

    pub fn mentions_any(production: &[Symbol], nonterminals: &BTreeSet<char>) -> bool {
        production
            .iter()
            .any(|symbol| symbol.nonterminal().is_some_and(|n| nonterminals.contains(&n)))
    }

    pub fn remove_mentioning(&mut self, nonterminals: &BTreeSet<char>) {
        self.productions.retain(|p| !Rule::mentions_any(p, nonterminals));
    }

    pub fn remove_epsilon(&mut self) {
        self.productions.retain(|p| !is_epsilon(p));
    }

    pub fn retain_non_unit(&mut self) {
        self.productions.retain(|p| unit_target(p).is_none());
    }

    // Every way of deleting a non-empty subset of the nullable occurrences in
    // a production. Deleting everything only survives on the start symbol
    fn nullable_variants(&self, production: &[Symbol], nullable: &BTreeSet<char>) -> Vec<Production> {
        let positions = production
            .iter()
            .positions(|symbol| symbol.nonterminal().is_some_and(|n| nullable.contains(&n)))
            .collect_vec();

        positions
            .into_iter()
            .powerset()
            .filter(|dropped| !dropped.is_empty())
            .filter_map(|dropped| {
                let variant: Production = production
                    .iter()
                    .enumerate()
                    .filter(|(index, _)| !dropped.contains(index))
                    .map(|(_, symbol)| *symbol)
                    .collect();

                if !variant.is_empty() {
                    Some(variant)
                } else if self.generator == START {
                    Some(epsilon())
                } else {
                    None
                }
            })
            .collect()
    }

    // Replaces `&` productions by adding every production obtained by erasing nullable nonterminals
    pub fn expand_nullable(&mut self, nullable: &BTreeSet<char>) {
        let variants = self
            .productions
            .iter()
            .flat_map(|p| self.nullable_variants(p, nullable))
            .collect_vec();

        self.remove_epsilon();
        self.extend(variants);

        if self.generator == START && nullable.contains(&START) {
            self.insert(epsilon());
        }
    }

    // Rebuilds every production, merging any that become equal
    pub fn try_map_productions<E>(
        &mut self,
        mut f: impl FnMut(Production) -> Result<Production, E>,
    ) -> Result<(), E> {
        let productions = std::mem::take(&mut self.productions);
        for production in productions {
            let rewritten = f(production)?;
            self.insert(rewritten);
        }
        Ok(())
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} -> {}",
            self.generator,
            self.productions.iter().map(|p| render_production(p)).join(" | ")
        )
    }
}

#[cfg(test)]
mod tests {
    use std::iter::zip;

    use super::*;

    fn production(text: &str) -> Production {
        text.chars().filter_map(Symbol::from_char).collect()
    }

    fn rule(generator: char, productions: &[&str]) -> Rule {
        Rule::new(generator, productions.iter().map(|p| production(p)))
    }

    fn rendered(rule: &Rule) -> Vec<String> {
        rule.productions().iter().map(|p| render_production(p)).collect()
    }

    #[test]
    fn duplicates_collapse() {
        let r = rule('A', &["ab", "B", "ab"]);
        assert_eq!(rendered(&r), vec!["ab", "B"]);
        assert_eq!(r.to_string(), "A -> ab | B");
    }

    #[test]
    fn termination_predicates() {
        let generating = BTreeSet::from(['B']);
        let rules = vec![
            rule('A', &["ab"]),
            rule('A', &["&"]),
            rule('A', &["aB"]),
            rule('A', &["aC", "C"]),
        ];
        let direct = vec![true, true, false, false];
        let through = vec![true, true, true, false];

        for (r, (d, t)) in zip(&rules, zip(direct, through)) {
            assert_eq!(r.terminates_directly(), d, "{}", r);
            assert_eq!(r.terminates_through(&generating), t, "{}", r);
        }
    }

    #[test]
    fn nullable_predicates() {
        let nullable = BTreeSet::from(['X', 'Y']);

        assert!(rule('A', &["a", "&"]).nullable_directly());
        assert!(!rule('A', &["a", "X"]).nullable_directly());
        assert!(rule('A', &["a", "XY"]).nullable_through(&nullable));
        assert!(!rule('A', &["aX", "XZ"]).nullable_through(&nullable));
    }

    #[test]
    fn unit_and_mentions() {
        let r = rule('A', &["B", "a", "BC", "&", "C"]);

        assert_eq!(r.unit_productions().collect_vec(), vec!['B', 'C']);
        assert_eq!(
            r.non_unit_productions().map(|p| render_production(p)).collect_vec(),
            vec!["a", "BC", "&"]
        );
        assert_eq!(r.mentioned_nonterminals().collect_vec(), vec!['B', 'C']);
    }

    #[test]
    fn expand_nullable_occurrences() {
        let nullable = BTreeSet::from(['X']);
        let mut r = rule('A', &["aXbX", "&"]);
        r.expand_nullable(&nullable);

        assert_eq!(rendered(&r), vec!["aXbX", "abX", "aXb", "ab"]);
    }

    #[test]
    fn expand_nullable_drops_empty_off_start() {
        let nullable = BTreeSet::from(['X', 'Y']);

        let mut r = rule('A', &["XY", "a"]);
        r.expand_nullable(&nullable);
        assert_eq!(rendered(&r), vec!["XY", "a", "Y", "X"]);

        let mut s = rule('S', &["XY"]);
        s.expand_nullable(&nullable);
        assert_eq!(rendered(&s), vec!["XY", "Y", "X", "&"]);
    }

    #[test]
    fn remove_mentioning_nonterminals() {
        let mut r = rule('A', &["aB", "C", "ab"]);
        r.remove_mentioning(&BTreeSet::from(['B', 'C']));

        assert_eq!(rendered(&r), vec!["ab"]);
    }

    #[test]
    fn map_merges_equal_productions() {
        let mut r = rule('A', &["aB", "bB"]);
        r.try_map_productions(|p| {
            Ok::<_, ()>(p.into_iter().map(|s| if s.is_terminal() { Symbol::Terminal('a') } else { s }).collect())
        })
        .unwrap();

        assert_eq!(rendered(&r), vec!["aB"]);
    }
}
