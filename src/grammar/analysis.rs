use std::collections::BTreeSet;

use log::debug;

use super::{Grammar, START};

// The result of growing a set until a full pass over the rules adds nothing
#[derive(Debug, PartialEq, Clone)]
pub struct Saturation {
    pub members: BTreeSet<char>,
    // Includes the final pass that added nothing
    pub passes: usize,
}

fn saturate(seed: BTreeSet<char>, mut pass: impl FnMut(&mut BTreeSet<char>)) -> Saturation {
    let mut members = seed;
    let mut passes = 0;

    loop {
        let before = members.len();
        pass(&mut members);
        passes += 1;
        if members.len() == before {
            return Saturation { members, passes };
        }
    }
}

impl Grammar {
    pub fn generating_analysis(&self) -> Saturation {
        let seed = self
            .rules
            .iter()
            .filter(|rule| rule.terminates_directly())
            .map(|rule| rule.generator())
            .collect();

        let result = saturate(seed, |generating| {
            for rule in &self.rules {
                if !generating.contains(&rule.generator()) && rule.terminates_through(generating) {
                    generating.insert(rule.generator());
                }
            }
        });
        debug!("generating {:?} after {} passes", result.members, result.passes);
        result
    }

    pub fn reachable_analysis(&self) -> Saturation {
        let result = saturate(BTreeSet::from([START]), |reachable| {
            for rule in &self.rules {
                if reachable.contains(&rule.generator()) {
                    reachable.extend(rule.mentioned_nonterminals());
                }
            }
        });
        debug!("reachable {:?} after {} passes", result.members, result.passes);
        result
    }

    pub fn nullable_analysis(&self) -> Saturation {
        let seed = self
            .rules
            .iter()
            .filter(|rule| rule.nullable_directly())
            .map(|rule| rule.generator())
            .collect();

        let result = saturate(seed, |nullable| {
            for rule in &self.rules {
                if !nullable.contains(&rule.generator()) && rule.nullable_through(nullable) {
                    nullable.insert(rule.generator());
                }
            }
        });
        debug!("nullable {:?} after {} passes", result.members, result.passes);
        result
    }

    pub fn unit_closure_analysis(&self, nonterminal: char) -> Saturation {
        saturate(BTreeSet::from([nonterminal]), |closure| {
            for rule in &self.rules {
                if closure.contains(&rule.generator()) {
                    closure.extend(rule.unit_productions());
                }
            }
        })
    }

    pub fn generating(&self) -> BTreeSet<char> {
        self.generating_analysis().members
    }

    pub fn non_generating(&self) -> BTreeSet<char> {
        self.without(&self.generating())
    }

    pub fn reachable(&self) -> BTreeSet<char> {
        self.reachable_analysis().members
    }

    pub fn non_reachable(&self) -> BTreeSet<char> {
        self.without(&self.reachable())
    }

    pub fn nullable(&self) -> BTreeSet<char> {
        self.nullable_analysis().members
    }

    // Every nonterminal reachable from `nonterminal` through unit productions, itself included
    pub fn unit_closure(&self, nonterminal: char) -> BTreeSet<char> {
        self.unit_closure_analysis(nonterminal).members
    }

    // The generators that are not in `set`
    fn without(&self, set: &BTreeSet<char>) -> BTreeSet<char> {
        self.generators()
            .into_iter()
            .filter(|generator| !set.contains(generator))
            .collect()
    }
}
