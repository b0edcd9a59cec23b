#![allow(dead_code)]
//! In-process stand-ins for the solver and the proof checker, so that the scenarios run without
//! external programs. Both read the formula back from its file, as the real programs do.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use idcodes::core::constraint::{Comparator, Constraint};
use idcodes::core::formula::Formula;
use idcodes::core::graph::Graph;
use idcodes::core::literal::{Literal, Variable};
use idcodes::core::solution::Solution;
use idcodes::error::OracleError;
use idcodes::oracles::{Checker, Oracle, Outcome, ProofHandle, SolveRequest, Verdict};
use idcodes::parameters::Parameters;
use idcodes::parsers::formula_from_file;

pub fn instance(name: &str) -> PathBuf {
    PathBuf::from(format!("tests/instances/{}", name))
}

pub fn parameters(network: &str, fault_tolerance: usize, budget: Option<usize>, dir: &Path) -> Parameters {
    let mut parameters = Parameters::new(instance(network));
    parameters.set_budget(budget);
    parameters.set_fault_tolerance(fault_tolerance);
    parameters.set_output_dir(dir.join("output"));
    parameters.set_log_dir(dir.join("logs"));
    parameters.set_jobs(2);
    parameters
}

/// Returns the smallest and largest values the left-hand side can still take
fn bounds(constraint: &Constraint, values: &[Option<bool>]) -> (i64, i64) {
    let (mut min, mut max) = (0, 0);
    for term in constraint.terms() {
        match values[term.variable().offset()] {
            None if term.coefficient() > 0 => max += 1,
            None => min -= 1,
            Some(true) => {
                min += term.coefficient();
                max += term.coefficient();
            },
            Some(false) => {},
        }
    }
    (min, max)
}

/// Propagates the constraints of the queue until fixpoint. When a constraint has no slack left,
/// all its unassigned variables are forced. Returns false on conflict.
fn propagate(formula: &Formula, occurrences: &[Vec<usize>], values: &mut [Option<bool>], mut queue: Vec<usize>) -> bool {
    while let Some(i) = queue.pop() {
        let constraint = &formula.constraints()[i];
        let (min, max) = bounds(constraint, values);
        let equal = constraint.comparator() == Comparator::Equal;
        if max < constraint.rhs() || (equal && min > constraint.rhs()) {
            return false;
        }
        let maximise = if max == constraint.rhs() {
            true
        } else if equal && min == constraint.rhs() {
            false
        } else {
            continue;
        };
        for term in constraint.terms() {
            let v = term.variable().offset();
            if values[v].is_none() {
                values[v] = Some((term.coefficient() > 0) == maximise);
                queue.extend(occurrences[v].iter().copied());
            }
        }
    }
    true
}

fn branch(formula: &Formula, occurrences: &[Vec<usize>], values: Vec<Option<bool>>) -> Option<Vec<Option<bool>>> {
    let Some(v) = values.iter().position(|x| x.is_none()) else {
        return Some(values);
    };
    for value in [false, true] {
        let mut next = values.clone();
        next[v] = Some(value);
        if propagate(formula, occurrences, &mut next, occurrences[v].clone()) {
            if let Some(model) = branch(formula, occurrences, next) {
                return Some(model);
            }
        }
    }
    None
}

/// Returns a solution of the formula, if any
pub fn search(formula: &Formula) -> Option<Solution> {
    let n = formula.number_variables();
    let mut occurrences: Vec<Vec<usize>> = vec![vec![]; n];
    for (i, constraint) in formula.constraints().iter().enumerate() {
        for variable in constraint.support() {
            occurrences[variable.offset()].push(i);
        }
    }
    let mut values = vec![None; n];
    if !propagate(formula, &occurrences, &mut values, (0..formula.number_constraints()).collect()) {
        return None;
    }
    let model = branch(formula, &occurrences, values)?;
    let literals = model.iter().enumerate().map(|(i, v)| Literal::from_variable(Variable(i + 1), v.unwrap_or(false))).collect();
    let solution = Solution::try_from_literals(literals, n).unwrap();
    assert!(formula.is_satisfied_by(&solution));
    Some(solution)
}

/// Backtracking solver. Its log mimics the solver's output and an unsatisfiable formula gets a
/// (dummy) proof file.
#[derive(Default)]
pub struct Backtracking {
    calls: AtomicUsize,
}

impl Backtracking {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Oracle for Backtracking {
    fn solve(&self, request: &SolveRequest) -> Result<Outcome, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let formula = formula_from_file(request.formula()).unwrap();
        assert_eq!(request.number_variables(), formula.number_variables());
        match search(&formula) {
            Some(solution) => {
                fs::write(request.log(), format!("s SATISFIABLE\nv {}\n", solution)).unwrap();
                Ok(Outcome::Sat(solution))
            },
            None => {
                fs::write(request.log(), "s UNSATISFIABLE\n").unwrap();
                fs::write(request.proof(), "pseudo-Boolean proof version 1.2\n").unwrap();
                Ok(Outcome::Unsat(ProofHandle::new(request.proof())))
            },
        }
    }
}

/// Checker accepting a proof iff the proof file exists and the formula has no solution
pub struct Exhaustive;

impl Checker for Exhaustive {
    fn check(&self, formula: &Path, proof: &Path, log: &Path) -> Result<Verdict, OracleError> {
        let formula = formula_from_file(formula).unwrap();
        if proof.is_file() && search(&formula).is_none() {
            fs::write(log, "Verification succeeded.\n").unwrap();
            Ok(Verdict::Verified)
        } else {
            fs::write(log, "Verification failed.\n").unwrap();
            Ok(Verdict::Rejected)
        }
    }
}

/// Checks, directly on the graph, that the sensors form a k-fault-tolerant identifying code
pub fn is_identifying_code(graph: &Graph, sensors: &[String], k: usize) -> bool {
    let sensors = sensors.iter().map(|l| graph.node(l).unwrap()).collect::<Vec<_>>();
    let signature = |v| graph.closed_neighbourhood(v).into_iter().filter(|u| sensors.contains(u)).collect::<Vec<_>>();
    let nodes = graph.nodes_iter().collect::<Vec<_>>();
    for (i, v) in nodes.iter().enumerate() {
        let sv = signature(*v);
        if sv.len() < k + 1 {
            return false;
        }
        for u in nodes[i + 1..].iter() {
            let su = signature(*u);
            let differences = sv.iter().filter(|x| !su.contains(x)).count() + su.iter().filter(|x| !sv.contains(x)).count();
            if differences < k + 1 {
                return false;
            }
        }
    }
    true
}
