//! Class-level dependency cycle detection.
//!
//! Builds one node per class and one edge per structural reference that
//! resolves to a class in the model, then finds strongly connected components
//! with Tarjan's algorithm. The traversal uses an explicit call stack so deep
//! graphs cannot overflow the thread stack.

use std::collections::BTreeSet;

use crate::model::StructuralModel;

/// Class dependency graph over model indices, in FQN order.
#[derive(Debug)]
pub struct ClassGraph<'m> {
    names: Vec<&'m str>,
    edges: Vec<Vec<usize>>,
}

impl<'m> ClassGraph<'m> {
    /// Builds the graph from a model.
    ///
    /// A class's outgoing edges are its package imports, field types and
    /// method signature types that resolve to a model class (exact FQN or a
    /// name nested under one). Self references are dropped.
    #[must_use]
    pub fn from_model(model: &'m StructuralModel) -> Self {
        let names: Vec<&str> = model.classes().map(|c| c.fqn()).collect();
        let position = |fqn: &str| names.binary_search(&fqn).ok();

        let edges = model
            .classes()
            .enumerate()
            .map(|(i, class)| {
                let imports = model
                    .imports_of(class)
                    .into_iter()
                    .flatten()
                    .map(String::as_str);
                let targets: BTreeSet<usize> = imports
                    .chain(class.referenced_types())
                    .filter_map(|name| model.resolve(name))
                    .filter_map(|target| position(target.fqn()))
                    .filter(|&j| j != i)
                    .collect();
                targets.into_iter().collect()
            })
            .collect();

        Self { names, edges }
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Strongly connected components with more than one member.
    ///
    /// Members are listed in the order the traversal first reached them.
    #[must_use]
    pub fn cycles(&self) -> Vec<Vec<&'m str>> {
        Tarjan::new(self.names.len())
            .run(&self.edges)
            .into_iter()
            .filter(|scc| scc.len() > 1)
            .map(|scc| scc.into_iter().map(|i| self.names[i]).collect())
            .collect()
    }
}

struct Tarjan {
    counter: usize,
    index: Vec<Option<usize>>,
    low: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    sccs: Vec<Vec<usize>>,
}

impl Tarjan {
    fn new(n: usize) -> Self {
        Self {
            counter: 0,
            index: vec![None; n],
            low: vec![0; n],
            on_stack: vec![false; n],
            stack: Vec::new(),
            sccs: Vec::new(),
        }
    }

    fn enter(&mut self, v: usize) {
        self.index[v] = Some(self.counter);
        self.low[v] = self.counter;
        self.counter += 1;
        self.stack.push(v);
        self.on_stack[v] = true;
    }

    fn run(mut self, edges: &[Vec<usize>]) -> Vec<Vec<usize>> {
        for root in 0..edges.len() {
            if self.index[root].is_some() {
                continue;
            }
            self.enter(root);
            // (node, next edge to follow)
            let mut calls = vec![(root, 0usize)];

            while let Some(frame) = calls.last_mut() {
                let v = frame.0;
                if let Some(&w) = edges[v].get(frame.1) {
                    frame.1 += 1;
                    match self.index[w] {
                        None => {
                            self.enter(w);
                            calls.push((w, 0));
                        }
                        Some(w_index) if self.on_stack[w] => {
                            self.low[v] = self.low[v].min(w_index);
                        }
                        Some(_) => {}
                    }
                    continue;
                }

                calls.pop();
                if let Some(&(parent, _)) = calls.last() {
                    self.low[parent] = self.low[parent].min(self.low[v]);
                }
                if self.index[v] == Some(self.low[v]) {
                    self.pop_component(v);
                }
            }
        }
        self.sccs
    }

    fn pop_component(&mut self, root: usize) {
        let mut scc = Vec::new();
        while let Some(w) = self.stack.pop() {
            self.on_stack[w] = false;
            scc.push(w);
            if w == root {
                break;
            }
        }
        scc.sort_by_key(|&w| self.index[w]);
        self.sccs.push(scc);
    }
}

/// Finds dependency cycles between classes.
///
/// Each cycle is rendered as its members joined by ` -> `, closing back to
/// the first member (e.g. `a.A -> a.B -> a.A`). Output order is stable for a
/// given model.
#[must_use]
pub fn detect_cycles(model: &StructuralModel) -> Vec<String> {
    ClassGraph::from_model(model)
        .cycles()
        .into_iter()
        .map(|members| render(&members))
        .collect()
}

fn render(members: &[&str]) -> String {
    let mut path = members.join(" -> ");
    if let Some(first) = members.first() {
        path.push_str(" -> ");
        path.push_str(first);
    }
    path
}
