#![forbid(unsafe_code)]

//! Dependency graph over a control arena.
//!
//! Controls live in a `Vec` in registration order; edges are indices into
//! it. Cloning the arena therefore clones the graph with every edge still
//! valid, and no pointer re-linking is ever needed.
//!
//! # Invariants
//!
//! 1. Ids are unique and every parent id resolves to a registered control.
//! 2. The edges form a DAG. [`Graph::order`] lists every node with all of
//!    its parents strictly earlier.
//! 3. `children` is exactly the reverse of `parents`.

use std::collections::VecDeque;

use formgraph_controls::Control;
use formgraph_core::ControlId;
use rustc_hash::FxHashMap;

use crate::error::GraphError;

/// Resolved parent/child edges and a topological order.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    index: FxHashMap<ControlId, usize>,
    parents: Vec<Vec<usize>>,
    children: Vec<Vec<usize>>,
    order: Vec<usize>,
    position: Vec<usize>,
}

impl Graph {
    /// Resolve and validate the edges of `controls`.
    pub fn build(controls: &[Control]) -> Result<Self, GraphError> {
        let mut index = FxHashMap::default();
        for (i, control) in controls.iter().enumerate() {
            if index.insert(control.id().clone(), i).is_some() {
                return Err(GraphError::DuplicateId(control.id().clone()));
            }
        }

        let mut parents = Vec::with_capacity(controls.len());
        let mut children = vec![Vec::new(); controls.len()];
        for (i, control) in controls.iter().enumerate() {
            let mut resolved = Vec::with_capacity(control.parents().len());
            for parent in control.parents() {
                let &p = index
                    .get(parent)
                    .ok_or_else(|| GraphError::DanglingReference {
                        control: control.id().clone(),
                        missing: parent.clone(),
                    })?;
                resolved.push(p);
                if !children[p].contains(&i) {
                    children[p].push(i);
                }
            }
            if let Some(expected) = control.handler().and_then(|h| h.arity())
                && expected != resolved.len()
            {
                return Err(GraphError::ArityMismatch {
                    control: control.id().clone(),
                    expected,
                    actual: resolved.len(),
                });
            }
            parents.push(resolved);
        }

        let order = topological_order(&parents, &children);
        if order.len() != controls.len() {
            let mut placed = vec![false; controls.len()];
            for &i in &order {
                placed[i] = true;
            }
            let members = controls
                .iter()
                .zip(&placed)
                .filter(|(_, placed)| !**placed)
                .map(|(c, _)| c.id().clone())
                .collect();
            return Err(GraphError::Cycle { members });
        }

        let mut position = vec![0; controls.len()];
        for (pos, &i) in order.iter().enumerate() {
            position[i] = pos;
        }

        Ok(Self {
            index,
            parents,
            children,
            order,
            position,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Arena index of the control with `id`.
    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Parents of `node` in declaration order.
    #[must_use]
    pub fn parents(&self, node: usize) -> &[usize] {
        &self.parents[node]
    }

    #[must_use]
    pub fn children(&self, node: usize) -> &[usize] {
        &self.children[node]
    }

    /// All nodes, parents before children.
    #[must_use]
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// `node` and everything it transitively depends on, in topological
    /// order (so `node` is last).
    #[must_use]
    pub fn ancestors(&self, node: usize) -> Vec<usize> {
        let mut out = self.closure(node, &self.parents);
        out.sort_unstable_by_key(|&i| self.position[i]);
        out
    }

    /// Everything that transitively depends on `node`, excluding `node`.
    #[must_use]
    pub fn descendants(&self, node: usize) -> Vec<usize> {
        let mut out = self.closure(node, &self.children);
        out.retain(|&i| i != node);
        out.sort_unstable_by_key(|&i| self.position[i]);
        out
    }

    fn closure(&self, node: usize, edges: &[Vec<usize>]) -> Vec<usize> {
        let mut seen = vec![false; self.len()];
        let mut stack = vec![node];
        let mut out = Vec::new();
        seen[node] = true;
        while let Some(i) = stack.pop() {
            out.push(i);
            for &next in &edges[i] {
                if !seen[next] {
                    seen[next] = true;
                    stack.push(next);
                }
            }
        }
        out
    }
}

/// Kahn's algorithm. Ties are broken by registration order, so unrelated
/// controls keep the order they were declared in. Nodes on a cycle are
/// left out of the result.
fn topological_order(parents: &[Vec<usize>], children: &[Vec<usize>]) -> Vec<usize> {
    let mut in_degree: Vec<usize> = parents
        .iter()
        .map(|ps| {
            let mut unique = ps.clone();
            unique.sort_unstable();
            unique.dedup();
            unique.len()
        })
        .collect();
    let mut queue: VecDeque<usize> = (0..parents.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(parents.len());

    while let Some(node) = queue.pop_front() {
        order.push(node);
        for &child in &children[node] {
            in_degree[child] -= 1;
            if in_degree[child] == 0 {
                queue.push_back(child);
            }
        }
    }

    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use formgraph_controls::Handler;

    fn input(id: &str) -> Control {
        Control::input("").with_id(id)
    }

    fn diamond() -> Vec<Control> {
        vec![
            input("d").with_depends(["b", "c"]),
            input("b").with_depends(["a"]),
            input("c").with_depends(["a"]),
            input("a"),
        ]
    }

    #[test]
    fn order_puts_parents_first() {
        let graph = Graph::build(&diamond()).unwrap();
        let pos = |id: &str| {
            let i = graph.index_of(id).unwrap();
            graph.order().iter().position(|&n| n == i).unwrap()
        };
        assert!(pos("a") < pos("b"));
        assert!(pos("a") < pos("c"));
        assert!(pos("b") < pos("d"));
        assert!(pos("c") < pos("d"));
    }

    #[test]
    fn children_mirror_parents() {
        let graph = Graph::build(&diamond()).unwrap();
        let a = graph.index_of("a").unwrap();
        let mut kids: Vec<_> = graph.children(a).to_vec();
        kids.sort_unstable();
        assert_eq!(kids, vec![1, 2]);
    }

    #[test]
    fn ancestors_end_with_node() {
        let graph = Graph::build(&diamond()).unwrap();
        let d = graph.index_of("d").unwrap();
        let ancestors = graph.ancestors(d);
        assert_eq!(ancestors.len(), 4);
        assert_eq!(*ancestors.last().unwrap(), d);
        assert_eq!(ancestors[0], graph.index_of("a").unwrap());
    }

    #[test]
    fn descendants_exclude_node() {
        let graph = Graph::build(&diamond()).unwrap();
        let a = graph.index_of("a").unwrap();
        let d = graph.index_of("d").unwrap();
        let descendants = graph.descendants(a);
        assert_eq!(descendants.len(), 3);
        assert_eq!(*descendants.last().unwrap(), d);
        assert!(graph.descendants(d).is_empty());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = Graph::build(&[input("x"), input("x")]).unwrap_err();
        assert_eq!(err, GraphError::DuplicateId("x".into()));
    }

    #[test]
    fn dangling_reference_is_rejected() {
        let err = Graph::build(&[input("x").with_depends(["ghost"])]).unwrap_err();
        assert_eq!(
            err,
            GraphError::DanglingReference {
                control: "x".into(),
                missing: "ghost".into()
            }
        );
    }

    #[test]
    fn cycles_are_rejected() {
        let controls = [
            input("a").with_depends(["c"]),
            input("b").with_depends(["a"]),
            input("c").with_depends(["b"]),
            input("free"),
        ];
        let err = Graph::build(&controls).unwrap_err();
        assert_eq!(
            err,
            GraphError::Cycle {
                members: vec!["a".into(), "b".into(), "c".into()]
            }
        );
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let err = Graph::build(&[input("a").with_depends(["a"])]).unwrap_err();
        assert!(matches!(err, GraphError::Cycle { .. }));
    }

    #[test]
    fn repeated_parent_is_not_a_cycle() {
        let graph = Graph::build(&[input("a"), input("b").with_depends(["a", "a"])]).unwrap();
        assert_eq!(graph.order(), &[0, 1]);
        assert_eq!(graph.parents(1), &[0, 0]);
    }

    #[test]
    fn arity_is_checked() {
        let handler = Handler::with_arity(2, |_, _| Ok(()));
        let controls = [input("a"), input("b").with_depends(["a"]).with_handler(handler)];
        let err = Graph::build(&controls).unwrap_err();
        assert_eq!(
            err,
            GraphError::ArityMismatch {
                control: "b".into(),
                expected: 2,
                actual: 1
            }
        );
    }
}
