//! Graph search over anything that can list the outgoing edges of a node.
//!
//! The algorithms only see the [`Graph`] trait, so grid cells
//! ([`crate::grid::GridGraph`]) and named nodes ([`LinkGraph`]) share them.
//! Paths are returned as edge lists from the start node onwards.

use crate::heap::Heap;
use crate::queue::{Fifo, Lifo};
use num_traits::{PrimInt, Signed, Zero};
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;
use std::hash::Hash;
use tracing::{debug, trace};

pub trait Graph {
    type Node: Clone + Eq + Hash;
    type Edge: Clone;

    fn edges(&self, n: &Self::Node) -> impl Iterator<Item = Self::Edge> + '_;

    fn from(&self, e: &Self::Edge) -> Self::Node;

    fn to(&self, e: &Self::Edge) -> Self::Node;
}

pub trait Weighted: Graph {
    type Weight: PrimInt + fmt::Debug;

    fn weight(&self, e: &Self::Edge) -> Self::Weight;
}

/// Every edge can be walked backwards with the same weight.
pub trait Undirected: Graph {
    fn reverse(&self, e: &Self::Edge) -> Self::Edge;
}

fn trace_back<G: Graph>(
    g: &G,
    prev: &FxHashMap<G::Node, Option<G::Edge>>,
    mut n: G::Node,
) -> Vec<G::Edge> {
    let mut path = Vec::new();
    while let Some(Some(e)) = prev.get(&n) {
        n = g.from(e);
        path.push(e.clone());
    }
    path.reverse();
    path
}

/// Breadth-first search for the nearest node satisfying `goal`. The path is
/// empty if `start` itself is a goal.
pub fn shortest_path<G: Graph>(
    g: &G,
    start: G::Node,
    goal: impl Fn(&G::Node) -> bool,
) -> Option<Vec<G::Edge>> {
    if goal(&start) {
        return Some(Vec::new());
    }
    let mut prev = FxHashMap::default();
    let mut q = Fifo::new();
    q.extend(g.edges(&start));
    prev.insert(start, None);
    while let Some(e) = q.pop() {
        let n = g.to(&e);
        if prev.contains_key(&n) {
            continue;
        }
        prev.insert(n.clone(), Some(e));
        if goal(&n) {
            debug!(visited = prev.len(), "bfs reached goal");
            return Some(trace_back(g, &prev, n));
        }
        q.extend(g.edges(&n));
    }
    debug!(visited = prev.len(), "bfs exhausted");
    None
}

struct Frontier<N, E, W> {
    f: W,
    dist: W,
    via: Option<E>,
    node: N,
}

/// Cheapest path to a node satisfying `goal`, over non-negative weights.
pub fn dijkstra<G: Weighted>(
    g: &G,
    start: G::Node,
    goal: impl Fn(&G::Node) -> bool,
) -> Option<(G::Weight, Vec<G::Edge>)> {
    astar(g, start, goal, |_| G::Weight::zero())
}

/// Dijkstra ordered by distance plus `h`. The path is only optimal if `h`
/// never overestimates.
pub fn astar<G: Weighted>(
    g: &G,
    start: G::Node,
    goal: impl Fn(&G::Node) -> bool,
    h: impl Fn(&G::Node) -> G::Weight,
) -> Option<(G::Weight, Vec<G::Edge>)> {
    let mut q = Heap::with_less(
        |a: &Frontier<G::Node, G::Edge, G::Weight>, b: &Frontier<G::Node, G::Edge, G::Weight>| a.f < b.f,
    );
    let mut best = FxHashMap::default();
    let mut prev = FxHashMap::default();
    best.insert(start.clone(), G::Weight::zero());
    q.push(Frontier {
        f: h(&start),
        dist: G::Weight::zero(),
        via: None,
        node: start,
    });
    while let Some(Frontier { dist, via, node, .. }) = q.pop() {
        if prev.contains_key(&node) {
            continue;
        }
        prev.insert(node.clone(), via);
        if goal(&node) {
            debug!(settled = prev.len(), ?dist, "shortest path found");
            return Some((dist, trace_back(g, &prev, node)));
        }
        for e in g.edges(&node) {
            let to = g.to(&e);
            if prev.contains_key(&to) {
                continue;
            }
            let d = dist + g.weight(&e);
            if best.get(&to).is_some_and(|&old| old <= d) {
                continue;
            }
            best.insert(to.clone(), d);
            q.push(Frontier {
                f: d + h(&to),
                dist: d,
                via: Some(e),
                node: to,
            });
        }
    }
    debug!(settled = prev.len(), "goal unreachable");
    None
}

/// Every node reachable from `start`, each exactly once, depth first.
pub fn walk_depth_first<G: Graph>(g: &G, start: G::Node) -> DepthFirst<'_, G> {
    let mut stack = Lifo::new();
    stack.push(start);
    DepthFirst {
        g,
        stack,
        seen: FxHashSet::default(),
    }
}

pub struct DepthFirst<'g, G: Graph> {
    g: &'g G,
    stack: Lifo<G::Node>,
    seen: FxHashSet<G::Node>,
}

impl<G: Graph> Iterator for DepthFirst<'_, G> {
    type Item = G::Node;

    fn next(&mut self) -> Option<G::Node> {
        while let Some(n) = self.stack.pop() {
            if !self.seen.insert(n.clone()) {
                continue;
            }
            let next: Vec<_> = self
                .g
                .edges(&n)
                .map(|e| self.g.to(&e))
                .filter(|m| !self.seen.contains(m))
                .collect();
            self.stack.extend(next.into_iter().rev());
            return Some(n);
        }
        None
    }
}

/// Edges of `g` that still have spare capacity under `flow`.
struct Residual<'a, G: Weighted> {
    g: &'a G,
    flow: &'a FxHashMap<G::Edge, G::Weight>,
}

impl<G: Weighted> Residual<'_, G>
where
    G::Edge: Eq + Hash,
{
    fn capacity(&self, e: &G::Edge) -> G::Weight {
        let used = self.flow.get(e).copied().unwrap_or_else(G::Weight::zero);
        self.g.weight(e) - used
    }
}

impl<G: Weighted> Graph for Residual<'_, G>
where
    G::Edge: Eq + Hash,
{
    type Node = G::Node;
    type Edge = G::Edge;

    fn edges(&self, n: &G::Node) -> impl Iterator<Item = G::Edge> + '_ {
        self.g
            .edges(n)
            .filter(move |e| self.capacity(e) > G::Weight::zero())
    }

    fn from(&self, e: &G::Edge) -> G::Node {
        self.g.from(e)
    }

    fn to(&self, e: &G::Edge) -> G::Node {
        self.g.to(e)
    }
}

pub struct Flow<G: Weighted> {
    pub value: G::Weight,
    /// Net flow per edge; the reverse edge holds the negation.
    pub flow: FxHashMap<G::Edge, G::Weight>,
}

/// Edmonds–Karp: augment along shortest residual paths until none is left.
pub fn maximum_flow<G>(g: &G, source: G::Node, sink: G::Node) -> Flow<G>
where
    G: Weighted + Undirected,
    G::Edge: Eq + Hash,
    G::Weight: Signed,
{
    let mut flow: FxHashMap<G::Edge, G::Weight> = FxHashMap::default();
    let mut value = G::Weight::zero();
    let mut rounds = 0usize;
    loop {
        let residual = Residual { g, flow: &flow };
        let Some(path) = shortest_path(&residual, source.clone(), |n| *n == sink) else {
            break;
        };
        let Some(push) = path.iter().map(|e| residual.capacity(e)).min() else {
            break;
        };
        trace!(?push, len = path.len(), "augmenting path");
        for e in path {
            let back = g.reverse(&e);
            let f = flow.entry(e).or_insert_with(G::Weight::zero);
            *f = *f + push;
            let b = flow.entry(back).or_insert_with(G::Weight::zero);
            *b = *b - push;
        }
        value = value + push;
        rounds += 1;
    }
    debug!(?value, rounds, "maximum flow");
    Flow { value, flow }
}

pub struct Cut<G: Weighted> {
    pub value: G::Weight,
    /// Saturated edges leaving `side`.
    pub edges: Vec<G::Edge>,
    /// Nodes still reachable from the source in the residual graph.
    pub side: Vec<G::Node>,
}

/// Minimum `a`–`b` cut, read off the residual graph of a maximum flow.
pub fn minimum_cut<G>(g: &G, a: G::Node, b: G::Node) -> Cut<G>
where
    G: Weighted + Undirected,
    G::Edge: Eq + Hash,
    G::Weight: Signed,
{
    let Flow { value, flow } = maximum_flow(g, a.clone(), b);
    let side: Vec<_> = walk_depth_first(&Residual { g, flow: &flow }, a).collect();
    let inside: FxHashSet<_> = side.iter().cloned().collect();
    let edges = side
        .iter()
        .flat_map(|n| g.edges(n))
        .filter(|e| !inside.contains(&g.to(e)))
        .collect();
    Cut { value, edges, side }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Link {
    pub from: usize,
    pub to: usize,
}

/// Undirected weighted graph over interned labels. Linking the same pair
/// twice adds the weights.
#[derive(Clone, Debug)]
pub struct LinkGraph<L, W = i64> {
    ids: FxHashMap<L, usize>,
    labels: Vec<L>,
    adj: Vec<Vec<(usize, W)>>,
}

impl<L, W> Default for LinkGraph<L, W> {
    fn default() -> Self {
        Self {
            ids: FxHashMap::default(),
            labels: Vec::new(),
            adj: Vec::new(),
        }
    }
}

impl<L: Clone + Eq + Hash, W: PrimInt + fmt::Debug> LinkGraph<L, W> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The id of `label`, interning it on first sight.
    pub fn node(&mut self, label: L) -> usize {
        if let Some(&id) = self.ids.get(&label) {
            return id;
        }
        let id = self.labels.len();
        self.ids.insert(label.clone(), id);
        self.labels.push(label);
        self.adj.push(Vec::new());
        id
    }

    pub fn id(&self, label: &L) -> Option<usize> {
        self.ids.get(label).copied()
    }

    pub fn label(&self, id: usize) -> &L {
        &self.labels[id]
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn nodes(&self) -> std::ops::Range<usize> {
        0..self.labels.len()
    }

    pub fn link(&mut self, a: L, b: L, w: W) -> Link {
        let (a, b) = (self.node(a), self.node(b));
        self.link_ids(a, b, w);
        Link { from: a, to: b }
    }

    pub fn link_ids(&mut self, a: usize, b: usize, w: W) {
        self.add_half(a, b, w);
        if a != b {
            self.add_half(b, a, w);
        }
    }

    /// Drops the link between `a` and `b` in both directions.
    pub fn unlink(&mut self, a: usize, b: usize) {
        self.adj[a].retain(|&(t, _)| t != b);
        self.adj[b].retain(|&(t, _)| t != a);
    }

    fn add_half(&mut self, from: usize, to: usize, w: W) {
        match self.adj[from].iter_mut().find(|(t, _)| *t == to) {
            Some((_, old)) => *old = *old + w,
            None => self.adj[from].push((to, w)),
        }
    }
}

impl<L: Clone + Eq + Hash, W: PrimInt + fmt::Debug> Graph for LinkGraph<L, W> {
    type Node = usize;
    type Edge = Link;

    fn edges(&self, n: &usize) -> impl Iterator<Item = Link> + '_ {
        let from = *n;
        self.adj[from].iter().map(move |&(to, _)| Link { from, to })
    }

    fn from(&self, e: &Link) -> usize {
        e.from
    }

    fn to(&self, e: &Link) -> usize {
        e.to
    }
}

impl<L: Clone + Eq + Hash, W: PrimInt + fmt::Debug> Weighted for LinkGraph<L, W> {
    type Weight = W;

    fn weight(&self, e: &Link) -> W {
        self.adj[e.from]
            .iter()
            .find(|(t, _)| *t == e.to)
            .map_or_else(W::zero, |&(_, w)| w)
    }
}

impl<L: Clone + Eq + Hash, W: PrimInt + fmt::Debug> Undirected for LinkGraph<L, W> {
    fn reverse(&self, e: &Link) -> Link {
        Link {
            from: e.to,
            to: e.from,
        }
    }
}
