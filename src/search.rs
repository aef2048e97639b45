//! The search loops shared by every solver. Parents are kept in an insertion-ordered map
//! in which each entry refers to its parent by index, so a path can be read back without
//! hashing, and the heap only stores indices next to the cells it orders by.
use fxhash::{FxBuildHasher, FxHashSet};
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;
use log::{debug, info, warn};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use crate::cell::Cell;
use crate::error::{Error, Result};
use crate::terrain_grid::TerrainGrid;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Parent index of the root entry.
const ROOT: usize = usize::MAX;

/// How a search ended. Only [Found](SearchStatus::Found) carries a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchStatus {
    Found,
    /// Every cell reachable from the start was finalized without meeting the goal.
    Unreachable,
    /// The expansion limit was hit before the goal was finalized.
    Aborted,
}

/// Outcome of a single search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchResult {
    pub status: SearchStatus,
    /// Route from start to goal, excluding the start and including the goal. Empty unless
    /// the goal was found, and also empty when start and goal coincide.
    pub path: Vec<Cell>,
    /// Cells in the exact order they were finalized. Contains no duplicates.
    pub visited_order: Vec<Cell>,
    /// Cells still waiting in the frontier when the search stopped, in the order they
    /// would have been taken out.
    pub remaining_frontier: Vec<Cell>,
}

impl SearchResult {
    fn found(path: Vec<Cell>, visited_order: Vec<Cell>, remaining_frontier: Vec<Cell>) -> Self {
        SearchResult {
            status: SearchStatus::Found,
            path,
            visited_order,
            remaining_frontier,
        }
    }

    fn unreachable(visited_order: Vec<Cell>) -> Self {
        SearchResult {
            status: SearchStatus::Unreachable,
            path: Vec::new(),
            visited_order,
            remaining_frontier: Vec::new(),
        }
    }

    fn aborted(visited_order: Vec<Cell>, remaining_frontier: Vec<Cell>) -> Self {
        SearchResult {
            status: SearchStatus::Aborted,
            path: Vec::new(),
            visited_order,
            remaining_frontier,
        }
    }

    pub fn is_found(&self) -> bool {
        self.status == SearchStatus::Found
    }

    /// Cost of the path on `grid`; 0 for an empty path.
    pub fn cost(&self, grid: &TerrainGrid) -> Result<u32> {
        grid.path_cost(&self.path)
    }
}

/// Bounds on the work a single search may do.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Maximum number of cells to finalize. [None] means unbounded.
    pub max_expansions: Option<usize>,
}

impl SearchLimits {
    pub fn unlimited() -> SearchLimits {
        SearchLimits::default()
    }

    pub fn max_expansions(max_expansions: usize) -> SearchLimits {
        SearchLimits {
            max_expansions: Some(max_expansions),
        }
    }

    fn reached(&self, expanded: usize) -> bool {
        self.max_expansions.is_some_and(|max| expanded >= max)
    }
}

/// What A* does with a neighbour that already has a predecessor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExpansionPolicy {
    /// Re-link and re-queue the neighbour whenever a strictly cheaper route to it is
    /// found, as long as it has not been finalized yet.
    #[default]
    Relaxing,
    /// Never touch a neighbour again once it has a predecessor. Every cell enters the
    /// frontier at most once, and the first route found to it is kept even if a cheaper
    /// one shows up later.
    FirstPredecessor,
}

/// Maps every discovered cell to its predecessor and a per-entry value (the g-score
/// for A*). The first entry is the root of the search.
#[derive(Clone, Debug)]
pub struct PredecessorMap<V> {
    parents: FxIndexMap<Cell, (usize, V)>,
}

impl<V> PredecessorMap<V> {
    pub fn new(root: Cell, value: V) -> PredecessorMap<V> {
        let mut parents = FxIndexMap::default();
        parents.insert(root, (ROOT, value));
        PredecessorMap { parents }
    }

    /// Links `cell` to `predecessor`, replacing any earlier link. Fails if `predecessor`
    /// has not been discovered.
    pub fn insert(&mut self, cell: Cell, predecessor: Cell, value: V) -> Result<()> {
        let parent = self
            .parents
            .get_index_of(&predecessor)
            .ok_or(Error::BrokenPredecessorChain(predecessor))?;
        self.parents.insert(cell, (parent, value));
        Ok(())
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        self.parents.contains_key(cell)
    }

    /// The predecessor of `cell`; [None] for the root and for undiscovered cells.
    pub fn predecessor(&self, cell: &Cell) -> Option<Cell> {
        let &(parent, _) = self.parents.get(cell)?;
        self.parents.get_index(parent).map(|(p, _)| *p)
    }

    pub fn value(&self, cell: &Cell) -> Option<&V> {
        self.parents.get(cell).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Walks back from `goal` to the root and returns the route in forward order, without
    /// the root.
    pub fn reconstruct(&self, goal: &Cell) -> Result<Vec<Cell>> {
        let broken = || Error::BrokenPredecessorChain(*goal);
        let mut index = self.parents.get_index_of(goal).ok_or_else(broken)?;
        let mut path = Vec::new();
        loop {
            let (cell, &(parent, _)) = self.parents.get_index(index).ok_or_else(broken)?;
            if parent == ROOT {
                break;
            }
            if path.len() >= self.parents.len() {
                return Err(broken());
            }
            path.push(*cell);
            index = parent;
        }
        path.reverse();
        Ok(path)
    }
}

/// A frontier entry. The heap pops the lowest estimate first and breaks ties on the
/// cell, row before column.
#[derive(Clone, Copy, Debug)]
struct SmallestCostHolder {
    estimated_cost: f64,
    cost: u32,
    cell: Cell,
    index: usize,
}

impl Eq for SmallestCostHolder {}

impl PartialEq for SmallestCostHolder {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for SmallestCostHolder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SmallestCostHolder {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed on both keys so the max-heap yields the smallest entry.
        other
            .estimated_cost
            .total_cmp(&self.estimated_cost)
            .then_with(|| other.cell.cmp(&self.cell))
    }
}

pub(crate) fn check_endpoints(grid: &TerrainGrid, start: Cell, goal: Cell) -> Result<()> {
    for cell in [start, goal] {
        if !grid.in_bounds(cell) {
            return Err(Error::OutOfBounds(cell));
        }
    }
    Ok(())
}

/// Live entries of the heap in pop order. Entries superseded by a cheaper route or
/// belonging to finalized cells are dropped.
fn live_frontier(
    to_see: BinaryHeap<SmallestCostHolder>,
    parents: &PredecessorMap<u32>,
    closed: &FxHashSet<Cell>,
) -> Vec<Cell> {
    to_see
        .into_sorted_vec()
        .into_iter()
        .rev()
        .filter(|e| !closed.contains(&e.cell) && e.cost == parents.parents[e.index].1)
        .map(|e| e.cell)
        .collect()
}

/// Breadth-first search from `start` to `goal`. The first predecessor recorded for a cell
/// is kept, so the path minimises the number of steps and ignores terrain cost.
pub fn breadth_first(
    grid: &TerrainGrid,
    start: Cell,
    goal: Cell,
    limits: SearchLimits,
) -> Result<SearchResult> {
    check_endpoints(grid, start, goal)?;
    debug!("Breadth-first search from {} to {}", start, goal);
    let mut parents = PredecessorMap::new(start, ());
    let mut queue: VecDeque<(usize, Cell)> = VecDeque::from([(0, start)]);
    let mut visited_order = Vec::new();
    while let Some((index, cell)) = queue.pop_front() {
        if limits.reached(visited_order.len()) {
            warn!(
                "Breadth-first search aborted after {} expansions",
                visited_order.len()
            );
            queue.push_front((index, cell));
            let remaining = queue.into_iter().map(|(_, c)| c).collect();
            return Ok(SearchResult::aborted(visited_order, remaining));
        }
        visited_order.push(cell);
        if cell == goal {
            let path = parents.reconstruct(&goal)?;
            info!(
                "Breadth-first search reached {} in {} steps after {} expansions",
                goal,
                path.len(),
                visited_order.len()
            );
            let remaining = queue.into_iter().map(|(_, c)| c).collect();
            return Ok(SearchResult::found(path, visited_order, remaining));
        }
        for neighbour in grid.neighbors(cell) {
            if let Vacant(e) = parents.parents.entry(neighbour) {
                queue.push_back((e.index(), neighbour));
                e.insert((index, ()));
            }
        }
    }
    info!("{} is not reachable from {}", goal, start);
    Ok(SearchResult::unreachable(visited_order))
}

/// A* search from `start` to `goal`, ordering the frontier by `g + heuristic(cell)`. The
/// path is optimal when the heuristic never overestimates the remaining cost.
pub fn astar<FH>(
    grid: &TerrainGrid,
    start: Cell,
    goal: Cell,
    mut heuristic: FH,
    policy: ExpansionPolicy,
    limits: SearchLimits,
) -> Result<SearchResult>
where
    FH: FnMut(&Cell) -> f64,
{
    check_endpoints(grid, start, goal)?;
    debug!("A* search from {} to {} ({:?})", start, goal, policy);
    let mut to_see = BinaryHeap::new();
    to_see.push(SmallestCostHolder {
        estimated_cost: heuristic(&start),
        cost: 0,
        cell: start,
        index: 0,
    });
    let mut parents: PredecessorMap<u32> = PredecessorMap::new(start, 0);
    let mut closed: FxHashSet<Cell> = FxHashSet::default();
    let mut visited_order = Vec::new();
    while let Some(holder) = to_see.pop() {
        let SmallestCostHolder {
            cost, cell, index, ..
        } = holder;
        // A cell may sit in the heap several times if a cheaper route to it was found
        // later; only the entry carrying its current best cost is live.
        if closed.contains(&cell) || cost > parents.parents[index].1 {
            continue;
        }
        if limits.reached(visited_order.len()) {
            warn!("A* search aborted after {} expansions", visited_order.len());
            to_see.push(holder);
            let remaining = live_frontier(to_see, &parents, &closed);
            return Ok(SearchResult::aborted(visited_order, remaining));
        }
        closed.insert(cell);
        visited_order.push(cell);
        if cell == goal {
            let path = parents.reconstruct(&goal)?;
            info!(
                "A* reached {} at cost {} after {} expansions",
                goal,
                cost,
                visited_order.len()
            );
            let remaining = live_frontier(to_see, &parents, &closed);
            return Ok(SearchResult::found(path, visited_order, remaining));
        }
        for neighbour in grid.neighbors(cell) {
            if closed.contains(&neighbour) {
                continue;
            }
            let new_cost = cost
                .checked_add(grid.cost_of(neighbour)?)
                .ok_or(Error::CostOverflow(neighbour))?;
            let n; // index of the neighbour's entry
            match parents.parents.entry(neighbour) {
                Vacant(e) => {
                    n = e.index();
                    e.insert((index, new_cost));
                }
                Occupied(mut e) => {
                    if policy == ExpansionPolicy::FirstPredecessor || e.get().1 <= new_cost {
                        continue;
                    }
                    n = e.index();
                    e.insert((index, new_cost));
                }
            }
            to_see.push(SmallestCostHolder {
                estimated_cost: new_cost as f64 + heuristic(&neighbour),
                cost: new_cost,
                cell: neighbour,
                index: n,
            });
        }
    }
    info!("{} is not reachable from {}", goal, start);
    Ok(SearchResult::unreachable(visited_order))
}
