//! Breadth-first reachability over the 4-connected road-cell graph, with a
//! plain in-bounds grid graph standing in when no road data is available.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use tracing::{debug, warn};

use crate::board::{GameBounds, RoadIndex};
use crate::coords::GridKey;

pub type DistanceMap = HashMap<GridKey, u32>;

#[derive(Default)]
struct Frontier {
    distances: DistanceMap,
    parents: HashMap<GridKey, GridKey>,
}

impl Frontier {
    /// Walks parent links back from `destination`; `None` if it was never
    /// labelled.
    fn path_to(&self, start: GridKey, destination: GridKey) -> Option<Vec<GridKey>> {
        if start == destination {
            return Some(vec![start]);
        }
        if !self.distances.contains_key(&destination) {
            return None;
        }
        let mut path = vec![destination];
        let mut current = destination;
        while let Some(&parent) = self.parents.get(&current) {
            path.push(parent);
            current = parent;
        }
        path.reverse();
        Some(path)
    }
}

/// Shared BFS core. Never re-enters a visited cell, only traverses cells
/// accepted by `passable` and outside `excluded`, and stops expanding at
/// `max_steps`. When `target` is set the search returns as soon as it is
/// labelled.
fn explore(
    passable: impl Fn(GridKey) -> bool,
    start: GridKey,
    max_steps: u32,
    excluded: &HashSet<GridKey>,
    target: Option<GridKey>,
) -> Frontier {
    let mut frontier = Frontier::default();
    let mut visited = HashSet::from([start]);
    let mut queue = VecDeque::from([(start, 0u32)]);
    while let Some((cell, dist)) = queue.pop_front() {
        if dist >= max_steps {
            continue;
        }
        for neighbor in cell.neighbors() {
            if !passable(neighbor) || excluded.contains(&neighbor) {
                continue;
            }
            if !visited.insert(neighbor) {
                continue;
            }
            frontier.distances.insert(neighbor, dist + 1);
            frontier.parents.insert(neighbor, cell);
            if target == Some(neighbor) {
                return frontier;
            }
            queue.push_back((neighbor, dist + 1));
        }
    }
    frontier
}

fn explore_roads(
    roads: &RoadIndex,
    start: GridKey,
    max_steps: u32,
    excluded: &HashSet<GridKey>,
    target: Option<GridKey>,
) -> Frontier {
    if !road_guidance_available(roads, start) {
        return Frontier::default();
    }
    explore(|cell| roads.is_road(cell), start, max_steps, excluded, target)
}

fn explore_grid(
    bounds: &GameBounds,
    start: GridKey,
    max_steps: u32,
    excluded: &HashSet<GridKey>,
    target: Option<GridKey>,
) -> Frontier {
    explore(|cell| bounds.contains(cell), start, max_steps, excluded, target)
}

/// Minimum road distance from `start` to every cell within `max_steps`.
///
/// The start cell never appears in the result. An empty map means either
/// nothing is reachable or no road data covers `start`; callers that need to
/// tell these apart should check [`road_guidance_available`].
pub fn reachable(
    roads: &RoadIndex,
    start: GridKey,
    max_steps: u32,
    excluded: &HashSet<GridKey>,
) -> DistanceMap {
    let distances = explore_roads(roads, start, max_steps, excluded, None).distances;
    debug!(%start, max_steps, found = distances.len(), "reachability search");
    distances
}

/// An explicit path `start..=destination` whose step count (`len() - 1`)
/// equals the reachable distance of `destination`, or `None` when it cannot
/// be reached within `max_steps`.
pub fn shortest_path(
    roads: &RoadIndex,
    start: GridKey,
    destination: GridKey,
    max_steps: u32,
    excluded: &HashSet<GridKey>,
) -> Option<Vec<GridKey>> {
    if start == destination {
        return Some(vec![start]);
    }
    explore_roads(roads, start, max_steps, excluded, Some(destination)).path_to(start, destination)
}

/// Grid distance from `start` to every in-bounds cell within `max_steps`,
/// ignoring roads. Obstructed cells are neither entered nor crossed.
pub fn grid_reachable(
    bounds: &GameBounds,
    start: GridKey,
    max_steps: u32,
    excluded: &HashSet<GridKey>,
) -> DistanceMap {
    explore_grid(bounds, start, max_steps, excluded, None).distances
}

/// Shortest in-bounds grid walk around obstructed cells.
pub fn grid_shortest_path(
    bounds: &GameBounds,
    start: GridKey,
    destination: GridKey,
    max_steps: u32,
    excluded: &HashSet<GridKey>,
) -> Option<Vec<GridKey>> {
    if start == destination {
        return Some(vec![start]);
    }
    explore_grid(bounds, start, max_steps, excluded, Some(destination)).path_to(start, destination)
}

pub fn road_guidance_available(roads: &RoadIndex, start: GridKey) -> bool {
    !roads.is_empty() && roads.is_road(start)
}

/// Legal final destinations for a move budget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveOptions {
    /// False when no road data covers the start cell and the options fall back
    /// to plain grid distance.
    pub guided: bool,
    pub cells: BTreeSet<GridKey>,
}

impl MoveOptions {
    pub fn contains(&self, cell: GridKey) -> bool {
        self.cells.contains(&cell)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Cells reachable in exactly `budget` steps. Cells reachable in fewer steps
/// are never legal final destinations.
pub fn exact_destinations(
    roads: &RoadIndex,
    bounds: &GameBounds,
    start: GridKey,
    budget: u32,
    excluded: &HashSet<GridKey>,
) -> MoveOptions {
    let guided = road_guidance_available(roads, start);
    let distances = if guided {
        reachable(roads, start, budget, excluded)
    } else {
        warn!(%start, "no road data at start cell, movement guidance unavailable");
        grid_reachable(bounds, start, budget, excluded)
    };
    let cells = distances
        .into_iter()
        .filter(|(_, d)| *d == budget)
        .map(|(cell, _)| cell)
        .collect();
    MoveOptions { guided, cells }
}

/// The path a move from `start` to a legal `destination` follows, from the
/// same search that produced `options`.
pub fn plan_path(
    roads: &RoadIndex,
    bounds: &GameBounds,
    options: &MoveOptions,
    start: GridKey,
    destination: GridKey,
    budget: u32,
    excluded: &HashSet<GridKey>,
) -> Option<Vec<GridKey>> {
    if options.guided {
        shortest_path(roads, start, destination, budget, excluded)
    } else {
        grid_shortest_path(bounds, start, destination, budget, excluded)
    }
}

/// The candidate closest (Manhattan) to any of `targets`. Ties go to the
/// smallest cell, so the choice is stable for a given candidate set.
pub fn nearest_to<'a>(
    candidates: impl IntoIterator<Item = &'a GridKey>,
    targets: &[GridKey],
) -> Option<GridKey> {
    if targets.is_empty() {
        return None;
    }
    candidates
        .into_iter()
        .map(|cell| {
            let best = targets.iter().map(|t| cell.manhattan(*t)).min().unwrap_or(i32::MAX);
            (best, *cell)
        })
        .min()
        .map(|(_, cell)| cell)
}
