use std::collections::HashMap;

use crate::{
    error::LevelError,
    models::{LevelData, TileData},
};

/// How a level's raw data encodes the blocking relation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// `children` lists the tiles lying under this one; this tile blocks them
    ChildrenAsDescendants,
    /// `children` lists the tiles lying over this one; they block this tile
    ChildrenAsAncestors,
    /// Ignore `children`; overlapping tiles with a smaller depth block
    GeometricOverlap,
}

/// Maximum x/y distance between tile centers that still counts as overlapping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapTolerance {
    pub dx: f32,
    pub dy: f32,
}

impl Default for OverlapTolerance {
    fn default() -> Self {
        Self { dx: 14.0, dy: 14.0 }
    }
}

/// Evidence gathered while resolving the mode, kept for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModeVotes {
    pub agree_descendants: i64,
    pub agree_ancestors: i64,
    pub sum_descendants: u64,
    pub sum_ancestors: u64,
    /// Only computed when the child-list votes were inconclusive
    pub sum_geometric: Option<u64>,
}

/// Immutable blocking relation for one level
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    mode: Mode,
    votes: ModeVotes,
    blocks: Vec<Vec<usize>>,
    in_degree: Vec<u32>,
}

impl DependencyGraph {
    /// Validate the level and build its graph. Cycles are rejected.
    pub fn for_level(level: &LevelData, tolerance: OverlapTolerance) -> Result<Self, LevelError> {
        level.validate()?;
        let graph = Self::build(&level.tiles, &level.id_to_index(), tolerance);
        if let Some(idx) = graph.find_cycle() {
            return Err(LevelError::CyclicDependency(level.tiles[idx].id));
        }
        Ok(graph)
    }

    /// Build the graph from raw tiles. Unknown child ids and self references
    /// are skipped here; `LevelData::validate` reports them as errors.
    pub fn build(
        tiles: &[TileData],
        id_to_index: &HashMap<i32, usize>,
        tolerance: OverlapTolerance,
    ) -> Self {
        let (mode, votes) = resolve_mode(tiles, id_to_index, tolerance);

        let n = tiles.len();
        let mut blocks: Vec<Vec<usize>> = vec![Vec::with_capacity(4); n];
        match mode {
            Mode::ChildrenAsDescendants => {
                for (above, below) in child_edges(tiles, id_to_index) {
                    blocks[above].push(below);
                }
            }
            Mode::ChildrenAsAncestors => {
                for (tile, over) in child_edges(tiles, id_to_index) {
                    blocks[over].push(tile);
                }
            }
            Mode::GeometricOverlap => {
                for (above, below) in geometric_edges(tiles, tolerance) {
                    blocks[above].push(below);
                }
            }
        }

        let in_degree = in_degree_of(&blocks, |_| true);

        tracing::debug!(
            "Resolved board mode {:?} for {} tiles (votes {:?})",
            mode,
            n,
            votes
        );

        Self {
            mode,
            votes,
            blocks,
            in_degree,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn votes(&self) -> ModeVotes {
        self.votes
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Tiles that `tile_index` blocks
    pub fn blocks(&self, tile_index: usize) -> &[usize] {
        self.blocks.get(tile_index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// In-degree of every tile with the whole board present
    pub fn initial_in_degree(&self) -> &[u32] {
        &self.in_degree
    }

    /// Count blockers among the tiles for which `alive` holds
    pub fn in_degree_where(&self, alive: impl Fn(usize) -> bool) -> Vec<u32> {
        in_degree_of(&self.blocks, alive)
    }

    /// Return a tile index lying on a cycle, if the relation has one
    pub fn find_cycle(&self) -> Option<usize> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            New,
            Active,
            Done,
        }

        let mut marks = vec![Mark::New; self.blocks.len()];
        for root in 0..self.blocks.len() {
            if marks[root] != Mark::New {
                continue;
            }
            // (node, next edge to visit)
            let mut stack = vec![(root, 0usize)];
            marks[root] = Mark::Active;
            while let Some(top) = stack.last_mut() {
                let node = top.0;
                if let Some(&next) = self.blocks[node].get(top.1) {
                    top.1 += 1;
                    match marks[next] {
                        Mark::Active => return Some(next),
                        Mark::New => {
                            marks[next] = Mark::Active;
                            stack.push((next, 0));
                        }
                        Mark::Done => {}
                    }
                } else {
                    marks[node] = Mark::Done;
                    stack.pop();
                }
            }
        }
        None
    }
}

fn in_degree_of(blocks: &[Vec<usize>], alive: impl Fn(usize) -> bool) -> Vec<u32> {
    let mut in_degree = vec![0u32; blocks.len()];
    for (idx, blocked) in blocks.iter().enumerate() {
        if !alive(idx) {
            continue;
        }
        for &target in blocked {
            in_degree[target] += 1;
        }
    }
    in_degree
}

/// `(tile, child)` pairs from explicit child lists, skipping unknown ids and self references
fn child_edges<'a>(
    tiles: &'a [TileData],
    id_to_index: &'a HashMap<i32, usize>,
) -> impl Iterator<Item = (usize, usize)> + 'a {
    tiles.iter().enumerate().flat_map(move |(i, tile)| {
        tile.children
            .iter()
            .filter_map(move |child| id_to_index.get(child).copied())
            .filter(move |&j| j != i)
            .map(move |j| (i, j))
    })
}

/// `(above, below)` pairs for tiles whose centers overlap within tolerance
fn geometric_edges(tiles: &[TileData], tolerance: OverlapTolerance) -> Vec<(usize, usize)> {
    let mut edges = Vec::new();
    for (i, below) in tiles.iter().enumerate() {
        for (j, above) in tiles.iter().enumerate() {
            if i == j || above.position.z >= below.position.z {
                continue;
            }
            if (below.position.x - above.position.x).abs() <= tolerance.dx
                && (below.position.y - above.position.y).abs() <= tolerance.dy
            {
                edges.push((j, i));
            }
        }
    }
    edges
}

/// Pick the interpretation of the level data.
///
/// A child-list reading wins outright only with an agreement margin greater
/// than one. Otherwise the candidate with the largest in-degree sum is used,
/// ties going to descendants, then ancestors, then geometry.
fn resolve_mode(
    tiles: &[TileData],
    id_to_index: &HashMap<i32, usize>,
    tolerance: OverlapTolerance,
) -> (Mode, ModeVotes) {
    let mut votes = ModeVotes::default();

    for (i, j) in child_edges(tiles, id_to_index) {
        let zi = tiles[i].position.z;
        let zj = tiles[j].position.z;

        votes.sum_descendants += 1;
        votes.agree_descendants += if zi <= zj { 1 } else { -1 };

        votes.sum_ancestors += 1;
        votes.agree_ancestors += if zj <= zi { 1 } else { -1 };
    }

    if votes.agree_descendants > votes.agree_ancestors + 1 {
        return (Mode::ChildrenAsDescendants, votes);
    }
    if votes.agree_ancestors > votes.agree_descendants + 1 {
        return (Mode::ChildrenAsAncestors, votes);
    }

    let sum_geometric = geometric_edges(tiles, tolerance).len() as u64;
    votes.sum_geometric = Some(sum_geometric);

    let (a, b, g) = (votes.sum_descendants, votes.sum_ancestors, sum_geometric);
    let mode = if a >= b && a >= g {
        Mode::ChildrenAsDescendants
    } else if b >= a && b >= g {
        Mode::ChildrenAsAncestors
    } else {
        Mode::GeometricOverlap
    };
    (mode, votes)
}
