use std::collections::{HashMap, HashSet};

use crate::{
    error::LevelError,
    game::{
        events::{Notifier, OpenStateChanged},
        graph::{DependencyGraph, Mode, OverlapTolerance},
    },
    models::{LevelData, Position},
};

/// A pickable tile as seen by the solver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenTile {
    pub tile_index: usize,
    pub letter: char,
}

/// Mutable board for one level.
///
/// A tile is open when it is alive, nothing alive blocks it, and it is not
/// reserved by a move. Picking updates in-degrees incrementally; cancel and
/// return fall back to [`BoardState::full_resync`].
pub struct BoardState {
    tile_ids: Vec<i32>,
    letters: Vec<char>,
    positions: Vec<Position>,
    id_to_index: HashMap<i32, usize>,
    graph: DependencyGraph,
    in_degree: Vec<u32>,
    alive: Vec<bool>,
    picked: HashSet<usize>,
    in_flight: HashSet<usize>,
    /// Last open state announced per tile, `None` until first computed
    announced_open: Vec<Option<bool>>,
    open_changes: Notifier<OpenStateChanged>,
}

impl BoardState {
    /// Validate the level, resolve its graph and start with every tile alive
    pub fn new(level: &LevelData, tolerance: OverlapTolerance) -> Result<Self, LevelError> {
        let graph = DependencyGraph::for_level(level, tolerance)?;
        let n = level.tiles.len();

        let mut board = Self {
            tile_ids: level.tiles.iter().map(|tile| tile.id).collect(),
            letters: level.tiles.iter().map(|tile| tile.letter()).collect(),
            positions: level.tiles.iter().map(|tile| tile.position).collect(),
            id_to_index: level.id_to_index(),
            in_degree: graph.initial_in_degree().to_vec(),
            graph,
            alive: vec![true; n],
            picked: HashSet::new(),
            in_flight: HashSet::new(),
            announced_open: vec![None; n],
            open_changes: Notifier::new(),
        };
        board.refresh_all_open_states();

        tracing::info!(
            "Board ready: {} tiles, mode {:?}, {} open",
            n,
            board.graph.mode(),
            board.open_indices().count()
        );

        Ok(board)
    }

    /// Register a callback fired when a tile switches between open and closed
    pub fn subscribe_open_changes<F>(&mut self, callback: F)
    where
        F: FnMut(&OpenStateChanged) + 'static,
    {
        self.open_changes.subscribe(callback);
    }

    pub fn len(&self) -> usize {
        self.alive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alive.is_empty()
    }

    pub fn mode(&self) -> Mode {
        self.graph.mode()
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn index_of(&self, tile_id: i32) -> Option<usize> {
        self.id_to_index.get(&tile_id).copied()
    }

    pub fn tile_id(&self, tile_index: usize) -> Option<i32> {
        self.tile_ids.get(tile_index).copied()
    }

    pub fn letter(&self, tile_index: usize) -> Option<char> {
        self.letters.get(tile_index).copied()
    }

    pub fn position(&self, tile_index: usize) -> Option<Position> {
        self.positions.get(tile_index).copied()
    }

    pub fn in_degree(&self, tile_index: usize) -> Option<u32> {
        self.in_degree.get(tile_index).copied()
    }

    // ---------------- Queries ----------------

    /// Indices of every open tile, in board order
    pub fn open_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len()).filter(move |&idx| self.is_open_index(idx))
    }

    pub fn is_open_index(&self, tile_index: usize) -> bool {
        self.valid(tile_index)
            && self.alive[tile_index]
            && self.in_degree[tile_index] == 0
            && !self.picked.contains(&tile_index)
    }

    pub fn is_alive_index(&self, tile_index: usize) -> bool {
        self.valid(tile_index) && self.alive[tile_index]
    }

    pub fn is_in_flight(&self, tile_index: usize) -> bool {
        self.in_flight.contains(&tile_index)
    }

    pub fn is_picked(&self, tile_index: usize) -> bool {
        self.picked.contains(&tile_index)
    }

    /// Snapshot of the open tiles with their letters
    pub fn open_tiles(&self) -> Vec<OpenTile> {
        self.open_indices()
            .map(|tile_index| OpenTile {
                tile_index,
                letter: self.letters[tile_index],
            })
            .collect()
    }

    pub fn is_board_empty(&self) -> bool {
        !self.alive.iter().any(|&alive| alive)
    }

    /// Ids of alive tiles with no remaining blockers
    pub fn open_tile_ids(&self) -> Vec<i32> {
        self.alive_ids_where(|in_degree| in_degree == 0)
    }

    /// Ids of alive tiles still covered by something
    pub fn closed_tile_ids(&self) -> Vec<i32> {
        self.alive_ids_where(|in_degree| in_degree != 0)
    }

    fn alive_ids_where(&self, keep: impl Fn(u32) -> bool) -> Vec<i32> {
        (0..self.len())
            .filter(|&idx| self.alive[idx] && keep(self.in_degree[idx]))
            .map(|idx| self.tile_ids[idx])
            .collect()
    }

    /// True when in-degrees match a from-scratch count and the tracking
    /// sets are consistent with `alive`
    pub fn check_invariants(&self) -> bool {
        let expected = self.graph.in_degree_where(|idx| self.alive[idx]);
        expected == self.in_degree
            && self.picked.iter().all(|&idx| !self.alive[idx])
            && self.in_flight.is_subset(&self.picked)
    }

    // ---------------- Transitions ----------------

    /// Take an open or closed alive tile off the board right away.
    ///
    /// Tiles it blocks lose one blocker and may open before the move
    /// finishes. Returns `false` (and changes nothing) for dead or
    /// out-of-range tiles.
    pub fn picking_begin(&mut self, tile_index: usize) -> bool {
        if !self.is_alive_index(tile_index) {
            tracing::debug!("Ignoring pick of tile index {} (not alive)", tile_index);
            return false;
        }

        self.alive[tile_index] = false;
        self.picked.insert(tile_index);
        self.in_flight.insert(tile_index);

        let blocked = self.graph.blocks(tile_index).to_vec();
        for &target in &blocked {
            self.in_degree[target] = self.in_degree[target].saturating_sub(1);
        }
        for &target in &blocked {
            self.apply_open_state(target);
        }

        tracing::trace!(
            "Picked tile {} ({:?}), released {} dependents",
            self.tile_ids[tile_index],
            self.letters[tile_index],
            blocked.len()
        );
        debug_assert!(self.check_invariants());
        true
    }

    /// Mark a pick as durably placed; it can no longer be canceled
    pub fn commit_pick(&mut self, tile_index: usize) -> bool {
        self.in_flight.remove(&tile_index)
    }

    /// Undo a pick that has not been committed yet
    pub fn pick_canceled(&mut self, tile_index: usize) -> bool {
        if !self.valid(tile_index) || !self.in_flight.contains(&tile_index) {
            tracing::debug!("Ignoring cancel of tile index {} (not in flight)", tile_index);
            return false;
        }
        self.revive(tile_index);
        true
    }

    /// Put a picked tile back on the board
    pub fn tile_returned(&mut self, tile_index: usize) -> bool {
        if !self.valid(tile_index) || !self.picked.contains(&tile_index) {
            tracing::debug!("Ignoring return of tile index {} (not picked)", tile_index);
            return false;
        }
        self.revive(tile_index);
        true
    }

    fn revive(&mut self, tile_index: usize) {
        self.in_flight.remove(&tile_index);
        self.picked.remove(&tile_index);
        self.alive[tile_index] = true;
        self.full_resync();
    }

    /// Recount every in-degree from the alive tiles and re-announce open
    /// states. Safe to call at any time; repeated calls change nothing.
    pub fn full_resync(&mut self) {
        let alive = &self.alive;
        self.in_degree = self.graph.in_degree_where(|idx| alive[idx]);
        self.refresh_all_open_states();
        debug_assert!(self.check_invariants());
    }

    // ---------------- Open/Close ----------------

    fn refresh_all_open_states(&mut self) {
        for idx in 0..self.len() {
            self.apply_open_state(idx);
        }
    }

    fn apply_open_state(&mut self, tile_index: usize) {
        if !self.valid(tile_index) || self.picked.contains(&tile_index) || !self.alive[tile_index] {
            return;
        }

        let should_open = self.in_degree[tile_index] == 0;
        match self.announced_open[tile_index] {
            Some(open) if open == should_open => {}
            Some(_) => {
                self.announced_open[tile_index] = Some(should_open);
                self.open_changes.emit(&OpenStateChanged {
                    tile_index,
                    open: should_open,
                });
            }
            None => self.announced_open[tile_index] = Some(should_open),
        }
    }

    fn valid(&self, tile_index: usize) -> bool {
        tile_index < self.alive.len()
    }
}
