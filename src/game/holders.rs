use crate::models::Position;

/// A tile sitting in (or travelling to) a slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeldTile {
    pub tile_index: usize,
    pub tile_id: i32,
    pub letter: char,
    pub was_open: bool,
    /// Where the tile sat on the board, for returning it
    pub source: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Slot {
    #[default]
    Empty,
    /// Claimed by a move that has not landed yet
    Reserved(HeldTile),
    Occupied(HeldTile),
}

impl Slot {
    pub fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied(_))
    }

    pub fn current(&self) -> Option<&HeldTile> {
        match self {
            Slot::Occupied(tile) => Some(tile),
            _ => None,
        }
    }
}

/// Row of answer slots filled left to right through an insert cursor
#[derive(Debug, Clone)]
pub struct LetterHolders {
    slots: Vec<Slot>,
    cursor: usize,
}

impl LetterHolders {
    pub fn new(slot_count: usize) -> Self {
        Self {
            slots: vec![Slot::Empty; slot_count],
            cursor: 0,
        }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Claim the slot under the cursor for `tile`. Fails when it is busy.
    pub fn try_reserve_at_cursor(&mut self, tile: HeldTile) -> Option<usize> {
        let slot = self.cursor;
        match self.slots.get_mut(slot) {
            Some(entry) if matches!(entry, Slot::Empty) => {
                *entry = Slot::Reserved(tile);
                Some(slot)
            }
            _ => None,
        }
    }

    /// Land the reserved tile; the cursor moves on if it pointed here
    pub fn commit(&mut self, slot: usize) -> Option<HeldTile> {
        let tile = match self.slots.get(slot) {
            Some(Slot::Reserved(tile)) => *tile,
            _ => return None,
        };
        self.slots[slot] = Slot::Occupied(tile);

        if slot == self.cursor {
            self.cursor = (self.cursor + 1).min(self.slots.len() - 1);
        }
        Some(tile)
    }

    pub fn cancel_reserve(&mut self, slot: usize) -> Option<HeldTile> {
        match self.slots.get(slot) {
            Some(Slot::Reserved(tile)) => {
                let tile = *tile;
                self.slots[slot] = Slot::Empty;
                Some(tile)
            }
            _ => None,
        }
    }

    /// Empty `start` and every occupied slot after it; placement resumes at `start`.
    /// Returns the released tiles left to right.
    pub fn return_from(&mut self, start: usize) -> Vec<HeldTile> {
        if !self.slots.get(start).is_some_and(Slot::is_occupied) {
            return Vec::new();
        }
        self.cursor = start;

        let mut released = Vec::new();
        for slot in &mut self.slots[start..] {
            if let Slot::Occupied(tile) = *slot {
                released.push(tile);
                *slot = Slot::Empty;
            }
        }
        released
    }

    /// Release the rightmost occupied slot (single-step undo)
    pub fn take_last(&mut self) -> Option<HeldTile> {
        let idx = self.rightmost_occupied()?;
        let tile = self.slots[idx].current().copied();
        self.slots[idx] = Slot::Empty;
        self.cursor = idx;
        tile
    }

    /// Remove the contiguous occupied prefix for good and restart at slot 0.
    /// Returns the consumed tiles.
    pub fn consume_from_start(&mut self) -> Vec<HeldTile> {
        let count = self.occupied_prefix_len();
        let consumed = self.slots[..count]
            .iter()
            .filter_map(Slot::current)
            .copied()
            .collect();
        for slot in &mut self.slots[..count] {
            *slot = Slot::Empty;
        }
        self.cursor = 0;
        consumed
    }

    pub fn clear_all(&mut self) {
        self.slots.fill(Slot::Empty);
        self.cursor = 0;
    }

    /// Number of occupied slots before the first gap
    pub fn occupied_prefix_len(&self) -> usize {
        self.slots.iter().take_while(|slot| slot.is_occupied()).count()
    }

    pub fn rightmost_occupied(&self) -> Option<usize> {
        self.slots.iter().rposition(Slot::is_occupied)
    }

    pub fn has_any_occupied(&self) -> bool {
        self.rightmost_occupied().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn held(tile_index: usize, letter: char) -> HeldTile {
        HeldTile {
            tile_index,
            tile_id: tile_index as i32 + 100,
            letter,
            was_open: true,
            source: Position::default(),
        }
    }

    fn filled(letters: &str, slot_count: usize) -> LetterHolders {
        let mut holders = LetterHolders::new(slot_count);
        for (i, letter) in letters.chars().enumerate() {
            let slot = holders.try_reserve_at_cursor(held(i, letter)).unwrap();
            holders.commit(slot).unwrap();
        }
        holders
    }

    #[test]
    fn test_reserve_only_at_cursor() {
        let mut holders = LetterHolders::new(3);
        assert_eq!(holders.try_reserve_at_cursor(held(0, 'A')), Some(0));
        // cursor slot is reserved until the move lands
        assert_eq!(holders.try_reserve_at_cursor(held(1, 'B')), None);

        holders.commit(0);
        assert_eq!(holders.cursor(), 1);
        assert_eq!(holders.try_reserve_at_cursor(held(1, 'B')), Some(1));
    }

    #[test]
    fn test_cursor_clamps_to_last_slot() {
        let mut holders = filled("AB", 2);
        assert_eq!(holders.cursor(), 1);
        assert_eq!(holders.try_reserve_at_cursor(held(5, 'C')), None);
        assert_eq!(holders.occupied_prefix_len(), 2);
    }

    #[test]
    fn test_cancel_reserve_frees_slot() {
        let mut holders = LetterHolders::new(3);
        let slot = holders.try_reserve_at_cursor(held(0, 'A')).unwrap();
        assert_eq!(holders.cancel_reserve(slot), Some(held(0, 'A')));
        assert_eq!(holders.slots()[0], Slot::Empty);
        assert_eq!(holders.cancel_reserve(slot), None);
        assert_eq!(holders.commit(slot), None);
    }

    #[test]
    fn test_return_from_releases_tail() {
        let mut holders = filled("CATS", 5);
        let released = holders.return_from(2);

        assert_eq!(released, vec![held(2, 'T'), held(3, 'S')]);
        assert_eq!(holders.cursor(), 2);
        assert_eq!(holders.occupied_prefix_len(), 2);
        assert!(holders.return_from(4).is_empty());
    }

    #[test]
    fn test_take_last_moves_cursor_back() {
        let mut holders = filled("CAT", 5);
        assert_eq!(holders.take_last(), Some(held(2, 'T')));
        assert_eq!(holders.cursor(), 2);
        assert_eq!(holders.rightmost_occupied(), Some(1));

        holders.clear_all();
        assert_eq!(holders.take_last(), None);
        assert!(!holders.has_any_occupied());
    }

    #[test]
    fn test_consume_resets_cursor() {
        let mut holders = filled("CATS", 5);
        holders.return_from(2);

        assert_eq!(holders.consume_from_start(), vec![held(0, 'C'), held(1, 'A')]);
        assert_eq!(holders.cursor(), 0);
        assert!(!holders.has_any_occupied());
    }

    #[test]
    fn test_gap_truncates_prefix() {
        let mut holders = LetterHolders::new(4);
        holders.slots[0] = Slot::Occupied(held(0, 'A'));
        holders.slots[2] = Slot::Occupied(held(2, 'T'));

        assert_eq!(holders.occupied_prefix_len(), 1);
        let consumed = holders.consume_from_start();
        assert_eq!(consumed, vec![held(0, 'A')]);
        assert!(holders.slots()[2].is_occupied());
    }
}
