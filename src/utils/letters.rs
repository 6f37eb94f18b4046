use std::collections::HashMap;
use once_cell::sync::Lazy;

/// Letter values similar to Scrabble scoring
pub static LETTER_VALUES: Lazy<HashMap<char, u8>> = Lazy::new(|| {
    let mut map = HashMap::new();

    // 1 point letters
    for ch in ['E', 'A', 'O', 'N', 'R', 'T', 'L', 'S', 'U', 'I'] {
        map.insert(ch, 1);
    }

    // 2 points
    for ch in ['D', 'G'] {
        map.insert(ch, 2);
    }

    // 3 points
    for ch in ['B', 'C', 'M', 'P'] {
        map.insert(ch, 3);
    }

    // 4 points
    for ch in ['F', 'H', 'V', 'W', 'Y'] {
        map.insert(ch, 4);
    }

    // 5 points
    map.insert('K', 5);

    // 8 points
    for ch in ['J', 'X'] {
        map.insert(ch, 8);
    }

    // 10 points
    for ch in ['Q', 'Z'] {
        map.insert(ch, 10);
    }

    map
});

/// Get the point value for a letter, `None` if the table has no entry for it
pub fn letter_value(letter: char) -> Option<u8> {
    let upper = letter.to_ascii_uppercase();
    LETTER_VALUES.get(&upper).copied()
}

/// Normalize a raw tile character field to the single letter shown on the tile.
/// Empty or whitespace-only input becomes `'?'`.
pub fn normalize_tile_letter(raw: &str) -> char {
    raw.trim()
        .chars()
        .next()
        .map(|ch| ch.to_uppercase().next().unwrap_or(ch))
        .unwrap_or('?')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_values() {
        assert_eq!(letter_value('E'), Some(1));
        assert_eq!(letter_value('q'), Some(10));
        assert_eq!(letter_value('X'), Some(8));
        assert_eq!(letter_value('D'), Some(2));
        assert_eq!(letter_value('K'), Some(5));
    }

    #[test]
    fn test_unknown_letters_have_no_value() {
        assert_eq!(letter_value('?'), None);
        assert_eq!(letter_value('1'), None);
        assert_eq!(letter_value('Ç'), None);
    }

    #[test]
    fn test_table_covers_alphabet() {
        assert_eq!(LETTER_VALUES.len(), 26);
        assert!(('A'..='Z').all(|ch| letter_value(ch).is_some()));
    }

    #[test]
    fn test_normalize_tile_letter() {
        assert_eq!(normalize_tile_letter("a"), 'A');
        assert_eq!(normalize_tile_letter("  k "), 'K');
        assert_eq!(normalize_tile_letter("qu"), 'Q');
        assert_eq!(normalize_tile_letter(""), '?');
        assert_eq!(normalize_tile_letter("   "), '?');
    }
}
