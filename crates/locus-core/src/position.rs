//! Display ordering of positioned definitions
//!
//! Bulk sync takes positions verbatim from the caller. The only mutation the
//! engine performs itself is the single-step move: exchange the position
//! values of two neighbours in the current display order. Positions stay a
//! permutation of the values they held before, and nothing is renumbered.

use crate::definition::{sort_for_display, Positioned};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Direction of a single-step move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Towards index 0
    Up,
    /// Away from index 0
    Down,
}

/// Swap the item at `index` with its neighbour in display order
///
/// `items` is sorted into display order first. Returns the indices of the two
/// items whose positions were exchanged, or `None` when the move is a no-op
/// (the first item moving up, or the last item moving down).
pub fn swap_with_neighbor<P: Positioned>(
    items: &mut [P],
    index: usize,
    direction: Direction,
) -> Result<Option<(usize, usize)>> {
    let len = items.len();
    if index >= len {
        return Err(Error::IndexOutOfRange { index, len });
    }
    sort_for_display(items);

    let neighbor = match direction {
        Direction::Up if index == 0 => return Ok(None),
        Direction::Up => index - 1,
        Direction::Down if index + 1 == len => return Ok(None),
        Direction::Down => index + 1,
    };

    let a = items[index].position().unwrap_or_default();
    let b = items[neighbor].position().unwrap_or_default();
    items[index].set_position(b);
    items[neighbor].set_position(a);
    Ok(Some((index, neighbor)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Definition, SearchFilter};

    fn filters() -> Vec<SearchFilter> {
        vec![
            SearchFilter::new("c", "shop", "C", 2),
            SearchFilter::new("a", "shop", "A", 0),
            SearchFilter::new("b", "shop", "B", 1),
        ]
    }

    fn order(items: &mut [SearchFilter]) -> Vec<String> {
        sort_for_display(items);
        items.iter().map(|f| f.id.0.clone()).collect()
    }

    #[test]
    fn test_move_down() {
        let mut items = filters();
        let swapped = swap_with_neighbor(&mut items, 0, Direction::Down).unwrap();
        assert_eq!(swapped, Some((0, 1)));
        assert_eq!(order(&mut items), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_move_up() {
        let mut items = filters();
        swap_with_neighbor(&mut items, 2, Direction::Up).unwrap();
        assert_eq!(order(&mut items), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_boundaries_are_noops() {
        let mut items = filters();
        assert_eq!(swap_with_neighbor(&mut items, 0, Direction::Up).unwrap(), None);
        assert_eq!(swap_with_neighbor(&mut items, 2, Direction::Down).unwrap(), None);
        assert_eq!(order(&mut items), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_out_of_range() {
        let mut items = filters();
        assert_eq!(
            swap_with_neighbor(&mut items, 3, Direction::Up).unwrap_err(),
            Error::IndexOutOfRange { index: 3, len: 3 }
        );
    }

    #[test]
    fn test_positions_stay_a_permutation() {
        // Gapped positions are exchanged, never renumbered.
        let mut items = vec![
            SearchFilter::new("a", "shop", "A", 10),
            SearchFilter::new("b", "shop", "B", 40),
        ];
        swap_with_neighbor(&mut items, 0, Direction::Down).unwrap();
        let mut positions: Vec<_> = items.iter().filter_map(|f| f.position()).collect();
        positions.sort();
        assert_eq!(positions, vec![10, 40]);
        assert_eq!(order(&mut items), vec!["b", "a"]);
    }
}
