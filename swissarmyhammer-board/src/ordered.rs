//! Helpers over position-indexed sequences.
//!
//! Columns on a board and cards in a column are both kept as a `Vec` whose
//! array order is authoritative. The `position` stored on each item is derived
//! from that order and must always equal the item's index once a mutation has
//! finished. These helpers take the sequence by value and hand back the new
//! one, so callers thread state through them functionally.

/// An item with an identity and a zero-based position in its parent container.
pub trait Positioned {
    /// Stable identifier type
    type Id: Copy + PartialEq;

    /// Stable identifier of this item
    fn key(&self) -> Self::Id;

    /// Current position in the parent container
    fn position(&self) -> usize;

    /// Overwrite the position
    fn set_position(&mut self, position: usize);
}

/// Recompute every item's position from its index.
pub fn normalize<T: Positioned>(mut items: Vec<T>) -> Vec<T> {
    for (index, item) in items.iter_mut().enumerate() {
        item.set_position(index);
    }
    items
}

/// Insert `item` at `index` (clamped to `[0, len]`) and normalize.
pub fn insert_at<T: Positioned>(mut items: Vec<T>, item: T, index: usize) -> Vec<T> {
    let index = index.min(items.len());
    items.insert(index, item);
    normalize(items)
}

/// Remove the item with the given id and normalize.
///
/// When nothing matches, the sequence comes back exactly as it went in.
pub fn remove_by_id<T: Positioned>(items: Vec<T>, id: T::Id) -> Vec<T> {
    take_by_id(items, id).0
}

/// Like [`remove_by_id`], but also hands back the removed item.
pub fn take_by_id<T: Positioned>(mut items: Vec<T>, id: T::Id) -> (Vec<T>, Option<T>) {
    match items.iter().position(|item| item.key() == id) {
        Some(index) => {
            let removed = items.remove(index);
            (normalize(items), Some(removed))
        }
        None => (items, None),
    }
}

/// Stable sort by stored position.
pub fn sort_by_position<T: Positioned>(mut items: Vec<T>) -> Vec<T> {
    items.sort_by_key(Positioned::position);
    items
}

/// True when positions are exactly `0..n-1` in array order.
pub fn is_contiguous<T: Positioned>(items: &[T]) -> bool {
    items
        .iter()
        .enumerate()
        .all(|(index, item)| item.position() == index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: u32,
        position: usize,
    }

    impl Positioned for Item {
        type Id = u32;

        fn key(&self) -> u32 {
            self.id
        }

        fn position(&self) -> usize {
            self.position
        }

        fn set_position(&mut self, position: usize) {
            self.position = position;
        }
    }

    fn items(pairs: &[(u32, usize)]) -> Vec<Item> {
        pairs
            .iter()
            .map(|&(id, position)| Item { id, position })
            .collect()
    }

    fn ids(items: &[Item]) -> Vec<u32> {
        items.iter().map(|i| i.id).collect()
    }

    #[test]
    fn test_normalize_uses_array_order() {
        let result = normalize(items(&[(1, 7), (2, 3), (3, 9)]));
        assert_eq!(result, items(&[(1, 0), (2, 1), (3, 2)]));
        assert!(is_contiguous(&result));
    }

    #[test]
    fn test_normalize_empty() {
        let result: Vec<Item> = normalize(Vec::new());
        assert!(result.is_empty());
        assert!(is_contiguous(&result));
    }

    #[test]
    fn test_insert_at_middle() {
        let result = insert_at(items(&[(1, 0), (2, 1)]), Item { id: 9, position: 0 }, 1);
        assert_eq!(ids(&result), vec![1, 9, 2]);
        assert!(is_contiguous(&result));
    }

    #[test]
    fn test_insert_at_clamps_past_end() {
        let result = insert_at(items(&[(1, 0)]), Item { id: 9, position: 0 }, 50);
        assert_eq!(ids(&result), vec![1, 9]);
        assert_eq!(result[1].position, 1);
    }

    #[test]
    fn test_remove_by_id_renumbers() {
        let result = remove_by_id(items(&[(1, 0), (2, 1), (3, 2)]), 1);
        assert_eq!(result, items(&[(2, 0), (3, 1)]));
    }

    #[test]
    fn test_remove_missing_is_identity() {
        // Gapped positions must survive untouched when nothing is removed
        let input = items(&[(1, 4), (2, 8)]);
        let result = remove_by_id(input.clone(), 99);
        assert_eq!(result, input);
    }

    #[test]
    fn test_take_by_id_returns_item() {
        let (rest, taken) = take_by_id(items(&[(1, 0), (2, 1)]), 2);
        assert_eq!(taken, Some(Item { id: 2, position: 1 }));
        assert_eq!(ids(&rest), vec![1]);
    }

    #[test]
    fn test_sort_by_position_is_stable() {
        let result = sort_by_position(items(&[(1, 1), (2, 0), (3, 1)]));
        assert_eq!(ids(&result), vec![2, 1, 3]);
    }

    #[test]
    fn test_is_contiguous_detects_gaps() {
        assert!(!is_contiguous(&items(&[(1, 0), (2, 2)])));
        assert!(!is_contiguous(&items(&[(1, 1), (2, 0)])));
    }
}
