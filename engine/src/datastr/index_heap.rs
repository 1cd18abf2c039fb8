//! A priority queue implemented with a binary heap.
//!
//! Insertion and popping the minimal element have `O(log n)` time complexity.
//! Checking the minimal element is `O(1)`. Keys of elements in the heap can
//! also be decreased in `O(log n)`.
//!
//! # Examples
//!
//! ```
//! use ocean_router::datastr::index_heap::{Indexing, IndexdMinHeap};
//!
//! #[derive(Copy, Clone, Eq, PartialEq, Debug, Ord, PartialOrd)]
//! pub struct State {
//!     pub distance: usize,
//!     pub node: usize,
//! }
//!
//! // The `Indexing` traits needs to be implemented as well, so we can find elements to decrease their key.
//! impl Indexing for State {
//!     fn as_index(&self) -> usize {
//!         self.node
//!     }
//! }
//!
//! let mut heap = IndexdMinHeap::new(3);
//! heap.push(State { node: 0, distance: 42 });
//! heap.push(State { node: 1, distance: 23 });
//! heap.push(State { node: 2, distance: 50000 });
//! assert_eq!(heap.peek().cloned(), Some(State { node: 1, distance: 23 }));
//! heap.decrease_key(State { node: 0, distance: 1 });
//! assert_eq!(heap.pop(), Some(State { node: 0, distance: 1 }));
//! ```

/// A trait to map elements in a heap to a unique index.
/// The element type of the `IndexdMinHeap` has to implement this trait.
pub trait Indexing {
    /// This method has to map a heap element to a unique `usize` index.
    fn as_index(&self) -> usize;
}

/// A priority queue where the elements are IDs from 0 to id_count-1 where id_count is a number that is set in the constructor.
/// The elements are sorted ascending by the ordering defined by the `Ord` trait.
/// The interface mirrors the standard library BinaryHeap (except for the reversed order).
/// Only the methods necessary for dijkstras algorithm are implemented.
#[derive(Debug, Clone)]
pub struct IndexdMinHeap<T> {
    positions: Vec<usize>,
    data: Vec<T>,
}

const INVALID_POSITION: usize = usize::MAX;

impl<T: Ord + Indexing> IndexdMinHeap<T> {
    /// Creates an empty `IndexdMinHeap` as a min-heap.
    /// The indices (as defined by the `Indexing` trait) of all inserted elements
    /// will have to be between in `[0, max_index)`
    pub fn new(max_id: usize) -> IndexdMinHeap<T> {
        IndexdMinHeap {
            positions: vec![INVALID_POSITION; max_id],
            data: Vec::new(),
        }
    }

    /// Returns the length of the binary heap.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Checks if the binary heap is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks if the heap already contains an element mapped to the given index
    pub fn contains_index(&self, id: usize) -> bool {
        self.positions[id] != INVALID_POSITION
    }

    pub fn get(&self, id: usize) -> Option<&T> {
        self.data.get(self.positions[id])
    }

    /// Drops all items from the heap.
    pub fn clear(&mut self) {
        for element in &self.data {
            self.positions[element.as_index()] = INVALID_POSITION;
        }
        self.data.clear();
    }

    /// Returns a reference to the smallest item in the heap, or None if it is empty.
    pub fn peek(&self) -> Option<&T> {
        self.data.first()
    }

    /// Removes the smallest item from the binary heap and returns it, or None if it is empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.data.is_empty() {
            return None;
        }
        let last = self.data.len() - 1;
        self.swap_elements(0, last);
        let item = self.data.pop()?;
        self.positions[item.as_index()] = INVALID_POSITION;
        if !self.is_empty() {
            self.move_down_in_tree(0);
        }
        Some(item)
    }

    /// Pushes an item onto the binary heap.
    /// Panics if an element with the same index already exists.
    pub fn push(&mut self, element: T) {
        assert!(!self.contains_index(element.as_index()));
        let insert_position = self.len();
        self.positions[element.as_index()] = insert_position;
        self.data.push(element);
        self.move_up_in_tree(insert_position);
    }

    /// Replaces the element with the same index by `element` and restores the heap property.
    /// The new key must not be larger than the old one.
    pub fn decrease_key(&mut self, element: T) {
        let position = self.positions[element.as_index()];
        debug_assert!(element <= self.data[position]);
        self.data[position] = element;
        self.move_up_in_tree(position);
    }

    fn swap_elements(&mut self, a: usize, b: usize) {
        self.positions.swap(self.data[a].as_index(), self.data[b].as_index());
        self.data.swap(a, b);
    }

    fn move_up_in_tree(&mut self, mut position: usize) {
        while position > 0 {
            let parent = (position - 1) / 2;
            if self.data[parent] <= self.data[position] {
                break;
            }
            self.swap_elements(parent, position);
            position = parent;
        }
    }

    fn move_down_in_tree(&mut self, mut position: usize) {
        let heap_size = self.len();
        loop {
            let left = 2 * position + 1;
            if left >= heap_size {
                return; // no children at all
            }
            let right = left + 1;
            let smallest_child = if right < heap_size && self.data[right] < self.data[left] { right } else { left };
            if self.data[smallest_child] >= self.data[position] {
                return; // no child is smaller
            }
            self.swap_elements(smallest_child, position);
            position = smallest_child;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[derive(Copy, Clone, Eq, PartialEq, Debug, Ord, PartialOrd)]
    struct Item {
        key: u32,
        id: usize,
    }

    impl Indexing for Item {
        fn as_index(&self) -> usize {
            self.id
        }
    }

    #[test]
    fn pops_in_ascending_order() {
        let mut heap = IndexdMinHeap::new(5);
        for (id, key) in [7, 3, 9, 1, 5].iter().enumerate() {
            heap.push(Item { key: *key, id });
        }
        let keys: Vec<u32> = std::iter::from_fn(|| heap.pop()).map(|item| item.key).collect();
        assert_eq!(keys, vec![1, 3, 5, 7, 9]);
        assert!(heap.is_empty());
        assert!(!heap.contains_index(3));
    }

    #[test]
    fn decrease_key_moves_element_to_front() {
        let mut heap = IndexdMinHeap::new(4);
        heap.push(Item { key: 10, id: 0 });
        heap.push(Item { key: 20, id: 1 });
        heap.push(Item { key: 30, id: 2 });
        heap.push(Item { key: 40, id: 3 });
        heap.decrease_key(Item { key: 5, id: 3 });
        assert_eq!(heap.get(3), Some(&Item { key: 5, id: 3 }));
        assert_eq!(heap.pop(), Some(Item { key: 5, id: 3 }));
        assert_eq!(heap.pop(), Some(Item { key: 10, id: 0 }));
    }

    #[test]
    fn clear_resets_positions() {
        let mut heap = IndexdMinHeap::new(3);
        heap.push(Item { key: 1, id: 0 });
        heap.push(Item { key: 2, id: 2 });
        heap.clear();
        assert!(heap.is_empty());
        assert!(!heap.contains_index(0));
        heap.push(Item { key: 3, id: 0 });
        assert_eq!(heap.peek(), Some(&Item { key: 3, id: 0 }));
    }

    #[test]
    fn random_interleaving_always_pops_minimum() {
        let n = 200;
        let mut rng = StdRng::seed_from_u64(42);
        let mut heap = IndexdMinHeap::new(n);
        let mut reference: Vec<Option<u32>> = vec![None; n];
        let mut popped = vec![false; n];

        for _ in 0..5000 {
            match rng.gen_range(0..3) {
                0 => {
                    let id = rng.gen_range(0..n);
                    if reference[id].is_none() && !popped[id] {
                        let key = rng.gen_range(0..10_000);
                        heap.push(Item { key, id });
                        reference[id] = Some(key);
                    }
                }
                1 => {
                    let id = rng.gen_range(0..n);
                    if let Some(old) = reference[id] {
                        let key = rng.gen_range(0..=old);
                        heap.decrease_key(Item { key, id });
                        reference[id] = Some(key);
                    }
                }
                _ => {
                    let expected = reference.iter().enumerate().filter_map(|(id, key)| key.map(|key| Item { key, id })).min();
                    let actual = heap.pop();
                    assert_eq!(actual, expected);
                    if let Some(item) = actual {
                        reference[item.id] = None;
                        popped[item.id] = true;
                    }
                }
            }
            assert_eq!(heap.len(), reference.iter().filter(|key| key.is_some()).count());
        }
    }
}
