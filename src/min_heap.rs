/// Anything the heap can order. Only the weight takes part in comparisons;
/// equal weights keep whatever position the heap structure gives them.
pub trait Weighted {
    fn weight(&self) -> u64;
}

#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    elements: Vec<T>,
}

impl<T> MinHeap<T> {
    pub fn new() -> Self {
        MinHeap { elements: vec![] }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// The lightest element, without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.elements.first()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn parent(i: usize) -> usize {
        (i - 1) / 2
    }

    fn left(i: usize) -> usize {
        2 * i + 1
    }

    fn right(i: usize) -> usize {
        2 * i + 2
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HeapErr {
    #[error("extract_min called on an empty heap")]
    HeapUnderflow,
}

impl<T: Weighted> MinHeap<T> {
    /// Builds a heap by inserting every element in order.
    pub fn construct<I: IntoIterator<Item = T>>(source: I) -> Self {
        let mut heap = MinHeap::new();
        for element in source {
            heap.insert(element);
        }
        debug_assert!(heap.is_valid_min_heap());
        heap
    }

    pub fn is_valid_min_heap(&self) -> bool {
        (1..self.len())
            .all(|i| self.elements[Self::parent(i)].weight() <= self.elements[i].weight())
    }

    pub fn insert(&mut self, value: T) {
        self.elements.push(value);
        self.sift_up(self.len() - 1);
    }

    pub fn extract_min(&mut self) -> Result<T, HeapErr> {
        if self.is_empty() {
            return Err(HeapErr::HeapUnderflow);
        }
        let result = self.elements.swap_remove(0);
        if !self.is_empty() {
            self.sift_down(0);
        }
        Ok(result)
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let p = Self::parent(i);
            if self.elements[p].weight() > self.elements[i].weight() {
                self.elements.swap(p, i);
                i = p;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.len();
        loop {
            let l = Self::left(i);
            let r = Self::right(i);
            let weight = self.elements[i].weight();
            let mut smallest = i;

            if l < n && self.elements[l].weight() < weight {
                smallest = l;
            }
            // the right child only wins when it beats both the element and the left child
            if r < n
                && self.elements[r].weight() < weight
                && self.elements[r].weight() < self.elements[l].weight()
            {
                smallest = r;
            }

            if smallest == i {
                break;
            }
            self.elements.swap(i, smallest);
            i = smallest;
        }
    }
}

impl<T> Default for MinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item(u64, &'static str);

    impl Weighted for Item {
        fn weight(&self) -> u64 {
            self.0
        }
    }

    #[test]
    fn extract_min_is_non_decreasing() {
        let mut heap = MinHeap::construct([9, 4, 7, 1, 8, 2, 2, 6, 3, 5].map(|w| Item(w, "")));
        assert!(heap.is_valid_min_heap());

        let mut last = 0;
        while !heap.is_empty() {
            let item = heap.extract_min().unwrap();
            assert!(item.0 >= last, "{} came after {}", item.0, last);
            assert!(heap.is_valid_min_heap());
            last = item.0;
        }
    }

    #[test]
    fn empty_heap_underflows() {
        let mut heap: MinHeap<Item> = MinHeap::default();
        assert_eq!(heap.extract_min(), Err(HeapErr::HeapUnderflow));
    }

    #[test]
    fn single_element() {
        let mut heap = MinHeap::construct([Item(3, "x")]);
        assert_eq!(heap.len(), 1);
        assert_eq!(heap.extract_min().unwrap(), Item(3, "x"));
        assert!(heap.is_empty());
    }

    #[test]
    fn ties_follow_heap_structure() {
        // equal weights never bubble past each other, so the first arrival stays on top
        let mut heap = MinHeap::construct([Item(1, "first"), Item(1, "second")]);
        assert_eq!(heap.extract_min().unwrap().1, "first");
        assert_eq!(heap.extract_min().unwrap().1, "second");
    }

    #[test]
    fn insert_after_extract_keeps_order() {
        let mut heap = MinHeap::construct([5, 3, 8].map(|w| Item(w, "")));
        assert_eq!(heap.extract_min().unwrap().0, 3);
        heap.insert(Item(1, ""));
        heap.insert(Item(6, ""));
        let drained: Vec<u64> = std::iter::from_fn(|| heap.extract_min().ok())
            .map(|item| item.0)
            .collect();
        assert_eq!(drained, vec![1, 5, 6, 8]);
    }

    #[test]
    fn peek_leaves_heap_unchanged() {
        let mut heap: MinHeap<Item> = MinHeap::new();
        assert!(heap.peek().is_none());

        heap = MinHeap::construct([Item(4, "d"), Item(2, "b"), Item(3, "c")]);
        assert_eq!(heap.peek(), Some(&Item(2, "b")));
        assert_eq!(heap.len(), 3);

        heap.insert(Item(1, "a"));
        assert_eq!(heap.peek().map(|item| item.1), Some("a"));
        assert_eq!(heap.extract_min().unwrap(), Item(1, "a"));
        assert_eq!(heap.peek(), Some(&Item(2, "b")));
        assert_eq!(heap.len(), 3);
    }

    #[test]
    fn construct_large_input_is_valid() {
        let heap = MinHeap::construct((0..2_000u64).rev().map(|w| Item(w % 97, "")));
        assert_eq!(heap.len(), 2_000);
        assert!(heap.is_valid_min_heap());
        assert_eq!(heap.peek().map(|item| item.0), Some(0));
    }
}
