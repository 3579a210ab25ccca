//! Triangular adjacency storage for sparse pairwise connections
//!
//! Muscles connect unordered pairs of distinct node indices, so only one
//! half of the symmetric matrix is stored: `size * (size - 1) / 2` slots
//! in triangular row-major order.

/// Sparse half-matrix mapping an unordered pair of distinct indices to an
/// optional value.
///
/// Every slot carries an explicit defined/undefined flag (`Option`), so a
/// deliberately stored value that happens to equal the type's default is
/// still reported as present.
#[derive(Debug, Clone)]
pub struct AdjacencyMatrix<T> {
    size: usize,
    elements: Vec<Option<T>>,
}

impl<T> AdjacencyMatrix<T> {
    /// Allocate an empty matrix over indices `[0, size)`.
    pub fn new(size: usize) -> Self {
        let slots = (size * size.saturating_sub(1)) / 2;
        let mut elements = Vec::with_capacity(slots);
        elements.resize_with(slots, || None);
        Self { size, elements }
    }

    /// Number of indices the matrix spans.
    pub fn size(&self) -> usize {
        self.size
    }

    // Triangular offset for row > col:
    // [ * - - - ]
    // [ 0 * - - ]
    // [ 1 2 * - ]
    // [ 3 4 5 * ]
    fn to_index(row: usize, col: usize) -> usize {
        (row * (row - 1)) / 2 + col
    }

    fn in_range(&self, a: usize, b: usize) -> bool {
        a != b && a < self.size && b < self.size
    }

    /// Value stored for the unordered pair `(a, b)`.
    ///
    /// Self-pairs and out-of-range indices yield `None` rather than an
    /// error; graph algorithms lean on this for boundary safety.
    pub fn get(&self, a: usize, b: usize) -> Option<&T> {
        if !self.in_range(a, b) {
            return None;
        }
        self.elements[Self::to_index(a.max(b), a.min(b))].as_ref()
    }

    /// Store a value for the unordered pair `(a, b)`.
    ///
    /// Self-pairs and out-of-range indices are silently ignored.
    pub fn set(&mut self, a: usize, b: usize, value: T) {
        if !self.in_range(a, b) {
            return;
        }
        self.elements[Self::to_index(a.max(b), a.min(b))] = Some(value);
    }

    /// Remove any value stored for the unordered pair `(a, b)`.
    pub fn clear(&mut self, a: usize, b: usize) {
        if !self.in_range(a, b) {
            return;
        }
        self.elements[Self::to_index(a.max(b), a.min(b))] = None;
    }

    /// All defined values touching index `i`, in ascending order of the
    /// other index.
    pub fn neighbors_of(&self, i: usize) -> Vec<&T> {
        if i >= self.size {
            return Vec::new();
        }

        let mut neighbors = Vec::new();

        // Row scan: pairs (i, j) for j < i
        if i > 0 {
            let row_start = Self::to_index(i, 0);
            for slot in &self.elements[row_start..row_start + i] {
                if let Some(value) = slot {
                    neighbors.push(value);
                }
            }
        }

        // Column scan: pairs (k, i) for k > i
        let mut row = i + 1;
        let mut index = if row < self.size {
            Self::to_index(row, i)
        } else {
            self.elements.len()
        };
        while index < self.elements.len() {
            if let Some(value) = &self.elements[index] {
                neighbors.push(value);
            }
            index += row;
            row += 1;
        }

        neighbors
    }

    /// All defined values in storage order (triangular row-major).
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.elements.iter().filter_map(|slot| slot.as_ref())
    }

    /// Number of defined entries.
    pub fn len(&self) -> usize {
        self.elements.iter().filter(|slot| slot.is_some()).count()
    }

    /// True when no entry is defined.
    pub fn is_empty(&self) -> bool {
        self.elements.iter().all(|slot| slot.is_none())
    }
}
