use fnv::FnvHasher;
use std::collections::HashMap;
use std::hash::BuildHasher;

use crate::math::{Point, Real, Vector, DIM};

/// A hasher state with a fixed key, making the iteration order of hash maps reproducible.
#[derive(Copy, Clone, Debug, Default)]
pub struct DeterministicState;

impl BuildHasher for DeterministicState {
    type Hasher = FnvHasher;

    fn build_hasher(&self) -> FnvHasher {
        FnvHasher::with_key(1820)
    }
}

/// A grid based on spatial hashing.
#[derive(PartialEq, Debug, Clone)]
pub struct HGrid<T> {
    cells: HashMap<Point<i64>, Vec<T>, DeterministicState>,
    cell_width: Real,
}

impl<T> HGrid<T> {
    /// Initialize a grid where each cell has the width `cell_width`.
    pub fn new(cell_width: Real) -> Self {
        Self {
            cells: HashMap::with_hasher(DeterministicState),
            cell_width,
        }
    }

    /// The width of every cell.
    pub fn cell_width(&self) -> Real {
        self.cell_width
    }

    /// Removes all elements from this grid and changes its cell width.
    pub fn reset(&mut self, cell_width: Real) {
        self.cells.clear();
        self.cell_width = cell_width;
    }

    fn quantify(value: Real, cell_width: Real) -> i64 {
        (value / cell_width).floor() as i64
    }

    fn quantify_ceil(value: Real, cell_width: Real) -> i64 {
        (value / cell_width).ceil() as i64
    }

    /// The identifier of the cell containing `point`.
    pub fn key(&self, point: &Point<Real>) -> Point<i64> {
        Point::from(point.coords.map(|e| Self::quantify(e, self.cell_width)))
    }

    /// Inserts the given `element` into the cell containing the given `point`.
    pub fn insert(&mut self, point: &Point<Real>, element: T) {
        let key = self.key(point);
        self.cells.entry(key).or_default().push(element)
    }

    /// The number of non-empty cells.
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    /// An iterator through all the neighbors of the given cell.
    ///
    /// The given cell itself will be yielded by this iterator too.
    pub fn neighbor_cells(
        &self,
        cell: &Point<i64>,
        radius: Real,
    ) -> impl Iterator<Item = (Point<i64>, &Vec<T>)> {
        let cells = &self.cells;
        let quantified_radius = Self::quantify_ceil(radius, self.cell_width);

        CellRangeIterator::with_center(*cell, quantified_radius)
            .filter_map(move |cell| cells.get(&cell).map(|c| (cell, c)))
    }

    /// An iterator through the elements of all the cells touching a ball.
    ///
    /// Every element within `radius` of `center` is yielded, together with some elements that may
    /// be farther away.
    pub fn elements_near_point(
        &self,
        center: &Point<Real>,
        radius: Real,
    ) -> impl Iterator<Item = &T> {
        let key = self.key(center);
        self.neighbor_cells(&key, radius)
            .flat_map(|(_, elts)| elts.iter())
    }
}

struct CellRangeIterator {
    start: Point<i64>,
    end: Point<i64>,
    curr: Point<i64>,
    done: bool,
}

impl CellRangeIterator {
    fn with_center(center: Point<i64>, radius: i64) -> Self {
        let start = center - Vector::repeat(radius);
        Self {
            start,
            end: center + Vector::repeat(radius),
            curr: start,
            done: false,
        }
    }
}

impl Iterator for CellRangeIterator {
    type Item = Point<i64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if self.curr == self.end {
            self.done = true;
            Some(self.curr)
        } else {
            let result = self.curr;

            for i in 0..DIM {
                self.curr[i] += 1;

                if self.curr[i] > self.end[i] {
                    self.curr[i] = self.start[i];
                } else {
                    break;
                }
            }

            Some(result)
        }
    }
}

#[cfg(test)]
mod test {
    use super::{CellRangeIterator, HGrid};
    use crate::math::Point;

    #[test]
    fn grid_neighbor_iterator() {
        let cells: Vec<_> = CellRangeIterator::with_center(Point::new(1, 2, 0), 1).collect();

        assert_eq!(cells.len(), 27);
        assert_eq!(cells[0], Point::new(0, 1, -1));
        assert_eq!(cells[1], Point::new(1, 1, -1));
        assert_eq!(cells[3], Point::new(0, 2, -1));
        assert_eq!(cells[9], Point::new(0, 1, 0));
        assert_eq!(cells[26], Point::new(2, 3, 1));
    }

    #[test]
    fn nearby_elements_are_found() {
        let mut grid = HGrid::new(4.0);
        grid.insert(&Point::new(1.0, 1.0, 1.0), 0);
        grid.insert(&Point::new(5.0, 1.0, 1.0), 1);
        grid.insert(&Point::new(30.0, 1.0, 1.0), 2);

        let mut found: Vec<_> = grid
            .elements_near_point(&Point::new(2.0, 2.0, 2.0), 4.0)
            .copied()
            .collect();
        found.sort_unstable();
        assert_eq!(found, vec![0, 1]);
        assert_eq!(grid.num_cells(), 3);

        grid.reset(8.0);
        assert_eq!(grid.num_cells(), 0);
        assert_eq!(grid.cell_width(), 8.0);
        assert_eq!(grid.elements_near_point(&Point::new(2.0, 2.0, 2.0), 4.0).count(), 0);
    }
}
