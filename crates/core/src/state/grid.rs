use arrayvec::ArrayVec;
use strum::IntoEnumIterator;

use super::{EntityId, Position};

/// Parallel occupancy planes sharing one coordinate space.
///
/// Iteration order (via `Layer::iter`) is bottom to top, which is also the
/// order `column_at` reports occupants in.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::EnumIter,
    strum::Display,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Layer {
    Ground,
    Constructions,
    Items,
    Actors,
}

impl Layer {
    pub const COUNT: usize = 4;

    fn index(self) -> usize {
        match self {
            Layer::Ground => 0,
            Layer::Constructions => 1,
            Layer::Items => 2,
            Layer::Actors => 3,
        }
    }
}

/// Buffer returned by column scans: at most one occupant per layer.
pub type ColumnSlots = ArrayVec<EntityId, { Layer::COUNT }>;

/// Buffer returned by neighborhood scans: at most 8 surrounding occupants.
pub type NeighborSlots = ArrayVec<EntityId, 8>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("position {position} is outside the {width}x{height} grid")]
    OutOfBounds {
        position: Position,
        width: u32,
        height: u32,
    },
}

/// Fixed-size multi-layer occupancy store.
///
/// The grid is purely spatial: it knows which entity id sits in which cell
/// and nothing about what the entity is. Legality of movement (passability,
/// collision) is decided by the callers in the action layer. A cell holds at
/// most one entity per layer and `place` overwrites.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: [Vec<Option<EntityId>>; Layer::COUNT],
}

impl Grid {
    pub fn new(width: u32, height: u32) -> Self {
        let plane = vec![None; (width * height) as usize];
        Self {
            width,
            height,
            cells: [plane.clone(), plane.clone(), plane.clone(), plane],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }

    fn cell_index(&self, position: Position) -> Result<usize, GridError> {
        if !self.contains(position) {
            return Err(GridError::OutOfBounds {
                position,
                width: self.width,
                height: self.height,
            });
        }
        Ok((position.y as u32 * self.width + position.x as u32) as usize)
    }

    /// Puts an entity into a cell, returning whatever previously occupied it.
    ///
    /// No implicit stacking: a prior occupant is evicted, not layered under.
    pub fn place(
        &mut self,
        entity: EntityId,
        layer: Layer,
        position: Position,
    ) -> Result<Option<EntityId>, GridError> {
        let index = self.cell_index(position)?;
        Ok(self.cells[layer.index()][index].replace(entity))
    }

    /// Moves the occupant of `from` to `to`, clearing `from`.
    ///
    /// Deliberately does no legality checking; passability and collision are
    /// the action layer's responsibility.
    pub fn relocate(
        &mut self,
        layer: Layer,
        from: Position,
        to: Position,
    ) -> Result<Option<EntityId>, GridError> {
        let from_index = self.cell_index(from)?;
        let to_index = self.cell_index(to)?;
        let moved = self.cells[layer.index()][from_index].take();
        self.cells[layer.index()][to_index] = moved;
        Ok(moved)
    }

    /// Bounds-checked occupant lookup.
    pub fn occupant(&self, layer: Layer, position: Position) -> Result<Option<EntityId>, GridError> {
        let index = self.cell_index(position)?;
        Ok(self.cells[layer.index()][index])
    }

    /// Occupant lookup for scan call sites: out of bounds reads as empty.
    pub fn occupant_or_empty(&self, layer: Layer, position: Position) -> Option<EntityId> {
        self.occupant(layer, position).ok().flatten()
    }

    pub fn is_occupied(&self, layer: Layer, position: Position) -> Result<bool, GridError> {
        Ok(self.occupant(layer, position)?.is_some())
    }

    /// Clears a cell, returning the removed occupant if any.
    pub fn clear(&mut self, layer: Layer, position: Position) -> Result<Option<EntityId>, GridError> {
        let index = self.cell_index(position)?;
        Ok(self.cells[layer.index()][index].take())
    }

    /// In-bounds positions of the 8-neighborhood around a cell.
    ///
    /// The query cell itself is excluded and out-of-bounds neighbors are
    /// silently skipped, so border cells simply have fewer neighbors.
    pub fn neighbor_positions(&self, position: Position) -> ArrayVec<Position, 8> {
        let mut out = ArrayVec::new();
        for dx in -1..=1 {
            for dy in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let candidate = Position::new(position.x + dx, position.y + dy);
                if self.contains(candidate) {
                    out.push(candidate);
                }
            }
        }
        out
    }

    /// Occupants of the 8 surrounding cells on one layer.
    pub fn neighbors_of(&self, position: Position, layer: Layer) -> NeighborSlots {
        self.neighbor_positions(position)
            .into_iter()
            .filter_map(|p| self.occupant_or_empty(layer, p))
            .collect()
    }

    /// Occupants across all layers at one cell, bottom to top.
    ///
    /// Used by collision and explosion sweeps; out of bounds reads as an
    /// empty column.
    pub fn column_at(&self, position: Position) -> ColumnSlots {
        Layer::iter()
            .filter_map(|layer| self.occupant_or_empty(layer, position))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_then_lookup_returns_entity() {
        let mut grid = Grid::new(4, 4);
        let position = Position::new(2, 1);
        grid.place(EntityId(7), Layer::Items, position).unwrap();
        assert_eq!(grid.occupant(Layer::Items, position).unwrap(), Some(EntityId(7)));
        assert_eq!(grid.occupant(Layer::Actors, position).unwrap(), None);
    }

    #[test]
    fn place_overwrites_prior_occupant() {
        let mut grid = Grid::new(3, 3);
        let position = Position::new(0, 0);
        grid.place(EntityId(1), Layer::Actors, position).unwrap();
        let evicted = grid.place(EntityId(2), Layer::Actors, position).unwrap();
        assert_eq!(evicted, Some(EntityId(1)));
        assert_eq!(grid.occupant(Layer::Actors, position).unwrap(), Some(EntityId(2)));
    }

    #[test]
    fn clear_empties_cell() {
        let mut grid = Grid::new(3, 3);
        let position = Position::new(1, 1);
        grid.place(EntityId(9), Layer::Constructions, position).unwrap();
        assert_eq!(grid.clear(Layer::Constructions, position).unwrap(), Some(EntityId(9)));
        assert_eq!(grid.occupant(Layer::Constructions, position).unwrap(), None);
    }

    #[test]
    fn direct_access_out_of_bounds_is_an_error() {
        let grid = Grid::new(3, 3);
        assert!(matches!(
            grid.occupant(Layer::Ground, Position::new(3, 0)),
            Err(GridError::OutOfBounds { .. })
        ));
        assert!(matches!(
            grid.occupant(Layer::Ground, Position::new(0, -1)),
            Err(GridError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn scan_access_out_of_bounds_reads_empty() {
        let grid = Grid::new(3, 3);
        assert_eq!(grid.occupant_or_empty(Layer::Ground, Position::new(-1, -1)), None);
        assert!(grid.column_at(Position::new(10, 10)).is_empty());
    }

    #[test]
    fn relocate_clears_origin() {
        let mut grid = Grid::new(3, 3);
        let from = Position::new(0, 0);
        let to = Position::new(2, 2);
        grid.place(EntityId(4), Layer::Actors, from).unwrap();
        grid.relocate(Layer::Actors, from, to).unwrap();
        assert_eq!(grid.occupant(Layer::Actors, from).unwrap(), None);
        assert_eq!(grid.occupant(Layer::Actors, to).unwrap(), Some(EntityId(4)));
    }

    #[test]
    fn corner_cell_has_three_neighbors() {
        let grid = Grid::new(3, 3);
        assert_eq!(grid.neighbor_positions(Position::ORIGIN).len(), 3);
        assert_eq!(grid.neighbor_positions(Position::new(1, 1)).len(), 8);
    }

    #[test]
    fn column_reports_bottom_to_top() {
        let mut grid = Grid::new(3, 3);
        let position = Position::new(1, 1);
        grid.place(EntityId(30), Layer::Actors, position).unwrap();
        grid.place(EntityId(10), Layer::Ground, position).unwrap();
        grid.place(EntityId(20), Layer::Items, position).unwrap();
        let column: Vec<_> = grid.column_at(position).into_iter().collect();
        assert_eq!(column, vec![EntityId(10), EntityId(20), EntityId(30)]);
    }
}
