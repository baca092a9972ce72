//! Breadth-first shortest paths over the walkable grid.

use std::collections::VecDeque;

use maze_rescue_core::{CellCoord, Direction};

/// Computes a minimum-hop route between two cells.
///
/// The search expands neighbours in [`Direction::ALL`] order, which fixes the
/// tie-break between equally short routes. The returned tiles exclude `from`
/// and end with `to`. An empty route means `to` is unreachable (or equals
/// `from`). The origin itself does not need to be walkable.
#[must_use]
pub fn shortest_path<F>(
    width: u32,
    height: u32,
    from: CellCoord,
    to: CellCoord,
    mut is_walkable: F,
) -> Vec<CellCoord>
where
    F: FnMut(CellCoord) -> bool,
{
    let width_usize = usize::try_from(width).unwrap_or(0);
    let height_usize = usize::try_from(height).unwrap_or(0);
    let cell_count = width_usize.checked_mul(height_usize).unwrap_or(0);

    if cell_count == 0 || from == to {
        return Vec::new();
    }
    if !in_bounds(from, width, height) || !in_bounds(to, width, height) || !is_walkable(to) {
        return Vec::new();
    }

    let (Some(start), Some(goal)) = (index(width_usize, from), index(width_usize, to)) else {
        return Vec::new();
    };

    let mut parents: Vec<Option<usize>> = vec![None; cell_count];
    let mut visited = vec![false; cell_count];
    visited[start] = true;

    let mut queue = VecDeque::new();
    queue.push_back(from);

    while let Some(cell) = queue.pop_front() {
        let Some(current) = index(width_usize, cell) else {
            continue;
        };
        if current == goal {
            break;
        }

        for neighbor in neighbors(cell, width, height) {
            let Some(neighbor_index) = index(width_usize, neighbor) else {
                continue;
            };
            if visited[neighbor_index] || !is_walkable(neighbor) {
                continue;
            }

            visited[neighbor_index] = true;
            parents[neighbor_index] = Some(current);
            queue.push_back(neighbor);
        }
    }

    if !visited[goal] {
        return Vec::new();
    }

    let mut path = Vec::new();
    let mut cursor = goal;
    while cursor != start {
        path.push(cell_at(width_usize, cursor));
        match parents[cursor] {
            Some(parent) => cursor = parent,
            None => return Vec::new(),
        }
    }
    path.reverse();
    path
}

/// First tile of the shortest route from `from` to `to`, if one exists.
#[must_use]
pub fn next_hop<F>(
    width: u32,
    height: u32,
    from: CellCoord,
    to: CellCoord,
    is_walkable: F,
) -> Option<CellCoord>
where
    F: FnMut(CellCoord) -> bool,
{
    shortest_path(width, height, from, to, is_walkable)
        .first()
        .copied()
}

fn neighbors(cell: CellCoord, width: u32, height: u32) -> impl Iterator<Item = CellCoord> {
    Direction::ALL
        .into_iter()
        .filter_map(move |direction| cell.neighbor(direction))
        .filter(move |neighbor| in_bounds(*neighbor, width, height))
}

fn in_bounds(cell: CellCoord, width: u32, height: u32) -> bool {
    cell.column() < width && cell.row() < height
}

fn index(width: usize, cell: CellCoord) -> Option<usize> {
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}

fn cell_at(width: usize, index: usize) -> CellCoord {
    let width = width.max(1);
    CellCoord::new(
        u32::try_from(index % width).unwrap_or(u32::MAX),
        u32::try_from(index / width).unwrap_or(u32::MAX),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_grid_path_has_manhattan_length() {
        let from = CellCoord::new(0, 0);
        let to = CellCoord::new(3, 2);
        let path = shortest_path(4, 3, from, to, |_| true);

        assert_eq!(path.len(), 5);
        assert_eq!(path.last(), Some(&to));
        let mut previous = from;
        for cell in &path {
            assert_eq!(previous.manhattan_distance(*cell), 1);
            previous = *cell;
        }
    }

    #[test]
    fn ties_break_toward_north_then_east() {
        let path = shortest_path(3, 3, CellCoord::new(1, 1), CellCoord::new(2, 0), |_| true);
        assert_eq!(path, vec![CellCoord::new(1, 0), CellCoord::new(2, 0)]);
    }

    #[test]
    fn detours_around_walls() {
        let wall = CellCoord::new(1, 1);
        let path = shortest_path(3, 3, CellCoord::new(1, 0), CellCoord::new(1, 2), |cell| {
            cell != wall
        });
        assert_eq!(path.len(), 4);
        assert!(!path.contains(&wall));
    }

    #[test]
    fn unreachable_destination_yields_empty_route() {
        let path = shortest_path(3, 3, CellCoord::new(0, 0), CellCoord::new(2, 2), |cell| {
            cell.column() != 1
        });
        assert!(path.is_empty());
    }

    #[test]
    fn next_hop_is_first_route_tile() {
        assert_eq!(
            next_hop(5, 1, CellCoord::new(0, 0), CellCoord::new(4, 0), |_| true),
            Some(CellCoord::new(1, 0))
        );
        assert_eq!(
            next_hop(5, 1, CellCoord::new(2, 0), CellCoord::new(2, 0), |_| true),
            None
        );
    }
}
