use std::collections::VecDeque;

use maze_rescue_core::{CellCoord, Direction};
use maze_rescue_world::{shortest_path, Maze};

const CONNECTED: [&str; 7] = [
    "#########",
    "#P..%...#",
    "#.##.##.#",
    "#..o....#",
    "#.#.#.#.#",
    "#.....+@#",
    "#########",
];

fn walkable_cells(maze: &Maze) -> Vec<CellCoord> {
    (0..maze.rows())
        .flat_map(|row| (0..maze.columns()).map(move |column| CellCoord::new(column, row)))
        .filter(|cell| maze.is_walkable(*cell, false))
        .collect()
}

/// Reference hop distance computed with a plain flood fill.
fn flood_distance(maze: &Maze, from: CellCoord, to: CellCoord) -> Option<usize> {
    let mut seen = vec![from];
    let mut queue = VecDeque::from([(from, 0_usize)]);
    while let Some((cell, distance)) = queue.pop_front() {
        if cell == to {
            return Some(distance);
        }
        for direction in Direction::ALL {
            let Some(next) = maze.neighbor(cell, direction) else {
                continue;
            };
            if maze.is_walkable(next, false) && !seen.contains(&next) {
                seen.push(next);
                queue.push_back((next, distance + 1));
            }
        }
    }
    None
}

#[test]
fn path_lengths_match_flood_fill_for_every_pair() {
    let maze = Maze::parse(&CONNECTED).expect("layout parses");
    let cells = walkable_cells(&maze);
    assert!(cells.len() > 20);

    for from in &cells {
        for to in &cells {
            let path = shortest_path(maze.columns(), maze.rows(), *from, *to, |cell| {
                maze.is_walkable(cell, false)
            });
            let expected = flood_distance(&maze, *from, *to).expect("maze is connected");
            assert_eq!(path.len(), expected, "wrong length from {from:?} to {to:?}");

            let mut previous = *from;
            for cell in &path {
                assert_eq!(
                    previous.manhattan_distance(*cell),
                    1,
                    "route is not contiguous"
                );
                assert!(maze.is_walkable(*cell, false), "route crosses a wall");
                previous = *cell;
            }
            if from != to {
                assert_eq!(path.last(), Some(to));
            }
        }
    }
}

#[test]
fn walled_off_destination_yields_empty_route() {
    let maze = Maze::parse(&["#######", "#P..#.#", "#...#@#", "#######"]).expect("layout parses");
    let path = shortest_path(
        maze.columns(),
        maze.rows(),
        CellCoord::new(1, 1),
        CellCoord::new(5, 2),
        |cell| maze.is_walkable(cell, false),
    );
    assert!(path.is_empty());
}

#[test]
fn active_hazards_can_cut_a_route() {
    let maze = Maze::parse(&["######", "#P~.@#", "######"]).expect("layout parses");
    let from = CellCoord::new(1, 1);
    let to = CellCoord::new(4, 1);

    let open = shortest_path(maze.columns(), maze.rows(), from, to, |cell| {
        maze.is_walkable(cell, false)
    });
    assert_eq!(open.len(), 3);

    let blocked = shortest_path(maze.columns(), maze.rows(), from, to, |cell| {
        maze.is_walkable(cell, true)
    });
    assert!(blocked.is_empty());
}
