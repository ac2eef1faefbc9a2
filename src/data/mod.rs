pub mod items;
pub mod monsters;

/// `(first floor, value)` steps: the value of the last step whose floor is
/// not deeper than `floor` applies.
pub fn value_for_floor(table: &[(u32, i32)], floor: u32) -> i32 {
    table
        .iter()
        .take_while(|(from, _)| *from <= floor)
        .last()
        .map(|(_, value)| *value)
        .unwrap_or(0)
}

pub const MAX_ROOMS_BY_FLOOR: [(u32, i32); 5] = [(0, 6), (2, 9), (4, 12), (7, 16), (10, 20)];
pub const MAX_MONSTERS_BY_FLOOR: [(u32, i32); 4] = [(0, 2), (4, 3), (6, 4), (9, 5)];
pub const MAX_ITEMS_BY_FLOOR: [(u32, i32); 3] = [(0, 1), (4, 2), (8, 3)];
