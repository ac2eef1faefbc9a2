pub mod generation;

use bracket_geometry::prelude::Point;
use bracket_pathfinding::prelude::{Algorithm2D, BaseMap, DistanceAlg, field_of_view};
use bracket_terminal::prelude::{BLACK, RGB};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    Wall,
    Floor,
    DownStairs,
}

impl TileKind {
    pub fn walkable(self) -> bool {
        !matches!(self, TileKind::Wall)
    }

    pub fn transparent(self) -> bool {
        !matches!(self, TileKind::Wall)
    }

    pub fn glyph(self) -> u16 {
        match self {
            TileKind::Wall => b'#' as u16,
            TileKind::Floor => b'.' as u16,
            TileKind::DownStairs => b'>' as u16,
        }
    }

    /// Foreground and background while the tile is in view.
    pub fn light(self) -> (RGB, RGB) {
        match self {
            TileKind::Wall => (RGB::from_u8(130, 110, 50), RGB::from_u8(0, 0, 100)),
            TileKind::Floor => (RGB::from_u8(200, 180, 50), RGB::named(BLACK)),
            TileKind::DownStairs => (RGB::from_u8(255, 255, 255), RGB::from_u8(200, 180, 50)),
        }
    }

    /// Colours used for remembered (explored, out of view) tiles.
    pub fn dark(self) -> (RGB, RGB) {
        match self {
            TileKind::Wall => (RGB::from_u8(90, 90, 90), RGB::named(BLACK)),
            TileKind::Floor => (RGB::from_u8(60, 60, 60), RGB::named(BLACK)),
            TileKind::DownStairs => (RGB::from_u8(0, 0, 100), RGB::from_u8(50, 50, 150)),
        }
    }
}

/// Terrain and observation layers of the current floor.
///
/// `visible` is rebuilt from scratch by [`GameMap::update_fov`]; `explored`
/// only ever gains cells, and every visible cell is also explored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameMap {
    pub width: i32,
    pub height: i32,
    tiles: Vec<TileKind>,
    visible: Vec<bool>,
    explored: Vec<bool>,
    downstairs: (i32, i32),
}

impl GameMap {
    pub fn new(width: i32, height: i32) -> Self {
        let size = (width.max(0) * height.max(0)) as usize;
        Self {
            width,
            height,
            tiles: vec![TileKind::Wall; size],
            visible: vec![false; size],
            explored: vec![false; size],
            downstairs: (0, 0),
        }
    }

    fn idx(&self, point: Point) -> Option<usize> {
        if self.in_bounds(point) {
            Some((point.y * self.width + point.x) as usize)
        } else {
            None
        }
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0 && point.x < self.width && point.y >= 0 && point.y < self.height
    }

    pub fn tile(&self, point: Point) -> Option<TileKind> {
        self.idx(point).map(|idx| self.tiles[idx])
    }

    pub fn set_tile(&mut self, point: Point, tile: TileKind) {
        if let Some(idx) = self.idx(point) {
            self.tiles[idx] = tile;
        }
    }

    pub fn is_walkable(&self, point: Point) -> bool {
        self.tile(point).is_some_and(TileKind::walkable)
    }

    pub fn is_transparent(&self, point: Point) -> bool {
        self.tile(point).is_some_and(TileKind::transparent)
    }

    pub fn is_visible(&self, point: Point) -> bool {
        self.idx(point).is_some_and(|idx| self.visible[idx])
    }

    pub fn is_explored(&self, point: Point) -> bool {
        self.idx(point).is_some_and(|idx| self.explored[idx])
    }

    pub fn descent_cell(&self) -> Point {
        Point::new(self.downstairs.0, self.downstairs.1)
    }

    /// Marks `point` as the descent cell and paints the stairs tile on it.
    pub fn place_downstairs(&mut self, point: Point) {
        self.downstairs = (point.x, point.y);
        self.set_tile(point, TileKind::DownStairs);
    }

    pub fn visible_layer(&self) -> &[bool] {
        &self.visible
    }

    pub fn explored_layer(&self) -> &[bool] {
        &self.explored
    }

    /// Recomputes the visible layer around `origin` and folds it into the
    /// explored layer.
    pub fn update_fov(&mut self, origin: Point, radius: i32) {
        let lit: Vec<usize> = field_of_view(origin, radius, &*self)
            .into_iter()
            .filter_map(|point| self.idx(point))
            .collect();

        self.visible.iter_mut().for_each(|cell| *cell = false);
        for idx in lit {
            self.visible[idx] = true;
            self.explored[idx] = true;
        }
    }

    pub fn clamp(&self, point: Point) -> Point {
        Point::new(
            point.x.clamp(0, (self.width - 1).max(0)),
            point.y.clamp(0, (self.height - 1).max(0)),
        )
    }
}

pub const EIGHT_WAY: [Point; 8] = [
    Point { x: 0, y: -1 },
    Point { x: 0, y: 1 },
    Point { x: -1, y: 0 },
    Point { x: 1, y: 0 },
    Point { x: -1, y: -1 },
    Point { x: 1, y: -1 },
    Point { x: -1, y: 1 },
    Point { x: 1, y: 1 },
];

impl BaseMap for GameMap {
    fn is_opaque(&self, idx: usize) -> bool {
        self.tiles.get(idx).is_none_or(|tile| !tile.transparent())
    }

    fn get_available_exits(&self, idx: usize) -> SmallVec<[(usize, f32); 10]> {
        let mut exits = SmallVec::new();
        let point = self.index_to_point2d(idx);
        for dir in EIGHT_WAY {
            let dest = Point::new(point.x + dir.x, point.y + dir.y);
            if self.is_walkable(dest) {
                let cost = if dir.x != 0 && dir.y != 0 { 1.45 } else { 1.0 };
                exits.push((self.point2d_to_index(dest), cost));
            }
        }
        exits
    }

    fn get_pathing_distance(&self, idx1: usize, idx2: usize) -> f32 {
        let p1 = self.index_to_point2d(idx1);
        let p2 = self.index_to_point2d(idx2);
        DistanceAlg::Pythagoras.distance2d(p1, p2)
    }
}

impl Algorithm2D for GameMap {
    fn dimensions(&self) -> Point {
        Point::new(self.width, self.height)
    }

    fn in_bounds(&self, point: Point) -> bool {
        GameMap::in_bounds(self, point)
    }
}
