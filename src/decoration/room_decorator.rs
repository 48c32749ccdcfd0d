// SPDX-License-Identifier: MIT
//
// Copyright (c) 2025 Alexandre Severino
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::LevelTheme;
use crate::decoration::warehouse::make_warehouse;
use crate::maps::dungeon::Dungeon;
use crate::rng::SeededRng;
use crate::tile::TileType;

const CRACK_SHARE: f32 = 0.05;
const LOOSE_SHARE: f32 = 0.2;
/// Rooms below this area get a decoration patch.
const SMALL_ROOM_AREA: i32 = 24;
/// Torch placement block edge.
const TORCH_BLOCK: i32 = 8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FloorHint {
    #[default]
    None,
    LooseTile,
    Cracked,
    Fireplace,
    SkipMesh,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallHint {
    #[default]
    None,
    Torch,
    AccentWall,
    Window,
    SkipMesh,
}

/// Free-standing prop in room-local, fractional coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneryHint {
    pub x: f32,
    pub y: f32,
    pub name: String,
    pub group: u32,
    pub variant: u32,
    pub angle: f32,
    pub scale: Option<f32>,
    pub height: Option<f32>,
}

/// Per-room decoration hints.
///
/// `walls` is padded by one cell on each side: the wall cell left of the
/// room's first column is `walls[y + 1][0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct HintMap {
    pub floor: Vec<Vec<FloorHint>>,
    pub walls: Vec<Vec<WallHint>>,
    pub scenery: Vec<SceneryHint>,
    pub round_corners: bool,
}

impl HintMap {
    pub fn empty(width: i32, height: i32) -> Self {
        Self {
            floor: vec![vec![FloorHint::None; width as usize]; height as usize],
            walls: vec![vec![WallHint::None; width as usize + 2]; height as usize + 2],
            scenery: Vec::new(),
            round_corners: false,
        }
    }

    /// Floor hint at room-local cell, `None` outside the room.
    pub fn floor_at(&self, x: i32, y: i32) -> FloorHint {
        if x < 0 || y < 0 {
            return FloorHint::None;
        }
        self.floor
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .copied()
            .unwrap_or_default()
    }

    /// Wall hint at room-local cell, where -1 and `width`/`height` address
    /// the surrounding walls.
    pub fn wall_at(&self, x: i32, y: i32) -> WallHint {
        if x < -1 || y < -1 {
            return WallHint::None;
        }
        self.walls
            .get((y + 1) as usize)
            .and_then(|row| row.get((x + 1) as usize))
            .copied()
            .unwrap_or_default()
    }

    pub fn count_floor(&self, hint: FloorHint) -> usize {
        self.floor.iter().flatten().filter(|h| **h == hint).count()
    }

    pub fn count_walls(&self, hint: WallHint) -> usize {
        self.walls.iter().flatten().filter(|h| **h == hint).count()
    }
}

/// Seeded room decorator. One random stream (`"<seed>_room"`) is shared by
/// all rooms, so rooms must be decorated in index order.
pub struct RoomDecorator {
    theme: LevelTheme,
    rng: SeededRng,
}

impl RoomDecorator {
    pub fn new(seed: &str, theme: LevelTheme) -> Self {
        Self {
            theme,
            rng: SeededRng::named(seed, "room"),
        }
    }

    pub fn make_hint_map(&mut self, dungeon: &Dungeon, room_index: usize) -> HintMap {
        let room = &dungeon.rooms[room_index];
        let mut hints = HintMap::empty(room.width, room.height);

        self.place_random_floor(room.width, room.height, &mut hints);

        if room.area() >= SMALL_ROOM_AREA {
            debug!("room {room_index}: large");
        } else {
            debug!("room {room_index}: small");
            make_warehouse(&mut self.rng, room.width, room.height, &mut hints.scenery);
        }

        self.place_torches(dungeon, room_index, &mut hints);
        hints.round_corners = self.rng.chance(0.5);

        hints
    }

    fn place_random_floor(&mut self, width: i32, height: i32, hints: &mut HintMap) {
        if self.theme == LevelTheme::Cave {
            return;
        }
        let area = (width * height) as f32;
        let cracks = (area * CRACK_SHARE).floor() as usize;
        let loose = (area * LOOSE_SHARE).floor() as usize;
        for (quota, hint) in [(cracks, FloorHint::Cracked), (loose, FloorHint::LooseTile)] {
            for _ in 0..quota {
                let x = self.rng.index(width) as usize;
                let y = self.rng.index(height) as usize;
                hints.floor[y][x] = hint;
            }
        }
    }

    fn place_torches(&mut self, dungeon: &Dungeon, room_index: usize, hints: &mut HintMap) {
        let room = &dungeon.rooms[room_index];
        let blocks_x = (room.width + TORCH_BLOCK - 1) / TORCH_BLOCK;
        let blocks_y = (room.height + TORCH_BLOCK - 1) / TORCH_BLOCK;
        let size = TorchBlock {
            width: (room.width + blocks_x - 1) / blocks_x,
            height: (room.height + blocks_y - 1) / blocks_y,
        };

        // (far side, vertical wall)
        let mut tasks = [(false, false), (false, true), (true, false), (true, true)];
        if room.height > room.width || (room.width == room.height && self.rng.chance(0.5)) {
            tasks.swap(0, 1);
            tasks.swap(2, 3);
        }

        for by in 0..blocks_y {
            for bx in 0..blocks_x {
                let start_x = bx * size.width;
                let start_y = by * size.height;
                let placed = tasks.iter().any(|(far, vertical)| {
                    place_wall_torch(dungeon, room_index, hints, &size, start_x, start_y, *far, *vertical)
                });
                if !placed {
                    let fx = (start_x + size.width / 2) as usize;
                    let fy = (start_y + size.height / 2) as usize;
                    if let Some(cell) = hints.floor.get_mut(fy).and_then(|row| row.get_mut(fx)) {
                        *cell = FloorHint::Fireplace;
                    }
                }
            }
        }
    }
}

struct TorchBlock {
    width: i32,
    height: i32,
}

/// Scans the block's wall from its middle outwards for a wall cell not
/// taken by a link opening, and puts a torch there.
#[allow(clippy::too_many_arguments)]
fn place_wall_torch(
    dungeon: &Dungeon,
    room_index: usize,
    hints: &mut HintMap,
    size: &TorchBlock,
    bx: i32,
    by: i32,
    far: bool,
    vertical: bool,
) -> bool {
    let room = &dungeon.rooms[room_index];
    let (span, extent, block_start, block_len) = if vertical {
        (room.width, room.height, by, size.height)
    } else {
        (room.height, room.width, bx, size.width)
    };
    let near = if vertical { bx } else { by };
    let block_across = if vertical { size.width } else { size.height };

    let opp = if far { near + block_across } else { near - 1 }.clamp(-1, span);
    if opp != -1 && opp != span {
        return false;
    }

    for i in 0..=block_len {
        for d in [-1, 1] {
            let along = block_start + block_len / 2 + i * d;
            if along < 0 || along >= extent {
                continue;
            }

            let (wx, wy) = if vertical { (opp, along) } else { (along, opp) };
            let (map_x, map_y) = (wx + room.x, wy + room.y);
            let covered = room.links.iter().find_map(|l| {
                let link = &dungeon.links[*l];
                if link.vertical == vertical {
                    link.tile_at(map_x, map_y)
                } else {
                    None
                }
            });
            if matches!(covered, Some(t) if t != TileType::Wall) {
                continue;
            }

            hints.walls[(wy + 1) as usize][(wx + 1) as usize] = WallHint::Torch;
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maps::debug_generator::DebugDungeonGenerator;
    use crate::maps::dungeon::Room;
    use crate::maps::dungeon_generator::{DungeonGenerator, SimpleDungeonGenerator};
    use crate::tile_map::BlockMap;

    fn single_room(width: i32, height: i32) -> Dungeon {
        let mut dungeon = Dungeon {
            width: 40,
            height: 40,
            rooms: vec![Room::new(1, 1, width, height)],
            links: Vec::new(),
            map: BlockMap::new(40, 40),
            start_room: 0,
            end_room: 0,
        };
        dungeon.flatten();
        dungeon
    }

    #[test]
    fn hint_grids_have_padded_walls() {
        let dungeon = single_room(5, 3);
        let hints = RoomDecorator::new("test", LevelTheme::Castle).make_hint_map(&dungeon, 0);
        assert_eq!(hints.floor.len(), 3);
        assert_eq!(hints.floor[0].len(), 5);
        assert_eq!(hints.walls.len(), 5);
        assert_eq!(hints.walls[0].len(), 7);
    }

    #[test]
    fn every_block_gets_a_light() {
        let dungeon = single_room(17, 9);
        let hints = RoomDecorator::new("torches", LevelTheme::Castle).make_hint_map(&dungeon, 0);
        let lights = hints.count_walls(WallHint::Torch) + hints.count_floor(FloorHint::Fireplace);
        // 3 x 2 blocks
        assert_eq!(lights, 6);
        for row in &hints.walls[1..hints.walls.len() - 1] {
            for hint in &row[1..row.len() - 1] {
                assert_eq!(*hint, WallHint::None);
            }
        }
    }

    #[test]
    fn torches_avoid_door_cells() {
        let dungeon = DebugDungeonGenerator::new(20, 20).generate().unwrap();
        for seed in ["a", "b", "c", "d", "e", "f"] {
            let hints = RoomDecorator::new(seed, LevelTheme::Castle).make_hint_map(&dungeon, 0);
            // Door of room 0 sits below local cell (2, 3).
            assert_eq!(hints.wall_at(2, 4), WallHint::None);
        }
    }

    #[test]
    fn cave_floors_stay_plain() {
        let dungeon = single_room(10, 10);
        let hints = RoomDecorator::new("test", LevelTheme::Cave).make_hint_map(&dungeon, 0);
        assert_eq!(hints.count_floor(FloorHint::Cracked), 0);
        assert_eq!(hints.count_floor(FloorHint::LooseTile), 0);

        let hints = RoomDecorator::new("test", LevelTheme::Crypt).make_hint_map(&dungeon, 0);
        let scattered = hints.count_floor(FloorHint::Cracked) + hints.count_floor(FloorHint::LooseTile);
        assert!(scattered > 0 && scattered <= 25);
    }

    #[test]
    fn decoration_is_reproducible() {
        let dungeon = SimpleDungeonGenerator::new("test", 30, 30).generate().unwrap();
        let decorate = || {
            let mut decorator = RoomDecorator::new("test", LevelTheme::Castle);
            (0..dungeon.rooms.len())
                .map(|i| decorator.make_hint_map(&dungeon, i))
                .collect::<Vec<_>>()
        };
        assert_eq!(decorate(), decorate());
    }
}
