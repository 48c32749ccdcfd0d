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
use crate::decoration::{FloorHint, RoomDecorator, SceneryHint};
use crate::maps::dungeon::Dungeon;
use crate::rng::SeededRng;
use crate::rooms::neighbor_mask::{
    NeighborMask, WallPiece, WallSide, WallType, apply_hint, classify_wall, inside_corners,
};
use crate::tile::TileType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FloorType {
    Normal = 0,
    LooseTile = 1,
    Crack = 2,
}

/// Which mesh a decorated tile refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TilePiece {
    Floor(FloorType),
    Wall(WallType),
    Fireplace,
}

impl TilePiece {
    /// Mesh base name in the tile set.
    pub fn name(self) -> &'static str {
        match self {
            TilePiece::Floor(_) => "floor",
            TilePiece::Wall(_) => "wall",
            TilePiece::Fireplace => "fireplace",
        }
    }

    pub fn variant(self) -> u32 {
        match self {
            TilePiece::Floor(f) => f as u32,
            TilePiece::Wall(w) => w as u32,
            TilePiece::Fireplace => 0,
        }
    }

    pub fn wall_type(self) -> Option<WallType> {
        match self {
            TilePiece::Wall(w) => Some(w),
            _ => None,
        }
    }
}

/// Mesh placement local to its room or link. `angle` counts quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoratedTile {
    pub x: i32,
    pub y: i32,
    pub piece: TilePiece,
    pub group: u32,
    pub angle: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecoratedRoom {
    pub room: usize,
    pub tiles: Vec<DecoratedTile>,
    pub scenery: Vec<SceneryHint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecoratedLink {
    pub link: usize,
    pub tiles: Vec<DecoratedTile>,
}

/// Turns the block map and decoration hints into placed tiles.
pub struct RoomGenerator {
    group: u32,
    rng: SeededRng,
    decorator: RoomDecorator,
}

impl RoomGenerator {
    pub fn new(seed: &str, theme: LevelTheme) -> Self {
        Self {
            group: theme.group(),
            rng: SeededRng::named(seed, "tile"),
            decorator: RoomDecorator::new(seed, theme),
        }
    }

    pub fn generate(&mut self, dungeon: &Dungeon) -> (Vec<DecoratedRoom>, Vec<DecoratedLink>) {
        let rooms: Vec<DecoratedRoom> = (0..dungeon.rooms.len())
            .map(|i| self.build_room(dungeon, i))
            .collect();
        let links: Vec<DecoratedLink> = (0..dungeon.links.len())
            .map(|i| self.build_link(dungeon, i))
            .collect();
        debug!(
            "decorated {} tiles in {} rooms, {} tiles in {} links",
            rooms.iter().map(|r| r.tiles.len()).sum::<usize>(),
            rooms.len(),
            links.iter().map(|l| l.tiles.len()).sum::<usize>(),
            links.len()
        );
        (rooms, links)
    }

    pub fn build_room(&mut self, dungeon: &Dungeon, index: usize) -> DecoratedRoom {
        let room = &dungeon.rooms[index];
        let hints = self.decorator.make_hint_map(dungeon, index);
        let mut tiles = Vec::new();

        for y in 0..room.height {
            for x in 0..room.width {
                let (rx, ry) = (x + room.x, y + room.y);
                if dungeon.map.get(rx, ry) != TileType::None {
                    continue;
                }
                let mask = NeighborMask::sample(&dungeon.map, rx, ry);
                let hint = hints.floor_at(x, y);

                let mut floor = FloorType::Normal;
                if !mask.touches_door() {
                    match hint {
                        FloorHint::LooseTile => floor = FloorType::LooseTile,
                        FloorHint::Cracked => floor = FloorType::Crack,
                        FloorHint::Fireplace => tiles.push(DecoratedTile {
                            x,
                            y,
                            piece: TilePiece::Fireplace,
                            group: 0,
                            angle: 0,
                        }),
                        FloorHint::None | FloorHint::SkipMesh => {}
                    }
                }
                if hint != FloorHint::SkipMesh {
                    tiles.push(DecoratedTile {
                        x,
                        y,
                        piece: TilePiece::Floor(floor),
                        group: self.group,
                        angle: self.rng.index(4),
                    });
                }

                for side in WallSide::ALL {
                    let Some(piece) = classify_wall(mask, side) else {
                        continue;
                    };
                    let (dx, dy) = side.offset();
                    let WallPiece { variant, angle } = apply_hint(piece, hints.wall_at(x + dx, y + dy));
                    tiles.push(self.wall(x + dx, y + dy, variant, angle));
                }

                let corner = if hints.round_corners {
                    WallType::RoundInsideCorner
                } else {
                    WallType::InsideCorner
                };
                for (dx, dy, angle) in inside_corners(mask) {
                    tiles.push(self.wall(x + dx, y + dy, corner, angle));
                }
            }
        }

        DecoratedRoom {
            room: index,
            tiles,
            scenery: hints.scenery,
        }
    }

    pub fn build_link(&mut self, dungeon: &Dungeon, index: usize) -> DecoratedLink {
        let link = &dungeon.links[index];
        let mut tiles = Vec::new();

        for (i, tile) in link.tiles.iter().enumerate() {
            let i = i as i32;
            let (x, y) = if link.vertical { (0, i) } else { (i, 0) };
            match tile {
                TileType::Door | TileType::FenceDoor => {
                    tiles.push(self.wall(x, y, WallType::Door, if link.vertical { 1 } else { 0 }));
                }
                TileType::None => {
                    let first = i == 0;
                    if first || i == link.length - 1 {
                        let opp = if first { -1 } else { 1 };
                        let p = link.cell(i);
                        let (lx, ly, rx, ry) = if link.vertical {
                            (p.x - 1, p.y + opp, p.x + 1, p.y + opp)
                        } else {
                            (p.x + opp, p.y + 1, p.x + opp, p.y - 1)
                        };
                        if dungeon.map.get(lx, ly).is_solid() && dungeon.map.get(rx, ry).is_solid() {
                            let (cx, cy) = if link.vertical { (x, y + opp) } else { (x + opp, y) };
                            let angle = ((if link.vertical { 0 } else { 3 }) + if first { 0 } else { 2 }) % 4;
                            tiles.push(self.wall(cx, cy, WallType::Normal, angle));
                        }
                    }
                    tiles.push(DecoratedTile {
                        x,
                        y,
                        piece: TilePiece::Floor(FloorType::Normal),
                        group: self.group,
                        angle: 0,
                    });
                }
                TileType::Wall | TileType::Fence => {}
            }
        }

        DecoratedLink { link: index, tiles }
    }

    fn wall(&self, x: i32, y: i32, variant: WallType, angle: i32) -> DecoratedTile {
        DecoratedTile {
            x,
            y,
            piece: TilePiece::Wall(variant),
            group: self.group,
            angle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maps::debug_generator::DebugDungeonGenerator;
    use crate::maps::dungeon::{Link, Room, RoomIntersection};
    use crate::maps::dungeon_generator::{DungeonGenerator, SimpleDungeonGenerator};
    use crate::tile_map::BlockMap;

    fn walls(tiles: &[DecoratedTile]) -> impl Iterator<Item = &DecoratedTile> {
        tiles.iter().filter(|t| t.piece.wall_type().is_some())
    }

    #[test]
    fn lone_room_is_fully_enclosed() {
        let mut dungeon = Dungeon {
            width: 10,
            height: 10,
            rooms: vec![Room::new(2, 2, 3, 3)],
            links: Vec::new(),
            map: BlockMap::new(10, 10),
            start_room: 0,
            end_room: 0,
        };
        dungeon.flatten();
        let (rooms, _) = RoomGenerator::new("test", LevelTheme::Castle).generate(&dungeon);
        let tiles = &rooms[0].tiles;

        let floors = tiles.iter().filter(|t| matches!(t.piece, TilePiece::Floor(_))).count();
        assert_eq!(floors, 9);
        // 12 straight edges plus 4 inside corners.
        let corners: Vec<_> = walls(tiles)
            .filter(|t| {
                matches!(
                    t.piece,
                    TilePiece::Wall(WallType::InsideCorner | WallType::RoundInsideCorner)
                )
            })
            .map(|t| (t.x, t.y, t.angle))
            .collect();
        assert_eq!(corners.len(), 4);
        assert!(corners.contains(&(-1, -1, 0)));
        assert!(corners.contains(&(3, -1, 1)));
        assert!(corners.contains(&(3, 3, 2)));
        assert!(corners.contains(&(-1, 3, 3)));
        assert_eq!(walls(tiles).count(), 16);
        assert!(
            tiles
                .iter()
                .filter(|t| t.piece != TilePiece::Fireplace)
                .all(|t| t.group == LevelTheme::Castle.group())
        );
        assert!(tiles.iter().all(|t| (0..4).contains(&t.angle)));
    }

    #[test]
    fn door_cells_get_a_frame_not_a_wall() {
        let dungeon = DebugDungeonGenerator::new(20, 20).generate().unwrap();
        let (rooms, links) = RoomGenerator::new("test", LevelTheme::Crypt).generate(&dungeon);

        let frames: Vec<_> = links[0]
            .tiles
            .iter()
            .filter(|t| t.piece == TilePiece::Wall(WallType::Door))
            .collect();
        assert_eq!(frames.len(), 1);
        assert_eq!((frames[0].x, frames[0].y, frames[0].angle), (2, 0, 0));

        // Room 0's bottom row has no wall piece at the door column.
        let above_door = walls(&rooms[0].tiles).filter(|t| t.x == 2 && t.y == 4).count();
        assert_eq!(above_door, 0);
        let beside_door = walls(&rooms[0].tiles).filter(|t| t.x == 1 && t.y == 4).count();
        assert_eq!(beside_door, 1);
    }

    #[test]
    fn floors_next_to_doors_stay_plain() {
        let dungeon = DebugDungeonGenerator::new(20, 20).generate().unwrap();
        for seed in ["a", "b", "c", "d"] {
            let (rooms, _) = RoomGenerator::new(seed, LevelTheme::Castle).generate(&dungeon);
            for room in &rooms {
                let local_y = if room.room == 0 { 3 } else { 0 };
                let by_door = room
                    .tiles
                    .iter()
                    .find(|t| t.x == 2 && t.y == local_y && matches!(t.piece, TilePiece::Floor(_)))
                    .unwrap();
                assert_eq!(by_door.piece, TilePiece::Floor(FloorType::Normal));
            }
        }
    }

    #[test]
    fn open_link_ends_are_capped() {
        // Two rooms stacked with an open run spanning their whole width.
        let mut top = Room::new(2, 1, 5, 3);
        let mut bottom = Room::new(2, 5, 5, 3);
        top.links.push(0);
        bottom.links.push(0);
        let run = RoomIntersection {
            x: 2,
            y: 4,
            length: 5,
            vertical: false,
        };
        let mut dungeon = Dungeon {
            width: 10,
            height: 10,
            rooms: vec![top, bottom],
            links: vec![Link::new(0, 1, run, vec![TileType::None; 5], true)],
            map: BlockMap::new(10, 10),
            start_room: 0,
            end_room: 1,
        };
        dungeon.flatten();

        let (_, links) = RoomGenerator::new("test", LevelTheme::Castle).generate(&dungeon);
        let caps: Vec<_> = walls(&links[0].tiles).map(|t| (t.x, t.y, t.angle)).collect();
        assert_eq!(caps, vec![(-1, 0, 3), (5, 0, 1)]);
        let floors = links[0].tiles.iter().filter(|t| matches!(t.piece, TilePiece::Floor(_))).count();
        assert_eq!(floors, 5);
    }

    #[test]
    fn generated_level_has_lights() {
        let dungeon = SimpleDungeonGenerator::new("test", 30, 30).generate().unwrap();
        let (rooms, _) = RoomGenerator::new("test", LevelTheme::Castle).generate(&dungeon);
        let lights = rooms
            .iter()
            .flat_map(|r| &r.tiles)
            .filter(|t| matches!(t.piece, TilePiece::Wall(WallType::Torch) | TilePiece::Fireplace))
            .count();
        assert!(lights >= 1);
    }

    #[test]
    fn tile_stream_is_reproducible() {
        let dungeon = SimpleDungeonGenerator::new("seed", 30, 30).generate().unwrap();
        let a = RoomGenerator::new("seed", LevelTheme::Church).generate(&dungeon);
        let b = RoomGenerator::new("seed", LevelTheme::Church).generate(&dungeon);
        assert_eq!(a, b);
    }
}
