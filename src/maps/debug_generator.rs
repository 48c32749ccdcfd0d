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

use crate::error::GenerationError;
use crate::maps::dungeon::{Dungeon, Link, Room, RoomIntersection};
use crate::maps::dungeon_generator::DungeonGenerator;
use crate::tile::TileType;
use crate::tile_map::BlockMap;

const ROOM_WIDTH: i32 = 4;
const ROOM_HEIGHT: i32 = 4;

/// Fixed two-room layout joined by a single door, for debugging navigation
/// and rendering without generator noise.
pub struct DebugDungeonGenerator {
    width: i32,
    height: i32,
}

impl DebugDungeonGenerator {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

impl DungeonGenerator for DebugDungeonGenerator {
    fn generate(&mut self) -> Result<Dungeon, GenerationError> {
        let mut first = Room::new(2, 2, ROOM_WIDTH, ROOM_HEIGHT);
        let mut second = Room::new(2, 2 + ROOM_HEIGHT + 1, ROOM_WIDTH, ROOM_HEIGHT);
        first.links.push(0);
        second.links.push(0);

        let run = RoomIntersection {
            x: 2,
            y: ROOM_HEIGHT + 2,
            length: 4,
            vertical: false,
        };
        let tiles = vec![TileType::Wall, TileType::Wall, TileType::Door, TileType::Wall];

        let mut dungeon = Dungeon {
            width: self.width,
            height: self.height,
            rooms: vec![first, second],
            links: vec![Link::new(0, 1, run, tiles, false)],
            map: BlockMap::new(self.width, self.height),
            start_room: 0,
            end_room: 1,
        };
        dungeon.flatten();

        Ok(dungeon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_layout() {
        let dungeon = DebugDungeonGenerator::new(30, 30).generate().unwrap();
        assert_eq!(dungeon.rooms.len(), 2);
        assert_eq!(dungeon.map.get(4, 6), TileType::Door);
        assert_eq!(dungeon.map.get(3, 6), TileType::Wall);
        assert_eq!(dungeon.map.get(2, 7), TileType::None);
        assert!(dungeon.check_invariants());
        let (start, end) = dungeon.main_rooms();
        assert_eq!((start.x, start.y), (2, 2));
        assert_eq!((end.x, end.y), (2, 7));
    }
}
