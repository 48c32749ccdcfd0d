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

use serde::{Deserialize, Serialize};

use crate::point_f::PointF;
use crate::position::Position;
use crate::tile::TileType;
use crate::tile_map::BlockMap;

/// Axis-aligned rectangular room on the dungeon grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// Indices into [`Dungeon::links`].
    pub links: Vec<usize>,
}

/// Shared border run between two rooms separated by exactly one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomIntersection {
    pub x: i32,
    pub y: i32,
    pub length: i32,
    pub vertical: bool,
}

impl Room {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            links: Vec::new(),
        }
    }

    pub fn area(&self) -> i32 {
        self.width * self.height
    }

    pub fn center(&self) -> PointF {
        PointF::new(
            self.x as f32 + self.width as f32 / 2.0,
            self.y as f32 + self.height as f32 / 2.0,
        )
    }

    pub fn contains_cell(&self, x: i32, y: i32) -> bool {
        x >= self.x && y >= self.y && x < self.x + self.width && y < self.y + self.height
    }

    /// Rectangle overlap test; `padding` grows `other` on every side.
    pub fn overlaps(&self, other: &Room, padding: i32) -> bool {
        !(other.x + other.width + padding <= self.x
            || other.y + other.height + padding <= self.y
            || other.x - padding >= self.x + self.width
            || other.y - padding >= self.y + self.height)
    }

    /// Border run of at least 3 cells shared with `other` across a
    /// one-cell wall, if any.
    pub fn intersection(&self, other: &Room) -> Option<RoomIntersection> {
        if self.x + self.width == other.x - 1 || other.x + other.width == self.x - 1 {
            let x = if self.x > other.x { self.x - 1 } else { other.x - 1 };
            let start = self.y.max(other.y);
            let end = (self.y + self.height).min(other.y + other.height);
            let length = end - start;
            if length >= 3 {
                return Some(RoomIntersection {
                    x,
                    y: start,
                    length,
                    vertical: true,
                });
            }
        }
        if self.y + self.height == other.y - 1 || other.y + other.height == self.y - 1 {
            let y = if self.y > other.y { self.y - 1 } else { other.y - 1 };
            let start = self.x.max(other.x);
            let end = (self.x + self.width).min(other.x + other.width);
            let length = end - start;
            if length >= 3 {
                return Some(RoomIntersection {
                    x: start,
                    y,
                    length,
                    vertical: false,
                });
            }
        }

        None
    }
}

/// Connection between two rooms: a wall run with a door, or a fully open
/// ("transparent") boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub room1: usize,
    pub room2: usize,
    pub transparent: bool,
    pub x: i32,
    pub y: i32,
    pub vertical: bool,
    pub length: i32,
    /// One entry per cell along the run, never mutated after generation.
    pub tiles: Vec<TileType>,
}

impl Link {
    pub fn new(room1: usize, room2: usize, run: RoomIntersection, tiles: Vec<TileType>, transparent: bool) -> Self {
        debug_assert_eq!(tiles.len(), run.length as usize);
        Self {
            room1,
            room2,
            transparent,
            x: run.x,
            y: run.y,
            vertical: run.vertical,
            length: run.length,
            tiles,
        }
    }

    /// Map cell of the `i`-th tile.
    pub fn cell(&self, i: i32) -> Position {
        if self.vertical {
            Position::new(self.x, self.y + i)
        } else {
            Position::new(self.x + i, self.y)
        }
    }

    /// Width and height of the link's bounding box in cells.
    pub fn extent(&self) -> (i32, i32) {
        if self.vertical {
            (1, self.length)
        } else {
            (self.length, 1)
        }
    }

    pub fn contains_cell(&self, x: i32, y: i32) -> bool {
        let (w, h) = self.extent();
        x >= self.x && y >= self.y && x < self.x + w && y < self.y + h
    }

    pub fn tile_at(&self, x: i32, y: i32) -> Option<TileType> {
        if !self.contains_cell(x, y) {
            return None;
        }
        let i = if self.vertical { y - self.y } else { x - self.x };
        self.tiles.get(i as usize).copied()
    }

    pub fn other_room(&self, room: usize) -> usize {
        if self.room1 == room { self.room2 } else { self.room1 }
    }

    pub fn touches(&self, room: usize) -> bool {
        self.room1 == room || self.room2 == room
    }

    pub fn door_cells(&self) -> impl Iterator<Item = (i32, TileType)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_door())
            .map(|(i, t)| (i as i32, *t))
    }
}

/// Full generator output: room graph plus the flattened block map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dungeon {
    pub width: i32,
    pub height: i32,
    pub rooms: Vec<Room>,
    pub links: Vec<Link>,
    pub map: BlockMap,
    pub start_room: usize,
    pub end_room: usize,
}

impl Dungeon {
    pub fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    pub fn main_rooms(&self) -> (&Room, &Room) {
        (&self.rooms[self.start_room], &self.rooms[self.end_room])
    }

    pub fn room_area(&self) -> i32 {
        self.rooms.iter().map(Room::area).sum()
    }

    /// Room area as a fraction of the whole grid.
    pub fn coverage(&self) -> f32 {
        self.room_area() as f32 / (self.width * self.height) as f32
    }

    pub fn transparent_links_of(&self, room: usize) -> usize {
        self.rooms[room]
            .links
            .iter()
            .filter(|l| self.links[**l].transparent)
            .count()
    }

    /// Writes room interiors as open floor and every link run on top.
    pub fn flatten(&mut self) {
        self.map.fill(TileType::Wall);
        for room in &self.rooms {
            for y in 0..room.height {
                for x in 0..room.width {
                    self.map.set(room.x + x, room.y + y, TileType::None);
                }
            }
        }
        for link in &self.links {
            for i in 0..link.length {
                let p = link.cell(i);
                self.map.set(p.x, p.y, link.tiles[i as usize]);
            }
        }
    }

    /// Rooms never overlap and every link joins two distinct known rooms.
    pub fn check_invariants(&self) -> bool {
        for (i, a) in self.rooms.iter().enumerate() {
            for b in self.rooms.iter().skip(i + 1) {
                if a.overlaps(b, 0) {
                    return false;
                }
            }
        }
        self.links.iter().all(|l| {
            l.room1 != l.room2
                && l.room1 < self.rooms.len()
                && l.room2 < self.rooms.len()
                && l.tiles.len() == l.length as usize
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rooms_one_cell_apart_share_a_run() {
        let a = Room::new(2, 2, 4, 4);
        let b = Room::new(2, 7, 4, 4);
        let run = a.intersection(&b).unwrap();
        assert_eq!(
            run,
            RoomIntersection {
                x: 2,
                y: 6,
                length: 4,
                vertical: false
            }
        );
        assert_eq!(b.intersection(&a), Some(run));
    }

    #[test]
    fn short_runs_are_ignored() {
        let a = Room::new(2, 2, 4, 4);
        let b = Room::new(7, 4, 4, 4);
        assert_eq!(a.intersection(&b), None);
        let c = Room::new(7, 3, 4, 4);
        assert_eq!(a.intersection(&c).map(|r| r.length), Some(3));
    }

    #[test]
    fn padding_keeps_rooms_apart() {
        let a = Room::new(2, 2, 4, 4);
        let touching = Room::new(6, 2, 4, 4);
        let one_gap = Room::new(7, 2, 4, 4);
        assert!(!a.overlaps(&touching, 0));
        assert!(a.overlaps(&touching, 1));
        assert!(!a.overlaps(&one_gap, 1));
        assert!(a.overlaps(&Room::new(3, 3, 2, 2), 0));
    }

    #[test]
    fn link_cells_follow_orientation() {
        let run = RoomIntersection {
            x: 6,
            y: 3,
            length: 3,
            vertical: true,
        };
        let link = Link::new(0, 1, run, vec![TileType::Wall, TileType::Door, TileType::Wall], false);
        assert_eq!(link.cell(2), Position::new(6, 5));
        assert_eq!(link.tile_at(6, 4), Some(TileType::Door));
        assert_eq!(link.tile_at(7, 4), None);
        assert_eq!(link.other_room(1), 0);
        assert_eq!(link.door_cells().collect::<Vec<_>>(), vec![(1, TileType::Door)]);
    }
}
