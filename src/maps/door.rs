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

use crate::maps::dungeon::Dungeon;
use crate::maps::visibility::VisibilityManager;
use crate::point_f::{PointF, ease_in_out_quad};
use crate::tile::TileType;

pub const DOOR_SPEED: f32 = 0.03;
/// Arrival radius when walking up to a door.
pub const DOOR_REACH: f32 = 0.5;

/// Door entity standing on a link cell. The link's tile array stays
/// untouched; open state lives here.
#[derive(Debug, Clone, PartialEq)]
pub struct Door {
    pub x: i32,
    pub y: i32,
    pub vertical: bool,
    pub room1: usize,
    pub room2: usize,
    opened: bool,
    state: f32,
    side: f32,
}

impl Door {
    pub fn new(x: i32, y: i32, vertical: bool, room1: usize, room2: usize) -> Self {
        Self {
            x,
            y,
            vertical,
            room1,
            room2,
            opened: false,
            state: 0.0,
            side: 0.0,
        }
    }

    /// One door per `Door` tile of every link.
    pub fn from_dungeon(dungeon: &Dungeon) -> Vec<Door> {
        let mut doors = Vec::new();
        for link in &dungeon.links {
            for (i, tile) in link.tiles.iter().enumerate() {
                if *tile == TileType::Door {
                    let p = link.cell(i as i32);
                    doors.push(Door::new(p.x, p.y, link.vertical, link.room1, link.room2));
                }
            }
        }
        doors
    }

    pub fn is_open(&self) -> bool {
        self.opened
    }

    pub fn position(&self) -> PointF {
        PointF::new(self.x as f32 + 0.5, self.y as f32 + 0.5)
    }

    pub fn destination(&self) -> (PointF, f32) {
        (self.position(), DOOR_REACH)
    }

    /// Opens the door and reveals both rooms. The swing side is taken from
    /// where the player stands. Returns `false` if it was already open.
    pub fn activate(&mut self, player: PointF, visibility: &mut VisibilityManager) -> bool {
        if self.opened {
            return false;
        }
        visibility.reveal(self.room1, false);
        visibility.reveal(self.room2, false);
        self.opened = true;

        let center = self.position();
        let negative = if self.vertical {
            player.x < center.x
        } else {
            player.y < center.y
        };
        self.side = if negative { -1.0 } else { 1.0 };
        true
    }

    pub fn update(&mut self, delta: f32) {
        if self.opened {
            self.state = (self.state + delta * DOOR_SPEED).min(1.0);
        }
    }

    pub fn state(&self) -> f32 {
        self.state
    }

    /// Eased, signed swing amount in [-1, 1].
    pub fn swing(&self) -> f32 {
        ease_in_out_quad(self.state) * self.side
    }

    pub fn is_visible(&self, visibility: &VisibilityManager) -> bool {
        visibility.room_state(self.room1) > 0.0 || visibility.room_state(self.room2) > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maps::debug_generator::DebugDungeonGenerator;
    use crate::maps::dungeon_generator::DungeonGenerator;

    #[test]
    fn doors_follow_door_tiles() {
        let dungeon = DebugDungeonGenerator::new(20, 20).generate().unwrap();
        let doors = Door::from_dungeon(&dungeon);
        assert_eq!(doors.len(), 1);
        assert_eq!((doors[0].x, doors[0].y), (4, 6));
        assert_eq!(doors[0].destination(), (PointF::new(4.5, 6.5), 0.5));
    }

    #[test]
    fn activation_opens_once_and_reveals() {
        let dungeon = DebugDungeonGenerator::new(20, 20).generate().unwrap();
        let mut visibility = VisibilityManager::new(&dungeon);
        let mut door = Door::from_dungeon(&dungeon).remove(0);
        assert!(!door.is_visible(&visibility));

        assert!(door.activate(PointF::new(4.5, 4.0), &mut visibility));
        assert!(!door.activate(PointF::new(4.5, 9.0), &mut visibility));
        assert!(door.is_open());
        assert!(visibility.is_room_visible(1));

        for _ in 0..40 {
            door.update(1.0);
        }
        visibility.update(1.0);
        assert_eq!(door.state(), 1.0);
        assert_eq!(door.swing(), -1.0);
        assert!(door.is_visible(&visibility));
    }

    #[test]
    fn closed_door_does_not_animate() {
        let mut door = Door::new(0, 0, true, 0, 1);
        door.update(5.0);
        assert_eq!(door.state(), 0.0);
    }
}
