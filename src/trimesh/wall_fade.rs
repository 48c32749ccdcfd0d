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

use crate::maps::dungeon::{Dungeon, Room};
use crate::point_f::{PointF, saturate};
use crate::trimesh::triangulator::WALL_SLOTS;

pub const FADE_SPEED: f32 = 0.02;

/// Per-room fade of the eight wall slots, so walls between the camera and
/// the player can be hidden. 1 is fully shown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WallFade {
    rooms: Vec<[f32; WALL_SLOTS]>,
}

/// Square of half-size `gap` around the cell touches the rectangle.
fn touches(px: i32, py: i32, gap: i32, x: i32, y: i32, width: i32, height: i32) -> bool {
    !(px + gap < x || py + gap < y || px - gap >= x + width || py - gap >= y + height)
}

impl WallFade {
    pub fn new(room_count: usize) -> Self {
        Self {
            rooms: vec![[1.0; WALL_SLOTS]; room_count],
        }
    }

    pub fn update(&mut self, dungeon: &Dungeon, player: PointF, delta: f32) {
        let (px, py) = player.floor();
        let speed = FADE_SPEED * delta;
        for (state, room) in self.rooms.iter_mut().zip(&dungeon.rooms) {
            let (hide_near, hide_far) = Self::hide_flags(room, px, py);
            let step = |v: f32, hide: bool| saturate(v + if hide { -speed } else { speed });

            state[1] = step(state[1], hide_near);
            state[3] = step(state[3], hide_near);
            state[4] = step(state[4], hide_far);
            state[6] = step(state[6], hide_far);
            state[0] = state[1].max(state[3]);
            state[2] = state[1].max(state[4]);
            state[5] = state[6].max(state[3]);
            state[7] = state[6].max(state[4]);
        }
    }

    /// (upper/left walls, lower/right walls) hidden for a player cell.
    fn hide_flags(room: &Room, px: i32, py: i32) -> (bool, bool) {
        let Room {
            x,
            y,
            width,
            height,
            ..
        } = *room;
        let near = touches(px, py, 1, x - 2, y, 1, height) || touches(px, py, 1, x, y - 2, width, 1);
        let far = touches(px, py, 1, x + width - 1, y, 1, height)
            || touches(px, py, 1, x, y + height - 1, width, 1);
        (near, far)
    }

    pub fn room(&self, index: usize) -> Option<&[f32; WALL_SLOTS]> {
        self.rooms.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maps::debug_generator::DebugDungeonGenerator;
    use crate::maps::dungeon_generator::DungeonGenerator;

    #[test]
    fn walls_fade_near_the_player() {
        let dungeon = DebugDungeonGenerator::new(20, 20).generate().unwrap();
        let mut fade = WallFade::new(dungeon.rooms.len());
        // Bottom row of room 0 (2,2 4x4): its lower wall hides.
        let player = PointF::new(4.5, 5.5);
        for _ in 0..100 {
            fade.update(&dungeon, player, 1.0);
        }
        let room = fade.room(0).unwrap();
        assert_eq!(room[6], 0.0);
        assert_eq!(room[4], 0.0);
        assert_eq!(room[1], 1.0);
        assert_eq!(room[7], 0.0);
        assert_eq!(room[5], 1.0);

        // Far away: everything comes back.
        for _ in 0..100 {
            fade.update(&dungeon, PointF::new(15.5, 15.5), 1.0);
        }
        assert!(fade.room(0).unwrap().iter().all(|v| *v == 1.0));
    }
}
