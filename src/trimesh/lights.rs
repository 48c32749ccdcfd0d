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

use std::f32::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::maps::dungeon::Room;
use crate::rooms::{DecoratedTile, TilePiece, WallType};

/// Distance from a torch wall tile's center towards the room.
const TORCH_OFFSET: f32 = 0.55;
const LIGHT_HEIGHT: f32 = 1.4;
const LIGHT_COLOR: [f32; 3] = [1.0, 0.7, 0.2];
const LIGHT_RANGE: f32 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LightKind {
    WallTorch,
    Fireplace,
}

/// Static light anchor in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightDef {
    pub x: f32,
    pub y: f32,
    pub height: f32,
    pub kind: LightKind,
}

/// Per-frame light handed to the renderer. `position` is xyz with y up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub range: f32,
}

pub fn scan_lights(tiles: &[DecoratedTile], room: &Room) -> Vec<LightDef> {
    let mut lights = Vec::new();
    for t in tiles {
        match t.piece {
            TilePiece::Wall(WallType::Torch) => {
                let angle = -(t.angle as f32) * FRAC_PI_2;
                lights.push(LightDef {
                    x: (t.x + room.x) as f32 + angle.sin() * TORCH_OFFSET + 0.5,
                    y: (t.y + room.y) as f32 + angle.cos() * TORCH_OFFSET + 0.5,
                    height: LIGHT_HEIGHT,
                    kind: LightKind::WallTorch,
                });
            }
            TilePiece::Fireplace => lights.push(LightDef {
                x: (t.x + room.x) as f32 + 0.5,
                y: (t.y + room.y) as f32 + 0.5,
                height: LIGHT_HEIGHT,
                kind: LightKind::Fireplace,
            }),
            _ => {}
        }
    }
    lights
}

impl LightDef {
    /// Flickering light scaled by `strength` (eased room reveal).
    pub fn point_light(&self, strength: f32, time: f32) -> PointLight {
        let t = time * 6.0 + self.y + self.x;
        let flicker = t.sin() * (t * 0.6 - 13.0).sin() * 0.2;
        PointLight {
            position: [self.x, self.height, self.y],
            color: LIGHT_COLOR.map(|c| c * strength),
            range: (LIGHT_RANGE + flicker) * strength,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(x: i32, y: i32, piece: TilePiece, angle: i32) -> DecoratedTile {
        DecoratedTile {
            x,
            y,
            piece,
            group: 0,
            angle,
        }
    }

    #[test]
    fn torches_sit_in_front_of_their_wall() {
        let room = Room::new(10, 20, 4, 4);
        let tiles = [
            tile(1, -1, TilePiece::Wall(WallType::Torch), 0),
            tile(-1, 2, TilePiece::Wall(WallType::Torch), 3),
            tile(2, 2, TilePiece::Fireplace, 0),
            tile(0, 0, TilePiece::Wall(WallType::Normal), 0),
        ];
        let lights = scan_lights(&tiles, &room);
        assert_eq!(lights.len(), 3);

        // Upper wall: pushed down into the room.
        assert!((lights[0].x - 11.5).abs() < 1e-5);
        assert!((lights[0].y - (19.5 + TORCH_OFFSET)).abs() < 1e-5);
        // Left wall: pushed right.
        assert!((lights[1].x - (9.5 + TORCH_OFFSET)).abs() < 1e-5);
        assert!((lights[1].y - 22.5).abs() < 1e-5);
        assert_eq!(lights[2].kind, LightKind::Fireplace);
        assert_eq!((lights[2].x, lights[2].y), (12.5, 22.5));
    }

    #[test]
    fn hidden_room_light_is_dark() {
        let def = LightDef {
            x: 1.0,
            y: 2.0,
            height: LIGHT_HEIGHT,
            kind: LightKind::WallTorch,
        };
        let off = def.point_light(0.0, 3.0);
        assert_eq!(off.color, [0.0, 0.0, 0.0]);
        assert_eq!(off.range, 0.0);
        let on = def.point_light(1.0, 3.0);
        assert_eq!(on.position, [1.0, LIGHT_HEIGHT, 2.0]);
        assert!((on.range - LIGHT_RANGE).abs() <= 0.2);
    }
}
