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

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::decoration::WallHint;
use crate::tile_map::BlockMap;

/// Wall mesh variants. The discriminant is the mesh variant index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallType {
    Normal = 0,
    NormalWithHole = 1,
    Torch = 2,
    NormalAccent = 3,
    RoundInsideCorner = 4,
    ThinJoin = 5,
    RoundOutsideCorner = 6,
    Door = 7,
    DoorBlocked = 8,
    OutsideCorner = 9,
    InsideCorner = 10,
}

bitflags! {
    /// Solid/door state of the cells around an open cell. `FAR_*` look two
    /// cells away; cells outside the map count as solid.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NeighborMask: u16 {
        const UP         = 1 << 0;
        const DOWN       = 1 << 1;
        const LEFT       = 1 << 2;
        const RIGHT      = 1 << 3;
        const UP_LEFT    = 1 << 4;
        const UP_RIGHT   = 1 << 5;
        const DOWN_LEFT  = 1 << 6;
        const DOWN_RIGHT = 1 << 7;
        const FAR_UP     = 1 << 8;
        const FAR_DOWN   = 1 << 9;
        const UP_DOOR    = 1 << 10;
        const DOWN_DOOR  = 1 << 11;
        const LEFT_DOOR  = 1 << 12;
        const RIGHT_DOOR = 1 << 13;
    }
}

impl NeighborMask {
    pub fn sample(map: &BlockMap, x: i32, y: i32) -> Self {
        let samples = [
            (0, -1, NeighborMask::UP),
            (0, 1, NeighborMask::DOWN),
            (-1, 0, NeighborMask::LEFT),
            (1, 0, NeighborMask::RIGHT),
            (-1, -1, NeighborMask::UP_LEFT),
            (1, -1, NeighborMask::UP_RIGHT),
            (-1, 1, NeighborMask::DOWN_LEFT),
            (1, 1, NeighborMask::DOWN_RIGHT),
            (0, -2, NeighborMask::FAR_UP),
            (0, 2, NeighborMask::FAR_DOWN),
        ];
        let doors = [
            (0, -1, NeighborMask::UP_DOOR),
            (0, 1, NeighborMask::DOWN_DOOR),
            (-1, 0, NeighborMask::LEFT_DOOR),
            (1, 0, NeighborMask::RIGHT_DOOR),
        ];

        let mut mask = NeighborMask::empty();
        for (dx, dy, bit) in samples {
            if map.get(x + dx, y + dy).is_solid() {
                mask |= bit;
            }
        }
        for (dx, dy, bit) in doors {
            if map.get(x + dx, y + dy).is_door() {
                mask |= bit;
            }
        }
        mask
    }

    pub fn touches_door(self) -> bool {
        self.intersects(Self::UP_DOOR | Self::DOWN_DOOR | Self::LEFT_DOOR | Self::RIGHT_DOOR)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WallSide {
    Up,
    Down,
    Left,
    Right,
}

/// Classified wall piece; `angle` counts quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallPiece {
    pub variant: WallType,
    pub angle: i32,
}

/// First rule whose `clear` cells are all open wins.
struct WallRule {
    clear: NeighborMask,
    variant: WallType,
    angle: i32,
}

const fn rule(clear: NeighborMask, variant: WallType, angle: i32) -> WallRule {
    WallRule {
        clear,
        variant,
        angle,
    }
}

const UP_RULES: [WallRule; 4] = [
    rule(NeighborMask::UP_LEFT.union(NeighborMask::FAR_UP), WallType::ThinJoin, 1),
    rule(NeighborMask::UP_LEFT, WallType::OutsideCorner, 1),
    rule(NeighborMask::UP_RIGHT.union(NeighborMask::FAR_UP), WallType::ThinJoin, 3),
    rule(NeighborMask::UP_RIGHT, WallType::OutsideCorner, 0),
];

const DOWN_RULES: [WallRule; 3] = [
    rule(NeighborMask::DOWN_RIGHT, WallType::OutsideCorner, 3),
    rule(NeighborMask::DOWN_LEFT.union(NeighborMask::FAR_DOWN), WallType::ThinJoin, 1),
    rule(NeighborMask::DOWN_LEFT, WallType::OutsideCorner, 2),
];

const LEFT_RULES: [WallRule; 2] = [
    rule(NeighborMask::DOWN_LEFT, WallType::OutsideCorner, 0),
    rule(NeighborMask::UP_LEFT, WallType::OutsideCorner, 3),
];

const RIGHT_RULES: [WallRule; 2] = [
    rule(NeighborMask::UP_RIGHT, WallType::OutsideCorner, 2),
    rule(NeighborMask::DOWN_RIGHT, WallType::OutsideCorner, 1),
];

/// (required solid cells, dx, dy, angle)
pub const INSIDE_CORNERS: [(NeighborMask, i32, i32, i32); 4] = [
    (NeighborMask::UP.union(NeighborMask::LEFT), -1, -1, 0),
    (NeighborMask::UP.union(NeighborMask::RIGHT), 1, -1, 1),
    (NeighborMask::DOWN.union(NeighborMask::RIGHT), 1, 1, 2),
    (NeighborMask::DOWN.union(NeighborMask::LEFT), -1, 1, 3),
];

impl WallSide {
    pub const ALL: [WallSide; 4] = [WallSide::Up, WallSide::Down, WallSide::Left, WallSide::Right];

    pub fn offset(self) -> (i32, i32) {
        match self {
            WallSide::Up => (0, -1),
            WallSide::Down => (0, 1),
            WallSide::Left => (-1, 0),
            WallSide::Right => (1, 0),
        }
    }

    fn solid(self) -> NeighborMask {
        match self {
            WallSide::Up => NeighborMask::UP,
            WallSide::Down => NeighborMask::DOWN,
            WallSide::Left => NeighborMask::LEFT,
            WallSide::Right => NeighborMask::RIGHT,
        }
    }

    fn door(self) -> NeighborMask {
        match self {
            WallSide::Up => NeighborMask::UP_DOOR,
            WallSide::Down => NeighborMask::DOWN_DOOR,
            WallSide::Left => NeighborMask::LEFT_DOOR,
            WallSide::Right => NeighborMask::RIGHT_DOOR,
        }
    }

    fn base_angle(self) -> i32 {
        match self {
            WallSide::Up => 0,
            WallSide::Down => 2,
            WallSide::Left => 3,
            WallSide::Right => 1,
        }
    }

    fn rules(self) -> &'static [WallRule] {
        match self {
            WallSide::Up => &UP_RULES,
            WallSide::Down => &DOWN_RULES,
            WallSide::Left => &LEFT_RULES,
            WallSide::Right => &RIGHT_RULES,
        }
    }
}

/// Wall piece on `side` of an open cell, `None` when that side is open or a
/// door (door frames come from the link).
pub fn classify_wall(mask: NeighborMask, side: WallSide) -> Option<WallPiece> {
    if !mask.contains(side.solid()) || mask.contains(side.door()) {
        return None;
    }
    let piece = side
        .rules()
        .iter()
        .find(|r| !mask.intersects(r.clear))
        .map_or(
            WallPiece {
                variant: WallType::Normal,
                angle: side.base_angle(),
            },
            |r| WallPiece {
                variant: r.variant,
                angle: r.angle,
            },
        );
    Some(piece)
}

/// Restyles a plain wall according to its hint.
pub fn apply_hint(piece: WallPiece, hint: WallHint) -> WallPiece {
    if piece.variant != WallType::Normal {
        return piece;
    }
    let variant = match hint {
        WallHint::AccentWall => WallType::NormalAccent,
        WallHint::Window => WallType::NormalWithHole,
        WallHint::Torch => WallType::Torch,
        WallHint::None | WallHint::SkipMesh => WallType::Normal,
    };
    WallPiece { variant, ..piece }
}

/// Inside corner pieces as `(dx, dy, angle)` around an open cell.
pub fn inside_corners(mask: NeighborMask) -> impl Iterator<Item = (i32, i32, i32)> {
    INSIDE_CORNERS
        .into_iter()
        .filter(move |(need, ..)| mask.contains(*need))
        .map(|(_, dx, dy, angle)| (dx, dy, angle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::TileType;

    fn piece(variant: WallType, angle: i32) -> Option<WallPiece> {
        Some(WallPiece { variant, angle })
    }

    /// Every neighbor solid except the ones listed.
    fn solid_except(open: NeighborMask) -> NeighborMask {
        let solid = NeighborMask::UP
            | NeighborMask::DOWN
            | NeighborMask::LEFT
            | NeighborMask::RIGHT
            | NeighborMask::UP_LEFT
            | NeighborMask::UP_RIGHT
            | NeighborMask::DOWN_LEFT
            | NeighborMask::DOWN_RIGHT
            | NeighborMask::FAR_UP
            | NeighborMask::FAR_DOWN;
        solid.difference(open)
    }

    #[test]
    fn straight_walls_face_the_cell() {
        let mask = solid_except(NeighborMask::empty());
        assert_eq!(classify_wall(mask, WallSide::Up), piece(WallType::Normal, 0));
        assert_eq!(classify_wall(mask, WallSide::Right), piece(WallType::Normal, 1));
        assert_eq!(classify_wall(mask, WallSide::Down), piece(WallType::Normal, 2));
        assert_eq!(classify_wall(mask, WallSide::Left), piece(WallType::Normal, 3));
    }

    #[test]
    fn open_sides_and_doors_get_no_wall() {
        let mask = solid_except(NeighborMask::UP);
        assert_eq!(classify_wall(mask, WallSide::Up), None);
        let mask = solid_except(NeighborMask::empty()) | NeighborMask::LEFT_DOOR;
        assert_eq!(classify_wall(mask, WallSide::Left), None);
        assert!(mask.touches_door());
    }

    #[test]
    fn upper_wall_table() {
        let cases = [
            (NeighborMask::UP_LEFT | NeighborMask::FAR_UP, WallType::ThinJoin, 1),
            (NeighborMask::UP_LEFT, WallType::OutsideCorner, 1),
            (NeighborMask::UP_RIGHT | NeighborMask::FAR_UP, WallType::ThinJoin, 3),
            (NeighborMask::UP_RIGHT, WallType::OutsideCorner, 0),
            (NeighborMask::UP_LEFT | NeighborMask::UP_RIGHT, WallType::OutsideCorner, 1),
        ];
        for (open, variant, angle) in cases {
            assert_eq!(
                classify_wall(solid_except(open), WallSide::Up),
                piece(variant, angle),
                "open {open:?}"
            );
        }
    }

    #[test]
    fn lower_wall_table() {
        let cases = [
            (NeighborMask::DOWN_RIGHT, WallType::OutsideCorner, 3),
            (NeighborMask::DOWN_LEFT | NeighborMask::FAR_DOWN, WallType::ThinJoin, 1),
            (NeighborMask::DOWN_LEFT, WallType::OutsideCorner, 2),
            (NeighborMask::DOWN_RIGHT | NeighborMask::DOWN_LEFT, WallType::OutsideCorner, 3),
        ];
        for (open, variant, angle) in cases {
            assert_eq!(
                classify_wall(solid_except(open), WallSide::Down),
                piece(variant, angle),
                "open {open:?}"
            );
        }
    }

    #[test]
    fn side_wall_tables() {
        let left = |open| classify_wall(solid_except(open), WallSide::Left);
        let right = |open| classify_wall(solid_except(open), WallSide::Right);
        assert_eq!(left(NeighborMask::DOWN_LEFT), piece(WallType::OutsideCorner, 0));
        assert_eq!(left(NeighborMask::UP_LEFT), piece(WallType::OutsideCorner, 3));
        assert_eq!(right(NeighborMask::UP_RIGHT), piece(WallType::OutsideCorner, 2));
        assert_eq!(right(NeighborMask::DOWN_RIGHT), piece(WallType::OutsideCorner, 1));
    }

    #[test]
    fn hints_only_restyle_plain_walls() {
        let plain = WallPiece {
            variant: WallType::Normal,
            angle: 2,
        };
        assert_eq!(apply_hint(plain, WallHint::Torch).variant, WallType::Torch);
        assert_eq!(apply_hint(plain, WallHint::Window).variant, WallType::NormalWithHole);
        assert_eq!(apply_hint(plain, WallHint::AccentWall).variant, WallType::NormalAccent);
        let corner = WallPiece {
            variant: WallType::OutsideCorner,
            angle: 1,
        };
        assert_eq!(apply_hint(corner, WallHint::Torch), corner);
    }

    #[test]
    fn corner_cell_of_a_room() {
        // Top-left interior cell of a 3x3 room.
        let mut map = BlockMap::new(5, 5);
        for y in 1..4 {
            for x in 1..4 {
                map.set(x, y, TileType::None);
            }
        }
        let mask = NeighborMask::sample(&map, 1, 1);
        assert!(mask.contains(NeighborMask::UP | NeighborMask::LEFT | NeighborMask::FAR_UP));
        assert!(!mask.intersects(NeighborMask::RIGHT | NeighborMask::DOWN_RIGHT));
        assert_eq!(inside_corners(mask).collect::<Vec<_>>(), vec![(-1, -1, 0)]);
        assert_eq!(classify_wall(mask, WallSide::Up), piece(WallType::Normal, 0));
    }
}
