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

use crate::position::Position;
use crate::tile::TileType;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Row-major grid of [`TileType`], one cell per grid unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockMap {
    width: i32,
    height: i32,
    tiles: Vec<TileType>,
}

impl BlockMap {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            tiles: vec![TileType::Wall; (width.max(0) * height.max(0)) as usize],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.is_valid(self.width, self.height)
    }

    /// Out-of-bounds cells read as solid wall.
    pub fn get(&self, x: i32, y: i32) -> TileType {
        let pos = Position::new(x, y);
        if self.in_bounds(pos) {
            self[pos]
        } else {
            TileType::Wall
        }
    }

    pub fn set(&mut self, x: i32, y: i32, tile: TileType) {
        let pos = Position::new(x, y);
        if self.in_bounds(pos) {
            self[pos] = tile;
        }
    }

    pub fn fill(&mut self, tile: TileType) {
        self.tiles.iter_mut().for_each(|t| *t = tile);
    }

    pub fn count(&self, tile: TileType) -> usize {
        self.tiles.iter().filter(|t| **t == tile).count()
    }

    fn index_of(&self, pos: Position) -> usize {
        (pos.y * self.width + pos.x) as usize
    }
}

impl Index<Position> for BlockMap {
    type Output = TileType;

    fn index(&self, pos: Position) -> &Self::Output {
        &self.tiles[self.index_of(pos)]
    }
}

impl IndexMut<Position> for BlockMap {
    fn index_mut(&mut self, pos: Position) -> &mut Self::Output {
        let idx = self.index_of(pos);
        &mut self.tiles[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outside_reads_as_wall() {
        let mut map = BlockMap::new(4, 3);
        map.fill(TileType::None);
        map.set(1, 2, TileType::Door);
        assert_eq!(map.get(-1, 0), TileType::Wall);
        assert_eq!(map.get(4, 0), TileType::Wall);
        assert_eq!(map.get(1, 2), TileType::Door);
        assert_eq!(map[Position::new(0, 0)], TileType::None);
        assert_eq!(map.count(TileType::None), 11);
    }
}
