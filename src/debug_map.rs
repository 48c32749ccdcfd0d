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

use crate::maps::Dungeon;
use crate::tile::TileType;

pub fn tile_char(tile: TileType) -> char {
    match tile {
        TileType::None => '.',
        TileType::Wall => '#',
        TileType::Fence => ':',
        TileType::Door | TileType::FenceDoor => '+',
    }
}

/// Text dump of the block map, one line per row. Start and end room
/// centers are marked `S` and `E`.
pub fn render_ascii(dungeon: &Dungeon) -> String {
    let mut rows: Vec<Vec<char>> = (0..dungeon.map.height())
        .map(|y| (0..dungeon.map.width()).map(|x| tile_char(dungeon.map.get(x, y))).collect())
        .collect();

    let mut mark = |room: usize, c: char| {
        if let Some(r) = dungeon.rooms.get(room) {
            let (x, y) = ((r.x + r.width / 2) as usize, (r.y + r.height / 2) as usize);
            if let Some(cell) = rows.get_mut(y).and_then(|row| row.get_mut(x)) {
                *cell = c;
            }
        }
    };
    mark(dungeon.start_room, 'S');
    mark(dungeon.end_room, 'E');

    let mut out = String::with_capacity(rows.len() * (dungeon.map.width() as usize + 1));
    for row in rows {
        out.extend(row);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maps::{DebugDungeonGenerator, DungeonGenerator};

    #[test]
    fn debug_layout_dump() {
        let dungeon = DebugDungeonGenerator::new(12, 12).generate().unwrap();
        let text = render_ascii(&dungeon);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 12);
        assert_eq!(lines[0], "############");
        assert_eq!(lines[2], "##....######");
        assert_eq!(lines[4], "##..S.######");
        assert_eq!(lines[6], "####+#######");
        assert_eq!(lines[9], "##..E.######");
    }
}
