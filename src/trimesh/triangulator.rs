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

use log::{debug, trace, warn};

use crate::maps::dungeon::{Dungeon, Link, Room};
use crate::rooms::{DecoratedLink, DecoratedRoom, DecoratedTile, TilePiece};
use crate::trimesh::lights::{LightDef, scan_lights};
use crate::trimesh::outline::{OutlineMesh, tiles_outline};
use crate::trimesh::tile_set::{TileMesh, TileSource, VERTEX_STRIDE};

/// Directional wall buckets: the 3x3 ring around a room minus its center.
pub const WALL_SLOTS: usize = 8;

/// Interleaved vertex buffer (8 floats per vertex) with 16-bit indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Surface {
    pub vertices: Vec<f32>,
    pub indices: Vec<u16>,
}

/// Where and how a tile mesh lands in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub offset_x: i32,
    pub offset_y: i32,
    pub x: f32,
    pub y: f32,
    pub height: f32,
    /// Quarter turns.
    pub angle: f32,
    pub scale: f32,
}

impl Surface {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / VERTEX_STRIDE
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Appends a rotated, scaled and translated copy of `mesh`. Returns
    /// `false` when the 16-bit index range would overflow.
    pub fn place_tile(&mut self, mesh: &TileMesh, at: &Placement) -> bool {
        let base = self.vertex_count();
        if base + mesh.vertex_count() > u16::MAX as usize + 1 {
            warn!("surface full, dropping tile at ({}, {})", at.x, at.y);
            return false;
        }

        let rot = FRAC_PI_2 * (at.angle + 2.0);
        let (sin, cos) = rot.sin_cos();
        for v in mesh.vertices.chunks_exact(VERTEX_STRIDE) {
            let [vx, vy, vz, nx, ny, nz, u, tv] = [v[0], v[1], v[2], v[3], v[4], v[5], v[6], v[7]];
            self.vertices.extend_from_slice(&[
                (vx * cos - vz * sin) * at.scale + at.x + 0.5 + at.offset_x as f32,
                vy * at.scale + at.height,
                (vx * sin + vz * cos) * at.scale + at.y + 0.5 + at.offset_y as f32,
                nx * cos - nz * sin,
                ny,
                nx * sin + nz * cos,
                u,
                tv,
            ]);
        }
        let base = base as u16;
        self.indices.extend(mesh.indices.iter().map(|i| i + base));
        true
    }
}

/// Prop placed freely in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneryProp {
    pub name: String,
    pub group: u32,
    pub variant: u32,
    pub x: f32,
    pub y: f32,
    pub height: f32,
    /// Radians around the vertical axis.
    pub rotation: f32,
    pub scale: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangulatedRoom {
    pub room: usize,
    pub walls: [Surface; WALL_SLOTS],
    pub floor: Surface,
    pub outline: [OutlineMesh; WALL_SLOTS],
    pub lights: Vec<LightDef>,
    pub scenery: Vec<SceneryProp>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangulatedLink {
    pub link: usize,
    pub walls: [Surface; WALL_SLOTS],
    pub floor: Surface,
    pub outline: [OutlineMesh; WALL_SLOTS],
}

/// Slot of a wall tile at local `(x, y)` around a `width` x `height` box.
/// Cells inside the box share the left slot.
pub fn wall_slot(x: i32, y: i32, width: i32, height: i32) -> usize {
    let column = |v: i32, size: i32| {
        if v == -1 {
            0
        } else if v == size {
            2
        } else {
            1
        }
    };
    let idx = column(y, height) * 3 + column(x, width);
    if idx >= 4 { idx - 1 } else { idx }
}

/// Bakes decorated tiles into per-room and per-link buffers.
pub struct RoomTriangulator<'a> {
    tiles: &'a dyn TileSource,
}

impl<'a> RoomTriangulator<'a> {
    pub fn new(tiles: &'a dyn TileSource) -> Self {
        Self { tiles }
    }

    pub fn triangulate(
        &self,
        dungeon: &Dungeon,
        rooms: &[DecoratedRoom],
        links: &[DecoratedLink],
    ) -> (Vec<TriangulatedRoom>, Vec<TriangulatedLink>) {
        let rooms: Vec<TriangulatedRoom> = rooms
            .iter()
            .map(|r| self.triangulate_room(&dungeon.rooms[r.room], r))
            .collect();
        let links: Vec<TriangulatedLink> = links
            .iter()
            .map(|l| self.triangulate_link(&dungeon.links[l.link], l))
            .collect();
        debug!(
            "triangulated {} rooms ({} lights), {} links",
            rooms.len(),
            rooms.iter().map(|r| r.lights.len()).sum::<usize>(),
            links.len()
        );
        (rooms, links)
    }

    pub fn triangulate_room(&self, room: &Room, decorated: &DecoratedRoom) -> TriangulatedRoom {
        let mut out = TriangulatedRoom {
            room: decorated.room,
            ..TriangulatedRoom::default()
        };
        let outline_tiles = self.bake(
            &decorated.tiles,
            (room.x, room.y),
            (room.width, room.height),
            &mut out.walls,
            &mut out.floor,
        );
        out.outline = build_outlines(&outline_tiles, room.x, room.y);
        out.lights = scan_lights(&decorated.tiles, room);

        for tile in decorated.tiles.iter().filter(|t| t.piece == TilePiece::Fireplace) {
            out.scenery.push(SceneryProp {
                name: tile.piece.name().to_string(),
                group: tile.group,
                variant: tile.piece.variant(),
                x: (tile.x + room.x) as f32 + 0.5,
                y: (tile.y + room.y) as f32 + 0.5,
                height: 0.0,
                rotation: 0.0,
                scale: 1.0,
            });
        }
        for hint in &decorated.scenery {
            out.scenery.push(SceneryProp {
                name: hint.name.clone(),
                group: hint.group,
                variant: hint.variant,
                x: hint.x + 0.5 + room.x as f32,
                y: hint.y + 0.5 + room.y as f32,
                height: hint.height.unwrap_or(0.0),
                rotation: hint.angle * -FRAC_PI_2,
                scale: hint.scale.unwrap_or(1.0),
            });
        }
        out
    }

    pub fn triangulate_link(&self, link: &Link, decorated: &DecoratedLink) -> TriangulatedLink {
        let mut out = TriangulatedLink {
            link: decorated.link,
            ..TriangulatedLink::default()
        };
        let outline_tiles = self.bake(
            &decorated.tiles,
            (link.x, link.y),
            link.extent(),
            &mut out.walls,
            &mut out.floor,
        );
        out.outline = build_outlines(&outline_tiles, link.x, link.y);
        out
    }

    /// Places floor and wall tiles, returning wall tiles grouped by slot.
    fn bake<'t>(
        &self,
        tiles: &'t [DecoratedTile],
        (offset_x, offset_y): (i32, i32),
        (width, height): (i32, i32),
        walls: &mut [Surface; WALL_SLOTS],
        floor: &mut Surface,
    ) -> [Vec<&'t DecoratedTile>; WALL_SLOTS] {
        let mut outline_tiles: [Vec<&DecoratedTile>; WALL_SLOTS] = Default::default();
        for tile in tiles {
            let surface = match tile.piece {
                TilePiece::Floor(_) => &mut *floor,
                TilePiece::Wall(_) => {
                    let slot = wall_slot(tile.x, tile.y, width, height);
                    outline_tiles[slot].push(tile);
                    &mut walls[slot]
                }
                TilePiece::Fireplace => continue,
            };
            let name = tile.piece.name();
            let variant = tile.piece.variant();
            let Some(mesh) = self.tiles.tile(name, tile.group, variant) else {
                trace!("no mesh for {name}/{}/{variant}", tile.group);
                continue;
            };
            surface.place_tile(
                mesh,
                &Placement {
                    offset_x,
                    offset_y,
                    x: tile.x as f32,
                    y: tile.y as f32,
                    height: 0.0,
                    angle: tile.angle as f32,
                    scale: 1.0,
                },
            );
        }
        outline_tiles
    }
}

fn build_outlines(tiles: &[Vec<&DecoratedTile>; WALL_SLOTS], offset_x: i32, offset_y: i32) -> [OutlineMesh; WALL_SLOTS] {
    std::array::from_fn(|slot| {
        let lines = tiles_outline(tiles[slot].iter().copied());
        OutlineMesh::build(&lines, offset_x as f32, offset_y as f32)
    })
}
