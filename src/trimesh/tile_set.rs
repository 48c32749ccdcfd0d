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

use std::collections::HashMap;

use crate::config::LevelTheme;
use crate::rooms::WallType;

/// Floats per vertex: position xyz, normal xyz, uv.
pub const VERTEX_STRIDE: usize = 8;
/// Wall mesh height in world units.
pub const WALL_HEIGHT: f32 = 1.565;

/// Interleaved tile mesh in tile-local space, centered on the cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TileMesh {
    pub vertices: Vec<f32>,
    pub indices: Vec<u16>,
}

impl TileMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / VERTEX_STRIDE
    }

    fn push_quad(&mut self, corners: [[f32; 3]; 4], normal: [f32; 3]) {
        let base = self.vertex_count() as u16;
        let uvs = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        for (c, uv) in corners.iter().zip(uvs) {
            self.vertices.extend_from_slice(c);
            self.vertices.extend_from_slice(&normal);
            self.vertices.extend_from_slice(&uv);
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Flat square on the ground.
    pub fn floor_quad() -> Self {
        let mut mesh = TileMesh::default();
        mesh.push_quad(
            [[-0.5, 0.0, -0.5], [-0.5, 0.0, 0.5], [0.5, 0.0, 0.5], [0.5, 0.0, -0.5]],
            [0.0, 1.0, 0.0],
        );
        mesh
    }

    /// Upright panel on the cell's -z edge, facing -z. Placement turns it to
    /// face the owning room.
    pub fn wall_quad() -> Self {
        let mut mesh = TileMesh::default();
        mesh.push_quad(
            [
                [-0.5, 0.0, -0.5],
                [0.5, 0.0, -0.5],
                [0.5, WALL_HEIGHT, -0.5],
                [-0.5, WALL_HEIGHT, -0.5],
            ],
            [0.0, 0.0, -1.0],
        );
        mesh
    }

    /// Axis-aligned box standing on the ground.
    pub fn cuboid(half: f32, height: f32) -> Self {
        let mut mesh = TileMesh::default();
        let (l, h) = (-half, half);
        mesh.push_quad([[l, height, l], [l, height, h], [h, height, h], [h, height, l]], [0.0, 1.0, 0.0]);
        mesh.push_quad([[l, 0.0, h], [h, 0.0, h], [h, height, h], [l, height, h]], [0.0, 0.0, 1.0]);
        mesh.push_quad([[h, 0.0, l], [l, 0.0, l], [l, height, l], [h, height, l]], [0.0, 0.0, -1.0]);
        mesh.push_quad([[h, 0.0, h], [h, 0.0, l], [h, height, l], [h, height, h]], [1.0, 0.0, 0.0]);
        mesh.push_quad([[l, 0.0, l], [l, 0.0, h], [l, height, h], [l, height, l]], [-1.0, 0.0, 0.0]);
        mesh
    }
}

/// Mesh lookup by base name, theme group and variant.
pub trait TileSource {
    fn tile(&self, name: &str, group: u32, variant: u32) -> Option<&TileMesh>;
}

#[derive(Debug, Clone, Default)]
pub struct TileSet {
    tiles: HashMap<(String, u32, u32), TileMesh>,
}

impl TileSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, group: u32, variant: u32, mesh: TileMesh) {
        self.tiles.insert((name.to_string(), group, variant), mesh);
    }

    /// Stand-in geometry for every mesh the pipeline asks for: quads for
    /// floors and walls in every theme, boxes for fireplaces and crates.
    pub fn placeholder() -> Self {
        let mut set = TileSet::new();
        let themes = [
            LevelTheme::Church,
            LevelTheme::Crypt,
            LevelTheme::Castle,
            LevelTheme::Basement,
            LevelTheme::Cave,
        ];
        let floor = TileMesh::floor_quad();
        let wall = TileMesh::wall_quad();
        for theme in themes {
            let group = theme.group();
            for variant in 0..3 {
                set.insert("floor", group, variant, floor.clone());
            }
            for variant in 0..=WallType::InsideCorner as u32 {
                set.insert("wall", group, variant, wall.clone());
            }
        }
        set.insert("fireplace", 0, 0, TileMesh::cuboid(0.35, 0.6));
        set.insert("box", 0, 0, TileMesh::cuboid(0.3, 0.6));
        set
    }
}

impl TileSource for TileSet {
    fn tile(&self, name: &str, group: u32, variant: u32) -> Option<&TileMesh> {
        self.tiles.get(&(name.to_string(), group, variant))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_covers_every_theme() {
        let set = TileSet::placeholder();
        for group in 0..5 {
            assert!(set.tile("floor", group, 2).is_some());
            assert!(set.tile("wall", group, WallType::Door as u32).is_some());
        }
        assert!(set.tile("box", 0, 0).is_some());
        assert!(set.tile("wall", 7, 0).is_none());
        assert!(set.tile("column", 0, 0).is_none());
    }

    #[test]
    fn meshes_are_well_formed() {
        for mesh in [TileMesh::floor_quad(), TileMesh::wall_quad(), TileMesh::cuboid(0.3, 0.5)] {
            assert_eq!(mesh.vertices.len() % VERTEX_STRIDE, 0);
            assert_eq!(mesh.indices.len() % 3, 0);
            let count = mesh.vertex_count() as u16;
            assert!(mesh.indices.iter().all(|i| *i < count));
        }
        assert_eq!(TileMesh::cuboid(0.3, 0.5).vertex_count(), 20);
    }
}
