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
use std::f32::consts::FRAC_PI_2;

use log::warn;
use once_cell::sync::Lazy;

use crate::rooms::{DecoratedTile, WallType};
use crate::trimesh::tile_set::WALL_HEIGHT;

/// Line segment in tile-local coordinates, cell center at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlineSegment {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

const fn seg(x1: f32, y1: f32, x2: f32, y2: f32) -> OutlineSegment {
    OutlineSegment { x1, y1, x2, y2 }
}

/// Quarter circle approximation steps for rounded corners.
const ROUND_STEPS: usize = 4;

static SEGMENTS: Lazy<HashMap<WallType, Vec<OutlineSegment>>> = Lazy::new(|| {
    let straight = vec![seg(-0.5, 0.0, 0.5, 0.0)];
    let mut table = HashMap::new();
    for variant in [
        WallType::Normal,
        WallType::NormalWithHole,
        WallType::Torch,
        WallType::NormalAccent,
    ] {
        table.insert(variant, straight.clone());
    }
    table.insert(
        WallType::OutsideCorner,
        vec![seg(0.0, 0.5, 0.0, 0.0), seg(0.0, 0.0, 0.5, 0.0)],
    );
    table.insert(
        WallType::InsideCorner,
        vec![seg(0.0, 0.0, 0.0, -0.5), seg(-0.5, 0.0, 0.0, 0.0)],
    );

    let points: Vec<(f32, f32)> = (0..=ROUND_STEPS)
        .map(|i| {
            let angle = FRAC_PI_2 / ROUND_STEPS as f32 * i as f32;
            (angle.sin() * 0.5 - 0.5, angle.cos() * 0.5 - 0.5)
        })
        .collect();
    let round = points
        .windows(2)
        .map(|w| seg(w[0].0, w[0].1, w[1].0, w[1].1))
        .collect();
    table.insert(WallType::RoundInsideCorner, round);
    table
});

/// Outline segments of a wall variant; empty for joins, doors and the
/// variants without an outline.
pub fn segments_for(variant: WallType) -> &'static [OutlineSegment] {
    SEGMENTS.get(&variant).map(Vec::as_slice).unwrap_or(&[])
}

/// Rotated outline segments of wall tiles, local to the owning room/link.
pub fn tiles_outline<'a>(tiles: impl IntoIterator<Item = &'a DecoratedTile>) -> Vec<OutlineSegment> {
    let mut lines = Vec::new();
    for tile in tiles {
        let Some(variant) = tile.piece.wall_type() else {
            continue;
        };
        let rot = FRAC_PI_2 * (tile.angle + 2) as f32;
        let (sin, cos) = rot.sin_cos();
        let cx = tile.x as f32 + 0.5;
        let cy = tile.y as f32 + 0.5;
        for s in segments_for(variant) {
            lines.push(OutlineSegment {
                x1: s.x1 * cos - s.y1 * sin + cx,
                y1: s.x1 * sin + s.y1 * cos + cy,
                x2: s.x2 * cos - s.y2 * sin + cx,
                y2: s.x2 * sin + s.y2 * cos + cy,
            });
        }
    }
    lines
}

/// Position-only mesh of thin vertical quads, one per segment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutlineMesh {
    /// xyz per vertex.
    pub positions: Vec<f32>,
    pub indices: Vec<u16>,
}

impl OutlineMesh {
    /// Segments past the 16-bit index range are dropped.
    pub fn build(lines: &[OutlineSegment], offset_x: f32, offset_y: f32) -> Self {
        let mut mesh = OutlineMesh::default();
        for (i, l) in lines.iter().enumerate() {
            let vertex_count = i * 4;
            if vertex_count + 4 > u16::MAX as usize + 1 {
                warn!("outline full, dropping {} segments", lines.len() - i);
                break;
            }
            let base = vertex_count as u16;
            let (x1, y1) = (l.x1 + offset_x, l.y1 + offset_y);
            let (x2, y2) = (l.x2 + offset_x, l.y2 + offset_y);
            mesh.positions.extend_from_slice(&[
                x1,
                WALL_HEIGHT,
                y1,
                x2,
                WALL_HEIGHT,
                y2,
                x1,
                0.0,
                y1,
                x2,
                0.0,
                y2,
            ]);
            mesh.indices
                .extend_from_slice(&[base, base + 2, base + 1, base + 1, base + 2, base + 3]);
        }
        mesh
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn segment_count(&self) -> usize {
        self.positions.len() / 12
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rooms::TilePiece;

    fn wall(x: i32, y: i32, variant: WallType, angle: i32) -> DecoratedTile {
        DecoratedTile {
            x,
            y,
            piece: TilePiece::Wall(variant),
            group: 0,
            angle,
        }
    }

    #[test]
    fn table_shapes() {
        assert_eq!(segments_for(WallType::Torch).len(), 1);
        assert_eq!(segments_for(WallType::OutsideCorner).len(), 2);
        assert_eq!(segments_for(WallType::RoundInsideCorner).len(), ROUND_STEPS);
        assert!(segments_for(WallType::ThinJoin).is_empty());
        assert!(segments_for(WallType::Door).is_empty());
    }

    #[test]
    fn upper_wall_outline_runs_through_the_wall_cell() {
        // Wall above local cell (1, 0); angle 0 turns it by half a circle.
        let lines = tiles_outline([&wall(1, -1, WallType::Normal, 0)]);
        assert_eq!(lines.len(), 1);
        let l = lines[0];
        assert!((l.y1 + 0.5).abs() < 1e-5 && (l.y2 + 0.5).abs() < 1e-5);
        assert!((l.x1 - 2.0).abs() < 1e-5 && (l.x2 - 1.0).abs() < 1e-5);
    }

    #[test]
    fn outline_quads_are_offset_into_world() {
        let lines = [seg(0.0, 0.0, 1.0, 0.0), seg(1.0, 0.0, 1.0, 1.0)];
        let mesh = OutlineMesh::build(&lines, 10.0, 20.0);
        assert_eq!(mesh.segment_count(), 2);
        assert_eq!(mesh.indices.len(), 12);
        assert_eq!(&mesh.positions[0..3], &[10.0, WALL_HEIGHT, 20.0]);
        assert_eq!(mesh.indices[6], 4);
        assert!(OutlineMesh::build(&[], 0.0, 0.0).is_empty());
    }

    #[test]
    fn oversized_outline_is_truncated_not_wrapped() {
        let max = (u16::MAX as usize + 1) / 4;
        let lines = vec![seg(0.0, 0.0, 1.0, 0.0); max + 3];
        let mesh = OutlineMesh::build(&lines, 0.0, 0.0);
        assert_eq!(mesh.segment_count(), max);
        assert_eq!(mesh.indices.len(), max * 6);
        let last = *mesh.indices.iter().max().unwrap();
        assert_eq!(last as usize, max * 4 - 1);
    }
}
