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

use log::trace;
use pathfinding::prelude::bfs;
use serde::{Deserialize, Serialize};

use crate::maps::door::Door;
use crate::maps::dungeon::{Dungeon, Link, Room};
use crate::maps::visibility::VisibilityManager;
use crate::point_f::{PointF, clamp, lines_intersect, saturate};
use crate::tile::TileType;

/// Slack around room rectangles when picking a room by point.
const ROOM_GAP: f32 = 0.48;
/// Keeps clamped points strictly inside the room.
const ROOM_INSET: f32 = 0.01;
/// Trim at both ends of an open link's walkable segment.
const GAP_TRIM: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavNode {
    Room(usize),
    Link(usize),
}

/// Graph node a point resolved to, with the point adjusted to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Located {
    pub node: NavNode,
    pub point: PointF,
}

/// Waypoint handed to the movement controller. A radius of 0 marks a
/// pass-through point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathNode {
    pub position: PointF,
    pub radius: f32,
}

/// Room/link graph search over a level's current door and reveal state.
pub struct Navigator<'a> {
    dungeon: &'a Dungeon,
    visibility: &'a VisibilityManager,
    doors: &'a [Door],
}

impl<'a> Navigator<'a> {
    pub fn new(dungeon: &'a Dungeon, visibility: &'a VisibilityManager, doors: &'a [Door]) -> Self {
        Self {
            dungeon,
            visibility,
            doors,
        }
    }

    /// Waypoints from `from` to `to`. `target` is the index of a door the
    /// caller is walking up to; that door counts as passable.
    pub fn build_path(
        &self,
        from: PointF,
        to: PointF,
        to_radius: f32,
        target: Option<usize>,
    ) -> Option<Vec<PathNode>> {
        let start = self.find_room_or_link(from)?;
        let goal = self.find_room_or_link(to)?;

        let finish = PathNode {
            position: goal.point,
            radius: to_radius,
        };
        if start.node == goal.node {
            return Some(vec![finish]);
        }

        let Some(route) = self.find_route(start.node, goal.node, target) else {
            trace!("no route from {:?} to {:?}", start.node, goal.node);
            return None;
        };

        let mut nodes: Vec<PathNode> = Vec::new();
        for (i, node) in route.iter().enumerate() {
            let NavNode::Room(room) = *node else {
                continue;
            };

            if let Some(NavNode::Link(prev)) = i.checked_sub(1).map(|p| route[p]) {
                if !self.dungeon.links[prev].transparent {
                    nodes.push(PathNode {
                        position: self.find_link_point(room, prev, None),
                        radius: 0.0,
                    });
                }
            }

            if let Some(NavNode::Link(next)) = route.get(i + 1).copied() {
                let link = &self.dungeon.links[next];
                if link.transparent {
                    let ahead = match route.get(i + 3) {
                        Some(NavNode::Link(after)) => {
                            self.find_link_point(link.other_room(room), *after, None)
                        }
                        _ => goal.point,
                    };
                    let last = nodes.last().map_or(from, |n| n.position);
                    nodes.push(PathNode {
                        position: self.find_link_point(room, next, Some((last, ahead))),
                        radius: 0.0,
                    });
                }
            }
        }
        nodes.push(finish);

        Some(nodes)
    }

    /// Room containing the point (with some slack) among revealed rooms,
    /// else a revealed link whose cell under the point is passable.
    pub fn find_room_or_link(&self, point: PointF) -> Option<Located> {
        let (x, y) = (point.x, point.y);
        for (i, room) in self.dungeon.rooms.iter().enumerate() {
            if self.visibility.room_state(i) > 0.0
                && room.x as f32 <= x + ROOM_GAP
                && room.y as f32 <= y + ROOM_GAP
                && (room.x + room.width) as f32 >= x - ROOM_GAP
                && (room.y + room.height) as f32 >= y - ROOM_GAP
            {
                let clamped = PointF::new(
                    clamp(x, room.x as f32 + ROOM_INSET, (room.x + room.width) as f32 - ROOM_INSET),
                    clamp(y, room.y as f32 + ROOM_INSET, (room.y + room.height) as f32 - ROOM_INSET),
                );
                return Some(Located {
                    node: NavNode::Room(i),
                    point: clamped,
                });
            }
        }

        let (fx, fy) = point.floor();
        for (i, link) in self.dungeon.links.iter().enumerate() {
            if self.visibility.link_state(i) <= 0.0 {
                continue;
            }
            if let Some(tile) = link.tile_at(fx, fy) {
                if !tile.is_blocking() {
                    return Some(Located {
                        node: NavNode::Link(i),
                        point,
                    });
                }
            }
        }

        None
    }

    /// A link is passable through an open cell, an open door, or the door
    /// being targeted.
    pub fn link_blocked(&self, link: &Link, target: Option<usize>) -> bool {
        for (i, tile) in link.tiles.iter().enumerate() {
            match tile {
                TileType::None => return false,
                TileType::Door | TileType::FenceDoor => {
                    let cell = link.cell(i as i32);
                    let passable = self.doors.iter().enumerate().any(|(idx, door)| {
                        door.x == cell.x && door.y == cell.y && (door.is_open() || target == Some(idx))
                    });
                    if passable {
                        return false;
                    }
                }
                _ => {}
            }
        }
        true
    }

    /// Shortest room/link sequence from `start` to `goal` skipping blocked
    /// links.
    pub fn find_route(&self, start: NavNode, goal: NavNode, target: Option<usize>) -> Option<Vec<NavNode>> {
        bfs(
            &start,
            |node| match *node {
                NavNode::Room(room) => self.dungeon.rooms[room]
                    .links
                    .iter()
                    .filter(|l| !self.link_blocked(&self.dungeon.links[**l], target))
                    .map(|l| NavNode::Link(*l))
                    .collect::<Vec<_>>(),
                NavNode::Link(link) => {
                    let link = &self.dungeon.links[link];
                    vec![NavNode::Room(link.room1), NavNode::Room(link.room2)]
                }
            },
            |node| *node == goal,
        )
    }

    /// Where to cross `link` when standing in `room`. Doored links give the
    /// door cell center pushed half a cell into `room`; open links give the
    /// point where the segment `route` crosses the opening, or the middle of
    /// the opening when there is no usable crossing.
    pub fn find_link_point(&self, room: usize, link: usize, route: Option<(PointF, PointF)>) -> PointF {
        let room_rect: &Room = &self.dungeon.rooms[room];
        let link_ref: &Link = &self.dungeon.links[link];

        let door = link_ref.tiles.iter().position(|t| {
            if link_ref.transparent {
                t.is_door()
            } else {
                *t == TileType::Door
            }
        });
        let by_door = !link_ref.transparent || door.is_some();
        let start = door.unwrap_or(0) as f32;
        let end = link_ref.length as f32;

        let (dir_x, dir_y) = if link_ref.vertical {
            (if link_ref.x == room_rect.x + room_rect.width { -1.0 } else { 1.0 }, 0.0)
        } else {
            (0.0, if link_ref.y == room_rect.y + room_rect.height { -1.0 } else { 1.0 })
        };

        let lx = link_ref.x as f32;
        let ly = link_ref.y as f32;
        if by_door {
            let (sx, sy) = if link_ref.vertical { (0.0, start) } else { (start, 0.0) };
            return PointF::new(lx + 0.5 + sx + dir_x * 0.5, ly + 0.5 + sy + dir_y * 0.5);
        }

        let dir = if link_ref.vertical {
            PointF::new(0.0, 1.0)
        } else {
            PointF::new(1.0, 0.0)
        };
        let origin = PointF::new(lx + dir.y * 0.5, ly + dir.x * 0.5);
        let seg_start = origin + dir * (start + GAP_TRIM);
        let seg_end = origin + dir * (end - GAP_TRIM);

        let Some((prev, next)) = route else {
            return seg_start.lerp(seg_end, 0.5);
        };
        let Some((_, delta)) = lines_intersect(seg_start, seg_end, prev, next) else {
            return seg_start.lerp(seg_end, 0.5);
        };

        let other = &self.dungeon.rooms[link_ref.other_room(room)];
        let factor = if delta < 0.0 {
            let before = if link_ref.vertical {
                link_ref.y > other.y
            } else {
                link_ref.x > other.x
            };
            if before { -1.0 } else { 1.0 }
        } else if delta > 1.0 {
            let short = if link_ref.vertical {
                link_ref.y + link_ref.length < other.y + other.height
            } else {
                link_ref.x + link_ref.length < other.x + other.width
            };
            if short { -1.0 } else { 1.0 }
        } else {
            0.0
        };

        seg_start.lerp(seg_end, saturate(delta)) + PointF::new(dir_x * 0.5 * factor, dir_y * 0.5 * factor)
    }
}
