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

/// Reveal factor gained per frame unit.
pub const REVEAL_SPEED: f32 = 0.03;

/// Rooms and links sharing one reveal state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityGroup {
    pub rooms: Vec<usize>,
    pub links: Vec<usize>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RevealState {
    Hidden,
    Revealing,
    Revealed,
}

/// Fog-of-war state for one level.
///
/// Rooms joined by open (transparent) links are merged into a single group,
/// since standing in one of them exposes the other. Doored links are
/// attached to the group of every room they touch. Reveal never goes back.
#[derive(Debug, Clone, Default)]
pub struct VisibilityManager {
    groups: Vec<VisibilityGroup>,
    room_visible: Vec<bool>,
    link_visible: Vec<bool>,
    room_factor: Vec<f32>,
    link_factor: Vec<f32>,
}

impl VisibilityManager {
    pub fn new(dungeon: &Dungeon) -> Self {
        let mut manager = Self::default();
        manager.rebuild(dungeon);
        manager
    }

    pub fn rebuild(&mut self, dungeon: &Dungeon) {
        let room_count = dungeon.rooms.len();
        let link_count = dungeon.links.len();
        self.room_visible = vec![false; room_count];
        self.link_visible = vec![false; link_count];
        self.room_factor = vec![0.0; room_count];
        self.link_factor = vec![0.0; link_count];
        self.groups.clear();

        let mut group_of: Vec<Option<usize>> = vec![None; room_count];
        for (i, link) in dungeon.links.iter().enumerate() {
            if !link.transparent {
                continue;
            }
            let target = match (group_of[link.room1], group_of[link.room2]) {
                (Some(a), Some(b)) if a != b => {
                    // Fold b into a.
                    let merged = std::mem::take(&mut self.groups[b]);
                    for r in &merged.rooms {
                        group_of[*r] = Some(a);
                    }
                    self.groups[a].rooms.extend(merged.rooms);
                    self.groups[a].links.extend(merged.links);
                    a
                }
                (Some(a), _) | (_, Some(a)) => a,
                (None, None) => {
                    self.groups.push(VisibilityGroup::default());
                    self.groups.len() - 1
                }
            };
            for room in [link.room1, link.room2] {
                if group_of[room].is_none() {
                    group_of[room] = Some(target);
                    self.groups[target].rooms.push(room);
                }
            }
            self.groups[target].links.push(i);
        }
        self.groups.retain(|g| !g.rooms.is_empty());

        for room in 0..room_count {
            if !self.groups.iter().any(|g| g.rooms.contains(&room)) {
                self.groups.push(VisibilityGroup {
                    rooms: vec![room],
                    links: Vec::new(),
                });
            }
        }

        for (i, link) in dungeon.links.iter().enumerate() {
            if link.transparent {
                continue;
            }
            for group in self
                .groups
                .iter_mut()
                .filter(|g| g.rooms.contains(&link.room1) || g.rooms.contains(&link.room2))
            {
                if !group.links.contains(&i) {
                    group.links.push(i);
                }
            }
        }
    }

    pub fn groups(&self) -> &[VisibilityGroup] {
        &self.groups
    }

    pub fn group_of(&self, room: usize) -> Option<&VisibilityGroup> {
        self.groups.iter().find(|g| g.rooms.contains(&room))
    }

    /// Marks the room's whole group visible. `instant` skips the fade-in.
    pub fn reveal(&mut self, room: usize, instant: bool) {
        let Some(group) = self.groups.iter().find(|g| g.rooms.contains(&room)) else {
            return;
        };
        for idx in &group.rooms {
            self.room_visible[*idx] = true;
            if instant {
                self.room_factor[*idx] = 1.0;
            }
        }
        for idx in &group.links {
            self.link_visible[*idx] = true;
            if instant {
                self.link_factor[*idx] = 1.0;
            }
        }
    }

    /// Advances every visible entity by `REVEAL_SPEED * delta`, capped at 1.
    pub fn update(&mut self, delta: f32) {
        let step = REVEAL_SPEED * delta.max(0.0);
        for (factor, visible) in self.room_factor.iter_mut().zip(&self.room_visible) {
            if *visible {
                *factor = (*factor + step).min(1.0);
            }
        }
        for (factor, visible) in self.link_factor.iter_mut().zip(&self.link_visible) {
            if *visible {
                *factor = (*factor + step).min(1.0);
            }
        }
    }

    pub fn room_state(&self, index: usize) -> f32 {
        self.room_factor.get(index).copied().unwrap_or(0.0)
    }

    pub fn link_state(&self, index: usize) -> f32 {
        self.link_factor.get(index).copied().unwrap_or(0.0)
    }

    pub fn is_room_visible(&self, index: usize) -> bool {
        self.room_visible.get(index).copied().unwrap_or(false)
    }

    pub fn is_link_visible(&self, index: usize) -> bool {
        self.link_visible.get(index).copied().unwrap_or(false)
    }

    pub fn room_reveal_state(&self, index: usize) -> RevealState {
        Self::classify(self.is_room_visible(index), self.room_state(index))
    }

    pub fn link_reveal_state(&self, index: usize) -> RevealState {
        Self::classify(self.is_link_visible(index), self.link_state(index))
    }

    fn classify(visible: bool, factor: f32) -> RevealState {
        if !visible {
            RevealState::Hidden
        } else if factor >= 1.0 {
            RevealState::Revealed
        } else {
            RevealState::Revealing
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maps::dungeon::{Link, Room, RoomIntersection};
    use crate::tile::TileType;
    use crate::tile_map::BlockMap;

    fn link(room1: usize, room2: usize, transparent: bool) -> Link {
        let run = RoomIntersection {
            x: 0,
            y: 0,
            length: 3,
            vertical: false,
        };
        let tiles = if transparent {
            vec![TileType::None; 3]
        } else {
            vec![TileType::Wall, TileType::Door, TileType::Wall]
        };
        Link::new(room1, room2, run, tiles, transparent)
    }

    /// 0 =open= 1 -door- 2 =open= 3, and 3 =open= 1 joining both pairs,
    /// plus a lone room 4 behind a door from 2.
    fn dungeon() -> Dungeon {
        Dungeon {
            width: 20,
            height: 20,
            rooms: (0..5).map(|i| Room::new(i * 4, 1, 3, 3)).collect(),
            links: vec![
                link(0, 1, true),
                link(1, 2, false),
                link(2, 3, true),
                link(3, 1, true),
                link(2, 4, false),
            ],
            map: BlockMap::new(20, 20),
            start_room: 0,
            end_room: 4,
        }
    }

    #[test]
    fn open_links_merge_groups_transitively() {
        let manager = VisibilityManager::new(&dungeon());
        let group = manager.group_of(0).unwrap();
        let mut rooms = group.rooms.clone();
        rooms.sort();
        assert_eq!(rooms, vec![0, 1, 2, 3]);
        assert_eq!(manager.group_of(4).unwrap().rooms, vec![4]);
        assert_eq!(manager.groups().len(), 2);
        assert!(manager.group_of(4).unwrap().links.contains(&4));
        assert!(group.links.contains(&1));
        assert!(group.links.contains(&4));
    }

    #[test]
    fn reveal_is_idempotent_and_group_wide() {
        let mut manager = VisibilityManager::new(&dungeon());
        manager.reveal(2, false);
        let once: Vec<bool> = (0..5).map(|r| manager.is_room_visible(r)).collect();
        manager.update(10.0);
        let factor = manager.room_state(0);
        manager.reveal(2, false);
        let twice: Vec<bool> = (0..5).map(|r| manager.is_room_visible(r)).collect();
        assert_eq!(once, twice);
        assert_eq!(once, vec![true, true, true, true, false]);
        assert_eq!(manager.room_state(0), factor);
    }

    #[test]
    fn factors_grow_monotonically_to_one() {
        let mut manager = VisibilityManager::new(&dungeon());
        manager.reveal(4, false);
        assert_eq!(manager.room_reveal_state(4), RevealState::Revealing);
        let delta = 1.0;
        let ticks = (1.0 / (REVEAL_SPEED * delta)).ceil() as usize;
        let mut last = 0.0;
        for _ in 0..ticks {
            manager.update(delta);
            let now = manager.room_state(4);
            assert!(now >= last);
            last = now;
        }
        assert_eq!(manager.room_state(4), 1.0);
        assert_eq!(manager.room_reveal_state(4), RevealState::Revealed);
        assert_eq!(manager.room_state(0), 0.0);
        assert_eq!(manager.room_reveal_state(0), RevealState::Hidden);
    }

    #[test]
    fn instant_reveal_and_unknown_indices() {
        let mut manager = VisibilityManager::new(&dungeon());
        manager.reveal(4, true);
        assert_eq!(manager.room_state(4), 1.0);
        assert_eq!(manager.link_state(4), 1.0);
        assert_eq!(manager.room_state(99), 0.0);
        manager.reveal(99, false);
    }
}
