//! Collectible placement, pickup and respawn
//!
//! Items are seeded along the path segments at a fixed stride, skipping
//! blocked building footprints, with a guaranteed handful near the start
//! so the first seconds of a round always have something to chase. Pickup
//! is a radius test against the player on every committed move. Collected
//! items respawn after a delay at a spot picked uniformly from candidates
//! that keep distance from both the player and every live item.

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::CollectibleParams;
use crate::maze::{PathNetwork, Rect};

/// Lifecycle of one item slot. Slots persist across respawns; only the
/// position changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectibleState {
    Active,
    /// Picked up, waiting out the respawn delay.
    Collected,
}

#[derive(Debug, Clone, Copy)]
pub struct Collectible {
    pub id: u32,
    pub pos: Vec2,
    pub state: CollectibleState,
}

/// A pickup that happened during a collection check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollectedEvent {
    pub id: u32,
    pub pos: Vec2,
}

/// Owns every item slot and the respawn RNG.
#[derive(Debug)]
pub struct CollectibleManager {
    params: CollectibleParams,
    blocked: Vec<Rect>,
    items: Vec<Collectible>,
    rng: Pcg32,
}

impl CollectibleManager {
    pub fn new(params: CollectibleParams, blocked: Vec<Rect>, seed: u64) -> Self {
        Self {
            params,
            blocked,
            items: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    #[inline]
    pub fn items(&self) -> &[Collectible] {
        &self.items
    }

    pub fn active_count(&self) -> usize {
        self.items
            .iter()
            .filter(|c| c.state == CollectibleState::Active)
            .count()
    }

    fn item_index(&self, id: u32) -> Option<usize> {
        self.items.iter().position(|c| c.id == id)
    }

    /// Seed the board. Candidates near the start fill first up to the
    /// nearby guarantee, then the rest of the board fills to the cap,
    /// keeping the minimum spacing throughout.
    pub fn populate(&mut self, net: &PathNetwork, start: Vec2) {
        self.items.clear();

        let mut candidates = self.placement_candidates(net, self.params.stride, self.params.stride);
        candidates.retain(|&p| p.distance(start) >= self.params.start_clearance);

        // Near-start candidates first so the guarantee survives the cap.
        candidates.sort_by(|a, b| {
            let a_near = a.distance(start) <= self.params.nearby_radius;
            let b_near = b.distance(start) <= self.params.nearby_radius;
            b_near.cmp(&a_near)
        });

        let mut placed: Vec<Vec2> = Vec::new();
        let mut nearby = 0usize;
        for p in candidates {
            if placed.len() >= self.params.max_count {
                break;
            }
            let near = p.distance(start) <= self.params.nearby_radius;
            if near && nearby >= self.params.nearby_count {
                // Guarantee met; leave room for the rest of the board.
                continue;
            }
            if placed
                .iter()
                .any(|&q| q.distance(p) < self.params.respawn_min_spacing)
            {
                continue;
            }
            if near {
                nearby += 1;
            }
            placed.push(p);
        }

        self.items = placed
            .into_iter()
            .enumerate()
            .map(|(i, pos)| Collectible {
                id: i as u32,
                pos,
                state: CollectibleState::Active,
            })
            .collect();
        log::info!(
            "placed {} collectibles ({} near start)",
            self.items.len(),
            nearby
        );
    }

    /// Pick up every active item within the collection radius. Each event
    /// is reported exactly once; the slot flips to `Collected` so a
    /// repeated check at the same position finds nothing.
    pub fn check_collection(&mut self, player: Vec2) -> Vec<CollectedEvent> {
        let radius = self.params.collection_radius;
        let mut events = Vec::new();
        for item in &mut self.items {
            if item.state == CollectibleState::Active && item.pos.distance(player) <= radius {
                item.state = CollectibleState::Collected;
                events.push(CollectedEvent {
                    id: item.id,
                    pos: item.pos,
                });
            }
        }
        events
    }

    /// Respawn one collected item at a uniformly chosen candidate spot
    /// away from the player and from every live item. Returns false when
    /// the slot is not awaiting respawn or no candidate qualifies; the
    /// slot then stays collected.
    pub fn respawn(&mut self, id: u32, player: Vec2, net: &PathNetwork) -> bool {
        let Some(index) = self.item_index(id) else {
            log::warn!("respawn for unknown collectible {id}");
            return false;
        };
        if self.items[index].state != CollectibleState::Collected {
            return false;
        }

        let mut candidates =
            self.placement_candidates(net, self.params.respawn_stride, self.params.respawn_inset);
        candidates.retain(|&p| {
            p.distance(player) >= self.params.respawn_min_player_dist
                && self.items.iter().all(|c| {
                    c.state != CollectibleState::Active
                        || c.pos.distance(p) >= self.params.respawn_min_spacing
                })
        });
        if candidates.is_empty() {
            log::warn!("no respawn spot for collectible {id}; leaving it collected");
            return false;
        }

        let choice = candidates[self.rng.random_range(0..candidates.len())];
        let item = &mut self.items[index];
        item.pos = choice;
        item.state = CollectibleState::Active;
        log::debug!("collectible {id} respawned at {choice:?}");
        true
    }

    /// Walk every segment at `stride`, inset from both ends, dropping
    /// points inside blocked footprints.
    fn placement_candidates(&self, net: &PathNetwork, stride: f32, inset: f32) -> Vec<Vec2> {
        let mut candidates = Vec::new();
        for segment in net.segments() {
            let mut along = segment.start + inset;
            while along <= segment.end - inset {
                let p = segment.point_at(along);
                if !self.blocked.iter().any(|r| r.contains(p)) {
                    candidates.push(p);
                }
                along += stride;
            }
        }
        candidates
    }
}
