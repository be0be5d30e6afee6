//! Entity registry
//!
//! Owns every live entity of a session. Membership in the four logical
//! collections (updatable, drawable, asteroids, shots) is fixed by the
//! variant when the entity is constructed. Entities spawned while a pass
//! is running wait in a [`SpawnQueue`] until [`Registry::flush`]; dead
//! entities stay in place until [`Registry::purge`].

use rand::Rng;

use super::asteroid::Asteroid;
use super::entity::{Entity, EntityId, Group, Update, UpdateCtx};
use super::player::Player;
use super::shot::Shot;
use super::state::GameEvent;
use super::tick::TickInput;
use crate::tuning::Tuning;

/// Something new entities can be registered into
pub trait Spawn {
    fn spawn(&mut self, entity: Entity) -> EntityId;
}

/// A registered entity and the collections it belongs to
#[derive(Debug, Clone)]
pub struct Slot {
    pub id: EntityId,
    pub groups: &'static [Group],
    pub entity: Entity,
}

impl Slot {
    #[inline]
    fn live_in(&self, group: Group) -> bool {
        self.entity.is_alive() && self.groups.contains(&group)
    }
}

/// Entities waiting to join the registry
#[derive(Debug, Default)]
pub struct SpawnQueue {
    pending: Vec<Slot>,
    next_id: u32,
}

impl SpawnQueue {
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Spawn for SpawnQueue {
    fn spawn(&mut self, entity: Entity) -> EntityId {
        self.next_id += 1;
        let id = EntityId(self.next_id);
        self.pending.push(Slot {
            id,
            groups: entity.groups(),
            entity,
        });
        id
    }
}

/// Collection sizes (live entities only)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Census {
    pub updatable: usize,
    pub drawable: usize,
    pub asteroids: usize,
    pub shots: usize,
}

/// All entities of a session, sorted by id
#[derive(Debug, Default)]
pub struct Registry {
    slots: Vec<Slot>,
    queue: SpawnQueue,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move queued entities into the live set
    ///
    /// Ids are handed out in increasing order, so appending keeps the
    /// slots sorted.
    pub fn flush(&mut self) {
        self.slots.append(&mut self.queue.pending);
    }

    /// Drop dead entities; returns how many were removed
    pub fn purge(&mut self) -> usize {
        let before = self.slots.len();
        self.slots.retain(|slot| slot.entity.is_alive());
        before - self.slots.len()
    }

    /// Remove everything, queued entities included (ids are not reused)
    pub fn clear(&mut self) {
        self.slots.clear();
        self.queue.pending.clear();
    }

    /// Number of registered entities (dead ones count until purged)
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Entities spawned since the last flush
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.slots.binary_search_by_key(&id, |slot| slot.id).ok()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.index_of(id).map(|i| &self.slots[i].entity)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.index_of(id).map(move |i| &mut self.slots[i].entity)
    }

    /// Live members of a collection, in id order
    pub fn in_group(&self, group: Group) -> impl Iterator<Item = (EntityId, &Entity)> + '_ {
        self.slots
            .iter()
            .filter(move |slot| slot.live_in(group))
            .map(|slot| (slot.id, &slot.entity))
    }

    /// Snapshot of the live ids in a collection
    pub fn ids_in(&self, group: Group) -> Vec<EntityId> {
        self.in_group(group).map(|(id, _)| id).collect()
    }

    pub fn updatable(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.in_group(Group::Updatable).map(|(_, e)| e)
    }

    pub fn drawable(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.in_group(Group::Drawable).map(|(_, e)| e)
    }

    pub fn asteroids(&self) -> impl Iterator<Item = &Asteroid> + '_ {
        self.in_group(Group::Asteroids)
            .filter_map(|(_, e)| e.as_asteroid())
    }

    pub fn shots(&self) -> impl Iterator<Item = &Shot> + '_ {
        self.in_group(Group::Shots).filter_map(|(_, e)| e.as_shot())
    }

    pub fn player(&self, id: EntityId) -> Option<&Player> {
        self.get(id).and_then(Entity::as_player)
    }

    pub fn player_mut(&mut self, id: EntityId) -> Option<&mut Player> {
        self.get_mut(id).and_then(Entity::as_player_mut)
    }

    pub fn census(&self) -> Census {
        Census {
            updatable: self.in_group(Group::Updatable).count(),
            drawable: self.in_group(Group::Drawable).count(),
            asteroids: self.in_group(Group::Asteroids).count(),
            shots: self.in_group(Group::Shots).count(),
        }
    }

    /// Advance every live updatable entity
    ///
    /// Entities killed earlier in the pass are skipped. Anything spawned
    /// during the pass is queued, not updated.
    pub fn update_all(
        &mut self,
        dt: f32,
        tuning: &Tuning,
        input: &TickInput,
        events: &mut Vec<GameEvent>,
    ) {
        let Registry { slots, queue } = self;
        let mut ctx = UpdateCtx {
            tuning,
            input,
            spawns: queue,
            events,
        };
        for slot in slots.iter_mut() {
            if slot.live_in(Group::Updatable) {
                slot.entity.update(dt, &mut ctx);
            }
        }
    }

    /// Destroy an asteroid, queueing its fragments
    ///
    /// Returns the number of fragments, or `None` if `id` is not a live
    /// asteroid.
    pub fn destroy_asteroid(
        &mut self,
        id: EntityId,
        rng: &mut impl Rng,
        tuning: &Tuning,
    ) -> Option<usize> {
        let index = self.index_of(id)?;
        let Registry { slots, queue } = self;
        let asteroid = slots[index].entity.as_asteroid_mut()?;
        if !asteroid.body.alive {
            return None;
        }
        Some(asteroid.destroy(rng, queue, tuning))
    }
}

impl Spawn for Registry {
    fn spawn(&mut self, entity: Entity) -> EntityId {
        self.queue.spawn(entity)
    }
}
