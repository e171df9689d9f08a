//! # Registry Module
//!
//! A minimal entity-component registry backing level geometry and spawning.
//!
//! Entities are opaque integer handles into dense parallel component arrays,
//! one array per component kind. There is no inheritance and no per-entity
//! object: `has`/`get`/`insert` are array-presence operations, and removing
//! an entity sweeps it out of every store.

use crate::geometry::Vec2;
use crate::level::DoorConnection;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An opaque entity handle.
///
/// Handle 0 is reserved as the invalid entity so factories can signal a
/// failed spawn without an optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity(pub u32);

impl Entity {
    /// The reserved invalid handle.
    pub const INVALID: Entity = Entity(0);

    /// True for any handle other than the reserved invalid one.
    pub fn is_valid(self) -> bool {
        self.0 != 0
    }
}

/// A dense store of one component kind.
///
/// Components and their owning entities live in two parallel vectors; a side
/// index maps entity to slot. Iteration runs in insertion order. Removal is
/// swap-remove, so it does not preserve order of the remaining entries.
#[derive(Debug, Clone, Default)]
pub struct ComponentStore<T> {
    entities: Vec<Entity>,
    components: Vec<T>,
    index: HashMap<Entity, usize>,
}

impl<T> ComponentStore<T> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            components: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Inserts a component for an entity, replacing any existing one.
    pub fn insert(&mut self, entity: Entity, component: T) -> &mut T {
        match self.index.get(&entity) {
            Some(&slot) => {
                self.components[slot] = component;
                &mut self.components[slot]
            }
            None => {
                let slot = self.entities.len();
                self.entities.push(entity);
                self.components.push(component);
                self.index.insert(entity, slot);
                &mut self.components[slot]
            }
        }
    }

    /// True if the entity has a component in this store.
    pub fn has(&self, entity: Entity) -> bool {
        self.index.contains_key(&entity)
    }

    /// Borrows the component for an entity, if present.
    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.index.get(&entity).map(|&slot| &self.components[slot])
    }

    /// Mutably borrows the component for an entity, if present.
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        match self.index.get(&entity) {
            Some(&slot) => Some(&mut self.components[slot]),
            None => None,
        }
    }

    /// Removes the component for an entity, returning it if present.
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let slot = self.index.remove(&entity)?;
        self.entities.swap_remove(slot);
        let component = self.components.swap_remove(slot);
        // The swapped-in entry (if any) changed slots; fix its index.
        if slot < self.entities.len() {
            self.index.insert(self.entities[slot], slot);
        }
        Some(component)
    }

    /// Number of components in the store.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True if no entity has a component here.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// All entities holding a component, in insertion order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Iterates over (entity, component) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.entities.iter().copied().zip(self.components.iter())
    }

    /// Drops all components.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.components.clear();
        self.index.clear();
    }
}

/// Placement and footprint of an entity in pixel coordinates.
///
/// `scale` is the axis-aligned footprint used for overlap tests; negative
/// components are allowed (sprite flipping) and the footprint is its
/// absolute extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub position: Vec2,
    pub scale: Vec2,
    pub angle: f32,
}

impl Position {
    /// Creates a position with the given center and footprint, no rotation.
    pub fn new(position: Vec2, scale: Vec2) -> Self {
        Self {
            position,
            scale,
            angle: 0.0,
        }
    }
}

/// Marker for the player entity.
#[derive(Debug, Clone, Copy, Default)]
pub struct Player;

/// Marker for wall entities of the current room.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActiveWall;

/// Marker for door entities in the current room.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActiveDoor;

/// Marker for hostile entities.
#[derive(Debug, Clone, Copy, Default)]
pub struct Enemy;

/// Marker for pickups the player can consume.
#[derive(Debug, Clone, Copy, Default)]
pub struct Consumable;

/// Entity kinds referenced by breakables and interactables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Crate,
    MetalCrate,
    Rock,
    PressurePlate,
    Geyser,
}

/// A destructible obstacle.
#[derive(Debug, Clone, Copy)]
pub struct Breakable {
    pub kind: EntityKind,
}

/// Something the player can interact with in place.
#[derive(Debug, Clone, Copy)]
pub struct Interactable {
    pub kind: EntityKind,
}

/// What an entity leaves behind when destroyed.
///
/// A tagged kind rather than a stored callable; the factory layer dispatches
/// on it in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropKind {
    HealthCanister,
    AmmoPack,
    Relic,
}

/// Drop assignment for a destructible entity.
#[derive(Debug, Clone, Copy)]
pub struct Drop {
    pub kind: DropKind,
}

/// The component registry: one dense store per component kind.
#[derive(Debug)]
pub struct Registry {
    next_entity: u32,

    pub positions: ComponentStore<Position>,
    pub players: ComponentStore<Player>,
    pub active_walls: ComponentStore<ActiveWall>,
    pub active_doors: ComponentStore<ActiveDoor>,
    pub breakables: ComponentStore<Breakable>,
    pub interactables: ComponentStore<Interactable>,
    pub enemies: ComponentStore<Enemy>,
    pub consumables: ComponentStore<Consumable>,
    pub drops: ComponentStore<Drop>,
    pub door_connections: ComponentStore<DoorConnection>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            // 0 is the invalid handle
            next_entity: 1,
            positions: ComponentStore::new(),
            players: ComponentStore::new(),
            active_walls: ComponentStore::new(),
            active_doors: ComponentStore::new(),
            breakables: ComponentStore::new(),
            interactables: ComponentStore::new(),
            enemies: ComponentStore::new(),
            consumables: ComponentStore::new(),
            drops: ComponentStore::new(),
            door_connections: ComponentStore::new(),
        }
    }

    /// Allocates a fresh entity handle.
    pub fn create_entity(&mut self) -> Entity {
        let entity = Entity(self.next_entity);
        self.next_entity += 1;
        entity
    }

    /// Removes every component attached to an entity.
    pub fn remove_all_components_of(&mut self, entity: Entity) {
        self.positions.remove(entity);
        self.players.remove(entity);
        self.active_walls.remove(entity);
        self.active_doors.remove(entity);
        self.breakables.remove(entity);
        self.interactables.remove(entity);
        self.enemies.remove(entity);
        self.consumables.remove(entity);
        self.drops.remove(entity);
        self.door_connections.remove(entity);
    }

    /// Drops all components from every store. Entity handles are not reused.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.players.clear();
        self.active_walls.clear();
        self.active_doors.clear();
        self.breakables.clear();
        self.interactables.clear();
        self.enemies.clear();
        self.consumables.clear();
        self.drops.clear();
        self.door_connections.clear();
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
