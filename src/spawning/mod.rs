//! # Spawning Module
//!
//! Spawn validation and spawn-config execution.
//!
//! The validator is a pure predicate over the registry at call time: it
//! rejects candidate footprints that overlap already-placed entities, and
//! mutates nothing. Callers discard the rejected candidate and retry at a
//! new position or skip the spawn; results go stale the moment something
//! else spawns.

use crate::config::DOOR_SPAWN_RADIUS;
use crate::geometry::Vec2;
use crate::registry::{Consumable, DropKind, Entity, Position, Registry};
use log::debug;
use rand::rngs::StdRng;
use rand::Rng;

/// A deferred spawn step executed against the registry.
pub type SpawnFn = Box<dyn FnOnce(&mut Registry)>;

/// Tests whether two footprints overlap, axis-aligned box against box.
///
/// Footprints are centered on `position` with extent `|scale|`; scales may
/// be negative for sprite flipping.
pub fn box_collides(a: &Position, b: &Position) -> bool {
    let half_a = Vec2::new(a.scale.x.abs() / 2.0, a.scale.y.abs() / 2.0);
    let half_b = Vec2::new(b.scale.x.abs() / 2.0, b.scale.y.abs() / 2.0);

    (a.position.x - b.position.x).abs() < half_a.x + half_b.x
        && (a.position.y - b.position.y).abs() < half_a.y + half_b.y
}

/// Checks whether a candidate footprint may spawn at its position.
///
/// The candidate must not box-collide with any player, active wall,
/// breakable, interactable, enemy, or consumable, and must keep
/// [`DOOR_SPAWN_RADIUS`] clear of every active door so freshly spawned
/// entities never block a room transition.
///
/// Only the current room's walls and doors carry the active markers (see
/// `LevelBuilder::activate_room`); geometry belonging to off-screen rooms
/// never blocks a spawn even where its footprint overlaps the candidate.
pub fn is_spawn_valid_at(registry: &Registry, candidate: &Position) -> bool {
    let blocking = registry
        .players
        .entities()
        .iter()
        .chain(registry.active_walls.entities())
        .chain(registry.breakables.entities())
        .chain(registry.interactables.entities())
        .chain(registry.enemies.entities())
        .chain(registry.consumables.entities());

    for &entity in blocking {
        let Some(position) = registry.positions.get(entity) else {
            continue;
        };
        if box_collides(candidate, position) {
            return false;
        }
    }

    for &door in registry.active_doors.entities() {
        let Some(position) = registry.positions.get(door) else {
            continue;
        };
        if candidate.position.distance(position.position) < DOOR_SPAWN_RADIUS {
            return false;
        }
    }

    true
}

/// Entity form of [`is_spawn_valid_at`].
///
/// The entity should already have its position attached; an entity without
/// one is never a valid spawn.
pub fn is_spawn_valid(registry: &Registry, entity: Entity) -> bool {
    match registry.positions.get(entity) {
        Some(candidate) => is_spawn_valid_at(registry, candidate),
        None => false,
    }
}

/// Runs every spawn step in a config.
pub fn execute_config_fixed(registry: &mut Registry, funcs: Vec<SpawnFn>) {
    for func in funcs {
        func(registry);
    }
}

/// Runs each spawn step in a config with an independent `chance` in [0, 1].
pub fn execute_config_rand(
    registry: &mut Registry,
    chance: f64,
    rng: &mut StdRng,
    funcs: Vec<SpawnFn>,
) {
    for func in funcs {
        if rng.gen_bool(chance) {
            func(registry);
        }
    }
}

/// Spawns the drop assigned to a destroyed entity, if it has one.
///
/// Drop behavior is a tagged kind dispatched here in one place, not a
/// callable stored in the component.
pub fn resolve_drop(registry: &mut Registry, destroyed: Entity) -> Option<Entity> {
    let drop = registry.drops.get(destroyed).copied()?;
    let at = registry.positions.get(destroyed).copied()?;
    Some(spawn_drop(registry, drop.kind, at.position))
}

/// Creates the pickup entity for a drop kind at a position.
pub fn spawn_drop(registry: &mut Registry, kind: DropKind, position: Vec2) -> Entity {
    // Pickups share one modest footprint; the factory layer swaps textures.
    let footprint = Vec2::new(40.0, 40.0);
    let entity = registry.create_entity();
    registry
        .positions
        .insert(entity, Position::new(position, footprint));
    registry.consumables.insert(entity, Consumable);
    debug!("dropped {:?} at ({}, {})", kind, position.x, position.y);
    entity
}

/// Despawns every spawned entity category, leaving level geometry alone.
pub fn remove_all_spawned(registry: &mut Registry) {
    while let Some(&entity) = registry.enemies.entities().last() {
        registry.remove_all_components_of(entity);
    }
    while let Some(&entity) = registry.consumables.entities().last() {
        registry.remove_all_components_of(entity);
    }
    while let Some(&entity) = registry.breakables.entities().last() {
        registry.remove_all_components_of(entity);
    }
    while let Some(&entity) = registry.interactables.entities().last() {
        registry.remove_all_components_of(entity);
    }
}
