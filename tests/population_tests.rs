//! Integration tests for populating a generated level: random in-room
//! positions, spawn validation against already-placed entities, and the
//! despawn sweep between room transitions.

use rand::rngs::StdRng;
use rand::SeedableRng;
use warren::{
    execute_config_rand, is_spawn_valid, is_spawn_valid_at, remove_all_spawned, Enemy,
    GenerationConfig, LevelBuilder, Position, Registry, Segment, SessionContext, SpawnFn, Vec2,
};

fn generated_level(seed: u64) -> (LevelBuilder, Registry) {
    let mut registry = Registry::new();
    let mut level = LevelBuilder::new(GenerationConfig::new(seed));
    let mut rng = StdRng::seed_from_u64(seed);
    level
        .generate_random_level(&mut rng, &mut registry)
        .expect("generation should succeed");
    (level, registry)
}

/// The retry loop an entity factory runs: sample a position, attach the
/// footprint, validate, and discard on rejection.
fn try_spawn_enemy(
    level: &LevelBuilder,
    registry: &mut Registry,
    room_id: &str,
    rng: &mut StdRng,
) -> Option<warren::Entity> {
    for _ in 0..20 {
        let position = level.get_random_position(room_id, rng).unwrap();
        let entity = registry.create_entity();
        registry
            .positions
            .insert(entity, Position::new(position, Vec2::new(60.0, 60.0)));

        if is_spawn_valid(registry, entity) {
            registry.enemies.insert(entity, Enemy);
            return Some(entity);
        }
        // Rejected: discard the partially-constructed entity and retry.
        registry.remove_all_components_of(entity);
    }
    None
}

#[test]
fn test_spawned_enemies_never_overlap() {
    let (level, mut registry) = generated_level(42);
    let mut rng = StdRng::seed_from_u64(99);

    level.activate_room("1", &mut registry).unwrap();
    let mut spawned = Vec::new();
    for _ in 0..10 {
        if let Some(entity) = try_spawn_enemy(&level, &mut registry, "1", &mut rng) {
            spawned.push(entity);
        }
    }
    assert!(!spawned.is_empty(), "an empty room should accept spawns");

    for (i, &a) in spawned.iter().enumerate() {
        for &b in &spawned[i + 1..] {
            let pos_a = registry.positions.get(a).unwrap();
            let pos_b = registry.positions.get(b).unwrap();
            assert!(!warren::box_collides(pos_a, pos_b));
        }
    }
}

#[test]
fn test_sampled_positions_fall_inside_their_room() {
    let (level, _) = generated_level(7);
    let mut rng = StdRng::seed_from_u64(7);

    for (id, room) in level.iter_rooms() {
        for _ in 0..50 {
            let point = level.get_random_position(id, &mut rng).unwrap();
            assert!(room.is_in_room(point), "room {}: {:?} escaped", id, point);
        }
    }
}

#[test]
fn test_spawn_validator_sees_player() {
    let (level, mut registry) = generated_level(42);
    let mut rng = StdRng::seed_from_u64(5);

    let mut session = SessionContext::new(1280.0, 720.0);
    let player = registry.create_entity();
    let player_pos = level.get_random_position("0", &mut rng).unwrap();
    registry
        .positions
        .insert(player, Position::new(player_pos, Vec2::new(80.0, 80.0)));
    registry.players.insert(player, warren::Player);
    session.player = player;

    // A candidate right on top of the player is rejected.
    let candidate = Position::new(player_pos, Vec2::new(40.0, 40.0));
    assert!(!is_spawn_valid_at(&registry, &candidate));
}

#[test]
fn test_spawns_ignore_other_rooms_geometry() {
    // Two rooms sharing the screen rectangle, with "elsewhere"'s wall
    // crossing "here"'s interior. Only the current room's wall may block.
    let mut level = LevelBuilder::new(GenerationConfig::for_testing(1));
    let mut registry = Registry::new();

    level
        .room("here")
        .add_boundary(Segment::horizontal(0.0, 400.0, 0.0))
        .add_boundary(Segment::horizontal(0.0, 400.0, 200.0))
        .add_boundary(Segment::vertical(0.0, 0.0, 200.0))
        .add_boundary(Segment::vertical(400.0, 0.0, 200.0));
    let own_wall = registry.create_entity();
    registry.positions.insert(
        own_wall,
        Position::new(Vec2::new(200.0, 0.0), Vec2::new(400.0, 20.0)),
    );
    level.room("here").add_wall(own_wall);

    let foreign_wall = registry.create_entity();
    registry.positions.insert(
        foreign_wall,
        Position::new(Vec2::new(200.0, 100.0), Vec2::new(300.0, 20.0)),
    );
    level.room("elsewhere").add_wall(foreign_wall);

    level.activate_room("here", &mut registry).unwrap();

    // Inside "here", dead on "elsewhere"'s wall: accepted.
    let on_foreign = Position::new(Vec2::new(200.0, 100.0), Vec2::new(40.0, 40.0));
    assert!(is_spawn_valid_at(&registry, &on_foreign));
    // "here"'s own wall still blocks.
    let on_own = Position::new(Vec2::new(200.0, 5.0), Vec2::new(40.0, 40.0));
    assert!(!is_spawn_valid_at(&registry, &on_own));

    // A room transition flips which wall blocks.
    level.activate_room("elsewhere", &mut registry).unwrap();
    assert!(!is_spawn_valid_at(&registry, &on_foreign));
    assert!(is_spawn_valid_at(&registry, &on_own));
}

#[test]
fn test_room_transition_sweep_keeps_geometry() {
    let (level, mut registry) = generated_level(42);
    let mut rng = StdRng::seed_from_u64(11);

    let spawns: Vec<SpawnFn> = (0..6)
        .map(|_| {
            Box::new(|registry: &mut Registry| {
                let e = registry.create_entity();
                registry
                    .positions
                    .insert(e, Position::new(Vec2::new(600.0, 300.0), Vec2::new(10.0, 10.0)));
                registry.enemies.insert(e, Enemy);
            }) as SpawnFn
        })
        .collect();
    execute_config_rand(&mut registry, 1.0, &mut rng, spawns);
    assert_eq!(registry.enemies.len(), 6);

    let wall_count = registry.active_walls.len();
    let door_count = registry.active_doors.len();

    remove_all_spawned(&mut registry);

    assert!(registry.enemies.is_empty());
    assert_eq!(registry.active_walls.len(), wall_count);
    assert_eq!(registry.active_doors.len(), door_count);
    // The graph itself is untouched; the level can be repopulated.
    level.validate_connectivity(&registry).unwrap();
}
