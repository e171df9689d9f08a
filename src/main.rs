//! # Warren CLI
//!
//! Generates a level from a seed and prints a summary of the room graph.
//! Useful for eyeballing layouts and tuning generation parameters without
//! booting the game.

use clap::Parser;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use warren::{GenerationConfig, LevelBuilder, Registry, RoomRole, WarrenResult};

/// Command line arguments for the Warren level generator.
#[derive(Parser, Debug)]
#[command(name = "warren")]
#[command(about = "Procedural room-and-door level generation")]
#[command(version)]
struct Args {
    /// Random seed for level generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// Rooms per ascending difficulty band, e.g. --bands 1,5,5,5
    #[arg(long, value_delimiter = ',')]
    bands: Option<Vec<u32>>,

    /// Window width in pixels, for unit conversion
    #[arg(long, default_value_t = 1280.0)]
    window_width: f32,

    /// Window height in pixels, for unit conversion
    #[arg(long, default_value_t = 720.0)]
    window_height: f32,
}

fn main() -> WarrenResult<()> {
    env_logger::init();
    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(rand::random);
    info!("Starting Warren v{} with seed {}", warren::VERSION, seed);

    let mut config = GenerationConfig::new(seed);
    if let Some(bands) = args.bands {
        config.rooms_per_band = bands;
    }
    config.window_width_px = args.window_width;
    config.window_height_px = args.window_height;

    let mut registry = Registry::new();
    let mut level = LevelBuilder::new(config);
    let mut rng = StdRng::seed_from_u64(seed);
    level.generate_random_level(&mut rng, &mut registry)?;

    println!("seed {}: {} rooms", seed, level.room_count());
    for (id, room) in level.iter_rooms() {
        let role = match room.role {
            RoomRole::Tutorial => "tutorial",
            RoomRole::Normal => "normal",
            RoomRole::Miniboss => "miniboss",
            RoomRole::FinalBoss => "final boss",
        };
        let mut exits: Vec<String> = room
            .space
            .doors
            .iter()
            .filter_map(|&door| registry.door_connections.get(door))
            .map(|connection| {
                let lock = if connection.locked { " (locked)" } else { "" };
                format!("{:?} -> room {}{}", connection.direction, connection.room_id, lock)
            })
            .collect();
        exits.sort();

        println!(
            "  room {:>2} [{}] difficulty {}: {} walls, exits: {}",
            id,
            role,
            room.difficulty,
            room.space.walls.len(),
            if exits.is_empty() {
                "none".to_string()
            } else {
                exits.join(", ")
            }
        );
    }

    Ok(())
}
