//! # Level Graph Builder
//!
//! Builds the room graph for a level: lays rooms out on a lattice, emits
//! each room's walls with randomly punched door gaps, tags gameplay roles
//! (tutorial, miniboss, final boss, difficulty bands), and pairs doors into
//! bidirectional connections.
//!
//! Generation happens once, fully, before gameplay begins. The adjacency
//! list driving wall emission is discarded once geometry is out; afterwards
//! the graph is queryable only through door connections.

use crate::geometry::{Direction, Segment, Vec2};
use crate::level::{DoorConnection, GenerationConfig, Objective, RoomBuilder, RoomRole, UnitGrid};
use crate::registry::{ActiveDoor, ActiveWall, Entity, Position, Registry};
use crate::{WarrenError, WarrenResult};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::{HashMap, HashSet, VecDeque};

/// Lattice cell coordinate used during layout. North is negative y.
type Cell = (i32, i32);

/// Adjacency during generation: room index -> neighbor index -> direction
/// of the neighbor as seen from the room.
type Adjacency = HashMap<usize, HashMap<usize, Direction>>;

const CARDINAL_DELTAS: [(Direction, Cell); 4] = [
    (Direction::North, (0, -1)),
    (Direction::East, (1, 0)),
    (Direction::South, (0, 1)),
    (Direction::West, (-1, 0)),
];

/// Builds and owns every room of one level.
///
/// Rooms are keyed by caller-chosen strings; randomly generated rooms use
/// their generation index as key ("0" is the tutorial room). The builder is
/// the only owner of generation state; once [`generate_random_level`]
/// returns, rooms and connections are read-only apart from the `visited`,
/// `locked`, and `assigned` flags.
///
/// [`generate_random_level`]: LevelBuilder::generate_random_level
#[derive(Debug)]
pub struct LevelBuilder {
    config: GenerationConfig,
    rooms: HashMap<String, RoomBuilder>,
    room_order: Vec<String>,
}

impl LevelBuilder {
    /// Creates an empty level builder with the given configuration.
    pub fn new(config: GenerationConfig) -> Self {
        Self {
            config,
            rooms: HashMap::new(),
            room_order: Vec::new(),
        }
    }

    /// The configuration this builder was created with.
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Returns the builder for a room, creating an empty one under the key
    /// if it does not exist yet.
    pub fn room(&mut self, id: &str) -> &mut RoomBuilder {
        if !self.rooms.contains_key(id) {
            self.room_order.push(id.to_string());
        }
        self.rooms
            .entry(id.to_string())
            .or_insert_with(RoomBuilder::new)
    }

    /// Looks up a room, erroring on an unknown id.
    pub fn get_room(&self, id: &str) -> WarrenResult<&RoomBuilder> {
        self.rooms
            .get(id)
            .ok_or_else(|| WarrenError::UnknownRoom(id.to_string()))
    }

    /// Mutable counterpart of [`get_room`](Self::get_room).
    pub fn get_room_mut(&mut self, id: &str) -> WarrenResult<&mut RoomBuilder> {
        self.rooms
            .get_mut(id)
            .ok_or_else(|| WarrenError::UnknownRoom(id.to_string()))
    }

    /// Room ids in creation order.
    pub fn room_ids(&self) -> impl Iterator<Item = &str> {
        self.room_order.iter().map(String::as_str)
    }

    /// Number of rooms in the level.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Iterates over (id, room) pairs in creation order.
    pub fn iter_rooms(&self) -> impl Iterator<Item = (&str, &RoomBuilder)> {
        self.room_order
            .iter()
            .filter_map(move |id| self.rooms.get(id).map(|room| (id.as_str(), room)))
    }

    /// Draws a uniformly random point inside a room.
    ///
    /// The sampling cap comes from the configuration; see
    /// [`RoomBuilder::get_random_position`] for the fallback behavior.
    pub fn get_random_position(&self, room_id: &str, rng: &mut StdRng) -> WarrenResult<Vec2> {
        let room = self.get_room(room_id)?;
        Ok(room.get_random_position(rng, self.config.max_sample_attempts))
    }

    /// Looks up the connection stored for a door entity.
    pub fn connection<'a>(
        &self,
        registry: &'a Registry,
        door: Entity,
    ) -> Option<&'a DoorConnection> {
        registry.door_connections.get(door)
    }

    /// Connects two rooms' doors together, creating the door entities if the
    /// keys are new. Fluent, for hand-authored levels:
    ///
    /// ```
    /// use warren::{Direction, GenerationConfig, LevelBuilder, Registry};
    ///
    /// let mut registry = Registry::new();
    /// let mut level = LevelBuilder::new(GenerationConfig::for_testing(1));
    /// level.room("cove");
    /// level.room("grotto");
    /// level
    ///     .connect(Direction::East, "cove", "d0", "grotto", "d0", &mut registry)
    ///     .unwrap();
    /// ```
    ///
    /// After the call, the door in `r1` points at `r2` with `direction` and
    /// the door in `r2` points back with the opposite direction. Connecting
    /// a door that is already connected overwrites the previous pairing
    /// (last write wins). Unknown room ids are an error.
    pub fn connect(
        &mut self,
        direction: Direction,
        r1: &str,
        d1: &str,
        r2: &str,
        d2: &str,
        registry: &mut Registry,
    ) -> WarrenResult<&mut Self> {
        if !self.rooms.contains_key(r1) {
            return Err(WarrenError::UnknownRoom(r1.to_string()));
        }
        if !self.rooms.contains_key(r2) {
            return Err(WarrenError::UnknownRoom(r2.to_string()));
        }

        let door1 = self.door_or_create(r1, d1, registry);
        let door2 = self.door_or_create(r2, d2, registry);

        if registry.door_connections.has(door1) || registry.door_connections.has(door2) {
            warn!(
                "reconnecting door {}/{} <-> {}/{}; previous pairing is dropped",
                r1, d1, r2, d2
            );
        }

        registry
            .door_connections
            .insert(door1, DoorConnection::new(r2.to_string(), door2, direction));
        registry.door_connections.insert(
            door2,
            DoorConnection::new(r1.to_string(), door1, direction.opposite()),
        );

        Ok(self)
    }

    /// Clears the visited flag on every room. Idempotent.
    pub fn mark_all_rooms_unvisited(&mut self) {
        for room in self.rooms.values_mut() {
            room.visited = false;
        }
    }

    /// Generates a randomized, connected level.
    ///
    /// Orchestrates, in order: room counts per difficulty band, a lattice
    /// layout realizable as a grid of screen-sized rooms, wall emission with
    /// random door gaps for every adjacency, role tagging, and door-pair
    /// instantiation. Ends by verifying that every room is reachable from
    /// the tutorial room; an unreachable room is a configuration error, not
    /// a level to ship.
    pub fn generate_random_level(
        &mut self,
        rng: &mut StdRng,
        registry: &mut Registry,
    ) -> WarrenResult<()> {
        let total = self.config.total_rooms() as usize;
        if total == 0 {
            return Err(WarrenError::GenerationFailed(
                "rooms_per_band requests no rooms".to_string(),
            ));
        }
        if self.config.min_door_units == 0
            || self.config.min_door_units > self.config.max_door_units
        {
            return Err(WarrenError::GenerationFailed(format!(
                "invalid door width range {}..={}",
                self.config.min_door_units, self.config.max_door_units
            )));
        }

        info!(
            "generating level: {} rooms in {} difficulty bands",
            total,
            self.config.rooms_per_band.len()
        );

        let cells = self.layout_rooms(total, rng);
        let adjacency = self.build_adjacency(&cells, rng);

        for index in 0..total {
            let directed = adjacency.get(&index).cloned().unwrap_or_default();
            self.emit_room_geometry(index, &directed, rng, registry)?;
        }

        self.mark_tutorial_room();
        self.mark_miniboss_rooms();
        self.mark_final_boss_room();
        self.mark_difficulty_regions();

        self.connect_doors(&adjacency, registry)?;
        self.validate_connectivity(registry)?;

        // The player starts in the tutorial room.
        self.activate_room("0", registry)?;

        info!("level generation complete");
        Ok(())
    }

    /// Makes one room the current room for spawn validation.
    ///
    /// Every room occupies the same screen rectangle and only one is on
    /// screen at a time, so only the current room's walls and doors carry
    /// the active markers the spawn validator collides against. Clears the
    /// previous room's markers and sets the new room's; call on every room
    /// transition.
    pub fn activate_room(&self, room_id: &str, registry: &mut Registry) -> WarrenResult<()> {
        let room = self.get_room(room_id)?;

        registry.active_walls.clear();
        registry.active_doors.clear();
        for &wall in &room.space.walls {
            registry.active_walls.insert(wall, ActiveWall);
        }
        for &door in &room.space.doors {
            registry.active_doors.insert(door, ActiveDoor);
        }

        debug!(
            "room {} active: {} walls, {} doors",
            room_id,
            room.space.walls.len(),
            room.space.doors.len()
        );
        Ok(())
    }

    /// Verifies that every room is reachable from the tutorial room by
    /// walking door connections.
    pub fn validate_connectivity(&self, registry: &Registry) -> WarrenResult<()> {
        let start = match self
            .iter_rooms()
            .find(|(_, room)| room.role == RoomRole::Tutorial)
        {
            Some((id, _)) => id.to_string(),
            None => {
                return Err(WarrenError::GenerationFailed(
                    "no tutorial room to start reachability from".to_string(),
                ))
            }
        };

        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        visited.insert(start.clone());
        queue.push_back(start);

        while let Some(id) = queue.pop_front() {
            let room = self.get_room(&id)?;
            for &door in &room.space.doors {
                if let Some(connection) = registry.door_connections.get(door) {
                    if visited.insert(connection.room_id.clone()) {
                        queue.push_back(connection.room_id.clone());
                    }
                }
            }
        }

        for id in self.room_ids() {
            if !visited.contains(id) {
                return Err(WarrenError::GenerationFailed(format!(
                    "room {} is not reachable from the tutorial room",
                    id
                )));
            }
        }
        Ok(())
    }

    fn door_or_create(&mut self, room_id: &str, door_key: &str, registry: &mut Registry) -> Entity {
        if let Some(existing) = self.rooms[room_id].door(door_key) {
            return existing;
        }
        let door = registry.create_entity();
        self.room(room_id).add_door(door_key, door);
        door
    }

    /// Places `count` rooms on the lattice with a self-avoiding random walk.
    ///
    /// A walk that boxes itself in is retried; after `max_layout_attempts`
    /// failures the layout falls back to a straight west-to-east corridor,
    /// which always satisfies the connectivity and door constraints.
    fn layout_rooms(&self, count: usize, rng: &mut StdRng) -> Vec<Cell> {
        for attempt in 0..self.config.max_layout_attempts {
            if let Some(cells) = Self::try_random_walk(count, rng) {
                debug!("room layout found on attempt {}", attempt + 1);
                return cells;
            }
        }
        warn!(
            "no self-avoiding layout after {} attempts; using corridor fallback",
            self.config.max_layout_attempts
        );
        (0..count).map(|i| (i as i32, 0)).collect()
    }

    fn try_random_walk(count: usize, rng: &mut StdRng) -> Option<Vec<Cell>> {
        let mut cells = vec![(0, 0)];
        let mut occupied: HashSet<Cell> = cells.iter().copied().collect();

        while cells.len() < count {
            let &(x, y) = cells.last()?;
            let free: Vec<Cell> = CARDINAL_DELTAS
                .iter()
                .map(|&(_, (dx, dy))| (x + dx, y + dy))
                .filter(|cell| !occupied.contains(cell))
                .collect();
            if free.is_empty() {
                return None; // walk trapped itself
            }
            let next = free[rng.gen_range(0..free.len())];
            occupied.insert(next);
            cells.push(next);
        }
        Some(cells)
    }

    /// Derives the directed adjacency map from the walk, then adds
    /// chance-based extra connections between rooms that ended up
    /// lattice-adjacent without being consecutive on the walk.
    fn build_adjacency(&self, cells: &[Cell], rng: &mut StdRng) -> Adjacency {
        let mut adjacency: Adjacency = HashMap::new();

        for i in 0..cells.len().saturating_sub(1) {
            let direction = Self::direction_between(cells[i], cells[i + 1])
                .expect("consecutive walk cells are lattice neighbors");
            adjacency.entry(i).or_default().insert(i + 1, direction);
            adjacency
                .entry(i + 1)
                .or_default()
                .insert(i, direction.opposite());
        }

        let index_by_cell: HashMap<Cell, usize> = cells
            .iter()
            .enumerate()
            .map(|(i, &cell)| (cell, i))
            .collect();

        for (i, &(x, y)) in cells.iter().enumerate() {
            for &(direction, (dx, dy)) in &CARDINAL_DELTAS {
                let Some(&j) = index_by_cell.get(&(x + dx, y + dy)) else {
                    continue;
                };
                if j <= i || adjacency.get(&i).is_some_and(|m| m.contains_key(&j)) {
                    continue;
                }
                if rng.gen_bool(self.config.extra_connection_chance) {
                    debug!("extra connection between rooms {} and {}", i, j);
                    adjacency.entry(i).or_default().insert(j, direction);
                    adjacency
                        .entry(j)
                        .or_default()
                        .insert(i, direction.opposite());
                }
            }
        }

        adjacency
    }

    fn direction_between(from: Cell, to: Cell) -> Option<Direction> {
        let delta = (to.0 - from.0, to.1 - from.1);
        CARDINAL_DELTAS
            .iter()
            .find(|&&(_, d)| d == delta)
            .map(|&(direction, _)| direction)
    }

    /// Emits the boundaries, walls, and door gaps of one generated room.
    ///
    /// The room interior is a randomized rectangle inside the 20x10 grid,
    /// centered, and floored so every wall that must host a door can fit the
    /// widest door plus a unit of wall on each side.
    fn emit_room_geometry(
        &mut self,
        index: usize,
        directed: &HashMap<usize, Direction>,
        rng: &mut StdRng,
        registry: &mut Registry,
    ) -> WarrenResult<()> {
        let grid = self.config.grid();
        let id = index.to_string();

        let width_units = rng.gen_range(14..=crate::config::MAX_X_UNITS) as f32;
        let height_units = rng.gen_range(8..=crate::config::MAX_Y_UNITS) as f32;
        let left = 1.0 + (crate::config::MAX_X_UNITS as f32 - width_units) / 2.0;
        let top = 1.0 + (crate::config::MAX_Y_UNITS as f32 - height_units) / 2.0;
        let right = left + width_units;
        let bottom = top + height_units;

        self.room(&id)
            .add_boundary(Segment::horizontal(grid.x(left), grid.x(right), grid.y(top)))
            .add_boundary(Segment::horizontal(
                grid.x(left),
                grid.x(right),
                grid.y(bottom),
            ))
            .add_boundary(Segment::vertical(grid.x(left), grid.y(top), grid.y(bottom)))
            .add_boundary(Segment::vertical(
                grid.x(right),
                grid.y(top),
                grid.y(bottom),
            ));

        for direction in Direction::ALL {
            let mut neighbors: Vec<usize> = directed
                .iter()
                .filter(|&(_, &d)| d == direction)
                .map(|(&j, _)| j)
                .collect();
            neighbors.sort_unstable();

            let length = match direction {
                Direction::North | Direction::South => width_units,
                Direction::East | Direction::West => height_units,
            };
            let (wall_spans, door_spans) = self.build_wall_with_random_doors(
                direction, &neighbors, length, rng,
            )?;

            for span in wall_spans {
                let segment = Self::wall_segment(&grid, direction, left, top, right, bottom, span);
                let wall = Self::spawn_wall_entity(&grid, registry, direction, segment);
                self.room(&id).add_wall(wall);
            }
            for (neighbor, span) in door_spans {
                let segment = Self::wall_segment(&grid, direction, left, top, right, bottom, span);
                let door = Self::spawn_door_entity(&grid, registry, direction, segment);
                self.room(&id).add_door(format!("door_{}", neighbor), door);
            }
        }

        debug!(
            "room {} emitted: {}x{} units, {} doors",
            id,
            width_units,
            height_units,
            directed.len()
        );
        Ok(())
    }

    /// Splits one wall into solid runs and door gaps, in units along the
    /// wall from 0 to `length`.
    ///
    /// The wall is divided into one section per required door and each door
    /// is placed randomly within its own section, a unit away from the
    /// section edges, so no two doors on the same wall can overlap.
    fn build_wall_with_random_doors(
        &self,
        direction: Direction,
        neighbors: &[usize],
        length: f32,
        rng: &mut StdRng,
    ) -> WarrenResult<(Vec<(f32, f32)>, Vec<(usize, (f32, f32))>)> {
        if neighbors.is_empty() {
            return Ok((vec![(0.0, length)], Vec::new()));
        }

        let section = length / neighbors.len() as f32;
        if section < self.config.min_door_units as f32 + 2.0 {
            return Err(WarrenError::GenerationFailed(format!(
                "{:?} wall of {} units cannot host {} doors",
                direction,
                length,
                neighbors.len()
            )));
        }

        let mut door_spans = Vec::new();
        for (k, &neighbor) in neighbors.iter().enumerate() {
            let widest = (section - 2.0).min(self.config.max_door_units as f32);
            let size = if widest > self.config.min_door_units as f32 {
                rng.gen_range(self.config.min_door_units as f32..=widest)
            } else {
                self.config.min_door_units as f32
            };
            let lo = section * k as f32 + 1.0;
            let hi = section * (k + 1) as f32 - 1.0 - size;
            let start = if hi > lo { rng.gen_range(lo..=hi) } else { lo };
            door_spans.push((neighbor, (start, start + size)));
        }

        let mut wall_spans = Vec::new();
        let mut cursor = 0.0;
        for &(_, (gap_start, gap_end)) in &door_spans {
            if gap_start > cursor {
                wall_spans.push((cursor, gap_start));
            }
            cursor = gap_end;
        }
        if cursor < length {
            wall_spans.push((cursor, length));
        }

        Ok((wall_spans, door_spans))
    }

    /// Maps a span along a wall (in units from the wall's start) onto a
    /// pixel-space segment on the room outline.
    fn wall_segment(
        grid: &UnitGrid,
        direction: Direction,
        left: f32,
        top: f32,
        right: f32,
        bottom: f32,
        (a, b): (f32, f32),
    ) -> Segment {
        match direction {
            Direction::North => {
                Segment::horizontal(grid.x(left + a), grid.x(left + b), grid.y(top))
            }
            Direction::South => {
                Segment::horizontal(grid.x(left + a), grid.x(left + b), grid.y(bottom))
            }
            Direction::West => Segment::vertical(grid.x(left), grid.y(top + a), grid.y(top + b)),
            Direction::East => Segment::vertical(grid.x(right), grid.y(top + a), grid.y(top + b)),
        }
    }

    fn footprint(grid: &UnitGrid, direction: Direction, segment: &Segment) -> Vec2 {
        match direction {
            Direction::North | Direction::South => Vec2::new(segment.length(), grid.y_1u),
            Direction::East | Direction::West => Vec2::new(grid.x_1u, segment.length()),
        }
    }

    fn spawn_wall_entity(
        grid: &UnitGrid,
        registry: &mut Registry,
        direction: Direction,
        segment: Segment,
    ) -> Entity {
        let wall = registry.create_entity();
        registry.positions.insert(
            wall,
            Position::new(segment.midpoint(), Self::footprint(grid, direction, &segment)),
        );
        wall
    }

    fn spawn_door_entity(
        grid: &UnitGrid,
        registry: &mut Registry,
        direction: Direction,
        segment: Segment,
    ) -> Entity {
        let door = registry.create_entity();
        registry.positions.insert(
            door,
            Position::new(segment.midpoint(), Self::footprint(grid, direction, &segment)),
        );
        door
    }

    fn mark_tutorial_room(&mut self) {
        if let Some(room) = self.rooms.get_mut("0") {
            room.role = RoomRole::Tutorial;
        }
    }

    /// The last room of every interior band caps that band's difficulty.
    fn mark_miniboss_rooms(&mut self) {
        let bands = self.config.rooms_per_band.clone();
        if bands.len() < 3 {
            return;
        }
        let mut end = 0u32;
        for (band, &count) in bands.iter().enumerate().take(bands.len() - 1) {
            end += count;
            if band == 0 || count == 0 {
                continue; // never the tutorial band
            }
            let id = (end - 1).to_string();
            if let Some(room) = self.rooms.get_mut(&id) {
                room.role = RoomRole::Miniboss;
            }
        }
    }

    fn mark_final_boss_room(&mut self) {
        let last = self.config.total_rooms().saturating_sub(1).to_string();
        if let Some(room) = self.rooms.get_mut(&last) {
            room.role = RoomRole::FinalBoss;
        }
    }

    /// Partitions generated rooms into ascending difficulty regions, one
    /// region per configured band.
    fn mark_difficulty_regions(&mut self) {
        let bands = self.config.rooms_per_band.clone();
        let mut index = 0u32;
        for (band, &count) in bands.iter().enumerate() {
            for _ in 0..count {
                let id = index.to_string();
                if let Some(room) = self.rooms.get_mut(&id) {
                    room.difficulty = band as u32;
                }
                index += 1;
            }
        }
    }

    /// Instantiates the DoorConnection pair for every adjacent room pair,
    /// locking the doors that lead into the final boss room.
    fn connect_doors(&mut self, adjacency: &Adjacency, registry: &mut Registry) -> WarrenResult<()> {
        let mut pairs: Vec<(usize, usize, Direction)> = Vec::new();
        for (&i, directed) in adjacency {
            for (&j, &direction) in directed {
                if i < j {
                    pairs.push((i, j, direction));
                }
            }
        }
        pairs.sort_unstable_by_key(|&(i, j, _)| (i, j));

        for (i, j, direction) in pairs {
            let r1 = i.to_string();
            let r2 = j.to_string();
            let d1 = format!("door_{}", j);
            let d2 = format!("door_{}", i);
            self.connect(direction, &r1, &d1, &r2, &d2, registry)?;

            let boss_ahead = self
                .rooms
                .get(&r2)
                .is_some_and(|room| room.role == RoomRole::FinalBoss);
            if boss_ahead {
                for (room_id, door_key) in [(&r1, &d1), (&r2, &d2)] {
                    if let Some(door) = self.rooms[room_id.as_str()].door(door_key) {
                        if let Some(connection) = registry.door_connections.get_mut(door) {
                            connection.locked = true;
                            connection.objective = Objective::Boss;
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn generated_level(seed: u64) -> (LevelBuilder, Registry) {
        let mut registry = Registry::new();
        let mut level = LevelBuilder::new(GenerationConfig::new(seed));
        let mut rng = StdRng::seed_from_u64(seed);
        level
            .generate_random_level(&mut rng, &mut registry)
            .expect("generation should succeed");
        (level, registry)
    }

    #[test]
    fn test_generated_level_has_configured_room_count() {
        let (level, _) = generated_level(42);
        assert_eq!(level.room_count(), 16);
    }

    #[test]
    fn test_generated_level_is_connected() {
        for seed in [1, 7, 42, 999, 31337] {
            let (level, registry) = generated_level(seed);
            level
                .validate_connectivity(&registry)
                .expect("every room should be reachable from the tutorial room");
        }
    }

    #[test]
    fn test_door_pairs_are_mutual_and_opposite() {
        let (level, registry) = generated_level(42);

        for (id, room) in level.iter_rooms() {
            for &door in &room.space.doors {
                let connection = registry
                    .door_connections
                    .get(door)
                    .expect("generated doors are always paired");
                let paired = registry
                    .door_connections
                    .get(connection.exit_door)
                    .expect("paired door has a connection back");

                assert_eq!(paired.exit_door, door, "pairing must be mutual");
                assert_eq!(paired.room_id, id, "paired side must reference this room");
                assert_eq!(
                    paired.direction,
                    connection.direction.opposite(),
                    "pair directions must be exact opposites"
                );
            }
        }
    }

    #[test]
    fn test_roles_are_assigned() {
        let (level, _) = generated_level(42);

        let tutorial = level
            .iter_rooms()
            .filter(|(_, room)| room.role == RoomRole::Tutorial)
            .count();
        let final_boss = level
            .iter_rooms()
            .filter(|(_, room)| room.role == RoomRole::FinalBoss)
            .count();
        let minibosses = level
            .iter_rooms()
            .filter(|(_, room)| room.role == RoomRole::Miniboss)
            .count();

        assert_eq!(tutorial, 1);
        assert_eq!(final_boss, 1);
        // Default bands are [1, 5, 5, 5]: the ends of the two interior bands
        assert_eq!(minibosses, 2);
        assert_eq!(level.get_room("0").unwrap().role, RoomRole::Tutorial);
        assert_eq!(level.get_room("15").unwrap().role, RoomRole::FinalBoss);
    }

    #[test]
    fn test_difficulty_is_ascending_along_bands() {
        let (level, _) = generated_level(42);
        let difficulties: Vec<u32> = (0..16)
            .map(|i| level.get_room(&i.to_string()).unwrap().difficulty)
            .collect();

        let mut expected = vec![0u32];
        expected.extend(std::iter::repeat(1).take(5));
        expected.extend(std::iter::repeat(2).take(5));
        expected.extend(std::iter::repeat(3).take(5));
        assert_eq!(difficulties, expected);
    }

    #[test]
    fn test_final_boss_doors_are_locked() {
        let (level, registry) = generated_level(42);
        let boss_room = level.get_room("15").unwrap();

        // At least one door leads into the boss room, and every door of the
        // boss room is locked behind the boss objective.
        assert!(!boss_room.space.doors.is_empty());
        for &door in &boss_room.space.doors {
            let connection = registry.door_connections.get(door).unwrap();
            assert!(connection.locked);
            assert_eq!(connection.objective, Objective::Boss);
        }
    }

    #[test]
    fn test_connect_unknown_room_errors() {
        let mut registry = Registry::new();
        let mut level = LevelBuilder::new(GenerationConfig::for_testing(1));
        level.room("start");

        let result = level.connect(
            Direction::East,
            "start",
            "d0",
            "nowhere",
            "d0",
            &mut registry,
        );
        assert!(matches!(result, Err(WarrenError::UnknownRoom(_))));
    }

    #[test]
    fn test_reconnect_overwrites_previous_pairing() {
        let mut registry = Registry::new();
        let mut level = LevelBuilder::new(GenerationConfig::for_testing(1));
        level.room("a");
        level.room("b");
        level.room("c");

        level
            .connect(Direction::East, "a", "d0", "b", "d0", &mut registry)
            .unwrap();
        // Same door on "a", new target: last write wins.
        level
            .connect(Direction::South, "a", "d0", "c", "d0", &mut registry)
            .unwrap();

        let door_a = level.get_room("a").unwrap().door("d0").unwrap();
        let connection = registry.door_connections.get(door_a).unwrap();
        assert_eq!(connection.room_id, "c");
        assert_eq!(connection.direction, Direction::South);

        let door_c = level.get_room("c").unwrap().door("d0").unwrap();
        let back = registry.door_connections.get(door_c).unwrap();
        assert_eq!(back.room_id, "a");
        assert_eq!(back.direction, Direction::North);
    }

    #[test]
    fn test_connect_is_chainable() {
        let mut registry = Registry::new();
        let mut level = LevelBuilder::new(GenerationConfig::for_testing(1));
        level.room("a");
        level.room("b");
        level.room("c");

        level
            .connect(Direction::East, "a", "east", "b", "west", &mut registry)
            .unwrap()
            .connect(Direction::South, "b", "south", "c", "north", &mut registry)
            .unwrap();

        assert!(level.get_room("a").unwrap().door("east").is_some());
        assert!(level.get_room("c").unwrap().door("north").is_some());
    }

    #[test]
    fn test_mark_all_rooms_unvisited_is_idempotent() {
        let (mut level, _) = generated_level(42);
        level.get_room_mut("0").unwrap().visited = true;
        level.get_room_mut("3").unwrap().visited = true;

        level.mark_all_rooms_unvisited();
        assert!(level.iter_rooms().all(|(_, room)| !room.visited));

        level.mark_all_rooms_unvisited();
        assert!(level.iter_rooms().all(|(_, room)| !room.visited));
    }

    #[test]
    fn test_empty_band_config_is_a_generation_error() {
        let mut registry = Registry::new();
        let mut config = GenerationConfig::for_testing(1);
        config.rooms_per_band = vec![];
        let mut level = LevelBuilder::new(config);
        let mut rng = StdRng::seed_from_u64(1);

        let result = level.generate_random_level(&mut rng, &mut registry);
        assert!(matches!(result, Err(WarrenError::GenerationFailed(_))));
    }

    #[test]
    fn test_corridor_fallback_layout_is_connected() {
        let mut registry = Registry::new();
        let mut config = GenerationConfig::for_testing(9);
        // Force the fallback template by forbidding walk attempts.
        config.max_layout_attempts = 0;
        let mut level = LevelBuilder::new(config);
        let mut rng = StdRng::seed_from_u64(9);

        level
            .generate_random_level(&mut rng, &mut registry)
            .expect("corridor fallback must generate");
        level.validate_connectivity(&registry).unwrap();
    }

    #[test]
    fn test_random_position_in_generated_room_is_inside() {
        let (level, _) = generated_level(42);
        let mut rng = StdRng::seed_from_u64(0);

        let room = level.get_room("3").unwrap();
        for _ in 0..100 {
            let point = level.get_random_position("3", &mut rng).unwrap();
            assert!(room.is_in_room(point));
        }
        assert!(matches!(
            level.get_random_position("no-such-room", &mut rng),
            Err(WarrenError::UnknownRoom(_))
        ));
    }

    #[test]
    fn test_doors_on_same_wall_do_not_overlap() {
        let level = LevelBuilder::new(GenerationConfig::new(5));
        let mut rng = StdRng::seed_from_u64(5);

        let (walls, doors) = level
            .build_wall_with_random_doors(Direction::North, &[1, 2, 3], 20.0, &mut rng)
            .unwrap();

        // Spans sorted by construction; gaps must not intersect.
        for pair in doors.windows(2) {
            let (_, (_, end_a)) = pair[0];
            let (_, (start_b, _)) = pair[1];
            assert!(end_a <= start_b, "door gaps overlap: {:?}", doors);
        }
        // Walls and doors together tile the wall exactly.
        let covered: f32 = walls.iter().map(|(a, b)| b - a).sum::<f32>()
            + doors.iter().map(|(_, (a, b))| b - a).sum::<f32>();
        assert!((covered - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_generation_activates_only_tutorial_geometry() {
        let (level, registry) = generated_level(42);

        let tutorial = level.get_room("0").unwrap();
        assert_eq!(registry.active_walls.len(), tutorial.space.walls.len());
        assert_eq!(registry.active_doors.len(), tutorial.space.doors.len());
        for &wall in &tutorial.space.walls {
            assert!(registry.active_walls.has(wall));
        }

        // No other room's geometry carries a marker.
        for (id, room) in level.iter_rooms() {
            if id == "0" {
                continue;
            }
            for &wall in &room.space.walls {
                assert!(!registry.active_walls.has(wall));
            }
            for &door in &room.space.doors {
                assert!(!registry.active_doors.has(door));
            }
        }
    }

    #[test]
    fn test_activate_room_switches_markers() {
        let (level, mut registry) = generated_level(42);

        level.activate_room("1", &mut registry).unwrap();
        let room = level.get_room("1").unwrap();
        assert_eq!(registry.active_walls.len(), room.space.walls.len());
        assert_eq!(registry.active_doors.len(), room.space.doors.len());
        for &door in &room.space.doors {
            assert!(registry.active_doors.has(door));
        }

        assert!(matches!(
            level.activate_room("no-such-room", &mut registry),
            Err(WarrenError::UnknownRoom(_))
        ));
    }
}
