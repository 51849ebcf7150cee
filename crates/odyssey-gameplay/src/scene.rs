//! Scene interface consumed by vehicles, plus an in-memory implementation.
//!
//! The host engine owns transforms, colliders and the player's locomotion.
//! Vehicles reach all of that through [`Scene`], which is injected by
//! reference on every tick.
//!
//! [`SimScene`] and [`SimPlayer`] implement the interfaces without an engine.
//! They back the unit tests and the headless simulation binary.

use ahash::AHashMap;
use glam::Vec2;
use odyssey_common::EntityId;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::DEFAULT_PLAYER_TAG;
use crate::player::PlayerProxy;

/// Tag given to vehicle bodies spawned into a scene.
pub const VEHICLE_TAG: &str = "Odyssey";

/// A collider found by an overlap query.
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    /// Entity owning the collider
    pub entity: EntityId,
    /// Collider center
    pub position: Vec2,
    /// Tag of the owning entity
    pub tag: String,
}

/// Spatial query against the scene's colliders.
pub trait OverlapQuery {
    /// Returns every enabled collider intersecting the circle.
    fn overlap_circle(&self, center: Vec2, radius: f32) -> Vec<Contact>;
}

/// Everything a vehicle needs from the host engine.
pub trait Scene: OverlapQuery {
    /// Looks up a player by ID.
    fn player(&self, id: EntityId) -> Option<&dyn PlayerProxy>;

    /// Looks up a player by ID for mutation.
    fn player_mut(&mut self, id: EntityId) -> Option<&mut dyn PlayerProxy>;

    /// Creates a kinematic body with a collider.
    fn spawn_kinematic(&mut self, body: EntityId, position: Vec2, radius: f32, tag: &str);

    /// Moves a kinematic body. Transform children move with it.
    fn move_kinematic(&mut self, body: EntityId, position: Vec2);

    /// Enables or disables a body's collider.
    fn set_collision_enabled(&mut self, body: EntityId, enabled: bool);

    /// Removes a body from the scene.
    fn despawn(&mut self, body: EntityId);
}

// ============================================================================
// In-memory player
// ============================================================================

/// One positional change applied to a [`SimPlayer`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlayerMove {
    /// Direct reposition
    Teleport {
        /// Position before the move
        from: Vec2,
        /// Position after the move
        to: Vec2,
    },
    /// Collision-aware body move
    Move {
        /// Position before the move
        from: Vec2,
        /// Position after the move
        to: Vec2,
    },
    /// Carried along by a moving transform parent
    Carried {
        /// Position before the move
        from: Vec2,
        /// Position after the move
        to: Vec2,
    },
}

impl PlayerMove {
    /// Returns the displacement of this move.
    #[must_use]
    pub fn delta(&self) -> Vec2 {
        match *self {
            Self::Teleport { from, to } | Self::Move { from, to } | Self::Carried { from, to } => {
                to - from
            },
        }
    }
}

/// In-memory player with a move log.
#[derive(Debug, Clone)]
pub struct SimPlayer {
    id: EntityId,
    position: Vec2,
    velocity: Vec2,
    /// `None` when the player has no physics body
    gravity_scale: Option<f32>,
    /// `None` when the player has no locomotion controller
    input_enabled: Option<bool>,
    parent: Option<EntityId>,
    radius: f32,
    tag: String,
    moves: Vec<PlayerMove>,
}

impl SimPlayer {
    /// Creates a player with a body and a controller at `position`.
    #[must_use]
    pub fn new(position: Vec2) -> Self {
        Self {
            id: EntityId::new(),
            position,
            velocity: Vec2::ZERO,
            gravity_scale: Some(1.0),
            input_enabled: Some(true),
            parent: None,
            radius: 0.5,
            tag: DEFAULT_PLAYER_TAG.to_string(),
            moves: Vec::new(),
        }
    }

    /// Sets the initial transform parent.
    #[must_use]
    pub fn with_parent(mut self, parent: Option<EntityId>) -> Self {
        self.parent = parent;
        self
    }

    /// Sets the collider tag.
    #[must_use]
    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tag = tag.to_string();
        self
    }

    /// Sets the collider radius.
    #[must_use]
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    /// Removes the physics body (no gravity, no collision-aware moves).
    #[must_use]
    pub fn without_body(mut self) -> Self {
        self.gravity_scale = None;
        self
    }

    /// Removes the locomotion controller (no input flag).
    #[must_use]
    pub fn without_controller(mut self) -> Self {
        self.input_enabled = None;
        self
    }

    /// Returns the collider tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns the collider radius.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Returns every move applied so far.
    #[must_use]
    pub fn moves(&self) -> &[PlayerMove] {
        &self.moves
    }

    /// Clears the move log.
    pub fn clear_moves(&mut self) {
        self.moves.clear();
    }

    /// Walks the player under its own control (scripted locomotion).
    pub fn walk_to(&mut self, position: Vec2) {
        self.position = position;
    }

    fn carry(&mut self, delta: Vec2) {
        let from = self.position;
        self.position += delta;
        self.moves.push(PlayerMove::Carried {
            from,
            to: self.position,
        });
    }
}

impl PlayerProxy for SimPlayer {
    fn id(&self) -> EntityId {
        self.id
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    fn teleport_to(&mut self, position: Vec2) {
        let from = self.position;
        self.position = position;
        self.moves.push(PlayerMove::Teleport { from, to: position });
    }

    fn move_to(&mut self, position: Vec2) -> bool {
        if self.gravity_scale.is_none() {
            return false;
        }
        let from = self.position;
        self.position = position;
        self.moves.push(PlayerMove::Move { from, to: position });
        true
    }

    fn gravity_scale(&self) -> Option<f32> {
        self.gravity_scale
    }

    fn set_gravity_scale(&mut self, scale: f32) {
        if let Some(gravity) = self.gravity_scale.as_mut() {
            *gravity = scale;
        }
    }

    fn input_enabled(&self) -> Option<bool> {
        self.input_enabled
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        if let Some(flag) = self.input_enabled.as_mut() {
            *flag = enabled;
        }
    }

    fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    fn set_parent(&mut self, parent: Option<EntityId>) {
        self.parent = parent;
    }
}

// ============================================================================
// In-memory scene
// ============================================================================

/// A non-player collider.
#[derive(Debug, Clone)]
struct SimBody {
    position: Vec2,
    radius: f32,
    tag: String,
    collision_enabled: bool,
}

/// In-memory scene with circular colliders and a flat transform hierarchy.
#[derive(Debug, Default)]
pub struct SimScene {
    players: AHashMap<EntityId, SimPlayer>,
    bodies: AHashMap<EntityId, SimBody>,
}

impl SimScene {
    /// Creates an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a player and returns its ID.
    pub fn add_player(&mut self, player: SimPlayer) -> EntityId {
        let id = player.id;
        self.players.insert(id, player);
        id
    }

    /// Removes a player, as if destroyed by something outside the vehicle.
    pub fn remove_player(&mut self, id: EntityId) -> Option<SimPlayer> {
        self.players.remove(&id)
    }

    /// Adds a static collider and returns its ID.
    pub fn add_prop(&mut self, position: Vec2, radius: f32, tag: &str) -> EntityId {
        let id = EntityId::new();
        self.bodies.insert(
            id,
            SimBody {
                position,
                radius,
                tag: tag.to_string(),
                collision_enabled: true,
            },
        );
        id
    }

    /// Returns the concrete player for inspection.
    #[must_use]
    pub fn sim_player(&self, id: EntityId) -> Option<&SimPlayer> {
        self.players.get(&id)
    }

    /// Returns the concrete player for scripting.
    pub fn sim_player_mut(&mut self, id: EntityId) -> Option<&mut SimPlayer> {
        self.players.get_mut(&id)
    }

    /// Returns a body's position.
    #[must_use]
    pub fn body_position(&self, id: EntityId) -> Option<Vec2> {
        self.bodies.get(&id).map(|body| body.position)
    }

    /// Returns whether a body's collider is enabled.
    #[must_use]
    pub fn collision_enabled(&self, id: EntityId) -> Option<bool> {
        self.bodies.get(&id).map(|body| body.collision_enabled)
    }

    /// Returns whether a body exists.
    #[must_use]
    pub fn contains_body(&self, id: EntityId) -> bool {
        self.bodies.contains_key(&id)
    }

    /// Returns the number of non-player bodies.
    #[must_use]
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

impl OverlapQuery for SimScene {
    fn overlap_circle(&self, center: Vec2, radius: f32) -> Vec<Contact> {
        let players = self
            .players
            .values()
            .filter(|player| player.position.distance(center) <= radius + player.radius)
            .map(|player| Contact {
                entity: player.id,
                position: player.position,
                tag: player.tag.clone(),
            });
        let bodies = self
            .bodies
            .iter()
            .filter(|(_, body)| {
                body.collision_enabled && body.position.distance(center) <= radius + body.radius
            })
            .map(|(&entity, body)| Contact {
                entity,
                position: body.position,
                tag: body.tag.clone(),
            });

        let mut hits: Vec<Contact> = players.chain(bodies).collect();
        // Hash map order is not stable
        hits.sort_by_key(|contact| contact.entity);
        hits
    }
}

impl Scene for SimScene {
    fn player(&self, id: EntityId) -> Option<&dyn PlayerProxy> {
        self.players.get(&id).map(|p| p as &dyn PlayerProxy)
    }

    fn player_mut(&mut self, id: EntityId) -> Option<&mut dyn PlayerProxy> {
        self.players.get_mut(&id).map(|p| p as &mut dyn PlayerProxy)
    }

    fn spawn_kinematic(&mut self, body: EntityId, position: Vec2, radius: f32, tag: &str) {
        self.bodies.insert(
            body,
            SimBody {
                position,
                radius,
                tag: tag.to_string(),
                collision_enabled: true,
            },
        );
    }

    fn move_kinematic(&mut self, body: EntityId, position: Vec2) {
        let Some(sim_body) = self.bodies.get_mut(&body) else {
            warn!("move_kinematic on unknown body {body}");
            return;
        };
        let delta = position - sim_body.position;
        sim_body.position = position;

        if delta == Vec2::ZERO {
            return;
        }
        for player in self.players.values_mut() {
            if player.parent == Some(body) {
                player.carry(delta);
            }
        }
    }

    fn set_collision_enabled(&mut self, body: EntityId, enabled: bool) {
        if let Some(sim_body) = self.bodies.get_mut(&body) {
            sim_body.collision_enabled = enabled;
        }
    }

    fn despawn(&mut self, body: EntityId) {
        if self.bodies.remove(&body).is_none() {
            return;
        }
        for player in self.players.values_mut() {
            if player.parent == Some(body) {
                warn!("Player {} still parented to despawned {body}, detaching", player.id);
                player.parent = None;
            }
        }
        debug!("Despawned body {body}");
    }
}
