//! The Odyssey vehicle and the system that owns every live one.
//!
//! A vehicle is a kinematic body that a player mounts by walking into its
//! detection radius. While mounted it takes the player's directional input,
//! carries the player along and counts down its control timer. When the timer
//! runs out it hands the player back, stops colliding, shrinks to nothing and
//! removes itself from the scene.
//!
//! Per tick, in order: rider validation, presence detection and the resulting
//! transition, timer advance, steering and integration, rider follow, and
//! finally ascension, which sees the occupancy decided earlier in the tick.

use std::fmt;

use ahash::AHashMap;
use glam::Vec2;
use odyssey_common::{Aabb, EntityId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::ascension::AscensionBehavior;
use crate::camera::Camera2D;
use crate::config::{ConfigError, OdysseyConfig};
use crate::detector::MountDetector;
use crate::events::{EventBus, OdysseyEvent};
use crate::follow::{FollowMode, PlayerFollow};
use crate::input::InputSource;
use crate::motion::MotionModel;
use crate::player::PlayerHandoff;
use crate::scene::{Scene, VEHICLE_TAG};
use crate::timer::{ControlTimer, TimerDiagnostics};

/// Shrink progress this close to 1.0 counts as finished.
pub const SHRINK_EPSILON: f32 = 1e-4;

/// Error types for vehicle operations.
#[derive(Debug, Error, PartialEq)]
pub enum OdysseyError {
    /// No live vehicle with this ID
    #[error("Odyssey not found: {0}")]
    NotFound(EntityId),
    /// Player handle does not resolve in the scene
    #[error("Player not found: {0}")]
    PlayerNotFound(EntityId),
    /// Operation not allowed in the current lifecycle state
    #[error("Odyssey is {0}")]
    InvalidState(LifecycleState),
    /// Operation requires an empty vehicle
    #[error("Odyssey is occupied by {0}")]
    Occupied(EntityId),
    /// Configuration failed validation
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for vehicle operations.
pub type OdysseyResult<T> = Result<T, OdysseyError>;

/// Where a vehicle is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleState {
    /// Waiting for a rider
    Idle,
    /// Carrying a rider
    Mounted,
    /// Shrinking away after the timer ran out
    Despawning,
    /// Removed from the scene; terminal
    Destroyed,
}

impl LifecycleState {
    /// Returns whether the vehicle still takes part in the game.
    #[must_use]
    pub const fn is_live(self) -> bool {
        matches!(self, Self::Idle | Self::Mounted)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Mounted => write!(f, "Mounted"),
            Self::Despawning => write!(f, "Despawning"),
            Self::Destroyed => write!(f, "Destroyed"),
        }
    }
}

/// Despawn animation progress.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Shrink {
    elapsed: f32,
}

impl Shrink {
    fn progress(&self, duration: f32) -> f32 {
        let t = (self.elapsed / duration).min(1.0);
        if 1.0 - t < SHRINK_EPSILON {
            1.0
        } else {
            t
        }
    }
}

/// Lifecycle state together with the data only that state owns.
///
/// Keeping the hand-off inside `Mounted` makes "occupied iff a rider handle is
/// held" hold by construction.
#[derive(Debug)]
enum Phase {
    Idle,
    Mounted(PlayerHandoff),
    Despawning(Shrink),
    Destroyed,
}

impl Phase {
    const fn state(&self) -> LifecycleState {
        match self {
            Self::Idle => LifecycleState::Idle,
            Self::Mounted(_) => LifecycleState::Mounted,
            Self::Despawning(_) => LifecycleState::Despawning,
            Self::Destroyed => LifecycleState::Destroyed,
        }
    }
}

/// Serializable snapshot of a vehicle for inspection tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OdysseyStatus {
    /// Vehicle ID
    pub id: EntityId,
    /// Lifecycle state
    pub state: LifecycleState,
    /// World position
    pub position: Vec2,
    /// Current velocity
    pub velocity: Vec2,
    /// Current rider
    pub occupant: Option<EntityId>,
    /// Active follow strategy
    pub follow_mode: FollowMode,
    /// Control timer state
    pub timer: TimerDiagnostics,
    /// Sprite opacity
    pub alpha: f32,
    /// Current scale
    pub scale: Vec2,
    /// Whether the collider is enabled
    pub collision_enabled: bool,
    /// Whether the last visibility test passed
    pub visible: bool,
    /// Whether ascension has halted
    pub ascension_halted: bool,
}

// ============================================================================
// Vehicle
// ============================================================================

/// One rideable vehicle.
#[derive(Debug)]
pub struct Odyssey {
    id: EntityId,
    config: OdysseyConfig,
    phase: Phase,
    position: Vec2,
    velocity: Vec2,
    detector: MountDetector,
    motion: MotionModel,
    follow: PlayerFollow,
    timer: ControlTimer,
    ascension: AscensionBehavior,
    original_scale: Vec2,
    scale: Vec2,
    alpha: f32,
    collision_enabled: bool,
}

impl Odyssey {
    /// Creates a vehicle without touching any scene.
    pub fn new(id: EntityId, config: OdysseyConfig, position: Vec2) -> OdysseyResult<Self> {
        config.validate()?;
        Ok(Self {
            id,
            detector: MountDetector::new(config.detection_radius, config.player_tag.clone()),
            motion: MotionModel::from_config(&config),
            follow: PlayerFollow::new(config.follow_mode(), position),
            timer: ControlTimer::new(config.control_time_limit, config.fade_out_effect),
            ascension: AscensionBehavior::from_config(&config),
            original_scale: config.scale,
            scale: config.scale,
            alpha: 1.0,
            collision_enabled: true,
            phase: Phase::Idle,
            position,
            velocity: Vec2::ZERO,
            config,
        })
    }

    /// Creates a vehicle, adds its body to the scene and announces it.
    pub fn spawn<S: Scene + ?Sized>(
        config: OdysseyConfig,
        position: Vec2,
        scene: &mut S,
        events: &EventBus,
    ) -> OdysseyResult<Self> {
        let odyssey = Self::new(EntityId::new(), config, position)?;
        scene.spawn_kinematic(odyssey.id, position, odyssey.config.body_radius, VEHICLE_TAG);
        events.publish(OdysseyEvent::OdysseySpawned {
            vehicle: odyssey.id,
        });
        info!("Spawned Odyssey {} at {position}", odyssey.id);
        Ok(odyssey)
    }

    /// Runs one tick and returns the resulting lifecycle state.
    ///
    /// `input` is asked for the rider's input after this tick's transition,
    /// so a player who mounts this tick already steers.
    pub fn tick<S: Scene + ?Sized, I: InputSource + ?Sized>(
        &mut self,
        dt: f32,
        input: &I,
        scene: &mut S,
        camera: Option<&Camera2D>,
        events: &EventBus,
    ) -> LifecycleState {
        let dt = dt.max(0.0);
        match self.phase {
            Phase::Destroyed => return LifecycleState::Destroyed,
            Phase::Despawning(_) => {
                self.step_shrink(dt, scene, events);
                return self.state();
            },
            Phase::Idle | Phase::Mounted(_) => {},
        }

        self.drop_vanished_rider(&*scene, events);
        self.handle_presence(scene, events);

        if self.advance_timer(dt, events) {
            self.disappear(scene, events);
            return self.state();
        }

        self.steer(dt, input, scene);
        self.carry_rider(scene);
        self.ascend(dt, scene, camera);
        self.state()
    }

    /// Takes control of `player`.
    ///
    /// Mounting an already mounted vehicle is a no-op. Despawning and
    /// destroyed vehicles refuse riders.
    pub fn mount<S: Scene + ?Sized>(
        &mut self,
        player: EntityId,
        scene: &mut S,
        events: &EventBus,
    ) -> OdysseyResult<()> {
        match self.state() {
            LifecycleState::Idle => {},
            LifecycleState::Mounted => return Ok(()),
            other => return Err(OdysseyError::InvalidState(other)),
        }

        let proxy = scene
            .player_mut(player)
            .ok_or(OdysseyError::PlayerNotFound(player))?;
        let handoff = PlayerHandoff::take_control(proxy, self.id, self.follow.mode());

        self.phase = Phase::Mounted(handoff);
        self.timer.start();
        self.alpha = self.timer.alpha();
        self.follow.reset_anchor(self.position);

        events.publish(OdysseyEvent::PlayerMounted {
            vehicle: self.id,
            player,
        });
        info!("Player {player} mounted Odyssey {}", self.id);
        Ok(())
    }

    /// Hands the rider back, restoring everything captured at mount.
    ///
    /// Returns the released player, or `None` when nobody was riding.
    pub fn dismount<S: Scene + ?Sized>(
        &mut self,
        scene: &mut S,
        events: &EventBus,
    ) -> Option<EntityId> {
        if !matches!(self.phase, Phase::Mounted(_)) {
            return None;
        }
        let Phase::Mounted(handoff) = std::mem::replace(&mut self.phase, Phase::Idle) else {
            return None;
        };

        let player = handoff.player();
        match scene.player_mut(player) {
            Some(proxy) => handoff.release(proxy),
            None => handoff.abandon(),
        }
        self.end_ride(player, events);
        Some(player)
    }

    /// Starts the despawn sequence now.
    ///
    /// Releases any rider, disables the collider and shows the first shrink
    /// frame (full scale). Subsequent ticks shrink the vehicle to zero and
    /// then remove it. Calling this again once despawning is a no-op.
    pub fn disappear<S: Scene + ?Sized>(&mut self, scene: &mut S, events: &EventBus) {
        if !self.state().is_live() {
            return;
        }
        self.dismount(scene, events);

        self.collision_enabled = false;
        scene.set_collision_enabled(self.id, false);
        self.phase = Phase::Despawning(Shrink::default());
        self.scale = self.original_scale;
        info!("Odyssey {} disappearing", self.id);
    }

    /// Removes the vehicle immediately, skipping the shrink.
    pub fn remove<S: Scene + ?Sized>(&mut self, scene: &mut S, events: &EventBus) {
        if matches!(self.phase, Phase::Destroyed) {
            return;
        }
        self.dismount(scene, events);
        self.destroy(scene, events);
    }

    /// Switches the follow strategy. Only allowed while nobody rides.
    pub fn set_follow_mode(&mut self, mode: FollowMode) -> OdysseyResult<()> {
        match &self.phase {
            Phase::Idle => {},
            Phase::Mounted(handoff) => return Err(OdysseyError::Occupied(handoff.player())),
            Phase::Despawning(_) | Phase::Destroyed => {
                return Err(OdysseyError::InvalidState(self.state()));
            },
        }
        self.follow.set_mode(mode);
        self.config.use_parenting_method = matches!(mode, FollowMode::Parenting);
        info!("Odyssey {} now uses {mode} follow", self.id);
        Ok(())
    }

    // === Tick stages ===

    /// An occupant handle that no longer resolves is an implicit dismount.
    fn drop_vanished_rider<S: Scene + ?Sized>(&mut self, scene: &S, events: &EventBus) {
        let Phase::Mounted(handoff) = &self.phase else {
            return;
        };
        let player = handoff.player();
        if scene.player(player).is_some() {
            return;
        }

        warn!("Rider {player} of Odyssey {} no longer exists, dismounting", self.id);
        if let Phase::Mounted(handoff) = std::mem::replace(&mut self.phase, Phase::Idle) {
            handoff.abandon();
        }
        self.end_ride(player, events);
        self.alpha = 1.0;
    }

    fn handle_presence<S: Scene + ?Sized>(&mut self, scene: &mut S, events: &EventBus) {
        let detection = self.detector.detect(&*scene, self.position);
        match (self.state(), detection) {
            (LifecycleState::Idle, Some(found)) => {
                if let Err(err) = self.mount(found.player, scene, events) {
                    warn!("Odyssey {} could not mount {}: {err}", self.id, found.player);
                }
            },
            (LifecycleState::Mounted, None) => {
                self.dismount(scene, events);
                self.alpha = 1.0;
            },
            _ => {},
        }
    }

    /// Returns `true` when the timer expired this tick.
    fn advance_timer(&mut self, dt: f32, events: &EventBus) -> bool {
        if !matches!(self.phase, Phase::Mounted(_)) {
            return false;
        }
        let tick = self.timer.advance(dt);
        self.alpha = self.timer.alpha();

        if tick.warning {
            events.publish(OdysseyEvent::TimerWarning { vehicle: self.id });
            info!("Odyssey {} has one second of control left", self.id);
        }
        if tick.expired {
            info!("Odyssey {} control time is up", self.id);
        }
        tick.expired
    }

    fn steer<S: Scene + ?Sized, I: InputSource + ?Sized>(
        &mut self,
        dt: f32,
        input: &I,
        scene: &mut S,
    ) {
        if let Some(player) = self.occupant() {
            let direction = input.input_for(player).direction();
            self.velocity = self.motion.steer(self.velocity, direction, dt);
            let next = MotionModel::integrate(self.position, self.velocity, dt);
            self.move_body(next, scene);
        } else {
            self.velocity = self.motion.decelerate(self.velocity, dt);
        }
    }

    fn carry_rider<S: Scene + ?Sized>(&mut self, scene: &mut S) {
        let rider = match &self.phase {
            Phase::Mounted(handoff) => scene.player_mut(handoff.player()),
            _ => None,
        };
        self.follow.apply(self.position, rider);
    }

    fn ascend<S: Scene + ?Sized>(&mut self, dt: f32, scene: &mut S, camera: Option<&Camera2D>) {
        let bounds = self.render_bounds();
        let occupied = self.is_occupied();
        if let Some(next) = self.ascension.tick(dt, self.position, bounds, camera, occupied) {
            self.move_body(next, scene);
        }
    }

    fn step_shrink<S: Scene + ?Sized>(&mut self, dt: f32, scene: &mut S, events: &EventBus) {
        let Phase::Despawning(shrink) = &mut self.phase else {
            return;
        };
        shrink.elapsed += dt;
        let t = shrink.progress(self.config.shrink_duration);
        self.scale = self.original_scale.lerp(Vec2::ZERO, t);
        debug!("Odyssey {} shrink at {t:.2}", self.id);

        if t >= 1.0 {
            self.destroy(scene, events);
        }
    }

    // === Helpers ===

    fn end_ride(&mut self, player: EntityId, events: &EventBus) {
        self.timer.stop();
        events.publish(OdysseyEvent::PlayerDismounted {
            vehicle: self.id,
            player,
        });
        info!("Player {player} left Odyssey {}", self.id);
    }

    fn destroy<S: Scene + ?Sized>(&mut self, scene: &mut S, events: &EventBus) {
        scene.despawn(self.id);
        self.collision_enabled = false;
        self.phase = Phase::Destroyed;
        events.publish(OdysseyEvent::OdysseyDisappeared { vehicle: self.id });
        info!("Odyssey {} destroyed", self.id);
    }

    fn move_body<S: Scene + ?Sized>(&mut self, position: Vec2, scene: &mut S) {
        if position == self.position {
            return;
        }
        self.position = position;
        scene.move_kinematic(self.id, position);
    }

    // === Accessors ===

    /// Returns the vehicle's entity ID.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn state(&self) -> LifecycleState {
        self.phase.state()
    }

    /// Returns the configuration the vehicle was built from.
    #[must_use]
    pub const fn config(&self) -> &OdysseyConfig {
        &self.config
    }

    /// Returns the world position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Returns the current velocity.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Returns the current rider.
    #[must_use]
    pub fn occupant(&self) -> Option<EntityId> {
        match &self.phase {
            Phase::Mounted(handoff) => Some(handoff.player()),
            _ => None,
        }
    }

    /// Returns whether a player is riding.
    #[must_use]
    pub const fn is_occupied(&self) -> bool {
        matches!(self.phase, Phase::Mounted(_))
    }

    /// Returns the hand-off record of the current ride.
    #[must_use]
    pub fn handoff(&self) -> Option<&PlayerHandoff> {
        match &self.phase {
            Phase::Mounted(handoff) => Some(handoff),
            _ => None,
        }
    }

    /// Returns the active follow strategy.
    #[must_use]
    pub const fn follow_mode(&self) -> FollowMode {
        self.follow.mode()
    }

    /// Returns the control timer.
    #[must_use]
    pub const fn timer(&self) -> &ControlTimer {
        &self.timer
    }

    /// Returns the mount detector.
    #[must_use]
    pub const fn detector(&self) -> &MountDetector {
        &self.detector
    }

    /// Returns the ascension behavior.
    #[must_use]
    pub const fn ascension(&self) -> &AscensionBehavior {
        &self.ascension
    }

    /// Returns the ascension behavior for runtime control.
    pub fn ascension_mut(&mut self) -> &mut AscensionBehavior {
        &mut self.ascension
    }

    /// Returns the sprite opacity.
    #[must_use]
    pub const fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Returns the current scale.
    #[must_use]
    pub const fn scale(&self) -> Vec2 {
        self.scale
    }

    /// Returns the scale the vehicle spawned with.
    #[must_use]
    pub const fn original_scale(&self) -> Vec2 {
        self.original_scale
    }

    /// Returns whether the collider is enabled.
    #[must_use]
    pub const fn collision_enabled(&self) -> bool {
        self.collision_enabled
    }

    /// Returns the world-space sprite bounds, or `None` without a renderer.
    #[must_use]
    pub fn render_bounds(&self) -> Option<Aabb> {
        self.config
            .sprite_half_extents
            .map(|half| Aabb::from_center(self.position, half * self.scale.abs()))
    }

    /// Returns a serializable snapshot.
    #[must_use]
    pub fn status(&self) -> OdysseyStatus {
        OdysseyStatus {
            id: self.id,
            state: self.state(),
            position: self.position,
            velocity: self.velocity,
            occupant: self.occupant(),
            follow_mode: self.follow.mode(),
            timer: self.timer.diagnostics(),
            alpha: self.alpha,
            scale: self.scale,
            collision_enabled: self.collision_enabled,
            visible: self.ascension.is_visible(),
            ascension_halted: self.ascension.is_halted(),
        }
    }
}

// ============================================================================
// System
// ============================================================================

/// Owns every live vehicle.
#[derive(Debug, Default)]
pub struct OdysseySystem {
    vehicles: AHashMap<EntityId, Odyssey>,
}

impl OdysseySystem {
    /// Creates an empty system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of vehicles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    /// Returns whether there are no vehicles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Returns whether a vehicle is tracked.
    #[must_use]
    pub fn contains(&self, vehicle: EntityId) -> bool {
        self.vehicles.contains_key(&vehicle)
    }

    /// Gets a vehicle.
    #[must_use]
    pub fn get(&self, vehicle: EntityId) -> Option<&Odyssey> {
        self.vehicles.get(&vehicle)
    }

    /// Gets a vehicle for mutation.
    pub fn get_mut(&mut self, vehicle: EntityId) -> Option<&mut Odyssey> {
        self.vehicles.get_mut(&vehicle)
    }

    /// Spawns a vehicle into the scene and starts tracking it.
    pub fn spawn<S: Scene + ?Sized>(
        &mut self,
        config: OdysseyConfig,
        position: Vec2,
        scene: &mut S,
        events: &EventBus,
    ) -> OdysseyResult<EntityId> {
        let odyssey = Odyssey::spawn(config, position, scene, events)?;
        Ok(self.insert(odyssey))
    }

    /// Tracks an already spawned vehicle.
    pub fn insert(&mut self, odyssey: Odyssey) -> EntityId {
        let id = odyssey.id();
        self.vehicles.insert(id, odyssey);
        id
    }

    /// Removes a vehicle immediately, releasing its rider.
    pub fn despawn<S: Scene + ?Sized>(
        &mut self,
        vehicle: EntityId,
        scene: &mut S,
        events: &EventBus,
    ) -> OdysseyResult<()> {
        let mut odyssey = self
            .vehicles
            .remove(&vehicle)
            .ok_or(OdysseyError::NotFound(vehicle))?;
        odyssey.remove(scene, events);
        Ok(())
    }

    /// Ticks every vehicle and drops the destroyed ones.
    ///
    /// Vehicles tick in ID order. Returns the IDs removed this tick.
    pub fn update<S: Scene + ?Sized, I: InputSource + ?Sized>(
        &mut self,
        dt: f32,
        inputs: &I,
        scene: &mut S,
        camera: Option<&Camera2D>,
        events: &EventBus,
    ) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.vehicles.keys().copied().collect();
        ids.sort_unstable();

        let mut destroyed = Vec::new();
        for id in ids {
            let Some(odyssey) = self.vehicles.get_mut(&id) else {
                continue;
            };
            if odyssey.tick(dt, inputs, scene, camera, events) == LifecycleState::Destroyed {
                destroyed.push(id);
            }
        }

        for id in &destroyed {
            self.vehicles.remove(id);
        }
        destroyed
    }

    /// Returns the vehicle a player is riding.
    #[must_use]
    pub fn vehicle_for_rider(&self, player: EntityId) -> Option<EntityId> {
        self.vehicles
            .iter()
            .find(|(_, odyssey)| odyssey.occupant() == Some(player))
            .map(|(&id, _)| id)
    }

    /// Returns iterator over all vehicles.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Odyssey)> {
        self.vehicles.iter().map(|(&id, odyssey)| (id, odyssey))
    }

    /// Gets the nearest live vehicle to a position.
    #[must_use]
    pub fn get_nearest(&self, pos: Vec2) -> Option<EntityId> {
        self.vehicles
            .iter()
            .filter(|(_, odyssey)| odyssey.state().is_live())
            .min_by(|(a_id, a), (b_id, b)| {
                a.position()
                    .distance(pos)
                    .partial_cmp(&b.position().distance(pos))
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a_id.cmp(b_id))
            })
            .map(|(&id, _)| id)
    }

    /// Returns a snapshot of every vehicle, in ID order.
    #[must_use]
    pub fn statuses(&self) -> Vec<OdysseyStatus> {
        let mut statuses: Vec<OdysseyStatus> =
            self.vehicles.values().map(Odyssey::status).collect();
        statuses.sort_by_key(|status| status.id);
        statuses
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::input::OdysseyInput;
    use crate::player::PlayerProxy;
    use crate::scene::{SimPlayer, SimScene};
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Step {
        Tick { dt: f32, h: f32, v: f32 },
        WalkIn,
        WalkAway,
        RemovePlayer,
        Disappear,
    }

    fn step() -> impl Strategy<Value = Step> {
        prop_oneof![
            6 => (0.0f32..0.5, -1.0f32..1.0, -1.0f32..1.0)
                .prop_map(|(dt, h, v)| Step::Tick { dt, h, v }),
            2 => Just(Step::WalkIn),
            2 => Just(Step::WalkAway),
            1 => Just(Step::RemovePlayer),
            1 => Just(Step::Disappear),
        ]
    }

    proptest! {
        #[test]
        fn occupancy_and_timer_stay_in_sync(
            steps in prop::collection::vec(step(), 1..80),
            manual in any::<bool>(),
        ) {
            let mode = if manual { FollowMode::Manual } else { FollowMode::Parenting };
            let config = OdysseyConfig {
                sprite_half_extents: None,
                ..OdysseyConfig::default()
            }
            .with_follow_mode(mode)
            .with_time_limit(2.0);

            let mut scene = SimScene::new();
            let events = EventBus::new(4096);
            let mut odyssey = Odyssey::spawn(config, Vec2::ZERO, &mut scene, &events)
                .expect("valid config");
            let mut player = Some(scene.add_player(SimPlayer::new(Vec2::new(50.0, 0.0))));

            for step in steps {
                match step {
                    Step::Tick { dt, h, v } => {
                        odyssey.tick(dt, &OdysseyInput::new(h, v), &mut scene, None, &events);
                    },
                    Step::WalkIn => {
                        if let Some(p) = player.and_then(|id| scene.sim_player_mut(id)) {
                            p.walk_to(odyssey.position() + Vec2::new(0.5, 0.0));
                        }
                    },
                    Step::WalkAway => {
                        if let Some(p) = player.and_then(|id| scene.sim_player_mut(id)) {
                            p.walk_to(odyssey.position() + Vec2::new(40.0, 0.0));
                        }
                    },
                    Step::RemovePlayer => {
                        if let Some(id) = player.take() {
                            scene.remove_player(id);
                        }
                    },
                    Step::Disappear => odyssey.disappear(&mut scene, &events),
                }

                prop_assert_eq!(odyssey.is_occupied(), odyssey.occupant().is_some());
                prop_assert_eq!(odyssey.is_occupied(), odyssey.timer().is_active());
                prop_assert_eq!(
                    odyssey.is_occupied(),
                    odyssey.state() == LifecycleState::Mounted
                );

                // A player not riding has everything restored
                if let Some(id) = player {
                    if odyssey.occupant() != Some(id) {
                        let p = scene.sim_player(id).expect("player exists");
                        prop_assert_eq!(p.gravity_scale(), Some(1.0));
                        prop_assert_eq!(p.input_enabled(), Some(true));
                        prop_assert_eq!(p.parent(), None);
                    }
                }
            }

            // Mounted and dismounted events pair up per player
            let emitted = events.drain();
            let mounts = emitted
                .iter()
                .filter(|e| matches!(e, OdysseyEvent::PlayerMounted { .. }))
                .count();
            let dismounts = emitted
                .iter()
                .filter(|e| matches!(e, OdysseyEvent::PlayerDismounted { .. }))
                .count();
            prop_assert_eq!(mounts, dismounts + usize::from(odyssey.is_occupied()));
        }
    }
}
