//! Run orchestration: scoring, lives, progressive difficulty and outcome
//!
//! Frame order inside [`GameLogic::update`] is fixed:
//! advance, spawn, collisions, off-screen culling, outcome. A collision
//! releases its object before the culling pass can see it.

use glam::Vec2;

use super::physics::PhysicsEngine;
use super::pool::ObjectPool;
use super::state::{
    Cup, CupInput, DrinkKind, FallingObject, GameEvent, GameOutcome, GamePhase, ObjectId, ObjectKind,
};
use crate::persistence::GameStore;
use crate::platform::{self, Clock, FixedPlayField, PlayField};
use crate::tuning::Tuning;
use crate::{FALLBACK_PLAY_FIELD, sanitize_play_field};

type EventHandler = Box<dyn FnMut(&GameEvent)>;

pub struct GameLogic {
    tuning: Tuning,
    pool: ObjectPool,
    physics: PhysicsEngine,
    play_field: Box<dyn PlayField>,
    clock: Box<dyn Clock>,
    store: Option<Box<dyn GameStore>>,
    handlers: Vec<EventHandler>,
    /// Per-frame id buffer, kept between frames
    scratch: Vec<ObjectId>,

    phase: GamePhase,
    outcome: Option<GameOutcome>,
    drink: DrinkKind,
    target_boba_count: u32,
    boba_count: u32,
    lives: u32,
    started_at_ms: f64,
    game_time_ms: f64,
    /// Progressive boosts already applied this run
    boost_stage: u32,
}

impl GameLogic {
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let drink = DrinkKind::default();
        Self {
            tuning,
            pool: ObjectPool::with_capacity(tuning.pool_capacity),
            physics: PhysicsEngine::new(tuning, seed),
            play_field: Box::new(FixedPlayField(FALLBACK_PLAY_FIELD)),
            clock: platform::default_clock(),
            store: None,
            handlers: Vec::new(),
            scratch: Vec::with_capacity(tuning.pool_capacity.min(crate::consts::MAX_POOL_CAPACITY)),
            phase: GamePhase::Idle,
            outcome: None,
            drink,
            target_boba_count: drink.target_boba_count(),
            boba_count: 0,
            lives: tuning.starting_lives,
            started_at_ms: 0.0,
            game_time_ms: 0.0,
            boost_stage: 0,
        }
    }

    pub fn with_play_field(mut self, play_field: impl PlayField + 'static) -> Self {
        self.play_field = Box::new(play_field);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_store(mut self, store: impl GameStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    /// Register a handler; handlers run synchronously, in registration order
    pub fn subscribe(&mut self, handler: impl FnMut(&GameEvent) + 'static) {
        self.handlers.push(Box::new(handler));
    }

    fn emit(&mut self, event: GameEvent) {
        for handler in &mut self.handlers {
            handler(&event);
        }
    }

    /// Current play-field size, or the fallback when the host cannot tell
    pub fn play_field_size(&self) -> Vec2 {
        let size = self.play_field.size();
        if size.is_none() {
            log::debug!("Play field size unavailable, using fallback {:?}", FALLBACK_PLAY_FIELD);
        }
        sanitize_play_field(size)
    }

    /// Initial cup: centered, just above the bottom of the play field
    pub fn spawn_cup(&self) -> Cup {
        Cup::centered(self.play_field_size(), &self.tuning)
    }

    /// Select the difficulty tier. Resets progressive boosts and multipliers.
    pub fn set_target_boba_count(&mut self, drink: DrinkKind) {
        self.drink = drink;
        self.target_boba_count = drink.target_boba_count();
        self.boost_stage = 0;
        self.physics.reset_multipliers();
        log::info!("Drink set to {} (target {})", drink.as_str(), self.target_boba_count);
        self.emit(GameEvent::TargetBobaCountChanged {
            count: self.target_boba_count,
        });
    }

    /// Begin a fresh run with the selected drink
    pub fn start(&mut self) {
        self.boost_stage = 0;
        self.physics.reset_multipliers();
        self.begin_run();
        log::info!("Run started ({}, target {})", self.drink.as_str(), self.target_boba_count);
    }

    /// Begin a new run keeping the current multipliers and boost progress
    pub fn restart(&mut self) {
        self.begin_run();
        log::info!(
            "Run restarted ({}, speed x{:.2}, spawn x{:.2})",
            self.drink.as_str(),
            self.physics.speed_multiplier(),
            self.physics.spawn_frequency_multiplier()
        );
    }

    fn begin_run(&mut self) {
        self.pool.release_all();
        self.physics.reset_spawn_timer();
        self.boba_count = 0;
        self.lives = self.tuning.starting_lives;
        self.started_at_ms = self.clock.now_ms();
        self.game_time_ms = 0.0;
        self.outcome = None;
        self.phase = GamePhase::Running;

        self.emit(GameEvent::BobaCountChanged { count: 0 });
        self.emit(GameEvent::LivesChanged { lives: self.lives });
    }

    /// Tear down: back to idle with all pool storage dropped
    pub fn shutdown(&mut self) {
        self.phase = GamePhase::Idle;
        self.pool.destroy();
    }

    /// Advance one frame. Returns the outcome if the run ended during it.
    pub fn update(&mut self, delta_ms: f32, cup: &Cup) -> Option<GameOutcome> {
        if self.phase != GamePhase::Running {
            return None;
        }
        self.game_time_ms = self.clock.now_ms() - self.started_at_ms;
        let field = self.play_field_size();

        self.physics.advance(delta_ms, self.pool.active_mut());

        if self.physics.should_spawn(delta_ms) {
            self.spawn_object(field.x);
        }

        let mut ids = std::mem::take(&mut self.scratch);
        self.pool.snapshot_into(&mut ids);
        let mut bomb_hit = false;
        for &id in &ids {
            let Some(obj) = self.pool.get(id).copied() else {
                continue;
            };
            if !self.physics.is_colliding(&obj, cup) {
                continue;
            }
            self.pool.release(id);
            match obj.kind {
                ObjectKind::Boba => self.on_boba_caught(),
                ObjectKind::Heart => self.on_heart_caught(),
                ObjectKind::Bomb => {
                    self.on_bomb_caught();
                    bomb_hit = true;
                    break;
                }
            }
        }

        if !bomb_hit {
            self.cull_offscreen(field.y, &mut ids);
        }
        self.scratch = ids;

        let outcome = if self.lives == 0 {
            Some(GameOutcome::Lose)
        } else if self.boba_count >= self.target_boba_count {
            Some(GameOutcome::Win)
        } else {
            None
        };
        if let Some(outcome) = outcome {
            self.end_run(outcome);
        }
        outcome
    }

    fn spawn_object(&mut self, field_width: f32) {
        let spec = self.physics.spawn_spec(field_width, self.tuning.object_size);
        self.pool.acquire().apply(&spec);
    }

    fn on_boba_caught(&mut self) {
        self.boba_count += 1;
        self.emit(GameEvent::BobaCountChanged {
            count: self.boba_count,
        });
        self.apply_progressive_boosts();
    }

    fn on_heart_caught(&mut self) {
        if self.lives >= self.tuning.max_lives {
            self.emit(GameEvent::MaxLivesReached);
        } else {
            self.lives += 1;
            self.emit(GameEvent::LivesChanged { lives: self.lives });
        }
    }

    fn on_bomb_caught(&mut self) {
        self.lives = 0;
        self.emit(GameEvent::LivesChanged { lives: 0 });
    }

    /// Release everything past the bottom margin; each missed boba costs a life
    fn cull_offscreen(&mut self, field_height: f32, ids: &mut Vec<ObjectId>) {
        ids.clear();
        let physics = &self.physics;
        ids.extend(
            self.pool
                .active_objects()
                .filter(|obj| physics.is_offscreen(obj, field_height))
                .map(|obj| obj.id),
        );

        for &id in ids.iter() {
            let missed = self.pool.get(id).is_some_and(|obj| obj.kind == ObjectKind::Boba);
            self.pool.release(id);
            if missed && self.lives > 0 {
                self.lives -= 1;
                self.emit(GameEvent::LivesChanged { lives: self.lives });
            }
        }
    }

    /// Raise speed and spawn frequency for every boost stage reached and not yet applied
    pub fn apply_progressive_boosts(&mut self) {
        let due = self.drink.boost_stages_due(self.boba_count);
        while self.boost_stage < due {
            self.boost_stage += 1;
            self.physics.increase_speed_multiplier(self.tuning.boost_speed_step);
            self.physics
                .increase_spawn_frequency_multiplier(self.tuning.boost_spawn_step);
            log::debug!(
                "Boost stage {} at {} boba: speed x{:.2}, spawn x{:.2}",
                self.boost_stage,
                self.boba_count,
                self.physics.speed_multiplier(),
                self.physics.spawn_frequency_multiplier()
            );
        }
    }

    fn end_run(&mut self, outcome: GameOutcome) {
        self.phase = GamePhase::Ended;
        self.outcome = Some(outcome);
        log::info!(
            "Run ended: {} with {}/{} boba, {} lives, {:.1}s",
            outcome.as_str(),
            self.boba_count,
            self.target_boba_count,
            self.lives,
            self.game_time_ms / 1000.0
        );
        self.emit(GameEvent::GameEnded { outcome });

        if let Some(store) = self.store.as_mut() {
            if let Err(e) = store.record_result(self.boba_count, self.game_time_ms) {
                log::warn!("Failed to record run: {}", e);
            }
            match store.update_high_score(self.boba_count) {
                Ok(true) => log::info!("New high score: {}", self.boba_count),
                Ok(false) => {}
                Err(e) => log::warn!("Failed to save high score: {}", e),
            }
        }
    }

    /// Move the cup from pointer or keyboard input, then clamp it to the field
    pub fn update_cup_position(&self, cup: &mut Cup, input: &CupInput) {
        if let Some(x) = input.pointer_x.filter(|x| x.is_finite()) {
            cup.pos.x = x - cup.size.x / 2.0;
        } else {
            let frame_ms = input
                .frame_ms
                .filter(|ms| ms.is_finite() && *ms >= 0.0)
                .unwrap_or(self.tuning.reference_frame_ms);
            let step = self.tuning.cup_speed * frame_ms / 1000.0;
            if input.left {
                cup.pos.x -= step;
            }
            if input.right {
                cup.pos.x += step;
            }
        }
        cup.clamp_to(self.play_field_size().x);
    }

    pub fn boba_count(&self) -> u32 {
        self.boba_count
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn target_boba_count(&self) -> u32 {
        self.target_boba_count
    }

    /// Milliseconds since the run started, frozen once it ends
    pub fn game_time(&self) -> f64 {
        self.game_time_ms
    }

    /// Active objects for rendering
    pub fn falling_objects(&self) -> impl Iterator<Item = &FallingObject> + '_ {
        self.pool.active_objects()
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn drink(&self) -> DrinkKind {
        self.drink
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.physics.speed_multiplier()
    }

    pub fn spawn_frequency_multiplier(&self) -> f32 {
        self.physics.spawn_frequency_multiplier()
    }

    pub fn pool(&self) -> &ObjectPool {
        &self.pool
    }

    #[cfg(test)]
    pub(crate) fn pool_mut(&mut self) -> &mut ObjectPool {
        &mut self.pool
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::persistence::MemoryStore;
    use crate::platform::ManualClock;
    use crate::settings::GameStats;
    use crate::sim::state::SpawnSpec;

    const FIELD: Vec2 = Vec2::new(800.0, 600.0);

    /// Game with a fixed field, no automatic spawns, and an event log
    fn setup() -> (GameLogic, Rc<RefCell<Vec<GameEvent>>>, ManualClock) {
        setup_with(Tuning::default())
    }

    fn setup_with(tuning: Tuning) -> (GameLogic, Rc<RefCell<Vec<GameEvent>>>, ManualClock) {
        let tuning = Tuning {
            spawn_interval_ms: 1.0e9,
            ..tuning
        };
        let clock = ManualClock::new();
        let mut game = GameLogic::new(tuning, 1)
            .with_play_field(FixedPlayField(FIELD))
            .with_clock(clock.clone());
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        game.subscribe(move |e| sink.borrow_mut().push(*e));
        (game, log, clock)
    }

    fn cup() -> Cup {
        Cup::new(100.0, 400.0, 128.0, 160.0)
    }

    /// Place an object of `kind` on the cup's rim
    fn drop_on_rim(game: &mut GameLogic, kind: ObjectKind) {
        game.pool_mut().acquire().apply(&SpawnSpec {
            pos: Vec2::new(150.0, 400.0),
            vel: Vec2::ZERO,
            size: 64.0,
            kind,
        });
    }

    /// Place an object of `kind` past the bottom margin
    fn drop_offscreen(game: &mut GameLogic, kind: ObjectKind) {
        game.pool_mut().acquire().apply(&SpawnSpec {
            pos: Vec2::new(600.0, FIELD.y + 150.0),
            vel: Vec2::ZERO,
            size: 64.0,
            kind,
        });
    }

    fn count_ended(log: &[GameEvent]) -> usize {
        log.iter()
            .filter(|e| matches!(e, GameEvent::GameEnded { .. }))
            .count()
    }

    fn count_lost(log: &[GameEvent]) -> usize {
        log.iter()
            .filter(|e| **e == GameEvent::GameEnded { outcome: GameOutcome::Lose })
            .count()
    }

    #[test]
    fn test_start_resets_and_notifies() {
        let (mut game, log, _) = setup();
        assert_eq!(game.phase(), GamePhase::Idle);
        drop_on_rim(&mut game, ObjectKind::Boba);

        game.start();
        assert_eq!(game.phase(), GamePhase::Running);
        assert_eq!(game.boba_count(), 0);
        assert_eq!(game.lives(), 3);
        assert_eq!(game.pool().active_count(), 0);
        assert_eq!(
            *log.borrow(),
            vec![
                GameEvent::BobaCountChanged { count: 0 },
                GameEvent::LivesChanged { lives: 3 }
            ]
        );
    }

    #[test]
    fn test_update_is_noop_before_start() {
        let (mut game, log, _) = setup();
        drop_on_rim(&mut game, ObjectKind::Boba);
        assert_eq!(game.update(16.0, &cup()), None);
        assert_eq!(game.boba_count(), 0);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_boba_catch_scores() {
        let (mut game, log, _) = setup();
        game.start();
        drop_on_rim(&mut game, ObjectKind::Boba);

        assert_eq!(game.update(16.0, &cup()), None);
        assert_eq!(game.boba_count(), 1);
        assert_eq!(game.pool().active_count(), 0);
        assert_eq!(log.borrow().last(), Some(&GameEvent::BobaCountChanged { count: 1 }));
    }

    #[test]
    fn test_win_emitted_once() {
        let (mut game, log, _) = setup();
        game.start();
        for _ in 0..9 {
            drop_on_rim(&mut game, ObjectKind::Boba);
            assert_eq!(game.update(16.0, &cup()), None);
        }
        drop_on_rim(&mut game, ObjectKind::Boba);
        assert_eq!(game.update(16.0, &cup()), Some(GameOutcome::Win));
        assert_eq!(game.phase(), GamePhase::Ended);

        drop_on_rim(&mut game, ObjectKind::Boba);
        assert_eq!(game.update(16.0, &cup()), None);
        assert_eq!(game.boba_count(), 10);
        assert_eq!(count_ended(&log.borrow()), 1);
    }

    #[test]
    fn test_bomb_is_instant_loss() {
        let (mut game, log, _) = setup();
        game.start();
        drop_on_rim(&mut game, ObjectKind::Bomb);

        assert_eq!(game.update(16.0, &cup()), Some(GameOutcome::Lose));
        assert_eq!(game.lives(), 0);
        assert_eq!(game.outcome(), Some(GameOutcome::Lose));
        assert_eq!(count_ended(&log.borrow()), 1);

        assert_eq!(game.update(16.0, &cup()), None);
        assert_eq!(count_ended(&log.borrow()), 1);
    }

    #[test]
    fn test_heart_restores_life_up_to_cap() {
        let (mut game, log, _) = setup();
        game.start();

        drop_on_rim(&mut game, ObjectKind::Heart);
        game.update(16.0, &cup());
        assert_eq!(game.lives(), 4);

        drop_on_rim(&mut game, ObjectKind::Heart);
        game.update(16.0, &cup());
        assert_eq!(game.lives(), 5);

        log.borrow_mut().clear();
        drop_on_rim(&mut game, ObjectKind::Heart);
        game.update(16.0, &cup());
        assert_eq!(game.lives(), 5);
        assert_eq!(*log.borrow(), vec![GameEvent::MaxLivesReached]);
    }

    #[test]
    fn test_missed_boba_costs_one_life() {
        let (mut game, log, _) = setup();
        game.start();
        drop_offscreen(&mut game, ObjectKind::Boba);
        drop_offscreen(&mut game, ObjectKind::Bomb);
        drop_offscreen(&mut game, ObjectKind::Heart);

        assert_eq!(game.update(16.0, &cup()), None);
        assert_eq!(game.lives(), 2);
        assert_eq!(game.pool().active_count(), 0);
        assert_eq!(log.borrow().last(), Some(&GameEvent::LivesChanged { lives: 2 }));
    }

    #[test]
    fn test_running_out_of_lives_loses() {
        let (mut game, log, _) = setup();
        game.start();
        for _ in 0..3 {
            drop_offscreen(&mut game, ObjectKind::Boba);
        }
        assert_eq!(game.update(16.0, &cup()), Some(GameOutcome::Lose));
        assert_eq!(game.lives(), 0);
        assert_eq!(count_ended(&log.borrow()), 1);
    }

    #[test]
    fn test_loss_beats_win_in_same_frame() {
        // Target reached while the last life drains to a missed pearl
        let (mut game, log, _) = setup_with(Tuning {
            starting_lives: 1,
            ..Tuning::default()
        });
        game.start();
        for _ in 0..9 {
            drop_on_rim(&mut game, ObjectKind::Boba);
            game.update(16.0, &cup());
        }
        drop_on_rim(&mut game, ObjectKind::Boba);
        drop_offscreen(&mut game, ObjectKind::Boba);
        assert_eq!(game.update(16.0, &cup()), Some(GameOutcome::Lose));
        assert_eq!(game.boba_count(), 10);
        assert_eq!(game.lives(), 0);
        assert_eq!(count_ended(&log.borrow()), 1);
        assert_eq!(count_lost(&log.borrow()), 1);

        // Target reached, then a bomb later in the same frame
        let (mut game, log, _) = setup();
        game.start();
        for _ in 0..9 {
            drop_on_rim(&mut game, ObjectKind::Boba);
            game.update(16.0, &cup());
        }
        drop_on_rim(&mut game, ObjectKind::Boba);
        drop_on_rim(&mut game, ObjectKind::Bomb);
        assert_eq!(game.update(16.0, &cup()), Some(GameOutcome::Lose));
        assert_eq!(game.boba_count(), 10);
        assert_eq!(count_ended(&log.borrow()), 1);
        assert_eq!(count_lost(&log.borrow()), 1);
    }

    #[test]
    fn test_object_falls_onto_cup() {
        let (mut game, _, _) = setup();
        game.start();
        game.pool_mut().acquire().apply(&SpawnSpec {
            pos: Vec2::new(150.0, 300.0),
            vel: Vec2::ZERO,
            size: 64.0,
            kind: ObjectKind::Boba,
        });
        // Bottom edge at 364; the rim starts at 400. 150px/s needs ~250ms.
        for _ in 0..10 {
            game.update(16.0, &cup());
        }
        assert_eq!(game.boba_count(), 0);
        for _ in 0..10 {
            game.update(16.0, &cup());
        }
        assert_eq!(game.boba_count(), 1);
    }

    #[test]
    fn test_spawning_follows_interval() {
        let clock = ManualClock::new();
        let mut game = GameLogic::new(Tuning::default(), 9)
            .with_play_field(FixedPlayField(FIELD))
            .with_clock(clock);
        game.start();
        let far_cup = Cup::new(0.0, 10_000.0, 128.0, 160.0);

        game.update(999.0, &far_cup);
        assert_eq!(game.pool().active_count(), 0);
        game.update(1.0, &far_cup);
        assert_eq!(game.pool().active_count(), 1);
        let obj = game.falling_objects().next().copied().unwrap();
        assert_eq!(obj.pos.y, -64.0);
        assert!(obj.pos.x >= 0.0 && obj.pos.x <= FIELD.x - 64.0);
    }

    #[test]
    fn test_progressive_boosts_are_idempotent() {
        let (mut game, _, _) = setup();
        game.set_target_boba_count(DrinkKind::MilkTea);
        game.start();
        for _ in 0..10 {
            drop_on_rim(&mut game, ObjectKind::Boba);
            game.update(16.0, &cup());
        }
        let speed = game.speed_multiplier();
        assert!((speed - 1.2).abs() < 1e-5);
        assert!((game.spawn_frequency_multiplier() - 1.15).abs() < 1e-5);

        game.apply_progressive_boosts();
        game.apply_progressive_boosts();
        assert_eq!(game.speed_multiplier(), speed);
    }

    #[test]
    fn test_matcha_boosts_every_ten() {
        let (mut game, _, _) = setup();
        game.set_target_boba_count(DrinkKind::Matcha);
        game.start();
        for _ in 0..30 {
            drop_on_rim(&mut game, ObjectKind::Boba);
            game.update(16.0, &cup());
        }
        assert!((game.speed_multiplier() - 1.6).abs() < 1e-5);
        assert_eq!(game.phase(), GamePhase::Running);
    }

    #[test]
    fn test_set_target_notifies_and_resets() {
        let (mut game, log, _) = setup();
        game.set_target_boba_count(DrinkKind::Matcha);
        assert_eq!(game.target_boba_count(), 40);
        assert_eq!(*log.borrow(), vec![GameEvent::TargetBobaCountChanged { count: 40 }]);
    }

    #[test]
    fn test_restart_keeps_multipliers_start_resets_them() {
        let (mut game, _, _) = setup();
        game.set_target_boba_count(DrinkKind::MilkTea);
        game.start();
        for _ in 0..10 {
            drop_on_rim(&mut game, ObjectKind::Boba);
            game.update(16.0, &cup());
        }
        let boosted = game.speed_multiplier();

        game.restart();
        assert_eq!(game.drink(), DrinkKind::MilkTea);
        assert_eq!(game.speed_multiplier(), boosted);
        assert_eq!(game.boba_count(), 0);

        game.start();
        assert_eq!(game.speed_multiplier(), 1.0);
        assert_eq!(game.target_boba_count(), 20);
    }

    #[test]
    fn test_game_time_follows_clock() {
        let (mut game, _, clock) = setup();
        clock.set(1_000.0);
        game.start();
        clock.advance(2_500.0);
        game.update(16.0, &cup());
        assert_eq!(game.game_time(), 2_500.0);

        drop_on_rim(&mut game, ObjectKind::Bomb);
        clock.advance(500.0);
        game.update(16.0, &cup());
        clock.advance(10_000.0);
        game.update(16.0, &cup());
        assert_eq!(game.game_time(), 3_000.0);
    }

    #[test]
    fn test_run_end_records_to_store() {
        #[derive(Clone, Default)]
        struct Shared(Rc<RefCell<MemoryStore>>);

        impl GameStore for Shared {
            fn settings(&self) -> crate::settings::GameSettings {
                self.0.borrow().settings()
            }
            fn save_settings(
                &mut self,
                settings: &crate::settings::GameSettings,
            ) -> Result<(), crate::persistence::StoreError> {
                self.0.borrow_mut().save_settings(settings)
            }
            fn stats(&self) -> GameStats {
                self.0.borrow().stats()
            }
            fn record_result(
                &mut self,
                boba_count: u32,
                game_time_ms: f64,
            ) -> Result<(), crate::persistence::StoreError> {
                self.0.borrow_mut().record_result(boba_count, game_time_ms)
            }
        }

        let store = Shared::default();
        let (game, _, _) = setup();
        let mut game = game.with_store(store.clone());
        game.start();
        for _ in 0..10 {
            drop_on_rim(&mut game, ObjectKind::Boba);
            game.update(16.0, &cup());
        }
        assert_eq!(game.outcome(), Some(GameOutcome::Win));
        assert_eq!(store.stats().games_played, 1);
        assert_eq!(store.settings().high_score, 10);
    }

    #[test]
    fn test_cup_keyboard_and_pointer() {
        let (game, _, _) = setup();
        let mut cup = game.spawn_cup();
        assert_eq!(cup.pos, Vec2::new(336.0, 420.0));

        game.update_cup_position(
            &mut cup,
            &CupInput {
                left: true,
                frame_ms: Some(100.0),
                ..Default::default()
            },
        );
        assert!((cup.pos.x - 296.0).abs() < 1e-3);

        // Left and right cancel out
        game.update_cup_position(
            &mut cup,
            &CupInput {
                left: true,
                right: true,
                ..Default::default()
            },
        );
        assert!((cup.pos.x - 296.0).abs() < 1e-3);

        game.update_cup_position(
            &mut cup,
            &CupInput {
                pointer_x: Some(500.0),
                left: true,
                ..Default::default()
            },
        );
        assert_eq!(cup.pos.x, 436.0);

        game.update_cup_position(
            &mut cup,
            &CupInput {
                pointer_x: Some(10_000.0),
                ..Default::default()
            },
        );
        assert_eq!(cup.pos.x, FIELD.x - 128.0);

        game.update_cup_position(
            &mut cup,
            &CupInput {
                pointer_x: Some(-50.0),
                ..Default::default()
            },
        );
        assert_eq!(cup.pos.x, 0.0);
    }

    #[test]
    fn test_missing_play_field_falls_back() {
        struct NoCanvas;
        impl PlayField for NoCanvas {
            fn size(&self) -> Option<Vec2> {
                None
            }
        }

        let game = GameLogic::new(Tuning::default(), 1).with_play_field(NoCanvas);
        assert_eq!(game.play_field_size(), FALLBACK_PLAY_FIELD);
    }

    #[test]
    fn test_unvalidated_pool_capacity_does_not_panic() {
        let tuning = Tuning {
            pool_capacity: usize::MAX,
            ..Tuning::default()
        };
        let mut game = GameLogic::new(tuning, 1).with_play_field(FixedPlayField(FIELD));
        game.start();
        drop_on_rim(&mut game, ObjectKind::Boba);
        game.update(16.0, &cup());
        assert_eq!(game.boba_count(), 1);
    }

    #[test]
    fn test_shutdown_destroys_pool() {
        let (mut game, _, _) = setup();
        game.start();
        drop_offscreen(&mut game, ObjectKind::Bomb);
        game.shutdown();
        assert_eq!(game.phase(), GamePhase::Idle);
        assert_eq!(game.pool().total_created(), 0);
    }
}
