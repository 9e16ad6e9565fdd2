//! Game driver
//!
//! Owns the simulation state and its collaborators and drives the two
//! clocks: a fixed-step physics runner (whose overlap reports feed the
//! collision callback) and the per-frame tick.

use glam::Vec2;

use crate::audio::AudioSink;
use crate::input::{FrameInput, KeyCode};
use crate::physics::ArcadePhysics;
use crate::renderer::Renderer;
use crate::settings::Settings;
use crate::sim::spawn::setup_world;
use crate::sim::{Dimension, Engines, GameState, on_collision, tick};

/// Longest frame gap fed to the physics runner (s)
const MAX_FRAME_DT: f32 = 0.1;

pub struct Game<R: Renderer, A: AudioSink> {
    state: GameState,
    physics: ArcadePhysics,
    renderer: R,
    audio: A,
    settings: Settings,
    input: FrameInput,
    accumulator: f32,
    last_time: Option<f64>,
    frames: u64,
    frame_errors: u64,
}

impl<R: Renderer, A: AudioSink> Game<R, A> {
    /// Start a match. `seed` is used unless the settings pin one.
    pub fn new(settings: Settings, renderer: R, audio: A, dimension: Dimension, seed: u64) -> Self {
        let seed = settings.seed.unwrap_or(seed);
        let mut state = GameState::new(seed, settings.tuning.clone(), dimension);
        state.debug_wireframe = settings.debug_wireframe;

        let mut game = Self {
            state,
            physics: ArcadePhysics::new(),
            renderer,
            audio,
            settings,
            input: FrameInput::default(),
            accumulator: 0.0,
            last_time: None,
            frames: 0,
            frame_errors: 0,
        };

        let mut engines = Engines {
            physics: &mut game.physics,
            renderer: &mut game.renderer,
            audio: &mut game.audio,
        };
        setup_world(&mut game.state, &mut engines, 0.0);
        log::info!("Game initialized with seed: {}", seed);
        game
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Frames whose tick failed
    pub fn frame_errors(&self) -> u64 {
        self.frame_errors
    }

    pub fn resize(&mut self, dimension: Dimension) {
        self.state.viewport.dimension = dimension;
    }

    pub fn set_debug_wireframe(&mut self, enabled: bool) {
        self.settings.debug_wireframe = enabled;
        self.state.debug_wireframe = enabled;
    }

    pub fn key_down(&mut self, key: KeyCode) {
        self.input.keyboard.key_down(key);
    }

    pub fn key_up(&mut self, key: KeyCode) {
        self.input.keyboard.key_up(key);
    }

    /// Pointer position in viewport-local pixels
    pub fn pointer_move(&mut self, position: Vec2) {
        self.input.mouse.position = position;
    }

    pub fn pointer_button(&mut self, pressed: bool) {
        self.input.mouse.primary = pressed;
    }

    /// Drop held input (focus lost)
    pub fn release_all(&mut self) {
        self.input.keyboard = Default::default();
        self.input.mouse.primary = false;
    }

    /// Run one render frame at wall-clock `now_ms`
    pub fn frame(&mut self, now_ms: f64) {
        let step_dt = self.state.tuning.physics_dt;
        let max_substeps = self.state.tuning.max_substeps;

        let dt = match self.last_time {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => step_dt,
        };
        self.last_time = Some(now_ms);
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut engines = Engines {
            physics: &mut self.physics,
            renderer: &mut self.renderer,
            audio: &mut self.audio,
        };

        // Physics clock
        let mut substeps = 0;
        while self.accumulator >= step_dt && substeps < max_substeps {
            let pairs = engines.physics.step(step_dt);
            self.accumulator -= step_dt;
            substeps += 1;

            // Timestamp of this step within the frame
            let step_time = now_ms - self.accumulator as f64 * 1000.0;
            for (a, b) in pairs {
                on_collision(&mut self.state, &mut engines, a, b, step_time);
            }
        }

        // Render clock
        self.input.now_ms = now_ms;
        if let Err(e) = tick(&mut self.state, &mut engines, &self.input) {
            self.frame_errors += 1;
            log::error!("frame {} aborted: {}", self.frames, e);
        }
        self.frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullAudio;
    use crate::physics::PhysicsWorld;
    use crate::renderer::{DisplayList, Layer};
    use crate::sim::spawn::spawn_rectangle;

    fn game() -> Game<DisplayList, NullAudio> {
        Game::new(
            Settings::default(),
            DisplayList::new(),
            NullAudio,
            Dimension::new(640.0, 480.0),
            1,
        )
    }

    fn player_health(game: &Game<DisplayList, NullAudio>) -> Option<i32> {
        game.state().player_element().and_then(|e| e.health)
    }

    #[test]
    fn test_frames_present_and_stream_stars() {
        let mut game = game();
        for i in 0..10 {
            game.frame(i as f64 * 16.0);
        }
        assert_eq!(game.renderer().frames_presented(), 10);
        assert!(game.renderer().layer(Layer::Background).count() > 0);
        assert_eq!(game.renderer().layer(Layer::Foreground).count(), 4);
        assert_eq!(game.frame_errors(), 0);
    }

    #[test]
    fn test_thrust_moves_player_and_camera() {
        let mut game = game();
        game.key_down(KeyCode::W);
        for i in 0..30 {
            game.frame(i as f64 * 1000.0 / 60.0);
        }
        let player = game.state().player_element().unwrap().display.coordinate;
        assert!(player.length() > 1.0);
        assert!((game.state().viewport.center() - player).length() < 1e-3);
    }

    #[test]
    fn test_overlap_damages_once_per_window() {
        let mut game = game();
        let mut engines = Engines {
            physics: &mut game.physics,
            renderer: &mut game.renderer,
            audio: &mut game.audio,
        };
        // Obstacle dropped onto the player
        spawn_rectangle(&mut game.state, &mut engines, Vec2::ZERO, 0.0);

        game.frame(0.0);
        assert_eq!(player_health(&game), Some(80));
        game.frame(100.0);
        assert!(player_health(&game).unwrap() >= 80);
    }

    #[test]
    fn test_frame_error_is_logged_and_survived() {
        let mut game = game();
        let body = game.state().player.ship.unwrap().body;
        let rock = game
            .state()
            .entities
            .values()
            .filter_map(|e| e.physics())
            .find(|b| b.body != body)
            .unwrap()
            .body;
        game.physics.remove_body(rock);

        game.frame(0.0);
        assert_eq!(game.frame_errors(), 1);
        assert_eq!(game.renderer().frames_presented(), 0);
        game.frame(16.0);
        assert_eq!(game.frame_errors(), 2);
    }

    #[test]
    fn test_pinned_seed_is_reproducible() {
        let settings = Settings {
            seed: Some(99),
            ..Default::default()
        };
        let a = Game::new(settings.clone(), DisplayList::new(), NullAudio, Dimension::new(320.0, 240.0), 1);
        let b = Game::new(settings, DisplayList::new(), NullAudio, Dimension::new(320.0, 240.0), 2);
        let rotations = |g: &Game<DisplayList, NullAudio>| {
            g.state()
                .entities
                .values()
                .map(|e| e.display.rotation)
                .collect::<Vec<_>>()
        };
        assert_eq!(rotations(&a), rotations(&b));
    }
}
