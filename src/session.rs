//! Game session state machine
//!
//! ```text
//! Title -> Loading -> Play -> GameOver -> Loading ...
//!             |
//!             +-> Error -> Title
//! ```
//!
//! The session owns the camera stream, the position tracker and the frame
//! loop. Every exit path (game over, loading failure, teardown) goes through
//! one idempotent release. Must be driven from inside a tokio `LocalSet`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::{AcquireError, ConfigError, SessionError};
use crate::platform::{CameraConstraints, CameraSource, Detector, Facing, ModelLoader, StreamSlot};
use crate::renderer::{Renderer, scene};
use crate::schedule::{self, Clock, Flow, RepeatingTask};
use crate::settings::Settings;
use crate::sim::{self, GameState, Phase, RandomSource, SeededRandom};
use crate::tracker::{CatcherCell, PositionTracker, StatusLine};

/// Everything the presentation layer may read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub score: u32,
    pub lives: u8,
    pub status: String,
}

/// Handle to a game session. Clones share the same session.
#[derive(Clone)]
pub struct Session(Rc<Inner>);

struct Inner {
    settings: Settings,
    camera: Box<dyn CameraSource>,
    loader: Box<dyn ModelLoader>,
    renderer: RefCell<Box<dyn Renderer>>,
    rng: RefCell<Box<dyn RandomSource>>,
    clock: Clock,

    game: RefCell<GameState>,
    status: StatusLine,
    catcher: CatcherCell,
    stream: StreamSlot,
    tracker: RefCell<Option<Rc<PositionTracker>>>,
    poll_task: RefCell<Option<RepeatingTask>>,

    /// Identifies the current Play run; frame loops of older runs stop
    run_id: Cell<u64>,
    /// Bumped by teardown so an in-progress Loading abandons its results
    epoch: Cell<u64>,
}

impl Session {
    pub fn new(
        settings: Settings,
        camera: impl CameraSource + 'static,
        loader: impl ModelLoader + 'static,
        renderer: impl Renderer + 'static,
    ) -> Result<Self, ConfigError> {
        let seed = settings.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or_default()
        });
        log::info!("Session seed: {seed}");
        Self::with_random(
            settings,
            camera,
            loader,
            renderer,
            Box::new(SeededRandom::new(seed)),
        )
    }

    /// Like [`Session::new`] with an explicit random source
    pub fn with_random(
        settings: Settings,
        camera: impl CameraSource + 'static,
        loader: impl ModelLoader + 'static,
        renderer: impl Renderer + 'static,
        rng: Box<dyn RandomSource>,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;
        let tuning = &settings.tuning;
        let game = GameState::new(tuning);
        let catcher = CatcherCell::new(tuning.field_center());

        Ok(Self(Rc::new(Inner {
            camera: Box::new(camera),
            loader: Box::new(loader),
            renderer: RefCell::new(Box::new(renderer)),
            rng: RefCell::new(rng),
            clock: Clock::new(),
            game: RefCell::new(game),
            status: StatusLine::default(),
            catcher,
            stream: StreamSlot::new(),
            tracker: RefCell::new(None),
            poll_task: RefCell::new(None),
            run_id: Cell::new(0),
            epoch: Cell::new(0),
            settings,
        })))
    }

    pub fn phase(&self) -> Phase {
        self.0.game.borrow().phase
    }

    pub fn score(&self) -> u32 {
        self.0.game.borrow().score
    }

    pub fn lives(&self) -> u8 {
        self.0.game.borrow().lives
    }

    pub fn status(&self) -> String {
        self.0.status.get()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let game = self.0.game.borrow();
        SessionSnapshot {
            phase: game.phase,
            score: game.score,
            lives: game.lives,
            status: self.0.status.get(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.0.settings
    }

    /// Start (from Title) or restart (from GameOver) a run.
    ///
    /// Resolves once the session is in Play or Error.
    pub async fn start(&self) -> Result<(), SessionError> {
        let inner = &self.0;
        let from = self.phase();
        if !matches!(from, Phase::Title | Phase::GameOver) {
            log::warn!("Ignoring start request while in {from:?}");
            return Err(SessionError::InvalidTransition {
                from,
                action: "start",
            });
        }

        inner.release_resources();
        inner.set_phase(Phase::Loading);
        let epoch = inner.epoch.get();

        match inner.acquire(epoch).await {
            Ok(detector) => {
                inner.enter_play(detector);
                Ok(())
            }
            Err(SessionError::Cancelled) => {
                log::info!("Loading abandoned after teardown");
                Err(SessionError::Cancelled)
            }
            Err(err) => {
                inner.enter_error(&err);
                Err(err)
            }
        }
    }

    /// Leave the Error phase for Title
    pub fn acknowledge_error(&self) -> Result<(), SessionError> {
        let from = self.phase();
        if from != Phase::Error {
            return Err(SessionError::InvalidTransition {
                from,
                action: "acknowledge error",
            });
        }
        self.0.status.set("");
        self.0.set_phase(Phase::Title);
        Ok(())
    }

    /// Stop everything and release the camera. Safe from any phase, any
    /// number of times, including while Loading is still waiting.
    pub fn teardown(&self) {
        let inner = &self.0;
        inner.epoch.set(inner.epoch.get() + 1);
        inner.release_resources();
        if matches!(self.phase(), Phase::Loading | Phase::Play) {
            inner.set_phase(Phase::Title);
        }
        log::info!("Session torn down");
    }

    #[cfg(test)]
    pub(crate) fn with_game<R>(&self, f: impl FnOnce(&mut GameState) -> R) -> R {
        f(&mut *self.0.game.borrow_mut())
    }

    #[cfg(test)]
    pub(crate) fn catcher(&self) -> glam::Vec2 {
        self.0.catcher.get()
    }

    #[cfg(test)]
    pub(crate) fn is_running(&self) -> bool {
        self.0.game.borrow().running
    }
}

impl Inner {
    fn set_phase(&self, to: Phase) {
        let from = std::mem::replace(&mut self.game.borrow_mut().phase, to);
        if from != to {
            log::info!("Phase {} -> {}", from.as_str(), to.as_str());
        }
    }

    /// Camera then model, each under its own timeout
    async fn acquire(&self, epoch: u64) -> Result<Rc<dyn Detector>, SessionError> {
        let tuning = &self.settings.tuning;
        let constraints = CameraConstraints {
            facing: Facing::User,
            ideal_width: tuning.field_width as u32,
            ideal_height: tuning.field_height as u32,
        };

        self.status.set("starting camera...");
        let after = self.settings.camera_timeout();
        let stream = tokio::time::timeout(after, self.camera.acquire(constraints))
            .await
            .map_err(|_| AcquireError::Timeout {
                what: "camera",
                after,
            })??;
        if self.epoch.get() != epoch {
            let mut stream = stream;
            stream.stop();
            return Err(SessionError::Cancelled);
        }
        self.stream.install(stream);
        self.status.set("camera ready");
        log::info!("Camera ready");

        self.status.set("loading model...");
        let after = self.settings.model_timeout();
        let detector = tokio::time::timeout(after, self.loader.load())
            .await
            .map_err(|_| AcquireError::Timeout {
                what: "model",
                after,
            })??;
        if self.epoch.get() != epoch {
            return Err(SessionError::Cancelled);
        }
        self.status.set("model ready");
        log::info!("Model ready");

        Ok(detector)
    }

    fn enter_play(self: &Rc<Self>, detector: Rc<dyn Detector>) {
        let tuning = &self.settings.tuning;
        {
            let mut game = self.game.borrow_mut();
            game.reset(tuning);
            game.running = true;
        }
        self.catcher.set(tuning.field_center());

        let run_id = self.run_id.get() + 1;
        self.run_id.set(run_id);

        let tracker = Rc::new(PositionTracker::new(
            detector,
            self.stream.clone(),
            self.catcher.clone(),
            self.status.clone(),
            tuning.field_size(),
            self.settings.reference_point,
        ));
        *self.poll_task.borrow_mut() = Some(tracker.start(self.settings.poll_interval()));
        *self.tracker.borrow_mut() = Some(tracker);

        let weak = Rc::downgrade(self);
        let _ = schedule::spawn_frame_loop(self.settings.frame_period(), move || {
            match weak.upgrade() {
                Some(inner) => inner.render_frame(run_id),
                None => Flow::Stop,
            }
        });

        self.set_phase(Phase::Play);
    }

    fn is_current_run(&self, run_id: u64) -> bool {
        self.run_id.get() == run_id && self.game.borrow().running
    }

    /// One render tick: background, spawn, simulate, entities, catcher, HUD
    fn render_frame(&self, run_id: u64) -> Flow {
        if !self.is_current_run(run_id) {
            return Flow::Stop;
        }
        // Camera not producing frames yet
        let Some(frame) = self.stream.current_frame() else {
            return Flow::Continue;
        };

        let tuning = &self.settings.tuning;
        let catcher = self.catcher.get();
        let now = self.clock.now_ms();

        let outcome = {
            let mut game = self.game.borrow_mut();
            let mut renderer = self.renderer.borrow_mut();
            let renderer: &mut dyn Renderer = &mut **renderer;
            let mut rng = self.rng.borrow_mut();

            scene::draw_background(renderer, &frame, tuning);
            sim::maybe_spawn(&mut game, now, tuning, &mut **rng);
            let outcome = sim::advance(&mut game, catcher, tuning);
            if !outcome.game_over {
                scene::draw_entities(renderer, &game);
                scene::draw_catcher(renderer, catcher, tuning);
                scene::draw_hud(renderer, &game, tuning);
            }
            outcome
        };

        if outcome.game_over {
            self.enter_game_over();
            return Flow::Stop;
        }
        Flow::Continue
    }

    fn enter_game_over(&self) {
        self.release_resources();
        // advance() already moved the state to GameOver, so set_phase stays quiet
        self.set_phase(Phase::GameOver);
        log::info!("Phase {} -> {}", Phase::Play.as_str(), Phase::GameOver.as_str());
        log::info!("Game over, score {}", self.game.borrow().score);
    }

    fn enter_error(&self, err: &SessionError) {
        self.release_resources();
        log::warn!("Loading failed: {err}");
        self.status.set(format!("error: {err}"));
        self.set_phase(Phase::Error);
    }

    /// Idempotent: stop the frame loop and tracker, release the camera
    fn release_resources(&self) {
        self.game.borrow_mut().running = false;
        self.run_id.set(self.run_id.get() + 1);

        let tracker = self.tracker.borrow_mut().take();
        if let Some(tracker) = tracker {
            tracker.stop();
        }
        let poll_task = self.poll_task.borrow_mut().take();
        if let Some(task) = poll_task {
            task.cancel();
        }
        self.stream.release();
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.release_resources();
    }
}
