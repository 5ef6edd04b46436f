//! Face Catch headless demo
//!
//! Wires synthetic collaborators into a real session: a camera that produces
//! blank 640x360 frames, a detector whose "face" wanders around the image and
//! sometimes goes missing, and a renderer that only counts frames. Runs one
//! session until Game Over or the time limit, then prints the final snapshot.

use std::cell::Cell;
use std::process::ExitCode;
use std::rc::Rc;
use std::time::Duration;

use glam::Vec2;
use tokio::task::LocalSet;
use tokio::time::Instant;

use face_catch::platform::{
    CameraConstraints, CameraSource, CameraStream, Candidate, Detector, Frame, LocalBoxFuture,
    ModelLoader,
};
use face_catch::renderer::{Renderer, Rgba, TextAlign};
use face_catch::sim::Phase;
use face_catch::{AcquireError, DetectionError, Session, Settings};

const DEMO_LIMIT: Duration = Duration::from_secs(30);
const REPORT_EVERY: Duration = Duration::from_secs(2);

struct SyntheticCamera;

impl CameraSource for SyntheticCamera {
    fn acquire(
        &self,
        constraints: CameraConstraints,
    ) -> LocalBoxFuture<'_, Result<Box<dyn CameraStream>, AcquireError>> {
        Box::pin(async move {
            tokio::time::sleep(Duration::from_millis(150)).await;
            log::info!(
                "Synthetic camera {}x{} ({:?})",
                constraints.ideal_width,
                constraints.ideal_height,
                constraints.facing
            );
            let stream: Box<dyn CameraStream> = Box::new(SyntheticStream {
                frame: Some(Frame::blank(constraints.ideal_width, constraints.ideal_height)),
            });
            Ok(stream)
        })
    }
}

struct SyntheticStream {
    frame: Option<Frame>,
}

impl CameraStream for SyntheticStream {
    fn current_frame(&self) -> Option<Frame> {
        self.frame.clone()
    }

    fn stop(&mut self) {
        self.frame = None;
    }
}

/// Face drifting on a Lissajous path, lost every seventh call
struct WanderingDetector {
    started: Instant,
    calls: Cell<u32>,
}

impl Detector for WanderingDetector {
    fn detect(&self, frame: Frame) -> LocalBoxFuture<'_, Result<Vec<Candidate>, DetectionError>> {
        Box::pin(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            let call = self.calls.get() + 1;
            self.calls.set(call);
            if call % 7 == 0 {
                return Ok(Vec::new());
            }

            let t = self.started.elapsed().as_secs_f32();
            let size = Vec2::new(frame.width as f32, frame.height as f32);
            let mouth = size * 0.5
                + Vec2::new((t * 0.9).sin() * size.x * 0.35, (t * 1.3).sin() * size.y * 0.3);
            Ok(vec![Candidate {
                top_left: mouth - Vec2::new(60.0, 100.0),
                bottom_right: mouth + Vec2::new(60.0, 30.0),
                landmarks: vec![
                    mouth + Vec2::new(-25.0, -60.0),
                    mouth + Vec2::new(25.0, -60.0),
                    mouth + Vec2::new(0.0, -30.0),
                    mouth,
                ],
                probability: 0.97,
            }])
        })
    }
}

struct SyntheticLoader;

impl ModelLoader for SyntheticLoader {
    fn load(&self) -> LocalBoxFuture<'_, Result<Rc<dyn Detector>, AcquireError>> {
        Box::pin(async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            let detector: Rc<dyn Detector> = Rc::new(WanderingDetector {
                started: Instant::now(),
                calls: Cell::new(0),
            });
            Ok(detector)
        })
    }
}

/// Counts frames; logs the HUD line occasionally
#[derive(Default)]
struct CountingRenderer {
    frames: u64,
}

impl Renderer for CountingRenderer {
    fn draw_image(&mut self, _frame: &Frame, _origin: Vec2, _size: Vec2, _mirrored: bool) {
        self.frames += 1;
    }

    fn fill_rect(&mut self, _origin: Vec2, _size: Vec2, _color: Rgba) {}

    fn fill_circle(&mut self, _center: Vec2, _radius: f32, _color: Rgba) {}

    fn stroke_circle(&mut self, _center: Vec2, _radius: f32, _width: f32, _color: Rgba) {}

    fn text(&mut self, text: &str, _pos: Vec2, _size: f32, align: TextAlign, _color: Rgba) {
        if align == TextAlign::Left && self.frames % 120 == 0 {
            log::debug!("frame {}: {}", self.frames, text);
        }
    }
}

async fn run(settings: Settings) -> ExitCode {
    let session = match Session::new(
        settings,
        SyntheticCamera,
        SyntheticLoader,
        CountingRenderer::default(),
    ) {
        Ok(session) => session,
        Err(err) => {
            log::error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = session.start().await {
        log::error!("Could not start: {err}");
        return ExitCode::FAILURE;
    }

    let started = Instant::now();
    while session.phase() == Phase::Play && started.elapsed() < DEMO_LIMIT {
        tokio::time::sleep(REPORT_EVERY).await;
        let snapshot = session.snapshot();
        log::info!(
            "score {} lives {} ({})",
            snapshot.score,
            snapshot.lives,
            snapshot.status
        );
    }
    session.teardown();

    match serde_json::to_string_pretty(&session.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("Could not encode snapshot: {err}"),
    }
    ExitCode::SUCCESS
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::init();
    log::info!("Face Catch (headless) starting...");

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    LocalSet::new().run_until(run(settings)).await
}
