//! In-crate fake collaborators for tests

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use glam::Vec2;
use tokio::sync::oneshot;

use super::{
    CameraConstraints, CameraSource, CameraStream, Candidate, Detector, Frame, LocalBoxFuture,
    ModelLoader,
};
use crate::error::{AcquireError, DetectionError};
use crate::renderer::{Renderer, Rgba, TextAlign};

/// A face whose mouth landmark is at `mouth`
pub fn face_at(mouth: Vec2, probability: f32) -> Candidate {
    Candidate {
        top_left: mouth - Vec2::new(50.0, 80.0),
        bottom_right: mouth + Vec2::new(50.0, 20.0),
        landmarks: vec![
            mouth + Vec2::new(-20.0, -50.0),
            mouth + Vec2::new(20.0, -50.0),
            mouth + Vec2::new(0.0, -25.0),
            mouth,
            mouth + Vec2::new(-45.0, -40.0),
            mouth + Vec2::new(45.0, -40.0),
        ],
        probability,
    }
}

#[derive(Debug, Clone)]
enum Acquire {
    Ready,
    Fail(AcquireError),
    Hang,
    After(Duration),
}

struct CameraShared {
    frame: RefCell<Option<Frame>>,
    /// Reported size, overriding the frame's own
    dimensions: Cell<Option<(u32, u32)>>,
    stops: Cell<u32>,
    acquisitions: Cell<u32>,
}

/// Camera whose acquisition outcome is fixed up front
#[derive(Clone)]
pub struct FakeCamera {
    shared: Rc<CameraShared>,
    acquire: Acquire,
}

impl FakeCamera {
    fn with(acquire: Acquire, frame: Option<Frame>) -> Self {
        Self {
            shared: Rc::new(CameraShared {
                frame: RefCell::new(frame),
                dimensions: Cell::new(None),
                stops: Cell::new(0),
                acquisitions: Cell::new(0),
            }),
            acquire,
        }
    }

    pub fn ready(width: u32, height: u32) -> Self {
        Self::with(Acquire::Ready, Some(Frame::blank(width, height)))
    }

    pub fn failing(err: AcquireError) -> Self {
        Self::with(Acquire::Fail(err), None)
    }

    pub fn hanging() -> Self {
        Self::with(Acquire::Hang, None)
    }

    pub fn after(delay: Duration, width: u32, height: u32) -> Self {
        Self::with(Acquire::After(delay), Some(Frame::blank(width, height)))
    }

    pub fn stream(&self) -> Box<dyn CameraStream> {
        Box::new(FakeStream {
            shared: Rc::clone(&self.shared),
            stopped: false,
        })
    }

    pub fn set_frame(&self, frame: Option<Frame>) {
        *self.shared.frame.borrow_mut() = frame;
    }

    pub fn set_dimensions(&self, dimensions: Option<(u32, u32)>) {
        self.shared.dimensions.set(dimensions);
    }

    pub fn stops(&self) -> u32 {
        self.shared.stops.get()
    }

    pub fn acquisitions(&self) -> u32 {
        self.shared.acquisitions.get()
    }
}

impl CameraSource for FakeCamera {
    fn acquire(
        &self,
        _constraints: CameraConstraints,
    ) -> LocalBoxFuture<'_, Result<Box<dyn CameraStream>, AcquireError>> {
        Box::pin(async move {
            match &self.acquire {
                Acquire::Ready => {}
                Acquire::Fail(err) => return Err(err.clone()),
                Acquire::Hang => std::future::pending::<()>().await,
                Acquire::After(delay) => tokio::time::sleep(*delay).await,
            }
            self.shared.acquisitions.set(self.shared.acquisitions.get() + 1);
            Ok(self.stream())
        })
    }
}

struct FakeStream {
    shared: Rc<CameraShared>,
    stopped: bool,
}

impl CameraStream for FakeStream {
    fn current_frame(&self) -> Option<Frame> {
        if self.stopped {
            return None;
        }
        self.shared.frame.borrow().clone()
    }

    fn dimensions(&self) -> Option<(u32, u32)> {
        if self.stopped {
            return None;
        }
        self.shared
            .dimensions
            .get()
            .or_else(|| self.current_frame().map(|f| (f.width, f.height)))
    }

    fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            self.shared.stops.set(self.shared.stops.get() + 1);
        }
    }
}

/// Detector that answers from a script, then reports no faces
#[derive(Default)]
pub struct ScriptedDetector {
    script: RefCell<VecDeque<Result<Vec<Candidate>, DetectionError>>>,
    calls: Cell<u32>,
}

impl ScriptedDetector {
    pub fn new(script: impl IntoIterator<Item = Result<Vec<Candidate>, DetectionError>>) -> Self {
        Self {
            script: RefCell::new(script.into_iter().collect()),
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.get()
    }
}

impl Detector for ScriptedDetector {
    fn detect(&self, _frame: Frame) -> LocalBoxFuture<'_, Result<Vec<Candidate>, DetectionError>> {
        self.calls.set(self.calls.get() + 1);
        let next = self.script.borrow_mut().pop_front().unwrap_or(Ok(Vec::new()));
        Box::pin(async move { next })
    }
}

/// Detector whose calls complete only when the test releases them
#[derive(Default)]
pub struct GatedDetector {
    gates: RefCell<VecDeque<oneshot::Receiver<Result<Vec<Candidate>, DetectionError>>>>,
    calls: Cell<u32>,
}

impl GatedDetector {
    /// Queue a gate for the next call; send on the returned sender to complete it
    pub fn gate(&self) -> oneshot::Sender<Result<Vec<Candidate>, DetectionError>> {
        let (tx, rx) = oneshot::channel();
        self.gates.borrow_mut().push_back(rx);
        tx
    }

    pub fn calls(&self) -> u32 {
        self.calls.get()
    }
}

impl Detector for GatedDetector {
    fn detect(&self, _frame: Frame) -> LocalBoxFuture<'_, Result<Vec<Candidate>, DetectionError>> {
        self.calls.set(self.calls.get() + 1);
        let gate = self.gates.borrow_mut().pop_front();
        Box::pin(async move {
            match gate {
                Some(rx) => rx
                    .await
                    .unwrap_or_else(|_| Err(DetectionError("gate dropped".into()))),
                None => Ok(Vec::new()),
            }
        })
    }
}

enum Load {
    Ready(Rc<dyn Detector>),
    Fail(AcquireError),
    Hang,
}

pub struct FakeLoader {
    load: Load,
    loads: Cell<u32>,
}

impl FakeLoader {
    pub fn ready(detector: Rc<dyn Detector>) -> Self {
        Self {
            load: Load::Ready(detector),
            loads: Cell::new(0),
        }
    }

    pub fn failing(err: AcquireError) -> Self {
        Self {
            load: Load::Fail(err),
            loads: Cell::new(0),
        }
    }

    pub fn hanging() -> Self {
        Self {
            load: Load::Hang,
            loads: Cell::new(0),
        }
    }
}

impl ModelLoader for FakeLoader {
    fn load(&self) -> LocalBoxFuture<'_, Result<Rc<dyn Detector>, AcquireError>> {
        self.loads.set(self.loads.get() + 1);
        Box::pin(async move {
            match &self.load {
                Load::Ready(detector) => Ok(Rc::clone(detector)),
                Load::Fail(err) => Err(err.clone()),
                Load::Hang => std::future::pending().await,
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Image { mirrored: bool },
    Rect,
    FillCircle { center: Vec2, radius: f32 },
    StrokeCircle { center: Vec2, radius: f32 },
    Text(String),
}

/// Renderer that records every call into a shared log
#[derive(Clone, Default)]
pub struct RecordingRenderer {
    pub calls: Rc<RefCell<Vec<DrawCall>>>,
}

impl RecordingRenderer {
    pub fn texts(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text(t) => Some(t.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl Renderer for RecordingRenderer {
    fn draw_image(&mut self, _frame: &Frame, _origin: Vec2, _size: Vec2, mirrored: bool) {
        self.calls.borrow_mut().push(DrawCall::Image { mirrored });
    }

    fn fill_rect(&mut self, _origin: Vec2, _size: Vec2, _color: Rgba) {
        self.calls.borrow_mut().push(DrawCall::Rect);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, _color: Rgba) {
        self.calls
            .borrow_mut()
            .push(DrawCall::FillCircle { center, radius });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, _width: f32, _color: Rgba) {
        self.calls
            .borrow_mut()
            .push(DrawCall::StrokeCircle { center, radius });
    }

    fn text(&mut self, text: &str, _pos: Vec2, _size: f32, _align: TextAlign, _color: Rgba) {
        self.calls.borrow_mut().push(DrawCall::Text(text.to_string()));
    }
}
