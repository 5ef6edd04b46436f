//! Platform abstraction layer
//!
//! External collaborators the core drives but does not implement:
//! - Camera source and its live stream
//! - Face detector model and its loader
//!
//! Everything here runs on a single thread; futures are `!Send`.

#[cfg(test)]
pub(crate) mod testing;

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use glam::Vec2;

use crate::error::{AcquireError, DetectionError};

/// Boxed future for single-threaded collaborators
pub type LocalBoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// One decoded camera frame
#[derive(Debug, Clone)]
pub struct Frame {
    /// Pixel width (0 while the stream has not negotiated a size)
    pub width: u32,
    pub height: u32,
    /// RGBA8 pixels, shared so frames are cheap to hand around
    pub pixels: Rc<[u8]>,
}

impl Frame {
    pub fn new(width: u32, height: u32, pixels: impl Into<Rc<[u8]>>) -> Self {
        Self {
            width,
            height,
            pixels: pixels.into(),
        }
    }

    /// A frame with a known size but no pixel data
    pub fn blank(width: u32, height: u32) -> Self {
        Self::new(width, height, Vec::new())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    User,
    Environment,
}

/// What to ask the camera for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraConstraints {
    pub facing: Facing,
    pub ideal_width: u32,
    pub ideal_height: u32,
}

pub trait CameraSource {
    fn acquire(
        &self,
        constraints: CameraConstraints,
    ) -> LocalBoxFuture<'_, Result<Box<dyn CameraStream>, AcquireError>>;
}

pub trait CameraStream {
    /// Latest decodable frame, `None` until the stream has data
    fn current_frame(&self) -> Option<Frame>;

    /// Current pixel size, `None` while unknown
    fn dimensions(&self) -> Option<(u32, u32)> {
        self.current_frame().map(|f| (f.width, f.height))
    }

    /// Stop all underlying tracks. Must be safe to call more than once.
    fn stop(&mut self);
}

/// A detected face in source pixel coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub top_left: Vec2,
    pub bottom_right: Vec2,
    /// Right eye, left eye, nose, mouth, right ear, left ear
    pub landmarks: Vec<Vec2>,
    pub probability: f32,
}

impl Candidate {
    pub const MOUTH: usize = 3;

    pub fn box_center(&self) -> Vec2 {
        (self.top_left + self.bottom_right) * 0.5
    }

    pub fn mouth(&self) -> Option<Vec2> {
        self.landmarks.get(Self::MOUTH).copied()
    }
}

pub trait Detector {
    fn detect(&self, frame: Frame) -> LocalBoxFuture<'_, Result<Vec<Candidate>, DetectionError>>;
}

pub trait ModelLoader {
    fn load(&self) -> LocalBoxFuture<'_, Result<Rc<dyn Detector>, AcquireError>>;
}

/// The session's camera stream, shared with the tracker and the frame loop
#[derive(Clone, Default)]
pub struct StreamSlot(Rc<RefCell<Option<Box<dyn CameraStream>>>>);

impl StreamSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a stream, stopping any previous one
    pub fn install(&self, stream: Box<dyn CameraStream>) {
        let previous = self.0.borrow_mut().replace(stream);
        if let Some(mut previous) = previous {
            previous.stop();
        }
    }

    pub fn is_active(&self) -> bool {
        self.0.borrow().is_some()
    }

    pub fn current_frame(&self) -> Option<Frame> {
        self.0.borrow().as_ref().and_then(|s| s.current_frame())
    }

    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.0.borrow().as_ref().and_then(|s| s.dimensions())
    }

    /// Stop and drop the stream. Returns true if one was active.
    pub fn release(&self) -> bool {
        let stream = self.0.borrow_mut().take();
        match stream {
            Some(mut stream) => {
                stream.stop();
                log::info!("Camera stream released");
                true
            }
            None => false,
        }
    }
}
