//! Position tracker adapter
//!
//! Polls the face detector on a fixed cadence and publishes the catcher
//! position. Polls never overlap: a poll that finds the previous one still in
//! flight is skipped outright. Failed or empty detections leave the catcher
//! where it was and only update the status line.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use glam::Vec2;

use crate::platform::{Candidate, Detector, StreamSlot};
use crate::schedule::RepeatingTask;
use crate::settings::ReferencePoint;
use crate::sim::CoordinateMapper;

/// Shared catcher position. Writes replace both coordinates at once.
#[derive(Debug, Clone, Default)]
pub struct CatcherCell(Rc<Cell<Vec2>>);

impl CatcherCell {
    pub fn new(pos: Vec2) -> Self {
        Self(Rc::new(Cell::new(pos)))
    }

    pub fn get(&self) -> Vec2 {
        self.0.get()
    }

    pub fn set(&self, pos: Vec2) {
        self.0.set(pos);
    }
}

/// Human-readable loading/detection status
#[derive(Debug, Clone, Default)]
pub struct StatusLine(Rc<RefCell<String>>);

impl StatusLine {
    pub fn set(&self, status: impl Into<String>) {
        *self.0.borrow_mut() = status.into();
    }

    pub fn get(&self) -> String {
        self.0.borrow().clone()
    }
}

pub const NO_FACE_STATUS: &str = "no face: show your face to the camera";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PollOutcome {
    /// Catcher moved to this field position
    Updated(Vec2),
    NoFace,
    Failed,
    /// Previous poll still in flight
    Skipped,
    /// Camera has no frame yet
    NotReady,
    /// Tracker was stopped before the poll began
    Stopped,
    /// Tracker was stopped while the detection ran; result dropped
    Discarded,
}

/// Clears the in-flight flag however the poll ends
struct InFlight<'a>(&'a Cell<bool>);

impl<'a> InFlight<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

pub struct PositionTracker {
    detector: Rc<dyn Detector>,
    stream: StreamSlot,
    catcher: CatcherCell,
    status: StatusLine,
    mapper: Cell<CoordinateMapper>,
    reference: ReferencePoint,
    in_flight: Cell<bool>,
    stopped: Cell<bool>,
}

impl PositionTracker {
    pub fn new(
        detector: Rc<dyn Detector>,
        stream: StreamSlot,
        catcher: CatcherCell,
        status: StatusLine,
        field: Vec2,
        reference: ReferencePoint,
    ) -> Self {
        Self {
            detector,
            stream,
            catcher,
            status,
            mapper: Cell::new(CoordinateMapper::new(field)),
            reference,
            in_flight: Cell::new(false),
            stopped: Cell::new(false),
        }
    }

    /// Begin polling every `period`
    pub fn start(self: &Rc<Self>, period: Duration) -> RepeatingTask {
        log::info!(
            "Tracking {} every {}ms",
            self.reference.as_str(),
            period.as_millis()
        );
        let tracker = Rc::clone(self);
        RepeatingTask::start(period, move || {
            let tracker = Rc::clone(&tracker);
            async move {
                tracker.poll().await;
            }
        })
    }

    /// Results of polls still in flight will be discarded
    pub fn stop(&self) {
        if !self.stopped.replace(true) {
            log::debug!("Tracker stopped");
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.get()
    }

    /// Run one detection and publish its result
    pub async fn poll(&self) -> PollOutcome {
        if self.stopped.get() {
            return PollOutcome::Stopped;
        }
        if self.in_flight.get() {
            log::trace!("Detection still in flight, skipping poll");
            return PollOutcome::Skipped;
        }
        let Some(frame) = self.stream.current_frame() else {
            return PollOutcome::NotReady;
        };

        let result = {
            let _guard = InFlight::enter(&self.in_flight);
            self.detector.detect(frame).await
        };

        if self.stopped.get() {
            log::debug!("Discarding detection that finished after stop");
            return PollOutcome::Discarded;
        }

        match result {
            Ok(candidates) => match best_candidate(&candidates) {
                Some(candidate) => {
                    let raw = self.reference_point(candidate);
                    // Size as the stream reports it now; unknown maps to the last point
                    let (src_w, src_h) = self.stream.dimensions().unwrap_or_default();
                    let mut mapper = self.mapper.get();
                    let pos = mapper.map(raw, src_w, src_h);
                    self.mapper.set(mapper);
                    self.catcher.set(pos);
                    self.status
                        .set(format!("face detected ({:.0}, {:.0})", pos.x, pos.y));
                    PollOutcome::Updated(pos)
                }
                None => {
                    self.status.set(NO_FACE_STATUS);
                    PollOutcome::NoFace
                }
            },
            Err(err) => {
                log::debug!("Detection failed: {err}");
                self.status.set(format!("detection error: {err}"));
                PollOutcome::Failed
            }
        }
    }

    fn reference_point(&self, candidate: &Candidate) -> Vec2 {
        match self.reference {
            ReferencePoint::Mouth => candidate.mouth().unwrap_or_else(|| candidate.box_center()),
            ReferencePoint::BoxCenter => candidate.box_center(),
        }
    }
}

/// Highest probability wins; the earliest candidate wins ties
fn best_candidate(candidates: &[Candidate]) -> Option<&Candidate> {
    candidates.iter().fold(None, |best, c| match best {
        Some(b) if b.probability >= c.probability => Some(b),
        _ => Some(c),
    })
}
