//! Clipboard slot and the two-phase clone protocol.
//!
//! Cloning goes through the scene adapter and may be asynchronous. The
//! engine hands out a [`CloneRequest`] carrying a ticket; the host awaits
//! [`CloneRequest::resolve`] and passes the [`ResolvedClone`] back. Only one
//! clone may be in flight, and completions with a stale ticket are dropped.

use crate::scene::{BoxFuture, SceneResult};
use crate::shapes::{ObjectId, SceneObject};
use kurbo::Vec2;

/// What a clone was requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClonePurpose {
    /// Fill the clipboard from the active selection.
    Copy,
    /// Fill the clipboard, then delete the selection.
    Cut,
    /// Insert a copy of the clipboard contents.
    Paste,
    /// Insert a copy of the active selection.
    Duplicate,
}

/// A cloned object waiting in the clipboard.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipboardEntry {
    pub object: SceneObject,
    /// The object is a wrapper over a multi-object selection and expands
    /// into its children on insert.
    pub composite: bool,
}

impl ClipboardEntry {
    /// Move the remembered position so repeated pastes cascade.
    pub fn advance(&mut self, offset: Vec2) {
        self.object.translate(offset);
    }

    /// Objects to insert for this entry.
    pub fn into_objects(self) -> Vec<SceneObject> {
        if self.composite {
            match self.object.shape {
                crate::shapes::Shape::Group(group) => group.ungroup(),
                _ => vec![self.object],
            }
        } else {
            vec![self.object]
        }
    }
}

/// First phase of a clone: a pending future plus the bookkeeping to
/// complete it.
pub struct CloneRequest {
    pub ticket: u64,
    pub purpose: ClonePurpose,
    pub composite: bool,
    /// Ids of the source objects (removed right away for a cut).
    pub sources: Vec<ObjectId>,
    future: BoxFuture<'static, SceneResult<SceneObject>>,
}

impl std::fmt::Debug for CloneRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloneRequest")
            .field("ticket", &self.ticket)
            .field("purpose", &self.purpose)
            .field("composite", &self.composite)
            .field("sources", &self.sources)
            .finish_non_exhaustive()
    }
}

impl CloneRequest {
    /// Wait for the scene to finish cloning.
    pub async fn resolve(self) -> ResolvedClone {
        let result = self.future.await;
        ResolvedClone {
            ticket: self.ticket,
            purpose: self.purpose,
            composite: self.composite,
            result,
        }
    }
}

/// Second phase input: the finished clone.
#[derive(Debug)]
pub struct ResolvedClone {
    pub ticket: u64,
    pub purpose: ClonePurpose,
    pub composite: bool,
    pub result: SceneResult<SceneObject>,
}

/// Clipboard contents and in-flight clone tracking.
#[derive(Debug, Default)]
pub struct Clipboard {
    entry: Option<ClipboardEntry>,
    in_flight: Option<u64>,
    next_ticket: u64,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(&self) -> Option<&ClipboardEntry> {
        self.entry.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.entry.is_none()
    }

    /// Overwrite the clipboard contents.
    pub fn store(&mut self, entry: ClipboardEntry) {
        self.entry = Some(entry);
    }

    /// Advance the remembered paste position.
    pub fn advance(&mut self, offset: Vec2) {
        if let Some(entry) = &mut self.entry {
            entry.advance(offset);
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Build a request, or `None` while another clone is in flight.
    pub fn begin(
        &mut self,
        purpose: ClonePurpose,
        composite: bool,
        sources: Vec<ObjectId>,
        future: BoxFuture<'static, SceneResult<SceneObject>>,
    ) -> Option<CloneRequest> {
        if self.in_flight.is_some() {
            log::debug!("Clone requested while another is in flight; ignoring");
            return None;
        }
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.in_flight = Some(ticket);
        Some(CloneRequest {
            ticket,
            purpose,
            composite,
            sources,
            future,
        })
    }

    /// Accept a completion. Returns false for a stale or unknown ticket.
    pub fn finish(&mut self, ticket: u64) -> bool {
        if self.in_flight == Some(ticket) {
            self.in_flight = None;
            true
        } else {
            false
        }
    }

    /// Forget the in-flight clone; its completion will be dropped.
    pub fn cancel(&mut self) {
        self.in_flight = None;
    }
}
