//! Per-request stack of property frames

use super::property::{PropertyBag, PropertyValue};
use crate::utils::error::{PipelineError, Result};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

struct Frame {
    id: u64,
    properties: PropertyBag,
    /// Request-level frame targeted by `annotate`
    anchor: bool,
}

#[derive(Default)]
struct ContextState {
    /// Snapshot inherited from a parent context, never popped
    base: PropertyBag,
    frames: Vec<Frame>,
    next_id: u64,
    imbalances: u64,
}

/// Stack of property frames owned by one logical request
///
/// Clones share the same stack, so a handler and the middleware that created
/// the context see the same frames. Concurrent children that need their own
/// frames should call [`ScopedContext::derive`] instead of sharing.
#[derive(Clone, Default)]
pub struct ScopedContext {
    inner: Arc<RwLock<ContextState>>,
}

impl ScopedContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a frame; it stays visible until the returned handle is released or dropped
    #[must_use = "dropping the handle immediately pops the frame"]
    pub fn push(&self, frame: PropertyBag) -> ScopeHandle {
        self.push_frame(frame, false)
    }

    /// Push a request-level frame; [`annotate`](Self::annotate) writes to the
    /// innermost such frame while it is on the stack
    #[must_use = "dropping the handle immediately pops the frame"]
    pub fn push_anchor(&self, frame: PropertyBag) -> ScopeHandle {
        self.push_frame(frame, true)
    }

    fn push_frame(&self, frame: PropertyBag, anchor: bool) -> ScopeHandle {
        let mut state = self.inner.write();
        state.next_id += 1;
        let id = state.next_id;
        state.frames.push(Frame {
            id,
            properties: frame,
            anchor,
        });
        ScopeHandle {
            context: self.clone(),
            frame_id: id,
            released: false,
        }
    }

    /// Flattened view of every visible frame; later frames win per field
    pub fn current_snapshot(&self) -> PropertyBag {
        let state = self.inner.read();
        let mut snapshot = state.base.clone();
        for frame in &state.frames {
            snapshot.extend_from(&frame.properties);
        }
        snapshot
    }

    /// Number of frames currently pushed, not counting an inherited base
    pub fn depth(&self) -> usize {
        self.inner.read().frames.len()
    }

    /// Independent context seeded with this context's current snapshot
    pub fn derive(&self) -> ScopedContext {
        let state = ContextState {
            base: self.current_snapshot(),
            ..Default::default()
        };
        ScopedContext {
            inner: Arc::new(RwLock::new(state)),
        }
    }

    /// Set a property on the request frame, so it stays visible until that
    /// frame is released
    ///
    /// Lets nested code narrow a request-wide field (such as the operation
    /// name) so the request's completion event sees it too. The target is the
    /// innermost frame pushed with [`push_anchor`](Self::push_anchor), then the
    /// outermost frame, then the inherited base when no frame is pushed.
    pub fn annotate(&self, name: impl Into<String>, value: impl Into<PropertyValue>) {
        let mut guard = self.inner.write();
        let state = &mut *guard;
        let target = match state.frames.iter().rposition(|f| f.anchor) {
            Some(index) => state.frames.get_mut(index),
            None => state.frames.first_mut(),
        };
        match target {
            Some(frame) => {
                frame.properties.insert(name, value);
            }
            None => {
                state.base.insert(name, value);
            }
        }
    }

    /// Set a property on one specific frame; false if it is no longer pushed
    fn annotate_frame(
        &self,
        frame_id: u64,
        name: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> bool {
        let mut state = self.inner.write();
        match state.frames.iter_mut().rev().find(|f| f.id == frame_id) {
            Some(frame) => {
                frame.properties.insert(name, value);
                true
            }
            None => false,
        }
    }

    /// How many out-of-order or unmatched releases were observed
    pub fn imbalance_count(&self) -> u64 {
        self.inner.read().imbalances
    }

    /// Report frames that were never released
    pub fn ensure_balanced(&self) -> Result<()> {
        let state = self.inner.read();
        if state.frames.is_empty() {
            return Ok(());
        }
        let message = format!("{} scope frame(s) still pushed", state.frames.len());
        warn!("Context imbalance detected: {}", message);
        Err(PipelineError::context_imbalance(message))
    }

    fn release_frame(&self, frame_id: u64) {
        let mut state = self.inner.write();
        match state.frames.iter().rposition(|f| f.id == frame_id) {
            Some(index) if index + 1 == state.frames.len() => {
                state.frames.pop();
            }
            Some(index) => {
                state.frames.remove(index);
                state.imbalances += 1;
                warn!(
                    frame_id,
                    depth = state.frames.len(),
                    "Scope frame released out of order"
                );
            }
            None => {
                state.imbalances += 1;
                warn!(frame_id, "Scope frame released but not present on the stack");
            }
        }
    }
}

impl fmt::Debug for ScopedContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedContext")
            .field("depth", &self.depth())
            .finish()
    }
}

/// Guard for one pushed frame. Releasing twice is a no-op; dropping releases.
#[must_use = "dropping the handle immediately pops the frame"]
pub struct ScopeHandle {
    context: ScopedContext,
    frame_id: u64,
    released: bool,
}

impl ScopeHandle {
    /// Pop exactly the frame this handle was created for
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.context.release_frame(self.frame_id);
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Set a property on this handle's frame; false once it has been released
    pub fn annotate(&self, name: impl Into<String>, value: impl Into<PropertyValue>) -> bool {
        !self.released && self.context.annotate_frame(self.frame_id, name, value)
    }

    /// The context this frame was pushed onto
    pub fn context(&self) -> &ScopedContext {
        &self.context
    }
}

impl Drop for ScopeHandle {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for ScopeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeHandle")
            .field("frame_id", &self.frame_id)
            .field("released", &self.released)
            .finish()
    }
}
