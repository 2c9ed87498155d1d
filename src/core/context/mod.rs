//! Scoped contextual properties
//!
//! A [`ScopedContext`] is created per request and passed explicitly down the
//! call path. Each nested scope pushes a [`PropertyBag`] frame and gets a
//! [`ScopeHandle`] back; the frame is popped when the handle is released or
//! dropped, so early returns and `?` never leave a frame behind.

mod property;
mod scoped;


pub use property::{PropertyBag, PropertyValue};
pub use scoped::{ScopeHandle, ScopedContext};
