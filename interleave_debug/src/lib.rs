// Copyright 2026 the Interleave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and Chrome trace export for interleave
//! diagnostics.
//!
//! This crate provides [`TraceSink`](interleave_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`chrome::export`]: writes Chrome Trace Event Format JSON from recorded
//!   bytes.
//!
//! A sink installed in a compositor is boxed. Wrap it in
//! `Rc<RefCell<_>>` to keep reading it afterwards:
//!
//! ```rust,ignore
//! let recorder = Rc::new(RefCell::new(RecorderSink::new()));
//! compositor.set_trace_sink(Some(Box::new(Rc::clone(&recorder))));
//! // ... drive frames ...
//! chrome::export(recorder.borrow().as_bytes(), &mut file)?;
//! ```

pub mod chrome;
pub mod pretty;
pub mod recorder;
