// Copyright 2026 the Interleave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//!
//! Compositor events carry no clock, so each event is stamped with its
//! position in the recording: the n-th event sits at n µs. Frames appear as
//! `B`/`E` duration pairs and everything else as instants inside them.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use kurbo::Rect;
use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let events: Vec<Value> = decode(bytes)
        .zip(0_u64..)
        .map(|(recorded, ts)| to_json(&recorded, ts))
        .collect();

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn to_json(recorded: &RecordedEvent, ts: u64) -> Value {
    let frame_index = recorded.frame_index();
    match recorded {
        RecordedEvent::FrameBegin(e) => json!({
            "ph": "B",
            "name": "Frame",
            "cat": "Frame",
            "ts": ts,
            "pid": 0,
            "tid": 0,
            "args": {
                "frame_index": frame_index,
                "width": e.frame_size.width,
                "height": e.frame_size.height,
                "device_pixel_ratio": e.device_pixel_ratio,
                "on_platform_thread": e.on_platform_thread,
            }
        }),
        RecordedEvent::FrameEnd(e) => json!({
            "ph": "E",
            "name": "Frame",
            "cat": "Frame",
            "ts": ts,
            "pid": 0,
            "tid": 0,
            "args": {
                "frame_index": frame_index,
                "resubmitted": e.resubmitted,
                "overlays_recycled": e.overlays_recycled,
                "pool_size": e.pool_size,
            }
        }),
        RecordedEvent::Preroll(e) => instant("Preroll", "Slots", ts, json!({
            "frame_index": frame_index,
            "view": e.view.0,
            "slot": e.slot,
            "params_changed": e.params_changed,
        })),
        RecordedEvent::OcclusionQuery(e) => instant("OcclusionQuery", "Occlusion", ts, json!({
            "frame_index": frame_index,
            "slot_view": e.slot_view.0,
            "below": e.below.0,
            "found": e.found,
            "collapsed": e.collapsed,
        })),
        RecordedEvent::BackgroundSubmit(e) => instant("BackgroundSubmit", "Submit", ts, json!({
            "frame_index": frame_index,
            "slots": e.slots,
            "clip_rects": e.clip_rects,
            "submitted": e.submitted,
        })),
        RecordedEvent::ViewPlacement(e) => instant("ViewPlacement", "Placement", ts, json!({
            "frame_index": frame_index,
            "view": e.view.0,
            "rect": rect_json(e.rect),
        })),
        RecordedEvent::OverlayPlacement(e) => instant("OverlayPlacement", "Placement", ts, json!({
            "frame_index": frame_index,
            "view": e.view.0,
            "overlay": e.overlay.0,
            "rect": rect_json(e.rect),
        })),
        RecordedEvent::Merge(e) => instant("Merge", "Merge", ts, json!({
            "frame_index": frame_index,
            "action": format!("{:?}", e.action),
            "lease_frames": e.lease_frames,
        })),
    }
}

fn instant(name: &str, cat: &str, ts: u64, args: Value) -> Value {
    json!({
        "ph": "i",
        "name": name,
        "cat": cat,
        "ts": ts,
        "pid": 0,
        "tid": 0,
        "s": "t",
        "args": args,
    })
}

fn rect_json(r: Rect) -> Value {
    json!([r.x0, r.y0, r.width(), r.height()])
}
