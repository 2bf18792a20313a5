// Copyright 2026 the Interleave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::rc::Rc;
use alloc::vec;
use alloc::vec::Vec;

use kurbo::{Point, Rect, Size, Vec2};

use super::*;
use crate::backend::DrawContextId;
use crate::test_support::{
    FakeBackend, FakeHost, HostCall, MergerCall, Op, ScriptedMerger,
};
use crate::view::OverlayId;

const FRAME: Size = Size::new(100.0, 100.0);
const CTX: DrawContextId = DrawContextId(1);

type TestCompositor = Compositor<FakeBackend, FakeHost>;

fn compositor() -> TestCompositor {
    compositor_with(CompositorConfig::default())
}

fn compositor_with(config: CompositorConfig) -> TestCompositor {
    Compositor::new(config, FakeBackend::default(), FakeHost::default()).unwrap()
}

fn params(x: f64, y: f64, w: f64, h: f64) -> ViewParams {
    ViewParams::new(Point::new(x, y), Size::new(w, h))
}

fn draw(c: &mut TestCompositor, view: ViewId, bounds: Rect, label: &'static str) {
    c.composite(view)
        .unwrap()
        .draw(bounds, |r| r.push(label));
}

/// Begins a frame on the raster context with merged contexts, prerolls
/// `views` and runs the post-preroll step.
fn prepare(c: &mut TestCompositor, views: &[(ViewId, ViewParams)]) -> ScriptedMerger {
    let merger = ScriptedMerger::merged();
    c.begin_frame(FRAME, 1.0, &merger);
    for (view, p) in views {
        c.preroll(*view, p.clone());
    }
    assert_eq!(c.post_preroll_action(&merger), PostPrerollResult::Success);
    merger
}

fn submit(c: &mut TestCompositor) -> bool {
    let frame = c.backend().frame();
    c.submit_frame(CTX, frame)
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn no_platform_views_places_nothing() {
    let mut c = compositor();
    let merger = ScriptedMerger::default();
    c.begin_frame(FRAME, 1.0, &merger);
    assert_eq!(c.post_preroll_action(&merger), PostPrerollResult::Success);
    assert!(merger.calls().is_empty(), "merge state must be left untouched");

    assert!(submit(&mut c));
    assert!(c.host().placements().is_empty());
    let log = c.backend().log.borrow();
    assert_eq!(log.background(), vec![&[Op::Save, Op::Restore][..]]);
    assert!(log.overlays().is_empty());
}

#[test]
fn view_without_content_above_needs_no_overlay() {
    let mut c = compositor();
    let view = ViewId(1);
    let _merger = prepare(&mut c, &[(view, params(0.0, 0.0, 50.0, 50.0))]);

    assert!(submit(&mut c));
    assert!(c.overlay_rects(view).is_empty());
    assert_eq!(c.pool_stats().created, 0);
    assert_eq!(
        c.host().placements(),
        vec![&HostCall::DisplayView(view, Rect::new(0.0, 0.0, 50.0, 50.0))]
    );
    let log = c.backend().log.borrow();
    assert_eq!(
        log.background(),
        vec![&[Op::Save, Op::Draw(vec![]), Op::Restore][..]],
        "background must be drawn unclipped"
    );
}

#[test]
fn content_over_view_goes_to_one_rounded_overlay() {
    let mut c = compositor();
    let view = ViewId(1);
    let _merger = prepare(&mut c, &[(view, params(0.0, 0.0, 100.0, 100.0))]);
    draw(&mut c, view, Rect::new(10.5, 10.5, 50.2, 50.2), "button");

    assert!(submit(&mut c));

    let expected = Rect::new(10.0, 10.0, 51.0, 51.0);
    assert_eq!(c.overlay_rects(view), &[expected]);
    assert_eq!(
        c.host().placements(),
        vec![
            &HostCall::DisplayView(view, Rect::new(0.0, 0.0, 100.0, 100.0)),
            &HostCall::DisplayOverlay(OverlayId(1), expected),
        ]
    );

    let log = c.backend().log.borrow();
    assert_eq!(
        log.background(),
        vec![
            &[
                Op::Save,
                Op::ClipOut(expected),
                Op::Draw(vec!["button"]),
                Op::Restore
            ][..]
        ]
    );
    assert_eq!(
        log.overlays(),
        vec![(
            OverlayId(1),
            &[
                Op::Clear,
                Op::Translate(Vec2::new(-10.0, -10.0)),
                Op::Draw(vec!["button"]),
            ][..]
        )]
    );
    assert_eq!(log.acquired_sizes, &[FRAME], "overlays span the frame");
    assert_eq!(log.surfaces_created, &[(OverlayId(1), CTX)]);
}

#[test]
fn background_is_submitted_before_overlays() {
    let mut c = compositor();
    let view = ViewId(1);
    let _merger = prepare(&mut c, &[(view, params(0.0, 0.0, 100.0, 100.0))]);
    draw(&mut c, view, Rect::new(0.0, 0.0, 10.0, 10.0), "a");

    assert!(submit(&mut c));
    let log = c.backend().log.borrow();
    assert_eq!(log.submitted.len(), 2);
    assert_eq!(log.submitted[0].0, crate::test_support::Target::Background);
}

// ---------------------------------------------------------------------------
// Occlusion pass
// ---------------------------------------------------------------------------

#[test]
fn too_many_rects_collapse_into_their_union() {
    let mut c = compositor();
    let view = ViewId(1);
    let _merger = prepare(&mut c, &[(view, params(0.0, 0.0, 100.0, 100.0))]);
    for (x, label) in [(0.0, "a"), (20.0, "b"), (40.0, "c")] {
        draw(&mut c, view, Rect::new(x, 0.0, x + 10.0, 10.0), label);
    }

    assert!(submit(&mut c));
    assert_eq!(c.overlay_rects(view), &[Rect::new(0.0, 0.0, 50.0, 10.0)]);
    assert_eq!(c.pool_stats().created, 1);
}

#[test]
fn rects_up_to_the_cap_stay_separate() {
    let mut c = compositor_with(CompositorConfig::default().with_max_overlay_rects_per_query(3));
    let view = ViewId(1);
    let _merger = prepare(&mut c, &[(view, params(0.0, 0.0, 100.0, 100.0))]);
    for (x, label) in [(0.0, "a"), (20.0, "b"), (40.0, "c")] {
        draw(&mut c, view, Rect::new(x, 0.0, x + 10.0, 10.0), label);
    }

    assert!(submit(&mut c));
    assert_eq!(c.overlay_rects(view).len(), 3);
    assert_eq!(c.pool_stats().created, 3);
    let log = c.backend().log.borrow();
    let clips = log.background()[0]
        .iter()
        .filter(|op| matches!(op, Op::ClipOut(_)))
        .count();
    assert_eq!(clips, 3);
}

#[test]
fn content_beside_every_view_stays_on_background() {
    let mut c = compositor();
    let view = ViewId(1);
    let _merger = prepare(&mut c, &[(view, params(0.0, 0.0, 10.0, 10.0))]);
    draw(&mut c, view, Rect::new(50.0, 50.0, 60.0, 60.0), "label");

    assert!(submit(&mut c));
    assert!(c.overlay_rects(view).is_empty());
    let log = c.backend().log.borrow();
    assert_eq!(
        log.background(),
        vec![&[Op::Save, Op::Draw(vec!["label"]), Op::Restore][..]]
    );
}

#[test]
fn later_slot_content_over_earlier_view_is_lifted() {
    let mut c = compositor();
    let (a, b) = (ViewId(1), ViewId(2));
    let _merger = prepare(
        &mut c,
        &[
            (a, params(0.0, 0.0, 50.0, 50.0)),
            (b, params(60.0, 0.0, 40.0, 50.0)),
        ],
    );
    draw(&mut c, b, Rect::new(10.0, 10.0, 20.0, 20.0), "over-a");

    assert!(submit(&mut c));
    assert!(c.overlay_rects(a).is_empty());
    assert_eq!(c.overlay_rects(b), &[Rect::new(10.0, 10.0, 20.0, 20.0)]);
}

#[test]
fn content_over_stacked_views_gets_a_single_overlay() {
    let mut c = compositor();
    let (a, b) = (ViewId(1), ViewId(2));
    let _merger = prepare(
        &mut c,
        &[
            (a, params(0.0, 0.0, 50.0, 50.0)),
            (b, params(0.0, 0.0, 50.0, 50.0)),
        ],
    );
    draw(&mut c, b, Rect::new(10.0, 10.0, 20.0, 20.0), "badge");

    assert!(submit(&mut c));
    assert_eq!(c.overlay_rects(b), &[Rect::new(10.0, 10.0, 20.0, 20.0)]);
    assert_eq!(c.pool_stats().in_use, 1, "one overlay per covered region");
}

#[test]
fn overlay_rects_contain_drawn_content_and_are_integral() {
    let mut c = compositor();
    let view = ViewId(1);
    let _merger = prepare(&mut c, &[(view, params(0.0, 0.0, 100.0, 100.0))]);
    let drawn = Rect::new(0.3, 0.5, 3.1, 4.7);
    draw(&mut c, view, drawn, "dot");

    assert!(submit(&mut c));
    let rect = c.overlay_rects(view)[0];
    assert_eq!(rect, Rect::new(0.0, 0.0, 4.0, 5.0));
    assert!(crate::geometry::contains(rect, drawn));
}

// ---------------------------------------------------------------------------
// Slots and params
// ---------------------------------------------------------------------------

#[test]
fn composition_order_follows_preroll_calls() {
    let mut c = compositor();
    let views = [ViewId(3), ViewId(1), ViewId(2)];
    let merger = ScriptedMerger::merged();
    c.begin_frame(FRAME, 1.0, &merger);
    for view in views {
        c.preroll(view, params(0.0, 0.0, 10.0, 10.0));
    }
    assert_eq!(c.composition_order(), &views);
    assert_eq!(c.current_recordings().len(), 3);
    assert!(c.composite(ViewId(9)).is_none());
    assert!(c.root_recording().is_none());
}

#[test]
fn begin_frame_clears_previous_slots() {
    let mut c = compositor();
    let merger = prepare(&mut c, &[(ViewId(1), params(0.0, 0.0, 10.0, 10.0))]);
    c.end_frame(false, &merger);
    c.begin_frame(FRAME, 1.0, &merger);
    assert!(c.composition_order().is_empty());
    assert!(c.composite(ViewId(1)).is_none());
}

#[test]
#[should_panic(expected = "prerolled twice")]
fn duplicate_preroll_panics() {
    let mut c = compositor();
    let merger = ScriptedMerger::merged();
    c.begin_frame(FRAME, 1.0, &merger);
    c.preroll(ViewId(1), params(0.0, 0.0, 10.0, 10.0));
    c.preroll(ViewId(1), params(0.0, 0.0, 10.0, 10.0));
}

#[test]
#[should_panic(expected = "outside of a frame")]
fn preroll_without_frame_panics() {
    let mut c = compositor();
    c.preroll(ViewId(1), params(0.0, 0.0, 10.0, 10.0));
}

#[test]
fn view_rect_scales_size_by_pixel_ratio() {
    let mut c = compositor();
    let merger = ScriptedMerger::merged();
    c.begin_frame(FRAME, 2.0, &merger);
    c.preroll(ViewId(4), params(5.0, 7.0, 10.0, 20.0));
    assert_eq!(c.view_rect(ViewId(4)), Rect::new(5.0, 7.0, 25.0, 47.0));
}

#[test]
#[should_panic(expected = "was not prerolled this frame")]
fn view_rect_of_unknown_view_panics() {
    let mut c = compositor();
    let merger = prepare(&mut c, &[(ViewId(1), params(0.0, 0.0, 10.0, 10.0))]);
    c.end_frame(false, &merger);
    c.begin_frame(FRAME, 1.0, &merger);
    // Params of view 1 are still stored, but it has no slot this frame.
    let _ = c.view_rect(ViewId(1));
}

#[test]
fn equal_params_are_not_restored() {
    let mut c = compositor();
    let events = Rc::new(core::cell::RefCell::new(Vec::new()));

    struct Changes(Rc<core::cell::RefCell<Vec<bool>>>);
    impl TraceSink for Changes {
        fn on_preroll(&mut self, e: &PrerollEvent) {
            self.0.borrow_mut().push(e.params_changed);
        }
    }
    c.set_trace_sink(Some(Box::new(Changes(Rc::clone(&events)))));

    let merger = ScriptedMerger::merged();
    for p in [
        params(0.0, 0.0, 10.0, 10.0),
        params(0.0, 0.0, 10.0, 10.0),
        params(1.0, 0.0, 10.0, 10.0),
    ] {
        c.begin_frame(FRAME, 1.0, &merger);
        c.preroll(ViewId(1), p.clone());
        assert_eq!(c.view_rect(ViewId(1)), p.placement_rect(1.0));
        c.end_frame(false, &merger);
    }
    if cfg!(feature = "trace") {
        assert_eq!(*events.borrow(), &[true, false, true]);
    }
}

#[test]
fn committed_frame_forgets_params_of_removed_views() {
    let mut c = compositor();
    let merger = prepare(
        &mut c,
        &[
            (ViewId(1), params(0.0, 0.0, 10.0, 10.0)),
            (ViewId(2), params(20.0, 0.0, 10.0, 10.0)),
        ],
    );
    assert!(submit(&mut c));
    c.end_frame(false, &merger);
    assert_eq!(c.params.len(), 2);

    let _ = prepare(&mut c, &[(ViewId(2), params(20.0, 0.0, 10.0, 10.0))]);
    assert!(submit(&mut c));
    c.end_frame(false, &merger);
    assert!(!c.params.contains_key(&ViewId(1)));
    assert!(c.params.contains_key(&ViewId(2)));
}

// ---------------------------------------------------------------------------
// Merge protocol
// ---------------------------------------------------------------------------

#[test]
fn merged_contexts_extend_the_lease() {
    let mut c = compositor();
    let merger = prepare(&mut c, &[(ViewId(1), params(0.0, 0.0, 10.0, 10.0))]);
    assert_eq!(merger.calls(), &[MergerCall::ExtendLease(10)]);
    assert_eq!(c.phase(), FramePhase::Accumulating);
    assert!(!c.resubmit_pending());
}

#[test]
fn unmerged_contexts_cancel_for_resubmission() {
    let mut c = compositor();
    let merger = ScriptedMerger::default();
    c.begin_frame(FRAME, 1.0, &merger);
    c.preroll(ViewId(1), params(0.0, 0.0, 10.0, 10.0));

    assert_eq!(
        c.post_preroll_action(&merger),
        PostPrerollResult::ResubmitFrame
    );
    assert!(c.composition_order().is_empty(), "frame state must be cancelled");
    assert!(c.resubmit_pending());
    assert_eq!(c.phase(), FramePhase::AwaitingResubmit);
    assert!(merger.calls().is_empty(), "merge is committed in end_frame");
}

#[test]
fn submit_while_resubmission_pending_draws_nothing() {
    let mut c = compositor();
    let merger = ScriptedMerger::default();
    c.begin_frame(FRAME, 1.0, &merger);
    c.preroll(ViewId(1), params(0.0, 0.0, 10.0, 10.0));
    let _ = c.post_preroll_action(&merger);

    assert!(submit(&mut c));
    assert!(c.backend().log.borrow().submitted.is_empty());
    assert!(c.host().placements().is_empty());
}

#[test]
fn resubmitted_end_frame_commits_the_merge() {
    let mut c = compositor_with(CompositorConfig::default().with_merged_lease_frames(4));
    let merger = ScriptedMerger::default();
    c.begin_frame(FRAME, 1.0, &merger);
    c.preroll(ViewId(1), params(0.0, 0.0, 10.0, 10.0));
    let _ = c.post_preroll_action(&merger);

    c.end_frame(true, &merger);
    assert_eq!(merger.calls(), &[MergerCall::MergeWithLease(4)]);
    assert!(!c.resubmit_pending());
    assert_eq!(c.phase(), FramePhase::Idle);

    // The redriven frame now finds the contexts merged.
    c.begin_frame(FRAME, 1.0, &merger);
    c.preroll(ViewId(1), params(0.0, 0.0, 10.0, 10.0));
    assert_eq!(c.post_preroll_action(&merger), PostPrerollResult::Success);
    assert_eq!(
        merger.calls(),
        &[MergerCall::MergeWithLease(4), MergerCall::ExtendLease(4)]
    );
}

#[test]
fn end_frame_without_resubmission_keeps_request_pending() {
    let mut c = compositor();
    let merger = ScriptedMerger::default();
    c.begin_frame(FRAME, 1.0, &merger);
    c.preroll(ViewId(1), params(0.0, 0.0, 10.0, 10.0));
    let _ = c.post_preroll_action(&merger);

    c.end_frame(false, &merger);
    assert!(merger.calls().is_empty());
    assert!(c.resubmit_pending());
}

#[test]
fn host_is_bracketed_only_on_platform_context() {
    let mut c = compositor();
    let merger = ScriptedMerger::merged();
    c.begin_frame(FRAME, 1.0, &merger);
    c.end_frame(false, &merger);
    assert!(c.host().calls.is_empty());

    merger.on_platform.set(true);
    c.begin_frame(FRAME, 1.0, &merger);
    c.end_frame(false, &merger);
    assert_eq!(c.host().calls, &[HostCall::FrameBegin, HostCall::FrameEnd]);
}

// ---------------------------------------------------------------------------
// Overlay pool
// ---------------------------------------------------------------------------

#[test]
fn end_frame_recycles_overlays_for_reuse() {
    let mut c = compositor();
    let view = ViewId(1);
    for _ in 0..3 {
        let merger = prepare(&mut c, &[(view, params(0.0, 0.0, 100.0, 100.0))]);
        draw(&mut c, view, Rect::new(0.0, 0.0, 10.0, 10.0), "a");
        assert!(submit(&mut c));
        assert_eq!(c.pool_stats().in_use, 1);
        c.end_frame(false, &merger);
        assert_eq!(c.pool_stats().in_use, 0);
    }
    assert_eq!(c.pool_stats().created, 1, "the same overlay serves every frame");
    let creates = c
        .host()
        .calls
        .iter()
        .filter(|call| matches!(call, HostCall::CreateOverlay(_)))
        .count();
    assert_eq!(creates, 1);
}

#[test]
fn end_frame_recycles_even_when_resubmitted() {
    let mut c = compositor();
    let view = ViewId(1);
    let merger = prepare(&mut c, &[(view, params(0.0, 0.0, 100.0, 100.0))]);
    draw(&mut c, view, Rect::new(0.0, 0.0, 10.0, 10.0), "a");
    assert!(submit(&mut c));
    c.end_frame(true, &merger);
    assert_eq!(c.pool_stats().in_use, 0);
    assert_eq!(c.pool_stats().layers, 1);
}

#[test]
fn new_draw_context_rebinds_recycled_overlay() {
    let mut c = compositor();
    let view = ViewId(1);
    let merger = prepare(&mut c, &[(view, params(0.0, 0.0, 100.0, 100.0))]);
    draw(&mut c, view, Rect::new(0.0, 0.0, 10.0, 10.0), "a");
    assert!(submit(&mut c));
    c.end_frame(false, &merger);

    let merger = prepare(&mut c, &[(view, params(0.0, 0.0, 100.0, 100.0))]);
    draw(&mut c, view, Rect::new(0.0, 0.0, 10.0, 10.0), "a");
    let frame = c.backend().frame();
    assert!(c.submit_frame(DrawContextId(2), frame));
    c.end_frame(false, &merger);

    let log = c.backend().log.borrow();
    assert_eq!(log.rebinds, &[(OverlayId(1), DrawContextId(2))]);
    assert_eq!(c.pool_stats().rebinds, 1);
}

#[test]
fn invalid_config_is_rejected() {
    let result = Compositor::new(
        CompositorConfig::default().with_max_overlay_rects_per_query(0),
        FakeBackend::default(),
        FakeHost::default(),
    );
    assert_eq!(result.err(), Some(ConfigError::ZeroOverlayRectCap));
}
