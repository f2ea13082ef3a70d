//! Playback Tests
//!
//! Tests for:
//! - ClipPlayer start/advance/cancel state machine
//! - Wrap-to-start looping over virtual time
//! - Cancellation races (stale handle delivery)
//! - Binder resolution and per-body writes
//! - AnimationController clip switching
//! - AnimationSystem end-to-end tick pipeline

use std::sync::Arc;
use std::time::Duration;

use glam::{Quat, Vec3};

use lode_animation::animation::binder::Binder;
use lode_animation::animation::clip::{AnimationClip, BodyTrack};
use lode_animation::animation::controller::AnimationController;
use lode_animation::animation::player::ClipPlayer;
use lode_animation::animation::pose::{Pose, PoseTrack};
use lode_animation::animation::system::AnimationSystem;
use lode_animation::errors::AnimationError;
use lode_animation::scene::{Node, NodeHandle, Scene};
use lode_animation::scheduler::{AnimationScheduler, TimerQueue};

const FRAME: Duration = Duration::from_millis(100);

/// A pose whose position x encodes the frame index it belongs to.
fn marker_pose(i: u32) -> Pose {
    Pose::new(Vec3::new(i as f32, 0.0, 0.0), Quat::IDENTITY, Vec3::ONE)
}

fn marker_track(frames: u32) -> PoseTrack {
    let poses: Vec<Pose> = (0..frames).map(marker_pose).collect();
    PoseTrack::from_poses(&poses)
}

/// Clip "test": window 0..=3, step 1, 10 fps, one body named "body".
fn make_clip() -> Arc<AnimationClip> {
    Arc::new(
        AnimationClip::new(
            "test",
            0,
            3,
            1,
            10.0,
            vec![BodyTrack::new("body", marker_track(4))],
        )
        .expect("valid clip"),
    )
}

fn make_scene() -> (Scene, NodeHandle) {
    let mut scene = Scene::new();
    let body = scene.add_node(Node::new("body"));
    (scene, body)
}

fn make_player(scene: &Scene, root: NodeHandle, clip: &Arc<AnimationClip>) -> ClipPlayer {
    let bindings = Binder::bind(scene, root, clip);
    ClipPlayer::new(Arc::clone(clip), bindings)
}

fn frame_of(scene: &Scene, node: NodeHandle) -> f32 {
    scene.get_node(node).unwrap().transform.position.x
}

/// Advances virtual time by one frame interval and delivers every expired
/// handle to the player.
fn tick(player: &mut ClipPlayer, scene: &mut Scene, queue: &mut TimerQueue) {
    queue.advance_by(FRAME);
    while let Some(handle) = queue.poll_expired() {
        player
            .on_timer_fired(handle, scene, queue)
            .expect("advance failed");
    }
}

// ============================================================================
// ClipPlayer: Start & Looping
// ============================================================================

#[test]
fn start_writes_first_pose_immediately() {
    let clip = make_clip();
    let (mut scene, body) = make_scene();
    let mut player = make_player(&scene, body, &clip);
    let mut queue = TimerQueue::new();

    player.start(0, &mut scene, &mut queue).unwrap();

    assert_eq!(frame_of(&scene, body), 0.0);
    assert_eq!(player.current_frame(), Some(0));
    assert!(player.is_playing());
    assert_eq!(queue.pending(), 1);
}

#[test]
fn playback_loops_with_wrap_to_start() {
    // Window 0..=3 at 10 fps: writes P0, P1, P2, P3, P0, P1, ... at 100 ms
    // virtual intervals.
    let clip = make_clip();
    let (mut scene, body) = make_scene();
    let mut player = make_player(&scene, body, &clip);
    let mut queue = TimerQueue::new();

    player.start(0, &mut scene, &mut queue).unwrap();

    let expected = [1.0, 2.0, 3.0, 0.0, 1.0, 2.0, 3.0, 0.0];
    for (i, &want) in expected.iter().enumerate() {
        tick(&mut player, &mut scene, &mut queue);
        assert_eq!(frame_of(&scene, body), want, "tick {i}");
    }
    assert!(player.is_playing());
}

#[test]
fn exactly_one_pending_advance_while_playing() {
    let clip = make_clip();
    let (mut scene, body) = make_scene();
    let mut player = make_player(&scene, body, &clip);
    let mut queue = TimerQueue::new();

    player.start(0, &mut scene, &mut queue).unwrap();
    for _ in 0..6 {
        tick(&mut player, &mut scene, &mut queue);
        assert_eq!(queue.pending(), 1);
    }
}

#[test]
fn start_mid_window_begins_at_requested_frame() {
    let clip = make_clip();
    let (mut scene, body) = make_scene();
    let mut player = make_player(&scene, body, &clip);
    let mut queue = TimerQueue::new();

    player.start(2, &mut scene, &mut queue).unwrap();
    assert_eq!(frame_of(&scene, body), 2.0);

    tick(&mut player, &mut scene, &mut queue);
    assert_eq!(frame_of(&scene, body), 3.0);
    tick(&mut player, &mut scene, &mut queue);
    assert_eq!(frame_of(&scene, body), 0.0);
}

#[test]
fn restart_while_playing_replaces_pending_advance() {
    let clip = make_clip();
    let (mut scene, body) = make_scene();
    let mut player = make_player(&scene, body, &clip);
    let mut queue = TimerQueue::new();

    player.start(0, &mut scene, &mut queue).unwrap();
    player.start(3, &mut scene, &mut queue).unwrap();

    // The first start's timer was cancelled; only one advance is queued.
    assert_eq!(queue.pending(), 1);
    assert_eq!(frame_of(&scene, body), 3.0);

    tick(&mut player, &mut scene, &mut queue);
    assert_eq!(frame_of(&scene, body), 0.0);
}

#[test]
fn frame_step_skips_frames_during_playback() {
    let clip = Arc::new(
        AnimationClip::new(
            "coarse",
            0,
            5,
            2,
            10.0,
            vec![BodyTrack::new("body", marker_track(6))],
        )
        .unwrap(),
    );
    let (mut scene, body) = make_scene();
    let mut player = make_player(&scene, body, &clip);
    let mut queue = TimerQueue::new();

    player.start(0, &mut scene, &mut queue).unwrap();

    let expected = [2.0, 4.0, 0.0, 2.0];
    for &want in &expected {
        tick(&mut player, &mut scene, &mut queue);
        assert_eq!(frame_of(&scene, body), want);
    }
}

// ============================================================================
// ClipPlayer: Invalid Frames
// ============================================================================

#[test]
fn start_outside_window_fails_fast() {
    let clip = make_clip();
    let (mut scene, body) = make_scene();
    let mut player = make_player(&scene, body, &clip);
    let mut queue = TimerQueue::new();

    let err = player.start(4, &mut scene, &mut queue).unwrap_err();
    match err {
        AnimationError::InvalidFrameIndex { frame, first, last } => {
            assert_eq!((frame, first, last), (4, 0, 3));
        }
        other => panic!("expected InvalidFrameIndex, got {other:?}"),
    }

    // Nothing was written and nothing is scheduled.
    assert_eq!(player.current_frame(), None);
    assert!(!player.is_playing());
    assert_eq!(queue.pending(), 0);
}

// ============================================================================
// ClipPlayer: Cancellation
// ============================================================================

#[test]
fn cancel_halts_sequence_permanently() {
    // cancel() between the P1 and P2 writes halts at P1.
    let clip = make_clip();
    let (mut scene, body) = make_scene();
    let mut player = make_player(&scene, body, &clip);
    let mut queue = TimerQueue::new();

    player.start(0, &mut scene, &mut queue).unwrap();
    tick(&mut player, &mut scene, &mut queue);
    assert_eq!(frame_of(&scene, body), 1.0);

    player.cancel(&mut queue);
    assert!(!player.is_playing());
    assert_eq!(queue.pending(), 0);

    // Time keeps passing; nothing ever fires again.
    for _ in 0..10 {
        tick(&mut player, &mut scene, &mut queue);
    }
    assert_eq!(frame_of(&scene, body), 1.0);
    assert_eq!(player.current_frame(), Some(1));
}

#[test]
fn cancel_is_idempotent() {
    let clip = make_clip();
    let (mut scene, body) = make_scene();
    let mut player = make_player(&scene, body, &clip);
    let mut queue = TimerQueue::new();

    player.start(0, &mut scene, &mut queue).unwrap();
    player.cancel(&mut queue);
    player.cancel(&mut queue);

    assert!(!player.is_playing());
    assert_eq!(queue.pending(), 0);

    // Cancelling a never-started player is also a no-op.
    let mut idle = make_player(&scene, body, &clip);
    idle.cancel(&mut queue);
    assert!(!idle.is_playing());
}

#[test]
fn stale_handle_after_cancel_is_dropped() {
    // The timer expired inside the queue, then cancel ran before delivery;
    // the late delivery must not advance anything.
    let clip = make_clip();
    let (mut scene, body) = make_scene();
    let mut player = make_player(&scene, body, &clip);
    let mut queue = TimerQueue::new();

    player.start(0, &mut scene, &mut queue).unwrap();
    let stale = player.pending_handle().unwrap();

    queue.advance_by(FRAME);
    player.cancel(&mut queue);

    let advanced = player.on_timer_fired(stale, &mut scene, &mut queue).unwrap();
    assert!(!advanced);
    assert_eq!(frame_of(&scene, body), 0.0);
    assert!(!player.is_playing());
}

#[test]
fn foreign_handle_is_ignored() {
    let clip = make_clip();
    let (mut scene, body) = make_scene();
    let mut player = make_player(&scene, body, &clip);
    let mut queue = TimerQueue::new();

    player.start(0, &mut scene, &mut queue).unwrap();

    // A handle belonging to someone else's timer.
    let foreign = queue.schedule_after(FRAME).unwrap();
    let advanced = player
        .on_timer_fired(foreign, &mut scene, &mut queue)
        .unwrap();
    assert!(!advanced);
    assert_eq!(frame_of(&scene, body), 0.0);
}

// ============================================================================
// ClipPlayer: Scheduler Failure
// ============================================================================

#[test]
fn scheduler_failure_degrades_to_static_pose() {
    let clip = make_clip();
    let (mut scene, body) = make_scene();
    let mut player = make_player(&scene, body, &clip);
    // Zero capacity: the very first reschedule is refused.
    let mut queue = TimerQueue::with_capacity(0);

    let err = player.start(0, &mut scene, &mut queue).unwrap_err();
    assert!(matches!(err, AnimationError::Scheduler(_)));

    // The frame's poses were written before the failure; playback is idle.
    assert_eq!(frame_of(&scene, body), 0.0);
    assert_eq!(player.current_frame(), Some(0));
    assert!(!player.is_playing());
}

// ============================================================================
// Binder & Per-Body Writes
// ============================================================================

/// Two-body clip; body "a" runs the marker poses, body "b" runs them offset
/// by 10 so the writes are distinguishable.
fn make_two_body_clip() -> Arc<AnimationClip> {
    let offset: Vec<Pose> = (0..4)
        .map(|i| {
            Pose::new(
                Vec3::new(i as f32 + 10.0, 0.0, 0.0),
                Quat::IDENTITY,
                Vec3::ONE,
            )
        })
        .collect();
    Arc::new(
        AnimationClip::new(
            "two",
            0,
            3,
            1,
            10.0,
            vec![
                BodyTrack::new("a", marker_track(4)),
                BodyTrack::new("b", PoseTrack::from_poses(&offset)),
            ],
        )
        .unwrap(),
    )
}

#[test]
fn advance_writes_one_pose_per_bound_body() {
    let clip = make_two_body_clip();
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("root"));
    let a = scene.add_node(Node::new("a"));
    let b = scene.add_node(Node::new("b"));
    scene.attach(a, root);
    scene.attach(b, root);

    let bindings = Binder::bind(&scene, root, &clip);
    assert_eq!(bindings.len(), 2);

    let mut player = ClipPlayer::new(Arc::clone(&clip), bindings);
    let mut queue = TimerQueue::new();
    player.start(2, &mut scene, &mut queue).unwrap();

    // Each body got its own table's entry at frame 2.
    assert_eq!(frame_of(&scene, a), 2.0);
    assert_eq!(frame_of(&scene, b), 12.0);
}

#[test]
fn binder_skips_unresolvable_names() {
    let clip = make_two_body_clip();
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("root"));
    let a = scene.add_node(Node::new("a"));
    scene.attach(a, root);
    // No node named "b" in this entity variant.

    let bindings = Binder::bind(&scene, root, &clip);
    assert_eq!(bindings.len(), 1);
    assert_eq!(bindings[0].body_index, 0);
}

#[test]
fn binder_only_searches_under_the_bind_root() {
    let clip = make_clip();
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("root"));
    // A "body" node exists, but outside the subtree.
    let _outside = scene.add_node(Node::new("body"));

    let bindings = Binder::bind(&scene, root, &clip);
    assert!(bindings.is_empty());
}

// ============================================================================
// AnimationController
// ============================================================================

fn make_walk_drill_controller(scene: &Scene, root: NodeHandle) -> AnimationController {
    let walk = Arc::new(
        AnimationClip::new(
            "walk",
            0,
            3,
            1,
            10.0,
            vec![BodyTrack::new("body", marker_track(4))],
        )
        .unwrap(),
    );
    let drill_poses: Vec<Pose> = (0..2)
        .map(|i| {
            Pose::new(
                Vec3::new(i as f32 + 100.0, 0.0, 0.0),
                Quat::IDENTITY,
                Vec3::ONE,
            )
        })
        .collect();
    let drill = Arc::new(
        AnimationClip::new(
            "drill",
            0,
            1,
            1,
            10.0,
            vec![BodyTrack::new(
                "body",
                PoseTrack::from_poses(&drill_poses),
            )],
        )
        .unwrap(),
    );

    let mut controller = AnimationController::new();
    controller.insert(make_player(scene, root, &walk));
    controller.insert(make_player(scene, root, &drill));
    controller
}

#[test]
fn controller_switches_between_named_clips() {
    let (mut scene, body) = make_scene();
    let mut controller = make_walk_drill_controller(&scene, body);
    let mut queue = TimerQueue::new();

    controller.play("walk", 0, &mut scene, &mut queue).unwrap();
    assert_eq!(controller.active_clip(), Some("walk"));
    assert_eq!(frame_of(&scene, body), 0.0);
    assert_eq!(queue.pending(), 1);

    controller.play("drill", 0, &mut scene, &mut queue).unwrap();
    assert_eq!(controller.active_clip(), Some("drill"));
    assert_eq!(frame_of(&scene, body), 100.0);
    // The walk timer was cancelled; only drill's advance is queued.
    assert_eq!(queue.pending(), 1);
    assert!(!controller.player("walk").unwrap().is_playing());
}

#[test]
fn controller_unknown_clip_fails_without_side_effects() {
    let (mut scene, body) = make_scene();
    let mut controller = make_walk_drill_controller(&scene, body);
    let mut queue = TimerQueue::new();

    controller.play("walk", 0, &mut scene, &mut queue).unwrap();
    let err = controller
        .play("swim", 0, &mut scene, &mut queue)
        .unwrap_err();
    assert!(matches!(err, AnimationError::UnknownClip(name) if name == "swim"));

    // The active clip keeps playing.
    assert_eq!(controller.active_clip(), Some("walk"));
    assert!(controller.is_playing());
}

#[test]
fn controller_stop_preserves_current_frame() {
    let (mut scene, body) = make_scene();
    let mut controller = make_walk_drill_controller(&scene, body);
    let mut queue = TimerQueue::new();

    controller.play("walk", 2, &mut scene, &mut queue).unwrap();
    controller.stop(&mut queue);

    assert!(!controller.is_playing());
    assert_eq!(controller.active_clip(), Some("walk"));
    assert_eq!(controller.current_frame(), Some(2));
    assert_eq!(queue.pending(), 0);
}

// ============================================================================
// AnimationSystem: End-to-End Tick Pipeline
// ============================================================================

#[test]
fn system_drives_stored_controllers() {
    let (mut scene, body) = make_scene();
    let controller = make_walk_drill_controller(&scene, body);
    let handle = scene.add_controller(controller);
    let mut queue = TimerQueue::new();

    scene.play_clip(handle, "walk", 0, &mut queue).unwrap();
    assert_eq!(frame_of(&scene, body), 0.0);

    // Five 100 ms ticks: frames 1, 2, 3, 0, 1.
    for _ in 0..5 {
        queue.advance_by(FRAME);
        AnimationSystem::update(&mut scene, &mut queue);
    }

    assert_eq!(frame_of(&scene, body), 1.0);
    assert_eq!(scene.controller(handle).unwrap().current_frame(), Some(1));
    assert!(scene.controller(handle).unwrap().is_playing());
}

#[test]
fn system_tick_without_due_timers_is_inert() {
    let (mut scene, body) = make_scene();
    let controller = make_walk_drill_controller(&scene, body);
    let handle = scene.add_controller(controller);
    let mut queue = TimerQueue::new();

    scene.play_clip(handle, "walk", 0, &mut queue).unwrap();

    // Half a frame interval: nothing is due yet.
    queue.advance_by(FRAME / 2);
    AnimationSystem::update(&mut scene, &mut queue);
    assert_eq!(frame_of(&scene, body), 0.0);

    // The rest of the interval arrives.
    queue.advance_by(FRAME / 2);
    AnimationSystem::update(&mut scene, &mut queue);
    assert_eq!(frame_of(&scene, body), 1.0);
}

#[test]
fn system_runs_independent_controllers_concurrently() {
    let mut scene = Scene::new();
    let miner = scene.add_node(Node::new("body"));
    let cart = scene.add_node(Node::new("cart_body"));

    let miner_clip = Arc::new(
        AnimationClip::new(
            "walk",
            0,
            3,
            1,
            10.0,
            vec![BodyTrack::new("body", marker_track(4))],
        )
        .unwrap(),
    );
    // The cart animates at half the rate.
    let cart_clip = Arc::new(
        AnimationClip::new(
            "roll",
            0,
            3,
            1,
            5.0,
            vec![BodyTrack::new("cart_body", marker_track(4))],
        )
        .unwrap(),
    );

    let mut miner_ctrl = AnimationController::new();
    miner_ctrl.insert(make_player(&scene, miner, &miner_clip));
    let miner_handle = scene.add_controller(miner_ctrl);

    let mut cart_ctrl = AnimationController::new();
    cart_ctrl.insert(make_player(&scene, cart, &cart_clip));
    let cart_handle = scene.add_controller(cart_ctrl);

    let mut queue = TimerQueue::new();
    scene.play_clip(miner_handle, "walk", 0, &mut queue).unwrap();
    scene.play_clip(cart_handle, "roll", 0, &mut queue).unwrap();

    // 400 ms: the miner advances 4 frames (wraps to 0), the cart 2.
    for _ in 0..4 {
        queue.advance_by(FRAME);
        AnimationSystem::update(&mut scene, &mut queue);
    }

    assert_eq!(frame_of(&scene, miner), 0.0);
    assert_eq!(frame_of(&scene, cart), 2.0);
}

#[test]
fn scene_stop_clip_halts_playback() {
    let (mut scene, body) = make_scene();
    let controller = make_walk_drill_controller(&scene, body);
    let handle = scene.add_controller(controller);
    let mut queue = TimerQueue::new();

    scene.play_clip(handle, "walk", 0, &mut queue).unwrap();
    queue.advance_by(FRAME);
    AnimationSystem::update(&mut scene, &mut queue);
    assert_eq!(frame_of(&scene, body), 1.0);

    scene.stop_clip(handle, &mut queue);
    for _ in 0..5 {
        queue.advance_by(FRAME);
        AnimationSystem::update(&mut scene, &mut queue);
    }
    assert_eq!(frame_of(&scene, body), 1.0);
}
