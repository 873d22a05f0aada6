use approx::assert_relative_eq;
use simple_anim_sequence_core::{
    assets, is_looping_animation, AnimModifier, AnimSequence, CopyBonesModifier, PoseSpace,
    SimpleAnimSettings,
};

fn load(name: &str) -> AnimSequence {
    let json = simple_anim_test_fixtures::sequences::json(name)
        .unwrap_or_else(|e| panic!("load {name} fixture: {e:#}"));
    AnimSequence::from_json(&json).unwrap_or_else(|e| panic!("parse {name}: {e}"))
}

#[test]
fn fixtures_parse_and_validate() {
    for name in simple_anim_test_fixtures::sequences::keys() {
        let seq = load(&name);
        assert_eq!(seq.name, name);
        assert!(!seq.dirty);
    }
}

#[test]
fn walk_cycle_loops_once_root_motion_is_ignored() {
    let seq = load("walk_cycle");
    assert!(is_looping_animation(&seq));
    assert!(!seq.is_looping(5.0, false, false));
    // Pelvis drifts by half a unit between the first and last key.
    assert!(!seq.is_looping(0.1, true, false));
    assert!(seq.is_looping(0.1, true, true));
}

#[test]
fn pose_between_keys_blends() {
    let seq = load("walk_cycle");
    let halfway = seq.bone_pose_at_time("pelvis", 0.5 / 30.0);
    assert_relative_eq!(halfway.translation[2], 94.0, epsilon = 1e-3);
    let foot = seq.bone_pose_at_time("foot_l", 0.04);
    assert_eq!(foot.translation, [10.0, 0.0, -90.0]);
}

#[test]
fn stored_modifiers_bake_ik_tracks() {
    let mut seqs = vec![load("arm_reach")];
    assets::apply_modifiers(&mut seqs).expect("apply modifiers");
    let seq = &seqs[0];

    // Root lock is forced while baking, so root motion does not leak in.
    let track = seq.track("ik_hand_r").expect("baked ik_hand_r track");
    assert_eq!(track.len(), 3);
    assert_eq!(track[0].translation, [40.0, 0.0, 120.0]);
    assert_eq!(track[1].translation, [50.0, 0.0, 120.0]);
    assert_eq!(track[2].translation, [60.0, 0.0, 110.0]);

    assert!(!seq.force_root_lock);
    assert_eq!(seq.modifiers.len(), 1);
    assert!(seq.dirty);
}

#[test]
fn baked_target_matches_source_in_world_space() {
    let mut seq = load("arm_reach");
    seq.force_root_lock = true;
    CopyBonesModifier::default().apply(&mut seq).expect("apply");
    for frame in 0..seq.num_keys {
        let pose = seq.pose_at_frame(frame);
        let hand = pose.bone_pose_by_name("hand_r", PoseSpace::World).unwrap();
        let ik = pose.bone_pose_by_name("ik_hand_r", PoseSpace::World).unwrap();
        assert!(hand.equals(&ik, 1e-4), "frame {frame}: {hand:?} vs {ik:?}");
    }
    assert!(seq.force_root_lock);
}

#[test]
fn batch_edits_mark_sequences_dirty() {
    let mut seqs = vec![load("arm_reach"), load("walk_cycle")];

    assets::set_root_lock(&mut seqs, true);
    assert!(seqs.iter().all(|s| s.force_root_lock && s.dirty));

    assets::remove_all_curves(&mut seqs);
    assets::remove_all_notifies(&mut seqs);
    assert!(seqs.iter().all(|s| s.curves.is_empty() && s.notifies.is_empty()));

    assert_eq!(assets::remove_all_modifiers(&mut seqs), 1);
    assets::add_modifiers(&mut seqs, &[AnimModifier::from(CopyBonesModifier::default())]);
    assert!(seqs.iter().all(|s| s.modifiers.len() == 1));

    let changed = assets::set_curve_compression(&mut seqs, Some("compressed_uniform"));
    assert_eq!(changed, vec!["arm_reach".to_string(), "walk_cycle".to_string()]);
    assert!(assets::set_curve_compression(&mut seqs, Some("compressed_uniform")).is_empty());

    let settings = SimpleAnimSettings {
        default_skeletal_mesh: Some("/Game/Characters/SKM_Manny".into()),
    };
    assert_eq!(assets::assign_preview_mesh(&mut seqs, &settings), 2);
    assets::log_assets(seqs.iter().map(|s| s.name.as_str()), "SimpleAnim");
}

#[test]
fn sequence_round_trips_through_json() {
    let seq = load("arm_reach");
    let json = serde_json::to_string(&seq).expect("serialize");
    let back = AnimSequence::from_json(&json).expect("deserialize");
    assert_eq!(back, seq);
}

#[test]
fn mismatched_track_length_is_rejected() {
    let mut value: serde_json::Value =
        simple_anim_test_fixtures::sequences::load("walk_cycle").expect("walk_cycle");
    value["num_keys"] = serde_json::json!(4);
    let err = AnimSequence::from_json(&value.to_string()).unwrap_err();
    assert_eq!(err.category(), "sequence");
}
