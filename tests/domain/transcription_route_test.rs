use voicescribe::domain::{
    BlobHandle, NormalizedAudio, RouteKind, RoutingPolicy, TranscriptionRoute,
};

#[test]
fn given_default_policy_when_selecting_then_threshold_is_inclusive_for_inline() {
    let policy = RoutingPolicy::default();

    assert_eq!(policy.remote_threshold_secs(), 60.0);
    assert_eq!(policy.select(0.0), RouteKind::Inline);
    assert_eq!(policy.select(45.0), RouteKind::Inline);
    assert_eq!(policy.select(60.0), RouteKind::Inline);
    assert_eq!(policy.select(60.001), RouteKind::Remote);
    assert_eq!(policy.select(120.0), RouteKind::Remote);
}

#[test]
fn given_custom_threshold_when_selecting_then_boundary_moves() {
    let policy = RoutingPolicy::new(10.0, false);

    assert_eq!(policy.select(10.0), RouteKind::Inline);
    assert_eq!(policy.select(10.5), RouteKind::Remote);
}

#[test]
fn given_always_remote_when_selecting_then_every_duration_is_remote() {
    let policy = RoutingPolicy::new(60.0, true);

    assert_eq!(policy.select(0.5), RouteKind::Remote);
}

#[test]
fn given_routes_when_asking_kind_then_matches_variant() {
    let inline = TranscriptionRoute::Inline(NormalizedAudio::new(vec![0u8; 4], 1.0));
    let remote = TranscriptionRoute::Remote(BlobHandle::new("k", "gs://b/k"));

    assert_eq!(inline.kind(), RouteKind::Inline);
    assert_eq!(remote.kind(), RouteKind::Remote);
    assert_eq!(RouteKind::Remote.to_string(), "remote");
}
