mod common;

use std::collections::HashSet;

use common::{
    Call, FakeSpotify, FakeUser, artist, config, host_party, join_party, simplified_playlist, track,
};
use groupify_core::{AggregationConfig, GroupifyError, PartyId, gs};

fn tracks(prefix: &str, range: std::ops::Range<usize>) -> Vec<gs::FullTrack> {
    range.map(|n| track(&format!("{prefix}{n}"), &[])).collect()
}

fn uri(id: &str) -> String {
    format!("spotify:track:{id}")
}

fn exact(strictness: usize, target_size: usize) -> AggregationConfig {
    AggregationConfig {
        strictness,
        target_size,
        recommendations: false,
    }
}

/// Alice hosts, Bob and Cat join.
async fn party_of_three(
    spotify: &FakeSpotify,
    groupify: &groupify_core::Groupify,
    alice: FakeUser,
    bob: FakeUser,
    cat: FakeUser,
) -> PartyId {
    let party_id = host_party(spotify, groupify, "alice-code", alice).await;
    join_party(spotify, groupify, &party_id, "bob-code", bob).await;
    join_party(spotify, groupify, &party_id, "cat-code", cat).await;
    party_id
}

#[tokio::test]
async fn test_appends_in_batches_of_one_hundred() {
    let spotify = FakeSpotify::new();
    let groupify = spotify.groupify(config());
    let party_id = party_of_three(
        &spotify,
        &groupify,
        FakeUser::new("alice").top_tracks(tracks("a", 0..50)),
        FakeUser::new("bob").top_tracks(tracks("b", 0..50)),
        FakeUser::new("cat").top_tracks(tracks("c", 0..50)),
    )
    .await;

    let playlist = groupify
        .make_playlist(&party_id, &exact(1, 137))
        .await
        .unwrap();

    let appended = spotify.appended();
    assert_eq!(
        appended.iter().map(Vec::len).collect::<Vec<_>>(),
        vec![100, 37]
    );
    assert_eq!(playlist.track_count, 137);
    assert_eq!(appended[0][0], uri("a0"));
    assert_eq!(appended[1][36], uri("c36"));
    assert!(
        spotify
            .calls()
            .iter()
            .filter_map(|c| match c {
                Call::AddTracks { playlist_id, .. } => Some(playlist_id),
                _ => None,
            })
            .all(|id| *id == playlist.id.0)
    );
}

#[tokio::test]
async fn test_empty_candidates_make_no_appends() {
    let spotify = FakeSpotify::new();
    let groupify = spotify.groupify(config());
    let party_id = party_of_three(
        &spotify,
        &groupify,
        FakeUser::new("alice").top_tracks(tracks("a", 0..5)),
        FakeUser::new("bob").top_tracks(tracks("b", 0..5)),
        FakeUser::new("cat"),
    )
    .await;

    let config = AggregationConfig {
        strictness: 2,
        target_size: 80,
        recommendations: true,
    };
    let playlist = groupify.make_playlist(&party_id, &config).await.unwrap();

    assert_eq!(playlist.track_count, 0);
    assert!(spotify.appended().is_empty());
    // Nothing to seed recommendations with.
    assert_eq!(spotify.count(|c| matches!(c, Call::Recommendations { .. })), 0);
    assert_eq!(spotify.count(|c| matches!(c, Call::CreatePlaylist { .. })), 1);
}

#[tokio::test]
async fn test_truncates_to_target_size() {
    let spotify = FakeSpotify::new();
    let groupify = spotify.groupify(config());
    let party_id = party_of_three(
        &spotify,
        &groupify,
        FakeUser::new("alice").top_tracks(tracks("a", 0..50)),
        FakeUser::new("bob").top_tracks(tracks("b", 0..35)),
        FakeUser::new("cat"),
    )
    .await;

    let config = AggregationConfig {
        strictness: 1,
        target_size: 80,
        recommendations: true,
    };
    let playlist = groupify.make_playlist(&party_id, &config).await.unwrap();

    assert_eq!(playlist.track_count, 80);
    let appended = spotify.appended();
    assert_eq!(appended.len(), 1);
    assert_eq!(appended[0].len(), 80);
    assert_eq!(appended[0].last().unwrap(), &uri("b29"));
    // Already over target, so no recommendations.
    assert_eq!(spotify.count(|c| matches!(c, Call::Recommendations { .. })), 0);
}

#[tokio::test]
async fn test_recommendations_fill_shortfall() {
    let spotify = FakeSpotify::new();
    let groupify = spotify.groupify(config());
    spotify.set_recommendations(tracks("r", 0..12));
    let party_id = party_of_three(
        &spotify,
        &groupify,
        FakeUser::new("alice").top_tracks([track("t1", &[]), track("t2", &[]), track("t3", &[])]),
        FakeUser::new("bob").top_tracks([track("t2", &[]), track("t3", &[]), track("t4", &[])]),
        FakeUser::new("cat").top_tracks([track("t3", &[]), track("t5", &[])]),
    )
    .await;

    let config = AggregationConfig {
        strictness: 2,
        target_size: 10,
        recommendations: true,
    };
    let playlist = groupify.make_playlist(&party_id, &config).await.unwrap();

    assert!(spotify.calls().contains(&Call::Recommendations {
        seeds: vec!["t2".to_string(), "t3".to_string()],
        limit: 8,
    }));
    assert_eq!(spotify.count(|c| matches!(c, Call::SeveralTracks(ids) if ids.len() == 8)), 1);

    let mut expected = vec![uri("t2"), uri("t3")];
    expected.extend((0..8).map(|n| uri(&format!("r{n}"))));
    assert_eq!(spotify.appended(), vec![expected]);
    assert_eq!(playlist.track_count, 10);
}

#[tokio::test]
async fn test_recommendations_are_capped() {
    let spotify = FakeSpotify::new();
    let groupify = spotify.groupify(config());
    spotify.set_recommendations(tracks("r", 0..150));
    let party_id = party_of_three(
        &spotify,
        &groupify,
        FakeUser::new("alice").top_tracks(tracks("t", 0..7)),
        FakeUser::new("bob").top_tracks(tracks("t", 0..7)),
        FakeUser::new("cat"),
    )
    .await;

    let config = AggregationConfig {
        strictness: 2,
        target_size: 200,
        recommendations: true,
    };
    let playlist = groupify.make_playlist(&party_id, &config).await.unwrap();

    let seeds: Vec<String> = (0..5).map(|n| format!("t{n}")).collect();
    assert!(spotify.calls().contains(&Call::Recommendations { seeds, limit: 100 }));
    // 100 recommendations resolved in two batches.
    assert_eq!(spotify.count(|c| matches!(c, Call::SeveralTracks(_))), 2);
    assert_eq!(playlist.track_count, 107);
}

#[tokio::test]
async fn test_playlist_metadata() {
    let spotify = FakeSpotify::new();
    let groupify = spotify.groupify(config());
    let party_id = party_of_three(
        &spotify,
        &groupify,
        FakeUser::new("alice").top_tracks(tracks("t", 0..3)),
        FakeUser::new("bob").top_tracks(tracks("t", 0..3)),
        FakeUser::new("cat"),
    )
    .await;

    let playlist = groupify
        .make_playlist(&party_id, &exact(2, 80))
        .await
        .unwrap();

    assert!(spotify.calls().contains(&Call::CreatePlaylist {
        user_id: "alice".to_string(),
        name: "Groupify Playlist".to_string(),
        description: "A playlist for Alice, Bob and Cat.".to_string(),
    }));
    assert_eq!(playlist.uri, format!("spotify:playlist:{}", playlist.id));
    assert_eq!(
        playlist.url.as_deref(),
        Some(format!("https://open.spotify.com/playlist/{}", playlist.id).as_str())
    );
}

#[tokio::test]
async fn test_partial_append_failure_is_reported() {
    let spotify = FakeSpotify::new();
    let groupify = spotify.groupify(config());
    spotify.fail_add_at(1);
    let party_id = party_of_three(
        &spotify,
        &groupify,
        FakeUser::new("alice").top_tracks(tracks("a", 0..50)),
        FakeUser::new("bob").top_tracks(tracks("b", 0..50)),
        FakeUser::new("cat").top_tracks(tracks("c", 0..50)),
    )
    .await;

    let err = groupify
        .make_playlist(&party_id, &exact(1, 137))
        .await
        .unwrap_err();

    match err {
        GroupifyError::PlaylistIncomplete {
            playlist, written, ..
        } => {
            assert_eq!(written, 100);
            assert_eq!(playlist.track_count, 100);
        }
        other => panic!("unexpected error: {other}"),
    }
    // The first batch stays; nothing is removed.
    assert_eq!(spotify.appended().len(), 2);
    assert_eq!(spotify.count(|c| matches!(c, Call::Unfollow(_))), 0);
}

#[tokio::test]
async fn test_genre_lookups_are_batched_and_cached() {
    let spotify = FakeSpotify::new();
    let groupify = spotify.groupify(config());
    spotify.add_catalog_artist(artist("x0", &["shoegaze"]));
    spotify.add_catalog_artist(artist("x31", &["polka"]));

    let alice_tracks = (0..30).map(|n| track(&format!("a{n}"), &[format!("x{n}").as_str()]));
    let bob_tracks = (30..60).map(|n| track(&format!("b{n}"), &[format!("x{n}").as_str()]));
    let party_id = party_of_three(
        &spotify,
        &groupify,
        FakeUser::new("alice")
            .top_tracks(
                alice_tracks
                    .chain([track("both", &["g1"]), track("g", &["g1"])])
                    .collect::<Vec<_>>(),
            )
            .top_artists([artist("g1", &["shoegaze"])]),
        FakeUser::new("bob")
            .top_tracks(bob_tracks.chain([track("both", &["x0"])]).collect::<Vec<_>>())
            .top_artists([artist("g2", &["shoegaze"])]),
        FakeUser::new("cat"),
    )
    .await;

    let playlist = groupify
        .make_playlist(&party_id, &exact(2, 80))
        .await
        .unwrap();

    let lookups: Vec<Vec<String>> = spotify
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            Call::SeveralArtists(ids) => Some(ids),
            _ => None,
        })
        .collect();
    assert_eq!(lookups.iter().map(Vec::len).collect::<Vec<_>>(), vec![50, 10]);
    let unique: HashSet<&String> = lookups.iter().flatten().collect();
    assert_eq!(unique.len(), 60);
    assert!(!unique.contains(&"g1".to_string()));

    // "both" is a shared top track and a genre track, but appears once.
    assert_eq!(
        spotify.appended(),
        vec![vec![uri("both"), uri("a0"), uri("g")]]
    );
    assert_eq!(playlist.track_count, 3);
}

#[tokio::test]
async fn test_genre_lookups_skipped_without_shared_genre() {
    let spotify = FakeSpotify::new();
    let groupify = spotify.groupify(config());
    let party_id = party_of_three(
        &spotify,
        &groupify,
        FakeUser::new("alice")
            .top_tracks([track("a", &["x"])])
            .top_artists([artist("g1", &["shoegaze"])]),
        FakeUser::new("bob")
            .top_tracks([track("b", &["y"])])
            .top_artists([artist("g2", &["polka"])]),
        FakeUser::new("cat"),
    )
    .await;

    groupify
        .make_playlist(&party_id, &exact(2, 80))
        .await
        .unwrap();
    assert_eq!(spotify.count(|c| matches!(c, Call::SeveralArtists(_))), 0);
}

#[tokio::test]
async fn test_make_playlist_is_repeatable() {
    let spotify = FakeSpotify::new();
    let groupify = spotify.groupify(config());
    let party_id = party_of_three(
        &spotify,
        &groupify,
        FakeUser::new("alice").top_tracks([track("t1", &["x"]), track("t2", &["y"])]),
        FakeUser::new("bob")
            .top_tracks([track("t2", &["y"]), track("t3", &["x"])])
            .top_artists([artist("x", &[])]),
        FakeUser::new("cat").top_artists([artist("x", &[])]),
    )
    .await;

    let first = groupify
        .make_playlist(&party_id, &exact(2, 80))
        .await
        .unwrap();
    let second = groupify
        .make_playlist(&party_id, &exact(2, 80))
        .await
        .unwrap();

    assert_ne!(first.id, second.id);
    let appended = spotify.appended();
    assert_eq!(appended.len(), 2);
    assert_eq!(appended[0], appended[1]);
    assert_eq!(appended[0], vec![uri("t2"), uri("t1"), uri("t3")]);
}

#[tokio::test]
async fn test_make_playlist_for_unknown_party() {
    let spotify = FakeSpotify::new();
    let groupify = spotify.groupify(config());
    assert!(matches!(
        groupify.make_playlist(&"ZZZZZ".into(), &exact(2, 80)).await,
        Err(GroupifyError::PartyNotFound(_))
    ));
}

#[tokio::test]
async fn test_purge_playlists() {
    let spotify = FakeSpotify::new();
    let groupify = spotify.groupify(config());
    let party_id = host_party(
        &spotify,
        &groupify,
        "alice-code",
        FakeUser::new("alice").playlists([
            simplified_playlist("p1", "Groupify Playlist", "alice"),
            simplified_playlist("p2", "Groupify Playlist", "someone-else"),
            simplified_playlist("p3", "Road trip", "alice"),
            simplified_playlist("p4", "Groupify Playlist", "alice"),
        ]),
    )
    .await;

    assert_eq!(groupify.purge_playlists(&party_id).await.unwrap(), 2);
    let unfollowed: Vec<Call> = spotify
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::Unfollow(_)))
        .collect();
    assert_eq!(
        unfollowed,
        vec![Call::Unfollow("p1".to_string()), Call::Unfollow("p4".to_string())]
    );
}
