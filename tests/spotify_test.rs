//! Tests for the Spotify Web API client.
//!
//! A mock server stands in for Spotify, so no network access or real
//! credentials are needed.

use std::time::Duration;

use serde_json::json;
use splister::error::SpotifyError;
use splister::spotify::{self, SpotifyClient};
use splister::types::CreatePlaylistRequest;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> SpotifyClient {
    SpotifyClient::new(server.uri(), "test-token").with_retry_delay(Duration::from_millis(10))
}

fn saved_track(id: &str) -> serde_json::Value {
    json!({
        "added_at": "2024-05-01T10:00:00Z",
        "track": {
            "id": id,
            "name": format!("Song {id}"),
            "uri": format!("spotify:track:{id}"),
            "duration_ms": 200000,
            "artists": [{ "id": format!("artist_{id}"), "name": format!("Artist {id}") }],
            "album": { "id": "album", "name": "Album" }
        }
    })
}

// =============================================================================
// Client Tests
// =============================================================================

mod client {
    use super::*;

    #[test]
    fn test_endpoint_joins_paths() {
        let client = SpotifyClient::new("https://api.spotify.com/v1/", "t");
        assert_eq!(client.api_url(), "https://api.spotify.com/v1");
        assert_eq!(client.endpoint("me"), "https://api.spotify.com/v1/me");
        assert_eq!(client.endpoint("/me/tracks"), "https://api.spotify.com/v1/me/tracks");
    }

    #[test]
    fn test_endpoint_keeps_absolute_urls() {
        let client = SpotifyClient::new("https://api.spotify.com/v1", "t");
        let next = "https://api.spotify.com/v1/me/tracks?offset=50&limit=50";
        assert_eq!(client.endpoint(next), next);
    }

    #[test]
    fn test_retry_after_header() {
        use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};

        let mut headers = HeaderMap::new();
        assert_eq!(spotify::retry_after(&headers), None);

        headers.insert(RETRY_AFTER, HeaderValue::from_static("17"));
        assert_eq!(spotify::retry_after(&headers), Some(17));

        headers.insert(RETRY_AFTER, HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"));
        assert_eq!(spotify::retry_after(&headers), None);
    }

    #[tokio::test]
    async fn test_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "user1",
                "display_name": "Test User",
                "email": "test@example.com",
                "country": "DE",
                "product": "premium"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let profile = spotify::profile::get_current_user(&client(&server)).await.unwrap();
        assert_eq!(profile.id, "user1");
        assert_eq!(profile.display_name.as_deref(), Some("Test User"));
        assert_eq!(profile.product.as_deref(), Some("premium"));
    }
}

// =============================================================================
// Retry Policy Tests
// =============================================================================

mod retry_policy {
    use super::*;

    #[tokio::test]
    async fn test_retries_bad_gateway() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me"))
            .respond_with(ResponseTemplate::new(502))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "user1",
                "display_name": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        let profile = spotify::profile::get_current_user(&client(&server)).await.unwrap();
        assert_eq!(profile.id, "user1");
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        let client = client(&server).with_max_retries(2);
        let err = spotify::profile::get_current_user(&client).await.unwrap_err();

        assert!(matches!(err, SpotifyError::Api { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_waits_for_short_retry_after() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "user1",
                "display_name": "Test"
            })))
            .expect(1)
            .mount(&server)
            .await;

        assert!(spotify::profile::get_current_user(&client(&server)).await.is_ok());
    }

    #[tokio::test]
    async fn test_long_retry_after_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "600"))
            .expect(1)
            .mount(&server)
            .await;

        let err = spotify::profile::get_current_user(&client(&server)).await.unwrap_err();
        assert!(matches!(err, SpotifyError::RateLimited { retry_after_secs: 600 }));
    }

    #[tokio::test]
    async fn test_unauthorized_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": { "status": 401, "message": "The access token expired" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = spotify::profile::get_current_user(&client(&server)).await.unwrap_err();
        assert!(matches!(err, SpotifyError::Unauthorized));
    }

    #[tokio::test]
    async fn test_api_error_carries_spotify_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/artists/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": { "status": 404, "message": "Non existing id" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = spotify::artists::get_artist(&client(&server), "missing")
            .await
            .unwrap_err();

        match err {
            SpotifyError::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Non existing id");
            }
            other => panic!("Expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_api_error_with_plain_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&server)
            .await;

        let err = spotify::profile::get_current_user(&client(&server)).await.unwrap_err();
        assert!(matches!(
            err,
            SpotifyError::Api { status: 500, ref message } if message == "upstream exploded"
        ));
    }
}

// =============================================================================
// Tracks Tests
// =============================================================================

mod tracks {
    use super::*;

    #[tokio::test]
    async fn test_saved_tracks_first_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me/tracks"))
            .and(query_param("limit", "50"))
            .and(query_param("offset", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [saved_track("a"), saved_track("b")],
                "next": format!("{}/me/tracks?limit=50&offset=50", server.uri()),
                "total": 3
            })))
            .expect(1)
            .mount(&server)
            .await;

        let page = spotify::tracks::get_saved_tracks_page(&client(&server), None)
            .await
            .unwrap();

        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].track.id.as_deref(), Some("a"));
        assert_eq!(page.items[1].track.artists[0].name, "Artist b");
        assert!(page.next.is_some());
    }

    #[tokio::test]
    async fn test_saved_tracks_follows_next_link() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me/tracks"))
            .and(query_param("offset", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [saved_track("c")],
                "next": null,
                "total": 51
            })))
            .expect(1)
            .mount(&server)
            .await;

        let next = format!("{}/me/tracks?limit=50&offset=50", server.uri());
        let page = spotify::tracks::get_saved_tracks_page(&client(&server), Some(&next))
            .await
            .unwrap();

        assert_eq!(page.items.len(), 1);
        assert!(page.next.is_none());
    }

    #[tokio::test]
    async fn test_saved_track_without_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me/tracks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{
                    "added_at": "2024-05-01T10:00:00Z",
                    "track": {
                        "id": null,
                        "name": "Demo",
                        "uri": "spotify:local:Me:Tape:Demo:120",
                        "artists": [{ "id": null, "name": "Me" }],
                        "album": { "id": null, "name": "Tape" }
                    }
                }],
                "next": null,
                "total": 1
            })))
            .mount(&server)
            .await;

        let page = spotify::tracks::get_saved_tracks_page(&client(&server), None)
            .await
            .unwrap();

        let track = &page.items[0].track;
        assert!(track.id.is_none());
        assert_eq!(track.duration_ms, 0);
    }

    #[tokio::test]
    async fn test_audio_features_skips_nulls() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/audio-features"))
            .and(query_param("ids", "a,b,c"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "audio_features": [
                    { "id": "a", "danceability": 0.8, "energy": 0.9, "valence": 0.5,
                      "acousticness": 0.1, "instrumentalness": 0.0, "liveness": 0.2,
                      "speechiness": 0.05, "tempo": 128.0 },
                    null,
                    { "id": "c", "danceability": 0.3, "energy": 0.2, "valence": 0.1,
                      "acousticness": 0.9 }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let ids = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let features = spotify::tracks::get_audio_features(&client(&server), &ids)
            .await
            .unwrap();

        assert_eq!(features.len(), 2);
        assert_eq!(features[0].id, "a");
        assert_eq!(features[0].tempo, 128.0);
        assert_eq!(features[1].id, "c");
        assert_eq!(features[1].acousticness, 0.9);
    }

    #[tokio::test]
    async fn test_audio_features_without_ids_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let features = spotify::tracks::get_audio_features(&client(&server), &[])
            .await
            .unwrap();
        assert!(features.is_empty());
    }

    #[tokio::test]
    async fn test_get_artist_genres() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/artists/4tZwfgrHOc3mvqYlEYSvVi"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "4tZwfgrHOc3mvqYlEYSvVi",
                "name": "Daft Punk",
                "genres": ["electro", "filter house", "french house"],
                "popularity": 80
            })))
            .mount(&server)
            .await;

        let artist = spotify::artists::get_artist(&client(&server), "4tZwfgrHOc3mvqYlEYSvVi")
            .await
            .unwrap();

        assert_eq!(artist.name, "Daft Punk");
        assert_eq!(artist.genres.len(), 3);
    }
}

// =============================================================================
// Playlist Tests
// =============================================================================

mod playlists {
    use super::*;

    #[tokio::test]
    async fn test_create_playlist() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users/user1/playlists"))
            .and(body_json(json!({
                "name": "AI Generated - Rock",
                "description": "Auto-generated Rock playlist from your liked songs",
                "public": false,
                "collaborative": false
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "pl1",
                "name": "AI Generated - Rock",
                "public": false,
                "snapshot_id": "snap0"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = CreatePlaylistRequest {
            name: "AI Generated - Rock".to_string(),
            description: "Auto-generated Rock playlist from your liked songs".to_string(),
            public: false,
            collaborative: false,
        };
        let playlist = spotify::playlist::create(&client(&server), "user1", &request)
            .await
            .unwrap();

        assert_eq!(playlist.id, "pl1");
        assert_eq!(playlist.public, Some(false));
    }

    #[tokio::test]
    async fn test_add_tracks() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/playlists/pl1/tracks"))
            .and(body_json(json!({ "uris": ["spotify:track:a", "spotify:track:b"] })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "snapshot_id": "snap1" })))
            .expect(1)
            .mount(&server)
            .await;

        let uris = vec!["spotify:track:a".to_string(), "spotify:track:b".to_string()];
        let snapshot = spotify::playlist::add_tracks(&client(&server), "pl1", &uris)
            .await
            .unwrap();

        assert_eq!(snapshot.snapshot_id, "snap1");
    }

    #[tokio::test]
    async fn test_list_playlists_follows_pages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me/playlists"))
            .and(query_param("offset", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{ "id": "p3", "name": "AI Generated - Jazz" }],
                "next": null
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/me/playlists"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    { "id": "p1", "name": "Road Trip" },
                    null,
                    { "id": "p2", "name": "AI Generated - Rock" }
                ],
                "next": format!("{}/me/playlists?limit=50&offset=50", server.uri())
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let playlists = spotify::playlist::list_current_user_playlists(&client)
            .await
            .unwrap();

        let ids: Vec<&str> = playlists.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2", "p3"]);
    }

    #[tokio::test]
    async fn test_find_by_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me/playlists"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    { "id": "p1", "name": "Road Trip" },
                    { "id": "p2", "name": "AI Generated - Rock" }
                ],
                "next": null
            })))
            .mount(&server)
            .await;

        let client = client(&server);
        let found = spotify::playlist::find_by_name(&client, "AI Generated - Rock")
            .await
            .unwrap();
        assert_eq!(found.map(|p| p.id), Some("p2".to_string()));

        let missing = spotify::playlist::find_by_name(&client, "AI Generated - Pop")
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}
