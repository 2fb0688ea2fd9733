//! `HttpSynthesizer` against a local axum stub of the `/api/tts` endpoint.

use std::time::Duration;

use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;
use url::Url;
use voxchat_core::VoiceSelector;
use voxchat_speech::{
    HttpSynthesizer, SpeechConfig, SpeechSynthesizer, SynthesisError, SynthesisRequest,
};

async fn serve(router: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Url::parse(&format!("http://{addr}/api/tts")).unwrap()
}

fn synthesizer(endpoint: Url, timeout: Duration) -> HttpSynthesizer {
    HttpSynthesizer::new(&SpeechConfig {
        endpoint,
        default_voice: VoiceSelector::default(),
        request_timeout: timeout,
    })
    .unwrap()
}

fn request(text: &str) -> SynthesisRequest {
    SynthesisRequest {
        text: text.into(),
        model: "playai-tts".into(),
        voice: "Fritz-PlayAI".into(),
    }
}

#[tokio::test]
async fn success_returns_the_audio_body() {
    let endpoint = serve(Router::new().route(
        "/api/tts",
        post(|Json(req): Json<SynthesisRequest>| async move {
            (
                [(header::CONTENT_TYPE, "audio/wav")],
                format!("RIFF|{}|{}|{}", req.model, req.voice, req.text),
            )
        }),
    ))
    .await;

    let audio = synthesizer(endpoint, Duration::from_secs(5))
        .synthesize(&request("Hi & bye"))
        .await
        .unwrap();

    assert_eq!(&audio[..], b"RIFF|playai-tts|Fritz-PlayAI|Hi & bye");
}

#[tokio::test]
async fn terms_required_is_classified() {
    let endpoint = serve(Router::new().route(
        "/api/tts",
        post(|| async {
            (
                StatusCode::FORBIDDEN,
                Json(json!({
                    "success": false,
                    "error": "TTS requires terms acceptance.",
                    "error_type": "terms_required",
                })),
            )
                .into_response()
        }),
    ))
    .await;

    let err = synthesizer(endpoint, Duration::from_secs(5))
        .synthesize(&request("hello"))
        .await
        .unwrap_err();

    match err {
        SynthesisError::TermsRequired { message } => {
            assert_eq!(message, "TTS requires terms acceptance.");
        }
        other => panic!("expected TermsRequired, got {other:?}"),
    }
}

#[tokio::test]
async fn server_error_is_a_rejection_with_its_message() {
    let endpoint = serve(Router::new().route(
        "/api/tts",
        post(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": "Upstream exploded" })),
            )
        }),
    ))
    .await;

    let err = synthesizer(endpoint, Duration::from_secs(5))
        .synthesize(&request("hello"))
        .await
        .unwrap_err();

    assert!(
        matches!(err, SynthesisError::Rejected { status: 500, ref message } if message == "Upstream exploded"),
        "got {err:?}"
    );
    assert_eq!(err.kind(), "rejected");
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let endpoint = Url::parse(&format!("http://{addr}/api/tts")).unwrap();

    let err = synthesizer(endpoint, Duration::from_secs(5))
        .synthesize(&request("hello"))
        .await
        .unwrap_err();

    assert!(matches!(err, SynthesisError::Transport(_)), "got {err:?}");
}

#[tokio::test]
async fn slow_endpoint_times_out() {
    let endpoint = serve(Router::new().route(
        "/api/tts",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "too late"
        }),
    ))
    .await;

    let err = synthesizer(endpoint, Duration::from_millis(200))
        .synthesize(&request("hello"))
        .await
        .unwrap_err();

    assert!(matches!(err, SynthesisError::Transport(_)), "got {err:?}");
}
