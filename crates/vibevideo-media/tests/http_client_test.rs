use mockito::Matcher;
use vibevideo_media::{
    classify_file, ChatOutcome, HttpMediaClient, MediaApiConfig, MediaProcessingClient, ProcessOutcome,
};
use vibevideo_types::{MediaFile, MediaKind};

fn client_for(server: &mockito::ServerGuard) -> HttpMediaClient {
    HttpMediaClient::new(MediaApiConfig::new(server.url())).unwrap()
}

fn video(name: &str) -> MediaFile {
    MediaFile::new(name, "video/mp4", b"fake-video-bytes".to_vec())
}

#[tokio::test]
async fn test_send_message_reads_message_field() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat")
        .match_body(Matcher::UrlEncoded("message".into(), "hello there".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "Upload a file to get started"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let outcome = client.send_message("hello there").await.unwrap();

    assert_eq!(outcome, ChatOutcome::Reply("Upload a file to get started".to_string()));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_send_message_without_reply_text_is_acknowledged() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status": "ok"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let outcome = client.send_message("speed up video by 2x").await.unwrap();

    assert_eq!(outcome, ChatOutcome::Acknowledged);
}

#[tokio::test]
async fn test_send_message_non_2xx_is_failed_outcome() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat")
        .with_status(503)
        .with_body("maintenance")
        .create_async()
        .await;

    let client = client_for(&server);
    let outcome = client.send_message("hi").await.unwrap();

    assert_eq!(outcome, ChatOutcome::Failed("API Error: 503 - maintenance".to_string()));
}

#[tokio::test]
async fn test_process_file_binary_response_is_normalized() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/process")
        .match_body(Matcher::Regex("speed up".to_string()))
        .with_status(200)
        .with_header("content-type", "application/octet-stream")
        .with_header("content-disposition", "attachment; filename=\"clip_fast.mp4\"")
        .with_body(b"processed".to_vec())
        .create_async()
        .await;

    let client = client_for(&server);
    let outcome = client.process_file(&video("clip.mp4"), "speed up").await.unwrap();

    match outcome {
        ProcessOutcome::Processed { file, .. } => {
            assert_eq!(file.name, "processed_clip.mp4");
            assert_eq!(file.mime_type, "video/mp4");
            assert_eq!(&*file.data, b"processed");
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_process_file_json_without_artifact_is_empty() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/process")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "queued"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let outcome = client.process_file(&video("clip.mp4"), "grayscale").await.unwrap();

    assert!(matches!(outcome, ProcessOutcome::Empty { ref message } if message == "queued"));
}

#[tokio::test]
async fn test_process_file_json_inline_payload() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/process")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"base64": "data:audio/wav;base64,AAEC", "name": "clean.wav"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let outcome = client.process_file(&video("talk.mp4"), "enhance audio").await.unwrap();

    match outcome {
        ProcessOutcome::Processed { file, .. } => {
            assert_eq!(file.name, "clean.wav");
            // The data URL names the type; the uploaded video's type does not leak in
            assert_eq!(file.mime_type, "audio/wav");
            assert_eq!(&*file.data, &[0u8, 1, 2]);
            assert_eq!(classify_file(&file), MediaKind::Audio);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_extracted_audio_lands_in_audio_gallery() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/process")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data": "data:audio/mpeg;base64,AAEC", "name": "extracted.mp3"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let outcome = client.process_file(&video("talk.mp4"), "extract audio").await.unwrap();

    match outcome {
        ProcessOutcome::Processed { file, .. } => {
            assert_eq!(file.name, "extracted.mp3");
            assert_eq!(file.mime_type, "audio/mpeg");
            assert_eq!(classify_file(&file), MediaKind::Audio);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_remote_url_uses_fetched_content_type() {
    let mut server = mockito::Server::new_async().await;
    let url = format!("{}/files/out.mp3", server.url());
    server
        .mock("POST", "/process")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(r#"{{"url": "{}"}}"#, url))
        .create_async()
        .await;
    let download = server
        .mock("GET", "/files/out.mp3")
        .with_status(200)
        .with_header("content-type", "audio/mpeg")
        .with_body(b"mp3-bytes".to_vec())
        .create_async()
        .await;

    let client = client_for(&server);
    let outcome = client.process_file(&video("talk.mp4"), "extract audio").await.unwrap();

    match outcome {
        ProcessOutcome::Processed { file, .. } => {
            assert_eq!(file.mime_type, "audio/mpeg");
            assert_eq!(&*file.data, b"mp3-bytes");
            assert_eq!(classify_file(&file), MediaKind::Audio);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    download.assert_async().await;
}

#[tokio::test]
async fn test_remote_url_declared_type_wins() {
    let mut server = mockito::Server::new_async().await;
    let url = format!("{}/files/blob", server.url());
    server
        .mock("POST", "/process")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(r#"{{"url": "{}", "type": "video/webm", "name": "cut.webm"}}"#, url))
        .create_async()
        .await;
    server
        .mock("GET", "/files/blob")
        .with_status(200)
        .with_header("content-type", "application/octet-stream")
        .with_body(b"webm".to_vec())
        .create_async()
        .await;

    let client = client_for(&server);
    let outcome = client.process_file(&video("talk.mp4"), "cut").await.unwrap();

    assert!(matches!(
        outcome,
        ProcessOutcome::Processed { ref file, .. } if file.mime_type == "video/webm" && file.name == "cut.webm"
    ));
}

#[tokio::test]
async fn test_process_file_json_error_field() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/process")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error": "unsupported codec"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let outcome = client.process_file(&video("clip.mp4"), "cut").await.unwrap();

    assert!(matches!(outcome, ProcessOutcome::Failed { ref error } if error == "API Error: unsupported codec"));
}

#[tokio::test]
async fn test_process_file_error_status_uses_detail() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/process")
        .with_status(422)
        .with_body(r#"{"detail": "could not parse time range"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let outcome = client.process_file(&video("clip.mp4"), "cut from x").await.unwrap();

    assert!(matches!(
        outcome,
        ProcessOutcome::Failed { ref error } if error == "Processing error: 422 - could not parse time range"
    ));
}

#[tokio::test]
async fn test_process_file_empty_body_is_failure() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/process")
        .with_status(200)
        .with_header("content-type", "application/octet-stream")
        .create_async()
        .await;

    let client = client_for(&server);
    let outcome = client.process_file(&video("clip.mp4"), "cut").await.unwrap();

    assert!(matches!(outcome, ProcessOutcome::Failed { .. }));
}

#[tokio::test]
async fn test_unsupported_upload_is_rejected_without_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server.mock("POST", "/process").expect(0).create_async().await;

    let client = client_for(&server);
    let doc = MediaFile::new("notes.pdf", "application/pdf", vec![1u8]);
    let outcome = client.process_file(&doc, "speed up").await.unwrap();

    assert!(matches!(outcome, ProcessOutcome::Failed { ref error } if error.starts_with("Unsupported file type")));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_oversized_upload_is_rejected() {
    let server = mockito::Server::new_async().await;
    let client = HttpMediaClient::new(MediaApiConfig::new(server.url()).with_max_upload_mb(0)).unwrap();

    let outcome = client.process_file(&video("big.mp4"), "speed up").await.unwrap();

    assert!(matches!(outcome, ProcessOutcome::Failed { ref error } if error.starts_with("File too large")));
}

#[tokio::test]
async fn test_merge_falls_back_to_process_on_404() {
    let mut server = mockito::Server::new_async().await;
    let merge = server.mock("POST", "/merge").with_status(404).create_async().await;
    let process = server
        .mock("POST", "/process")
        .match_body(Matcher::Regex("name=\"command\"".to_string()))
        .with_status(200)
        .with_header("content-type", "application/octet-stream")
        .with_body(b"merged-bytes".to_vec())
        .create_async()
        .await;

    let client = client_for(&server);
    let files = vec![video("part1.mp4"), MediaFile::new("music.mp3", "audio/mpeg", b"mp3".to_vec())];
    let outcome = client.process_multiple_files(&files, "merge", None).await.unwrap();

    match outcome {
        ProcessOutcome::Processed { file, message } => {
            assert_eq!(file.name, "merged_part1.mp4");
            assert_eq!(file.mime_type, "video/mp4");
            assert_eq!(message, "Files merged successfully!");
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    merge.assert_async().await;
    process.assert_async().await;
}

#[tokio::test]
async fn test_merge_error_status() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/merge")
        .with_status(500)
        .with_body("ffmpeg crashed")
        .create_async()
        .await;

    let client = client_for(&server);
    let files = vec![video("a.mp4"), video("b.mp4")];
    let outcome = client.process_multiple_files(&files, "merge", Some("b,a")).await.unwrap();

    assert!(matches!(outcome, ProcessOutcome::Failed { ref error } if error == "Merge failed: 500 - ffmpeg crashed"));
}

#[tokio::test]
async fn test_transport_error_is_err() {
    // Nothing listens on this port
    let client = HttpMediaClient::new(MediaApiConfig::new("http://127.0.0.1:9")).unwrap();
    let result = client.process_file(&video("clip.mp4"), "speed up").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_check_health() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/health")
        .with_status(200)
        .with_body(r#"{"ok": true}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    assert!(client.check_health().await);
}
