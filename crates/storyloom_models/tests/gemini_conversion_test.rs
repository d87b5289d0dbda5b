use serde_json::json;
use storyloom_core::{
    AspectRatio, ImageRequest, MediaPayload, RequestPart, VideoModel, VideoRequest,
};
use storyloom_models::{GenerateContentResponse, Operation, conversion};

#[test]
fn generate_content_preserves_part_order() {
    let request = ImageRequest {
        parts: vec![
            RequestPart::Image(MediaPayload::new("image/jpeg", vec![1, 2, 3])),
            RequestPart::Text("Character Ada Identity: ink".to_string()),
            RequestPart::Text("PROMPT".to_string()),
        ],
        model: None,
    };

    let body = serde_json::to_value(conversion::to_generate_content_request(&request)).unwrap();
    let parts = &body["contents"][0]["parts"];

    assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
    assert_eq!(parts[0]["inlineData"]["data"], "AQID");
    assert!(parts[0].get("text").is_none());
    assert_eq!(parts[1]["text"], "Character Ada Identity: ink");
    assert_eq!(parts[2]["text"], "PROMPT");
}

#[test]
fn first_inline_image_skips_text_parts() -> anyhow::Result<()> {
    let response: GenerateContentResponse = serde_json::from_value(json!({
        "candidates": [{
            "content": { "parts": [
                { "text": "Here is your image" },
                { "inlineData": { "mimeType": "image/png", "data": "AQID" } },
                { "inlineData": { "mimeType": "image/png", "data": "BAUG" } }
            ]}
        }]
    }))?;

    let image = conversion::first_inline_image(&response)?;
    assert_eq!(image, Some(MediaPayload::new("image/png", vec![1, 2, 3])));
    Ok(())
}

#[test]
fn text_only_response_has_no_image() -> anyhow::Result<()> {
    let response: GenerateContentResponse = serde_json::from_value(json!({
        "candidates": [{ "content": { "parts": [{ "text": "I cannot draw that" }] } }]
    }))?;
    assert!(conversion::first_inline_image(&response)?.is_none());

    let empty: GenerateContentResponse = serde_json::from_value(json!({}))?;
    assert!(conversion::first_inline_image(&empty)?.is_none());
    Ok(())
}

#[test]
fn predict_request_carries_seed_image_and_parameters() -> anyhow::Result<()> {
    let request = VideoRequest::builder()
        .prompt("A kite over the dunes")
        .model(VideoModel::VeoQuality)
        .aspect_ratio(AspectRatio::Portrait)
        .seed_image(Some(MediaPayload::new("image/png", vec![1, 2, 3])))
        .build()?;

    let body = serde_json::to_value(conversion::to_predict_request(&request)?)?;
    assert_eq!(body["instances"][0]["prompt"], "A kite over the dunes");
    assert_eq!(body["instances"][0]["image"]["bytesBase64Encoded"], "AQID");
    assert_eq!(body["instances"][0]["image"]["mimeType"], "image/png");
    assert_eq!(body["parameters"]["aspectRatio"], "9:16");
    assert_eq!(body["parameters"]["resolution"], "720p");
    assert_eq!(body["parameters"]["sampleCount"], 1);
    Ok(())
}

#[test]
fn text_video_request_omits_image() -> anyhow::Result<()> {
    let request = VideoRequest::builder().prompt("Rain on glass").build()?;
    let body = serde_json::to_value(conversion::to_predict_request(&request)?)?;
    assert!(body["instances"][0].get("image").is_none());
    Ok(())
}

#[test]
fn operation_status_resolves_download_locator() -> anyhow::Result<()> {
    let pending: Operation = serde_json::from_value(json!({ "name": "models/veo/operations/abc" }))?;
    let status = conversion::operation_status(&pending);
    assert!(!status.done);
    assert!(status.locator.is_none());

    let done: Operation = serde_json::from_value(json!({
        "name": "models/veo/operations/abc",
        "done": true,
        "response": { "generateVideoResponse": { "generatedSamples": [
            { "video": { "uri": "https://example.com/files/abc:download?alt=media" } }
        ]}}
    }))?;
    let status = conversion::operation_status(&done);
    assert!(status.done);
    assert_eq!(
        status.locator.as_deref(),
        Some("https://example.com/files/abc:download?alt=media")
    );
    Ok(())
}

#[test]
fn finished_operation_without_samples_has_no_locator() -> anyhow::Result<()> {
    let done: Operation = serde_json::from_value(json!({
        "name": "op",
        "done": true,
        "error": { "code": 3, "message": "prompt rejected" }
    }))?;
    let status = conversion::operation_status(&done);
    assert!(status.done);
    assert!(status.locator.is_none());
    assert_eq!(status.error.as_deref(), Some("prompt rejected (code 3)"));
    Ok(())
}
