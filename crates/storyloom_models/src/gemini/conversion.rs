//! Type conversions between Storyloom and Gemini REST types.

use super::dto::{
    Content, GenerateContentRequest, GenerateContentResponse, InlineData, Operation, Part,
    PredictRequest, VideoImage, VideoInstance, VideoParameters,
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use storyloom_core::{ImageRequest, MediaPayload, OperationStatus, RequestPart, VideoRequest};
use storyloom_error::{BuilderError, GatewayError, GatewayErrorKind, StoryloomResult};

/// Converts an ordered Storyloom bundle into a `generateContent` body.
///
/// Part order is preserved exactly.
pub fn to_generate_content_request(request: &ImageRequest) -> GenerateContentRequest {
    let parts = request
        .parts
        .iter()
        .map(|part| match part {
            RequestPart::Image(payload) => {
                Part::inline(InlineData::new(payload.mime.clone(), payload.to_base64()))
            }
            RequestPart::Text(text) => Part::text(text.clone()),
        })
        .collect();
    GenerateContentRequest::new(Content::new(parts))
}

/// Extracts the first inline image of the first candidate.
///
/// Returns `Ok(None)` when the response carries no inline data.
pub fn first_inline_image(
    response: &GenerateContentResponse,
) -> StoryloomResult<Option<MediaPayload>> {
    let Some(content) = response.candidates().first().and_then(|c| c.content().as_ref()) else {
        return Ok(None);
    };

    let Some(inline) = content.parts().iter().find_map(|p| p.inline_data().as_ref()) else {
        return Ok(None);
    };

    let data = STANDARD.decode(inline.data()).map_err(|e| {
        GatewayError::new(GatewayErrorKind::Base64Decode(e.to_string()))
    })?;

    let mime = if inline.mime_type().is_empty() {
        "image/png".to_string()
    } else {
        inline.mime_type().clone()
    };

    Ok(Some(MediaPayload::new(mime, data)))
}

/// Converts a video request into a `predictLongRunning` body.
pub fn to_predict_request(request: &VideoRequest) -> StoryloomResult<PredictRequest> {
    let image = request
        .seed_image()
        .as_ref()
        .map(|seed| VideoImage::new(seed.to_base64(), seed.mime.clone()));

    let instance = VideoInstance::builder()
        .prompt(request.prompt().clone())
        .image(image)
        .build()
        .map_err(|e| BuilderError::from(format!("Failed to build video instance: {}", e)))?;

    let parameters = VideoParameters::builder()
        .aspect_ratio(request.aspect_ratio().to_string())
        .resolution(request.resolution().clone())
        .sample_count(*request.sample_count())
        .build()
        .map_err(|e| BuilderError::from(format!("Failed to build video parameters: {}", e)))?;

    Ok(PredictRequest::new(vec![instance], parameters))
}

/// Reads the state of a video operation.
///
/// The download locator lives at
/// `response.generateVideoResponse.generatedSamples[0].video.uri`.
pub fn operation_status(operation: &Operation) -> OperationStatus {
    let locator = operation.response().as_ref().and_then(|response| {
        response
            .pointer("/generateVideoResponse/generatedSamples/0/video/uri")
            .or_else(|| response.pointer("/generatedVideos/0/video/uri"))
            .and_then(|uri| uri.as_str())
            .map(str::to_string)
    });

    OperationStatus {
        done: *operation.done(),
        locator,
        error: operation
            .error()
            .as_ref()
            .map(|e| format!("{} (code {})", e.message(), e.code())),
    }
}
