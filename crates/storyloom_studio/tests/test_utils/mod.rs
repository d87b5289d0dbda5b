//! Mock gateway and fetcher for studio tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use storyloom_core::{ImageRequest, MediaPayload};
use storyloom_error::{GatewayError, GatewayErrorKind, StoryloomResult};
use storyloom_interface::{ImageGateway, ReferenceFetcher};

/// A single scripted gateway response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return an image with these bytes
    Image(Vec<u8>),
    /// Return "no image"
    Empty,
    /// Fail with a transport error
    Error(String),
}

/// Records every request; answers from a script, then with a default image.
#[derive(Clone, Default)]
pub struct MockImageGateway {
    requests: Arc<Mutex<Vec<ImageRequest>>>,
    script: Arc<Mutex<VecDeque<MockResponse>>>,
}

impl MockImageGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(responses: Vec<MockResponse>) -> Self {
        let gateway = Self::default();
        *gateway.script.lock().unwrap() = responses.into();
        gateway
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ImageRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Scripts of the scenes requested, in call order.
    pub fn requested_scenes(&self) -> Vec<String> {
        self.requests().iter().filter_map(current_scene).collect()
    }
}

#[async_trait]
impl ImageGateway for MockImageGateway {
    async fn generate_image(&self, req: &ImageRequest) -> StoryloomResult<Option<MediaPayload>> {
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(req.clone());
            requests.len()
        };
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(MockResponse::Image(bytes)) => Ok(Some(MediaPayload::new("image/png", bytes))),
            Some(MockResponse::Empty) => Ok(None),
            Some(MockResponse::Error(message)) => {
                Err(GatewayError::new(GatewayErrorKind::Transport(message)).into())
            }
            None => Ok(Some(MediaPayload::new("image/png", vec![call as u8]))),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-image"
    }
}

/// Decodes data URLs and records which locators were fetched.
#[derive(Clone, Default)]
pub struct MockFetcher {
    fetched: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReferenceFetcher for MockFetcher {
    async fn fetch(&self, locator: &str) -> StoryloomResult<MediaPayload> {
        self.fetched.lock().unwrap().push(locator.to_string());
        if self.fail {
            return Err(GatewayError::new(GatewayErrorKind::Transport(
                "connection reset".to_string(),
            ))
            .into());
        }
        MediaPayload::from_data_url(locator).ok_or_else(|| {
            GatewayError::new(GatewayErrorKind::Base64Decode("bad data url".to_string())).into()
        })
    }
}

/// Extracts the `Current scene: "..."` script from a request.
pub fn current_scene(req: &ImageRequest) -> Option<String> {
    let text = req.parts.last()?.as_text()?;
    let start = text.find("Current scene: \"")? + "Current scene: \"".len();
    let end = text[start..].find('"')? + start;
    Some(text[start..end].to_string())
}

/// Data URL for a tiny fake PNG tagged with `marker`.
pub fn png_url(marker: u8) -> String {
    MediaPayload::new("image/png", vec![marker]).to_data_url()
}
