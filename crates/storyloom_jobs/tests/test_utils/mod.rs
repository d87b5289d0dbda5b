//! Mock runners and gateways for job tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use storyloom_core::{
    Character, CharacterImage, Job, MediaPayload, OperationHandle, OperationStatus, VideoRequest,
};
use storyloom_error::{GatewayError, GatewayErrorKind, StoryloomResult};
use storyloom_interface::VideoGateway;
use storyloom_jobs::{JobRunner, ProgressFn};
use tokio::sync::Semaphore;

struct RunnerState {
    gate: Semaphore,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    started: Mutex<Vec<String>>,
    fail_once: Mutex<HashSet<String>>,
    panic_on: Mutex<HashSet<String>>,
}

impl Default for RunnerState {
    fn default() -> Self {
        Self {
            gate: Semaphore::new(0),
            in_flight: AtomicUsize::default(),
            max_in_flight: AtomicUsize::default(),
            started: Mutex::default(),
            fail_once: Mutex::default(),
            panic_on: Mutex::default(),
        }
    }
}

/// Runner whose jobs block until the test releases them.
///
/// Each release lets exactly one blocked job finish.
#[derive(Clone, Default)]
pub struct GatedRunner {
    state: Arc<RunnerState>,
}

impl GatedRunner {
    /// All jobs block until released.
    pub fn new() -> Self {
        Self::default()
    }

    /// Jobs finish immediately.
    pub fn open() -> Self {
        let runner = Self::default();
        runner.release(1_000);
        runner
    }

    /// Let `n` jobs finish.
    pub fn release(&self, n: usize) {
        self.state.gate.add_permits(n);
    }

    /// The next run of `prompt` fails; later runs succeed.
    pub fn fail_once(&self, prompt: &str) {
        self.state.fail_once.lock().unwrap().insert(prompt.to_string());
    }

    /// Every run of `prompt` panics.
    pub fn panic_on(&self, prompt: &str) {
        self.state.panic_on.lock().unwrap().insert(prompt.to_string());
    }

    /// Prompts in dispatch order.
    pub fn started(&self) -> Vec<String> {
        self.state.started.lock().unwrap().clone()
    }

    /// Highest number of jobs observed running at once.
    pub fn max_in_flight(&self) -> usize {
        self.state.max_in_flight.load(Ordering::SeqCst)
    }

    /// Wait until `n` jobs have been dispatched.
    pub async fn wait_started(&self, n: usize) {
        for _ in 0..500 {
            if self.started().len() >= n {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("only {} of {} jobs started", self.started().len(), n);
    }
}

#[async_trait]
impl JobRunner for GatedRunner {
    async fn execute(&self, job: &Job, progress: ProgressFn<'_>) -> StoryloomResult<String> {
        self.state.started.lock().unwrap().push(job.prompt().clone());
        let panics = self.state.panic_on.lock().unwrap().contains(job.prompt());
        if panics {
            panic!("runner blew up on {}", job.prompt());
        }
        let now = self.state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.max_in_flight.fetch_max(now, Ordering::SeqCst);
        progress("Requesting video generation...");

        self.state.gate.acquire().await.unwrap().forget();
        self.state.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.state.fail_once.lock().unwrap().remove(job.prompt()) {
            return Err(GatewayError::new(GatewayErrorKind::Transport("boom".to_string())).into());
        }
        Ok(format!("video_{}.mp4", job.short_id()))
    }
}

#[derive(Default)]
struct VideoState {
    requests: Vec<VideoRequest>,
    polls: usize,
    downloads: Vec<String>,
}

/// Video gateway that finishes after a fixed number of unfinished polls.
#[derive(Clone)]
pub struct MockVideoGateway {
    pending_polls: usize,
    locator: Option<String>,
    error: Option<String>,
    state: Arc<Mutex<VideoState>>,
}

impl MockVideoGateway {
    /// Finishes on the poll after `pending_polls` unfinished ones.
    pub fn finishing_after(pending_polls: usize) -> Self {
        Self {
            pending_polls,
            locator: Some("https://videos.example/v1/files/abc:download?alt=media".to_string()),
            error: None,
            state: Arc::default(),
        }
    }

    /// Finishes without a download link.
    pub fn without_locator(mut self) -> Self {
        self.locator = None;
        self
    }

    /// Finishes with an operation error.
    pub fn with_error(mut self, message: &str) -> Self {
        self.error = Some(message.to_string());
        self.locator = None;
        self
    }

    pub fn requests(&self) -> Vec<VideoRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn polls(&self) -> usize {
        self.state.lock().unwrap().polls
    }

    pub fn downloads(&self) -> Vec<String> {
        self.state.lock().unwrap().downloads.clone()
    }
}

#[async_trait]
impl VideoGateway for MockVideoGateway {
    async fn start_video(&self, req: &VideoRequest) -> StoryloomResult<OperationHandle> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(req.clone());
        Ok(OperationHandle {
            name: format!("operations/mock-{}", state.requests.len()),
        })
    }

    async fn poll_operation(&self, _handle: &OperationHandle) -> StoryloomResult<OperationStatus> {
        let mut state = self.state.lock().unwrap();
        state.polls += 1;
        if state.polls <= self.pending_polls {
            return Ok(OperationStatus::default());
        }
        Ok(OperationStatus {
            done: true,
            locator: self.locator.clone(),
            error: self.error.clone(),
        })
    }

    async fn download_video(&self, locator: &str) -> StoryloomResult<MediaPayload> {
        self.state.lock().unwrap().downloads.push(locator.to_string());
        Ok(MediaPayload::new("video/mp4", b"mp4-bytes".to_vec()))
    }
}

/// Character with `images` one-byte reference images.
pub fn character(name: &str, style: &str, images: usize) -> Character {
    let mut character = Character::new(name, style);
    for i in 0..images {
        character
            .images
            .push(CharacterImage::new(MediaPayload::new("image/png", vec![i as u8 + 1])));
    }
    character
}
