//! Event-driven bounded scheduler for video jobs.
//!
//! A single control task owns the [`JobQueue`]. Submissions, retries and job
//! completions all arrive as messages; after each one the task runs a
//! scheduling pass, spawns one worker per promoted job and publishes a fresh
//! [`SchedulerSnapshot`]. Nothing polls.
//!
//! Pausing only stops new promotions; in-flight jobs always run to
//! completion. A job removed while Running keeps its slot until its worker
//! returns, and its outcome is discarded.

use crate::JobQueue;
use derive_getters::Getters;
use std::collections::HashSet;
use std::sync::Arc;
use storyloom_core::{GenerationStatus, Job, JobPatch};
use storyloom_error::{JobError, JobErrorKind, StoryloomResult};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::Instrument;

/// Default number of jobs allowed to run at once.
pub const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Progress callback handed to a running job.
pub type ProgressFn<'a> = &'a (dyn Fn(&str) + Send + Sync);

/// Work performed for one promoted job.
#[async_trait::async_trait]
pub trait JobRunner: Send + Sync + 'static {
    /// Run `job` to completion and return its result locator.
    ///
    /// Messages passed to `progress` only update the job's progress message.
    async fn execute(&self, job: &Job, progress: ProgressFn<'_>) -> StoryloomResult<String>;
}

/// Point-in-time view of the scheduler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters)]
pub struct SchedulerSnapshot {
    /// Jobs in submission order
    jobs: Vec<Job>,
    /// Whether the control loop considers itself busy
    active: bool,
    /// Concurrency ceiling
    ceiling: usize,
    /// Whether promotions are suspended
    paused: bool,
}

impl SchedulerSnapshot {
    /// Looks up a job.
    pub fn job(&self, id: &str) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id() == id)
    }

    /// Number of jobs in `status`.
    pub fn count(&self, status: GenerationStatus) -> usize {
        self.jobs.iter().filter(|j| *j.status() == status).count()
    }

    /// Number of running jobs.
    pub fn running(&self) -> usize {
        self.count(GenerationStatus::Running)
    }

    /// Number of pending jobs.
    pub fn pending(&self) -> usize {
        self.count(GenerationStatus::Pending)
    }
}

enum Command {
    Enqueue {
        jobs: Vec<Job>,
        reply: oneshot::Sender<Vec<String>>,
    },
    Retry {
        id: String,
        reply: oneshot::Sender<StoryloomResult<()>>,
    },
    Remove {
        id: String,
        reply: oneshot::Sender<StoryloomResult<Job>>,
    },
    Clear {
        reply: oneshot::Sender<Vec<Job>>,
    },
    SetPaused {
        paused: bool,
        reply: oneshot::Sender<()>,
    },
}

enum Event {
    Progress { id: String, message: String },
    Finished { id: String, result: Result<String, String> },
}

/// Handle to a running job scheduler.
///
/// At most `ceiling` jobs are Running at any time. Pending jobs start in
/// submission order as slots free up. Failed jobs stay Failed until
/// [`JobScheduler::retry`] is called.
pub struct JobScheduler {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<SchedulerSnapshot>,
    control: JoinHandle<()>,
}

impl JobScheduler {
    /// Start the control loop on the current Tokio runtime.
    ///
    /// A ceiling of zero is raised to one.
    pub fn spawn<R: JobRunner>(runner: R, ceiling: usize) -> Self {
        let ceiling = ceiling.max(1);
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (events, event_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshots) = watch::channel(SchedulerSnapshot {
            ceiling,
            ..SchedulerSnapshot::default()
        });

        let control_loop = ControlLoop {
            queue: JobQueue::new(),
            runner: Arc::new(runner),
            ceiling,
            events,
            snapshots: snapshot_tx,
            active: false,
            paused: false,
            detached: HashSet::new(),
        };
        let control = tokio::spawn(control_loop.run(command_rx, event_rx));
        tracing::debug!(ceiling, "Job scheduler started");

        Self {
            commands,
            snapshots,
            control,
        }
    }

    /// Submit one job. Returns its id.
    pub async fn enqueue(&self, job: Job) -> StoryloomResult<String> {
        let mut ids = self.enqueue_many(vec![job]).await?;
        ids.pop()
            .ok_or_else(|| JobError::new(JobErrorKind::SchedulerStopped).into())
    }

    /// Submit several jobs in order. Returns their ids.
    pub async fn enqueue_many(&self, jobs: Vec<Job>) -> StoryloomResult<Vec<String>> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Enqueue { jobs, reply })?;
        rx.await
            .map_err(|_| JobError::new(JobErrorKind::SchedulerStopped).into())
    }

    /// Move a Failed job back to Pending and reschedule.
    ///
    /// # Errors
    ///
    /// `NotFound`, or `InvalidTransition` when the job is not Failed.
    pub async fn retry(&self, id: &str) -> StoryloomResult<()> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Retry {
            id: id.to_string(),
            reply,
        })?;
        match rx.await {
            Ok(result) => result,
            Err(_) => Err(JobError::new(JobErrorKind::SchedulerStopped).into()),
        }
    }

    /// Remove a job in any state.
    ///
    /// A Running job keeps its worker and its concurrency slot until the
    /// worker returns; the outcome is then dropped.
    ///
    /// # Errors
    ///
    /// `NotFound` when no job has this id.
    pub async fn remove(&self, id: &str) -> StoryloomResult<Job> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Remove {
            id: id.to_string(),
            reply,
        })?;
        match rx.await {
            Ok(result) => result,
            Err(_) => Err(JobError::new(JobErrorKind::SchedulerStopped).into()),
        }
    }

    /// Remove every job. Returns what was removed.
    pub async fn clear(&self) -> StoryloomResult<Vec<Job>> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Clear { reply })?;
        rx.await
            .map_err(|_| JobError::new(JobErrorKind::SchedulerStopped).into())
    }

    /// Stop starting new jobs. Running jobs finish normally.
    pub async fn pause(&self) -> StoryloomResult<()> {
        self.set_paused(true).await
    }

    /// Resume promoting Pending jobs.
    pub async fn resume(&self) -> StoryloomResult<()> {
        self.set_paused(false).await
    }

    /// Latest published state.
    pub fn snapshot(&self) -> SchedulerSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver that observes every published state.
    pub fn subscribe(&self) -> watch::Receiver<SchedulerSnapshot> {
        self.snapshots.clone()
    }

    /// Wait until nothing is running, and nothing is pending unless paused.
    pub async fn wait_idle(&self) -> StoryloomResult<SchedulerSnapshot> {
        let mut rx = self.snapshots.clone();
        let snapshot = rx
            .wait_for(|s| !s.active)
            .await
            .map_err(|_| JobError::new(JobErrorKind::SchedulerStopped))?;
        Ok(snapshot.clone())
    }

    /// Stop accepting commands and wait for outstanding work.
    ///
    /// Pending jobs still run unless the scheduler is paused, in which case
    /// only in-flight jobs are awaited.
    pub async fn shutdown(self) {
        drop(self.commands);
        if let Err(e) = self.control.await {
            tracing::error!(error = %e, "Job scheduler task ended abnormally");
        }
    }

    async fn set_paused(&self, paused: bool) -> StoryloomResult<()> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::SetPaused { paused, reply })?;
        rx.await
            .map_err(|_| JobError::new(JobErrorKind::SchedulerStopped).into())
    }

    fn send(&self, command: Command) -> StoryloomResult<()> {
        self.commands
            .send(command)
            .map_err(|_| JobError::new(JobErrorKind::SchedulerStopped).into())
    }
}

struct ControlLoop<R: JobRunner> {
    queue: JobQueue,
    runner: Arc<R>,
    ceiling: usize,
    events: mpsc::UnboundedSender<Event>,
    snapshots: watch::Sender<SchedulerSnapshot>,
    active: bool,
    paused: bool,
    // Removed while Running; each still occupies a slot.
    detached: HashSet<String>,
}

impl<R: JobRunner> ControlLoop<R> {
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut events: mpsc::UnboundedReceiver<Event>,
    ) {
        let mut accepting = true;
        loop {
            tokio::select! {
                command = commands.recv(), if accepting => match command {
                    Some(command) => self.handle_command(command),
                    None => accepting = false,
                },
                Some(event) = events.recv() => self.handle_event(event),
                else => break,
            }
            self.reschedule();

            if !accepting && !self.active {
                break;
            }
        }
        tracing::debug!("Job scheduler stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Enqueue { jobs, reply } => {
                let ids = self.queue.enqueue_many(jobs);
                tracing::info!(count = ids.len(), "Jobs submitted");
                self.reschedule();
                let _ = reply.send(ids);
            }
            Command::Retry { id, reply } => {
                let result = self.queue.retry(&id);
                if result.is_ok() {
                    tracing::info!(job = %id, "Job queued for retry");
                }
                self.reschedule();
                let _ = reply.send(result);
            }
            Command::Remove { id, reply } => {
                let result = self.queue.remove(&id);
                if let Ok(job) = &result {
                    self.detach(job);
                }
                self.reschedule();
                let _ = reply.send(result);
            }
            Command::Clear { reply } => {
                let removed = self.queue.clear();
                for job in &removed {
                    self.detach(job);
                }
                tracing::info!(count = removed.len(), "Job queue cleared");
                self.reschedule();
                let _ = reply.send(removed);
            }
            Command::SetPaused { paused, reply } => {
                if self.paused != paused {
                    tracing::info!(paused, "Job scheduler promotion toggled");
                }
                self.paused = paused;
                self.reschedule();
                let _ = reply.send(());
            }
        }
    }

    fn detach(&mut self, job: &Job) {
        if *job.status() == GenerationStatus::Running {
            self.detached.insert(job.id().clone());
        }
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Progress { id, message } => {
                let running = self
                    .queue
                    .get(&id)
                    .is_some_and(|j| *j.status() == GenerationStatus::Running);
                if !running {
                    return;
                }
                if let Err(e) = self.queue.patch(&id, JobPatch::progress(message)) {
                    tracing::warn!(job = %id, error = %e, "Dropped progress update");
                }
            }
            Event::Finished { id, result } => {
                if self.detached.remove(&id) {
                    tracing::debug!(job = %id, "Discarded outcome of removed job");
                    return;
                }
                let patch = match result {
                    Ok(locator) => {
                        tracing::info!(job = %id, result = %locator, "Job succeeded");
                        JobPatch::succeeded(locator)
                    }
                    Err(message) => {
                        tracing::warn!(job = %id, error = %message, "Job failed");
                        JobPatch::failed(message)
                    }
                };
                if let Err(e) = self.queue.patch(&id, patch) {
                    tracing::error!(job = %id, error = %e, "Could not record job outcome");
                }
            }
        }
    }

    fn reschedule(&mut self) {
        if !self.paused {
            let ceiling = self.ceiling.saturating_sub(self.detached.len());
            for id in self.queue.schedule_pass(ceiling) {
                self.dispatch(id);
            }
        }

        let idle = self.queue.running() == 0
            && self.detached.is_empty()
            && (self.paused || self.queue.pending() == 0);
        if self.active && idle {
            tracing::info!(jobs = self.queue.jobs().len(), "Job scheduler idle");
        } else if !self.active && !idle {
            tracing::debug!("Job scheduler active");
        }
        self.active = !idle;

        self.snapshots.send_replace(SchedulerSnapshot {
            jobs: self.queue.jobs().to_vec(),
            active: self.active,
            ceiling: self.ceiling,
            paused: self.paused,
        });
    }

    fn dispatch(&self, id: String) {
        let Some(job) = self.queue.get(&id).cloned() else {
            return;
        };
        let runner = Arc::clone(&self.runner);
        let events = self.events.clone();
        let span = tracing::info_span!("job", job = %job.short_id(), model = %job.model());

        tokio::spawn(
            async move {
                tracing::debug!(running_prompt = %job.prompt(), "Job dispatched");
                let progress = {
                    let events = events.clone();
                    let id = id.clone();
                    move |message: &str| {
                        let _ = events.send(Event::Progress {
                            id: id.clone(),
                            message: message.to_string(),
                        });
                    }
                };
                let work = tokio::spawn(
                    async move {
                        runner
                            .execute(&job, &progress)
                            .await
                            .map_err(|e| e.user_message())
                    }
                    .in_current_span(),
                );
                let result = match work.await {
                    Ok(result) => result,
                    Err(e) => {
                        tracing::error!(error = %e, "Job worker panicked");
                        Err("Job task panicked".to_string())
                    }
                };
                let _ = events.send(Event::Finished { id, result });
            }
            .instrument(span),
        );
    }
}
