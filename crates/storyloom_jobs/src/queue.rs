//! FIFO job queue with state-machine-checked updates.

use storyloom_core::{GenerationStatus, Job, JobPatch};
use storyloom_error::{JobError, JobErrorKind, StoryloomResult};

/// Ordered collection of jobs in submission order.
///
/// The queue never runs anything itself. [`JobQueue::schedule_pass`] decides
/// which pending jobs may start; the caller dispatches them.
#[derive(Debug, Clone, Default)]
pub struct JobQueue {
    jobs: Vec<Job>,
}

impl JobQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a job and returns its id.
    pub fn enqueue(&mut self, job: Job) -> String {
        let id = job.id().clone();
        tracing::debug!(job = %job.short_id(), "Job enqueued");
        self.jobs.push(job);
        id
    }

    /// Appends several jobs, preserving their order.
    pub fn enqueue_many(&mut self, jobs: impl IntoIterator<Item = Job>) -> Vec<String> {
        jobs.into_iter().map(|job| self.enqueue(job)).collect()
    }

    /// All jobs in submission order.
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// Looks up a job.
    pub fn get(&self, id: &str) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id() == id)
    }

    /// Removes a job in any state.
    ///
    /// Removing a Running job does not stop its worker; the caller decides
    /// what happens to its outcome.
    pub fn remove(&mut self, id: &str) -> StoryloomResult<Job> {
        let pos = self.position(id)?;
        tracing::debug!(job = %self.jobs[pos].short_id(), "Job removed");
        Ok(self.jobs.remove(pos))
    }

    /// Removes every job, returning them in submission order.
    pub fn clear(&mut self) -> Vec<Job> {
        std::mem::take(&mut self.jobs)
    }

    /// Applies a patch, rejecting status moves the state machine forbids.
    ///
    /// Patches without a status (progress updates) are always accepted.
    /// Returns true when anything changed.
    pub fn patch(&mut self, id: &str, patch: JobPatch) -> StoryloomResult<bool> {
        let pos = self.position(id)?;
        let job = &mut self.jobs[pos];
        if let Some(next) = patch.status {
            let current = *job.status();
            if current != next && !current.can_transition_to(next) {
                return Err(JobError::new(JobErrorKind::InvalidTransition {
                    job: id.to_string(),
                    from: current.to_string(),
                    to: next.to_string(),
                })
                .into());
            }
        }
        Ok(job.apply(patch))
    }

    /// Moves a Failed job back to Pending with its error cleared.
    pub fn retry(&mut self, id: &str) -> StoryloomResult<()> {
        let pos = self.position(id)?;
        let current = *self.jobs[pos].status();
        if current != GenerationStatus::Failed {
            return Err(JobError::new(JobErrorKind::InvalidTransition {
                job: id.to_string(),
                from: current.to_string(),
                to: GenerationStatus::Pending.to_string(),
            })
            .into());
        }
        self.jobs[pos].apply(JobPatch::retry());
        Ok(())
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

    /// True when nothing is running or waiting.
    pub fn is_idle(&self) -> bool {
        self.running() == 0 && self.pending() == 0
    }

    /// Promotes pending jobs to Running up to `ceiling` concurrent jobs.
    ///
    /// Jobs are taken in FIFO order. Returns the ids that were promoted; each
    /// of them must be dispatched exactly once.
    pub fn schedule_pass(&mut self, ceiling: usize) -> Vec<String> {
        let running = self.running();
        if running >= ceiling {
            return Vec::new();
        }

        let mut promoted = Vec::new();
        for job in self
            .jobs
            .iter_mut()
            .filter(|j| *j.status() == GenerationStatus::Pending)
            .take(ceiling - running)
        {
            job.apply(JobPatch::running());
            promoted.push(job.id().clone());
        }
        promoted
    }

    fn position(&self, id: &str) -> StoryloomResult<usize> {
        self.jobs
            .iter()
            .position(|j| j.id() == id)
            .ok_or_else(|| JobError::new(JobErrorKind::NotFound(id.to_string())).into())
    }
}
