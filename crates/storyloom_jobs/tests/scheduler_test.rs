mod test_utils;

use std::collections::HashSet;
use std::time::Duration;
use storyloom_core::{GenerationStatus, Job};
use storyloom_jobs::JobScheduler;
use test_utils::GatedRunner;

fn jobs(prompts: &[&str]) -> anyhow::Result<Vec<Job>> {
    Ok(prompts
        .iter()
        .map(|p| Job::builder().prompt(*p).build())
        .collect::<Result<Vec<_>, _>>()?)
}

fn ten_prompts() -> Vec<String> {
    (0..10).map(|i| format!("shot {i}")).collect()
}

#[tokio::test]
async fn never_runs_more_than_the_ceiling() -> anyhow::Result<()> {
    let runner = GatedRunner::new();
    let scheduler = JobScheduler::spawn(runner.clone(), 4);
    let prompts = ten_prompts();
    let prompt_refs: Vec<&str> = prompts.iter().map(String::as_str).collect();

    scheduler.enqueue_many(jobs(&prompt_refs)?).await?;
    let snapshot = scheduler.snapshot();
    assert_eq!(snapshot.running(), 4);
    assert_eq!(snapshot.pending(), 6);
    assert!(*snapshot.active());

    runner.wait_started(4).await;
    assert_eq!(runner.started().len(), 4);

    runner.release(10);
    let done = scheduler.wait_idle().await?;

    assert_eq!(done.count(GenerationStatus::Success), 10);
    assert!(runner.max_in_flight() <= 4);
    assert!(!*done.active());
    Ok(())
}

#[tokio::test]
async fn one_completion_promotes_exactly_one_job() -> anyhow::Result<()> {
    let runner = GatedRunner::new();
    let scheduler = JobScheduler::spawn(runner.clone(), 4);
    let prompts = ten_prompts();
    let prompt_refs: Vec<&str> = prompts.iter().map(String::as_str).collect();
    scheduler.enqueue_many(jobs(&prompt_refs)?).await?;
    runner.wait_started(4).await;

    runner.release(1);
    let mut updates = scheduler.subscribe();
    let after = updates
        .wait_for(|s| s.count(GenerationStatus::Success) == 1)
        .await?
        .clone();

    assert_eq!(after.running(), 4);
    assert_eq!(after.pending(), 5);
    runner.wait_started(5).await;
    assert_eq!(runner.started().len(), 5);

    runner.release(10);
    scheduler.wait_idle().await?;
    Ok(())
}

#[tokio::test]
async fn jobs_start_in_submission_order_and_once_each() -> anyhow::Result<()> {
    let runner = GatedRunner::open();
    let scheduler = JobScheduler::spawn(runner.clone(), 1);
    let prompts = ["first", "second", "third", "fourth"];

    scheduler.enqueue_many(jobs(&prompts)?).await?;
    let done = scheduler.wait_idle().await?;

    assert_eq!(runner.started(), prompts.to_vec());
    let unique: HashSet<_> = runner.started().into_iter().collect();
    assert_eq!(unique.len(), prompts.len());
    assert!(done.jobs().iter().all(|j| j
        .result_url()
        .as_deref()
        .is_some_and(|url| url.starts_with("video_") && url.ends_with(".mp4"))));
    Ok(())
}

#[tokio::test]
async fn failed_job_waits_for_explicit_retry() -> anyhow::Result<()> {
    let runner = GatedRunner::open();
    runner.fail_once("flaky shot");
    let scheduler = JobScheduler::spawn(runner.clone(), 4);

    let id = scheduler.enqueue(Job::builder().prompt("flaky shot").build()?).await?;
    let done = scheduler.wait_idle().await?;

    let failed = done.job(&id).cloned().ok_or_else(|| anyhow::anyhow!("job missing"))?;
    assert_eq!(*failed.status(), GenerationStatus::Failed);
    assert_eq!(failed.error().as_deref(), Some("boom"));
    assert_eq!(runner.started().len(), 1);

    scheduler.retry(&id).await?;
    let done = scheduler.wait_idle().await?;

    let retried = done.job(&id).cloned().ok_or_else(|| anyhow::anyhow!("job missing"))?;
    assert_eq!(*retried.status(), GenerationStatus::Success);
    assert_eq!(*retried.error(), None);
    assert_eq!(runner.started().len(), 2);
    Ok(())
}

#[tokio::test]
async fn retry_rejects_successful_and_unknown_jobs() -> anyhow::Result<()> {
    let scheduler = JobScheduler::spawn(GatedRunner::open(), 4);
    let id = scheduler.enqueue(Job::builder().prompt("fine").build()?).await?;
    scheduler.wait_idle().await?;

    assert!(scheduler.retry(&id).await.is_err());
    assert!(scheduler.retry("nope").await.is_err());
    Ok(())
}

#[tokio::test]
async fn progress_updates_only_touch_the_message() -> anyhow::Result<()> {
    let runner = GatedRunner::new();
    let scheduler = JobScheduler::spawn(runner.clone(), 4);
    let id = scheduler.enqueue(Job::builder().prompt("slow").build()?).await?;

    let mut updates = scheduler.subscribe();
    let running = updates
        .wait_for(|s| s.job(&id).is_some_and(|j| j.progress_message().is_some()))
        .await?
        .clone();
    let job = running.job(&id).cloned().ok_or_else(|| anyhow::anyhow!("job missing"))?;
    assert_eq!(*job.status(), GenerationStatus::Running);
    assert_eq!(job.progress_message().as_deref(), Some("Requesting video generation..."));
    assert_eq!(*job.result_url(), None);
    assert_eq!(job.prompt(), "slow");

    runner.release(1);
    scheduler.wait_idle().await?;
    Ok(())
}

#[tokio::test]
async fn shutdown_drains_queued_work() -> anyhow::Result<()> {
    let runner = GatedRunner::open();
    let scheduler = JobScheduler::spawn(runner.clone(), 2);
    scheduler.enqueue_many(jobs(&["a", "b", "c"])?).await?;

    scheduler.shutdown().await;
    assert_eq!(runner.started().len(), 3);
    Ok(())
}

#[tokio::test]
async fn panicking_job_fails_and_frees_its_slot() -> anyhow::Result<()> {
    let runner = GatedRunner::open();
    runner.panic_on("boom");
    let scheduler = JobScheduler::spawn(runner.clone(), 4);
    let ids = scheduler.enqueue_many(jobs(&["boom", "fine"])?).await?;

    let done = tokio::time::timeout(Duration::from_secs(2), scheduler.wait_idle()).await??;

    let boom = done.job(&ids[0]).cloned().ok_or_else(|| anyhow::anyhow!("job missing"))?;
    assert_eq!(*boom.status(), GenerationStatus::Failed);
    assert_eq!(boom.error().as_deref(), Some("Job task panicked"));
    assert_eq!(done.job(&ids[1]).map(|j| *j.status()), Some(GenerationStatus::Success));
    assert!(!*done.active());
    Ok(())
}

#[tokio::test]
async fn removed_pending_job_never_starts() -> anyhow::Result<()> {
    let runner = GatedRunner::new();
    let scheduler = JobScheduler::spawn(runner.clone(), 1);
    let ids = scheduler.enqueue_many(jobs(&["a", "b", "c"])?).await?;
    runner.wait_started(1).await;

    let removed = scheduler.remove(&ids[1]).await?;
    assert_eq!(*removed.status(), GenerationStatus::Pending);
    assert!(scheduler.remove("nope").await.is_err());

    runner.release(10);
    let done = scheduler.wait_idle().await?;

    assert_eq!(runner.started(), vec!["a", "c"]);
    assert_eq!(done.jobs().len(), 2);
    assert!(done.job(&ids[1]).is_none());
    Ok(())
}

#[tokio::test]
async fn removed_running_job_holds_its_slot_until_it_returns() -> anyhow::Result<()> {
    let runner = GatedRunner::new();
    let scheduler = JobScheduler::spawn(runner.clone(), 1);
    let ids = scheduler.enqueue_many(jobs(&["a", "b"])?).await?;
    runner.wait_started(1).await;

    let removed = scheduler.remove(&ids[0]).await?;
    assert_eq!(*removed.status(), GenerationStatus::Running);

    let snapshot = scheduler.snapshot();
    assert_eq!(snapshot.running(), 0);
    assert_eq!(snapshot.pending(), 1);
    assert!(*snapshot.active());
    assert_eq!(runner.started().len(), 1);

    runner.release(10);
    let done = scheduler.wait_idle().await?;

    assert_eq!(runner.started(), vec!["a", "b"]);
    assert_eq!(runner.max_in_flight(), 1);
    assert_eq!(done.jobs().len(), 1);
    assert_eq!(done.job(&ids[1]).map(|j| *j.status()), Some(GenerationStatus::Success));
    Ok(())
}

#[tokio::test]
async fn clear_removes_every_job() -> anyhow::Result<()> {
    let runner = GatedRunner::new();
    let scheduler = JobScheduler::spawn(runner.clone(), 2);
    scheduler.enqueue_many(jobs(&["a", "b", "c", "d"])?).await?;
    runner.wait_started(2).await;

    let removed = scheduler.clear().await?;
    assert_eq!(removed.len(), 4);
    assert!(scheduler.snapshot().jobs().is_empty());

    runner.release(10);
    let done = scheduler.wait_idle().await?;

    assert!(done.jobs().is_empty());
    assert_eq!(runner.started().len(), 2);
    Ok(())
}

#[tokio::test]
async fn pause_stops_new_work_but_lets_running_jobs_finish() -> anyhow::Result<()> {
    let runner = GatedRunner::new();
    let scheduler = JobScheduler::spawn(runner.clone(), 2);
    scheduler.enqueue_many(jobs(&["a", "b", "c", "d"])?).await?;
    runner.wait_started(2).await;

    scheduler.pause().await?;
    runner.release(2);
    let paused = scheduler.wait_idle().await?;

    assert_eq!(paused.count(GenerationStatus::Success), 2);
    assert_eq!(paused.pending(), 2);
    assert!(*paused.paused());
    assert!(!*paused.active());
    assert_eq!(runner.started().len(), 2);

    scheduler.resume().await?;
    runner.release(10);
    let done = scheduler.wait_idle().await?;

    assert_eq!(done.count(GenerationStatus::Success), 4);
    assert!(!*done.paused());
    Ok(())
}

#[tokio::test]
async fn shutdown_while_paused_skips_pending_jobs() -> anyhow::Result<()> {
    let runner = GatedRunner::open();
    let scheduler = JobScheduler::spawn(runner.clone(), 2);
    scheduler.pause().await?;
    scheduler.enqueue_many(jobs(&["a", "b"])?).await?;

    scheduler.shutdown().await;
    assert!(runner.started().is_empty());
    Ok(())
}
