//! Repair shop demo: one manager fills a levelq queue with repair tasks,
//! a few mechanics drain it from separate threads until the queue hands
//! them the "no task" sentinel.

pub mod priority;

use std::fmt;
use std::sync::Arc;
use std::thread;

use anyhow::{anyhow, Context, Result};
use levelq::{PriorityQueue, QueueConfig, QueueEvent};
use tracing::info;

pub use priority::RepairPriority;

/// Id carried by the sentinel task
pub const NO_TASK_ID: i64 = -1;

/// A car waiting for a mechanic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepairTask {
    pub id: i64,
}

impl RepairTask {
    pub fn new(id: i64) -> Self {
        Self { id }
    }

    /// Handed out when the queue is empty
    pub fn none() -> Self {
        Self { id: NO_TASK_ID }
    }

    pub fn is_none(&self) -> bool {
        self.id == NO_TASK_ID
    }
}

impl fmt::Display for RepairTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "no-task")
        } else {
            write!(f, "task-{}", self.id)
        }
    }
}

pub type RepairQueue = PriorityQueue<RepairTask>;

/// Demo settings, read from `CAR_REPAIR__*` variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopConfig {
    pub tasks: usize,
    pub workers: usize,
    pub queue: QueueConfig,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            tasks: 300,
            workers: 3,
            queue: QueueConfig::default(),
        }
    }
}

impl ShopConfig {
    pub const PREFIX: &'static str = "CAR_REPAIR__";

    /// Defaults overridden by `CAR_REPAIR__TASKS`, `CAR_REPAIR__WORKERS`
    /// and the queue keys understood by [`QueueConfig::from_env`]
    pub fn from_env() -> Result<Self> {
        let mut config = Self {
            queue: QueueConfig::from_env(Self::PREFIX)?,
            ..Self::default()
        };

        if let Ok(tasks) = std::env::var(format!("{}TASKS", Self::PREFIX)) {
            config.tasks = tasks
                .trim()
                .parse()
                .with_context(|| format!("{}TASKS must be a number, got '{}'", Self::PREFIX, tasks))?;
        }
        if let Ok(workers) = std::env::var(format!("{}WORKERS", Self::PREFIX)) {
            config.workers = workers
                .trim()
                .parse()
                .with_context(|| format!("{}WORKERS must be a number, got '{}'", Self::PREFIX, workers))?;
        }
        if config.workers == 0 {
            return Err(anyhow!("{}WORKERS must be at least 1", Self::PREFIX));
        }

        Ok(config)
    }
}

/// Build the shop queue and log every enqueue/dequeue
pub fn open_shop(config: &ShopConfig) -> Result<Arc<RepairQueue>> {
    let levels = RepairPriority::all().iter().map(|priority| priority.level());
    let queue = PriorityQueue::with_config(levels, RepairTask::none(), config.queue.clone())?;

    queue.on_enqueued(log_event);
    queue.on_dequeued(log_event);

    Ok(Arc::new(queue))
}

fn log_event(event: &QueueEvent<RepairTask>) -> anyhow::Result<()> {
    let priority = RepairPriority::from_level(event.priority)
        .map(RepairPriority::name)
        .unwrap_or("none");
    info!(
        "prio: {:>3} ({}) value: {} action: {}",
        event.priority, priority, event.value, event.action
    );
    Ok(())
}

/// Priority the manager assigns to the n-th of `total` tasks
///
/// The first third is medium, the second third high, the rest low.
pub fn priority_for(n: usize, total: usize) -> RepairPriority {
    let third = total / 3;
    if n < third {
        RepairPriority::Medium
    } else if n < 2 * third {
        RepairPriority::High
    } else {
        RepairPriority::Low
    }
}

/// Enqueue `total` tasks numbered from 1
pub fn add_tasks(queue: &RepairQueue, total: usize) -> Result<()> {
    for n in 0..total {
        let task = RepairTask::new(n as i64 + 1);
        queue.enqueue_at(task, priority_for(n, total).level())?;
    }
    info!("Manager queued {} tasks", total);
    Ok(())
}

/// Dequeue until the sentinel comes back; returns the tasks this worker handled
pub fn work_on_tasks(queue: &RepairQueue) -> Result<Vec<RepairTask>> {
    let mut handled = Vec::new();
    while let Some(task) = queue.dequeue()?.into_found() {
        handled.push(task);
    }
    Ok(handled)
}

/// Fill the queue, then let `config.workers` mechanics drain it
///
/// Returns the tasks handled by each worker.
pub fn run(config: &ShopConfig) -> Result<Vec<Vec<RepairTask>>> {
    let queue = open_shop(config)?;
    add_tasks(&queue, config.tasks)?;

    let handles: Vec<_> = (0..config.workers)
        .map(|n| {
            let queue = queue.clone();
            thread::Builder::new()
                .name(format!("mechanic-{}", n + 1))
                .spawn(move || work_on_tasks(&queue))
                .context("failed to spawn worker thread")
        })
        .collect::<Result<_>>()?;

    let mut per_worker = Vec::with_capacity(handles.len());
    for handle in handles {
        let handled = handle
            .join()
            .map_err(|_| anyhow!("worker thread panicked"))??;
        per_worker.push(handled);
    }

    let metrics = queue.metrics();
    info!(
        "Shop closed: {} enqueued, {} repaired, {} empty lookups, {} history records",
        metrics.enqueued,
        metrics.dequeued,
        metrics.empty_dequeues,
        queue.history_len()
    );

    Ok(per_worker)
}
