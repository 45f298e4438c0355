//! Fail-fast task groups.
//!
//! A [`TaskGroup`] runs a fixed set of tasks to completion. The first task to
//! fail cancels the group token, every interrupt handler is called with that
//! error, and `run` returns it once all tasks have exited.

use std::{any::Any, fmt, future::Future, panic::AssertUnwindSafe};

use futures::FutureExt;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

type Interrupt<E> = Box<dyn FnOnce(&E) + Send>;

/// A task panicked instead of returning
#[derive(Debug, Clone, thiserror::Error)]
#[error("task {task} panicked: {message}")]
pub struct TaskPanicked {
  pub task: String,
  pub message: String,
}

pub struct TaskGroup<E> {
  cancel: CancellationToken,
  tasks: JoinSet<(String, Result<(), E>)>,
  interrupts: Vec<Interrupt<E>>,
}

impl<E> TaskGroup<E>
where
  E: From<TaskPanicked> + fmt::Display + Send + 'static,
{
  /// Create a group whose token is a child of `parent`.
  ///
  /// Cancelling the parent cancels the group; a failure inside the group
  /// never cancels the parent.
  pub fn new(parent: &CancellationToken) -> Self {
    Self {
      cancel: parent.child_token(),
      tasks: JoinSet::new(),
      interrupts: Vec::new(),
    }
  }

  /// Token that fires when the group is interrupted
  pub fn token(&self) -> CancellationToken {
    self.cancel.clone()
  }

  /// Tasks spawned and not yet joined
  pub(crate) fn len(&self) -> usize {
    self.tasks.len()
  }

  /// Start a task immediately.
  ///
  /// `interrupt` runs once if any task in the group fails, including this one.
  pub fn spawn<F, I>(&mut self, name: impl Into<String>, task: F, interrupt: I)
  where
    F: Future<Output = Result<(), E>> + Send + 'static,
    I: FnOnce(&E) + Send + 'static,
  {
    let name = name.into();
    trace!(task = %name, "Spawning task");
    self.interrupts.push(Box::new(interrupt));
    self.tasks.spawn(async move {
      let outcome = match AssertUnwindSafe(task).catch_unwind().await {
        Ok(outcome) => outcome,
        Err(payload) => Err(E::from(TaskPanicked {
          task: name.clone(),
          message: panic_message(payload),
        })),
      };
      (name, outcome)
    });
  }

  /// Wait for every task to finish.
  ///
  /// Returns the first error observed. Errors from tasks that fail while the
  /// group is already shutting down are logged and dropped.
  pub async fn run(mut self) -> Result<(), E> {
    let mut first: Option<E> = None;

    while let Some(joined) = self.tasks.join_next().await {
      let (name, outcome) = match joined {
        Ok(joined) => joined,
        Err(e) => (
          "unknown".to_string(),
          Err(E::from(TaskPanicked {
            task: "unknown".to_string(),
            message: e.to_string(),
          })),
        ),
      };

      match outcome {
        Ok(()) => trace!(task = %name, "Task finished"),
        Err(e) if first.is_none() => {
          debug!(task = %name, error = %e, "Task failed, interrupting group");
          self.cancel.cancel();
          for interrupt in self.interrupts.drain(..) {
            interrupt(&e);
          }
          first = Some(e);
        }
        Err(e) => trace!(task = %name, error = %e, "Task failed after group was interrupted"),
      }
    }

    match first {
      Some(e) => Err(e),
      None => Ok(()),
    }
  }
}

/// Interrupt handler that logs which task was stopped and why
pub fn log_interrupt<E: fmt::Display>(name: &'static str) -> impl FnOnce(&E) + Send + 'static {
  move |err: &E| debug!("The {} actor was interrupted with: {}", name, err)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
  if let Some(s) = payload.downcast_ref::<&str>() {
    s.to_string()
  } else if let Some(s) = payload.downcast_ref::<String>() {
    s.clone()
  } else {
    "unknown panic".to_string()
  }
}
