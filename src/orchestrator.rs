// src/orchestrator.rs

use std::{sync::Arc, thread};

use crossbeam::channel;
use tracing::{debug, error};

use crate::{
    errors::TweakError,
    tweaks::{
        engine::{TweakEngine, TweakOutcome},
        tweaks_in, Tweak, TweakCategory,
    },
};

/// Actions that can be performed on a tweak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweakAction {
    Apply,
    Revert,
}

/// Represents a task to be processed.
#[derive(Debug, Clone)]
pub struct TweakTask {
    pub tweak: Tweak,
    pub action: TweakAction,
}

/// Represents the result of a processed task.
#[derive(Debug)]
pub struct TweakResult {
    pub id: &'static str,
    pub action: TweakAction,
    pub result: Result<TweakOutcome, TweakError>,
}

impl TweakResult {
    pub fn success(&self) -> bool {
        self.result.is_ok()
    }

    /// Some(true) once applied, Some(false) once reverted, None if the task failed.
    pub fn enabled_state(&self) -> Option<bool> {
        match (&self.result, self.action) {
            (Ok(_), TweakAction::Apply) => Some(true),
            (Ok(_), TweakAction::Revert) => Some(false),
            (Err(_), _) => None,
        }
    }

    pub fn message(&self) -> String {
        match &self.result {
            Ok(outcome) => outcome.message(),
            Err(e) => e.to_string(),
        }
    }
}

/// Runs tweak tasks on worker threads and hands results back over a channel.
///
/// Each task runs independently; a failing task never stops the others.
pub struct TaskOrchestrator {
    engine: Arc<TweakEngine>,
    result_receiver: channel::Receiver<TweakResult>,
    result_sender: channel::Sender<TweakResult>,
}

impl TaskOrchestrator {
    pub fn new(engine: Arc<TweakEngine>) -> Self {
        let (result_sender, result_receiver) = channel::unbounded::<TweakResult>();
        Self {
            engine,
            result_sender,
            result_receiver,
        }
    }

    /// Submits a new task to be processed.
    pub fn submit_task(&self, task: TweakTask) {
        let engine = Arc::clone(&self.engine);
        let result_sender = self.result_sender.clone();
        thread::spawn(move || {
            let tweak = &task.tweak;
            debug!("{} -> Running {:?}", tweak.id, task.action);
            let result = engine.apply(
                tweak,
                tweak.category.as_ref(),
                task.action == TweakAction::Revert,
            );
            let result = TweakResult {
                id: tweak.id,
                action: task.action,
                result,
            };
            if let Err(e) = result_sender.send(result) {
                error!("Failed to send result: {:?}", e);
            }
        });
    }

    /// Attempts to receive a task result without blocking.
    pub fn try_recv_result(&self) -> Option<TweakResult> {
        self.result_receiver.try_recv().ok()
    }

    /// Blocks until the next task result arrives.
    pub fn recv_result(&self) -> Option<TweakResult> {
        self.result_receiver.recv().ok()
    }

    /// Runs `action` on every tweak concurrently and waits for all of them.
    pub fn run_all<'a>(
        &self,
        tweaks: impl IntoIterator<Item = &'a Tweak>,
        action: TweakAction,
    ) -> Vec<TweakResult> {
        let mut submitted = 0;
        for tweak in tweaks {
            self.submit_task(TweakTask {
                tweak: tweak.clone(),
                action,
            });
            submitted += 1;
        }

        (0..submitted).filter_map(|_| self.recv_result()).collect()
    }

    /// Applies every catalog tweak in `category`.
    pub fn apply_category(&self, category: TweakCategory) -> Vec<TweakResult> {
        self.run_all(tweaks_in(category), TweakAction::Apply)
    }
}
