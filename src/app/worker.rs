//! Background parameter generation.
//!
//! `generate_parameters` is CPU-bound, so front ends run it on a worker
//! thread. The model and its dataset move into the thread; progress and
//! completion come back over a channel that the owner drains whenever it
//! likes (a timer tick, a blocking loop, ...). Joining the handle returns the
//! model with its results.
//!
//! There is no cancellation: a started run always finishes.

use std::thread::JoinHandle;

use crossbeam::channel::{Receiver, TryRecvError, unbounded};

use tracing::{debug, info};

use crate::domain::Dataset;
use crate::error::PetError;
use crate::models::EquipmentModel;

pub type BoxedModel = Box<dyn EquipmentModel + Send>;

#[derive(Debug, Clone, PartialEq)]
pub enum WorkerMessage {
    /// One generation phase finished.
    Progress,
    /// Generation is over; always the last message.
    Done { success: bool, message: String },
}

pub struct GenerationHandle {
    receiver: Receiver<WorkerMessage>,
    thread: JoinHandle<BoxedModel>,
    total_steps: usize,
}

/// Move `model` and `dataset` to a worker thread and start generation.
pub fn spawn_generation(mut model: BoxedModel, dataset: Dataset) -> Result<GenerationHandle, PetError> {
    let (tx, receiver) = unbounded();
    let total_steps = model.progress_step_count();
    let short_name = model.short_name();

    let thread = std::thread::Builder::new()
        .name("pet-generate".to_string())
        .spawn(move || {
            info!(equipment = short_name, rows = dataset.len(), "generation started");
            // A dropped receiver only means nobody is listening any more.
            model.generate_parameters(
                &dataset,
                &mut || {
                    let _ = tx.send(WorkerMessage::Progress);
                },
                &mut |success, message| {
                    debug!(success, %message, "generation finished");
                    let _ = tx.send(WorkerMessage::Done { success, message });
                },
            );
            model
        })
        .map_err(|e| PetError::Io(format!("failed to start worker thread: {e}")))?;

    Ok(GenerationHandle {
        receiver,
        thread,
        total_steps,
    })
}

impl GenerationHandle {
    /// Progress messages a successful run will send.
    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// Everything queued so far, without blocking.
    pub fn try_drain(&self) -> Vec<WorkerMessage> {
        let mut out = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(msg) => out.push(msg),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return out,
            }
        }
    }

    /// Block for the next message. `None` once the worker is gone and the
    /// queue is empty.
    pub fn recv(&self) -> Option<WorkerMessage> {
        self.receiver.recv().ok()
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Wait for the worker and take the model back.
    pub fn join(self) -> Result<BoxedModel, PetError> {
        self.thread
            .join()
            .map_err(|_| PetError::Regression("parameter generation thread panicked".into()))
    }
}
