use thiserror::Error;

use crate::queue::JobId;

#[derive(Error, Debug)]
pub enum QueueError {
    #[error("The queue is empty")]
    Empty,

    #[error("Job not found: {0}")]
    JobNotFound(JobId),

    #[error("Job {0} is not in progress")]
    JobNotInProgress(JobId),
}

pub type Result<T> = std::result::Result<T, QueueError>;
