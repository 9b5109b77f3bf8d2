//! Request status tracked per asynchronous boundary.

use serde::Serialize;

/// Where an asynchronous operation stands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Idle,
    Pending,
    Success,
    Error,
}

/// Status plus the error message shown until the user dismisses it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AsyncState {
    pub status: RequestStatus,
    pub error: Option<String>,
}

impl AsyncState {
    /// Mark the operation as started. A previous error stays visible until
    /// the operation resolves or the user dismisses it.
    pub fn begin(&mut self) {
        self.status = RequestStatus::Pending;
    }

    pub fn succeed(&mut self) {
        self.status = RequestStatus::Success;
        self.error = None;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = RequestStatus::Error;
        self.error = Some(message.into());
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
        if self.status == RequestStatus::Error {
            self.status = RequestStatus::Idle;
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }
}
