use crate::domain_port::Navigator;
use crate::logger::*;
use std::sync::{Mutex, PoisonError};

/// Navigator for a terminal session: there is no page to leave, so a
/// redirect is recorded and reported, and the caller decides what to do
/// with it.
#[derive(Default)]
pub struct RecordingNavigator {
    redirects: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn redirects(&self) -> Vec<String> {
        self.redirects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last_redirect(&self) -> Option<String> {
        self.redirects().pop()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, path: &str) {
        info!(path, "redirecting to login");
        self.redirects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_string());
    }
}
