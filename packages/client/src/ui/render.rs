//! Rendering seam.
//!
//! Controllers hand finished view-models to a `Renderer`; they never format
//! output themselves.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::{Notification, Screen, view::AdminScreen};

pub trait Renderer: Send + Sync {
    fn render(&self, screen: &Screen);

    fn render_admin(&self, screen: &AdminScreen);

    fn notify(&self, notification: &Notification);
}

#[derive(Debug, Default)]
struct Recorded {
    screens: Vec<Screen>,
    admin_screens: Vec<AdminScreen>,
    notifications: Vec<Notification>,
}

/// Keeps everything it is asked to draw. Used by tests and headless runs.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    inner: Arc<Mutex<Recorded>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Recorded> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn screens(&self) -> Vec<Screen> {
        self.lock().screens.clone()
    }

    pub fn last_screen(&self) -> Option<Screen> {
        self.lock().screens.last().cloned()
    }

    pub fn admin_screens(&self) -> Vec<AdminScreen> {
        self.lock().admin_screens.clone()
    }

    pub fn last_admin_screen(&self) -> Option<AdminScreen> {
        self.lock().admin_screens.last().cloned()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.lock().notifications.clone()
    }

    pub fn last_notification(&self) -> Option<Notification> {
        self.lock().notifications.last().cloned()
    }
}

impl Renderer for RecordingRenderer {
    fn render(&self, screen: &Screen) {
        self.lock().screens.push(screen.clone());
    }

    fn render_admin(&self, screen: &AdminScreen) {
        self.lock().admin_screens.push(screen.clone());
    }

    fn notify(&self, notification: &Notification) {
        self.lock().notifications.push(notification.clone());
    }
}
