//! Terminal renderer.
//!
//! Output is written to stdout while the readline thread owns the prompt,
//! so every write ends by redrawing the prompt.

use std::{io::Write, sync::Arc};

use numberhunt_shared::time::Clock;

use crate::domain::{Notification, Screen, view::AdminScreen};

use super::{formatter::ScreenFormatter, render::Renderer};

/// Redisplay the prompt after asynchronous output
pub fn redisplay_prompt(prompt: &str) {
    print!("{}", prompt);
    std::io::stdout().flush().ok();
}

pub struct TerminalRenderer {
    prompt: String,
    clock: Arc<dyn Clock>,
}

impl TerminalRenderer {
    pub fn new(prompt: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            prompt: prompt.into(),
            clock,
        }
    }

    fn write(&self, text: &str) {
        print!("{}", text);
        redisplay_prompt(&self.prompt);
    }
}

impl Renderer for TerminalRenderer {
    fn render(&self, screen: &Screen) {
        self.write(&ScreenFormatter::format_screen(screen));
    }

    fn render_admin(&self, screen: &AdminScreen) {
        self.write(&ScreenFormatter::format_admin(
            screen,
            self.clock.now_millis(),
        ));
    }

    fn notify(&self, notification: &Notification) {
        self.write(&ScreenFormatter::format_notification(notification));
    }
}
