use std::future::Future;

use tracing::info;

use crate::config::{Config, NotifierKind};
use crate::error::NotificationDeliveryError;
use crate::types::NotificationPayload;

/// Delivers an alert to the user. Errors are reported, never retried.
pub trait Notifier {
    fn deliver(
        &self,
        payload: &NotificationPayload,
    ) -> impl Future<Output = Result<(), NotificationDeliveryError>> + Send;
}

/// Shells out to `terminal-notifier` (or a compatible CLI).
#[derive(Debug, Clone)]
pub struct CommandNotifier {
    program: String,
}

impl CommandNotifier {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }
}

impl Notifier for CommandNotifier {
    async fn deliver(
        &self,
        payload: &NotificationPayload,
    ) -> Result<(), NotificationDeliveryError> {
        // Score is the bold alert title; the fixture label is the body.
        let output = tokio::process::Command::new(&self.program)
            .arg("-title")
            .arg(&payload.headline)
            .arg("-subtitle")
            .arg(&payload.subtitle)
            .arg("-message")
            .arg(&payload.title)
            .arg("-sound")
            .arg(&payload.sound)
            .arg("-group")
            .arg(&payload.group)
            .arg("-sender")
            .arg(&payload.sender)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| NotificationDeliveryError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(NotificationDeliveryError::Exit {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

/// Writes the alert to the log instead of the desktop.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    async fn deliver(
        &self,
        payload: &NotificationPayload,
    ) -> Result<(), NotificationDeliveryError> {
        info!(
            title = %payload.title,
            group = %payload.group,
            "ALERT | {} | {}",
            payload.headline,
            payload.subtitle,
        );
        Ok(())
    }
}

/// The notifier chosen by `NOTIFIER`.
#[derive(Debug, Clone)]
pub enum DesktopNotifier {
    Command(CommandNotifier),
    Log(LogNotifier),
}

impl DesktopNotifier {
    pub fn from_config(cfg: &Config) -> Self {
        match cfg.notifier {
            NotifierKind::Command => Self::Command(CommandNotifier::new(&cfg.notifier_command)),
            NotifierKind::Log => Self::Log(LogNotifier),
        }
    }
}

impl Notifier for DesktopNotifier {
    async fn deliver(
        &self,
        payload: &NotificationPayload,
    ) -> Result<(), NotificationDeliveryError> {
        match self {
            Self::Command(n) => n.deliver(payload).await,
            Self::Log(n) => n.deliver(payload).await,
        }
    }
}
