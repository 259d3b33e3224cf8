use anyhow::Result;
use notify_rust::{Notification, Timeout};

use crate::models::reminder::ReminderPayload;
use crate::services::reminder::ReminderNotifier;

/// Title shown on every expiry reminder.
pub const REMINDER_TITLE: &str = "License Expiry Reminder";

/// Service for displaying system notifications
pub struct NotificationService {
    enabled: bool,
}

impl NotificationService {
    pub fn new() -> Self {
        Self { enabled: true }
    }

    /// Check if notifications are enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable notifications
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Show an expiry reminder. The last-day reminders stay on screen longer.
    pub fn show_expiry_reminder(&self, payload: &ReminderPayload) -> Result<()> {
        let message = payload.message();
        if !self.enabled {
            log::info!("Notifications disabled; reminder not shown: {}", message);
            return Ok(());
        }

        let urgency = NotificationUrgency::for_lead_days(payload.lead_days);
        let timeout = match urgency {
            NotificationUrgency::Normal => Timeout::Milliseconds(5000),
            NotificationUrgency::Critical => Timeout::Milliseconds(10000),
        };

        Notification::new()
            .summary(REMINDER_TITLE)
            .body(&message)
            .timeout(timeout)
            .show()
            .map_err(|e| anyhow::anyhow!("Failed to show notification: {}", e))?;

        Ok(())
    }
}

impl Default for NotificationService {
    fn default() -> Self {
        Self::new()
    }
}

impl ReminderNotifier for NotificationService {
    fn notify(&self, payload: &ReminderPayload) -> Result<()> {
        self.show_expiry_reminder(payload)
    }
}

/// Notification urgency level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationUrgency {
    Normal,
    Critical,
}

impl NotificationUrgency {
    pub fn for_lead_days(lead_days: u32) -> Self {
        if lead_days <= 1 {
            NotificationUrgency::Critical
        } else {
            NotificationUrgency::Normal
        }
    }
}
