pub mod formatter;
pub mod notifier;

pub use formatter::NotificationFormatter;
pub use notifier::{DesktopNotifier, Notifier};
