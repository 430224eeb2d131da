use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt, reload};

const DEFAULT_FILTER: &str = "info";

/// Handle on the installed log filter. `RUST_LOG` wins over the settings file.
pub struct LogFilter {
    handle: reload::Handle<EnvFilter, Registry>,
    from_env: bool,
}

impl LogFilter {
    fn layer(initial: Option<EnvFilter>) -> (reload::Layer<EnvFilter, Registry>, Self) {
        let from_env = initial.is_some();
        let (layer, handle) =
            reload::Layer::new(initial.unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER)));
        (layer, Self { handle, from_env })
    }

    /// Switches to the `log_filter` setting. Returns whether the filter changed.
    pub fn apply_setting(&self, directives: &str) -> bool {
        if self.from_env {
            return false;
        }

        let filter = match EnvFilter::try_new(directives) {
            Ok(filter) => filter,
            Err(e) => {
                tracing::warn!("Ignoring invalid log filter {:?}: {}", directives, e);
                return false;
            }
        };

        match self.handle.reload(filter) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to apply log filter: {}", e);
                false
            }
        }
    }
}

/// Installs the global subscriber. Call before anything that logs.
pub fn init() -> LogFilter {
    let (layer, filter) = LogFilter::layer(EnvFilter::try_from_default_env().ok());
    tracing_subscriber::registry()
        .with(layer)
        .with(fmt::layer().with_target(false))
        .try_init()
        .ok();
    filter
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setting_replaces_the_default_filter() {
        let (_layer, filter) = LogFilter::layer(None);
        assert!(filter.apply_setting("tsmap=debug,warn"));
    }

    #[test]
    fn invalid_setting_keeps_the_current_filter() {
        let (_layer, filter) = LogFilter::layer(None);
        assert!(!filter.apply_setting("tsmap=loudest"));
    }

    #[test]
    fn environment_filter_is_not_overridden() {
        let (_layer, filter) = LogFilter::layer(Some(EnvFilter::new("error")));
        assert!(!filter.apply_setting("debug"));
    }

    #[test]
    fn settings_errors_are_logged_once_the_subscriber_exists() {
        let _filter = init();
        let dir = tempfile::tempdir().unwrap();
        let store = crate::SettingsStore::in_dir(dir.path());
        std::fs::write(store.path(), "theater = [").unwrap();

        assert!(tracing::dispatcher::has_been_set());
        assert_eq!(store.load(), crate::settings::Settings::default());
    }
}
