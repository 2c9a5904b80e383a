use std::sync::Once;

/// Logger configuration for applications embedding loom.
///
/// `env_filter` uses the `env_logger` directive syntax, e.g.
/// `"warn,loom_ui::table=debug"`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
    /// Route output through the test harness capture instead of stderr.
    pub for_tests: bool,
}

impl LoggingConfig {
    pub fn filter(mut self, directives: impl Into<String>) -> Self {
        self.env_filter = Some(directives.into());
        self
    }

    pub fn write_style(mut self, style: env_logger::WriteStyle) -> Self {
        self.write_style = style;
        self
    }

    pub fn for_tests(mut self, v: bool) -> Self {
        self.for_tests = v;
        self
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
            for_tests: false,
        }
    }
}

static INIT: Once = Once::new();

/// Installs the global logger. Only the first call has any effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match config.env_filter {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => match std::env::var("RUST_LOG") {
                Ok(filter) => {
                    builder.parse_filters(&filter);
                }
                Err(_) => {
                    builder.filter_level(log::LevelFilter::Info);
                }
            },
        }

        builder.write_style(config.write_style);
        builder.is_test(config.for_tests);

        // A host application may already own the logger.
        if builder.try_init().is_err() {
            log::debug!("logger already installed; loom logging config ignored");
            return;
        }

        log::debug!("loom logging initialized");
    });
}
