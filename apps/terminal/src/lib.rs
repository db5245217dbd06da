//! # Larek Terminal Library
//!
//! Line-command presentation adapter for the Larek storefront.
//! `main.rs` only calls [`run`]; everything else lives here so it can be tested.
//!
//! ## Module Organization
//! ```text
//! larek_terminal/
//! ├── lib.rs          ◄─── You are here (options, config, logging, runtime)
//! ├── app.rs          ◄─── Command loop over a Session
//! ├── view.rs         ◄─── Renders output events as text
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   └── forms.rs    ◄─── Delivery / contact form drafts
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command parsing and help text
//! │   ├── catalog.rs  ◄─── show / toggle
//! │   └── checkout.rs ◄─── checkout steps and form fields
//! └── error.rs        ◄─── App error type
//! ```
//!
//! ## Threading
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  current-thread tokio runtime                                           │
//! │  └── LocalSet                                                           │
//! │       ├── App::run        reads stdin, publishes events                │
//! │       └── spawn_local     one task per order submission                 │
//! │                                                                         │
//! │  The storefront is Rc/RefCell based, so nothing crosses threads.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod app;
pub mod commands;
pub mod error;
pub mod state;
pub mod view;

use std::path::PathBuf;

use larek_client::{ClientConfig, HttpStoreApi, LogSettings, Session};
use larek_core::Storefront;
use tokio::io::BufReader;
use tokio::task::LocalSet;
use tracing::info;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

pub use app::{App, Flow};
pub use error::{AppError, AppResult};

const USAGE: &str = "Usage: larek [--config <path>] [--write-config]";

// =============================================================================
// Command-Line Options
// =============================================================================

/// Process arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// `client.toml` to use instead of the per-user default.
    pub config_path: Option<PathBuf>,

    /// Write the effective configuration to the config path and exit.
    pub write_config: bool,
}

impl Options {
    /// Parses the arguments after the program name.
    pub fn parse<I>(args: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut options = Options::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    let path = args.next().ok_or(AppError::MissingArgument {
                        command: "--config",
                        expected: "a file path",
                    })?;
                    options.config_path = Some(PathBuf::from(path));
                }
                "--write-config" => options.write_config = true,
                other => {
                    return Err(AppError::InvalidArgument(format!(
                        "Unknown option '{other}'. {USAGE}"
                    )))
                }
            }
        }
        Ok(options)
    }
}

// =============================================================================
// Entry Points
// =============================================================================

/// Parses the process arguments and runs [`run_with`].
pub fn run() -> AppResult<()> {
    run_with(Options::parse(std::env::args().skip(1))?)
}

/// Runs the terminal storefront until `quit` or end of input.
///
/// ## Startup Sequence
/// 1. Load `client.toml` (or defaults) and apply `LAREK_*` overrides,
///    logging to stderr through a bootstrap subscriber
/// 2. With `--write-config`, save the result and stop
/// 3. Initialize logging to stderr with the configured filter
/// 4. Build the HTTP client and the session
/// 5. Start a current-thread runtime with a `LocalSet`
/// 6. Load the catalog, then read commands from stdin
pub fn run_with(options: Options) -> AppResult<()> {
    let config = load_config_with(
        options.config_path.clone(),
        env_filter(&LogSettings::default().filter),
        std::io::stderr,
    )?;

    if options.write_config {
        let path = config.save(options.config_path)?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    init_tracing(&config.log.filter);

    info!(base_url = %config.api.base_url, "Starting Larek terminal");

    let api = HttpStoreApi::from_config(&config)?;
    let session = Session::new(Storefront::new(), api);
    let app = App::new(
        session,
        config.display.clone(),
        config.cdn_url()?,
        Box::new(std::io::stdout()),
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    LocalSet::new().block_on(&runtime, async {
        app.start().await?;
        app.run(BufReader::new(tokio::io::stdin())).await
    })
}

// =============================================================================
// Logging
// =============================================================================

/// Loads the config while a scoped subscriber writes to `writer`.
///
/// The global subscriber depends on the loaded `log.filter`, so it cannot
/// exist yet.
fn load_config_with<W>(
    path: Option<PathBuf>,
    filter: EnvFilter,
    writer: W,
) -> AppResult<ClientConfig>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let bootstrap = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .finish();

    Ok(tracing::subscriber::with_default(bootstrap, || {
        ClientConfig::load(path)
    })?)
}

/// `RUST_LOG` if set and valid, else `default_filter`, else `warn`.
fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=larek_core=trace` - Show bus dispatch traces
/// - Default: the `log.filter` config value (`LAREK_LOG` overrides it)
///
/// Logs go to stderr so they never mix with the storefront output.
fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_filter))
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Thread-safe log sink for the bootstrap subscriber.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("larek-terminal-test-{}", std::process::id()))
            .join(name)
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_options() {
        assert_eq!(Options::parse(args(&[])).unwrap(), Options::default());

        let options = Options::parse(args(&["--write-config", "--config", "my.toml"])).unwrap();
        assert!(options.write_config);
        assert_eq!(options.config_path, Some(PathBuf::from("my.toml")));

        assert!(matches!(
            Options::parse(args(&["--config"])),
            Err(AppError::MissingArgument { command: "--config", .. })
        ));
        let err = Options::parse(args(&["--verbose"])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown option '--verbose'. Usage: larek [--config <path>] [--write-config]"
        );
    }

    #[test]
    fn test_config_loading_is_logged() {
        let logs = CapturedLogs::default();
        let sink = logs.clone();

        let config = load_config_with(
            Some(scratch("missing.toml")),
            EnvFilter::new("debug"),
            move || sink.clone(),
        )
        .unwrap();

        assert_eq!(config.display, ClientConfig::default().display);
        let text = logs.text();
        assert!(text.contains("Config file not found, using defaults"), "{text}");
        assert!(text.contains("missing.toml"), "{text}");
    }

    #[test]
    fn test_write_config_saves_and_exits() {
        let path = scratch("written/client.toml");

        run_with(Options {
            config_path: Some(path.clone()),
            write_config: true,
        })
        .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("[api]"));
        assert!(written.contains("currency_name = \"synapses\""));

        let _ = std::fs::remove_file(&path);
    }
}
