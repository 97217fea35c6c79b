//! The logging registry.
//!
//! One registry owns the root logger, the set of known child loggers, the
//! attached file and console sinks, and the per-child levels. Hosts normally
//! build it once at startup with [`LoggingRegistry::new`] and hand clones to
//! collaborators; [`LoggingRegistry::get_or_create`] provides a process-wide
//! instance for hosts that prefer a global.
//!
//! Sink swaps and level updates happen under the registry's exclusive lock,
//! while emission holds the shared lock for the duration of one enqueue. A
//! record is therefore written by exactly one sink generation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexSet;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use tracing::{debug, info};
use welder_types::{LogLevel, LoggingSettings, RegistryNames, Result};

use super::format::{Formatter, LogRecord};
use super::logger::Logger;
use super::policy::{child_path, resolve_child_level};
use super::sink::Sink;
use crate::util::ensure_file;

/// Level applied to every child when no settings have ever supplied one.
pub const DEFAULT_LEVEL: LogLevel = LogLevel::Debug;

static GLOBAL: OnceCell<LoggingRegistry> = OnceCell::new();

/// Which sinks are attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkState {
    /// Active log file of the file sink, if one is attached
    pub file: Option<PathBuf>,
    /// Whether the console sink is attached
    pub console: bool,
}

/// Handle to a logging registry. Cloning is cheap and shares the registry.
#[derive(Debug, Clone)]
pub struct LoggingRegistry {
    shared: Arc<Shared>,
}

#[derive(Debug)]
pub(crate) struct Shared {
    names: RegistryNames,
    formatter: Formatter,
    state: RwLock<RegistryState>,
}

#[derive(Debug)]
struct RegistryState {
    root_level: Option<LogLevel>,
    default_level: LogLevel,
    file_sink: Option<Sink>,
    console_sink: Option<Sink>,
    children: IndexSet<String>,
    levels: HashMap<String, LogLevel>,
}

impl RegistryState {
    /// Take both sinks off; callers drop them once the lock is released.
    fn detach_sinks(&mut self) -> (Option<Sink>, Option<Sink>) {
        (self.file_sink.take(), self.console_sink.take())
    }

    fn sinks(&self) -> impl Iterator<Item = &Sink> {
        self.file_sink.iter().chain(self.console_sink.iter())
    }

    fn effective_level(&self, path: Option<&str>) -> Option<LogLevel> {
        let mut current = path;
        while let Some(p) = current {
            if let Some(level) = self.levels.get(p) {
                return Some(*level);
            }
            current = p.rfind('.').map(|i| &p[..i]);
        }
        self.root_level
    }

    fn is_enabled(&self, path: Option<&str>, level: LogLevel) -> bool {
        level != LogLevel::Silent && self.effective_level(path).map_or(true, |min| level >= min)
    }
}

impl LoggingRegistry {
    /// Create a registry with the default record formatter.
    pub fn new(names: RegistryNames) -> Self {
        Self::with_formatter(names, Formatter::new())
    }

    /// Create a registry with a custom record formatter.
    pub fn with_formatter(names: RegistryNames, formatter: Formatter) -> Self {
        Self {
            shared: Arc::new(Shared {
                names,
                formatter,
                state: RwLock::new(RegistryState {
                    root_level: None,
                    default_level: DEFAULT_LEVEL,
                    file_sink: None,
                    console_sink: None,
                    children: IndexSet::new(),
                    levels: HashMap::new(),
                }),
            }),
        }
    }

    /// The process-wide registry.
    ///
    /// The first call builds it from `names`; later calls return the same
    /// registry and ignore their argument.
    pub fn get_or_create(names: RegistryNames) -> Self {
        GLOBAL.get_or_init(|| LoggingRegistry::new(names)).clone()
    }

    /// Identifiers this registry was built with.
    pub fn names(&self) -> &RegistryNames {
        &self.shared.names
    }

    /// Handle to the root logger.
    pub fn root_logger(&self) -> Logger {
        Logger::new(self.shared.clone(), self.shared.names.root.clone(), None)
    }

    /// Get a named child logger, registering it on first use.
    ///
    /// Asking for the root name returns the root logger without registering
    /// anything. A leading file prefix (e.g. `octoprint_arc_welder.`) is
    /// stripped before the name is placed under the root.
    pub fn get_logger(&self, name: &str) -> Logger {
        let names = &self.shared.names;
        if name == names.root {
            return self.root_logger();
        }

        let name = name.strip_prefix(names.file_prefix.as_str()).unwrap_or(name);
        let full_name = format!("{}.{}", names.root, name);

        self.shared.state.write().children.insert(full_name.clone());

        Logger::new(self.shared.clone(), full_name, Some(name.to_string()))
    }

    /// Full names of every registered child, in registration order.
    pub fn logger_names(&self) -> Vec<String> {
        self.shared.state.read().children.iter().cloned().collect()
    }

    /// Level explicitly set on a child, if any.
    ///
    /// `name` is accepted in the same forms as [`LoggingRegistry::get_logger`].
    pub fn child_level(&self, name: &str) -> Option<LogLevel> {
        let name = name
            .strip_prefix(self.shared.names.file_prefix.as_str())
            .unwrap_or(name);
        self.shared.state.read().levels.get(name).copied()
    }

    /// Which sinks are currently attached.
    pub fn sink_state(&self) -> SinkState {
        let state = self.shared.state.read();
        SinkState {
            file: state
                .file_sink
                .as_ref()
                .and_then(|sink| sink.rotating_file())
                .map(|file| file.lock().path().to_path_buf()),
            console: state.console_sink.is_some(),
        }
    }

    /// Rebuild the sinks and re-apply the per-child level policy.
    ///
    /// Existing sinks are detached first. With a `log_file_path`, its
    /// directory and file are created if missing and a daily rotating file
    /// sink is attached. A console sink is attached unless the settings turn
    /// it off. Every known child then gets its level from
    /// [`resolve_child_level`]. Detached sinks are shut down after the lock is
    /// released. Their writer threads keep flushing queued records in the
    /// background; this waits a bounded time for them, not until they finish.
    pub fn configure_loggers(
        &self,
        log_file_path: Option<&Path>,
        settings: Option<&LoggingSettings>,
    ) -> Result<()> {
        let mut state = self.shared.state.write();
        let retired = state.detach_sinks();
        let outcome = self.rebuild(&mut state, log_file_path, settings);
        drop(state);
        drop(retired);
        outcome?;

        let sinks = self.sink_state();
        debug!(
            file = ?sinks.file,
            console = sinks.console,
            with_settings = settings.is_some(),
            "Configured {} loggers",
            self.shared.names.root
        );
        Ok(())
    }

    fn rebuild(
        &self,
        state: &mut RegistryState,
        log_file_path: Option<&Path>,
        settings: Option<&LoggingSettings>,
    ) -> Result<()> {
        state.root_level = None;

        if let Some(path) = log_file_path {
            ensure_file(path)?;
            state.file_sink = Some(Sink::file(path, LogLevel::Verbose)?);
        }

        if settings.map_or(true, LoggingSettings::console_enabled) {
            state.console_sink = Some(Sink::console(LogLevel::Verbose));
        }

        if let Some(level) = settings.and_then(|s| s.default_log_level) {
            state.default_level = level;
        }

        let entry_prefix = self.shared.names.entry_prefix.as_str();
        let RegistryState {
            children,
            levels,
            default_level,
            ..
        } = state;
        for full_name in children.iter() {
            let path = child_path(full_name, entry_prefix);
            let current = levels.get(path).copied();
            let level = resolve_child_level(full_name, current, settings, *default_level);
            levels.insert(path.to_string(), level);
        }

        Ok(())
    }

    /// Rotate the log file now.
    ///
    /// Does nothing when no file sink is attached. With `clear_all`, every
    /// retained backup is deleted after the rotation.
    pub fn do_rollover(&self, clear_all: bool) -> Result<()> {
        let file = {
            let state = self.shared.state.read();
            state
                .file_sink
                .as_ref()
                .and_then(|sink| sink.rotating_file())
                .cloned()
        };
        let Some(file) = file else {
            return Ok(());
        };

        let removed = {
            let mut file = file.lock();
            file.do_rollover()?;
            if clear_all {
                file.delete_all_backups()?
            } else {
                0
            }
        };

        if clear_all {
            info!("Cleared {} rotated log files", removed);
        }
        Ok(())
    }

    /// Detach every sink.
    ///
    /// Queued records are still flushed by the writer threads. The wait for
    /// them is bounded, so a backed-up queue may still be draining when this
    /// returns.
    pub fn shutdown(&self) {
        let retired = self.shared.state.write().detach_sinks();
        drop(retired);
    }
}

impl Shared {
    pub(crate) fn is_enabled(&self, path: Option<&str>, level: LogLevel) -> bool {
        self.state.read().is_enabled(path, level)
    }

    pub(crate) fn emit(&self, path: Option<&str>, logger: &str, level: LogLevel, message: &str) {
        let state = self.state.read();
        if !state.is_enabled(path, level) {
            return;
        }
        if state.file_sink.is_none() && state.console_sink.is_none() {
            return;
        }

        let record = LogRecord::new(logger, level, message);
        let mut line = self.formatter.format(&record);
        line.push('\n');
        for sink in state.sinks().filter(|sink| sink.accepts(level)) {
            sink.write_line(&line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;
    use std::fs;
    use std::thread;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    fn registry() -> LoggingRegistry {
        LoggingRegistry::new(RegistryNames::default())
    }

    fn quiet_settings() -> LoggingSettings {
        LoggingSettings {
            log_to_console: Some(false),
            ..LoggingSettings::default()
        }
    }

    /// Read the log once the writer thread has caught up with `expected` lines.
    ///
    /// Shutdown only waits a bounded time for the worker, so a large queue may
    /// still be flushing when it returns.
    fn read_settled(path: &Path, expected: usize) -> String {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            let content = fs::read_to_string(path).unwrap_or_default();
            if content.lines().count() >= expected || Instant::now() >= deadline {
                return content;
            }
            thread::sleep(Duration::from_millis(20));
        }
    }

    #[test]
    fn test_get_logger_registers_full_names() {
        let registry = registry();
        let foo = registry.get_logger("foo");
        let preprocessor = registry.get_logger("octoprint_arc_welder.preprocessor");
        registry.get_logger("foo");

        assert_eq!(foo.name(), "arc_welder.foo");
        assert_eq!(preprocessor.name(), "arc_welder.preprocessor");
        assert_eq!(
            registry.logger_names(),
            vec!["arc_welder.foo".to_string(), "arc_welder.preprocessor".to_string()]
        );
    }

    #[test]
    fn test_root_name_is_not_registered() {
        let registry = registry();
        let root = registry.get_logger("arc_welder");

        assert_eq!(root.name(), "arc_welder");
        assert!(registry.logger_names().is_empty());
    }

    #[test]
    fn test_get_or_create_returns_one_instance() {
        let first = LoggingRegistry::get_or_create(RegistryNames::default());
        let second = LoggingRegistry::get_or_create(RegistryNames::new("other", "other.", "x."));

        assert!(Arc::ptr_eq(&first.shared, &second.shared));
        assert_eq!(second.names().root, "arc_welder");
    }

    #[test]
    fn test_configure_without_anything_uses_default_level_and_console() {
        let registry = registry();
        registry.get_logger("foo");
        registry.get_logger("bar");

        registry.configure_loggers(None, None).unwrap();

        assert_eq!(registry.child_level("foo"), Some(LogLevel::Debug));
        assert_eq!(registry.child_level("bar"), Some(LogLevel::Debug));
        assert_eq!(
            registry.sink_state(),
            SinkState {
                file: None,
                console: true
            }
        );
        registry.shutdown();
    }

    #[test]
    fn test_configure_applies_overrides() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("logs").join("plugin_arc_welder.log");
        let registry = registry();
        registry.get_logger("foo");
        registry.get_logger("bar");

        let settings = quiet_settings().with_enabled_logger("arc_welder.foo", LogLevel::Info);
        registry.configure_loggers(Some(&path), Some(&settings)).unwrap();

        assert!(path.is_file());
        assert_eq!(registry.child_level("foo"), Some(LogLevel::Info));
        assert_eq!(registry.child_level("bar"), Some(LogLevel::Error));
        assert_eq!(
            registry.sink_state(),
            SinkState {
                file: Some(path.clone()),
                console: false
            }
        );
        registry.shutdown();
    }

    #[test]
    fn test_configure_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("plugin_arc_welder.log");
        let registry = registry();
        for name in ["foo", "bar", "gcode_conversion"] {
            registry.get_logger(name);
        }
        let settings = quiet_settings()
            .with_enabled_logger("arc_welder.foo", LogLevel::Info)
            .with_enabled_logger("arc_welder.gcode_conversion", LogLevel::Verbose);

        registry.configure_loggers(Some(&path), Some(&settings)).unwrap();
        let first_sinks = registry.sink_state();
        let first_levels: Vec<_> = ["foo", "bar", "gcode_conversion"]
            .iter()
            .map(|n| registry.child_level(n))
            .collect();

        registry.configure_loggers(Some(&path), Some(&settings)).unwrap();
        let second_levels: Vec<_> = ["foo", "bar", "gcode_conversion"]
            .iter()
            .map(|n| registry.child_level(n))
            .collect();

        assert_eq!(first_sinks, registry.sink_state());
        assert_eq!(first_levels, second_levels);
        registry.shutdown();
    }

    #[test]
    fn test_settings_default_level_becomes_active_default() {
        let registry = registry();
        registry.get_logger("foo");
        let settings = quiet_settings();
        let settings = LoggingSettings {
            default_log_level: Some(LogLevel::Warning),
            ..settings
        };

        registry.configure_loggers(None, Some(&settings)).unwrap();
        assert_eq!(registry.child_level("foo"), Some(LogLevel::Error));

        registry.configure_loggers(None, None).unwrap();
        assert_eq!(registry.child_level("foo"), Some(LogLevel::Warning));
        registry.shutdown();
    }

    #[test]
    fn test_configure_reports_filesystem_errors() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let registry = registry();

        let err = registry
            .configure_loggers(Some(&blocker.join("plugin.log")), Some(&quiet_settings()))
            .unwrap_err();

        assert!(matches!(err, welder_types::WelderError::Filesystem { .. }));
        assert_eq!(registry.sink_state().file, None);
    }

    #[test]
    fn test_records_are_filtered_by_child_level() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("plugin_arc_welder.log");
        let registry = registry();
        let foo = registry.get_logger("foo");
        let bar = registry.get_logger("bar");

        let settings = quiet_settings().with_enabled_logger("arc_welder.foo", LogLevel::Info);
        registry.configure_loggers(Some(&path), Some(&settings)).unwrap();

        foo.debug("hidden debug");
        foo.info("visible info");
        bar.warning("hidden warning");
        bar.error("visible error");
        registry.shutdown();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" - arc_welder.foo - INFO - visible info"));
        assert!(lines[1].ends_with(" - arc_welder.bar - ERROR - visible error"));
    }

    #[test]
    fn test_rollover_without_file_sink_is_noop() {
        let registry = registry();
        registry.do_rollover(true).unwrap();
        registry.do_rollover(false).unwrap();
    }

    #[test]
    fn test_rollover_clear_all_leaves_one_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("plugin_arc_welder.log");
        for day in ["2021-05-01", "2021-05-02", "2021-05-03"] {
            fs::write(temp.path().join(format!("plugin_arc_welder.log.{}", day)), day).unwrap();
        }
        let registry = registry();
        registry.configure_loggers(Some(&path), Some(&quiet_settings())).unwrap();

        registry.do_rollover(true).unwrap();

        let entries: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert!(path.is_file());
        registry.shutdown();
    }

    #[test]
    fn test_rollover_keeps_backups_without_clear_all() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("plugin_arc_welder.log");
        let registry = registry();
        registry.configure_loggers(Some(&path), Some(&quiet_settings())).unwrap();

        registry.do_rollover(false).unwrap();

        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 2);
        registry.shutdown();
    }

    #[test]
    fn test_concurrent_emission_during_reconfigure() {
        const THREADS: usize = 8;
        const RECORDS: usize = 200;

        let temp = TempDir::new().unwrap();
        let path = temp.path().join("plugin_arc_welder.log");
        let registry = registry();
        registry.configure_loggers(Some(&path), Some(&quiet_settings())).unwrap();

        let workers: Vec<_> = (0..THREADS)
            .map(|t| {
                let logger = registry.get_logger(&format!("worker{}", t));
                thread::spawn(move || {
                    for i in 0..RECORDS {
                        logger.error(format!("record {}", i));
                    }
                })
            })
            .collect();

        for _ in 0..5 {
            registry.configure_loggers(Some(&path), Some(&quiet_settings())).unwrap();
        }
        for worker in workers {
            worker.join().unwrap();
        }
        registry.shutdown();

        let content = read_settled(&path, THREADS * RECORDS);
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), THREADS * RECORDS);
        let unique: BTreeSet<_> = lines
            .iter()
            .map(|line| line.split(" - ").skip(1).collect::<Vec<_>>().join(" - "))
            .collect();
        assert_eq!(unique.len(), THREADS * RECORDS);
    }

    proptest! {
        #[test]
        fn prop_known_children_match_requests(
            requests in proptest::collection::vec(
                ("[a-z]{1,6}", proptest::bool::ANY),
                0..24,
            )
        ) {
            let registry = registry();
            let mut expected = BTreeSet::new();
            for (name, with_file_prefix) in &requests {
                let requested = if *with_file_prefix {
                    format!("octoprint_arc_welder.{}", name)
                } else {
                    name.clone()
                };
                registry.get_logger(&requested);
                expected.insert(format!("arc_welder.{}", name));
            }

            let known: BTreeSet<_> = registry.logger_names().into_iter().collect();
            prop_assert_eq!(known, expected);
        }
    }
}
