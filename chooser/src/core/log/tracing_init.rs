// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use miette::IntoDiagnostic;
use tracing::{Dispatch, dispatcher::DefaultGuard};
use tracing_core::LevelFilter;
use tracing_subscriber::{Layer, layer::SubscriberExt, registry::LookupSpan};

use super::{DisplayPreference, WriterConfig, rolling_file_appender_impl};
use crate::TracingConfig;

/// Avoid gnarly type annotations by using a macro to create the `fmt` layer. Note that
/// [`tracing_subscriber::fmt::format::Pretty`] and
/// [`tracing_subscriber::fmt::format::Compact`] are mutually exclusive.
#[macro_export]
macro_rules! create_fmt {
    () => {
        tracing_subscriber::fmt::layer()
            .compact()
            .with_thread_names(false)
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
    };
}

/// Type alias for a boxed layer.
pub type DynLayer<S> = dyn Layer<S> + Send + Sync + 'static;

impl TracingConfig {
    /// Build a [`Dispatch`] from this configuration without installing it anywhere. This
    /// is what gets handed to [`crate::Selector::with_log_dispatch`].
    /// [`WriterConfig::None`] produces [`Dispatch::none`].
    ///
    /// # Errors
    ///
    /// Returns an error if the log file can't be created.
    pub fn try_create_dispatch(self) -> miette::Result<Dispatch> {
        Ok(match try_create_layers(self)? {
            Some(layers) => Dispatch::new(tracing_subscriber::registry().with(layers)),
            None => Dispatch::none(),
        })
    }

    /// Install this configuration as the process wide default subscriber. This can only
    /// succeed once per process.
    ///
    /// # Errors
    ///
    /// Returns an error if the log file can't be created or a global default is already
    /// set.
    pub fn install_global(self) -> miette::Result<()> {
        let dispatch = self.try_create_dispatch()?;
        tracing::dispatcher::set_global_default(dispatch).into_diagnostic()
    }

    /// Install this configuration for the current thread only, until the returned guard
    /// is dropped. Handy in tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the log file can't be created.
    pub fn install_thread_local(self) -> miette::Result<DefaultGuard> {
        let dispatch = self.try_create_dispatch()?;
        Ok(tracing::dispatcher::set_default(&dispatch))
    }
}

/// Returns the layers, or `None` for [`WriterConfig::None`]. This does not initialize
/// the tracing system.
///
/// For example, once you have the layers, you can run the following:
/// `try_create_layers(..).map(|layers|
/// tracing_subscriber::registry().with(layers).init());`
///
/// # Errors
///
/// Returns an error if the log file can't be created.
pub fn try_create_layers(
    tracing_config: TracingConfig,
) -> miette::Result<Option<Vec<Box<DynLayer<tracing_subscriber::Registry>>>>> {
    if tracing_config.get_writer_config() == WriterConfig::None {
        return Ok(None);
    }

    let mut return_it: Vec<Box<DynLayer<tracing_subscriber::Registry>>> = vec![];

    // Set the level filter from the tracing configuration. This is needed if you add
    // more layers which don't have a level filter.
    return_it.push(Box::new(tracing_config.get_level_filter()));

    if let Some(layer) = try_create_display_layer(
        tracing_config.get_level_filter(),
        tracing_config.get_writer_config(),
    )? {
        return_it.push(layer);
    }

    if let Some(layer) = try_create_file_layer(
        tracing_config.get_level_filter(),
        tracing_config.get_writer_config(),
    )? {
        return_it.push(layer);
    }

    Ok(Some(return_it))
}

/// This erases the concrete type of the writer, and returns a boxed layer.
///
/// This is useful for composition of layers. There's more info in the docs
/// [here](https://docs.rs/tracing-subscriber/latest/tracing_subscriber/layer/index.html#runtime-configuration-with-layers).
///
/// # Errors
///
/// Never fails today; the signature matches [`try_create_file_layer`].
#[allow(clippy::unnecessary_wraps)]
pub fn try_create_display_layer<S>(
    level_filter: LevelFilter,
    writer_config: WriterConfig,
) -> miette::Result<Option<Box<DynLayer<S>>>>
where
    S: tracing_core::Subscriber,
    for<'a> S: LookupSpan<'a>,
{
    let fmt_layer = create_fmt!();

    Ok(match writer_config {
        WriterConfig::DisplayAndFile(display_pref, _)
        | WriterConfig::Display(display_pref) => match display_pref {
            DisplayPreference::Stdout => Some(Box::new(
                fmt_layer
                    .with_writer(std::io::stdout)
                    .with_filter(level_filter),
            )),
            DisplayPreference::Stderr => Some(Box::new(
                fmt_layer
                    .with_writer(std::io::stderr)
                    .with_filter(level_filter),
            )),
        },
        WriterConfig::None | WriterConfig::File(_) => None,
    })
}

/// This erases the concrete type of the writer, and returns a boxed layer. ANSI escapes
/// are turned off since the output goes to a file.
///
/// # Errors
///
/// Returns an error if the log file can't be created.
pub fn try_create_file_layer<S>(
    level_filter: LevelFilter,
    writer_config: WriterConfig,
) -> miette::Result<Option<Box<DynLayer<S>>>>
where
    S: tracing_core::Subscriber,
    for<'a> S: LookupSpan<'a>,
{
    let fmt_layer = create_fmt!().with_ansi(false);

    Ok(match writer_config {
        WriterConfig::DisplayAndFile(_, tracing_log_file_path_and_prefix)
        | WriterConfig::File(tracing_log_file_path_and_prefix) => {
            let file = rolling_file_appender_impl::try_create(
                tracing_log_file_path_and_prefix.as_str(),
            )?;
            Some(Box::new(
                fmt_layer.with_writer(file).with_filter(level_filter),
            ))
        }
        WriterConfig::None | WriterConfig::Display(_) => None,
    })
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    fn temp_log_file() -> (tempfile::TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("my_temp_log_file.log");
        let file_path = file_path.to_str().unwrap().to_string();
        (dir, file_path)
    }

    #[test]
    fn test_try_create_display_layer() {
        let level_filter = LevelFilter::DEBUG;
        let writer_config = WriterConfig::Display(DisplayPreference::Stdout);
        let layer: Option<Box<DynLayer<tracing_subscriber::Registry>>> =
            try_create_display_layer(level_filter, writer_config).unwrap();

        assert!(layer.is_some());
    }

    #[test]
    fn test_try_create_file_layer() {
        let (_dir, file_path) = temp_log_file();

        let level_filter = LevelFilter::DEBUG;
        let writer_config = WriterConfig::File(file_path.clone());
        let layer: Option<Box<DynLayer<tracing_subscriber::Registry>>> =
            try_create_file_layer(level_filter, writer_config).unwrap();

        assert!(layer.is_some());
        assert!(std::path::Path::new(&file_path).exists());
    }

    #[test]
    fn test_try_create_both_layers() {
        let (_dir, file_path) = temp_log_file();

        let tracing_config = TracingConfig {
            writer_config: WriterConfig::DisplayAndFile(
                DisplayPreference::Stderr,
                file_path.clone(),
            ),
            level_filter: LevelFilter::DEBUG,
        };

        let layers = try_create_layers(tracing_config).unwrap().unwrap();
        pretty_assertions::assert_eq!(layers.len(), 3);
        assert!(std::path::Path::new(&file_path).exists());
    }

    #[test]
    fn test_writer_config_none_creates_no_layers() {
        let tracing_config = TracingConfig {
            writer_config: WriterConfig::None,
            level_filter: LevelFilter::DEBUG,
        };
        assert!(try_create_layers(tracing_config).unwrap().is_none());
    }

    #[test]
    fn test_dispatch_writes_to_file_and_honors_level() {
        let (_dir, file_path) = temp_log_file();

        let dispatch = TracingConfig::new_file(file_path.clone(), LevelFilter::INFO)
            .try_create_dispatch()
            .unwrap();

        tracing::dispatcher::with_default(&dispatch, || {
            tracing::info!(message = "kept line");
            tracing::debug!(message = "dropped line");
        });

        let contents = std::fs::read_to_string(&file_path).unwrap();
        assert!(contents.contains("kept line"));
        assert!(!contents.contains("dropped line"));
    }

    #[test]
    #[serial]
    fn test_install_thread_local() {
        let (_dir, file_path) = temp_log_file();

        let guard = TracingConfig::new_file(file_path.clone(), LevelFilter::DEBUG)
            .install_thread_local()
            .unwrap();
        tracing::warn!(message = "thread local line");
        drop(guard);
        tracing::warn!(message = "after guard dropped");

        let contents = std::fs::read_to_string(&file_path).unwrap();
        assert!(contents.contains("thread local line"));
        assert!(!contents.contains("after guard dropped"));
    }

    /// The global default can be set once per process, and stays set for every other
    /// test in this binary.
    #[test]
    #[serial]
    fn test_install_global_only_once() {
        let (_dir, file_path) = temp_log_file();

        TracingConfig::new_file(file_path.clone(), LevelFilter::DEBUG)
            .install_global()
            .unwrap();
        tracing::info!(message = "global line");

        let second = TracingConfig::new_file(file_path.clone(), LevelFilter::DEBUG)
            .install_global();
        assert!(second.is_err());

        let contents = std::fs::read_to_string(&file_path).unwrap();
        assert!(contents.contains("global line"));
    }
}
