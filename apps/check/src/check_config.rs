use std::env;
use std::path::PathBuf;

use cartrule_core::AppError;
use tracing_subscriber::EnvFilter;

/// Which builder operation the check runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckMode {
    /// Only report whether the payload is recognized.
    Supports,
    /// Report recognition and the built action or violation.
    Build,
}

/// Where the payload is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct CheckConfig {
    pub input: InputSource,
    pub pretty: bool,
    pub mode: CheckMode,
}

impl CheckConfig {
    pub fn load() -> Result<Self, AppError> {
        let input_path = env::args()
            .nth(1)
            .or_else(|| env::var("CARTRULE_CHECK_INPUT").ok());
        let pretty = env::var("CARTRULE_CHECK_PRETTY").ok();
        let mode = env::var("CARTRULE_CHECK_MODE").ok();

        Self::from_values(input_path.as_deref(), pretty.as_deref(), mode.as_deref())
    }

    fn from_values(
        input_path: Option<&str>,
        pretty: Option<&str>,
        mode: Option<&str>,
    ) -> Result<Self, AppError> {
        let input = match input_path.map(str::trim) {
            None | Some("") | Some("-") => InputSource::Stdin,
            Some(path) => InputSource::File(PathBuf::from(path)),
        };

        let pretty = pretty.unwrap_or("false").eq_ignore_ascii_case("true");

        let mode = match mode.unwrap_or("build") {
            "build" => CheckMode::Build,
            "supports" => CheckMode::Supports,
            other => {
                return Err(AppError::Validation(format!(
                    "CARTRULE_CHECK_MODE must be either 'build' or 'supports', got '{other}'"
                )));
            }
        };

        Ok(Self {
            input,
            pretty,
            mode,
        })
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
