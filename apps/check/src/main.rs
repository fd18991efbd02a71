//! Command-line check for cart rule action form payloads.

#![forbid(unsafe_code)]

mod check_config;
mod report;

use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

use cartrule_application::{CartRuleActionBuilder, FormDataBuilder};
use cartrule_core::AppError;
use serde_json::Value;
use tracing::{info, warn};

use crate::check_config::{CheckConfig, CheckMode, InputSource};
use crate::report::CheckReport;

fn main() -> Result<ExitCode, AppError> {
    dotenvy::dotenv().ok();
    check_config::init_tracing();

    let config = CheckConfig::load()?;
    let payload = read_payload(&config.input)?;

    let builder = CartRuleActionBuilder::new();
    let supported = builder.supports(&payload);
    let report = match config.mode {
        CheckMode::Supports => CheckReport::supports_only(supported),
        CheckMode::Build => CheckReport::built(supported, &builder.build(&payload)),
    };

    if report.is_failure() {
        warn!(supported, "cart rule action payload rejected");
    } else {
        info!(supported, "cart rule action payload checked");
    }

    let output = if config.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .map_err(|error| AppError::Internal(format!("failed to encode report: {error}")))?;
    println!("{output}");

    Ok(if report.is_failure() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn read_payload(input: &InputSource) -> Result<Value, AppError> {
    let raw = match input {
        InputSource::Stdin => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|error| AppError::Internal(format!("failed to read stdin: {error}")))?;
            buffer
        }
        InputSource::File(path) => fs::read_to_string(path).map_err(|error| {
            AppError::Internal(format!("failed to read '{}': {error}", path.display()))
        })?,
    };

    serde_json::from_str(&raw)
        .map_err(|error| AppError::Validation(format!("payload is not valid JSON: {error}")))
}
