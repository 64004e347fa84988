//! Caller layer: turns CLI arguments into one proxy call, emits audit
//! events around it and prints the JSON envelope on stdout

use crate::audit::{self, AuditEvent};
use crate::cli::Args;
use crate::config::Config;
use crate::dispatch::{OperationRegistry, Payload};
use crate::error::AppError;
use crate::models::{ErrorResponse, ProxyRequest, ProxyResponse};
use crate::provider::{SportsProvider, create_provider};
use serde_json::json;
use std::process::ExitCode;
use std::time::Instant;

/// Builds the (operationType, payload) pair from CLI arguments: either a
/// positional operation with `-p` entries, or a full `--request` envelope.
pub fn build_request(args: &Args) -> Result<ProxyRequest, AppError> {
    if let Some(raw) = &args.request {
        return serde_json::from_str::<ProxyRequest>(raw).map_err(|e| {
            AppError::validation("request", format!("request must be a valid JSON envelope: {e}"))
        });
    }

    match &args.operation {
        Some(operation) => Ok(ProxyRequest {
            operation_type: operation.clone(),
            payload: args.payload.iter().cloned().collect(),
        }),
        None => Err(AppError::validation(
            "operationType",
            "an operation name or a --request envelope is required",
        )),
    }
}

/// Handles the --list-config command.
pub async fn handle_list_config_command() -> Result<(), AppError> {
    Config::display().await
}

/// Handles configuration update commands (--set-base-url, --set-log-file,
/// --clear-log-file). Updates the config file and saves the changes.
pub async fn handle_config_update_command(args: &Args) -> Result<(), AppError> {
    let mut config = Config::load().await.unwrap_or_default();

    if let Some(new_base_url) = &args.new_base_url {
        config.api_base_url = new_base_url.clone();
    }

    if let Some(new_log_path) = &args.new_log_file_path {
        config.log_file_path = Some(new_log_path.clone());
    } else if args.clear_log_file_path {
        config.log_file_path = None;
        println!("Custom log file path cleared. Using default location.");
    }

    config.validate()?;
    config.save().await?;
    println!("Config updated successfully!");

    Ok(())
}

/// Executes one proxy operation end to end: resolve, validate, execute,
/// normalize, with audit events at each decision point.
///
/// Success prints the success envelope and exits zero; any classified
/// failure prints the error envelope and exits non-zero. Only setup-level
/// failures (e.g. an unknown provider) propagate as `Err`.
pub async fn run_operation(args: &Args, config: &Config) -> Result<ExitCode, AppError> {
    let request = match build_request(args) {
        Ok(request) => request,
        Err(e) => return Ok(print_error_envelope(None, &e)),
    };

    let request_id = audit::new_request_id();
    let operation_type = request.operation_type;
    let payload: Payload = request.payload;

    let provider = create_provider(config)?;
    let registry = OperationRegistry::new(provider);
    let started = Instant::now();

    let operation = match registry.get_operation(&operation_type) {
        Ok(operation) => operation,
        Err(e) => {
            AuditEvent::new(&request_id, &operation_type)
                .validation(false, Some(vec![e.to_string()]))
                .outcome("error")
                .error(e.to_string())
                .emit();
            return Ok(print_error_envelope(Some(&request_id), &e));
        }
    };

    if let Err(e) = operation.validate(&payload) {
        AuditEvent::new(&request_id, &operation_type)
            .validation(false, Some(vec![validation_reason(&e)]))
            .outcome("error")
            .error("Validation failed")
            .emit();
        return Ok(print_error_envelope(Some(&request_id), &e));
    }

    AuditEvent::new(&request_id, &operation_type)
        .validation(true, None)
        .provider(registry.provider().name())
        .emit();

    match operation.execute(registry.provider(), &payload).await {
        Ok(raw) => {
            let data = operation.normalize(raw);
            AuditEvent::new(&request_id, &operation_type)
                .provider(registry.provider().name())
                .target_url(format!("{}/...", config.api_base_url.trim_end_matches('/')))
                .upstream_status(200)
                .latency(started.elapsed())
                .outcome("success")
                .emit();

            let response = ProxyResponse {
                success: true,
                data,
                request_id: Some(request_id),
            };
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            let mut event = AuditEvent::new(&request_id, &operation_type)
                .provider(registry.provider().name())
                .target_url(format!("{}/...", config.api_base_url.trim_end_matches('/')))
                .latency(started.elapsed())
                .outcome("error")
                .error(e.to_string());
            if let Some(status) = e.upstream_status() {
                event = event.upstream_status(status);
            }
            event.emit();
            Ok(print_error_envelope(Some(&request_id), &e))
        }
    }
}

fn validation_reason(error: &AppError) -> String {
    match error {
        AppError::Validation { reason, .. } => reason.clone(),
        other => other.to_string(),
    }
}

/// Prints the classified error envelope on stdout and maps it to a failing
/// exit code. The transport status the error would carry over HTTP is
/// included in the details for scripting callers.
fn print_error_envelope(request_id: Option<&str>, error: &AppError) -> ExitCode {
    let details = match error {
        AppError::Validation { field, reason } => json!({
            "missing_field": field,
            "reason": reason,
        }),
        other => json!({
            "kind": other.kind(),
            "transportStatus": other.transport_status(),
        }),
    };
    let response = ErrorResponse {
        error: error.to_string(),
        details: Some(details),
        request_id: request_id.map(|id| id.to_string()),
    };
    match serde_json::to_string_pretty(&response) {
        Ok(body) => println!("{body}"),
        Err(e) => eprintln!("Failed to serialize error response: {e}"),
    }
    ExitCode::FAILURE
}
