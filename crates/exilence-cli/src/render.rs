//! Text and JSON rendering of startup outcomes.

use std::fmt::Write;

use serde_json::{json, Value};

use exilence_state::stores::MigrationState;
use exilence_state::{AppContext, ErrorReport, MigrationPlan, StartupOutcome};

/// The normal view: initial route plus one line per store.
pub fn ready_view(context: &AppContext) -> Result<String, serde_json::Error> {
    let mut out = String::new();
    let _ = writeln!(out, "ready");
    let _ = writeln!(out, "route: {}", context.initial_route());
    for (name, payload) in context.snapshot()? {
        let _ = writeln!(out, "  {:<12} {:>6} bytes", name.key(), payload.len());
    }
    Ok(out)
}

/// The fallback view: failure kind, message, and cause chain.
pub fn error_view(report: &ErrorReport) -> String {
    format!("startup failed\n{}", report)
}

/// Machine-readable outcome.
pub fn outcome_json(outcome: &StartupOutcome) -> Value {
    match outcome {
        StartupOutcome::Ready(context) => {
            let stores = match context.snapshot() {
                Ok(snapshot) => snapshot
                    .into_iter()
                    .map(|(name, payload)| {
                        let value = serde_json::from_str(&payload).unwrap_or(Value::String(payload));
                        (name.key().to_string(), value)
                    })
                    .collect::<serde_json::Map<_, _>>(),
                Err(e) => {
                    return json!({ "status": "error", "message": e.to_string() });
                }
            };
            json!({
                "status": "ready",
                "route": context.initial_route(),
                "stores": stores,
            })
        }
        StartupOutcome::Failed(report) => json!({
            "status": "error",
            "kind": report.kind,
            "message": report.message,
            "trace": report.trace,
        }),
    }
}

/// Migration record and the steps this build knows about.
pub fn migrations_view(
    record: Option<&str>,
    plan: &MigrationPlan,
) -> Result<String, serde_json::Error> {
    let state: MigrationState = match record {
        Some(payload) => serde_json::from_str(payload)?,
        None => MigrationState::default(),
    };

    let mut out = String::new();
    let _ = writeln!(
        out,
        "recorded: {}{}",
        state.current,
        if record.is_none() { " (no record)" } else { "" }
    );
    let _ = writeln!(out, "latest:   {}", plan.latest());
    for (version, description) in plan.describe() {
        let status = if version <= state.current { "applied" } else { "pending" };
        let _ = writeln!(out, "  {:>3}  {:<8} {}", version, status, description);
    }
    Ok(out)
}
