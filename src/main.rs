use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;
use workmod::config::AppConfig;
use workmod::error::AppError;
use workmod::telemetry;
use workmod::workflows::case::{
    CaseData, CaseProgressionController, CaseViewState, NavigationGate,
};
use workmod::workflows::roster::RosterImporter;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Case Progression Engine",
    about = "Score, track, and progress occupational-health cases from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Work with individual case files
    Case {
        #[command(subcommand)]
        command: CaseCommand,
    },
    /// Work with worker roster exports
    Roster {
        #[command(subcommand)]
        command: RosterCommand,
    },
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum CaseCommand {
    /// Derive scores, section statuses, and follow-up dates for a case
    Derive(CaseDeriveArgs),
}

#[derive(Args, Debug)]
struct CaseDeriveArgs {
    /// Path to a case snapshot in JSON form
    #[arg(long)]
    case: PathBuf,
    /// Emit the derived state as JSON instead of the readable summary
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum RosterCommand {
    /// Validate a semicolon-delimited roster export
    Validate(RosterValidateArgs),
}

#[derive(Args, Debug)]
struct RosterValidateArgs {
    /// Path to the roster CSV export
    #[arg(long)]
    csv: PathBuf,
    /// Company name recorded on every imported worker
    #[arg(long)]
    empresa: String,
    /// Registration date used when a row carries no usable exam date
    /// (defaults to today)
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct CaseDeriveRequest {
    case: CaseData,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Case {
            command: CaseCommand::Derive(args),
        } => run_case_derive(args),
        Command::Roster {
            command: RosterCommand::Validate(args),
        } => run_roster_validate(args),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/case/derive", post(case_derive_endpoint))
        .layer(prometheus_layer)
        .with_state(state);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "case progression engine ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_case_derive(args: CaseDeriveArgs) -> Result<(), AppError> {
    let raw = std::fs::read_to_string(&args.case)?;
    let case: CaseData = serde_json::from_str(&raw)?;

    let controller = CaseProgressionController::new(case, NavigationGate::Free)?;
    let view = controller.view();

    if args.json {
        println!("{}", serde_json::to_string_pretty(view)?);
    } else {
        render_case_view(view);
    }

    Ok(())
}

fn run_roster_validate(args: RosterValidateArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let report = RosterImporter::from_path(&args.csv, &args.empresa, today)?;

    println!(
        "Roster: {} worker(s) accepted, {} row(s) skipped",
        report.workers.len(),
        report.skipped.len()
    );
    for worker in &report.workers {
        println!(
            "- {} | {} | {} | registrado {}",
            worker.dni_ce_pas, worker.apellidos_nombre, worker.empresa, worker.fecha_registro
        );
    }
    for skipped in &report.skipped {
        println!("! fila {}: {}", skipped.row, skipped.reason);
    }

    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

async fn case_derive_endpoint(
    Json(payload): Json<CaseDeriveRequest>,
) -> Result<Json<CaseViewState>, AppError> {
    let controller = CaseProgressionController::new(payload.case, NavigationGate::Free)?;
    Ok(Json(controller.view().clone()))
}

fn render_case_view(view: &CaseViewState) {
    println!("Case derivation");
    println!("Status: {:?} | chain: {:?}", view.status, view.chain_state);

    println!("\nSections");
    for step in &view.steps {
        println!(
            "- {} {} | {} | {:?}",
            step.label,
            step.title,
            step.status.label(),
            step.lock
        );
    }

    println!("\nAssessment scores");
    for (name, score) in [
        ("Evaluación A", &view.assessment_score),
        ("Evaluación A-2.1", &view.assessment2_score),
    ] {
        println!(
            "- {}: {} ({} / {})",
            name, score.max_score, score.definition, score.percentage
        );
        if !score.contributing.is_empty() {
            println!("  características: {}", score.contributing.join(", "));
        }
    }

    if view.reevaluations.is_empty() {
        println!("\nReevaluaciones: ninguna");
    } else {
        println!("\nReevaluaciones");
        for entry in &view.reevaluations {
            let fecha = entry
                .fecha
                .map(|fecha| fecha.to_string())
                .unwrap_or_else(|| "sin fecha".to_string());
            println!(
                "- #{} | {} | +{} días | total {} días",
                entry.ordinal, fecha, entry.dias_adicionales, entry.total_dias
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Json;
    use workmod::workflows::case::{CaseStatus, ChainState, StepStatus};

    fn sample_case() -> CaseData {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
        CaseData::new(today)
    }

    #[tokio::test]
    async fn case_derive_endpoint_returns_full_view() {
        let request = CaseDeriveRequest {
            case: sample_case(),
        };

        let Json(body) = super::case_derive_endpoint(Json(request))
            .await
            .expect("derivation succeeds");

        assert_eq!(body.status, CaseStatus::Activo);
        assert_eq!(body.steps.len(), 5);
        assert_eq!(body.chain_state, ChainState::Active);
        assert_eq!(body.assessment_score.max_score, 0);
        assert_eq!(body.assessment_score.percentage, "0%");
    }

    #[tokio::test]
    async fn fresh_case_sections_start_below_complete() {
        let request = CaseDeriveRequest {
            case: sample_case(),
        };

        let Json(body) = super::case_derive_endpoint(Json(request))
            .await
            .expect("derivation succeeds");

        assert!(body
            .steps
            .iter()
            .all(|step| step.status != StepStatus::Complete));
    }

    #[tokio::test]
    async fn derive_route_answers_over_http() {
        use axum::body::Body;
        use axum::http::Request;
        use tower::ServiceExt;

        let app = Router::new().route("/api/v1/case/derive", post(super::case_derive_endpoint));
        let payload =
            serde_json::to_vec(&json!({ "case": sample_case() })).expect("payload encodes");

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/case/derive")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload))
            .expect("request builds");

        let response = app.oneshot(request).await.expect("route responds");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn parse_date_accepts_iso_only() {
        assert!(parse_date("2024-01-31").is_ok());
        assert!(parse_date("31-01-2024").is_err());
    }
}
