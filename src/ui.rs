// src/ui.rs
use crate::comparison::{Comparison, Deviations}; // Runs the four methods on one grid
use crate::config::AppConfig; // Defaults for omitted request fields
use crate::error::Result as PendulumResult;
use crate::model::{PhysicalConstants, TimeGrid};
use crate::plot::{render_png, render_png_plain}; // PNG chart of the comparison
use actix_web::{error, web, HttpResponse, Result}; // Actix-web types for request handling and HTTP responses
use base64::{engine::general_purpose, Engine as _}; // Base64 encoder for embedding image data
use serde::{Deserialize, Serialize}; // Serde traits for JSON (de)serialization
use tracing::{info, warn};

#[derive(Debug, Default, Deserialize)]
pub struct SimParams {
    initial_angle_deg: Option<f64>, // Release angle from vertical (degrees)
    gravity: Option<f64>,           // Gravitational acceleration
    length: Option<f64>,            // Arm length
    t_max: Option<f64>,             // End of the time grid (exclusive)
    dt: Option<f64>,                // Grid spacing
    plot: Option<bool>,             // Whether to render the chart (default true)
    labels: Option<bool>,           // Title, axes and legend on the chart (default true)
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SimResponse {
    pub success: bool,                       // Whether every method produced a series
    pub error: Option<String>,               // Failure message when success is false
    pub period: f64,                         // Exact period 4K / sqrt(g/L)
    pub time: Vec<f64>,                      // Shared sample times
    pub rk45: Vec<f64>,                      // Numerically integrated angles
    pub linear: Vec<f64>,                    // Small-angle prediction
    pub exact: Vec<f64>,                     // Jacobi elliptic closed form
    pub fourier: Vec<f64>,                   // Two-harmonic series
    pub deviations: Option<DeviationsBody>,  // Max |method - exact|
    pub plot_image: Option<String>,          // Base64 PNG data URL
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DeviationsBody {
    pub rk45: f64,
    pub linear: f64,
    pub fourier: f64,
}

impl From<Deviations> for DeviationsBody {
    fn from(d: Deviations) -> Self {
        Self {
            rk45: d.rk45,
            linear: d.linear,
            fourier: d.fourier,
        }
    }
}

impl SimResponse {
    fn failure(message: String) -> Self {
        Self {
            success: false,
            error: Some(message),
            ..Self::default()
        }
    }
}

/// Validates the request against the configured defaults and runs the comparison.
fn run_simulation(params: &SimParams, config: &AppConfig) -> PendulumResult<SimResponse> {
    let run = &config.run;
    let angle_deg = params.initial_angle_deg.unwrap_or(run.initial_angle_deg);
    let constants = PhysicalConstants::from_degrees(
        angle_deg,
        params.gravity.unwrap_or(run.gravity),
        params.length.unwrap_or(run.length),
    )?;
    let grid = TimeGrid::new(0.0, params.t_max.unwrap_or(run.t_max), params.dt.unwrap_or(run.dt))?;

    let comparison = Comparison::run(&constants, &grid, &config.integrator)?;

    // Convert PNG bytes into a Base64 data URL
    let plot_image = if params.plot.unwrap_or(true) {
        let png = if params.labels.unwrap_or(true) {
            render_png(&comparison, angle_deg)?
        } else {
            render_png_plain(&comparison)?
        };
        Some(format!(
            "data:image/png;base64,{}",
            general_purpose::STANDARD.encode(&png)
        ))
    } else {
        None
    };

    Ok(SimResponse {
        success: true,
        error: None,
        period: comparison.period,
        time: comparison.times().to_vec(),
        deviations: Some(comparison.deviations.into()),
        rk45: comparison.rk45.angles,
        linear: comparison.linear.angles,
        exact: comparison.exact.angles,
        fourier: comparison.fourier.angles,
        plot_image,
    })
}

pub async fn simulate_handler(
    params: web::Json<SimParams>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse> {
    let params = params.into_inner();
    let config = config.into_inner();

    // The computation and PNG encoding are CPU-bound; keep them off the async workers
    let outcome = tokio::task::spawn_blocking(move || run_simulation(&params, &config))
        .await
        .map_err(error::ErrorInternalServerError)?;

    match outcome {
        Ok(response) => {
            info!(
                samples = response.time.len(),
                period = response.period,
                "simulation finished"
            );
            Ok(HttpResponse::Ok().json(response))
        }
        Err(e) => {
            // Same status as a success; the body carries the reason
            warn!(error = %e, "simulation rejected");
            Ok(HttpResponse::Ok().json(SimResponse::failure(e.to_string())))
        }
    }
}

pub async fn health_handler() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Registers the routes on an app or a test service.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_handler))
        .route("/simulate", web::post().to(simulate_handler));
}
