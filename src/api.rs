use actix_web::{get, web, HttpResponse};

use crate::{
    simulator::Simulator,
    telemetry::{synthetic_history, TrackerStatus},
};

/// Identifier reported by the tracker status endpoint
#[derive(Debug, Clone)]
pub struct DeviceId(pub String);

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(current_position)
        .service(position_history)
        .service(tracker_status);
}

#[get("/api/current-position")]
pub async fn current_position(
    simulator: web::Data<Simulator>,
) -> actix_web::Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(simulator.tick()))
}

#[get("/api/position-history")]
pub async fn position_history() -> actix_web::Result<HttpResponse> {
    let history = synthetic_history(&mut rand::thread_rng());
    Ok(HttpResponse::Ok().json(history))
}

#[get("/api/tracker-status")]
pub async fn tracker_status(device_id: web::Data<DeviceId>) -> actix_web::Result<HttpResponse> {
    let status = TrackerStatus::sample(&mut rand::thread_rng(), &device_id.0);
    Ok(HttpResponse::Ok().json(status))
}
