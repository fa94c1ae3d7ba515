use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use kameo::actor::ActorRef;
use prometheus::{Encoder, Registry, TextEncoder};
use std::sync::Arc;

use crate::actors::{GetSystemHealth, HealthMonitorActor, HealthStatus};

/// Start the metrics HTTP server
/// This should be called in a separate thread/runtime to avoid conflicts
pub async fn start_metrics_server(
    registry: Arc<Registry>,
    health_monitor: ActorRef<HealthMonitorActor>,
    port: u16,
) -> std::io::Result<()> {
    tracing::info!("📊 Starting metrics server on http://0.0.0.0:{}/metrics", port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(registry.clone()))
            .app_data(web::Data::new(health_monitor.clone()))
            .route("/metrics", web::get().to(metrics_handler))
            .route("/health", web::get().to(health_handler))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}

async fn metrics_handler(registry: web::Data<Arc<Registry>>) -> impl Responder {
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();

    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return HttpResponse::InternalServerError().finish();
    }

    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(buffer)
}

async fn health_handler(health_monitor: web::Data<ActorRef<HealthMonitorActor>>) -> impl Responder {
    let health = match health_monitor.ask(GetSystemHealth).await {
        Ok(health) => health,
        Err(_) => {
            return HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "unknown",
                "service": "order-notifier"
            }));
        }
    };

    let components: serde_json::Map<String, serde_json::Value> = health
        .components
        .iter()
        .map(|(name, component)| {
            (
                name.clone(),
                serde_json::json!({
                    "status": component.status.label(),
                    "details": component.details,
                    "last_check": component.last_check,
                }),
            )
        })
        .collect();

    let body = serde_json::json!({
        "status": health.overall_status.label(),
        "service": "order-notifier",
        "components": components,
        "check_time": health.check_time,
    });

    match health.overall_status {
        HealthStatus::Unhealthy(_) => HttpResponse::ServiceUnavailable().json(body),
        _ => HttpResponse::Ok().json(body),
    }
}
