use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use ecoreborn::handler::health::health_handler;
use ecoreborn::healthcheck_with_port;
use std::net::TcpListener;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;

fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

async fn spawn(app: Router) -> (u16, JoinHandle<()>) {
    let port = free_port();
    let handle = tokio::spawn(async move {
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .unwrap();
        axum::serve(listener, app).await.unwrap();
    });
    sleep(Duration::from_millis(100)).await;
    (port, handle)
}

#[tokio::test]
async fn test_healthcheck_succeeds_against_health_handler() {
    let (port, server) = spawn(Router::new().route("/v1/health", get(health_handler))).await;

    let result = healthcheck_with_port(port).await;

    assert!(result.is_ok(), "{result:?}");
    server.abort();
}

#[tokio::test]
async fn test_healthcheck_fails_when_nothing_listens() {
    let result = healthcheck_with_port(free_port()).await;

    let err = result.unwrap_err();
    assert!(err.to_string().starts_with("Healthcheck failed: Request failed"));
}

#[tokio::test]
async fn test_healthcheck_fails_on_unhealthy_status() {
    let app = Router::new().route(
        "/v1/health",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "Unhealthy") }),
    );
    let (port, server) = spawn(app).await;

    let err = healthcheck_with_port(port).await.unwrap_err();

    assert!(err.to_string().contains("503"));
    server.abort();
}
