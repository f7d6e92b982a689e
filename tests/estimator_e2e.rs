use carquote::client::{ClientError, EstimatorClient};
use carquote::{CarQuote, Server, api};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

struct Running {
    url: String,
    stop: oneshot::Sender<()>,
    handle: JoinHandle<Result<(), carquote::Error>>,
}

async fn spawn_server() -> Running {
    let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop, stopped) = oneshot::channel::<()>();

    let handle = tokio::spawn(async move {
        Server::from_listener(listener)
            .serve_with_shutdown(api::router(), async {
                let _ = stopped.await;
            })
            .await
    });

    Running { url: format!("http://{addr}"), stop, handle }
}

fn quote(name: &str, kind: &str, price: f64, description: &str) -> CarQuote {
    CarQuote {
        name: name.to_owned(),
        kind: kind.to_owned(),
        price,
        description: description.to_owned(),
    }
}

#[tokio::test]
async fn e2e_welcome_and_estimates() {
    let server = spawn_server().await;
    let client = EstimatorClient::new(&server.url);

    assert_eq!(client.welcome().await.unwrap(), "Welcome to Car Price Estimator API");

    let civic = client.estimate(&quote("Civic", "sedan", 20_000.0, "x")).await.unwrap();
    assert_eq!(civic, 25_000.0);

    let rx = client.estimate(&quote("RX350", "SUV", 35_000.0, "y")).await.unwrap();
    assert_eq!(rx, 45_000.0);

    let model_t = client.estimate(&quote("Model T", "truck", 10_000.0, "")).await.unwrap();
    assert_eq!(model_t, 10_000.0);

    server.stop.send(()).unwrap();
    server.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn e2e_missing_price_is_rejected_verbatim() {
    let server = spawn_server().await;

    let response = reqwest::Client::new()
        .post(format!("{}/carPriceEstimator", server.url))
        .header("content-type", "application/json")
        .body(r#"{"name":"Civic","type":"sedan","description":"x"}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 422);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["detail"].as_str().unwrap().contains("missing field `price`"));

    server.stop.send(()).unwrap();
    server.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn e2e_unknown_route_is_404() {
    let server = spawn_server().await;

    let response = reqwest::get(format!("{}/nope", server.url)).await.unwrap();
    assert_eq!(response.status().as_u16(), 404);

    let client = EstimatorClient::new(format!("{}/nope", server.url));
    let err = client.welcome().await.unwrap_err();
    assert!(matches!(err, ClientError::Status { status: 404, .. }));

    server.stop.send(()).unwrap();
    server.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn e2e_unreachable_service_is_a_connect_error() {
    // Bind then drop so the port is known to be closed.
    let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = EstimatorClient::new(format!("http://{addr}"));
    let err = client.welcome().await.unwrap_err();
    assert!(matches!(err, ClientError::Connect { .. }), "got {err:?}");
}
