//! Saves against a real HTTP endpoint on localhost.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use qlm_persist::{HttpTransport, SaveClient, SaveError, SavePayload, SaveQueue, TransportError};

#[derive(Clone)]
struct Endpoint {
    fail_first: usize,
    hits: Arc<AtomicUsize>,
    received: Arc<Mutex<Vec<SavePayload>>>,
}

async fn save_data(State(endpoint): State<Endpoint>, Json(payload): Json<SavePayload>) -> StatusCode {
    let hit = endpoint.hits.fetch_add(1, Ordering::SeqCst);
    if hit < endpoint.fail_first {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    endpoint.received.lock().unwrap().push(payload);
    StatusCode::OK
}

async fn spawn_endpoint(fail_first: usize) -> (String, Endpoint) {
    let endpoint = Endpoint {
        fail_first,
        hits: Arc::new(AtomicUsize::new(0)),
        received: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/save_data", post(save_data))
        .with_state(endpoint.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/save_data"), endpoint)
}

#[tokio::test]
async fn retries_server_errors_until_accepted() {
    let (url, endpoint) = spawn_endpoint(2).await;
    let client = SaveClient::new(HttpTransport::new(url).unwrap());

    let start = Instant::now();
    client
        .save("qlm_data.csv", "production,5,9000,images/object4.jpg,buv,cal,cal,1,700\n")
        .await
        .unwrap();

    assert_eq!(endpoint.hits.load(Ordering::SeqCst), 3);
    assert!(start.elapsed() >= Duration::from_millis(500));

    let received = endpoint.received.lock().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].filename, "qlm_data.csv");
    assert!(received[0].filedata.ends_with("cal,1,700\n"));
}

#[tokio::test]
async fn persistent_server_errors_exhaust_retries() {
    let (url, endpoint) = spawn_endpoint(usize::MAX).await;
    let client = SaveClient::new(HttpTransport::new(url).unwrap());

    let err = client.save("qlm_data.csv", "x\n").await.unwrap_err();
    assert!(matches!(
        err,
        SaveError::TooManyRetries {
            attempts: 3,
            last: TransportError::Status(500)
        }
    ));
    assert_eq!(endpoint.hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let transport =
        HttpTransport::with_timeout(format!("http://{addr}/save_data"), Duration::from_secs(2))
            .unwrap();
    let err = SaveClient::new(transport)
        .save("qlm_data.csv", "x\n")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SaveError::TooManyRetries {
            last: TransportError::Request(_),
            ..
        }
    ));
}

#[tokio::test]
async fn queue_delivers_through_http_in_order() {
    let (url, endpoint) = spawn_endpoint(0).await;
    let client = SaveClient::new(HttpTransport::new(url).unwrap());
    let (handle, queue) = SaveQueue::spawn(client, None);

    for i in 0..4 {
        handle.enqueue("qlm_data.csv", format!("{i}\n"));
    }
    drop(handle);
    let report = queue.finish().await.unwrap();
    assert_eq!(report.delivered, 4);

    let received: Vec<_> = endpoint
        .received
        .lock()
        .unwrap()
        .iter()
        .map(|p| p.filedata.clone())
        .collect();
    assert_eq!(received, ["0\n", "1\n", "2\n", "3\n"]);
}
