//! Fake REST backend served by axum on an ephemeral port.

use axum::Router;
use tokio::net::TcpListener;

use crate::client::{HttpClient, HttpConfig};

/// Serve `router` under `/api` and return a client pointed at it.
pub async fn serve(router: Router) -> HttpClient {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().nest("/api", router);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    HttpClient::new(&HttpConfig {
        base_url: format!("http://{addr}/api"),
        ..HttpConfig::default()
    })
    .unwrap()
}
