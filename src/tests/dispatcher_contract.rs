// Dispatcher header and body contract against a real listener.

#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;
    use axum::{Json, Router};
    use http::Method;
    use serde_json::json;

    use crate::tests::common::{memory_client, seed_pair, spawn_axum};

    fn echo_auth_router() -> Router {
        Router::new().route(
            "/api/v1/me",
            get(|headers: HeaderMap| async move {
                let auth: Vec<String> = headers
                    .get_all("authorization")
                    .iter()
                    .filter_map(|v| v.to_str().ok().map(|s| s.to_owned()))
                    .collect();
                Json(json!({ "auth": auth }))
            }),
        )
    }

    #[tokio::test]
    async fn attaches_exactly_one_bearer_header() {
        let (handle, addr) = spawn_axum(echo_auth_router()).await;
        let (client, store) = memory_client(&format!("http://{addr}"));
        seed_pair(&store, "A1", "R1").await;

        let payload = client
            .request(Method::GET, "/api/v1/me", None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(payload["auth"], json!(["Bearer A1"]));

        handle.abort();
    }

    #[tokio::test]
    async fn no_token_means_no_authorization_header() {
        let (handle, addr) = spawn_axum(echo_auth_router()).await;
        let (client, _store) = memory_client(&format!("http://{addr}"));

        let payload = client
            .request(Method::GET, "/api/v1/me", None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(payload["auth"], json!([]));

        handle.abort();
    }

    #[tokio::test]
    async fn unparseable_success_body_yields_none() {
        let router = Router::new().route(
            "/api/v1/odd",
            get(|| async { (StatusCode::OK, "definitely not json") }),
        );
        let (handle, addr) = spawn_axum(router).await;
        let (client, store) = memory_client(&format!("http://{addr}"));
        seed_pair(&store, "A1", "R1").await;

        let payload = client.request(Method::GET, "/api/v1/odd", None).await.unwrap();
        assert!(payload.is_none());

        handle.abort();
    }

    #[tokio::test]
    async fn repeated_gets_are_independent() {
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = counter.clone();
        let router = Router::new().route(
            "/api/v1/counter",
            get(move || {
                let c = counter_clone.clone();
                async move {
                    let n = c.fetch_add(1, Ordering::SeqCst);
                    Json(json!({ "n": n }))
                }
            }),
        );
        let (handle, addr) = spawn_axum(router).await;
        let (client, store) = memory_client(&format!("http://{addr}"));
        seed_pair(&store, "A1", "R1").await;

        let first = client
            .request(Method::GET, "/api/v1/counter", None)
            .await
            .unwrap()
            .unwrap();
        let second = client
            .request(Method::GET, "/api/v1/counter", None)
            .await
            .unwrap()
            .unwrap();

        // no caching at this layer: both calls hit the server
        assert_eq!(first["n"], 0);
        assert_eq!(second["n"], 1);
        assert_eq!(counter.load(Ordering::SeqCst), 2);

        handle.abort();
    }
}
