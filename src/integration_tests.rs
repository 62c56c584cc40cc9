#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    use crate::app_system::OrderConsole;
    use crate::config::ConsoleConfig;
    use crate::controllers::{OrderFormFields, SubmitOutcome, LOAD_ORDERS_FAILED};
    use crate::domain::{Order, OrderDraft, Product};
    use crate::error::TransportError;
    use crate::mock_framework::{
        create_mock_order_client, create_mock_product_client, expect_create_order, expect_fetch_orders,
        expect_fetch_products,
    };

    #[tokio::test]
    async fn test_created_order_refreshes_list() {
        // 1. Setup Mocks
        let (order_client, mut order_rx) = create_mock_order_client(10);
        let (product_client, mut product_rx) = create_mock_product_client(10);
        let console = OrderConsole::with_transports(&ConsoleConfig::default(), order_client, product_client);
        console.refresh_list_on_created().await.unwrap();

        // 2. Activate both views
        let list_task = tokio::spawn({
            let list = console.order_list.clone();
            async move { list.activate().await }
        });
        let responder = expect_fetch_orders(&mut order_rx).await.expect("Expected FetchOrders");
        responder.send(Ok(vec![Order::new(1, "Widget", 2, "shipped")])).unwrap();
        assert_eq!(list_task.await.unwrap().unwrap().items.len(), 1);

        let form_task = tokio::spawn({
            let form = console.order_form.clone();
            async move { form.activate().await }
        });
        let responder = expect_fetch_products(&mut product_rx).await.expect("Expected FetchProducts");
        responder.send(Ok(vec![Product::new(1, "Widget", 10)])).unwrap();
        form_task.await.unwrap().unwrap();

        // 3. Submit an order
        console.order_form.set_product("Widget".to_string()).await.unwrap();
        console.order_form.set_quantity(2).await.unwrap();
        let submit_task = tokio::spawn({
            let form = console.order_form.clone();
            async move { form.submit().await }
        });
        let (draft, responder) = expect_create_order(&mut order_rx).await.expect("Expected CreateOrder");
        assert_eq!(draft, OrderDraft::new("Widget", 2));
        responder.send(Ok(Order::new(2, "Widget", 2, "CREATED"))).unwrap();
        assert!(matches!(submit_task.await.unwrap().unwrap(), SubmitOutcome::Created(_)));

        // 4. The created notification made the list fetch again
        let responder = expect_fetch_orders(&mut order_rx).await.expect("Expected refresh after creation");
        let refreshed = vec![Order::new(1, "Widget", 2, "shipped"), Order::new(2, "Widget", 2, "CREATED")];
        responder.send(Ok(refreshed.clone())).unwrap();

        let mut state = console.order_list.state().await.unwrap();
        for _ in 0..50 {
            if !state.loading {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
            state = console.order_list.state().await.unwrap();
        }
        assert_eq!(state.items, refreshed);

        console.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_submission_does_not_refresh_list() {
        let (order_client, mut order_rx) = create_mock_order_client(10);
        let (product_client, _product_rx) = create_mock_product_client(10);
        let console = OrderConsole::with_transports(&ConsoleConfig::default(), order_client, product_client);
        console.refresh_list_on_created().await.unwrap();

        console.order_form.set_product("Widget".to_string()).await.unwrap();
        let submit_task = tokio::spawn({
            let form = console.order_form.clone();
            async move { form.submit().await }
        });
        let (_, responder) = expect_create_order(&mut order_rx).await.unwrap();
        responder.send(Err(TransportError::Network("reset".to_string()))).unwrap();
        submit_task.await.unwrap().unwrap();

        // Nothing else reached the order transport.
        assert!(order_rx.try_recv().is_err());
        assert!(console.order_list.state().await.unwrap().items.is_empty());
    }

    // ------------------------------------------------------------------------
    // Full HTTP roundtrip against in-process backends
    // ------------------------------------------------------------------------

    type Store = Arc<Mutex<Vec<Value>>>;

    async fn serve(app: Router) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    async fn list_orders(State(store): State<Store>) -> Json<Value> {
        Json(Value::Array(store.lock().unwrap().clone()))
    }

    async fn create_order(State(store): State<Store>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        if body["quantity"].as_i64().unwrap_or(0) > 10 {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": { "message": "Out of stock" } })),
            );
        }
        let mut store = store.lock().unwrap();
        let order = json!({
            "id": store.len() + 1,
            "product": body["product"],
            "quantity": body["quantity"],
            "status": "CREATED"
        });
        store.push(order.clone());
        (StatusCode::OK, Json(order))
    }

    async fn list_products() -> Json<Value> {
        Json(json!([{ "id": 1, "name": "Widget", "stockQuantity": 10 }]))
    }

    #[tokio::test]
    async fn test_http_roundtrip() {
        let store: Store = Arc::new(Mutex::new(vec![
            json!({ "id": 1, "product": "Gadget", "quantity": 1, "status": "pending" }),
        ]));
        let orders_addr = serve(
            Router::new()
                .route("/orders", get(list_orders).post(create_order))
                .with_state(store.clone()),
        )
        .await;
        let inventory_addr = serve(Router::new().route("/inventory/products", get(list_products))).await;

        let config = ConsoleConfig::default().with_base_urls(
            &format!("http://{}/", orders_addr),
            &format!("http://{}", inventory_addr),
        );
        let console = OrderConsole::new(&config).unwrap();

        let orders = console.order_list.activate().await.unwrap();
        assert_eq!(orders.items, vec![Order::new(1, "Gadget", 1, "pending")]);

        let form = console.order_form.activate().await.unwrap();
        assert_eq!(form.view.items, vec![Product::new(1, "Widget", 10)]);

        // Rejected by the backend: message surfaces, fields stay.
        console.order_form.set_product("Widget".to_string()).await.unwrap();
        console.order_form.set_quantity(50).await.unwrap();
        let outcome = console.order_form.submit().await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Failed("Out of stock".to_string()));
        assert_eq!(console.order_form.fields().await.unwrap(), OrderFormFields::new("Widget", 50));

        console.order_form.set_quantity(2).await.unwrap();
        let outcome = console.order_form.submit().await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Created(Order::new(2, "Widget", 2, "CREATED")));
        assert_eq!(console.order_form.fields().await.unwrap(), OrderFormFields::default());

        let refreshed = console.order_list.refresh().await.unwrap();
        assert_eq!(refreshed.items.len(), 2);
        assert_eq!(refreshed.error, None);

        console.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_backend_shows_fixed_message() {
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };
        let url = format!("http://{}", addr);
        let config = ConsoleConfig::default().with_base_urls(&url, &url);
        let console = OrderConsole::new(&config).unwrap();

        let state = console.order_list.activate().await.unwrap();
        assert_eq!(state.error.as_deref(), Some(LOAD_ORDERS_FAILED));
        assert!(!state.loading);

        console.shutdown().await.unwrap();
    }
}
