//! HTTP client for the order endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::application::ports::{ClientError, OrderApiPort, OrderList};
use crate::domain::order_entry::aggregate::{Order, OrderInput};
use crate::infrastructure::http::{
    ClearOrdersResponse, CreateOrderResponse, ErrorResponse, ListOrdersResponse,
};

/// Request timeout used by `HttpOrderApi::new`.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// reqwest implementation of `OrderApiPort`.
#[derive(Debug, Clone)]
pub struct HttpOrderApi {
    client: Client,
    base_url: String,
}

impl HttpOrderApi {
    /// Create a client for the server at `base_url`, e.g. `http://127.0.0.1:3000`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    /// Server base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, format!("{}{path}", self.base_url))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        decode(response).await
    }
}

/// Decode a success body, or turn an error status into `ClientError::Rejected`.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ClientError::Network(e.to_string()))?;

    if status.is_success() {
        return serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()));
    }

    let message = match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(err) => err.error,
        Err(_) if body.is_empty() => status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string(),
        Err(_) => body,
    };

    tracing::debug!(status = status.as_u16(), %message, "Order API rejected request");

    Err(ClientError::Rejected {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl OrderApiPort for HttpOrderApi {
    async fn create_order(&self, input: &OrderInput) -> Result<Order, ClientError> {
        let created: CreateOrderResponse = self
            .send(self.request(Method::POST, "/api/order").json(input))
            .await?;
        Ok(created.order)
    }

    async fn list_orders(&self) -> Result<OrderList, ClientError> {
        let listed: ListOrdersResponse = self.send(self.request(Method::GET, "/api/orders")).await?;
        Ok(OrderList {
            orders: listed.orders,
            count: listed.count,
        })
    }

    async fn clear_orders(&self) -> Result<String, ClientError> {
        let cleared: ClearOrdersResponse = self
            .send(self.request(Method::DELETE, "/api/orders"))
            .await?;
        Ok(cleared.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order_entry::value_objects::{OrderSide, OrderType};
    use crate::domain::shared::Symbol;
    use rust_decimal_macros::dec;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn limit_input() -> OrderInput {
        OrderInput {
            symbol: Some(Symbol::new("TCS")),
            order_type: Some(OrderType::Limit),
            quantity: Some(5),
            side: Some(OrderSide::Sell),
            price: Some(dec!(3500.5)),
            stop_price: None,
        }
    }

    fn order_json() -> serde_json::Value {
        serde_json::json!({
            "id": "ORD-1718000000000-abcd1234",
            "symbol": "TCS",
            "orderType": "Limit",
            "quantity": 5,
            "side": "Sell",
            "price": 3500.5,
            "timestamp": "2024-06-10T06:13:20.000Z"
        })
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let api = HttpOrderApi::new("http://localhost:3000/").unwrap();
        assert_eq!(api.base_url(), "http://localhost:3000");
    }

    #[tokio::test]
    async fn create_order_posts_camel_case_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/order"))
            .and(body_json(serde_json::json!({
                "symbol": "TCS",
                "orderType": "Limit",
                "quantity": 5,
                "side": "Sell",
                "price": 3500.5
            })))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(serde_json::json!({"success": true, "order": order_json()})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let api = HttpOrderApi::new(server.uri()).unwrap();
        let order = api.create_order(&limit_input()).await.unwrap();

        assert_eq!(order.id().as_str(), "ORD-1718000000000-abcd1234");
        assert_eq!(order.price(), Some(dec!(3500.5)));
        assert_eq!(order.stop_price(), None);
    }

    #[tokio::test]
    async fn error_body_message_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/order"))
            .respond_with(ResponseTemplate::new(400).set_body_json(
                serde_json::json!({"success": false, "error": "Missing required fields"}),
            ))
            .mount(&server)
            .await;

        let api = HttpOrderApi::new(server.uri()).unwrap();
        let err = api.create_order(&OrderInput::default()).await.unwrap_err();

        assert_eq!(
            err,
            ClientError::Rejected {
                status: 400,
                message: "Missing required fields".to_string()
            }
        );
    }

    #[tokio::test]
    async fn non_json_error_body_is_kept_raw() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/orders"))
            .respond_with(ResponseTemplate::new(502).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let api = HttpOrderApi::new(server.uri()).unwrap();
        let err = api.list_orders().await.unwrap_err();

        assert_eq!(
            err,
            ClientError::Rejected {
                status: 502,
                message: "upstream down".to_string()
            }
        );
    }

    #[tokio::test]
    async fn list_orders_returns_orders_and_count() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/orders"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "orders": [order_json()],
                "count": 1
            })))
            .mount(&server)
            .await;

        let api = HttpOrderApi::new(server.uri()).unwrap();
        let list = api.list_orders().await.unwrap();

        assert_eq!(list.count, 1);
        assert_eq!(list.orders[0].symbol().as_str(), "TCS");
    }

    #[tokio::test]
    async fn clear_orders_returns_message() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/orders"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"success": true, "message": "Cleared 4 orders"})),
            )
            .mount(&server)
            .await;

        let api = HttpOrderApi::new(server.uri()).unwrap();
        assert_eq!(api.clear_orders().await.unwrap(), "Cleared 4 orders");
    }

    #[tokio::test]
    async fn malformed_success_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/orders"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let api = HttpOrderApi::new(server.uri()).unwrap();
        let err = api.list_orders().await.unwrap_err();

        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        // Bind then drop to get a port with nothing listening.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let api = HttpOrderApi::new(format!("http://{addr}")).unwrap();
        let err = api.clear_orders().await.unwrap_err();

        assert!(matches!(err, ClientError::Network(_)));
    }
}
