//! Tests for response shaping, configuration and the connection handler.

#[cfg(test)]
mod server_tests {
    use std::collections::HashMap;
    use std::io::{self, Cursor};
    use std::pin::Pin;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::task::{Context, Poll};
    use std::time::Duration;
    use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, ReadBuf};
    use serde_json::Value;

    use crate::parser::HttpRequest;
    use crate::routing::{HandlerArgs, Rejection, Router, GLOBAL_SCOPE};
    use crate::server::{
        Error, HttpResponse, HttpServer, ResponseDescriptor, ResponseValue, ServerConfig, StatusCode,
        shape, DEFAULT_HOST, DEFAULT_PORT,
    };

    // Mock TcpStream for testing
    struct MockTcpStream {
        read_data: Cursor<Vec<u8>>,
        write_data: Vec<u8>,
    }

    impl MockTcpStream {
        fn new(read_data: &[u8]) -> Self {
            Self {
                read_data: Cursor::new(read_data.to_vec()),
                write_data: Vec::new(),
            }
        }

        fn written(&self) -> String {
            String::from_utf8_lossy(&self.write_data).into_owned()
        }
    }

    impl AsyncRead for MockTcpStream {
        fn poll_read(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            let this = self.get_mut();
            let n = std::io::Read::read(&mut this.read_data, buf.initialize_unfilled())?;
            buf.advance(n);
            Poll::Ready(Ok(()))
        }
    }

    impl AsyncWrite for MockTcpStream {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            let this = self.get_mut();
            this.write_data.extend_from_slice(buf);
            Poll::Ready(Ok(buf.len()))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    fn test_router() -> Router {
        let mut builder = Router::builder();
        builder
            .get("/hello/:name", |args: HandlerArgs| async move {
                Ok::<_, Error>(ResponseValue::from(format!("Hello, {}!", &args.params[0])))
            })
            .unwrap();
        builder
            .post("/items", |_args: HandlerArgs| async {
                Ok::<_, Error>(ResponseValue::error(StatusCode::CREATED, "created"))
            })
            .unwrap();
        builder.middleware("/guarded", |_req: HttpRequest| async {
            Err::<Value, _>(Rejection::new("nope"))
        });
        builder
            .get("/guarded", |_args: HandlerArgs| async { Ok::<_, Error>(ResponseValue::from("inside")) })
            .unwrap();
        builder.build()
    }

    // Response shaping

    #[test]
    fn test_shape_plain_uses_transport_defaults() {
        let response = shape(&ResponseValue::from("hello"));
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.header("Content-Type"), None);
        assert_eq!(response.header("Content-Length"), Some("5"));
        assert_eq!(response.body, b"hello");
    }

    #[test]
    fn test_shape_descriptor_with_status_and_type() {
        let value = ResponseValue::Descriptor(ResponseDescriptor {
            status: Some(StatusCode::CREATED),
            content_type: Some("text/csv".to_string()),
            body: b"a,b\n1,2\n".to_vec(),
        });

        let response = shape(&value);
        assert_eq!(response.status, StatusCode::CREATED);
        assert_eq!(response.header("content-type"), Some("text/csv"));
        assert_eq!(response.body, b"a,b\n1,2\n");
    }

    #[test]
    fn test_shape_descriptor_defaults() {
        let value = ResponseValue::from(ResponseDescriptor {
            body: b"raw".to_vec(),
            ..Default::default()
        });

        let response = shape(&value);
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.header("Content-Type"), None);
        assert_eq!(response.body, b"raw");
    }

    #[test]
    fn test_shape_is_idempotent() {
        let value = ResponseValue::json(&serde_json::json!({ "ok": true })).unwrap();
        let first = shape(&value);
        let second = shape(&value);
        assert_eq!(first, second);
        assert_eq!(first.to_bytes(), second.to_bytes());
    }

    #[test]
    fn test_json_helper() {
        let value = ResponseValue::json(&vec![1, 2, 3]).unwrap();
        let response = shape(&value);
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(response.body, b"[1,2,3]");
    }

    #[test]
    fn test_error_helper() {
        let status = StatusCode::from_u16(418).unwrap();
        let response = shape(&ResponseValue::error(status, "short and stout"));
        assert_eq!(response.status.as_u16(), 418);
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(response.body, br#"{"error":"short and stout"}"#);
    }

    #[test]
    fn test_plain_value_overrides() {
        let value = ResponseValue::from("gone").with_status(StatusCode::NOT_FOUND).with_content_type("text/plain");
        let response = shape(&value);
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.header("Content-Type"), Some("text/plain"));
        assert_eq!(response.body, b"gone");
    }

    #[test]
    fn test_status_code_range() {
        assert!(matches!(StatusCode::from_u16(99), Err(Error::InvalidStatus(99))));
        assert!(matches!(StatusCode::from_u16(1000), Err(Error::InvalidStatus(1000))));
        assert_eq!(StatusCode::from_u16(299).unwrap().reason_phrase(), "");
        assert_eq!(StatusCode::NOT_FOUND.to_string(), "404 Not Found");
    }

    #[test]
    fn test_response_to_bytes() {
        let response = HttpResponse::new(StatusCode::OK)
            .with_content_type("text/plain")
            .with_body_string("hi");

        let bytes = String::from_utf8(response.to_bytes()).unwrap();
        assert_eq!(
            bytes,
            "HTTP/1.1 200 OK\r\nContent-Length: 2\r\nContent-Type: text/plain\r\nServer: microroute-rs\r\n\r\nhi"
        );
    }

    // Configuration

    #[test]
    fn test_config_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.max_connections, 1024);
        assert_eq!(config.read_buffer_size, 8192);
        assert_eq!(config.addr(), "localhost:8080");
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_config_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[("HOST", "0.0.0.0"), ("PORT", "3000")])).unwrap();
        assert_eq!(config.addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_config_blank_values_fall_back() {
        let config = ServerConfig::from_lookup(lookup(&[("HOST", " "), ("PORT", "")])).unwrap();
        assert_eq!(config.addr(), "localhost:8080");
    }

    #[test]
    fn test_config_invalid_port() {
        for bad in ["abc", "70000", "0", "-1"] {
            let result = ServerConfig::from_lookup(lookup(&[("PORT", bad)]));
            assert!(
                matches!(result, Err(Error::InvalidConfig { ref var, ref value, .. }) if var == "PORT" && value == bad),
                "PORT={bad} should be rejected"
            );
        }
    }

    // Connection handling

    #[tokio::test]
    async fn test_handle_connection_with_matched_route() {
        let mut stream = MockTcpStream::new(b"GET /hello/world HTTP/1.1\r\nHost: localhost\r\n\r\n");
        let router = test_router();

        let result = HttpServer::handle_connection(&mut stream, &router, 1024).await;
        assert!(result.is_ok());

        let response = stream.written();
        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response.contains("Content-Length: 13\r\n"));
        assert!(response.ends_with("\r\n\r\nHello, world!"));
    }

    #[tokio::test]
    async fn test_handle_connection_with_not_found() {
        let mut stream = MockTcpStream::new(b"GET /nonexistent HTTP/1.1\r\nHost: localhost\r\n\r\n");
        let router = test_router();

        // A 404 is a normal outcome, not a connection error
        let result = HttpServer::handle_connection(&mut stream, &router, 1024).await;
        assert!(result.is_ok());

        let response = stream.written();
        assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert!(response.ends_with("\r\n\r\nResource not found"));
    }

    #[tokio::test]
    async fn test_handle_connection_with_wrong_method() {
        let mut stream = MockTcpStream::new(b"DELETE /items HTTP/1.1\r\nHost: localhost\r\n\r\n");
        let router = test_router();

        HttpServer::handle_connection(&mut stream, &router, 1024).await.unwrap();
        assert!(stream.written().starts_with("HTTP/1.1 404 Not Found\r\n"));
    }

    #[tokio::test]
    async fn test_handle_connection_with_error_helper() {
        let mut stream = MockTcpStream::new(b"POST /items HTTP/1.1\r\nHost: localhost\r\n\r\n");
        let router = test_router();

        HttpServer::handle_connection(&mut stream, &router, 1024).await.unwrap();
        let response = stream.written();
        assert!(response.starts_with("HTTP/1.1 201 Created\r\n"));
        assert!(response.contains("Content-Type: application/json\r\n"));
        assert!(response.ends_with(r#"{"error":"created"}"#));
    }

    #[tokio::test]
    async fn test_handle_connection_with_rejected_middleware() {
        let mut stream = MockTcpStream::new(b"GET /guarded HTTP/1.1\r\nHost: localhost\r\n\r\n");
        let router = test_router();

        HttpServer::handle_connection(&mut stream, &router, 1024).await.unwrap();
        let response = stream.written();
        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response.ends_with("\r\n\r\nnope"));
        assert!(!response.contains("inside"));
    }

    #[tokio::test]
    async fn test_handle_connection_with_invalid_request() {
        let mut stream = MockTcpStream::new(b"INVALID REQUEST");
        let router = test_router();

        let result = HttpServer::handle_connection(&mut stream, &router, 1024).await;
        assert!(matches!(result, Err(Error::ParseError(_))));

        let response = stream.written();
        assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));
        assert!(response.contains("Error parsing request:"));
    }

    #[tokio::test]
    async fn test_handle_connection_with_head_split_across_reads() {
        let (mut client, mut server) = tokio::io::duplex(1024);
        let router = test_router();

        let client_task = tokio::spawn(async move {
            client.write_all(b"GET /hello/split HTTP/1.1\r\n").await.unwrap();
            tokio::time::sleep(Duration::from_millis(20)).await;
            client.write_all(b"Host: localhost\r\n\r\n").await.unwrap();

            let mut response = Vec::new();
            client.read_to_end(&mut response).await.unwrap();
            String::from_utf8(response).unwrap()
        });

        HttpServer::handle_connection(&mut server, &router, 1024).await.unwrap();
        drop(server);

        let response = client_task.await.unwrap();
        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response.ends_with("\r\n\r\nHello, split!"));
    }

    #[tokio::test]
    async fn test_handle_connection_closed_without_data() {
        let mut stream = MockTcpStream::new(b"");
        let router = test_router();

        let result = HttpServer::handle_connection(&mut stream, &router, 1024).await;
        assert!(result.is_ok());
        assert!(stream.written().is_empty());
    }

    #[tokio::test]
    async fn test_exactly_one_response_per_request() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let mut builder = Router::builder();
        builder.middleware(GLOBAL_SCOPE, |_req: HttpRequest| async { Ok::<_, Rejection>(Value::Null) });
        builder
            .get("/once", move |_args: HandlerArgs| {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, Error>(ResponseValue::from("once")) }
            })
            .unwrap();
        let router = builder.build();

        let mut stream = MockTcpStream::new(b"GET /once HTTP/1.1\r\nHost: localhost\r\n\r\n");
        HttpServer::handle_connection(&mut stream, &router, 1024).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(stream.written().matches("HTTP/1.1 ").count(), 1);
    }

    #[tokio::test]
    async fn test_server_creation() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 9090,
            max_connections: 100,
            read_buffer_size: 4096,
        };

        let server = HttpServer::new(config.clone(), test_router());
        assert_eq!(server.config, config);
        assert_eq!(server.router.routes().len(), 3);
        assert_eq!(server.router.middleware().len(), 1);
    }
}
