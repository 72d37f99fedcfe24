//! End-to-end tests of the tool over real HTTP against a local listener.

use serde_json::{Value, json};
use std::time::Duration;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
    task::JoinHandle,
};
use weather_core::{
    Config, TOOL_NAME, Units, Upstream, UpstreamQuery, WeatherTool, provider::http::HttpUpstream,
};

/// Accept one connection, answer with `status` and `body`, return the request head.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");

        let mut head = Vec::new();
        let mut chunk = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut chunk).await.expect("read");
            if n == 0 {
                break;
            }
            head.extend_from_slice(&chunk[..n]);
        }

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.expect("write");
        let _ = socket.shutdown().await;

        String::from_utf8_lossy(&head).into_owned()
    });

    (format!("http://{addr}/data/3.0/onecall/day_summary"), handle)
}

fn tool(base_url: String, timeout_secs: u64) -> WeatherTool {
    let config = Config {
        api_key: Some("TEST_KEY".into()),
        base_url,
        timeout_secs,
        ..Config::default()
    };
    WeatherTool::from_config(&config).expect("tool should build")
}

fn paris() -> Value {
    json!({
        "latitude": 48.8566,
        "longitude": 2.3522,
        "date": "2024-01-01",
        "units": "metric",
        "response_format": "json"
    })
}

const DAY_SUMMARY: &str = r#"{"temperature":{"min":1.5,"max":7.25},"humidity":{"afternoon":81},"wind":{"max":{"speed":6.7,"direction":240}}}"#;

#[tokio::test]
async fn successful_lookup_sends_expected_query() {
    let (url, server) = serve_once("200 OK", DAY_SUMMARY).await;

    let res = tool(url, 5).call(TOOL_NAME, &paris()).await.expect("known tool");
    let head = server.await.expect("server task");

    assert!(!res.is_error, "{}", res.text);
    assert!(head.starts_with("GET /data/3.0/onecall/day_summary?"));
    let params = ["lat=48.8566", "lon=2.3522", "date=2024-01-01", "appid=TEST_KEY", "units=metric"];
    for param in params {
        assert!(head.contains(param), "missing {param} in {head}");
    }

    let value: Value = serde_json::from_str(&res.text).expect("json body");
    assert_eq!(value["location"]["timezone"], "+00:00");
    assert_eq!(value["temperature"]["max"]["value"].as_f64(), Some(7.25));
    assert_eq!(value["precipitation"]["total"].as_f64(), Some(0.0));
    assert_eq!(value["wind"]["max"]["speed_unit"], "m/s");
}

#[tokio::test]
async fn rate_limited_reply_uses_provider_message() {
    let (url, server) = serve_once("429 Too Many Requests", r#"{"message":"rate limited"}"#).await;

    let res = tool(url, 5).call(TOOL_NAME, &paris()).await.expect("known tool");
    server.await.expect("server task");

    assert!(res.is_error);
    assert_eq!(res.text, "Error: rate limited");
}

#[tokio::test]
async fn server_error_without_message_reports_status() {
    let (url, server) = serve_once("500 Internal Server Error", "{}").await;

    let res = tool(url, 5).call(TOOL_NAME, &paris()).await.expect("known tool");
    server.await.expect("server task");

    assert_eq!(res.text, "Error: Request failed with status code 500");
}

#[tokio::test]
async fn connection_refused_is_a_transport_error_without_the_key() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let res = tool(format!("http://{addr}/day_summary"), 5)
        .call(TOOL_NAME, &paris())
        .await
        .expect("known tool");

    assert!(res.is_error);
    assert!(res.text.starts_with("Error: Request failed: "), "{}", res.text);
    assert!(!res.text.contains("TEST_KEY"));
}

#[tokio::test]
async fn slow_provider_hits_the_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.expect("accept");
        tokio::time::sleep(Duration::from_secs(5)).await;
        drop(socket);
    });

    let upstream = HttpUpstream::new(&format!("http://{addr}/slow"), Duration::from_millis(200))
        .expect("upstream should build");

    let query = UpstreamQuery {
        latitude: 1.0,
        longitude: 2.0,
        date: "2024-01-01".into(),
        units: Units::Kelvin,
        api_key: "TEST_KEY".into(),
    };
    let err = upstream.get(&query).await.unwrap_err();

    assert!(err.to_string().starts_with("Request failed: "), "{err}");
    server.abort();
}
