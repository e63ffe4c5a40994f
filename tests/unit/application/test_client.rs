use assert_json_diff::assert_json_eq;
use http_client_utils::application::builder::ClientBuilder;
use http_client_utils::application::config::AuthType;
use http_client_utils::application::client::Client;
use http_client_utils::error::AppError;
use http_client_utils::model::http::Query;
use http_client_utils::model::requests::GetOptions;
use mockito::{Matcher, Mock, Server, ServerGuard};
use reqwest::Method;
use serde_json::{Value, json};
use std::collections::HashMap;

fn client_for(server: &ServerGuard) -> Client {
    ClientBuilder::new()
        .set_base_url(format!("{}/", server.url()))
        .build()
        .unwrap()
}

fn page_mock(server: &mut ServerGuard, page: &str, limit: &str, body: Value) -> Mock {
    server
        .mock("GET", Matcher::Regex(r"^/items".to_string()))
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), page.into()),
            Matcher::UrlEncoded("limit".into(), limit.into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .expect(1)
        .create()
}

#[test]
fn test_client_get_request() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/test")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_header("x-request-id", "r-1")
        .with_body(r#"{"key":"value"}"#)
        .create();

    let client = client_for(&server);
    let mut response = client.get("/test", GetOptions::new()).unwrap();

    assert_eq!(response.status_code, 200);
    assert_eq!(response.headers["x-request-id"], "r-1");
    let first: Vec<Value> = response.collect_items().unwrap();
    assert_eq!(first, vec![json!({"key": "value"})]);

    // single pass: nothing left on a second drain
    assert_eq!(response.data().count(), 0);
    mock.assert();
}

#[test]
fn test_client_get_unwraps_configured_data_key() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/users")
        .with_status(200)
        .with_body(r#"{"data":[{"id":1},{"id":2}],"total":2}"#)
        .create();

    let client = ClientBuilder::new()
        .set_base_url(server.url())
        .set_data_key("data")
        .build()
        .unwrap();
    let mut response = client.get("users", GetOptions::new()).unwrap();

    // non-paginated calls yield the unwrapped payload as one item
    assert_json_eq!(
        response.collect_items().unwrap(),
        json!([[{"id": 1}, {"id": 2}]])
    );
    mock.assert();
}

#[test]
fn test_client_get_custom_data_key_wins() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/users")
        .with_status(200)
        .with_body(r#"{"data":"configured","results":"custom"}"#)
        .create();

    let client = ClientBuilder::new()
        .set_base_url(server.url())
        .set_data_key("data")
        .build()
        .unwrap();
    let mut response = client
        .get("/users", GetOptions::new().data_key("results"))
        .unwrap();

    assert_eq!(response.collect_items().unwrap(), vec![json!("custom")]);
    mock.assert();
}

#[test]
fn test_client_get_missing_data_key_is_item_error() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/users")
        .with_status(200)
        .with_body(r#"{"other":[]}"#)
        .create();

    let client = client_for(&server);
    let mut response = client
        .get("/users", GetOptions::new().data_key("data"))
        .unwrap();

    assert_eq!(response.status_code, 200);
    match response.data().next() {
        Some(Err(AppError::DataKeyNotFound(key))) => assert_eq!(key, "data"),
        other => panic!("Unexpected item: {other:?}"),
    }
    assert!(response.data().next().is_none());
    mock.assert();
}

#[test]
fn test_client_merges_headers_and_params() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", Matcher::Regex(r"^/search".to_string()))
        .match_header("accept", "application/vnd.custom+json")
        .match_header("x-default", "kept")
        .match_query(Matcher::UrlEncoded("q".into(), "rust".into()))
        .with_status(200)
        .with_body("[]")
        .create();

    let client = ClientBuilder::new()
        .set_base_url(server.url())
        .set_headers(HashMap::from([
            ("Accept".to_string(), "application/json".to_string()),
            ("X-Default".to_string(), "kept".to_string()),
        ]))
        .build()
        .unwrap();

    let options = GetOptions::new()
        .param("q", "rust")
        .header("Accept", "application/vnd.custom+json");
    let mut response = client.get("/search", options).unwrap();

    assert_eq!(response.collect_items().unwrap(), vec![json!([])]);
    mock.assert();
}

#[test]
fn test_client_non_success_status_is_returned() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/missing")
        .with_status(404)
        .with_body(r#"{"error":"not found"}"#)
        .create();

    let client = client_for(&server);
    let mut response = client.get("/missing", GetOptions::new()).unwrap();

    assert_eq!(response.status_code, 404);
    assert_eq!(
        response.collect_items().unwrap(),
        vec![json!({"error": "not found"})]
    );
    mock.assert();
}

#[test]
fn test_client_post_put_delete() {
    let mut server = Server::new();
    let post = server
        .mock("POST", "/items")
        .match_header("x-trace", "1")
        .match_body(Matcher::Json(json!({"name": "a"})))
        .with_status(201)
        .with_body(r#"{"id":7,"name":"a"}"#)
        .create();
    let put = server
        .mock("PUT", "/items/7")
        .match_body(Matcher::Json(json!({"name": "b"})))
        .with_status(200)
        .with_body(r#"{"id":7,"name":"b"}"#)
        .create();
    let delete = server
        .mock("DELETE", Matcher::Regex(r"^/items/7".to_string()))
        .match_query(Matcher::UrlEncoded("force".into(), "true".into()))
        .with_status(204)
        .create();

    let client = client_for(&server);
    let headers = HashMap::from([("X-Trace".to_string(), "1".to_string())]);

    let created: Value = client
        .post("/items", Some(&json!({"name": "a"})), Some(&headers))
        .unwrap();
    assert_eq!(created["id"], 7);

    let updated: Value = client
        .put("/items/7", Some(&json!({"name": "b"})), None)
        .unwrap();
    assert_eq!(updated["name"], "b");

    let params = Query::from([("force".to_string(), "true".to_string())]);
    let deleted: Value = client.delete("/items/7", Some(&params), None).unwrap();
    assert_eq!(deleted, Value::Null);

    post.assert();
    put.assert();
    delete.assert();
}

#[test]
fn test_client_raw_request() {
    let mut server = Server::new();
    let mock = server
        .mock("PATCH", "/items/1")
        .with_status(202)
        .with_body("accepted")
        .create();

    let client = client_for(&server);
    let raw = client
        .request(Method::PATCH, "items/1", None, None, None)
        .unwrap();

    assert_eq!(raw.status, 202);
    assert_eq!(raw.body, b"accepted");
    assert!(raw.json().is_err());
    mock.assert();
}

#[test]
fn test_client_transport_error_is_surfaced() {
    // nothing listens on port 9 of the loopback interface
    let client = ClientBuilder::new()
        .set_base_url("http://127.0.0.1:9")
        .build()
        .unwrap();
    let result = client.get("/anything", GetOptions::new());
    assert!(matches!(result, Err(AppError::Transport(_))));
}

#[test]
fn test_pagination_stops_after_short_page() {
    let mut server = Server::new();
    let p1 = page_mock(&mut server, "1", "2", json!(["a", "b"]));
    let p2 = page_mock(&mut server, "2", "2", json!(["c", "d"]));
    let p3 = page_mock(&mut server, "3", "2", json!(["e"]));
    let p4 = server
        .mock("GET", Matcher::Regex(r"^/items".to_string()))
        .match_query(Matcher::UrlEncoded("page".into(), "4".into()))
        .expect(0)
        .create();

    let client = client_for(&server);
    let mut response = client
        .get("/items", GetOptions::new().paginate_with("page", 2))
        .unwrap();

    assert_eq!(response.status_code, 200);
    let items = response.collect_items().unwrap();
    assert_eq!(items, vec![json!("a"), json!("b"), json!("c"), json!("d"), json!("e")]);

    p1.assert();
    p2.assert();
    p3.assert();
    p4.assert();
}

#[test]
fn test_pagination_is_lazy() {
    let mut server = Server::new();
    let p1 = page_mock(&mut server, "1", "2", json!(["a", "b"]));
    let p2 = server
        .mock("GET", Matcher::Regex(r"^/items".to_string()))
        .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
        .with_body("[]")
        .expect(0)
        .create();

    let client = client_for(&server);
    let mut response = client
        .get("/items", GetOptions::new().paginate_with("page", 2))
        .unwrap();

    let first_two: Vec<Value> = response
        .data()
        .take(2)
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(first_two, vec![json!("a"), json!("b")]);

    p1.assert();
    p2.assert();
}

#[test]
fn test_pagination_per_page_overrides_limit() {
    let mut server = Server::new();
    let p1 = page_mock(
        &mut server,
        "1",
        "100",
        json!({"per_page": 3, "items": [1, 2, 3]}),
    );
    let p2 = page_mock(&mut server, "2", "100", json!({"per_page": 3, "items": [4]}));

    let client = ClientBuilder::new()
        .set_base_url(server.url())
        .set_data_key("items")
        .build()
        .unwrap();
    let mut response = client.get("/items", GetOptions::new().paginate()).unwrap();

    assert_eq!(
        response.collect_items().unwrap(),
        vec![json!(1), json!(2), json!(3), json!(4)]
    );
    p1.assert();
    p2.assert();
}

#[test]
fn test_pagination_custom_page_key_and_params() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", Matcher::Regex(r"^/items".to_string()))
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("p".into(), "1".into()),
            Matcher::UrlEncoded("limit".into(), "10".into()),
            Matcher::UrlEncoded("sort".into(), "asc".into()),
        ]))
        .with_status(200)
        .with_body(r#"["only"]"#)
        .create();

    let client = client_for(&server);
    let options = GetOptions::new().param("sort", "asc").paginate_with("p", 10);
    let mut response = client.get("/items", options).unwrap();

    assert_eq!(response.collect_items().unwrap(), vec![json!("only")]);
    mock.assert();
}

#[test]
fn test_pagination_failure_keeps_earlier_items() {
    let mut server = Server::new();
    let p1 = page_mock(&mut server, "1", "2", json!(["a", "b"]));
    let p2 = server
        .mock("GET", Matcher::Regex(r"^/items".to_string()))
        .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
        .with_status(500)
        .with_body("internal error")
        .expect(1)
        .create();

    let client = client_for(&server);
    let mut response = client
        .get("/items", GetOptions::new().paginate_with("page", 2))
        .unwrap();

    let items: Vec<Result<Value, AppError>> = response.data().collect();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].as_ref().unwrap(), &json!("a"));
    assert_eq!(items[1].as_ref().unwrap(), &json!("b"));
    assert!(matches!(items[2], Err(AppError::Json(_))));
    assert!(response.data().next().is_none());

    p1.assert();
    p2.assert();
}

#[test]
fn test_pagination_missing_data_key_on_page() {
    let mut server = Server::new();
    let p1 = page_mock(&mut server, "1", "1", json!({"items": ["a"]}));
    let p2 = page_mock(&mut server, "2", "1", json!({"unexpected": []}));

    let client = ClientBuilder::new()
        .set_base_url(server.url())
        .set_data_key("items")
        .build()
        .unwrap();
    let mut response = client
        .get("/items", GetOptions::new().paginate_with("page", 1))
        .unwrap();

    assert!(matches!(response.data().next(), Some(Ok(v)) if v == json!("a")));
    assert!(matches!(
        response.data().next(),
        Some(Err(AppError::DataKeyNotFound(_)))
    ));
    assert!(response.data().next().is_none());

    p1.assert();
    p2.assert();
}

#[test]
fn test_pagination_zero_limit_rejected_before_request() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create();

    let client = client_for(&server);
    let result = client.get("/items", GetOptions::new().paginate_with("page", 0));

    assert!(matches!(result, Err(AppError::InvalidInput(_))));
    mock.assert();
}

#[test]
fn test_pagination_empty_body_ends_sequence() {
    let mut server = Server::new();
    let p1 = page_mock(&mut server, "1", "2", json!({"items": ["a", "b"]}));
    let p2 = server
        .mock("GET", Matcher::Regex(r"^/items".to_string()))
        .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
        .with_status(204)
        .expect(1)
        .create();

    let client = client_for(&server);
    let mut response = client
        .get(
            "/items",
            GetOptions::new().data_key("items").paginate_with("page", 2),
        )
        .unwrap();

    assert_eq!(response.collect_items().unwrap(), vec![json!("a"), json!("b")]);
    p1.assert();
    p2.assert();
}

#[test]
fn test_pagination_non_success_first_page_is_returned() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", Matcher::Regex(r"^/items".to_string()))
        .with_status(503)
        .with_body(r#"{"error":"busy"}"#)
        .create();

    let client = client_for(&server);
    let mut response = client
        .get("/items", GetOptions::new().paginate_with("page", 2))
        .unwrap();

    assert_eq!(response.status_code, 503);
    assert_eq!(response.collect_items().unwrap(), vec![json!({"error": "busy"})]);
    mock.assert();
}

#[test]
fn test_token_overrides_lowercase_default_header_on_wire() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/secure")
        .match_header("authorization", "Bearer new")
        .with_status(200)
        .with_body("{}")
        .expect(10)
        .create();

    for _ in 0..10 {
        let client = ClientBuilder::new()
            .set_base_url(server.url())
            .set_headers(HashMap::from([(
                "authorization".to_string(),
                "Bearer old".to_string(),
            )]))
            .set_auth_type(AuthType::Token)
            .set_token("new")
            .build()
            .unwrap();
        let response = client.get("/secure", GetOptions::new()).unwrap();
        assert_eq!(response.status_code, 200);
    }
    mock.assert();
}
