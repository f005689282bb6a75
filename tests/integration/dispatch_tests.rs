use crate::common::{LOGIN_BODY, config, path};
use assert_json_diff::assert_json_include;
use b1_client::prelude::*;
use mockito::{Matcher, Server};
use serde_json::json;

#[tokio::test]
async fn test_run_business_partners_action() {
    let mut server = Server::new_async().await;

    let login = server
        .mock("POST", path("Login").as_str())
        .with_status(200)
        .with_body(LOGIN_BODY)
        .expect(1)
        .create_async()
        .await;

    let partners = server
        .mock("GET", path("BusinessPartners").as_str())
        .match_query(Matcher::UrlEncoded(
            "$select".into(),
            "CardCode,CardType".into(),
        ))
        .with_status(200)
        .with_body(
            r#"{"odata.metadata":"$metadata#BusinessPartners","value":[{"CardCode":"C000082","CardType":"cCustomer"}]}"#,
        )
        .expect(1)
        .create_async()
        .await;

    let logout = server
        .mock("POST", path("Logout").as_str())
        .with_status(204)
        .expect(1)
        .create_async()
        .await;

    let client = SessionClient::run(config(&server), NamedAction::BusinessPartners, true)
        .await
        .expect("action should succeed");

    assert_eq!(client.response("0.CardCode"), Some(&json!("C000082")));
    assert!(client.session().session_id.is_none());

    login.assert_async().await;
    partners.assert_async().await;
    logout.assert_async().await;
}

#[tokio::test]
async fn test_action_without_url_is_rejected() {
    let config = ClientConfig::with_base_url(
        "http://127.0.0.1:9/b1s/v1",
        Credentials::new("SBODEMO", "manager", "secret"),
    );

    let result = SessionClient::action(config, RequestSpec::new(reqwest::Method::GET, "  "), true).await;

    assert!(matches!(result, Err(AppError::MissingUrl)));
}

#[tokio::test]
async fn test_post_quotation_returns_created_record() {
    let mut server = Server::new_async().await;

    server
        .mock("POST", path("Login").as_str())
        .with_status(200)
        .with_body(LOGIN_BODY)
        .create_async()
        .await;

    let quotation = server
        .mock("POST", path("Quotations").as_str())
        .match_body(Matcher::PartialJson(json!({
            "CardCode": "C000082",
            "DocumentLines": [{"ItemCode": "PREVENTIVO CRM", "Quantity": "1"}]
        })))
        .with_status(201)
        .with_body(r#"{"DocEntry":1173,"CardCode":"C000082"}"#)
        .expect(1)
        .create_async()
        .await;

    let mut client = SessionClient::new(config(&server)).expect("client should build");
    let created = client
        .post(
            "Quotations",
            json!({
                "CardCode": "C000082",
                "DocDate": "2022-03-23",
                "DocumentLines": [{"ItemCode": "PREVENTIVO CRM", "Quantity": "1"}]
            }),
        )
        .await
        .expect("post");

    assert_eq!(created["DocEntry"], json!(1173));
    assert_eq!(client.response("DocEntry"), Some(&json!(1173)));
    quotation.assert_async().await;
}

#[tokio::test]
async fn test_raw_text_body_keeps_overridden_content_type() {
    let mut server = Server::new_async().await;
    let payload = "--webappPDF--\nContent-Type: application/pdf\n\n%PDF-1.4\n--webappPDF--\n";

    server
        .mock("POST", path("Login").as_str())
        .with_status(200)
        .with_body(LOGIN_BODY)
        .create_async()
        .await;

    let attachment = server
        .mock("POST", path("Attachments2").as_str())
        .match_header("content-type", "multipart/form-data;boundary=--webappPDF--")
        .match_header("cookie", "B1SESSION=it-session; ROUTEID:.node0;")
        .match_body(payload)
        .with_status(201)
        .with_body(r#"{"AbsoluteEntry":42}"#)
        .expect(1)
        .create_async()
        .await;

    let mut client = SessionClient::new(config(&server)).expect("client should build");
    client
        .set_headers([("Content-Type", "multipart/form-data;boundary=--webappPDF--")])
        .expect("valid header");
    client.post("Attachments2", payload).await.expect("post");

    assert_eq!(client.response("AbsoluteEntry"), Some(&json!(42)));
    attachment.assert_async().await;
}

#[tokio::test]
async fn test_patch_with_no_content_and_delete_method() {
    let mut server = Server::new_async().await;

    server
        .mock("POST", path("Login").as_str())
        .with_status(200)
        .with_body(LOGIN_BODY)
        .create_async()
        .await;

    let patch = server
        .mock("PATCH", path("Quotations(1173)").as_str())
        .with_status(204)
        .expect(1)
        .create_async()
        .await;

    let delete = server
        .mock("DELETE", path("Quotations(1173)").as_str())
        .with_status(204)
        .expect(1)
        .create_async()
        .await;

    let put = server
        .mock("PUT", path("Quotations(1173)").as_str())
        .expect(0)
        .create_async()
        .await;

    let mut client = SessionClient::new(config(&server)).expect("client should build");
    let patched = client
        .patch("Quotations(1173)", json!({"Comments": "updated"}))
        .await
        .expect("patch");
    assert!(patched.is_null());
    assert!(!client.is_defined_response());

    client.delete("Quotations(1173)").await.expect("delete");

    patch.assert_async().await;
    delete.assert_async().await;
    put.assert_async().await;
}

#[tokio::test]
async fn test_debug_mode_captures_backend_error() {
    let mut server = Server::new_async().await;

    server
        .mock("POST", path("Login").as_str())
        .with_status(200)
        .with_body(LOGIN_BODY)
        .create_async()
        .await;

    server
        .mock("GET", path("Items('NOPE')").as_str())
        .match_query(Matcher::Any)
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":{"code":-2028,"message":{"lang":"en-us","value":"No matching records found"}}}"#)
        .create_async()
        .await;

    let mut client = SessionClient::new(config(&server).debug(true)).expect("client should build");
    let err = client.get("Items('NOPE')", &[]).await.expect_err("404");

    assert_eq!(err.status(), Some(404));
    let record = client.last_record().expect("debug record");
    assert!(record.failed);
    assert_eq!(record.status, Some(404));
    assert_json_include!(
        actual: &record.body,
        expected: json!({"error": {"message": {"value": "No matching records found"}}})
    );
    assert_eq!(client.response("status"), Some(&json!(404)));
}

#[tokio::test]
async fn test_unreachable_backend_is_a_request_failure() {
    let config = ClientConfig::with_base_url(
        "http://127.0.0.1:9/b1s/v1",
        Credentials::new("SBODEMO", "manager", "secret"),
    )
    .authentication_mode(AuthenticationMode::Basic)
    .timeout_secs(5);

    let mut client = SessionClient::new(config).expect("client should build");
    let err = client.get("Items", &[]).await.expect_err("nothing listens on port 9");

    assert_eq!(err.kind(), ErrorKind::RequestFailure);
    assert_eq!(err.status(), None);
    assert!(client.last_call_failed());
    assert_eq!(client.request_log(), ["Items"]);
}
