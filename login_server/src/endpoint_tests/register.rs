use std::sync::Arc;

use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use login_engine::{test_utils::MockDirectory, CredentialStore, DirectoryError, RegistrationApi};
use mockall::Sequence;
use serde_json::json;

use super::helpers::*;
use crate::routes::RegisterRoute;

const ADDRESS: &str = "http://accounts/addresses/57a98d98e4b00679b4a830ad";
const CARD: &str = "http://accounts/cards/57a98d98e4b00679b4a830ae";

fn configure_app(credentials: Arc<CredentialStore>, directory: MockDirectory) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(RegistrationApi::new(directory, credentials)))
            .service(RegisterRoute::<MockDirectory>::new());
    }
}

fn registration_body() -> serde_json::Value {
    json!({
        "address": {"street": "Whitelees Road", "number": "246", "country": "United Kingdom", "city": "Glasgow"},
        "card": {"longNum": "5953580604169678", "expires": "08/19", "ccv": "678"},
        "customer": {"firstName": "Alice", "lastName": "Liddell", "username": "newbie", "password": "secret"}
    })
}

fn register_request() -> TestRequest {
    TestRequest::post().uri("/register").set_json(registration_body())
}

#[actix_web::test]
async fn register_new_customer() {
    let mut seq = Sequence::new();
    let mut directory = MockDirectory::new();
    directory
        .expect_create_address()
        .withf(|a| a.city == "Glasgow" && a.number == "246")
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(ADDRESS.to_string()));
    directory
        .expect_create_card()
        .withf(|c| c.long_num == "5953580604169678" && c.ccv == "678")
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(CARD.to_string()));
    directory
        .expect_create_customer()
        .withf(|c| {
            let json = serde_json::to_string(c).unwrap();
            !json.contains("secret") &&
                c.username == "newbie" &&
                c.first_name == "Alice" &&
                c.addresses == vec![ADDRESS.to_string()] &&
                c.cards == vec![CARD.to_string()]
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(Some("http://accounts/customers/57a98d98e4b00679b4a830b0".into())));
    let credentials = credential_store();
    let before = credentials.len();

    let (status, body) = call(configure_app(Arc::clone(&credentials), directory), register_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty(), "was: {body}");
    assert_eq!(credentials.len(), before + 1);
    assert!(credentials.validate("newbie", "secret"));
    assert!(!credentials.validate("newbie", ""));
    let credential = credentials.find("newbie").unwrap();
    assert_eq!(credential.id, "");
    assert_eq!(credential.password.reveal(), "secret");
}

#[actix_web::test]
async fn register_with_malformed_body() {
    for body in ["", "not json", "{}", r#"{"address": {}, "card": {}}"#] {
        let mut directory = MockDirectory::new();
        directory.expect_create_address().times(0);
        directory.expect_create_card().times(0);
        directory.expect_create_customer().times(0);
        let credentials = credential_store();
        let req = TestRequest::post().uri("/register").set_payload(body);
        let (status, _) = call(configure_app(Arc::clone(&credentials), directory), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(credentials.len(), 2);
    }
}

#[actix_web::test]
async fn address_network_error_stops_registration() {
    let mut directory = MockDirectory::new();
    directory
        .expect_create_address()
        .times(1)
        .returning(|_| Err(DirectoryError::Transport("connection refused".into())));
    directory.expect_create_card().times(0);
    directory.expect_create_customer().times(0);
    let credentials = credential_store();

    let (status, body) = call(configure_app(Arc::clone(&credentials), directory), register_request()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"Registration failed. Could not create address."}"#);
    assert_eq!(credentials.len(), 2);
    assert!(!credentials.validate("newbie", "secret"));
}

#[actix_web::test]
async fn address_rejection_stops_registration() {
    let mut directory = MockDirectory::new();
    directory
        .expect_create_address()
        .times(1)
        .returning(|_| Err(DirectoryError::Rejected { status: 500, message: "Internal Server Error".into() }));
    directory.expect_create_card().times(0);
    directory.expect_create_customer().times(0);
    let (status, _) = call(configure_app(credential_store(), directory), register_request()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn card_failure_stops_registration() {
    let mut directory = MockDirectory::new();
    directory.expect_create_address().times(1).returning(|_| Ok(ADDRESS.to_string()));
    directory.expect_create_card().times(1).returning(|_| Err(DirectoryError::MissingLocation("card".into())));
    directory.expect_create_customer().times(0);
    let credentials = credential_store();

    let (status, body) = call(configure_app(Arc::clone(&credentials), directory), register_request()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"Registration failed. Could not create card."}"#);
    assert_eq!(credentials.len(), 2);
}

#[actix_web::test]
async fn customer_rejection_fails_registration() {
    let mut directory = MockDirectory::new();
    directory.expect_create_address().times(1).returning(|_| Ok(ADDRESS.to_string()));
    directory.expect_create_card().times(1).returning(|_| Ok(CARD.to_string()));
    directory
        .expect_create_customer()
        .times(1)
        .returning(|_| Err(DirectoryError::Rejected { status: 409, message: "Conflict".into() }));
    let credentials = credential_store();

    let (status, body) = call(configure_app(Arc::clone(&credentials), directory), register_request()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"Registration failed. Could not create customer."}"#);
    assert_eq!(credentials.len(), 2);
}
