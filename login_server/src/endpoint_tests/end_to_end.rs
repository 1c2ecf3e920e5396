//! Drives the gateway against a fake accounts service over real HTTP, using the production directory client.
use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use actix_web::{
    dev::ServerHandle,
    http::{header::AUTHORIZATION, StatusCode},
    test::TestRequest,
    web,
    App,
    HttpRequest,
    HttpResponse,
    HttpServer,
};
use login_engine::{DirectoryConfig, HttpCustomerDirectory};
use serde_json::{json, Value};

use super::helpers::*;
use crate::server::configure_routes;

#[derive(Default)]
struct FakeAccounts {
    /// (path, body) of every POST received, in order
    posts: Mutex<Vec<(String, String)>>,
    customers: Mutex<Vec<Value>>,
    fail_addresses: bool,
}

impl FakeAccounts {
    fn record(&self, req: &HttpRequest, body: &web::Bytes) {
        let body = String::from_utf8_lossy(body).into_owned();
        self.posts.lock().unwrap().push((req.path().to_string(), body));
    }

    fn posted_paths(&self) -> Vec<String> {
        self.posts.lock().unwrap().iter().map(|(p, _)| p.clone()).collect()
    }
}

fn link(req: &HttpRequest, path: &str) -> String {
    format!("http://{}{path}", req.connection_info().host())
}

async fn create_address(req: HttpRequest, body: web::Bytes, accounts: web::Data<FakeAccounts>) -> HttpResponse {
    accounts.record(&req, &body);
    if accounts.fail_addresses {
        return HttpResponse::InternalServerError().finish();
    }
    HttpResponse::Created().insert_header(("Location", link(&req, "/addresses/1"))).finish()
}

async fn create_card(req: HttpRequest, body: web::Bytes, accounts: web::Data<FakeAccounts>) -> HttpResponse {
    accounts.record(&req, &body);
    HttpResponse::Created().insert_header(("Location", link(&req, "/cards/2"))).finish()
}

async fn create_customer(req: HttpRequest, body: web::Bytes, accounts: web::Data<FakeAccounts>) -> HttpResponse {
    accounts.record(&req, &body);
    let customer = match serde_json::from_slice::<Value>(&body) {
        Ok(c) => c,
        Err(_) => return HttpResponse::BadRequest().finish(),
    };
    accounts.customers.lock().unwrap().push(customer);
    HttpResponse::Created().insert_header(("Location", link(&req, "/customers/42"))).finish()
}

async fn find_by_username(
    req: HttpRequest,
    query: web::Query<HashMap<String, String>>,
    accounts: web::Data<FakeAccounts>,
) -> HttpResponse {
    let username = query.get("username").cloned().unwrap_or_default();
    let hits = accounts
        .customers
        .lock()
        .unwrap()
        .iter()
        .filter(|c| c["username"] == username.as_str())
        .map(|c| json!({"username": c["username"], "_links": {"customer": {"href": link(&req, "/customers/42")}}}))
        .collect::<Vec<_>>();
    HttpResponse::Ok().json(json!({"_embedded": {"customer": hits}}))
}

fn start_fake_accounts(accounts: web::Data<FakeAccounts>) -> (SocketAddr, ServerHandle) {
    let server = HttpServer::new(move || {
        App::new()
            .app_data(accounts.clone())
            .route("/addresses", web::post().to(create_address))
            .route("/cards", web::post().to(create_card))
            .route("/customers", web::post().to(create_customer))
            .route("/customers/search/findByUsername", web::get().to(find_by_username))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("Could not bind fake accounts service");
    let addr = server.addrs()[0];
    let server = server.run();
    let handle = server.handle();
    actix_web::rt::spawn(server);
    (addr, handle)
}

fn directory_for(addr: SocketAddr) -> HttpCustomerDirectory {
    let config = DirectoryConfig::new(format!("http://{addr}"), Duration::from_secs(5));
    HttpCustomerDirectory::new(config).unwrap()
}

#[actix_web::test]
async fn register_then_login() {
    let accounts = web::Data::new(FakeAccounts::default());
    let (addr, handle) = start_fake_accounts(accounts.clone());
    let directory = directory_for(addr);
    let credentials = credential_store();

    let body = json!({
        "address": {"street": "Whitelees Road", "number": "246", "country": "United Kingdom", "city": "Glasgow"},
        "card": {"longNum": "5953580604169678", "expires": "08/19", "ccv": "678"},
        "customer": {"firstName": "Bob", "lastName": "Builder", "username": "bob", "password": "s3cr3t-pa55"}
    });
    let req = TestRequest::post().uri("/register").set_json(body);
    let (c, d) = (Arc::clone(&credentials), directory.clone());
    let (status, _) = call(move |cfg| configure_routes(cfg, c, d), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(accounts.posted_paths(), vec!["/addresses", "/cards", "/customers"]);

    let posts = accounts.posts.lock().unwrap().clone();
    let (_, customer_json) = &posts[2];
    assert!(!customer_json.contains("s3cr3t-pa55"), "password leaked: {customer_json}");
    let customer: Value = serde_json::from_str(customer_json).unwrap();
    assert_eq!(customer["addresses"], json!([format!("http://{addr}/addresses/1")]));
    assert_eq!(customer["cards"], json!([format!("http://{addr}/cards/2")]));

    let req = TestRequest::post().uri("/login").insert_header((AUTHORIZATION, basic_auth_header("bob", "s3cr3t-pa55")));
    let (status, body) = call(move |cfg| configure_routes(cfg, credentials, directory), req).await;
    assert_eq!(status, StatusCode::OK);
    let login: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(login, json!({"username": "bob", "customer": format!("http://{addr}/customers/42"), "id": "42"}));

    handle.stop(true).await;
}

#[actix_web::test]
async fn failed_address_means_no_further_calls() {
    let accounts = web::Data::new(FakeAccounts { fail_addresses: true, ..Default::default() });
    let (addr, handle) = start_fake_accounts(accounts.clone());
    let directory = directory_for(addr);
    let credentials = credential_store();

    let body = json!({
        "address": {"street": "Whitelees Road"},
        "card": {"longNum": "5953580604169678"},
        "customer": {"username": "carol", "password": "pw"}
    });
    let req = TestRequest::post().uri("/register").set_json(body);
    let c = Arc::clone(&credentials);
    let (status, _) = call(move |cfg| configure_routes(cfg, c, directory), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(accounts.posted_paths(), vec!["/addresses"]);
    assert_eq!(credentials.len(), 2);

    handle.stop(true).await;
}

#[actix_web::test]
async fn unknown_user_in_directory() {
    let accounts = web::Data::new(FakeAccounts::default());
    let (addr, handle) = start_fake_accounts(accounts.clone());
    let directory = directory_for(addr);

    // alice has valid credentials but no customer record
    let req = TestRequest::post().uri("/login").insert_header((AUTHORIZATION, basic_auth_header("alice", "pw1")));
    let (status, _) = call(move |cfg| configure_routes(cfg, credential_store(), directory), req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    handle.stop(true).await;
}

#[actix_web::test]
async fn unreachable_directory() {
    // Nothing listens on the discard port
    let directory = directory_for("127.0.0.1:9".parse().unwrap());
    let req = TestRequest::post().uri("/login").insert_header((AUTHORIZATION, basic_auth_header("alice", "pw1")));
    let (status, _) = call(move |cfg| configure_routes(cfg, credential_store(), directory), req).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}
