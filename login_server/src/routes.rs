//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Every call to the accounts service is therefore expressed as a
//! future, and is bounded by the directory client's timeout.
use actix_web::{get, http::header::ContentType, web, HttpRequest, HttpResponse, Responder};
use log::*;
use login_engine::{
    directory_types::RegistrationPayload,
    CredentialStore,
    CustomerDirectory,
    IdentityApi,
    RegistrationApi,
};

use crate::{
    errors::{AuthError, ServerError},
    helpers::basic_auth,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Login  ----------------------------------------------------
route!(login => Post "/login" impl CustomerDirectory);
/// Route handler for the login endpoint
///
/// Users authenticate with HTTP Basic Auth. The credentials are checked against the credential store, and the
/// username is then looked up in the customer directory.
///
/// On success, the response is a JSON object with the following fields:
/// * `username` - The username, as recorded in the customer directory.
/// * `customer` - The link to the customer record.
/// * `id` - The customer id, i.e. the last path segment of `customer`.
///
/// A missing or invalid `Authorization` header, a credential mismatch, or a username that the directory does not know
/// about all result in a 401. If the directory cannot be reached, or returns garbage, the response is a 502.
pub async fn login<B>(
    req: HttpRequest,
    credentials: web::Data<CredentialStore>,
    api: web::Data<IdentityApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: CustomerDirectory,
{
    trace!("💻️ Received login request");
    let creds = basic_auth(&req).map_err(|e| {
        info!("💻️ {e}");
        e
    })?;
    debug!("💻️ Lookup for user {}", creds.username);
    if !credentials.validate(&creds.username, creds.password.reveal()) {
        info!("💻️ User {} not authorized.", creds.username);
        return Err(AuthError::InvalidCredentials(creds.username).into());
    }
    let response = api.login_response(&creds.username).await.map_err(|e| {
        warn!("💻️ Could not resolve customer for {}. {e}", creds.username);
        ServerError::from(e)
    })?;
    let body = serde_json::to_string(&response).map_err(|e| ServerError::CouldNotSerializeResponse(e.to_string()))?;
    Ok(HttpResponse::Ok().insert_header(ContentType::json()).body(body))
}

//----------------------------------------------   Register  ----------------------------------------------------
route!(register => Post "/register" impl CustomerDirectory);
/// Route handler for the register endpoint
///
/// The body must be a JSON object with `address`, `card` and `customer` sections. The address, card and customer are
/// created in that order, and the user is added to the credential store once all three exist.
///
/// There is no response body on success. Clients must log in afterwards to learn the new customer's id.
/// A malformed body, or a failure at any of the creation steps, results in a 400.
pub async fn register<B>(body: web::Bytes, api: web::Data<RegistrationApi<B>>) -> Result<HttpResponse, ServerError>
where B: CustomerDirectory {
    trace!("💻️ Received registration request");
    let payload = serde_json::from_slice::<RegistrationPayload>(&body).map_err(|e| {
        info!("💻️ No valid request body found. {e}");
        ServerError::CouldNotDeserializePayload(e.to_string())
    })?;
    let record = api.register(payload).await.map_err(|e| {
        warn!("💻️ Customer not created. {e}");
        let orphans = e.orphaned_resources();
        if !orphans.is_empty() {
            warn!("💻️ The following resources were left behind: {}", orphans.join(", "));
        }
        ServerError::from(e)
    })?;
    debug!("💻️ Registered {}. Resources: {}", record.username, record.progress.created_resources().join(", "));
    Ok(HttpResponse::Ok().finish())
}
