use login_common::Secret;
use serde::{Deserialize, Serialize};

use crate::le_api::errors::RegistrationProgress;

//--------------------------------------   Registration payload   ------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub street: String,
    pub number: String,
    pub country: String,
    pub city: String,
}

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Card {
    pub long_num: String,
    pub expires: String,
    pub ccv: String,
}

// Card numbers do not belong in logs.
impl std::fmt::Debug for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tail = self.long_num.len().saturating_sub(4);
        let last_four = self.long_num.get(tail..).unwrap_or_default();
        write!(f, "Card {{ long_num: ****{last_four}, expires: {} }}", self.expires)
    }
}

/// The customer record as it is sent to the accounts service.
///
/// `password` is only ever populated on the inbound registration payload. [`CustomerProfile::into_new_customer`]
/// strips it before the profile goes anywhere near the customer-creation endpoint, and a cleared password is omitted
/// from the JSON entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomerProfile {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<Secret<String>>,
    pub addresses: Vec<String>,
    pub cards: Vec<String>,
}

impl CustomerProfile {
    /// Converts a registration profile into the record that will be created downstream. The password is removed from
    /// the profile and handed back separately, and the address and card lists are replaced with the links of the
    /// freshly created resources.
    pub fn into_new_customer(mut self, address_link: String, card_link: String) -> (CustomerProfile, Secret<String>) {
        let password = self.password.take().unwrap_or_default();
        self.addresses = vec![address_link];
        self.cards = vec![card_link];
        (self, password)
    }
}

/// The body of a `POST /register` request. All three sections must be present, but any of their fields may be omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationPayload {
    pub address: Address,
    pub card: Card,
    pub customer: CustomerProfile,
}

/// The result of a successful registration. `progress` is always [`RegistrationProgress::CustomerCreated`] and carries
/// the links of every resource that was created on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerRecordRef {
    pub username: String,
    pub progress: RegistrationProgress,
}

//--------------------------------------   Directory search   ----------------------------------------------------------

/// A single customer, as identified by the customer directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDirectoryEntry {
    pub username: String,
    pub customer_link: String,
}

/// Raw shape of `GET /customers/search/findByUsername`:
///
/// ```json
/// { "_embedded": { "customer": [ { "username": "alice", "_links": { "customer": { "href": "http://accounts/customers/7" } } } ] } }
/// ```
///
/// Missing `_embedded` or `customer` keys are read as an empty result set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerSearchResponse {
    #[serde(rename = "_embedded", default)]
    pub embedded: EmbeddedCustomers,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmbeddedCustomers {
    #[serde(rename = "customer", default)]
    pub customers: Vec<CustomerSearchHit>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CustomerSearchHit {
    pub username: String,
    #[serde(rename = "_links")]
    pub links: CustomerLinks,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CustomerLinks {
    pub customer: Link,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Link {
    pub href: String,
}

impl From<CustomerSearchHit> for CustomerDirectoryEntry {
    fn from(hit: CustomerSearchHit) -> Self {
        Self { username: hit.username, customer_link: hit.links.customer.href }
    }
}

impl From<CustomerSearchResponse> for Vec<CustomerDirectoryEntry> {
    fn from(response: CustomerSearchResponse) -> Self {
        response.embedded.customers.into_iter().map(CustomerDirectoryEntry::from).collect()
    }
}

//--------------------------------------   Login response    -----------------------------------------------------------

/// The externally visible result of a login. `id` is the final path segment of `customer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub username: String,
    pub customer: String,
    pub id: String,
}
