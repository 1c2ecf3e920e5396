//! Orchestrates the creation of new customers.
//!
//! A registration is three dependent remote calls, performed strictly in order:
//! 1. Create the address. Its link is needed by the customer record.
//! 2. Create the card. Its link is needed by the customer record.
//! 3. Create the customer, referencing the address and card, with the password stripped out.
//!
//! Only once all three succeed is the new user added to the credential store. A failure at any step aborts the
//! registration immediately. There are no retries and nothing is rolled back: resources created by earlier steps are
//! left in place and reported via [`RegistrationError::orphaned_resources`].

use std::{fmt::Debug, sync::Arc};

use log::*;

use crate::{
    credentials::{Credential, CredentialStore},
    directory::CustomerDirectory,
    directory_types::{CustomerRecordRef, RegistrationPayload},
    le_api::errors::{RegistrationError, RegistrationProgress, RegistrationStep},
};

pub struct RegistrationApi<B> {
    directory: B,
    credentials: Arc<CredentialStore>,
}

impl<B: Debug> Debug for RegistrationApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RegistrationApi ({:?})", self.directory)
    }
}

impl<B> RegistrationApi<B>
where B: CustomerDirectory
{
    pub fn new(directory: B, credentials: Arc<CredentialStore>) -> Self {
        Self { directory, credentials }
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub async fn register(&self, payload: RegistrationPayload) -> Result<CustomerRecordRef, RegistrationError> {
        let RegistrationPayload { address, card, customer } = payload;
        let mut progress = RegistrationProgress::Started;

        let address_link = self
            .directory
            .create_address(&address)
            .await
            .map_err(|e| RegistrationError::new(RegistrationStep::Address, progress.clone(), e))?;
        progress = RegistrationProgress::AddressCreated { address: address_link.clone() };

        let card_link = self
            .directory
            .create_card(&card)
            .await
            .map_err(|e| RegistrationError::new(RegistrationStep::Card, progress.clone(), e))?;
        progress = RegistrationProgress::CardCreated { address: address_link.clone(), card: card_link.clone() };

        let (customer, password) = customer.into_new_customer(address_link.clone(), card_link.clone());
        let customer_link = self
            .directory
            .create_customer(&customer)
            .await
            .map_err(|e| RegistrationError::new(RegistrationStep::Customer, progress, e))?;
        let progress =
            RegistrationProgress::CustomerCreated { address: address_link, card: card_link, customer: customer_link };

        let username = customer.username;
        self.credentials.append(Credential::new(String::new(), username.clone(), password));
        info!("Registered new customer {username}");
        Ok(CustomerRecordRef { username, progress })
    }
}
