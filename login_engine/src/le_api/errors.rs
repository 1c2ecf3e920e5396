use std::fmt::Display;

use thiserror::Error;

use crate::directory::DirectoryError;

#[derive(Debug, Clone, Error)]
pub enum IdentityError {
    #[error("No customer found for username {0}")]
    NoSuchCustomer(String),
    #[error("Customer link '{0}' does not contain a customer id")]
    MalformedLink(String),
    #[error("Customer directory error. {0}")]
    Directory(#[from] DirectoryError),
}

/// The remote creation steps of a registration, in the order they are performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStep {
    Address,
    Card,
    Customer,
}

impl Display for RegistrationStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Address => f.write_str("address"),
            Self::Card => f.write_str("card"),
            Self::Customer => f.write_str("customer"),
        }
    }
}

/// How far a registration got. Each variant carries the links of every resource created so far.
///
/// Registration does not roll anything back, so when a later step fails, the resources recorded here are orphaned in
/// the accounts service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RegistrationProgress {
    #[default]
    Started,
    AddressCreated {
        address: String,
    },
    CardCreated {
        address: String,
        card: String,
    },
    CustomerCreated {
        address: String,
        card: String,
        customer: Option<String>,
    },
}

impl RegistrationProgress {
    pub fn last_completed_step(&self) -> Option<RegistrationStep> {
        match self {
            Self::Started => None,
            Self::AddressCreated { .. } => Some(RegistrationStep::Address),
            Self::CardCreated { .. } => Some(RegistrationStep::Card),
            Self::CustomerCreated { .. } => Some(RegistrationStep::Customer),
        }
    }

    pub fn address_link(&self) -> Option<&str> {
        match self {
            Self::Started => None,
            Self::AddressCreated { address } |
            Self::CardCreated { address, .. } |
            Self::CustomerCreated { address, .. } => Some(address),
        }
    }

    pub fn card_link(&self) -> Option<&str> {
        match self {
            Self::CardCreated { card, .. } | Self::CustomerCreated { card, .. } => Some(card),
            _ => None,
        }
    }

    pub fn customer_link(&self) -> Option<&str> {
        match self {
            Self::CustomerCreated { customer, .. } => customer.as_deref(),
            _ => None,
        }
    }

    /// Links of every resource this registration created, oldest first.
    pub fn created_resources(&self) -> Vec<&str> {
        [self.address_link(), self.card_link(), self.customer_link()].into_iter().flatten().collect()
    }
}

#[derive(Debug, Clone, Error)]
#[error("Could not create {step}. {source}")]
pub struct RegistrationError {
    pub step: RegistrationStep,
    /// The state of the registration at the time `step` failed.
    pub progress: RegistrationProgress,
    pub source: DirectoryError,
}

impl RegistrationError {
    pub fn new(step: RegistrationStep, progress: RegistrationProgress, source: DirectoryError) -> Self {
        Self { step, progress, source }
    }

    /// Resources left behind in the accounts service by this failed registration.
    pub fn orphaned_resources(&self) -> Vec<&str> {
        self.progress.created_resources()
    }
}
