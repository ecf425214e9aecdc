// src/state.rs

use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    config::Config,
    mail::EmailSender,
    services::{
        ApplicationLifecycle, IdentityProvider, OfferLetterService, OtpService,
    },
    store::DocumentStore,
};

/// Collaborators are built once by the entry point and shared by reference.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn DocumentStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub otp: OtpService,
    pub lifecycle: ApplicationLifecycle,
    pub offers: OfferLetterService,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn DocumentStore>,
        mailer: Arc<dyn EmailSender>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        let company = config.email.sender_name.clone();
        Self {
            otp: OtpService::new(store.clone(), mailer.clone(), identity.clone(), company.clone()),
            lifecycle: ApplicationLifecycle::new(store.clone(), mailer.clone(), company.clone()),
            offers: OfferLetterService::new(store.clone(), mailer, company),
            config,
            store,
            identity,
        }
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<dyn DocumentStore> {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}
