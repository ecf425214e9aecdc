// src/services/mod.rs

pub mod identity;
pub mod lifecycle;
pub mod offers;
pub mod otp;

pub use identity::{IdentityError, IdentityProvider, LocalIdentityProvider};
pub use lifecycle::{ApplicationLifecycle, ApplicationOutcome};
pub use offers::{OfferLetterService, OfferOutcome};
pub use otp::OtpService;
