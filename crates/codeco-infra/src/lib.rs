//! Infrastructure layer: gate event sources, partner profiles, outbox
//! transport and the transmission log

pub mod gate_event_csv;
pub mod outbox;
pub mod partner_profile_loader;
pub mod persistence;

pub use outbox::{OutboxTransport, RetryPolicy};
pub use partner_profile_loader::PartnerProfile;
pub use persistence::{FileGateEventRepository, TransmissionEntry, TransmissionLog};
