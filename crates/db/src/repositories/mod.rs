//! Database repositories.

pub mod bestie_relationship;
pub mod endorsement;
pub mod notification;
pub mod profile;
pub mod push_subscription;
pub mod traits;

pub use bestie_relationship::BestieRelationshipRepository;
pub use endorsement::EndorsementRepository;
pub use notification::NotificationRepository;
pub use profile::ProfileRepository;
pub use push_subscription::PushSubscriptionRepository;
pub use traits::TraitRepository;
