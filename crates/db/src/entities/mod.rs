//! Database entities.

pub mod bestie_relationship;
pub mod endorsement;
pub mod notification;
pub mod profile;
pub mod push_subscription;
pub mod traits;

pub use bestie_relationship::Entity as BestieRelationship;
pub use endorsement::Entity as Endorsement;
pub use notification::Entity as Notification;
pub use profile::Entity as Profile;
pub use push_subscription::Entity as PushSubscription;
pub use traits::Entity as Trait;
