//! Business logic services.

#![allow(missing_docs)]

pub mod bestie;
pub mod endorsement;
pub mod event_publisher;
pub mod feed;
pub mod live;
pub mod notification;
pub mod profile;
pub mod push;
pub mod session;
pub mod suggestion;
pub mod traits;

pub use bestie::{BestieService, StreakEvent};
pub use endorsement::{CreateEndorsementInput, EndorsementService, PendingEndorsement};
pub use event_publisher::{EventPublisher, EventPublisherService, NoOpEventPublisher, StreamEvent};
pub use feed::{FeedComposer, FeedSort, FeedStats, trait_score};
pub use live::LiveTraitView;
pub use notification::NotificationService;
pub use profile::{ProfileService, SignupInput, UpdateProfileInput};
pub use push::{PushService, SubscribeInput};
pub use session::{
    AuthEvent, AuthProvider, Identity, SessionManager, SessionSnapshot,
};
pub use suggestion::{
    CaptionOutcome, CompatibilityOutcome, DescriptionOutcome, SuggestionOutcome, SuggestionService,
};
pub use traits::{CreateTraitInput, TraitService, TraitWithAuthor};
