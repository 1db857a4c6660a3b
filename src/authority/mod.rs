//! Orchestration of actions into ledger mutations, plus the collaborator
//! seams (affiliation lookup, classifiers, notifications).

pub mod collaborators;
pub mod error;
pub mod favor;
pub mod notify;

pub use collaborators::{Affiliation, AffiliationLookup, Classifier, StaticAffiliations};
pub use error::CollaboratorError;
pub use favor::{ActionEvent, AwardOutcome, AwardReceipt, FavorAuthority, RawMagnitude};
pub use notify::{ChannelSink, Notification, NotificationSink, NullSink};
