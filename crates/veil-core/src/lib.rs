#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod gdpr;
pub mod ports;

// Re-export the types almost every consumer needs so call sites can depend on
// `veil_core::User` instead of spelling out the module path.
pub use domain::{
    BanList, DetectedEntity, Document, IpBan, ModelEntity, NewDetectedEntity, NewDocument,
    NewIpBan, NewModelEntity, NewResetToken, NewSearchPattern, NewSession, NewUser, Paged,
    PageRequest, PatternType, ResetToken, SearchPattern, Session, User,
};
pub use ports::{
    BanListRepository, DocumentRepository, FieldCipher, IpBanRepository, ModelEntityRepository,
    NoopCipher, PatternRepository, Repos, RepositoryError, ResetTokenError, ResetTokenRepository,
    SessionRepository, UserRepository,
};
