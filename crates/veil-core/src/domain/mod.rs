//! Core domain types.
//!
//! These types represent the pure domain model, independent of any
//! infrastructure concerns (database, cipher, logging sink).
//!
//! # Structure
//!
//! - `user` - User account types (`User`, `NewUser`)
//! - `session` - Authentication session types
//! - `document` - Documents and their detected entities
//! - `ban_list` - Per-setting banned-word lists
//! - `pattern` - User-defined search patterns
//! - `model_entity` - Model-learned entities per setting
//! - `ip_ban` - IP address bans
//! - `reset_token` - Password-reset tokens (digest-only storage)
//! - `pagination` - Page request / page result helpers

pub mod ban_list;
pub mod document;
pub mod ip_ban;
pub mod model_entity;
pub mod pagination;
pub mod pattern;
pub mod reset_token;
pub mod session;
pub mod user;

// Re-export all entity types at the domain level for convenience
pub use ban_list::BanList;
pub use document::{DetectedEntity, Document, NewDetectedEntity, NewDocument};
pub use ip_ban::{IpBan, NewIpBan};
pub use model_entity::{ModelEntity, NewModelEntity};
pub use pagination::{Paged, PageRequest};
pub use pattern::{NewSearchPattern, PatternType, SearchPattern};
pub use reset_token::{NewResetToken, ResetToken, hash_token};
pub use session::{NewSession, Session};
pub use user::{NewUser, User};
