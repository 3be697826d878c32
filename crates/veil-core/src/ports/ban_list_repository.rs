//! Ban list repository port definition.

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::ban_list::BanList;

/// Port for ban list and banned-word persistence.
///
/// Word operations taking a slice treat the empty slice as a success that
/// never touches storage. Non-empty slices run as one transaction with one
/// statement per word; a failure part-way rolls the whole batch back.
#[async_trait]
pub trait BanListRepository: Send + Sync {
    /// Create a ban list for a settings profile. Each profile owns at most
    /// one list; a second create yields [`RepositoryError::Duplicate`] on
    /// `setting_id`.
    async fn create(&self, setting_id: i64) -> Result<BanList, RepositoryError>;

    /// Get a ban list by id.
    async fn get_by_id(&self, id: i64) -> Result<BanList, RepositoryError>;

    /// Get the ban list owned by a settings profile.
    async fn get_by_setting_id(&self, setting_id: i64) -> Result<BanList, RepositoryError>;

    /// Delete a ban list and its words in one transaction. If the list does
    /// not exist the transaction is rolled back and nothing is removed.
    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;

    /// Add words to a list. Words already present are left in place rather
    /// than erroring, so the call is idempotent.
    async fn add_words(&self, ban_list_id: i64, words: &[String]) -> Result<(), RepositoryError>;

    /// Remove words from a list. Absent words are ignored.
    async fn remove_words(&self, ban_list_id: i64, words: &[String])
    -> Result<(), RepositoryError>;

    /// All words of a list in alphabetical order.
    async fn get_words(&self, ban_list_id: i64) -> Result<Vec<String>, RepositoryError>;

    /// Whether a word is on a list.
    async fn word_exists(&self, ban_list_id: i64, word: &str) -> Result<bool, RepositoryError>;
}
