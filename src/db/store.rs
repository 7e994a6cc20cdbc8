use crate::error::Result;
use crate::logic::CandidateFilter;
use crate::models::{Clothing, ClothingDraft, Music, MusicDraft, Situation, SituationDraft};
use async_trait::async_trait;

/// The relational datastore behind situations, music, clothing and their
/// associations.
///
/// Situations returned by any method carry their music and clothing.
/// Drafts are validated by the store before anything is written.
#[async_trait]
pub trait SituationStore: Send + Sync {
    /// Short name for status lines and logs
    fn backend_name(&self) -> &'static str;

    async fn test_connection(&self) -> Result<bool>;

    /// Situations admitted by `filter`, most specific first, capped at
    /// `filter.limit`.
    async fn fetch_candidates(&self, filter: &CandidateFilter) -> Result<Vec<Situation>>;

    /// Every situation, newest first.
    async fn list_situations(&self) -> Result<Vec<Situation>>;
    async fn get_situation(&self, id: &str) -> Result<Option<Situation>>;
    async fn create_situation(&self, draft: &SituationDraft) -> Result<Situation>;
    async fn update_situation(&self, id: &str, draft: &SituationDraft) -> Result<()>;
    /// Also removes the situation's music and clothing assignments.
    async fn delete_situation(&self, id: &str) -> Result<()>;

    async fn list_music(&self) -> Result<Vec<Music>>;
    async fn create_music(&self, draft: &MusicDraft) -> Result<Music>;
    async fn update_music(&self, id: &str, draft: &MusicDraft) -> Result<()>;
    async fn delete_music(&self, id: &str) -> Result<()>;

    async fn list_clothing(&self) -> Result<Vec<Clothing>>;
    async fn create_clothing(&self, draft: &ClothingDraft) -> Result<Clothing>;
    async fn update_clothing(&self, id: &str, draft: &ClothingDraft) -> Result<()>;
    async fn delete_clothing(&self, id: &str) -> Result<()>;

    /// Fails with a validation error if the pair is already assigned.
    async fn assign_music(&self, situation_id: &str, music_id: &str) -> Result<()>;
    async fn unassign_music(&self, situation_id: &str, music_id: &str) -> Result<()>;
    async fn assign_clothing(&self, situation_id: &str, clothing_id: &str) -> Result<()>;
    async fn unassign_clothing(&self, situation_id: &str, clothing_id: &str) -> Result<()>;
}
