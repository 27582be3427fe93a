//! Storage port: repository traits for persistence.

use std::future::Future;

use sitehub_domain::activity::{ActivityEvent, ActivityStats, UnlockRecord};
use sitehub_domain::calendar::CalendarConfig;
use sitehub_domain::error::SiteError;
use sitehub_domain::game::GameStatus;
use sitehub_domain::id::{CommentId, MessageId, NoteId, ScoreId, SuggestionId, UserId};
use sitehub_domain::message::{Message, ReactionChange};
use sitehub_domain::note::Note;
use sitehub_domain::profile::UserProfile;
use sitehub_domain::score::{Ranking, Score, Submission};
use sitehub_domain::time::Timestamp;
use sitehub_domain::setting::SystemSetting;
use sitehub_domain::suggestion::{Comment, Suggestion, SuggestionStatus, SuggestionSummary};
use sitehub_domain::user::User;
use sitehub_domain::vocabulary::VocabularyItem;

/// Repository for wall [`Message`]s.
pub trait MessageRepository {
    /// Persist a new message.
    fn create(&self, message: Message) -> impl Future<Output = Result<Message, SiteError>> + Send;

    /// Get a message by its unique identifier.
    fn get_by_id(
        &self,
        id: MessageId,
    ) -> impl Future<Output = Result<Option<Message>, SiteError>> + Send;

    /// Get every message, oldest first.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Message>, SiteError>> + Send;

    /// Apply `change` to the reactions of a message in one atomic step.
    ///
    /// Returns the stored message and whether the change did anything, or
    /// `None` when the message does not exist.
    fn change_reaction(
        &self,
        id: MessageId,
        change: ReactionChange,
    ) -> impl Future<Output = Result<Option<(Message, bool)>, SiteError>> + Send;

    /// Delete a message. Returns `false` when it did not exist.
    fn delete(&self, id: MessageId) -> impl Future<Output = Result<bool, SiteError>> + Send;

    /// Delete every message and return how many were removed.
    fn delete_all(&self) -> impl Future<Output = Result<u64, SiteError>> + Send;
}

/// Repository for registered [`User`]s.
pub trait UserRepository {
    fn create(&self, user: User) -> impl Future<Output = Result<User, SiteError>> + Send;

    fn get_by_id(&self, id: UserId)
    -> impl Future<Output = Result<Option<User>, SiteError>> + Send;

    /// Case-sensitive lookup by login name.
    fn find_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<User>, SiteError>> + Send;

    /// Get every account, oldest first.
    fn get_all(&self) -> impl Future<Output = Result<Vec<User>, SiteError>> + Send;

    fn update(&self, user: User) -> impl Future<Output = Result<User, SiteError>> + Send;

    /// Delete an account and its favorites. Returns `false` when it did not exist.
    fn delete(&self, id: UserId) -> impl Future<Output = Result<bool, SiteError>> + Send;
}

/// Per-user set of favorite vocabulary item ids.
pub trait FavoriteRepository {
    fn get_favorites(&self, user: UserId)
    -> impl Future<Output = Result<Vec<i64>, SiteError>> + Send;

    /// Add a favorite. Adding twice is a no-op.
    fn add_favorite(
        &self,
        user: UserId,
        item: i64,
    ) -> impl Future<Output = Result<(), SiteError>> + Send;

    fn remove_favorite(
        &self,
        user: UserId,
        item: i64,
    ) -> impl Future<Output = Result<(), SiteError>> + Send;
}

/// Repository for [`Suggestion`]s and their [`Comment`] threads.
pub trait SuggestionRepository {
    fn create(
        &self,
        suggestion: Suggestion,
    ) -> impl Future<Output = Result<Suggestion, SiteError>> + Send;

    fn get_by_id(
        &self,
        id: SuggestionId,
    ) -> impl Future<Output = Result<Option<Suggestion>, SiteError>> + Send;

    /// Every suggestion with its comment count, newest first.
    fn get_all(&self) -> impl Future<Output = Result<Vec<SuggestionSummary>, SiteError>> + Send;

    /// Suggestions of one author with their comment counts, newest first.
    fn find_by_user(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Vec<SuggestionSummary>, SiteError>> + Send;

    /// Returns `false` when the suggestion does not exist.
    fn update_status(
        &self,
        id: SuggestionId,
        status: SuggestionStatus,
    ) -> impl Future<Output = Result<bool, SiteError>> + Send;

    /// Delete a suggestion and its whole thread.
    fn delete(&self, id: SuggestionId) -> impl Future<Output = Result<bool, SiteError>> + Send;

    fn create_comment(
        &self,
        comment: Comment,
    ) -> impl Future<Output = Result<Comment, SiteError>> + Send;

    fn get_comment(
        &self,
        id: CommentId,
    ) -> impl Future<Output = Result<Option<Comment>, SiteError>> + Send;

    /// Comments of a suggestion, oldest first.
    fn find_comments(
        &self,
        suggestion: SuggestionId,
    ) -> impl Future<Output = Result<Vec<Comment>, SiteError>> + Send;

    fn delete_comment(&self, id: CommentId) -> impl Future<Output = Result<bool, SiteError>> + Send;
}

/// Repository for leaderboard [`Score`]s.
pub trait ScoreRepository {
    /// Up to `limit` scores of a game ordered best first for `ranking`.
    fn top_for_game(
        &self,
        game_type: &str,
        ranking: Ranking,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Score>, SiteError>> + Send;

    fn find_by_user_and_game(
        &self,
        user_id: &str,
        game_type: &str,
    ) -> impl Future<Output = Result<Vec<Score>, SiteError>> + Send;

    /// Judge `score` against the stored scores of the same player and game
    /// and, when it is a new personal best, replace them with it.
    ///
    /// The read, the comparison and the write happen in one atomic step.
    fn submit_if_better(
        &self,
        score: Score,
        ranking: Ranking,
    ) -> impl Future<Output = Result<Submission, SiteError>> + Send;

    fn get_all(&self) -> impl Future<Output = Result<Vec<Score>, SiteError>> + Send;

    fn delete(&self, id: ScoreId) -> impl Future<Output = Result<bool, SiteError>> + Send;

    /// Delete every score of a game and return how many were removed.
    fn delete_by_game(&self, game_type: &str)
    -> impl Future<Output = Result<u64, SiteError>> + Send;

    /// Delete the given scores and return how many were removed.
    fn delete_many(&self, ids: Vec<ScoreId>) -> impl Future<Output = Result<u64, SiteError>> + Send;
}

/// Repository for mini-game switches.
pub trait GameStatusRepository {
    fn get(
        &self,
        game_type: &str,
    ) -> impl Future<Output = Result<Option<GameStatus>, SiteError>> + Send;

    fn get_all(&self) -> impl Future<Output = Result<Vec<GameStatus>, SiteError>> + Send;

    fn upsert(&self, status: GameStatus)
    -> impl Future<Output = Result<GameStatus, SiteError>> + Send;
}

/// Repository for the vocabulary list.
pub trait VocabularyRepository {
    /// Every item ordered by id.
    fn get_all(&self) -> impl Future<Output = Result<Vec<VocabularyItem>, SiteError>> + Send;

    /// Insert or replace items by id and return how many were written.
    fn upsert_many(
        &self,
        items: Vec<VocabularyItem>,
    ) -> impl Future<Output = Result<u64, SiteError>> + Send;
}

/// Repository for [`Note`]s.
pub trait NoteRepository {
    fn create(&self, note: Note) -> impl Future<Output = Result<Note, SiteError>> + Send;

    fn get_by_id(&self, id: NoteId) -> impl Future<Output = Result<Option<Note>, SiteError>> + Send;

    /// Notes of one owner, newest first.
    fn find_by_user(&self, user_id: &str)
    -> impl Future<Output = Result<Vec<Note>, SiteError>> + Send;

    /// Every note, newest first.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Note>, SiteError>> + Send;

    fn update(&self, note: Note) -> impl Future<Output = Result<Note, SiteError>> + Send;

    fn delete(&self, id: NoteId) -> impl Future<Output = Result<bool, SiteError>> + Send;
}

/// Repository for [`SystemSetting`]s.
pub trait SettingRepository {
    fn get(&self, key: &str)
    -> impl Future<Output = Result<Option<SystemSetting>, SiteError>> + Send;

    /// Every setting ordered by key.
    fn get_all(&self) -> impl Future<Output = Result<Vec<SystemSetting>, SiteError>> + Send;

    fn upsert(
        &self,
        setting: SystemSetting,
    ) -> impl Future<Output = Result<SystemSetting, SiteError>> + Send;

    /// Store `setting` unless its key exists. Returns `true` when inserted.
    fn insert_if_absent(
        &self,
        setting: SystemSetting,
    ) -> impl Future<Output = Result<bool, SiteError>> + Send;
}

/// Storage for the single calendar configuration record.
pub trait CalendarConfigRepository {
    fn get(&self) -> impl Future<Output = Result<Option<CalendarConfig>, SiteError>> + Send;

    fn save(
        &self,
        config: CalendarConfig,
    ) -> impl Future<Output = Result<CalendarConfig, SiteError>> + Send;
}

/// Repository for [`UserProfile`]s, keyed by user id.
pub trait ProfileRepository {
    /// Store a new profile. Fails with a validation error when one exists.
    fn create(
        &self,
        profile: UserProfile,
    ) -> impl Future<Output = Result<UserProfile, SiteError>> + Send;

    fn get(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Option<UserProfile>, SiteError>> + Send;

    /// Public profiles ordered by display name.
    fn find_public(&self) -> impl Future<Output = Result<Vec<UserProfile>, SiteError>> + Send;

    fn update(
        &self,
        profile: UserProfile,
    ) -> impl Future<Output = Result<UserProfile, SiteError>> + Send;

    /// Stamp the last activity time. Returns `false` when there is no profile.
    fn touch(
        &self,
        user_id: &str,
        at: Timestamp,
    ) -> impl Future<Output = Result<bool, SiteError>> + Send;

    /// Delete a profile together with its stats and achievements.
    fn delete(&self, user_id: &str) -> impl Future<Output = Result<bool, SiteError>> + Send;
}

/// Activity counters and unlocked achievements per user.
pub trait ActivityRepository {
    fn get_stats(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Option<ActivityStats>, SiteError>> + Send;

    /// Fold `event` into the stored counters in one atomic step, starting
    /// from empty stats, and return the result.
    fn record(
        &self,
        user_id: &str,
        event: ActivityEvent,
        at: Timestamp,
    ) -> impl Future<Output = Result<ActivityStats, SiteError>> + Send;

    /// Unlocked achievements, oldest first.
    fn unlocked(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Vec<UnlockRecord>, SiteError>> + Send;

    /// Store unlocks, skipping ones already present. Returns how many were new.
    fn unlock(
        &self,
        user_id: &str,
        achievement_ids: Vec<&'static str>,
        at: Timestamp,
    ) -> impl Future<Output = Result<u64, SiteError>> + Send;
}
