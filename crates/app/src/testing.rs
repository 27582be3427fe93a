//! In-memory port implementations shared by the service tests.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use sitehub_domain::activity::{ActivityEvent, ActivityStats, UnlockRecord};
use sitehub_domain::calendar::CalendarConfig;
use sitehub_domain::error::{SiteError, ValidationError};
use sitehub_domain::game::GameStatus;
use sitehub_domain::id::{CommentId, MessageId, NoteId, ScoreId, SuggestionId, UserId};
use sitehub_domain::message::{Message, ReactionChange};
use sitehub_domain::note::Note;
use sitehub_domain::profile::UserProfile;
use sitehub_domain::score::{Ranking, Score, Submission};
use sitehub_domain::setting::SystemSetting;
use sitehub_domain::time::Timestamp;
use sitehub_domain::suggestion::{Comment, Suggestion, SuggestionStatus, SuggestionSummary};
use sitehub_domain::user::User;
use sitehub_domain::vocabulary::VocabularyItem;

use crate::ports::{
    ActivityRepository, CalendarConfigRepository, FavoriteRepository, GameStatusRepository,
    HolidayProvider, MessageRepository, NoteRepository, ProfileRepository, ScoreRepository,
    SettingRepository, SuggestionRepository, UserRepository, VocabularyRepository,
};

#[derive(Default, Clone)]
pub struct InMemoryMessageRepo {
    store: Arc<Mutex<Vec<Message>>>,
}

impl MessageRepository for InMemoryMessageRepo {
    fn create(&self, message: Message) -> impl Future<Output = Result<Message, SiteError>> + Send {
        self.store.lock().unwrap().push(message.clone());
        async { Ok(message) }
    }

    fn get_by_id(
        &self,
        id: MessageId,
    ) -> impl Future<Output = Result<Option<Message>, SiteError>> + Send {
        let found = self.store.lock().unwrap().iter().find(|m| m.id == id).cloned();
        async { Ok(found) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Message>, SiteError>> + Send {
        let all = self.store.lock().unwrap().clone();
        async { Ok(all) }
    }

    fn change_reaction(
        &self,
        id: MessageId,
        change: ReactionChange,
    ) -> impl Future<Output = Result<Option<(Message, bool)>, SiteError>> + Send {
        let mut store = self.store.lock().unwrap();
        let outcome = store.iter_mut().find(|m| m.id == id).map(|message| {
            let changed = message.apply_reaction(&change);
            (message.clone(), changed)
        });
        async { Ok(outcome) }
    }

    fn delete(&self, id: MessageId) -> impl Future<Output = Result<bool, SiteError>> + Send {
        let mut store = self.store.lock().unwrap();
        let before = store.len();
        store.retain(|m| m.id != id);
        let removed = store.len() != before;
        async move { Ok(removed) }
    }

    fn delete_all(&self) -> impl Future<Output = Result<u64, SiteError>> + Send {
        let mut store = self.store.lock().unwrap();
        let removed = store.len() as u64;
        store.clear();
        async move { Ok(removed) }
    }
}

#[derive(Default, Clone)]
pub struct InMemoryUserRepo {
    store: Arc<Mutex<HashMap<UserId, User>>>,
    favorites: Arc<Mutex<HashMap<UserId, Vec<i64>>>>,
}

impl UserRepository for InMemoryUserRepo {
    fn create(&self, user: User) -> impl Future<Output = Result<User, SiteError>> + Send {
        self.store.lock().unwrap().insert(user.id, user.clone());
        async { Ok(user) }
    }

    fn get_by_id(
        &self,
        id: UserId,
    ) -> impl Future<Output = Result<Option<User>, SiteError>> + Send {
        let found = self.store.lock().unwrap().get(&id).cloned();
        async { Ok(found) }
    }

    fn find_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<User>, SiteError>> + Send {
        let found = self
            .store
            .lock()
            .unwrap()
            .values()
            .find(|u| u.username == username)
            .cloned();
        async { Ok(found) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<User>, SiteError>> + Send {
        let mut all: Vec<User> = self.store.lock().unwrap().values().cloned().collect();
        all.sort_by_key(|u| u.created_at);
        async { Ok(all) }
    }

    fn update(&self, user: User) -> impl Future<Output = Result<User, SiteError>> + Send {
        self.store.lock().unwrap().insert(user.id, user.clone());
        async { Ok(user) }
    }

    fn delete(&self, id: UserId) -> impl Future<Output = Result<bool, SiteError>> + Send {
        let removed = self.store.lock().unwrap().remove(&id).is_some();
        self.favorites.lock().unwrap().remove(&id);
        async move { Ok(removed) }
    }
}

impl FavoriteRepository for InMemoryUserRepo {
    fn get_favorites(
        &self,
        user: UserId,
    ) -> impl Future<Output = Result<Vec<i64>, SiteError>> + Send {
        let ids = self
            .favorites
            .lock()
            .unwrap()
            .get(&user)
            .cloned()
            .unwrap_or_default();
        async { Ok(ids) }
    }

    fn add_favorite(
        &self,
        user: UserId,
        item: i64,
    ) -> impl Future<Output = Result<(), SiteError>> + Send {
        let mut favorites = self.favorites.lock().unwrap();
        let ids = favorites.entry(user).or_default();
        if !ids.contains(&item) {
            ids.push(item);
        }
        async { Ok(()) }
    }

    fn remove_favorite(
        &self,
        user: UserId,
        item: i64,
    ) -> impl Future<Output = Result<(), SiteError>> + Send {
        if let Some(ids) = self.favorites.lock().unwrap().get_mut(&user) {
            ids.retain(|id| *id != item);
        }
        async { Ok(()) }
    }
}

#[derive(Default, Clone)]
pub struct InMemorySuggestionRepo {
    suggestions: Arc<Mutex<Vec<Suggestion>>>,
    comments: Arc<Mutex<Vec<Comment>>>,
}

impl InMemorySuggestionRepo {
    fn summaries(&self, filter: impl Fn(&Suggestion) -> bool) -> Vec<SuggestionSummary> {
        let comments = self.comments.lock().unwrap();
        let mut all: Vec<SuggestionSummary> = self
            .suggestions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| filter(s))
            .map(|s| SuggestionSummary {
                suggestion: s.clone(),
                comment_count: comments.iter().filter(|c| c.suggestion_id == s.id).count() as u64,
            })
            .collect();
        all.sort_by(|a, b| b.suggestion.timestamp.cmp(&a.suggestion.timestamp));
        all
    }
}

impl SuggestionRepository for InMemorySuggestionRepo {
    fn create(
        &self,
        suggestion: Suggestion,
    ) -> impl Future<Output = Result<Suggestion, SiteError>> + Send {
        self.suggestions.lock().unwrap().push(suggestion.clone());
        async { Ok(suggestion) }
    }

    fn get_by_id(
        &self,
        id: SuggestionId,
    ) -> impl Future<Output = Result<Option<Suggestion>, SiteError>> + Send {
        let found = self
            .suggestions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned();
        async { Ok(found) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<SuggestionSummary>, SiteError>> + Send {
        let all = self.summaries(|_| true);
        async { Ok(all) }
    }

    fn find_by_user(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Vec<SuggestionSummary>, SiteError>> + Send {
        let mine = self.summaries(|s| s.user_id == user_id);
        async { Ok(mine) }
    }

    fn update_status(
        &self,
        id: SuggestionId,
        status: SuggestionStatus,
    ) -> impl Future<Output = Result<bool, SiteError>> + Send {
        let mut store = self.suggestions.lock().unwrap();
        let found = store.iter_mut().find(|s| s.id == id).map(|s| s.status = status);
        let updated = found.is_some();
        async move { Ok(updated) }
    }

    fn delete(&self, id: SuggestionId) -> impl Future<Output = Result<bool, SiteError>> + Send {
        let mut store = self.suggestions.lock().unwrap();
        let before = store.len();
        store.retain(|s| s.id != id);
        let removed = store.len() != before;
        self.comments.lock().unwrap().retain(|c| c.suggestion_id != id);
        async move { Ok(removed) }
    }

    fn create_comment(
        &self,
        comment: Comment,
    ) -> impl Future<Output = Result<Comment, SiteError>> + Send {
        self.comments.lock().unwrap().push(comment.clone());
        async { Ok(comment) }
    }

    fn get_comment(
        &self,
        id: CommentId,
    ) -> impl Future<Output = Result<Option<Comment>, SiteError>> + Send {
        let found = self.comments.lock().unwrap().iter().find(|c| c.id == id).cloned();
        async { Ok(found) }
    }

    fn find_comments(
        &self,
        suggestion: SuggestionId,
    ) -> impl Future<Output = Result<Vec<Comment>, SiteError>> + Send {
        let mut thread: Vec<Comment> = self
            .comments
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.suggestion_id == suggestion)
            .cloned()
            .collect();
        thread.sort_by_key(|c| c.timestamp);
        async { Ok(thread) }
    }

    fn delete_comment(
        &self,
        id: CommentId,
    ) -> impl Future<Output = Result<bool, SiteError>> + Send {
        let mut store = self.comments.lock().unwrap();
        let before = store.len();
        store.retain(|c| c.id != id);
        let removed = store.len() != before;
        async move { Ok(removed) }
    }
}

#[derive(Default, Clone)]
pub struct InMemoryScoreRepo {
    store: Arc<Mutex<Vec<Score>>>,
}

impl InMemoryScoreRepo {
    /// Insert without the replace-on-submit rule, to seed duplicates.
    pub fn push(&self, score: Score) {
        self.store.lock().unwrap().push(score);
    }
}

impl ScoreRepository for InMemoryScoreRepo {
    fn top_for_game(
        &self,
        game_type: &str,
        ranking: Ranking,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Score>, SiteError>> + Send {
        let mut scores: Vec<Score> = self
            .store
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.game_type == game_type)
            .cloned()
            .collect();
        ranking.sort(&mut scores);
        scores.truncate(limit);
        async { Ok(scores) }
    }

    fn find_by_user_and_game(
        &self,
        user_id: &str,
        game_type: &str,
    ) -> impl Future<Output = Result<Vec<Score>, SiteError>> + Send {
        let scores: Vec<Score> = self
            .store
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.user_id == user_id && s.game_type == game_type)
            .cloned()
            .collect();
        async { Ok(scores) }
    }

    fn submit_if_better(
        &self,
        score: Score,
        ranking: Ranking,
    ) -> impl Future<Output = Result<Submission, SiteError>> + Send {
        let mut store = self.store.lock().unwrap();
        let same_slot = |s: &Score| s.user_id == score.user_id && s.game_type == score.game_type;
        let existing: Vec<Score> = store.iter().filter(|s| same_slot(s)).cloned().collect();
        let outcome = Submission::judge(ranking, &existing, score.score);
        if outcome.new_high_score {
            store.retain(|s| !same_slot(s));
            store.push(score);
        }
        async move { Ok(outcome) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Score>, SiteError>> + Send {
        let all = self.store.lock().unwrap().clone();
        async { Ok(all) }
    }

    fn delete(&self, id: ScoreId) -> impl Future<Output = Result<bool, SiteError>> + Send {
        let mut store = self.store.lock().unwrap();
        let before = store.len();
        store.retain(|s| s.id != id);
        let removed = store.len() != before;
        async move { Ok(removed) }
    }

    fn delete_by_game(
        &self,
        game_type: &str,
    ) -> impl Future<Output = Result<u64, SiteError>> + Send {
        let mut store = self.store.lock().unwrap();
        let before = store.len();
        store.retain(|s| s.game_type != game_type);
        let removed = (before - store.len()) as u64;
        async move { Ok(removed) }
    }

    fn delete_many(
        &self,
        ids: Vec<ScoreId>,
    ) -> impl Future<Output = Result<u64, SiteError>> + Send {
        let mut store = self.store.lock().unwrap();
        let before = store.len();
        store.retain(|s| !ids.contains(&s.id));
        let removed = (before - store.len()) as u64;
        async move { Ok(removed) }
    }
}

#[derive(Default, Clone)]
pub struct InMemoryGameStatusRepo {
    store: Arc<Mutex<HashMap<String, GameStatus>>>,
}

impl GameStatusRepository for InMemoryGameStatusRepo {
    fn get(
        &self,
        game_type: &str,
    ) -> impl Future<Output = Result<Option<GameStatus>, SiteError>> + Send {
        let found = self.store.lock().unwrap().get(game_type).cloned();
        async { Ok(found) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<GameStatus>, SiteError>> + Send {
        let mut all: Vec<GameStatus> = self.store.lock().unwrap().values().cloned().collect();
        all.sort_by(|a, b| a.game_type.cmp(&b.game_type));
        async { Ok(all) }
    }

    fn upsert(
        &self,
        status: GameStatus,
    ) -> impl Future<Output = Result<GameStatus, SiteError>> + Send {
        self.store
            .lock()
            .unwrap()
            .insert(status.game_type.clone(), status.clone());
        async { Ok(status) }
    }
}

#[derive(Default, Clone)]
pub struct InMemoryVocabularyRepo {
    store: Arc<Mutex<Vec<VocabularyItem>>>,
}

impl VocabularyRepository for InMemoryVocabularyRepo {
    fn get_all(&self) -> impl Future<Output = Result<Vec<VocabularyItem>, SiteError>> + Send {
        let mut all = self.store.lock().unwrap().clone();
        all.sort_by_key(|item| item.id);
        async { Ok(all) }
    }

    fn upsert_many(
        &self,
        items: Vec<VocabularyItem>,
    ) -> impl Future<Output = Result<u64, SiteError>> + Send {
        let mut store = self.store.lock().unwrap();
        let written = items.len() as u64;
        for item in items {
            store.retain(|existing| existing.id != item.id);
            store.push(item);
        }
        async move { Ok(written) }
    }
}

#[derive(Default, Clone)]
pub struct InMemoryNoteRepo {
    store: Arc<Mutex<Vec<Note>>>,
}

impl NoteRepository for InMemoryNoteRepo {
    fn create(&self, note: Note) -> impl Future<Output = Result<Note, SiteError>> + Send {
        self.store.lock().unwrap().push(note.clone());
        async { Ok(note) }
    }

    fn get_by_id(
        &self,
        id: NoteId,
    ) -> impl Future<Output = Result<Option<Note>, SiteError>> + Send {
        let found = self.store.lock().unwrap().iter().find(|n| n.id == id).cloned();
        async { Ok(found) }
    }

    fn find_by_user(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Vec<Note>, SiteError>> + Send {
        let mut mine: Vec<Note> = self
            .store
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        async { Ok(mine) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Note>, SiteError>> + Send {
        let mut all = self.store.lock().unwrap().clone();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        async { Ok(all) }
    }

    fn update(&self, note: Note) -> impl Future<Output = Result<Note, SiteError>> + Send {
        let mut store = self.store.lock().unwrap();
        if let Some(slot) = store.iter_mut().find(|n| n.id == note.id) {
            *slot = note.clone();
        }
        async { Ok(note) }
    }

    fn delete(&self, id: NoteId) -> impl Future<Output = Result<bool, SiteError>> + Send {
        let mut store = self.store.lock().unwrap();
        let before = store.len();
        store.retain(|n| n.id != id);
        let removed = store.len() != before;
        async move { Ok(removed) }
    }
}

#[derive(Default, Clone)]
pub struct InMemorySettingRepo {
    store: Arc<Mutex<HashMap<String, SystemSetting>>>,
}

impl SettingRepository for InMemorySettingRepo {
    fn get(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<SystemSetting>, SiteError>> + Send {
        let found = self.store.lock().unwrap().get(key).cloned();
        async { Ok(found) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<SystemSetting>, SiteError>> + Send {
        let mut all: Vec<SystemSetting> = self.store.lock().unwrap().values().cloned().collect();
        all.sort_by(|a, b| a.key.cmp(&b.key));
        async { Ok(all) }
    }

    fn upsert(
        &self,
        setting: SystemSetting,
    ) -> impl Future<Output = Result<SystemSetting, SiteError>> + Send {
        self.store
            .lock()
            .unwrap()
            .insert(setting.key.clone(), setting.clone());
        async { Ok(setting) }
    }

    fn insert_if_absent(
        &self,
        setting: SystemSetting,
    ) -> impl Future<Output = Result<bool, SiteError>> + Send {
        let mut store = self.store.lock().unwrap();
        let inserted = !store.contains_key(&setting.key);
        if inserted {
            store.insert(setting.key.clone(), setting);
        }
        async move { Ok(inserted) }
    }
}

#[derive(Default, Clone)]
pub struct InMemoryCalendarRepo {
    store: Arc<Mutex<Option<CalendarConfig>>>,
}

impl CalendarConfigRepository for InMemoryCalendarRepo {
    fn get(&self) -> impl Future<Output = Result<Option<CalendarConfig>, SiteError>> + Send {
        let found = self.store.lock().unwrap().clone();
        async { Ok(found) }
    }

    fn save(
        &self,
        config: CalendarConfig,
    ) -> impl Future<Output = Result<CalendarConfig, SiteError>> + Send {
        *self.store.lock().unwrap() = Some(config.clone());
        async { Ok(config) }
    }
}

#[derive(Default, Clone)]
pub struct InMemoryProfileRepo {
    store: Arc<Mutex<HashMap<String, UserProfile>>>,
}

impl ProfileRepository for InMemoryProfileRepo {
    fn create(
        &self,
        profile: UserProfile,
    ) -> impl Future<Output = Result<UserProfile, SiteError>> + Send {
        let mut store = self.store.lock().unwrap();
        let result = if store.contains_key(&profile.user_id) {
            Err(ValidationError::AlreadyExists {
                entity: "Profile",
                id: profile.user_id.clone(),
            }
            .into())
        } else {
            store.insert(profile.user_id.clone(), profile.clone());
            Ok(profile)
        };
        async { result }
    }

    fn get(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Option<UserProfile>, SiteError>> + Send {
        let found = self.store.lock().unwrap().get(user_id).cloned();
        async { Ok(found) }
    }

    fn find_public(&self) -> impl Future<Output = Result<Vec<UserProfile>, SiteError>> + Send {
        let mut public: Vec<UserProfile> = self
            .store
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.is_public())
            .cloned()
            .collect();
        public.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        async { Ok(public) }
    }

    fn update(
        &self,
        profile: UserProfile,
    ) -> impl Future<Output = Result<UserProfile, SiteError>> + Send {
        self.store
            .lock()
            .unwrap()
            .insert(profile.user_id.clone(), profile.clone());
        async { Ok(profile) }
    }

    fn touch(
        &self,
        user_id: &str,
        at: Timestamp,
    ) -> impl Future<Output = Result<bool, SiteError>> + Send {
        let touched = self
            .store
            .lock()
            .unwrap()
            .get_mut(user_id)
            .map(|p| p.last_active = at)
            .is_some();
        async move { Ok(touched) }
    }

    fn delete(&self, user_id: &str) -> impl Future<Output = Result<bool, SiteError>> + Send {
        let removed = self.store.lock().unwrap().remove(user_id).is_some();
        async move { Ok(removed) }
    }
}

#[derive(Default, Clone)]
pub struct InMemoryActivityRepo {
    stats: Arc<Mutex<HashMap<String, ActivityStats>>>,
    unlocked: Arc<Mutex<Vec<(String, UnlockRecord)>>>,
}

impl ActivityRepository for InMemoryActivityRepo {
    fn get_stats(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Option<ActivityStats>, SiteError>> + Send {
        let found = self.stats.lock().unwrap().get(user_id).cloned();
        async { Ok(found) }
    }

    fn record(
        &self,
        user_id: &str,
        event: ActivityEvent,
        at: Timestamp,
    ) -> impl Future<Output = Result<ActivityStats, SiteError>> + Send {
        let mut all = self.stats.lock().unwrap();
        let stats = all
            .entry(user_id.to_string())
            .or_insert_with(|| ActivityStats::empty(user_id));
        stats.apply(&event, at);
        let stats = stats.clone();
        async { Ok(stats) }
    }

    fn unlocked(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Vec<UnlockRecord>, SiteError>> + Send {
        let records: Vec<UnlockRecord> = self
            .unlocked
            .lock()
            .unwrap()
            .iter()
            .filter(|(owner, _)| owner == user_id)
            .map(|(_, record)| record.clone())
            .collect();
        async { Ok(records) }
    }

    fn unlock(
        &self,
        user_id: &str,
        achievement_ids: Vec<&'static str>,
        at: Timestamp,
    ) -> impl Future<Output = Result<u64, SiteError>> + Send {
        let mut unlocked = self.unlocked.lock().unwrap();
        let mut added = 0;
        for id in achievement_ids {
            let known = unlocked
                .iter()
                .any(|(owner, record)| owner == user_id && record.achievement_id == id);
            if !known {
                unlocked.push((
                    user_id.to_string(),
                    UnlockRecord {
                        achievement_id: id.to_string(),
                        unlocked_at: at,
                    },
                ));
                added += 1;
            }
        }
        async move { Ok(added) }
    }
}

/// Holiday source answering with a fixed document, or failing when empty.
#[derive(Default, Clone)]
pub struct StubHolidays {
    pub document: Option<serde_json::Value>,
}

#[derive(Debug, thiserror::Error)]
#[error("upstream unavailable")]
struct Unavailable;

impl StubHolidays {
    fn answer(&self) -> Result<serde_json::Value, SiteError> {
        self.document
            .clone()
            .ok_or_else(|| SiteError::Upstream(Box::new(Unavailable)))
    }
}

impl HolidayProvider for StubHolidays {
    fn public_holidays(
        &self,
        _year: i32,
    ) -> impl Future<Output = Result<serde_json::Value, SiteError>> + Send {
        let answer = self.answer();
        async { answer }
    }

    fn school_holidays(
        &self,
        _school_year: &str,
    ) -> impl Future<Output = Result<serde_json::Value, SiteError>> + Send {
        let answer = self.answer();
        async { answer }
    }
}
