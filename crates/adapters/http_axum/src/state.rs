//! Shared application state for axum handlers.

use std::sync::Arc;
use std::time::Duration;

use sitehub_app::event_bus::InProcessEventBus;
use sitehub_app::ports::{
    ActivityRepository, CalendarConfigRepository, FavoriteRepository, GameStatusRepository,
    HolidayProvider, MessageRepository, NoteRepository, ProfileRepository, ScoreRepository,
    SettingRepository, SuggestionRepository, UserRepository, VocabularyRepository,
};
use sitehub_app::presence::PresenceTracker;
use sitehub_app::services::activity_service::ActivityService;
use sitehub_app::services::calendar_service::CalendarService;
use sitehub_app::services::game_service::GameService;
use sitehub_app::services::message_service::MessageService;
use sitehub_app::services::note_service::NoteService;
use sitehub_app::services::profile_service::ProfileService;
use sitehub_app::services::score_service::ScoreService;
use sitehub_app::services::settings_service::SettingsService;
use sitehub_app::services::suggestion_service::SuggestionService;
use sitehub_app::services::user_service::UserService;
use sitehub_app::services::vocabulary_service::VocabularyService;
use sitehub_domain::admin::{AdminCodes, AdminLevel};

/// Concrete adapter types plugged behind the ports.
///
/// Grouping them in one trait keeps handler signatures to a single type
/// parameter. The account, settings and activity repositories are shared by
/// several services, so they must be cheap to clone.
pub trait Backend: Send + Sync + 'static {
    type Messages: MessageRepository + Send + Sync + 'static;
    type Users: UserRepository + FavoriteRepository + Clone + Send + Sync + 'static;
    type Suggestions: SuggestionRepository + Send + Sync + 'static;
    type Scores: ScoreRepository + Send + Sync + 'static;
    type Games: GameStatusRepository + Send + Sync + 'static;
    type Vocabulary: VocabularyRepository + Send + Sync + 'static;
    type Notes: NoteRepository + Send + Sync + 'static;
    type Settings: SettingRepository + Clone + Send + Sync + 'static;
    type Calendar: CalendarConfigRepository + Send + Sync + 'static;
    type Holidays: HolidayProvider + Send + Sync + 'static;
    type Profiles: ProfileRepository + Send + Sync + 'static;
    type Activity: ActivityRepository + Clone + Send + Sync + 'static;
}

/// One instance of every adapter of a [`Backend`].
pub struct Adapters<B: Backend> {
    pub messages: B::Messages,
    pub users: B::Users,
    pub suggestions: B::Suggestions,
    pub scores: B::Scores,
    pub games: B::Games,
    pub vocabulary: B::Vocabulary,
    pub notes: B::Notes,
    pub settings: B::Settings,
    pub calendar: B::Calendar,
    pub holidays: B::Holidays,
    pub profiles: B::Profiles,
    pub activity: B::Activity,
}

/// Publisher handed to services: the shared in-process bus.
pub type Bus = Arc<InProcessEventBus>;

/// Application state shared across all axum handlers.
///
/// `Clone` is implemented manually so the underlying types themselves do not
/// need to be `Clone`; only the `Arc` wrappers are cloned.
pub struct AppState<B: Backend> {
    pub admin_codes: Arc<AdminCodes>,
    pub event_bus: Bus,
    pub presence: Arc<PresenceTracker<Bus>>,
    pub messages: Arc<MessageService<B::Messages, B::Users, B::Settings, Bus>>,
    pub users: Arc<UserService<B::Users>>,
    pub suggestions: Arc<SuggestionService<B::Suggestions>>,
    pub scores: Arc<ScoreService<B::Scores>>,
    pub games: Arc<GameService<B::Games>>,
    pub vocabulary: Arc<VocabularyService<B::Vocabulary, B::Users, B::Users>>,
    pub notes: Arc<NoteService<B::Notes>>,
    pub settings: Arc<SettingsService<B::Settings>>,
    pub calendar: Arc<CalendarService<B::Calendar, B::Holidays>>,
    pub profiles: Arc<ProfileService<B::Profiles, B::Activity, B::Users>>,
    pub activity: Arc<ActivityService<B::Activity, B::Users>>,
}

impl<B: Backend> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            admin_codes: Arc::clone(&self.admin_codes),
            event_bus: Arc::clone(&self.event_bus),
            presence: Arc::clone(&self.presence),
            messages: Arc::clone(&self.messages),
            users: Arc::clone(&self.users),
            suggestions: Arc::clone(&self.suggestions),
            scores: Arc::clone(&self.scores),
            games: Arc::clone(&self.games),
            vocabulary: Arc::clone(&self.vocabulary),
            notes: Arc::clone(&self.notes),
            settings: Arc::clone(&self.settings),
            calendar: Arc::clone(&self.calendar),
            profiles: Arc::clone(&self.profiles),
            activity: Arc::clone(&self.activity),
        }
    }
}

impl<B: Backend> AppState<B> {
    /// Wire every service on top of the given adapters.
    ///
    /// Heartbeats older than `presence_ttl` stop counting as online.
    pub fn new(
        adapters: Adapters<B>,
        admin_codes: AdminCodes,
        event_bus: Bus,
        presence_ttl: Duration,
    ) -> Self {
        let Adapters {
            messages,
            users,
            suggestions,
            scores,
            games,
            vocabulary,
            notes,
            settings,
            calendar,
            holidays,
            profiles,
            activity,
        } = adapters;

        Self {
            admin_codes: Arc::new(admin_codes),
            presence: Arc::new(PresenceTracker::new(Arc::clone(&event_bus), presence_ttl)),
            messages: Arc::new(MessageService::new(
                messages,
                users.clone(),
                settings.clone(),
                Arc::clone(&event_bus),
            )),
            vocabulary: Arc::new(VocabularyService::new(vocabulary, users.clone(), users.clone())),
            profiles: Arc::new(ProfileService::new(
                profiles,
                activity.clone(),
                users.clone(),
            )),
            activity: Arc::new(ActivityService::new(activity, users.clone())),
            users: Arc::new(UserService::new(users)),
            suggestions: Arc::new(SuggestionService::new(suggestions)),
            scores: Arc::new(ScoreService::new(scores)),
            games: Arc::new(GameService::new(games)),
            notes: Arc::new(NoteService::new(notes)),
            settings: Arc::new(SettingsService::new(settings)),
            calendar: Arc::new(CalendarService::new(calendar, holidays)),
            event_bus,
        }
    }

    /// Privilege granted by an optional admin code.
    pub fn level(&self, code: Option<&str>) -> AdminLevel {
        self.admin_codes.level(code)
    }
}
