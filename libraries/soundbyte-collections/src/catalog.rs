//! Every remote list SoundByte can show, as configured collections.

use crate::collection::PagedCollection;
use crate::source::{EndpointSource, PageShape, PageSource};
use crate::token::Continuation;
use serde::Deserialize;
use soundbyte_client::{ApiClient, ApiRequest, CredentialStore, LinkedPage};
use soundbyte_core::{
    CollectionSettings, Comment, FanburstTrack, Notification, Playlist, ServiceType, StreamItem,
    Track, User,
};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Which chart to show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChartKind {
    #[default]
    Top,
    Trending,
}

impl ChartKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ChartKind::Top => "top",
            ChartKind::Trending => "trending",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "top" => Ok(ChartKind::Top),
            "trending" | "new" => Ok(ChartKind::Trending),
            other => Err(format!("unknown chart kind: {}", other)),
        }
    }
}

/// Genre used when charts are not filtered.
pub const ALL_MUSIC: &str = "all-music";

#[derive(Debug, Deserialize)]
struct ChartEntry {
    track: Track,
}

/// Charts wrap each track in a `{track, score}` entry.
#[derive(Debug, Deserialize)]
pub struct ChartPage {
    #[serde(default)]
    collection: Vec<ChartEntry>,
    next_href: Option<String>,
}

impl PageShape<Track> for ChartPage {
    fn into_parts(self) -> (Vec<Track>, Option<String>) {
        let tracks = self.collection.into_iter().map(|e| e.track).collect();
        (tracks, self.next_href)
    }
}

#[derive(Debug, Deserialize)]
struct HistoryEntry {
    track: Track,
}

/// Play history wraps each track in a `{track, played_at}` entry.
#[derive(Debug, Deserialize)]
pub struct HistoryPage {
    #[serde(default)]
    collection: Vec<HistoryEntry>,
    next_href: Option<String>,
}

impl PageShape<Track> for HistoryPage {
    fn into_parts(self) -> (Vec<Track>, Option<String>) {
        let tracks = self.collection.into_iter().map(|e| e.track).collect();
        (tracks, self.next_href)
    }
}

/// Fanburst search answers with a bare array of its own track schema.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct FanburstPage(Vec<FanburstTrack>);

impl PageShape<Track> for FanburstPage {
    fn into_parts(self) -> (Vec<Track>, Option<String>) {
        (self.0.into_iter().map(Track::from).collect(), None)
    }
}

/// Builds the collections behind each view.
///
/// Holds the shared client and credential store so views never touch
/// either directly.
#[derive(Clone)]
pub struct Collections {
    api: Arc<dyn ApiClient>,
    credentials: Arc<CredentialStore>,
    page_size: u32,
}

impl Collections {
    pub fn new(
        api: Arc<dyn ApiClient>,
        credentials: Arc<CredentialStore>,
        settings: &CollectionSettings,
    ) -> Self {
        Self {
            api,
            credentials,
            page_size: settings.page_size,
        }
    }

    fn endpoint<T, P>(&self, request: ApiRequest, continuation: Continuation) -> EndpointSource<T, P> {
        EndpointSource::new(Arc::clone(&self.api), request, continuation)
    }

    /// Wrap any source in a collection sharing this catalog's settings.
    pub fn collection<T>(&self, name: &str, source: Arc<dyn PageSource<T>>) -> PagedCollection<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        PagedCollection::new(name, source, Arc::clone(&self.credentials), self.page_size)
    }

    // ===== Signed-in user =====

    pub fn stream(&self) -> PagedCollection<StreamItem> {
        let source = self
            .endpoint::<StreamItem, LinkedPage<StreamItem>>(
                ApiRequest::soundcloud("/me/activities"),
                Continuation::Cursor,
            )
            .requiring_login(ServiceType::SoundCloud);
        self.collection("stream", Arc::new(source))
    }

    pub fn my_likes(&self) -> PagedCollection<Track> {
        let source = self
            .endpoint::<Track, LinkedPage<Track>>(
                ApiRequest::soundcloud("/me/favorites"),
                Continuation::Offset,
            )
            .requiring_login(ServiceType::SoundCloud);
        self.collection("likes", Arc::new(source))
    }

    pub fn notifications(&self) -> PagedCollection<Notification> {
        let source = self
            .endpoint::<Notification, LinkedPage<Notification>>(
                ApiRequest::soundcloud("/me/activities/all/own"),
                Continuation::Cursor,
            )
            .requiring_login(ServiceType::SoundCloud);
        self.collection("notifications", Arc::new(source))
    }

    pub fn history(&self) -> PagedCollection<Track> {
        let source = self
            .endpoint::<Track, HistoryPage>(
                ApiRequest::soundcloud("/me/play-history/tracks").alternate_version(),
                Continuation::Offset,
            )
            .requiring_login(ServiceType::SoundCloud);
        self.collection("history", Arc::new(source))
    }

    // ===== Users =====

    pub fn user_likes(&self, user_id: &str) -> PagedCollection<Track> {
        let source = self.endpoint::<Track, LinkedPage<Track>>(
            ApiRequest::soundcloud(format!("/users/{}/favorites", user_id)),
            Continuation::Offset,
        );
        self.collection("user-likes", Arc::new(source))
    }

    pub fn user_tracks(&self, user_id: &str) -> PagedCollection<Track> {
        let source = self.endpoint::<Track, LinkedPage<Track>>(
            ApiRequest::soundcloud(format!("/users/{}/tracks", user_id)),
            Continuation::Offset,
        );
        self.collection("user-tracks", Arc::new(source))
    }

    pub fn user_playlists(&self, user_id: &str) -> PagedCollection<Playlist> {
        let source = self.endpoint::<Playlist, LinkedPage<Playlist>>(
            ApiRequest::soundcloud(format!("/users/{}/playlists", user_id)),
            Continuation::Offset,
        );
        self.collection("user-playlists", Arc::new(source))
    }

    pub fn followers(&self, user_id: &str) -> PagedCollection<User> {
        let source = self.endpoint::<User, LinkedPage<User>>(
            ApiRequest::soundcloud(format!("/users/{}/followers", user_id)),
            Continuation::Cursor,
        );
        self.collection("followers", Arc::new(source))
    }

    pub fn followings(&self, user_id: &str) -> PagedCollection<User> {
        let source = self.endpoint::<User, LinkedPage<User>>(
            ApiRequest::soundcloud(format!("/users/{}/followings", user_id)),
            Continuation::Cursor,
        );
        self.collection("followings", Arc::new(source))
    }

    // ===== Search =====

    pub fn search_tracks_source(&self, query: &str) -> Arc<dyn PageSource<Track>> {
        Arc::new(self.endpoint::<Track, LinkedPage<Track>>(
            ApiRequest::soundcloud("/tracks").param("q", query),
            Continuation::Offset,
        ))
    }

    pub fn search_tracks(&self, query: &str) -> PagedCollection<Track> {
        self.collection("search-tracks", self.search_tracks_source(query))
    }

    pub fn search_playlists_source(&self, query: &str) -> Arc<dyn PageSource<Playlist>> {
        Arc::new(self.endpoint::<Playlist, LinkedPage<Playlist>>(
            ApiRequest::soundcloud("/playlists").param("q", query),
            Continuation::Offset,
        ))
    }

    pub fn search_playlists(&self, query: &str) -> PagedCollection<Playlist> {
        self.collection("search-playlists", self.search_playlists_source(query))
    }

    pub fn search_users_source(&self, query: &str) -> Arc<dyn PageSource<User>> {
        Arc::new(self.endpoint::<User, LinkedPage<User>>(
            ApiRequest::soundcloud("/users").param("q", query),
            Continuation::Offset,
        ))
    }

    pub fn search_users(&self, query: &str) -> PagedCollection<User> {
        self.collection("search-users", self.search_users_source(query))
    }

    pub fn fanburst_search_source(&self, query: &str) -> Arc<dyn PageSource<Track>> {
        Arc::new(self.endpoint::<Track, FanburstPage>(
            ApiRequest::fanburst("/tracks/search").param("query", query),
            Continuation::PageNumber,
        ))
    }

    pub fn fanburst_search(&self, query: &str) -> PagedCollection<Track> {
        self.collection("fanburst-search", self.fanburst_search_source(query))
    }

    // ===== Explore =====

    pub fn charts_source(&self, kind: ChartKind, genre: &str) -> Arc<dyn PageSource<Track>> {
        let genre = if genre.is_empty() { ALL_MUSIC } else { genre };
        Arc::new(self.endpoint::<Track, ChartPage>(
            ApiRequest::soundcloud("/charts")
                .alternate_version()
                .param("kind", kind)
                .param("genre", format!("soundcloud:genres:{}", genre)),
            Continuation::Offset,
        ))
    }

    pub fn charts(&self, kind: ChartKind, genre: &str) -> PagedCollection<Track> {
        self.collection("charts", self.charts_source(kind, genre))
    }

    pub fn track_comments(&self, track_id: &str) -> PagedCollection<Comment> {
        let source = self.endpoint::<Comment, LinkedPage<Comment>>(
            ApiRequest::soundcloud(format!("/tracks/{}/comments", track_id)),
            Continuation::Offset,
        );
        self.collection("comments", Arc::new(source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_kind_parsing() {
        assert_eq!("top".parse::<ChartKind>(), Ok(ChartKind::Top));
        assert_eq!("Trending".parse::<ChartKind>(), Ok(ChartKind::Trending));
        assert!("weekly".parse::<ChartKind>().is_err());
    }

    #[test]
    fn chart_page_unwraps_tracks() {
        let page: ChartPage = serde_json::from_str(
            r#"{"collection": [{"track": {"id": 1, "title": "A"}, "score": 99.5}], "next_href": null}"#,
        )
        .unwrap();
        let (tracks, next) = page.into_parts();
        assert_eq!(tracks[0].id, "1");
        assert!(next.is_none());
    }

    #[test]
    fn fanburst_page_converts_tracks() {
        let page: FanburstPage = serde_json::from_str(
            r#"[{"id": "fb1", "title": "Warehouse", "duration": 300}]"#,
        )
        .unwrap();
        let (tracks, next) = page.into_parts();
        assert_eq!(tracks[0].service, ServiceType::Fanburst);
        assert_eq!(tracks[0].duration, 300_000);
        assert!(next.is_none());
    }
}
