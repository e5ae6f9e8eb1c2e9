//! The video repository: writes, point lookups, relation queries and the
//! two-phase filtered query executor.

use std::collections::HashMap;

use chrono::Utc;
use reel_query::plan::count_wrapped;
use reel_query::{sort, Entity, FindOptions, SortOrder};
use rusqlite::types::Value;
use tracing::{instrument, warn};

use crate::connection::SqliteConnection;
use crate::error::{StoreError, StoreResult};
use crate::row::FromRow;
use crate::types::params_to_sql;
use crate::video::{NewVideo, Video, VideoFilter};

const VIDEOS_FOR_ARTIST: &str = "SELECT videos.* FROM videos \
    left join artists_videos as artists_join on artists_join.video_id = videos.id \
    left join artists on artists_join.artist_id = artists.id \
    WHERE artists.id = ? GROUP BY videos.id";

const VIDEOS_FOR_CHANNEL: &str = "SELECT videos.* FROM videos \
    join channels on channels.id = videos.channel_id \
    WHERE channels.id = ? GROUP BY videos.id";

const VIDEOS_FOR_TAG: &str = "SELECT videos.* FROM videos \
    left join videos_tags as tags_join on tags_join.video_id = videos.id \
    left join tags on tags_join.tag_id = tags.id \
    WHERE tags.id = ? GROUP BY videos.id";

/// Repository over the `videos` table and its relations.
///
/// Holds an explicitly-supplied connection handle. Every operation is
/// request-scoped and issues a bounded number of statements; the filtered
/// [`VideoStore::query`] issues three (id selection, count, one batched
/// point lookup).
#[derive(Clone)]
pub struct VideoStore {
    conn: SqliteConnection,
}

impl VideoStore {
    /// Create a store over the given connection.
    pub fn new(conn: SqliteConnection) -> Self {
        Self { conn }
    }

    /// Insert a new video and return the stored row.
    #[instrument(skip(self, new), fields(path = %new.path))]
    pub async fn create(&self, new: NewVideo) -> StoreResult<Video> {
        let now = Utc::now();
        self.conn
            .transaction(move |tx| {
                tx.execute(
                    "INSERT INTO videos (checksum, path, title, details, url, date, rating, \
                     size, duration, video_codec, audio_codec, width, height, framerate, \
                     bitrate, channel_id, created_at, updated_at) \
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                    rusqlite::params![
                        new.checksum,
                        new.path,
                        new.title,
                        new.details,
                        new.url,
                        new.date,
                        new.rating,
                        new.size,
                        new.duration,
                        new.video_codec,
                        new.audio_codec,
                        new.width,
                        new.height,
                        new.framerate,
                        new.bitrate,
                        new.channel_id,
                        now,
                        now,
                    ],
                )?;
                let id = tx.last_insert_rowid();
                tx.query_row(
                    "SELECT * FROM videos WHERE id = ? LIMIT 1",
                    [id],
                    Video::from_row,
                )
            })
            .await
    }

    /// Update an existing video and return the stored row.
    #[instrument(skip(self, video), fields(id = video.id))]
    pub async fn update(&self, video: Video) -> StoreResult<Video> {
        let id = video.id;
        let now = Utc::now();
        let result = self
            .conn
            .transaction(move |tx| {
                tx.execute(
                    "UPDATE videos SET checksum = ?, path = ?, title = ?, details = ?, \
                     url = ?, date = ?, rating = ?, size = ?, duration = ?, video_codec = ?, \
                     audio_codec = ?, width = ?, height = ?, framerate = ?, bitrate = ?, \
                     channel_id = ?, updated_at = ? WHERE id = ?",
                    rusqlite::params![
                        video.checksum,
                        video.path,
                        video.title,
                        video.details,
                        video.url,
                        video.date,
                        video.rating,
                        video.size,
                        video.duration,
                        video.video_codec,
                        video.audio_codec,
                        video.width,
                        video.height,
                        video.framerate,
                        video.bitrate,
                        video.channel_id,
                        now,
                        video.id,
                    ],
                )?;
                tx.query_row(
                    "SELECT * FROM videos WHERE id = ? LIMIT 1",
                    [video.id],
                    Video::from_row,
                )
            })
            .await;
        match result {
            Err(err) if err.is_no_rows() => Err(StoreError::NotFound {
                table: Video::TABLE,
                id,
            }),
            other => other,
        }
    }

    /// Look up one video by primary key.
    pub async fn find_by_id(&self, id: i64) -> StoreResult<Option<Video>> {
        self.conn
            .query_optional_row(
                "SELECT * FROM videos WHERE id = ? LIMIT 1",
                vec![Value::Integer(id)],
            )
            .await
    }

    /// Look up one video by its unique checksum.
    pub async fn find_by_checksum(&self, checksum: &str) -> StoreResult<Option<Video>> {
        self.conn
            .query_optional_row(
                "SELECT * FROM videos WHERE checksum = ? LIMIT 1",
                vec![Value::Text(checksum.to_string())],
            )
            .await
    }

    /// Look up one video by its unique path.
    pub async fn find_by_path(&self, path: &str) -> StoreResult<Option<Video>> {
        self.conn
            .query_optional_row(
                "SELECT * FROM videos WHERE path = ? LIMIT 1",
                vec![Value::Text(path.to_string())],
            )
            .await
    }

    /// All videos featuring the given artist.
    pub async fn find_by_artist_id(&self, artist_id: i64) -> StoreResult<Vec<Video>> {
        self.conn
            .query_rows(VIDEOS_FOR_ARTIST, vec![Value::Integer(artist_id)])
            .await
    }

    /// Number of videos featuring the given artist.
    pub async fn count_by_artist_id(&self, artist_id: i64) -> StoreResult<u64> {
        self.count_related(VIDEOS_FOR_ARTIST, artist_id).await
    }

    /// All videos belonging to the given channel.
    pub async fn find_by_channel_id(&self, channel_id: i64) -> StoreResult<Vec<Video>> {
        self.conn
            .query_rows(VIDEOS_FOR_CHANNEL, vec![Value::Integer(channel_id)])
            .await
    }

    /// Number of videos belonging to the given channel.
    pub async fn count_by_channel_id(&self, channel_id: i64) -> StoreResult<u64> {
        self.count_related(VIDEOS_FOR_CHANNEL, channel_id).await
    }

    /// Number of videos carrying the given tag.
    pub async fn count_by_tag_id(&self, tag_id: i64) -> StoreResult<u64> {
        self.count_related(VIDEOS_FOR_TAG, tag_id).await
    }

    /// Total number of videos.
    pub async fn count(&self) -> StoreResult<u64> {
        let total = self
            .conn
            .query_scalar(&count_wrapped("SELECT videos.id FROM videos"), vec![])
            .await?;
        Ok(total as u64)
    }

    /// All videos in default sort order. An empty table is an empty result,
    /// not an error.
    pub async fn all(&self) -> StoreResult<Vec<Video>> {
        let sql = format!(
            "SELECT * FROM videos {}",
            sort::resolve::<Video>(None, SortOrder::Asc)
        );
        self.conn.query_rows(&sql, vec![]).await
    }

    /// A random selection, optionally narrowed by a details search term.
    ///
    /// The term is compiled like any other search predicate, so LIKE
    /// metacharacters match literally and the term never reaches SQL text.
    pub async fn random_selection(
        &self,
        details_query: Option<&str>,
        limit: u32,
    ) -> StoreResult<Vec<Video>> {
        let limit = limit.clamp(1, 100);
        let term = details_query.map(str::trim).filter(|q| !q.is_empty());
        let (sql, params) = match term {
            Some(term) => {
                let fragment = reel_query::search::across(&["videos.details"], term);
                let sql = format!(
                    "SELECT * FROM videos WHERE {} ORDER BY RANDOM() LIMIT {limit}",
                    fragment.sql()
                );
                (sql, params_to_sql(fragment.params()))
            }
            None => (
                format!("SELECT * FROM videos ORDER BY RANDOM() LIMIT {limit}"),
                vec![],
            ),
        };
        self.conn.query_rows(&sql, params).await
    }

    /// Run a filtered, sorted, paginated query.
    ///
    /// Returns the matching page of videos in resolver order plus the total
    /// count of the filtered set, independent of pagination. Two-phase
    /// fetch: select distinct ids first, then one batched point lookup, so
    /// fan-out joins never duplicate or truncate full rows.
    #[instrument(skip(self, filter, options), fields(page = options.page))]
    pub async fn query(
        &self,
        filter: &VideoFilter,
        options: &FindOptions,
    ) -> StoreResult<(Vec<Video>, u64)> {
        let plan = filter.plan(options)?;
        let assembled = plan.assemble(
            &sort::resolve::<Video>(options.sort.as_deref(), options.direction),
            &options.pagination().to_sql(),
        )?;

        let params = params_to_sql(&assembled.params);
        let ids = self.conn.query_ids(&assembled.id_sql, params.clone()).await?;
        let total = self.conn.query_scalar(&assembled.count_sql, params).await?;
        let videos = self.fetch_ordered(&ids).await?;

        Ok((videos, total as u64))
    }

    /// Batched point lookup preserving the id-selection order.
    ///
    /// An id with no row was deleted between the two phases; it is skipped
    /// with a warning rather than failing the page.
    async fn fetch_ordered(&self, ids: &[i64]) -> StoreResult<Vec<Video>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!("SELECT * FROM videos WHERE id IN ({placeholders})");
        let params: Vec<Value> = ids.iter().map(|id| Value::Integer(*id)).collect();
        let rows: Vec<Video> = self.conn.query_rows(&sql, params).await?;

        let mut by_id: HashMap<i64, Video> = rows.into_iter().map(|v| (v.id, v)).collect();
        let mut ordered = Vec::with_capacity(ids.len());
        for id in ids {
            match by_id.remove(id) {
                Some(video) => ordered.push(video),
                None => warn!(id = *id, "video vanished between id selection and fetch"),
            }
        }
        Ok(ordered)
    }

    async fn count_related(&self, sql: &str, id: i64) -> StoreResult<u64> {
        let total = self
            .conn
            .query_scalar(&count_wrapped(sql), vec![Value::Integer(id)])
            .await?;
        Ok(total as u64)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use reel_query::{IntCriterion, Resolution};

    use super::*;

    const SCHEMA: &str = "
        CREATE TABLE channels (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL
        );
        CREATE TABLE videos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            checksum TEXT NOT NULL UNIQUE,
            path TEXT NOT NULL UNIQUE,
            title TEXT,
            details TEXT,
            url TEXT,
            date TEXT,
            rating INTEGER,
            size INTEGER,
            duration REAL,
            video_codec TEXT,
            audio_codec TEXT,
            width INTEGER,
            height INTEGER,
            framerate REAL,
            bitrate INTEGER,
            channel_id INTEGER REFERENCES channels(id),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE TABLE tags (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL
        );
        CREATE TABLE videos_tags (
            video_id INTEGER NOT NULL REFERENCES videos(id),
            tag_id INTEGER NOT NULL REFERENCES tags(id)
        );
        CREATE TABLE artists (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL
        );
        CREATE TABLE artists_videos (
            artist_id INTEGER NOT NULL REFERENCES artists(id),
            video_id INTEGER NOT NULL REFERENCES videos(id)
        );
        CREATE TABLE chapters (
            id INTEGER PRIMARY KEY,
            video_id INTEGER NOT NULL REFERENCES videos(id),
            title TEXT NOT NULL
        );
        CREATE TABLE transcripts (
            id INTEGER PRIMARY KEY,
            video_id INTEGER NOT NULL REFERENCES videos(id),
            body TEXT
        );
    ";

    async fn store() -> VideoStore {
        let conn = SqliteConnection::open_in_memory().await.unwrap();
        conn.execute_batch(SCHEMA).await.unwrap();
        VideoStore::new(conn)
    }

    fn new_video(path: &str) -> NewVideo {
        NewVideo {
            checksum: format!("{path}-sum"),
            path: path.to_string(),
            title: Some(path.to_string()),
            ..Default::default()
        }
    }

    async fn exec(store: &VideoStore, sql: &str, params: Vec<Value>) {
        store.conn.execute(sql, params).await.unwrap();
    }

    async fn tag_video(store: &VideoStore, video_id: i64, tag_id: i64) {
        exec(
            store,
            "INSERT OR IGNORE INTO tags (id, name) VALUES (?, ?)",
            vec![Value::Integer(tag_id), Value::Text(format!("tag-{tag_id}"))],
        )
        .await;
        exec(
            store,
            "INSERT INTO videos_tags (video_id, tag_id) VALUES (?, ?)",
            vec![Value::Integer(video_id), Value::Integer(tag_id)],
        )
        .await;
    }

    async fn add_chapter(store: &VideoStore, video_id: i64, title: &str) {
        exec(
            store,
            "INSERT INTO chapters (video_id, title) VALUES (?, ?)",
            vec![Value::Integer(video_id), Value::Text(title.to_string())],
        )
        .await;
    }

    // ========== Write Tests ==========

    #[tokio::test]
    async fn test_create_returns_stored_row() {
        let store = store().await;
        let video = store.create(new_video("/library/a.mp4")).await.unwrap();

        assert!(video.id > 0);
        assert_eq!(video.path, "/library/a.mp4");
        assert_eq!(video.title.as_deref(), Some("/library/a.mp4"));
    }

    #[tokio::test]
    async fn test_update_roundtrip() {
        let store = store().await;
        let mut video = store.create(new_video("/library/a.mp4")).await.unwrap();
        video.rating = Some(5);
        video.title = Some("renamed".to_string());

        let updated = store.update(video).await.unwrap();
        assert_eq!(updated.rating, Some(5));
        assert_eq!(updated.title.as_deref(), Some("renamed"));

        let reread = store.find_by_id(updated.id).await.unwrap().unwrap();
        assert_eq!(reread, updated);
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() {
        let store = store().await;
        let mut video = store.create(new_video("/library/a.mp4")).await.unwrap();
        video.id = 9999;

        let err = store.update(video).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { id: 9999, .. }));
    }

    // ========== Point Lookup Tests ==========

    #[tokio::test]
    async fn test_find_by_unique_keys() {
        let store = store().await;
        let video = store.create(new_video("/library/a.mp4")).await.unwrap();

        let by_checksum = store.find_by_checksum(&video.checksum).await.unwrap();
        assert_eq!(by_checksum.as_ref(), Some(&video));

        let by_path = store.find_by_path("/library/a.mp4").await.unwrap();
        assert_eq!(by_path.as_ref(), Some(&video));

        assert!(store.find_by_checksum("nope").await.unwrap().is_none());
        assert!(store.find_by_id(424242).await.unwrap().is_none());
    }

    // ========== Relation Query Tests ==========

    #[tokio::test]
    async fn test_find_and_count_by_artist() {
        let store = store().await;
        let a = store.create(new_video("/a.mp4")).await.unwrap();
        let _b = store.create(new_video("/b.mp4")).await.unwrap();
        exec(
            &store,
            "INSERT INTO artists (id, name) VALUES (1, 'ada')",
            vec![],
        )
        .await;
        exec(
            &store,
            "INSERT INTO artists_videos (artist_id, video_id) VALUES (1, ?)",
            vec![Value::Integer(a.id)],
        )
        .await;

        let found = store.find_by_artist_id(1).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, a.id);
        assert_eq!(store.count_by_artist_id(1).await.unwrap(), 1);
        assert_eq!(store.count_by_artist_id(2).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_find_and_count_by_channel() {
        let store = store().await;
        exec(
            &store,
            "INSERT INTO channels (id, name) VALUES (3, 'docs')",
            vec![],
        )
        .await;
        let mut new = new_video("/c.mp4");
        new.channel_id = Some(3);
        let c = store.create(new).await.unwrap();
        let _other = store.create(new_video("/d.mp4")).await.unwrap();

        let found = store.find_by_channel_id(3).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, c.id);
        assert_eq!(store.count_by_channel_id(3).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_count_by_tag() {
        let store = store().await;
        let a = store.create(new_video("/a.mp4")).await.unwrap();
        let b = store.create(new_video("/b.mp4")).await.unwrap();
        tag_video(&store, a.id, 5).await;
        tag_video(&store, b.id, 5).await;

        assert_eq!(store.count_by_tag_id(5).await.unwrap(), 2);
        assert_eq!(store.count_by_tag_id(6).await.unwrap(), 0);
    }

    // ========== all() Tests ==========

    #[tokio::test]
    async fn test_all_on_empty_table_is_empty_not_error() {
        let store = store().await;
        let videos = store.all().await.unwrap();
        assert!(videos.is_empty());
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_all_uses_default_sort() {
        let store = store().await;
        for path in ["/b.mp4", "/a.mp4", "/c.mp4"] {
            store.create(new_video(path)).await.unwrap();
        }

        let titles: Vec<_> = store
            .all()
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.title.unwrap())
            .collect();
        assert_eq!(titles, vec!["/a.mp4", "/b.mp4", "/c.mp4"]);
    }

    // ========== Filtered Query Tests ==========

    #[tokio::test]
    async fn test_query_with_empty_filter_matches_all() {
        let store = store().await;
        for path in ["/a.mp4", "/b.mp4", "/c.mp4"] {
            store.create(new_video(path)).await.unwrap();
        }

        let (videos, total) = store
            .query(&VideoFilter::default(), &FindOptions::default())
            .await
            .unwrap();
        let all = store.all().await.unwrap();

        assert_eq!(videos, all);
        assert_eq!(total, 3);
    }

    #[tokio::test]
    async fn test_query_tags_requires_all() {
        let store = store().await;
        let e1 = store.create(new_video("/e1.mp4")).await.unwrap();
        let e2 = store.create(new_video("/e2.mp4")).await.unwrap();
        for tag in [5, 9, 12] {
            tag_video(&store, e1.id, tag).await;
        }
        tag_video(&store, e2.id, 5).await;

        let filter = VideoFilter {
            tag_ids: vec![5, 9],
            ..Default::default()
        };
        let (videos, total) = store
            .query(&filter, &FindOptions::default())
            .await
            .unwrap();

        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].id, e1.id);
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn test_fan_out_join_yields_each_id_once() {
        let store = store().await;
        let video = store.create(new_video("/tagged.mp4")).await.unwrap();
        for tag in [1, 2, 3] {
            tag_video(&store, video.id, tag).await;
        }

        let (videos, total) = store
            .query(&VideoFilter::default(), &FindOptions::default())
            .await
            .unwrap();
        assert_eq!(videos.len(), 1);
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn test_count_is_pagination_independent() {
        let store = store().await;
        for i in 0..5 {
            store.create(new_video(&format!("/v{i}.mp4"))).await.unwrap();
        }

        let one_per_page = FindOptions {
            per_page: 1,
            ..Default::default()
        };
        let (videos, total) = store
            .query(&VideoFilter::default(), &one_per_page)
            .await
            .unwrap();
        assert_eq!(videos.len(), 1);
        assert_eq!(total, 5);

        let (_, unpaginated_total) = store
            .query(&VideoFilter::default(), &FindOptions::default())
            .await
            .unwrap();
        assert_eq!(total, unpaginated_total);
    }

    #[tokio::test]
    async fn test_query_is_missing_channel() {
        let store = store().await;
        exec(
            &store,
            "INSERT INTO channels (id, name) VALUES (1, 'main')",
            vec![],
        )
        .await;
        let e3 = store.create(new_video("/e3.mp4")).await.unwrap();
        let mut with_channel = new_video("/e4.mp4");
        with_channel.channel_id = Some(1);
        store.create(with_channel).await.unwrap();

        let filter = VideoFilter {
            is_missing: Some("channel".to_string()),
            ..Default::default()
        };
        let (videos, total) = store
            .query(&filter, &FindOptions::default())
            .await
            .unwrap();

        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].id, e3.id);
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn test_query_has_chapters() {
        let store = store().await;
        let with = store.create(new_video("/with.mp4")).await.unwrap();
        let without = store.create(new_video("/without.mp4")).await.unwrap();
        add_chapter(&store, with.id, "intro").await;
        add_chapter(&store, with.id, "outro").await;

        let has = VideoFilter {
            has_chapters: Some(true),
            ..Default::default()
        };
        let (videos, total) = store.query(&has, &FindOptions::default()).await.unwrap();
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].id, with.id);
        assert_eq!(total, 1);

        let has_not = VideoFilter {
            has_chapters: Some(false),
            ..Default::default()
        };
        let (videos, total) = store
            .query(&has_not, &FindOptions::default())
            .await
            .unwrap();
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].id, without.id);
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn test_query_rating_between() {
        let store = store().await;
        for (path, rating) in [("/r1.mp4", 1), ("/r3.mp4", 3), ("/r5.mp4", 5)] {
            let mut new = new_video(path);
            new.rating = Some(rating);
            store.create(new).await.unwrap();
        }

        let filter = VideoFilter {
            rating: Some(IntCriterion::between(2, 4)),
            ..Default::default()
        };
        let (videos, total) = store
            .query(&filter, &FindOptions::default())
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(videos[0].rating, Some(3));
    }

    #[tokio::test]
    async fn test_query_resolution_bucket() {
        let store = store().await;
        for (path, height) in [("/sd.mp4", 480), ("/hd.mp4", 1080), ("/uhd.mp4", 2160)] {
            let mut new = new_video(path);
            new.height = Some(height);
            store.create(new).await.unwrap();
        }

        let filter = VideoFilter {
            resolution: Some(Resolution::FourK),
            ..Default::default()
        };
        let (videos, total) = store
            .query(&filter, &FindOptions::default())
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(videos[0].height, Some(2160));
    }

    #[tokio::test]
    async fn test_query_search_matches_chapter_titles() {
        let store = store().await;
        let with = store.create(new_video("/plain.mp4")).await.unwrap();
        store.create(new_video("/other.mp4")).await.unwrap();
        add_chapter(&store, with.id, "the great eclipse").await;

        let options = FindOptions {
            q: Some("eclipse".to_string()),
            ..Default::default()
        };
        let (videos, total) = store
            .query(&VideoFilter::default(), &options)
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(videos[0].id, with.id);
    }

    #[tokio::test]
    async fn test_query_search_metacharacters_match_literally() {
        let store = store().await;
        let mut percent = new_video("/percent.mp4");
        percent.title = Some("100% pure".to_string());
        let percent = store.create(percent).await.unwrap();
        let mut decoy = new_video("/decoy.mp4");
        decoy.title = Some("100x pure".to_string());
        store.create(decoy).await.unwrap();

        let options = FindOptions {
            q: Some("100%".to_string()),
            ..Default::default()
        };
        let (videos, total) = store
            .query(&VideoFilter::default(), &options)
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(videos[0].id, percent.id);
    }

    #[tokio::test]
    async fn test_query_sort_directions_reverse() {
        let store = store().await;
        for path in ["/b.mp4", "/a.mp4", "/c.mp4"] {
            store.create(new_video(path)).await.unwrap();
        }

        let asc = FindOptions {
            sort: Some("path".to_string()),
            ..Default::default()
        };
        let desc = FindOptions {
            direction: reel_query::SortOrder::Desc,
            ..asc.clone()
        };

        let (up, _) = store.query(&VideoFilter::default(), &asc).await.unwrap();
        let (down, _) = store.query(&VideoFilter::default(), &desc).await.unwrap();

        let up_ids: Vec<_> = up.iter().map(|v| v.id).collect();
        let mut down_ids: Vec<_> = down.iter().map(|v| v.id).collect();
        down_ids.reverse();
        assert_eq!(up_ids, down_ids);
    }

    #[tokio::test]
    async fn test_query_unknown_sort_key_falls_back() {
        let store = store().await;
        store.create(new_video("/a.mp4")).await.unwrap();

        let options = FindOptions {
            sort: Some("no_such_column".to_string()),
            ..Default::default()
        };
        let (videos, total) = store
            .query(&VideoFilter::default(), &options)
            .await
            .unwrap();
        assert_eq!(videos.len(), 1);
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn test_query_rejects_unknown_is_missing_field() {
        let store = store().await;
        let filter = VideoFilter {
            is_missing: Some("evil; DROP TABLE videos".to_string()),
            ..Default::default()
        };
        let err = store
            .query(&filter, &FindOptions::default())
            .await
            .unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[tokio::test]
    async fn test_query_second_page() {
        let store = store().await;
        for i in 0..5 {
            store.create(new_video(&format!("/v{i}.mp4"))).await.unwrap();
        }

        let page2 = FindOptions {
            sort: Some("path".to_string()),
            page: 2,
            per_page: 2,
            ..Default::default()
        };
        let (videos, total) = store
            .query(&VideoFilter::default(), &page2)
            .await
            .unwrap();
        assert_eq!(total, 5);
        let paths: Vec<_> = videos.into_iter().map(|v| v.path).collect();
        assert_eq!(paths, vec!["/v2.mp4", "/v3.mp4"]);
    }

    // ========== Executor Edge Cases ==========

    #[tokio::test]
    async fn test_fetch_ordered_skips_vanished_ids() {
        let store = store().await;
        let a = store.create(new_video("/a.mp4")).await.unwrap();
        let b = store.create(new_video("/b.mp4")).await.unwrap();

        // Simulate a row deleted between id selection and point lookup.
        let videos = store
            .fetch_ordered(&[b.id, 9999, a.id])
            .await
            .unwrap();
        let ids: Vec<_> = videos.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }

    #[tokio::test]
    async fn test_random_selection_respects_limit_and_term() {
        let store = store().await;
        for i in 0..4 {
            let mut new = new_video(&format!("/v{i}.mp4"));
            new.details = Some(if i % 2 == 0 { "nature" } else { "city" }.to_string());
            store.create(new).await.unwrap();
        }

        let sample = store.random_selection(Some("nature"), 10).await.unwrap();
        assert_eq!(sample.len(), 2);
        assert!(sample.iter().all(|v| v.details.as_deref() == Some("nature")));

        let capped = store.random_selection(None, 3).await.unwrap();
        assert_eq!(capped.len(), 3);

        // Metacharacters and quotes are bound, not concatenated.
        let hostile = store
            .random_selection(Some("'; DROP TABLE videos; --"), 10)
            .await
            .unwrap();
        assert!(hostile.is_empty());
        assert_eq!(store.count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_query_combined_filters() {
        let store = store().await;
        exec(
            &store,
            "INSERT INTO channels (id, name) VALUES (1, 'main')",
            vec![],
        )
        .await;
        let mut keep = new_video("/keep.mp4");
        keep.rating = Some(5);
        keep.height = Some(1080);
        keep.channel_id = Some(1);
        let keep = store.create(keep).await.unwrap();
        tag_video(&store, keep.id, 7).await;

        let mut near_miss = new_video("/near.mp4");
        near_miss.rating = Some(5);
        near_miss.height = Some(1080);
        near_miss.channel_id = Some(1);
        let near_miss = store.create(near_miss).await.unwrap();
        // Right rating and resolution, wrong tag.
        tag_video(&store, near_miss.id, 8).await;

        let filter = VideoFilter {
            rating: Some(IntCriterion::new(5, reel_query::Modifier::Equals)),
            resolution: Some(Resolution::FullHd),
            tag_ids: vec![7],
            channel_id: Some(1),
            ..Default::default()
        };
        let (videos, total) = store
            .query(&filter, &FindOptions::default())
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(videos[0].id, keep.id);
    }
}
