//! The `videos` entity: schema metadata, row mapping, filter descriptor
//! and its compilation into a query plan.

use chrono::{DateTime, Utc};
use reel_query::criterion::{IntCriterion, Resolution};
use reel_query::{predicate, search, Entity, FindOptions, Fragment, QueryError, QueryPlan, QueryResult};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use crate::row::FromRow;

/// A catalog entry for one video file.
#[derive(Debug, Clone, PartialEq)]
pub struct Video {
    pub id: i64,
    pub checksum: String,
    pub path: String,
    pub title: Option<String>,
    pub details: Option<String>,
    pub url: Option<String>,
    pub date: Option<String>,
    pub rating: Option<i64>,
    pub size: Option<i64>,
    pub duration: Option<f64>,
    pub video_codec: Option<String>,
    pub audio_codec: Option<String>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub framerate: Option<f64>,
    pub bitrate: Option<i64>,
    pub channel_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Column values for a new row. `id` and the timestamps are assigned by the
/// store on insert.
#[derive(Debug, Clone, Default)]
pub struct NewVideo {
    pub checksum: String,
    pub path: String,
    pub title: Option<String>,
    pub details: Option<String>,
    pub url: Option<String>,
    pub date: Option<String>,
    pub rating: Option<i64>,
    pub size: Option<i64>,
    pub duration: Option<f64>,
    pub video_codec: Option<String>,
    pub audio_codec: Option<String>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub framerate: Option<f64>,
    pub bitrate: Option<i64>,
    pub channel_id: Option<i64>,
}

impl Entity for Video {
    const TABLE: &'static str = "videos";
    const PRIMARY_KEY: &'static str = "id";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "checksum",
        "path",
        "title",
        "details",
        "url",
        "date",
        "rating",
        "size",
        "duration",
        "video_codec",
        "audio_codec",
        "width",
        "height",
        "framerate",
        "bitrate",
        "channel_id",
        "created_at",
        "updated_at",
    ];
    const SEARCHABLE: &'static [&'static str] = &[
        "videos.title",
        "videos.details",
        "videos.path",
        "videos.checksum",
        "chapters.title",
    ];
    const SORTABLE: &'static [&'static str] = &[
        "title",
        "path",
        "date",
        "rating",
        "duration",
        "size",
        "height",
        "bitrate",
        "framerate",
        "created_at",
        "updated_at",
        "id",
    ];
    const DEFAULT_SORT: &'static str = "title";
}

impl FromRow for Video {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            checksum: row.get("checksum")?,
            path: row.get("path")?,
            title: row.get("title")?,
            details: row.get("details")?,
            url: row.get("url")?,
            date: row.get("date")?,
            rating: row.get("rating")?,
            size: row.get("size")?,
            duration: row.get("duration")?,
            video_codec: row.get("video_codec")?,
            audio_codec: row.get("audio_codec")?,
            width: row.get("width")?,
            height: row.get("height")?,
            framerate: row.get("framerate")?,
            bitrate: row.get("bitrate")?,
            channel_id: row.get("channel_id")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

/// FROM/JOIN body for filtered queries. Every relation a filter can touch
/// is joined here; several of the joins fan out, which is why assembled
/// statements group on `videos.id`.
pub(crate) const QUERY_BODY: &str = "videos \
    left join chapters on chapters.video_id = videos.id \
    left join artists_videos as artists_join on artists_join.video_id = videos.id \
    left join artists on artists_join.artist_id = artists.id \
    left join channels as channel on channel.id = videos.channel_id \
    left join transcripts as transcript on transcript.video_id = videos.id \
    left join videos_tags as tags_join on tags_join.video_id = videos.id \
    left join tags on tags_join.tag_id = tags.id";

/// Optional, independently-combinable predicates over the catalog.
///
/// An absent field contributes no clause and no parameter to the compiled
/// statement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoFilter {
    /// Numeric criterion on `videos.rating`.
    pub rating: Option<IntCriterion>,
    /// Numeric criterion on `videos.duration` (seconds).
    pub duration: Option<IntCriterion>,
    /// Height bucket on `videos.height`.
    pub resolution: Option<Resolution>,
    /// Whether the video must (or must not) have chapters.
    pub has_chapters: Option<bool>,
    /// Named relation (`transcript`, `channel`, `artists`, `date`) or own
    /// column that must be absent.
    pub is_missing: Option<String>,
    /// The video must carry every one of these tags.
    pub tag_ids: Vec<i64>,
    /// The video must feature this artist.
    pub artist_id: Option<i64>,
    /// The video must belong to this channel.
    pub channel_id: Option<i64>,
}

impl VideoFilter {
    /// Compile this filter, plus the free-text search from `options`, into
    /// a query plan over the catalog join body.
    pub fn plan(&self, options: &FindOptions) -> QueryResult<QueryPlan> {
        let mut plan = QueryPlan::for_entity::<Video>(QUERY_BODY);

        if let Some(term) = options.search_term() {
            plan.push_where(search::across(Video::SEARCHABLE, term));
        }
        if let Some(rating) = &self.rating {
            plan.push_where(rating.fragment("videos.rating")?);
        }
        if let Some(duration) = &self.duration {
            plan.push_where(duration.fragment("videos.duration")?);
        }
        if let Some(resolution) = &self.resolution {
            plan.push_where(resolution.fragment("videos.height"));
        }
        if let Some(present) = self.has_chapters {
            let (bucket, fragment) =
                predicate::has_related("chapters.video_id", "chapters.id", present);
            plan.push(bucket, fragment);
        }
        if let Some(field) = self.missing_field() {
            plan.push_where(missing_fragment(field)?);
        }
        if let Some(all) = predicate::all_of("tags.id", &self.tag_ids) {
            plan.push_where(all.where_clause);
            plan.push_having(all.having_clause);
        }
        if let Some(artist_id) = self.artist_id {
            plan.push_where(Fragment::new("artists.id = ?", vec![artist_id.into()]));
        }
        if let Some(channel_id) = self.channel_id {
            plan.push_where(Fragment::new("channel.id = ?", vec![channel_id.into()]));
        }

        Ok(plan)
    }

    fn missing_field(&self) -> Option<&str> {
        self.is_missing
            .as_deref()
            .map(str::trim)
            .filter(|field| !field.is_empty())
    }
}

/// NULL-ness test for a named relation.
///
/// Unlisted names fall back to `videos.<field> IS NULL` only when `<field>`
/// is one of the entity's own columns; anything else is rejected, so
/// caller-supplied text never reaches SQL.
fn missing_fragment(field: &str) -> QueryResult<Fragment> {
    let sql = match field {
        "transcript" => "transcript.video_id IS NULL".to_string(),
        "channel" => "videos.channel_id IS NULL".to_string(),
        "artists" => "artists_join.video_id IS NULL".to_string(),
        "date" => "(videos.date IS NULL OR videos.date = '')".to_string(),
        other if Video::COLUMNS.contains(&other) => format!("videos.{other} IS NULL"),
        other => {
            return Err(QueryError::invalid_filter(
                "is_missing",
                format!("`{other}` is not a known relation or column"),
            ));
        }
    };
    Ok(Fragment::literal(sql))
}
