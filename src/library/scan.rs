use std::borrow::Cow;
use std::collections::HashSet;
use std::path::Path;

use lofty::file::TaggedFileExt;
use lofty::tag::Accessor;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::LibrarySettings;
use crate::player::{Track, TrackId};

use super::display::TrackText;

/// Lower-cased extensions without the leading dot.
pub(super) fn extension_set(settings: &LibrarySettings) -> HashSet<String> {
    settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

pub(super) fn has_audio_extension(path: &Path, exts: &HashSet<String>) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| exts.contains(&ext.to_ascii_lowercase()))
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

fn walker(dir: &Path, settings: &LibrarySettings) -> WalkDir {
    let walker = WalkDir::new(dir).follow_links(settings.follow_links);
    // Root is depth 0; non-recursive means its direct children only.
    match (settings.recursive, settings.max_depth) {
        (false, _) => walker.max_depth(1),
        (true, Some(depth)) => walker.max_depth(depth),
        (true, None) => walker,
    }
}

fn tag_text(v: Option<Cow<'_, str>>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[derive(Default)]
struct Tags {
    title: Option<String>,
    artist: Option<String>,
    album: Option<String>,
}

fn read_tags(path: &Path) -> Tags {
    let tagged = match lofty::read_from_path(path) {
        Ok(t) => t,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no readable tags");
            return Tags::default();
        }
    };

    tagged
        .primary_tag()
        .or_else(|| tagged.first_tag())
        .map(|tag| Tags {
            title: tag_text(tag.title()),
            artist: tag_text(tag.artist()),
            album: tag_text(tag.album()),
        })
        .unwrap_or_default()
}

fn track_at(path: &Path, settings: &LibrarySettings) -> Track {
    let tags = read_tags(path);
    let title = tags.title.unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "UNKNOWN".to_string())
    });
    let uri = path.to_string_lossy().into_owned();

    let display = TrackText {
        uri: &uri,
        title: &title,
        artist: tags.artist.as_deref(),
        album: tags.album.as_deref(),
        display: None,
    }
    .compose(&settings.display_fields, &settings.display_separator);

    Track {
        id: TrackId(uri.clone()),
        uri,
        title,
        artist: tags.artist,
        album: tags.album,
        display,
    }
}

/// Scan `dir` into tracks sorted by display text (case-insensitive).
/// The path doubles as track id and uri.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let exts = extension_set(settings);

    let mut tracks: Vec<Track> = walker(dir, settings)
        .into_iter()
        .filter_entry(|e| settings.include_hidden || !is_hidden(e))
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(e) => {
                warn!(error = %e, "skipping unreadable library entry");
                None
            }
        })
        .filter(|e| e.path().is_file() && has_audio_extension(e.path(), &exts))
        .map(|e| track_at(e.path(), settings))
        .collect();

    tracks.sort_by_cached_key(|t| t.display.to_lowercase());
    debug!(dir = %dir.display(), count = tracks.len(), "library scanned");
    tracks
}
