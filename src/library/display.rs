use std::path::Path;

use crate::config::TrackDisplayField;
use crate::player::Track;

/// File stem of `uri` (`file://` prefix tolerated), if it has a usable one.
pub fn file_stem_of(uri: &str) -> Option<&str> {
    let path = Path::new(uri.strip_prefix("file://").unwrap_or(uri));
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.trim().is_empty())
}

fn present(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Borrowed view of the text a track can be labelled with.
///
/// The scanner builds one before a `Track` exists (no `display` yet); the
/// status line builds one from a finished `Track`.
#[derive(Debug, Clone, Copy)]
pub struct TrackText<'a> {
    pub uri: &'a str,
    pub title: &'a str,
    pub artist: Option<&'a str>,
    pub album: Option<&'a str>,
    pub display: Option<&'a str>,
}

impl<'a> TrackText<'a> {
    pub fn of(track: &'a Track) -> Self {
        Self {
            uri: &track.uri,
            title: &track.title,
            artist: track.artist.as_deref(),
            album: track.album.as_deref(),
            display: Some(&track.display),
        }
    }

    fn push_field(&self, field: TrackDisplayField, out: &mut Vec<&'a str>) {
        match field {
            // Without a precomputed display, fall back to "artist, title".
            TrackDisplayField::Display => match present(self.display) {
                Some(d) => out.push(d),
                None => out.extend(present(self.artist).into_iter().chain(present(Some(self.title)))),
            },
            TrackDisplayField::Title => out.extend(present(Some(self.title))),
            TrackDisplayField::Artist => out.extend(present(self.artist)),
            TrackDisplayField::Album => out.extend(present(self.album)),
            TrackDisplayField::Filename => out.extend(file_stem_of(self.uri)),
            TrackDisplayField::Path => out.extend(present(Some(self.uri))),
        }
    }

    /// Join the requested fields with `sep`. Missing fields are skipped; if
    /// nothing is left the display (or title) is used as is.
    pub fn compose(&self, fields: &[TrackDisplayField], sep: &str) -> String {
        let mut parts = Vec::with_capacity(fields.len());
        for &f in fields {
            self.push_field(f, &mut parts);
        }

        if parts.is_empty() {
            self.display.unwrap_or(self.title).to_string()
        } else {
            parts.join(sep)
        }
    }
}
