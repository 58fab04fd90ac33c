//! The songs file: one header line, then one pipe-delimited record per line.
//!
//! ```text
//! TITLE|ARTIST|ALBUM|TRACK|DURATION|GENRE|FILEPATH|IMAGE_PATH|IS_LIKED|PLAY_COUNT
//! ```
//!
//! Older files carry only the first eight fields; those load with
//! `liked = false` and `play_count = 0`.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::model::Track;
use super::store::{Library, LibraryError};

pub const HEADER: &str =
    "TITLE|ARTIST|ALBUM|TRACK|DURATION|GENRE|FILEPATH|IMAGE_PATH|IS_LIKED|PLAY_COUNT";

const FIELDS: usize = 10;
const LEGACY_FIELDS: usize = 8;

/// How many records a load accepted and how many it skipped.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: usize,
}

/// Load the songs file at `path` into `library`.
///
/// A missing file is an empty load. Malformed lines and duplicate titles are
/// skipped and counted; only I/O failures are errors.
pub fn load(library: &mut Library, path: &Path) -> Result<LoadReport, LibraryError> {
    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "no songs file yet");
            return Ok(LoadReport::default());
        }
        Err(e) => return Err(e.into()),
    };

    let report = load_from_str(library, &contents);
    info!(
        path = %path.display(),
        loaded = report.loaded,
        skipped = report.skipped,
        "loaded songs file"
    );
    Ok(report)
}

pub(crate) fn load_from_str(library: &mut Library, contents: &str) -> LoadReport {
    let mut report = LoadReport::default();

    // First line is the header.
    for (idx, line) in contents.lines().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        let Some(track) = parse_record(line) else {
            debug!(line = idx + 1, "skipping malformed record");
            report.skipped += 1;
            continue;
        };
        match library.add(track) {
            Ok(()) => report.loaded += 1,
            Err(e) => {
                debug!(line = idx + 1, "skipping record: {e}");
                report.skipped += 1;
            }
        }
    }

    report
}

fn parse_record(line: &str) -> Option<Track> {
    let fields: Vec<&str> = line.split('|').collect();
    if fields.len() != FIELDS && fields.len() != LEGACY_FIELDS {
        return None;
    }

    let track_number = fields[3].trim().parse::<u32>().ok()?;
    let duration = fields[4].trim().parse::<u32>().ok()?;

    let mut track = Track::new(
        fields[0],
        fields[1],
        fields[2],
        track_number,
        duration,
        fields[5],
        fields[6],
    );
    if !fields[7].is_empty() {
        track.artwork = Some(PathBuf::from(fields[7]));
    }

    if fields.len() == FIELDS {
        track.liked = parse_flag(fields[8]);
        track.play_count = fields[9].trim().parse().unwrap_or(0);
    }

    Some(track)
}

fn parse_flag(s: &str) -> bool {
    matches!(
        s.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes"
    )
}

fn format_record(track: &Track) -> String {
    let artwork = track
        .artwork
        .as_ref()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();
    [
        track.title.clone(),
        track.artist.clone(),
        track.album.clone(),
        track.track_number.to_string(),
        track.duration.to_string(),
        track.genre.clone(),
        track.path.to_string_lossy().into_owned(),
        artwork,
        track.liked.to_string(),
        track.play_count.to_string(),
    ]
    .join("|")
}

/// Write every song in `library` to `path`. Returns the number of records written.
///
/// The whole file is rendered in memory and written to a temporary file in
/// the same directory, which then replaces `path` in a single rename.
pub fn save(library: &Library, path: &Path) -> Result<usize, LibraryError> {
    let songs = library.list_all();

    let mut out = String::with_capacity(HEADER.len() + 1 + songs.len() * 96);
    out.push_str(HEADER);
    out.push('\n');
    for track in &songs {
        out.push_str(&format_record(track));
        out.push('\n');
    }

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(out.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    info!(path = %path.display(), count = songs.len(), "saved songs file");
    Ok(songs.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn song(title: &str, artist: &str, album: &str, n: u32) -> Track {
        Track::new(
            title,
            artist,
            album,
            n,
            180 + n,
            "Rock",
            format!("/music/{title}.mp3"),
        )
    }

    #[test]
    fn save_then_load_round_trips_all_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("songs.txt");

        let mut lib = Library::new();
        let mut a = song("Alpha", "Band", "First", 1);
        a.liked = true;
        a.play_count = 7;
        a.artwork = Some(PathBuf::from("/art/first.png"));
        lib.add(a).unwrap();
        lib.add(song("beta", "Band", "First", 2)).unwrap();
        lib.add(song("Gamma", "Other", "Second", 1)).unwrap();

        assert_eq!(save(&lib, &path).unwrap(), 3);

        let mut fresh = Library::new();
        let report = load(&mut fresh, &path).unwrap();
        assert_eq!(report, LoadReport { loaded: 3, skipped: 0 });

        for original in lib.list_all() {
            let loaded = fresh.get(&original.title).unwrap();
            assert_eq!(loaded, original);
        }
        assert_eq!(fresh.get("alpha").unwrap().play_count, 7);
        assert!(fresh.get("ALPHA").unwrap().liked);
    }

    #[test]
    fn saved_file_starts_with_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("songs.txt");
        let mut lib = Library::new();
        lib.add(song("Alpha", "Band", "First", 1)).unwrap();
        save(&lib, &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(HEADER));
        assert_eq!(
            lines.next(),
            Some("Alpha|Band|First|1|181|Rock|/music/Alpha.mp3||false|0")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn save_creates_missing_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("songs.txt");
        save(&Library::new(), &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), format!("{HEADER}\n"));
    }

    #[test]
    fn save_replaces_existing_file_completely() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("songs.txt");
        fs::write(&path, "stale contents that are much longer than the new file\n".repeat(50))
            .unwrap();

        let mut lib = Library::new();
        lib.add(song("Alpha", "Band", "First", 1)).unwrap();
        save(&lib, &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(!text.contains("stale"));
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn save_into_missing_directory_that_cannot_be_created_fails_without_touching_target() {
        let dir = tempdir().unwrap();
        // A regular file where a directory is expected.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let path = blocker.join("songs.txt");

        let err = save(&Library::new(), &path).unwrap_err();
        assert!(matches!(err, LibraryError::Io(_)));
        assert_eq!(fs::read_to_string(&blocker).unwrap(), "not a directory");
    }

    #[test]
    fn load_accepts_legacy_eight_field_lines() {
        let mut lib = Library::new();
        let text = "TITLE|ARTIST|ALBUM|TRACK|DURATION|GENRE|FILEPATH|IMAGE_PATH\n\
                    Old Song|Someone|Album|3|200|Jazz|/m/old.mp3|/m/old.png\n";
        let report = load_from_str(&mut lib, text);
        assert_eq!(report, LoadReport { loaded: 1, skipped: 0 });

        let t = lib.get("old song").unwrap();
        assert_eq!(t.track_number, 3);
        assert_eq!(t.duration, 200);
        assert_eq!(t.artwork.as_deref(), Some(Path::new("/m/old.png")));
        assert!(!t.liked);
        assert_eq!(t.play_count, 0);
    }

    #[test]
    fn load_skips_lines_with_wrong_field_count() {
        let mut lib = Library::new();
        let text = format!(
            "{HEADER}\n\
             Good|A|B|1|100|Pop|/a.mp3||true|2\n\
             Short|A|B|1|100|Pop|/b.mp3\n\
             Also Good|A|B|2|100|Pop|/c.mp3||false|0\n"
        );
        let report = load_from_str(&mut lib, &text);
        assert_eq!(report, LoadReport { loaded: 2, skipped: 1 });
        assert!(lib.get("Good").is_some());
        assert!(lib.get("Also Good").is_some());
        assert!(lib.get("Short").is_none());
    }

    #[test]
    fn load_skips_records_with_non_integer_track_or_duration() {
        let mut lib = Library::new();
        let text = format!(
            "{HEADER}\n\
             BadTrack|A|B|one|100|Pop|/a.mp3||false|0\n\
             BadDuration|A|B|1|long|Pop|/b.mp3||false|0\n\
             Fine|A|B|1|100|Pop|/c.mp3||false|0\n"
        );
        let report = load_from_str(&mut lib, &text);
        assert_eq!(report, LoadReport { loaded: 1, skipped: 2 });
        assert_eq!(lib.len(), 1);
    }

    #[test]
    fn load_tolerates_odd_liked_and_play_count_values() {
        let mut lib = Library::new();
        let text = format!(
            "{HEADER}\n\
             One|A|B|1|100|Pop|/a.mp3||True|x\n\
             Two|A|B|2|100|Pop|/b.mp3||maybe|4\n"
        );
        let report = load_from_str(&mut lib, &text);
        assert_eq!(report.loaded, 2);
        let one = lib.get("one").unwrap();
        assert!(one.liked);
        assert_eq!(one.play_count, 0);
        let two = lib.get("two").unwrap();
        assert!(!two.liked);
        assert_eq!(two.play_count, 4);
    }

    #[test]
    fn load_skips_duplicate_titles_and_blank_lines() {
        let mut lib = Library::new();
        let text = format!(
            "{HEADER}\n\
             Song|A|B|1|100|Pop|/a.mp3||false|1\n\
             \n\
             SONG|C|D|2|100|Pop|/b.mp3||false|9\n"
        );
        let report = load_from_str(&mut lib, &text);
        assert_eq!(report, LoadReport { loaded: 1, skipped: 1 });
        assert_eq!(lib.get("song").unwrap().artist, "A");
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let mut lib = Library::new();
        let report = load(&mut lib, &dir.path().join("nope.txt")).unwrap();
        assert_eq!(report, LoadReport::default());
        assert!(lib.is_empty());
    }
}
