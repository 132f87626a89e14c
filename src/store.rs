use chrono::NaiveDateTime;
use itertools::Itertools;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Literal field delimiter of the trial log. Not expected to appear in
/// any field value; this is not enforced.
pub const DELIMITER: &str = "<>";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";
const PLAYER_FILE_EXT: &str = "tpl";

/// One timed attempt at typing a target string.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialRecord {
    /// Position of the drill within its round; restarts at 0 every round.
    pub index: usize,
    pub target: String,
    pub typed: String,
    pub elapsed_secs: f64,
    pub recorded_at: NaiveDateTime,
}

impl TrialRecord {
    /// Serialize as one log line: `index<>target<>typed<>elapsed<>timestamp`.
    fn to_line(&self) -> String {
        format!(
            "{idx}{d}{target}{d}{typed}{d}{elapsed}{d}{ts}",
            idx = self.index,
            d = DELIMITER,
            target = self.target,
            typed = self.typed,
            elapsed = self.elapsed_secs,
            ts = self.recorded_at.format(TIMESTAMP_FORMAT),
        )
    }

    fn parse_line(line: &str) -> Option<TrialRecord> {
        let fields: Vec<&str> = line.split(DELIMITER).collect();
        let [idx, target, typed, elapsed, ts] = fields.as_slice() else {
            return None;
        };

        Some(TrialRecord {
            index: idx.parse().ok()?,
            target: (*target).to_string(),
            typed: (*typed).to_string(),
            elapsed_secs: elapsed.parse().ok()?,
            recorded_at: NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S%.f").ok()?,
        })
    }
}

/// Flat-file store of per-player trial logs, one `<name>.tpl` per player
/// under an explicit data directory.
#[derive(Debug, Clone)]
pub struct PlayerStore {
    data_dir: PathBuf,
}

/// Append handle for one player's log. Buffered; `close` flushes and
/// fsyncs so a finished round survives a crash.
#[derive(Debug)]
pub struct TrialLog {
    writer: BufWriter<File>,
}

impl TrialLog {
    pub fn append(&mut self, record: &TrialRecord) -> io::Result<()> {
        writeln!(self.writer, "{}", record.to_line())
    }

    pub fn close(mut self) -> io::Result<()> {
        self.writer.flush()?;
        self.writer.get_ref().sync_all()
    }
}

impl PlayerStore {
    pub fn new<P: Into<PathBuf>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn player_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("{name}.{PLAYER_FILE_EXT}"))
    }

    /// Create a new, empty profile. Fails with `AlreadyExists` if the
    /// player already has one.
    pub fn create(&self, name: &str) -> io::Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        let path = self.player_path(name);
        log::debug!("creating player log {}", path.display());
        OpenOptions::new().write(true).create_new(true).open(path)?;
        Ok(())
    }

    pub fn exists(&self, name: &str) -> bool {
        self.player_path(name).exists()
    }

    /// Names of all players with a profile, sorted.
    pub fn players(&self) -> io::Result<Vec<String>> {
        let entries = match fs::read_dir(&self.data_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(e),
        };

        Ok(entries
            .filter_map(|entry| {
                let path = entry.ok()?.path();
                if path.extension()? != PLAYER_FILE_EXT {
                    return None;
                }
                Some(path.file_stem()?.to_str()?.to_string())
            })
            .sorted()
            .collect())
    }

    /// Open an append-only log handle for one round of trials.
    pub fn append_log(&self, name: &str) -> io::Result<TrialLog> {
        fs::create_dir_all(&self.data_dir)?;
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(self.player_path(name))?;
        Ok(TrialLog {
            writer: BufWriter::new(file),
        })
    }

    /// Load a player's full trial history. Unparseable lines (e.g. a line
    /// torn by a crash mid-append) are skipped with a warning.
    pub fn load(&self, name: &str) -> io::Result<Vec<TrialRecord>> {
        let file = File::open(self.player_path(name))?;
        let mut records = Vec::new();

        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            match TrialRecord::parse_line(&line) {
                Some(record) => records.push(record),
                None => log::warn!("skipping malformed trial record for {name}: {line:?}"),
            }
        }

        Ok(records)
    }
}

/// Player names become filenames; reject anything that would escape the
/// data directory or produce an unusable file name.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '\\']) && !name.starts_with('.')
}
