//! Append-only grade record storage.
//!
//! [`GradeStore`] is the seam between the presentation layer and the
//! persisted records. [`CsvGradeStore`] keeps them in a flat CSV file;
//! [`MemoryGradeStore`] keeps them in a `Vec` for tests and benches.
//!
//! Retrieval is always a full linear scan with in-memory filtering. The file
//! is not locked: concurrent writers from other processes are not guarded
//! against.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use serde::Serialize;

use crate::error::{GradebookError, Result};
use crate::model::{GradeFilter, GradeRecord, Score};

/// Column names of the header row, in the order rows are written.
pub const HEADER: [&str; 6] = [
    "student_name",
    "course",
    "score",
    "level",
    "semester",
    "session",
];

/// Storage backend for grade records.
pub trait GradeStore {
    /// Append one record. The store is unchanged if this fails.
    fn append(&mut self, record: &GradeRecord) -> Result<()>;

    /// Records matching `filter`, in insertion order. An absent store or no
    /// match yields an empty vector.
    fn query(&self, filter: &GradeFilter) -> Result<Vec<GradeRecord>>;

    /// Every record, in insertion order.
    fn list_all(&self) -> Result<Vec<GradeRecord>> {
        self.query(&GradeFilter::all())
    }

    /// Scores of the matching records.
    fn query_scores(&self, filter: &GradeFilter) -> Result<Vec<Score>> {
        Ok(self.query(filter)?.iter().map(GradeRecord::score).collect())
    }

    /// `(course, score)` pairs of the matching records.
    fn query_courses_and_scores(&self, filter: &GradeFilter) -> Result<Vec<(String, Score)>> {
        Ok(self
            .query(filter)?
            .into_iter()
            .map(|r| (r.course().to_string(), r.score()))
            .collect())
    }
}

/// Validate caller input and append it as a new record.
///
/// Returns the record as stored (trimmed). Validation failures leave the
/// store untouched.
#[allow(clippy::too_many_arguments)]
pub fn append_record<S: GradeStore + ?Sized>(
    store: &mut S,
    student_name: &str,
    course: &str,
    score: i64,
    level: &str,
    semester: &str,
    session: &str,
) -> Result<GradeRecord> {
    let record = GradeRecord::new(student_name, course, score)?
        .with_level(level)
        .with_semester(semester)
        .with_session(session);
    store.append(&record)?;
    Ok(record)
}

/// A data row that was skipped during a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    /// 1-based line number in the file.
    pub line: u64,
    pub reason: String,
}

/// Outcome of a CSV scan: the matching records plus any rows skipped as
/// malformed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    pub records: Vec<GradeRecord>,
    pub skipped: Vec<SkippedRow>,
}

/// Grade records persisted in a CSV file.
#[derive(Debug, Clone)]
pub struct CsvGradeStore {
    path: PathBuf,
}

impl CsvGradeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Scan the file, keeping records that match `filter` and collecting the
    /// rows that had to be skipped.
    ///
    /// A row is skipped when a required column is missing, the score is not
    /// an integer in [0, 100], or the name or course is blank. Only failures
    /// of the file as a whole are returned as errors.
    pub fn scan(&self, filter: &GradeFilter) -> Result<ScanReport> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("no grade file at {}", self.path.display());
                return Ok(ScanReport::default());
            }
            Err(e) => return Err(GradebookError::io(&self.path, e)),
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(BufReader::new(file));

        let headers = reader
            .headers()
            .map_err(|e| GradebookError::csv(&self.path, e))?
            .clone();
        if headers.iter().all(|h| h.trim().is_empty()) {
            return Ok(ScanReport::default());
        }
        let columns = Columns::locate(&headers, &self.path)?;

        let mut report = ScanReport::default();
        for row in reader.records() {
            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    if matches!(e.kind(), csv::ErrorKind::Io(_)) {
                        return Err(GradebookError::csv(&self.path, e));
                    }
                    let line = e.position().map(|p| p.line()).unwrap_or(0);
                    report.skip(line, e.to_string());
                    continue;
                }
            };
            let line = row.position().map(|p| p.line()).unwrap_or(0);
            match columns.parse(&row) {
                Ok(record) => {
                    if filter.matches(&record) {
                        report.records.push(record);
                    }
                }
                Err(reason) => report.skip(line, reason),
            }
        }

        tracing::debug!(
            "scanned {}: {} matching, {} skipped",
            self.path.display(),
            report.records.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                fs::create_dir_all(parent).map_err(|e| GradebookError::io(parent, e))
            }
            _ => Ok(()),
        }
    }

    fn needs_header(&self) -> Result<bool> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len() == 0),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(true),
            Err(e) => Err(GradebookError::io(&self.path, e)),
        }
    }

    /// Whether a non-empty file ends without a line terminator, e.g. after
    /// a hand edit. Appending there would merge the new row into the last.
    fn lacks_trailing_newline(&self) -> Result<bool> {
        let mut file = File::open(&self.path).map_err(|e| GradebookError::io(&self.path, e))?;
        let mut last = [0u8; 1];
        file.seek(SeekFrom::End(-1))
            .and_then(|_| file.read_exact(&mut last))
            .map_err(|e| GradebookError::io(&self.path, e))?;
        Ok(last[0] != b'\n')
    }
}

impl GradeStore for CsvGradeStore {
    fn append(&mut self, record: &GradeRecord) -> Result<()> {
        self.ensure_parent_dir()?;
        let needs_header = self.needs_header()?;

        // Encode in memory first so the file sees a single complete write.
        let mut bytes = Vec::new();
        if !needs_header && self.lacks_trailing_newline()? {
            bytes.push(b'\n');
        }
        let mut encoder = WriterBuilder::new()
            .has_headers(false)
            .from_writer(bytes);
        if needs_header {
            encoder
                .write_record(HEADER)
                .map_err(|e| GradebookError::csv(&self.path, e))?;
        }
        encoder
            .write_record(record.to_row())
            .map_err(|e| GradebookError::csv(&self.path, e))?;
        let bytes = encoder
            .into_inner()
            .map_err(|e| GradebookError::io(&self.path, e.into_error()))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| GradebookError::io(&self.path, e))?;
        file.write_all(&bytes)
            .map_err(|e| GradebookError::io(&self.path, e))?;

        tracing::debug!(
            "appended {} / {} to {}",
            record.student_name(),
            record.course(),
            self.path.display()
        );
        Ok(())
    }

    fn query(&self, filter: &GradeFilter) -> Result<Vec<GradeRecord>> {
        Ok(self.scan(filter)?.records)
    }
}

impl ScanReport {
    fn skip(&mut self, line: u64, reason: String) {
        tracing::warn!("skipping malformed grade row at line {line}: {reason}");
        self.skipped.push(SkippedRow { line, reason });
    }
}

/// Column positions resolved from the header row. Files written before the
/// level/semester/session columns existed have only the first three in the
/// header, while rows appended since carry all six.
struct Columns {
    student_name: usize,
    course: usize,
    score: usize,
    level: Option<usize>,
    semester: Option<usize>,
    session: Option<usize>,
}

impl Columns {
    fn locate(headers: &StringRecord, path: &Path) -> Result<Self> {
        // Spreadsheet exports often start with a UTF-8 byte order mark.
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
        };
        let require = |name: &str| {
            find(name).ok_or_else(|| GradebookError::MalformedHeader {
                path: path.to_path_buf(),
                missing: name.to_string(),
            })
        };
        let student_name = require("student_name")?;
        let course = require("course")?;
        let score = require("score")?;

        // Legacy header: trailing fields follow the current column order.
        let legacy = headers.len() == 3 && (student_name, course, score) == (0, 1, 2);
        let (level, semester, session) = if legacy {
            (Some(3), Some(4), Some(5))
        } else {
            (find("level"), find("semester"), find("session"))
        };

        Ok(Self {
            student_name,
            course,
            score,
            level,
            semester,
            session,
        })
    }

    fn parse(&self, row: &StringRecord) -> std::result::Result<GradeRecord, String> {
        let field = |idx: usize, name: &str| {
            row.get(idx)
                .ok_or_else(|| format!("missing `{name}` column"))
        };
        let name = field(self.student_name, "student_name")?;
        let course = field(self.course, "course")?;
        let raw_score = field(self.score, "score")?;
        let score: i64 = raw_score
            .trim()
            .parse()
            .map_err(|_| format!("score {raw_score:?} is not an integer"))?;
        let optional = |idx: Option<usize>| idx.and_then(|i| row.get(i)).unwrap_or("");

        GradeRecord::new(name, course, score)
            .map(|record| {
                record
                    .with_level(optional(self.level))
                    .with_semester(optional(self.semester))
                    .with_session(optional(self.session))
            })
            .map_err(|e| e.to_string())
    }
}

/// In-memory store, used by tests and benches.
#[derive(Debug, Clone, Default)]
pub struct MemoryGradeStore {
    records: Vec<GradeRecord>,
}

impl MemoryGradeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<GradeRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl GradeStore for MemoryGradeStore {
    fn append(&mut self, record: &GradeRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn query(&self, filter: &GradeFilter) -> Result<Vec<GradeRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> CsvGradeStore {
        CsvGradeStore::new(dir.path().join("data").join("students.csv"))
    }

    fn add(store: &mut impl GradeStore, name: &str, course: &str, score: i64, session: &str) {
        append_record(store, name, course, score, "100", "1", session).unwrap();
    }

    #[test]
    fn first_append_writes_header_and_creates_dir() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        add(&mut store, "Ada", "MTH101", 72, "2024/2025");
        add(&mut store, "Ada", "PHY101", 55, "2024/2025");

        let content = std::fs::read_to_string(store.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "student_name,course,score,level,semester,session");
        assert_eq!(lines[1], "Ada,MTH101,72,100,1,2024/2025");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn round_trip_in_order_any_case() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        for (course, score) in [("A", 10), ("B", 20), ("C", 30)] {
            add(&mut store, "Grace Hopper", course, score, "2024/2025");
        }
        add(&mut store, "Alan", "A", 99, "2024/2025");

        let records = store.query(&GradeFilter::student("GRACE hopper")).unwrap();
        let courses: Vec<&str> = records.iter().map(|r| r.course()).collect();
        assert_eq!(courses, ["A", "B", "C"]);
        assert_eq!(store.list_all().unwrap().len(), 4);
    }

    #[test]
    fn session_filter_returns_subset() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        add(&mut store, "Ada", "MTH101", 72, "2023/2024");
        add(&mut store, "Ada", "MTH201", 64, "2024/2025");
        add(&mut store, "Ada", "MTH202", 48, "2024/2025");

        let filter = GradeFilter::student("ada").session("2024/2025");
        let scores: Vec<u8> = store
            .query_scores(&filter)
            .unwrap()
            .into_iter()
            .map(Score::value)
            .collect();
        assert_eq!(scores, [64, 48]);
    }

    #[test]
    fn duplicates_are_kept() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        add(&mut store, "Ada", "MTH101", 35, "2024/2025");
        add(&mut store, "Ada", "MTH101", 61, "2024/2025");

        let pairs = store
            .query_courses_and_scores(&GradeFilter::student("Ada"))
            .unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].1.value(), 35);
        assert_eq!(pairs[1].1.value(), 61);
    }

    #[test]
    fn unknown_student_and_missing_file_are_empty() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        assert!(store.list_all().unwrap().is_empty());
        add(&mut store, "Ada", "MTH101", 72, "");
        assert!(store.query(&GradeFilter::student("Bob")).unwrap().is_empty());
    }

    #[test]
    fn rejected_record_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        add(&mut store, "Ada", "MTH101", 72, "");
        let before = std::fs::read(store.path()).unwrap();

        let err = append_record(&mut store, "Ada", "MTH102", 101, "", "", "").unwrap_err();
        assert!(err.is_rejection());
        let err = append_record(&mut store, "", "MTH102", 50, "", "", "").unwrap_err();
        assert!(err.is_rejection());

        assert_eq!(std::fs::read(store.path()).unwrap(), before);
    }

    #[test]
    fn delimiter_in_field_is_quoted() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        add(&mut store, "Lovelace, Ada", "MTH101", 72, "");

        let content = std::fs::read_to_string(store.path()).unwrap();
        assert!(content.contains("\"Lovelace, Ada\",MTH101,72"));
        let records = store
            .query(&GradeFilter::student("lovelace, ada"))
            .unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(
            store.path(),
            "student_name,course,score,level,semester,session\n\
             Ada,MTH101,72,100,1,2024/2025\n\
             Ada,MTH102,seventy,100,1,2024/2025\n\
             Ada,MTH103\n\
             Ada,MTH104,150,100,1,2024/2025\n\
             ,MTH105,50,100,1,2024/2025\n\
             Ada,MTH106,41,100,1,2024/2025\n",
        )
        .unwrap();

        let report = store.scan(&GradeFilter::student("ada")).unwrap();
        let courses: Vec<&str> = report.records.iter().map(|r| r.course()).collect();
        assert_eq!(courses, ["MTH101", "MTH106"]);
        let lines: Vec<u64> = report.skipped.iter().map(|s| s.line).collect();
        assert_eq!(lines, [3, 4, 5, 6]);
    }

    #[test]
    fn legacy_three_column_file_is_readable() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "student_name,course,score\nAda,MTH101,72\n").unwrap();

        add(&mut store, "Ada", "MTH102", 66, "2024/2025");
        let records = store.query(&GradeFilter::student("Ada")).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].level(), "");
        assert_eq!(records[0].session(), "");
        assert_eq!(records[1].score().value(), 66);

        // Six-field rows under the old header keep their tags.
        assert_eq!(records[1].level(), "100");
        assert_eq!(records[1].semester(), "1");
        let in_session = store
            .query(&GradeFilter::student("Ada").session("2024/2025"))
            .unwrap();
        assert_eq!(in_session.len(), 1);
        assert_eq!(in_session[0].course(), "MTH102");
    }

    #[test]
    fn append_after_missing_trailing_newline_keeps_rows_apart() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(
            store.path(),
            "student_name,course,score,level,semester,session\nAda,MTH101,72,100,1,2024/2025",
        )
        .unwrap();

        add(&mut store, "Bob", "PHY101", 55, "2024/2025");
        let records = store.list_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].session(), "2024/2025");
        assert_eq!(records[1].student_name(), "Bob");

        let content = std::fs::read_to_string(store.path()).unwrap();
        assert!(content.ends_with("Bob,PHY101,55,100,1,2024/2025\n"));
        assert!(!content.contains("\n\n"));
    }

    #[test]
    fn header_with_byte_order_mark_is_readable() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(
            store.path(),
            "\u{feff}student_name,course,score,level,semester,session\nAda,MTH101,72,100,1,2024/2025\n",
        )
        .unwrap();

        add(&mut store, "Ada", "MTH102", 66, "2024/2025");
        let report = store.scan(&GradeFilter::student("Ada")).unwrap();
        assert!(report.skipped.is_empty());
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.records[0].course(), "MTH101");
    }

    #[test]
    fn header_without_score_column_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "student_name,course\nAda,MTH101\n").unwrap();

        let err = store.list_all().unwrap_err();
        assert!(matches!(
            err,
            GradebookError::MalformedHeader { ref missing, .. } if missing == "score"
        ));
    }

    #[test]
    fn empty_file_gets_header_on_append() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "").unwrap();
        assert!(store.list_all().unwrap().is_empty());

        add(&mut store, "Ada", "MTH101", 72, "");
        let content = std::fs::read_to_string(store.path()).unwrap();
        assert!(content.starts_with("student_name,course,score"));
    }

    #[test]
    fn unwritable_location_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("data");
        std::fs::write(&blocker, "not a directory").unwrap();
        let mut store = CsvGradeStore::new(blocker.join("students.csv"));

        let err = append_record(&mut store, "Ada", "MTH101", 72, "", "", "").unwrap_err();
        assert!(matches!(err, GradebookError::Io { .. }));
    }

    #[test]
    fn memory_store_matches_file_store_semantics() {
        let mut store = MemoryGradeStore::new();
        add(&mut store, "Ada", "MTH101", 72, "2024/2025");
        add(&mut store, "ADA", "MTH102", 44, "2023/2024");
        assert_eq!(store.len(), 2);
        let filter = GradeFilter::student("ada").session("2023/2024");
        assert_eq!(store.query(&filter).unwrap().len(), 1);
    }
}
