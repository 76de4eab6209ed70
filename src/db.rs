use std::path::Path;

use anyhow::Result;
use rusqlite::Connection;

use crate::model::Schedule;

pub const DEFAULT_DB_PATH: &str = "data/syllabus.sqlite";

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS courses (
            id         INTEGER PRIMARY KEY,
            position   INTEGER NOT NULL,
            title      TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS sessions (
            id         INTEGER PRIMARY KEY,
            course_id  INTEGER NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
            position   INTEGER NOT NULL,
            date       TEXT,
            idx        TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_sessions_course ON sessions(course_id);

        CREATE TABLE IF NOT EXISTS topics (
            id         INTEGER PRIMARY KEY,
            session_id INTEGER NOT NULL REFERENCES sessions(id) ON DELETE CASCADE,
            position   INTEGER NOT NULL,
            title      TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_topics_session ON topics(session_id);

        CREATE TABLE IF NOT EXISTS resources (
            id         INTEGER PRIMARY KEY,
            topic_id   INTEGER NOT NULL REFERENCES topics(id) ON DELETE CASCADE,
            position   INTEGER NOT NULL,
            kind       TEXT NOT NULL CHECK(kind IN ('DOCUMENT','LECTURE','HANDWRITTEN_SOLUTION','UNKNOWN')),
            label      TEXT NOT NULL,
            url        TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_resources_topic ON resources(topic_id);
        CREATE INDEX IF NOT EXISTS idx_resources_kind ON resources(kind);

        CREATE TABLE IF NOT EXISTS sheet_errors (
            id         INTEGER PRIMARY KEY,
            sheet      TEXT NOT NULL,
            kind       TEXT NOT NULL,
            severity   TEXT NOT NULL CHECK(severity IN ('ERROR','WARNING')),
            row_no     INTEGER,
            col_no     INTEGER,
            detail     TEXT NOT NULL
        );
        ",
    )?;
    Ok(())
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SaveCounts {
    pub courses: usize,
    pub sessions: usize,
    pub topics: usize,
    pub resources: usize,
    pub errors: usize,
}

/// Replace the stored schedule with `schedule`, in one transaction.
pub fn save_schedule(conn: &Connection, schedule: &Schedule) -> Result<SaveCounts> {
    let tx = conn.unchecked_transaction()?;
    let mut counts = SaveCounts::default();
    tx.execute_batch("DELETE FROM courses; DELETE FROM sheet_errors;")?;
    {
        let mut c_stmt = tx.prepare("INSERT INTO courses (position, title) VALUES (?1, ?2)")?;
        let mut s_stmt = tx.prepare(
            "INSERT INTO sessions (course_id, position, date, idx) VALUES (?1, ?2, ?3, ?4)",
        )?;
        let mut t_stmt =
            tx.prepare("INSERT INTO topics (session_id, position, title) VALUES (?1, ?2, ?3)")?;
        let mut r_stmt = tx.prepare(
            "INSERT INTO resources (topic_id, position, kind, label, url)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;

        for (ci, course) in schedule.courses.iter().enumerate() {
            c_stmt.execute(rusqlite::params![ci as i64, course.title])?;
            let course_id = tx.last_insert_rowid();
            counts.courses += 1;

            for (si, session) in course.sessions.iter().enumerate() {
                s_stmt.execute(rusqlite::params![course_id, si as i64, session.date, session.index])?;
                let session_id = tx.last_insert_rowid();
                counts.sessions += 1;

                for (ti, topic) in session.topics.iter().enumerate() {
                    t_stmt.execute(rusqlite::params![session_id, ti as i64, topic.title])?;
                    let topic_id = tx.last_insert_rowid();
                    counts.topics += 1;

                    for (ri, r) in topic.resources.iter().enumerate() {
                        r_stmt.execute(rusqlite::params![
                            topic_id, ri as i64, r.kind.as_str(), r.label, r.url,
                        ])?;
                        counts.resources += 1;
                    }
                }
            }
        }

        let mut e_stmt = tx.prepare(
            "INSERT INTO sheet_errors (sheet, kind, severity, row_no, col_no, detail)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        for e in &schedule.errors {
            e_stmt.execute(rusqlite::params![
                e.sheet,
                e.kind.as_str(),
                e.severity.as_str(),
                e.row.map(|r| r as i64),
                e.column.map(|c| c as i64),
                e.detail,
            ])?;
            counts.errors += 1;
        }
    }
    tx.commit()?;
    Ok(counts)
}

/// Resource totals per kind, for the `stats` view.
pub fn resource_kind_counts(conn: &Connection) -> Result<Vec<(String, i64)>> {
    let mut stmt =
        conn.prepare("SELECT kind, COUNT(*) FROM resources GROUP BY kind ORDER BY kind")?;
    let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid;
    use crate::parser::build_schedule;

    fn saved(dir: &tempfile::TempDir) -> (Connection, SaveCounts) {
        let conn = connect(&dir.path().join("nested/syllabus.sqlite")).unwrap();
        init_schema(&conn).unwrap();
        let wb = grid::load_workbook("tests/fixtures/calculus_grid.json").unwrap();
        let counts = save_schedule(&conn, &build_schedule(&wb)).unwrap();
        (conn, counts)
    }

    #[test]
    fn saves_whole_tree() {
        let dir = tempfile::tempdir().unwrap();
        let (conn, counts) = saved(&dir);
        assert_eq!(counts.courses, 2);
        assert_eq!(counts.sessions, 4);
        assert_eq!(counts.errors, 0);

        let titles: Vec<String> = conn
            .prepare("SELECT title FROM courses ORDER BY position")
            .unwrap()
            .query_map([], |r| r.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(titles, ["Giải tích 1", "Đại số tuyến tính"]);

        let null_urls: i64 = conn
            .query_row("SELECT COUNT(*) FROM resources WHERE url IS NULL", [], |r| r.get(0))
            .unwrap();
        assert_eq!(null_urls, 1);
    }

    #[test]
    fn saving_twice_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let (conn, first) = saved(&dir);
        let wb = grid::load_workbook("tests/fixtures/calculus_grid.json").unwrap();
        let second = save_schedule(&conn, &build_schedule(&wb)).unwrap();
        assert_eq!(first, second);
        let n: i64 = conn
            .query_row("SELECT COUNT(*) FROM sessions", [], |r| r.get(0))
            .unwrap();
        assert_eq!(n as usize, second.sessions);
    }

    #[test]
    fn kind_counts() {
        let dir = tempfile::tempdir().unwrap();
        let (conn, counts) = saved(&dir);
        let by_kind = resource_kind_counts(&conn).unwrap();
        let total: i64 = by_kind.iter().map(|(_, n)| n).sum();
        assert_eq!(total as usize, counts.resources);
        assert!(by_kind.iter().any(|(k, _)| k == "DOCUMENT"));
    }
}
