//! Read-only SQLite access to the project register.
//!
//! The register schema is owned by the surrounding application; this crate
//! only reads the three tables the scoring pipeline needs (`risks`,
//! `evaluations`, `suggestions`).

use std::path::Path;

use parking_lot::Mutex;
use rusqlite::{Connection, OpenFlags, OptionalExtension};

use riskwise_core::domain::{EvalSample, Risk, Suggestion};
use riskwise_core::error::{Error, Result};
use riskwise_core::store::DomainStore;

/// SQLite-backed [`DomainStore`].
///
/// `rusqlite::Connection` is `Send` but not `Sync`, so the handle lives
/// behind a mutex; reads are short and the register is small.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open the register read-only.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path.as_ref(),
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(storage_err)?;
        conn.busy_timeout(std::time::Duration::from_millis(5000))
            .map_err(storage_err)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Wrap an already-open connection. Used by tests to seed fixtures.
    #[must_use]
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

fn storage_err(e: rusqlite::Error) -> Error {
    Error::Storage(e.to_string())
}

impl DomainStore for SqliteStore {
    fn risk(&self, id: i64) -> Result<Option<Risk>> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT id, title, category, description FROM risks WHERE id = ?1",
            [id],
            |row| {
                Ok(Risk {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    category: row.get(2)?,
                    description: row.get(3)?,
                })
            },
        )
        .optional()
        .map_err(storage_err)
    }

    fn risks(&self) -> Result<Vec<Risk>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare("SELECT id, title, category, description FROM risks ORDER BY id")
            .map_err(storage_err)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Risk {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    category: row.get(2)?,
                    description: row.get(3)?,
                })
            })
            .map_err(storage_err)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(storage_err)
    }

    fn suggestions(&self) -> Result<Vec<Suggestion>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare("SELECT id, category, text FROM suggestions ORDER BY id")
            .map_err(storage_err)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Suggestion {
                    id: row.get(0)?,
                    category: row.get(1)?,
                    text: row.get(2)?,
                })
            })
            .map_err(storage_err)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(storage_err)
    }

    fn evaluation_samples(&self) -> Result<Vec<EvalSample>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare(
                "SELECT r.category, e.probability, e.severity
                 FROM evaluations e
                 JOIN risks r ON r.id = e.risk_id
                 WHERE e.probability IS NOT NULL AND e.severity IS NOT NULL
                 ORDER BY e.id",
            )
            .map_err(storage_err)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(EvalSample {
                    category: row.get(0)?,
                    probability: row.get::<_, f64>(1)?,
                    severity: row.get::<_, f64>(2)?,
                })
            })
            .map_err(storage_err)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(storage_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> SqliteStore {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE risks (
                 id INTEGER PRIMARY KEY,
                 title TEXT,
                 category TEXT,
                 description TEXT
             );
             CREATE TABLE evaluations (
                 id INTEGER PRIMARY KEY,
                 risk_id INTEGER NOT NULL,
                 probability INTEGER,
                 severity INTEGER
             );
             CREATE TABLE suggestions (
                 id INTEGER PRIMARY KEY,
                 category TEXT,
                 text TEXT NOT NULL
             );
             INSERT INTO risks VALUES
                 (1, 'Beton dökümünde gecikme', 'Beton İşleri', 'Santral sevkiyatı aksıyor'),
                 (2, NULL, 'Mekanik', NULL),
                 (3, 'Kayıtsız risk', NULL, 'Kategorisi yok');
             INSERT INTO evaluations VALUES
                 (1, 1, 4, 5),
                 (2, 1, 4, NULL),
                 (3, 2, 3, 3),
                 (4, 99, 2, 2);
             INSERT INTO suggestions VALUES
                 (1, 'Beton İşleri', 'Kür planını dökümden önce onaylat'),
                 (2, NULL, 'Haftalık saha turu yap');",
        )
        .unwrap();
        SqliteStore::from_connection(conn)
    }

    #[test]
    fn risk_lookup_by_id() {
        let store = seeded();
        let risk = store.risk(1).unwrap().unwrap();
        assert_eq!(risk.title.as_deref(), Some("Beton dökümünde gecikme"));
        assert_eq!(risk.category.as_deref(), Some("Beton İşleri"));
        assert!(store.risk(42).unwrap().is_none());
    }

    #[test]
    fn risks_preserve_null_columns() {
        let store = seeded();
        let risks = store.risks().unwrap();
        assert_eq!(risks.len(), 3);
        assert!(risks[1].title.is_none());
        assert!(risks[2].category.is_none());
    }

    #[test]
    fn samples_require_both_scores_and_join_category() {
        let store = seeded();
        let samples = store.evaluation_samples().unwrap();
        // Half-scored row 2 and orphan row 4 drop out.
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].category.as_deref(), Some("Beton İşleri"));
        assert_eq!(samples[0].probability, 4.0);
        assert_eq!(samples[0].severity, 5.0);
        assert_eq!(samples[1].category.as_deref(), Some("Mekanik"));
    }

    #[test]
    fn suggestions_keep_missing_category() {
        let store = seeded();
        let suggestions = store.suggestions().unwrap();
        assert_eq!(suggestions.len(), 2);
        assert!(suggestions[1].category.is_none());
        assert_eq!(suggestions[1].text, "Haftalık saha turu yap");
    }
}
