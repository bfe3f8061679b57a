//! JSON-document CRUD over SQLite.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::info;

use crate::schema::SCHEMA_SQL;
use pharmscope_core::{Error, PatientFlowFunnel, Result, StatusCheck, TherapyAreaAnalysis};

/// Document store holding the two analysis collections plus status checks.
pub struct DocumentStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl DocumentStore {
    /// Open or create the store.
    ///
    /// `db_dir` is the directory (e.g., `data/db/`). The file will be
    /// `db_dir/pharmscope.db`.
    pub fn open(db_dir: impl AsRef<Path>) -> Result<Self> {
        let db_dir = db_dir.as_ref();
        std::fs::create_dir_all(db_dir).map_err(|e| Error::Storage(e.to_string()))?;
        let db_path = db_dir.join("pharmscope.db");

        let conn = Connection::open(&db_path).map_err(|e| Error::Database(e.to_string()))?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(|e| Error::Database(e.to_string()))?;
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| Error::Database(format!("Schema init failed: {}", e)))?;

        let store = Self {
            conn: Mutex::new(conn),
            db_path,
        };

        let analyses = store.count_analyses()?;
        info!(
            "DocumentStore initialized: {} analyses, path={}",
            analyses,
            store.db_path.display()
        );

        Ok(store)
    }

    // ---------------------------------------------------------------
    // Status checks
    // ---------------------------------------------------------------

    pub fn insert_status_check(&self, check: &StatusCheck) -> Result<()> {
        let conn = self.conn.lock();
        conn.prepare_cached(
            "INSERT INTO status_checks (id, client_name, timestamp) VALUES (?1, ?2, ?3)",
        )
        .map_err(|e| Error::Database(e.to_string()))?
        .execute(params![
            check.id,
            check.client_name,
            check.timestamp.to_rfc3339()
        ])
        .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }

    pub fn list_status_checks(&self, limit: usize) -> Result<Vec<StatusCheck>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "SELECT id, client_name, timestamp FROM status_checks
                 ORDER BY timestamp ASC LIMIT ?1",
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map(params![limit as i64], |row| {
                let id: String = row.get(0)?;
                let client_name: String = row.get(1)?;
                let timestamp: String = row.get(2)?;
                Ok((id, client_name, timestamp))
            })
            .map_err(|e| Error::Database(e.to_string()))?;

        let mut checks = Vec::new();
        for row in rows {
            let (id, client_name, timestamp) = row.map_err(|e| Error::Database(e.to_string()))?;
            let timestamp = timestamp
                .parse::<DateTime<Utc>>()
                .map_err(|e| Error::Database(format!("Bad timestamp: {}", e)))?;
            checks.push(StatusCheck {
                id,
                client_name,
                timestamp,
            });
        }
        Ok(checks)
    }

    // ---------------------------------------------------------------
    // Therapy analyses
    // ---------------------------------------------------------------

    pub fn insert_analysis(&self, analysis: &TherapyAreaAnalysis) -> Result<()> {
        let doc = serde_json::to_string(analysis)?;
        let conn = self.conn.lock();
        conn.prepare_cached(
            "INSERT INTO therapy_analyses (id, doc, created_at) VALUES (?1, ?2, ?3)",
        )
        .map_err(|e| Error::Database(e.to_string()))?
        .execute(params![
            analysis.id,
            doc,
            analysis.created_at.timestamp_millis()
        ])
        .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }

    pub fn get_analysis(&self, id: &str) -> Result<Option<TherapyAreaAnalysis>> {
        let conn = self.conn.lock();
        let doc: Option<String> = conn
            .prepare_cached("SELECT doc FROM therapy_analyses WHERE id = ?1")
            .map_err(|e| Error::Database(e.to_string()))?
            .query_row(params![id], |row| row.get(0))
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;
        match doc {
            Some(doc) => Ok(Some(serde_json::from_str(&doc)?)),
            None => Ok(None),
        }
    }

    /// Replace a stored analysis document. Last write wins.
    pub fn replace_analysis(&self, analysis: &TherapyAreaAnalysis) -> Result<()> {
        let doc = serde_json::to_string(analysis)?;
        let conn = self.conn.lock();
        let updated = conn
            .prepare_cached("UPDATE therapy_analyses SET doc = ?2 WHERE id = ?1")
            .map_err(|e| Error::Database(e.to_string()))?
            .execute(params![analysis.id, doc])
            .map_err(|e| Error::Database(e.to_string()))?;
        if updated == 0 {
            return Err(Error::NotFound(format!("analysis {}", analysis.id)));
        }
        Ok(())
    }

    /// List analyses, most recently created first.
    pub fn list_analyses(&self, limit: usize) -> Result<Vec<TherapyAreaAnalysis>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "SELECT doc FROM therapy_analyses ORDER BY created_at DESC LIMIT ?1",
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map(params![limit as i64], |row| row.get::<_, String>(0))
            .map_err(|e| Error::Database(e.to_string()))?;

        let mut analyses = Vec::new();
        for row in rows {
            let doc = row.map_err(|e| Error::Database(e.to_string()))?;
            analyses.push(serde_json::from_str(&doc)?);
        }
        Ok(analyses)
    }

    fn count_analyses(&self) -> Result<i64> {
        let conn = self.conn.lock();
        conn.query_row("SELECT COUNT(*) FROM therapy_analyses", [], |row| {
            row.get(0)
        })
        .map_err(|e| Error::Database(e.to_string()))
    }

    // ---------------------------------------------------------------
    // Patient-flow funnels
    // ---------------------------------------------------------------

    pub fn insert_funnel(&self, funnel: &PatientFlowFunnel) -> Result<()> {
        let doc = serde_json::to_string(funnel)?;
        let conn = self.conn.lock();
        conn.prepare_cached(
            "INSERT INTO patient_flow_funnels (id, analysis_id, doc, created_at)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .map_err(|e| Error::Database(e.to_string()))?
        .execute(params![
            funnel.id,
            funnel.analysis_id,
            doc,
            funnel.created_at.timestamp_millis()
        ])
        .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }

    /// Find the funnel referencing the given analysis id.
    pub fn funnel_for_analysis(&self, analysis_id: &str) -> Result<Option<PatientFlowFunnel>> {
        let conn = self.conn.lock();
        let doc: Option<String> = conn
            .prepare_cached(
                "SELECT doc FROM patient_flow_funnels WHERE analysis_id = ?1
                 ORDER BY created_at DESC LIMIT 1",
            )
            .map_err(|e| Error::Database(e.to_string()))?
            .query_row(params![analysis_id], |row| row.get(0))
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;
        match doc {
            Some(doc) => Ok(Some(serde_json::from_str(&doc)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn open_store() -> (tempfile::TempDir, DocumentStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn status_check_round_trip() {
        let (_dir, store) = open_store();
        let check = StatusCheck::new("client-a");
        store.insert_status_check(&check).unwrap();

        let listed = store.list_status_checks(1000).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, check.id);
        assert_eq!(listed[0].client_name, "client-a");
    }

    #[test]
    fn analysis_round_trip_preserves_document() {
        let (_dir, store) = open_store();
        let mut analysis = TherapyAreaAnalysis::new("psoriasis", Some("topicalX".into()));
        analysis.disease_summary = "Chronic inflammatory skin disease.".into();
        store.insert_analysis(&analysis).unwrap();

        let loaded = store.get_analysis(&analysis.id).unwrap().unwrap();
        assert_eq!(loaded.id, analysis.id);
        assert_eq!(loaded.therapy_area, "psoriasis");
        assert_eq!(loaded.disease_summary, analysis.disease_summary);
        assert_eq!(loaded.product_name.as_deref(), Some("topicalX"));
    }

    #[test]
    fn missing_analysis_is_none() {
        let (_dir, store) = open_store();
        assert!(store.get_analysis("no-such-id").unwrap().is_none());
    }

    #[test]
    fn replace_missing_analysis_is_not_found() {
        let (_dir, store) = open_store();
        let analysis = TherapyAreaAnalysis::new("gout", None);
        assert!(matches!(
            store.replace_analysis(&analysis),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn replace_updates_document_in_place() {
        let (_dir, store) = open_store();
        let mut analysis = TherapyAreaAnalysis::new("asthma", None);
        store.insert_analysis(&analysis).unwrap();

        analysis.biomarkers = "FeNO, blood eosinophils".into();
        analysis.touch();
        store.replace_analysis(&analysis).unwrap();

        let loaded = store.get_analysis(&analysis.id).unwrap().unwrap();
        assert_eq!(loaded.biomarkers, "FeNO, blood eosinophils");
        assert!(loaded.updated_at >= loaded.created_at);
    }

    #[test]
    fn list_analyses_newest_first_with_limit() {
        let (_dir, store) = open_store();
        let base = Utc::now();
        for i in 0..4 {
            let mut analysis = TherapyAreaAnalysis::new(format!("area-{}", i), None);
            analysis.created_at = base + Duration::seconds(i);
            analysis.updated_at = analysis.created_at;
            store.insert_analysis(&analysis).unwrap();
        }

        let listed = store.list_analyses(3).unwrap();
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].therapy_area, "area-3");
        assert_eq!(listed[2].therapy_area, "area-1");
    }

    #[test]
    fn funnel_lookup_by_analysis_id() {
        let (_dir, store) = open_store();
        let analysis = TherapyAreaAnalysis::new("melanoma", None);
        store.insert_analysis(&analysis).unwrap();

        let mut funnel = PatientFlowFunnel::new("melanoma", analysis.id.clone());
        funnel.total_addressable_population = "~100k incident cases".into();
        store.insert_funnel(&funnel).unwrap();

        let loaded = store.funnel_for_analysis(&analysis.id).unwrap().unwrap();
        assert_eq!(loaded.id, funnel.id);
        assert_eq!(loaded.analysis_id, analysis.id);

        assert!(store.funnel_for_analysis("other").unwrap().is_none());
    }
}
