mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::Utc;
use rusqlite::{Connection, Row};
use uuid::Uuid;

use crate::models::*;

const FEATURE_COLUMNS: &str = "id, project_id, name, created_at, updated_at";
const TASK_COLUMNS: &str = "id, project_id, feature_id, title, created_at, updated_at";

#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Self::from_connection(conn)
    }

    pub fn open_default() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "feature-tags")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Self::open(dirs.data_dir().join("features.db"))
    }

    pub fn open_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        // Task detachment relies on ON DELETE SET NULL.
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }

    // ============================================================
    // Project operations
    // ============================================================

    pub fn get_all_projects(&self) -> Result<Vec<Project>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, name, created_at, updated_at FROM projects ORDER BY name",
        )?;

        let projects = stmt
            .query_map([], project_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(projects)
    }

    pub fn get_project(&self, id: Uuid) -> Result<Option<Project>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt =
            conn.prepare("SELECT id, name, created_at, updated_at FROM projects WHERE id = ?")?;

        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(project_from_row(row)?)),
            None => Ok(None),
        }
    }

    pub fn create_project(&self, input: CreateProject) -> Result<Project> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO projects (id, name, created_at, updated_at) VALUES (?, ?, ?, ?)",
            (id.to_string(), &input.name, now.to_rfc3339(), now.to_rfc3339()),
        )?;

        Ok(Project {
            id,
            name: input.name,
            created_at: now,
            updated_at: now,
        })
    }

    // ============================================================
    // Feature operations
    // ============================================================

    /// Features of a project, ordered by name.
    pub fn get_features_by_project(&self, project_id: Uuid) -> Result<Vec<Feature>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!(
            "SELECT {FEATURE_COLUMNS} FROM features WHERE project_id = ? ORDER BY name ASC"
        ))?;

        let features = stmt
            .query_map([project_id.to_string()], feature_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(features)
    }

    pub fn get_feature(&self, id: Uuid) -> Result<Option<Feature>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!(
            "SELECT {FEATURE_COLUMNS} FROM features WHERE id = ?"
        ))?;

        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(feature_from_row(row)?)),
            None => Ok(None),
        }
    }

    pub fn create_feature(&self, input: CreateFeature) -> Result<Feature> {
        self.get_project(input.project_id)?
            .ok_or_else(|| anyhow::anyhow!("Project not found"))?;

        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO features (id, project_id, name, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
            (
                id.to_string(),
                input.project_id.to_string(),
                &input.name,
                now.to_rfc3339(),
                now.to_rfc3339(),
            ),
        )?;

        Ok(Feature {
            id,
            project_id: input.project_id,
            name: input.name,
            created_at: now,
            updated_at: now,
        })
    }

    /// Partially update a feature. Returns `None` when it does not exist.
    pub fn update_feature(&self, id: Uuid, input: UpdateFeature) -> Result<Option<Feature>> {
        let Some(existing) = self.get_feature(id)? else {
            return Ok(None);
        };

        let conn = self.conn.lock().expect("database lock poisoned");
        let now = Utc::now();
        let name = input.name.unwrap_or(existing.name);

        conn.execute(
            "UPDATE features SET name = ?, updated_at = ? WHERE id = ?",
            (&name, now.to_rfc3339(), id.to_string()),
        )?;

        Ok(Some(Feature {
            id,
            project_id: existing.project_id,
            name,
            created_at: existing.created_at,
            updated_at: now,
        }))
    }

    /// Delete a feature. Tasks that referenced it are detached, not deleted.
    pub fn delete_feature(&self, id: Uuid) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute("DELETE FROM features WHERE id = ?", [id.to_string()])?;
        Ok(rows > 0)
    }

    // ============================================================
    // Task operations
    // ============================================================

    pub fn create_task(&self, project_id: Uuid, input: CreateTask) -> Result<Task> {
        self.get_project(project_id)?
            .ok_or_else(|| anyhow::anyhow!("Project not found"))?;
        if let Some(feature_id) = input.feature_id {
            self.ensure_feature_in_project(feature_id, project_id)?;
        }

        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO tasks (id, project_id, feature_id, title, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            (
                id.to_string(),
                project_id.to_string(),
                input.feature_id.map(|u| u.to_string()),
                &input.title,
                now.to_rfc3339(),
                now.to_rfc3339(),
            ),
        )?;

        Ok(Task {
            id,
            project_id,
            feature_id: input.feature_id,
            title: input.title,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn get_task(&self, id: Uuid) -> Result<Option<Task>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt =
            conn.prepare(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?"))?;

        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(task_from_row(row)?)),
            None => Ok(None),
        }
    }

    pub fn get_tasks_by_project(&self, project_id: Uuid) -> Result<Vec<Task>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE project_id = ? ORDER BY created_at, title"
        ))?;

        let tasks = stmt
            .query_map([project_id.to_string()], task_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(tasks)
    }

    /// Partially update a task. Returns `None` when it does not exist.
    pub fn update_task(&self, id: Uuid, input: UpdateTask) -> Result<Option<Task>> {
        let Some(existing) = self.get_task(id)? else {
            return Ok(None);
        };

        let feature_id = if input.clear_feature {
            None
        } else {
            input.feature_id.or(existing.feature_id)
        };
        if let Some(feature_id) = input.feature_id.filter(|_| !input.clear_feature) {
            self.ensure_feature_in_project(feature_id, existing.project_id)?;
        }

        let conn = self.conn.lock().expect("database lock poisoned");
        let now = Utc::now();
        let title = input.title.unwrap_or(existing.title);

        conn.execute(
            "UPDATE tasks SET title = ?, feature_id = ?, updated_at = ? WHERE id = ?",
            (
                &title,
                feature_id.map(|u| u.to_string()),
                now.to_rfc3339(),
                id.to_string(),
            ),
        )?;

        Ok(Some(Task {
            id,
            project_id: existing.project_id,
            feature_id,
            title,
            created_at: existing.created_at,
            updated_at: now,
        }))
    }

    fn ensure_feature_in_project(&self, feature_id: Uuid, project_id: Uuid) -> Result<()> {
        match self.get_feature(feature_id)? {
            Some(feature) if feature.project_id == project_id => Ok(()),
            Some(_) => Err(anyhow::anyhow!("Feature belongs to a different project")),
            None => Err(anyhow::anyhow!("Feature not found")),
        }
    }
}

fn project_from_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: parse_uuid(row.get::<_, String>(0)?),
        name: row.get(1)?,
        created_at: parse_datetime(row.get::<_, String>(2)?),
        updated_at: parse_datetime(row.get::<_, String>(3)?),
    })
}

fn feature_from_row(row: &Row<'_>) -> rusqlite::Result<Feature> {
    Ok(Feature {
        id: parse_uuid(row.get::<_, String>(0)?),
        project_id: parse_uuid(row.get::<_, String>(1)?),
        name: row.get(2)?,
        created_at: parse_datetime(row.get::<_, String>(3)?),
        updated_at: parse_datetime(row.get::<_, String>(4)?),
    })
}

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: parse_uuid(row.get::<_, String>(0)?),
        project_id: parse_uuid(row.get::<_, String>(1)?),
        feature_id: row.get::<_, Option<String>>(2)?.map(parse_uuid),
        title: row.get(3)?,
        created_at: parse_datetime(row.get::<_, String>(4)?),
        updated_at: parse_datetime(row.get::<_, String>(5)?),
    })
}

fn parse_uuid(s: String) -> Uuid {
    Uuid::parse_str(&s).unwrap_or_else(|_| Uuid::nil())
}

fn parse_datetime(s: String) -> chrono::DateTime<Utc> {
    chrono::DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
