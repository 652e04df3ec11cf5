/// Task model, status lifecycle, and database operations
///
/// Tasks are the core entity of Taskdesk: a unit of work assigned to exactly
/// one user, scoped to one company and one area. The row is the single source
/// of truth, updated in place.
///
/// # Status lifecycle
///
/// ```text
/// in_progress → completed
/// in_progress → pending
/// pending     → in_progress
/// completed   → in_progress   (reopen)
/// ```
///
/// New tasks start at `in_progress`. Jumping straight between `pending` and
/// `completed` in either direction is rejected; work has to pass through
/// `in_progress`. Writing the current status again is a no-op and accepted.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('pending', 'in_progress', 'completed');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     observation TEXT,
///     assigned_to UUID NOT NULL REFERENCES users(id),
///     company_id UUID NOT NULL REFERENCES companies(id),
///     area_id UUID NOT NULL REFERENCES areas(id),
///     due_date TIMESTAMPTZ NOT NULL,
///     status task_status NOT NULL DEFAULT 'in_progress',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskdesk_shared::models::task::{Task, CreateTask, TaskStatus};
/// use taskdesk_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     title: "Close the monthly books".to_string(),
///     observation: None,
///     assigned_to: Uuid::new_v4(),
///     company_id: Uuid::new_v4(),
///     area_id: Uuid::new_v4(),
///     due_date: None, // defaults to creation time + 7 days
/// }).await?;
///
/// assert_eq!(task.status, TaskStatus::InProgress);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Days added to the creation instant when a task is created without an
/// explicit due date.
pub const DEFAULT_DUE_DATE_DAYS: i64 = 7;

/// Task status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Work has been parked; not yet (or no longer) being worked on
    Pending,

    /// Work is underway; the status every new task starts with
    InProgress,

    /// Work is done
    Completed,
}

impl TaskStatus {
    /// The status assigned to newly created tasks
    pub fn initial() -> Self {
        TaskStatus::InProgress
    }

    /// Converts status to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }

    /// Parses status from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(TaskStatus::Pending),
            "in_progress" => Some(TaskStatus::InProgress),
            "completed" => Some(TaskStatus::Completed),
            _ => None,
        }
    }

    /// Checks if transition to target status is valid
    ///
    /// Re-writing the current status is always allowed (treated as a no-op
    /// by callers). `pending` and `completed` are only reachable from
    /// `in_progress`, in both directions.
    pub fn can_transition_to(&self, target: TaskStatus) -> bool {
        if *self == target {
            return true;
        }

        match (self, target) {
            (TaskStatus::Pending, TaskStatus::InProgress) => true,
            (TaskStatus::InProgress, TaskStatus::Pending) => true,
            (TaskStatus::InProgress, TaskStatus::Completed) => true,
            (TaskStatus::Completed, TaskStatus::InProgress) => true,
            _ => false,
        }
    }
}

/// Computes the default due date for a task created at `created_at`
pub fn default_due_date(created_at: DateTime<Utc>) -> DateTime<Utc> {
    created_at + Duration::days(DEFAULT_DUE_DATE_DAYS)
}

/// Task model representing one assigned unit of work
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Short description of the work
    pub title: String,

    /// Free-form notes
    pub observation: Option<String>,

    /// User the task is assigned to
    pub assigned_to: Uuid,

    /// Company the task is scoped to
    pub company_id: Uuid,

    /// Area the task is scoped to
    pub area_id: Uuid,

    /// When the work is due
    pub due_date: DateTime<Utc>,

    /// Current lifecycle status
    pub status: TaskStatus,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Assigned-user fields denormalized into task listings
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AssignedUserSummary {
    #[sqlx(rename = "assigned_user_name")]
    pub name: String,

    #[sqlx(rename = "assigned_user_email")]
    pub email: String,
}

/// Company fields denormalized into task listings
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CompanySummary {
    #[sqlx(rename = "company_name")]
    pub name: String,
}

/// Area fields denormalized into task listings
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AreaSummary {
    #[sqlx(rename = "area_name")]
    pub name: String,

    #[sqlx(rename = "area_department")]
    pub department: Option<String>,
}

/// A task joined with the display fields of its user, company, and area
///
/// This is the shape task listings return: the task's own columns at the top
/// level plus `assigned_user {name, email}`, `company {name}`, and
/// `area {name, department}`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskWithContext {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub task: Task,

    #[sqlx(flatten)]
    pub assigned_user: AssignedUserSummary,

    #[sqlx(flatten)]
    pub company: CompanySummary,

    #[sqlx(flatten)]
    pub area: AreaSummary,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Short description of the work (required)
    pub title: String,

    /// Free-form notes
    pub observation: Option<String>,

    /// User the task is assigned to (required)
    pub assigned_to: Uuid,

    /// Company scope (must reference an existing company)
    pub company_id: Uuid,

    /// Area scope (must reference an existing area)
    pub area_id: Uuid,

    /// Due date; creation time + 7 days when omitted
    pub due_date: Option<DateTime<Utc>>,
}

/// Allow-listed fields for a full task update
///
/// Only these fields can ever be written through the update path; arbitrary
/// request-body keys are dropped at deserialization instead of being spread
/// into the row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTaskFields {
    pub title: Option<String>,
    pub observation: Option<String>,
    pub assigned_to: Option<Uuid>,
    pub company_id: Option<Uuid>,
    pub area_id: Option<Uuid>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: Option<TaskStatus>,
}

impl UpdateTaskFields {
    /// True when the body carried only a status change
    ///
    /// Status-only updates take the narrow update path and are the one kind
    /// of write non-admin users may perform on their own tasks.
    pub fn is_status_only(&self) -> bool {
        self.status.is_some()
            && self.title.is_none()
            && self.observation.is_none()
            && self.assigned_to.is_none()
            && self.company_id.is_none()
            && self.area_id.is_none()
            && self.due_date.is_none()
    }

    /// True when the body carried nothing at all
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.title.is_none()
            && self.observation.is_none()
            && self.assigned_to.is_none()
            && self.company_id.is_none()
            && self.area_id.is_none()
            && self.due_date.is_none()
    }
}

const TASK_COLUMNS: &str = "id, title, observation, assigned_to, company_id, area_id, due_date, status, created_at, updated_at";

const TASK_CONTEXT_SELECT: &str = r#"
SELECT t.id, t.title, t.observation, t.assigned_to, t.company_id, t.area_id,
       t.due_date, t.status, t.created_at, t.updated_at,
       u.name AS assigned_user_name, u.email AS assigned_user_email,
       c.name AS company_name,
       a.name AS area_name, a.department AS area_department
FROM tasks t
JOIN users u ON u.id = t.assigned_to
JOIN companies c ON c.id = t.company_id
JOIN areas a ON a.id = t.area_id
"#;

impl Task {
    /// Creates a new task in the initial status
    ///
    /// When `due_date` is omitted it defaults to the creation instant plus
    /// [`DEFAULT_DUE_DATE_DAYS`] days. The referenced user, company, and area
    /// rows must exist (callers validate them first to produce 404s; the
    /// foreign keys are the backstop).
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let due_date = data
            .due_date
            .unwrap_or_else(|| default_due_date(Utc::now()));

        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (title, observation, assigned_to, company_id, area_id, due_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {TASK_COLUMNS}
            "#,
        ))
        .bind(data.title)
        .bind(data.observation)
        .bind(data.assigned_to)
        .bind(data.company_id)
        .bind(data.area_id)
        .bind(due_date)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID with its joined display context
    pub async fn find_with_context(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<TaskWithContext>, sqlx::Error> {
        let task = sqlx::query_as::<_, TaskWithContext>(&format!(
            "{TASK_CONTEXT_SELECT} WHERE t.id = $1",
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists every task with its display context, soonest due first
    ///
    /// Admin-only view; regular users go through [`Task::list_for_user`].
    pub async fn list_all(pool: &PgPool) -> Result<Vec<TaskWithContext>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, TaskWithContext>(&format!(
            "{TASK_CONTEXT_SELECT} ORDER BY t.due_date ASC",
        ))
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists the tasks assigned to one user, soonest due first
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<TaskWithContext>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, TaskWithContext>(&format!(
            "{TASK_CONTEXT_SELECT} WHERE t.assigned_to = $1 ORDER BY t.due_date ASC",
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Narrow status-only update
    ///
    /// Transition validity is the caller's responsibility (the route handler
    /// checks [`TaskStatus::can_transition_to`] against the current row
    /// before calling this).
    pub async fn set_status(
        pool: &PgPool,
        id: Uuid,
        status: TaskStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {TASK_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Full-field update over the allow-listed columns
    ///
    /// Only non-None fields in `data` are written; `updated_at` is always
    /// refreshed. Returns None if the task doesn't exist.
    pub async fn update_fields(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTaskFields,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build dynamic update query based on which fields are present
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.observation.is_some() {
            bind_count += 1;
            query.push_str(&format!(", observation = ${}", bind_count));
        }
        if data.assigned_to.is_some() {
            bind_count += 1;
            query.push_str(&format!(", assigned_to = ${}", bind_count));
        }
        if data.company_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(", company_id = ${}", bind_count));
        }
        if data.area_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(", area_id = ${}", bind_count));
        }
        if data.due_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", due_date = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {TASK_COLUMNS}"));

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(observation) = data.observation {
            q = q.bind(observation);
        }
        if let Some(assigned_to) = data.assigned_to {
            q = q.bind(assigned_to);
        }
        if let Some(company_id) = data.company_id {
            q = q.bind(company_id);
        }
        if let Some(area_id) = data.area_id {
            q = q.bind(area_id);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes a task
    ///
    /// Tasks have no dependents, so deletion is unguarded. Returns true if
    /// the task was deleted, false if it didn't exist.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_status_as_str() {
        assert_eq!(TaskStatus::Pending.as_str(), "pending");
        assert_eq!(TaskStatus::InProgress.as_str(), "in_progress");
        assert_eq!(TaskStatus::Completed.as_str(), "completed");
    }

    #[test]
    fn test_task_status_from_str() {
        assert_eq!(TaskStatus::from_str("pending"), Some(TaskStatus::Pending));
        assert_eq!(
            TaskStatus::from_str("in_progress"),
            Some(TaskStatus::InProgress)
        );
        assert_eq!(
            TaskStatus::from_str("completed"),
            Some(TaskStatus::Completed)
        );
        assert_eq!(TaskStatus::from_str("done"), None);
    }

    #[test]
    fn test_initial_status() {
        assert_eq!(TaskStatus::initial(), TaskStatus::InProgress);
    }

    #[test]
    fn test_task_status_transitions() {
        // In-progress reaches both alternate states
        assert!(TaskStatus::InProgress.can_transition_to(TaskStatus::Pending));
        assert!(TaskStatus::InProgress.can_transition_to(TaskStatus::Completed));

        // Coming back always goes through in_progress
        assert!(TaskStatus::Pending.can_transition_to(TaskStatus::InProgress));
        assert!(TaskStatus::Completed.can_transition_to(TaskStatus::InProgress));

        // Direct jumps between the alternates are rejected
        assert!(!TaskStatus::Pending.can_transition_to(TaskStatus::Completed));
        assert!(!TaskStatus::Completed.can_transition_to(TaskStatus::Pending));
    }

    #[test]
    fn test_same_status_write_is_allowed() {
        assert!(TaskStatus::Pending.can_transition_to(TaskStatus::Pending));
        assert!(TaskStatus::InProgress.can_transition_to(TaskStatus::InProgress));
        assert!(TaskStatus::Completed.can_transition_to(TaskStatus::Completed));
    }

    #[test]
    fn test_default_due_date_is_seven_days_out() {
        let created = Utc::now();
        let due = default_due_date(created);
        assert_eq!(due - created, Duration::days(7));
    }

    #[test]
    fn test_status_only_detection() {
        let update = UpdateTaskFields {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };
        assert!(update.is_status_only());
        assert!(!update.is_empty());

        let update = UpdateTaskFields {
            status: Some(TaskStatus::Completed),
            title: Some("New title".to_string()),
            ..Default::default()
        };
        assert!(!update.is_status_only());

        assert!(UpdateTaskFields::default().is_empty());
        assert!(!UpdateTaskFields::default().is_status_only());
    }

    #[test]
    fn test_status_serde_uses_snake_case() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        let parsed: TaskStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(parsed, TaskStatus::Completed);
    }
}
