use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{CreateEnrollmentRequest, Enrollment, EnrollmentStatus},
    error::{AppError, Result},
    repository::EnrollmentRepository,
};

#[derive(FromRow)]
struct EnrollmentRow {
    id: String,
    student_id: String,
    course_offering_id: String,
    status: String,
    activated_at: Option<NaiveDateTime>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteEnrollmentRepository {
    pool: SqlitePool,
}

impl SqliteEnrollmentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_enrollment(row: EnrollmentRow) -> Result<Enrollment> {
        Ok(Enrollment {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            student_id: Uuid::parse_str(&row.student_id).map_err(|e| AppError::Database(e.to_string()))?,
            course_offering_id: Uuid::parse_str(&row.course_offering_id)
                .map_err(|e| AppError::Database(e.to_string()))?,
            status: Self::parse_status(&row.status)?,
            activated_at: row.activated_at.map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc)),
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }

    fn parse_status(s: &str) -> Result<EnrollmentStatus> {
        match s {
            "Pending" => Ok(EnrollmentStatus::Pending),
            "Active" => Ok(EnrollmentStatus::Active),
            "Cancelled" => Ok(EnrollmentStatus::Cancelled),
            _ => Err(AppError::Database(format!("Invalid enrollment status: {}", s))),
        }
    }

    fn status_to_str(status: &EnrollmentStatus) -> &'static str {
        match status {
            EnrollmentStatus::Pending => "Pending",
            EnrollmentStatus::Active => "Active",
            EnrollmentStatus::Cancelled => "Cancelled",
        }
    }
}

#[async_trait]
impl EnrollmentRepository for SqliteEnrollmentRepository {
    async fn create(&self, request: CreateEnrollmentRequest) -> Result<Enrollment> {
        let id = Uuid::new_v4();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO enrollments (id, student_id, course_offering_id, status, created_at, updated_at)
            VALUES (?, ?, ?, 'Pending', ?, ?)
            "#
        )
        .bind(id.to_string())
        .bind(request.student_id.to_string())
        .bind(request.course_offering_id.to_string())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created enrollment".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Enrollment>> {
        let row = sqlx::query_as::<_, EnrollmentRow>(
            r#"
            SELECT id, student_id, course_offering_id, status, activated_at, created_at, updated_at
            FROM enrollments
            WHERE id = ?
            "#
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        row.map(Self::row_to_enrollment).transpose()
    }

    async fn transition_status(
        &self,
        id: Uuid,
        from: EnrollmentStatus,
        to: EnrollmentStatus,
    ) -> Result<Option<Enrollment>> {
        let now = Utc::now().naive_utc();
        let activated_at = (to == EnrollmentStatus::Active).then_some(now);

        let row = sqlx::query_as::<_, EnrollmentRow>(
            r#"
            UPDATE enrollments
            SET status = ?,
                activated_at = COALESCE(activated_at, ?),
                updated_at = ?
            WHERE id = ? AND status = ?
            RETURNING id, student_id, course_offering_id, status, activated_at, created_at, updated_at
            "#
        )
        .bind(Self::status_to_str(&to))
        .bind(activated_at)
        .bind(now)
        .bind(id.to_string())
        .bind(Self::status_to_str(&from))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(row) => Self::row_to_enrollment(row).map(Some),
            None if self.find_by_id(id).await?.is_none() => {
                Err(AppError::NotFound("Enrollment not found".to_string()))
            }
            None => Ok(None),
        }
    }
}
