//! Database repository for courses.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::courses::{CourseCreateDBRequest, CourseDBResponse, CourseUpdateDBRequest},
};
use crate::types::{CourseId, UserId, abbrev_uuid};
use sqlx::{Connection, PgConnection};
use tracing::instrument;
use uuid::Uuid;

const COURSE_COLUMNS: &str = "id, title, description, content, instructor_id, created_at, updated_at";

/// Filter for listing courses
#[derive(Debug, Clone, Default)]
pub struct CourseFilter {
    /// Only courses authored by this instructor
    pub instructor_id: Option<UserId>,
}

impl CourseFilter {
    pub fn by_instructor(instructor_id: UserId) -> Self {
        Self {
            instructor_id: Some(instructor_id),
        }
    }
}

pub struct Courses<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Courses<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Titles of every course in the catalogue, oldest first.
    #[instrument(skip(self), err)]
    pub async fn list_titles(&mut self) -> Result<Vec<String>> {
        let titles = sqlx::query_scalar::<_, String>("SELECT title FROM courses ORDER BY created_at ASC, id ASC")
            .fetch_all(&mut *self.db)
            .await?;

        Ok(titles)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Courses<'c> {
    type CreateRequest = CourseCreateDBRequest;
    type UpdateRequest = CourseUpdateDBRequest;
    type Response = CourseDBResponse;
    type Id = CourseId;
    type Filter = CourseFilter;

    #[instrument(skip(self, request), fields(instructor_id = %abbrev_uuid(&request.instructor_id)), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let course = sqlx::query_as::<_, CourseDBResponse>(&format!(
            "INSERT INTO courses (id, title, description, content, instructor_id) VALUES ($1, $2, $3, $4, $5) RETURNING {COURSE_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&request.title)
        .bind(&request.description)
        .bind(&request.content)
        .bind(request.instructor_id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(course)
    }

    #[instrument(skip(self), fields(course_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let course = sqlx::query_as::<_, CourseDBResponse>(&format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"))
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(course)
    }

    #[instrument(skip(self, filter), fields(by_instructor = filter.instructor_id.is_some()), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let courses = sqlx::query_as::<_, CourseDBResponse>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE ($1::uuid IS NULL OR instructor_id = $1) ORDER BY created_at DESC, id DESC"
        ))
        .bind(filter.instructor_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(courses)
    }

    /// Delete a course together with every enrollment that references it.
    #[instrument(skip(self), fields(course_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let mut tx = self.db.begin().await?;

        sqlx::query("DELETE FROM enrollments WHERE course_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(course_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let course = sqlx::query_as::<_, CourseDBResponse>(&format!(
            r#"
            UPDATE courses SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                content = COALESCE($4, content),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {COURSE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(&request.content)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(course)
    }
}
