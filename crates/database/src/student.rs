//! Student lookup used to autofill session and appointment forms.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::error::{DatabaseError, Result};
use crate::models::Student;
use crate::search;

/// Default cap on search results.
pub const DEFAULT_SEARCH_LIMIT: i64 = 10;

/// Search students by name.
///
/// Returns students whose first or last name contains any of the query's
/// tokens. An empty query returns nothing.
pub async fn search_students(pool: &SqlitePool, query: &str, limit: i64) -> Result<Vec<Student>> {
    let tokens = search::tokenize(query);
    if tokens.is_empty() {
        return Ok(Vec::new());
    }

    let mut builder = QueryBuilder::<Sqlite>::new(
        r#"
        SELECT s.id, s.first_name, s.last_name, c.level, c.grade, c.section
        FROM students s
        JOIN classrooms c ON c.id = s.classroom_id
        WHERE "#,
    );
    search::push_token_filter(
        &mut builder,
        &tokens,
        &["s.first_name_folded", "s.last_name_folded"],
    );
    builder.push(" ORDER BY s.last_name, s.first_name LIMIT ");
    builder.push_bind(limit);

    tracing::debug!(tokens = tokens.len(), limit, "Searching students");

    let students = builder.build_query_as::<Student>().fetch_all(pool).await?;
    Ok(students)
}

/// Get a student by ID.
pub async fn get_student(pool: &SqlitePool, id: i64) -> Result<Student> {
    sqlx::query_as::<_, Student>(
        r#"
        SELECT s.id, s.first_name, s.last_name, c.level, c.grade, c.section
        FROM students s
        JOIN classrooms c ON c.id = s.classroom_id
        WHERE s.id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Student",
        id: id.to_string(),
    })
}

/// Create a classroom, returning its ID.
pub async fn create_classroom(pool: &SqlitePool, level: &str, grade: &str, section: &str) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO classrooms (level, grade, section)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(level)
    .bind(grade)
    .bind(section)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Create a student in a classroom, returning its ID.
pub async fn create_student(
    pool: &SqlitePool,
    first_name: &str,
    last_name: &str,
    classroom_id: i64,
) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO students (first_name, last_name, first_name_folded, last_name_folded, classroom_id)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(first_name)
    .bind(last_name)
    .bind(search::fold(first_name))
    .bind(search::fold(last_name))
    .bind(classroom_id)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}
