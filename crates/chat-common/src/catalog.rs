/// Read-only access to the course catalog.
///
/// The chatbot only reads two things: the category list and the published courses with
/// their enrollment counts. `CatalogSource` is the seam the server depends on; `PgCatalog`
/// is the Postgres implementation. Schema consumed:
/// - categories(id, name, description)
/// - courses(id, course_name, price, category_id, status)
/// - course_enrollments(course_id, user_id)
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

use crate::error::CommonError;

const PUBLISHED_STATUS: &str = "Published";

/// A course category. Only `name` feeds the knowledge summary.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// A published course as seen by the chatbot.
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    pub name: Option<String>,
    pub price: Option<f64>,
    /// Name of the owning category, if the course has one.
    pub category: Option<String>,
    /// Number of enrollment records; `None` is treated as zero.
    pub enrollment_count: Option<i64>,
}

#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// All categories, in storage order.
    async fn categories(&self) -> Result<Vec<Category>, CommonError>;

    /// All published courses, in storage order.
    async fn published_courses(&self) -> Result<Vec<Course>, CommonError>;
}

#[derive(Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, CommonError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl CatalogSource for PgCatalog {
    async fn categories(&self) -> Result<Vec<Category>, CommonError> {
        let rows = sqlx::query("SELECT name, description FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| -> Result<Category, CommonError> {
                Ok(Category {
                    name: row.try_get("name")?,
                    description: row.try_get("description")?,
                })
            })
            .collect()
    }

    async fn published_courses(&self) -> Result<Vec<Course>, CommonError> {
        let rows = sqlx::query(
            "SELECT c.course_name,
                    c.price::float8 AS price,
                    cat.name AS category_name,
                    COUNT(e.user_id) AS enrollment_count
             FROM courses c
             LEFT JOIN categories cat ON cat.id = c.category_id
             LEFT JOIN course_enrollments e ON e.course_id = c.id
             WHERE c.status = $1
             GROUP BY c.id, cat.name
             ORDER BY c.id",
        )
        .bind(PUBLISHED_STATUS)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<Course, CommonError> {
                Ok(Course {
                    name: row.try_get("course_name")?,
                    price: row.try_get("price")?,
                    category: row.try_get("category_name")?,
                    enrollment_count: row.try_get("enrollment_count")?,
                })
            })
            .collect()
    }
}
