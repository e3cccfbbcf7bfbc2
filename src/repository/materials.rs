// src/repository/materials.rs

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite};

use super::{RepoError, RepoResult, Repository, RowParser, format_ts, new_id};
use crate::models::material::{CreateMaterialRequest, Material, MaterialFilter};

#[derive(sqlx::FromRow)]
struct MaterialRow {
    id: String,
    title: String,
    description: String,
    content: String,
    images: String,
    category: String,
    grade: String,
    author: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<MaterialRow> for Material {
    type Error = RepoError;

    fn try_from(row: MaterialRow) -> RepoResult<Self> {
        let p = RowParser::new("materials", &row.id);
        Ok(Material {
            images: p.json("images", &row.images)?,
            created_at: p.timestamp("created_at", &row.created_at)?,
            updated_at: p.timestamp("updated_at", &row.updated_at)?,
            id: row.id,
            title: row.title,
            description: row.description,
            content: row.content,
            category: row.category,
            grade: row.grade,
            author: row.author,
        })
    }
}

const MATERIAL_COLUMNS: &str = "SELECT id, title, description, content, images, category, \
     grade, author, created_at, updated_at FROM materials";

impl Repository {
    /// Stores a material as given; callers sanitize `content` beforehand.
    pub async fn create_material(&self, data: &CreateMaterialRequest) -> RepoResult<String> {
        let id = new_id();
        let now = format_ts(Utc::now());
        let images = serde_json::to_string(&data.images).map_err(|e| RepoError::Malformed {
            collection: "materials",
            id: id.clone(),
            reason: format!("images: {}", e),
        })?;

        sqlx::query(
            r#"
            INSERT INTO materials
            (id, title, description, content, images, category, grade, author, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(&data.content)
        .bind(images)
        .bind(&data.category)
        .bind(&data.grade)
        .bind(&data.author)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    pub async fn get_material(&self, id: &str) -> RepoResult<Option<Material>> {
        let row: Option<MaterialRow> = sqlx::query_as(&format!("{} WHERE id = ?", MATERIAL_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Material::try_from).transpose()
    }

    /// Newest first.
    pub async fn list_materials(&self, filter: &MaterialFilter) -> RepoResult<Vec<Material>> {
        let mut qb = QueryBuilder::<Sqlite>::new(MATERIAL_COLUMNS);
        qb.push(" WHERE 1 = 1");
        if let Some(grade) = &filter.grade {
            qb.push(" AND grade = ").push_bind(grade);
        }
        if let Some(category) = &filter.category {
            qb.push(" AND category = ").push_bind(category);
        }
        qb.push(" ORDER BY created_at DESC");

        let rows: Vec<MaterialRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        rows.into_iter().map(Material::try_from).collect()
    }

    pub async fn count_materials(&self) -> RepoResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM materials")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
