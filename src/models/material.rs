// src/models/material.rs

use serde::{Deserialize, Serialize};
use url::Url;
use validator::Validate;

/// Subjects offered, as stored in `category`.
pub const CATEGORIES: [&str; 6] = [
    "matematika",
    "bahasa_indonesia",
    "bahasa_inggris",
    "ipa",
    "ips",
    "ppkn",
];

/// Represents the 'materials' collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Sanitized HTML.
    pub content: String,
    pub images: Vec<String>,
    pub category: String,
    pub grade: String,
    pub author: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for creating a material.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMaterialRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 1000))]
    pub description: String,
    #[validate(length(min = 1, max = 50_000))]
    pub content: String,
    #[serde(default)]
    #[validate(custom(function = validate_image_urls))]
    pub images: Vec<String>,
    #[validate(custom(function = validate_category))]
    pub category: String,
    #[validate(custom(function = crate::models::student::validate_grade))]
    pub grade: String,
    #[validate(length(min = 1, max = 100))]
    pub author: String,
}

/// Optional filters for listing materials, newest first.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MaterialFilter {
    pub grade: Option<String>,
    pub category: Option<String>,
}

pub fn validate_category(category: &str) -> Result<(), validator::ValidationError> {
    if !CATEGORIES.contains(&category) {
        return Err(validator::ValidationError::new("unknown_category"));
    }
    Ok(())
}

fn validate_image_urls(urls: &[String]) -> Result<(), validator::ValidationError> {
    for url in urls {
        if url.len() > 500 {
            return Err(validator::ValidationError::new("url_too_long"));
        }
        if Url::parse(url).is_err() {
            return Err(validator::ValidationError::new("invalid_url"));
        }
    }
    Ok(())
}
