//! # Category Commands

use serde::Serialize;

use crate::error::ApiError;
use cafe_client::CategoryService;
use cafe_core::Category;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub id: String,
    pub name: String,
}

impl From<Category> for CategoryDto {
    fn from(c: Category) -> Self {
        CategoryDto {
            id: c.id,
            name: c.name,
        }
    }
}

/// Categories for the product form's picker.
pub async fn list_categories(categories: &CategoryService) -> Result<Vec<CategoryDto>, ApiError> {
    let all = categories.load_categories().await?;
    Ok(all.into_iter().map(CategoryDto::from).collect())
}
