//! Collection of multipart form fields into typed upload structs.
//!
//! Unknown fields are ignored; file fields carry the client's declared
//! content type, which the asset store validates before anything is written.

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use uuid::Uuid;

use service::errors::FieldErrors;
use service::storage::UploadedFile;

use crate::errors::ApiError;

#[derive(Default)]
pub struct CategoryForm {
    pub name: Option<String>,
    pub icon: Option<UploadedFile>,
}

#[derive(Default)]
pub struct ShopForm {
    pub name: Option<String>,
    pub category_id: Option<String>,
    pub description: Option<String>,
    pub image: Option<UploadedFile>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

#[derive(Default)]
pub struct BannerForm {
    pub title: Option<String>,
    pub image: Option<UploadedFile>,
}

fn bad_form(e: MultipartError) -> ApiError {
    let mut errs = FieldErrors::new();
    errs.push("form", e.to_string());
    ApiError::Validation(errs)
}

async fn read_file(field: Field<'_>) -> Result<UploadedFile, ApiError> {
    let filename = field.file_name().unwrap_or("upload").to_string();
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    let bytes = field.bytes().await.map_err(bad_form)?;
    Ok(UploadedFile { filename, content_type, bytes: bytes.to_vec() })
}

/// Parse an optional uuid form field; a malformed value is a field error,
/// absence is `None`.
pub fn parse_uuid_field(value: Option<&str>, field: &str) -> Result<Option<Uuid>, ApiError> {
    match value {
        None => Ok(None),
        Some(s) => Uuid::parse_str(s.trim()).map(Some).map_err(|_| {
            let mut errs = FieldErrors::new();
            errs.push(field, "must be a valid uuid");
            ApiError::Validation(errs)
        }),
    }
}

pub async fn read_category_form(mut multipart: Multipart) -> Result<CategoryForm, ApiError> {
    let mut form = CategoryForm::default();
    while let Some(field) = multipart.next_field().await.map_err(bad_form)? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "name" => form.name = Some(field.text().await.map_err(bad_form)?),
            "icon" => form.icon = Some(read_file(field).await?),
            _ => {} // ignore unknown fields
        }
    }
    Ok(form)
}

pub async fn read_shop_form(mut multipart: Multipart) -> Result<ShopForm, ApiError> {
    let mut form = ShopForm::default();
    while let Some(field) = multipart.next_field().await.map_err(bad_form)? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "name" => form.name = Some(field.text().await.map_err(bad_form)?),
            "category_id" => form.category_id = Some(field.text().await.map_err(bad_form)?),
            "description" => form.description = Some(field.text().await.map_err(bad_form)?),
            "image" => form.image = Some(read_file(field).await?),
            "address" => form.address = Some(field.text().await.map_err(bad_form)?),
            "phone" => form.phone = Some(field.text().await.map_err(bad_form)?),
            _ => {} // ignore unknown fields
        }
    }
    Ok(form)
}

pub async fn read_banner_form(mut multipart: Multipart) -> Result<BannerForm, ApiError> {
    let mut form = BannerForm::default();
    while let Some(field) = multipart.next_field().await.map_err(bad_form)? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "title" => form.title = Some(field.text().await.map_err(bad_form)?),
            "image" => form.image = Some(read_file(field).await?),
            _ => {} // ignore unknown fields
        }
    }
    Ok(form)
}
