//! Filesystem-backed image buckets.
//!
//! Stands in for the hosted object storage: one directory per bucket under
//! `UPLOADS_DIR`, keys are timestamp-prefixed sanitized filenames, and the
//! "public URL" is the path the streaming handler serves the file from.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bucket {
    CarImages,
    BlogImages,
}

impl Bucket {
    pub fn dir(&self) -> &'static str {
        match self {
            Bucket::CarImages => "car-images",
            Bucket::BlogImages => "blog-images",
        }
    }

    pub fn from_dir(dir: &str) -> Option<Bucket> {
        match dir {
            "car-images" => Some(Bucket::CarImages),
            "blog-images" => Some(Bucket::BlogImages),
            _ => None,
        }
    }

    /// Blog covers are hard-capped at 5 MB; car images follow the
    /// configurable limit.
    pub fn size_limit(&self) -> usize {
        match self {
            Bucket::CarImages => file_size_limit(),
            Bucket::BlogImages => file_size_limit().min(5 * 1024 * 1024),
        }
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),
    #[error("file exceeds the {limit} byte limit")]
    TooLarge { limit: usize },
    #[error("invalid object key")]
    InvalidKey,
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// MIME allow-list mapped to the stored extension.
pub fn allowed_content_types() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        ("image/jpeg", "jpg"),
        ("image/jpg", "jpg"),
        ("image/png", "png"),
        ("image/webp", "webp"),
    ])
}

static KEY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._-]+$").unwrap()
});

/// Strips the extension and replaces anything outside `[A-Za-z0-9_-]` so the
/// original filename survives as a readable key fragment.
pub fn sanitize_file_name(name: &str) -> String {
    let stem = name.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(name);
    let cleaned: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
        .collect();
    let cleaned = cleaned.trim_matches('-').to_string();
    if cleaned.is_empty() {
        "image".to_string()
    } else {
        cleaned
    }
}

/// Timestamp-prefixed storage key, unique enough for an upsert-style bucket.
pub fn object_key(file_name: &str, extension: &str) -> String {
    format!(
        "{}_{}.{}",
        chrono::Utc::now().timestamp_millis(),
        sanitize_file_name(file_name),
        extension
    )
}

/// Path the public streaming route serves this object from.
pub fn public_url(bucket: Bucket, key: &str) -> String {
    format!("{}/uploads/{}/{}", base_url(), bucket.dir(), key)
}

fn object_path(base: &Path, bucket: Bucket, key: &str) -> Result<PathBuf, StorageError> {
    if !KEY_REGEX.is_match(key) || key.contains("..") {
        return Err(StorageError::InvalidKey);
    }
    Ok(base.join(bucket.dir()).join(key))
}

/// Writes the object, overwriting any existing key, and returns the public
/// URL for the stored reference.
pub async fn save_object(
    base: &Path,
    bucket: Bucket,
    key: &str,
    data: &[u8],
) -> Result<String, StorageError> {
    if data.len() > bucket.size_limit() {
        return Err(StorageError::TooLarge { limit: bucket.size_limit() });
    }
    let path = object_path(base, bucket, key)?;
    tokio::fs::create_dir_all(base.join(bucket.dir())).await?;
    tokio::fs::write(&path, data).await?;
    Ok(public_url(bucket, key))
}

/// Removes the object behind a stored public URL. Callers treat failure as
/// non-fatal cleanup.
pub async fn delete_object(base: &Path, bucket: Bucket, url: &str) -> Result<(), StorageError> {
    let key = url.rsplit('/').next().ok_or(StorageError::InvalidKey)?;
    let path = object_path(base, bucket, key)?;
    tokio::fs::remove_file(&path).await?;
    Ok(())
}

/// Opens an object for streaming reads.
pub async fn open_object(
    base: &Path,
    bucket: Bucket,
    key: &str,
) -> Result<(tokio::fs::File, PathBuf), StorageError> {
    let path = object_path(base, bucket, key)?;
    let file = tokio::fs::File::open(&path).await?;
    Ok((file, path))
}

/// Outcome of applying the image fallback policy on save.
#[derive(Debug, PartialEq)]
pub enum ResolvedImage {
    /// Use this URL (fresh upload or carried-over previous image).
    Keep(Option<String>),
    /// Upload failed and the previous image is still valid.
    FallBack(String),
}

#[derive(Error, Debug)]
#[error("image upload failed and no previous image exists: {source}")]
pub struct NoImageAvailable {
    #[source]
    pub source: StorageError,
}

/// Save-time image policy shared by every admin entity:
/// no new file keeps whatever was stored; a successful upload replaces it; a
/// failed upload falls back to the previous URL when one exists and aborts
/// the save when it does not.
pub fn resolve_image(
    upload: Option<Result<String, StorageError>>,
    existing: Option<String>,
) -> Result<ResolvedImage, NoImageAvailable> {
    match upload {
        None => Ok(ResolvedImage::Keep(existing)),
        Some(Ok(url)) => Ok(ResolvedImage::Keep(Some(url))),
        Some(Err(err)) => match existing {
            Some(previous) => Ok(ResolvedImage::FallBack(previous)),
            None => Err(NoImageAvailable { source: err }),
        },
    }
}

pub fn uploads_dir() -> PathBuf {
    dotenvy::dotenv().ok();
    PathBuf::from(std::env::var("UPLOADS_DIR").unwrap_or_else(|_| "./uploads".to_string()))
}

pub fn base_url() -> String {
    dotenvy::dotenv().ok();
    std::env::var("BASE_URL").unwrap_or_default()
}

fn file_size_limit() -> usize {
    dotenvy::dotenv().ok();
    std::env::var("FILE_SIZE_LIMIT")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(5 * 1024 * 1024)
}
