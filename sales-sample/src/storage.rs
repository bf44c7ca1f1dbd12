//! Upload of generated files to object storage.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::debug;
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Url;

use crate::config::StorageConfig;
use crate::error::UploadError;
use crate::output;
use crate::sigv4::{self, CanonicalRequest, Credentials};
use crate::SourceSystem;

/// Something that can put a local file under a destination key.
pub trait Uploader {
    /// # Errors
    /// Errors when the file cannot be read or the destination refuses it
    fn upload(&self, local_path: &Path, key: &str) -> Result<(), UploadError>;

    /// Human readable form of where `key` ends up, used in progress logs
    fn describe(&self, key: &str) -> String {
        key.to_string()
    }
}

impl<U: Uploader + ?Sized> Uploader for Box<U> {
    fn upload(&self, local_path: &Path, key: &str) -> Result<(), UploadError> {
        (**self).upload(local_path, key)
    }

    fn describe(&self, key: &str) -> String {
        (**self).describe(key)
    }
}

/// `raw/<system>/<year>/<MM>/<year>_<MM>_<system>.csv`
#[must_use]
pub fn object_key(system: SourceSystem, year: i32, month: u32) -> String {
    format!(
        "raw/{}/{year}/{month:02}/{}",
        system.name(),
        output::file_name(system, year, month)
    )
}

/// Client for an S3 compatible object store, addressed path style
/// (`<endpoint>/<bucket>/<key>`) and authenticated with Signature V4.
#[derive(Debug)]
pub struct S3Client {
    endpoint: Url,
    bucket: String,
    region: String,
    credentials: Credentials,
    http: Client,
}

impl S3Client {
    /// # Errors
    /// Errors when the endpoint is not a valid URL, the bucket is empty or the HTTP client
    /// cannot be built
    pub fn new(cfg: &StorageConfig) -> Result<Self, UploadError> {
        let endpoint = Url::parse(&cfg.endpoint)
            .map_err(|e| UploadError::Config(format!("invalid endpoint {}: {e}", cfg.endpoint)))?;
        if endpoint.host_str().is_none() {
            return Err(UploadError::Config(format!(
                "endpoint {} has no host",
                cfg.endpoint
            )));
        }
        if cfg.bucket.is_empty() {
            return Err(UploadError::Config("bucket name is empty".to_string()));
        }
        // the blocking client defaults to a 30s timeout; only set one when asked to
        let http = Client::builder().timeout(cfg.timeout).build()?;

        Ok(S3Client {
            endpoint,
            bucket: cfg.bucket.clone(),
            region: cfg.region.clone(),
            credentials: Credentials {
                access_key_id: cfg.access_key_id.clone(),
                secret_access_key: cfg.secret_access_key.clone(),
            },
            http,
        })
    }

    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn object_url(&self, key: &str) -> Url {
        let base = self.endpoint.path().trim_end_matches('/');
        let path = sigv4::encode_path(&format!(
            "{base}/{}/{}",
            self.bucket,
            key.trim_start_matches('/')
        ));
        let mut url = self.endpoint.clone();
        url.set_path(&path);
        url
    }

    fn host_header(url: &Url) -> String {
        let host = url.host_str().unwrap_or_default();
        match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        }
    }
}

impl Uploader for S3Client {
    fn upload(&self, local_path: &Path, key: &str) -> Result<(), UploadError> {
        let body = fs::read(local_path)?;
        let url = self.object_url(key);
        let payload_hash = sigv4::sha256_hex(&body);
        let now = Utc::now();
        let amz_date = sigv4::amz_date(now);
        let host = Self::host_header(&url);

        let headers = [
            ("host", host.as_str()),
            ("x-amz-content-sha256", payload_hash.as_str()),
            ("x-amz-date", amz_date.as_str()),
        ];
        let request = CanonicalRequest {
            method: "PUT",
            path: url.path(),
            headers: &headers,
            payload_hash: &payload_hash,
        };
        let authorization =
            sigv4::authorization(&self.credentials, &self.region, "s3", now, &request)?;

        debug!("PUT {} ({} bytes)", url, body.len());
        let response = self
            .http
            .put(url.clone())
            .header("x-amz-content-sha256", &payload_hash)
            .header("x-amz-date", &amz_date)
            .header(AUTHORIZATION, authorization)
            .header(CONTENT_TYPE, "text/csv")
            .body(body)
            .send()?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = match response.text() {
                Ok(body) => body,
                Err(e) => {
                    debug!("could not read error body for {key}: {e}");
                    status.canonical_reason().unwrap_or_default().to_string()
                }
            };
            Err(UploadError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }

    fn describe(&self, key: &str) -> String {
        format!("s3://{}/{key}", self.bucket)
    }
}

/// Mirrors uploads into a local directory tree, `<root>/<key>`.
#[derive(Debug, Clone)]
pub struct DirectoryUploader {
    root: PathBuf,
}

impl DirectoryUploader {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirectoryUploader { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Uploader for DirectoryUploader {
    fn upload(&self, local_path: &Path, key: &str) -> Result<(), UploadError> {
        let destination = self.root.join(key);
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(local_path, &destination)?;
        Ok(())
    }

    fn describe(&self, key: &str) -> String {
        self.root.join(key).display().to_string()
    }
}
