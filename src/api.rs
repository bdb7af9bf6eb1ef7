// API client module: a small blocking HTTP client for the CloudLabel REST
// API. It implements both remote seams of the crate: asset listing and
// thumbnail download for `sync`, and the dataset endpoints for uploads.

use std::path::Path;

use log::{debug, info};
use reqwest::blocking::{multipart, Client, RequestBuilder, Response};
use reqwest::header::AUTHORIZATION;
use serde_json::{json, Value};

use crate::asset::Asset;
use crate::config::ConnectionConfig;
use crate::error::{CloudLabelError, Result};
use crate::sync::AssetSource;
use crate::upload::{collect_files, DatasetClient};

/// Holds a reqwest blocking client and the resolved connection settings.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: ConnectionConfig,
}

impl ApiClient {
    pub fn new(config: &ConnectionConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| CloudLabelError::remote(config.api_url.as_str(), e))?;
        Ok(ApiClient {
            client,
            config: config.clone(),
        })
    }

    /// Attach credentials: basic auth when a username is known, otherwise a
    /// `Token` authorization header. Requests without a token go out bare.
    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match (&self.config.username, &self.config.token) {
            (Some(username), Some(token)) => req.basic_auth(username, Some(token)),
            (None, Some(token)) => req.header(AUTHORIZATION, format!("Token {}", token)),
            _ => req,
        }
    }

    /// POST every file under `path` to `projects/<project>/dataset/<action>/`.
    fn post_files(&self, action: &str, path: &Path, create_tags: bool) -> Result<Value> {
        let files = collect_files(path)?;
        if files.is_empty() {
            return Err(CloudLabelError::EmptyUpload {
                path: path.to_path_buf(),
            });
        }

        let mut form = multipart::Form::new().text("create_tags", create_tags.to_string());
        for file in &files {
            let part = multipart::Part::file(&file.path)
                .map_err(|e| CloudLabelError::io(&file.path, e))?
                .file_name(file.name.clone());
            form = form.part("files", part);
        }

        let url = self.config.endpoint(&format!(
            "projects/{}/dataset/{}/",
            self.config.project, action
        ))?;
        info!("POST {} ({} files)", url, files.len());
        let res = self
            .authorize(self.client.post(url.clone()).multipart(form))
            .send()
            .map_err(|e| CloudLabelError::remote(url.as_str(), e))?;
        let res = check_status(url.as_str(), res)?;

        let status = res.status();
        let txt = res
            .text()
            .map_err(|e| CloudLabelError::remote(url.as_str(), e))?;
        Ok(serde_json::from_str(&txt)
            .unwrap_or_else(|_| json!({"status": status.as_u16(), "body": txt})))
    }
}

/// Turn a non-success status into an error carrying the response body.
fn check_status(url: &str, res: Response) -> Result<Response> {
    if !res.status().is_success() {
        let status = res.status();
        let txt = res.text().unwrap_or_else(|_| "".into());
        return Err(CloudLabelError::remote(url, format!("{} - {}", status, txt)));
    }
    Ok(res)
}

impl AssetSource for ApiClient {
    fn list_assets(&self, project: &str) -> Result<Vec<Asset>> {
        let url = self.config.endpoint(&format!("projects/{}/assets/", project))?;
        debug!("GET {}", url);
        let res = self
            .authorize(self.client.get(url.clone()))
            .send()
            .map_err(|e| CloudLabelError::remote(url.as_str(), e))?;
        let res = check_status(url.as_str(), res)?;
        let body = res
            .bytes()
            .map_err(|e| CloudLabelError::remote(url.as_str(), e))?;
        Ok(serde_json::from_slice(&body)?)
    }

    // Thumbnails are public media URLs; no credentials are sent.
    fn fetch_thumbnail(&self, url: &str) -> Result<Vec<u8>> {
        let res = self
            .client
            .get(url)
            .send()
            .map_err(|e| CloudLabelError::remote(url, e))?;
        let res = check_status(url, res)?;
        let body = res.bytes().map_err(|e| CloudLabelError::remote(url, e))?;
        Ok(body.to_vec())
    }
}

impl DatasetClient for ApiClient {
    fn upload_dir(&self, path: &Path, create_tags: bool) -> Result<Value> {
        self.post_files("upload", path, create_tags)
    }

    fn test_zip(&self, path: &Path, create_tags: bool) -> Result<Value> {
        self.post_files("test", path, create_tags)
    }
}
