#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use draftpost_api::config::ServerConfig;
use draftpost_api::router::build_app_router;
use draftpost_api::services::{ImageImporter, PostCreator};
use draftpost_api::state::AppState;
use draftpost_core::auth::Secret;
use draftpost_core::image_probe::ProbeResponse;
use draftpost_core::ports::{
    ContentStore, DownloadedFile, MediaLibrary, NewDraft, PortError, RemoteFetcher,
};
use draftpost_core::types::DbId;

pub const TEST_TOKEN: &str = "test-secret-token";
pub const CREATE_POST_PATH: &str = "/draft-post-creator/v1/create-post";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(media_root: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        api_token: Secret::new(TEST_TOKEN),
        remote_timeout_secs: 5,
        max_image_bytes: 1024 * 1024,
        media_root,
        delete_draft_on_image_failure: false,
    }
}

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPost {
    pub id: DbId,
    pub title: String,
    pub content: String,
    pub status: &'static str,
    pub meta: BTreeMap<String, String>,
    pub featured_media_id: Option<DbId>,
}

/// In-memory [`ContentStore`].
#[derive(Default)]
pub struct FakeStore {
    next_id: AtomicI64,
    posts: Mutex<Vec<StoredPost>>,
    pub fail_create: bool,
    pub fail_meta: bool,
    pub fail_featured: bool,
}

impl FakeStore {
    pub fn posts(&self) -> Vec<StoredPost> {
        self.posts.lock().unwrap().clone()
    }

    pub fn post(&self, id: DbId) -> Option<StoredPost> {
        self.posts().into_iter().find(|p| p.id == id)
    }
}

#[async_trait]
impl ContentStore for FakeStore {
    async fn create_draft(&self, draft: &NewDraft) -> Result<DbId, PortError> {
        if self.fail_create {
            return Err(PortError::Storage("insert rejected".into()));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.posts.lock().unwrap().push(StoredPost {
            id,
            title: draft.title.clone(),
            content: draft.content.clone(),
            status: "draft",
            meta: BTreeMap::new(),
            featured_media_id: None,
        });
        Ok(id)
    }

    async fn set_meta(&self, post_id: DbId, key: &str, value: &str) -> Result<(), PortError> {
        if self.fail_meta {
            return Err(PortError::Storage("meta write rejected".into()));
        }
        let mut posts = self.posts.lock().unwrap();
        let post = posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or_else(|| PortError::Storage("no such post".into()))?;
        post.meta.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn set_featured_image(&self, post_id: DbId, asset_id: DbId) -> Result<(), PortError> {
        if self.fail_featured {
            return Err(PortError::Storage("update rejected".into()));
        }
        let mut posts = self.posts.lock().unwrap();
        let post = posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or_else(|| PortError::Storage("no such post".into()))?;
        post.featured_media_id = Some(asset_id);
        Ok(())
    }

    async fn delete_draft(&self, post_id: DbId) -> Result<(), PortError> {
        self.posts.lock().unwrap().retain(|p| p.id != post_id);
        Ok(())
    }

    async fn health_check(&self) -> Result<(), PortError> {
        Ok(())
    }
}

/// [`RemoteFetcher`] answering HEAD with a fixed probe and writing a small
/// temporary file into `temp_dir` for downloads. `downloads` records the
/// paths so tests can check they were cleaned up.
pub struct FakeFetcher {
    pub probe: Result<ProbeResponse, String>,
    pub download_fails: bool,
    pub temp_dir: PathBuf,
    pub head_calls: Mutex<Vec<String>>,
    pub downloads: Mutex<Vec<PathBuf>>,
}

impl FakeFetcher {
    pub fn serving(status: u16, content_type: Option<&str>, temp_dir: PathBuf) -> Self {
        Self {
            probe: Ok(ProbeResponse {
                status,
                content_type: content_type.map(str::to_string),
            }),
            download_fails: false,
            temp_dir,
            head_calls: Mutex::new(Vec::new()),
            downloads: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl RemoteFetcher for FakeFetcher {
    async fn head(&self, url: &str) -> Result<ProbeResponse, PortError> {
        self.head_calls.lock().unwrap().push(url.to_string());
        self.probe.clone().map_err(PortError::Transport)
    }

    async fn download_to_temp(&self, _url: &str) -> Result<DownloadedFile, PortError> {
        if self.download_fails {
            return Err(PortError::Transport("connection reset".into()));
        }
        let path = tempfile::NamedTempFile::new_in(&self.temp_dir)?.into_temp_path();
        tokio::fs::write(&path, b"\x89PNG fake").await?;
        self.downloads.lock().unwrap().push(path.to_path_buf());
        Ok(DownloadedFile { path, size: 9 })
    }
}

/// [`MediaLibrary`] that hands out sequential asset ids, or always fails.
/// Successful registrations keep the file where it was downloaded.
#[derive(Default)]
pub struct FakeLibrary {
    next_id: AtomicI64,
    pub fail: bool,
    pub registered: Mutex<Vec<(String, DbId)>>,
    pub removed: Mutex<Vec<DbId>>,
    pub calls: AtomicUsize,
}

#[async_trait]
impl MediaLibrary for FakeLibrary {
    async fn register(
        &self,
        file: DownloadedFile,
        filename: &str,
        owner_id: DbId,
    ) -> Result<DbId, PortError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(PortError::InvalidMedia("sideload rejected".into()));
        }
        file.path.keep().map_err(|e| PortError::Io(e.error))?;
        self.registered
            .lock()
            .unwrap()
            .push((filename.to_string(), owner_id));
        Ok(self.next_id.fetch_add(1, Ordering::SeqCst) + 500)
    }

    async fn remove(&self, asset_id: DbId) -> Result<(), PortError> {
        self.removed.lock().unwrap().push(asset_id);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// A router wired to fakes, with handles for inspecting them afterwards.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<FakeStore>,
    pub fetcher: Arc<FakeFetcher>,
    pub library: Arc<FakeLibrary>,
    /// Keeps the scratch directory alive for the duration of the test.
    pub scratch: tempfile::TempDir,
}

pub struct TestAppBuilder {
    store: FakeStore,
    library: FakeLibrary,
    probe: Result<ProbeResponse, String>,
    download_fails: bool,
    delete_draft_on_image_failure: bool,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            store: FakeStore::default(),
            library: FakeLibrary::default(),
            probe: Ok(ProbeResponse {
                status: 200,
                content_type: Some("image/jpeg".to_string()),
            }),
            download_fails: false,
            delete_draft_on_image_failure: false,
        }
    }

    pub fn probe(mut self, status: u16, content_type: Option<&str>) -> Self {
        self.probe = Ok(ProbeResponse {
            status,
            content_type: content_type.map(str::to_string),
        });
        self
    }

    pub fn unreachable_image(mut self) -> Self {
        self.probe = Err("dns error".to_string());
        self
    }

    pub fn failing_create(mut self) -> Self {
        self.store.fail_create = true;
        self
    }

    pub fn failing_meta(mut self) -> Self {
        self.store.fail_meta = true;
        self
    }

    pub fn failing_featured_image(mut self) -> Self {
        self.store.fail_featured = true;
        self
    }

    pub fn failing_download(mut self) -> Self {
        self.download_fails = true;
        self
    }

    pub fn failing_registration(mut self) -> Self {
        self.library.fail = true;
        self
    }

    pub fn delete_draft_on_image_failure(mut self) -> Self {
        self.delete_draft_on_image_failure = true;
        self
    }

    pub fn build(self) -> TestApp {
        let scratch = tempfile::tempdir().expect("scratch dir");
        let mut config = test_config(scratch.path().to_path_buf());
        config.delete_draft_on_image_failure = self.delete_draft_on_image_failure;
        std::fs::create_dir_all(config.incoming_dir()).expect("incoming dir");

        let store = Arc::new(self.store);
        let fetcher = Arc::new(FakeFetcher {
            probe: self.probe,
            download_fails: self.download_fails,
            ..FakeFetcher::serving(200, None, scratch.path().to_path_buf())
        });
        let library = Arc::new(self.library);

        let importer = Arc::new(ImageImporter::new(fetcher.clone(), library.clone()));
        let post_creator = PostCreator::new(store.clone(), fetcher.clone(), importer)
            .with_draft_cleanup(config.delete_draft_on_image_failure);

        let state = AppState {
            config: Arc::new(config.clone()),
            content_store: store.clone(),
            post_creator: Arc::new(post_creator),
        };

        TestApp {
            router: build_app_router(state, &config),
            store,
            fetcher,
            library,
            scratch,
        }
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub fn valid_payload() -> serde_json::Value {
    serde_json::json!({
        "title": "Ten <em>Tips</em> for Rust",
        "description": "<p>Intro</p><script>alert('x')</script>",
        "meta_title": "Ten Tips",
        "meta_keywords": "rust, tips",
        "meta_description": "A list of\ntips.",
        "img_url": "https://images.example.com/uploads/cover.jpg?w=1200",
    })
}

/// POST a raw body to the create-post endpoint with an optional
/// `Authorization` header.
pub async fn post_raw(app: Router, auth: Option<&str>, body: impl Into<Body>) -> Response<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(CREATE_POST_PATH)
        .header("content-type", "application/json");
    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }
    app.oneshot(builder.body(body.into()).unwrap())
        .await
        .unwrap()
}

/// POST a JSON payload with the valid test token.
pub async fn post_authed(app: Router, payload: &serde_json::Value) -> Response<Body> {
    let auth = format!("Bearer {TEST_TOKEN}");
    post_raw(app, Some(&auth), payload.to_string()).await
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
