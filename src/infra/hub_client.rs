// ============================================================
// Layer 6: Model Hub Client
// ============================================================
// Thin blocking client for the Hugging Face Hub HTTP API, just
// the calls needed to publish a model folder:
//
//   GET  /api/whoami-v2                       ← validate token
//   POST /api/repos/create                    ← 409 = already exists
//   POST /api/models/{repo}/preupload/main    ← regular vs LFS per file
//   POST /{repo}.git/info/lfs/objects/batch   ← LFS upload actions
//   PUT  <upload href>                        ← raw LFS bytes
//   POST <verify href>                        ← optional LFS verify
//   POST /api/models/{repo}/commit/main       ← NDJSON commit
//
// Regular files travel inline (base64) in the commit; LFS files
// are uploaded first and the commit only references them by
// SHA-256 oid. Everything lands in ONE commit.
//
// There is no retry and no rollback. If an LFS upload succeeds
// but the commit fails, the objects stay orphaned on the hub.

use std::{
    collections::HashMap,
    fs, io,
    path::{Component, Path, PathBuf},
    sync::OnceLock,
    time::Duration,
};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::domain::traits::ModelHub;

pub const TOKEN_ENV: &str = "HF_API_KEY";
pub const ENDPOINT_ENV: &str = "HF_ENDPOINT";
pub const DEFAULT_ENDPOINT: &str = "https://huggingface.co";

const REVISION: &str = "main";
// Bytes of each file the hub inspects to pick regular vs LFS
const SAMPLE_BYTES: usize = 512;
// Files per preupload request
const PREUPLOAD_CHUNK: usize = 256;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const READ_TIMEOUT: Duration = Duration::from_secs(60);
const WRITE_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Error)]
pub enum HubError {
    #[error("The model hub token is missing. Set the {0} environment variable.")]
    MissingToken(&'static str),
    #[error("The model hub rejected the token (HTTP 401)")]
    Unauthorized,
    #[error("Invalid repository id '{0}', expected 'namespace/name'")]
    InvalidRepoId(String),
    #[error("HTTP {code}: {body}")]
    Status { code: u16, body: String },
    #[error("HTTP error: {0}")]
    Transport(String),
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
    #[error("Cannot read '{path}': {source}")]
    Io {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Nothing to upload in '{0}'")]
    EmptyFolder(PathBuf),
    #[error("LFS upload of '{path}' rejected: {message}")]
    Lfs { path: String, message: String },
}

impl HubError {
    fn io(path: &Path, source: io::Error) -> Self {
        HubError::Io { path: path.to_path_buf(), source }
    }
}

// ─── Credentials ──────────────────────────────────────────────────────────────
/// The access token. Never printed.
#[derive(Clone)]
pub struct HubToken(String);

impl HubToken {
    /// Read the token from `HF_API_KEY`.
    pub fn from_env() -> Result<Self, HubError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the token through `lookup`. Unset or blank is an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, HubError> {
        match lookup(TOKEN_ENV) {
            Some(token) if !token.trim().is_empty() => Ok(Self(token.trim().to_string())),
            _ => Err(HubError::MissingToken(TOKEN_ENV)),
        }
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl std::fmt::Debug for HubToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("HubToken(***)")
    }
}

/// Split `namespace/name`, rejecting anything else.
pub fn parse_repo_id(repo_id: &str) -> Result<(&str, &str), HubError> {
    match repo_id.split_once('/') {
        Some((ns, name))
            if !ns.is_empty() && !name.is_empty() && !name.contains('/') =>
        {
            Ok((ns, name))
        }
        _ => Err(HubError::InvalidRepoId(repo_id.to_string())),
    }
}

fn agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        ureq::AgentBuilder::new()
            .timeout_connect(CONNECT_TIMEOUT)
            .timeout_read(READ_TIMEOUT)
            .timeout_write(WRITE_TIMEOUT)
            .user_agent(concat!("diamond-price/", env!("CARGO_PKG_VERSION")))
            .build()
    })
}

/// Map a ureq result onto HubError, reading the body of failed responses.
fn check(result: Result<ureq::Response, ureq::Error>) -> Result<ureq::Response, HubError> {
    match result {
        Ok(response) => Ok(response),
        Err(ureq::Error::Status(401, _)) => Err(HubError::Unauthorized),
        Err(ureq::Error::Status(code, response)) => {
            let body = response
                .into_string()
                .unwrap_or_else(|err| format!("<unreadable body: {err}>"));
            Err(HubError::Status { code, body })
        }
        Err(ureq::Error::Transport(err)) => Err(HubError::Transport(err.to_string())),
    }
}

fn parse_json<T: DeserializeOwned>(response: ureq::Response) -> Result<T, HubError> {
    response
        .into_json::<T>()
        .map_err(|err| HubError::InvalidResponse(err.to_string()))
}

// ─── Wire types ───────────────────────────────────────────────────────────────
#[derive(Debug, Deserialize)]
struct WhoAmI {
    name: String,
}

#[derive(Debug, Deserialize)]
struct CreateRepoResponse {
    url: String,
}

#[derive(Debug, Serialize)]
struct PreuploadFile<'a> {
    path:   &'a str,
    sample: String,
    size:   usize,
}

#[derive(Debug, Deserialize)]
struct PreuploadResponse {
    files: Vec<PreuploadVerdict>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PreuploadVerdict {
    path:          String,
    upload_mode:   UploadMode,
    #[serde(default)]
    should_ignore: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadMode {
    Regular,
    Lfs,
}

#[derive(Debug, Deserialize)]
struct LfsBatchResponse {
    objects: Vec<LfsObject>,
}

#[derive(Debug, Deserialize)]
struct LfsObject {
    oid:     String,
    #[serde(default)]
    actions: Option<LfsActions>,
    #[serde(default)]
    error:   Option<LfsObjectError>,
}

#[derive(Debug, Deserialize)]
struct LfsActions {
    upload: Option<LfsAction>,
    verify: Option<LfsAction>,
}

#[derive(Debug, Deserialize)]
struct LfsAction {
    href:   String,
    #[serde(default)]
    header: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct LfsObjectError {
    code:    i64,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommitResponse {
    commit_url: String,
    #[serde(default)]
    commit_oid: Option<String>,
}

// ─── Local files ──────────────────────────────────────────────────────────────
/// A file queued for upload, already read into memory.
#[derive(Debug, Clone)]
pub struct LocalFile {
    /// Forward-slash path relative to the uploaded folder
    pub repo_path: String,
    pub bytes:     Vec<u8>,
    /// Lowercase hex SHA-256 of `bytes`
    pub sha256:    String,
}

impl LocalFile {
    pub fn new(repo_path: impl Into<String>, bytes: Vec<u8>) -> Self {
        let sha256 = format!("{:x}", Sha256::digest(&bytes));
        Self { repo_path: repo_path.into(), bytes, sha256 }
    }

    fn sample(&self) -> String {
        let end = self.bytes.len().min(SAMPLE_BYTES);
        BASE64.encode(&self.bytes[..end])
    }
}

/// Paths the hub client never uploads.
fn is_ignored(repo_path: &str) -> bool {
    repo_path.split('/').any(|part| part == ".git")
        || repo_path == ".cache/huggingface"
        || repo_path.starts_with(".cache/huggingface/")
}

/// Read every uploadable file under `folder`, sorted by repo path.
pub fn collect_files(folder: &Path) -> Result<Vec<LocalFile>, HubError> {
    let mut files = Vec::new();
    walk(folder, folder, &mut files)?;
    files.sort_by(|a, b| a.repo_path.cmp(&b.repo_path));
    Ok(files)
}

fn walk(root: &Path, dir: &Path, out: &mut Vec<LocalFile>) -> Result<(), HubError> {
    for entry in fs::read_dir(dir).map_err(|e| HubError::io(dir, e))? {
        let entry = entry.map_err(|e| HubError::io(dir, e))?;
        let path  = entry.path();

        let repo_path = path
            .strip_prefix(root)
            .unwrap_or(&path)
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/");

        if is_ignored(&repo_path) {
            tracing::debug!("Skipping '{}'", repo_path);
            continue;
        }

        // fs::metadata follows symlinks, so a linked weight file is uploaded
        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(err) => {
                tracing::warn!("Skipping '{}': {}", repo_path, err);
                continue;
            }
        };
        if metadata.is_dir() {
            walk(root, &path, out)?;
        } else if metadata.is_file() {
            let bytes = fs::read(&path).map_err(|e| HubError::io(&path, e))?;
            out.push(LocalFile::new(repo_path, bytes));
        } else {
            tracing::warn!("Skipping '{}': not a regular file", repo_path);
        }
    }
    Ok(())
}

/// Build the NDJSON commit body: a header line, then one line per file.
pub fn commit_payload(message: &str, files: &[(&LocalFile, UploadMode)]) -> String {
    let mut lines = vec![json!({
        "key":   "header",
        "value": { "summary": message, "description": "" },
    })];

    for (file, mode) in files {
        lines.push(match mode {
            UploadMode::Regular => json!({
                "key":   "file",
                "value": {
                    "content":  BASE64.encode(&file.bytes),
                    "path":     file.repo_path,
                    "encoding": "base64",
                },
            }),
            UploadMode::Lfs => json!({
                "key":   "lfsFile",
                "value": {
                    "path": file.repo_path,
                    "algo": "sha256",
                    "oid":  file.sha256,
                },
            }),
        });
    }

    lines
        .iter()
        .map(|line| line.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

// ─── HubClient ────────────────────────────────────────────────────────────────
pub struct HubClient {
    endpoint: String,
    token:    HubToken,
}

impl HubClient {
    pub fn new(endpoint: impl Into<String>, token: HubToken) -> Self {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        Self { endpoint, token }
    }

    /// Token from `HF_API_KEY` (required), endpoint from `HF_ENDPOINT`
    /// (optional). Fails before any network call when the token is absent.
    pub fn from_env() -> Result<Self, HubError> {
        let token    = HubToken::from_env()?;
        let endpoint = std::env::var(ENDPOINT_ENV)
            .ok()
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        Ok(Self::new(endpoint, token))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    fn authed(&self, request: ureq::Request) -> ureq::Request {
        request.set("Authorization", &self.token.bearer())
    }

    fn fetch_whoami(&self) -> Result<String, HubError> {
        let request  = self.authed(agent().get(&self.url("/api/whoami-v2")));
        let response = check(request.call())?;
        Ok(parse_json::<WhoAmI>(response)?.name)
    }

    fn create(&self, repo_id: &str) -> Result<String, HubError> {
        let (namespace, name) = parse_repo_id(repo_id)?;
        let request = self.authed(agent().post(&self.url("/api/repos/create")));
        let body    = json!({ "name": name, "organization": namespace, "private": false });

        match check(request.send_json(body)) {
            Ok(response) => Ok(parse_json::<CreateRepoResponse>(response)?.url),
            Err(HubError::Status { code: 409, .. }) => {
                tracing::info!("Repository '{}' already exists, reusing it", repo_id);
                Ok(format!("{}/{}", self.endpoint, repo_id))
            }
            Err(err) => Err(err),
        }
    }

    fn preupload(
        &self,
        repo_id: &str,
        files:   &[LocalFile],
    ) -> Result<HashMap<String, PreuploadVerdict>, HubError> {
        let url = self.url(&format!("/api/models/{repo_id}/preupload/{REVISION}"));
        let mut verdicts = HashMap::new();

        for chunk in files.chunks(PREUPLOAD_CHUNK) {
            let payload: Vec<PreuploadFile<'_>> = chunk
                .iter()
                .map(|f| PreuploadFile {
                    path:   &f.repo_path,
                    sample: f.sample(),
                    size:   f.bytes.len(),
                })
                .collect();

            let request  = self.authed(agent().post(&url));
            let response = check(request.send_json(json!({ "files": payload })))?;
            for verdict in parse_json::<PreuploadResponse>(response)?.files {
                verdicts.insert(verdict.path.clone(), verdict);
            }
        }
        Ok(verdicts)
    }

    fn upload_lfs(&self, repo_id: &str, files: &[&LocalFile]) -> Result<(), HubError> {
        if files.is_empty() {
            return Ok(());
        }

        let objects: Vec<_> = files
            .iter()
            .map(|f| json!({ "oid": f.sha256, "size": f.bytes.len() }))
            .collect();
        let body = json!({
            "operation": "upload",
            "transfers": ["basic"],
            "objects":   objects,
            "hash_algo": "sha256",
            "ref":       { "name": REVISION },
        });

        let request = self
            .authed(agent().post(&self.url(&format!("/{repo_id}.git/info/lfs/objects/batch"))))
            .set("Accept", "application/vnd.git-lfs+json")
            .set("Content-Type", "application/vnd.git-lfs+json");
        let response = check(request.send_string(&body.to_string()))?;
        let batch: LfsBatchResponse = parse_json(response)?;

        for object in batch.objects {
            let Some(file) = files.iter().find(|f| f.sha256 == object.oid) else {
                return Err(HubError::InvalidResponse(format!(
                    "LFS batch returned unknown oid {}", object.oid
                )));
            };

            if let Some(err) = object.error {
                return Err(HubError::Lfs {
                    path:    file.repo_path.clone(),
                    message: format!("{} ({})", err.message, err.code),
                });
            }

            // No actions means the hub already has these bytes
            let Some(actions) = object.actions else {
                tracing::debug!("'{}' already stored on the hub", file.repo_path);
                continue;
            };

            if let Some(upload) = actions.upload {
                if upload.header.contains_key("chunk_size") {
                    return Err(HubError::Lfs {
                        path:    file.repo_path.clone(),
                        message: "multipart LFS upload is not supported".to_string(),
                    });
                }
                let mut request = agent().put(&upload.href);
                for (key, value) in &upload.header {
                    request = request.set(key, value);
                }
                check(request.send_bytes(&file.bytes))?;
                tracing::info!("Uploaded LFS object for '{}' ({} bytes)",
                    file.repo_path, file.bytes.len());
            }

            if let Some(verify) = actions.verify {
                let mut request = self.authed(agent().post(&verify.href));
                for (key, value) in &verify.header {
                    request = request.set(key, value);
                }
                check(request.send_json(json!({ "oid": file.sha256, "size": file.bytes.len() })))?;
            }
        }
        Ok(())
    }

    fn commit(&self, repo_id: &str, payload: String) -> Result<CommitResponse, HubError> {
        let request = self
            .authed(agent().post(&self.url(&format!("/api/models/{repo_id}/commit/{REVISION}"))))
            .set("Content-Type", "application/x-ndjson");
        let response = check(request.send_string(&payload))?;
        parse_json(response)
    }

    /// Upload `folder` as a single commit; returns the number of files committed.
    pub fn push_folder(&self, repo_id: &str, folder: &Path, message: &str) -> Result<usize, HubError> {
        parse_repo_id(repo_id)?;
        let files = collect_files(folder)?;
        if files.is_empty() {
            return Err(HubError::EmptyFolder(folder.to_path_buf()));
        }
        tracing::info!("Uploading {} files from '{}' to '{}'",
            files.len(), folder.display(), repo_id);

        let verdicts = self.preupload(repo_id, &files)?;

        let mut operations: Vec<(&LocalFile, UploadMode)> = Vec::new();
        for file in &files {
            let Some(verdict) = verdicts.get(&file.repo_path) else {
                return Err(HubError::InvalidResponse(format!(
                    "preupload did not return a mode for '{}'", file.repo_path
                )));
            };
            if verdict.should_ignore {
                tracing::info!("Hub ignores '{}', skipping", file.repo_path);
                continue;
            }
            operations.push((file, verdict.upload_mode));
        }

        let lfs_files: Vec<&LocalFile> = operations
            .iter()
            .filter(|(_, mode)| *mode == UploadMode::Lfs)
            .map(|(file, _)| *file)
            .collect();
        self.upload_lfs(repo_id, &lfs_files)?;

        let committed = self.commit(repo_id, commit_payload(message, &operations))?;
        tracing::info!(
            "Committed {} files: {} ({})",
            operations.len(),
            committed.commit_url,
            committed.commit_oid.as_deref().unwrap_or("no oid"),
        );
        Ok(operations.len())
    }
}

impl ModelHub for HubClient {
    fn whoami(&self) -> anyhow::Result<String> {
        Ok(self.fetch_whoami()?)
    }

    fn create_repo(&self, repo_id: &str) -> anyhow::Result<String> {
        Ok(self.create(repo_id)?)
    }

    fn upload_folder(&self, repo_id: &str, folder: &Path, message: &str) -> anyhow::Result<usize> {
        Ok(self.push_folder(repo_id, folder, message)?)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::sync::mpsc;
    use std::thread;

    #[derive(Debug)]
    struct Recorded {
        line:    String,
        headers: String,
        body:    Vec<u8>,
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    fn read_request(stream: &mut TcpStream) -> Recorded {
        let mut buf   = Vec::new();
        let mut chunk = [0u8; 4096];
        let header_end = loop {
            let n = stream.read(&mut chunk).unwrap();
            assert!(n > 0, "client closed before sending headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = find(&buf, b"\r\n\r\n") {
                break pos + 4;
            }
        };
        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let content_length = head
            .lines()
            .filter_map(|l| l.split_once(':'))
            .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, v)| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        while buf.len() < header_end + content_length {
            let n = stream.read(&mut chunk).unwrap();
            assert!(n > 0, "client closed mid-body");
            buf.extend_from_slice(&chunk[..n]);
        }
        let mut lines = head.lines();
        Recorded {
            line:    lines.next().unwrap_or_default().to_string(),
            headers: head.to_lowercase(),
            body:    buf[header_end..header_end + content_length].to_vec(),
        }
    }

    /// Serve one canned (status, body) per connection, in order,
    /// and report every request received.
    fn serve(listener: TcpListener, responses: Vec<(u16, String)>) -> mpsc::Receiver<Recorded> {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            for (status, body) in responses {
                let Ok((mut stream, _)) = listener.accept() else { return };
                let recorded = read_request(&mut stream);
                let _ = tx.send(recorded);
                let response = format!(
                    "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\n\
                     Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });
        rx
    }

    fn bind() -> (TcpListener, String) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url      = format!("http://{}", listener.local_addr().unwrap());
        (listener, url)
    }

    fn token() -> HubToken {
        HubToken::from_lookup(|_| Some("hf_test".to_string())).unwrap()
    }

    #[test]
    fn test_missing_token_is_rejected() {
        let err = HubToken::from_lookup(|_| None).unwrap_err();
        assert!(matches!(err, HubError::MissingToken(TOKEN_ENV)));
        assert!(err.to_string().contains("HF_API_KEY"));

        let blank = HubToken::from_lookup(|_| Some("   ".to_string()));
        assert!(matches!(blank, Err(HubError::MissingToken(_))));
    }

    #[test]
    fn test_token_is_not_printed() {
        assert_eq!(format!("{:?}", token()), "HubToken(***)");
    }

    #[test]
    fn test_parse_repo_id() {
        assert_eq!(parse_repo_id("Hiroshi99/diamond-model").unwrap(), ("Hiroshi99", "diamond-model"));
        assert!(parse_repo_id("diamond-model").is_err());
        assert!(parse_repo_id("/diamond-model").is_err());
        assert!(parse_repo_id("a/b/c").is_err());
    }

    #[test]
    fn test_ignored_paths() {
        assert!(is_ignored(".git"));
        assert!(is_ignored(".git/HEAD"));
        assert!(is_ignored("sub/.git/config"));
        assert!(is_ignored(".cache/huggingface/upload.lock"));
        assert!(!is_ignored(".gitattributes"));
        assert!(!is_ignored("diamond_price_predictor.mpk"));
    }

    #[test]
    fn test_collect_files_walks_and_sorts() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("b.json"), b"{}").unwrap();
        fs::create_dir_all(tmp.path().join("sub")).unwrap();
        fs::write(tmp.path().join("sub").join("a.bin"), b"\x00\x01").unwrap();
        fs::create_dir_all(tmp.path().join(".git")).unwrap();
        fs::write(tmp.path().join(".git").join("HEAD"), b"ref").unwrap();

        let files = collect_files(tmp.path()).unwrap();
        let paths: Vec<&str> = files.iter().map(|f| f.repo_path.as_str()).collect();
        assert_eq!(paths, vec!["b.json", "sub/a.bin"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_collect_files_follows_symlinks() {
        let tmp    = tempfile::tempdir().unwrap();
        let store  = tmp.path().join("store");
        let folder = tmp.path().join("models");
        fs::create_dir_all(&store).unwrap();
        fs::create_dir_all(&folder).unwrap();
        fs::write(store.join("weights.mpk"), b"weights").unwrap();
        std::os::unix::fs::symlink(store.join("weights.mpk"), folder.join("weights.mpk")).unwrap();
        std::os::unix::fs::symlink(store.join("gone.json"), folder.join("dangling.json")).unwrap();

        let files = collect_files(&folder).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].repo_path, "weights.mpk");
        assert_eq!(files[0].bytes, b"weights");
    }

    #[test]
    fn test_local_file_sha256() {
        let file = LocalFile::new("x", b"abc".to_vec());
        assert_eq!(
            file.sha256,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_commit_payload_lines() {
        let regular = LocalFile::new("train_config.json", b"{}".to_vec());
        let lfs     = LocalFile::new("weights.mpk", vec![0u8; 8]);
        let payload = commit_payload("Upload model", &[
            (&regular, UploadMode::Regular),
            (&lfs, UploadMode::Lfs),
        ]);

        let lines: Vec<serde_json::Value> = payload
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["key"], "header");
        assert_eq!(lines[0]["value"]["summary"], "Upload model");
        assert_eq!(lines[1]["key"], "file");
        assert_eq!(lines[1]["value"]["content"], "e30=");
        assert_eq!(lines[2]["key"], "lfsFile");
        assert_eq!(lines[2]["value"]["oid"], lfs.sha256.as_str());
    }

    #[test]
    fn test_whoami_maps_401_to_unauthorized() {
        let (listener, url) = bind();
        let _rx    = serve(listener, vec![(401, r#"{"error":"Invalid token"}"#.to_string())]);
        let client = HubClient::new(url, token());
        assert!(matches!(client.fetch_whoami(), Err(HubError::Unauthorized)));
    }

    #[test]
    fn test_whoami_sends_bearer_token() {
        let (listener, url) = bind();
        let rx     = serve(listener, vec![(200, r#"{"name":"Hiroshi99"}"#.to_string())]);
        let client = HubClient::new(url, token());

        assert_eq!(client.fetch_whoami().unwrap(), "Hiroshi99");
        let req = rx.recv().unwrap();
        assert!(req.line.starts_with("GET /api/whoami-v2"));
        assert!(req.headers.contains("authorization: bearer hf_test"));
    }

    #[test]
    fn test_create_repo_reuses_existing() {
        let (listener, url) = bind();
        let rx     = serve(listener, vec![(409, r#"{"error":"You already created this model repo"}"#.to_string())]);
        let client = HubClient::new(url.clone(), token());

        let repo_url = client.create("Hiroshi99/diamond-model").unwrap();
        assert_eq!(repo_url, format!("{url}/Hiroshi99/diamond-model"));

        let req  = rx.recv().unwrap();
        let body: serde_json::Value = serde_json::from_slice(&req.body).unwrap();
        assert!(req.line.starts_with("POST /api/repos/create"));
        assert_eq!(body["name"], "diamond-model");
        assert_eq!(body["organization"], "Hiroshi99");
    }

    #[test]
    fn test_create_repo_propagates_server_error() {
        let (listener, url) = bind();
        let _rx    = serve(listener, vec![(500, "boom".to_string())]);
        let client = HubClient::new(url, token());
        match client.create("Hiroshi99/diamond-model") {
            Err(HubError::Status { code, body }) => {
                assert_eq!(code, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_push_folder_uploads_lfs_then_commits() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("train_config.json"), b"{\"seed\":42}").unwrap();
        fs::write(tmp.path().join("weights.mpk"), vec![7u8; 64]).unwrap();
        fs::create_dir_all(tmp.path().join(".git")).unwrap();
        fs::write(tmp.path().join(".git").join("HEAD"), b"ref").unwrap();
        let weights_oid = LocalFile::new("weights.mpk", vec![7u8; 64]).sha256;

        let (listener, url) = bind();
        let responses = vec![
            (200, r#"{"files":[
                {"path":"train_config.json","uploadMode":"regular","shouldIgnore":false},
                {"path":"weights.mpk","uploadMode":"lfs","shouldIgnore":false}]}"#.to_string()),
            (200, format!(
                r#"{{"objects":[{{"oid":"{weights_oid}","size":64,
                   "actions":{{"upload":{{"href":"{url}/lfs-put","header":{{"X-Test":"1"}}}}}}}}]}}"#
            )),
            (200, String::new()),
            (200, r#"{"commitUrl":"https://hub/commit/abc","commitOid":"abc"}"#.to_string()),
        ];
        let rx     = serve(listener, responses);
        let client = HubClient::new(url, token());

        let count = client
            .push_folder("Hiroshi99/diamond-model", tmp.path(), "Upload model")
            .unwrap();
        assert_eq!(count, 2);

        let preupload = rx.recv().unwrap();
        assert!(preupload.line.starts_with("POST /api/models/Hiroshi99/diamond-model/preupload/main"));
        let body: serde_json::Value = serde_json::from_slice(&preupload.body).unwrap();
        assert_eq!(body["files"].as_array().unwrap().len(), 2);

        let batch = rx.recv().unwrap();
        assert!(batch.line.starts_with("POST /Hiroshi99/diamond-model.git/info/lfs/objects/batch"));
        let body: serde_json::Value = serde_json::from_slice(&batch.body).unwrap();
        assert_eq!(body["objects"][0]["oid"], weights_oid.as_str());

        let put = rx.recv().unwrap();
        assert!(put.line.starts_with("PUT /lfs-put"));
        assert!(put.headers.contains("x-test: 1"));
        assert_eq!(put.body, vec![7u8; 64]);

        let commit = rx.recv().unwrap();
        assert!(commit.line.starts_with("POST /api/models/Hiroshi99/diamond-model/commit/main"));
        let text = String::from_utf8(commit.body).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("\"lfsFile\""));
        assert!(text.contains(&weights_oid));
        assert!(!text.contains(".git/HEAD"));
    }

    #[test]
    fn test_push_empty_folder_is_an_error() {
        let tmp    = tempfile::tempdir().unwrap();
        let client = HubClient::new("http://127.0.0.1:9", token());
        assert!(matches!(
            client.push_folder("a/b", tmp.path(), "msg"),
            Err(HubError::EmptyFolder(_))
        ));
    }
}
