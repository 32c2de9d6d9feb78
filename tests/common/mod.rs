//! Common test utilities for rke2-genconfig integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use assert_cmd::Command;
use flate2::Compression;
use flate2::write::GzEncoder;
use tempfile::TempDir;

/// Data directory passed to every run; it only appears inside written files
pub const DATA_DIR: &str = "/tmp/d";

/// A staging root passed as `--prefix`
pub struct TestNode {
    pub temp: TempDir,
    pub path: PathBuf,
}

impl TestNode {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Write a file below the prefix
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }

    pub fn read_yaml(&self, path: &str) -> serde_yaml::Value {
        serde_yaml::from_str(&self.read_file(path)).expect("Failed to parse YAML")
    }

    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    pub fn prefix(&self) -> &Path {
        &self.path
    }
}

/// The binary under test, isolated from the caller's environment
#[allow(deprecated)]
pub fn genconfig_cmd() -> Command {
    let mut cmd = Command::cargo_bin("rke2-genconfig").unwrap();
    cmd.env_remove("RKE2_RELEASE_URL")
        .env_remove("RKE2_DATA_DIR")
        .env_remove("RKE2_GENCONFIG_PREFIX")
        .env_remove("RUST_LOG");
    cmd
}

/// Loopback HTTP server answering GET requests from a route table.
///
/// Unknown paths get a 404. The server thread lives until the test process exits.
pub struct ReleaseServer {
    port: u16,
    routes: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl ReleaseServer {
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind test server");
        let port = listener.local_addr().unwrap().port();
        let routes: Arc<Mutex<HashMap<String, Vec<u8>>>> = Arc::default();
        let served = Arc::clone(&routes);

        std::thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                let mut reader = BufReader::new(stream);

                let mut request_line = String::new();
                if reader.read_line(&mut request_line).is_err() {
                    continue;
                }
                let mut line = String::new();
                while reader.read_line(&mut line).map(|n| n > 0).unwrap_or(false) {
                    if line == "\r\n" || line == "\n" {
                        break;
                    }
                    line.clear();
                }

                let path = request_line.split_whitespace().nth(1).unwrap_or("/");
                let (status, body) = match served.lock().unwrap().get(path) {
                    Some(body) => ("200 OK", body.clone()),
                    None => ("404 Not Found", b"not found".to_vec()),
                };

                let mut stream = reader.into_inner();
                let head = format!(
                    "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = stream.write_all(head.as_bytes());
                let _ = stream.write_all(&body);
                let _ = stream.flush();
            }
        });

        Self { port, routes }
    }

    /// Serve `body` at `path`
    pub fn route(&self, path: &str, body: Vec<u8>) {
        self.routes.lock().unwrap().insert(path.to_string(), body);
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.port, path)
    }
}

/// Gzip-compressed node archive laid out like the upstream release tarball
pub fn node_archive() -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (path, mode, content) in [
        ("kubernetes/node/bin/kubelet", 0o755, b"kubelet".as_slice()),
        ("kubernetes/node/bin/kubeadm", 0o755, b"kubeadm".as_slice()),
        ("kubernetes/node/bin/kube-proxy", 0o755, b"kube-proxy".as_slice()),
        ("kubernetes/LICENSES", 0o644, b"licenses".as_slice()),
    ] {
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Regular);
        header.set_mode(mode);
        header.set_size(content.len() as u64);
        builder.append_data(&mut header, path, content).unwrap();
    }

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&builder.into_inner().unwrap()).unwrap();
    encoder.finish().unwrap()
}

/// Release descriptor whose archive asset points at `archive_url`
pub fn release_yaml(archive_url: &str) -> String {
    format!(
        r"apiVersion: distro.eks.amazonaws.com/v1alpha1
kind: Release
metadata:
  name: kubernetes-1-29-eks-7
status:
  components:
    - name: kubernetes
      assets:
        - name: kube-apiserver-image
          type: Image
          image:
            uri: repo/apiserver:v1.2.3
        - name: kube-controller-manager-image
          type: Image
          image:
            uri: repo/controller-manager:v1.2.3
        - name: kube-scheduler-image
          type: Image
          image:
            uri: repo/scheduler:v1.2.3
        - name: kube-proxy-image
          type: Image
          image:
            uri: repo/kube-proxy:v1.2.3
        - name: pause-image
          type: Image
          image:
            uri: repo/pause:3.9
        - name: kubernetes-node-linux-amd64.tar.gz
          type: Archive
          archive:
            uri: {archive_url}
    - name: etcd
      assets:
        - name: etcd-image
          type: Image
          image:
            uri: repo/etcd:v3.5.10
    - name: coredns
      assets:
        - name: coredns-image
          type: Image
          image:
            uri: repo/coredns:v1.11.1
    - name: metrics-server
      assets:
        - name: metrics-server-image
          type: Image
          image:
            uri: repo/metrics-server:v0.6.4
"
    )
}

/// Serve a release at `/release.yaml` and its archive at `/node.tar.gz`
pub fn serve_release() -> ReleaseServer {
    serve_release_with(|yaml| yaml)
}

/// Like [`serve_release`], with the descriptor rewritten by `edit`
pub fn serve_release_with(edit: impl FnOnce(String) -> String) -> ReleaseServer {
    let server = ReleaseServer::start();
    let descriptor = edit(release_yaml(&server.url("/node.tar.gz")));
    server.route("/release.yaml", descriptor.into_bytes());
    server.route("/node.tar.gz", node_archive());
    server
}
