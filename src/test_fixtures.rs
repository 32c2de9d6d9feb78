//! Test fixtures and utilities for reducing test setup duplication.
//!
//! This module provides helpers to build release descriptors, tarballs, a
//! one-shot HTTP server and a recording registry token source with a single
//! call each.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_fixtures::{DescriptorBuilder, HttpFixture, create_temp_dir};
//!
//! #[test]
//! fn my_test() {
//!     let temp = create_temp_dir();
//!     let descriptor = DescriptorBuilder::new()
//!         .image("pause-image", "repo/pause:3.9")
//!         .build();
//!     let server = HttpFixture::serve_once(200, b"status: {}".to_vec());
//! }
//! ```

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::cell::RefCell;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread::JoinHandle;

use base64::Engine as _;
use base64::engine::general_purpose;
use flate2::Compression;
use flate2::write::GzEncoder;
use tempfile::TempDir;

use crate::error::{Result, credentials};
use crate::registry::AuthorizationTokenSource;
use crate::registry::token::AuthorizationRecord;
use crate::release::{Asset, AssetType, Component, Locator, ReleaseDescriptor};

/// Create a temp directory in the system temp location.
///
/// # Panics
///
/// Panics if the temp directory cannot be created.
#[must_use]
pub fn create_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// A release descriptor with every asset a full run resolves
pub fn sample_descriptor_yaml() -> String {
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
            uri: http://archive.invalid/kubernetes-node-linux-amd64.tar.gz
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
    .to_string()
}

/// Builder for in-memory release descriptors
#[derive(Default)]
pub struct DescriptorBuilder {
    components: Vec<Component>,
}

impl DescriptorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new component; following assets are added to it
    pub fn component(mut self, name: &str) -> Self {
        self.components.push(Component {
            name: name.to_string(),
            assets: Vec::new(),
        });
        self
    }

    pub fn image(self, name: &str, uri: &str) -> Self {
        self.asset(Asset {
            name: name.to_string(),
            asset_type: AssetType::Image,
            image: Some(Locator {
                uri: uri.to_string(),
            }),
            archive: None,
        })
    }

    pub fn archive(self, name: &str, uri: &str) -> Self {
        self.asset(Asset {
            name: name.to_string(),
            asset_type: AssetType::Archive,
            image: None,
            archive: Some(Locator {
                uri: uri.to_string(),
            }),
        })
    }

    fn asset(mut self, asset: Asset) -> Self {
        if self.components.is_empty() {
            self = self.component("kubernetes");
        }
        if let Some(component) = self.components.last_mut() {
            component.assets.push(asset);
        }
        self
    }

    pub fn build(self) -> ReleaseDescriptor {
        let mut descriptor = ReleaseDescriptor::default();
        descriptor.metadata.name = Some("test-release".to_string());
        descriptor.status.components = self.components;
        descriptor
    }
}

/// A single-request HTTP server on loopback
pub struct HttpFixture {
    port: u16,
    handle: Option<JoinHandle<()>>,
}

impl HttpFixture {
    /// Answer the next request with `status` and `body`, then stop
    pub fn serve_once(status: u16, body: Vec<u8>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind test server");
        let port = listener.local_addr().unwrap().port();

        let handle = std::thread::spawn(move || {
            let Ok((stream, _)) = listener.accept() else {
                return;
            };
            let mut reader = BufReader::new(stream);
            let mut line = String::new();
            while reader.read_line(&mut line).map(|n| n > 0).unwrap_or(false) {
                if line == "\r\n" || line == "\n" {
                    break;
                }
                line.clear();
            }

            let mut stream = reader.into_inner();
            let head = format!(
                "HTTP/1.1 {status} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                if status < 400 { "OK" } else { "Error" },
                body.len()
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(&body);
            let _ = stream.flush();
        });

        Self {
            port,
            handle: Some(handle),
        }
    }

    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}/artifact", self.port)
    }
}

impl Drop for HttpFixture {
    fn drop(&mut self) {
        // Only join when the request was served; an unused fixture would block forever
        if let Some(handle) = self.handle.take() {
            if handle.is_finished() {
                let _ = handle.join();
            }
        }
    }
}

/// Builder for tar archives
pub struct TarballBuilder {
    builder: tar::Builder<Vec<u8>>,
}

impl TarballBuilder {
    pub fn new() -> Self {
        Self {
            builder: tar::Builder::new(Vec::new()),
        }
    }

    pub fn directory(mut self, path: &str) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Directory);
        header.set_mode(0o755);
        header.set_size(0);
        self.builder
            .append_data(&mut header, path, std::io::empty())
            .unwrap();
        self
    }

    pub fn file(self, path: &str, mode: u32, content: &[u8]) -> Self {
        self.entry(path, tar::EntryType::Regular, mode, content)
    }

    /// File-like entry with an explicit type flag
    pub fn entry(mut self, path: &str, entry_type: tar::EntryType, mode: u32, content: &[u8]) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(entry_type);
        header.set_mode(mode);
        header.set_size(content.len() as u64);
        self.builder
            .append_data(&mut header, path, content)
            .unwrap();
        self
    }

    pub fn symlink(mut self, path: &str, target: &str) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Symlink);
        header.set_mode(0o777);
        header.set_size(0);
        header.set_link_name(target).unwrap();
        self.builder
            .append_data(&mut header, path, std::io::empty())
            .unwrap();
        self
    }

    /// Finished uncompressed archive
    pub fn tar(self) -> Vec<u8> {
        self.builder.into_inner().unwrap()
    }

    /// Finished gzip-compressed archive
    pub fn tar_gz(self) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&self.tar()).unwrap();
        encoder.finish().unwrap()
    }
}

/// Token source that records requests and answers with fixed credentials
pub struct RecordingTokenSource {
    calls: RefCell<Vec<(String, Vec<String>)>>,
    failure: Option<String>,
}

impl RecordingTokenSource {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            failure: None,
        }
    }

    /// A source whose every request fails with `message`
    pub fn failing(message: &str) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            failure: Some(message.to_string()),
        }
    }

    /// `(region, registry IDs)` of every request, in order
    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.borrow().clone()
    }
}

impl AuthorizationTokenSource for RecordingTokenSource {
    fn authorization_tokens(
        &self,
        region: &str,
        registry_ids: &[String],
    ) -> Result<Vec<AuthorizationRecord>> {
        self.calls
            .borrow_mut()
            .push((region.to_string(), registry_ids.to_vec()));

        if let Some(message) = &self.failure {
            return Err(credentials::authorization_failed(message.clone()));
        }

        Ok(registry_ids
            .iter()
            .map(|id| AuthorizationRecord {
                proxy_endpoint: format!("https://{id}.dkr.ecr.{region}.amazonaws.com"),
                authorization_token: general_purpose::STANDARD
                    .encode(format!("AWS:token-for-{id}")),
            })
            .collect())
    }
}
