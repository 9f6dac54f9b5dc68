//! Template bundle loading: compiled in, from a remote URL, or from a local directory
//!
//! - Embedded: the bundles under `templates/`, compiled into the binary
//! - Remote: downloads `<base>/<bundle>.zip`
//! - Local: zips `<dir>/<bundle>/` in memory, then reads it back
//!
//! Remote and local bundles both go through a zip archive, so a bundle
//! behaves the same in development and once published.

use super::manifest::{TemplateManifest, MANIFEST_FILE};
use crate::product::ProductConfig;
use anyhow::{Context, Result};
use rust_embed::RustEmbed;
use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};
use std::path::{Component, Path, PathBuf};
use url::Url;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

/// Bundles shipped inside the binary
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../templates/"]
#[prefix = ""]
#[exclude = "*.zip"]
struct EmbeddedTemplates;

/// Where a bundle is loaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    Embedded,
    Remote(Url),
    Local(PathBuf),
}

impl TemplateSource {
    /// The product's env override if set, else the embedded bundle
    pub fn from_config<C: ProductConfig>(config: &C) -> Result<Self> {
        match std::env::var(config.template_url_env()) {
            Ok(url_str) if !url_str.trim().is_empty() => {
                let url = Url::parse(url_str.trim())
                    .with_context(|| format!("Invalid template URL: {}", url_str))?;
                Ok(Self::Remote(url))
            }
            _ => Ok(Self::Embedded),
        }
    }

    pub fn local(path: PathBuf) -> Self {
        Self::Local(path)
    }
}

/// `/`-joined form of a relative path, or `None` if it is absolute or uses `..`
pub(crate) fn contained_path(path: &Path) -> Option<String> {
    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy()),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

/// An extracted bundle: manifest plus every file keyed by relative path
#[derive(Debug, Clone)]
pub struct TemplateBundle {
    manifest: TemplateManifest,
    files: BTreeMap<String, Vec<u8>>,
}

impl TemplateBundle {
    /// Assemble a bundle from `<bundle_name>/<path>` entries
    ///
    /// Entries outside `<bundle_name>/` are ignored. The manifest is parsed
    /// and removed from the file set.
    pub fn from_files<I>(bundle_name: &str, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, Vec<u8>)>,
    {
        let prefix = format!("{}/", bundle_name);
        let mut files: BTreeMap<String, Vec<u8>> = entries
            .into_iter()
            .filter_map(|(path, contents)| {
                path.strip_prefix(&prefix)
                    .map(|relative| (relative.to_string(), contents))
            })
            .collect();

        let manifest_bytes = files.remove(MANIFEST_FILE).ok_or_else(|| {
            anyhow::anyhow!("Bundle '{}' has no {}", bundle_name, MANIFEST_FILE)
        })?;
        let manifest = TemplateManifest::from_yaml(&String::from_utf8_lossy(&manifest_bytes))
            .with_context(|| format!("Failed to parse bundle '{}' manifest", bundle_name))?;

        Ok(Self { manifest, files })
    }

    pub fn manifest(&self) -> &TemplateManifest {
        &self.manifest
    }

    /// Contents of a single file
    pub fn file(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    /// Files below `dir`, as (path relative to `dir`, contents), sorted by path
    pub fn files_under<'a>(&'a self, dir: &str) -> Vec<(&'a str, &'a [u8])> {
        let prefix = format!("{}/", dir.trim_end_matches('/'));
        self.files
            .range(prefix.clone()..)
            .take_while(|(path, _)| path.starts_with(&prefix))
            .map(|(path, contents)| (&path[prefix.len()..], contents.as_slice()))
            .collect()
    }

    /// Every file path in the bundle, sorted
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }
}

/// Template fetcher - retrieves and caches one bundle
pub struct TemplateFetcher {
    source: TemplateSource,
    bundle_name: String,
    client: reqwest::Client,
    cache: Option<TemplateBundle>,
}

impl TemplateFetcher {
    /// Create a new fetcher with a custom user agent
    pub fn new(source: TemplateSource, bundle_name: &str, user_agent: &str) -> Self {
        Self {
            source,
            bundle_name: bundle_name.to_string(),
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            cache: None,
        }
    }

    pub fn from_config<C: ProductConfig>(config: &C) -> Result<Self> {
        let source = TemplateSource::from_config(config)?;
        Ok(Self::new(source, config.bundle_name(), config.user_agent()))
    }

    /// Create a fetcher for a local templates directory
    pub fn from_local(path: PathBuf, bundle_name: &str, user_agent: &str) -> Self {
        Self::new(TemplateSource::local(path), bundle_name, user_agent)
    }

    /// Build a URL by appending a path segment, preserving query parameters
    fn build_url(base: &Url, path_segment: &str) -> Result<Url> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("URL cannot have path segments: {}", base))?
            .pop_if_empty()
            .push(path_segment);
        Ok(url)
    }

    /// Zip `<template_dir>/<bundle_name>/` in memory
    ///
    /// Entries are stored as `<bundle_name>/<relative path>` in sorted order.
    pub fn build_local_zip(template_dir: &Path, bundle_name: &str) -> Result<Vec<u8>> {
        let bundle_path = template_dir.join(bundle_name);
        let manifest_path = bundle_path.join(MANIFEST_FILE);
        if !manifest_path.exists() {
            anyhow::bail!(
                "Bundle '{}' has no {} in {}",
                bundle_name,
                MANIFEST_FILE,
                bundle_path.display()
            );
        }

        let mut zip_buffer = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut zip_buffer));
            let options =
                SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

            for entry in WalkDir::new(&bundle_path).sort_by_file_name() {
                let entry = entry
                    .with_context(|| format!("Failed to walk {}", bundle_path.display()))?;
                if !entry.file_type().is_file() {
                    continue;
                }

                let relative = entry
                    .path()
                    .strip_prefix(&bundle_path)
                    .with_context(|| format!("{} escapes the bundle", entry.path().display()))?;
                let relative = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");

                let content = std::fs::read(entry.path())
                    .with_context(|| format!("Failed to read {}", entry.path().display()))?;
                zip.start_file(format!("{}/{}", bundle_name, relative), options)?;
                zip.write_all(&content)?;
            }

            zip.finish()?;
        }

        Ok(zip_buffer)
    }

    /// Read a bundle zip back into memory
    ///
    /// Entries that are absolute or climb out of the archive root are rejected.
    pub fn extract_zip(zip_bytes: &[u8], bundle_name: &str) -> Result<TemplateBundle> {
        let mut archive = ZipArchive::new(Cursor::new(zip_bytes))
            .with_context(|| format!("Failed to read zip archive for bundle '{}'", bundle_name))?;

        let mut entries = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }

            let path = file
                .enclosed_name()
                .and_then(|enclosed| contained_path(&enclosed))
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "Bundle '{}' zip has an unsafe entry: {}",
                        bundle_name,
                        file.name()
                    )
                })?;

            let mut contents = Vec::new();
            file.read_to_end(&mut contents)?;
            entries.push((path, contents));
        }

        TemplateBundle::from_files(bundle_name, entries)
    }

    /// Load a bundle compiled into the binary
    pub fn load_embedded(bundle_name: &str) -> Result<TemplateBundle> {
        let prefix = format!("{}/", bundle_name);
        let entries: Vec<(String, Vec<u8>)> = EmbeddedTemplates::iter()
            .filter(|path| path.starts_with(&prefix))
            .filter_map(|path| {
                EmbeddedTemplates::get(&path)
                    .map(|content| (path.to_string(), content.data.into_owned()))
            })
            .collect();

        TemplateBundle::from_files(bundle_name, entries)
            .with_context(|| format!("Bundle '{}' is not embedded in this build", bundle_name))
    }

    async fn download_zip(&self, base_url: &Url) -> Result<Vec<u8>> {
        let zip_url = Self::build_url(base_url, &format!("{}.zip", self.bundle_name))?;
        let response = self
            .client
            .get(zip_url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to fetch template bundle from {}", zip_url))?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Failed to fetch template bundle from {}: HTTP {}",
                zip_url,
                response.status()
            );
        }

        Ok(response.bytes().await?.to_vec())
    }

    /// Fetch (once) and return the bundle
    pub async fn bundle(&mut self) -> Result<&TemplateBundle> {
        if self.cache.is_none() {
            let bundle = match &self.source {
                TemplateSource::Embedded => Self::load_embedded(&self.bundle_name)?,
                TemplateSource::Remote(base_url) => {
                    let zip_bytes = self.download_zip(base_url).await?;
                    Self::extract_zip(&zip_bytes, &self.bundle_name)?
                }
                TemplateSource::Local(path) => {
                    let zip_bytes = Self::build_local_zip(path, &self.bundle_name)?;
                    Self::extract_zip(&zip_bytes, &self.bundle_name)?
                }
            };
            self.cache = Some(bundle);
        }

        self.cache
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Bundle '{}' not loaded", self.bundle_name))
    }

    pub fn source(&self) -> &TemplateSource {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    fn sample_dir() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "demo/template.yaml",
            "name: Demo\ndescription: demo bundle\nversion: 0.1.0\n",
        );
        write(dir.path(), "demo/README.md", "# {{ projectName }}\n");
        write(dir.path(), "demo/src/store/index.js", "export default {}\n");
        write(dir.path(), "demo/src/store/modules/a.js", "a\n");
        write(dir.path(), "demo/src/storefront.js", "not in store\n");
        dir
    }

    #[test]
    fn test_build_url_preserves_query() {
        let base = Url::parse("https://example.com/templates/?ref=main").unwrap();
        let url = TemplateFetcher::build_url(&base, "demo.zip").unwrap();
        assert_eq!(url.as_str(), "https://example.com/templates/demo.zip?ref=main");
    }

    #[test]
    fn test_local_zip_roundtrip_strips_manifest() {
        let dir = sample_dir();
        let zip = TemplateFetcher::build_local_zip(dir.path(), "demo").unwrap();
        let bundle = TemplateFetcher::extract_zip(&zip, "demo").unwrap();

        assert_eq!(bundle.manifest().name, "Demo");
        assert!(bundle.file(MANIFEST_FILE).is_none());
        assert_eq!(bundle.file("README.md"), Some(&b"# {{ projectName }}\n"[..]));
    }

    #[test]
    fn test_files_under_only_matches_whole_directory() {
        let dir = sample_dir();
        let zip = TemplateFetcher::build_local_zip(dir.path(), "demo").unwrap();
        let bundle = TemplateFetcher::extract_zip(&zip, "demo").unwrap();

        let names: Vec<_> = bundle.files_under("src/store").into_iter().map(|(p, _)| p).collect();
        assert_eq!(names, vec!["index.js", "modules/a.js"]);
        assert!(bundle.files_under("src/nothing").is_empty());
    }

    #[test]
    fn test_missing_bundle_dir_fails() {
        let dir = tempdir().unwrap();
        let err = TemplateFetcher::build_local_zip(dir.path(), "demo").unwrap_err();
        assert!(err.to_string().contains("template.yaml"));
    }

    #[test]
    fn test_local_zip_is_deterministic() {
        let dir = sample_dir();
        let a = TemplateFetcher::build_local_zip(dir.path(), "demo").unwrap();
        let b = TemplateFetcher::build_local_zip(dir.path(), "demo").unwrap();
        let a = TemplateFetcher::extract_zip(&a, "demo").unwrap();
        let b = TemplateFetcher::extract_zip(&b, "demo").unwrap();
        assert_eq!(a.paths().collect::<Vec<_>>(), b.paths().collect::<Vec<_>>());
    }

    fn zip_with(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut buffer = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
            for (name, contents) in entries {
                zip.start_file(*name, SimpleFileOptions::default()).unwrap();
                zip.write_all(contents.as_bytes()).unwrap();
            }
            zip.finish().unwrap();
        }
        buffer
    }

    #[test]
    fn test_extract_rejects_entries_climbing_out() {
        let manifest = "name: b\ndescription: b\nversion: 0.1.0\n";
        for name in [
            "b/src/components/../../../escaped.txt",
            "b/../escaped.txt",
            "/etc/escaped.txt",
        ] {
            let zip = zip_with(&[("b/template.yaml", manifest), (name, "x")]);
            let err = TemplateFetcher::extract_zip(&zip, "b").unwrap_err();
            assert!(err.to_string().contains("unsafe entry"), "{name}: {err}");
        }

        let zip = zip_with(&[("b/template.yaml", manifest), ("b/./src/ok.txt", "x")]);
        let bundle = TemplateFetcher::extract_zip(&zip, "b").unwrap();
        assert_eq!(bundle.paths().collect::<Vec<_>>(), vec!["src/ok.txt"]);
    }

    #[test]
    fn test_contained_path() {
        assert_eq!(contained_path(Path::new("a/./b")).as_deref(), Some("a/b"));
        assert_eq!(contained_path(Path::new("a/../b")), None);
        assert_eq!(contained_path(Path::new("/a")), None);
        assert_eq!(contained_path(Path::new("")), None);
    }

    #[test]
    fn test_from_files_ignores_other_bundles() {
        let bundle = TemplateBundle::from_files(
            "demo",
            vec![
                ("demo/template.yaml".to_string(), b"name: D\ndescription: d\nversion: 1.0.0\n".to_vec()),
                ("demo/a.txt".to_string(), b"a".to_vec()),
                ("other/b.txt".to_string(), b"b".to_vec()),
            ],
        )
        .unwrap();
        assert_eq!(bundle.paths().collect::<Vec<_>>(), vec!["a.txt"]);
        assert!(TemplateBundle::from_files("demo", Vec::new()).is_err());
    }

    #[test]
    fn test_embedded_starter_bundle_loads() {
        let bundle = TemplateFetcher::load_embedded("vue-starter").unwrap();
        assert_eq!(bundle.manifest().name, "Vue Starter");
        assert!(bundle.file("src/index.html").is_some());
        assert!(!bundle.files_under("src/store").is_empty());
        assert!(TemplateFetcher::load_embedded("no-such-bundle").is_err());
    }

    #[tokio::test]
    async fn test_fetcher_caches_local_bundle() {
        let dir = sample_dir();
        let mut fetcher = TemplateFetcher::from_local(dir.path().to_path_buf(), "demo", "test");
        assert_eq!(fetcher.bundle().await.unwrap().manifest().version, "0.1.0");

        // Cached: later edits on disk are not observed
        std::fs::remove_file(dir.path().join("demo/README.md")).unwrap();
        assert!(fetcher.bundle().await.unwrap().file("README.md").is_some());
    }
}
