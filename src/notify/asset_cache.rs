use log::{debug, info, warn};
use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

pub const CACHE_NAME: &str = "football-v4";
pub const ASSETS: [&str; 5] = [
    "/",
    "/index.html",
    "/manifest.json",
    "/icons/icon-192.png",
    "/icons/icon-512.png",
];
pub const OFFLINE_FALLBACK: &str = "/index.html";

#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    pub body: Vec<u8>,
    pub content_type: &'static str,
}

/// Named caches of app assets, filled once at install and served
/// cache-first with the disk as the "network".
pub struct AssetCache {
    root: PathBuf,
    caches: HashMap<String, HashMap<String, Asset>>,
}

impl AssetCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        AssetCache {
            root: root.into(),
            caches: HashMap::new(),
        }
    }

    pub fn open(&mut self, name: &str) -> &mut HashMap<String, Asset> {
        self.caches.entry(name.to_string()).or_default()
    }

    pub fn cache_names(&self) -> Vec<&str> {
        self.caches.keys().map(|x| x.as_str()).collect()
    }

    /// Pre-caches the manifest. Assets that cannot be read are skipped.
    pub fn install(&mut self) {
        let mut cached = 0;

        for path in ASSETS {
            match self.read_from_disk(path) {
                Some(asset) => {
                    self.open(CACHE_NAME).insert(path.to_string(), asset);
                    cached += 1;
                }
                None => debug!("Asset {} not available for pre-caching", path),
            }
        }

        info!("Installed cache {} with {}/{} assets", CACHE_NAME, cached, ASSETS.len());
    }

    /// Drops every cache but the current one.
    pub fn activate(&mut self) {
        let stale: Vec<String> = self
            .caches
            .keys()
            .filter(|name| name.as_str() != CACHE_NAME)
            .cloned()
            .collect();

        for name in stale {
            info!("Deleting stale cache {}", name);
            self.caches.remove(&name);
        }
    }

    fn lookup(&self, path: &str) -> Option<&Asset> {
        self.caches.values().find_map(|cache| cache.get(path))
    }

    pub fn fetch(&self, path: &str) -> Option<Asset> {
        if let Some(asset) = self.lookup(path) {
            return Some(asset.clone());
        }

        if let Some(asset) = self.read_from_disk(path) {
            return Some(asset);
        }

        warn!("Serving offline fallback for {}", path);
        self.lookup(OFFLINE_FALLBACK).cloned()
    }

    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return None;
        }

        let full = self.root.join(relative);
        if path.ends_with('/') || relative.as_os_str().is_empty() {
            Some(full.join("index.html"))
        } else {
            Some(full)
        }
    }

    fn read_from_disk(&self, path: &str) -> Option<Asset> {
        let file = self.resolve(path)?;
        let body = fs::read(&file).ok()?;

        Some(Asset {
            content_type: content_type(&file),
            body,
        })
    }
}

fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|x| x.to_str()) {
        Some("html") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}
