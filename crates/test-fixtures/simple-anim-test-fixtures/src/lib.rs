//! Shared JSON fixtures for simple-anim tests.
//!
//! Fixtures live under `fixtures/` at the workspace root and are indexed by
//! `fixtures/manifest.json`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    curves: HashMap<String, CurveEntry>,
    sequences: HashMap<String, String>,
}

/// A curve fixture: raw samples, optionally with the keys they should solve to.
#[derive(Debug, Deserialize)]
struct CurveEntry {
    samples: String,
    #[serde(default)]
    expected: Option<String>,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

pub mod curves {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.curves.keys().cloned().collect()
    }

    /// Raw `[[time, value], ...]` samples.
    pub fn samples(name: &str) -> Result<Vec<(f64, f64)>> {
        let entry = lookup(&MANIFEST.curves, "curve", name)?;
        super::load_json(&entry.samples)
    }

    pub fn expected_json(name: &str) -> Result<Option<String>> {
        let entry = lookup(&MANIFEST.curves, "curve", name)?;
        match &entry.expected {
            Some(rel) => read_to_string(rel).map(Some),
            None => Ok(None),
        }
    }

    pub fn expected<T: DeserializeOwned>(name: &str) -> Result<Option<T>> {
        let entry = lookup(&MANIFEST.curves, "curve", name)?;
        match &entry.expected {
            Some(rel) => super::load_json(rel).map(Some),
            None => Ok(None),
        }
    }
}

pub mod sequences {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.sequences.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.sequences, "sequence", name)?;
        read_to_string(rel)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let rel = lookup(&MANIFEST.sequences, "sequence", name)?;
        super::load_json(rel)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let rel = lookup(&MANIFEST.sequences, "sequence", name)?;
        Ok(resolve_path(rel))
    }
}
