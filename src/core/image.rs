//! Image reference resolution with an ordered fallback chain.
//!
//! A raw reference is expanded into a fixed list of candidate fetch URLs.
//! A cursor walks that list, advancing only when the current candidate is
//! reported as failed, and ends in [`Fallback::Exhausted`].

use regex::Regex;
use std::sync::OnceLock;

const DRIVE_FILE_PATTERN: &str = r"https://drive\.google\.com/file/d/([a-zA-Z0-9_-]+)";

fn drive_file_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(DRIVE_FILE_PATTERN).expect("drive pattern is valid"))
}

/// File id of a shared-drive link such as `https://drive.google.com/file/d/<ID>/view`.
pub fn extract_drive_id(url: &str) -> Option<&str> {
    drive_file_regex()
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Ordered fetch candidates for a raw reference. Empty for blank input.
/// A reference that is not a drive link is its own single candidate, as is.
pub fn candidates(url: &str) -> Vec<String> {
    if url.trim().is_empty() {
        return Vec::new();
    }
    match extract_drive_id(url) {
        Some(id) => vec![
            format!("https://drive.google.com/thumbnail?id={id}&sz=w1000"),
            format!("https://drive.google.com/thumbnail?id={id}&sz=w2000"),
            format!("https://drive.google.com/uc?export=view&id={id}"),
        ],
        None => vec![url.to_string()],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    Trying(usize),
    Loaded(usize),
    Exhausted,
}

/// What the image pane should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageView<'a> {
    NoImage,
    Loading {
        candidate: &'a str,
        attempt: usize,
        total: usize,
    },
    Loaded {
        candidate: &'a str,
    },
    /// Every candidate failed; the original reference is offered for
    /// opening elsewhere.
    Exhausted {
        original: &'a str,
    },
}

#[derive(Debug, Clone)]
pub struct ImageResolver {
    original: String,
    candidates: Vec<String>,
    state: Fallback,
    generation: u64,
}

impl Default for ImageResolver {
    fn default() -> Self {
        Self::new("")
    }
}

impl ImageResolver {
    pub fn new(url: &str) -> Self {
        let candidates = candidates(url);
        Self {
            original: url.to_string(),
            state: initial_state(&candidates),
            candidates,
            generation: 0,
        }
    }

    /// Points the resolver at a new reference. Any change restarts the chain
    /// at the first candidate; returns whether the reference changed.
    pub fn set_url(&mut self, url: &str) -> bool {
        if url == self.original {
            return false;
        }
        self.original = url.to_string();
        self.candidates = candidates(url);
        self.state = initial_state(&self.candidates);
        self.generation = self.generation.wrapping_add(1);
        true
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn state(&self) -> Fallback {
        self.state
    }

    /// Bumped on every reference change; tags outstanding load attempts.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Candidate currently being attempted, with its index.
    pub fn pending(&self) -> Option<(usize, &str)> {
        match self.state {
            Fallback::Trying(idx) => self.candidates.get(idx).map(|c| (idx, c.as_str())),
            _ => None,
        }
    }

    pub fn report_failure(&mut self) {
        if let Fallback::Trying(idx) = self.state {
            self.state = if idx + 1 < self.candidates.len() {
                Fallback::Trying(idx + 1)
            } else {
                Fallback::Exhausted
            };
        }
    }

    pub fn report_success(&mut self) {
        if let Fallback::Trying(idx) = self.state {
            self.state = Fallback::Loaded(idx);
        }
    }

    /// Applies a load outcome only if it belongs to the candidate currently
    /// being attempted for the current reference. Returns whether it applied.
    pub fn report(&mut self, generation: u64, index: usize, loaded: bool) -> bool {
        if generation != self.generation || self.state != Fallback::Trying(index) {
            return false;
        }
        if loaded {
            self.report_success();
        } else {
            self.report_failure();
        }
        true
    }

    pub fn view(&self) -> ImageView<'_> {
        if self.candidates.is_empty() {
            return ImageView::NoImage;
        }
        match self.state {
            Fallback::Trying(idx) => ImageView::Loading {
                candidate: &self.candidates[idx],
                attempt: idx + 1,
                total: self.candidates.len(),
            },
            Fallback::Loaded(idx) => ImageView::Loaded {
                candidate: &self.candidates[idx],
            },
            Fallback::Exhausted => ImageView::Exhausted {
                original: &self.original,
            },
        }
    }
}

fn initial_state(candidates: &[String]) -> Fallback {
    if candidates.is_empty() {
        Fallback::Exhausted
    } else {
        Fallback::Trying(0)
    }
}
