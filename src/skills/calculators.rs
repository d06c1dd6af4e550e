//! Skill calculators.
//!
//! Each calculator returns the skill's absolute xp. A cycle lists the vault
//! once into a [`VaultListing`] that every calculator shares. Text is always
//! read through the [`ContentCache`], so the four calculators that scan notes
//! share one read per note within a cycle.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::Result;
use crate::skills::SkillKind;
use crate::vault::{ContentCache, Vault, VaultFile};

/// Xp per note for Archivist.
pub const XP_PER_DOCUMENT: u64 = 8;
/// Xp per file for Hoarder.
pub const XP_PER_FILE: u64 = 8;
/// Xp per non-note file for Curator.
pub const XP_PER_ATTACHMENT: u64 = 5;
/// Words per Scribe xp point, counted per note.
pub const WORDS_PER_XP: u64 = 100;

fn link_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\[\[.*?\]\]").expect("link pattern is valid"))
}

fn completed_task_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"- \[x\]").expect("task pattern is valid"))
}

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"#(\w+)").expect("tag pattern is valid"))
}

/// Whitespace-delimited token count.
pub fn word_count(text: &str) -> u64 {
    text.split_whitespace().count() as u64
}

/// Number of `[[...]]` links, counting repeats.
pub fn link_count(text: &str) -> u64 {
    link_pattern().find_iter(text).count() as u64
}

/// Number of `- [x]` completed task markers.
pub fn completed_task_count(text: &str) -> u64 {
    completed_task_pattern().find_iter(text).count() as u64
}

/// Add every `#tag` in `text` to `tags`, lowercased.
pub fn collect_tags(text: &str, tags: &mut HashSet<String>) {
    for captures in tag_pattern().captures_iter(text) {
        tags.insert(captures[1].to_lowercase());
    }
}

/// One listing of the vault, shared by every calculator of a cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VaultListing {
    /// Every file, of any type.
    pub files: Vec<VaultFile>,
    /// The files carrying the document extension.
    pub documents: Vec<VaultFile>,
}

impl VaultListing {
    /// List `vault` once and split out its text documents.
    pub async fn load<V: Vault + ?Sized>(vault: &V) -> Result<Self> {
        let files = vault.files().await?;
        let extension = vault.document_extension();
        let documents = files
            .iter()
            .filter(|file| file.extension == extension)
            .cloned()
            .collect();
        Ok(Self { files, documents })
    }

    /// Files that are not text documents.
    pub fn attachment_count(&self) -> usize {
        self.files.len() - self.documents.len()
    }
}

/// Scribe: one xp per full hundred words, per note.
pub async fn scribe<V: Vault + ?Sized>(
    vault: &V,
    listing: &VaultListing,
    cache: &ContentCache,
) -> Result<u64> {
    let mut xp = 0;
    for doc in &listing.documents {
        let text = cache.get(vault, doc).await?;
        xp += word_count(&text) / WORDS_PER_XP;
    }
    Ok(xp)
}

/// Archivist: a flat amount per note.
pub fn archivist(listing: &VaultListing) -> u64 {
    XP_PER_DOCUMENT * listing.documents.len() as u64
}

/// Hoarder: a flat amount per file of any type.
pub fn hoarder(listing: &VaultListing) -> u64 {
    XP_PER_FILE * listing.files.len() as u64
}

/// Curator: a flat amount per file that is not a note.
pub fn curator(listing: &VaultListing) -> u64 {
    XP_PER_ATTACHMENT * listing.attachment_count() as u64
}

/// Connector: one xp per internal link.
pub async fn connector<V: Vault + ?Sized>(
    vault: &V,
    listing: &VaultListing,
    cache: &ContentCache,
) -> Result<u64> {
    let mut xp = 0;
    for doc in &listing.documents {
        xp += link_count(&cache.get(vault, doc).await?);
    }
    Ok(xp)
}

/// Taskmaster: one xp per completed task.
pub async fn taskmaster<V: Vault + ?Sized>(
    vault: &V,
    listing: &VaultListing,
    cache: &ContentCache,
) -> Result<u64> {
    let mut xp = 0;
    for doc in &listing.documents {
        xp += completed_task_count(&cache.get(vault, doc).await?);
    }
    Ok(xp)
}

/// Researcher: one xp per distinct tag across the whole vault.
pub async fn researcher<V: Vault + ?Sized>(
    vault: &V,
    listing: &VaultListing,
    cache: &ContentCache,
) -> Result<u64> {
    let mut tags = HashSet::new();
    for doc in &listing.documents {
        collect_tags(&cache.get(vault, doc).await?, &mut tags);
    }
    Ok(tags.len() as u64)
}

/// Run the calculator for a single skill against an existing listing.
///
/// Total Level has no calculator and always yields 0 here; the registry
/// derives it from the other skills.
pub async fn compute<V: Vault + ?Sized>(
    kind: SkillKind,
    vault: &V,
    listing: &VaultListing,
    cache: &ContentCache,
) -> Result<u64> {
    match kind {
        SkillKind::Scribe => scribe(vault, listing, cache).await,
        SkillKind::Archivist => Ok(archivist(listing)),
        SkillKind::Hoarder => Ok(hoarder(listing)),
        SkillKind::Curator => Ok(curator(listing)),
        SkillKind::Connector => connector(vault, listing, cache).await,
        SkillKind::Taskmaster => taskmaster(vault, listing, cache).await,
        SkillKind::Researcher => researcher(vault, listing, cache).await,
        SkillKind::TotalLevel => Ok(0),
    }
}

/// List the vault once, then run all seven calculators concurrently and wait
/// for every one.
///
/// The first failure aborts the join; no partial results are returned.
pub async fn compute_all<V: Vault + ?Sized>(
    vault: &V,
    cache: &ContentCache,
) -> Result<Vec<(SkillKind, u64)>> {
    let listing = VaultListing::load(vault).await?;
    tracing::debug!(
        files = listing.files.len(),
        documents = listing.documents.len(),
        "vault listed"
    );

    let (scribe, archivist, hoarder, curator, connector, taskmaster, researcher) = tokio::try_join!(
        compute(SkillKind::Scribe, vault, &listing, cache),
        compute(SkillKind::Archivist, vault, &listing, cache),
        compute(SkillKind::Hoarder, vault, &listing, cache),
        compute(SkillKind::Curator, vault, &listing, cache),
        compute(SkillKind::Connector, vault, &listing, cache),
        compute(SkillKind::Taskmaster, vault, &listing, cache),
        compute(SkillKind::Researcher, vault, &listing, cache),
    )?;

    Ok(vec![
        (SkillKind::Scribe, scribe),
        (SkillKind::Archivist, archivist),
        (SkillKind::Hoarder, hoarder),
        (SkillKind::Curator, curator),
        (SkillKind::Connector, connector),
        (SkillKind::Taskmaster, taskmaster),
        (SkillKind::Researcher, researcher),
    ])
}
