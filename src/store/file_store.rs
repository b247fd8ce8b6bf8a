use std::collections::BTreeMap;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;
use tracing::warn;

use super::AccountWatch;
use super::PatternWatch;
use super::RuleBook;
use super::WatchStore;
use crate::constants::A1_KEYWORD_FILE;
use crate::constants::A9_KEYWORD_FILE;
use crate::constants::ACCOUNT_WATCH_FILE;
use crate::constants::CALLSIGN_WATCH_FILE;
use crate::constants::FAKE_NAME_FILE;
use crate::constants::HIGHEST_ACCOUNT_FILE;
use crate::constants::POLICY_ALERT_FILE;
use crate::constants::SEEN_ADVISORY_FILE;
use crate::constants::SEEN_BULLETIN_FILE;
use crate::constants::TYPE_WATCH_FILE;
use crate::StoreConfig;
use crate::StoreError;
use crate::Result;

/// JSON documents under the data directory, one per watch type.
///
/// Labeled watch lists are stored as pattern-to-label objects; keyword and
/// fake-name lists accept either a bare array or an object wrapping it, for
/// compatibility with hand-edited documents.
#[derive(Clone)]
pub struct FileWatchStore {
    data_dir: PathBuf,
}

/// A list document: either `["A", "B"]` or `{"items": ["A", "B"]}`.
/// Legacy documents wrapped under "keywords" or "fake_names" still parse.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListDocument {
    Bare(Vec<String>),
    Wrapped {
        #[serde(alias = "keywords", alias = "fake_names")]
        items: Vec<String>,
    },
}

impl ListDocument {
    fn into_items(self) -> Vec<String> {
        match self {
            ListDocument::Bare(items) => items,
            ListDocument::Wrapped { items } => items,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct MuteDocument {
    #[serde(default)]
    muted: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct HighWaterDocument {
    #[serde(default)]
    highest: u64,
}

/// Advisory monitor state: the mute flag and the already-alerted event keys
/// share one document so a seen-set write never clobbers the flag.
#[derive(Debug, Default, Serialize, Deserialize)]
struct AdvisoryStateDocument {
    #[serde(default)]
    muted: bool,
    #[serde(default)]
    seen_events: Vec<String>,
}

impl FileWatchStore {
    pub fn new(settings: &StoreConfig) -> Self {
        Self {
            data_dir: settings.data_dir.clone(),
        }
    }

    fn path(
        &self,
        name: &str,
    ) -> PathBuf {
        self.data_dir.join(name)
    }

    /// Reads and parses one document. A missing file is `None`; a malformed
    /// file is logged and treated the same way.
    fn read_document<T: DeserializeOwned>(
        &self,
        name: &str,
    ) -> Option<T> {
        let path = self.path(name);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("failed to read store document {:?}: {}", path, e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("malformed store document {:?}: {}", path, e);
                None
            }
        }
    }

    fn write_document<T: Serialize>(
        &self,
        name: &str,
        value: &T,
    ) -> Result<()> {
        fs::create_dir_all(&self.data_dir).map_err(StoreError::Io)?;
        let raw = serde_json::to_string_pretty(value).map_err(|source| StoreError::Malformed {
            name: name.to_string(),
            source,
        })?;
        fs::write(self.path(name), raw).map_err(StoreError::Io)?;
        Ok(())
    }

    fn labeled_watches(
        &self,
        name: &str,
    ) -> Vec<PatternWatch> {
        let map: BTreeMap<String, String> = self.read_document(name).unwrap_or_default();
        map.into_iter()
            .map(|(pattern, label)| PatternWatch { pattern, label })
            .collect()
    }

    fn list(
        &self,
        name: &str,
    ) -> Vec<String> {
        self.read_document::<ListDocument>(name)
            .map(ListDocument::into_items)
            .unwrap_or_default()
    }

    fn seen_set(
        &self,
        name: &str,
    ) -> HashSet<String> {
        self.list(name).into_iter().collect()
    }

    fn record_seen_set(
        &self,
        name: &str,
        seen: &HashSet<String>,
    ) -> Result<()> {
        let mut items: Vec<&String> = seen.iter().collect();
        items.sort();
        self.write_document(name, &items)
    }
}

impl WatchStore for FileWatchStore {
    fn account_watches(&self) -> Vec<AccountWatch> {
        let map: BTreeMap<String, String> = self.read_document(ACCOUNT_WATCH_FILE).unwrap_or_default();
        map.into_iter()
            .filter_map(|(cid, label)| match cid.parse::<u64>() {
                Ok(cid) => Some(AccountWatch { cid, label }),
                Err(_) => {
                    warn!("ignoring account watch with non-numeric id {:?}", cid);
                    None
                }
            })
            .collect()
    }

    fn callsign_watches(&self) -> Vec<PatternWatch> {
        self.labeled_watches(CALLSIGN_WATCH_FILE)
    }

    fn type_watches(&self) -> Vec<PatternWatch> {
        self.labeled_watches(TYPE_WATCH_FILE)
    }

    fn keyword_watches(
        &self,
        book: RuleBook,
    ) -> Vec<String> {
        match book {
            RuleBook::A1 => self.list(A1_KEYWORD_FILE),
            RuleBook::A9 => self.list(A9_KEYWORD_FILE),
        }
    }

    fn fake_name_patterns(&self) -> Vec<String> {
        self.list(FAKE_NAME_FILE)
    }

    fn policy_alerts_muted(&self) -> bool {
        // Muted unless the document explicitly says otherwise
        self.read_document::<MuteDocument>(POLICY_ALERT_FILE)
            .map(|doc| doc.muted)
            .unwrap_or(true)
    }

    fn advisories_muted(&self) -> bool {
        self.read_document::<AdvisoryStateDocument>(SEEN_ADVISORY_FILE)
            .map(|doc| doc.muted)
            .unwrap_or(false)
    }

    fn highest_account(&self) -> u64 {
        self.read_document::<HighWaterDocument>(HIGHEST_ACCOUNT_FILE)
            .map(|doc| doc.highest)
            .unwrap_or(0)
    }

    fn record_highest_account(
        &self,
        cid: u64,
    ) -> Result<()> {
        self.write_document(HIGHEST_ACCOUNT_FILE, &HighWaterDocument { highest: cid })
    }

    fn seen_advisories(&self) -> HashSet<String> {
        self.read_document::<AdvisoryStateDocument>(SEEN_ADVISORY_FILE)
            .map(|doc| doc.seen_events.into_iter().collect())
            .unwrap_or_default()
    }

    fn record_seen_advisories(
        &self,
        seen: &HashSet<String>,
    ) -> Result<()> {
        // Read-modify-write so the mute flag survives seen-set updates
        let mut doc: AdvisoryStateDocument =
            self.read_document(SEEN_ADVISORY_FILE).unwrap_or_default();
        doc.seen_events = seen.iter().cloned().collect();
        doc.seen_events.sort();
        self.write_document(SEEN_ADVISORY_FILE, &doc)
    }

    fn seen_bulletins(&self) -> HashSet<String> {
        self.seen_set(SEEN_BULLETIN_FILE)
    }

    fn record_seen_bulletins(
        &self,
        seen: &HashSet<String>,
    ) -> Result<()> {
        self.record_seen_set(SEEN_BULLETIN_FILE, seen)
    }
}
