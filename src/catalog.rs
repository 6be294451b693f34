use crate::config::FilterConfig;
use crate::model::AppEntry;
use crate::sources::SourceOutcome;
use log::{debug, warn};
use regex::Regex;
use std::collections::HashSet;

/// Names that linger in the Start menu cache after an uninstall.
pub const GHOST_APPS: &[&str] = &["google chrome"];

/// Names and patterns that never make it into the catalog.
#[derive(Debug, Clone, Default)]
pub struct Denylist {
    names: HashSet<String>,
    patterns: Vec<Regex>,
}

impl Denylist {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names.into_iter().map(|n| n.as_ref().trim().to_lowercase()).collect(),
            patterns: Vec::new(),
        }
    }

    /// Built-in ghosts plus whatever the config adds. Bad regexes are skipped.
    pub fn from_config(config: &FilterConfig) -> Self {
        let extra = config.denylist.iter().map(String::as_str);
        let mut denylist = Self::new(GHOST_APPS.iter().copied().chain(extra));
        denylist.patterns = config
            .exclude_patterns
            .iter()
            .filter_map(|p| match Regex::new(p) {
                Ok(re) => Some(re),
                Err(err) => {
                    warn!("Ignoring exclude pattern {:?}: {}", p, err);
                    None
                }
            })
            .collect();
        denylist
    }

    pub fn contains(&self, entry: &AppEntry) -> bool {
        self.names.contains(&entry.fold_key())
            || self.patterns.iter().any(|re| re.is_match(&entry.name))
    }
}

/// Combines collector outputs in priority order. The first entry seen for a
/// case-folded name wins; the result is sorted by case-folded name.
pub fn merge(outcomes: &[SourceOutcome], denylist: &Denylist) -> Vec<AppEntry> {
    let mut seen = HashSet::new();
    let mut apps = Vec::new();

    for outcome in outcomes {
        for entry in outcome.entries() {
            if entry.name.trim().is_empty() {
                continue;
            }
            if denylist.contains(entry) {
                debug!("Dropping denylisted {:?} from {}", entry.name, outcome.source);
                continue;
            }
            if !seen.insert(entry.fold_key()) {
                continue;
            }
            apps.push(entry.clone());
        }
    }

    apps.sort_by_cached_key(AppEntry::fold_key);
    apps
}
