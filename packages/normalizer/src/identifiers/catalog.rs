//! Identifier crosswalk built from NIST correlation coefficient files.
//!
//! The allascii tables do not carry NIST's short identifiers. The
//! correlation coefficient files do, on lines such as
//! `mec2mev  --- electron mass energy equivalent in MeV`, so collecting those
//! across every version gives the id → names crosswalk.

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use regex::Regex;

use super::resolver::IdentifierResolver;

/// `id --- name` line in a correlation coefficient file.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ID_NAME_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\S+)\s*---\s*(.+)").expect("valid regex"));

/// Entries missing from every correlation file.
const KNOWN_ENTRIES: [(&str, &str); 5] = [
    ("Ae", "atomic unit of charge"),
    ("charge90", "conventional value of coulomb-90"),
    ("e", "elementary charge"),
    ("ral", "alpha particle rms charge radius"),
    ("mtauc2mev", "tau mass energy equivalent in MeV"),
];

/// Alternate names the correlation files never used.
const EXTRA_NAMES: [(&str, &str); 1] = [("d220sil", "{220} lattice spacing of silicon")];

/// Heading text picked up as an id by the line pattern.
const ROGUE_IDS: [&str; 1] = ["Constants"];

/// Extract `(id, name)` pairs from a correlation coefficient file, in file order.
///
/// # Examples
/// ```
/// use codata_normalizer::identifiers::parse_correlation_names;
///
/// let text = "  alph     --- fine-structure constant\n  0.1  0.2\n";
/// assert_eq!(
///     parse_correlation_names(text),
///     vec![("alph".to_string(), "fine-structure constant".to_string())]
/// );
/// ```
#[must_use]
pub fn parse_correlation_names(text: &str) -> Vec<(String, String)> {
    text.lines()
        .filter(|line| line.contains("---"))
        .filter_map(|line| {
            let caps = ID_NAME_LINE.captures(line)?;
            let id = caps.get(1)?.as_str().to_string();
            let name = caps.get(2)?.as_str().trim().to_string();
            Some((id, name))
        })
        .collect()
}

/// Known NIST identifiers and every name each has been published under.
///
/// The first name of an id is its preferred (most recent) one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierCatalog {
    ids: BTreeMap<String, Vec<String>>,
    names: HashMap<String, String>,
}

impl IdentifierCatalog {
    /// Build the catalog from the `(id, name)` pairs of each year.
    ///
    /// Years are visited newest first whatever the input order, so the most
    /// recent name of an id is its preferred one.
    #[must_use]
    pub fn build<I>(per_year: I) -> Self
    where
        I: IntoIterator<Item = (i32, Vec<(String, String)>)>,
    {
        let mut ids: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (id, name) in KNOWN_ENTRIES {
            ids.insert(id.to_string(), vec![name.to_string()]);
        }

        let mut years: Vec<_> = per_year.into_iter().collect();
        years.sort_by(|a, b| b.0.cmp(&a.0));

        for (year, pairs) in years {
            tracing::debug!(year, entries = pairs.len(), "Collecting identifiers");
            for (id, name) in pairs {
                add_name(&mut ids, id, name);
            }
        }

        for (id, name) in EXTRA_NAMES {
            if let Some(names) = ids.get_mut(id) {
                if !names.iter().any(|n| n == name) {
                    names.push(name.to_string());
                }
            }
        }
        for id in ROGUE_IDS {
            ids.remove(id);
        }

        Self::from_ids(ids)
    }

    /// Build from an existing id → names map (e.g. a saved `nist_ids.json`).
    #[must_use]
    pub fn from_ids(ids: BTreeMap<String, Vec<String>>) -> Self {
        let mut names = HashMap::new();
        for (id, id_names) in &ids {
            for name in id_names {
                names.insert(name.clone(), id.clone());
            }
        }
        Self { ids, names }
    }

    /// Id → names, sorted by id.
    #[must_use]
    pub fn ids(&self) -> &BTreeMap<String, Vec<String>> {
        &self.ids
    }

    /// Names of an id, preferred first.
    #[must_use]
    pub fn names_of(&self, id: &str) -> Option<&[String]> {
        self.ids.get(id).map(Vec::as_slice)
    }

    /// Exact-name lookup.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.names.get(name).map(String::as_str)
    }

    /// `(id, name)` rows, one per name.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &str)> {
        self.ids
            .iter()
            .flat_map(|(id, names)| names.iter().map(move |name| (id.as_str(), name.as_str())))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl IdentifierResolver for IdentifierCatalog {
    fn resolve(&self, name: &str) -> Option<String> {
        self.lookup(name).map(String::from)
    }
}

fn add_name(ids: &mut BTreeMap<String, Vec<String>>, id: String, name: String) {
    let names = ids.entry(id).or_default();
    if !names.contains(&name) {
        names.push(name);
    }
}
