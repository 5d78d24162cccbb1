use chrono::NaiveDate;
use tracing::trace;

use crate::domain::extract_tld;
use crate::error::TldError;
use crate::iter::Iter;
use crate::node::Node;
use crate::tree::CountingTree;

/// Whether an entry passed to [`TldList::add`] was counted.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Added {
    Counted,
    /// The entry's date fell outside the list's window. Nothing changed.
    Rejected,
}

impl Added {
    pub fn is_counted(self) -> bool {
        self == Added::Counted
    }
}

/// Suffix counts for log entries dated within an inclusive window.
///
/// Any totally ordered type works as the date; the list only ever compares
/// dates, never inspects them.
#[derive(Debug, Clone)]
pub struct TldList<D = NaiveDate> {
    tree: CountingTree,
    begin: D,
    end: D,
    total: u64,
}

impl<D: Ord> TldList<D> {
    /// An empty list counting entries dated in `[begin, end]`.
    pub fn new(begin: D, end: D) -> Result<Self, TldError> {
        if begin > end {
            return Err(TldError::InvalidRange);
        }
        Ok(TldList {
            tree: CountingTree::new(),
            begin,
            end,
            total: 0,
        })
    }

    pub fn contains(&self, date: &D) -> bool {
        *date >= self.begin && *date <= self.end
    }

    /// Count the suffix of `hostname` if `date` lies within the window.
    pub fn add(&mut self, hostname: impl AsRef<[u8]>, date: &D) -> Added {
        if !self.contains(date) {
            trace!(action = "reject", component = "tld_list", "Entry outside date window");
            return Added::Rejected;
        }
        let tld = extract_tld(hostname.as_ref());
        self.tree.insert_or_increment(tld);
        self.total += 1;
        trace!(action = "count", component = "tld_list", tld = %String::from_utf8_lossy(tld), "Entry counted");
        Added::Counted
    }

    /// [`add`](Self::add) that reports allocation failure instead of aborting.
    /// On error the list is left unchanged.
    pub fn try_add(&mut self, hostname: impl AsRef<[u8]>, date: &D) -> Result<Added, TldError> {
        if !self.contains(date) {
            return Ok(Added::Rejected);
        }
        self.tree.try_insert(extract_tld(hostname.as_ref()))?;
        self.total += 1;
        Ok(Added::Counted)
    }

    /// Number of counted entries since creation.
    pub fn count(&self) -> u64 {
        self.total
    }

    /// Number of distinct suffixes counted.
    pub fn distinct(&self) -> usize {
        self.tree.len()
    }

    pub fn window(&self) -> (&D, &D) {
        (&self.begin, &self.end)
    }

    pub fn get(&self, tld: impl AsRef<[u8]>) -> Option<&Node> {
        self.tree.get(tld.as_ref())
    }

    pub fn tree(&self) -> &CountingTree {
        &self.tree
    }

    /// Suffixes in ascending byte order with their counts.
    pub fn iter(&self) -> Iter<'_> {
        self.tree.iter()
    }
}

impl<'a, D: Ord> IntoIterator for &'a TldList<D> {
    type Item = &'a Node;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
