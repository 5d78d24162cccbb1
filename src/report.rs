use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Write;

use crate::tldlist::TldList;
use crate::utils::format_number;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TldShare {
    pub tld: String,
    pub count: u64,
    /// Share of all counted entries, 0 to 100.
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub begin: NaiveDate,
    pub end: NaiveDate,
    /// Entries inside the window.
    pub total: u64,
    /// Well-formed entries dated outside the window.
    pub rejected: u64,
    /// Lines or visits that could not be parsed.
    pub skipped: u64,
    /// Ascending by domain.
    pub tlds: Vec<TldShare>,
}

impl Report {
    pub fn from_list(list: &TldList<NaiveDate>, rejected: u64, skipped: u64) -> Self {
        let total = list.count();
        let tlds = list
            .iter()
            .map(|node| TldShare {
                tld: node.tld().into_owned(),
                count: node.count(),
                percent: if total == 0 {
                    0.0
                } else {
                    100.0 * node.count() as f64 / total as f64
                },
            })
            .collect();
        let (begin, end) = list.window();
        Report {
            begin: *begin,
            end: *end,
            total,
            rejected,
            skipped,
            tlds,
        }
    }

    /// The `n` most frequent domains, ties broken by domain.
    pub fn top(&self, n: usize) -> Vec<&TldShare> {
        let mut sorted: Vec<&TldShare> = self.tlds.iter().collect();
        sorted.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tld.cmp(&b.tld)));
        sorted.truncate(n);
        sorted
    }

    pub fn render_text(&self, top: Option<usize>, date_format: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} of {} entries counted between {} and {}",
            format_number(self.total),
            format_number(self.total + self.rejected),
            self.begin.format(date_format),
            self.end.format(date_format),
        );
        if self.skipped > 0 {
            let _ = writeln!(out, "{} malformed entries skipped", format_number(self.skipped));
        }

        let shares = match top {
            Some(n) => self.top(n),
            None => self.tlds.iter().collect(),
        };
        for share in shares {
            let _ = writeln!(out, "{:6.2} {}", share.percent, share.tld);
        }
        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
