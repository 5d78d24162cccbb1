//! End-to-end behaviour of the window-bounded TLD list.

use chrono::NaiveDate;
use tldcount::{Added, Node, TldError, TldList};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn listing(list: &TldList) -> Vec<(String, u64)> {
    list.iter()
        .map(|n| (n.tld().into_owned(), n.count()))
        .collect()
}

#[test]
fn january_window_counts_and_orders() {
    let mut list = TldList::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();
    assert_eq!(list.add("foo.com", &date(2024, 1, 15)), Added::Counted);
    assert_eq!(list.add("bar.org", &date(2024, 1, 20)), Added::Counted);
    assert_eq!(list.add("baz.com", &date(2024, 2, 1)), Added::Rejected);
    assert_eq!(list.count(), 2);
    assert_eq!(listing(&list), [("com".to_string(), 1), ("org".to_string(), 1)]);

    assert_eq!(list.add("x.com", &date(2024, 1, 16)), Added::Counted);
    assert_eq!(list.count(), 3);
    assert_eq!(listing(&list), [("com".to_string(), 2), ("org".to_string(), 1)]);
}

#[test]
fn empty_list_has_nothing_to_enumerate() {
    let list = TldList::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();
    let mut iter = list.iter();
    assert!(iter.next().is_none());
    assert!(iter.next().is_none());
}

#[test]
fn dotless_hostname_is_counted_whole() {
    let mut list = TldList::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();
    assert!(list.add("intranet", &date(2024, 1, 5)).is_counted());
    assert_eq!(listing(&list), [("intranet".to_string(), 1)]);
}

#[test]
fn single_day_window_is_inclusive() {
    let day = date(2024, 1, 10);
    let mut list = TldList::new(day, day).unwrap();
    assert!(list.add("h.example", &day).is_counted());
    assert!(!list.add("h.example", &date(2024, 1, 11)).is_counted());
    assert_eq!(list.count(), 1);
}

#[test]
fn reversed_window_is_refused() {
    assert_eq!(
        TldList::new(date(2024, 1, 31), date(2024, 1, 1)).unwrap_err(),
        TldError::InvalidRange
    );
}

#[test]
fn many_hosts_sum_to_count() {
    let mut list = TldList::new(date(2024, 1, 1), date(2024, 12, 31)).unwrap();
    let tlds = ["com", "org", "net", "io", "uk", "de", "fr", "jp"];
    for i in 0..5000u32 {
        let host = format!("host{}.example.{}", i, tlds[(i as usize * 7) % tlds.len()]);
        let day = date(2024, 1 + i % 13 % 12, 1);
        let _ = list.add(&host, &day);
    }
    assert_eq!(list.count(), 5000);
    assert_eq!(list.distinct(), tlds.len());
    assert_eq!(list.iter().map(Node::count).sum::<u64>(), list.count());
    list.tree().check_invariants().unwrap();
}
