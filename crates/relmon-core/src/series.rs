//! Human-readable series formatting ("a, b, and 3 others").

use std::collections::BTreeSet;

/// Render `items` as an English series.
///
/// Items are de-duplicated and sorted. Up to `limit` items are listed in
/// full; beyond that the first `limit - 1` are listed and the remainder is
/// summarised as `"<n> others"`. Two entries join with `" and "`; three or
/// more use commas with a final `", and "`. A `limit` of zero behaves like 1.
pub fn format_series<I, S>(items: I, limit: usize) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let unique: BTreeSet<String> = items
        .into_iter()
        .map(|item| item.as_ref().to_string())
        .collect();
    let limit = limit.max(1);

    let mut shown: Vec<String> = if unique.len() <= limit {
        unique.into_iter().collect()
    } else {
        let hidden = unique.len() - (limit - 1);
        let mut head: Vec<String> = unique.into_iter().take(limit - 1).collect();
        head.push(format!("{hidden} others"));
        head
    };

    match shown.len() {
        0 => String::new(),
        1 => shown.remove(0),
        2 => format!("{} and {}", shown[0], shown[1]),
        n => {
            let last = shown.remove(n - 1);
            format!("{}, and {}", shown.join(", "), last)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_single() {
        assert_eq!(format_series(Vec::<String>::new(), 3), "");
        assert_eq!(format_series(["f40"], 3), "f40");
    }

    #[test]
    fn two_items_have_no_comma() {
        assert_eq!(format_series(["f41", "f40"], 3), "f40 and f41");
    }

    #[test]
    fn three_items_use_oxford_comma() {
        assert_eq!(format_series(["c", "a", "b"], 3), "a, b, and c");
    }

    #[test]
    fn duplicates_collapse() {
        assert_eq!(format_series(["a", "a", "b"], 3), "a and b");
    }

    #[test]
    fn overflow_summarises_remainder() {
        assert_eq!(
            format_series(["e", "d", "c", "b", "a"], 3),
            "a, b, and 3 others"
        );
        assert_eq!(format_series(["a", "b", "c"], 2), "a and 2 others");
    }

    #[test]
    fn zero_limit_acts_as_one() {
        assert_eq!(format_series(["a", "b"], 0), "2 others");
    }
}
