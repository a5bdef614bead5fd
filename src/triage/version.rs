//! Extraction of i3 version numbers out of free-form issue text.

use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

/// `<product>[:] [version|v|vers|ver][:] <version>`, where the version is either an old
/// `3.<letter>` release or `MAJOR.MINOR`.
static VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(i3|i3status|i3lock):?\s*(?:version|v|vers|ver)?:?\s*(3\.[a-e]|3\.\p{Greek}|[0-9]\.[0-9]+)")
        .expect("version regex should compile")
});

/// The default config used to carry this comment, so it shows up in pasted debug logs without
/// saying anything about the version the reporter runs.
static DEFAULT_CONFIG_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m) - config_parser\.c:parse_config:([0-9]+) - CONFIG\(line [0-9]+\): # Before i3 v4\.8, we used to recommend this one as the default:\s*$")
        .expect("config line regex should compile")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Product {
    I3,
    I3Status,
    I3Lock,
}

impl Product {
    /// Only versions of i3 itself are checked against the release milestones.
    pub fn is_primary(self) -> bool {
        self == Self::I3
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::I3 => "i3",
            Self::I3Status => "i3status",
            Self::I3Lock => "i3lock",
        }
    }
}

impl FromStr for Product {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "i3" => Ok(Self::I3),
            "i3status" => Ok(Self::I3Status),
            "i3lock" => Ok(Self::I3Lock),
            other => Err(format!("unknown product `{}`", other)),
        }
    }
}

impl Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionMatch {
    pub product: Product,
    pub version: String,
}

/// Finds the highest version of the product mentioned in `text`.
///
/// When several products are mentioned, only the first match is reported: nothing tells us
/// which one the issue is really about.
pub fn extract(text: &str) -> Option<VersionMatch> {
    let text = DEFAULT_CONFIG_LINE.replace_all(text, "");

    let matches = VERSION
        .captures_iter(&text)
        .filter_map(|captures| {
            let product = captures.get(1)?.as_str().parse::<Product>().ok()?;
            Some((product, captures.get(2)?.as_str()))
        })
        .collect::<Vec<_>>();
    trace!("version matches: {:?}", matches);

    let &(product, first_version) = matches.first()?;
    let version = if matches.iter().any(|(p, _)| *p != product) {
        first_version
    } else {
        matches
            .iter()
            .map(|(_, version)| *version)
            .max_by(|a, b| numeric_cmp(a, b))?
    };

    Some(VersionMatch {
        product,
        version: normalize(version),
    })
}

fn normalize(version: &str) -> String {
    version.trim_end_matches('.').to_owned()
}

/// Compares strings treating every run of ASCII digits as a number, so `4.10` sorts after `4.9`.
pub fn numeric_cmp(a: &str, b: &str) -> Ordering {
    let mut a = a.chars().peekable();
    let mut b = b.chars().peekable();

    loop {
        let (x, y) = match (a.peek(), b.peek()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(&x), Some(&y)) => (x, y),
        };

        if x.is_ascii_digit() && y.is_ascii_digit() {
            let left = take_number(&mut a);
            let right = take_number(&mut b);
            let ordering = left
                .len()
                .cmp(&right.len())
                .then_with(|| left.cmp(&right));
            if ordering != Ordering::Equal {
                return ordering;
            }
        } else {
            if x != y {
                return x.cmp(&y);
            }
            a.next();
            b.next();
        }
    }
}

/// Consumes a run of digits, dropping leading zeroes so that lengths compare like magnitudes.
fn take_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.next_if(char::is_ascii_digit) {
        if digits.is_empty() && c == '0' {
            continue;
        }
        digits.push(c);
    }
    digits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn found(text: &str) -> (Product, String) {
        let m = extract(text).expect("expected a version");
        (m.product, m.version)
    }

    #[test]
    fn numeric_order_beats_lexicographic_order() {
        assert_eq!(numeric_cmp("4.10", "4.9"), Ordering::Greater);
        assert_eq!(numeric_cmp("4.9", "4.10"), Ordering::Less);
        assert_eq!(numeric_cmp("4.08", "4.8"), Ordering::Equal);
        assert_eq!(numeric_cmp("3.e", "3.d"), Ordering::Greater);
        assert_eq!(numeric_cmp("4.1", "4.1.1"), Ordering::Less);
    }

    #[test]
    fn picks_highest_version() {
        let text = "I first saw this with i3 version 4.9, it still happens on i3 version 4.10";
        assert_eq!(found(text), (Product::I3, "4.10".to_owned()));

        let reversed = "i3 4.10 is what I run now, i3 4.9 had it too";
        assert_eq!(found(reversed), (Product::I3, "4.10".to_owned()));
    }

    #[test]
    fn accepts_label_variants() {
        assert_eq!(found("i3: v4.7").1, "4.7");
        assert_eq!(found("i3 ver: 4.8").1, "4.8");
        assert_eq!(found("i3version4.11").1, "4.11");
        assert_eq!(found("running i3 3.e-bf2").1, "3.e");
        assert_eq!(found("i3 3.ε").1, "3.ε");
    }

    #[test]
    fn no_version_at_all() {
        assert_eq!(extract("i3 crashes when I open firefox"), None);
        assert_eq!(extract(""), None);
    }

    #[test]
    fn multiple_products_report_first_match_only() {
        let text = "i3: 4.10\ni3lock: 2.1\ni3: 4.11";
        assert_eq!(found(text), (Product::I3, "4.10".to_owned()));

        let text = "i3lock: 2.1 on top of i3: 4.10";
        assert_eq!(found(text), (Product::I3Lock, "2.1".to_owned()));
    }

    #[test]
    fn secondary_products_are_recognized() {
        assert_eq!(found("i3status version 2.9").0, Product::I3Status);
        assert!(!Product::I3Status.is_primary());
        assert!(Product::I3.is_primary());
    }

    #[test]
    fn rebuilt_binaries_report() {
        let body = r#"
**TL;DR:** Just running `make` and omitting `make clean` aparently may result in mix-match of binaries that (apart from other potential problems) may report the older version.

Happened after checking out commit eb04a64 and re-building, with left-over binaries from tag 4.10.1.  Tree clean in both cases; Fedora 21 w/ git-2.1.0-4.fc21.x86_64 and gcc-4.9.2-6.fc21.x86_64.

I came to my machine (with i3 built from 4.10.1 tag running) with intent to quickly verify a bug fixed few hours ago.

But, out of curiosity I ran `i3 --moreversion` and to my surprise, both reported versions were 4.10.1, just as before restarting!

    Binary i3 version:  4.10.1 (2015-03-29, branch "4.10.1") © 2009-2014 Michael Stapelberg and contributors
    Running i3 version: 4.10.1 (2015-03-29, branch "4.10.1") (pid 1552)

After installing and reloading, versions were right:

    Binary i3 version:  4.10.1-6-geb04a64 (2015-04-06, branch "master") © 2009-2014 Michael Stapelberg and contributors
    Running i3 version: 4.10.1-6-geb04a64 (2015-04-06, branch "master") (pid 1552)
"#;
        assert_eq!(found(body), (Product::I3, "4.10".to_owned()));
    }

    #[test]
    fn xfce_panel_report() {
        let body = r#"
i3 >= 4.8 doesn't play nice with xfce4-panel (=4.10.1) anymore.

and this worked great with i3 4.7.* I was running until recently.

Now with 4.8, or even

```
Binary i3 version:  4.10.2 (2015-04-16, branch "4.10.2")
Running i3 version: 4.10.2 (2015-04-16, branch "4.10.2")
```

The log file that records the disappearance of the panel: https://logs.i3wm.org/logs/5745865499082752.bz2
"#;
        assert_eq!(found(body), (Product::I3, "4.10".to_owned()));
    }

    #[test]
    fn default_config_comment_is_not_a_version() {
        let body = r#"
Here is an extract from my log:

```
03/28/2015 10:21:22 PM - config_parser.c:parse_config:313 - CONFIG(line 22): # Before i3 v4.8, we used to recommend this one as the default:
```

Not sure which version it is, though.
"#;
        assert_eq!(extract(body), None);
    }

    #[test]
    fn default_config_comment_does_not_hide_real_version() {
        let body = "03/28/2015 10:21:22 PM - config_parser.c:parse_config:313 - CONFIG(line 22): # Before i3 v4.8, we used to recommend this one as the default:\ni3 version 4.10.1";
        assert_eq!(found(body), (Product::I3, "4.10".to_owned()));
    }
}
