// Resolve logical module names into URLs: alias substitution, base URL prefixing
// and a single left-to-right pass collapsing `.` and `..` segments.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::Configuration;

// `http:` or `https:`, any case
const ABSOLUTE_REGEX_SPEC: &str = r"(?i)^https?:";

// leading `/`, `//` or `http(s)://`, kept out of the dot pass
const ROOT_REGEX_SPEC: &str = r"(?i)^(?:https?:)?/+";

static ABSOLUTE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(ABSOLUTE_REGEX_SPEC).unwrap());
static ROOT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(ROOT_REGEX_SPEC).unwrap());

pub fn is_absolute(url: &str) -> bool {
    ABSOLUTE_REGEX.is_match(url)
}

/// Map `identifier` to a URL under `config`. Aliases apply once, `http(s):` values
/// come back untouched, everything else gets the base URL and [`trim_dots`].
pub fn resolve(identifier: &str, config: &Configuration) -> String {
    let value = match config.paths.get(identifier) {
        Some(path) if !path.is_empty() => path.as_str(),
        _ => identifier,
    };

    if is_absolute(value) {
        return value.to_owned();
    }

    let full = format!("{}{}", config.base_url, value);

    let root_len = ROOT_REGEX.find(&full).map(|m| m.end()).unwrap_or(0);
    let (root, rest) = full.split_at(root_len);

    let mut segments = rest.split('/').map(str::to_owned).collect::<Vec<_>>();
    trim_dots(&mut segments);

    format!("{}{}", root, segments.join("/"))
}

/// One left-to-right pass over `segments`: drops `.` and empty segments, and drops
/// `..` together with the segment before it. A `..` stays when it is first, when it
/// follows another `..`, or when it sits at index 1 with another `..` at index 2.
/// Not a fixed point, some `..` chains survive.
pub fn trim_dots(segments: &mut Vec<String>) {
    let mut i: isize = 0;

    while (i as usize) < segments.len() {
        let idx = i as usize;
        let part = segments[idx].as_str();

        if part == "." || part.is_empty() {
            segments.remove(idx);
            i -= 1;
        } else if part == ".." {
            let keep = idx == 0
                || (idx == 1 && segments.get(2).map(String::as_str) == Some(".."))
                || segments[idx - 1] == "..";

            if !keep {
                segments.drain(idx - 1..=idx);
                i -= 2;
            }
        }

        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use crate::config::ConfigOptions;

    use super::*;

    fn base(base_url: &str) -> Configuration {
        Configuration::default().with(ConfigOptions::base_url(base_url))
    }

    fn trimmed(path: &str) -> String {
        let mut segments = path.split('/').map(str::to_owned).collect::<Vec<_>>();
        trim_dots(&mut segments);
        segments.join("/")
    }

    #[test]
    fn dot_segments_are_collapsed() {
        let config = base("/x/");
        assert_eq!(resolve("a/./b", &config), "/x/a/b");
        assert_eq!(resolve("a/../b", &config), "/x/b");
        assert_eq!(resolve("a//b", &config), "/x/a/b");
        assert_eq!(resolve("../y/c", &config), "/y/c");
    }

    #[test]
    fn plain_identifier_is_prefixed() {
        assert_eq!(resolve("mod1", &base("/s/")), "/s/mod1");
        assert_eq!(resolve("mod1", &Configuration::default()), "mod1");
        assert_eq!(resolve("lib/mod1", &base("js")), "js/lib/mod1");
    }

    #[test]
    fn alias_is_applied_once() {
        let config = Configuration::default().with(
            ConfigOptions::base_url("/s/")
                .alias("jq", "lib/jquery")
                .alias("lib/jquery", "should/not/apply"),
        );
        assert_eq!(resolve("jq", &config), "/s/lib/jquery");
    }

    #[test]
    fn empty_alias_falls_back_to_identifier() {
        let config = Configuration::default().with(ConfigOptions::base_url("/s/").alias("m", ""));
        assert_eq!(resolve("m", &config), "/s/m");
    }

    #[test]
    fn absolute_urls_are_untouched() {
        let config = base("/ignored/");
        assert_eq!(
            resolve("http://x.com/a/../b", &config),
            "http://x.com/a/../b"
        );
        assert_eq!(resolve("HTTPS://x.com/./b", &config), "HTTPS://x.com/./b");

        let aliased = config.with(ConfigOptions::default().alias("cdn", "https://cdn.x/m"));
        assert_eq!(resolve("cdn", &aliased), "https://cdn.x/m");
    }

    #[test]
    fn absolute_base_keeps_its_scheme() {
        let config = Configuration::default()
            .with(ConfigOptions::base_url("http://h/js").alias("m", "mod"));
        assert_eq!(resolve("m", &config), "http://h/js/mod");
        assert_eq!(resolve("../lib/jquery.min", &config), "http://h/lib/jquery.min");
    }

    #[test]
    fn other_schemes_are_not_roots() {
        let config = base("ftp://h/pub");
        assert_eq!(resolve("../x", &config), "ftp:/h/x");
        assert_eq!(resolve("a", &base("HTTP://h/")), "HTTP://h/a");
    }

    #[test]
    fn single_pass_leaves_leading_parents() {
        assert_eq!(trimmed("../a"), "../a");
        assert_eq!(trimmed("../../a"), "../../a");
        assert_eq!(trimmed("a/../../b"), "a/../../b");
        assert_eq!(trimmed("a/b/../../c"), "c");
        assert_eq!(trimmed("a/.././b"), "b");
    }

    #[test]
    fn parent_at_index_one_with_parent_after() {
        // `..` at 1 is kept when index 2 is also `..`
        assert_eq!(trimmed("a/../.."), "a/../..");
        assert_eq!(trimmed("a/b/../c"), "a/c");
    }

    #[test]
    fn empty_and_dot_segments_removed() {
        assert_eq!(trimmed("./a/./b/"), "a/b");
        assert_eq!(trimmed(""), "");
        assert_eq!(trimmed("."), "");
    }
}
