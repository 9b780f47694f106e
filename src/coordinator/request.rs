use std::fmt::Display;

use crate::{config::Configuration, resolver};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Script,
    Stylesheet,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceRequest {
    pub raw_identifier: String,
    pub resolved_url: String,
    pub kind: ResourceKind,
}

impl ResourceRequest {
    // `.css` (any case) makes a stylesheet, anything else is a script and gets `.js`
    // appended unless it already ends with it
    pub fn new(raw_identifier: &str, config: &Configuration) -> Self {
        let mut resolved_url = resolver::resolve(raw_identifier, config);
        let lower = resolved_url.to_ascii_lowercase();

        let kind = if lower.ends_with(".css") {
            ResourceKind::Stylesheet
        } else {
            if !lower.ends_with(".js") {
                resolved_url.push_str(".js");
            }
            ResourceKind::Script
        };

        ResourceRequest {
            raw_identifier: raw_identifier.to_owned(),
            resolved_url,
            kind,
        }
    }

    pub fn is_script(&self) -> bool {
        self.kind == ResourceKind::Script
    }
}

impl Display for ResourceRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.kind {
            ResourceKind::Script => "script",
            ResourceKind::Stylesheet => "stylesheet",
        };
        f.write_fmt(format_args!(
            "[{kind} `{}` -> {}]",
            self.raw_identifier, self.resolved_url
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::config::ConfigOptions;

    use super::*;

    fn config() -> Configuration {
        Configuration::default().with(ConfigOptions::base_url("/static/"))
    }

    #[test]
    fn bare_names_become_scripts() {
        let request = ResourceRequest::new("c", &config());
        assert_eq!(request.kind, ResourceKind::Script);
        assert_eq!(request.resolved_url, "/static/c.js");
        assert_eq!(request.raw_identifier, "c");
    }

    #[test]
    fn existing_js_suffix_is_kept() {
        assert_eq!(
            ResourceRequest::new("a.js", &config()).resolved_url,
            "/static/a.js"
        );
        assert_eq!(
            ResourceRequest::new("A.JS", &config()).resolved_url,
            "/static/A.JS"
        );
    }

    #[test]
    fn css_suffix_makes_a_stylesheet() {
        let request = ResourceRequest::new("theme/Style.CSS", &config());
        assert_eq!(request.kind, ResourceKind::Stylesheet);
        assert_eq!(request.resolved_url, "/static/theme/Style.CSS");
        assert!(!request.is_script());
    }

    #[test]
    fn absolute_script_gets_suffix_too() {
        let request = ResourceRequest::new("http://192.168.1.1/mod2", &config());
        assert_eq!(request.resolved_url, "http://192.168.1.1/mod2.js");
        assert!(request.is_script());
    }
}
