//! Blacklist rules excluding live resources from drift detection
//!
//! A rule is a regular expression evaluated against the canonical identifier
//! `namespace:apiVersion:kind:name`. Rules are anchored at the start of the
//! candidate only: `kube-system:.*` matches anything in `kube-system`, while a
//! rule has to spell out its own `$` to pin the end. A candidate is blacklisted
//! when any rule matches.
//!
//! Rules are merged in order:
//! 1. [`BUILTIN_RULES`]
//! 2. rule files, one pattern per line (blank lines ignored)
//! 3. inline patterns (e.g. from the config file)

use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{CoreError, Result};

/// Rules that apply to every cluster: objects managed by controllers or by
/// Kubernetes itself, which never appear in a manifest set.
pub const BUILTIN_RULES: &[&str] = &[
    r"^.*:apps/v1:ControllerRevision:.*$",
    r"^.*:apps/v1:ReplicaSet:.*$",
    // jobs spawned by cron jobs carry a unix timestamp suffix
    r"^.*:batch/v1:Job:.*-\d{10,}$",
    r"^.*:events.k8s.io/v1:Event:.*$",
    r"^.*:metrics.k8s.io/v1beta1:PodMetrics:.*$",
    // CA bundle published into every namespace by the root CA publisher
    r"^.*:v1:ConfigMap:kube-root-ca.crt$",
    r"^.*:v1:Endpoints:.*$",
    r"^.*:.*:EndpointSlice:.*$",
    r"^.*:v1:Event:.*$",
    r"^.*:v1:Pod:.*$",
    // service account token secrets
    r"^.*:v1:Secret:.*-token-\S{5}$",
    r"^.*:v1:ServiceAccount:default$",
    r"^default:v1:Service:kubernetes$",
    r"^kube-node-lease:.*$",
    r"^kube-public:.*$",
    r"^kube-system:.*$",
];

/// Where a rule came from, for error reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSource {
    /// Entry of [`BUILTIN_RULES`] (1-based)
    Builtin { index: usize },
    /// Line of a rule file (1-based)
    File { path: PathBuf, line: usize },
    /// Pattern passed directly (config file or API caller)
    Inline { index: usize },
}

impl fmt::Display for RuleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleSource::Builtin { index } => write!(f, "built-in rule #{}", index),
            RuleSource::File { path, line } => write!(f, "{}:{}", path.display(), line),
            RuleSource::Inline { index } => write!(f, "inline rule #{}", index),
        }
    }
}

/// A compiled blacklist rule
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: String,
    source: RuleSource,
    regex: Regex,
}

impl Rule {
    /// Compile a single rule; matching is anchored at the start of input
    pub fn compile(pattern: &str, source: RuleSource) -> Result<Self> {
        let invalid = |e: regex::Error| CoreError::InvalidPattern {
            pattern: pattern.to_string(),
            source_info: source.clone(),
            message: e.to_string(),
        };

        let regex = Regex::new(pattern).map_err(invalid)?;

        Ok(Self {
            pattern: pattern.to_string(),
            source,
            regex,
        })
    }

    /// Check whether the rule matches the candidate from its first character
    ///
    /// The leftmost match starts at 0 whenever any match starting at 0 exists.
    pub fn matches(&self, candidate: &str) -> bool {
        self.regex.find(candidate).is_some_and(|m| m.start() == 0)
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn source(&self) -> &RuleSource {
        &self.source
    }
}

/// Immutable set of compiled rules
#[derive(Debug, Clone, Default)]
pub struct Blacklist {
    rules: Vec<Rule>,
}

impl Blacklist {
    /// Compile the given patterns, without the built-in rules
    pub fn compile<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rules = patterns
            .into_iter()
            .enumerate()
            .map(|(i, p)| Rule::compile(p.as_ref(), RuleSource::Inline { index: i + 1 }))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Only the built-in rules
    pub fn builtin() -> Result<Self> {
        BlacklistBuilder::new().build()
    }

    pub fn builder() -> BlacklistBuilder {
        BlacklistBuilder::new()
    }

    /// Whether any rule matches the candidate
    pub fn matches(&self, candidate: &str) -> bool {
        self.rules.iter().any(|rule| rule.matches(candidate))
    }

    /// First rule matching the candidate
    pub fn matching_rule(&self, candidate: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.matches(candidate))
    }

    /// Keep the candidates no rule matches
    pub fn filter<'a, I>(&self, candidates: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        candidates
            .into_iter()
            .filter(|c| match self.matching_rule(c) {
                Some(rule) => {
                    tracing::debug!("blacklisted {} ({})", c, rule.source());
                    false
                }
                None => true,
            })
            .collect()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Collects rule patterns in merge order and compiles them in one go
#[derive(Debug, Clone)]
pub struct BlacklistBuilder {
    patterns: Vec<(String, RuleSource)>,
    inline_count: usize,
}

impl BlacklistBuilder {
    /// Start with the built-in rules
    pub fn new() -> Self {
        let patterns = BUILTIN_RULES
            .iter()
            .enumerate()
            .map(|(i, p)| (p.to_string(), RuleSource::Builtin { index: i + 1 }))
            .collect();
        Self {
            patterns,
            inline_count: 0,
        }
    }

    /// Start without any rule
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
            inline_count: 0,
        }
    }

    /// Append the rules of a rule file
    pub fn rule_file(mut self, path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
        self.patterns.extend(parse_rule_file(&content, path));
        Ok(self)
    }

    /// Append inline patterns
    pub fn patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for pattern in patterns {
            self.inline_count += 1;
            self.patterns.push((
                pattern.into(),
                RuleSource::Inline {
                    index: self.inline_count,
                },
            ));
        }
        self
    }

    /// Compile every collected pattern; the first invalid one aborts
    pub fn build(self) -> Result<Blacklist> {
        let rules = self
            .patterns
            .into_iter()
            .map(|(pattern, source)| Rule::compile(&pattern, source))
            .collect::<Result<Vec<_>>>()?;
        Ok(Blacklist { rules })
    }
}

impl Default for BlacklistBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a rule file into patterns, skipping whitespace-only lines
///
/// Lines are kept verbatim otherwise: leading or trailing spaces are part of
/// the pattern.
pub fn parse_rule_file(content: &str, path: &Path) -> Vec<(String, RuleSource)> {
    content
        .split('\n')
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            (
                line.strip_suffix('\r').unwrap_or(line).to_string(),
                RuleSource::File {
                    path: path.to_path_buf(),
                    line: i + 1,
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn builtin() -> Blacklist {
        Blacklist::builtin().expect("built-in rules compile")
    }

    #[test]
    fn test_builtin_rules_compile() {
        assert_eq!(builtin().len(), 16);
    }

    #[test]
    fn test_builtin_system_namespaces() {
        let bl = builtin();
        assert!(bl.matches("kube-system:v1:Pod:foo"));
        assert!(bl.matches("kube-system:apps/v1:Deployment:coredns"));
        assert!(bl.matches("kube-public:v1:ConfigMap:cluster-info"));
        assert!(bl.matches("kube-node-lease:coordination.k8s.io/v1:Lease:node-1"));
        assert!(!bl.matches("kube-systemx:apps/v1:Deployment:coredns"));
    }

    #[test]
    fn test_builtin_cron_jobs() {
        let bl = builtin();
        assert!(bl.matches("ns1:batch/v1:Job:backup-1700000000"));
        assert!(bl.matches("ns1:batch/v1:Job:backup-17000000001"));
        assert!(!bl.matches("ns1:batch/v1:Job:backup-manual"));
        assert!(!bl.matches("ns1:batch/v1:Job:backup-170000000"));
    }

    #[test]
    fn test_builtin_token_secrets() {
        let bl = builtin();
        assert!(bl.matches("ns1:v1:Secret:builder-token-x7k2p"));
        assert!(!bl.matches("ns1:v1:Secret:builder-token-x7k2"));
        assert!(!bl.matches("ns1:v1:Secret:db-password"));
    }

    #[test]
    fn test_builtin_exact_names() {
        let bl = builtin();
        assert!(bl.matches("ns1:v1:ServiceAccount:default"));
        assert!(!bl.matches("ns1:v1:ServiceAccount:deployer"));
        assert!(bl.matches("default:v1:Service:kubernetes"));
        assert!(!bl.matches("ns1:v1:Service:kubernetes"));
        assert!(bl.matches("ns1:v1:ConfigMap:kube-root-ca.crt"));
        assert!(!bl.matches("ns1:v1:ConfigMap:kube-root-ca.crt.bak"));
        assert!(bl.matches("ns1:discovery.k8s.io/v1:EndpointSlice:web-abcde"));
    }

    #[test]
    fn test_rules_anchor_at_start_only() {
        let bl = Blacklist::compile(["monitoring:"]).unwrap();
        assert!(bl.matches("monitoring:v1:ConfigMap:grafana"));
        assert!(!bl.matches("ns1:v1:ConfigMap:monitoring:"));

        let bl = Blacklist::compile(["ns1:v1:ConfigMap:a"]).unwrap();
        assert!(bl.matches("ns1:v1:ConfigMap:abc"));
    }

    #[test]
    fn test_anchoring_survives_alternation() {
        let bl = Blacklist::compile(["foo|bar"]).unwrap();
        assert!(bl.matches("bar:v1:Pod:x"));
        assert!(!bl.matches("x:v1:Pod:bar"));
    }

    #[test]
    fn test_invalid_pattern_fails() {
        let err = Blacklist::compile(["^ok$", "(unclosed"]).unwrap_err();
        match err {
            CoreError::InvalidPattern {
                pattern,
                source_info,
                ..
            } => {
                assert_eq!(pattern, "(unclosed");
                assert_eq!(source_info, RuleSource::Inline { index: 2 });
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_stray_paren_is_invalid() {
        assert!(Blacklist::compile(["a)|(b"]).is_err());
    }

    #[test]
    fn test_verbose_rule_with_trailing_comment() {
        let bl = Blacklist::compile(["(?x) ^monitoring: .* # everything in monitoring"]).unwrap();
        assert!(bl.matches("monitoring:v1:ConfigMap:grafana"));
        assert!(!bl.matches("ns1:v1:ConfigMap:monitoring:"));

        let bl = Blacklist::compile(["(?x) ns1 : v1 # no explicit anchor"]).unwrap();
        assert!(bl.matches("ns1:v1:Secret:creds"));
        assert!(!bl.matches("ns2:v1:Secret:ns1:v1"));
    }

    #[test]
    fn test_adding_rules_is_monotonic() {
        let candidates = [
            "ns1:v1:ConfigMap:a",
            "ns1:v1:Pod:web-0",
            "kube-system:v1:ConfigMap:x",
            "ns2:apps/v1:Deployment:web",
            "ns2:batch/v1:Job:nightly-1700000000",
        ];
        let base = builtin();
        let extended = Blacklist::builder()
            .patterns(["^ns2:.*$"])
            .build()
            .unwrap();
        for c in candidates {
            if base.matches(c) {
                assert!(extended.matches(c), "{c} lost its match");
            }
        }
        assert!(!base.matches("ns2:apps/v1:Deployment:web"));
        assert!(extended.matches("ns2:apps/v1:Deployment:web"));
    }

    #[test]
    fn test_filter_keeps_unmatched() {
        let bl = builtin();
        let kept = bl.filter([
            "ns1:v1:ConfigMap:a",
            "kube-system:v1:Pod:foo",
            "ns1:v1:Pod:web-0",
        ]);
        assert_eq!(kept, vec!["ns1:v1:ConfigMap:a"]);
    }

    #[test]
    fn test_parse_rule_file_skips_blank_lines() {
        let content = "^a:.*$\n\n   \n^b:.*$\r\n\t\n";
        let rules = parse_rule_file(content, Path::new("rules.txt"));
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].0, "^a:.*$");
        assert_eq!(rules[1].0, "^b:.*$");
        assert_eq!(
            rules[1].1,
            RuleSource::File {
                path: PathBuf::from("rules.txt"),
                line: 4
            }
        );
    }

    #[test]
    fn test_builder_appends_rule_file_after_builtins() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "^monitoring:.*$").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "^ns1:v1:ConfigMap:legacy$").unwrap();

        let bl = Blacklist::builder().rule_file(file.path()).unwrap().build().unwrap();
        assert_eq!(bl.len(), BUILTIN_RULES.len() + 2);
        assert!(matches!(bl.rules()[0].source(), RuleSource::Builtin { index: 1 }));
        assert_eq!(bl.rules()[16].pattern(), "^monitoring:.*$");
        assert!(bl.matches("monitoring:v1:Secret:grafana"));
        assert!(bl.matches("ns1:v1:ConfigMap:legacy"));
    }

    #[test]
    fn test_invalid_rule_file_line_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "^ok:.*$").unwrap();
        writeln!(file, "[broken").unwrap();

        let err = Blacklist::builder()
            .rule_file(file.path())
            .unwrap()
            .build()
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("[broken"));
        assert!(message.contains(":2"));
    }

    #[test]
    fn test_missing_rule_file() {
        let err = Blacklist::builder()
            .rule_file(Path::new("/nonexistent/kubestale/rules.txt"))
            .unwrap_err();
        assert!(matches!(err, CoreError::Io { .. }));
    }
}
