//! Robots.txt parser implementation
//!
//! Allow/deny evaluation is delegated to the robotstxt crate (a port of Google's
//! RFC 9309 reference matcher). The group structure and `Crawl-delay` values,
//! which that matcher does not expose, are parsed here.

use robotstxt::DefaultMatcher;
use std::fmt;
use std::time::Duration;

/// Kind of a path rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Allow,
    Disallow,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allow => f.write_str("Allow"),
            Self::Disallow => f.write_str("Disallow"),
        }
    }
}

/// A single `Allow` or `Disallow` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub kind: RuleKind,
    /// Path pattern as declared (may contain `*` and a trailing `$`)
    pub path: String,
}

/// A user-agent group: one or more `User-agent` lines and the rules under them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentGroup {
    /// Lowercased agent tokens, in declaration order
    pub agents: Vec<String>,

    /// Rules in declaration order
    pub rules: Vec<Rule>,

    /// First `Crawl-delay` declared in this group
    pub crawl_delay: Option<Duration>,
}

impl AgentGroup {
    fn applies_to(&self, user_agent: &str) -> bool {
        let user_agent = user_agent.to_lowercase();
        self.agents.iter().any(|agent| agent == &user_agent)
    }

    fn is_wildcard(&self) -> bool {
        self.agents.iter().any(|agent| agent == "*")
    }
}

/// Parsed robots.txt data
#[derive(Debug, Clone, Default)]
pub struct ParsedRobots {
    /// Raw robots.txt content (empty string means allow all)
    content: String,

    /// Agent groups in declaration order
    groups: Vec<AgentGroup>,
}

impl ParsedRobots {
    /// Creates a new ParsedRobots from raw robots.txt content
    ///
    /// Parsing never fails: lines that are not `key: value` directives, rules
    /// declared before any `User-agent` line, and unknown directives are ignored.
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
            groups: parse_groups(content),
        }
    }

    /// Creates a permissive ParsedRobots that allows everything
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Returns the raw robots.txt content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the agent groups in declaration order
    pub fn groups(&self) -> &[AgentGroup] {
        &self.groups
    }

    /// Total number of path rules across all groups
    pub fn rule_count(&self) -> usize {
        self.groups.iter().map(|g| g.rules.len()).sum()
    }

    /// Checks if a URL is allowed for the given user agent
    ///
    /// The longest matching rule wins; an `Allow` and a `Disallow` of equal
    /// length resolve to `Allow`.
    ///
    /// # Arguments
    ///
    /// * `url` - The absolute URL (or bare path) to check
    /// * `user_agent` - The agent token, `*` for the wildcard group
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.content.trim().is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, user_agent, url)
    }

    /// Gets the crawl delay for a specific user agent
    ///
    /// A group naming the agent takes precedence over the wildcard group.
    pub fn crawl_delay(&self, user_agent: &str) -> Option<Duration> {
        if user_agent != "*" {
            let specific = self
                .groups
                .iter()
                .filter(|g| g.applies_to(user_agent))
                .find_map(|g| g.crawl_delay);
            if specific.is_some() {
                return specific;
            }
        }

        self.groups
            .iter()
            .filter(|g| g.is_wildcard())
            .find_map(|g| g.crawl_delay)
    }
}

/// Splits robots.txt content into agent groups
///
/// Consecutive `User-agent` lines share one group; the first rule line after
/// them closes the agent list, so a later `User-agent` line starts a new group.
fn parse_groups(content: &str) -> Vec<AgentGroup> {
    let mut groups: Vec<AgentGroup> = Vec::new();
    let mut collecting_agents = false;

    for line in content.lines() {
        let line = match line.split_once('#') {
            Some((before, _)) => before,
            None => line,
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let Some((key, value)) = trimmed.split_once(':') else {
            continue;
        };
        let key = key.trim().to_lowercase();
        let value = value.trim();

        match key.as_str() {
            "user-agent" | "useragent" | "user agent" => {
                if !collecting_agents || groups.is_empty() {
                    groups.push(AgentGroup::default());
                }
                if let Some(group) = groups.last_mut() {
                    group.agents.push(agent_token(value));
                }
                collecting_agents = true;
            }
            "allow" | "disallow" => {
                let Some(group) = groups.last_mut() else {
                    continue;
                };
                let kind = if key == "allow" {
                    RuleKind::Allow
                } else {
                    RuleKind::Disallow
                };
                group.rules.push(Rule {
                    kind,
                    path: value.to_string(),
                });
                collecting_agents = false;
            }
            "crawl-delay" | "crawldelay" => {
                let Some(group) = groups.last_mut() else {
                    continue;
                };
                if group.crawl_delay.is_none() {
                    group.crawl_delay = parse_delay(value);
                }
                collecting_agents = false;
            }
            _ => {}
        }
    }

    groups
}

/// Reduces a `User-agent` value to its lowercased product token
fn agent_token(value: &str) -> String {
    if value.starts_with('*') {
        return "*".to_string();
    }
    value
        .split(|c: char| c == '/' || c.is_whitespace())
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Parses a `Crawl-delay` value in (possibly fractional) seconds
fn parse_delay(value: &str) -> Option<Duration> {
    let seconds = value.parse::<f64>().ok()?;
    Duration::try_from_secs_f64(seconds).ok()
}
