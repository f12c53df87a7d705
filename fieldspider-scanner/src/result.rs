use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// An `<input>` element rebuilt from its attributes, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputElement {
    attributes: Vec<(String, String)>,
}

impl InputElement {
    /// Newlines inside names or values are dropped so every element renders
    /// on a single output line.
    pub fn new<I, K, V>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let attributes = attributes
            .into_iter()
            .map(|(name, value)| (strip_newlines(name.as_ref()), strip_newlines(value.as_ref())))
            .collect();
        Self { attributes }
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl fmt::Display for InputElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<input")?;
        for (name, value) in &self.attributes {
            write!(f, " {}=\"{}\"", name, value)?;
        }
        f.write_str("></input>")
    }
}

fn strip_newlines(s: &str) -> String {
    s.chars().filter(|c| *c != '\n' && *c != '\r').collect()
}

/// All inputs found on one page; the unit the result sink receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInputs {
    pub url: String,
    pub inputs: Vec<InputElement>,
}

impl PageInputs {
    pub fn new(url: impl Into<String>, inputs: Vec<InputElement>) -> Self {
        Self {
            url: url.into(),
            inputs,
        }
    }
}

/// Text block form: the page URL in brackets, one tab-indented element per
/// line, then a blank line.
impl fmt::Display for PageInputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}]", self.url)?;
        for input in &self.inputs {
            writeln!(f, "\t{}", input)?;
        }
        writeln!(f)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlSummary {
    pub pages_fetched: usize,
    pub pages_failed: usize,
    pub pages_with_inputs: usize,
    pub inputs_found: usize,
    pub urls_discovered: usize,
    pub elapsed: Duration,
}
