//! Snapshot of an extracted argparse parser
//!
//! The extracted object stays opaque to the pipeline; this reads the handful
//! of attributes a configuration UI needs (description and the declared
//! options, in declaration order) into plain serializable data.

use pyo3::prelude::*;
use serde::{Deserialize, Serialize};

/// One declared option (an argparse `Action`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSummary {
    pub dest: String,
    pub option_strings: Vec<String>,
    pub help: Option<String>,
    pub required: bool,
    pub type_name: Option<String>,
    pub default: Option<String>,
    pub nargs: Option<String>,
    pub choices: Option<Vec<String>>,
}

impl OptionSummary {
    /// Positionals have no option strings
    pub fn is_positional(&self) -> bool {
        self.option_strings.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserSummary {
    pub prog: Option<String>,
    pub description: Option<String>,
    pub options: Vec<OptionSummary>,
}

impl ParserSummary {
    /// Read a parser through its public attributes and `_actions`
    pub fn from_parser(parser: &Bound<'_, PyAny>) -> PyResult<Self> {
        let mut options = Vec::new();
        for action in parser.getattr("_actions")?.try_iter()? {
            options.push(summarize_action(&action?)?);
        }

        Ok(Self {
            prog: optional_str(parser, "prog")?,
            description: optional_str(parser, "description")?,
            options,
        })
    }

    /// Look up an option by any of its flags (`-x`, `--x`) or its dest
    pub fn option(&self, name: &str) -> Option<&OptionSummary> {
        self.options
            .iter()
            .find(|o| o.option_strings.iter().any(|s| s == name))
            .or_else(|| self.options.iter().find(|o| o.dest == name))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

fn summarize_action(action: &Bound<'_, PyAny>) -> PyResult<OptionSummary> {
    let mut option_strings = Vec::new();
    for flag in action.getattr("option_strings")?.try_iter()? {
        option_strings.push(flag?.str()?.to_string());
    }

    let type_attr = action.getattr("type")?;
    let type_name = if type_attr.is_none() {
        None
    } else {
        match type_attr.getattr("__name__") {
            Ok(name) => Some(name.str()?.to_string()),
            Err(_) => Some(type_attr.repr()?.to_string()),
        }
    };

    let default = action.getattr("default")?;
    let default = if default.is_none() {
        None
    } else {
        Some(default.repr()?.to_string())
    };

    let choices_attr = action.getattr("choices")?;
    let choices = if choices_attr.is_none() {
        None
    } else {
        let mut choices = Vec::new();
        for choice in choices_attr.try_iter()? {
            choices.push(choice?.str()?.to_string());
        }
        Some(choices)
    };

    Ok(OptionSummary {
        dest: action.getattr("dest")?.str()?.to_string(),
        option_strings,
        help: optional_str(action, "help")?,
        required: action.getattr("required")?.is_truthy()?,
        type_name,
        default,
        nargs: optional_str(action, "nargs")?,
        choices,
    })
}

fn optional_str(obj: &Bound<'_, PyAny>, attr: &str) -> PyResult<Option<String>> {
    let value = obj.getattr(attr)?;
    if value.is_none() {
        Ok(None)
    } else {
        Ok(Some(value.str()?.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(with_options: &[OptionSummary]) -> ParserSummary {
        ParserSummary {
            prog: Some("demo".to_string()),
            description: Some("demo tool".to_string()),
            options: with_options.to_vec(),
        }
    }

    fn option(dest: &str, flags: &[&str]) -> OptionSummary {
        OptionSummary {
            dest: dest.to_string(),
            option_strings: flags.iter().map(|s| s.to_string()).collect(),
            help: None,
            required: false,
            type_name: None,
            default: None,
            nargs: None,
            choices: None,
        }
    }

    #[test]
    fn test_option_lookup_by_flag_or_dest() {
        let s = summary(&[option("verbose", &["-v", "--verbose"]), option("path", &[])]);
        assert_eq!(s.option("-v").unwrap().dest, "verbose");
        assert_eq!(s.option("--verbose").unwrap().dest, "verbose");
        assert!(s.option("path").unwrap().is_positional());
        assert!(s.option("--missing").is_none());
    }

    #[test]
    fn test_json_shape() {
        let s = summary(&[option("x", &["--x"])]);
        let value: serde_json::Value = serde_json::from_str(&s.to_json().unwrap()).unwrap();
        assert_eq!(value["description"], "demo tool");
        assert_eq!(value["options"][0]["option_strings"][0], "--x");
        assert_eq!(value["options"][0]["required"], false);
    }
}
