//! Declarative window rules.
//!
//! Rules decide the initial presentation flags a newly discovered window is
//! managed with. Matching is deliberately simple: the first rule whose
//! patterns accept the window's class and process names wins. The
//! interesting state machine lives in [`crate::model::window`], not here.

use std::fs;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::model::window::{HiddenWindowShownAction, Visibility, WindowRule};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read rules file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse rules file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        source: regex::Error,
    },
}

/// On-disk rule set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RulesConfig {
    pub rules: Vec<RuleConfig>,
}

/// One rule as written in the configuration file. Omitted pattern fields
/// match everything; omitted state fields leave the attribute unmanaged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuleConfig {
    /// Unanchored regex over the window class name.
    pub class: Option<String>,
    /// Unanchored regex over the owning process name.
    pub process: Option<String>,
    pub is_floating: bool,
    pub titlebar: Visibility,
    pub borders: Visibility,
    pub alt_tab_taskbar: Visibility,
    pub redraw_on_show: bool,
    pub hide_from_alt_tab_when_inactive: bool,
    pub show_menu: bool,
    pub update_icon: bool,
    pub hidden_shown_action: HiddenWindowShownAction,
}

impl Default for RuleConfig {
    fn default() -> Self {
        RuleConfig {
            class: None,
            process: None,
            is_floating: false,
            titlebar: Visibility::AsIs,
            borders: Visibility::AsIs,
            alt_tab_taskbar: Visibility::AsIs,
            redraw_on_show: false,
            hide_from_alt_tab_when_inactive: false,
            show_menu: true,
            update_icon: false,
            hidden_shown_action: HiddenWindowShownAction::default(),
        }
    }
}

impl RuleConfig {
    fn to_rule(&self) -> WindowRule {
        WindowRule {
            is_floating: self.is_floating,
            titlebar: self.titlebar,
            alt_tab_taskbar: self.alt_tab_taskbar,
            borders: self.borders,
            redraw_on_show: self.redraw_on_show,
            hide_from_alt_tab_when_inactive: self.hide_from_alt_tab_when_inactive,
            show_menu: self.show_menu,
            update_icon: self.update_icon,
            hidden_shown_action: self.hidden_shown_action,
            owned_predicate: None,
        }
    }
}

impl RulesConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::parse(&fs::read_to_string(path)?)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Compile every pattern up front so matching at discovery time is
    /// infallible.
    pub fn compile(&self) -> Result<CompiledRules, ConfigError> {
        let compile = |pattern: &Option<String>| -> Result<Option<Regex>, ConfigError> {
            match pattern {
                Some(pattern) => Regex::new(pattern)
                    .map(Some)
                    .map_err(|source| ConfigError::Pattern { pattern: pattern.clone(), source }),
                None => Ok(None),
            }
        };
        let rules = self
            .rules
            .iter()
            .map(|rule| {
                Ok(CompiledRule {
                    class: compile(&rule.class)?,
                    process: compile(&rule.process)?,
                    config: rule.clone(),
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        debug!(rules = rules.len(), "compiled window rules");
        Ok(CompiledRules { rules })
    }
}

pub struct CompiledRule {
    class: Option<Regex>,
    process: Option<Regex>,
    config: RuleConfig,
}

impl CompiledRule {
    fn matches(&self, class_name: &str, process_name: &str) -> bool {
        self.class.as_ref().is_none_or(|class| class.is_match(class_name))
            && self.process.as_ref().is_none_or(|process| process.is_match(process_name))
    }
}

pub struct CompiledRules {
    rules: Vec<CompiledRule>,
}

impl CompiledRules {
    /// First matching rule wins; no match produces the hands-off default.
    pub fn rule_for(&self, class_name: &str, process_name: &str) -> WindowRule {
        self.rules
            .iter()
            .find(|rule| rule.matches(class_name, process_name))
            .map(|rule| rule.config.to_rule())
            .unwrap_or_default()
    }
}
