//! Commands, invocations and the outbound request body.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A user-invocable generation command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    /// Rewrite the selection for clarity and grammar
    Improve,
    /// Make the selection shorter
    Shorten,
    /// Make the selection longer and more detailed
    Expand,
    /// Summarize the selection
    Summarize,
    /// Free-form prompt written by the user
    Custom,
}

impl Command {
    /// All commands, in menu order.
    pub const ALL: [Command; 5] = [
        Command::Improve,
        Command::Shorten,
        Command::Expand,
        Command::Summarize,
        Command::Custom,
    ];

    /// Wire name of the command.
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Improve => "improve",
            Command::Shorten => "shorten",
            Command::Expand => "expand",
            Command::Summarize => "summarize",
            Command::Custom => "custom",
        }
    }

    /// Instruction template for fixed commands. `Custom` has none.
    pub fn instruction(&self) -> Option<&'static str> {
        match self {
            Command::Improve => Some(
                "Improve the writing of the following text. Fix grammar and spelling, \
                 make it clearer, and keep its meaning and structure.",
            ),
            Command::Shorten => Some(
                "Make the following text shorter. Keep the key information and the original tone.",
            ),
            Command::Expand => Some(
                "Expand the following text with more detail, examples and explanation.",
            ),
            Command::Summarize => Some(
                "Summarize the following text as a short heading followed by a bullet list \
                 of the key points.",
            ),
            Command::Custom => None,
        }
    }

    /// Whether the command operates on selected text.
    pub fn requires_selection(&self) -> bool {
        !matches!(self, Command::Custom)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Command::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::validation(format!("unknown command: {s}")))
    }
}

/// Instruction profile the generation service should write in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DomainContext {
    /// General knowledge-base documentation
    #[default]
    #[serde(rename = "documentation")]
    Documentation,
    /// Change-log entries
    #[serde(rename = "changelog")]
    ChangeLog,
}

impl DomainContext {
    /// Wire name of the context.
    pub fn as_str(&self) -> &'static str {
        match self {
            DomainContext::Documentation => "documentation",
            DomainContext::ChangeLog => "changelog",
        }
    }
}

impl fmt::Display for DomainContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DomainContext {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "documentation" | "docs" => Ok(DomainContext::Documentation),
            "changelog" | "change-log" => Ok(DomainContext::ChangeLog),
            _ => Err(Error::validation(format!("unknown context: {s}"))),
        }
    }
}

/// One user invocation of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// The command to run
    pub command: Command,
    /// Text the command operates on
    pub selected_text: Option<String>,
    /// Free-form prompt for [`Command::Custom`]
    pub custom_prompt: Option<String>,
    /// Instruction profile
    pub context: DomainContext,
}

impl Invocation {
    /// Create an invocation with no selection and no prompt.
    pub fn new(command: Command, context: DomainContext) -> Self {
        Self {
            command,
            selected_text: None,
            custom_prompt: None,
            context,
        }
    }

    /// Set the selected text.
    pub fn with_selection(mut self, text: impl Into<String>) -> Self {
        self.selected_text = Some(text.into());
        self
    }

    /// Set the custom prompt.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.custom_prompt = Some(prompt.into());
        self
    }

    /// Selected text, if it has any non-whitespace content.
    pub fn selection(&self) -> Option<&str> {
        self.selected_text.as_deref().filter(|t| !t.trim().is_empty())
    }

    /// Check the preconditions for sending a request.
    pub fn validate(&self) -> Result<()> {
        if self.command.requires_selection() {
            if self.selection().is_none() {
                return Err(Error::validation("no text selected"));
            }
        } else if self
            .custom_prompt
            .as_deref()
            .map_or(true, |p| p.trim().is_empty())
        {
            return Err(Error::validation("prompt is required"));
        }
        Ok(())
    }

    /// Build the outbound request body.
    pub fn to_request(&self) -> GenerationRequest {
        let prompt = match self.command.instruction() {
            Some(template) => Some(template.to_string()),
            None => self.custom_prompt.as_ref().map(|p| p.trim().to_string()),
        };
        GenerationRequest {
            command: self.command,
            selected_text: self.selection().map(str::to_string),
            prompt,
            context: self.context,
        }
    }
}

/// JSON body sent to the generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// Command name
    pub command: Command,
    /// Selected text, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_text: Option<String>,
    /// Instruction template or user prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Instruction profile
    pub context: DomainContext,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_selection() {
        let err = Invocation::new(Command::Shorten, DomainContext::Documentation)
            .with_selection("   ")
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), "no text selected");
    }

    #[test]
    fn test_validate_custom_requires_prompt() {
        let invocation = Invocation::new(Command::Custom, DomainContext::ChangeLog);
        assert_eq!(invocation.validate().unwrap_err().to_string(), "prompt is required");

        let invocation = invocation.with_prompt("Write release notes");
        assert!(invocation.validate().is_ok());
    }

    #[test]
    fn test_request_json_shape() {
        let request = Invocation::new(Command::Summarize, DomainContext::ChangeLog)
            .with_selection("Long paragraph...")
            .to_request();
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["command"], "summarize");
        assert_eq!(json["selectedText"], "Long paragraph...");
        assert_eq!(json["context"], "changelog");
        assert_eq!(json["prompt"], Command::Summarize.instruction().unwrap());
    }

    #[test]
    fn test_custom_request_carries_user_prompt() {
        let request = Invocation::new(Command::Custom, DomainContext::Documentation)
            .with_prompt(" Draft an FAQ ")
            .to_request();
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["prompt"], "Draft an FAQ");
        assert!(json.get("selectedText").is_none());
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("Summarize".parse::<Command>().unwrap(), Command::Summarize);
        assert!("rewrite".parse::<Command>().is_err());
        assert_eq!(
            "changelog".parse::<DomainContext>().unwrap(),
            DomainContext::ChangeLog
        );
    }
}
