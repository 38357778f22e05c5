use std::fmt::Display;

use crossterm::tty::IsTty;
use inquire::error::{InquireError, InquireResult};
use inquire::ui::{Attributes, RenderConfig, StyleSheet, Styled};

use super::{TERMINAL_STDERR, colors};

/// Disables prompting when set to `1`
const FINDER_NO_PROMPT_VAR: &str = "FINDER_NO_PROMPT";

#[derive(Clone)]
pub struct Select<T> {
    pub options: Vec<T>,
}

/// Free text input
#[derive(Debug, Clone, Default)]
pub struct Text {
    pub default: Option<String>,
}

/// A number in `1..=max`
#[derive(Debug, Clone)]
pub struct PageNumber {
    pub max: u32,
}

#[derive(Debug, Clone)]
pub struct Dialog<'a, Type> {
    pub message: &'a str,
    pub help_message: Option<&'a str>,
    pub typed: Type,
}

/// Run a blocking prompt off the async runtime,
/// holding the stderr lock so logs don't interleave with the prompt.
async fn prompt_blocking<T: Send + 'static>(
    prompt: impl FnOnce() -> InquireResult<T> + Send + 'static,
) -> InquireResult<T> {
    tokio::task::spawn_blocking(move || {
        let _stderr_lock = TERMINAL_STDERR.lock();
        prompt()
    })
    .await
    .map_err(|e| InquireError::Custom(Box::new(e)))?
}

struct Choice(usize, String);
impl Display for Choice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.1.fmt(f)
    }
}

impl<T: Display> Dialog<'_, Select<T>> {
    pub async fn prompt(self) -> InquireResult<T> {
        let message = self.message.to_owned();
        let help_message = self.help_message.map(ToOwned::to_owned);
        let mut options = self.typed.options;

        let choices = options
            .iter()
            .map(ToString::to_string)
            .enumerate()
            .map(|(id, value)| Choice(id, value))
            .collect();

        let Choice(id, _) = prompt_blocking(move || {
            let mut dialog =
                inquire::Select::new(&message, choices).with_render_config(finder_theme());

            if let Some(ref help_message) = help_message {
                dialog = dialog.with_help_message(help_message);
            }

            dialog.prompt()
        })
        .await?;

        Ok(options.remove(id))
    }
}

impl Dialog<'_, Text> {
    /// Prompt for a line of text, empty input yields `None`.
    pub async fn prompt(self) -> InquireResult<Option<String>> {
        let message = self.message.to_owned();
        let help_message = self.help_message.map(ToOwned::to_owned);
        let default = self.typed.default;

        let answer = prompt_blocking(move || {
            let mut dialog = inquire::Text::new(&message).with_render_config(finder_theme());

            if let Some(ref default) = default {
                dialog = dialog.with_initial_value(default);
            }
            if let Some(ref help_message) = help_message {
                dialog = dialog.with_help_message(help_message);
            }

            dialog.prompt()
        })
        .await?;

        let answer = answer.trim();
        Ok((!answer.is_empty()).then(|| answer.to_string()))
    }
}

impl Dialog<'_, PageNumber> {
    pub async fn prompt(self) -> InquireResult<u32> {
        let message = self.message.to_owned();
        let help_message = self.help_message.map(ToOwned::to_owned);
        let max = self.typed.max;

        prompt_blocking(move || {
            let mut dialog = inquire::CustomType::<u32>::new(&message)
                .with_render_config(finder_theme())
                .with_error_message("Please type a page number")
                .with_validator(move |page: &u32| {
                    if (1..=max).contains(page) {
                        Ok(inquire::validator::Validation::Valid)
                    } else {
                        Ok(inquire::validator::Validation::Invalid(
                            format!("Pages range from 1 to {max}").into(),
                        ))
                    }
                });

            if let Some(ref help_message) = help_message {
                dialog = dialog.with_help_message(help_message);
            }

            dialog.prompt()
        })
        .await
    }
}

impl Dialog<'_, ()> {
    /// True if stderr and stdin are ttys
    pub fn can_prompt() -> bool {
        if std::env::var(FINDER_NO_PROMPT_VAR).is_ok_and(|v| v == "1") {
            return false;
        }
        std::io::stderr().is_tty() && std::io::stdin().is_tty()
    }
}

pub fn finder_theme() -> RenderConfig<'static> {
    let mut render_config = RenderConfig::default_colored();

    let accent = colors::ACCENT.to_inquire();
    let muted = colors::MUTED.to_inquire();

    render_config.answered_prompt_prefix = Styled::new(">").with_fg(accent);
    render_config.highlighted_option_prefix = Styled::new(">").with_fg(accent);
    render_config.prompt_prefix = Styled::new("?").with_fg(accent);
    render_config.prompt = StyleSheet::new().with_attr(Attributes::BOLD);
    render_config.help_message = Styled::new("").with_fg(muted).style;
    render_config.answer = Styled::new("").with_fg(accent).style;

    render_config
}
