//! API configuration form: field editing, validation and save tracking.

use thiserror::Error;
use url::Url;

use super::notifications::NotificationKind;
use super::ticket::{Ticket, TicketCounter};
use super::Command;
use crate::models::ApiConfig;

/// Longest value accepted for any single field
const MAX_FIELD_CHARS: usize = 2048;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    ApiUrl,
    ApiKey,
    ModelName,
    PublishableKey,
    ProjectUrl,
}

impl ConfigField {
    pub const ALL: [ConfigField; 5] = [
        ConfigField::ApiUrl,
        ConfigField::ApiKey,
        ConfigField::ModelName,
        ConfigField::PublishableKey,
        ConfigField::ProjectUrl,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ConfigField::ApiUrl => "API URL *",
            ConfigField::ApiKey => "API key *",
            ConfigField::ModelName => "Model name *",
            ConfigField::PublishableKey => "Publishable key",
            ConfigField::ProjectUrl => "Project URL",
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            ConfigField::ApiUrl => "Full endpoint, e.g. https://api.example.com/v1/chat/completions",
            ConfigField::ApiKey => "Stored by the server, never shown again",
            ConfigField::ModelName => "e.g. gpt-3.5-turbo, gpt-4",
            ConfigField::PublishableKey => "Optional",
            ConfigField::ProjectUrl => "Optional, e.g. https://project.example.com",
        }
    }

    pub fn is_required(self) -> bool {
        matches!(self, ConfigField::ApiUrl | ConfigField::ApiKey | ConfigField::ModelName)
    }

    pub fn is_secret(self) -> bool {
        self == ConfigField::ApiKey
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please fill in all required fields")]
    MissingRequired,
    #[error("Invalid URL format")]
    InvalidUrl,
}

impl FormError {
    pub fn kind(self) -> NotificationKind {
        match self {
            FormError::MissingRequired => NotificationKind::Warning,
            FormError::InvalidUrl => NotificationKind::Error,
        }
    }
}

#[derive(Debug, Default)]
pub struct ConfigForm {
    values: [String; 5],
    focus: usize,
    save_ticket: Option<Ticket>,
    tickets: TicketCounter,
}

impl ConfigForm {
    /// Clear all fields; any save still in flight becomes stale
    pub fn reset(&mut self) {
        self.values = Default::default();
        self.focus = 0;
        self.save_ticket = None;
    }

    pub fn value(&self, field: ConfigField) -> &str {
        &self.values[field.index()]
    }

    pub fn set_value(&mut self, field: ConfigField, value: impl Into<String>) {
        self.values[field.index()] = value.into();
    }

    pub fn focused(&self) -> ConfigField {
        ConfigField::ALL[self.focus]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % ConfigField::ALL.len();
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + ConfigField::ALL.len() - 1) % ConfigField::ALL.len();
    }

    pub fn is_saving(&self) -> bool {
        self.save_ticket.is_some()
    }

    pub fn push_char(&mut self, c: char) {
        if self.is_saving() || c.is_control() {
            return;
        }
        let value = &mut self.values[self.focus];
        if value.chars().count() < MAX_FIELD_CHARS {
            value.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if !self.is_saving() {
            self.values[self.focus].pop();
        }
    }

    /// Validate the form into a request body without touching the network
    pub fn validate(&self) -> Result<ApiConfig, FormError> {
        let trimmed = |field: ConfigField| self.value(field).trim().to_string();
        let optional = |field: ConfigField| Some(trimmed(field)).filter(|v| !v.is_empty());

        let api_url = trimmed(ConfigField::ApiUrl);
        let api_key = trimmed(ConfigField::ApiKey);
        let model_name = trimmed(ConfigField::ModelName);
        if api_url.is_empty() || api_key.is_empty() || model_name.is_empty() {
            return Err(FormError::MissingRequired);
        }

        let project_url = optional(ConfigField::ProjectUrl);
        Url::parse(&api_url).map_err(|_| FormError::InvalidUrl)?;
        if let Some(project_url) = &project_url {
            Url::parse(project_url).map_err(|_| FormError::InvalidUrl)?;
        }

        Ok(ApiConfig {
            api_url,
            api_key,
            model_name,
            publishable_key: optional(ConfigField::PublishableKey),
            project_url,
        })
    }

    /// Validate and issue a save; `Ok(None)` while a save is already in flight
    pub fn begin_save(&mut self) -> Result<Option<Command>, FormError> {
        if self.is_saving() {
            return Ok(None);
        }
        let config = self.validate()?;
        let ticket = self.tickets.issue();
        self.save_ticket = Some(ticket);
        Ok(Some(Command::SaveConfig { ticket, config }))
    }

    /// Returns false for a stale response
    pub fn finish_save(&mut self, ticket: Ticket) -> bool {
        if self.save_ticket != Some(ticket) {
            return false;
        }
        self.save_ticket = None;
        true
    }
}
