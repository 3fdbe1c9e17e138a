//! Identity of the user who invoked a command

/// Display name used when the platform tells us nothing about the user
pub const UNKNOWN_REQUESTER: &str = "unknown user";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Requester {
    /// Platform user id, needed to mention the user
    pub user_id: Option<String>,

    /// Server-specific nickname
    pub nickname: Option<String>,

    /// Account name
    pub username: Option<String>,
}

impl Requester {
    pub fn new(user_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            nickname: None,
            username: Some(username.into()),
        }
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    /// Nickname, else username
    pub fn display_name(&self) -> &str {
        [&self.nickname, &self.username]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_REQUESTER)
    }

    /// Text that pings the user, or their name when the id is unknown
    pub fn mention(&self) -> String {
        match &self.user_id {
            Some(id) if !id.is_empty() => format!("<@{}>", id),
            _ => self.display_name().to_string(),
        }
    }
}
