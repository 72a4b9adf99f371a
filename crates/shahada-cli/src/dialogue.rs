//! Collecting the four certificate fields one message at a time
//!
//! The conversation is linear: `/start` asks for the title, then the name,
//! the role and finally the body, after which the fields are handed back
//! for rendering. `/start` restarts from the top at any point and `/cancel`
//! abandons a conversation in progress. The dialogue knows nothing about
//! its transport; the interactive command drives it over stdin.

use shahada::{CertificateFields, LogicalText};

pub const PROMPT_TITLE: &str = "مرحباً! من فضلك أدخل نص H1:";
pub const PROMPT_NAME: &str = "الآن أدخل الاسم:";
pub const PROMPT_ROLE: &str = "الآن أدخل الدور (role):";
pub const PROMPT_BODY: &str = "وأخيراً، أدخل نص body:";
pub const MESSAGE_DONE: &str = "تم إنشاء الشهادة بنجاح ✅";
pub const MESSAGE_CANCELLED: &str = "تم إلغاء العملية.";

/// Which field the conversation is waiting for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DialogueState {
    /// No conversation; only `/start` does anything
    #[default]
    Idle,
    AwaitingTitle,
    AwaitingName {
        title: LogicalText,
    },
    AwaitingRole {
        title: LogicalText,
        name: LogicalText,
    },
    AwaitingBody {
        title: LogicalText,
        name: LogicalText,
        role: LogicalText,
    },
}

/// What to tell the user after a message
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Ask for the next field
    Prompt(&'static str),
    /// All four fields are in; render them and reply with [`MESSAGE_DONE`]
    Complete(CertificateFields),
    /// The conversation was abandoned
    Cancelled(&'static str),
    /// Nothing to say: a message outside a conversation or an unknown command
    Ignored,
}

/// One user's conversation
#[derive(Debug, Default)]
pub struct Dialogue {
    state: DialogueState,
}

impl Dialogue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DialogueState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != DialogueState::Idle
    }

    /// Feed one incoming message
    pub fn handle(&mut self, message: &str) -> Reply {
        let trimmed = message.trim();

        if let Some(command) = trimmed.strip_prefix('/') {
            let command = command.split_whitespace().next().unwrap_or_default();
            return match command {
                "start" => {
                    self.state = DialogueState::AwaitingTitle;
                    Reply::Prompt(PROMPT_TITLE)
                },
                "cancel" if self.is_active() => {
                    self.state = DialogueState::Idle;
                    Reply::Cancelled(MESSAGE_CANCELLED)
                },
                _ => Reply::Ignored,
            };
        }

        let text = LogicalText::from(message);
        let (next, reply) = match std::mem::take(&mut self.state) {
            DialogueState::Idle => (DialogueState::Idle, Reply::Ignored),
            DialogueState::AwaitingTitle => {
                (DialogueState::AwaitingName { title: text }, Reply::Prompt(PROMPT_NAME))
            },
            DialogueState::AwaitingName { title } => (
                DialogueState::AwaitingRole { title, name: text },
                Reply::Prompt(PROMPT_ROLE),
            ),
            DialogueState::AwaitingRole { title, name } => (
                DialogueState::AwaitingBody {
                    title,
                    name,
                    role: text,
                },
                Reply::Prompt(PROMPT_BODY),
            ),
            DialogueState::AwaitingBody { title, name, role } => (
                DialogueState::Idle,
                Reply::Complete(CertificateFields {
                    title,
                    name,
                    role,
                    body: text,
                }),
            ),
        };

        self.state = next;
        reply
    }
}
