//! Scripted in-memory backend for unit tests.

use crate::api::{
    AccountProfile, ChatId, ChatSummary, LoginResponse, ModelReplies, SessionCheck,
    StoredTranscript, UserId,
};
use crate::backend::Backend;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::sync::Mutex;

/// Per-operation call counters.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Counts {
    pub check_session: usize,
    pub user_lookup: usize,
    pub chat_lookup: usize,
    pub create_chat: usize,
    pub list_chats: usize,
    pub transcript: usize,
    pub persist: usize,
    pub replies: usize,
    pub log_in: usize,
    pub sign_up: usize,
    pub log_out: usize,
    pub account: usize,
    pub update_account: usize,
}

/// A [`Backend`] whose every answer is scripted up front.
///
/// Failure flags make the corresponding operation return a backend-reported
/// error; counters and the ordered call log record what the code under test
/// actually issued.
#[derive(Debug, Default)]
pub(crate) struct ScriptedBackend {
    pub expired: bool,
    pub fail_check: bool,
    pub user_id: Option<UserId>,
    pub existing_chat: Option<ChatId>,
    pub fail_chat_lookup: bool,
    pub created_chat: Option<ChatId>,
    pub chats: Vec<ChatSummary>,
    pub fail_chat_list: bool,
    pub transcripts: HashMap<ChatId, StoredTranscript>,
    pub fail_persist: bool,
    pub replies: ModelReplies,
    pub fail_replies: bool,
    pub login_status: Option<u16>,
    pub sign_up_status: Option<u16>,
    pub account: Option<AccountProfile>,
    pub fail_update_account: bool,
    pub(crate) counts: Mutex<Counts>,
    pub(crate) call_log: Mutex<Vec<&'static str>>,
}

impl ScriptedBackend {
    pub fn counts(&self) -> Counts {
        *self.counts.lock().unwrap()
    }

    pub fn call_log(&self) -> Vec<&'static str> {
        self.call_log.lock().unwrap().clone()
    }

    fn record(&self, op: &'static str, bump: impl FnOnce(&mut Counts)) {
        bump(&mut self.counts.lock().unwrap());
        self.call_log.lock().unwrap().push(op);
    }

    fn scripted_failure() -> Error {
        Self::scripted_status(500)
    }

    fn scripted_status(status: u16) -> Error {
        Error::Api {
            status,
            message: "scripted failure".into(),
        }
    }
}

#[async_trait::async_trait]
impl Backend for ScriptedBackend {
    async fn check_session(&self) -> Result<SessionCheck> {
        self.record("check_session", |c| c.check_session += 1);
        if self.fail_check {
            return Err(Self::scripted_failure());
        }
        Ok(SessionCheck {
            expired: self.expired,
        })
    }

    async fn user_id_for_username(&self, _username: &str) -> Result<UserId> {
        self.record("user_lookup", |c| c.user_lookup += 1);
        self.user_id.ok_or_else(Self::scripted_failure)
    }

    async fn chat_id_for_user(&self, _user_id: UserId) -> Result<Option<ChatId>> {
        self.record("chat_lookup", |c| c.chat_lookup += 1);
        if self.fail_chat_lookup {
            return Err(Self::scripted_failure());
        }
        Ok(self.existing_chat)
    }

    async fn create_chat(&self, _user_id: UserId) -> Result<ChatId> {
        self.record("create_chat", |c| c.create_chat += 1);
        self.created_chat.ok_or_else(Self::scripted_failure)
    }

    async fn chats_for_user(&self, _user_id: UserId) -> Result<Vec<ChatSummary>> {
        self.record("list_chats", |c| c.list_chats += 1);
        if self.fail_chat_list {
            return Err(Self::scripted_failure());
        }
        Ok(self.chats.clone())
    }

    async fn chat_transcript(&self, chat_id: ChatId) -> Result<StoredTranscript> {
        self.record("transcript", |c| c.transcript += 1);
        self.transcripts
            .get(&chat_id)
            .cloned()
            .ok_or_else(Self::scripted_failure)
    }

    async fn persist_message(
        &self,
        _chat_id: ChatId,
        _message: &str,
        _sender_id: UserId,
    ) -> Result<()> {
        self.record("persist", |c| c.persist += 1);
        if self.fail_persist {
            return Err(Self::scripted_failure());
        }
        Ok(())
    }

    async fn model_replies(&self, _chat_id: ChatId, _message: &str) -> Result<ModelReplies> {
        self.record("replies", |c| c.replies += 1);
        if self.fail_replies {
            return Err(Self::scripted_failure());
        }
        Ok(self.replies.clone())
    }

    async fn log_in(&self, login: &str, _pwd: &str) -> Result<LoginResponse> {
        self.record("log_in", |c| c.log_in += 1);
        match self.login_status {
            Some(status) => Err(Self::scripted_status(status)),
            None => Ok(LoginResponse {
                username: login.to_owned(),
            }),
        }
    }

    async fn sign_up(&self, _user: &str, _email: &str, _pwd: &str) -> Result<()> {
        self.record("sign_up", |c| c.sign_up += 1);
        match self.sign_up_status {
            Some(status) => Err(Self::scripted_status(status)),
            None => Ok(()),
        }
    }

    async fn log_out(&self) -> Result<()> {
        self.record("log_out", |c| c.log_out += 1);
        Ok(())
    }

    async fn account(&self, _user_id: UserId) -> Result<AccountProfile> {
        self.record("account", |c| c.account += 1);
        self.account.clone().ok_or_else(Self::scripted_failure)
    }

    async fn update_account(&self, _profile: &AccountProfile) -> Result<()> {
        self.record("update_account", |c| c.update_account += 1);
        if self.fail_update_account {
            return Err(Self::scripted_failure());
        }
        Ok(())
    }
}
