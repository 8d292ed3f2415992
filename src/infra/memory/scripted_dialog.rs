use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::core::validation::CANCEL_SENTINEL;
use crate::core::workspace::UserDialog;

/// Dialog that answers prompts from a queue and records every notice.
///
/// Once the queued inputs run out, prompts answer as if Cancel was pressed.
/// Confirmations default to "yes" once their queue is empty.
#[derive(Default)]
pub struct ScriptedDialog {
    inputs: Mutex<VecDeque<String>>,
    confirmations: Mutex<VecDeque<bool>>,
    prompts: Mutex<Vec<String>>,
    questions: Mutex<Vec<String>>,
    alerts: Mutex<Vec<String>>,
}

impl ScriptedDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inputs<I, T>(self, inputs: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.inputs
            .lock()
            .unwrap()
            .extend(inputs.into_iter().map(Into::into));
        self
    }

    pub fn with_confirmations(self, answers: impl IntoIterator<Item = bool>) -> Self {
        self.confirmations.lock().unwrap().extend(answers);
        self
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }

    pub fn last_alert(&self) -> Option<String> {
        self.alerts.lock().unwrap().last().cloned()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserDialog for ScriptedDialog {
    async fn prompt(&self, message: &str) -> String {
        self.prompts.lock().unwrap().push(message.to_string());
        self.inputs
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| CANCEL_SENTINEL.to_string())
    }

    async fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }

    async fn confirm(&self, message: &str) -> bool {
        self.questions.lock().unwrap().push(message.to_string());
        self.confirmations.lock().unwrap().pop_front().unwrap_or(true)
    }
}
