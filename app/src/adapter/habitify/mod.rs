mod client;

use serde::Deserialize;

use crate::core::time::Duration;
use crate::habit::HabitId;

pub use client::HabitifyClient;

#[derive(Debug, Deserialize, Clone)]
pub struct Habitify {
    #[serde(default = "default_url")]
    pub url: String,
    pub api_key: String,
    #[serde(default)]
    pub tracked_habits: Vec<HabitId>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: i64,
}

fn default_url() -> String {
    "https://api.habitify.me".to_owned()
}

fn default_timeout_secs() -> i64 {
    10
}

impl Habitify {
    pub fn new_client(&self) -> anyhow::Result<HabitifyClient> {
        HabitifyClient::new(&self.url, &self.api_key, Duration::seconds(self.timeout_secs))
    }
}
