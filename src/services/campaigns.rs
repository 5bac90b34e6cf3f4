//! Campaigns service
//!
//! Basic messaging campaigns over the voter roll. The campaign log is
//! append-only; sending stamps every targeted voter in the same
//! multi-path write as the log entry.

use crate::config::{CAMPAIGNS_PATH, VOTERS_PATH};
use crate::error::Result;
use crate::store::{Campaign, CampaignStatus, DocumentStore};
use chrono::Utc;
use serde_json::json;

#[derive(Clone)]
pub struct CampaignService {
    store: DocumentStore,
}

impl CampaignService {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    /// Send a campaign to the given voters.
    ///
    /// Appends the campaign record and fan-writes `lastContacted` and
    /// `lastCampaign` onto every target in one multi-path update, so the
    /// log entry and the voter stamps land together or not at all.
    pub async fn send_campaign(&self, message: &str, voter_ids: &[String]) -> Result<Campaign> {
        let now = Utc::now();
        let campaign = Campaign {
            id: now.timestamp_millis().to_string(),
            message: message.to_string(),
            recipients: voter_ids.len() as u32,
            timestamp: Some(now),
            status: CampaignStatus::Sent,
        };

        let mut entries = Vec::with_capacity(voter_ids.len() + 1);
        entries.push((
            format!("{}/{}", CAMPAIGNS_PATH, campaign.id),
            serde_json::to_value(&campaign)?,
        ));
        for voter_id in voter_ids {
            entries.push((
                format!("{}/{}", VOTERS_PATH, voter_id),
                json!({ "lastContacted": now, "lastCampaign": campaign.id }),
            ));
        }

        self.store.update_multi(&entries).await?;

        tracing::info!(
            "Sent campaign {} to {} voters",
            campaign.id,
            campaign.recipients
        );
        Ok(campaign)
    }

    /// All sent campaigns, newest first
    pub async fn list_campaigns(&self) -> Result<Vec<Campaign>> {
        let documents = self.store.read_all(CAMPAIGNS_PATH).await?;

        let mut campaigns = Vec::with_capacity(documents.len());
        for (path, value) in documents {
            let mut campaign: Campaign = serde_json::from_value(value)?;
            campaign.id = path.rsplit('/').next().unwrap_or_default().to_string();
            campaigns.push(campaign);
        }

        campaigns.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(campaigns)
    }
}
