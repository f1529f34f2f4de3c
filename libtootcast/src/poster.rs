//! Thread posting sequence
//!
//! Publishes a page sequence strictly in order: every post after the first
//! replies to the id returned by the one before it, so the sequence cannot
//! be parallelized. The first failure aborts the remainder; statuses
//! already published stay up.

use tracing::{debug, info};

use crate::accounts::Account;
use crate::api::{MastodonApi, Status, StatusRequest, Visibility};
use crate::error::Result;
use crate::media::MediaFile;

/// Posts a page sequence as a reply thread on one account.
pub struct ThreadPoster<'a, A: MastodonApi> {
    api: &'a A,
    account: &'a Account,
}

impl<'a, A: MastodonApi> ThreadPoster<'a, A> {
    pub fn new(api: &'a A, account: &'a Account) -> Self {
        Self { api, account }
    }

    /// Publish `pages` in order and return the statuses that came back.
    ///
    /// Media attaches to the first post only; the content warning rides on
    /// every post; the first post is public and the replies are unlisted.
    pub async fn post_thread(
        &self,
        pages: &[String],
        media: &[MediaFile],
        content_warning: Option<&str>,
    ) -> Result<Vec<Status>> {
        let media_ids = self.upload_media(media).await?;

        let mut posted = Vec::with_capacity(pages.len());
        let mut in_reply_to: Option<String> = None;

        for (index, page) in pages.iter().enumerate() {
            let request = StatusRequest {
                status: page.clone(),
                in_reply_to_id: in_reply_to.clone(),
                spoiler_text: content_warning.map(str::to_string),
                visibility: if index == 0 {
                    Visibility::Public
                } else {
                    Visibility::Unlisted
                },
                media_ids: if index == 0 {
                    media_ids.clone()
                } else {
                    Vec::new()
                },
            };

            let status = self
                .api
                .post_status(&self.account.instance, &self.account.access_token, &request)
                .await?;
            info!("posted {}/{}: {}", index + 1, pages.len(), status.id);
            in_reply_to = Some(status.id.clone());
            posted.push(status);
        }

        Ok(posted)
    }

    async fn upload_media(&self, media: &[MediaFile]) -> Result<Vec<String>> {
        let mut ids = Vec::with_capacity(media.len());
        for file in media {
            debug!("uploading attachment {}", file.name);
            let attachment = self
                .api
                .upload_media(&self.account.instance, &self.account.access_token, file)
                .await?;
            ids.push(attachment.id);
        }
        Ok(ids)
    }
}
