use crate::caregivers::CaregiverApi;
use crate::{Result, SyncError};
use callnote_core::CaregiverRecord;
use std::time::Duration;

#[cfg(feature = "axiscare-http")]
mod imp {
    use super::{CaregiverApi, CaregiverRecord, Duration, Result, SyncError};
    use crate::caregivers::decode_caregivers;
    use reqwest::blocking::{Client, Response};
    use serde::Serialize;
    use tracing::debug;
    use url::Url;

    const USER_AGENT: &str = "callnote";
    const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    #[derive(Debug, Serialize)]
    struct NotesPatch<'a> {
        notes: &'a str,
    }

    /// Blocking client for the AxisCare caregivers endpoints.
    ///
    /// The base URL is parsed per request, so a missing site id surfaces as
    /// a failed call rather than a startup error.
    #[derive(Debug, Clone)]
    pub struct AxisCareClient {
        client: Client,
        base_url: String,
        api_token: String,
    }

    impl AxisCareClient {
        pub fn new(
            base_url: impl Into<String>,
            api_token: impl Into<String>,
            timeout: Duration,
        ) -> Result<Self> {
            let client = Client::builder()
                .user_agent(USER_AGENT)
                .timeout(timeout)
                .connect_timeout(CONNECT_TIMEOUT.min(timeout))
                .build()?;
            Ok(Self {
                client,
                base_url: base_url.into(),
                api_token: api_token.into(),
            })
        }

        pub fn base_url(&self) -> &str {
            &self.base_url
        }

        fn endpoint(&self, segments: &[&str]) -> Result<Url> {
            let mut url = Url::parse(&self.base_url)?;
            url.path_segments_mut()
                .map_err(|_| {
                    SyncError::Parse(format!(
                        "axiscare base url cannot carry a path: {}",
                        self.base_url
                    ))
                })?
                .pop_if_empty()
                .extend(segments);
            Ok(url)
        }
    }

    fn ensure_success(operation: &'static str, response: Response) -> Result<Response> {
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Status {
                operation,
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    impl CaregiverApi for AxisCareClient {
        fn source_name(&self) -> &'static str {
            "axiscare"
        }

        fn list_caregivers(&self) -> Result<Vec<CaregiverRecord>> {
            let url = self.endpoint(&["caregivers"])?;
            debug!(%url, "listing caregivers");
            let response = self.client.get(url).bearer_auth(&self.api_token).send()?;
            let response = ensure_success("list caregivers", response)?;
            let entries: Vec<serde_json::Value> = response.json()?;
            Ok(decode_caregivers(entries))
        }

        fn update_notes(&self, caregiver_id: &str, notes: &str) -> Result<()> {
            let url = self.endpoint(&["caregivers", caregiver_id])?;
            debug!(%url, "patching caregiver notes");
            let response = self
                .client
                .patch(url)
                .bearer_auth(&self.api_token)
                .json(&NotesPatch { notes })
                .send()?;
            ensure_success("update caregiver", response)?;
            Ok(())
        }

        fn fetch_caregiver(&self, caregiver_id: &str) -> Result<CaregiverRecord> {
            let url = self.endpoint(&["caregivers", caregiver_id])?;
            debug!(%url, "fetching caregiver");
            let response = self.client.get(url).bearer_auth(&self.api_token).send()?;
            let response = ensure_success("fetch caregiver", response)?;
            Ok(response.json()?)
        }
    }

}

#[cfg(not(feature = "axiscare-http"))]
mod imp {
    use super::{CaregiverApi, CaregiverRecord, Duration, Result, SyncError};

    #[derive(Debug, Clone)]
    pub struct AxisCareClient {
        base_url: String,
    }

    impl AxisCareClient {
        pub fn new(
            base_url: impl Into<String>,
            _api_token: impl Into<String>,
            _timeout: Duration,
        ) -> Result<Self> {
            Ok(Self {
                base_url: base_url.into(),
            })
        }

        pub fn base_url(&self) -> &str {
            &self.base_url
        }

        fn unavailable(&self) -> SyncError {
            SyncError::Unavailable("AxisCare access requires the axiscare-http feature".to_string())
        }
    }

    impl CaregiverApi for AxisCareClient {
        fn source_name(&self) -> &'static str {
            "axiscare"
        }

        fn list_caregivers(&self) -> Result<Vec<CaregiverRecord>> {
            Err(self.unavailable())
        }

        fn update_notes(&self, _caregiver_id: &str, _notes: &str) -> Result<()> {
            Err(self.unavailable())
        }

        fn fetch_caregiver(&self, _caregiver_id: &str) -> Result<CaregiverRecord> {
            Err(self.unavailable())
        }
    }
}

pub use imp::AxisCareClient;
